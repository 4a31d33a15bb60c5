use chrono::{Local, NaiveDate};
use clap::{Args as ClapArgs, Subcommand};
use serde::Serialize;

use super::{Context, ListArgs, or_dash, print_page_footer};
use crate::api::models::staff_assignments::{
    AssignmentCapabilities, AssignmentStatus, AssignmentType, StaffAssignmentCreate, StaffAssignmentResponse,
    StaffAssignmentUpdate,
};
use crate::console::filters::{AssignmentStats, Page};
use crate::errors::Result;
use crate::services::StaffAssignments;
use crate::types::{AssignmentId, LocationId, UserId, abbrev_uuid};

#[derive(Subcommand, Debug)]
pub enum StaffCommand {
    /// List assignments of a location or a user
    List {
        /// Assignments at this location
        #[arg(long)]
        location: Option<LocationId>,
        /// Assignments of this user
        #[arg(long)]
        user: Option<UserId>,
        #[command(flatten)]
        list: ListArgs,
    },
    /// Show one assignment
    Show { id: AssignmentId },
    /// Assign a user to a location
    Assign(AssignArgs),
    /// Change an assignment
    Update(UpdateArgs),
    /// End an assignment
    Remove {
        #[arg(long)]
        location: LocationId,
        id: AssignmentId,
    },
}

#[derive(ClapArgs, Debug)]
pub struct AssignArgs {
    #[arg(long)]
    pub location: LocationId,
    #[arg(long)]
    pub user: UserId,
    #[arg(long = "type", value_enum, default_value_t)]
    pub assignment_type: AssignmentType,
    #[arg(long, value_enum, default_value_t)]
    pub status: AssignmentStatus,
    /// First day of the assignment (defaults to today)
    #[arg(long)]
    pub effective: Option<NaiveDate>,
    #[arg(long)]
    pub expiry: Option<NaiveDate>,
    #[arg(long)]
    pub can_manage_location: bool,
    #[arg(long)]
    pub can_assign_others: bool,
    #[arg(long)]
    pub can_view_reports: bool,
    #[arg(long)]
    pub can_manage_resources: bool,
    #[arg(long)]
    pub work_schedule: Option<String>,
    #[arg(long)]
    pub responsibilities: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(ClapArgs, Debug)]
pub struct UpdateArgs {
    #[arg(long)]
    pub location: LocationId,
    pub id: AssignmentId,
    #[arg(long = "type", value_enum)]
    pub assignment_type: Option<AssignmentType>,
    #[arg(long, value_enum)]
    pub status: Option<AssignmentStatus>,
    #[arg(long)]
    pub expiry: Option<NaiveDate>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
struct StaffListing {
    page: Page<StaffAssignmentResponse>,
    stats: AssignmentStats,
}

pub(super) async fn run(command: StaffCommand, ctx: &Context<'_>) -> Result<()> {
    let service = StaffAssignments::new(&ctx.client);

    match command {
        StaffCommand::List { location, user, list } => {
            let assignments = match (location, user) {
                (_, Some(user_id)) => service.list_for_user(user_id).await?,
                (Some(location_id), None) => service.list_for_location(location_id).await?,
                (None, None) => service.list_all().await?,
            };
            let mut filter = list.filter();
            filter.location_id = location;
            let rows: Vec<StaffAssignmentResponse> = filter.apply(&assignments).into_iter().cloned().collect();
            let listing = StaffListing {
                stats: AssignmentStats::compute(&rows),
                page: list.page(&rows, ctx.config),
            };
            let today = Local::now().date_naive();
            ctx.out.emit(&listing, |listing| {
                println!(
                    "{:<10} {:<24} {:<24} {:<10} {:<10} {:<11} {:<11} {:<3}",
                    "ID", "USER", "LOCATION", "TYPE", "STATUS", "FROM", "UNTIL", "NOW"
                );
                for a in &listing.page.items {
                    println!(
                        "{:<10} {:<24} {:<24} {:<10} {:<10} {:<11} {:<11} {:<3}",
                        abbrev_uuid(&a.id),
                        a.user_full_name
                            .as_deref()
                            .or(a.username.as_deref())
                            .map(str::to_string)
                            .unwrap_or_else(|| abbrev_uuid(&a.user_id)),
                        a.location_name
                            .clone()
                            .unwrap_or_else(|| abbrev_uuid(&a.location_id)),
                        a.assignment_type.as_str(),
                        a.assignment_status.as_str(),
                        a.effective_date,
                        a.expiry_date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
                        if a.is_effective_on(today) { "yes" } else { "no" },
                    );
                }
                print_page_footer(&listing.page);
            })
        }
        StaffCommand::Show { id } => {
            let assignment = service.get_by_id(id).await?;
            ctx.out.emit(&assignment, print_assignment)
        }
        StaffCommand::Assign(args) => {
            let request = StaffAssignmentCreate {
                user_id: args.user,
                location_id: args.location,
                assignment_type: args.assignment_type,
                assignment_status: args.status,
                effective_date: args.effective.unwrap_or_else(|| Local::now().date_naive()),
                expiry_date: args.expiry,
                capabilities: AssignmentCapabilities {
                    can_manage_location: args.can_manage_location,
                    can_assign_others: args.can_assign_others,
                    can_view_reports: args.can_view_reports,
                    can_manage_resources: args.can_manage_resources,
                },
                work_schedule: args.work_schedule,
                responsibilities: args.responsibilities,
                notes: args.notes,
            };
            let created = service.assign(&request).await?;
            ctx.out.emit(&created, print_assignment)
        }
        StaffCommand::Update(args) => {
            let update = StaffAssignmentUpdate {
                assignment_type: args.assignment_type,
                assignment_status: args.status,
                expiry_date: args.expiry,
                notes: args.notes,
                ..Default::default()
            };
            let updated = service.update(args.location, args.id, &update).await?;
            ctx.out.emit(&updated, print_assignment)
        }
        StaffCommand::Remove { location, id } => {
            let removed = service.remove(location, id).await?;
            ctx.out.emit(&removed, |a| {
                println!("Removed assignment {} ({})", abbrev_uuid(&a.id), a.assignment_status.as_str())
            })
        }
    }
}

fn print_assignment(a: &StaffAssignmentResponse) {
    println!("ID:        {}", a.id);
    println!("User:      {} {}", a.user_id, or_dash(a.username.as_deref()));
    println!("Location:  {} {}", a.location_id, or_dash(a.location_name.as_deref()));
    println!("Type:      {}", a.assignment_type.as_str());
    println!("Status:    {}", a.assignment_status.as_str());
    println!("From:      {}", a.effective_date);
    println!(
        "Until:     {}",
        a.expiry_date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
    );
}
