use clap::{Args as ClapArgs, Subcommand};
use tracing::info;

use super::{ContactArgs, Context, ListArgs, or_dash, print_page_footer};
use crate::api::models::user_groups::{RegistrationStatus, UserGroupResponse, UserGroupType};
use crate::console::filters::UserGroupStats;
use crate::console::forms::UserGroupForm;
use crate::errors::{Error, Result};
use crate::services::{CrudService, UserGroupFilter, UserGroups};
use crate::types::UserGroupId;

#[derive(Subcommand, Debug)]
pub enum UserGroupCommand {
    /// List user groups
    List {
        #[command(flatten)]
        list: ListArgs,
    },
    /// Show one user group
    Show { id: UserGroupId },
    /// Create a user group; code and name are generated unless given
    Create(CreateArgs),
    /// Update a user group
    Update(UpdateArgs),
    /// Deactivate a user group
    Delete { id: UserGroupId },
    /// Counts by type, province and active state
    Stats,
}

#[derive(ClapArgs, Debug)]
pub struct CreateArgs {
    /// Province code, e.g. WC
    #[arg(long)]
    pub province: String,
    #[arg(long = "type", value_enum, default_value_t = UserGroupType::FixedDltc)]
    pub group_type: UserGroupType,
    /// Explicit code instead of the next free one
    #[arg(long)]
    pub code: Option<String>,
    /// Explicit name instead of the derived one
    #[arg(long)]
    pub name: Option<String>,
    /// Appended to the derived name, e.g. "Main Branch"
    #[arg(long)]
    pub suffix: Option<String>,
    #[arg(long, value_enum, default_value_t)]
    pub registration_status: RegistrationStatus,
    #[arg(long)]
    pub parent: Option<UserGroupId>,
    #[command(flatten)]
    pub contact: ContactArgs,
    #[arg(long)]
    pub fax: Option<String>,
    #[arg(long)]
    pub physical_address: Option<String>,
    #[arg(long)]
    pub postal_address: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Ask the server whether the code is free before creating
    #[arg(long)]
    pub check_code: bool,
}

#[derive(ClapArgs, Debug)]
pub struct UpdateArgs {
    pub id: UserGroupId,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long = "type", value_enum)]
    pub group_type: Option<UserGroupType>,
    #[arg(long)]
    pub province: Option<String>,
    #[arg(long, value_enum)]
    pub registration_status: Option<RegistrationStatus>,
    #[command(flatten)]
    pub contact: ContactArgs,
    /// Drop the current contact before applying the contact flags
    #[arg(long)]
    pub clear_contact: bool,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub active: Option<bool>,
}

pub(super) async fn run(command: UserGroupCommand, ctx: &Context<'_>) -> Result<()> {
    let service = UserGroups::new(&ctx.client);
    let all = UserGroupFilter::all(ctx.config.list.fetch_limit);

    match command {
        UserGroupCommand::List { list } => {
            let groups = service.list(&all).await?;
            let rows: Vec<UserGroupResponse> = list.filter().apply(&groups).into_iter().cloned().collect();
            let page = list.page(&rows, ctx.config);
            ctx.out.emit(&page, |page| {
                println!("{:<8} {:<40} {:<24} {:<5} {:<8}", "CODE", "NAME", "TYPE", "PROV", "ACTIVE");
                for g in &page.items {
                    println!(
                        "{:<8} {:<40} {:<24} {:<5} {:<8}",
                        g.user_group_code,
                        g.user_group_name,
                        g.user_group_type.label(),
                        g.province_code,
                        if g.is_active { "yes" } else { "no" }
                    );
                }
                print_page_footer(page);
            })
        }
        UserGroupCommand::Show { id } => {
            let group = service.get_by_id(id).await?;
            ctx.out.emit(&group, print_group)
        }
        UserGroupCommand::Create(args) => {
            let existing = service.list(&all).await?;
            let mut form = UserGroupForm::create(args.group_type, &existing);
            if let Some(code) = &args.code {
                form.set_code(code)?;
            }
            if let Some(name) = &args.name {
                form.set_name(name)?;
            }
            if let Some(suffix) = &args.suffix {
                form.set_name_suffix(suffix)?;
            }
            form.set_province(&args.province)?;
            form.registration_status = args.registration_status;
            form.parent_group_id = args.parent;
            args.contact.apply(&mut form.contact, &ctx.client).await?;
            form.fax_number = args.fax.clone().unwrap_or_default();
            form.physical_address = args.physical_address.clone().unwrap_or_default();
            form.postal_address = args.postal_address.clone().unwrap_or_default();
            form.description = args.description.clone().unwrap_or_default();

            let request = form.to_create()?;
            if args.check_code {
                let answer = service.validate_code(&request.user_group_code).await?;
                if !answer.is_valid {
                    return Err(Error::Conflict {
                        message: answer
                            .message
                            .unwrap_or_else(|| format!("Code {} is already in use", request.user_group_code)),
                        code: None,
                    });
                }
            }
            let created = service.create(&request).await?;
            info!(code = %created.user_group_code, "User group created");
            ctx.out.emit(&created, print_group)
        }
        UserGroupCommand::Update(args) => {
            let current = service.get_by_id(args.id).await?;
            let mut form = UserGroupForm::edit(&current);
            if let Some(group_type) = args.group_type {
                form.set_group_type(group_type)?;
            }
            if let Some(province) = &args.province {
                form.set_province(province)?;
            }
            if let Some(name) = &args.name {
                form.set_name(name)?;
            }
            if let Some(status) = args.registration_status {
                form.registration_status = status;
            }
            if args.clear_contact {
                form.contact.clear_selection();
            }
            args.contact.apply(&mut form.contact, &ctx.client).await?;
            if let Some(description) = &args.description {
                form.description = description.clone();
            }
            if let Some(active) = args.active {
                form.is_active = active;
            }
            let updated = service.update(args.id, &form.to_update()?).await?;
            ctx.out.emit(&updated, print_group)
        }
        UserGroupCommand::Delete { id } => {
            let deleted = service.delete(id).await?;
            ctx.out.emit(&deleted, |g| {
                println!("Deactivated {} ({})", g.user_group_code, g.user_group_name)
            })
        }
        UserGroupCommand::Stats => {
            let groups = service.list(&all).await?;
            let stats = UserGroupStats::compute(&groups);
            ctx.out.emit(&stats, |s| {
                println!("Total: {}  Active: {}  Inactive: {}", s.total, s.active, s.inactive);
                for (kind, count) in &s.by_type {
                    println!("  {:<24} {count}", kind.label());
                }
                for (province, count) in &s.by_province {
                    println!("  {province:<24} {count}");
                }
            })
        }
    }
}

fn print_group(g: &UserGroupResponse) {
    println!("ID:           {}", g.id);
    println!("Code:         {}", g.user_group_code);
    println!("Name:         {}", g.user_group_name);
    println!("Type:         {}", g.user_group_type.label());
    println!("Province:     {}", g.province_code);
    println!("Registration: {}", g.registration_status.as_str());
    println!("Contact:      {}", or_dash(g.contact_person.as_deref()));
    println!("Email:        {}", or_dash(g.email.as_deref()));
    println!("Phone:        {}", or_dash(g.phone_number.as_deref()));
    println!("Active:       {}", g.is_active);
}
