use std::collections::HashMap;

use clap::{Args as ClapArgs, Subcommand};
use tracing::info;

use super::{ContactArgs, Context, ListArgs, or_dash, print_page_footer};
use crate::api::models::locations::{InfrastructureType, LocationResponse, OperationalStatus};
use crate::console::filters::LocationStats;
use crate::console::forms::LocationForm;
use crate::errors::Result;
use crate::services::{CrudService, LocationFilter, Locations, UserGroupFilter, UserGroups};
use crate::types::{LocationId, UserGroupId};

#[derive(Subcommand, Debug)]
pub enum LocationCommand {
    /// List locations
    List {
        #[command(flatten)]
        list: ListArgs,
        /// Only locations of this user group
        #[arg(long)]
        user_group: Option<UserGroupId>,
    },
    /// Show one location
    Show { id: LocationId },
    /// Create a location under a user group; code and name are generated unless given
    Create(CreateArgs),
    /// Update a location
    Update(UpdateArgs),
    /// Deactivate a location
    Delete { id: LocationId },
    /// Counts by status and type, plus total daily capacity
    Stats,
    /// Equipment and rooms at a location
    Resources { id: LocationId },
}

#[derive(ClapArgs, Debug)]
pub struct CreateArgs {
    #[arg(long)]
    pub user_group: UserGroupId,
    #[arg(long = "type", value_enum, default_value_t = InfrastructureType::FixedDltc)]
    pub infrastructure_type: InfrastructureType,
    #[arg(long, value_enum, default_value_t)]
    pub operational_status: OperationalStatus,
    #[arg(long)]
    pub code: Option<String>,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub suffix: Option<String>,
    #[arg(long)]
    pub address_line_1: String,
    #[arg(long)]
    pub address_line_2: Option<String>,
    #[arg(long)]
    pub city: String,
    #[arg(long)]
    pub postal_code: Option<String>,
    /// Defaults to the user group's province
    #[arg(long)]
    pub province: Option<String>,
    #[arg(long)]
    pub max_users: Option<u32>,
    #[arg(long)]
    pub max_daily_capacity: Option<u32>,
    #[command(flatten)]
    pub contact: ContactArgs,
    #[arg(long)]
    pub operating_hours: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(ClapArgs, Debug)]
pub struct UpdateArgs {
    pub id: LocationId,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long = "type", value_enum)]
    pub infrastructure_type: Option<InfrastructureType>,
    #[arg(long, value_enum)]
    pub operational_status: Option<OperationalStatus>,
    #[arg(long)]
    pub address_line_1: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub postal_code: Option<String>,
    #[arg(long)]
    pub max_users: Option<u32>,
    #[arg(long)]
    pub max_daily_capacity: Option<u32>,
    #[command(flatten)]
    pub contact: ContactArgs,
    #[arg(long)]
    pub clear_contact: bool,
    #[arg(long)]
    pub operating_hours: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    #[arg(long)]
    pub active: Option<bool>,
}

pub(super) async fn run(command: LocationCommand, ctx: &Context<'_>) -> Result<()> {
    let service = Locations::new(&ctx.client);
    let groups = UserGroups::new(&ctx.client);
    let limit = ctx.config.list.fetch_limit;

    match command {
        LocationCommand::List { list, user_group } => {
            let location_filter = LocationFilter::all(limit);
            let group_filter = UserGroupFilter::all(limit);
            let (locations, all_groups) =
                tokio::try_join!(service.list(&location_filter), groups.list(&group_filter))?;
            let group_codes: HashMap<UserGroupId, String> = all_groups
                .into_iter()
                .map(|g| (g.id, g.user_group_code))
                .collect();

            let mut filter = list.filter();
            filter.user_group_id = user_group;
            let rows: Vec<LocationResponse> = filter.apply(&locations).into_iter().cloned().collect();
            let page = list.page(&rows, ctx.config);
            ctx.out.emit(&page, |page| {
                println!(
                    "{:<10} {:<36} {:<8} {:<20} {:<12} {:>8}",
                    "CODE", "NAME", "GROUP", "TYPE", "STATUS", "CAPACITY"
                );
                for l in &page.items {
                    println!(
                        "{:<10} {:<36} {:<8} {:<20} {:<12} {:>8}",
                        l.location_code,
                        l.location_name,
                        group_codes.get(&l.user_group_id).map(String::as_str).unwrap_or("?"),
                        l.infrastructure_type.label(),
                        l.operational_status.as_str(),
                        l.max_daily_capacity.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string()),
                    );
                }
                print_page_footer(page);
            })
        }
        LocationCommand::Show { id } => {
            let location = service.get_by_id(id).await?;
            ctx.out.emit(&location, print_location)
        }
        LocationCommand::Create(args) => {
            let siblings = LocationFilter::all(limit);
            let (group, existing) = tokio::try_join!(groups.get_by_id(args.user_group), service.list(&siblings))?;

            let mut form = LocationForm::create(args.infrastructure_type, &existing);
            if let Some(code) = &args.code {
                form.set_code(code)?;
            }
            if let Some(name) = &args.name {
                form.set_name(name)?;
            }
            if let Some(suffix) = &args.suffix {
                form.set_name_suffix(suffix)?;
            }
            form.set_user_group(&group)?;
            if let Some(province) = &args.province {
                form.set_province(province)?;
            }
            form.operational_status = args.operational_status;
            form.address_line_1 = args.address_line_1.clone();
            form.address_line_2 = args.address_line_2.clone().unwrap_or_default();
            form.city = args.city.clone();
            form.postal_code = args.postal_code.clone().unwrap_or_default();
            form.max_users = args.max_users;
            form.max_daily_capacity = args.max_daily_capacity;
            args.contact.apply(&mut form.contact, &ctx.client).await?;
            form.operating_hours = args.operating_hours.clone().unwrap_or_default();
            form.notes = args.notes.clone().unwrap_or_default();

            let created = service.create(&form.to_create()?).await?;
            info!(code = %created.location_code, "Location created");
            ctx.out.emit(&created, print_location)
        }
        LocationCommand::Update(args) => {
            let current = service.get_by_id(args.id).await?;
            let mut form = LocationForm::edit(&current);
            if let Some(kind) = args.infrastructure_type {
                form.set_infrastructure_type(kind)?;
            }
            if let Some(name) = &args.name {
                form.set_name(name)?;
            }
            if let Some(status) = args.operational_status {
                form.operational_status = status;
            }
            if let Some(line) = &args.address_line_1 {
                form.address_line_1 = line.clone();
            }
            if let Some(city) = &args.city {
                form.city = city.clone();
            }
            if let Some(postal_code) = &args.postal_code {
                form.postal_code = postal_code.clone();
            }
            if args.max_users.is_some() {
                form.max_users = args.max_users;
            }
            if args.max_daily_capacity.is_some() {
                form.max_daily_capacity = args.max_daily_capacity;
            }
            if args.clear_contact {
                form.contact.clear_selection();
            }
            args.contact.apply(&mut form.contact, &ctx.client).await?;
            if let Some(hours) = &args.operating_hours {
                form.operating_hours = hours.clone();
            }
            if let Some(notes) = &args.notes {
                form.notes = notes.clone();
            }
            if let Some(active) = args.active {
                form.is_active = active;
            }
            let updated = service.update(args.id, &form.to_update()?).await?;
            ctx.out.emit(&updated, print_location)
        }
        LocationCommand::Delete { id } => {
            let deleted = service.delete(id).await?;
            ctx.out.emit(&deleted, |l| {
                println!("Deactivated {} ({})", l.location_code, l.location_name)
            })
        }
        LocationCommand::Stats => {
            let locations = service.list(&LocationFilter::all(limit)).await?;
            let stats = LocationStats::compute(&locations);
            ctx.out.emit(&stats, |s| {
                println!("Total: {}  Active: {}  Inactive: {}", s.total, s.active, s.inactive);
                println!("Total daily capacity: {}", s.total_daily_capacity);
                for (status, count) in &s.by_status {
                    println!("  {:<24} {count}", status.as_str());
                }
                for (kind, count) in &s.by_type {
                    println!("  {:<24} {count}", kind.label());
                }
            })
        }
        LocationCommand::Resources { id } => {
            let resources = service.resources(id).await?;
            ctx.out.emit(&resources, |resources| {
                println!("{:<12} {:<30} {:<20} {:>8}", "CODE", "NAME", "TYPE", "CAPACITY");
                for r in resources {
                    println!(
                        "{:<12} {:<30} {:<20} {:>8}",
                        or_dash(r.resource_code.as_deref()),
                        r.resource_name,
                        r.resource_type,
                        r.capacity.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string()),
                    );
                }
            })
        }
    }
}

fn print_location(l: &LocationResponse) {
    let a = &l.address;
    println!("ID:        {}", l.id);
    println!("Code:      {}", l.location_code);
    println!("Name:      {}", l.location_name);
    println!("Type:      {}", l.infrastructure_type.label());
    println!("Status:    {}", l.operational_status.as_str());
    println!("Address:   {}, {} {}", a.address_line_1, a.city, or_dash(a.postal_code.as_deref()));
    println!("Province:  {}", a.province_code);
    println!("Contact:   {}", or_dash(l.contact_person.as_deref()));
    println!("Email:     {}", or_dash(l.contact_email.as_deref()));
    println!("Phone:     {}", or_dash(l.contact_phone.as_deref()));
    println!("Active:    {}", l.is_active);
}

#[cfg(test)]
mod tests {
    use crate::cli::{Cli, run};
    use crate::config::Config;
    use crate::test_utils::{location_json, test_api_config, user_group_json, user_json};
    use clap::Parser;
    use serde_json::json;
    use uuid::Uuid;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test_log::test(tokio::test)]
    async fn test_create_uses_group_prefix_and_contact_user() {
        let server = MockServer::start().await;
        let group_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        Mock::given(method("GET"))
            .and(path(format!("/api/v1/user-groups/{group_id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_group_json(group_id, "WC01", "WC")))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/locations/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([location_json(
                Uuid::new_v4(),
                group_id,
                "WC01L001",
                "WC"
            )])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/users/{user_id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json(user_id, "WC01001", "Jane Doe")))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/locations/"))
            .and(body_partial_json(json!({
                "location_code": "WC01L002",
                "location_name": "Western Cape DLTC",
                "province_code": "WC",
                "contact_person": "Jane Doe",
                "contact_user_id": user_id
            })))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(location_json(Uuid::new_v4(), group_id, "WC01L002", "WC")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let group_arg = group_id.to_string();
        let user_arg = user_id.to_string();
        let cli = Cli::try_parse_from([
            "lincctl",
            "locations",
            "create",
            "--user-group",
            group_arg.as_str(),
            "--address-line-1",
            "12 Voortrekker Road",
            "--city",
            "Bellville",
            "--contact-user",
            user_arg.as_str(),
        ])
        .unwrap();
        let config = Config {
            api: test_api_config(&server),
            ..Default::default()
        };
        run(cli.command.unwrap(), &config, true).await.unwrap();
    }

    #[test_log::test(tokio::test)]
    async fn test_stats() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/locations/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                location_json(Uuid::new_v4(), Uuid::new_v4(), "WC01L001", "WC"),
                location_json(Uuid::new_v4(), Uuid::new_v4(), "GP01L001", "GP"),
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let cli = Cli::try_parse_from(["lincctl", "locations", "stats"]).unwrap();
        let config = Config {
            api: test_api_config(&server),
            ..Default::default()
        };
        run(cli.command.unwrap(), &config, false).await.unwrap();
    }

    #[test_log::test(tokio::test)]
    async fn test_list_loads_locations_and_groups_together() {
        let server = MockServer::start().await;
        let group_id = Uuid::new_v4();
        Mock::given(method("GET"))
            .and(path("/api/v1/locations/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                location_json(Uuid::new_v4(), group_id, "WC100L001", "WC"),
                location_json(Uuid::new_v4(), Uuid::new_v4(), "GP01L001", "GP"),
            ])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/user-groups/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([user_group_json(group_id, "WC100", "WC")])))
            .expect(1)
            .mount(&server)
            .await;

        let group_arg = group_id.to_string();
        let cli = Cli::try_parse_from(["lincctl", "locations", "list", "--user-group", group_arg.as_str()]).unwrap();
        let config = Config {
            api: test_api_config(&server),
            ..Default::default()
        };
        run(cli.command.unwrap(), &config, false).await.unwrap();
    }
}
