use std::sync::Arc;

use clap::{Args as ClapArgs, Subcommand};
use tracing::info;

use super::{Context, ListArgs, or_dash, print_page_footer};
use crate::api::models::users::{AuthorityLevel, IdType, Privilege, UserResponse, UserStatus, UserType};
use crate::console::filters::UserStats;
use crate::console::search::{DebouncedSearch, SearchState};
use crate::console::validation;
use crate::console::wizard::{PrivilegeReset, UserWizard};
use crate::errors::{Error, FieldError, Result};
use crate::services::{CrudService, UserFilter, UserGroups, Users};
use crate::types::{UserGroupId, UserId};

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// List users
    List {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        user_group: Option<UserGroupId>,
    },
    /// Show one user
    Show { id: UserId },
    /// Create a user through the five wizard steps
    Create(CreateArgs),
    /// Deactivate a user
    Delete { id: UserId },
    /// Search users by name, username or email
    Search { query: String },
    /// Check a field value locally and against the server
    Validate { field: String, value: String },
    /// Counts by status and type
    Stats,
}

#[derive(ClapArgs, Debug)]
pub struct CreateArgs {
    #[arg(long)]
    pub user_group: UserGroupId,
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long, value_enum, default_value_t)]
    pub id_type: IdType,
    #[arg(long)]
    pub id_number: String,
    /// Explicit username instead of the next free one
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long, value_enum, default_value_t)]
    pub user_type: UserType,
    #[arg(long, value_enum, default_value_t)]
    pub authority_level: AuthorityLevel,
    #[arg(long, value_enum, default_value_t)]
    pub status: UserStatus,
    #[arg(long)]
    pub region: Option<String>,
    /// Initial password
    #[arg(long, env = "LINCCTL_NEW_USER_PASSWORD", hide_env_values = true)]
    pub password: String,
    /// Grant a privilege on top of the user type's defaults
    #[arg(long, value_enum)]
    pub grant: Vec<Privilege>,
    /// Withhold a privilege the user type would grant
    #[arg(long, value_enum)]
    pub revoke: Vec<Privilege>,
    #[arg(long)]
    pub require_2fa: bool,
    /// Do not force a password change on first login
    #[arg(long)]
    pub no_password_change: bool,
    /// Ask the server whether username and email are free before creating
    #[arg(long)]
    pub check: bool,
}

pub(super) async fn run(command: UserCommand, ctx: &Context<'_>) -> Result<()> {
    let service = Users::new(&ctx.client);
    let limit = ctx.config.list.fetch_limit;

    match command {
        UserCommand::List { list, user_group } => {
            let mut server_filter = UserFilter::all(limit);
            server_filter.user_group_id = user_group;
            let users = service.list(&server_filter).await?;
            let rows: Vec<UserResponse> = list.filter().apply(&users).into_iter().cloned().collect();
            let page = list.page(&rows, ctx.config);
            ctx.out.emit(&page, |page| {
                println!("{:<12} {:<30} {:<34} {:<11} {:<18}", "USERNAME", "NAME", "EMAIL", "TYPE", "STATUS");
                for u in &page.items {
                    let details = &u.personal_details;
                    println!(
                        "{:<12} {:<30} {:<34} {:<11} {:<18}",
                        u.username,
                        details.display_name().unwrap_or_else(|| "-".to_string()),
                        or_dash(details.email.as_deref()),
                        u.user_type.as_str(),
                        u.status.as_str(),
                    );
                }
                print_page_footer(page);
            })
        }
        UserCommand::Show { id } => {
            let user = service.get_by_id(id).await?;
            ctx.out.emit(&user, print_user)
        }
        UserCommand::Create(args) => {
            let groups = UserGroups::new(&ctx.client);
            let everyone = UserFilter::all(limit);
            let (group, existing) = tokio::try_join!(groups.get_by_id(args.user_group), service.list(&everyone))?;

            let mut wizard = UserWizard::new(&existing);

            wizard.draft.first_name = args.first_name.clone();
            wizard.draft.last_name = args.last_name.clone();
            wizard.draft.email = args.email.clone();
            wizard.draft.phone_number = args.phone.clone().unwrap_or_default();
            wizard.draft.id_type = args.id_type;
            wizard.draft.id_number = args.id_number.clone();
            wizard.next()?;

            wizard.set_user_group(&group)?;
            if let Some(username) = &args.username {
                wizard.set_username(username)?;
            }
            wizard.draft.region = args.region.clone().unwrap_or_default();
            wizard.draft.authority_level = args.authority_level;
            wizard.draft.status = args.status;
            wizard.next()?;

            wizard.draft.password = args.password.clone();
            wizard.draft.confirm_password = args.password.clone();
            wizard.draft.require_2fa = args.require_2fa;
            wizard.draft.require_password_change = !args.no_password_change;
            wizard.next()?;

            wizard.set_user_type(args.user_type, PrivilegeReset::Overwrite);
            for privilege in &args.grant {
                wizard.set_privilege(*privilege, true);
            }
            for privilege in &args.revoke {
                wizard.set_privilege(*privilege, false);
            }
            wizard.next()?;

            let request = wizard.submit()?;
            if args.check {
                let (username, email) = tokio::try_join!(
                    service.validate_field("username", &request.username),
                    service.validate_field("email", &args.email),
                )?;
                let errors: Vec<FieldError> = [("username", username), ("email", email)]
                    .into_iter()
                    .filter(|(_, answer)| !answer.is_valid)
                    .map(|(field, answer)| {
                        FieldError::new(field, answer.message.unwrap_or_else(|| "Already in use".to_string()))
                    })
                    .collect();
                if !errors.is_empty() {
                    return Err(Error::Validation { errors });
                }
            }

            let created = service.create(&request).await?;
            info!(username = %created.username, "User created");
            ctx.out.emit(&created, print_user)
        }
        UserCommand::Delete { id } => {
            let deleted = service.delete(id).await?;
            ctx.out.emit(&deleted, |u| {
                println!("Deactivated {} ({})", u.username, u.status.as_str())
            })
        }
        UserCommand::Search { query } => {
            let search = DebouncedSearch::new(Arc::new(ctx.client.clone()), ctx.config.search.clone());
            let mut rx = search.subscribe();
            search.on_input(&query);
            let state = rx
                .wait_for(SearchState::is_settled)
                .await
                .map_err(|e| Error::Internal {
                    operation: format!("wait for search results: {e}"),
                })?
                .clone();
            search.shutdown();

            match state {
                SearchState::Idle => Err(Error::Validation {
                    errors: vec![FieldError::new(
                        "query",
                        format!("Type at least {} characters", ctx.config.search.min_query_length),
                    )],
                }),
                SearchState::Failed { error, .. } => Err(Arc::try_unwrap(error).unwrap_or_else(|shared| {
                    Error::BadRequest {
                        message: shared.user_message(),
                    }
                })),
                SearchState::Results { users, .. } => ctx.out.emit(&users, |users| {
                    for u in users {
                        println!(
                            "{:<12} {:<30} {}",
                            u.username,
                            u.personal_details.display_name().unwrap_or_else(|| "-".to_string()),
                            or_dash(u.personal_details.email.as_deref())
                        );
                    }
                }),
                SearchState::Pending { .. } => Ok(()),
            }
        }
        UserCommand::Validate { field, value } => {
            let local = match field.as_str() {
                "username" => validation::username(&value),
                "email" => validation::email(&value),
                "phone_number" | "phone" => validation::sa_phone(&value, true),
                "id_number" => validation::rsa_id_number(&value),
                _ => Ok(()),
            };
            if let Err(message) = local {
                return Err(Error::Validation {
                    errors: vec![FieldError::new(field, message)],
                });
            }
            let answer = service.validate_field(&field, &value).await?;
            ctx.out.emit(&answer, |a| {
                if a.is_valid {
                    println!("{field}: ok");
                } else {
                    println!("{field}: {}", a.message.as_deref().unwrap_or("rejected"));
                }
            })
        }
        UserCommand::Stats => {
            let users = service.list(&UserFilter::all(limit)).await?;
            let stats = UserStats::compute(&users);
            ctx.out.emit(&stats, |s| {
                println!("Total: {}", s.total);
                for (status, count) in &s.by_status {
                    println!("  {:<20} {count}", status.as_str());
                }
                for (kind, count) in &s.by_type {
                    println!("  {:<20} {count}", kind.as_str());
                }
            })
        }
    }
}

fn print_user(u: &UserResponse) {
    let d = &u.personal_details;
    println!("ID:         {}", u.id);
    println!("Username:   {}", u.username);
    println!("Name:       {}", d.display_name().unwrap_or_else(|| "-".to_string()));
    println!("Email:      {}", or_dash(d.email.as_deref()));
    println!("Phone:      {}", or_dash(d.phone_number.as_deref()));
    println!("Type:       {}", u.user_type.as_str());
    println!("Status:     {}", u.status.as_str());
    let privileges: Vec<String> = u
        .privileges
        .iter()
        .filter_map(|p| serde_json::to_value(p).ok())
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect();
    println!("Privileges: {}", privileges.join(", "));
}

#[cfg(test)]
mod tests {
    use crate::cli::{Cli, run};
    use crate::config::Config;
    use crate::errors::Error;
    use crate::test_utils::{test_api_config, user_group_json, user_json};
    use clap::Parser;
    use serde_json::json;
    use uuid::Uuid;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn parse(argv: &[&str]) -> crate::cli::Command {
        Cli::try_parse_from(std::iter::once("lincctl").chain(argv.iter().copied()))
            .unwrap()
            .command
            .unwrap()
    }

    #[test_log::test(tokio::test)]
    async fn test_create_runs_wizard_and_posts() {
        let server = MockServer::start().await;
        let group_id = Uuid::new_v4();
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/user-groups/{group_id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_group_json(group_id, "GP02", "GP")))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/users/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [user_json(Uuid::new_v4(), "GP02001", "Existing User")],
                "total": 1,
                "page": 1,
                "size": 1000
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/users/"))
            .and(body_partial_json(json!({
                "username": "GP02002",
                "user_type": "EXAMINER",
                "privileges": ["assign_staff", "conduct_tests", "view_reports"]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(user_json(Uuid::new_v4(), "GP02002", "Jane Doe")))
            .expect(1)
            .mount(&server)
            .await;

        let config = Config {
            api: test_api_config(&server),
            ..Default::default()
        };
        let group_arg = group_id.to_string();
        let cmd = parse(&[
            "users",
            "create",
            "--user-group",
            group_arg.as_str(),
            "--first-name",
            "Jane",
            "--last-name",
            "Doe",
            "--email",
            "jane@example.gov.za",
            "--id-number",
            "8001015009087",
            "--user-type",
            "examiner",
            "--password",
            "Secret123",
            "--grant",
            "assign-staff",
        ]);
        run(cmd, &config, true).await.unwrap();
    }

    #[test_log::test(tokio::test)]
    async fn test_create_stops_at_invalid_step() {
        let server = MockServer::start().await;
        let group_id = Uuid::new_v4();
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/user-groups/{group_id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_group_json(group_id, "GP02", "GP")))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/users/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [], "total": 0})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let config = Config {
            api: test_api_config(&server),
            ..Default::default()
        };
        let group_arg = group_id.to_string();
        let cmd = parse(&[
            "users",
            "create",
            "--user-group",
            group_arg.as_str(),
            "--first-name",
            "Jane",
            "--last-name",
            "Doe",
            "--email",
            "jane@example.gov.za",
            "--id-number",
            "1234567890123",
            "--password",
            "Secret123",
        ]);
        let err = run(cmd, &config, true).await.unwrap_err();
        match err {
            Error::Validation { errors } => assert_eq!(errors[0].field, "id_number"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_search_goes_through_debounce() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/users/search"))
            .and(query_param("q", "jane"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([user_json(Uuid::new_v4(), "WC01001", "Jane Doe")])))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = Config {
            api: test_api_config(&server),
            ..Default::default()
        };
        config.search.debounce = std::time::Duration::from_millis(10);
        run(parse(&["users", "search", "jane"]), &config, true).await.unwrap();
    }

    #[test_log::test(tokio::test)]
    async fn test_short_search_is_rejected_locally() {
        let server = MockServer::start().await;
        let config = Config {
            api: test_api_config(&server),
            ..Default::default()
        };
        let err = run(parse(&["users", "search", "j"]), &config, true).await.unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test_log::test(tokio::test)]
    async fn test_failed_search_keeps_server_detail() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/users/search"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({"detail": "Examiners may not search users"})))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = Config {
            api: test_api_config(&server),
            ..Default::default()
        };
        config.search.debounce = std::time::Duration::from_millis(10);
        let err = run(parse(&["users", "search", "jane"]), &config, true).await.unwrap_err();
        assert!(matches!(err, Error::Forbidden { .. }));
        assert!(err.user_message().contains("Examiners may not search users"));
    }

    #[test_log::test(tokio::test)]
    async fn test_validate_rejects_bad_phone_before_calling_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let config = Config {
            api: test_api_config(&server),
            ..Default::default()
        };
        let err = run(parse(&["users", "validate", "phone_number", "12345"]), &config, true)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }
}
