//! Command-line surface: one subcommand group per resource.

mod locations;
mod staff;
mod user_groups;
mod users;

use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::Serialize;

use crate::api::ApiClient;
use crate::api::models::users::UserSummary;
use crate::config::{Args, Config};
use crate::console::contact::ContactFields;
use crate::console::filters::{ListFilter, Page, paginate};
use crate::errors::{Error, Result};
use crate::services::{CrudService, Users};
use crate::types::UserId;

pub use locations::LocationCommand;
pub use staff::StaffCommand;
pub use user_groups::UserGroupCommand;
pub use users::UserCommand;

/// Administrative console for the LINC testing-centre management API
#[derive(Parser, Debug)]
#[command(name = "lincctl", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub args: Args,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Regional authorities (DLTCs, printing centres, help desks)
    #[command(subcommand)]
    UserGroups(UserGroupCommand),
    /// Testing centres and offices
    #[command(subcommand)]
    Locations(LocationCommand),
    /// Staff assigned to locations
    #[command(subcommand)]
    Staff(StaffCommand),
    /// Console and examiner accounts
    #[command(subcommand)]
    Users(UserCommand),
}

/// Client-side filter and paging flags shared by list commands.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct ListArgs {
    /// Case-insensitive text search
    #[arg(long, short = 's')]
    pub search: Option<String>,
    /// Province code, e.g. WC
    #[arg(long)]
    pub province: Option<String>,
    /// Type wire value, e.g. FIXED_DLTC
    #[arg(long = "type")]
    pub kind: Option<String>,
    /// Status wire value, e.g. ACTIVE
    #[arg(long)]
    pub status: Option<String>,
    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    /// Rows per page (defaults to list.page_size)
    #[arg(long)]
    pub page_size: Option<usize>,
}

impl ListArgs {
    pub(crate) fn filter(&self) -> ListFilter {
        ListFilter {
            search: self.search.clone(),
            province_code: self.province.clone(),
            kind: self.kind.clone(),
            status: self.status.clone(),
            ..Default::default()
        }
    }

    pub(crate) fn page<T: Clone>(&self, rows: &[T], config: &Config) -> Page<T> {
        paginate(rows, self.page, self.page_size.unwrap_or(config.list.page_size))
    }
}

/// Contact flags for user groups and locations. `--contact-user` wins over the manual fields.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct ContactArgs {
    /// Fill the contact from this user's details
    #[arg(long)]
    pub contact_user: Option<UserId>,
    #[arg(long)]
    pub contact_person: Option<String>,
    #[arg(long)]
    pub contact_email: Option<String>,
    #[arg(long)]
    pub contact_phone: Option<String>,
}

impl ContactArgs {
    /// Apply to `contact`. Manual fields are only written when given.
    pub(crate) async fn apply(&self, contact: &mut ContactFields, client: &ApiClient) -> Result<()> {
        if let Some(user_id) = self.contact_user {
            let user = Users::new(client).get_by_id(user_id).await?;
            contact.select_user(&UserSummary::from(user));
            return Ok(());
        }
        if let Some(person) = &self.contact_person {
            contact.set_person(person.as_str())?;
        }
        if let Some(email) = &self.contact_email {
            contact.set_email(email.as_str())?;
        }
        if let Some(phone) = &self.contact_phone {
            contact.set_phone(phone.as_str())?;
        }
        Ok(())
    }
}

/// Writes results either as pretty JSON or as the human-readable form.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Output {
    json: bool,
}

impl Output {
    pub(crate) fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce(&T)) -> Result<()> {
        if self.json {
            let text = serde_json::to_string_pretty(value).map_err(|e| Error::Internal {
                operation: format!("serialize output: {e}"),
            })?;
            println!("{text}");
        } else {
            human(value);
        }
        Ok(())
    }
}

/// Everything a subcommand needs.
pub(crate) struct Context<'a> {
    pub client: ApiClient,
    pub config: &'a Config,
    pub out: Output,
}

pub(crate) fn print_page_footer<T>(page: &Page<T>) {
    println!(
        "Page {} of {} ({} rows){}{}",
        page.page,
        page.total_pages.max(1),
        page.total_items,
        if page.has_previous() { ", --page to go back" } else { "" },
        if page.has_next() { ", more with --page" } else { "" },
    );
}

pub(crate) fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

/// Run one parsed command against the API.
pub async fn run(command: Command, config: &Config, json: bool) -> Result<()> {
    let ctx = Context {
        client: ApiClient::new(&config.api)?,
        config,
        out: Output { json },
    };
    match command {
        Command::UserGroups(cmd) => user_groups::run(cmd, &ctx).await,
        Command::Locations(cmd) => locations::run(cmd, &ctx).await,
        Command::Staff(cmd) => staff::run(cmd, &ctx).await,
        Command::Users(cmd) => users::run(cmd, &ctx).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["lincctl", "user-groups", "list", "--json", "-f", "other.yaml", "--province", "WC"])
            .unwrap();
        assert!(cli.json);
        assert_eq!(cli.args.config, "other.yaml");
        match cli.command {
            Some(Command::UserGroups(UserGroupCommand::List { list })) => {
                assert_eq!(list.province.as_deref(), Some("WC"));
                assert_eq!(list.page, 1);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_validate_without_subcommand() {
        let cli = Cli::try_parse_from(["lincctl", "--validate"]).unwrap();
        assert!(cli.args.validate);
        assert!(cli.command.is_none());
    }
}
