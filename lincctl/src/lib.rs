//! # lincctl: administrative console for the LINC testing-centre API
//!
//! `lincctl` is the operator-facing client for the LINC driving-licence testing-centre
//! management backend. Administrators use it to maintain the four resources the backend exposes:
//!
//! - **User groups**: regional authorities such as DLTCs, printing centres and help desks,
//!   identified by a short code (`WC01`).
//! - **Locations**: physical testing centres and offices that belong to a user group
//!   (`WC01L001`).
//! - **Staff assignments**: which users work at which location, and with what capabilities.
//! - **Users**: console and examiner accounts, created through a five-step wizard.
//!
//! ## Architecture
//!
//! The crate is layered bottom-up:
//!
//! - [`api`] holds the HTTP client ([`api::ApiClient`]) and the request/response models. The
//!   client attaches the bearer token and maps HTTP failures onto [`errors::Error`].
//! - [`services`] wraps each resource's endpoints behind the [`services::CrudService`] trait plus
//!   a few resource-specific calls (code validation, user search, location resources).
//! - [`console`] is the part a front end would sit on: code and name generation, field
//!   validation, the contact picker, the create/edit forms, the user wizard, the debounced user
//!   search and client-side filtering with pagination and summary statistics. Nothing here
//!   prints; everything returns values or [`errors::Error`].
//! - [`cli`] is the command-line front end built with clap on top of the other layers.
//!
//! ## Configuration
//!
//! Settings come from a YAML file (default `lincctl.yaml`) with environment overrides prefixed
//! `LINCCTL_`, using `__` for nesting:
//!
//! ```bash
//! LINCCTL_API__BASE_URL=https://linc.example.gov.za
//! LINCCTL_API__TOKEN=...
//! LINCCTL_SEARCH__DEBOUNCE=300ms
//! ```
//!
//! See [`config::Config`] for every key and its default.
//!
//! ## Example
//!
//! ```no_run
//! use lincctl::api::ApiClient;
//! use lincctl::api::models::user_groups::UserGroupType;
//! use lincctl::config::Config;
//! use lincctl::console::forms::UserGroupForm;
//! use lincctl::services::{CrudService, UserGroupFilter, UserGroups};
//!
//! # async fn example(config: Config) -> lincctl::errors::Result<()> {
//! let client = ApiClient::new(&config.api)?;
//! let service = UserGroups::new(&client);
//!
//! let existing = service.list(&UserGroupFilter::all(1000)).await?;
//! let mut form = UserGroupForm::create(UserGroupType::FixedDltc, &existing);
//! form.set_province("WC")?;
//! form.set_name_suffix("Main Branch")?;
//!
//! let created = service.create(&form.to_create()?).await?;
//! println!("{} {}", created.user_group_code, created.user_group_name);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod console;
pub mod errors;
pub mod services;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub mod test_utils;

pub use config::Config;
pub use types::{AssignmentId, LocationId, UserGroupId, UserId};
