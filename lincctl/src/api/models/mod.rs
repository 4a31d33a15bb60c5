//! API request and response data models.
//!
//! These mirror the backend schemas. The server is authoritative: nothing here enforces
//! invariants beyond what serde needs to read and write the JSON.
//!
//! # Model Categories
//!
//! - [`user_groups`]: Regional authorities (owners of locations)
//! - [`locations`]: Testing centres, offices and their resources
//! - [`staff_assignments`]: User-to-location links with capability flags
//! - [`users`]: Accounts, personal details, privileges
//! - [`pagination`]: `skip`/`limit` and `page`/`size` query parameters and paged responses
//! - [`common`]: Small shared records (validation responses)
//!
//! Request types follow the `<Entity>Create` / `<Entity>Update` / `<Entity>Response` naming.

pub mod common;
pub mod locations;
pub mod pagination;
pub mod staff_assignments;
pub mod user_groups;
pub mod users;
