//! Domain services: one-to-one mappings from console actions to REST endpoints.
//!
//! Each resource has a small service struct borrowing the shared [`ApiClient`], in the same shape
//! as a repository over a table: [`UserGroups`], [`Locations`], [`Users`] implement
//! [`CrudService`]; [`StaffAssignments`] is nested under locations and has its own methods.
//!
//! Services do no business logic beyond URL and query assembly. Uniqueness checks exposed here
//! (`validate_code`, `validate_field`) call the server, which stays authoritative.
//!
//! [`ApiClient`]: crate::api::ApiClient

pub mod crud;
pub mod locations;
pub mod staff_assignments;
pub mod user_groups;
pub mod users;

pub use crud::CrudService;
pub use locations::{LocationFilter, Locations};
pub use staff_assignments::StaffAssignments;
pub use user_groups::{UserGroupFilter, UserGroups};
pub use users::{UserFilter, Users};
