//! REST API access: the HTTP client wrapper and the wire models.
//!
//! - **[`client`]**: generic `get`/`post`/`put`/`delete` helpers with bearer-token injection
//! - **[`models`]**: request/response data structures mirrored from the LINC backend schemas
//!
//! # API Structure
//!
//! All endpoints live under a versioned prefix (default `/api/v1`):
//!
//! - **User groups** (`/user-groups/*`): regional authorities, code validation
//! - **Locations** (`/locations/*`): testing centres and their resources
//! - **Staff assignments** (`/locations/{id}/staff/*`, `/users/{id}/locations`)
//! - **Users** (`/users/*`): accounts, search, field validation

pub mod client;
pub mod models;

pub use client::ApiClient;
