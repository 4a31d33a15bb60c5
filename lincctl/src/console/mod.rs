//! Operator-side logic that sits between the CLI and the API services: code generation, field
//! validation, forms, the user wizard, debounced search and list filtering.

pub mod codegen;
pub mod contact;
pub mod filters;
pub mod forms;
pub mod provinces;
pub mod search;
pub mod validation;
pub mod wizard;
