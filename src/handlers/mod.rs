//! HTTP handlers, grouped by resource. Each handler is documented for the
//! OpenAPI document assembled in `lib.rs`.

pub mod auth;
pub mod boards;
pub mod check_ins;
pub mod system;
pub mod users;
