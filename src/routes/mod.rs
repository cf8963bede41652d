//! Router Module Index
//!
//! Splits the routing table by access level. Authentication is applied as a layer
//! on the authenticated router, so a route cannot be exposed by accident.

/// Routes accessible without a session: health, login, registration and the
/// unit table.
pub mod public;

/// Routes protected by the `AuthUser` middleware. Requires a live session.
pub mod authenticated;
