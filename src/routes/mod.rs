//! Demo routes, grouped the same way the default rule table groups path prefixes.
//!
//! Grouping is only organisational: access is decided by the permission gate
//! layered over the whole router, not by which module a route lives in.

/// Routes under the default Public prefixes.
pub mod public;

/// Routes under the default User prefixes ("/profiles", "/data").
pub mod authenticated;

/// Routes under the default Admin prefix ("/admin").
pub mod admin;
