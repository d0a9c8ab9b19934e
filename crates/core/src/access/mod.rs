//! Access-control gate.
//!
//! Capability checks over a user's hydrated role graph. Hydration (User ->
//! Roles -> Permissions) is an explicit repository step in the db crate;
//! this module only evaluates the already-resolved data.

pub mod gate;
pub mod types;

pub use gate::AccessGate;
pub use types::{HydratedRole, LegacyRole, Permission, UserAccess};
