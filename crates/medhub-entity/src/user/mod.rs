//! Platform user roles.

pub mod role;

pub use role::Role;
