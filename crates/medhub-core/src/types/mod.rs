//! Core type definitions used across the MedHub workspace.

pub mod id;

pub use id::*;
