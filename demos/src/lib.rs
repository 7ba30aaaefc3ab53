//! Runnable demos for the cotiza workspace.

pub mod common;
