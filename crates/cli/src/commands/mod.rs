//! Subcommand implementations.

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod order;
pub mod pay;
pub mod profile;
