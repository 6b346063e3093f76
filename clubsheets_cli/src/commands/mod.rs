//! CLI subcommand implementations.

pub mod account;
pub mod accounts;
pub mod check;
pub mod lookup;
pub mod members;
pub mod overdue;
pub mod signins;
