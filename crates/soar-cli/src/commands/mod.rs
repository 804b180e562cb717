//! Command handlers grouped by resource.

pub(crate) mod account;
pub(crate) mod config;
pub(crate) mod databases;
pub(crate) mod files;
pub(crate) mod servers;
pub(crate) mod users;
