//! RiceLens command-line front end

pub mod commands;
pub mod console_host;
pub mod error;
pub mod output;
pub mod router;
