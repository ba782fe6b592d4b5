//! appdrive command line front-end.
//!
//! Every command prints a [`output::CommandResult`] envelope. Server and
//! session come from global flags, their `APPDRIVE_*` environment variables,
//! or the state persisted by the previous invocation.

pub mod cli;
pub mod commands;
pub mod context;
pub mod error;
pub mod logging;
pub mod output;
pub mod state;
pub mod styles;
