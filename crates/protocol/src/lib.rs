//! Wire types for the mobile automation JSON wire protocol.
//!
//! This crate contains the serde-serializable types exchanged with a remote
//! automation server: locators, element references, status codes, the
//! response envelope, desired capabilities and the typed command set.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! - **Pure data**: No I/O, no async, no error type of their own
//! - **1:1 with the wire**: Field names and strings match what servers send
//! - **Stable**: Changes only when the wire protocol changes
//!
//! The ergonomic client API is built on top of these types in `appdrive`.

pub mod capabilities;
pub mod command;
pub mod locator;
pub mod types;

pub use capabilities::*;
pub use command::*;
pub use locator::*;
pub use types::*;
