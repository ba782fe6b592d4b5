//! appdrive runtime - transport, connection, and host package resolution
//!
//! This crate provides the low-level plumbing between the typed client API
//! and a remote automation server:
//!
//! - **Transport**: the [`Transport`] seam and its HTTP implementation
//! - **Connection**: command dispatch, envelope unwrapping, status mapping
//! - **Package resolution**: locating installed Node packages the way
//!   `require.resolve` does, for apps distributed as npm packages
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   appdrive   │  Driver / Session / Element
//! └──────┬───────┘
//!        │ Connection::send(command)
//! ┌──────▼───────┐
//! │   runtime    │  This crate
//! │  ┌────────┐  │
//! │  │ Conn   │  │  status -> Error mapping
//! │  └────────┘  │
//! │  ┌────────┐  │
//! │  │ Trans  │  │  HTTP, or any in-process implementation
//! │  └────────┘  │
//! └──────────────┘
//! ```

pub mod connection;
pub mod error;
pub mod package;
pub mod transport;

pub use connection::Connection;
pub use error::{Error, Result};
pub use package::resolve_package_in;
pub use transport::{DEFAULT_SERVER_URL, HttpTransport, Transport};
