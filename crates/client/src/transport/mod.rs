//! Transport layer for the Odoo client.

pub mod http;
pub mod xmlrpc;

pub use http::{Endpoint, HttpTransport};
