//! # Odoo client
//!
//! Async client for the Odoo XML-RPC API, focused on project management.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use odoo_client::{NewTask, OdooClient, OdooResult};
//!
//! #[tokio::main]
//! async fn main() -> OdooResult<()> {
//!     let client = OdooClient::builder()
//!         .base_url("https://acme.odoo.com")
//!         .database("acme")
//!         .username("bot@acme.com")
//!         .api_key("0123456789abcdef")
//!         .build()?;
//!
//!     // Logs in on first use
//!     let projects = client.projects().list(true).await?;
//!     println!("Found {} projects", projects.len());
//!
//!     let epic = client.tasks().create(&NewTask::new(1, "Checkout v2")).await?;
//!     let mut subtask = NewTask::new(1, "Payment form");
//!     subtask.parent_id = Some(epic);
//!     client.tasks().create(&subtask).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;

pub use api::{
    NewMilestone, NewProject, NewTask, ProjectUpdate, SearchOptions, TaskFilter, TaskUpdate,
};
pub use client::{OdooClient, OdooClientBuilder};
pub use config::ClientConfig;
pub use error::{OdooError, OdooResult};
