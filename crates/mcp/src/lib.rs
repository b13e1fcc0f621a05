// MCP (Model Context Protocol) server for Odoo project management
// Exposes projects, tasks, tags, users, milestones and generic records to agent clients

pub mod config;
pub mod doctor;
pub mod error;
pub mod protocol;
pub mod server;
pub mod tools;

pub use config::{Cli, Command, ConfigError, ConnectionArgs, LogFormat, ServerConfig};
pub use error::{ToolError, ToolResult};
pub use server::McpServer;
pub use tools::{odoo_tools, ToolPolicy, ToolRegistry};
