pub mod connection;
pub mod milestones;
pub mod projects;
pub mod records;
mod registry;
pub mod tags;
pub mod tasks;
pub mod users;

pub use connection::TestConnectionTool;
pub use milestones::{CreateMilestoneTool, ListMilestonesTool};
pub use projects::{CreateProjectTool, GetProjectStagesTool, ListProjectsTool, UpdateProjectTool};
pub use records::{
    CreateRecordTool, DeleteRecordTool, ModelAllowList, SearchRecordsTool, UpdateRecordTool,
};
pub use registry::{
    json_schema_array, json_schema_boolean, json_schema_integer, json_schema_number,
    json_schema_object, json_schema_string, parse_arguments, require_text, Tool, ToolRegistry,
    ToolTier,
};
pub use tags::ListTagsTool;
pub use tasks::{
    CreateTaskTool, CreateTasksBatchTool, ListTasksTool, PostTaskMessageTool, UpdateTaskTool,
};
pub use users::SearchUsersTool;

use odoo_client::OdooClient;
use std::sync::Arc;

/// Which tools get exposed, and what the generic record tools may touch.
#[derive(Debug, Clone, Default)]
pub struct ToolPolicy {
    pub allowed_models: ModelAllowList,
    /// Register only read-tier tools
    pub read_only: bool,
}

/// Build the registry of Odoo tools under the given policy.
pub fn odoo_tools(client: Arc<OdooClient>, policy: &ToolPolicy) -> ToolRegistry {
    let allowed = policy.allowed_models.clone();
    let tools: Vec<Arc<dyn Tool>> = vec![
        // Connection
        Arc::new(TestConnectionTool::new(client.clone())),
        // Projects
        Arc::new(ListProjectsTool::new(client.clone())),
        Arc::new(CreateProjectTool::new(client.clone())),
        Arc::new(UpdateProjectTool::new(client.clone())),
        Arc::new(GetProjectStagesTool::new(client.clone())),
        // Tasks
        Arc::new(CreateTaskTool::new(client.clone())),
        Arc::new(CreateTasksBatchTool::new(client.clone())),
        Arc::new(ListTasksTool::new(client.clone())),
        Arc::new(UpdateTaskTool::new(client.clone())),
        Arc::new(PostTaskMessageTool::new(client.clone())),
        // Lookups
        Arc::new(SearchUsersTool::new(client.clone())),
        Arc::new(ListTagsTool::new(client.clone())),
        // Milestones
        Arc::new(CreateMilestoneTool::new(client.clone())),
        Arc::new(ListMilestonesTool::new(client.clone())),
        // Generic records
        Arc::new(SearchRecordsTool::new(client.clone(), allowed.clone())),
        Arc::new(CreateRecordTool::new(client.clone(), allowed.clone())),
        Arc::new(UpdateRecordTool::new(client.clone(), allowed.clone())),
        Arc::new(DeleteRecordTool::new(client, allowed)),
    ];

    let mut registry = ToolRegistry::new();
    for tool in tools {
        if policy.read_only && tool.tier() != ToolTier::Read {
            continue;
        }
        registry.register(tool);
    }
    registry
}
