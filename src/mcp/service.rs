//! MCP service implementation using rmcp.
//!
//! This module defines the MetadataService struct with the metadata tools
//! exposed via the rmcp tool macros, plus the migration prompts served
//! through the prompt handlers.

use crate::db::ConnectionResolver;
use crate::models::TableDetails;
use crate::prompts::MigrationPrompt;
use crate::tools::connections::{ConnectionsToolHandler, DatabasesAvailableOutput};
use crate::tools::table_details::{GetTableDetailsInput, TableDetailsToolHandler};
use rmcp::Json;
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{
        GetPromptRequestParam, GetPromptResult, Implementation, JsonObject, ListPromptsResult,
        PaginatedRequestParam, PromptMessage, PromptMessageRole, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct MetadataService {
    /// Configured connections, shared by every session
    resolver: Arc<ConnectionResolver>,
    /// Tool router for MCP tool dispatch (auto-generated)
    tool_router: ToolRouter<Self>,
}

impl MetadataService {
    pub fn new(resolver: Arc<ConnectionResolver>) -> Self {
        Self {
            resolver,
            tool_router: Self::tool_router(),
        }
    }

    /// Reject empty or whitespace-only arguments before any lookup.
    fn require_non_empty(field: &str, provided: &str) -> Result<String, McpError> {
        let trimmed = provided.trim();
        if trimmed.is_empty() {
            Err(McpError::invalid_params(
                format!(
                    "{field} is required. Call get_databases_available first to get connection names."
                ),
                None,
            ))
        } else {
            Ok(trimmed.to_string())
        }
    }

    fn prompt_list() -> ListPromptsResult {
        ListPromptsResult::with_all_items(
            MigrationPrompt::all()
                .iter()
                .map(MigrationPrompt::to_prompt)
                .collect(),
        )
    }

    fn render_prompt(
        name: &str,
        arguments: Option<&JsonObject>,
    ) -> Result<GetPromptResult, McpError> {
        let prompt = MigrationPrompt::find(name).ok_or_else(|| {
            McpError::invalid_params(format!("Unknown prompt: '{name}'"), None)
        })?;
        let text = prompt.render(arguments)?;
        debug!(prompt = %name, length = text.len(), "Rendered prompt");

        Ok(GetPromptResult {
            description: Some(prompt.description.to_string()),
            messages: vec![PromptMessage::new_text(PromptMessageRole::User, text)],
        })
    }
}

#[tool_router]
impl MetadataService {
    #[tool(
        description = "List the names of the configured database connections.\nUse a returned name as `connectionName` in get_table_details."
    )]
    async fn get_databases_available(&self) -> Json<DatabasesAvailableOutput> {
        let handler = ConnectionsToolHandler::new(self.resolver.clone());
        Json(handler.list())
    }

    #[tool(
        description = "Get the structure of a table: columns (type, nullability, default, primary key flag), primary key, foreign keys, indexes and triggers.\nMySQL and PostgreSQL return full details; other databases return columns only.\nCall this before writing any ALTER TABLE migration."
    )]
    async fn get_table_details(
        &self,
        Parameters(input): Parameters<GetTableDetailsInput>,
    ) -> Result<Json<TableDetails>, McpError> {
        let input = GetTableDetailsInput {
            connection_name: Self::require_non_empty("connectionName", &input.connection_name)?,
            table_name: Self::require_non_empty("tableName", &input.table_name)?,
        };
        let handler = TableDetailsToolHandler::new(self.resolver.clone());
        handler
            .get_table_details(input)
            .await
            .map(Json)
            .map_err(McpError::from)
    }
}

#[tool_handler]
impl ServerHandler for MetadataService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .build(),
            server_info: Implementation {
                name: "db-metadata-mcp".to_owned(),
                title: Some("Database Metadata MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Read-only database metadata for writing migrations.\n\
                \n\
                ## Workflow\n\
                1. Call `get_databases_available` to get the configured connection names\n\
                2. Call `get_table_details` with `connectionName` and `tableName`\n\
                \n\
                ## Notes\n\
                - MySQL and PostgreSQL return columns, keys, indexes and triggers\n\
                - Other databases return columns only\n\
                - Each call opens a fresh connection and closes it before returning\n\
                \n\
                ## Prompts\n\
                - `agrotrace-migration-prompt`: TypeORM migrations for agrotrace (MySQL)\n\
                - `checkmilk-migration-prompt`: TypeORM migrations for checkmilk (PostgreSQL)\n\
                Both require the `userInstructions` argument."
                    .to_string(),
            ),
        }
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        Ok(Self::prompt_list())
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        Self::render_prompt(&request.name, request.arguments.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqlxConnector;
    use crate::models::ConnectionDescriptor;
    use rmcp::model::{ErrorCode, PromptMessageContent};
    use serde_json::json;

    fn create_test_service() -> MetadataService {
        let resolver = ConnectionResolver::new(
            vec![ConnectionDescriptor::new(
                "agrotrace",
                "mysql2",
                "127.0.0.1",
                3306,
                "root",
                "",
                "agrotrace",
            )],
            SqlxConnector::default(),
        );
        MetadataService::new(Arc::new(resolver))
    }

    fn details_input(connection: &str, table: &str) -> Parameters<GetTableDetailsInput> {
        Parameters(GetTableDetailsInput {
            connection_name: connection.to_string(),
            table_name: table.to_string(),
        })
    }

    #[test]
    fn test_require_non_empty_trims_whitespace() {
        assert_eq!(
            MetadataService::require_non_empty("tableName", "  users ").unwrap(),
            "users"
        );
    }

    #[test]
    fn test_require_non_empty_rejects_whitespace_only() {
        let err = MetadataService::require_non_empty("connectionName", "   ").unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert!(err.message.contains("connectionName is required"));
    }

    #[tokio::test]
    async fn test_get_databases_available() {
        let service = create_test_service();
        let Json(output) = service.get_databases_available().await;
        assert_eq!(output.databases, vec!["agrotrace"]);
        assert_eq!(output.count, 1);
    }

    #[tokio::test]
    async fn test_get_table_details_rejects_empty_table() {
        let service = create_test_service();
        let err = service
            .get_table_details(details_input("agrotrace", ""))
            .await
            .err()
            .expect("expected error");
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_get_table_details_unknown_connection() {
        let service = create_test_service();
        let err = service
            .get_table_details(details_input("nope", "users"))
            .await
            .err()
            .expect("expected error");
        assert_eq!(err.code, ErrorCode::RESOURCE_NOT_FOUND);
        assert!(err.message.contains("nope"));
    }

    #[test]
    fn test_prompt_list() {
        let result = MetadataService::prompt_list();
        assert_eq!(result.prompts.len(), 2);
        assert_eq!(result.prompts[0].name, "agrotrace-migration-prompt");
    }

    #[test]
    fn test_render_prompt() {
        let arguments = json!({ "userInstructions": "add column apelido to usuario" });
        let result = MetadataService::render_prompt(
            "checkmilk-migration-prompt",
            arguments.as_object(),
        )
        .unwrap();
        assert_eq!(result.messages.len(), 1);
        assert!(matches!(result.messages[0].role, PromptMessageRole::User));
        let PromptMessageContent::Text { text } = &result.messages[0].content else {
            panic!("expected text content");
        };
        assert!(text.contains("add column apelido to usuario"));
    }

    #[test]
    fn test_render_prompt_unknown_name() {
        let err = MetadataService::render_prompt("missing-prompt", None).unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    }

    #[test]
    fn test_render_prompt_missing_argument() {
        let err = MetadataService::render_prompt("agrotrace-migration-prompt", None).unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    }

    #[test]
    fn test_server_info() {
        let service = create_test_service();
        let info = service.get_info();
        assert_eq!(info.server_info.name, "db-metadata-mcp");
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.prompts.is_some());
    }
}
