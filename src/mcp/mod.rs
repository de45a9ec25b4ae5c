// MCP transport: JSON-RPC envelope and tool dispatch
pub mod handler;
pub mod protocol;
