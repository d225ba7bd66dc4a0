pub mod chat_tool;
pub mod filesystem_tool;
