pub mod chat_commands;
pub mod dialog_commands;
pub mod filesystem_commands;
pub mod terminal_commands;
