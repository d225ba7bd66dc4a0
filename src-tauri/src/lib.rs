mod commands;
mod error;
mod sink;
mod state;

use ai_notebook::logging::setup_logging;
use ai_notebook::Config;
use sink::TauriEventSink;
use state::AppState;
use std::sync::Arc;
use tauri::Manager;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let config = Config::load().expect("Failed to load configuration at startup");
    if let Err(e) = setup_logging(&config.log_level, config.log_format) {
        eprintln!("Failed to initialize logging: {:?}", e);
    }

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .setup(move |app| {
            let sink = Arc::new(TauriEventSink::new(app.handle().clone()));
            let state = AppState::new(config, sink);
            let shell = state.shell.clone();
            app.manage(state);

            // The shell starts with the window; its output arrives as events.
            tauri::async_runtime::spawn(async move {
                shell.initiate();
            });
            tracing::info!(version = %env!("CARGO_PKG_VERSION"), "AI Notebook desktop backend setup complete.");
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Filesystem Commands
            commands::filesystem_commands::read_file,
            commands::filesystem_commands::write_file,
            commands::filesystem_commands::check_file_exists,
            commands::filesystem_commands::list_files,
            // Chat Commands
            commands::chat_commands::get_chat_session_path,
            commands::chat_commands::load_chat_sessions,
            commands::chat_commands::save_chat_session,
            commands::chat_commands::delete_chat_session,
            // Dialog Commands
            commands::dialog_commands::select_directory,
            commands::dialog_commands::show_confirmation_dialog,
            // Terminal Commands
            commands::terminal_commands::write_to_shell,
            commands::terminal_commands::shell_state,
            commands::terminal_commands::terminal_command
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
