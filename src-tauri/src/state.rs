use ai_notebook::terminal::{EventSink, SessionManager};
use ai_notebook::tools::chat_tool::ChatStore;
use ai_notebook::Config;
use std::sync::Arc;

pub struct AppState {
    pub config: Arc<Config>,
    pub shell: Arc<SessionManager>,
    pub chats: ChatStore,
}

impl AppState {
    pub fn new(config: Config, sink: Arc<dyn EventSink>) -> Self {
        let shell = Arc::new(SessionManager::new(config.shell.clone(), sink));
        let chats = ChatStore::new(config.chats_dir.clone());
        Self {
            config: Arc::new(config),
            shell,
            chats,
        }
    }
}
