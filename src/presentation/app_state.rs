// Application state for HTTP handlers
use crate::application::console::Console;
use crate::application::knowledge_service::KnowledgeService;

#[derive(Clone)]
pub struct AppState {
    pub console: Console,
    pub knowledge_service: KnowledgeService,
}
