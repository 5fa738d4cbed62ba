use std::sync::Arc;

use chrono::{DateTime, Utc};
use medguide_ai::InferencePipeline;
use medguide_chat::ChatClient;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<InferencePipeline>,
    /// `None` when no chat provider is configured.
    pub chat: Option<Arc<ChatClient>>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(pipeline: InferencePipeline, chat: Option<ChatClient>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            chat: chat.map(Arc::new),
            started_at: Utc::now(),
        }
    }
}
