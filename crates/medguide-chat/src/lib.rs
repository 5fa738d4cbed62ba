//! Chat layer: pass-through client for the assistant's chat-completion provider.

pub mod http;

pub use http::{ChatClient, ChatError, DEFAULT_BASE_URL, DEFAULT_MODEL};
