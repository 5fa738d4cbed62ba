//! Endpoint handlers, one module per route group.

pub mod chat;
pub mod health;
pub mod predict;
pub mod symptoms;
