//! Message sending, history, and read state.

pub mod service;

pub use service::MessageService;
