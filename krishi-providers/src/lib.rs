pub mod chat;
pub mod openrouter;
pub mod parse;
pub mod request;
pub mod runtime;
pub mod sarvam;
