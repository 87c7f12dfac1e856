pub mod fs;
pub mod openrouter;
pub mod profile_store;
pub mod sarvam;
pub mod secrets;
pub mod translation_cache;
