pub mod conversation;
pub mod fallback;
pub mod traits;
pub mod turn;
