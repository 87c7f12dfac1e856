pub mod economics;
pub mod extract;
pub mod language;
pub mod market;
pub mod profile;
pub mod soil;
pub mod subsidy;
pub mod text;

// Keep the public surface small and intentional.
pub use extract::*;
pub use language::*;
pub use profile::*;
pub use text::*;
