pub mod enums;
pub mod error;
pub mod lenient;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{SharpeBasis, TradeStatus};
pub use error::CoreError;
pub use structs::{NO_STRATEGY_LABEL, Trade, UNKNOWN_INSTRUMENT_LABEL};
