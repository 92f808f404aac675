//! Extraction engine for Thai government lottery result pages.
//!
//! Page text goes through three layered passes (line state machine, keyword
//! block patterns over the same text, the same patterns over markup-stripped
//! HTML) and is assembled into the fixed-shape draw record.

pub mod config;
pub mod error;
pub mod parser;
pub mod record;

pub use config::EngineConfig;
pub use error::{ExtractError, Result};
pub use parser::date::{thai_date_to_iso, DrawDate};
pub use parser::{extract_draw, DrawInput, Engine, Extraction};
pub use record::{Envelope, FieldSource, ParsedDraw, PrizeEntry, TierReport};
