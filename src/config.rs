use config::Config;
use serde::Deserialize;

use crate::error::Result;

const ENV_PREFIX: &str = "LOTTO";

/// Tunables for the extraction engine.
///
/// Every field has a default; `from_env` overlays `LOTTO_*` variables
/// (`LOTTO_MARKUP_FALLBACK=false`, `LOTTO_KEYWORD_GAP=60`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Run the block pass over the markup-stripped secondary source.
    pub markup_fallback: bool,
    /// Max separator chars between a tier keyword and its first number.
    pub keyword_gap: usize,
    /// Max separator chars between two numbers of the same tier.
    pub token_gap: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            markup_fallback: true,
            keyword_gap: 40,
            token_gap: 3,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self> {
        let settings = Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}
