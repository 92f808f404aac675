use regex::Regex;
use tracing::debug;

use super::sections::Accumulators;
use super::tiers::{numeric_tokens, SectionKind, TierSpec, TIERS};
use crate::config::EngineConfig;
use crate::error::Result;

/// Compiled keyword + bounded-repetition pattern for one tier.
#[derive(Debug, Clone)]
pub struct BlockPattern {
    pub kind: SectionKind,
    re: Regex,
    exclude_prefix: Option<&'static str>,
}

/// Keyword, up to `keyword_gap` non-digits (optionally skipping a
/// "มี N รางวัล" count clause and one "<amount> บาท" reward clause), then
/// 1..=capacity tokens of exactly `width` digits separated by at most
/// `token_gap` separator chars. The last token must not run into `,ddd`.
fn pattern_source(tier: &TierSpec, keyword_gap: usize, token_gap: usize) -> String {
    let w = tier.width;
    let more = tier.capacity.saturating_sub(1);
    format!(
        r"(?:{kw})[^0-9]{{0,{kg}}}(?:มี\s*[0-9]+\s*รางวัล\S*[^0-9]{{0,{kg}}})?(?:[0-9][0-9,.]*\s*บาท[^0-9]{{0,{kg}}})?(?P<nums>[0-9]{{{w}}}(?:[\s|/;,\-]{{1,{tg}}}[0-9]{{{w}}}){{0,{more}}})(?:$|[^0-9,.]|[,.](?:[^0-9]|$))",
        kw = tier.keyword,
        kg = keyword_gap,
        tg = token_gap.max(1),
    )
}

impl BlockPattern {
    pub fn compile(tier: &TierSpec, config: &EngineConfig) -> Result<Self> {
        let src = pattern_source(tier, config.keyword_gap, config.token_gap);
        Ok(Self {
            kind: tier.kind,
            re: Regex::new(&src)?,
            exclude_prefix: tier.exclude_prefix,
        })
    }

    /// Tokens of the first qualifying match in `flat`, truncated to capacity.
    pub fn extract<'t>(&self, flat: &'t str) -> Vec<&'t str> {
        let spec = self.kind.spec();
        for caps in self.re.captures_iter(flat) {
            let Some(whole) = caps.get(0) else { continue };
            if let Some(prefix) = self.exclude_prefix {
                if flat[..whole.start()].ends_with(prefix) {
                    continue;
                }
            }
            let Some(nums) = caps.name("nums") else { continue };
            let tokens: Vec<&str> = numeric_tokens(nums.as_str(), spec.width)
                .take(spec.capacity)
                .collect();
            if !tokens.is_empty() {
                return tokens;
            }
        }
        Vec::new()
    }
}

pub fn compile_all(config: &EngineConfig) -> Result<Vec<BlockPattern>> {
    TIERS.iter().map(|t| BlockPattern::compile(t, config)).collect()
}

/// Fill every still-empty accumulator from `flat`. Populated ones are never
/// touched. Returns the tiers this pass filled.
pub fn fill_empty(
    patterns: &[BlockPattern],
    flat: &str,
    accumulators: &mut Accumulators,
) -> Vec<SectionKind> {
    let mut filled = Vec::new();
    for pattern in patterns {
        let acc = accumulators.get_mut(pattern.kind);
        if !acc.is_empty() {
            continue;
        }
        let tokens = pattern.extract(flat);
        if acc.extend(tokens) > 0 {
            debug!(kind = ?pattern.kind, tokens = ?acc.tokens(), "block pattern filled tier");
            filled.push(pattern.kind);
        }
    }
    filled
}
