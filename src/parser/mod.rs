pub mod assemble;
pub mod blocks;
pub mod date;
pub mod sections;
pub mod text;
pub mod tiers;

use std::sync::LazyLock;

use rayon::prelude::*;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::{ExtractError, Result};
use crate::record::{Envelope, FieldSource, ParsedDraw, TierReport};
use blocks::BlockPattern;
use date::DrawDate;
use tiers::OUTPUT_ORDER;

static DEFAULT_ENGINE: LazyLock<Engine> =
    LazyLock::new(|| Engine::new(EngineConfig::default()).unwrap());

/// One page to extract. `primary_text` is the rendered article text;
/// `secondary_markup` is the raw page markup used as a last resort.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DrawInput {
    pub primary_text: String,
    pub secondary_markup: Option<String>,
    pub raw_date_hint: Option<String>,
    pub source_url: String,
}

impl DrawInput {
    pub fn new(primary_text: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            primary_text: primary_text.into(),
            source_url: source_url.into(),
            ..Self::default()
        }
    }

    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.secondary_markup = Some(markup.into());
        self
    }

    pub fn with_date_hint(mut self, hint: impl Into<String>) -> Self {
        self.raw_date_hint = Some(hint.into());
        self
    }
}

/// Engine output: the record, its date key and where each tier came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub draw: ParsedDraw,
    pub date: DrawDate,
    pub report: Vec<TierReport>,
}

impl Extraction {
    /// `YYYYMMDD`, or `00000000` when the date is unknown.
    pub fn iso_key(&self) -> &str {
        &self.date.iso
    }

    pub fn envelope(&self) -> Envelope {
        Envelope::success(self.draw.clone())
    }

    pub fn missing(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.report
            .iter()
            .filter(|r| r.source == FieldSource::Missing)
            .map(|r| r.id)
    }
}

/// Sections → block patterns over the primary text → block patterns over
/// the markup-stripped secondary text. Earlier passes always win.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    patterns: Vec<BlockPattern>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        let patterns = blocks::compile_all(&config)?;
        Ok(Self { config, patterns })
    }

    pub fn extract(&self, input: &DrawInput) -> Result<Extraction> {
        if input.source_url.trim().is_empty() {
            return Err(ExtractError::MissingSourceUrl);
        }

        let primary = text::normalize(&input.primary_text);
        let secondary = input
            .secondary_markup
            .as_deref()
            .map(text::strip_markup)
            .filter(|s| !s.is_empty());
        if primary.is_empty() && secondary.is_none() {
            return Err(ExtractError::NoSource);
        }

        let primary_flat = text::flatten(&primary);
        let seed_date = input
            .raw_date_hint
            .as_deref()
            .and_then(date::date_from_hint)
            .or_else(|| date::find_draw_date(&primary_flat));

        let mut state = sections::parse_sections(&primary, seed_date);
        let mut sources = [FieldSource::Missing; 5];
        for kind in OUTPUT_ORDER {
            if !state.accumulators.get(kind).is_empty() {
                sources[kind.index()] = FieldSource::Sections;
            }
        }

        for kind in blocks::fill_empty(&self.patterns, &primary_flat, &mut state.accumulators) {
            sources[kind.index()] = FieldSource::PrimaryBlock;
        }

        let mut date_text = state.date.take();
        if let Some(secondary) = secondary.as_deref() {
            let secondary_flat = text::flatten(secondary);
            if self.config.markup_fallback && sources.contains(&FieldSource::Missing) {
                for kind in
                    blocks::fill_empty(&self.patterns, &secondary_flat, &mut state.accumulators)
                {
                    sources[kind.index()] = FieldSource::SecondaryBlock;
                }
            }
            if date_text.is_none() {
                date_text = date::find_draw_date(&secondary_flat);
            }
        }

        let date = DrawDate::resolve(date_text.as_deref());
        let report: Vec<TierReport> = OUTPUT_ORDER
            .into_iter()
            .map(|kind| TierReport {
                id: kind.spec().id,
                source: sources[kind.index()],
                found: state.accumulators.get(kind).tokens().len(),
            })
            .collect();
        debug!(?report, "tier sources");

        let draw = assemble::assemble(&date, &input.source_url, state.accumulators);
        let extraction = Extraction { draw, date, report };

        let missing: Vec<&str> = extraction.missing().collect();
        if !missing.is_empty() {
            warn!(url = %input.source_url, ?missing, "tiers empty after every pass");
        }
        info!(
            url = %input.source_url,
            date = %extraction.date.thai,
            iso = %extraction.date.iso,
            missing = missing.len(),
            "extracted draw"
        );
        Ok(extraction)
    }

    /// Independent extractions in parallel; results keep input order.
    pub fn extract_many(&self, inputs: &[DrawInput]) -> Vec<Result<Extraction>> {
        inputs.par_iter().map(|input| self.extract(input)).collect()
    }
}

/// Extract with the default configuration.
pub fn extract_draw(input: &DrawInput) -> Result<Extraction> {
    DEFAULT_ENGINE.extract(input)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://news.sanook.com/lotto/check/16032568/";

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
    }

    #[test]
    fn end_to_end_minimal() {
        let text = "งวดวันที่ 16 มีนาคม 2568\nรางวัลที่ 1\n123456\nเลขท้าย 2 ตัว\n78";
        let ex = extract_draw(&DrawInput::new(text, URL)).unwrap();
        assert_eq!(ex.draw.numbers("prizeFirst"), ["123456"]);
        assert_eq!(ex.draw.numbers("runningNumberBackTwo"), ["78"]);
        assert_eq!(ex.draw.date, "16 มีนาคม 2568");
        assert_eq!(ex.iso_key(), "20250316");
        assert_eq!(ex.draw.source_url, URL);
    }

    #[test]
    fn rendered_page_fixture() {
        let ex = extract_draw(&DrawInput::new(fixture("sanook_rendered.txt"), URL)).unwrap();
        assert_eq!(ex.iso_key(), "20250316");
        assert_eq!(ex.draw.numbers("prizeFirst"), ["757563"]);
        assert_eq!(ex.draw.numbers("prizeFirstNear"), ["757562", "757564"]);
        assert_eq!(ex.draw.numbers("runningNumberFrontThree"), ["595", "927"]);
        assert_eq!(ex.draw.numbers("runningNumberBackThree"), ["457", "309"]);
        assert_eq!(ex.draw.numbers("runningNumberBackTwo"), ["32"]);
        assert!(ex.report.iter().all(|r| r.source == FieldSource::Sections));
        assert_eq!(ex.missing().count(), 0);
    }

    #[test]
    fn drifted_layout_uses_both_fallbacks() {
        let input = DrawInput::new(fixture("sanook_drift.txt"), URL)
            .with_markup(fixture("sanook_markup.html"));
        let ex = extract_draw(&input).unwrap();

        assert_eq!(ex.draw.date, "1 เมษายน 2568");
        assert_eq!(ex.iso_key(), "20250401");
        // Header and numbers share one line: block pattern over primary text.
        assert_eq!(ex.draw.numbers("prizeFirst"), ["669687"]);
        assert_eq!(ex.draw.numbers("prizeFirstNear"), ["669686", "669688"]);
        // Sections found these; the markup disagrees and must be ignored.
        assert_eq!(ex.draw.numbers("runningNumberFrontThree"), ["868", "177"]);
        // Only in the markup.
        assert_eq!(ex.draw.numbers("runningNumberBackThree"), ["065", "804"]);
        assert_eq!(ex.draw.numbers("runningNumberBackTwo"), ["03"]);

        let sources: Vec<FieldSource> = ex.report.iter().map(|r| r.source).collect();
        assert_eq!(
            sources,
            vec![
                FieldSource::PrimaryBlock,
                FieldSource::PrimaryBlock,
                FieldSource::Sections,
                FieldSource::SecondaryBlock,
                FieldSource::SecondaryBlock,
            ]
        );
    }

    #[test]
    fn markup_fallback_can_be_disabled() {
        let engine = Engine::new(EngineConfig {
            markup_fallback: false,
            ..EngineConfig::default()
        })
        .unwrap();
        let input = DrawInput::new(fixture("sanook_drift.txt"), URL)
            .with_markup(fixture("sanook_markup.html"));
        let ex = engine.extract(&input).unwrap();
        assert!(ex.draw.numbers("runningNumberBackThree").is_empty());
        assert_eq!(
            ex.missing().collect::<Vec<_>>(),
            vec!["runningNumberBackThree", "runningNumberBackTwo"]
        );
    }

    #[test]
    fn markup_only_input() {
        let input = DrawInput::new("", URL).with_markup(fixture("sanook_markup.html"));
        let ex = extract_draw(&input).unwrap();
        assert_eq!(ex.draw.date, "1 เมษายน 2568");
        assert_eq!(ex.draw.numbers("prizeFirst"), ["999999"]);
        assert_eq!(ex.draw.numbers("runningNumberFrontThree"), ["111", "222"]);
        assert!(ex.report.iter().all(|r| r.source != FieldSource::Sections));
    }

    #[test]
    fn no_headers_still_succeeds() {
        let ex = extract_draw(&DrawInput::new("ข่าวทั่วไป\n123456 78 999", URL)).unwrap();
        assert_eq!(ex.draw.date, "(unknown)");
        assert_eq!(ex.iso_key(), "00000000");
        let amounts: Vec<usize> = ex
            .draw
            .prizes
            .iter()
            .chain(&ex.draw.running_numbers)
            .map(|p| p.amount)
            .collect();
        assert_eq!(amounts, vec![1, 2, 0, 0, 0]);
        assert!(ex
            .draw
            .prizes
            .iter()
            .chain(&ex.draw.running_numbers)
            .all(|p| p.numbers.is_empty()));
        assert_eq!(ex.missing().count(), 5);
    }

    #[test]
    fn date_hint_takes_precedence() {
        let text = "งวดวันที่ 16 มีนาคม 2568\nรางวัลที่ 1\n123456";
        let ex = extract_draw(&DrawInput::new(text, URL).with_date_hint("1 เมษายน 2568")).unwrap();
        assert_eq!(ex.draw.date, "1 เมษายน 2568");
        let ex = extract_draw(&DrawInput::new(text, URL).with_date_hint("latest")).unwrap();
        assert_eq!(ex.draw.date, "16 มีนาคม 2568");
    }

    #[test]
    fn unparsable_date_keeps_text_with_sentinel_key() {
        let ex = extract_draw(&DrawInput::new("งวดวันที่ 16 มีค 2568\nรางวัลที่ 1\n123456", URL))
            .unwrap();
        assert_eq!(ex.draw.date, "16 มีค 2568");
        assert_eq!(ex.iso_key(), "00000000");
    }

    #[test]
    fn comma_joined_near_winners_both_kept() {
        let text = "รางวัลข้างเคียงรางวัลที่ 1\n835537,835539";
        let ex = extract_draw(&DrawInput::new(text, URL)).unwrap();
        assert_eq!(ex.draw.numbers("prizeFirstNear"), ["835537", "835539"]);
    }

    #[test]
    fn idempotent_output() {
        let input = DrawInput::new(fixture("sanook_drift.txt"), URL)
            .with_markup(fixture("sanook_markup.html"));
        let a = serde_json::to_string(&extract_draw(&input).unwrap().envelope()).unwrap();
        let b = serde_json::to_string(&extract_draw(&input).unwrap().envelope()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn hard_failures() {
        assert!(matches!(
            extract_draw(&DrawInput::new("รางวัลที่ 1\n123456", "  ")),
            Err(ExtractError::MissingSourceUrl)
        ));
        assert!(matches!(
            extract_draw(&DrawInput::new(" \r\n ", URL)),
            Err(ExtractError::NoSource)
        ));
        assert!(matches!(
            extract_draw(&DrawInput::new("", URL).with_markup("<div></div>")),
            Err(ExtractError::NoSource)
        ));
    }

    #[test]
    fn batch_keeps_input_order() {
        let engine = Engine::new(EngineConfig::default()).unwrap();
        let inputs = vec![
            DrawInput::new("รางวัลที่ 1\n111111", URL),
            DrawInput::new("", URL),
            DrawInput::new("รางวัลที่ 1\n333333", URL),
        ];
        let results = engine.extract_many(&inputs);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().draw.numbers("prizeFirst"), ["111111"]);
        assert!(matches!(results[1], Err(ExtractError::NoSource)));
        assert_eq!(results[2].as_ref().unwrap().draw.numbers("prizeFirst"), ["333333"]);
    }
}
