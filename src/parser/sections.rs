use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::date::find_draw_date;
use super::text::lines;
use super::tiers::{numeric_tokens, SectionKind, OUTPUT_ORDER, TIERS};

static TIER_HEADERS: LazyLock<Vec<(SectionKind, Regex)>> = LazyLock::new(|| {
    TIERS
        .iter()
        .map(|t| (t.kind, Regex::new(t.keyword).unwrap()))
        .collect()
});
static DATE_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"งวดวันที่").unwrap());
// 2nd–5th prizes are not extracted; their headers close the running section.
static OTHER_PRIZE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"รางวัลที่\s*(?:[2-5](?:[^0-9]|$)|สอง|สาม|สี่|ห้า)").unwrap());

/// Capped, ordered token list for one tier. First found wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accumulator {
    capacity: usize,
    tokens: Vec<String>,
}

impl Accumulator {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            tokens: Vec::with_capacity(capacity),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.tokens.len() >= self.capacity
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Append tokens until capacity; returns how many were taken.
    pub fn extend<'a>(&mut self, tokens: impl IntoIterator<Item = &'a str>) -> usize {
        let room = self.capacity.saturating_sub(self.tokens.len());
        let before = self.tokens.len();
        self.tokens
            .extend(tokens.into_iter().take(room).map(str::to_string));
        self.tokens.len() - before
    }

    pub fn into_tokens(self) -> Vec<String> {
        self.tokens
    }
}

/// One accumulator per tier, indexed by `SectionKind::index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accumulators([Accumulator; 5]);

impl Default for Accumulators {
    fn default() -> Self {
        Self(OUTPUT_ORDER.map(|k| Accumulator::new(k.spec().capacity)))
    }
}

impl Accumulators {
    pub fn get(&self, kind: SectionKind) -> &Accumulator {
        &self.0[kind.index()]
    }

    pub fn get_mut(&mut self, kind: SectionKind) -> &mut Accumulator {
        &mut self.0[kind.index()]
    }

    pub fn into_inner(self) -> [Accumulator; 5] {
        self.0
    }
}

/// Per-call parser state. Never shared between extractions.
#[derive(Debug, Default)]
pub struct ParseState {
    pub current: Option<SectionKind>,
    pub accumulators: Accumulators,
    pub date: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
enum LineKind {
    DrawDate,
    Header(SectionKind),
    OtherPrize,
    Data,
}

fn classify(line: &str) -> LineKind {
    if DATE_HEADER_RE.is_match(line) {
        return LineKind::DrawDate;
    }
    if let Some((kind, _)) = TIER_HEADERS.iter().find(|(_, re)| re.is_match(line)) {
        return LineKind::Header(*kind);
    }
    if OTHER_PRIZE_RE.is_match(line) {
        return LineKind::OtherPrize;
    }
    LineKind::Data
}

impl ParseState {
    /// Seed with a date already discovered elsewhere (caller hint, pre-scan).
    pub fn with_date(date: Option<String>) -> Self {
        Self {
            date,
            ..Self::default()
        }
    }

    /// Feed one normalized line through the state machine.
    pub fn feed(&mut self, line: &str) {
        match classify(line) {
            LineKind::DrawDate => {
                if self.date.is_none() {
                    self.date = find_draw_date(line);
                }
                self.current = None;
            }
            LineKind::Header(kind) => {
                if self.current != Some(kind) {
                    debug!(?kind, line, "section header");
                }
                self.current = Some(kind);
            }
            LineKind::OtherPrize => self.current = None,
            LineKind::Data => {
                let Some(kind) = self.current else { return };
                let acc = self.accumulators.get_mut(kind);
                if acc.is_full() {
                    return;
                }
                acc.extend(numeric_tokens(line, kind.spec().width));
            }
        }
    }
}

/// Single pass over the normalized primary text.
pub fn parse_sections(text: &str, date: Option<String>) -> ParseState {
    let mut state = ParseState::with_date(date);
    for line in lines(text) {
        state.feed(line);
    }
    state
}
