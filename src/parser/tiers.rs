use std::sync::LazyLock;

use regex::Regex;

/// Prize tiers the engine extracts. Also the state of the section parser
/// (`Option<SectionKind>`, `None` before the first header).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    First,
    Near,
    FrontThree,
    BackThree,
    BackTwo,
}

/// Which list of the output record a tier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    Prizes,
    RunningNumbers,
}

/// Static metadata plus the matching rules for one tier.
#[derive(Debug)]
pub struct TierSpec {
    pub kind: SectionKind,
    pub group: Group,
    pub id: &'static str,
    pub name: &'static str,
    pub reward: &'static str,
    /// Regex source for the tier keyword; used for header lines and block patterns.
    pub keyword: &'static str,
    /// A keyword match directly preceded by this text belongs to another tier.
    pub exclude_prefix: Option<&'static str>,
    pub width: usize,
    pub capacity: usize,
    /// Declared cardinality for fixed tiers; `None` means amount = numbers found.
    pub fixed_amount: Option<usize>,
}

/// Header precedence order: the near-first keyword contains the first-prize
/// keyword, so it must be tested first.
pub static TIERS: [TierSpec; 5] = [
    TierSpec {
        kind: SectionKind::Near,
        group: Group::Prizes,
        id: "prizeFirstNear",
        name: "รางวัลข้างเคียงรางวัลที่ 1",
        reward: "100000",
        keyword: r"ข้างเคียงรางวัลที่\s*(?:1(?:[^0-9]|$)|หนึ่ง)",
        exclude_prefix: None,
        width: 6,
        capacity: 2,
        fixed_amount: Some(2),
    },
    TierSpec {
        kind: SectionKind::First,
        group: Group::Prizes,
        id: "prizeFirst",
        name: "รางวัลที่ 1",
        reward: "6000000",
        keyword: r"รางวัลที่\s*(?:1(?:[^0-9]|$)|หนึ่ง)",
        exclude_prefix: Some("ข้างเคียง"),
        width: 6,
        capacity: 1,
        fixed_amount: Some(1),
    },
    TierSpec {
        kind: SectionKind::FrontThree,
        group: Group::RunningNumbers,
        id: "runningNumberFrontThree",
        name: "รางวัลเลขหน้า 3 ตัว",
        reward: "4000",
        keyword: r"เลขหน้า\s*3\s*ตัว",
        exclude_prefix: None,
        width: 3,
        capacity: 4,
        fixed_amount: None,
    },
    TierSpec {
        kind: SectionKind::BackThree,
        group: Group::RunningNumbers,
        id: "runningNumberBackThree",
        name: "รางวัลเลขท้าย 3 ตัว",
        reward: "4000",
        keyword: r"เลขท้าย\s*3\s*ตัว",
        exclude_prefix: None,
        width: 3,
        capacity: 4,
        fixed_amount: None,
    },
    TierSpec {
        kind: SectionKind::BackTwo,
        group: Group::RunningNumbers,
        id: "runningNumberBackTwo",
        name: "รางวัลเลขท้าย 2 ตัว",
        reward: "2000",
        keyword: r"เลขท้าย\s*2\s*ตัว",
        exclude_prefix: None,
        width: 2,
        capacity: 1,
        fixed_amount: None,
    },
];

/// Output order: prizes first-then-near, running numbers front/back3/back2.
pub const OUTPUT_ORDER: [SectionKind; 5] = [
    SectionKind::First,
    SectionKind::Near,
    SectionKind::FrontThree,
    SectionKind::BackThree,
    SectionKind::BackTwo,
];

impl SectionKind {
    pub fn spec(self) -> &'static TierSpec {
        match self {
            SectionKind::Near => &TIERS[0],
            SectionKind::First => &TIERS[1],
            SectionKind::FrontThree => &TIERS[2],
            SectionKind::BackThree => &TIERS[3],
            SectionKind::BackTwo => &TIERS[4],
        }
    }

    pub fn index(self) -> usize {
        match self {
            SectionKind::First => 0,
            SectionKind::Near => 1,
            SectionKind::FrontThree => 2,
            SectionKind::BackThree => 3,
            SectionKind::BackTwo => 4,
        }
    }
}

/// Digit runs joined by `,` or `.`; classified by `is_amount` before splitting.
static NUMERIC_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+(?:[,.][0-9]+)*").unwrap());

/// A thousands-grouped money figure: `1..=3` leading digits, then `,ddd`
/// groups, then an optional decimal part. Three-digit leads (`479,884`) only
/// count when `บาท` follows, since they read just as well as two numbers.
fn is_amount(run: &str, rest: &str) -> bool {
    let int_part = run.split('.').next().unwrap_or_default();
    let mut groups = int_part.split(',');
    let lead = groups.next().unwrap_or_default();
    let grouped = int_part.contains(',')
        && (1..=3).contains(&lead.len())
        && groups.all(|g| g.len() == 3);
    grouped && (lead.len() < 3 || rest.trim_start().starts_with("บาท"))
}

/// Tokens of exactly `width` ASCII digits that are not part of a longer
/// number or an amount, in order of appearance. Comma-joined lists
/// (`835537,835539`) yield each number.
pub fn numeric_tokens(text: &str, width: usize) -> impl Iterator<Item = &str> {
    NUMERIC_RUN_RE
        .find_iter(text)
        .filter(move |m| !is_amount(m.as_str(), &text[m.end()..]))
        .flat_map(|m| m.as_str().split(','))
        .filter(move |t| t.len() == width && t.bytes().all(|b| b.is_ascii_digit()))
}
