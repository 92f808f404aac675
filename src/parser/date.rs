use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

pub const UNKNOWN_DATE: &str = "(unknown)";
pub const UNKNOWN_ISO: &str = "00000000";

const BUDDHIST_ERA_OFFSET: i32 = 543;

pub const THAI_MONTHS: [&str; 12] = [
    "มกราคม",
    "กุมภาพันธ์",
    "มีนาคม",
    "เมษายน",
    "พฤษภาคม",
    "มิถุนายน",
    "กรกฎาคม",
    "สิงหาคม",
    "กันยายน",
    "ตุลาคม",
    "พฤศจิกายน",
    "ธันวาคม",
];

static TRIPLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^0-9])([0-9]{1,2})\s+(\S+)\s+([0-9]{4})(?:[^0-9]|$)").unwrap());

/// "งวดวันที่ 16 มีนาคม 2568" and "ประจำงวดวันที่ ..." → "16 มีนาคม 2568".
static DRAW_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"งวดวันที่\s+([0-9]{1,2}\s+\S+\s+[0-9]{4})(?:[^0-9]|$)").unwrap());

/// Draw date as printed on the page plus its sortable Gregorian key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawDate {
    pub thai: String,
    pub iso: String,
}

impl DrawDate {
    /// Sentinels stand in when no date was found or it does not convert.
    pub fn resolve(thai: Option<&str>) -> Self {
        match thai {
            Some(t) => Self {
                thai: t.to_string(),
                iso: thai_date_to_iso(t).unwrap_or_else(|| UNKNOWN_ISO.to_string()),
            },
            None => Self {
                thai: UNKNOWN_DATE.to_string(),
                iso: UNKNOWN_ISO.to_string(),
            },
        }
    }

    pub fn is_known(&self) -> bool {
        self.iso != UNKNOWN_ISO
    }

    /// Gregorian calendar day, if the key names a real one.
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        if !self.is_known() || self.iso.len() != 8 {
            return None;
        }
        let year = self.iso[..4].parse().ok()?;
        let month = self.iso[4..6].parse().ok()?;
        let day = self.iso[6..].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    }
}

/// `"<day> <Thai month> <Buddhist year>"` → `YYYYMMDD` in the Gregorian
/// calendar. Month names must match the canonical spelling exactly; days
/// outside 1..=31 and years before 544 BE do not convert.
pub fn thai_date_to_iso(s: &str) -> Option<String> {
    let caps = TRIPLE_RE.captures(s)?;
    let day: u32 = caps[1].parse().ok()?;
    if !(1..=31).contains(&day) {
        return None;
    }
    let month = THAI_MONTHS.iter().position(|m| *m == &caps[2])? + 1;
    let year_be: i32 = caps[3].parse().ok()?;
    if year_be <= BUDDHIST_ERA_OFFSET {
        return None;
    }
    Some(format!("{:04}{:02}{:02}", year_be - BUDDHIST_ERA_OFFSET, month, day))
}

/// Date triple following a `งวดวันที่` marker anywhere in `text`.
pub fn find_draw_date(text: &str) -> Option<String> {
    DRAW_DATE_RE.captures(text).map(|c| c[1].to_string())
}

/// Date triple in a caller-supplied hint: a `งวดวันที่` marker if present,
/// otherwise the first bare `D Month YYYY` triple.
pub fn date_from_hint(hint: &str) -> Option<String> {
    find_draw_date(hint).or_else(|| {
        TRIPLE_RE
            .captures(hint)
            .map(|c| format!("{} {} {}", &c[1], &c[2], &c[3]))
    })
}
