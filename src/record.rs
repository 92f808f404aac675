use serde::{Deserialize, Serialize};

/// One prize tier in the output record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeEntry {
    pub id: String,
    pub name: String,
    pub reward: String,
    pub amount: usize,
    #[serde(rename = "number")]
    pub numbers: Vec<String>,
}

/// Extracted draw. Field names follow the persisted JSON schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDraw {
    pub date: String,
    #[serde(rename = "endpoint")]
    pub source_url: String,
    pub prizes: Vec<PrizeEntry>,
    pub running_numbers: Vec<PrizeEntry>,
}

impl ParsedDraw {
    pub fn entry(&self, id: &str) -> Option<&PrizeEntry> {
        self.prizes
            .iter()
            .chain(&self.running_numbers)
            .find(|p| p.id == id)
    }

    /// Numbers of the tier with this id, empty if unknown.
    pub fn numbers(&self, id: &str) -> &[String] {
        self.entry(id).map(|p| p.numbers.as_slice()).unwrap_or(&[])
    }
}

/// `{"status": "success", "response": {...}}` boundary record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub status: String,
    pub response: ParsedDraw,
}

impl Envelope {
    pub fn success(draw: ParsedDraw) -> Self {
        Self {
            status: "success".to_string(),
            response: draw,
        }
    }
}

/// Which pass populated a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    Sections,
    PrimaryBlock,
    SecondaryBlock,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierReport {
    pub id: &'static str,
    pub source: FieldSource,
    pub found: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, numbers: &[&str]) -> PrizeEntry {
        PrizeEntry {
            id: id.to_string(),
            name: "n".to_string(),
            reward: "1".to_string(),
            amount: numbers.len(),
            numbers: numbers.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn serializes_with_schema_names() {
        let draw = ParsedDraw {
            date: "(unknown)".into(),
            source_url: "https://example.com/lotto/check/1/".into(),
            prizes: vec![entry("prizeFirst", &["123456"])],
            running_numbers: vec![entry("runningNumberBackTwo", &[])],
        };
        let v = serde_json::to_value(Envelope::success(draw)).unwrap();
        assert_eq!(v["status"], "success");
        assert_eq!(v["response"]["endpoint"], "https://example.com/lotto/check/1/");
        assert_eq!(v["response"]["prizes"][0]["number"][0], "123456");
        assert_eq!(v["response"]["runningNumbers"][0]["amount"], 0);
        assert!(v["response"].get("sourceUrl").is_none());
    }

    #[test]
    fn lookup_by_id() {
        let draw = ParsedDraw {
            date: "(unknown)".into(),
            source_url: "u".into(),
            prizes: vec![entry("prizeFirst", &["123456"])],
            running_numbers: vec![entry("runningNumberBackTwo", &["78"])],
        };
        assert_eq!(draw.numbers("runningNumberBackTwo"), ["78"]);
        assert!(draw.numbers("nope").is_empty());
    }
}
