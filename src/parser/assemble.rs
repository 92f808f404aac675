use tracing::warn;

use super::date::DrawDate;
use super::sections::Accumulators;
use super::tiers::{Group, OUTPUT_ORDER};
use crate::record::{ParsedDraw, PrizeEntry};

/// Build the fixed-shape record. Never fails, whatever the accumulators hold.
pub fn assemble(date: &DrawDate, source_url: &str, accumulators: Accumulators) -> ParsedDraw {
    let mut prizes = Vec::with_capacity(2);
    let mut running_numbers = Vec::with_capacity(3);

    for (kind, acc) in OUTPUT_ORDER.into_iter().zip(accumulators.into_inner()) {
        let spec = kind.spec();
        let numbers = acc.into_tokens();
        let amount = match spec.fixed_amount {
            Some(declared) => {
                if !numbers.is_empty() && numbers.len() != declared {
                    warn!(
                        tier = spec.id,
                        declared,
                        found = numbers.len(),
                        "fixed tier count differs from declared amount"
                    );
                }
                declared
            }
            None => numbers.len(),
        };
        let entry = PrizeEntry {
            id: spec.id.to_string(),
            name: spec.name.to_string(),
            reward: spec.reward.to_string(),
            amount,
            numbers,
        };
        match spec.group {
            Group::Prizes => prizes.push(entry),
            Group::RunningNumbers => running_numbers.push(entry),
        }
    }

    ParsedDraw {
        date: date.thai.clone(),
        source_url: source_url.to_string(),
        prizes,
        running_numbers,
    }
}
