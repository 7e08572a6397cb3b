use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use super::core::read_asset;
use crate::error::{KeycoachError, Result};

const LCG_MODULUS: u64 = 0x8000_0000;
const LCG_MULTIPLIER: u64 = 1_103_515_245;
const LCG_INCREMENT: u64 = 12_345;

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

pub fn load_quotes() -> Result<Vec<Quote>> {
    read_asset("quotes.json")
}

/// Linear congruential generator so every player gets the same daily text
#[derive(Debug, Clone)]
pub struct DailyRng {
    state: u64,
}

impl DailyRng {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed % LCG_MODULUS,
        }
    }

    pub fn for_date(date: NaiveDate) -> Self {
        let seed = date.year() as u64 * 10_000 + date.month() as u64 * 100 + date.day() as u64;
        Self::new(seed)
    }

    /// Next value in [0, 1]
    pub fn next_f64(&mut self) -> f64 {
        self.state = (LCG_MULTIPLIER * self.state + LCG_INCREMENT) % LCG_MODULUS;
        self.state as f64 / (LCG_MODULUS - 1) as f64
    }
}

pub fn daily_quote(date: NaiveDate) -> Result<Quote> {
    let quotes = load_quotes()?;
    if quotes.is_empty() {
        return Err(KeycoachError::MissingAsset("quotes.json is empty".to_string()));
    }
    let mut rng = DailyRng::for_date(date);
    let idx = ((rng.next_f64() * quotes.len() as f64) as usize).min(quotes.len() - 1);
    Ok(quotes[idx].clone())
}

/// Days since 2024-01-01, counting that day as challenge #1
pub fn daily_challenge_number(date: NaiveDate) -> i64 {
    NaiveDate::from_ymd_opt(2024, 1, 1).map_or(0, |epoch| (date - epoch).num_days() + 1)
}
