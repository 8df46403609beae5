//! Severity bands shared by KPI, hub and insight rendering.

use crate::constants::{
    DELAY_RATE_BAD_PCT, DELAY_RATE_WARNING_PCT, OTD_GOOD_PCT, OTD_WARNING_PCT,
};
use crate::types::Measure;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Good,
    Warning,
    Bad,
    Neutral,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Good => "good",
            Severity::Warning => "warning",
            Severity::Bad => "bad",
            Severity::Neutral => "neutral",
        };
        f.write_str(s)
    }
}

/// Band for an OTD percentage (0..=100).
pub fn otd_severity(otd_pct: Measure) -> Severity {
    match otd_pct {
        Measure::Value(v) if v >= OTD_GOOD_PCT => Severity::Good,
        Measure::Value(v) if v >= OTD_WARNING_PCT => Severity::Warning,
        Measure::Value(_) => Severity::Bad,
        _ => Severity::Neutral,
    }
}

/// Band for a delay-rate percentage (0..=100).
pub fn delay_rate_severity(delay_pct: Measure) -> Severity {
    match delay_pct {
        Measure::Value(v) if v > DELAY_RATE_BAD_PCT => Severity::Bad,
        Measure::Value(v) if v > DELAY_RATE_WARNING_PCT => Severity::Warning,
        Measure::Value(_) => Severity::Good,
        _ => Severity::Neutral,
    }
}
