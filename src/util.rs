// Utility helpers for parsing and basic statistics.
//
// This module centralizes all the "dirty" CSV/number/date handling so the
// rest of the code can assume clean, typed values.
use crate::constants::DATE_FORMAT;
use crate::types::Measure;
use chrono::{Datelike, NaiveDate};
use num_format::{Locale, ToFormattedString};

/// Parse a string-like value into `f64`.
///
/// - Accepts `Option<&str>` so callers can pass through optional fields.
/// - Trims whitespace.
/// - Accepts scientific notation (`1e3`, `2.5E-1`).
/// - Rejects any other alphabetic characters (`nan`, `inf`, `12 dias`).
/// - Returns `None` for anything that cannot be safely parsed, including
///   comma decimals such as `12,5`.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    // Source dates are `DD/MM/YYYY`.
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// Trimmed categorical value; blank counts as missing.
pub fn clean_label(s: Option<String>) -> Option<String> {
    let v = s?.trim().to_string();
    (!v.is_empty()).then_some(v)
}

/// First day of the calendar month containing `d`.
pub fn month_start(d: NaiveDate) -> NaiveDate {
    d.with_day(1).unwrap_or(d)
}

pub fn mean(v: &[f64]) -> Measure {
    if v.is_empty() {
        return Measure::NoData;
    }
    let sum: f64 = v.iter().copied().sum();
    Measure::Value(sum / v.len() as f64)
}

/// `num / den`, or `NoData` when nothing was counted.
pub fn ratio(num: usize, den: usize) -> Measure {
    if den == 0 {
        Measure::NoData
    } else {
        Measure::Value(num as f64 / den as f64)
    }
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals with locale-aware thousands separators (`1,234,567.89`).
    let neg = n.is_sign_negative() && n != 0.0;
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    // -0.00 renders as 0.00
    if neg && res.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{}", res)
    } else {
        res
    }
}

/// Render a measure with `format_number`, or its marker text.
pub fn format_measure(m: Measure, decimals: usize) -> String {
    match m {
        Measure::Value(v) => format_number(v, decimals),
        other => other.to_string(),
    }
}

/// Render a 0..1 ratio as a percentage with one decimal.
pub fn format_pct(m: Measure) -> String {
    match m {
        Measure::Value(v) => format!("{}%", format_number(v * 100.0, 1)),
        other => other.to_string(),
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_numbers_and_rejects_text() {
        assert_eq!(parse_f64_safe(Some(" 12.5 ")), Some(12.5));
        assert_eq!(parse_f64_safe(Some("7")), Some(7.0));
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(Some("abc")), None);
        assert_eq!(parse_f64_safe(Some("NaN")), None);
        assert_eq!(parse_f64_safe(Some("12,5")), None);
        assert_eq!(parse_f64_safe(None), None);
    }

    #[test]
    fn accepts_scientific_notation() {
        assert_eq!(parse_f64_safe(Some("1e3")), Some(1000.0));
        assert_eq!(parse_f64_safe(Some("2.5E-1")), Some(0.25));
        assert_eq!(parse_f64_safe(Some("e")), None);
        assert_eq!(parse_f64_safe(Some("1e999")), None);
        assert_eq!(parse_f64_safe(Some("12 dias")), None);
    }

    #[test]
    fn blank_labels_are_missing() {
        assert_eq!(clean_label(Some(" Loggi ".into())), Some("Loggi".to_string()));
        assert_eq!(clean_label(Some("   ".into())), None);
        assert_eq!(clean_label(None), None);
    }

    #[test]
    fn parses_day_month_year_dates() {
        assert_eq!(
            parse_date_safe(Some("05/03/2024")),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
        assert_eq!(parse_date_safe(Some("2024-03-05")), None);
        assert_eq!(parse_date_safe(Some("31/02/2024")), None);
        assert_eq!(parse_date_safe(Some("  ")), None);
    }

    #[test]
    fn month_start_truncates_to_first_day() {
        let d = NaiveDate::from_ymd_opt(2024, 7, 19).unwrap();
        assert_eq!(month_start(d), NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
    }

    #[test]
    fn mean_and_ratio_signal_no_data_on_empty_input() {
        assert_eq!(mean(&[]), Measure::NoData);
        assert_eq!(mean(&[1.0, 2.0]), Measure::Value(1.5));
        assert_eq!(ratio(0, 0), Measure::NoData);
        assert_eq!(ratio(0, 4), Measure::Value(0.0));
    }

    #[test]
    fn formats_numbers_with_separators() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-1500.0, 0), "-1,500");
        assert_eq!(format_number(-0.001, 2), "0.00");
        assert_eq!(format_pct(Measure::Value(0.6667)), "66.7%");
        assert_eq!(format_pct(Measure::NoData), "n/a");
        assert_eq!(format_int(9855), "9,855");
    }
}
