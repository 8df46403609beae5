//! Command-line configuration.

use crate::constants::{DATE_FORMAT, DEFAULT_DELIMITER, DEFAULT_INPUT, DEFAULT_TOP_ROUTES};
use crate::error::{ReportError, Result};
use crate::filter::FilterSpec;
use crate::loader::Dataset;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use tracing::warn;

/// Delivery performance report: OTD, delays, freight cost and insights.
#[derive(Debug, Clone, Parser)]
#[command(name = "logistics-report", version, about)]
pub struct Args {
    /// Delivery export to read
    #[arg(short = 'i', long = "input", value_name = "PATH", default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Field separator of the export
    #[arg(long, default_value_t = DEFAULT_DELIMITER as char)]
    pub delimiter: char,

    /// First order date to include (DD/MM/YYYY); defaults to the earliest observed
    #[arg(long, value_parser = parse_cli_date)]
    pub from: Option<NaiveDate>,

    /// Last order date to include (DD/MM/YYYY); defaults to the latest observed
    #[arg(long, value_parser = parse_cli_date)]
    pub to: Option<NaiveDate>,

    /// Carrier to include; repeat for several. Defaults to all
    #[arg(long = "carrier", value_name = "NAME")]
    pub carriers: Vec<String>,

    /// Origin hub to include; repeat for several. Defaults to all
    #[arg(long = "hub", value_name = "NAME")]
    pub hubs: Vec<String>,

    /// Delivery status to include; repeat for several. Defaults to all
    #[arg(long = "status", value_name = "NAME")]
    pub statuses: Vec<String>,

    /// Directory for the exported CSV reports and summary.json
    #[arg(short = 'o', long = "out-dir", value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Number of routes shown in the route preview, by volume
    #[arg(long, default_value_t = DEFAULT_TOP_ROUTES)]
    pub top_routes: usize,

    /// Print previews only, write no files
    #[arg(long)]
    pub no_export: bool,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_cli_date(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| format!("expected DD/MM/YYYY, got {s:?}: {e}"))
}

impl Args {
    pub fn delimiter_byte(&self) -> Result<u8> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                ReportError::InvalidFilter(format!("delimiter {:?} is not ASCII", self.delimiter))
            })
    }

    /// The selection requested on the command line; omitted dimensions select
    /// everything observed in `dataset`.
    pub fn filter_spec(&self, dataset: &Dataset) -> Result<FilterSpec> {
        let all = FilterSpec::select_all(dataset);
        let pick = |given: &[String], observed: std::collections::BTreeSet<String>, what: &str| {
            if given.is_empty() {
                return observed;
            }
            for g in given.iter().filter(|g| !observed.contains(*g)) {
                warn!("{} {:?} does not occur in the dataset", what, g);
            }
            given.iter().cloned().collect()
        };
        FilterSpec::new(
            self.from.unwrap_or(all.date_from()),
            self.to.unwrap_or(all.date_to()),
            pick(&self.carriers, all.carriers().clone(), "carrier"),
            pick(&self.hubs, all.hubs().clone(), "hub"),
            pick(&self.statuses, all.statuses().clone(), "status"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DeliveryRecord, Labels};

    fn dataset() -> Dataset {
        let rec = |carrier: &str, day: u32| {
            DeliveryRecord::new(
                Labels {
                    order_id: String::new(),
                    origin_hub: Some("Recife".into()),
                    destination_city: Some("D".into()),
                    carrier: Some(carrier.into()),
                    delivery_status: Some("Entregue".into()),
                },
                NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
                None,
                Some(2.0),
                1.0,
                5.0,
            )
        };
        Dataset::from_records(vec![rec("Loggi", 3), rec("Jadlog", 20)])
    }

    #[test]
    fn defaults_select_everything() {
        let args = Args::try_parse_from(["logistics-report"]).unwrap();
        assert_eq!(args.input, PathBuf::from(DEFAULT_INPUT));
        assert_eq!(args.delimiter_byte().unwrap(), b';');
        let ds = dataset();
        assert_eq!(args.filter_spec(&ds).unwrap(), FilterSpec::select_all(&ds));
    }

    #[test]
    fn explicit_selection_overrides_defaults() {
        let args = Args::try_parse_from([
            "logistics-report",
            "--from",
            "10/01/2024",
            "--carrier",
            "Jadlog",
            "--carrier",
            "Loggi",
        ])
        .unwrap();
        let spec = args.filter_spec(&dataset()).unwrap();
        assert_eq!(spec.date_from(), NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(spec.date_to(), NaiveDate::from_ymd_opt(2024, 1, 20).unwrap());
        assert_eq!(spec.carriers().len(), 2);
    }

    #[test]
    fn bad_dates_are_rejected() {
        assert!(Args::try_parse_from(["logistics-report", "--to", "2024-01-01"]).is_err());
        let args =
            Args::try_parse_from(["logistics-report", "--from", "25/01/2024", "--to", "01/01/2024"])
                .unwrap();
        assert!(matches!(
            args.filter_spec(&dataset()),
            Err(ReportError::InvalidFilter(_))
        ));
    }
}
