//! Fixed thresholds and source-format constants.

/// Textual format of `data_pedido` / `data_entrega`.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Field separator of the source export.
pub const DEFAULT_DELIMITER: u8 = b';';

pub const DEFAULT_INPUT: &str = "FCD_logistica.csv";

/// OTD percentage at or above which a value is good.
pub const OTD_GOOD_PCT: f64 = 70.0;
/// OTD percentage at or above which a value is only a warning.
pub const OTD_WARNING_PCT: f64 = 50.0;

/// Delay-rate percentage above which a value is bad.
pub const DELAY_RATE_BAD_PCT: f64 = 30.0;
/// Delay-rate percentage above which a value is a warning.
pub const DELAY_RATE_WARNING_PCT: f64 = 15.0;

pub const DEFAULT_TOP_ROUTES: usize = 10;

pub const REPORT_CARRIERS: &str = "report_carriers.csv";
pub const REPORT_HUB_CARRIER: &str = "report_hub_carrier.csv";
pub const REPORT_MONTHLY: &str = "report_monthly_trend.csv";
pub const REPORT_ROUTES: &str = "report_routes.csv";
pub const REPORT_COST_EFFICIENCY: &str = "report_cost_efficiency.csv";
pub const SUMMARY_JSON: &str = "summary.json";
