use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use tabled::Tabled;

use crate::util::month_start;

/// One line of the source export, every field still raw text.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawRow {
    #[serde(rename = "pedido_id")]
    pub order_id: Option<String>,
    #[serde(rename = "data_pedido")]
    pub order_date: Option<String>,
    #[serde(rename = "data_entrega")]
    pub delivery_date: Option<String>,
    #[serde(rename = "cidade_origem")]
    pub origin_hub: Option<String>,
    #[serde(rename = "cidade_destino")]
    pub destination_city: Option<String>,
    #[serde(rename = "transportadora")]
    pub carrier: Option<String>,
    #[serde(rename = "status_entrega")]
    pub delivery_status: Option<String>,
    #[serde(rename = "prazo_estimado_dias")]
    pub estimated_lead_days: Option<String>,
    #[serde(rename = "prazo_real_dias")]
    pub actual_lead_days: Option<String>,
    #[serde(rename = "custo_transporte")]
    pub freight_cost: Option<String>,
}

/// A validated delivery with its derived fields.
///
/// Build through [`DeliveryRecord::new`] so the derived fields always agree
/// with the inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryRecord {
    pub order_id: String,
    pub order_date: NaiveDate,
    pub delivery_date: Option<NaiveDate>,
    pub origin_hub: Option<String>,
    pub destination_city: Option<String>,
    pub carrier: Option<String>,
    pub delivery_status: Option<String>,
    pub estimated_lead_days: Option<f64>,
    pub actual_lead_days: f64,
    pub freight_cost: f64,
    /// `actual - estimated`; `None` when the estimate is missing.
    pub delay_days: Option<f64>,
    pub on_time: bool,
    pub is_delayed: bool,
    pub order_month: NaiveDate,
}

/// Categorical attributes of a delivery; `None` where the source cell was blank.
#[derive(Debug, Clone, Default)]
pub struct Labels {
    pub order_id: String,
    pub origin_hub: Option<String>,
    pub destination_city: Option<String>,
    pub carrier: Option<String>,
    pub delivery_status: Option<String>,
}

impl DeliveryRecord {
    /// A delivery without an estimate is never on time, so it counts as delayed.
    pub fn new(
        labels: Labels,
        order_date: NaiveDate,
        delivery_date: Option<NaiveDate>,
        estimated_lead_days: Option<f64>,
        actual_lead_days: f64,
        freight_cost: f64,
    ) -> Self {
        let delay_days = estimated_lead_days.map(|est| actual_lead_days - est);
        let on_time = matches!(estimated_lead_days, Some(est) if actual_lead_days <= est);
        DeliveryRecord {
            order_id: labels.order_id,
            order_date,
            delivery_date,
            origin_hub: labels.origin_hub,
            destination_city: labels.destination_city,
            carrier: labels.carrier,
            delivery_status: labels.delivery_status,
            estimated_lead_days,
            actual_lead_days,
            freight_cost,
            delay_days,
            on_time,
            is_delayed: !on_time,
            order_month: month_start(order_date),
        }
    }

    /// Whether a selection can ever match this record: hub, carrier and
    /// status are all present.
    pub fn is_selectable(&self) -> bool {
        self.origin_hub.is_some() && self.carrier.is_some() && self.delivery_status.is_some()
    }
}

/// A numeric result that may have no defined value.
///
/// `NoData` means nothing was aggregated (empty group or view); `Undefined`
/// means the data exists but a denominator was zero. Zero itself is a real
/// value, e.g. an OTD of 0%.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measure {
    Value(f64),
    NoData,
    Undefined,
}

impl Measure {
    pub fn value(self) -> Option<f64> {
        match self {
            Measure::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Measure {
        match self {
            Measure::Value(v) => Measure::Value(f(v)),
            other => other,
        }
    }

    /// Fraction as a percentage.
    pub fn pct(self) -> Measure {
        self.map(|v| v * 100.0)
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measure::Value(v) => write!(f, "{:.2}", v),
            Measure::NoData => write!(f, "n/a"),
            Measure::Undefined => write!(f, "undefined"),
        }
    }
}

impl Serialize for Measure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Measure::Value(v) => serializer.serialize_f64(*v),
            Measure::NoData => serializer.serialize_none(),
            Measure::Undefined => serializer.serialize_str("undefined"),
        }
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct KpiRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Detail")]
    pub detail: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct CarrierRow {
    #[tabled(rename = "Carrier")]
    pub carrier: String,
    #[tabled(rename = "Orders")]
    pub volume: String,
    #[tabled(rename = "OTD")]
    pub otd: String,
    #[tabled(rename = "AvgLeadDays")]
    pub mean_lead: String,
    #[tabled(rename = "AvgCost")]
    pub mean_cost: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct HubRow {
    #[tabled(rename = "Hub")]
    pub hub: String,
    #[tabled(rename = "Orders")]
    pub volume: String,
    #[tabled(rename = "OTD")]
    pub otd: String,
    #[tabled(rename = "Band")]
    pub band: String,
    #[tabled(rename = "AvgLeadDays")]
    pub mean_lead: String,
    #[tabled(rename = "AvgCost")]
    pub mean_cost: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct MonthlyRow {
    #[tabled(rename = "Month")]
    pub month: String,
    #[tabled(rename = "Carrier")]
    pub carrier: String,
    #[tabled(rename = "OTD%")]
    pub otd_pct: String,
    #[tabled(rename = "FreightCost")]
    pub total_cost: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct RouteRow {
    #[tabled(rename = "Origin")]
    pub origin: String,
    #[tabled(rename = "Destination")]
    pub destination: String,
    #[tabled(rename = "Orders")]
    pub volume: String,
    #[tabled(rename = "AvgDelay")]
    pub mean_delay: String,
    #[tabled(rename = "DelayRate")]
    pub delayed_ratio: String,
    #[tabled(rename = "FreightCost")]
    pub total_cost: String,
    #[tabled(rename = "Flag")]
    pub flag: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct CostEfficiencyRow {
    #[tabled(rename = "Hub")]
    pub hub: String,
    #[tabled(rename = "TotalCost")]
    pub total_cost: String,
    #[tabled(rename = "AvgCost")]
    pub mean_cost: String,
    #[tabled(rename = "Orders")]
    pub volume: String,
    #[tabled(rename = "OTD%")]
    pub otd_pct: String,
    #[tabled(rename = "CostPerOnTime")]
    pub cost_per_on_time: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct InsightRow {
    #[tabled(rename = "Severity")]
    pub severity: String,
    #[tabled(rename = "Insight")]
    pub title: String,
    #[tabled(rename = "Detail")]
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(estimated: Option<f64>, actual: f64) -> DeliveryRecord {
        DeliveryRecord::new(
            Labels::default(),
            NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
            None,
            estimated,
            actual,
            10.0,
        )
    }

    #[test]
    fn derived_fields_follow_lead_times() {
        let early = record(Some(2.0), 1.0);
        assert_eq!(early.delay_days, Some(-1.0));
        assert!(early.on_time && !early.is_delayed);

        let exact = record(Some(3.0), 3.0);
        assert_eq!(exact.delay_days, Some(0.0));
        assert!(exact.on_time);

        let late = record(Some(2.0), 4.0);
        assert_eq!(late.delay_days, Some(2.0));
        assert!(!late.on_time && late.is_delayed);

        assert_eq!(late.order_month, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    }

    #[test]
    fn missing_estimate_counts_as_delayed_without_delay_days() {
        let r = record(None, 1.0);
        assert_eq!(r.delay_days, None);
        assert!(!r.on_time);
        assert!(r.is_delayed);
    }

    #[test]
    fn on_time_and_delayed_partition_every_record() {
        for (est, act) in [(Some(1.0), 0.0), (Some(1.0), 1.0), (Some(1.0), 5.0), (None, 2.0)] {
            let r = record(est, act);
            assert!(r.on_time ^ r.is_delayed);
        }
    }

    #[test]
    fn blank_dimension_makes_record_unselectable() {
        let mut r = record(Some(2.0), 1.0);
        assert!(!r.is_selectable());
        r.origin_hub = Some("Recife".into());
        r.carrier = Some("Loggi".into());
        r.delivery_status = Some("Entregue".into());
        assert!(r.is_selectable());
        r.destination_city = None;
        assert!(r.is_selectable());
    }

    #[test]
    fn measure_serializes_markers_distinctly() {
        let json = serde_json::to_string(&[Measure::Value(0.5), Measure::NoData, Measure::Undefined])
            .unwrap();
        assert_eq!(json, r#"[0.5,null,"undefined"]"#);
        assert_eq!(Measure::Value(0.5).pct(), Measure::Value(50.0));
        assert_eq!(Measure::NoData.pct(), Measure::NoData);
    }
}
