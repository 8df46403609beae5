//! Row validation: raw text in, fully derived [`DeliveryRecord`] or a rejection out.

use crate::types::{DeliveryRecord, Labels, RawRow};
use crate::util::{clean_label, parse_date_safe, parse_f64_safe};
use serde::Serialize;
use std::fmt;

/// Why a row was left out of the working dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RowRejection {
    MissingOrderDate,
    MissingActualLead,
    MissingFreightCost,
    /// The CSV line itself could not be decoded.
    Malformed,
}

impl fmt::Display for RowRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RowRejection::MissingOrderDate => "missing or unparsable order date",
            RowRejection::MissingActualLead => "missing or unparsable actual lead time",
            RowRejection::MissingFreightCost => "missing or unparsable freight cost",
            RowRejection::Malformed => "malformed CSV line",
        };
        f.write_str(s)
    }
}

pub fn validate_row(row: RawRow) -> Result<DeliveryRecord, RowRejection> {
    let order_date =
        parse_date_safe(row.order_date.as_deref()).ok_or(RowRejection::MissingOrderDate)?;
    let actual_lead_days = parse_f64_safe(row.actual_lead_days.as_deref())
        .ok_or(RowRejection::MissingActualLead)?;
    let freight_cost =
        parse_f64_safe(row.freight_cost.as_deref()).ok_or(RowRejection::MissingFreightCost)?;

    // Neither of these rejects the row.
    let delivery_date = parse_date_safe(row.delivery_date.as_deref());
    let estimated_lead_days = parse_f64_safe(row.estimated_lead_days.as_deref());

    let labels = Labels {
        order_id: clean_label(row.order_id).unwrap_or_default(),
        origin_hub: clean_label(row.origin_hub),
        destination_city: clean_label(row.destination_city),
        carrier: clean_label(row.carrier),
        delivery_status: clean_label(row.delivery_status),
    };

    Ok(DeliveryRecord::new(
        labels,
        order_date,
        delivery_date,
        estimated_lead_days,
        actual_lead_days,
        freight_cost,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn raw() -> RawRow {
        RawRow {
            order_id: Some("P-001".into()),
            order_date: Some("15/01/2024".into()),
            delivery_date: Some("18/01/2024".into()),
            origin_hub: Some(" Curitiba ".into()),
            destination_city: Some("Vila Nova".into()),
            carrier: Some("Loggi".into()),
            delivery_status: Some("Entregue".into()),
            estimated_lead_days: Some("4".into()),
            actual_lead_days: Some("3".into()),
            freight_cost: Some("42.90".into()),
        }
    }

    #[test]
    fn accepts_complete_row() {
        let r = validate_row(raw()).unwrap();
        assert_eq!(r.order_id, "P-001");
        assert_eq!(r.origin_hub.as_deref(), Some("Curitiba"));
        assert_eq!(r.order_date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(r.delivery_date, NaiveDate::from_ymd_opt(2024, 1, 18));
        assert_eq!(r.freight_cost, 42.90);
        assert_eq!(r.delay_days, Some(-1.0));
        assert!(r.on_time);
    }

    #[test]
    fn rejects_each_required_field() {
        let mut row = raw();
        row.order_date = Some("2024-01-15".into());
        assert_eq!(validate_row(row), Err(RowRejection::MissingOrderDate));

        let mut row = raw();
        row.actual_lead_days = None;
        assert_eq!(validate_row(row), Err(RowRejection::MissingActualLead));

        let mut row = raw();
        row.freight_cost = Some("gratis".into());
        assert_eq!(validate_row(row), Err(RowRejection::MissingFreightCost));
    }

    #[test]
    fn optional_fields_do_not_reject() {
        let mut row = raw();
        row.estimated_lead_days = Some("".into());
        row.delivery_date = None;
        row.carrier = Some("  ".into());
        let r = validate_row(row).unwrap();
        assert_eq!(r.estimated_lead_days, None);
        assert_eq!(r.delivery_date, None);
        assert_eq!(r.carrier, None);
        assert!(!r.is_selectable());
        assert!(r.is_delayed);
    }
}
