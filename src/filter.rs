//! Filter engine: a conjunction of date-range and set-membership predicates.

use crate::error::{ReportError, Result};
use crate::loader::Dataset;
use crate::types::DeliveryRecord;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// The user's current selection.
///
/// Dimensions combine with AND; values within a dimension with OR. An empty
/// set matches nothing, and neither does a record whose value for a dimension
/// is missing. `date_from <= date_to` always holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSpec {
    date_from: NaiveDate,
    date_to: NaiveDate,
    carriers: BTreeSet<String>,
    hubs: BTreeSet<String>,
    statuses: BTreeSet<String>,
}

fn contains(set: &BTreeSet<String>, value: &Option<String>) -> bool {
    value.as_ref().is_some_and(|v| set.contains(v))
}

impl FilterSpec {
    pub fn new(
        date_from: NaiveDate,
        date_to: NaiveDate,
        carriers: BTreeSet<String>,
        hubs: BTreeSet<String>,
        statuses: BTreeSet<String>,
    ) -> Result<Self> {
        if date_from > date_to {
            return Err(ReportError::InvalidFilter(format!(
                "date_from {} is after date_to {}",
                date_from, date_to
            )));
        }
        Ok(FilterSpec {
            date_from,
            date_to,
            carriers,
            hubs,
            statuses,
        })
    }

    /// Everything observed in the dataset selected.
    pub fn select_all(dataset: &Dataset) -> Self {
        let (date_from, date_to) = dataset
            .date_span()
            .unwrap_or((NaiveDate::MIN, NaiveDate::MAX));
        FilterSpec {
            date_from,
            date_to,
            carriers: dataset.carriers(),
            hubs: dataset.hubs(),
            statuses: dataset.statuses(),
        }
    }

    pub fn date_from(&self) -> NaiveDate {
        self.date_from
    }

    pub fn date_to(&self) -> NaiveDate {
        self.date_to
    }

    pub fn carriers(&self) -> &BTreeSet<String> {
        &self.carriers
    }

    pub fn hubs(&self) -> &BTreeSet<String> {
        &self.hubs
    }

    pub fn statuses(&self) -> &BTreeSet<String> {
        &self.statuses
    }

    /// Same selection over a different date range.
    pub fn with_dates(self, date_from: NaiveDate, date_to: NaiveDate) -> Result<Self> {
        FilterSpec::new(date_from, date_to, self.carriers, self.hubs, self.statuses)
    }

    pub fn with_carriers(self, carriers: BTreeSet<String>) -> Self {
        FilterSpec { carriers, ..self }
    }

    pub fn with_hubs(self, hubs: BTreeSet<String>) -> Self {
        FilterSpec { hubs, ..self }
    }

    pub fn with_statuses(self, statuses: BTreeSet<String>) -> Self {
        FilterSpec { statuses, ..self }
    }

    pub fn matches(&self, r: &DeliveryRecord) -> bool {
        r.order_date >= self.date_from
            && r.order_date <= self.date_to
            && contains(&self.carriers, &r.carrier)
            && contains(&self.hubs, &r.origin_hub)
            && contains(&self.statuses, &r.delivery_status)
    }

    pub fn apply<'a>(&self, dataset: &'a Dataset) -> FilteredView<'a> {
        let records: Vec<&DeliveryRecord> =
            dataset.records().iter().filter(|r| self.matches(r)).collect();
        debug!(
            selected = records.len(),
            of = dataset.len(),
            "filter applied"
        );
        if records.is_empty() {
            warn!("no records match the current filter selection");
        }
        FilteredView { records }
    }
}

/// Read-only subset of the dataset, in dataset order.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView<'a> {
    records: Vec<&'a DeliveryRecord>,
}

impl<'a> FilteredView<'a> {
    /// Every selectable record, i.e. what a select-all filter yields.
    pub fn all(dataset: &'a Dataset) -> Self {
        FilteredView {
            records: dataset
                .records()
                .iter()
                .filter(|r| r.is_selectable())
                .collect(),
        }
    }

    pub fn records(&self) -> &[&'a DeliveryRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a DeliveryRecord> + '_ {
        self.records.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
