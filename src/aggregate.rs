//! Grouped reductions over a [`FilteredView`].
//!
//! Every reduction is independent and returns rows in ascending key order,
//! which is also the tie-break order used by the insight selectors. Means and
//! ratios over zero rows are [`Measure::NoData`], never zero.

use crate::filter::FilteredView;
use crate::hubs::{hub_location, HubLocation};
use crate::severity::{delay_rate_severity, otd_severity, Severity};
use crate::types::{DeliveryRecord, Measure};
use crate::util::{mean, ratio};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Default, Clone)]
struct Acc {
    volume: usize,
    on_time: usize,
    delayed: usize,
    leads: Vec<f64>,
    costs: Vec<f64>,
    delays: Vec<f64>,
}

impl Acc {
    fn push(&mut self, r: &DeliveryRecord) {
        self.volume += 1;
        if r.on_time {
            self.on_time += 1;
        }
        if r.is_delayed {
            self.delayed += 1;
        }
        self.leads.push(r.actual_lead_days);
        self.costs.push(r.freight_cost);
        if let Some(d) = r.delay_days {
            self.delays.push(d);
        }
    }

    fn otd_ratio(&self) -> Measure {
        ratio(self.on_time, self.volume)
    }

    fn delayed_ratio(&self) -> Measure {
        ratio(self.delayed, self.volume)
    }

    fn mean_lead(&self) -> Measure {
        mean(&self.leads)
    }

    fn mean_cost(&self) -> Measure {
        mean(&self.costs)
    }

    fn mean_delay(&self) -> Measure {
        mean(&self.delays)
    }

    fn total_cost(&self) -> f64 {
        self.costs.iter().sum()
    }
}

/// Records whose key is missing (a blank grouping column) join no group.
fn group_by<K, F>(view: &FilteredView, key: F) -> BTreeMap<K, Acc>
where
    K: Ord,
    F: Fn(&DeliveryRecord) -> Option<K>,
{
    let mut map: BTreeMap<K, Acc> = BTreeMap::new();
    for r in view.iter() {
        if let Some(k) = key(r) {
            map.entry(k).or_default().push(r);
        }
    }
    map
}

/// Unweighted mean of the defined values.
fn mean_of(values: impl Iterator<Item = Measure>) -> Measure {
    let defined: Vec<f64> = values.filter_map(Measure::value).collect();
    mean(&defined)
}

/// Headline KPIs for the whole view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub total_orders: usize,
    pub on_time_orders: usize,
    pub delayed_orders: usize,
    pub unique_destinations: usize,
    pub total_cost: Measure,
    pub mean_cost: Measure,
    pub otd_ratio: Measure,
    pub delayed_ratio: Measure,
    pub mean_actual_lead: Measure,
    pub mean_estimated_lead: Measure,
    /// Mean delay over delayed records only.
    pub mean_delay_when_late: Measure,
    pub otd_severity: Severity,
    pub delay_severity: Severity,
}

pub fn overview(view: &FilteredView) -> Overview {
    let mut acc = Acc::default();
    let mut estimates: Vec<f64> = Vec::new();
    let mut late_delays: Vec<f64> = Vec::new();
    let mut destinations: HashSet<&str> = HashSet::new();
    for r in view.iter() {
        acc.push(r);
        estimates.extend(r.estimated_lead_days);
        if r.is_delayed {
            late_delays.extend(r.delay_days);
        }
        destinations.extend(r.destination_city.as_deref());
    }
    let total_cost = if acc.volume == 0 {
        Measure::NoData
    } else {
        Measure::Value(acc.total_cost())
    };
    Overview {
        total_orders: acc.volume,
        on_time_orders: acc.on_time,
        delayed_orders: acc.delayed,
        unique_destinations: destinations.len(),
        total_cost,
        mean_cost: acc.mean_cost(),
        otd_ratio: acc.otd_ratio(),
        delayed_ratio: acc.delayed_ratio(),
        mean_actual_lead: acc.mean_lead(),
        mean_estimated_lead: mean(&estimates),
        mean_delay_when_late: mean(&late_delays),
        otd_severity: otd_severity(acc.otd_ratio().pct()),
        delay_severity: delay_rate_severity(acc.delayed_ratio().pct()),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarrierStats {
    pub carrier: String,
    pub volume: usize,
    pub otd_ratio: Measure,
    pub mean_lead: Measure,
    pub mean_cost: Measure,
    pub total_cost: f64,
}

pub fn by_carrier(view: &FilteredView) -> Vec<CarrierStats> {
    group_by(view, |r| r.carrier.clone())
        .into_iter()
        .map(|(carrier, acc)| CarrierStats {
            carrier,
            volume: acc.volume,
            otd_ratio: acc.otd_ratio(),
            mean_lead: acc.mean_lead(),
            mean_cost: acc.mean_cost(),
            total_cost: acc.total_cost(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HubStats {
    pub hub: String,
    pub volume: usize,
    pub otd_ratio: Measure,
    pub mean_lead: Measure,
    pub mean_cost: Measure,
    pub otd_severity: Severity,
    pub location: Option<HubLocation>,
}

pub fn by_hub(view: &FilteredView) -> Vec<HubStats> {
    group_by(view, |r| r.origin_hub.clone())
        .into_iter()
        .map(|(hub, acc)| HubStats {
            location: hub_location(&hub),
            hub,
            volume: acc.volume,
            otd_ratio: acc.otd_ratio(),
            mean_lead: acc.mean_lead(),
            mean_cost: acc.mean_cost(),
            otd_severity: otd_severity(acc.otd_ratio().pct()),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HubCarrierStats {
    pub hub: String,
    pub carrier: String,
    pub volume: usize,
    pub otd_ratio: Measure,
    pub delayed_ratio: Measure,
    pub mean_delay: Measure,
    pub total_cost: f64,
    /// Delay rate above the unweighted mean of all pair delay rates.
    pub above_average_delay_rate: bool,
}

pub fn by_hub_carrier(view: &FilteredView) -> Vec<HubCarrierStats> {
    let groups = group_by(view, |r| Some((r.origin_hub.clone()?, r.carrier.clone()?)));
    let avg_rate = mean_of(groups.values().map(Acc::delayed_ratio));
    groups
        .into_iter()
        .map(|((hub, carrier), acc)| {
            let delayed_ratio = acc.delayed_ratio();
            let above_average_delay_rate = match (delayed_ratio, avg_rate) {
                (Measure::Value(rate), Measure::Value(avg)) => rate > avg,
                _ => false,
            };
            HubCarrierStats {
                hub,
                carrier,
                volume: acc.volume,
                otd_ratio: acc.otd_ratio(),
                delayed_ratio,
                mean_delay: acc.mean_delay(),
                total_cost: acc.total_cost(),
                above_average_delay_rate,
            }
        })
        .collect()
}

/// hub → carrier → mean delay; absent cells mean no deliveries for that pair.
pub fn delay_heatmap(pairs: &[HubCarrierStats]) -> BTreeMap<String, BTreeMap<String, Measure>> {
    let mut grid: BTreeMap<String, BTreeMap<String, Measure>> = BTreeMap::new();
    for p in pairs {
        grid.entry(p.hub.clone())
            .or_default()
            .insert(p.carrier.clone(), p.mean_delay);
    }
    grid
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPoint {
    pub month: NaiveDate,
    pub carrier: String,
    pub volume: usize,
    pub otd_pct: Measure,
    pub total_cost: f64,
}

/// Ordered by month, then carrier.
pub fn monthly_by_carrier(view: &FilteredView) -> Vec<MonthlyPoint> {
    group_by(view, |r| Some((r.order_month, r.carrier.clone()?)))
        .into_iter()
        .map(|((month, carrier), acc)| MonthlyPoint {
            month,
            carrier,
            volume: acc.volume,
            otd_pct: acc.otd_ratio().pct(),
            total_cost: acc.total_cost(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteStats {
    pub origin: String,
    pub destination: String,
    pub volume: usize,
    pub mean_delay: Measure,
    pub delayed_ratio: Measure,
    pub total_cost: f64,
    pub delayed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteReport {
    pub routes: Vec<RouteStats>,
    /// Unweighted mean of per-route mean delays.
    pub global_mean_delay: Measure,
}

impl RouteReport {
    /// Busiest `n` routes; equal volumes keep (origin, destination) order.
    pub fn top_by_volume(&self, n: usize) -> Vec<&RouteStats> {
        let mut ranked: Vec<&RouteStats> = self.routes.iter().collect();
        ranked.sort_by(|a, b| b.volume.cmp(&a.volume));
        ranked.truncate(n);
        ranked
    }

    pub fn delayed_count(&self) -> usize {
        self.routes.iter().filter(|r| r.delayed).count()
    }
}

pub fn by_route(view: &FilteredView) -> RouteReport {
    let groups = group_by(view, |r| {
        Some((r.origin_hub.clone()?, r.destination_city.clone()?))
    });
    let global_mean_delay = mean_of(groups.values().map(Acc::mean_delay));
    let routes = groups
        .into_iter()
        .map(|((origin, destination), acc)| {
            let mean_delay = acc.mean_delay();
            let delayed = match (mean_delay, global_mean_delay) {
                (Measure::Value(d), Measure::Value(g)) => d > g,
                _ => false,
            };
            RouteStats {
                origin,
                destination,
                volume: acc.volume,
                mean_delay,
                delayed_ratio: acc.delayed_ratio(),
                total_cost: acc.total_cost(),
                delayed,
            }
        })
        .collect();
    RouteReport {
        routes,
        global_mean_delay,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HubCostEfficiency {
    pub hub: String,
    pub total_cost: f64,
    pub mean_cost: Measure,
    pub volume: usize,
    pub otd_ratio: Measure,
    /// `total_cost / (otd_ratio * volume)`; `Undefined` when nothing was on time.
    pub cost_per_on_time: Measure,
}

pub fn cost_efficiency(view: &FilteredView) -> Vec<HubCostEfficiency> {
    group_by(view, |r| r.origin_hub.clone())
        .into_iter()
        .map(|(hub, acc)| {
            let otd_ratio = acc.otd_ratio();
            let total_cost = acc.total_cost();
            let cost_per_on_time = match otd_ratio {
                Measure::Value(otd) if otd * acc.volume as f64 > 0.0 => {
                    Measure::Value(total_cost / (otd * acc.volume as f64))
                }
                Measure::Value(_) => Measure::Undefined,
                other => other,
            };
            HubCostEfficiency {
                hub,
                total_cost,
                mean_cost: acc.mean_cost(),
                volume: acc.volume,
                otd_ratio,
                cost_per_on_time,
            }
        })
        .collect()
}
