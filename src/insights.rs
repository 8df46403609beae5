//! Rule-based insight selection over aggregation outputs.
//!
//! Selectors never see raw records. Ties resolve to the first entity in the
//! aggregate's key order, which is ascending by name.

use crate::aggregate::{CarrierStats, HubCarrierStats, HubStats};
use crate::severity::{otd_severity, Severity};
use crate::types::Measure;
use crate::util::{format_int, format_measure, format_pct};
use serde::Serialize;

/// Highest and lowest entity by some metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extremes<'a, T> {
    pub highest: &'a T,
    pub lowest: &'a T,
}

impl<'a, T> Extremes<'a, T> {
    /// False when a single entity is both highest and lowest.
    pub fn has_contrast(&self) -> bool {
        !std::ptr::eq(self.highest, self.lowest)
    }
}

/// First-encountered argmax and argmin; entities without a defined metric
/// are skipped. `None` when nothing is left to compare.
pub fn extremes<'a, T, F>(items: &'a [T], metric: F) -> Option<Extremes<'a, T>>
where
    F: Fn(&T) -> Measure,
{
    let mut found: Option<((&'a T, f64), (&'a T, f64))> = None;
    for item in items {
        let Some(v) = metric(item).value() else {
            continue;
        };
        found = Some(match found {
            None => ((item, v), (item, v)),
            Some((hi, lo)) => (
                if v > hi.1 { (item, v) } else { hi },
                if v < lo.1 { (item, v) } else { lo },
            ),
        });
    }
    found.map(|((highest, _), (lowest, _))| Extremes { highest, lowest })
}

pub fn carrier_otd_extremes(carriers: &[CarrierStats]) -> Option<Extremes<'_, CarrierStats>> {
    extremes(carriers, |c| c.otd_ratio)
}

pub fn carrier_cost_extremes(carriers: &[CarrierStats]) -> Option<Extremes<'_, CarrierStats>> {
    extremes(carriers, |c| c.mean_cost)
}

pub fn hub_otd_extremes(hubs: &[HubStats]) -> Option<Extremes<'_, HubStats>> {
    extremes(hubs, |h| h.otd_ratio)
}

pub fn combo_otd_extremes(pairs: &[HubCarrierStats]) -> Option<Extremes<'_, HubCarrierStats>> {
    extremes(pairs, |p| p.otd_ratio)
}

/// Mean cost per order of the most expensive carrier minus the cheapest.
pub fn cost_benefit_delta(cost: &Extremes<'_, CarrierStats>) -> Measure {
    match (cost.highest.mean_cost, cost.lowest.mean_cost) {
        (Measure::Value(hi), Measure::Value(lo)) => Measure::Value(hi - lo),
        _ => Measure::NoData,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    BestCarrier,
    WorstCarrier,
    CostBenefit,
    BestHub,
    WorstHub,
    BestCombination,
    WorstCombination,
    CostReduction,
    LeadTimeImprovement,
    RouteOptimisation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub label: &'static str,
    pub value: Measure,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightFact {
    pub kind: InsightKind,
    pub title: String,
    pub text: String,
    pub figures: Vec<Figure>,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightReport {
    pub facts: Vec<InsightFact>,
    pub recommendations: Vec<InsightFact>,
}

impl InsightReport {
    pub fn find(&self, kind: InsightKind) -> Option<&InsightFact> {
        self.facts
            .iter()
            .chain(self.recommendations.iter())
            .find(|f| f.kind == kind)
    }
}

fn brl(m: Measure) -> String {
    match m {
        Measure::Value(_) => format!("R$ {}", format_measure(m, 2)),
        other => other.to_string(),
    }
}

fn fig(label: &'static str, value: Measure) -> Figure {
    Figure { label, value }
}

/// Build every fact the aggregates support.
///
/// Returns `None` for an empty view. Contrast facts (worst carrier, worst
/// hub, cost-benefit) are left out when only one entity exists.
pub fn select_insights(
    carriers: &[CarrierStats],
    hubs: &[HubStats],
    pairs: &[HubCarrierStats],
) -> Option<InsightReport> {
    let carrier_otd = carrier_otd_extremes(carriers)?;
    let carrier_cost = carrier_cost_extremes(carriers);
    let hub_otd = hub_otd_extremes(hubs);
    let combo = combo_otd_extremes(pairs);

    let mut facts = Vec::new();
    let mut recommendations = Vec::new();

    let best = carrier_otd.highest;
    facts.push(InsightFact {
        kind: InsightKind::BestCarrier,
        title: format!("Best carrier: {}", best.carrier),
        text: format!(
            "OTD of {}, the highest of all carriers. Prioritise it for critical, high-value routes.",
            format_pct(best.otd_ratio)
        ),
        figures: vec![fig("otd_pct", best.otd_ratio.pct())],
        severity: otd_severity(best.otd_ratio.pct()),
    });
    if carrier_otd.has_contrast() {
        let worst = carrier_otd.lowest;
        facts.push(InsightFact {
            kind: InsightKind::WorstCarrier,
            title: format!("Highest delay rate: {}", worst.carrier),
            text: format!(
                "OTD of only {}. Review its SLAs or evaluate alternatives.",
                format_pct(worst.otd_ratio)
            ),
            figures: vec![fig("otd_pct", worst.otd_ratio.pct())],
            severity: otd_severity(worst.otd_ratio.pct()),
        });
    }

    if let Some(cost) = carrier_cost.filter(Extremes::has_contrast) {
        let delta = cost_benefit_delta(&cost);
        facts.push(InsightFact {
            kind: InsightKind::CostBenefit,
            title: "Cost-benefit".to_string(),
            text: format!(
                "{} has the lowest mean cost ({}/order) while {} costs {}/order, a difference of {} per order.",
                cost.lowest.carrier,
                brl(cost.lowest.mean_cost),
                cost.highest.carrier,
                brl(cost.highest.mean_cost),
                brl(delta)
            ),
            figures: vec![
                fig("cheapest_mean_cost", cost.lowest.mean_cost),
                fig("priciest_mean_cost", cost.highest.mean_cost),
                fig("delta", delta),
            ],
            severity: Severity::Neutral,
        });
        recommendations.push(InsightFact {
            kind: InsightKind::CostReduction,
            title: "Cost reduction".to_string(),
            text: format!(
                "Renegotiate with {} or shift volume to {} on shared routes. Potential saving: {} per order.",
                cost.highest.carrier,
                cost.lowest.carrier,
                brl(delta)
            ),
            figures: vec![fig("saving_per_order", delta)],
            severity: Severity::Neutral,
        });
    }

    if let Some(hub_otd) = hub_otd {
        let best_hub = hub_otd.highest;
        facts.push(InsightFact {
            kind: InsightKind::BestHub,
            title: format!("Best hub: {}", best_hub.hub),
            text: format!("OTD of {}.", format_pct(best_hub.otd_ratio)),
            figures: vec![fig("otd_pct", best_hub.otd_ratio.pct())],
            severity: otd_severity(best_hub.otd_ratio.pct()),
        });
        if hub_otd.has_contrast() {
            let worst_hub = hub_otd.lowest;
            facts.push(InsightFact {
                kind: InsightKind::WorstHub,
                title: format!("Worst performing hub: {}", worst_hub.hub),
                text: format!(
                    "OTD of {}. Investigate operational capacity, road infrastructure or mean destination distance.",
                    format_pct(worst_hub.otd_ratio)
                ),
                figures: vec![fig("otd_pct", worst_hub.otd_ratio.pct())],
                severity: otd_severity(worst_hub.otd_ratio.pct()),
            });
        }
        recommendations.push(InsightFact {
            kind: InsightKind::RouteOptimisation,
            title: "Route optimisation".to_string(),
            text: format!(
                "Replicate the operating model of {} in the other hubs and study the practices behind its {} OTD.",
                best_hub.hub,
                format_pct(best_hub.otd_ratio)
            ),
            figures: vec![fig("otd_pct", best_hub.otd_ratio.pct())],
            severity: otd_severity(best_hub.otd_ratio.pct()),
        });
    }

    if let Some(combo) = combo {
        let worst = combo.lowest;
        let best = combo.highest;
        if combo.has_contrast() {
            facts.push(InsightFact {
                kind: InsightKind::WorstCombination,
                title: format!("Worst route: {} via {}", worst.hub, worst.carrier),
                text: format!(
                    "OTD of only {} over {} orders with a mean delay of {} days.",
                    format_pct(worst.otd_ratio),
                    format_int(worst.volume),
                    format_measure(worst.mean_delay, 1)
                ),
                figures: vec![
                    fig("otd_pct", worst.otd_ratio.pct()),
                    fig("volume", Measure::Value(worst.volume as f64)),
                    fig("mean_delay", worst.mean_delay),
                ],
                severity: otd_severity(worst.otd_ratio.pct()),
            });
        }
        facts.push(InsightFact {
            kind: InsightKind::BestCombination,
            title: format!("Best route: {} via {}", best.hub, best.carrier),
            text: format!(
                "OTD of {} over {} orders. Use it as the benchmark for the other routes.",
                format_pct(best.otd_ratio),
                format_int(best.volume)
            ),
            figures: vec![
                fig("otd_pct", best.otd_ratio.pct()),
                fig("volume", Measure::Value(best.volume as f64)),
                fig("mean_delay", best.mean_delay),
            ],
            severity: otd_severity(best.otd_ratio.pct()),
        });
        if combo.has_contrast() {
            recommendations.push(InsightFact {
                kind: InsightKind::LeadTimeImprovement,
                title: "Lead-time improvement".to_string(),
                text: format!(
                    "Focus on {} -> {}. Consider switching carrier on this route or aligning promised lead times with actual operations.",
                    worst.hub, worst.carrier
                ),
                figures: vec![fig("otd_pct", worst.otd_ratio.pct())],
                severity: otd_severity(worst.otd_ratio.pct()),
            });
        }
    }

    Some(InsightReport {
        facts,
        recommendations,
    })
}
