//! Formatted rows for console previews.
//!
//! The numeric stats stay in [`crate::aggregate`]; these only turn them into
//! display strings.

use crate::aggregate::{
    CarrierStats, HubCostEfficiency, HubStats, MonthlyPoint, Overview, RouteReport,
};
use crate::insights::InsightReport;
use crate::types::{
    CarrierRow, CostEfficiencyRow, HubRow, InsightRow, KpiRow, Measure, MonthlyRow, RouteRow,
};
use crate::util::{format_int, format_measure, format_number, format_pct};
use std::collections::BTreeMap;

fn brl(m: Measure, decimals: usize) -> String {
    match m {
        Measure::Value(_) => format!("R$ {}", format_measure(m, decimals)),
        other => other.to_string(),
    }
}

fn days(m: Measure) -> String {
    match m {
        Measure::Value(_) => format!("{} days", format_measure(m, 1)),
        other => other.to_string(),
    }
}

pub fn kpi_rows(o: &Overview) -> Vec<KpiRow> {
    let row = |metric: &str, value: String, detail: String| KpiRow {
        metric: metric.to_string(),
        value,
        detail,
    };
    vec![
        row(
            "On-time delivery (OTD)",
            format_pct(o.otd_ratio),
            format!(
                "{} of {} orders [{}]",
                format_int(o.on_time_orders),
                format_int(o.total_orders),
                o.otd_severity
            ),
        ),
        row(
            "Total freight cost",
            brl(o.total_cost, 0),
            format!("mean {} / order", brl(o.mean_cost, 2)),
        ),
        row(
            "Order volume",
            format_int(o.total_orders),
            format!("{} unique destinations", format_int(o.unique_destinations)),
        ),
        row(
            "Mean delivery time",
            days(o.mean_actual_lead),
            format!("mean estimate {}", days(o.mean_estimated_lead)),
        ),
        row(
            "Delay rate",
            format_pct(o.delayed_ratio),
            format!(
                "mean delay {} when late [{}]",
                days(o.mean_delay_when_late),
                o.delay_severity
            ),
        ),
    ]
}

pub fn carrier_rows(carriers: &[CarrierStats]) -> Vec<CarrierRow> {
    carriers
        .iter()
        .map(|c| CarrierRow {
            carrier: c.carrier.clone(),
            volume: format_int(c.volume),
            otd: format_pct(c.otd_ratio),
            mean_lead: format_measure(c.mean_lead, 1),
            mean_cost: brl(c.mean_cost, 2),
        })
        .collect()
}

/// Busiest hubs first.
pub fn hub_rows(hubs: &[HubStats]) -> Vec<HubRow> {
    let mut sorted: Vec<&HubStats> = hubs.iter().collect();
    sorted.sort_by(|a, b| b.volume.cmp(&a.volume));
    sorted
        .into_iter()
        .map(|h| HubRow {
            hub: h.hub.clone(),
            volume: format_int(h.volume),
            otd: format_pct(h.otd_ratio),
            band: h.otd_severity.to_string(),
            mean_lead: format_measure(h.mean_lead, 1),
            mean_cost: brl(h.mean_cost, 0),
        })
        .collect()
}

pub fn monthly_rows(points: &[MonthlyPoint]) -> Vec<MonthlyRow> {
    points
        .iter()
        .map(|p| MonthlyRow {
            month: p.month.format("%Y-%m").to_string(),
            carrier: p.carrier.clone(),
            otd_pct: format_measure(p.otd_pct, 1),
            total_cost: brl(Measure::Value(p.total_cost), 2),
        })
        .collect()
}

pub fn route_rows(report: &RouteReport, top: usize) -> Vec<RouteRow> {
    report
        .top_by_volume(top)
        .into_iter()
        .map(|r| RouteRow {
            origin: r.origin.clone(),
            destination: r.destination.clone(),
            volume: format_int(r.volume),
            mean_delay: format_measure(r.mean_delay, 1),
            delayed_ratio: format_pct(r.delayed_ratio),
            total_cost: brl(Measure::Value(r.total_cost), 0),
            flag: if r.delayed { "DELAYED" } else { "OK" }.to_string(),
        })
        .collect()
}

pub fn cost_efficiency_rows(rows: &[HubCostEfficiency]) -> Vec<CostEfficiencyRow> {
    rows.iter()
        .map(|e| CostEfficiencyRow {
            hub: e.hub.clone(),
            total_cost: format_number(e.total_cost, 2),
            mean_cost: format_measure(e.mean_cost, 2),
            volume: format_int(e.volume),
            otd_pct: format_measure(e.otd_ratio.pct(), 1),
            cost_per_on_time: format_measure(e.cost_per_on_time, 2),
        })
        .collect()
}

pub fn insight_rows(report: &InsightReport) -> Vec<InsightRow> {
    report
        .facts
        .iter()
        .chain(report.recommendations.iter())
        .map(|f| InsightRow {
            severity: f.severity.to_string(),
            title: f.title.clone(),
            text: f.text.clone(),
        })
        .collect()
}

/// Hub rows by carrier columns, one decimal; `-` where a pair has no deliveries.
pub fn heatmap_grid(grid: &BTreeMap<String, BTreeMap<String, Measure>>) -> Vec<Vec<String>> {
    let mut carriers: Vec<&String> = grid.values().flat_map(|row| row.keys()).collect();
    carriers.sort();
    carriers.dedup();

    let mut out = Vec::with_capacity(grid.len() + 1);
    let mut header = vec!["Hub".to_string()];
    header.extend(carriers.iter().map(|c| c.to_string()));
    out.push(header);
    for (hub, row) in grid {
        let mut line = vec![hub.clone()];
        line.extend(carriers.iter().map(|c| match row.get(*c) {
            Some(m) => format_measure(*m, 1),
            None => "-".to_string(),
        }));
        out.push(line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heatmap_fills_missing_pairs() {
        let mut grid: BTreeMap<String, BTreeMap<String, Measure>> = BTreeMap::new();
        grid.entry("Recife".into())
            .or_default()
            .insert("Loggi".into(), Measure::Value(1.26));
        grid.entry("Salvador".into())
            .or_default()
            .insert("Correios".into(), Measure::NoData);
        let rows = heatmap_grid(&grid);
        assert_eq!(rows[0], ["Hub", "Correios", "Loggi"]);
        assert_eq!(rows[1], ["Recife", "-", "1.3"]);
        assert_eq!(rows[2], ["Salvador", "n/a", "-"]);
    }

    #[test]
    fn hubs_render_busiest_first() {
        let hub = |name: &str, volume: usize| HubStats {
            hub: name.into(),
            volume,
            otd_ratio: Measure::Value(0.75),
            mean_lead: Measure::Value(2.0),
            mean_cost: Measure::Value(100.0),
            otd_severity: crate::severity::Severity::Good,
            location: None,
        };
        let rows = hub_rows(&[hub("Curitiba", 2), hub("Recife", 9)]);
        assert_eq!(rows[0].hub, "Recife");
        assert_eq!(rows[0].otd, "75.0%");
        assert_eq!(rows[0].band, "good");
        assert_eq!(rows[1].mean_cost, "R$ 100");
    }
}
