//! One full pass of the aggregation and insight stages over a view.

use crate::aggregate::{
    by_carrier, by_hub, by_hub_carrier, by_route, cost_efficiency, delay_heatmap,
    monthly_by_carrier, overview, CarrierStats, HubCarrierStats, HubCostEfficiency, HubStats,
    MonthlyPoint, Overview, RouteReport,
};
use crate::filter::FilteredView;
use crate::insights::{select_insights, InsightReport};
use crate::types::Measure;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub overview: Overview,
    pub carriers: Vec<CarrierStats>,
    pub hubs: Vec<HubStats>,
    pub hub_carrier: Vec<HubCarrierStats>,
    pub delay_heatmap: BTreeMap<String, BTreeMap<String, Measure>>,
    pub monthly: Vec<MonthlyPoint>,
    pub routes: RouteReport,
    pub cost_efficiency: Vec<HubCostEfficiency>,
    /// `None` when the view is empty.
    pub insights: Option<InsightReport>,
}

impl Analysis {
    pub fn run(view: &FilteredView) -> Self {
        let carriers = by_carrier(view);
        let hubs = by_hub(view);
        let hub_carrier = by_hub_carrier(view);
        let insights = select_insights(&carriers, &hubs, &hub_carrier);
        Analysis {
            overview: overview(view),
            delay_heatmap: delay_heatmap(&hub_carrier),
            monthly: monthly_by_carrier(view),
            routes: by_route(view),
            cost_efficiency: cost_efficiency(view),
            carriers,
            hubs,
            hub_carrier,
            insights,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.overview.total_orders == 0
    }
}
