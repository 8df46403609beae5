use crate::analysis::Analysis;
use crate::constants::{
    REPORT_CARRIERS, REPORT_COST_EFFICIENCY, REPORT_HUB_CARRIER, REPORT_MONTHLY, REPORT_ROUTES,
    SUMMARY_JSON,
};
use crate::error::Result;
use crate::filter::FilterSpec;
use crate::loader::LoadReport;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{builder::Builder, settings::Style, Table, Tabled};
use tracing::info;

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

/// Preview a grid whose first row is the header.
pub fn preview_grid(grid: Vec<Vec<String>>) {
    if grid.len() < 2 {
        println!("(no rows)\n");
        return;
    }
    let mut builder = Builder::default();
    for line in grid {
        builder.push_record(line);
    }
    let table_str = builder.build().with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

#[derive(Debug, Serialize)]
pub struct Summary<'a> {
    pub load: &'a LoadReport,
    pub filter: &'a FilterSpec,
    #[serde(flatten)]
    pub analysis: &'a Analysis,
}

/// Write every report CSV plus `summary.json` into `out_dir`.
pub fn export_all(
    out_dir: &Path,
    load: &LoadReport,
    filter: &FilterSpec,
    analysis: &Analysis,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)?;
    let mut written = Vec::new();
    let mut emit = |name: &str| {
        let path = out_dir.join(name);
        written.push(path.clone());
        path
    };

    write_csv(&emit(REPORT_CARRIERS), &analysis.carriers)?;
    write_csv(&emit(REPORT_HUB_CARRIER), &analysis.hub_carrier)?;
    write_csv(&emit(REPORT_MONTHLY), &analysis.monthly)?;
    write_csv(&emit(REPORT_ROUTES), &analysis.routes.routes)?;
    write_csv(&emit(REPORT_COST_EFFICIENCY), &analysis.cost_efficiency)?;
    let summary = Summary {
        load,
        filter,
        analysis,
    };
    write_json(&emit(SUMMARY_JSON), &summary)?;

    info!(files = written.len(), "reports exported to {}", out_dir.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::CarrierStats;
    use crate::types::Measure;

    #[test]
    fn csv_leaves_no_data_cells_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("carriers.csv");
        let rows = vec![
            CarrierStats {
                carrier: "Loggi".into(),
                volume: 2,
                otd_ratio: Measure::Value(0.5),
                mean_lead: Measure::NoData,
                mean_cost: Measure::Undefined,
                total_cost: 30.0,
            },
        ];
        write_csv(&path, &rows).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("carrier,volume,otd_ratio,mean_lead,mean_cost,total_cost")
        );
        assert_eq!(lines.next(), Some("Loggi,2,0.5,,undefined,30.0"));
    }
}
