use crate::error::{ReportError, Result};
use crate::hubs::is_known_hub;
use crate::types::{DeliveryRecord, RawRow};
use crate::validator::{validate_row, RowRejection};
use chrono::NaiveDate;
use csv::{Reader, ReaderBuilder};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

const REQUIRED_COLUMNS: [&str; 10] = [
    "pedido_id",
    "data_pedido",
    "data_entrega",
    "cidade_origem",
    "cidade_destino",
    "transportadora",
    "status_entrega",
    "prazo_estimado_dias",
    "prazo_real_dias",
    "custo_transporte",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub rejected_rows: usize,
    pub rejections: BTreeMap<RowRejection, usize>,
    /// Valid rows whose origin hub is outside the known registry.
    pub unknown_hub_rows: usize,
    /// Valid rows missing a hub, carrier or status; no selection matches them.
    pub unselectable_rows: usize,
}

impl LoadReport {
    /// Rows that could not be decoded as a CSV record at all.
    pub fn malformed_rows(&self) -> usize {
        self.rejections
            .get(&RowRejection::Malformed)
            .copied()
            .unwrap_or(0)
    }

    fn note_valid(&mut self, record: &DeliveryRecord) {
        self.valid_rows += 1;
        if record.origin_hub.as_deref().is_some_and(|h| !is_known_hub(h)) {
            self.unknown_hub_rows += 1;
        }
        if !record.is_selectable() {
            self.unselectable_rows += 1;
        }
    }
}

/// The validated, immutable working dataset.
///
/// Built once per load and handed by reference to every later stage.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<DeliveryRecord>,
    report: LoadReport,
}

impl Dataset {
    pub fn from_records(records: Vec<DeliveryRecord>) -> Self {
        let mut report = LoadReport {
            total_rows: records.len(),
            ..LoadReport::default()
        };
        for r in &records {
            report.note_valid(r);
        }
        Dataset { records, report }
    }

    pub fn records(&self) -> &[DeliveryRecord] {
        &self.records
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn carriers(&self) -> BTreeSet<String> {
        self.records.iter().filter_map(|r| r.carrier.clone()).collect()
    }

    pub fn hubs(&self) -> BTreeSet<String> {
        self.records.iter().filter_map(|r| r.origin_hub.clone()).collect()
    }

    pub fn statuses(&self) -> BTreeSet<String> {
        self.records.iter().filter_map(|r| r.delivery_status.clone()).collect()
    }

    /// Earliest and latest order date.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.order_date).min()?;
        let max = self.records.iter().map(|r| r.order_date).max()?;
        Some((min, max))
    }
}

pub fn load_and_clean(path: &Path, delimiter: u8) -> Result<Dataset> {
    if !path.is_file() {
        return Err(ReportError::data_unavailable(path, "file not found"));
    }
    let rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .map_err(|e| ReportError::data_unavailable(path, e))?;
    read_dataset(rdr, path)
}

/// Same as [`load_and_clean`] over any byte source.
pub fn load_from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Dataset> {
    let rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);
    read_dataset(rdr, Path::new("<reader>"))
}

fn read_dataset<R: Read>(mut rdr: Reader<R>, source: &Path) -> Result<Dataset> {
    let headers = rdr
        .headers()
        .map_err(|e| ReportError::data_unavailable(source, e))?
        .clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !headers.iter().any(|h| h.trim() == *c))
        .collect();
    if !missing.is_empty() {
        return Err(ReportError::data_unavailable(
            source,
            format!("missing columns: {}", missing.join(", ")),
        ));
    }

    let mut report = LoadReport::default();
    let mut records: Vec<DeliveryRecord> = Vec::new();

    for (idx, result) in rdr.deserialize::<RawRow>().enumerate() {
        report.total_rows += 1;
        let outcome = match result {
            Ok(row) => validate_row(row),
            Err(e) => {
                debug!(line = idx + 2, error = %e, "undecodable row");
                Err(RowRejection::Malformed)
            }
        };
        match outcome {
            Ok(record) => {
                report.note_valid(&record);
                records.push(record);
            }
            Err(reason) => {
                debug!(line = idx + 2, %reason, "row rejected");
                report.rejected_rows += 1;
                *report.rejections.entry(reason).or_insert(0) += 1;
            }
        }
    }

    info!(
        total = report.total_rows,
        valid = report.valid_rows,
        rejected = report.rejected_rows,
        "dataset loaded from {}",
        source.display()
    );
    if report.unknown_hub_rows > 0 {
        warn!(
            rows = report.unknown_hub_rows,
            "records ship from hubs outside the known registry"
        );
    }
    if report.unselectable_rows > 0 {
        warn!(
            rows = report.unselectable_rows,
            "records without hub, carrier or status are kept but never selected"
        );
    }
    if records.is_empty() {
        warn!(
            rejected = report.rejected_rows,
            "no valid delivery records in {}",
            source.display()
        );
    }

    Ok(Dataset { records, report })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "pedido_id;data_pedido;data_entrega;cidade_origem;cidade_destino;transportadora;status_entrega;prazo_estimado_dias;prazo_real_dias;custo_transporte\n";

    fn load(body: &str) -> Result<Dataset> {
        load_from_reader(format!("{HEADER}{body}").as_bytes(), b';')
    }

    #[test]
    fn drops_invalid_rows_and_counts_them() {
        let ds = load(
            "1;01/02/2024;03/02/2024;Recife;Alfa;Loggi;Entregue;3;2;10.5\n\
             2;bad-date;03/02/2024;Recife;Alfa;Loggi;Entregue;3;2;10.5\n\
             3;01/02/2024;;Recife;Beta;Jadlog;Em trânsito;3;;10.5\n\
             4;01/02/2024;05/02/2024;Recife;Beta;Jadlog;Entregue;3;4;n/d\n\
             5;09/03/2024;12/03/2024;Gotham;Beta;Jadlog;Entregue;;4;20\n",
        )
        .unwrap();
        let report = ds.report();
        assert_eq!(report.total_rows, 5);
        assert_eq!(report.valid_rows, 2);
        assert_eq!(report.rejected_rows, 3);
        assert_eq!(report.rejections[&RowRejection::MissingOrderDate], 1);
        assert_eq!(report.rejections[&RowRejection::MissingActualLead], 1);
        assert_eq!(report.rejections[&RowRejection::MissingFreightCost], 1);
        assert_eq!(report.unknown_hub_rows, 1);
        let ids: Vec<&str> = ds.records().iter().map(|r| r.order_id.as_str()).collect();
        assert_eq!(ids, ["1", "5"]);
    }

    #[test]
    fn observed_domain_is_sorted_and_distinct() {
        let ds = load(
            "1;01/02/2024;;Salvador;A;Loggi;Entregue;3;2;10\n\
             2;20/01/2024;;Recife;B;Correios;Atrasado;3;2;10\n\
             3;05/03/2024;;Recife;B;Loggi;Entregue;3;2;10\n",
        )
        .unwrap();
        assert_eq!(ds.carriers().into_iter().collect::<Vec<_>>(), ["Correios", "Loggi"]);
        assert_eq!(ds.hubs().into_iter().collect::<Vec<_>>(), ["Recife", "Salvador"]);
        assert_eq!(ds.statuses().len(), 2);
        let (from, to) = ds.date_span().unwrap();
        assert_eq!(from, NaiveDate::from_ymd_opt(2024, 1, 20).unwrap());
        assert_eq!(to, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }

    #[test]
    fn missing_columns_make_source_unavailable() {
        let err = load_from_reader("pedido_id;data_pedido\n1;01/01/2024\n".as_bytes(), b';')
            .unwrap_err();
        match err {
            ReportError::DataUnavailable { reason, .. } => assert!(reason.contains("custo_transporte")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn all_rows_rejected_yields_empty_dataset() {
        let ds = load("1;nope;;Recife;A;Loggi;Entregue;3;2;10\n").unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.report().total_rows, 1);
        assert_eq!(ds.report().rejected_rows, 1);
        assert_eq!(ds.report().rejections[&RowRejection::MissingOrderDate], 1);
        assert_eq!(ds.date_span(), None);
    }

    #[test]
    fn header_only_source_is_an_empty_dataset() {
        let ds = load("").unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.report(), &LoadReport::default());
    }

    #[test]
    fn undecodable_line_is_rejected_as_malformed() {
        let mut bytes = HEADER.as_bytes().to_vec();
        bytes.extend_from_slice(b"1;01/02/2024;;Recife;A;Lo\xffgi;Entregue;3;2;10\n");
        bytes.extend_from_slice(b"2;01/02/2024;;Recife;A;Loggi;Entregue;3;2;10\n");
        let ds = load_from_reader(bytes.as_slice(), b';').unwrap();
        assert_eq!(ds.report().total_rows, 2);
        assert_eq!(ds.report().malformed_rows(), 1);
        assert_eq!(ds.report().rejections[&RowRejection::Malformed], 1);
        assert_eq!(ds.records()[0].order_id, "2");
    }

    #[test]
    fn blank_dimensions_stay_out_of_the_observed_domain() {
        let ds = load(
            "1;01/02/2024;;Recife;A;Loggi;Entregue;3;2;10\n\
             2;02/02/2024;;Recife;A;;Entregue;3;4;999\n\
             3;03/02/2024;;;A;Jadlog;;3;4;50\n",
        )
        .unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.report().unselectable_rows, 2);
        assert_eq!(ds.carriers().into_iter().collect::<Vec<_>>(), ["Jadlog", "Loggi"]);
        assert_eq!(ds.hubs().into_iter().collect::<Vec<_>>(), ["Recife"]);
        assert_eq!(ds.statuses().into_iter().collect::<Vec<_>>(), ["Entregue"]);
    }

    #[test]
    fn missing_file_is_unavailable() {
        let err = load_and_clean(Path::new("/definitely/not/here.csv"), b';').unwrap_err();
        assert!(matches!(err, ReportError::DataUnavailable { .. }));
    }
}
