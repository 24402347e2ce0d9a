//! Table downloads: CSV, Arrow IPC, and zipped bundles of every table.
//!
//! Columnar output is best effort. When the `columnar` feature is compiled
//! out, or the encoder rejects a table, callers asking for it receive CSV
//! instead and a warning is logged.

#[cfg(feature = "columnar")]
mod columnar;
mod samples;
mod zip;

use samples::SchemaSamples;

use crate::dataset::{HrDataset, TableName};
use mime::Mime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("unknown export format '{0}' (expected csv or arrow)")]
    UnknownFormat(String),
    #[error("table '{0}' is not present in this dataset")]
    MissingTable(TableName),
    #[error("csv encoding failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("io failure while encoding: {0}")]
    Io(#[from] std::io::Error),
    #[error("columnar export is not compiled into this build")]
    ColumnarUnavailable,
    #[error("columnar encoding failed: {0}")]
    Columnar(String),
    #[error("archive limit exceeded: {0}")]
    ArchiveTooLarge(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    #[serde(alias = "arrow")]
    Columnar,
}

impl ExportFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Columnar => "arrow",
        }
    }

    pub fn mime(self) -> Mime {
        match self {
            Self::Csv => mime::TEXT_CSV_UTF_8,
            Self::Columnar => mime::APPLICATION_OCTET_STREAM,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Csv => "csv",
            Self::Columnar => "columnar",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "arrow" | "ipc" | "columnar" => Ok(Self::Columnar),
            _ => Err(ExportError::UnknownFormat(value.to_string())),
        }
    }
}

/// Whether this build can write the columnar format at all.
pub const fn columnar_available() -> bool {
    cfg!(feature = "columnar")
}

/// One encoded file ready to hand to a client.
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub file_name: String,
    /// Format actually written, which differs from the request after a fallback.
    pub format: ExportFormat,
    pub mime: Mime,
    pub bytes: Vec<u8>,
}

/// Encode one table in exactly the requested format.
pub fn encode_table(
    dataset: &HrDataset,
    table: TableName,
    format: ExportFormat,
) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::Csv => with_rows(dataset, table, CsvEncoder),
        ExportFormat::Columnar => with_rows(dataset, table, ColumnarEncoder),
    }
}

/// Encode one table, falling back to CSV when the columnar path fails.
pub fn export_table(
    dataset: &HrDataset,
    table: TableName,
    format: ExportFormat,
) -> Result<Download, ExportError> {
    let (format, bytes) = match encode_table(dataset, table, format) {
        Ok(bytes) => (format, bytes),
        Err(err @ ExportError::MissingTable(_)) => return Err(err),
        Err(err) if format == ExportFormat::Columnar => {
            warn!(%table, error = %err, "columnar export failed, falling back to csv");
            (ExportFormat::Csv, encode_table(dataset, table, ExportFormat::Csv)?)
        }
        Err(err) => return Err(err),
    };

    Ok(Download {
        file_name: format!("{table}.{}", format.extension()),
        format,
        mime: format.mime(),
        bytes,
    })
}

/// Zip every present table into `hr_data_{ext}.zip` with `{table}.{ext}` entries.
///
/// A columnar request that fails for any table produces a CSV bundle, so the
/// archive never mixes formats.
pub fn bundle_archive(dataset: &HrDataset, format: ExportFormat) -> Result<Download, ExportError> {
    match encode_all(dataset, format) {
        Ok(files) => build_bundle(format, files),
        Err(err) if format == ExportFormat::Columnar => {
            warn!(error = %err, "columnar bundle failed, falling back to csv");
            build_bundle(ExportFormat::Csv, encode_all(dataset, ExportFormat::Csv)?)
        }
        Err(err) => Err(err),
    }
}

fn encode_all(
    dataset: &HrDataset,
    format: ExportFormat,
) -> Result<Vec<(TableName, Vec<u8>)>, ExportError> {
    dataset
        .tables()
        .into_iter()
        .map(|table| encode_table(dataset, table, format).map(|bytes| (table, bytes)))
        .collect()
}

fn build_bundle(
    format: ExportFormat,
    files: Vec<(TableName, Vec<u8>)>,
) -> Result<Download, ExportError> {
    let extension = format.extension();
    let entries: Vec<zip::ZipEntry<'_>> = files
        .iter()
        .map(|(table, bytes)| zip::ZipEntry {
            name: format!("{table}.{extension}"),
            payload: bytes,
        })
        .collect();
    let bytes = zip::build_zip(&entries)?;
    info!(tables = entries.len(), %format, bytes = bytes.len(), "built export bundle");

    Ok(Download {
        file_name: format!("hr_data_{extension}.zip"),
        format,
        mime: archive_mime(),
        bytes,
    })
}

fn archive_mime() -> Mime {
    "application/zip"
        .parse()
        .unwrap_or(mime::APPLICATION_OCTET_STREAM)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSize {
    pub table: TableName,
    pub csv_mb: f64,
    /// `None` when columnar export is compiled out; `0.0` when encoding failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columnar_mb: Option<f64>,
}

/// Encoded size of every table in each available format, in megabytes.
pub fn size_report(dataset: &HrDataset) -> Result<Vec<TableSize>, ExportError> {
    dataset
        .tables()
        .into_iter()
        .map(|table| -> Result<TableSize, ExportError> {
            let csv = encode_table(dataset, table, ExportFormat::Csv)?;
            let csv_mb = csv.len() as f64 / BYTES_PER_MB;
            let columnar_mb = columnar_available().then(|| {
                encode_table(dataset, table, ExportFormat::Columnar)
                    .map(|bytes| bytes.len() as f64 / BYTES_PER_MB)
                    .unwrap_or(0.0)
            });
            Ok(TableSize {
                table,
                csv_mb,
                columnar_mb,
            })
        })
        .collect()
}

/// Total megabytes for one format across all tables in a size report.
pub fn total_size_mb(report: &[TableSize], format: ExportFormat) -> f64 {
    report
        .iter()
        .map(|size| match format {
            ExportFormat::Csv => size.csv_mb,
            ExportFormat::Columnar => size.columnar_mb.unwrap_or(0.0),
        })
        .sum()
}

trait RowEncoder {
    fn encode<T: SchemaSamples>(&self, rows: &[T]) -> Result<Vec<u8>, ExportError>;
}

struct CsvEncoder;

impl RowEncoder for CsvEncoder {
    fn encode<T: SchemaSamples>(&self, rows: &[T]) -> Result<Vec<u8>, ExportError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in rows {
            writer.serialize(row)?;
        }
        writer
            .into_inner()
            .map_err(|err| ExportError::Io(err.into_error()))
    }
}

struct ColumnarEncoder;

impl RowEncoder for ColumnarEncoder {
    #[cfg(feature = "columnar")]
    fn encode<T: SchemaSamples>(&self, rows: &[T]) -> Result<Vec<u8>, ExportError> {
        columnar::write_ipc(rows)
    }

    #[cfg(not(feature = "columnar"))]
    fn encode<T: SchemaSamples>(&self, _rows: &[T]) -> Result<Vec<u8>, ExportError> {
        Err(ExportError::ColumnarUnavailable)
    }
}

fn with_rows<E: RowEncoder>(
    dataset: &HrDataset,
    table: TableName,
    encoder: E,
) -> Result<Vec<u8>, ExportError> {
    match table {
        TableName::Employee => encoder.encode(&dataset.employee),
        TableName::EmployeeJobAssignment => encoder.encode(&dataset.employee_job_assignment),
        TableName::EmployeeOrgAssignment => encoder.encode(&dataset.employee_org_assignment),
        TableName::EmployeeCompensation => dataset
            .employee_compensation
            .as_deref()
            .ok_or(ExportError::MissingTable(table))
            .and_then(|rows| encoder.encode(rows)),
        TableName::EmployeePerformance => dataset
            .employee_performance
            .as_deref()
            .ok_or(ExportError::MissingTable(table))
            .and_then(|rows| encoder.encode(rows)),
        TableName::JobRole => encoder.encode(&dataset.job_role),
        TableName::OrganizationUnit => encoder.encode(&dataset.organization_unit),
        TableName::Location => encoder.encode(&dataset.location),
    }
}
