//! Arrow IPC file encoding with schemas traced from fixed per-table rows.

use super::samples::SchemaSamples;
use super::ExportError;
use arrow_ipc::writer::FileWriter;
use arrow_schema::FieldRef;
use serde_arrow::schema::{SchemaLike, TracingOptions};

pub(crate) fn write_ipc<T: SchemaSamples>(rows: &[T]) -> Result<Vec<u8>, ExportError> {
    // Dates serialize as strings, so samples rather than `from_type`.
    let fields = Vec::<FieldRef>::from_samples(&T::schema_samples(), TracingOptions::default())
        .map_err(|err| ExportError::Columnar(format!("schema trace failed: {err}")))?;
    let batch = serde_arrow::to_record_batch(&fields, &rows)
        .map_err(|err| ExportError::Columnar(format!("record batch conversion failed: {err}")))?;

    let mut buffer = Vec::new();
    {
        let mut writer = FileWriter::try_new(&mut buffer, &batch.schema())
            .map_err(|err| ExportError::Columnar(format!("ipc writer init failed: {err}")))?;
        writer
            .write(&batch)
            .map_err(|err| ExportError::Columnar(format!("ipc write failed: {err}")))?;
        writer
            .finish()
            .map_err(|err| ExportError::Columnar(format!("ipc finish failed: {err}")))?;
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Compensation, EmployeeId, PerformanceReview};
    use arrow_ipc::reader::FileReader;
    use chrono::NaiveDate;
    use std::io::Cursor;

    fn read_back(bytes: Vec<u8>) -> (usize, usize) {
        let reader = FileReader::try_new(Cursor::new(bytes), None).expect("readable");
        let columns = reader.schema().fields().len();
        let rows = reader
            .map(|batch| batch.expect("batch decodes").num_rows())
            .sum();
        (columns, rows)
    }

    #[test]
    fn writes_a_readable_ipc_file() {
        let start = NaiveDate::from_ymd_opt(2023, 4, 1).expect("valid date");
        let rows = vec![
            Compensation {
                employee_id: EmployeeId::from("E000001"),
                base_salary: 82_000.0,
                currency: "USD".into(),
                start_date: start,
                change_reason: None,
            },
            Compensation {
                employee_id: EmployeeId::from("E000002"),
                base_salary: 91_500.0,
                currency: "USD".into(),
                start_date: start,
                change_reason: None,
            },
        ];

        let bytes = write_ipc(&rows).expect("encodes");
        assert!(bytes.starts_with(b"ARROW1"));
        assert_eq!(read_back(bytes), (5, 2));
    }

    #[test]
    fn empty_tables_keep_their_columns() {
        let rows: Vec<PerformanceReview> = Vec::new();
        let bytes = write_ipc(&rows).expect("encodes");
        assert_eq!(read_back(bytes), (3, 0));
    }
}
