use super::{DatasetError, HrDataset, TableName};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use tracing::{debug, info};

/// Parse one table from CSV with headers matching the record field names.
pub fn parse_table<T, R>(table: TableName, reader: R) -> Result<Vec<T>, DatasetError>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.deserialize::<T>() {
        let row = record.map_err(|source| DatasetError::Csv { table, source })?;
        rows.push(row);
    }

    Ok(rows)
}

/// Load a dataset exported as `{table}.csv` files, e.g. by an external generator.
///
/// Compensation and performance files may be absent; every other table is required.
pub fn load_dataset_dir<P: AsRef<Path>>(dir: P) -> Result<HrDataset, DatasetError> {
    let dir = dir.as_ref();

    let dataset = HrDataset {
        employee: required(dir, TableName::Employee)?,
        employee_job_assignment: required(dir, TableName::EmployeeJobAssignment)?,
        employee_org_assignment: required(dir, TableName::EmployeeOrgAssignment)?,
        employee_compensation: optional(dir, TableName::EmployeeCompensation)?,
        employee_performance: optional(dir, TableName::EmployeePerformance)?,
        job_role: required(dir, TableName::JobRole)?,
        organization_unit: required(dir, TableName::OrganizationUnit)?,
        location: required(dir, TableName::Location)?,
    };

    info!(
        path = %dir.display(),
        employees = dataset.employee.len(),
        "loaded HR dataset from CSV directory"
    );
    Ok(dataset)
}

fn required<T: DeserializeOwned>(dir: &Path, table: TableName) -> Result<Vec<T>, DatasetError> {
    optional(dir, table)?.ok_or(DatasetError::MissingTable(table))
}

fn optional<T: DeserializeOwned>(
    dir: &Path,
    table: TableName,
) -> Result<Option<Vec<T>>, DatasetError> {
    let path = dir.join(format!("{table}.csv"));
    let file = match File::open(&path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(%table, "table file not present");
            return Ok(None);
        }
        Err(source) => return Err(DatasetError::Io { table, source }),
    };

    parse_table(table, file).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Employee, OrgAssignment};
    use std::io::Cursor;

    #[test]
    fn parses_blank_optional_columns_as_none() {
        let csv = "employee_id,first_name,last_name,gender,hire_date,termination_date,termination_reason,location_id,employment_type,manager_id\n\
                   E1, Ada ,Lovelace,Female,2019-04-01,,,L1,Full-time,\n\
                   E2,Alan,Turing,Male,2018-01-15,2023-05-31,Resignation,L2,Full-time,E1\n";

        let rows: Vec<Employee> =
            parse_table(TableName::Employee, Cursor::new(csv)).expect("employees parse");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].first_name, "Ada");
        assert_eq!(rows[0].termination_date, None);
        assert_eq!(rows[0].manager_id, None);
        assert_eq!(rows[1].termination_reason.as_deref(), Some("Resignation"));
        assert_eq!(rows[1].manager_id.as_ref().map(|id| id.as_str()), Some("E1"));
    }

    #[test]
    fn reports_table_name_on_malformed_rows() {
        let csv = "employee_id,org_id,business_unit,start_date,end_date\nE1,O1,Sales,not-a-date,\n";

        let err = parse_table::<OrgAssignment, _>(TableName::EmployeeOrgAssignment, Cursor::new(csv))
            .expect_err("bad date rejected");

        assert!(err.to_string().contains("employee_org_assignment"));
    }
}
