use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::models::{EmployeeRecord, RiskTier};
use crate::risk;

/// Column layout of the `employees.csv` export served by the records API.
#[derive(Debug, Deserialize)]
struct CsvRow {
    employee_id: String,
    #[serde(default)]
    name: Option<String>,
    department: String,
    tenure: i64,
    satisfaction_level: f64,
    churn_probability: f64,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    performance_score: Option<f64>,
    #[serde(default)]
    promotion_last_5years: Option<u8>,
}

impl From<CsvRow> for EmployeeRecord {
    fn from(row: CsvRow) -> Self {
        let mut record = EmployeeRecord::new(
            row.employee_id,
            row.department,
            row.tenure,
            row.satisfaction_level,
            row.churn_probability,
        );
        record.name = row.name.filter(|name| !name.trim().is_empty());
        record.status = row.status;
        record.performance_score = row.performance_score;
        record.promoted_last_five_years = row.promotion_last_5years.map(|flag| flag != 0);
        record
    }
}

pub fn load_csv(csv_path: &Path) -> anyhow::Result<Vec<EmployeeRecord>> {
    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        let line = index + 2;
        let record = EmployeeRecord::from(result.with_context(|| format!("malformed row at line {line}"))?);

        risk::validate_record(&record).with_context(|| format!("rejected row at line {line}"))?;
        if !seen.insert(record.employee_id.clone()) {
            bail!("duplicate employee_id {} at line {line}", record.employee_id);
        }

        records.push(record);
    }

    info!(count = records.len(), path = %csv_path.display(), "loaded employee records");
    Ok(records)
}

#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub department: Option<String>,
    pub risk: Option<RiskTier>,
    pub search: Option<String>,
}

pub fn filter_records(
    records: &[EmployeeRecord],
    filter: &RecordFilter,
) -> EngineResult<Vec<EmployeeRecord>> {
    let search = filter.search.as_deref().map(str::to_lowercase);
    let mut matched = Vec::new();

    for record in records {
        if let Some(department) = filter.department.as_deref() {
            if !record.department.eq_ignore_ascii_case(department) {
                continue;
            }
        }
        if let Some(tier) = filter.risk {
            if risk::classify_record(record)? != tier {
                continue;
            }
        }
        if let Some(needle) = search.as_deref() {
            let in_name = record
                .name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(needle));
            if !in_name && !record.employee_id.to_lowercase().contains(needle) {
                continue;
            }
        }
        matched.push(record.clone());
    }

    debug!(matched = matched.len(), total = records.len(), "filtered records");
    Ok(matched)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
}

/// Pages are 1-based; a page past the end is empty.
pub fn paginate<T: Clone>(items: &[T], page: usize, limit: usize) -> EngineResult<Page<T>> {
    if page == 0 {
        return Err(EngineError::invalid("page", "pages start at 1"));
    }
    if limit == 0 {
        return Err(EngineError::invalid("limit", "must be at least 1"));
    }

    let total = items.len();
    let start = (page - 1).saturating_mul(limit).min(total);
    let end = start.saturating_add(limit).min(total);

    Ok(Page {
        items: items[start..end].to_vec(),
        total,
        page,
        limit,
        total_pages: total.div_ceil(limit),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_rows_with_optional_columns() {
        let file = write_csv(
            "employee_id,name,department,tenure,satisfaction_level,churn_probability,status,performance_score,promotion_last_5years,monthly_salary\n\
             E001,Avery Lee,Sales,8,0.42,0.81,High Risk,4.2,0,5200\n\
             E002,,Engineering,40,0.9,0.12,Low Risk,,,6100\n",
        );
        let records = load_csv(file.path()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].display_name(), "Avery Lee");
        assert_eq!(records[0].promoted_last_five_years, Some(false));
        assert_eq!(records[0].performance_score, Some(4.2));
        assert_eq!(records[1].display_name(), "E002");
        assert_eq!(records[1].performance_score, None);
        assert_eq!(records[1].tenure_months, 40);
    }

    #[test]
    fn minimal_columns_are_enough() {
        let file = write_csv(
            "employee_id,department,tenure,satisfaction_level,churn_probability\n\
             E1,Ops,3,0.5,0.5\n",
        );
        let records = load_csv(file.path()).unwrap();
        assert_eq!(records[0].status, None);
        assert_eq!(records[0].promoted_last_five_years, None);
    }

    #[test]
    fn rejects_duplicates_and_out_of_range_rows() {
        let duplicate = write_csv(
            "employee_id,department,tenure,satisfaction_level,churn_probability\n\
             E1,Ops,3,0.5,0.5\n\
             E1,Ops,4,0.5,0.5\n",
        );
        let err = load_csv(duplicate.path()).unwrap_err();
        assert!(err.to_string().contains("duplicate employee_id E1 at line 3"));

        let out_of_range = write_csv(
            "employee_id,department,tenure,satisfaction_level,churn_probability\n\
             E1,Ops,3,0.5,1.5\n",
        );
        let err = load_csv(out_of_range.path()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
        assert!(err.downcast_ref::<EngineError>().is_some());
    }

    fn sample() -> Vec<EmployeeRecord> {
        let mut first = EmployeeRecord::new("E001", "Sales", 5, 0.5, 0.9);
        first.name = Some("Avery Lee".to_string());
        let mut second = EmployeeRecord::new("E002", "Engineering", 20, 0.7, 0.45);
        second.name = Some("Jules Moreno".to_string());
        let third = EmployeeRecord::new("E003", "sales", 30, 0.8, 0.1);
        vec![first, second, third]
    }

    #[test]
    fn filters_compose() {
        let records = sample();

        let sales = filter_records(
            &records,
            &RecordFilter { department: Some("SALES".to_string()), ..Default::default() },
        )
        .unwrap();
        assert_eq!(sales.len(), 2);

        let high_sales = filter_records(
            &records,
            &RecordFilter {
                department: Some("sales".to_string()),
                risk: Some(RiskTier::High),
                search: None,
            },
        )
        .unwrap();
        assert_eq!(high_sales.len(), 1);
        assert_eq!(high_sales[0].employee_id, "E001");

        let by_name = filter_records(
            &records,
            &RecordFilter { search: Some("moreno".to_string()), ..Default::default() },
        )
        .unwrap();
        assert_eq!(by_name[0].employee_id, "E002");

        let by_id = filter_records(
            &records,
            &RecordFilter { search: Some("e003".to_string()), ..Default::default() },
        )
        .unwrap();
        assert_eq!(by_id.len(), 1);
    }

    #[test]
    fn pagination_counts_pages() {
        let items: Vec<u32> = (1..=5).collect();

        let page = paginate(&items, 2, 2).unwrap();
        assert_eq!(page.items, vec![3, 4]);
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);

        assert_eq!(paginate(&items, 3, 2).unwrap().items, vec![5]);
        assert!(paginate(&items, 9, 2).unwrap().items.is_empty());
        assert_eq!(paginate::<u32>(&[], 1, 10).unwrap().total_pages, 0);
        assert!(paginate(&items, 0, 2).is_err());
        assert!(paginate(&items, 1, 0).is_err());
    }
}
