use std::collections::HashMap;

use tracing::debug;

use crate::error::EngineResult;
use crate::kpi::mean;
use crate::models::{EmployeeRecord, GroupBucket, TenureBand};
use crate::risk;

#[derive(Debug, Default)]
struct Accumulator {
    count: usize,
    total_churn: f64,
}

impl Accumulator {
    fn add(&mut self, churn_probability: f64) {
        self.count += 1;
        self.total_churn += churn_probability;
    }

    fn into_bucket(self, key: String) -> GroupBucket {
        GroupBucket {
            key,
            count: self.count,
            average_churn_probability_percent: round_one_decimal(
                mean(self.total_churn, self.count) * 100.0,
            ),
        }
    }
}

/// Buckets in the order each department first appears.
pub fn group_by_department(records: &[EmployeeRecord]) -> EngineResult<Vec<GroupBucket>> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Accumulator)> = Vec::new();

    for record in records {
        risk::classify_record(record)?;

        let position = *positions
            .entry(record.department.as_str())
            .or_insert_with(|| {
                groups.push((record.department.as_str(), Accumulator::default()));
                groups.len() - 1
            });
        groups[position].1.add(record.churn_probability);
    }

    debug!(departments = groups.len(), "grouped records by department");

    Ok(groups
        .into_iter()
        .map(|(department, acc)| acc.into_bucket(department.to_string()))
        .collect())
}

/// Always four buckets, in `TenureBand::ALL` order.
pub fn group_by_tenure(records: &[EmployeeRecord]) -> EngineResult<Vec<GroupBucket>> {
    let mut bands: [Accumulator; 4] = Default::default();

    for record in records {
        risk::classify_record(record)?;
        bands[TenureBand::for_months(record.tenure_months).index()].add(record.churn_probability);
    }

    Ok(TenureBand::ALL
        .iter()
        .zip(bands)
        .map(|(band, acc)| acc.into_bucket(band.label().to_string()))
        .collect())
}

/// Stable sort, highest average risk first.
pub fn sort_by_risk(buckets: &mut [GroupBucket]) {
    buckets.sort_by(|a, b| {
        b.average_churn_probability_percent
            .partial_cmp(&a.average_churn_probability_percent)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Rounds half away from zero.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(id: &str, department: &str, tenure: i64, churn: f64) -> EmployeeRecord {
        EmployeeRecord::new(id, department, tenure, 0.5, churn)
    }

    fn keys(buckets: &[GroupBucket]) -> Vec<&str> {
        buckets.iter().map(|bucket| bucket.key.as_str()).collect()
    }

    #[test]
    fn departments_keep_first_seen_order() {
        let records = vec![
            record("E1", "Sales", 5, 0.2),
            record("E2", "Engineering", 5, 0.9),
            record("E3", "Sales", 5, 0.4),
            record("E4", "HR", 5, 0.1),
        ];
        let buckets = group_by_department(&records).unwrap();

        assert_eq!(keys(&buckets), vec!["Sales", "Engineering", "HR"]);
        assert_eq!(buckets[0].count, 2);
        assert_eq!(buckets[0].average_churn_probability_percent, 30.0);
        assert_eq!(buckets[1].average_churn_probability_percent, 90.0);
    }

    #[test]
    fn department_percent_rounds_to_one_decimal() {
        let records = vec![
            record("E1", "Ops", 5, 0.1),
            record("E2", "Ops", 5, 0.2),
            record("E3", "Ops", 5, 0.2),
        ];
        let buckets = group_by_department(&records).unwrap();
        assert_eq!(buckets[0].average_churn_probability_percent, 16.7);
    }

    #[test]
    fn tenure_scenario_two_records() {
        let records = vec![record("E1", "Ops", 6, 0.8), record("E2", "Ops", 30, 0.2)];
        let buckets = group_by_tenure(&records).unwrap();

        assert_eq!(
            keys(&buckets),
            vec!["0-12 months", "13-24 months", "25-36 months", "37+ months"]
        );
        assert_eq!(buckets[0].average_churn_probability_percent, 80.0);
        assert_eq!(buckets[1].average_churn_probability_percent, 0.0);
        assert_eq!(buckets[2].average_churn_probability_percent, 20.0);
        assert_eq!(buckets[3].average_churn_probability_percent, 0.0);
        assert_eq!(buckets[1].count, 0);
    }

    #[test]
    fn tenure_upper_bounds_are_inclusive() {
        let records = vec![
            record("E1", "Ops", 0, 0.1),
            record("E2", "Ops", 12, 0.1),
            record("E3", "Ops", 13, 0.1),
            record("E4", "Ops", 24, 0.1),
            record("E5", "Ops", 36, 0.1),
            record("E6", "Ops", 37, 0.1),
        ];
        let counts: Vec<usize> = group_by_tenure(&records)
            .unwrap()
            .iter()
            .map(|bucket| bucket.count)
            .collect();
        assert_eq!(counts, vec![2, 2, 1, 1]);
    }

    #[test]
    fn empty_input_yields_zero_buckets() {
        assert!(group_by_department(&[]).unwrap().is_empty());

        let tenure = group_by_tenure(&[]).unwrap();
        assert_eq!(tenure.len(), 4);
        assert!(tenure
            .iter()
            .all(|bucket| bucket.count == 0 && bucket.average_churn_probability_percent == 0.0));
    }

    #[test]
    fn negative_tenure_is_rejected() {
        let records = vec![record("E1", "Ops", -3, 0.1)];
        assert!(group_by_tenure(&records).is_err());
        assert!(group_by_department(&records).is_err());
    }

    #[test]
    fn sort_by_risk_is_stable() {
        let mut buckets = group_by_department(&[
            record("E1", "A", 1, 0.2),
            record("E2", "B", 1, 0.5),
            record("E3", "C", 1, 0.2),
            record("E4", "D", 1, 0.5),
        ])
        .unwrap();
        sort_by_risk(&mut buckets);
        assert_eq!(keys(&buckets), vec!["B", "D", "A", "C"]);
    }

    #[test]
    fn rounding_goes_half_away_from_zero() {
        assert_eq!(round_one_decimal(12.25), 12.3);
        assert_eq!(round_one_decimal(0.05), 0.1);
        assert_eq!(round_one_decimal(99.94), 99.9);
    }

    fn arb_records() -> impl Strategy<Value = Vec<EmployeeRecord>> {
        prop::collection::vec(
            (
                prop::sample::select(vec!["Sales", "Engineering", "HR", "Support"]),
                0i64..120,
                0.0f64..=1.0,
            ),
            0..40,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (department, tenure, churn))| {
                    record(&format!("E{i}"), department, tenure, churn)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn department_counts_sum_to_record_count(records in arb_records()) {
            let total: usize = group_by_department(&records).unwrap().iter().map(|b| b.count).sum();
            prop_assert_eq!(total, records.len());
        }

        #[test]
        fn tenure_always_has_four_fixed_buckets(records in arb_records()) {
            let buckets = group_by_tenure(&records).unwrap();
            prop_assert_eq!(buckets.len(), 4);
            for (bucket, band) in buckets.iter().zip(TenureBand::ALL) {
                prop_assert_eq!(bucket.key.as_str(), band.label());
            }
            let total: usize = buckets.iter().map(|b| b.count).sum();
            prop_assert_eq!(total, records.len());
        }

        #[test]
        fn grouping_is_idempotent(records in arb_records()) {
            prop_assert_eq!(group_by_department(&records).unwrap(), group_by_department(&records).unwrap());
            prop_assert_eq!(group_by_tenure(&records).unwrap(), group_by_tenure(&records).unwrap());
        }
    }
}
