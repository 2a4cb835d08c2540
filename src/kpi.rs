use tracing::debug;

use crate::error::EngineResult;
use crate::models::{EmployeeRecord, KpiSummary, RiskDistribution, RiskTier};
use crate::risk;

pub fn summarize(records: &[EmployeeRecord]) -> EngineResult<KpiSummary> {
    let mut total_churn = 0.0;
    let mut total_satisfaction = 0.0;
    let mut high_risk_count = 0usize;

    for record in records {
        if risk::classify_record(record)? == RiskTier::High {
            high_risk_count += 1;
        }
        total_churn += record.churn_probability;
        total_satisfaction += record.satisfaction_level;
    }

    let total_count = records.len();
    debug!(total_count, high_risk_count, "summarized records");

    Ok(KpiSummary {
        total_count,
        average_churn_probability: mean(total_churn, total_count),
        average_satisfaction: mean(total_satisfaction, total_count),
        high_risk_count,
    })
}

pub fn risk_distribution(records: &[EmployeeRecord]) -> EngineResult<RiskDistribution> {
    let mut distribution = RiskDistribution::default();

    for record in records {
        match risk::classify_record(record)? {
            RiskTier::Low => distribution.low += 1,
            RiskTier::Medium => distribution.medium += 1,
            RiskTier::High => distribution.high += 1,
            RiskTier::Unknown => {}
        }
    }

    Ok(distribution)
}

/// Zero when there is nothing to average.
pub(crate) fn mean(total: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}
