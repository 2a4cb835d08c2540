use crate::error::{check_unit_interval, EngineError, EngineResult};
use crate::models::{EmployeeRecord, RiskTier};

pub const HIGH_RISK_THRESHOLD: f64 = 0.7;
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.4;

pub fn classify(probability: f64) -> EngineResult<RiskTier> {
    let probability = check_unit_interval("churn_probability", probability)?;

    let tier = if probability >= HIGH_RISK_THRESHOLD {
        RiskTier::High
    } else if probability >= MEDIUM_RISK_THRESHOLD {
        RiskTier::Medium
    } else {
        RiskTier::Low
    };

    Ok(tier)
}

/// Classifies a status string reported by the prediction service.
pub fn classify_by_label(label: Option<&str>) -> RiskTier {
    let label = match label.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_lowercase(),
        _ => return RiskTier::Unknown,
    };

    if label.contains("high") {
        RiskTier::High
    } else if label.contains("medium") {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

/// Checks every field contract of a record and returns its numeric tier.
pub fn classify_record(record: &EmployeeRecord) -> EngineResult<RiskTier> {
    validate_record(record)?;
    classify(record.churn_probability).map_err(|err| err.for_employee(&record.employee_id))
}

pub fn validate_record(record: &EmployeeRecord) -> EngineResult<()> {
    let tag = |err: EngineError| err.for_employee(&record.employee_id);

    if record.department.trim().is_empty() {
        return Err(tag(EngineError::invalid("department", "must not be empty")));
    }
    if record.tenure_months < 0 {
        return Err(tag(EngineError::invalid(
            "tenure_months",
            format!("{} is negative", record.tenure_months),
        )));
    }
    check_unit_interval("satisfaction_level", record.satisfaction_level).map_err(tag)?;
    check_unit_interval("churn_probability", record.churn_probability).map_err(tag)?;
    if let Some(score) = record.performance_score {
        if !(score.is_finite() && (0.0..=5.0).contains(&score)) {
            return Err(tag(EngineError::invalid(
                "performance_score",
                format!("{score} is outside [0, 5]"),
            )));
        }
    }

    Ok(())
}
