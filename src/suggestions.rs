use crate::error::EngineResult;
use crate::models::{EmployeeRecord, RiskTier};
use crate::risk;

const PRIORITY_PERFORMANCE_SCORE: f64 = 4.0;
const PRIORITY_CHURN_PROBABILITY: f64 = 0.5;

/// Retention actions for a single employee, most urgent first.
pub fn retention_suggestions(record: &EmployeeRecord) -> EngineResult<Vec<String>> {
    let tier = risk::classify_record(record)?;
    let mut suggestions: Vec<&str> = Vec::new();

    if tier == RiskTier::High {
        suggestions.extend([
            "Immediate intervention required",
            "Schedule 1-on-1 meeting with manager",
            "Review compensation and benefits",
        ]);
    }

    if record.satisfaction_level < 0.5 {
        suggestions.extend([
            "Address job satisfaction concerns",
            "Consider role adjustment or new projects",
        ]);
    }

    let high_performer = record
        .performance_score
        .is_some_and(|score| score >= PRIORITY_PERFORMANCE_SCORE);
    if high_performer && record.churn_probability >= PRIORITY_CHURN_PROBABILITY {
        suggestions.extend([
            "High performer at risk - prioritize retention",
            "Discuss career growth opportunities",
        ]);
    }

    if record.tenure_months < 12 {
        suggestions.push("New employee - improve onboarding experience");
    }

    if record.promoted_last_five_years == Some(false) && record.tenure_months > 24 {
        suggestions.push("Consider promotion or career advancement");
    }

    if suggestions.is_empty() {
        suggestions.push("Employee appears stable - maintain engagement");
    }

    Ok(suggestions.into_iter().map(String::from).collect())
}
