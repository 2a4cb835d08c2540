use crate::groups::round_one_decimal;
use crate::models::{GroupBucket, Insight, InsightCategory, KpiSummary, TenureBand};

pub fn generate(
    kpi: &KpiSummary,
    by_department: &[GroupBucket],
    by_tenure: &[GroupBucket],
) -> Vec<Insight> {
    let mut insights = Vec::with_capacity(4);

    insights.push(Insight {
        category: InsightCategory::HighRiskAlert,
        text: format!(
            "{} employees are at high risk of churning. Immediate intervention recommended.",
            kpi.high_risk_count
        ),
        value: Some(kpi.high_risk_count as f64),
    });

    if let Some(focus) = riskiest_bucket(by_department) {
        insights.push(Insight {
            category: InsightCategory::DepartmentFocus,
            text: format!(
                "{} department shows highest churn risk ({:.1}% average).",
                focus.key, focus.average_churn_probability_percent
            ),
            value: Some(focus.average_churn_probability_percent),
        });
    }

    let first_year = TenureBand::FirstYear.label();
    insights.push(Insight {
        category: InsightCategory::TenurePattern,
        text: format!("New employees ({first_year}) require additional support and engagement."),
        value: by_tenure
            .iter()
            .find(|bucket| bucket.key == first_year)
            .map(|bucket| bucket.average_churn_probability_percent),
    });

    let retention = round_one_decimal((1.0 - kpi.average_churn_probability) * 100.0);
    insights.push(Insight {
        category: InsightCategory::RetentionRate,
        text: format!(
            "{retention:.1}% average retention probability across all employees."
        ),
        value: Some(retention),
    });

    insights
}

/// First bucket reaching the maximum wins ties.
fn riskiest_bucket(buckets: &[GroupBucket]) -> Option<&GroupBucket> {
    buckets.iter().fold(None, |best: Option<&GroupBucket>, bucket| match best {
        Some(current)
            if current.average_churn_probability_percent
                >= bucket.average_churn_probability_percent =>
        {
            Some(current)
        }
        _ => Some(bucket),
    })
}
