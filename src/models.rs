use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub employee_id: String,
    pub name: Option<String>,
    pub department: String,
    pub tenure_months: i64,
    pub satisfaction_level: f64,
    pub churn_probability: f64,
    /// Label reported by the prediction service, e.g. "High Risk".
    pub status: Option<String>,
    pub performance_score: Option<f64>,
    pub promoted_last_five_years: Option<bool>,
}

impl EmployeeRecord {
    pub fn new(
        employee_id: impl Into<String>,
        department: impl Into<String>,
        tenure_months: i64,
        satisfaction_level: f64,
        churn_probability: f64,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            name: None,
            department: department.into(),
            tenure_months,
            satisfaction_level,
            churn_probability,
            status: None,
            performance_score: None,
            promoted_last_five_years: None,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.employee_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
    /// Only produced by label classification when no label was reported.
    Unknown,
}

impl RiskTier {
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low Risk",
            RiskTier::Medium => "Medium Risk",
            RiskTier::High => "High Risk",
            RiskTier::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSummary {
    pub total_count: usize,
    pub average_churn_probability: f64,
    pub average_satisfaction: f64,
    pub high_risk_count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskDistribution {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl RiskDistribution {
    pub fn total(&self) -> usize {
        self.low + self.medium + self.high
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupBucket {
    pub key: String,
    pub count: usize,
    pub average_churn_probability_percent: f64,
}

/// Ordinal tenure ranges used by the tenure chart. Upper bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenureBand {
    FirstYear,
    SecondYear,
    ThirdYear,
    Veteran,
}

impl TenureBand {
    pub const ALL: [TenureBand; 4] = [
        TenureBand::FirstYear,
        TenureBand::SecondYear,
        TenureBand::ThirdYear,
        TenureBand::Veteran,
    ];

    pub fn for_months(months: i64) -> Self {
        match months {
            i64::MIN..=12 => TenureBand::FirstYear,
            13..=24 => TenureBand::SecondYear,
            25..=36 => TenureBand::ThirdYear,
            _ => TenureBand::Veteran,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TenureBand::FirstYear => "0-12 months",
            TenureBand::SecondYear => "13-24 months",
            TenureBand::ThirdYear => "25-36 months",
            TenureBand::Veteran => "37+ months",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            TenureBand::FirstYear => 0,
            TenureBand::SecondYear => 1,
            TenureBand::ThirdYear => 2,
            TenureBand::Veteran => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InsightCategory {
    HighRiskAlert,
    DepartmentFocus,
    TenurePattern,
    RetentionRate,
}

impl InsightCategory {
    pub fn title(&self) -> &'static str {
        match self {
            InsightCategory::HighRiskAlert => "High Risk Alert",
            InsightCategory::DepartmentFocus => "Department Focus",
            InsightCategory::TenurePattern => "Tenure Pattern",
            InsightCategory::RetentionRate => "Retention Rate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub category: InsightCategory,
    pub text: String,
    /// The number the text was built from, when there is one.
    pub value: Option<f64>,
}
