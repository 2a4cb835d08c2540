use serde::Serialize;

use crate::error::EngineResult;
use crate::models::{EmployeeRecord, GroupBucket, Insight, KpiSummary, RiskDistribution};
use crate::{groups, insights, kpi};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub kpi: KpiSummary,
    pub risk_distribution: RiskDistribution,
    pub by_department: Vec<GroupBucket>,
    pub by_tenure: Vec<GroupBucket>,
    pub insights: Vec<Insight>,
}

pub fn build_dashboard(records: &[EmployeeRecord]) -> EngineResult<DashboardSnapshot> {
    let kpi = kpi::summarize(records)?;
    let risk_distribution = kpi::risk_distribution(records)?;
    let by_department = groups::group_by_department(records)?;
    let by_tenure = groups::group_by_tenure(records)?;
    let insights = insights::generate(&kpi, &by_department, &by_tenure);

    Ok(DashboardSnapshot {
        kpi,
        risk_distribution,
        by_department,
        by_tenure,
        insights,
    })
}
