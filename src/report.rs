use std::fmt::Write;

use chrono::NaiveDate;

use crate::dashboard::DashboardSnapshot;
use crate::groups;

pub fn build_report(scope: Option<&str>, generated_on: NaiveDate, snapshot: &DashboardSnapshot) -> String {
    let mut output = String::new();
    let scope_label = scope.unwrap_or("all departments");
    let kpi = &snapshot.kpi;

    let _ = writeln!(output, "# Employee Churn Risk Report");
    let _ = writeln!(output, "Generated for {} on {}", scope_label, generated_on);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Key Figures");
    let _ = writeln!(output, "- Total employees: {}", kpi.total_count);
    let _ = writeln!(
        output,
        "- Average churn risk: {:.1}%",
        kpi.average_churn_probability * 100.0
    );
    let _ = writeln!(output, "- High risk employees: {}", kpi.high_risk_count);
    let _ = writeln!(
        output,
        "- Average satisfaction: {:.0}%",
        kpi.average_satisfaction * 100.0
    );

    let distribution = &snapshot.risk_distribution;
    let _ = writeln!(output);
    let _ = writeln!(output, "## Risk Distribution");
    let _ = writeln!(output, "- Low Risk: {}", distribution.low);
    let _ = writeln!(output, "- Medium Risk: {}", distribution.medium);
    let _ = writeln!(output, "- High Risk: {}", distribution.high);

    let mut departments = snapshot.by_department.clone();
    groups::sort_by_risk(&mut departments);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Churn Risk by Department");

    if departments.is_empty() {
        let _ = writeln!(output, "No employee records loaded.");
    } else {
        for bucket in departments.iter() {
            let _ = writeln!(
                output,
                "- {}: {:.1}% average risk across {} employees",
                bucket.key, bucket.average_churn_probability_percent, bucket.count
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Churn Risk by Tenure");
    for bucket in snapshot.by_tenure.iter() {
        let _ = writeln!(
            output,
            "- {}: {:.1}% ({} employees)",
            bucket.key, bucket.average_churn_probability_percent, bucket.count
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Key Insights");
    for insight in snapshot.insights.iter() {
        let _ = writeln!(output, "- **{}**: {}", insight.category.title(), insight.text);
    }

    output
}
