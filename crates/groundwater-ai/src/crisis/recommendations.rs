use super::domain::Severity;

/// Days at or under which the timeline line switches to an action deadline.
pub const ACTION_WINDOW_DAYS: u32 = 30;

const CRITICAL_ACTIONS: [&str; 5] = [
    "IMMEDIATE ACTION REQUIRED",
    "Implement emergency water rationing",
    "Activate alternative water sources",
    "Issue public water conservation alerts",
    "Coordinate with neighboring districts for water sharing",
];

const HIGH_ACTIONS: [&str; 5] = [
    "URGENT PREPARATION NEEDED",
    "Begin water conservation campaigns",
    "Check and repair water infrastructure",
    "Prepare emergency water distribution plans",
    "Monitor groundwater levels daily",
];

const MODERATE_ACTIONS: [&str; 5] = [
    "PROACTIVE MEASURES RECOMMENDED",
    "Increase public awareness about water conservation",
    "Optimize irrigation schedules for farmers",
    "Implement rainwater harvesting programs",
    "Regular monitoring of water sources",
];

const LOW_ACTIONS: [&str; 5] = [
    "MAINTAIN CURRENT PRACTICES",
    "Continue regular water monitoring",
    "Promote sustainable water usage",
    "Maintain water infrastructure",
    "Prepare for seasonal variations",
];

/// Ordered action statements for a severity tier, most urgent first, closing with a timeline.
pub fn recommendations_for(severity: Severity, days_to_crisis: u32) -> Vec<String> {
    let actions: &[&str] = match severity {
        Severity::Critical => &CRITICAL_ACTIONS,
        Severity::High => &HIGH_ACTIONS,
        Severity::Moderate => &MODERATE_ACTIONS,
        Severity::Low => &LOW_ACTIONS,
    };

    let mut recommendations: Vec<String> = actions.iter().map(|line| line.to_string()).collect();
    recommendations.push(timeline(days_to_crisis));
    recommendations
}

fn timeline(days: u32) -> String {
    if days <= ACTION_WINDOW_DAYS {
        format!("Timeline: Action needed within {days} days")
    } else {
        format!("Timeline: Monitor and prepare over next {days} days")
    }
}
