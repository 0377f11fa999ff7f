use crate::infra::{build_service, parse_date};
use chrono::NaiveDate;
use clap::Args;
use groundwater_ai::config::AppConfig;
use groundwater_ai::crisis::{AlertDigest, AssessmentRequest, CrisisReport, Strategy};
use groundwater_ai::error::AppError;
use groundwater_ai::indicators::{
    GroundwaterTrend, IndicatorOverrides, LevelType, LocationId, WaterQuality,
};

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// State, city or district name (case-insensitive)
    pub(crate) location: String,
    /// Level type of the location: state, city or district
    #[arg(long, default_value = "district", value_parser = parse_level)]
    pub(crate) level: LevelType,
    /// Scoring strategy (defaults to the configured strategy)
    #[arg(long, value_parser = parse_strategy)]
    pub(crate) strategy: Option<Strategy>,
    /// Score as if observed on this date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// What-if water level in metres below ground
    #[arg(long)]
    pub(crate) water_level: Option<f64>,
    /// What-if annual rainfall in mm
    #[arg(long)]
    pub(crate) rainfall: Option<f64>,
    /// What-if extractable resource in ham
    #[arg(long)]
    pub(crate) resource: Option<f64>,
    /// What-if extraction in ham
    #[arg(long)]
    pub(crate) extraction: Option<f64>,
    /// What-if quality label (Excellent, Good, Moderate, Poor, Critical)
    #[arg(long, value_parser = parse_quality)]
    pub(crate) quality: Option<WaterQuality>,
    /// What-if trend label (Improving, Stable, Declining)
    #[arg(long, value_parser = parse_trend)]
    pub(crate) trend: Option<GroundwaterTrend>,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

impl AssessArgs {
    fn overrides(&self) -> IndicatorOverrides {
        IndicatorOverrides {
            water_level_m: self.water_level,
            rainfall_mm: self.rainfall,
            resource_ham: self.resource,
            extraction_ham: self.extraction,
            quality: self.quality,
            trend: self.trend,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct AlertsArgs {
    /// Level type to scan: state, city or district
    #[arg(long, default_value = "district", value_parser = parse_level)]
    pub(crate) level: LevelType,
    /// Scoring strategy (defaults to the configured strategy)
    #[arg(long, value_parser = parse_strategy)]
    pub(crate) strategy: Option<Strategy>,
}

pub(crate) async fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_service(&config)?;

    let mut request = AssessmentRequest::new(LocationId::new(&args.location), args.level)
        .with_overrides(args.overrides());
    if let Some(strategy) = args.strategy {
        request = request.with_strategy(strategy);
    }
    if let Some(date) = args.as_of {
        request = request.as_of(date);
    }

    let report = service.assess(request).await?;
    if args.json {
        let body = serde_json::to_string_pretty(&report)
            .map_err(std::io::Error::other)?;
        println!("{body}");
    } else {
        for line in render_assessment(&report) {
            println!("{line}");
        }
    }
    Ok(())
}

pub(crate) async fn run_alerts(args: AlertsArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_service(&config)?;
    let digest = service.alerts(args.level, args.strategy).await?;

    for line in render_alerts(&digest, args.level) {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn render_assessment(report: &CrisisReport) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Groundwater crisis assessment: {} ({})",
            report.location, report.level_type
        ),
        format!(
            "- Severity {} | {} days to crisis (around {})",
            report.severity, report.days_to_crisis, report.crisis_date
        ),
        format!(
            "- Probability {:.0}% | confidence {:.0}% | combined risk {:.3}",
            report.probability * 100.0,
            report.confidence * 100.0,
            report.combined_risk
        ),
        format!(
            "- Strategy {} decided by {}",
            report.strategy,
            report.decided_by.source_tag()
        ),
    ];

    let indicators = &report.indicators;
    let mut figures = Vec::new();
    if let Some(level) = indicators.water_level_m {
        figures.push(format!("water level {level:.1} m"));
    }
    if let Some(ratio) = indicators.extraction_ratio() {
        figures.push(format!("extraction ratio {ratio:.2}"));
    }
    if let Some(rainfall) = indicators.rainfall_mm {
        figures.push(format!("rainfall {rainfall:.0} mm"));
    }
    figures.push(format!("quality {}", indicators.quality.label()));
    figures.push(format!("trend {}", indicators.trend.label()));
    lines.push(format!("- Indicators: {}", figures.join(" | ")));

    lines.push("Recommendations:".to_string());
    lines.extend(
        report
            .recommendations
            .iter()
            .map(|recommendation| format!("  - {recommendation}")),
    );

    let sources: Vec<&str> = report.data_sources.iter().map(String::as_str).collect();
    lines.push(format!("Data sources: {}", sources.join(", ")));
    lines
}

pub(crate) fn render_alerts(digest: &AlertDigest, level: LevelType) -> Vec<String> {
    let mut lines = vec![format!(
        "Crisis alerts for {} level: {} of {} assessed ({} critical)",
        level, digest.total_alerts, digest.assessed, digest.critical_count
    )];

    if digest.alerts.is_empty() {
        lines.push("- No High or Critical locations".to_string());
        return lines;
    }

    for alert in &digest.alerts {
        let water_level = alert
            .water_level_m
            .map(|level| format!("{level:.1} m"))
            .unwrap_or_else(|| "n/a".to_string());
        lines.push(format!(
            "- {} [{}] {} days | probability {:.0}% | water level {}",
            alert.location,
            alert.severity,
            alert.days_to_crisis,
            alert.probability * 100.0,
            water_level
        ));
        if let Some(first) = alert.recommendations.first() {
            lines.push(format!("    next step: {first}"));
        }
    }
    lines
}

fn parse_level(raw: &str) -> Result<LevelType, String> {
    LevelType::parse(raw).ok_or_else(|| format!("unknown level type '{raw}'"))
}

fn parse_strategy(raw: &str) -> Result<Strategy, String> {
    Strategy::parse(raw).ok_or_else(|| format!("unknown strategy '{raw}'"))
}

fn parse_quality(raw: &str) -> Result<WaterQuality, String> {
    match WaterQuality::from_label(raw) {
        WaterQuality::Unknown => Err(format!("unknown quality '{raw}'")),
        quality => Ok(quality),
    }
}

fn parse_trend(raw: &str) -> Result<GroundwaterTrend, String> {
    match GroundwaterTrend::from_label(raw) {
        GroundwaterTrend::Unknown => Err(format!("unknown trend '{raw}'")),
        trend => Ok(trend),
    }
}
