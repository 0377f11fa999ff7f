use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use super::classifier::baseline_days;
use super::domain::{Severity, Strategy};
use super::projection::ProjectionHorizon;
use super::recommendations::recommendations_for;
use super::service::{AssessmentError, AssessmentRequest, CrisisService};
use crate::indicators::{
    GroundwaterTrend, IndicatorOverrides, IndicatorProvider, LevelType, LocationId, WaterQuality,
};

/// Router builder exposing indicator lookups, crisis assessments, and forecasts.
pub fn crisis_router<P>(service: Arc<CrisisService<P>>) -> Router
where
    P: IndicatorProvider + 'static,
{
    Router::new()
        .route("/api/locations", get(locations_handler::<P>))
        .route("/api/groundwater/:location", get(indicators_handler::<P>))
        .route("/api/crisis/predict/:location", get(predict_handler::<P>))
        .route("/api/crisis/alerts", get(alerts_handler::<P>))
        .route("/api/crisis/recommendations", get(recommendations_handler))
        .route(
            "/api/predict/crisis-probability/:location",
            get(probability_handler::<P>),
        )
        .route(
            "/api/predict/water-levels/:location",
            get(projection_handler::<P>),
        )
        .route("/api/predict/compare", get(compare_handler::<P>))
        .route("/api/alerts", get(water_alerts_handler::<P>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LevelQuery {
    pub level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PredictQuery {
    pub level: Option<String>,
    pub strategy: Option<String>,
    pub water_level: Option<f64>,
    pub quality: Option<String>,
    pub trend: Option<String>,
    pub rainfall: Option<f64>,
    pub resource: Option<f64>,
    pub extraction: Option<f64>,
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AlertsQuery {
    pub level: Option<String>,
    pub strategy: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RecommendationsQuery {
    pub severity: Option<String>,
    pub days: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ProbabilityQuery {
    pub level: Option<String>,
    pub water_level: Option<f64>,
    pub quality: Option<String>,
    pub trend: Option<String>,
}

pub(crate) async fn locations_handler<P>(
    State(service): State<Arc<CrisisService<P>>>,
    query: Result<Query<LevelQuery>, QueryRejection>,
) -> Response
where
    P: IndicatorProvider + 'static,
{
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    let level = match parse_level(query.level.as_deref()) {
        Ok(level) => level,
        Err(response) => return response,
    };

    let locations = service.locations(level);
    let payload = json!({
        "level": level,
        "count": locations.len(),
        "locations": locations,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn indicators_handler<P>(
    State(service): State<Arc<CrisisService<P>>>,
    Path(location): Path<String>,
    query: Result<Query<LevelQuery>, QueryRejection>,
) -> Response
where
    P: IndicatorProvider + 'static,
{
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    let level = match parse_level(query.level.as_deref()) {
        Ok(level) => level,
        Err(response) => return response,
    };

    match service.indicators(&LocationId::new(&location), level) {
        Ok(indicators) => (StatusCode::OK, axum::Json(indicators)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn predict_handler<P>(
    State(service): State<Arc<CrisisService<P>>>,
    Path(location): Path<String>,
    query: Result<Query<PredictQuery>, QueryRejection>,
) -> Response
where
    P: IndicatorProvider + 'static,
{
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    let level = match parse_level(query.level.as_deref()) {
        Ok(level) => level,
        Err(response) => return response,
    };
    let strategy = match parse_strategy(query.strategy.as_deref()) {
        Ok(strategy) => strategy,
        Err(response) => return response,
    };
    let quality = match parse_quality(query.quality.as_deref()) {
        Ok(quality) => quality,
        Err(response) => return response,
    };
    let trend = match parse_trend(query.trend.as_deref()) {
        Ok(trend) => trend,
        Err(response) => return response,
    };

    let mut request = AssessmentRequest::new(LocationId::new(&location), level).with_overrides(
        IndicatorOverrides {
            water_level_m: query.water_level,
            rainfall_mm: query.rainfall,
            resource_ham: query.resource,
            extraction_ham: query.extraction,
            quality,
            trend,
        },
    );
    if let Some(strategy) = strategy {
        request = request.with_strategy(strategy);
    }
    if let Some(date) = query.as_of {
        request = request.as_of(date);
    }

    match service.assess(request).await {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn alerts_handler<P>(
    State(service): State<Arc<CrisisService<P>>>,
    query: Result<Query<AlertsQuery>, QueryRejection>,
) -> Response
where
    P: IndicatorProvider + 'static,
{
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    let level = match parse_level(query.level.as_deref()) {
        Ok(level) => level,
        Err(response) => return response,
    };
    let strategy = match parse_strategy(query.strategy.as_deref()) {
        Ok(strategy) => strategy,
        Err(response) => return response,
    };

    match service.alerts(level, strategy).await {
        Ok(digest) => (StatusCode::OK, axum::Json(digest)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn recommendations_handler(
    query: Result<Query<RecommendationsQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    let severity = match query.severity.as_deref().map(Severity::parse) {
        Some(Some(severity)) => severity,
        Some(None) => return bad_request("severity must be one of low, moderate, high, critical"),
        None => return bad_request("severity is required"),
    };
    let days = query.days.unwrap_or_else(|| baseline_days(severity));
    if days == 0 {
        return bad_request("days must be greater than zero");
    }

    let payload = json!({
        "severity": severity,
        "days_to_crisis": days,
        "recommendations": recommendations_for(severity, days),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn probability_handler<P>(
    State(service): State<Arc<CrisisService<P>>>,
    Path(location): Path<String>,
    query: Result<Query<ProbabilityQuery>, QueryRejection>,
) -> Response
where
    P: IndicatorProvider + 'static,
{
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    let level = match parse_level(query.level.as_deref()) {
        Ok(level) => level,
        Err(response) => return response,
    };
    let quality = match parse_quality(query.quality.as_deref()) {
        Ok(quality) => quality,
        Err(response) => return response,
    };
    let trend = match parse_trend(query.trend.as_deref()) {
        Ok(trend) => trend,
        Err(response) => return response,
    };

    let overrides = IndicatorOverrides {
        water_level_m: query.water_level,
        quality,
        trend,
        ..IndicatorOverrides::default()
    };

    match service.outlook(&LocationId::new(&location), level, &overrides) {
        Ok(outlook) => (StatusCode::OK, axum::Json(outlook)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ProjectionQuery {
    pub level: Option<String>,
    pub horizon: Option<String>,
    pub water_level: Option<f64>,
    pub as_of: Option<NaiveDate>,
}

pub(crate) async fn projection_handler<P>(
    State(service): State<Arc<CrisisService<P>>>,
    Path(location): Path<String>,
    query: Result<Query<ProjectionQuery>, QueryRejection>,
) -> Response
where
    P: IndicatorProvider + 'static,
{
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    let level = match parse_level(query.level.as_deref()) {
        Ok(level) => level,
        Err(response) => return response,
    };
    let horizon = match query.horizon.as_deref() {
        None => ProjectionHorizon::default(),
        Some(value) => match ProjectionHorizon::parse(value) {
            Some(horizon) => horizon,
            None => {
                return bad_request(format!(
                    "unknown horizon '{value}', expected short_term, medium_term or long_term"
                ))
            }
        },
    };

    match service.projection(
        &LocationId::new(&location),
        level,
        horizon,
        query.water_level,
        query.as_of,
    ) {
        Ok(projection) => (StatusCode::OK, axum::Json(projection)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn compare_handler<P>(
    State(service): State<Arc<CrisisService<P>>>,
    query: Result<Query<LevelQuery>, QueryRejection>,
) -> Response
where
    P: IndicatorProvider + 'static,
{
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    let level = match parse_level(query.level.as_deref()) {
        Ok(level) => level,
        Err(response) => return response,
    };

    match service.compare(level) {
        Ok(comparison) => (StatusCode::OK, axum::Json(comparison)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn water_alerts_handler<P>(
    State(service): State<Arc<CrisisService<P>>>,
    query: Result<Query<LevelQuery>, QueryRejection>,
) -> Response
where
    P: IndicatorProvider + 'static,
{
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    let level = match parse_level(query.level.as_deref()) {
        Ok(level) => level,
        Err(response) => return response,
    };

    match service.water_alerts(level) {
        Ok(digest) => (StatusCode::OK, axum::Json(digest)).into_response(),
        Err(error) => error_response(error),
    }
}

fn parse_level(raw: Option<&str>) -> Result<LevelType, Response> {
    match raw {
        None => Ok(LevelType::default()),
        Some(value) => LevelType::parse(value)
            .ok_or_else(|| bad_request(format!("unknown level '{value}'"))),
    }
}

fn parse_strategy(raw: Option<&str>) -> Result<Option<Strategy>, Response> {
    match raw {
        None => Ok(None),
        Some(value) => Strategy::parse(value)
            .map(Some)
            .ok_or_else(|| bad_request(format!("unknown strategy '{value}'"))),
    }
}

fn parse_quality(raw: Option<&str>) -> Result<Option<WaterQuality>, Response> {
    match raw {
        None => Ok(None),
        Some(value) => match WaterQuality::from_label(value) {
            WaterQuality::Unknown if !value.trim().eq_ignore_ascii_case("unknown") => {
                Err(bad_request(format!("unknown quality '{value}'")))
            }
            quality => Ok(Some(quality)),
        },
    }
}

fn parse_trend(raw: Option<&str>) -> Result<Option<GroundwaterTrend>, Response> {
    match raw {
        None => Ok(None),
        Some(value) => match GroundwaterTrend::from_label(value) {
            GroundwaterTrend::Unknown if !value.trim().eq_ignore_ascii_case("unknown") => {
                Err(bad_request(format!("unknown trend '{value}'")))
            }
            trend => Ok(Some(trend)),
        },
    }
}

fn bad_request(message: impl Into<String>) -> Response {
    let payload = json!({
        "error": message.into(),
    });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}

fn error_response(error: AssessmentError) -> Response {
    let status = match &error {
        AssessmentError::NotFound { .. } => StatusCode::NOT_FOUND,
        AssessmentError::InvalidOverrides(_) => StatusCode::BAD_REQUEST,
        AssessmentError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    let payload = match &error {
        AssessmentError::NotFound { location, level } => json!({
            "error": error.to_string(),
            "location": location,
            "level": level,
        }),
        _ => json!({
            "error": error.to_string(),
        }),
    };
    (status, axum::Json(payload)).into_response()
}
