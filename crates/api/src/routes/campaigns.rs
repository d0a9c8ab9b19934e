//! Campaign routes: CRUD plus the marketing aggregations.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{ApiError, AppState};
use ledgerly_core::metrics::MetricsService;
use ledgerly_db::{
    CampaignRepository,
    repositories::campaign::{CreateCampaign, UpdateCampaign},
};

/// Request body for creating a campaign.
#[derive(Debug, Deserialize)]
pub struct CreateCampaignRequest {
    /// Campaign name.
    pub name: String,
    /// Advertising platform.
    pub platform: String,
    /// Campaign start.
    pub start: Option<DateTime<Utc>>,
    /// Campaign end.
    pub end: Option<DateTime<Utc>>,
    /// Allocated budget; defaults to zero.
    #[serde(default)]
    pub budget: Decimal,
    /// Lead count; defaults to zero.
    #[serde(default)]
    pub leads: i64,
    /// Conversion count; defaults to zero.
    #[serde(default)]
    pub conversions: i64,
    /// Attributed revenue; defaults to zero.
    #[serde(default)]
    pub revenue: Decimal,
}

/// Request body for updating a campaign; absent fields keep their value.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateCampaignRequest {
    /// New name, if changing.
    pub name: Option<String>,
    /// New platform, if changing.
    pub platform: Option<String>,
    /// New start, if changing.
    pub start: Option<DateTime<Utc>>,
    /// New end, if changing.
    pub end: Option<DateTime<Utc>>,
    /// New budget, if changing.
    pub budget: Option<Decimal>,
    /// New lead count, if changing.
    pub leads: Option<i64>,
    /// New conversion count, if changing.
    pub conversions: Option<i64>,
    /// New revenue, if changing.
    pub revenue: Option<Decimal>,
}

async fn list_campaigns(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let repo = CampaignRepository::new(state.db.clone());
    Ok(Json(repo.list().await?))
}

async fn create_campaign(
    State(state): State<AppState>,
    Json(body): Json<CreateCampaignRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.name.trim().is_empty() {
        return Err(ApiError::validation("Campaign name is required"));
    }
    if body.platform.trim().is_empty() {
        return Err(ApiError::validation("Platform is required"));
    }

    let repo = CampaignRepository::new(state.db.clone());
    let created = repo
        .create(CreateCampaign {
            name: body.name,
            platform: body.platform,
            start: body.start,
            end: body.end,
            budget: body.budget,
            leads: body.leads,
            conversions: body.conversions,
            revenue: body.revenue,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_campaign(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateCampaignRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = CampaignRepository::new(state.db.clone());
    let updated = repo
        .update(
            id,
            UpdateCampaign {
                name: body.name,
                platform: body.platform,
                start: body.start,
                end: body.end,
                budget: body.budget,
                leads: body.leads,
                conversions: body.conversions,
                revenue: body.revenue,
            },
        )
        .await?;
    Ok(Json(updated))
}

async fn delete_campaign(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = CampaignRepository::new(state.db.clone());
    repo.delete(id).await?;
    Ok(Json(json!({ "success": true })))
}

/// Leads summed per platform.
async fn leads_by_platform(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let repo = CampaignRepository::new(state.db.clone());
    let campaigns = repo.facts().await?;
    Ok(Json(MetricsService::leads_by_platform(&campaigns)))
}

/// Monthly leads/conversions/budget series keyed by campaign start month.
async fn monthly_campaigns(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let repo = CampaignRepository::new(state.db.clone());
    let campaigns = repo.facts().await?;
    Ok(Json(MetricsService::monthly_campaigns(&campaigns)))
}

/// Creates the campaign routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/campaigns", get(list_campaigns))
        .route("/campaigns", post(create_campaign))
        .route("/campaigns/{id}", put(update_campaign))
        .route("/campaigns/{id}", delete(delete_campaign))
        .route("/leads-by-platform", get(leads_by_platform))
        .route("/monthly-campaigns", get(monthly_campaigns))
}
