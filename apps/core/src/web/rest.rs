//! REST handlers for the dashboard.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, instrument};
use validator::Validate;

use crate::actors::AutoReplyStatus;
use crate::brain::{PlatformConfig, ResponseTemplate};
use crate::error::AppError;
use crate::models::{Campaign, CustomerRecord, InboundMessage, Platform, SenderContext, WebSession};
use crate::scoring::{self, SessionAssessment, SessionInsights};
use crate::web::state::AppState;

type Payload<T> = Result<Json<T>, JsonRejection>;

//=========================================================================================
// Request and Response Payloads
//=========================================================================================

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AutoReplyRequest {
    #[validate(length(min = 1, message = "message must not be empty"))]
    pub message: String,
    #[validate(length(min = 1, message = "senderId must not be empty"))]
    pub sender_id: String,
    pub platform: Platform,
    #[serde(default)]
    pub sender_context: Option<SenderContext>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub active: bool,
}

/// Status plus the full template list.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    #[serde(flatten)]
    pub status: AutoReplyStatus,
    pub templates: Vec<ResponseTemplate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VipAction {
    Analyze,
    Metrics,
    Predictions,
    Recommendations,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VipAnalysisRequest {
    pub action: VipAction,
    #[serde(default)]
    pub customer_id: Option<String>,
    /// A single customer record or an array of them.
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Serialize)]
pub struct SessionAnalysisResponse {
    pub sessions: Vec<SessionAssessment>,
    pub insights: SessionInsights,
}

//=========================================================================================
// Helpers
//=========================================================================================

fn customers_from(data: Value) -> Result<Vec<CustomerRecord>, AppError> {
    let customers: Vec<CustomerRecord> = match data {
        Value::Null => Vec::new(),
        Value::Array(_) => serde_json::from_value(data)?,
        other => vec![serde_json::from_value(other)?],
    };
    for customer in &customers {
        customer.validate()?;
    }
    Ok(customers)
}

fn find_customer<'a>(
    customers: &'a [CustomerRecord],
    customer_id: Option<&str>,
) -> Result<&'a CustomerRecord, AppError> {
    let id = customer_id
        .ok_or_else(|| AppError::Validation("customerId is required for this action".to_string()))?;
    customers
        .iter()
        .find(|c| c.id == id)
        .ok_or_else(|| AppError::NotFound(format!("customer {}", id)))
}

//=========================================================================================
// Handlers
//=========================================================================================

pub async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Classifies an inbound message and returns the composed reply.
#[instrument(skip_all)]
pub async fn auto_reply_handler(
    State(state): State<Arc<AppState>>,
    payload: Payload<AutoReplyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;
    request.validate()?;

    let message = InboundMessage::new(request.sender_id, request.platform, request.message);
    let reply = state
        .auto_reply
        .process_message(message, request.sender_context)
        .await?;
    Ok(Json(reply))
}

pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let status = state.auto_reply.status().await?;
    let templates = state.auto_reply.list_templates().await?;
    Ok(Json(StatusResponse { status, templates }))
}

#[instrument(skip_all)]
pub async fn toggle_handler(
    State(state): State<Arc<AppState>>,
    payload: Payload<ToggleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;
    let status = state.auto_reply.set_active(request.active).await?;
    info!(active = status.active, "auto-reply toggled");
    Ok(Json(status))
}

pub async fn list_templates_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.auto_reply.list_templates().await?))
}

#[instrument(skip_all)]
pub async fn create_template_handler(
    State(state): State<Arc<AppState>>,
    payload: Payload<ResponseTemplate>,
) -> Result<impl IntoResponse, AppError> {
    let Json(template) = payload?;
    let created = state.auto_reply.add_template(template).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn set_template_active_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Payload<ToggleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;
    let template = state
        .auto_reply
        .set_template_active(id, request.active)
        .await?;
    Ok(Json(template))
}

pub async fn update_platform_handler(
    State(state): State<Arc<AppState>>,
    payload: Payload<PlatformConfig>,
) -> Result<impl IntoResponse, AppError> {
    let Json(config) = payload?;
    config.validate()?;
    Ok(Json(state.auto_reply.update_platform(config).await?))
}

/// Dispatches a VIP intelligence action over the supplied customer records.
#[instrument(skip_all)]
pub async fn vip_analysis_handler(
    State(state): State<Arc<AppState>>,
    payload: Payload<VipAnalysisRequest>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;
    let customers = customers_from(request.data)?;
    let customer_id = request.customer_id.as_deref();
    let vip = &state.vip;

    let body = match request.action {
        VipAction::Metrics => serde_json::to_value(vip.metrics(&customers))?,
        VipAction::Analyze => match customer_id {
            Some(_) => serde_json::to_value(vip.analyze(find_customer(&customers, customer_id)?))?,
            None => serde_json::to_value(
                customers.iter().map(|c| vip.analyze(c)).collect::<Vec<_>>(),
            )?,
        },
        VipAction::Predictions => serde_json::to_value(
            customers
                .iter()
                .filter(|c| customer_id.map_or(true, |id| c.id == id))
                .map(|c| vip.predict(c))
                .collect::<Vec<_>>(),
        )?,
        VipAction::Recommendations => {
            serde_json::to_value(vip.recommendations(find_customer(&customers, customer_id)?))?
        }
    };
    Ok(Json(body))
}

pub async fn campaign_health_handler(
    State(state): State<Arc<AppState>>,
    payload: Payload<Campaign>,
) -> Result<impl IntoResponse, AppError> {
    let Json(campaign) = payload?;
    campaign.validate()?;
    Ok(Json(state.campaigns.report(&campaign)))
}

pub async fn session_analysis_handler(payload: Payload<Vec<WebSession>>) -> Result<impl IntoResponse, AppError> {
    let Json(sessions) = payload?;
    for session in &sessions {
        session.validate()?;
    }
    Ok(Json(SessionAnalysisResponse {
        sessions: sessions.iter().map(scoring::session::assess).collect(),
        insights: scoring::summarize(&sessions),
    }))
}
