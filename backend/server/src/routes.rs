use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use bank::{
    DataSource,
    address::AddressEntry,
    support::{ReadFilter, SupportMessage},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sieve::{
    Cascade, Dimension, Facets, FilterAction, FilterEngine, FilterState, FilterValue,
    RestaurantGroup, RestaurantRecord, Selection, filters::apply_filters, grouper::group,
};
use tracing::info;

use crate::{error::AppError, places::lookup_address, state::AppState};

type Payload<T> = Result<Json<T>, JsonRejection>;

fn payload<T>(payload: Payload<T>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| AppError::MalformedPayload(e.body_text()))
}

pub async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantsResponse {
    pub status: &'static str,
    pub restaurants: Vec<RestaurantRecord>,
    pub updated_at: Option<DateTime<Utc>>,
    pub count: usize,
    pub source: &'static str,
}

pub async fn restaurants_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RestaurantsResponse>, AppError> {
    let snapshot = state.blocking(|state| state.repository.snapshot()).await??;

    let response = match snapshot {
        Some(snapshot) => RestaurantsResponse {
            status: "success",
            count: snapshot.restaurants.len(),
            restaurants: snapshot.restaurants,
            updated_at: Some(snapshot.updated_at),
            source: "store",
        },
        None => RestaurantsResponse {
            status: "success",
            restaurants: Vec::new(),
            updated_at: None,
            count: 0,
            source: "none",
        },
    };

    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub restaurants: Option<Vec<RestaurantRecord>>,
    pub admin_token: Option<String>,
}

pub async fn upload_handler(
    State(state): State<Arc<AppState>>,
    body: Payload<UploadRequest>,
) -> Result<impl IntoResponse, AppError> {
    let request = payload(body)?;

    if let Some(expected) = &state.config.admin_token {
        if request.admin_token.as_ref() != Some(expected) {
            return Err(AppError::Unauthorized);
        }
    }

    let restaurants = request.restaurants.ok_or_else(|| {
        AppError::MalformedPayload("restaurants must be an array".to_string())
    })?;

    if restaurants.is_empty() {
        return Err(AppError::MalformedPayload("No restaurant data provided".to_string()));
    }

    let snapshot = state
        .blocking(move |state| state.repository.save(&restaurants))
        .await??;
    info!("Uploaded {} restaurants", snapshot.count);

    Ok(Json(json!({
        "status": "success",
        "message": format!("Successfully uploaded {} restaurants", snapshot.count),
        "count": snapshot.count,
        "updatedAt": snapshot.updated_at,
    })))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BrowseRequest {
    pub filters: FilterState,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseResponse {
    pub status: &'static str,
    pub groups: Vec<RestaurantGroup>,
    pub facets: Facets,
    pub total: usize,
    pub filtered: usize,
    pub source: DataSource,
}

pub async fn browse_handler(
    State(state): State<Arc<AppState>>,
    body: Payload<BrowseRequest>,
) -> Result<Json<BrowseResponse>, AppError> {
    let request = payload(body)?;
    let loaded = state.blocking(AppState::restaurants).await?;

    let groups = group(&loaded.restaurants);
    let filters = request.filters.sanitized();
    let matching = apply_filters(&groups, &filters);

    Ok(Json(BrowseResponse {
        status: "success",
        facets: Facets::compute(&groups, &filters),
        total: groups.len(),
        filtered: matching.len(),
        groups: matching,
        source: loaded.source,
    }))
}

/// `{"dimension": "city", "value": [..]}` or `{"reset": true}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ActionRequest {
    Set { dimension: String, value: Selection },
    Reset { reset: bool },
}

impl TryFrom<ActionRequest> for FilterAction {
    type Error = AppError;

    fn try_from(action: ActionRequest) -> Result<Self, Self::Error> {
        match action {
            ActionRequest::Set { dimension, value } => {
                let dimension: Dimension = dimension
                    .parse()
                    .map_err(|e: sieve::models::UnknownDimension| AppError::MalformedPayload(e.to_string()))?;
                Ok(FilterAction::Set(FilterValue::new(dimension, value)))
            }
            ActionRequest::Reset { reset: true } => Ok(FilterAction::Reset),
            ActionRequest::Reset { reset: false } => Err(AppError::MalformedPayload(
                "action needs a dimension and value, or reset: true".to_string(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub filters: FilterState,
    pub action: ActionRequest,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub cascade: Cascade,
    pub facets: Facets,
    pub filtered: usize,
}

pub async fn filter_handler(
    State(state): State<Arc<AppState>>,
    body: Payload<FilterRequest>,
) -> Result<Json<FilterResponse>, AppError> {
    let request = payload(body)?;
    let action = FilterAction::try_from(request.action)?;

    let loaded = state.blocking(AppState::restaurants).await?;
    let mut engine = FilterEngine::new(&loaded.restaurants).with_state(&request.filters);
    let cascade = engine.dispatch(action);

    Ok(Json(FilterResponse {
        status: "success",
        facets: engine.facets(),
        filtered: engine.filtered().len(),
        cascade,
    }))
}

#[derive(Debug, Deserialize)]
pub struct LookupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub neighborhood: String,
}

pub async fn address_lookup_handler(
    State(state): State<Arc<AppState>>,
    body: Payload<LookupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let request = payload(body)?;

    let (name, city) = (request.name.trim(), request.city.trim());
    if name.is_empty() || city.is_empty() {
        return Err(AppError::MalformedPayload(
            "Missing required fields: name and city are required".to_string(),
        ));
    }

    Ok(Json(lookup_address(&state, name, city, request.neighborhood.trim()).await))
}

pub async fn address_cache_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let entries: std::collections::BTreeMap<String, AddressEntry> =
        state.address_cache.lock().await.entries().clone();

    Json(entries)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SupportRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

pub async fn submit_support_handler(
    State(state): State<Arc<AppState>>,
    body: Payload<SupportRequest>,
) -> Result<impl IntoResponse, AppError> {
    let request = payload(body)?;

    let message = state
        .inbox
        .lock()
        .await
        .submit(&request.name, &request.email, &request.message)?;

    Ok((StatusCode::CREATED, Json(json!({ "status": "success", "message": message }))))
}

#[derive(Debug, Default, Deserialize)]
pub struct SupportQuery {
    pub filter: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportList {
    pub status: &'static str,
    pub messages: Vec<SupportMessage>,
    pub total: usize,
    pub unread_count: usize,
}

pub async fn list_support_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SupportQuery>,
) -> Result<Json<SupportList>, AppError> {
    let filter: ReadFilter = query
        .filter
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|e: bank::support::UnknownReadFilter| AppError::MalformedPayload(e.to_string()))?;

    let inbox = state.inbox.lock().await;

    Ok(Json(SupportList {
        status: "success",
        messages: inbox.list(filter),
        total: inbox.len(),
        unread_count: inbox.unread_count(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct MarkRead {
    #[serde(default = "default_read")]
    pub read: bool,
}

fn default_read() -> bool {
    true
}

pub async fn mark_read_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Payload<MarkRead>,
) -> Result<impl IntoResponse, AppError> {
    let request = payload(body)?;
    let message = state.inbox.lock().await.mark_read(&id, request.read)?;

    Ok(Json(json!({ "status": "success", "message": message })))
}

pub async fn delete_support_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let message = state.inbox.lock().await.delete(&id)?;
    info!("Deleted support message {}", message.id);

    Ok(Json(json!({ "status": "success", "message": message })))
}

pub async fn clear_support_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let cleared = state.inbox.lock().await.clear()?;

    Ok(Json(json!({ "status": "success", "cleared": cleared })))
}
