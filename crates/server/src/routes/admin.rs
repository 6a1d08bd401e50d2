//! Editor endpoints shared by every record kind. Each handler is generic over
//! the kind and picks its editor out of `AppState`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use service::store::Committed;
use tracing::{debug, warn};

use crate::errors::ApiError;
use crate::state::{AdminResource, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

/// Create response: the new record plus the collection it landed in.
#[derive(Debug, Serialize)]
pub struct Created<E> {
    pub item: Option<E>,
    #[serde(flatten)]
    pub committed: Committed<E>,
}

fn log_warning<E>(kind: &str, committed: &Committed<E>) {
    if let Some(warning) = &committed.warning {
        warn!(kind, event = "not_persisted", %warning, "change kept in memory only");
    }
}

pub async fn list<E: AdminResource>(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<E>>, ApiError> {
    let q = query.q.unwrap_or_default();
    let items = E::editor(&state).search(&q).await?;
    debug!(kind = E::LABEL, q = %q, count = items.len(), "admin_list");
    Ok(Json(items))
}

pub async fn get_one<E: AdminResource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<E>, ApiError> {
    E::editor(&state)
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("{} {id}", E::LABEL)))
}

pub async fn create<E: AdminResource>(
    State(state): State<AppState>,
    Json(draft): Json<E::Draft>,
) -> Result<(StatusCode, Json<Created<E>>), ApiError> {
    let committed = E::editor(&state).create(draft).await?;
    log_warning(E::LABEL, &committed);
    let item = committed.records.first().cloned();
    Ok((StatusCode::CREATED, Json(Created { item, committed })))
}

pub async fn update<E: AdminResource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<E::Patch>,
) -> Result<Json<Committed<E>>, ApiError> {
    let committed = E::editor(&state).update(&id, patch).await?;
    log_warning(E::LABEL, &committed);
    Ok(Json(committed))
}

pub async fn delete<E: AdminResource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Committed<E>>, ApiError> {
    let committed = E::editor(&state).delete(&id).await?;
    log_warning(E::LABEL, &committed);
    Ok(Json(committed))
}
