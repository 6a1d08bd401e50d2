use axum::{extract::State, Json};
use common::types::Ack;
use models::inquiry::{ContactForm, ForgotPasswordForm};
use models::suggestion::{SuggestionRequest, SuggestionResponse};
use models::Service;
use serde::Serialize;
use service::consumers::{viewer, Render};
use service::suggestions::{request_suggestions, SuggestionOutcome};
use service::{inquiries, ServiceError};

use crate::errors::ApiError;
use crate::state::AppState;

pub const NO_SERVICES: &str = "No services available";

/// Homepage carousel payload.
#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ServicesView {
    Loading,
    Empty { message: &'static str },
    Items { items: Vec<Service> },
}

impl From<Render<Service>> for ServicesView {
    fn from(render: Render<Service>) -> Self {
        match render {
            Render::Loading => ServicesView::Loading,
            Render::Empty => ServicesView::Empty { message: NO_SERVICES },
            Render::Items(items) => ServicesView::Items { items },
        }
    }
}

/// A fresh viewer mount per request, so admin edits show on the next load.
#[utoipa::path(get, path = "/api/services", tag = "public", responses((status = 200, description = "Carousel services or an empty state")))]
pub async fn services(State(state): State<AppState>) -> Json<ServicesView> {
    let render = viewer::view::<Service, _>(state.slots.clone()).await;
    Json(render.into())
}

#[utoipa::path(post, path = "/api/contact", tag = "public", request_body = crate::openapi::ContactFormDoc,
    responses((status = 200, description = "Message received"), (status = 400, description = "Invalid input")))]
pub async fn contact(Json(form): Json<ContactForm>) -> Result<Json<Ack>, ApiError> {
    let message = inquiries::submit_contact(&form).map_err(ApiError::InvalidInput)?;
    Ok(Json(Ack::new(message)))
}

#[utoipa::path(post, path = "/api/forgot-password", tag = "public", request_body = crate::openapi::ForgotPasswordDoc,
    responses((status = 200, description = "Reset link sent if registered"), (status = 400, description = "Invalid input")))]
pub async fn forgot_password(Json(form): Json<ForgotPasswordForm>) -> Result<Json<Ack>, ApiError> {
    let message = inquiries::request_password_reset(&form).map_err(ApiError::InvalidInput)?;
    Ok(Json(Ack::new(message)))
}

#[utoipa::path(post, path = "/api/suggestions", tag = "public", request_body = crate::openapi::SuggestionRequestDoc,
    responses(
        (status = 200, description = "Suggestions", body = crate::openapi::SuggestionResponseDoc),
        (status = 400, description = "Missing project details or category"),
        (status = 502, description = "Suggestion service failed")
    ))]
pub async fn suggestions(
    State(state): State<AppState>,
    Json(request): Json<SuggestionRequest>,
) -> Result<Json<SuggestionResponse>, ApiError> {
    match request_suggestions(state.suggestions.as_ref(), &request).await? {
        SuggestionOutcome::Ready { suggestions } => Ok(Json(SuggestionResponse { suggestions })),
        SuggestionOutcome::Failed { error } => Err(ServiceError::Suggestion(error).into()),
    }
}
