//! HTTP handlers for the events API
//!
//! Every route expects [`axum_helpers::jwt_auth_middleware`] to run first;
//! handlers read the caller through the [`AuthUser`] extractor.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    AppError, AuthUser, UuidPath,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;
use utoipa::{IntoParams, OpenApi};

use crate::models::{
    Caller, CreateEvent, DeleteEventRequest, Event, EventCreatedResponse, EventListResponse,
    MutationOutcome, Recurrence, RecurrenceInput, RecurrenceType, UpdateEvent,
};
use crate::repository::EventRepository;
use crate::scope::MutationScope;
use crate::service::EventService;

/// OpenAPI documentation for the events API
#[derive(OpenApi)]
#[openapi(
    paths(create_event, list_my_events, get_event, update_event, delete_event),
    components(
        schemas(
            Event,
            CreateEvent,
            UpdateEvent,
            DeleteEventRequest,
            Recurrence,
            RecurrenceInput,
            RecurrenceType,
            MutationScope,
            MutationOutcome,
            EventCreatedResponse,
            EventListResponse,
        ),
        responses(
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            NotFoundResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Events", description = "Calendar events and recurring series")
    )
)]
pub struct ApiDoc;

/// Create the events router with all HTTP endpoints
pub fn router<R: EventRepository + 'static>(service: EventService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", post(create_event))
        .route("/myevents", get(list_my_events))
        .route(
            "/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
        .with_state(shared_service)
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DeleteScopeQuery {
    /// `thisEvent`, `thisAndFollowing` or `allEvents`; a body value wins
    delete_scope: Option<String>,
}

/// Create an event; recurring events start a new series
#[utoipa::path(
    post,
    path = "",
    tag = "Events",
    request_body = CreateEvent,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Event created successfully", body = EventCreatedResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
#[instrument(skip_all, fields(caller_id = %user.id))]
async fn create_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    user: AuthUser,
    payload: Result<Json<CreateEvent>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(create) = payload?;
    let event = service.create(&Caller::from(user), create).await?;

    Ok((
        StatusCode::CREATED,
        Json(EventCreatedResponse {
            message: "Event created successfully".to_string(),
            event,
        }),
    ))
}

/// Events the caller created or was invited to, earliest first
#[utoipa::path(
    get,
    path = "/myevents",
    tag = "Events",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Events retrieved successfully", body = EventListResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
#[instrument(skip_all, fields(caller_id = %user.id))]
async fn list_my_events<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    user: AuthUser,
) -> Result<Json<EventListResponse>, AppError> {
    let events = service.list_visible(&Caller::from(user)).await?;

    Ok(Json(EventListResponse {
        message: "Events retrieved successfully".to_string(),
        events,
    }))
}

/// Get one event the caller created or participates in
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Events",
    params(("id" = Uuid, Path, description = "Event ID")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Event found", body = Event),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
#[instrument(skip_all, fields(caller_id = %user.id, event_id = %id))]
async fn get_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
) -> Result<Json<Event>, AppError> {
    let event = service.get_visible(&Caller::from(user), id).await?;
    Ok(Json(event))
}

/// Update an event, optionally across its series
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Events",
    params(("id" = Uuid, Path, description = "Event ID")),
    request_body = UpdateEvent,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Events updated", body = MutationOutcome),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
#[instrument(skip_all, fields(caller_id = %user.id, event_id = %id))]
async fn update_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
    payload: Result<Json<UpdateEvent>, JsonRejection>,
) -> Result<Json<MutationOutcome>, AppError> {
    let Json(update) = payload?;
    let outcome = service.update(&Caller::from(user), id, update).await?;
    Ok(Json(outcome))
}

/// Delete an event, optionally across its series
///
/// The scope comes from the JSON body or the `deleteScope` query parameter.
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Events",
    params(("id" = Uuid, Path, description = "Event ID"), DeleteScopeQuery),
    request_body(content = DeleteEventRequest, description = "Optional; may be empty"),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Events deleted", body = MutationOutcome),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
#[instrument(skip_all, fields(caller_id = %user.id, event_id = %id))]
async fn delete_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
    Query(query): Query<DeleteScopeQuery>,
    body: Bytes,
) -> Result<Json<MutationOutcome>, AppError> {
    let scope = delete_scope(&body, query)?;
    let outcome = service.delete(&Caller::from(user), id, scope).await?;
    Ok(Json(outcome))
}

/// Body `deleteScope` wins over the query parameter; an empty body is fine.
fn delete_scope(body: &[u8], query: DeleteScopeQuery) -> Result<MutationScope, AppError> {
    let from_body = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        let request: DeleteEventRequest = serde_json::from_slice(body)
            .map_err(|e| AppError::BadRequest(format!("Invalid request body: {e}")))?;
        request.delete_scope
    };

    let selector = from_body.or_else(|| query.delete_scope.map(serde_json::Value::String));
    Ok(MutationScope::from_selector(selector.as_ref()))
}
