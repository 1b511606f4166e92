use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post,
};
use axum_helpers::{
    AppError, JwtAuth, ValidatedJson,
    errors::responses::{
        BadRequestValidationResponse, ConflictResponse, InternalServerErrorResponse,
        UnauthorizedResponse,
    },
};
use tracing::error;
use utoipa::OpenApi;

use crate::models::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, User};
use crate::repository::UserRepository;
use crate::service::UserService;

/// OpenAPI documentation for the auth API
#[derive(OpenApi)]
#[openapi(
    paths(register, login),
    components(
        schemas(RegisterRequest, RegisterResponse, LoginRequest, LoginResponse),
        responses(
            BadRequestValidationResponse,
            ConflictResponse,
            UnauthorizedResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Auth", description = "Registration and login")
    )
)]
pub struct ApiDoc;

/// Application state for auth handlers
pub struct AuthState<R: UserRepository> {
    pub service: UserService<R>,
    pub jwt: JwtAuth,
}

impl<R: UserRepository> Clone for AuthState<R> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            jwt: self.jwt.clone(),
        }
    }
}

/// Create the auth router
pub fn router<R: UserRepository + 'static>(service: UserService<R>, jwt: JwtAuth) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .with_state(AuthState { service, jwt })
}

fn issue_token(jwt: &JwtAuth, user: &User) -> Result<String, AppError> {
    jwt.issue_token(user.id, &user.username, &user.email)
        .map_err(|e| {
            error!(user_id = %user.id, "Failed to issue token: {e:?}");
            AppError::InternalServerError("Failed to issue token".to_string())
        })
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = RegisterResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn register<R: UserRepository>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.service.register(input).await?;
    let token = issue_token(&state.jwt, &user)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            token,
        }),
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in successfully", body = LoginResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn login<R: UserRepository>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = state.service.verify_credentials(input).await?;
    let token = issue_token(&state.jwt, &user)?;

    Ok(Json(LoginResponse {
        message: "Logged in successfully".to_string(),
        id: user.id,
        username: user.username,
        email: user.email,
        token,
    }))
}
