use actix_web::{Responder, post, web};
use common::env_config::Config;
use common::error::{AppError, Res};
use common::http::Success;
use common::jwt::{self, ClaimsSpec};
use common::misc::UserRole;
use sqlx::PgPool;
use std::sync::Arc;

use crate::dtos::auth::{AuthResponse, LoginRequest, RegisterRequest};
use crate::services;

/// Registers a new account on the worker or employer portal.
///
/// # Input
/// - `req`: JSON payload containing email, password, names and role
///   ("employee" or "employer")
/// - `pool`: Database connection pool
///
/// # Output
/// - Success: Returns the created user object with 201 Created status
/// - Error: Returns 400 Bad Request if the email already exists
#[post("/register")]
async fn post_register(
    req: web::Json<RegisterRequest>,
    pool: web::Data<Arc<sqlx::PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let email_exists = services::user::exists_user_by_email(pg_pool, req.email.clone()).await?;
    if email_exists {
        return Err(AppError::BadRequest(
            "An account with this email already exists".to_string(),
        ));
    }
    let user = services::user::create_user_with_credentials(pg_pool, &req.into_inner()).await?;
    Success::created(user)
}

/// Authenticates a user with email and password.
///
/// # Input
/// - `login_data`: JSON payload containing email and password
/// - `config`: Application configuration for JWT generation
/// - `pool`: Database connection pool
///
/// # Output
/// - Success: Returns an auth response with JWT token and user details
/// - Error: Returns 401 Unauthorized for invalid credentials
#[post("/login")]
pub async fn post_login(
    login_data: web::Json<LoginRequest>,
    config: web::Data<Arc<Config>>,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let user = services::auth::authenticate_user(pg_pool, &login_data.into_inner()).await?;
    let token = jwt::generate_jwt(
        ClaimsSpec {
            user_id: user.id,
            role: UserRole::from_str(&user.role)?,
        },
        &config.jwt_config,
    )?;
    Success::ok(AuthResponse { token, user })
}
