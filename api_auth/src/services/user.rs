use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, password_hash::PasswordHasher};
use common::error::{AppError, Res};
use db::dtos::user::{CredentialsCreateRequest, UserCreateRequest};
use db::models::user::User;

use crate::dtos::auth::RegisterRequest;

use sqlx::PgPool;
use uuid::Uuid;

pub async fn exists_user_by_email(pool: &PgPool, email: String) -> Res<bool> {
    db::user::exists_user_by_email(pool, email).await
}

pub async fn get_user_by_id(pool: &PgPool, user_id: Uuid) -> Res<User> {
    db::user::get_user_by_id(pool, user_id).await
}

/// Inserts user record and credentials to the database.
pub async fn create_user_with_credentials(pool: &PgPool, req: &RegisterRequest) -> Res<User> {
    let mut tx = pool.begin().await?;

    // insert user
    let user = db::user::insert_user(
        &mut *tx,
        UserCreateRequest {
            email: req.email.clone(),
            first_name: req.first_name.clone(),
            last_name: req.last_name.clone(),
            role: req.role,
        },
    )
    .await?;

    // hash the password
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?
        .to_string();

    // insert credentials
    db::user::insert_user_credentials(
        &mut *tx,
        CredentialsCreateRequest {
            user_id: user.id,
            password_hash,
        },
    )
    .await?;

    tx.commit().await?;
    Ok(user)
}
