use crate::db::models::{Role, User};
use crate::error::{AppError, AuthError, DatabaseError};
use crate::AppState;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone_number: String,
}

/// POST /api/user/login
///
/// Verifies credentials against the user store and answers with a freshly
/// issued token, both in the body and as an `Authorization` response header.
/// Unknown usernames and wrong passwords get the same 401.
pub async fn login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(AppError::ValidationError(
            "username and password are required".into(),
        ));
    }

    let user = state
        .users
        .user_by_username(&req.username)
        .await?
        .ok_or_else(|| {
            warn!("login failed for {}: unknown username", req.username);
            AuthError::InvalidCredentials
        })?;

    let password_matches = bcrypt::verify(&req.password, &user.password_hash)?;
    if !password_matches {
        warn!("login failed for {}: password mismatch", req.username);
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = state.gate.issue(user.id)?;
    info!("login successful for {}", user.username);

    Ok(HttpResponse::Ok()
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .json(LoginResponse { token, user }))
}

/// POST /api/user/register
pub async fn register(
    req: web::Json<RegisterRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    create_account(req.into_inner(), &state, Role::User).await
}

/// POST /api/user/admin-register
pub async fn admin_register(
    req: web::Json<RegisterRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    create_account(req.into_inner(), &state, Role::SuperAdmin).await
}

async fn create_account(
    req: RegisterRequest,
    state: &AppState,
    role: Role,
) -> Result<HttpResponse, AppError> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(AppError::ValidationError(
            "username and password are required".into(),
        ));
    }

    if state.users.user_by_username(&req.username).await?.is_some() {
        return Err(AppError::ValidationError(
            "user already exists, please try another email".into(),
        ));
    }

    let password_hash = bcrypt::hash(&req.password, bcrypt::DEFAULT_COST)?;
    let user = User::new(
        req.username,
        password_hash,
        req.first_name,
        req.last_name,
        req.phone_number,
        role,
    );

    match state.users.insert_user(&user).await {
        Ok(()) => {}
        // Lost the race against a concurrent registration for the same name.
        Err(DatabaseError::Duplicate) => {
            return Err(AppError::ValidationError(
                "user already exists, please try another email".into(),
            ))
        }
        Err(e) => return Err(e.into()),
    }

    info!("created {} account for {}", user.role.as_str(), user.username);
    Ok(HttpResponse::Ok().json(json!({ "message": "User created successfully" })))
}
