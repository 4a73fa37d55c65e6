use crate::auth::AuthContext;
use crate::db::models::{Role, User};
use crate::db::UserUpdate;
use crate::error::{AppError, DatabaseError};
use crate::AppState;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

/// GET /api/user/
pub async fn index(
    _ctx: AuthContext,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let users = state.users.list_users().await?;
    Ok(HttpResponse::Ok().json(json!({ "user": users })))
}

/// GET /api/user/view/{id}
pub async fn view(
    _ctx: AuthContext,
    id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = state
        .users
        .user_by_id(*id)
        .await?
        .ok_or(DatabaseError::NotFound)?;
    Ok(HttpResponse::Ok().json(user))
}

/// PUT /api/user/edit/{id}
pub async fn edit(
    _ctx: AuthContext,
    id: web::Path<Uuid>,
    changes: web::Json<UserUpdate>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    state.users.update_user(*id, &changes).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Record updated successfully" })))
}

/// Deletion policy: identity alone is not enough for this endpoint. Accounts
/// on the protected list and superAdmin accounts survive every delete path.
fn deletable(user: &User, protected: &[String]) -> Result<(), AppError> {
    if protected.contains(&user.username) {
        return Err(AppError::ValidationError(format!(
            "you don't have access to delete {}",
            user.username
        )));
    }
    if user.role == Role::SuperAdmin {
        return Err(AppError::Forbidden("admin cannot be deleted".into()));
    }
    Ok(())
}

/// DELETE /api/user/delete/{id}
pub async fn delete_one(
    ctx: AuthContext,
    id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = state
        .users
        .user_by_id(*id)
        .await?
        .ok_or(DatabaseError::NotFound)?;

    deletable(&user, &state.config.auth.protected_usernames)?;

    state.users.soft_delete_user(user.id).await?;
    info!("user {} deleted by {}", user.username, ctx.user_id);
    Ok(HttpResponse::Ok().json(json!({ "message": "Record deleted successfully" })))
}

/// POST /api/user/delete-many
///
/// Protected and superAdmin accounts are silently filtered out; the request
/// only fails when nothing deletable remains.
pub async fn delete_many(
    ctx: AuthContext,
    ids: web::Json<Vec<Uuid>>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let mut deletable_ids = Vec::new();
    for id in ids.iter() {
        if let Some(user) = state.users.user_by_id(*id).await? {
            if deletable(&user, &state.config.auth.protected_usernames).is_ok() {
                deletable_ids.push(user.id);
            }
        }
    }

    if deletable_ids.is_empty() {
        return Err(AppError::ValidationError(
            "no users to delete or all users are protected".into(),
        ));
    }

    let deleted = state.users.soft_delete_users(&deletable_ids).await?;
    info!("{} users deleted by {}", deleted, ctx.user_id);
    Ok(HttpResponse::Ok().json(json!({ "message": "done", "deleted_count": deleted })))
}

#[derive(Debug, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: Role,
}

/// PUT /api/user/change-role/{id}
pub async fn change_role(
    ctx: AuthContext,
    id: web::Path<Uuid>,
    req: web::Json<ChangeRoleRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    state.users.set_role(*id, req.role).await?;
    info!("role of {} set to {} by {}", id, req.role.as_str(), ctx.user_id);
    Ok(HttpResponse::Ok().json(json!({ "message": "Role updated successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_role(role: Role) -> User {
        User::new(
            "someone@example.com".to_string(),
            "hash".to_string(),
            "Some".to_string(),
            "One".to_string(),
            String::new(),
            role,
        )
    }

    #[test]
    fn test_protected_username_not_deletable() {
        let mut user = user_with_role(Role::User);
        user.username = "admin@gmail.com".to_string();

        let result = deletable(&user, &["admin@gmail.com".to_string()]);
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_super_admin_not_deletable() {
        let user = user_with_role(Role::SuperAdmin);
        let result = deletable(&user, &[]);
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[test]
    fn test_regular_user_deletable() {
        let user = user_with_role(Role::User);
        assert!(deletable(&user, &["admin@gmail.com".to_string()]).is_ok());
    }
}
