use crate::auth::AuthContext;
use crate::db::models::Meeting;
use crate::db::MeetingUpdate;
use crate::error::{AppError, DatabaseError};
use crate::AppState;
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct NewMeeting {
    pub agenda: String,
    #[serde(default)]
    pub attendees: Vec<String>,
    pub location: Option<String>,
    pub related: Option<String>,
    pub date_time: DateTime<Utc>,
    pub notes: Option<String>,
}

/// POST /api/meeting/add
pub async fn add(
    ctx: AuthContext,
    req: web::Json<NewMeeting>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    if req.agenda.is_empty() {
        return Err(AppError::ValidationError("agenda is required".into()));
    }

    let req = req.into_inner();
    let meeting = Meeting::new(
        req.agenda,
        req.attendees,
        req.location,
        req.related,
        req.date_time,
        req.notes,
        ctx.user_id,
    );

    state.meetings.insert_meeting(&meeting).await?;
    info!("meeting {} created by {}", meeting.id, ctx.user_id);

    Ok(HttpResponse::Ok().json(json!({
        "message": "Meeting created successfully",
        "meeting": meeting
    })))
}

/// GET /api/meeting/
pub async fn index(
    _ctx: AuthContext,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let meetings = state.meetings.list_meetings().await?;
    Ok(HttpResponse::Ok().json(meetings))
}

/// GET /api/meeting/view/{id}
pub async fn view(
    _ctx: AuthContext,
    id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let meeting = state
        .meetings
        .meeting_by_id(*id)
        .await?
        .ok_or(DatabaseError::NotFound)?;
    Ok(HttpResponse::Ok().json(meeting))
}

/// PUT /api/meeting/edit/{id}
pub async fn edit(
    ctx: AuthContext,
    id: web::Path<Uuid>,
    changes: web::Json<MeetingUpdate>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    state.meetings.update_meeting(*id, &changes).await?;
    info!("meeting {} updated by {}", id, ctx.user_id);
    Ok(HttpResponse::Ok().json(json!({ "message": "Meeting updated successfully" })))
}

/// DELETE /api/meeting/delete/{id}
pub async fn delete_one(
    ctx: AuthContext,
    id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    state.meetings.soft_delete_meeting(*id).await?;
    info!("meeting {} deleted by {}", id, ctx.user_id);
    Ok(HttpResponse::Ok().json(json!({ "message": "Meeting deleted successfully" })))
}

/// POST /api/meeting/delete-many
pub async fn delete_many(
    ctx: AuthContext,
    ids: web::Json<Vec<Uuid>>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    if ids.is_empty() {
        return Err(AppError::ValidationError("no meeting ids provided".into()));
    }

    let deleted = state.meetings.soft_delete_meetings(&ids).await?;
    info!("{} meetings deleted by {}", deleted, ctx.user_id);
    Ok(HttpResponse::Ok().json(json!({
        "message": "Meetings deleted successfully",
        "deleted_count": deleted
    })))
}
