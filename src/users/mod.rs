//! User management endpoints (list, view, edit, delete, role changes).

pub mod handlers;
