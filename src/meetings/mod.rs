//! Meeting CRUD endpoints. Every route requires an authenticated context;
//! the creator of a meeting is always taken from the verified claim, never
//! from the request body.

pub mod handlers;
