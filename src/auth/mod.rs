//! Authentication for the CRM server.
//!
//! `gate` issues and verifies the signed tokens, `extractor` turns a bearer
//! token into a per-request `AuthContext`, and `handlers` covers login and
//! registration.

mod extractor;
mod gate;
pub mod handlers;

pub use extractor::AuthContext;
pub use gate::{AuthGate, Claims};
