//! Domain and transport models for the user API
//!
//! `user` holds the record itself; `requests`/`responses` are the JSON
//! bodies exchanged over HTTP.

pub mod requests;
pub mod responses;
pub mod user;

// Re-export commonly used types
pub use requests::{CreateUserRequest, UpdateUserRequest};
pub use responses::{ErrorResponse, HealthResponse, MessageResponse};
pub use user::{NewUser, User, UserChanges};
