//! API Module
//!
//! HTTP handlers and routing for the user REST API.
//!
//! # Endpoints
//! - `GET /api/health` - Health check
//! - `POST /api/users` - Create a user
//! - `GET /api/users` - List users
//! - `GET /api/users/:id` - Fetch a user
//! - `PUT /api/users/:id` - Update a user
//! - `DELETE /api/users/:id` - Delete a user

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
