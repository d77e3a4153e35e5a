//! Cache key scheme
//!
//! A key is the request path behind a fixed namespace token, so external
//! tooling can map any key back to the endpoint that produced it.

/// Namespace token prepended to every request path.
pub const NAMESPACE: &str = "cache:";

/// Path of the user collection.
pub const USERS_PATH: &str = "/api/users";

/// Key for an arbitrary request path.
#[must_use]
pub fn for_path(path: &str) -> String {
    format!("{}{}", NAMESPACE, path)
}

/// Key for the full user listing: `cache:/api/users`.
#[must_use]
pub fn users_list() -> String {
    for_path(USERS_PATH)
}

/// Key for one user: `cache:/api/users/{id}`.
#[must_use]
pub fn user(id: i64) -> String {
    format!("{}{}/{}", NAMESPACE, USERS_PATH, id)
}
