//! Write-side invalidation rules
//!
//! Maps each kind of successful write to the cache keys whose contents it may
//! have made stale. Only the two fixed keys are known here; a paginated or
//! filtered listing would need its own keys added to `stale_keys`.

use crate::cache::keys;

/// A store mutation that has already committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    Created,
    Updated(i64),
    Deleted(i64),
}

impl WriteKind {
    /// Keys to delete after this write.
    ///
    /// A new id has never been cached, so creation only touches the listing.
    pub fn stale_keys(&self) -> Vec<String> {
        match *self {
            WriteKind::Created => vec![keys::users_list()],
            WriteKind::Updated(id) | WriteKind::Deleted(id) => {
                vec![keys::users_list(), keys::user(id)]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_only_invalidates_listing() {
        assert_eq!(WriteKind::Created.stale_keys(), vec!["cache:/api/users"]);
    }

    #[test]
    fn test_update_invalidates_listing_and_record() {
        assert_eq!(
            WriteKind::Updated(4).stale_keys(),
            vec!["cache:/api/users", "cache:/api/users/4"]
        );
    }

    #[test]
    fn test_delete_invalidates_listing_and_record() {
        assert_eq!(
            WriteKind::Deleted(9).stale_keys(),
            vec!["cache:/api/users", "cache:/api/users/9"]
        );
    }
}
