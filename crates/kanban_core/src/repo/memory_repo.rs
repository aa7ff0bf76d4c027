//! In-process state repository with an optional byte quota.

use crate::repo::state_repo::{RepoError, RepoResult, StateRepository};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// Keeps payloads in memory; nothing survives the process.
///
/// With a quota configured, writes whose total footprint (keys plus
/// payloads across all entries) would exceed the limit fail with
/// [`RepoError::QuotaExceeded`] and leave the previous value untouched.
#[derive(Debug, Default)]
pub struct MemoryStateRepository {
    entries: RefCell<BTreeMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: RefCell::default(),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Bytes currently held across all keys.
    pub fn used_bytes(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .map(|(key, payload)| key.len() + payload.len())
            .sum()
    }
}

impl StateRepository for MemoryStateRepository {
    fn read_state(&self, key: &str) -> RepoResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write_state(&self, key: &str, payload: &str) -> RepoResult<()> {
        let mut entries = self.entries.borrow_mut();
        if let Some(limit) = self.quota_bytes {
            let others: usize = entries
                .iter()
                .filter(|(existing, _)| existing.as_str() != key)
                .map(|(existing, value)| existing.len() + value.len())
                .sum();
            let requested = others + key.len() + payload.len();
            if requested > limit {
                return Err(RepoError::QuotaExceeded { limit, requested });
            }
        }
        entries.insert(key.to_string(), payload.to_string());
        Ok(())
    }

    fn remove_state(&self, key: &str) -> RepoResult<bool> {
        Ok(self.entries.borrow_mut().remove(key).is_some())
    }
}
