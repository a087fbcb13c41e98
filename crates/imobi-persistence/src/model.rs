//! Result types returned by the persistence helpers

use serde::{Deserialize, Serialize};

/// Generic paginated result
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub total_count: u64,
    pub page_number: u64,
    pub pages_available: u64,
    pub page_items: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(total_count: u64, page_number: u64, page_size: u64, page_items: Vec<T>) -> Self {
        Self {
            total_count,
            page_number,
            pages_available: if page_size > 0 {
                total_count.div_ceil(page_size)
            } else {
                0
            },
            page_items,
        }
    }

    pub fn empty() -> Self {
        Self {
            total_count: 0,
            page_number: 0,
            pages_available: 0,
            page_items: Vec::new(),
        }
    }
}

/// One id a bulk operation could not apply
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkFailure {
    pub id: i32,
    pub reason: String,
}

/// Per-item report of a bulk activate/deactivate/delete
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkOutcome {
    pub succeeded: Vec<i32>,
    pub failed: Vec<BulkFailure>,
}

impl BulkOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Ids that should stay selected in the admin table after the operation.
    /// Empty when every item succeeded.
    pub fn remaining_selection(&self) -> Vec<i32> {
        self.failed.iter().map(|f| f.id).collect()
    }

    pub(crate) fn fail(&mut self, id: i32, reason: impl Into<String>) {
        self.failed.push(BulkFailure {
            id,
            reason: reason.into(),
        });
    }
}

/// Drop repeated ids while keeping the order they were selected in
pub fn dedupe_ids(ids: &[i32]) -> Vec<i32> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
