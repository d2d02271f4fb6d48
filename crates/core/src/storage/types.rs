use crate::bookmark::ETag;

/// Result of a point operation that returns the stored item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemResponse<T> {
    /// The item as stored, with its token attached.
    pub resource: T,
    /// Token of the committed state.
    pub etag: ETag,
    /// Capacity consumed by the call, in the store's own units.
    pub request_charge: f64,
}

/// Result of a point delete.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeleteResponse {
    pub request_charge: f64,
}

/// One page of a partition-scoped query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPage<T> {
    pub items: Vec<T>,
    /// Opaque token for the next page; `None` when the query is exhausted.
    pub continuation: Option<String>,
    pub request_charge: f64,
}

impl<T> QueryPage<T> {
    /// Returns true when no further pages remain.
    pub fn is_last(&self) -> bool {
        self.continuation.is_none()
    }
}
