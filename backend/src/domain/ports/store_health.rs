//! Driven port reporting whether the document store answers.

use async_trait::async_trait;

/// Connectivity check against the persistence layer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreHealth: Send + Sync {
    /// `true` when the store answered a round trip just now.
    async fn is_reachable(&self) -> bool;
}
