//! Remote user record store

use crate::errors::StoreError;
use crate::identifiers::UserId;
use crate::record::{Document, FieldPatch};
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Stream of realtime document changes.
///
/// Each item is the full document after a change (`None` once the document is
/// deleted), or an error reported by the listener. Dropping the stream detaches
/// the remote listener.
pub type RecordStream = BoxStream<'static, Result<Option<Document>, StoreError>>;

/// Document store holding one record per user.
#[async_trait]
pub trait UserRecordStore: Send + Sync {
    /// Read the current document, `None` when it does not exist.
    async fn fetch(&self, user_id: &UserId) -> Result<Option<Document>, StoreError>;

    /// Apply a partial update to an existing document.
    async fn update(&self, user_id: &UserId, patch: &FieldPatch) -> Result<(), StoreError>;

    /// Attach a realtime listener.
    ///
    /// The stream yields the current document first, then every subsequent
    /// change.
    fn listen(&self, user_id: &UserId) -> Result<RecordStream, StoreError>;
}
