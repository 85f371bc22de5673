use uuid::Uuid;

use crate::api::error;
use crate::modules::relationship::schema::{RelationStatus, RelationshipEntity};

/// Persistence boundary for relationship rows. No business rules live
/// here beyond what the schema enforces; duplicate checking is the
/// service's job, backstopped by the unique normalized-pair index.
#[async_trait::async_trait]
pub trait RelationshipRepository: Send + Sync {
    /// Creates a `pending` row with `date_requested = now`. Does not
    /// check for an existing pair; a lost insert race surfaces as
    /// `SystemError::Conflict`.
    async fn insert(
        &self,
        requester_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<RelationshipEntity, error::SystemError>;

    async fn find_by_id(
        &self,
        id: &Uuid,
    ) -> Result<Option<RelationshipEntity>, error::SystemError>;

    /// Looks up the pair's row regardless of which user initiated.
    async fn find_by_pair(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Option<RelationshipEntity>, error::SystemError>;

    /// Atomically flips a non-accepted row to `accepted`, stamping
    /// `date_accepted`. Returns false for an already-accepted row or a
    /// missing id; the status check and the write are one statement so
    /// racing accepts cannot both win.
    async fn mark_accepted(
        &self,
        id: &Uuid,
        date_accepted: chrono::DateTime<chrono::Utc>,
    ) -> Result<bool, error::SystemError>;

    /// Returns whether a row was actually modified. `date_accepted` is
    /// only ever set, never cleared.
    async fn update_status(
        &self,
        id: &Uuid,
        status: RelationStatus,
        date_accepted: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Result<bool, error::SystemError>;

    async fn delete(&self, id: &Uuid) -> Result<bool, error::SystemError>;

    /// Removes every row involving the user, either direction.
    async fn delete_by_user(&self, user_id: &Uuid) -> Result<u64, error::SystemError>;

    async fn delete_by_status(
        &self,
        user_id: &Uuid,
        status: RelationStatus,
    ) -> Result<u64, error::SystemError>;

    /// Age-based purge keyed on `date_requested`.
    async fn delete_older_than(&self, days: i32) -> Result<u64, error::SystemError>;

    /// Direction-agnostic, newest `date_requested` first. `limit: None`
    /// means unbounded.
    async fn list_involving(
        &self,
        user_id: &Uuid,
        limit: Option<i64>,
        offset: i64,
    ) -> Result<Vec<RelationshipEntity>, error::SystemError>;

    async fn list_by_status(
        &self,
        user_id: &Uuid,
        status: RelationStatus,
        limit: Option<i64>,
        offset: i64,
    ) -> Result<Vec<RelationshipEntity>, error::SystemError>;

    /// The other side of every accepted row involving the user.
    async fn friend_ids(&self, user_id: &Uuid) -> Result<Vec<Uuid>, error::SystemError>;

    async fn count_by_status(
        &self,
        user_id: &Uuid,
        status: RelationStatus,
    ) -> Result<i64, error::SystemError>;

    async fn count_sent(
        &self,
        user_id: &Uuid,
        status: RelationStatus,
    ) -> Result<i64, error::SystemError>;

    async fn count_received(
        &self,
        user_id: &Uuid,
        status: RelationStatus,
    ) -> Result<i64, error::SystemError>;
}
