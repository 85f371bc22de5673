use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::modules::relationship::model::PairKey;

/// Status of a relationship row. `Pending` is the creation default;
/// `Declined` and `Blocked` are not dead-ends (the row can still be
/// accepted later).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "relation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RelationStatus {
    Pending,
    Accepted,
    Declined,
    Blocked,
}

/// A friend request/status row between two users. The pair is
/// semantically unordered; the stored direction records who initiated
/// because only the receiver conceptually answers the request.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RelationshipEntity {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub receiver_id: Uuid,
    pub status: RelationStatus,
    pub date_requested: chrono::DateTime<chrono::Utc>,
    pub date_accepted: Option<chrono::DateTime<chrono::Utc>>,
}

impl RelationshipEntity {
    pub fn involves(&self, user_id: &Uuid) -> bool {
        self.requester_id == *user_id || self.receiver_id == *user_id
    }

    /// The other side of the row, seen from `user_id`'s perspective.
    pub fn friend_id(&self, user_id: &Uuid) -> Uuid {
        if self.requester_id == *user_id {
            self.receiver_id
        } else {
            self.requester_id
        }
    }

    pub fn pair_key(&self) -> PairKey {
        PairKey::normalize(self.requester_id, self.receiver_id)
    }
}
