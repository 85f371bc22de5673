use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    api::error::{self, DuplicateReason},
    modules::relationship::{
        repository::RelationshipRepository,
        schema::{RelationStatus, RelationshipEntity},
    },
};

/// Owns the relationship state machine: creation enters `pending`,
/// accept/decline/block mutate status in place, and at most one live
/// row exists per user pair regardless of direction.
#[derive(Clone)]
pub struct FriendshipService<R>
where
    R: RelationshipRepository,
{
    repo: Arc<R>,
}

fn duplicate_reason(existing: &RelationshipEntity, requester_id: &Uuid) -> DuplicateReason {
    if existing.status == RelationStatus::Accepted {
        DuplicateReason::AlreadyFriends
    } else if existing.requester_id == *requester_id {
        DuplicateReason::AlreadySent
    } else {
        DuplicateReason::AlreadyReceived
    }
}

impl<R> FriendshipService<R>
where
    R: RelationshipRepository,
{
    pub fn with_dependencies(repo: Arc<R>) -> Self {
        FriendshipService { repo }
    }

    /// Creates a `pending` relationship from `requester_id` to
    /// `receiver_id`. Any existing live row for the pair rejects the
    /// request with `DuplicateRelation`; the unique pair index converts
    /// a lost insert race into the same error.
    pub async fn send_request(
        &self,
        requester_id: Uuid,
        receiver_id: Uuid,
    ) -> Result<RelationshipEntity, error::SystemError> {
        if requester_id == receiver_id {
            return Err(error::SystemError::bad_request(
                "Cannot send a friend request to yourself",
            ));
        }

        if let Some(existing) = self.repo.find_by_pair(&requester_id, &receiver_id).await? {
            return Err(error::SystemError::duplicate(duplicate_reason(
                &existing,
                &requester_id,
            )));
        }

        match self.repo.insert(&requester_id, &receiver_id).await {
            Ok(relationship) => Ok(relationship),
            Err(error::SystemError::Conflict(_)) => {
                // Lost the insert race; classify against the winner's row.
                let reason = self
                    .repo
                    .find_by_pair(&requester_id, &receiver_id)
                    .await?
                    .map(|row| duplicate_reason(&row, &requester_id))
                    .unwrap_or(DuplicateReason::AlreadySent);
                Err(error::SystemError::duplicate(reason))
            }
            Err(e) => Err(e),
        }
    }

    /// Sets the row to `accepted` and stamps `date_accepted`. Succeeds
    /// from any prior status except `accepted` itself, including
    /// `declined` and `blocked` (awaiting product review; kept as the
    /// platform has always behaved). Returns false for an
    /// already-accepted row or a missing id. The guard and the write
    /// are a single conditional update, so racing accepts of the same
    /// row return true exactly once.
    pub async fn accept_request(&self, relationship_id: Uuid) -> Result<bool, error::SystemError> {
        self.repo
            .mark_accepted(&relationship_id, chrono::Utc::now())
            .await
    }

    /// Sets the row to `declined` whatever its prior status. Returns
    /// false if the id is missing.
    pub async fn decline_request(&self, relationship_id: Uuid) -> Result<bool, error::SystemError> {
        self.repo
            .update_status(&relationship_id, RelationStatus::Declined, None)
            .await
    }

    /// Sets the row to `blocked` whatever its prior status. Does not
    /// touch `date_accepted`.
    pub async fn block_user(&self, relationship_id: Uuid) -> Result<bool, error::SystemError> {
        self.repo
            .update_status(&relationship_id, RelationStatus::Blocked, None)
            .await
    }

    /// Deletes the pair's row; returns false if none exists.
    pub async fn remove_friendship(
        &self,
        user_id_a: Uuid,
        user_id_b: Uuid,
    ) -> Result<bool, error::SystemError> {
        let Some(relationship) = self.repo.find_by_pair(&user_id_a, &user_id_b).await? else {
            return Ok(false);
        };

        self.repo.delete(&relationship.id).await
    }

    pub async fn find_relation(
        &self,
        user_id_a: Uuid,
        user_id_b: Uuid,
    ) -> Result<Option<RelationshipEntity>, error::SystemError> {
        self.repo.find_by_pair(&user_id_a, &user_id_b).await
    }

    pub async fn relationship_exists(
        &self,
        user_id_a: Uuid,
        user_id_b: Uuid,
    ) -> Result<bool, error::SystemError> {
        Ok(self.repo.find_by_pair(&user_id_a, &user_id_b).await?.is_some())
    }

    pub async fn are_friends(
        &self,
        user_id_a: Uuid,
        user_id_b: Uuid,
    ) -> Result<bool, error::SystemError> {
        Ok(self
            .status_of(user_id_a, user_id_b)
            .await?
            .is_some_and(|status| status == RelationStatus::Accepted))
    }

    /// Directional: true only for a `pending` row where `sender_id` is
    /// the stored requester and `receiver_id` the stored receiver.
    pub async fn has_pending_request_from(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
    ) -> Result<bool, error::SystemError> {
        let relationship = self.repo.find_by_pair(&sender_id, &receiver_id).await?;
        Ok(relationship.is_some_and(|r| {
            r.status == RelationStatus::Pending && r.requester_id == sender_id
        }))
    }

    pub async fn status_of(
        &self,
        user_id_a: Uuid,
        user_id_b: Uuid,
    ) -> Result<Option<RelationStatus>, error::SystemError> {
        Ok(self
            .repo
            .find_by_pair(&user_id_a, &user_id_b)
            .await?
            .map(|r| r.status))
    }

    /// `user_id_a`'s accepted rows whose other side is also a friend of
    /// `user_id_b`. Two queries and a set intersection; empty when
    /// either user has no friends.
    pub async fn mutual_friends(
        &self,
        user_id_a: Uuid,
        user_id_b: Uuid,
    ) -> Result<Vec<RelationshipEntity>, error::SystemError> {
        let theirs: HashSet<Uuid> = self.repo.friend_ids(&user_id_b).await?.into_iter().collect();
        if theirs.is_empty() {
            return Ok(Vec::new());
        }

        let mine = self
            .repo
            .list_by_status(&user_id_a, RelationStatus::Accepted, None, 0)
            .await?;

        Ok(mine
            .into_iter()
            .filter(|r| theirs.contains(&r.friend_id(&user_id_a)))
            .collect())
    }

    /// Removes every row involving the user, either direction.
    pub async fn remove_all_for_user(&self, user_id: Uuid) -> Result<u64, error::SystemError> {
        self.repo.delete_by_user(&user_id).await
    }

    pub async fn remove_by_status(
        &self,
        user_id: Uuid,
        status: RelationStatus,
    ) -> Result<u64, error::SystemError> {
        self.repo.delete_by_status(&user_id, status).await
    }

    /// On-demand batch purge of rows whose `date_requested` is older
    /// than `days`. Invoked by an external maintenance caller, not a
    /// timer.
    pub async fn purge_older_than(&self, days: i32) -> Result<u64, error::SystemError> {
        let purged = self.repo.delete_older_than(days).await?;
        log::info!("Purged {} relationships older than {} days", purged, days);
        Ok(purged)
    }
}
