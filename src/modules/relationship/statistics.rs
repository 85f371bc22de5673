use std::sync::Arc;

use uuid::Uuid;

use crate::{
    api::error,
    modules::relationship::{
        model::FriendStatistics, repository::RelationshipRepository, schema::RelationStatus,
    },
};

/// Read-only aggregation of per-user relationship counts. Holds no
/// state of its own; every read consults the store directly so the
/// counts never go stale relative to the state machine.
#[derive(Clone)]
pub struct StatisticsAggregator<R>
where
    R: RelationshipRepository,
{
    repo: Arc<R>,
}

impl<R> StatisticsAggregator<R>
where
    R: RelationshipRepository,
{
    pub fn with_dependencies(repo: Arc<R>) -> Self {
        StatisticsAggregator { repo }
    }

    pub async fn friend_count(&self, user_id: Uuid) -> Result<i64, error::SystemError> {
        self.repo
            .count_by_status(&user_id, RelationStatus::Accepted)
            .await
    }

    pub async fn pending_sent_count(&self, user_id: Uuid) -> Result<i64, error::SystemError> {
        self.repo.count_sent(&user_id, RelationStatus::Pending).await
    }

    pub async fn pending_received_count(&self, user_id: Uuid) -> Result<i64, error::SystemError> {
        self.repo
            .count_received(&user_id, RelationStatus::Pending)
            .await
    }

    pub async fn blocked_count(&self, user_id: Uuid) -> Result<i64, error::SystemError> {
        self.repo
            .count_by_status(&user_id, RelationStatus::Blocked)
            .await
    }

    /// The other side of every accepted row involving the user.
    pub async fn friend_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, error::SystemError> {
        self.repo.friend_ids(&user_id).await
    }

    pub async fn summary(&self, user_id: Uuid) -> Result<FriendStatistics, error::SystemError> {
        let (friends, pending_sent, pending_received, blocked) = tokio::try_join!(
            self.friend_count(user_id),
            self.pending_sent_count(user_id),
            self.pending_received_count(user_id),
            self.blocked_count(user_id),
        )?;

        Ok(FriendStatistics { friends, pending_sent, pending_received, blocked })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::relationship::{
        repository_mem::RelationshipRepositoryMem, service::FriendshipService,
    };

    struct Fixture {
        repo: Arc<RelationshipRepositoryMem>,
        service: FriendshipService<RelationshipRepositoryMem>,
        stats: StatisticsAggregator<RelationshipRepositoryMem>,
    }

    fn setup() -> Fixture {
        let repo = Arc::new(RelationshipRepositoryMem::default());
        Fixture {
            repo: repo.clone(),
            service: FriendshipService::with_dependencies(repo.clone()),
            stats: StatisticsAggregator::with_dependencies(repo),
        }
    }

    /// One user with one relationship in each state: an accepted friend,
    /// a pending request sent, a pending request received, and a block.
    async fn populate(f: &Fixture, user: Uuid) -> (Uuid, Uuid, Uuid, Uuid) {
        let (friend, invitee, inviter, nemesis) =
            (Uuid::now_v7(), Uuid::now_v7(), Uuid::now_v7(), Uuid::now_v7());

        let r = f.service.send_request(user, friend).await.unwrap();
        f.service.accept_request(r.id).await.unwrap();

        f.service.send_request(user, invitee).await.unwrap();
        f.service.send_request(inviter, user).await.unwrap();

        let r = f.service.send_request(user, nemesis).await.unwrap();
        f.service.block_user(r.id).await.unwrap();

        (friend, invitee, inviter, nemesis)
    }

    #[tokio::test]
    async fn counts_per_state() {
        let f = setup();
        let user = Uuid::now_v7();
        populate(&f, user).await;

        assert_eq!(f.stats.friend_count(user).await.unwrap(), 1);
        assert_eq!(f.stats.pending_sent_count(user).await.unwrap(), 1);
        assert_eq!(f.stats.pending_received_count(user).await.unwrap(), 1);
        assert_eq!(f.stats.blocked_count(user).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn counts_agree_with_list_involving() {
        let f = setup();
        let user = Uuid::now_v7();
        populate(&f, user).await;

        let rows = f.repo.list_involving(&user, None, 0).await.unwrap();
        let by_status = |status: RelationStatus| {
            rows.iter().filter(|r| r.status == status).count() as i64
        };

        assert_eq!(
            f.stats.friend_count(user).await.unwrap(),
            by_status(RelationStatus::Accepted)
        );
        assert_eq!(
            f.stats.blocked_count(user).await.unwrap(),
            by_status(RelationStatus::Blocked)
        );
        assert_eq!(
            f.stats.pending_sent_count(user).await.unwrap()
                + f.stats.pending_received_count(user).await.unwrap(),
            by_status(RelationStatus::Pending)
        );
    }

    #[tokio::test]
    async fn summary_matches_individual_counts() {
        let f = setup();
        let user = Uuid::now_v7();
        populate(&f, user).await;

        let summary = f.stats.summary(user).await.unwrap();
        assert_eq!(summary.friends, 1);
        assert_eq!(summary.pending_sent, 1);
        assert_eq!(summary.pending_received, 1);
        assert_eq!(summary.blocked, 1);
    }

    #[tokio::test]
    async fn friend_ids_resolve_both_directions() {
        let f = setup();
        let user = Uuid::now_v7();
        let (friend, ..) = populate(&f, user).await;

        assert_eq!(f.stats.friend_ids(user).await.unwrap(), vec![friend]);
        assert_eq!(f.stats.friend_ids(friend).await.unwrap(), vec![user]);
    }

    #[tokio::test]
    async fn friend_count_is_symmetric() {
        let f = setup();
        let (alice, bob) = (Uuid::now_v7(), Uuid::now_v7());

        let r = f.service.send_request(alice, bob).await.unwrap();
        f.service.accept_request(r.id).await.unwrap();

        assert_eq!(f.stats.friend_count(alice).await.unwrap(), 1);
        assert_eq!(f.stats.friend_count(bob).await.unwrap(), 1);

        f.service.block_user(r.id).await.unwrap();
        assert_eq!(f.stats.friend_count(alice).await.unwrap(), 0);
        assert_eq!(f.stats.friend_count(bob).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn deletion_completeness() {
        let f = setup();
        let user = Uuid::now_v7();
        populate(&f, user).await;

        assert_eq!(f.service.remove_all_for_user(user).await.unwrap(), 4);
        assert!(f.repo.list_involving(&user, None, 0).await.unwrap().is_empty());

        let summary = f.stats.summary(user).await.unwrap();
        assert_eq!(summary.friends, 0);
        assert_eq!(summary.pending_sent, 0);
        assert_eq!(summary.pending_received, 0);
        assert_eq!(summary.blocked, 0);
    }
}
