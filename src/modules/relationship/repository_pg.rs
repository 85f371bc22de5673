use uuid::Uuid;

use crate::{
    api::error,
    modules::relationship::{
        model::PairKey,
        repository::RelationshipRepository,
        schema::{RelationStatus, RelationshipEntity},
    },
};

#[derive(Clone)]
pub struct RelationshipRepositoryPg {
    pool: sqlx::PgPool,
}

impl RelationshipRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RelationshipRepository for RelationshipRepositoryPg {
    async fn insert(
        &self,
        requester_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<RelationshipEntity, error::SystemError> {
        let relationship = sqlx::query_as::<_, RelationshipEntity>(
            r#"
            INSERT INTO relationships (requester_id, receiver_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(requester_id)
        .bind(receiver_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(relationship)
    }

    async fn find_by_id(
        &self,
        id: &Uuid,
    ) -> Result<Option<RelationshipEntity>, error::SystemError> {
        let relationship =
            sqlx::query_as::<_, RelationshipEntity>("SELECT * FROM relationships WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(relationship)
    }

    async fn find_by_pair(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Option<RelationshipEntity>, error::SystemError> {
        let key = PairKey::normalize(*user_id_a, *user_id_b);

        let relationship = sqlx::query_as::<_, RelationshipEntity>(
            r#"
            SELECT *
            FROM relationships
            WHERE LEAST(requester_id, receiver_id) = $1
              AND GREATEST(requester_id, receiver_id) = $2
            "#,
        )
        .bind(key.low)
        .bind(key.high)
        .fetch_optional(&self.pool)
        .await?;

        Ok(relationship)
    }

    async fn mark_accepted(
        &self,
        id: &Uuid,
        date_accepted: chrono::DateTime<chrono::Utc>,
    ) -> Result<bool, error::SystemError> {
        let result = sqlx::query(
            r#"
            UPDATE relationships
            SET status = 'accepted', date_accepted = $2
            WHERE id = $1 AND status <> 'accepted'
            "#,
        )
        .bind(id)
        .bind(date_accepted)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_status(
        &self,
        id: &Uuid,
        status: RelationStatus,
        date_accepted: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Result<bool, error::SystemError> {
        let result = sqlx::query(
            r#"
            UPDATE relationships
            SET status = $2, date_accepted = COALESCE($3, date_accepted)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(date_accepted)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, error::SystemError> {
        let result = sqlx::query("DELETE FROM relationships WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_user(&self, user_id: &Uuid) -> Result<u64, error::SystemError> {
        let result =
            sqlx::query("DELETE FROM relationships WHERE requester_id = $1 OR receiver_id = $1")
                .bind(user_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }

    async fn delete_by_status(
        &self,
        user_id: &Uuid,
        status: RelationStatus,
    ) -> Result<u64, error::SystemError> {
        let result = sqlx::query(
            r#"
            DELETE FROM relationships
            WHERE (requester_id = $1 OR receiver_id = $1) AND status = $2
            "#,
        )
        .bind(user_id)
        .bind(status)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_older_than(&self, days: i32) -> Result<u64, error::SystemError> {
        let result = sqlx::query(
            "DELETE FROM relationships WHERE date_requested < NOW() - make_interval(days => $1)",
        )
        .bind(days)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn list_involving(
        &self,
        user_id: &Uuid,
        limit: Option<i64>,
        offset: i64,
    ) -> Result<Vec<RelationshipEntity>, error::SystemError> {
        let relationships = sqlx::query_as::<_, RelationshipEntity>(
            r#"
            SELECT *
            FROM relationships
            WHERE requester_id = $1 OR receiver_id = $1
            ORDER BY date_requested DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(relationships)
    }

    async fn list_by_status(
        &self,
        user_id: &Uuid,
        status: RelationStatus,
        limit: Option<i64>,
        offset: i64,
    ) -> Result<Vec<RelationshipEntity>, error::SystemError> {
        let relationships = sqlx::query_as::<_, RelationshipEntity>(
            r#"
            SELECT *
            FROM relationships
            WHERE (requester_id = $1 OR receiver_id = $1) AND status = $2
            ORDER BY date_requested DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(user_id)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(relationships)
    }

    async fn friend_ids(&self, user_id: &Uuid) -> Result<Vec<Uuid>, error::SystemError> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT CASE
                WHEN requester_id = $1 THEN receiver_id
                ELSE requester_id
            END
            FROM relationships
            WHERE (requester_id = $1 OR receiver_id = $1) AND status = 'accepted'
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn count_by_status(
        &self,
        user_id: &Uuid,
        status: RelationStatus,
    ) -> Result<i64, error::SystemError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM relationships
            WHERE (requester_id = $1 OR receiver_id = $1) AND status = $2
            "#,
        )
        .bind(user_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn count_sent(
        &self,
        user_id: &Uuid,
        status: RelationStatus,
    ) -> Result<i64, error::SystemError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM relationships WHERE requester_id = $1 AND status = $2",
        )
        .bind(user_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn count_received(
        &self,
        user_id: &Uuid,
        status: RelationStatus,
    ) -> Result<i64, error::SystemError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM relationships WHERE receiver_id = $1 AND status = $2",
        )
        .bind(user_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
