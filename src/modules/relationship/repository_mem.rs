//! In-memory repository for exercising the service layer without a
//! database. Mirrors the Postgres behavior, including the unique
//! normalized-pair index reported as a `Conflict`.

use std::sync::Mutex;

use uuid::Uuid;

use crate::{
    api::error,
    modules::relationship::{
        model::PairKey,
        repository::RelationshipRepository,
        schema::{RelationStatus, RelationshipEntity},
    },
};

#[derive(Default)]
pub struct RelationshipRepositoryMem {
    rows: Mutex<Vec<RelationshipEntity>>,
}

impl RelationshipRepositoryMem {
    /// Overwrites the row with the same id, for back-dating fixtures.
    pub fn replace(&self, row: RelationshipEntity) {
        let mut rows = self.rows.lock().unwrap();
        if let Some(existing) = rows.iter_mut().find(|r| r.id == row.id) {
            *existing = row;
        }
    }
}

#[async_trait::async_trait]
impl RelationshipRepository for RelationshipRepositoryMem {
    async fn insert(
        &self,
        requester_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<RelationshipEntity, error::SystemError> {
        let mut rows = self.rows.lock().unwrap();

        let key = PairKey::normalize(*requester_id, *receiver_id);
        if rows.iter().any(|r| r.pair_key() == key) {
            return Err(error::SystemError::Conflict(None));
        }

        let row = RelationshipEntity {
            id: Uuid::now_v7(),
            requester_id: *requester_id,
            receiver_id: *receiver_id,
            status: RelationStatus::Pending,
            date_requested: chrono::Utc::now(),
            date_accepted: None,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn find_by_id(
        &self,
        id: &Uuid,
    ) -> Result<Option<RelationshipEntity>, error::SystemError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|r| r.id == *id).cloned())
    }

    async fn find_by_pair(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Option<RelationshipEntity>, error::SystemError> {
        let key = PairKey::normalize(*user_id_a, *user_id_b);
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|r| r.pair_key() == key).cloned())
    }

    async fn mark_accepted(
        &self,
        id: &Uuid,
        date_accepted: chrono::DateTime<chrono::Utc>,
    ) -> Result<bool, error::SystemError> {
        let mut rows = self.rows.lock().unwrap();
        match rows
            .iter_mut()
            .find(|r| r.id == *id && r.status != RelationStatus::Accepted)
        {
            Some(row) => {
                row.status = RelationStatus::Accepted;
                row.date_accepted = Some(date_accepted);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_status(
        &self,
        id: &Uuid,
        status: RelationStatus,
        date_accepted: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Result<bool, error::SystemError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|r| r.id == *id) {
            Some(row) => {
                row.status = status;
                if date_accepted.is_some() {
                    row.date_accepted = date_accepted;
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, error::SystemError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != *id);
        Ok(rows.len() < before)
    }

    async fn delete_by_user(&self, user_id: &Uuid) -> Result<u64, error::SystemError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| !r.involves(user_id));
        Ok((before - rows.len()) as u64)
    }

    async fn delete_by_status(
        &self,
        user_id: &Uuid,
        status: RelationStatus,
    ) -> Result<u64, error::SystemError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| !(r.involves(user_id) && r.status == status));
        Ok((before - rows.len()) as u64)
    }

    async fn delete_older_than(&self, days: i32) -> Result<u64, error::SystemError> {
        let cutoff = chrono::Utc::now() - chrono::Duration::days(i64::from(days));
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.date_requested >= cutoff);
        Ok((before - rows.len()) as u64)
    }

    async fn list_involving(
        &self,
        user_id: &Uuid,
        limit: Option<i64>,
        offset: i64,
    ) -> Result<Vec<RelationshipEntity>, error::SystemError> {
        let rows = self.rows.lock().unwrap();
        let mut involving: Vec<_> = rows.iter().filter(|r| r.involves(user_id)).cloned().collect();
        involving.sort_by(|a, b| b.date_requested.cmp(&a.date_requested));
        Ok(involving
            .into_iter()
            .skip(offset as usize)
            .take(limit.map_or(usize::MAX, |l| l as usize))
            .collect())
    }

    async fn list_by_status(
        &self,
        user_id: &Uuid,
        status: RelationStatus,
        limit: Option<i64>,
        offset: i64,
    ) -> Result<Vec<RelationshipEntity>, error::SystemError> {
        let all = self.list_involving(user_id, None, 0).await?;
        Ok(all
            .into_iter()
            .filter(|r| r.status == status)
            .skip(offset as usize)
            .take(limit.map_or(usize::MAX, |l| l as usize))
            .collect())
    }

    async fn friend_ids(&self, user_id: &Uuid) -> Result<Vec<Uuid>, error::SystemError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|r| r.involves(user_id) && r.status == RelationStatus::Accepted)
            .map(|r| r.friend_id(user_id))
            .collect())
    }

    async fn count_by_status(
        &self,
        user_id: &Uuid,
        status: RelationStatus,
    ) -> Result<i64, error::SystemError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|r| r.involves(user_id) && r.status == status)
            .count() as i64)
    }

    async fn count_sent(
        &self,
        user_id: &Uuid,
        status: RelationStatus,
    ) -> Result<i64, error::SystemError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|r| r.requester_id == *user_id && r.status == status)
            .count() as i64)
    }

    async fn count_received(
        &self,
        user_id: &Uuid,
        status: RelationStatus,
    ) -> Result<i64, error::SystemError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|r| r.receiver_id == *user_id && r.status == status)
            .count() as i64)
    }
}
