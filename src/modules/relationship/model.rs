use serde::Serialize;
use uuid::Uuid;

/// Order-independent key for a user pair. Every direction-agnostic
/// lookup and the storage uniqueness constraint go through this
/// normalization, so `(a, b)` and `(b, a)` always resolve to the same
/// row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairKey {
    pub low: Uuid,
    pub high: Uuid,
}

impl PairKey {
    pub fn normalize(a: Uuid, b: Uuid) -> Self {
        if a <= b {
            PairKey { low: a, high: b }
        } else {
            PairKey { low: b, high: a }
        }
    }
}

/// Per-user relationship counts for dashboard/profile reads.
#[derive(Debug, Clone, Serialize)]
pub struct FriendStatistics {
    pub friends: i64,
    pub pending_sent: i64,
    pub pending_received: i64,
    pub blocked: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_key_is_order_independent() {
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        assert_eq!(PairKey::normalize(a, b), PairKey::normalize(b, a));
        assert!(PairKey::normalize(a, b).low <= PairKey::normalize(a, b).high);
    }

    #[test]
    fn pair_key_of_equal_ids_is_degenerate() {
        let a = Uuid::now_v7();
        let key = PairKey::normalize(a, a);
        assert_eq!(key.low, key.high);
    }
}
