//! # Usage Ledger
//!
//! Records and counts coupon consumption, enforcing the global usage cap.
//!
//! ## The One Race This Design Exists To Prevent
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Two checkouts race for the LAST use of a capped coupon:               │
//! │                                                                         │
//! │  ❌ WRONG: read count, then insert (check and write are separate)      │
//! │     A: SELECT COUNT(*) → 0        B: SELECT COUNT(*) → 0               │
//! │     A: INSERT row                 B: INSERT row                        │
//! │     → 2 uses of a max_uses=1 coupon. Invariant broken.                 │
//! │                                                                         │
//! │  ✅ CORRECT: ONE conditional INSERT whose WHERE clause re-checks       │
//! │     headroom against the persisted count:                              │
//! │                                                                         │
//! │     INSERT INTO discount_usage (...)                                   │
//! │     SELECT ...                                                         │
//! │     FROM coupon_discounts c                                            │
//! │     WHERE c.id = ?                                                     │
//! │       AND (c.max_uses IS NULL                                          │
//! │            OR (SELECT COUNT(*) FROM discount_usage u                   │
//! │                WHERE u.coupon_id = c.id) < c.max_uses)                 │
//! │                                                                         │
//! │     SQLite executes the statement atomically and writers serialize,    │
//! │     so at most max_uses inserts can ever succeed. rows_affected = 0    │
//! │     means the slot was gone: AlreadyExhausted.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The same statement runs either standalone ([`UsageLedger::record_use`])
//! or on a caller-supplied connection inside the order-creation transaction
//! ([`UsageLedger::record_use_in`]), so the usage fact commits or rolls
//! back together with the order.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use bazaar_core::DiscountUsageRecord;

/// Outcome of a usage-recording attempt.
#[derive(Debug, Clone)]
pub enum RecordUse {
    /// A usage slot was claimed; the fact was inserted.
    Recorded(DiscountUsageRecord),
    /// No headroom remained - a concurrent checkout took the last slot.
    AlreadyExhausted,
}

impl RecordUse {
    /// True if the use was recorded.
    pub fn is_recorded(&self) -> bool {
        matches!(self, RecordUse::Recorded(_))
    }
}

/// The coupon usage ledger.
#[derive(Debug, Clone)]
pub struct UsageLedger {
    pool: SqlitePool,
}

impl UsageLedger {
    /// Creates a new UsageLedger.
    pub fn new(pool: SqlitePool) -> Self {
        UsageLedger { pool }
    }

    /// Returns how many times a coupon has been consumed.
    pub async fn count_uses(&self, coupon_id: &str) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM discount_usage WHERE coupon_id = ?1")
                .bind(coupon_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Lists the usage facts for a coupon, newest first.
    pub async fn list_uses(&self, coupon_id: &str) -> DbResult<Vec<DiscountUsageRecord>> {
        let records = sqlx::query_as::<_, DiscountUsageRecord>(
            "SELECT id, coupon_id, user_id, used_at \
             FROM discount_usage WHERE coupon_id = ?1 ORDER BY used_at DESC",
        )
        .bind(coupon_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Attempts to record one coupon use, atomically checking headroom.
    ///
    /// This is THE single point where "is there still headroom" and the
    /// insertion of the usage fact happen together. The committed count
    /// never exceeds `max_uses`, under any concurrent interleaving.
    ///
    /// ## Returns
    /// * `Ok(RecordUse::Recorded(_))` - slot claimed, fact inserted
    /// * `Ok(RecordUse::AlreadyExhausted)` - cap already reached
    /// * `Err(DbError::NotFound)` - no such coupon
    pub async fn record_use(
        &self,
        coupon_id: &str,
        user_id: &str,
        at: DateTime<Utc>,
    ) -> DbResult<RecordUse> {
        let record = DiscountUsageRecord {
            id: generate_usage_id(),
            coupon_id: coupon_id.to_string(),
            user_id: user_id.to_string(),
            used_at: at,
        };

        let mut conn = self.pool.acquire().await?;
        Self::record_use_in(&mut conn, &record).await
    }

    /// Same as [`UsageLedger::record_use`], but on a caller-supplied
    /// connection - typically the order-creation transaction, so the usage
    /// fact commits or rolls back together with the order and its items.
    pub async fn record_use_in(
        conn: &mut SqliteConnection,
        record: &DiscountUsageRecord,
    ) -> DbResult<RecordUse> {
        debug!(coupon_id = %record.coupon_id, user_id = %record.user_id, "Recording coupon use");

        // The headroom check and the insert are ONE statement. Splitting
        // them into a read followed by a write would reintroduce the race.
        let result = sqlx::query(
            "INSERT INTO discount_usage (id, coupon_id, user_id, used_at)
             SELECT ?1, ?2, ?3, ?4
             FROM coupon_discounts c
             WHERE c.id = ?2
               AND (c.max_uses IS NULL
                    OR (SELECT COUNT(*) FROM discount_usage u
                        WHERE u.coupon_id = c.id) < c.max_uses)",
        )
        .bind(&record.id)
        .bind(&record.coupon_id)
        .bind(&record.user_id)
        .bind(record.used_at)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 1 {
            return Ok(RecordUse::Recorded(record.clone()));
        }

        // Zero rows: either the coupon is gone or the cap was reached.
        let exists: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM coupon_discounts WHERE id = ?1")
                .bind(&record.coupon_id)
                .fetch_optional(&mut *conn)
                .await?;

        if exists.is_none() {
            return Err(DbError::not_found("Coupon", &record.coupon_id));
        }

        debug!(coupon_id = %record.coupon_id, "Coupon exhausted, use not recorded");
        Ok(RecordUse::AlreadyExhausted)
    }
}

/// Helper to generate a new usage record ID.
pub fn generate_usage_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{seed_coupon, test_db};

    #[tokio::test]
    async fn test_count_starts_at_zero() {
        let db = test_db().await;
        let coupon = seed_coupon(&db, "SAVE30", 3000, Some(5)).await;

        assert_eq!(db.usage().count_uses(&coupon.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_cap_is_never_exceeded() {
        let db = test_db().await;
        let coupon = seed_coupon(&db, "CAPPED3", 1000, Some(3)).await;
        let ledger = db.usage();
        let now = Utc::now();

        for i in 0..3 {
            let outcome = ledger
                .record_use(&coupon.id, &format!("user-{i}"), now)
                .await
                .unwrap();
            assert!(outcome.is_recorded(), "use {i} should be recorded");
        }

        // The (N+1)-th attempt loses, and the count stays at N.
        let outcome = ledger.record_use(&coupon.id, "user-late", now).await.unwrap();
        assert!(matches!(outcome, RecordUse::AlreadyExhausted));
        assert_eq!(ledger.count_uses(&coupon.id).await.unwrap(), 3);

        // Exhausted is absorbing: retrying never helps.
        let outcome = ledger.record_use(&coupon.id, "user-late", now).await.unwrap();
        assert!(matches!(outcome, RecordUse::AlreadyExhausted));
        assert_eq!(ledger.count_uses(&coupon.id).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_unlimited_coupon_never_exhausts() {
        let db = test_db().await;
        let coupon = seed_coupon(&db, "FOREVER", 500, None).await;
        let ledger = db.usage();
        let now = Utc::now();

        for i in 0..10 {
            let outcome = ledger
                .record_use(&coupon.id, &format!("user-{i}"), now)
                .await
                .unwrap();
            assert!(outcome.is_recorded());
        }
        assert_eq!(ledger.count_uses(&coupon.id).await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_zero_cap_is_born_exhausted() {
        let db = test_db().await;
        let coupon = seed_coupon(&db, "NEVER", 500, Some(0)).await;

        let outcome = db
            .usage()
            .record_use(&coupon.id, "user-1", Utc::now())
            .await
            .unwrap();
        assert!(matches!(outcome, RecordUse::AlreadyExhausted));
    }

    #[tokio::test]
    async fn test_missing_coupon_is_not_found() {
        let db = test_db().await;

        let err = db
            .usage()
            .record_use("missing", "user-1", Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_racing_uses_for_the_last_slot() {
        let db = test_db().await;
        let coupon = seed_coupon(&db, "LAST1", 5000, Some(1)).await;
        let now = Utc::now();

        let ledger_a = db.usage();
        let ledger_b = db.usage();
        let id_a = coupon.id.clone();
        let id_b = coupon.id.clone();

        let (a, b) = tokio::join!(
            tokio::spawn(async move { ledger_a.record_use(&id_a, "user-a", now).await }),
            tokio::spawn(async move { ledger_b.record_use(&id_b, "user-b", now).await }),
        );

        let outcomes = [a.unwrap().unwrap(), b.unwrap().unwrap()];
        let recorded = outcomes.iter().filter(|o| o.is_recorded()).count();
        assert_eq!(recorded, 1, "exactly one contender may win the last slot");
        assert_eq!(db.usage().count_uses(&coupon.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_uses() {
        let db = test_db().await;
        let coupon = seed_coupon(&db, "SAVE30", 3000, None).await;
        let now = Utc::now();

        db.usage()
            .record_use(&coupon.id, "user-1", now)
            .await
            .unwrap();
        db.usage()
            .record_use(&coupon.id, "user-2", now)
            .await
            .unwrap();

        let uses = db.usage().list_uses(&coupon.id).await.unwrap();
        assert_eq!(uses.len(), 2);
        assert!(uses.iter().all(|u| u.coupon_id == coupon.id));
    }
}
