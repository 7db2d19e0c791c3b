//! PostgreSQL Repository Implementations

use crate::domain::caller::{Caller, UserRole};
use crate::domain::entity::{Booking, BookingRecord, EntryState, EntryTransition};
use crate::domain::repository::{BookingRepository, IdentityRepository};
use crate::error::{EntryError, EntryResult};
use kernel::id::{BookingId, Id, UserId};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL-backed repository
#[derive(Clone)]
pub struct PgEntryRepository {
    pool: PgPool,
}

impl PgEntryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl BookingRepository for PgEntryRepository {
    async fn find_for_entry(&self, booking_id: &BookingId) -> EntryResult<Option<BookingRecord>> {
        let row = sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT
                b.booking_id,
                b.user_id,
                b.event_id,
                b.ticket_id,
                b.quantity,
                b.customer_name,
                b.customer_email,
                b.validated,
                b.validated_at_ms,
                b.scanned,
                b.scanned_at_ms,
                e.event_name,
                e.created_by AS event_owner,
                t.ticket_name
            FROM bookings b
            LEFT JOIN events e ON e.event_id = b.event_id
            LEFT JOIN tickets t ON t.ticket_id = b.ticket_id
            WHERE b.booking_id = $1
            "#,
        )
        .bind(booking_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(BookingRow::into_record).transpose()
    }

    async fn conditional_update(
        &self,
        booking_id: &BookingId,
        transition: EntryTransition,
    ) -> EntryResult<bool> {
        // Precondition lives in the WHERE clause; rows_affected picks the winner
        let query = match transition {
            EntryTransition::Scan { at_ms } => sqlx::query(
                r#"
                UPDATE bookings
                SET scanned = TRUE, scanned_at_ms = $2
                WHERE booking_id = $1 AND scanned = FALSE
                "#,
            )
            .bind(booking_id.as_str())
            .bind(at_ms),
            EntryTransition::Validate { at_ms } => sqlx::query(
                r#"
                UPDATE bookings
                SET validated = TRUE, validated_at_ms = $2
                WHERE booking_id = $1 AND scanned = FALSE AND validated = FALSE
                "#,
            )
            .bind(booking_id.as_str())
            .bind(at_ms),
            EntryTransition::ClearValidation => sqlx::query(
                r#"
                UPDATE bookings
                SET validated = FALSE, validated_at_ms = NULL
                WHERE booking_id = $1 AND scanned = FALSE AND validated = TRUE
                "#,
            )
            .bind(booking_id.as_str()),
            EntryTransition::ResetScan => sqlx::query(
                r#"
                UPDATE bookings
                SET scanned = FALSE, scanned_at_ms = NULL,
                    validated = FALSE, validated_at_ms = NULL
                WHERE booking_id = $1 AND scanned = TRUE
                "#,
            )
            .bind(booking_id.as_str()),
        };

        let affected = query.execute(&self.pool).await?.rows_affected();

        tracing::debug!(
            booking_id = %booking_id,
            transition = transition.name(),
            affected,
            "Conditional entry update"
        );

        Ok(affected == 1)
    }

    async fn count_for_user(&self, user_id: &UserId) -> EntryResult<u64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bookings WHERE user_id = $1")
            .bind(user_id.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(count.max(0) as u64)
    }
}

impl IdentityRepository for PgEntryRepository {
    async fn find_caller_by_session(
        &self,
        session_id: Uuid,
        now_ms: i64,
    ) -> EntryResult<Option<Caller>> {
        let row = sqlx::query_as::<_, CallerRow>(
            r#"
            SELECT u.user_id, u.user_role
            FROM auth_sessions s
            JOIN users u ON u.user_id = s.user_id
            WHERE s.session_id = $1 AND s.expires_at_ms > $2
            "#,
        )
        .bind(session_id)
        .bind(now_ms)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let Some(role) = UserRole::from_id(row.user_role) else {
            tracing::error!(user_role = row.user_role, "Invalid UserRole id");
            return Ok(None);
        };

        Ok(Some(Caller::new(parse_id(row.user_id)?, role)))
    }
}

fn parse_id<T>(raw: String) -> EntryResult<Id<T>> {
    Id::parse(raw).map_err(|e| EntryError::Internal(format!("stored identifier rejected: {e}")))
}

// Internal row types for sqlx mapping
#[derive(sqlx::FromRow)]
struct BookingRow {
    booking_id: String,
    user_id: String,
    event_id: String,
    ticket_id: String,
    quantity: i32,
    customer_name: String,
    customer_email: String,
    validated: bool,
    validated_at_ms: Option<i64>,
    scanned: bool,
    scanned_at_ms: Option<i64>,
    event_name: Option<String>,
    event_owner: Option<String>,
    ticket_name: Option<String>,
}

impl BookingRow {
    fn into_record(self) -> EntryResult<BookingRecord> {
        Ok(BookingRecord {
            booking: Booking {
                id: parse_id(self.booking_id)?,
                user_id: parse_id(self.user_id)?,
                event_id: parse_id(self.event_id)?,
                ticket_id: parse_id(self.ticket_id)?,
                quantity: self.quantity,
                customer_name: self.customer_name,
                customer_email: self.customer_email,
                entry: EntryState {
                    validated: self.validated,
                    validated_at_ms: self.validated_at_ms,
                    scanned: self.scanned,
                    scanned_at_ms: self.scanned_at_ms,
                },
            },
            event_name: self.event_name,
            event_owner: self.event_owner.map(parse_id).transpose()?,
            ticket_name: self.ticket_name,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CallerRow {
    user_id: String,
    user_role: i16,
}
