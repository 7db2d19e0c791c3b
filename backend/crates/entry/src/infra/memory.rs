//! In-memory repository
//!
//! Same contract as the PostgreSQL store; every conditional update runs
//! under one write lock. Used by tests and local runs without a database.

use crate::domain::caller::{Caller, UserRole};
use crate::domain::entity::{Booking, BookingRecord, EntryTransition};
use crate::domain::repository::{BookingRepository, IdentityRepository};
use crate::error::EntryResult;
use kernel::id::{BookingId, EventId, TicketId, UserId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct EventRow {
    name: String,
    created_by: UserId,
}

#[derive(Debug, Clone)]
struct SessionRow {
    user_id: UserId,
    expires_at_ms: i64,
}

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, UserRole>,
    sessions: HashMap<Uuid, SessionRow>,
    events: HashMap<EventId, EventRow>,
    tickets: HashMap<TicketId, String>,
    bookings: HashMap<BookingId, Booking>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryEntryRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryEntryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, user_id: UserId, role: UserRole) {
        self.tables.write().await.users.insert(user_id, role);
    }

    pub async fn insert_session(&self, session_id: Uuid, user_id: UserId, expires_at_ms: i64) {
        self.tables.write().await.sessions.insert(
            session_id,
            SessionRow {
                user_id,
                expires_at_ms,
            },
        );
    }

    pub async fn insert_event(&self, event_id: EventId, name: impl Into<String>, created_by: UserId) {
        self.tables.write().await.events.insert(
            event_id,
            EventRow {
                name: name.into(),
                created_by,
            },
        );
    }

    pub async fn insert_ticket(&self, ticket_id: TicketId, name: impl Into<String>) {
        self.tables
            .write()
            .await
            .tickets
            .insert(ticket_id, name.into());
    }

    pub async fn insert_booking(&self, booking: Booking) {
        self.tables
            .write()
            .await
            .bookings
            .insert(booking.id.clone(), booking);
    }

    pub async fn booking(&self, booking_id: &BookingId) -> Option<Booking> {
        self.tables.read().await.bookings.get(booking_id).cloned()
    }
}

impl BookingRepository for InMemoryEntryRepository {
    async fn find_for_entry(&self, booking_id: &BookingId) -> EntryResult<Option<BookingRecord>> {
        let tables = self.tables.read().await;
        let Some(booking) = tables.bookings.get(booking_id) else {
            return Ok(None);
        };
        let event = tables.events.get(&booking.event_id);

        Ok(Some(BookingRecord {
            booking: booking.clone(),
            event_name: event.map(|e| e.name.clone()),
            event_owner: event.map(|e| e.created_by.clone()),
            ticket_name: tables.tickets.get(&booking.ticket_id).cloned(),
        }))
    }

    async fn conditional_update(
        &self,
        booking_id: &BookingId,
        transition: EntryTransition,
    ) -> EntryResult<bool> {
        let mut tables = self.tables.write().await;
        let Some(booking) = tables.bookings.get_mut(booking_id) else {
            return Ok(false);
        };
        if !transition.expected().matches(&booking.entry) {
            return Ok(false);
        }
        transition.apply(&mut booking.entry);
        Ok(true)
    }

    async fn count_for_user(&self, user_id: &UserId) -> EntryResult<u64> {
        let tables = self.tables.read().await;
        Ok(tables
            .bookings
            .values()
            .filter(|b| &b.user_id == user_id)
            .count() as u64)
    }
}

impl IdentityRepository for InMemoryEntryRepository {
    async fn find_caller_by_session(
        &self,
        session_id: Uuid,
        now_ms: i64,
    ) -> EntryResult<Option<Caller>> {
        let tables = self.tables.read().await;
        let caller = tables
            .sessions
            .get(&session_id)
            .filter(|s| s.expires_at_ms > now_ms)
            .and_then(|s| {
                let role = tables.users.get(&s.user_id)?;
                Some(Caller::new(s.user_id.clone(), *role))
            });
        Ok(caller)
    }
}
