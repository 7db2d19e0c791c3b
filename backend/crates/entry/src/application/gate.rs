//! Token checks shared by scan and validate
//!
//! Order: decode, booking lookup, operator authorization, ticket match,
//! signature, freshness. Nothing here mutates state.

use crate::domain::caller::Caller;
use crate::domain::entity::BookingRecord;
use crate::domain::policy::can_operate_gate;
use crate::domain::repository::BookingRepository;
use crate::error::{EntryError, EntryResult};
use qr_token::TokenVerifier;

pub(crate) async fn check_token<R>(
    repo: &R,
    verifier: &TokenVerifier,
    caller: &Caller,
    raw_token: &str,
    now_ms: i64,
) -> EntryResult<BookingRecord>
where
    R: BookingRepository,
{
    let payload = verifier.decode(raw_token)?;

    let record = repo
        .find_for_entry(&payload.booking_id)
        .await?
        .ok_or(EntryError::BookingNotFound)?;

    if !can_operate_gate(caller, &record) {
        tracing::warn!(
            booking_id = %payload.booking_id,
            user_id = %caller.user_id,
            "Caller may not operate this gate"
        );
        return Err(EntryError::NotAuthorized);
    }

    if record.booking.ticket_id != payload.ticket_id {
        tracing::warn!(
            booking_id = %payload.booking_id,
            "Token ticket does not match booking"
        );
        return Err(EntryError::Tampered);
    }

    verifier.check_signature(&payload)?;
    verifier.check_freshness(&payload, now_ms)?;

    Ok(record)
}
