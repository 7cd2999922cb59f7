//! Listing status state machine.
//!
//! The permitted edges live in a single static table so they can be audited
//! and tested apart from the code that applies them.

use bizlist_common::{AppError, AppResult};
use bizlist_db::entities::listing::ListingStatus;

use ListingStatus::{Draft, Published, Sold, UnderOffer, Unpublished};

/// Every status and the statuses a broker may move it to.
pub const TRANSITIONS: &[(ListingStatus, &[ListingStatus])] = &[
    (Draft, &[Published, Unpublished]),
    (Published, &[UnderOffer, Unpublished]),
    (UnderOffer, &[Published, Sold]),
    (Sold, &[]),
    (Unpublished, &[Published]),
];

/// Statuses reachable in one step from `from`.
#[must_use]
pub fn allowed_transitions(from: ListingStatus) -> &'static [ListingStatus] {
    TRANSITIONS
        .iter()
        .find(|(status, _)| *status == from)
        .map_or(&[], |(_, next)| *next)
}

/// Whether `from -> to` is a permitted edge.
#[must_use]
pub fn can_transition(from: ListingStatus, to: ListingStatus) -> bool {
    allowed_transitions(from).contains(&to)
}

/// Check an edge, naming both states on failure.
pub fn check_transition(from: ListingStatus, to: ListingStatus) -> AppResult<()> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(AppError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}
