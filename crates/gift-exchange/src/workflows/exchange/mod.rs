//! Secret-gift exchange workflow: signup, constrained draw, commit, reveal.
//!
//! The draw itself is pure and repository-free; only the commit phase writes,
//! one row at a time, with a compensating rollback if the sequence fails
//! partway. The completion flag is flipped strictly after every row write has
//! succeeded, so a half-finished draw is never observable.

pub mod domain;
pub mod draw;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    DrawCandidate, DrawStatus, EventSettings, ExchangeStatusView, GroupTag, ParticipantId,
    ParticipantProfile, ParticipantView, RecipientView, SignupRequest,
};
pub use draw::{
    is_valid_pair, AssignmentMapping, DrawConfig, DrawEngine, DrawError, DrawOutcome,
    GroupDrawReport,
};
pub use repository::{ParticipantRecord, ParticipantRepository, RepositoryError};
pub use router::exchange_router;
pub use service::{DrawSummary, ExchangeServiceError, GiftExchangeService, SignupError};
