//! # scheduling-engine
//!
//! Meeting scheduling across fixed UTC-offset timezones.
//!
//! Every participant works 08:00-18:00 local time. The engine turns those
//! local hours into UTC windows (which may wrap past midnight), intersects
//! them, rejects bookings that fall outside anyone's hours or collide with an
//! existing meeting, and proposes ranked alternative slots.
//!
//! ## Modules
//!
//! - [`timezone`]: fixed-offset labels such as `UTC-3:00`, parsed leniently
//! - [`working_hours`]: per-participant UTC working windows and the literal hours check
//! - [`overlap`]: common working window for a group
//! - [`conflict`]: overlapping meetings and conflict groups
//! - [`slots`]: free-slot search over a date range
//! - [`ranking`]: recommendation tiers for candidate slots
//! - [`analysis`]: the conflict-analysis report and its text summary
//! - [`engine`]: [`SchedulingEngine`], which ties the above to a [`SchedulingStore`]
//! - [`store`]: the storage trait and an in-memory implementation
//! - [`model`], [`config`], [`clock`], [`error`]: supporting types

pub mod analysis;
pub mod clock;
pub mod config;
pub mod conflict;
pub mod engine;
pub mod error;
pub mod model;
pub mod overlap;
pub mod ranking;
pub mod slots;
pub mod store;
pub mod timezone;
pub mod working_hours;

pub use analysis::{ConflictAnalysis, ConflictEntry, SuggestedSlot};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::EngineConfig;
pub use engine::{
    AnalysisRequest, Rejection, ScheduleOutcome, ScheduleRequest, ScheduleResponse,
    SchedulingEngine,
};
pub use error::SchedulingError;
pub use model::{CalendarSnapshot, Meeting, MeetingId, MeetingView, Participant, ParticipantId};
pub use ranking::Recommendation;
pub use slots::AvailableSlot;
pub use store::{InMemoryStore, SchedulingStore};
pub use timezone::TimeZoneOffset;
