//! Rank candidate slots by how pleasant the local time is for everyone.
//!
//! Each participant scores the slot's local start hour; the average decides
//! the [`Recommendation`] tier. Ranking only orders suggestions, it never
//! rejects one.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Participant;
use crate::working_hours::local_hour;

/// How good a slot is for the group, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    Ideal,
    Good,
    Acceptable,
    NotRecommended,
}

impl Recommendation {
    /// Tier weight used for ordering: Ideal = 4 down to NotRecommended = 1.
    pub fn weight(&self) -> u8 {
        match self {
            Recommendation::Ideal => 4,
            Recommendation::Good => 3,
            Recommendation::Acceptable => 2,
            Recommendation::NotRecommended => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::Ideal => "Ideal",
            Recommendation::Good => "Good",
            Recommendation::Acceptable => "Acceptable",
            Recommendation::NotRecommended => "Not recommended",
        }
    }

    fn from_average(average: f64) -> Self {
        if average >= 3.5 {
            Recommendation::Ideal
        } else if average >= 2.5 {
            Recommendation::Good
        } else if average >= 1.5 {
            Recommendation::Acceptable
        } else {
            Recommendation::NotRecommended
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Desirability of a local start hour, 0 (outside working hours) to 4.
///
/// Mid-morning and mid-afternoon are best; lunch, 09:00 and 16:00 are good;
/// the first and last working hour are tolerable.
pub fn hour_score(hour: u32) -> u8 {
    match hour {
        10 | 11 | 14 | 15 => 4,
        9 | 12 | 13 | 16 => 3,
        8 | 17 => 2,
        18 => 1,
        _ => 0,
    }
}

/// Score a slot starting at `start` for every participant and map the average to a tier.
///
/// An empty participant list is `NotRecommended`.
pub fn recommend(start: DateTime<Utc>, participants: &[Participant]) -> Recommendation {
    if participants.is_empty() {
        return Recommendation::NotRecommended;
    }

    let total: u32 = participants
        .iter()
        .map(|p| u32::from(hour_score(local_hour(p, start))))
        .sum();
    let average = f64::from(total) / participants.len() as f64;

    Recommendation::from_average(average)
}

/// Order items best tier first, then chronologically, and keep at most `limit`.
pub fn rank_by<T, F>(mut items: Vec<T>, limit: usize, key: F) -> Vec<T>
where
    F: Fn(&T) -> (Recommendation, DateTime<Utc>),
{
    items.sort_by_key(|item| key(item));
    items.truncate(limit);
    items
}
