//! Release cadence between consecutive scheduled publications.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Days between consecutive releases, chosen from a fixed menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    /// One release per day
    Daily,
    /// One release every other day
    EveryOtherDay,
    /// One release per week
    Weekly,
}

impl Cadence {
    /// Days between releases.
    pub fn days(self) -> i64 {
        match self {
            Cadence::Daily => 1,
            Cadence::EveryOtherDay => 2,
            Cadence::Weekly => 7,
        }
    }

    /// Parse a front-end command (`/daily`, `/every_other_day`, `/weekly`).
    pub fn from_command(command: &str) -> Option<Self> {
        match command.trim().to_lowercase().as_str() {
            "/daily" => Some(Cadence::Daily),
            "/every_other_day" => Some(Cadence::EveryOtherDay),
            "/weekly" => Some(Cadence::Weekly),
            _ => None,
        }
    }

    /// The command string that selects this cadence.
    pub fn as_command(self) -> &'static str {
        match self {
            Cadence::Daily => "/daily",
            Cadence::EveryOtherDay => "/every_other_day",
            Cadence::Weekly => "/weekly",
        }
    }

    /// All selectable cadences, in menu order.
    pub fn all() -> [Cadence; 3] {
        [Cadence::Daily, Cadence::EveryOtherDay, Cadence::Weekly]
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cadence::Daily => write!(f, "daily"),
            Cadence::EveryOtherDay => write!(f, "every other day"),
            Cadence::Weekly => write!(f, "weekly"),
        }
    }
}
