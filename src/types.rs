//! Shared primitive types and enums.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Numbered parking slot, `1..=capacity`.
pub type SlotNumber = u32;

/// Longest plate accepted by the format check.
pub const MAX_PLATE_LEN: usize = 10;

/// Direction of a parking event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    /// Vehicle entered and took a slot.
    In,
    /// Vehicle left its slot.
    Out,
    /// Any status text other than `IN`/`OUT` found in stored data.
    Unknown(String),
}

impl Status {
    /// Parses stored status text, case-insensitively.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "IN" => Self::In,
            "OUT" => Self::Out,
            _ => Self::Unknown(raw.to_string()),
        }
    }

    /// Text written to durable storage.
    pub fn as_str(&self) -> &str {
        match self {
            Self::In => "IN",
            Self::Out => "OUT",
            Self::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived per-plate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlateState {
    /// No events, or the latest event is not `IN`.
    Outside,
    /// Latest event is `IN`.
    Inside,
}

/// Role gating a set of menu operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Records entries and exits.
    Attendant,
    /// Reviews occupancy and daily activity.
    Supervisor,
}

impl Role {
    /// Lowercase role name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Attendant => "attendant",
            Self::Supervisor => "supervisor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
