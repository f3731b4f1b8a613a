use serde::{Deserialize, Serialize};
use std::fmt;

/// Directional call for one bar. `Neutral` means no trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
    Neutral,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => write!(f, "Long"),
            Direction::Short => write!(f, "Short"),
            Direction::Neutral => write!(f, "Neutral"),
        }
    }
}

/// Per-bar classifier output handed to the execution side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeSignal {
    pub direction: Direction,
    pub long_probability: f64,
    pub short_probability: f64,
}

impl TradeSignal {
    pub fn neutral() -> Self {
        Self {
            direction: Direction::Neutral,
            long_probability: 0.0,
            short_probability: 0.0,
        }
    }

    pub fn is_actionable(&self) -> bool {
        !matches!(self.direction, Direction::Neutral)
    }
}
