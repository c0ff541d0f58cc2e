//! Test observations under mixed censoring.

use serde::{Deserialize, Serialize};

/// How much of a unit's failure time is known.
///
/// The integer codes match the persisted test-record encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CensoringKind {
    /// Exact failure time observed.
    Complete,
    /// Unit still running at `time`; failure is later.
    RightCensored,
    /// Failure between `last_inspection_time` and `time`.
    IntervalCensored,
    /// Failure before the first inspection at `time`.
    LeftCensored,
}

impl CensoringKind {
    pub const ALL: [CensoringKind; 4] = [
        CensoringKind::Complete,
        CensoringKind::RightCensored,
        CensoringKind::IntervalCensored,
        CensoringKind::LeftCensored,
    ];

    /// Persisted integer code.
    pub fn code(self) -> u8 {
        match self {
            CensoringKind::Complete => 0,
            CensoringKind::RightCensored => 1,
            CensoringKind::IntervalCensored => 2,
            CensoringKind::LeftCensored => 3,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(CensoringKind::Complete),
            1 => Some(CensoringKind::RightCensored),
            2 => Some(CensoringKind::IntervalCensored),
            3 => Some(CensoringKind::LeftCensored),
            _ => None,
        }
    }

    /// Whether the observation bounds a failure that already happened.
    pub fn is_failure(self) -> bool {
        !matches!(self, CensoringKind::RightCensored)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CensoringKind::Complete => "complete",
            CensoringKind::RightCensored => "right_censored",
            CensoringKind::IntervalCensored => "interval_censored",
            CensoringKind::LeftCensored => "left_censored",
        }
    }
}

impl std::fmt::Display for CensoringKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CensoringKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "complete" | "exact" | "0" => Ok(CensoringKind::Complete),
            "right_censored" | "right" | "1" => Ok(CensoringKind::RightCensored),
            "interval_censored" | "interval" | "2" => Ok(CensoringKind::IntervalCensored),
            "left_censored" | "left" | "3" => Ok(CensoringKind::LeftCensored),
            _ => Err(format!("unknown censoring kind: {}", s)),
        }
    }
}

/// One test record contributing to an analysis group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Failure time, censoring cutoff, interval upper bound, or first
    /// inspection time, depending on `kind`.
    pub time: f64,
    /// Interval lower bound; zero for the other kinds.
    #[serde(default)]
    pub last_inspection_time: f64,
    pub kind: CensoringKind,
    /// Number of identical units this record stands for.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl Observation {
    pub fn new(time: f64, kind: CensoringKind) -> Self {
        Self {
            time,
            last_inspection_time: 0.0,
            kind,
            quantity: 1,
        }
    }

    pub fn complete(time: f64) -> Self {
        Self::new(time, CensoringKind::Complete)
    }

    pub fn right_censored(time: f64) -> Self {
        Self::new(time, CensoringKind::RightCensored)
    }

    /// Failure somewhere in `(lower, upper]`.
    pub fn interval(lower: f64, upper: f64) -> Self {
        Self {
            last_inspection_time: lower,
            ..Self::new(upper, CensoringKind::IntervalCensored)
        }
    }

    pub fn left_censored(time: f64) -> Self {
        Self::new(time, CensoringKind::LeftCensored)
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Single time representing this observation's failure, used for the
    /// initial guess and for probability plotting.
    ///
    /// Complete and left-censored records use `time`, interval records the
    /// interval midpoint. Right-censored records have none.
    pub fn pseudo_failure_time(&self) -> Option<f64> {
        match self.kind {
            CensoringKind::Complete | CensoringKind::LeftCensored => Some(self.time),
            CensoringKind::IntervalCensored => Some((self.last_inspection_time + self.time) / 2.0),
            CensoringKind::RightCensored => None,
        }
    }
}
