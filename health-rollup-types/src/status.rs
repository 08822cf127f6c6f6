//! Status codes and their severity order.

use core::fmt;
use core::str::FromStr;

use thiserror::Error;

/// Health status of a component, ordered by severity.
///
/// The derived `Ord` is the severity order: a greater value is worse.
/// Combining statuses is therefore `Iterator::max`.
///
/// Serializes as the upper-case wire code. Deserializes through
/// [`FromStr`], so the same spellings are accepted from JSON, config files
/// and the command line.
///
/// ```rust
/// use health_rollup_types::Status;
///
/// assert!(Status::Up < Status::Unknown);
/// assert!(Status::Unknown < Status::OutOfService);
/// assert!(Status::OutOfService < Status::Down);
/// assert_eq!("OUT_OF_SERVICE".parse::<Status>(), Ok(Status::OutOfService));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum Status {
    /// The component is functioning as expected.
    #[default]
    Up,
    /// The component state could not be determined.
    Unknown,
    /// The component has been taken out of service on purpose.
    OutOfService,
    /// The component has failed.
    Down,
}

impl Status {
    /// Every status, least severe first.
    pub const ALL: [Status; 4] = [
        Status::Up,
        Status::Unknown,
        Status::OutOfService,
        Status::Down,
    ];

    /// Wire code for this status.
    pub const fn code(&self) -> &'static str {
        match self {
            Status::Up => "UP",
            Status::Unknown => "UNKNOWN",
            Status::OutOfService => "OUT_OF_SERVICE",
            Status::Down => "DOWN",
        }
    }

    /// Position on the severity scale, 0 being healthy.
    pub const fn severity(&self) -> u8 {
        match self {
            Status::Up => 0,
            Status::Unknown => 1,
            Status::OutOfService => 2,
            Status::Down => 3,
        }
    }

    /// Whether callers should stop routing work to a component in this state.
    pub const fn is_degraded(&self) -> bool {
        matches!(self, Status::OutOfService | Status::Down)
    }

    /// The more severe of two statuses.
    pub fn worst(self, other: Status) -> Status {
        self.max(other)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Returned when a string is not one of the known status codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized status code: {code:?}")]
pub struct ParseStatusError {
    /// The code that failed to parse.
    pub code: String,
}

impl FromStr for Status {
    type Err = ParseStatusError;

    /// Parses a status code. Matching ignores ASCII case and surrounding
    /// whitespace; `-` and `_` are interchangeable.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_");
        Status::ALL
            .into_iter()
            .find(|status| status.code().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| ParseStatusError {
                code: s.to_string(),
            })
    }
}

impl TryFrom<String> for Status {
    type Error = ParseStatusError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        code.parse()
    }
}
