//! Status enums for the storefront flows.

use serde::{Deserialize, Serialize};

/// Where the simulated checkout currently is.
///
/// ```text
/// Idle -> Validating -> Processing -> Completed
///             |              |
///             v              v
///          Rejected      Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStatus {
    #[default]
    Idle,
    Validating,
    Processing,
    Completed,
    Rejected,
    Cancelled,
}

impl CheckoutStatus {
    /// Whether a new submission may start from this state.
    #[must_use]
    pub const fn accepts_submit(self) -> bool {
        !matches!(self, Self::Validating | Self::Processing)
    }
}

impl std::fmt::Display for CheckoutStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Validating => write!(f, "validating"),
            Self::Processing => write!(f, "processing"),
            Self::Completed => write!(f, "completed"),
            Self::Rejected => write!(f, "rejected"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Category of a user-facing message.
///
/// `Info` marks something recoverable the user can act on (fix a form field,
/// retry a load); `Success` confirms a completed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    #[default]
    Info,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Info => write!(f, "info"),
        }
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Self::Success),
            "info" => Ok(Self::Info),
            _ => Err(format!("invalid notification kind: {s}")),
        }
    }
}
