//! Status enums for various entities.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a grocery order.
///
/// New orders are always created as [`OrderStatus::Pending`]; the remaining
/// transitions are driven by the fulfilment side, outside this workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "order_status", rename_all = "PascalCase")
)]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Confirmed => write!(f, "Confirmed"),
            Self::OutForDelivery => write!(f, "Out for delivery"),
            Self::Delivered => write!(f, "Delivered"),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// How sure the matcher is that it resolved the product the shopper meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Exact,
    High,
    Medium,
    Low,
    None,
}

impl Confidence {
    /// Whether a match at this confidence should be echoed back to the
    /// shopper with a "did you mean" style note.
    #[must_use]
    pub const fn needs_confirmation(self) -> bool {
        matches!(self, Self::Medium | Self::Low)
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Exact => "exact",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::None => "none",
        };
        f.write_str(s)
    }
}

/// Which matching strategy produced a result. Used for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Exact,
    Plural,
    Cleaned,
    Fuzzy,
    Partial,
    None,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_serializes_snake_case() {
        let json = serde_json::to_string(&Confidence::Medium).unwrap_or_default();
        assert_eq!(json, "\"medium\"");
    }

    #[test]
    fn test_confidence_needs_confirmation() {
        assert!(!Confidence::Exact.needs_confirmation());
        assert!(!Confidence::High.needs_confirmation());
        assert!(Confidence::Medium.needs_confirmation());
        assert!(Confidence::Low.needs_confirmation());
    }

    #[test]
    fn test_order_status_display() {
        assert_eq!(OrderStatus::default().to_string(), "Pending");
        assert_eq!(OrderStatus::OutForDelivery.to_string(), "Out for delivery");
    }
}
