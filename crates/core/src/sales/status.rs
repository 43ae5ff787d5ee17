//! Sale status and its persisted integer encoding.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a sale.
///
/// The integer values are the persisted wire format and must not change:
/// existing rows encode their status as exactly these SMALLINT values.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum SaleStatus {
    /// Created but not yet finalized. Lines hold stock.
    Pending = 0,
    /// Finalized. Lines hold stock.
    Completed = 1,
    /// Cancelled. Lines hold no stock.
    Voided = 2,
}

impl SaleStatus {
    /// Returns the persisted SMALLINT encoding.
    #[must_use]
    pub const fn as_i16(self) -> i16 {
        self as i16
    }

    /// Decodes a persisted status value.
    #[must_use]
    pub const fn from_i16(value: i16) -> Option<Self> {
        match value {
            0 => Some(Self::Pending),
            1 => Some(Self::Completed),
            2 => Some(Self::Voided),
            _ => None,
        }
    }

    /// Whether a sale in this status currently holds stock for its lines.
    #[must_use]
    pub const fn holds_stock(self) -> bool {
        !matches!(self, Self::Voided)
    }
}

impl std::fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Voided => "voided",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for SaleStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "voided" => Ok(Self::Voided),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_encoding_is_stable() {
        assert_eq!(SaleStatus::Pending.as_i16(), 0);
        assert_eq!(SaleStatus::Completed.as_i16(), 1);
        assert_eq!(SaleStatus::Voided.as_i16(), 2);
    }

    #[test]
    fn test_decode_known_values() {
        assert_eq!(SaleStatus::from_i16(0), Some(SaleStatus::Pending));
        assert_eq!(SaleStatus::from_i16(1), Some(SaleStatus::Completed));
        assert_eq!(SaleStatus::from_i16(2), Some(SaleStatus::Voided));
        assert_eq!(SaleStatus::from_i16(3), None);
        assert_eq!(SaleStatus::from_i16(-1), None);
    }

    #[test]
    fn test_only_voided_releases_stock() {
        assert!(SaleStatus::Pending.holds_stock());
        assert!(SaleStatus::Completed.holds_stock());
        assert!(!SaleStatus::Voided.holds_stock());
    }

    #[test]
    fn test_display_and_parse_round_trip() {
        for status in [
            SaleStatus::Pending,
            SaleStatus::Completed,
            SaleStatus::Voided,
        ] {
            assert_eq!(status.to_string().parse::<SaleStatus>(), Ok(status));
        }
        assert!("cancelled".parse::<SaleStatus>().is_err());
    }
}
