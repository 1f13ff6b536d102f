//! Postal address of the building targeted by an order.

use serde::{Deserialize, Serialize};

/// One decomposed street address.
///
/// Every field is optional: a failed decomposition yields a record with
/// all fields `None` rather than no record at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Street number (`"12"`).
    pub number: Option<String>,
    /// Repetition indicator (`"bis"`, `"A"`).
    pub indicator: Option<String>,
    /// Street type and name (`"boulevard National"`).
    pub street: Option<String>,
    /// Building, residence or staircase designation.
    pub complement: Option<String>,
    /// 5-digit postal code.
    pub postal_code: Option<String>,
    /// Commune name.
    pub commune: Option<String>,
}

impl Address {
    /// Whether no field could be extracted.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.number.is_none()
            && self.indicator.is_none()
            && self.street.is_none()
            && self.complement.is_none()
            && self.postal_code.is_none()
            && self.commune.is_none()
    }

    /// Single-line normal form:
    /// `"<num><ind> <street>[, <complement>], <cp> <commune>"`.
    ///
    /// Returns `None` when there is no street.
    #[must_use]
    pub fn normalized(&self) -> Option<String> {
        let street = self.street.as_deref()?;
        let mut out = String::new();
        if let Some(number) = &self.number {
            out.push_str(number);
            if let Some(indicator) = &self.indicator {
                if indicator.len() > 1 {
                    out.push(' ');
                }
                out.push_str(indicator);
            }
            out.push(' ');
        }
        out.push_str(street);
        if let Some(complement) = &self.complement {
            out.push_str(", ");
            out.push_str(complement);
        }
        let locality: Vec<&str> = [self.postal_code.as_deref(), self.commune.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if !locality.is_empty() {
            out.push_str(", ");
            out.push_str(&locality.join(" "));
        }
        Some(out)
    }
}

/// Result of decomposing one raw address zone.
///
/// A zone naming two buildings separated by `/` is kept as a [`Pair`]
/// instead of being reconciled: which half owns the trailing postal code
/// and commune cannot be decided from the text, so the result is flagged
/// for manual review.
///
/// [`Pair`]: AddressZone::Pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressZone {
    /// One address, possibly fanned out over several numbers.
    Single(Vec<Address>),
    /// Two independent addresses.
    Pair {
        /// Addresses of the first half.
        first: Vec<Address>,
        /// Addresses of the second half.
        second: Vec<Address>,
    },
}

impl AddressZone {
    /// All addresses of the zone, first half first.
    #[must_use]
    pub fn addresses(&self) -> Vec<&Address> {
        match self {
            Self::Single(addresses) => addresses.iter().collect(),
            Self::Pair { first, second } => first.iter().chain(second).collect(),
        }
    }

    /// Consumes the zone into its addresses, first half first.
    #[must_use]
    pub fn into_addresses(self) -> Vec<Address> {
        match self {
            Self::Single(addresses) => addresses,
            Self::Pair { mut first, second } => {
                first.extend(second);
                first
            }
        }
    }

    /// Whether the zone must be reviewed by hand.
    #[must_use]
    pub const fn needs_review(&self) -> bool {
        matches!(self, Self::Pair { .. })
    }
}
