//! Owners, syndics and managers named by an order.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::Address;

/// Legal role of a party.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PartyRole {
    /// Owner of the building or lot.
    Proprio,
    /// Syndic of the co-ownership.
    Syndic,
    /// Managing agent (gestionnaire).
    Gest,
}

/// An identified party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    /// Role the party was found in.
    pub role: PartyRole,
    /// Identity; the canonical form when the name matched a known entity.
    pub name: String,
    /// Whether the name matched the known-entity dictionary.
    pub known_entity: bool,
    /// Address following the identity, if any.
    pub address: Option<Address>,
}
