//! Legal classification of building-safety orders.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Order types, labelled with the wording used in the output tables.
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
pub enum Classification {
    /// Partial lifting of a previous order.
    #[serde(rename = "Arrêté de mainlevée partielle")]
    #[strum(serialize = "Arrêté de mainlevée partielle")]
    MainleveePartielle,
    /// Lifting of a previous order.
    #[serde(rename = "Arrêté de mainlevée")]
    #[strum(serialize = "Arrêté de mainlevée")]
    Mainlevee,
    /// Repeal of a ban on occupancy.
    #[serde(rename = "Arrêté d'abrogation de l'interdiction d'occuper")]
    #[strum(serialize = "Arrêté d'abrogation de l'interdiction d'occuper")]
    AbrogationInterdiction,
    /// Amendment of a ban on occupancy.
    #[serde(rename = "Arrêté modificatif de l'interdiction d'occuper")]
    #[strum(serialize = "Arrêté modificatif de l'interdiction d'occuper")]
    ModificatifInterdiction,
    /// Deconstruction / demolition order.
    #[serde(rename = "Arrêté de déconstruction")]
    #[strum(serialize = "Arrêté de déconstruction")]
    Deconstruction,
    /// Serious and imminent danger (pre-2021 procedure).
    #[serde(rename = "Arrêté de péril grave et imminent")]
    #[strum(serialize = "Arrêté de péril grave et imminent")]
    PerilGraveImminent,
    /// Safety of shared equipment (lifts, heating, electrical networks).
    #[serde(rename = "Arrêté de mise en sécurité des équipements communs")]
    #[strum(serialize = "Arrêté de mise en sécurité des équipements communs")]
    EquipementsCommuns,
    /// Safety order (post-2021 procedure), urgent or ordinary.
    #[serde(rename = "Arrêté de mise en sécurité")]
    #[strum(serialize = "Arrêté de mise en sécurité")]
    MiseEnSecurite,
    /// Ordinary (non-imminent) danger.
    #[serde(rename = "Arrêté de péril ordinaire")]
    #[strum(serialize = "Arrêté de péril ordinaire")]
    PerilOrdinaire,
    /// Ban on occupying or living in the building.
    #[serde(rename = "Arrêté d'interdiction d'occuper")]
    #[strum(serialize = "Arrêté d'interdiction d'occuper")]
    InterdictionOccuper,
}

impl Classification {
    /// Whether the order lifts, repeals or amends a previous one.
    #[must_use]
    pub const fn is_lifting(self) -> bool {
        matches!(
            self,
            Self::MainleveePartielle
                | Self::Mainlevee
                | Self::AbrogationInterdiction
                | Self::ModificatifInterdiction
        )
    }
}

/// Urgency of the procedure, derived from the classification match.
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
pub enum Urgency {
    /// Urgent procedure.
    #[serde(rename = "oui")]
    #[strum(serialize = "oui")]
    Oui,
    /// Ordinary procedure.
    #[serde(rename = "non")]
    #[strum(serialize = "non")]
    Non,
    /// The order type exists in both variants and the text does not say.
    #[serde(rename = "oui ou non")]
    #[strum(serialize = "oui ou non")]
    OuiOuNon,
    /// Urgency does not apply (lifting orders, bans).
    #[serde(rename = "/")]
    #[strum(serialize = "/")]
    NonApplicable,
}
