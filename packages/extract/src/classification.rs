//! Legal classification, urgency and the demolition / habitability flags.
//!
//! The cascade is ordered: lifting and repeal orders quote the order they
//! cancel, so they are tested before the order types themselves.

use std::sync::LazyLock;

use arretes_document_models::{Classification, Urgency};
use arretes_patterns::classification::{
    ABROGATION_INTERDICTION_RE, DECONSTRUCTION_RE, DEMOLITION_RE, EQUIPEMENTS_COMMUNS_RE,
    INTERDICTION_RE, MAINLEVEE_PARTIELLE_RE, MAINLEVEE_RE, MISE_EN_SECURITE_RE,
    MODIFICATIF_INTERDICTION_RE, ORDINARY_RE, PERIL_GRAVE_IMMINENT_RE, PERIL_ORDINAIRE_RE,
    URGENT_RE,
};
use regex::Regex;

static CASCADE: [(Classification, &LazyLock<Regex>); 10] = [
    (Classification::MainleveePartielle, &MAINLEVEE_PARTIELLE_RE),
    (Classification::Mainlevee, &MAINLEVEE_RE),
    (Classification::AbrogationInterdiction, &ABROGATION_INTERDICTION_RE),
    (Classification::ModificatifInterdiction, &MODIFICATIF_INTERDICTION_RE),
    (Classification::Deconstruction, &DECONSTRUCTION_RE),
    (Classification::PerilGraveImminent, &PERIL_GRAVE_IMMINENT_RE),
    (Classification::EquipementsCommuns, &EQUIPEMENTS_COMMUNS_RE),
    (Classification::MiseEnSecurite, &MISE_EN_SECURITE_RE),
    (Classification::PerilOrdinaire, &PERIL_ORDINAIRE_RE),
    (Classification::InterdictionOccuper, &INTERDICTION_RE),
];

/// Order type of `text`, with the urgency that goes with it.
#[must_use]
pub fn classify(text: &str) -> Option<(Classification, Urgency)> {
    let classe = CASCADE
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(classe, _)| *classe)?;
    Some((classe, urgency(classe, text)))
}

/// Urgency implied by a classification.
///
/// Lifting and repeal orders have none. Only the safety orders exist in
/// both procedures; for them the text decides, and says nothing more often
/// than not.
#[must_use]
pub fn urgency(classe: Classification, text: &str) -> Urgency {
    if classe.is_lifting() {
        return Urgency::NonApplicable;
    }
    match classe {
        Classification::PerilGraveImminent => Urgency::Oui,
        Classification::PerilOrdinaire => Urgency::Non,
        Classification::MiseEnSecurite | Classification::EquipementsCommuns => {
            if URGENT_RE.is_match(text) {
                Urgency::Oui
            } else if ORDINARY_RE.is_match(text) {
                Urgency::Non
            } else {
                Urgency::OuiOuNon
            }
        }
        _ => Urgency::NonApplicable,
    }
}

/// Whether `text` prescribes a demolition.
#[must_use]
pub fn is_demolition(text: &str) -> bool {
    DEMOLITION_RE.is_match(text)
}

/// Whether `text` bans occupying or living in the building.
#[must_use]
pub fn is_habitability_ban(text: &str) -> bool {
    INTERDICTION_RE.is_match(text)
}
