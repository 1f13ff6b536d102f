//! Cadastral parcel references.
//!
//! Marseille references carry a district (arrondissement) and a quarter
//! code before the section and parcel number (`201 015 B 0042`); other
//! communes only use a section and a parcel number (`AB 123`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// The two mutually exclusive reference shapes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CadastralForm {
    /// Marseille form with arrondissement and quarter codes.
    Marseille {
        /// 3-digit district code (`"201"` for the 1st arrondissement).
        district: String,
        /// 3-digit quarter code.
        quarter: String,
    },
    /// Section + parcel only; the commune comes from an INSEE code.
    Generic,
}

/// A parsed cadastral reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CadastralReference {
    /// Marseille or generic shape.
    pub form: CadastralForm,
    /// 1-2 letter section, uppercase.
    pub section: String,
    /// 1-4 digit parcel number, as written.
    pub parcel: String,
}

impl CadastralReference {
    /// Builds a Marseille-form reference.
    #[must_use]
    pub fn marseille(district: &str, quarter: &str, section: &str, parcel: &str) -> Self {
        Self {
            form: CadastralForm::Marseille {
                district: district.to_string(),
                quarter: quarter.to_string(),
            },
            section: section.to_uppercase(),
            parcel: parcel.to_string(),
        }
    }

    /// Builds a generic (section + parcel) reference.
    #[must_use]
    pub fn generic(section: &str, parcel: &str) -> Self {
        Self {
            form: CadastralForm::Generic,
            section: section.to_uppercase(),
            parcel: parcel.to_string(),
        }
    }

    /// INSEE code implied by the district, for Marseille references
    /// (`"201"` → `"13201"`).
    #[must_use]
    pub fn district_insee(&self) -> Option<String> {
        match &self.form {
            CadastralForm::Marseille { district, .. } => Some(format!("13{district}")),
            CadastralForm::Generic => None,
        }
    }

    /// Quarter code, `"000"` for generic references.
    #[must_use]
    pub fn quarter(&self) -> &str {
        match &self.form {
            CadastralForm::Marseille { quarter, .. } => quarter,
            CadastralForm::Generic => "000",
        }
    }

    /// Fixed-width composite key:
    /// `INSEE(5) + quarter(3) + section(2) + parcel(4)`.
    ///
    /// The section is right-aligned and padded with `0` (`"B"` → `"0B"`),
    /// the parcel is zero-padded (`"42"` → `"0042"`).
    #[must_use]
    pub fn normalized_key(&self, insee: &str) -> String {
        format!(
            "{insee:0>5}{quarter:0>3}{section:0>2}{parcel:0>4}",
            quarter = self.quarter(),
            section = self.section,
            parcel = self.parcel,
        )
    }

    /// Parses a key produced by [`Self::normalized_key`].
    ///
    /// Keys with a Marseille arrondissement INSEE code (`132xx`) and a
    /// non-zero quarter come back in Marseille form; everything else is
    /// generic. Returns the reference and the INSEE code.
    #[must_use]
    pub fn from_normalized_key(key: &str) -> Option<(Self, String)> {
        if key.len() != 14 || !key.is_ascii() {
            return None;
        }
        let (insee, rest) = key.split_at(5);
        let (quarter, rest) = rest.split_at(3);
        let (section, parcel) = rest.split_at(2);
        if !insee.chars().all(|c| c.is_ascii_alphanumeric())
            || !quarter.chars().all(|c| c.is_ascii_digit())
            || !parcel.chars().all(|c| c.is_ascii_digit())
        {
            return None;
        }
        let section = section.trim_start_matches('0');
        if section.is_empty() || !section.chars().all(|c| c.is_ascii_uppercase()) {
            return None;
        }
        let reference = match insee.strip_prefix("132") {
            Some(_) if quarter != "000" => Self::marseille(&insee[2..], quarter, section, parcel),
            _ => Self::generic(section, parcel),
        };
        Some((reference, insee.to_string()))
    }
}

impl fmt::Display for CadastralReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.form {
            CadastralForm::Marseille { district, quarter } => {
                write!(f, "{district} {quarter} {} {}", self.section, self.parcel)
            }
            CadastralForm::Generic => write!(f, "{} {}", self.section, self.parcel),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marseille_key_is_fixed_width() {
        let reference = CadastralReference::marseille("201", "015", "B", "0042");
        let key = reference.normalized_key("13201");
        assert_eq!(key, "132010150B0042");
        assert_eq!(key.len(), 14);
    }

    #[test]
    fn generic_key_pads_quarter_section_and_parcel() {
        let reference = CadastralReference::generic("ab", "12");
        assert_eq!(reference.normalized_key("13005"), "13005000AB0012");
    }

    #[test]
    fn key_round_trip_is_stable() {
        let reference = CadastralReference::marseille("201", "015", "B", "0042");
        let key = reference.normalized_key("13201");
        let (parsed, insee) = CadastralReference::from_normalized_key(&key).unwrap();
        assert_eq!(insee, "13201");
        assert_eq!(parsed.normalized_key(&insee), key);
        assert_eq!(parsed.district_insee().as_deref(), Some("13201"));
    }

    #[test]
    fn rejects_malformed_keys() {
        assert!(CadastralReference::from_normalized_key("1320101").is_none());
        assert!(CadastralReference::from_normalized_key("13201015000042").is_none());
    }

    #[test]
    fn displays_as_written() {
        let reference = CadastralReference::marseille("206", "824", "AB", "12");
        assert_eq!(reference.to_string(), "206 824 AB 12");
        assert_eq!(CadastralReference::generic("C", "7").to_string(), "C 7");
    }
}
