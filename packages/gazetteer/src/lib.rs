#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Dictionaries used to resolve extracted names into reference codes.
//!
//! Three tables are loaded once and shared read-only:
//!
//! - **communes**: commune name → INSEE code,
//! - **postcodes**: INSEE code → postal code (and the reverse map where it
//!   is unambiguous),
//! - **agencies**: property-agency names → canonical agency name.
//!
//! Names are compared through [`arretes_patterns::text::simplify`], so
//! accents, case, hyphens and `St`/`Saint` spellings do not matter.
//!
//! The tables can be read from CSV files or taken from the copies bundled
//! in the binary.

use std::{
    collections::{BTreeMap, BTreeSet},
    io::Read,
    path::Path,
};

use arretes_patterns::text::simplify;
use regex::{Regex, RegexBuilder};
use serde::Deserialize;

/// INSEE code covering the whole of Marseille.
pub const MARSEILLE_INSEE: &str = "13055";

const BUNDLED_COMMUNES: &str = include_str!("../data/communes.csv");
const BUNDLED_POSTCODES: &str = include_str!("../data/postcodes.csv");
const BUNDLED_AGENCIES: &str = include_str!("../data/agencies.csv");

/// File names looked up by [`Gazetteers::from_dir`].
pub const COMMUNES_FILE: &str = "communes.csv";
/// See [`COMMUNES_FILE`].
pub const POSTCODES_FILE: &str = "postcodes.csv";
/// See [`COMMUNES_FILE`].
pub const AGENCIES_FILE: &str = "agencies.csv";

/// Errors from gazetteer loading.
#[derive(Debug, thiserror::Error)]
pub enum GazetteerError {
    /// CSV parsing error.
    #[error("CSV error in {path}: {source}")]
    Csv {
        /// Table that failed to parse.
        path: String,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// I/O error reading a table.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path that caused the error.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A required column is absent from the header row.
    #[error("Missing column {column} in {path}")]
    MissingColumn {
        /// Table missing the column.
        path: String,
        /// Expected column name.
        column: &'static str,
    },

    /// The agency names could not be compiled into a matcher.
    #[error("Invalid agency pattern: {0}")]
    AgencyPattern(#[from] regex::Error),
}

#[derive(Debug, Deserialize)]
struct CommuneRow {
    insee: String,
    nom: String,
}

#[derive(Debug, Deserialize)]
struct PostcodeRow {
    insee: String,
    code_postal: String,
}

#[derive(Debug, Deserialize)]
struct AgencyRow {
    nom: String,
    canonique: String,
}

/// A property agency found at the start of a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgencyMatch<'a> {
    /// Canonical agency name.
    pub canonical: &'a str,
    /// Byte offset just past the matched name.
    pub end: usize,
}

/// Loaded dictionaries.
#[derive(Debug, Clone)]
pub struct Gazetteers {
    /// Simplified commune name → (INSEE code, display name).
    communes: BTreeMap<String, (String, String)>,
    /// INSEE code → display name.
    names: BTreeMap<String, String>,
    /// INSEE code → postal code.
    postcodes: BTreeMap<String, String>,
    /// Postal code → INSEE code, for postal codes serving one commune.
    insee_by_postcode: BTreeMap<String, String>,
    /// Simplified agency name → canonical name.
    agencies: BTreeMap<String, String>,
    /// Anchored, case-insensitive alternation of every agency name.
    agency_re: Option<Regex>,
}

impl Gazetteers {
    /// Tables bundled in the binary.
    ///
    /// # Errors
    ///
    /// Returns an error if a bundled table fails to parse.
    pub fn bundled() -> Result<Self, GazetteerError> {
        Self::from_readers(
            BUNDLED_COMMUNES.as_bytes(),
            BUNDLED_POSTCODES.as_bytes(),
            BUNDLED_AGENCIES.as_bytes(),
        )
    }

    /// Reads `communes.csv`, `postcodes.csv` and `agencies.csv` from `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if a file is missing or cannot be parsed.
    pub fn from_dir(dir: &Path) -> Result<Self, GazetteerError> {
        Self::from_paths(
            &dir.join(COMMUNES_FILE),
            &dir.join(POSTCODES_FILE),
            &dir.join(AGENCIES_FILE),
        )
    }

    /// Reads the three tables from explicit paths.
    ///
    /// # Errors
    ///
    /// Returns an error if a file is missing or cannot be parsed.
    pub fn from_paths(
        communes: &Path,
        postcodes: &Path,
        agencies: &Path,
    ) -> Result<Self, GazetteerError> {
        let open = |path: &Path| {
            std::fs::File::open(path).map_err(|e| GazetteerError::Io {
                path: path.display().to_string(),
                source: e,
            })
        };
        let gazetteers = Self::build(
            read_table::<CommuneRow>(open(communes)?, &communes.display().to_string(), &["insee", "nom"])?,
            read_table::<PostcodeRow>(
                open(postcodes)?,
                &postcodes.display().to_string(),
                &["insee", "code_postal"],
            )?,
            read_table::<AgencyRow>(
                open(agencies)?,
                &agencies.display().to_string(),
                &["nom", "canonique"],
            )?,
        )?;
        log::info!(
            "Loaded gazetteers: {} communes, {} postal codes, {} agency names",
            gazetteers.communes.len(),
            gazetteers.postcodes.len(),
            gazetteers.agencies.len()
        );
        Ok(gazetteers)
    }

    /// Reads the three tables from arbitrary readers.
    ///
    /// # Errors
    ///
    /// Returns an error if a table cannot be parsed.
    pub fn from_readers(
        communes: impl Read,
        postcodes: impl Read,
        agencies: impl Read,
    ) -> Result<Self, GazetteerError> {
        Self::build(
            read_table::<CommuneRow>(communes, COMMUNES_FILE, &["insee", "nom"])?,
            read_table::<PostcodeRow>(postcodes, POSTCODES_FILE, &["insee", "code_postal"])?,
            read_table::<AgencyRow>(agencies, AGENCIES_FILE, &["nom", "canonique"])?,
        )
    }

    fn build(
        commune_rows: Vec<CommuneRow>,
        postcode_rows: Vec<PostcodeRow>,
        agency_rows: Vec<AgencyRow>,
    ) -> Result<Self, GazetteerError> {
        let mut communes = BTreeMap::new();
        let mut names = BTreeMap::new();
        for row in commune_rows {
            let insee = row.insee.trim().to_string();
            let name = row.nom.trim().to_string();
            names.insert(insee.clone(), name.clone());
            if let Some((previous, _)) = communes.insert(simplify(&name), (insee.clone(), name)) {
                log::debug!("Commune name shared by {previous} and {insee}; keeping {insee}");
            }
        }

        let mut postcodes = BTreeMap::new();
        let mut insee_by_postcode = BTreeMap::new();
        let mut ambiguous = BTreeSet::new();
        for row in postcode_rows {
            let insee = row.insee.trim().to_string();
            let postcode = row.code_postal.trim().to_string();
            if insee_by_postcode.insert(postcode.clone(), insee.clone()).is_some() {
                ambiguous.insert(postcode.clone());
            }
            postcodes.insert(insee, postcode);
        }
        for postcode in &ambiguous {
            log::debug!("Postal code {postcode} serves several communes");
            insee_by_postcode.remove(postcode);
        }

        let mut agencies = BTreeMap::new();
        for row in agency_rows {
            agencies.insert(simplify(&row.nom), row.canonique.trim().to_string());
        }
        let agency_re = agency_pattern(agencies.keys())?;

        Ok(Self {
            communes,
            names,
            postcodes,
            insee_by_postcode,
            agencies,
            agency_re,
        })
    }

    /// INSEE code of a commune name, any spelling.
    #[must_use]
    pub fn insee_for_commune(&self, name: &str) -> Option<&str> {
        self.communes
            .get(&simplify(name))
            .map(|(insee, _)| insee.as_str())
    }

    /// Display name of a commune, any spelling.
    #[must_use]
    pub fn canonical_commune(&self, name: &str) -> Option<&str> {
        self.communes
            .get(&simplify(name))
            .map(|(_, display)| display.as_str())
    }

    /// Display name for an INSEE code.
    #[must_use]
    pub fn commune_name(&self, insee: &str) -> Option<&str> {
        self.names.get(insee).map(String::as_str)
    }

    /// Postal code of an INSEE code.
    #[must_use]
    pub fn postcode_for_insee(&self, insee: &str) -> Option<&str> {
        self.postcodes.get(insee).map(String::as_str)
    }

    /// INSEE code served by a postal code, when only one commune uses it.
    ///
    /// Marseille postal codes `13001`..=`13016` resolve to the
    /// arrondissement codes `13201`..=`13216` even when the table lacks
    /// them.
    #[must_use]
    pub fn insee_for_postcode(&self, postcode: &str) -> Option<String> {
        self.insee_by_postcode
            .get(postcode)
            .cloned()
            .or_else(|| marseille_district_insee(postcode))
    }

    /// Canonical name of an agency, compared on the simplified name.
    #[must_use]
    pub fn canonical_agency(&self, name: &str) -> Option<&str> {
        self.agencies.get(&simplify(name)).map(String::as_str)
    }

    /// Agency named at the very start of `text`.
    ///
    /// The longest known name wins (`Foncia Vieux Port` over `Foncia`).
    #[must_use]
    pub fn match_agency<'a>(&'a self, text: &str) -> Option<AgencyMatch<'a>> {
        let m = self.agency_re.as_ref()?.find(text)?;
        let canonical = self.canonical_agency(m.as_str())?;
        Some(AgencyMatch {
            canonical,
            end: m.end(),
        })
    }
}

/// Marseille arrondissement INSEE code of a Marseille postal code
/// (`"13001"` → `"13201"`).
#[must_use]
pub fn marseille_district_insee(postcode: &str) -> Option<String> {
    let district: u32 = postcode.strip_prefix("130")?.parse().ok()?;
    (1..=16)
        .contains(&district)
        .then(|| format!("132{district:02}"))
}

/// Whether `insee` is a Marseille arrondissement code.
#[must_use]
pub fn is_marseille_district(insee: &str) -> bool {
    insee
        .strip_prefix("132")
        .and_then(|d| d.parse::<u32>().ok())
        .is_some_and(|d| (1..=16).contains(&d))
}

fn read_table<T: for<'de> Deserialize<'de>>(
    reader: impl Read,
    path: &str,
    columns: &[&'static str],
) -> Result<Vec<T>, GazetteerError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = csv_reader.headers().map_err(|e| GazetteerError::Csv {
        path: path.to_string(),
        source: e,
    })?;
    for &column in columns {
        if !headers.iter().any(|h| h.trim() == column) {
            return Err(GazetteerError::MissingColumn {
                path: path.to_string(),
                column,
            });
        }
    }

    let mut rows = Vec::new();
    for result in csv_reader.deserialize::<T>() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => log::trace!("  skipping malformed row in {path}: {e}"),
        }
    }
    Ok(rows)
}

/// Builds the anchored agency matcher from simplified names, longest
/// first. Simplified names only contain letters, digits and single spaces,
/// so each space is widened to accept any separator run of the original.
fn agency_pattern<'a>(
    names: impl Iterator<Item = &'a String>,
) -> Result<Option<Regex>, GazetteerError> {
    let mut names: Vec<&String> = names.filter(|n| !n.is_empty()).collect();
    if names.is_empty() {
        return Ok(None);
    }
    names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    let alternatives: Vec<String> = names
        .iter()
        .map(|name| {
            name.split(' ')
                .map(|word| {
                    word.chars()
                        .map(|c| accent_class(c).unwrap_or_else(|| regex::escape(&c.to_string())))
                        .collect::<String>()
                })
                .collect::<Vec<_>>()
                .join(r"[\s'’.-]+")
        })
        .collect();
    let pattern = format!(r"(?i)^\s*(?:{})\b", alternatives.join("|"));
    Ok(Some(RegexBuilder::new(&pattern).size_limit(1 << 24).build()?))
}

/// Character class accepting the accented forms of a simplified letter.
fn accent_class(c: char) -> Option<String> {
    let class = match c {
        'a' => "[aàâä]",
        'c' => "[cç]",
        'e' => "[eéèêë]",
        'i' => "[iîï]",
        'o' => "[oôö]",
        'u' => "[uùûü]",
        'y' => "[yÿ]",
        _ => return None,
    };
    Some(class.to_string())
}
