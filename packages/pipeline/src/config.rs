//! Batch configuration, read from TOML.
//!
//! The default configuration is baked into the binary with
//! [`include_str!`]; a file passed on the command line replaces it as a
//! whole; sections it leaves out fall back to their defaults.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use arretes_gazetteer::Gazetteers;
use arretes_parser::ParseOptions;
use serde::{Deserialize, Serialize};

use crate::PipelineError;

/// Configuration embedded at compile time.
pub const DEFAULT_CONFIG: &str = include_str!("../arretes.toml");

/// Effective configuration of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub exclusions: Exclusions,
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub gazetteers: GazetteerPaths,
}

/// Documents and pages left out of the batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exclusions {
    /// Source file names skipped before parsing.
    #[serde(default)]
    pub documents: Vec<String>,
    /// Case-insensitive substrings of file names whose pages are flagged
    /// out of scope.
    #[serde(default)]
    pub page_file_patterns: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Per-document wall-clock budget in milliseconds. Absent disables the
    /// check.
    #[serde(default)]
    pub time_budget_ms: Option<u64>,
}

/// Locations of the gazetteer tables: either a directory holding the
/// three standard file names, or all three paths, or nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GazetteerPaths {
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default)]
    pub communes: Option<PathBuf>,
    #[serde(default)]
    pub postcodes: Option<PathBuf>,
    #[serde(default)]
    pub agencies: Option<PathBuf>,
}

impl Config {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or does not match
    /// the configuration layout.
    pub fn from_toml(text: &str) -> Result<Self, PipelineError> {
        Ok(toml::de::from_str(text)?)
    }

    /// The configuration embedded in the binary.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded file does not parse, which only a
    /// broken build can cause.
    pub fn embedded() -> Result<Self, PipelineError> {
        Self::from_toml(DEFAULT_CONFIG)
    }

    /// Reads the configuration at `path`, or the embedded one when `path`
    /// is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, PipelineError> {
        let Some(path) = path else {
            return Self::embedded();
        };
        log::info!("Reading configuration from {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|source| PipelineError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Renders the configuration back to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, PipelineError> {
        Ok(toml::to_string_pretty(self)?)
    }

    #[must_use]
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            time_budget: self.parser.time_budget_ms.map(Duration::from_millis),
        }
    }

    /// Whether `document` is on the denylist.
    #[must_use]
    pub fn is_excluded_document(&self, document: &str) -> bool {
        self.exclusions.documents.iter().any(|d| d == document)
    }

    /// Whether the pages of `document` are out of scope.
    #[must_use]
    pub fn is_excluded_page_file(&self, document: &str) -> bool {
        let name = document.to_lowercase();
        self.exclusions
            .page_file_patterns
            .iter()
            .any(|pattern| name.contains(&pattern.to_lowercase()))
    }

    /// Loads the gazetteers the configuration points at.
    ///
    /// # Errors
    ///
    /// Returns an error if only some of the table paths are set, if a
    /// directory is combined with table paths, or if a table cannot be
    /// read.
    pub fn load_gazetteers(&self) -> Result<Gazetteers, PipelineError> {
        let paths = &self.gazetteers;
        match (&paths.dir, &paths.communes, &paths.postcodes, &paths.agencies) {
            (None, None, None, None) => Ok(Gazetteers::bundled()?),
            (Some(dir), None, None, None) => {
                log::info!("Reading gazetteers from {}", dir.display());
                Ok(Gazetteers::from_dir(dir)?)
            }
            (None, Some(communes), Some(postcodes), Some(agencies)) => {
                Ok(Gazetteers::from_paths(communes, postcodes, agencies)?)
            }
            (Some(_), ..) => Err(PipelineError::Config(
                "[gazetteers] dir cannot be combined with table paths".to_string(),
            )),
            _ => Err(PipelineError::Config(
                "[gazetteers] needs communes, postcodes and agencies together".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_parses() {
        let config = Config::embedded().unwrap();
        assert!(!config.exclusions.page_file_patterns.is_empty());
        assert_eq!(
            config.parse_options().time_budget,
            Some(Duration::from_millis(10_000))
        );
        assert!(config.load_gazetteers().is_ok());
    }

    #[test]
    fn missing_sections_default() {
        let config = Config::from_toml("[parser]\n").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.parse_options().time_budget, None);
    }

    #[test]
    fn page_file_patterns_ignore_case() {
        let config = Config::from_toml(
            "[exclusions]\ndocuments = [\"bad.pdf\"]\npage_file_patterns = [\"annexe\"]\n",
        )
        .unwrap();
        assert!(config.is_excluded_page_file("2021_ANNEXE_plan.pdf"));
        assert!(!config.is_excluded_page_file("arrete_2021.pdf"));
        assert!(config.is_excluded_document("bad.pdf"));
        assert!(!config.is_excluded_document("BAD.pdf"));
    }

    #[test]
    fn partial_gazetteer_paths_are_rejected() {
        let config = Config::from_toml("[gazetteers]\ncommunes = \"c.csv\"\n").unwrap();
        assert!(matches!(
            config.load_gazetteers(),
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn gazetteer_dir() {
        let dir = std::env::temp_dir().join(format!("arretes_gazetteers_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("../gazetteer/data");
        for name in [
            arretes_gazetteer::COMMUNES_FILE,
            arretes_gazetteer::POSTCODES_FILE,
            arretes_gazetteer::AGENCIES_FILE,
        ] {
            std::fs::copy(data.join(name), dir.join(name)).unwrap();
        }

        let config = Config::from_toml(&format!(
            "[gazetteers]\ndir = {:?}\n",
            dir.display().to_string()
        ))
        .unwrap();
        let gazetteers = config.load_gazetteers();
        let combined = Config::from_toml(&format!(
            "[gazetteers]\ndir = {:?}\ncommunes = \"c.csv\"\n",
            dir.display().to_string()
        ))
        .unwrap()
        .load_gazetteers();
        std::fs::remove_dir_all(&dir).unwrap();

        let gazetteers = gazetteers.unwrap();
        assert_eq!(gazetteers.insee_for_commune("Aubagne"), Some("13005"));
        assert!(matches!(combined, Err(PipelineError::Config(_))));
    }

    #[test]
    fn round_trips_through_toml() {
        let config = Config::embedded().unwrap();
        let text = config.to_toml().unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(matches!(
            Config::from_toml("[parser\n"),
            Err(PipelineError::Toml(_))
        ));
    }
}
