//! Configuration system for catmerge.
//!
//! Keys are PascalCase, matching existing merge configuration files
//! (`ReferenceCatalogFileName`, `OriginTimeShift`, ...).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CatmergeError, CatmergeResult};
use crate::geodesy::DistanceMethod;
use crate::merge::MergeOptions;
use crate::types::{IdentityMode, PhaseFilter};

fn default_true() -> bool {
    true
}

fn default_updated_catalog() -> PathBuf {
    PathBuf::from("updatedCatalog.jsonl")
}

fn default_common_catalog() -> PathBuf {
    PathBuf::from("commonEventsCatalog.jsonl")
}

fn default_summary() -> PathBuf {
    PathBuf::from("report.txt")
}

/// Main merge configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MergeConfig {
    /// Catalog that gets enriched.
    pub reference_catalog_file_name: PathBuf,
    /// Catalog that donates picks.
    pub compared_catalog_file_name: PathBuf,
    /// Accepted origin time difference between common events, in seconds.
    #[serde(alias = "TimeShift")]
    pub origin_time_shift: f64,
    /// Accepted epicenter difference between common events, in km.
    pub epicentral_shift: f64,
    /// Also write a catalog holding only the matched reference events.
    #[serde(default)]
    pub output_common_events_catalog: bool,
    #[serde(default = "default_true")]
    pub add_phase_p: bool,
    #[serde(default = "default_true")]
    pub add_phase_s: bool,
    #[serde(default = "default_true")]
    pub add_amplitude: bool,
    /// Keep only the highest-weight pick per station/phase after merging.
    #[serde(default)]
    pub replace_new_phase_only_with_higher_weight: bool,
    #[serde(default)]
    pub identity_mode: IdentityMode,
    #[serde(default)]
    pub distance_method: DistanceMethod,
    #[serde(default = "default_updated_catalog")]
    pub updated_catalog_file_name: PathBuf,
    #[serde(default = "default_common_catalog")]
    pub common_events_catalog_file_name: PathBuf,
    #[serde(default = "default_summary")]
    pub summary_file_name: PathBuf,
}

impl MergeConfig {
    /// Create a configuration with the required values and defaults for the rest.
    pub fn new(
        reference: impl Into<PathBuf>,
        compared: impl Into<PathBuf>,
        origin_time_shift: f64,
        epicentral_shift: f64,
    ) -> Self {
        Self {
            reference_catalog_file_name: reference.into(),
            compared_catalog_file_name: compared.into(),
            origin_time_shift,
            epicentral_shift,
            output_common_events_catalog: false,
            add_phase_p: true,
            add_phase_s: true,
            add_amplitude: true,
            replace_new_phase_only_with_higher_weight: false,
            identity_mode: IdentityMode::default(),
            distance_method: DistanceMethod::default(),
            updated_catalog_file_name: default_updated_catalog(),
            common_events_catalog_file_name: default_common_catalog(),
            summary_file_name: default_summary(),
        }
    }

    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<Path>) -> CatmergeResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CatmergeError::configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        let ext = path.extension().and_then(|e| e.to_str());
        Self::parse(&content, ext)
    }

    /// Parse configuration text; `ext` picks the format.
    pub fn parse(content: &str, ext: Option<&str>) -> CatmergeResult<Self> {
        let config: Self = match ext {
            Some("toml") => toml::from_str(content)
                .map_err(|e| CatmergeError::Configuration(e.to_string()))?,
            Some("json") => serde_json::from_str(content)
                .map_err(|e| CatmergeError::Configuration(e.to_string()))?,
            Some("yaml" | "yml") => serde_yaml::from_str(content)
                .map_err(|e| CatmergeError::Configuration(e.to_string()))?,
            _ => {
                return Err(CatmergeError::Configuration(
                    "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
                ))
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// Reads:
    /// - `CATMERGE_REFERENCE_CATALOG`
    /// - `CATMERGE_COMPARED_CATALOG`
    /// - `CATMERGE_ORIGIN_TIME_SHIFT` (seconds)
    /// - `CATMERGE_EPICENTRAL_SHIFT` (km)
    /// - `CATMERGE_OUTPUT_DIR`
    pub fn with_env_overrides(self) -> CatmergeResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> CatmergeResult<Self> {
        if let Some(path) = lookup("CATMERGE_REFERENCE_CATALOG") {
            self.reference_catalog_file_name = PathBuf::from(path);
        }
        if let Some(path) = lookup("CATMERGE_COMPARED_CATALOG") {
            self.compared_catalog_file_name = PathBuf::from(path);
        }
        if let Some(value) = lookup("CATMERGE_ORIGIN_TIME_SHIFT") {
            self.origin_time_shift = parse_env_f64("CATMERGE_ORIGIN_TIME_SHIFT", &value)?;
        }
        if let Some(value) = lookup("CATMERGE_EPICENTRAL_SHIFT") {
            self.epicentral_shift = parse_env_f64("CATMERGE_EPICENTRAL_SHIFT", &value)?;
        }
        if let Some(dir) = lookup("CATMERGE_OUTPUT_DIR") {
            self = self.with_output_dir(dir);
        }
        self.validate()?;
        Ok(self)
    }

    /// Place relative output file names under `dir`.
    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let place = |p: &PathBuf| if p.is_absolute() { p.clone() } else { dir.join(p) };
        self.updated_catalog_file_name = place(&self.updated_catalog_file_name);
        self.common_events_catalog_file_name = place(&self.common_events_catalog_file_name);
        self.summary_file_name = place(&self.summary_file_name);
        self
    }

    /// Enable writing the matched-only catalog.
    pub fn with_common_events_catalog(mut self) -> Self {
        self.output_common_events_catalog = true;
        self
    }

    /// Enable the higher-weight conflict resolution pass.
    pub fn with_higher_weight_preference(mut self) -> Self {
        self.replace_new_phase_only_with_higher_weight = true;
        self
    }

    /// Set which phase categories may be donated.
    pub fn with_phase_filter(mut self, filter: PhaseFilter) -> Self {
        self.add_phase_p = filter.add_p;
        self.add_phase_s = filter.add_s;
        self.add_amplitude = filter.add_amplitude;
        self
    }

    pub fn with_identity_mode(mut self, mode: IdentityMode) -> Self {
        self.identity_mode = mode;
        self
    }

    pub fn with_distance_method(mut self, method: DistanceMethod) -> Self {
        self.distance_method = method;
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> CatmergeResult<()> {
        if self.reference_catalog_file_name.as_os_str().is_empty() {
            return Err(CatmergeError::configuration(
                "ReferenceCatalogFileName must not be empty",
            ));
        }
        if self.compared_catalog_file_name.as_os_str().is_empty() {
            return Err(CatmergeError::configuration(
                "ComparedCatalogFileName must not be empty",
            ));
        }
        if !(self.origin_time_shift.is_finite() && self.origin_time_shift > 0.0) {
            return Err(CatmergeError::configuration(format!(
                "OriginTimeShift must be a positive number of seconds, got {}",
                self.origin_time_shift
            )));
        }
        if !(self.epicentral_shift.is_finite() && self.epicentral_shift > 0.0) {
            return Err(CatmergeError::configuration(format!(
                "EpicentralShift must be a positive number of km, got {}",
                self.epicentral_shift
            )));
        }
        Ok(())
    }

    /// Phase filter described by the `AddPhase*` / `AddAmplitude` keys.
    pub fn phase_filter(&self) -> PhaseFilter {
        PhaseFilter {
            add_p: self.add_phase_p,
            add_s: self.add_phase_s,
            add_amplitude: self.add_amplitude,
        }
    }

    /// Algorithm options derived from this configuration.
    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            max_time_delta_secs: self.origin_time_shift,
            max_distance_km: self.epicentral_shift,
            filter: self.phase_filter(),
            identity_mode: self.identity_mode,
            prefer_higher_weight: self.replace_new_phase_only_with_higher_weight,
        }
    }
}

fn parse_env_f64(key: &str, value: &str) -> CatmergeResult<f64> {
    value
        .trim()
        .parse()
        .map_err(|_| CatmergeError::configuration(format!("{} is not a number: '{}'", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    const JSON: &str = r#"{
        "ReferenceCatalogFileName": "cat1.jsonl",
        "ComparedCatalogFileName": "cat2.jsonl",
        "OriginTimeShift": 5.0,
        "EpicentralShift": 10.0,
        "OutputCommonEventsCatalog": true,
        "AddPhaseS": false
    }"#;

    #[test]
    fn test_parse_json_with_defaults() {
        let config = MergeConfig::parse(JSON, Some("json")).unwrap();
        assert_eq!(config.reference_catalog_file_name, PathBuf::from("cat1.jsonl"));
        assert_eq!(config.origin_time_shift, 5.0);
        assert!(config.output_common_events_catalog);
        assert!(config.add_phase_p);
        assert!(!config.add_phase_s);
        assert!(config.add_amplitude);
        assert!(!config.replace_new_phase_only_with_higher_weight);
        assert_eq!(config.identity_mode, IdentityMode::StationPhaseWeight);
        assert_eq!(config.summary_file_name, PathBuf::from("report.txt"));
    }

    #[test]
    fn test_time_shift_alias() {
        let json = r#"{
            "ReferenceCatalogFileName": "a",
            "ComparedCatalogFileName": "b",
            "TimeShift": 3.5,
            "EpicentralShift": 1.0
        }"#;
        let config = MergeConfig::parse(json, Some("json")).unwrap();
        assert_eq!(config.origin_time_shift, 3.5);
    }

    #[test]
    fn test_missing_required_key() {
        let json = r#"{"ReferenceCatalogFileName": "a", "ComparedCatalogFileName": "b", "EpicentralShift": 1.0}"#;
        let err = MergeConfig::parse(json, Some("json")).unwrap_err();
        assert!(matches!(err, CatmergeError::Configuration(_)));
        assert!(err.to_string().contains("OriginTimeShift"));
    }

    #[test]
    fn test_parse_toml_and_yaml() {
        let toml = r#"
            ReferenceCatalogFileName = "a"
            ComparedCatalogFileName = "b"
            OriginTimeShift = 2.0
            EpicentralShift = 4.0
            IdentityMode = "StationPhase"
            DistanceMethod = "Haversine"
        "#;
        let config = MergeConfig::parse(toml, Some("toml")).unwrap();
        assert_eq!(config.identity_mode, IdentityMode::StationPhase);
        assert_eq!(config.distance_method, DistanceMethod::Haversine);

        let yaml = "ReferenceCatalogFileName: a\nComparedCatalogFileName: b\nOriginTimeShift: 2\nEpicentralShift: 4\nReplaceNewPhaseOnlyWithHigherWeight: true\n";
        let config = MergeConfig::parse(yaml, Some("yml")).unwrap();
        assert!(config.replace_new_phase_only_with_higher_weight);
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            MergeConfig::parse(JSON, Some("ini")),
            Err(CatmergeError::Configuration(_))
        ));
    }

    #[test]
    fn test_validate_rejects_non_positive_shift() {
        let config = MergeConfig::new("a", "b", 0.0, 1.0);
        assert!(config.validate().is_err());
        let config = MergeConfig::new("a", "b", 1.0, f64::NAN);
        assert!(config.validate().is_err());
        let config = MergeConfig::new("", "b", 1.0, 1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(JSON.as_bytes()).unwrap();
        let config = MergeConfig::from_file(file.path()).unwrap();
        assert_eq!(config.epicentral_shift, 10.0);

        let err = MergeConfig::from_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, CatmergeError::Configuration(_)));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("CATMERGE_ORIGIN_TIME_SHIFT", "7.5"),
            ("CATMERGE_COMPARED_CATALOG", "other.jsonl"),
            ("CATMERGE_OUTPUT_DIR", "/tmp/out"),
        ]
        .into_iter()
        .collect();
        let config = MergeConfig::new("a", "b", 1.0, 1.0)
            .with_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.origin_time_shift, 7.5);
        assert_eq!(config.compared_catalog_file_name, PathBuf::from("other.jsonl"));
        assert_eq!(
            config.updated_catalog_file_name,
            PathBuf::from("/tmp/out/updatedCatalog.jsonl")
        );

        let bad = MergeConfig::new("a", "b", 1.0, 1.0)
            .with_overrides(|k| (k == "CATMERGE_EPICENTRAL_SHIFT").then(|| "far".to_string()));
        assert!(bad.is_err());
    }

    #[test]
    fn test_merge_options() {
        let config = MergeConfig::new("a", "b", 5.0, 10.0)
            .with_phase_filter(PhaseFilter {
                add_p: true,
                add_s: false,
                add_amplitude: true,
            })
            .with_higher_weight_preference();
        let options = config.merge_options();
        assert_eq!(options.max_time_delta_secs, 5.0);
        assert_eq!(options.max_distance_km, 10.0);
        assert!(!options.filter.add_s);
        assert!(options.prefer_higher_weight);
    }
}
