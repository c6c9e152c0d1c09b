//! Loading pipeline: finds data files, deserializes them and hands the
//! result to the resolver.
//!
//! Provides format detection (RON/JSON/TOML), file discovery, and
//! deserialization helpers, plus the two entry points [`load_catalog`] and
//! [`load_sim_config`].

use antics_core::catalog::{Catalog, CatalogBuilder, CatalogError};
use antics_core::sim::SimConfig;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use crate::resolve::{resolve_producers, resolve_resources, resolve_sim_config, resolve_upgrades};
use crate::schema::*;

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A name reference could not be resolved.
    #[error("unresolved {expected_kind} reference '{name}' in {file}")]
    UnresolvedRef {
        file: PathBuf,
        name: String,
        expected_kind: &'static str,
    },

    /// A duplicate name was found.
    #[error("duplicate name '{name}' in {file}")]
    DuplicateName { file: PathBuf, name: String },

    /// A number is out of range or not allowed for its field.
    #[error("invalid value for {field} in {file}: {detail}")]
    InvalidValue {
        file: PathBuf,
        field: String,
        detail: String,
    },

    /// More than one resource is marked as the gather target.
    #[error("both '{first}' and '{second}' are marked as gather resource in {file}")]
    MultipleGather {
        file: PathBuf,
        first: String,
        second: String,
    },

    /// The resolved content failed catalog validation.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for a data file with the given base name (without extension).
///
/// Looks for `{base_name}.ron`, `{base_name}.toml`, and `{base_name}.json`.
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// multiple formats exist for the same base name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let extensions = ["ron", "toml", "json"];
    let mut found: Option<PathBuf> = None;

    for ext in &extensions {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(ref existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing.clone(),
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

/// Like [`find_data_file`], but returns an error if no file is found.
pub fn require_data_file(dir: &Path, base_name: &str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name.to_string(),
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

fn parse_error(path: &Path, detail: impl ToString) -> DataLoadError {
    DataLoadError::Parse {
        file: path.to_path_buf(),
        detail: detail.to_string(),
    }
}

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => toml::from_str(&content).map_err(|e| parse_error(path, e)),
    }
}

/// Deserialize a list from a file. For TOML files, extracts the array at the
/// given `toml_key` from a top-level table. For RON and JSON, deserializes
/// directly as `Vec<T>`.
pub fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => {
            let table: toml::Value = toml::from_str(&content).map_err(|e| parse_error(path, e))?;
            let array = table
                .get(toml_key)
                .ok_or_else(|| parse_error(path, format!("missing key '{toml_key}' in TOML file")))?
                .clone();
            array
                .try_into()
                .map_err(|e: toml::de::Error| parse_error(path, e))
        }
    }
}

// ===========================================================================
// Entry points
// ===========================================================================

/// Directory holding the built-in colony data shipped with this crate.
pub fn standard_data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data").join("standard")
}

/// Load and validate a catalog from `resources`, `producers` and `upgrades`
/// files in `dir`. Each file may be in any supported format.
pub fn load_catalog(dir: &Path) -> Result<Catalog, DataLoadError> {
    let resources_path = require_data_file(dir, "resources")?;
    let producers_path = require_data_file(dir, "producers")?;
    let upgrades_path = require_data_file(dir, "upgrades")?;

    let resources: Vec<ResourceData> = deserialize_list(&resources_path, RESOURCES_KEY)?;
    let producers: Vec<ProducerData> = deserialize_list(&producers_path, PRODUCERS_KEY)?;
    let upgrades: Vec<UpgradeData> = deserialize_list(&upgrades_path, UPGRADES_KEY)?;

    let mut builder = CatalogBuilder::new();
    resolve_resources(&resources, &resources_path, &mut builder)?;
    resolve_producers(&producers, &producers_path, &mut builder)?;
    resolve_upgrades(&upgrades, &upgrades_path, &mut builder)?;
    let catalog = builder.build()?;

    tracing::debug!(
        dir = %dir.display(),
        resources = catalog.resources().len(),
        producers = catalog.producers().len(),
        upgrades = catalog.upgrades().len(),
        "loaded catalog"
    );
    Ok(catalog)
}

/// Load a simulation config file. Missing fields keep their defaults.
pub fn load_sim_config(path: &Path) -> Result<SimConfig, DataLoadError> {
    let data: SimConfigData = deserialize_file(path)?;
    resolve_sim_config(&data, path)
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Create a temporary directory with a unique name for test isolation.
    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "antics_data_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    // -----------------------------------------------------------------------
    // detect_format
    // -----------------------------------------------------------------------

    #[test]
    fn detect_format_by_extension() {
        assert_eq!(detect_format(Path::new("a.ron")).unwrap(), Format::Ron);
        assert_eq!(detect_format(Path::new("a.toml")).unwrap(), Format::Toml);
        assert_eq!(detect_format(Path::new("a.json")).unwrap(), Format::Json);
    }

    #[test]
    fn detect_format_unsupported() {
        for name in ["resources.yaml", "resources"] {
            assert!(matches!(
                detect_format(Path::new(name)),
                Err(DataLoadError::UnsupportedFormat { .. })
            ));
        }
    }

    // -----------------------------------------------------------------------
    // find_data_file / require_data_file
    // -----------------------------------------------------------------------

    #[test]
    fn find_data_file_found_and_missing() {
        let dir = make_test_dir("find");
        fs::write(dir.join("producers.toml"), "").unwrap();

        assert_eq!(
            find_data_file(&dir, "producers").unwrap(),
            Some(dir.join("producers.toml"))
        );
        assert_eq!(find_data_file(&dir, "upgrades").unwrap(), None);

        cleanup(&dir);
    }

    #[test]
    fn find_data_file_conflict() {
        let dir = make_test_dir("find_conflict");
        fs::write(dir.join("resources.ron"), "[]").unwrap();
        fs::write(dir.join("resources.json"), "[]").unwrap();

        assert!(matches!(
            find_data_file(&dir, "resources"),
            Err(DataLoadError::ConflictingFormats { .. })
        ));

        cleanup(&dir);
    }

    #[test]
    fn require_data_file_missing_names_the_file() {
        let dir = make_test_dir("require_missing");

        let err = require_data_file(&dir, "upgrades").unwrap_err();
        match err {
            DataLoadError::MissingRequired { file, .. } => assert_eq!(file, "upgrades"),
            other => panic!("unexpected error: {other}"),
        }

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // deserialize_file / deserialize_list
    // -----------------------------------------------------------------------

    #[test]
    fn deserialize_list_ron() {
        let dir = make_test_dir("list_ron");
        let path = dir.join("resources.ron");
        fs::write(
            &path,
            r#"[(name: "Food", starts_visible: true, gather: true), (name: "Sticks", unlock: Upgrade("First Queen"))]"#,
        )
        .unwrap();

        let list: Vec<ResourceData> = deserialize_list(&path, RESOURCES_KEY).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list[0].gather);
        assert_eq!(list[0].unlock, UnlockData::Always);
        assert_eq!(list[1].unlock, UnlockData::Upgrade("First Queen".into()));

        cleanup(&dir);
    }

    #[test]
    fn deserialize_list_json() {
        let dir = make_test_dir("list_json");
        let path = dir.join("producers.json");
        fs::write(
            &path,
            r#"[{"name": "Ants", "cost": {"Food": 10}, "outputs": {"Food": 0.5},
                "unlock": {"Resource": ["Food", 5]}}]"#,
        )
        .unwrap();

        let list: Vec<ProducerData> = deserialize_list(&path, PRODUCERS_KEY).unwrap();
        assert_eq!(list[0].cost["Food"], 10);
        assert_eq!(list[0].outputs["Food"], 0.5);
        assert_eq!(list[0].unlock, UnlockData::Resource("Food".into(), 5));

        cleanup(&dir);
    }

    #[test]
    fn deserialize_list_toml() {
        let dir = make_test_dir("list_toml");
        let path = dir.join("upgrades.toml");
        fs::write(
            &path,
            r#"
[[upgrades]]
name = "Club"
cost = { Food = 2500, Sticks = 100 }
click_multiplier = 2.0
unlock = { Resource = ["Stones", 25] }

[[upgrades]]
name = "Wheel"
cost = { Food = 5000 }
replace = { old = "Workers", new = "Haulers", divisor = 2 }
"#,
        )
        .unwrap();

        let list: Vec<UpgradeData> = deserialize_list(&path, UPGRADES_KEY).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].click_multiplier, Some(2.0));
        assert_eq!(list[1].replace.as_ref().unwrap().divisor, 2);

        cleanup(&dir);
    }

    #[test]
    fn deserialize_list_toml_missing_key() {
        let dir = make_test_dir("list_toml_missing");
        let path = dir.join("upgrades.toml");
        fs::write(&path, "[[other]]\nname = \"x\"\n").unwrap();

        let result: Result<Vec<UpgradeData>, _> = deserialize_list(&path, UPGRADES_KEY);
        assert!(matches!(result, Err(DataLoadError::Parse { .. })));

        cleanup(&dir);
    }

    #[test]
    fn deserialize_file_parse_error() {
        let dir = make_test_dir("parse_err");
        let path = dir.join("config.ron");
        fs::write(&path, "this is not valid RON {{{").unwrap();

        let result: Result<SimConfigData, _> = deserialize_file(&path);
        assert!(matches!(result, Err(DataLoadError::Parse { .. })));

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // load_sim_config
    // -----------------------------------------------------------------------

    #[test]
    fn load_sim_config_fills_defaults() {
        let dir = make_test_dir("config_defaults");
        let path = dir.join("config.toml");
        fs::write(&path, "debug_multiplier = 10.0\ncompletion_policy = \"EveryTick\"\n").unwrap();

        let config = load_sim_config(&path).unwrap();
        let defaults = SimConfig::default();
        assert_eq!(config.debug_multiplier, antics_core::fixed::f64_to_fixed64(10.0));
        assert_eq!(
            config.completion_policy,
            antics_core::sim::CompletionPolicy::EveryTick
        );
        assert_eq!(config.cost_growth, defaults.cost_growth);
        assert_eq!(config.boost_divisor, defaults.boost_divisor);
        assert_eq!(config.tick_interval_ms, defaults.tick_interval_ms);

        cleanup(&dir);
    }

    #[test]
    fn load_sim_config_rejects_unknown_fields() {
        let dir = make_test_dir("config_unknown");
        let path = dir.join("config.json");
        fs::write(&path, r#"{"speed": 3}"#).unwrap();

        assert!(matches!(
            load_sim_config(&path),
            Err(DataLoadError::Parse { .. })
        ));

        cleanup(&dir);
    }

    #[test]
    fn load_sim_config_rejects_zero_boost_divisor() {
        let dir = make_test_dir("config_divisor");
        let path = dir.join("config.ron");
        fs::write(&path, "(boost_divisor: Some(0))").unwrap();

        assert!(matches!(
            load_sim_config(&path),
            Err(DataLoadError::InvalidValue { .. })
        ));

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // load_catalog
    // -----------------------------------------------------------------------

    fn write_tiny(dir: &Path) {
        fs::write(
            dir.join("resources.ron"),
            r#"[(name: "Food", starts_visible: true, gather: true)]"#,
        )
        .unwrap();
        fs::write(
            dir.join("producers.json"),
            r#"[{"name": "Ants", "cost": {"Food": 10}, "outputs": {"Food": 0.5}, "starts_visible": true}]"#,
        )
        .unwrap();
        fs::write(
            dir.join("upgrades.toml"),
            r#"
[[upgrades]]
name = "First Queen"
cost = { Food = 500 }
rate_modifiers = { Ants = 2.0 }
unlock = { Producer = ["Ants", 25] }
display_text = "Ants x2"
"#,
        )
        .unwrap();
    }

    #[test]
    fn load_catalog_mixed_formats() {
        let dir = make_test_dir("catalog_mixed");
        write_tiny(&dir);

        let catalog = load_catalog(&dir).unwrap();
        assert_eq!(catalog.resources().len(), 1);
        assert_eq!(catalog.producers().len(), 1);
        assert_eq!(catalog.upgrades()[0].display_text, "Ants x2");

        cleanup(&dir);
    }

    #[test]
    fn load_catalog_surfaces_validation_errors() {
        let dir = make_test_dir("catalog_invalid");
        write_tiny(&dir);
        // Producer output references a resource that was never declared.
        fs::write(
            dir.join("producers.json"),
            r#"[{"name": "Ants", "cost": {"Food": 10}, "outputs": {"Metal": 0.5}}]"#,
        )
        .unwrap();

        assert!(matches!(
            load_catalog(&dir),
            Err(DataLoadError::Catalog(CatalogError::UnknownResource { .. }))
        ));

        cleanup(&dir);
    }

    #[test]
    fn load_catalog_missing_file() {
        let dir = make_test_dir("catalog_missing");
        write_tiny(&dir);
        fs::remove_file(dir.join("upgrades.toml")).unwrap();

        assert!(matches!(
            load_catalog(&dir),
            Err(DataLoadError::MissingRequired { .. })
        ));

        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // Error display
    // -----------------------------------------------------------------------

    #[test]
    fn error_display_messages() {
        let err = DataLoadError::UnresolvedRef {
            file: PathBuf::from("upgrades.ron"),
            name: "Wheels".into(),
            expected_kind: "upgrade",
        };
        assert_eq!(
            err.to_string(),
            "unresolved upgrade reference 'Wheels' in upgrades.ron"
        );

        let err = DataLoadError::MissingRequired {
            file: "resources".into(),
            dir: PathBuf::from("data"),
        };
        assert_eq!(err.to_string(), "required file 'resources' not found in data");
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: DataLoadError = io.into();
        assert!(matches!(err, DataLoadError::Io(_)));
    }
}
