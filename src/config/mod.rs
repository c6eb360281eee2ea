use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::catalog::Status;
use crate::view::{CategoryFilter, SortKey, StatusFilter, ViewConfig};

pub const PROJECT_CONFIG_FILE: &str = ".edgemap.yml";
pub const DEFAULT_CATALOG_FILE: &str = "projects.yaml";

/// View settings a config layer or CLI flag may set. `None` leaves the value
/// from lower layers in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewOverrides {
    pub category: Option<CategoryFilter>,
    pub statuses: Option<Vec<Status>>,
    pub min_edge: Option<f64>,
    pub max_complexity: Option<f64>,
    pub sort: Option<SortKey>,
}

impl ViewOverrides {
    pub fn merge(&mut self, layer: ViewOverrides) {
        if layer.category.is_some() {
            self.category = layer.category;
        }
        if layer.statuses.is_some() {
            self.statuses = layer.statuses;
        }
        if layer.min_edge.is_some() {
            self.min_edge = layer.min_edge;
        }
        if layer.max_complexity.is_some() {
            self.max_complexity = layer.max_complexity;
        }
        if layer.sort.is_some() {
            self.sort = layer.sort;
        }
    }

    pub fn to_view_config(&self) -> ViewConfig {
        let defaults = ViewConfig::default();
        ViewConfig {
            category_filter: self.category.unwrap_or(defaults.category_filter),
            status_filter: match &self.statuses {
                Some(statuses) => StatusFilter::only(statuses.iter().cloned()),
                None => defaults.status_filter,
            },
            min_edge: self.min_edge.unwrap_or(defaults.min_edge),
            max_complexity: self.max_complexity.unwrap_or(defaults.max_complexity),
            sort_key: self.sort.unwrap_or(defaults.sort_key),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectiveConfig {
    pub catalog: Option<PathBuf>,
    pub view: ViewOverrides,
}

impl EffectiveConfig {
    pub fn catalog_path(&self, cwd: &Path) -> PathBuf {
        self.catalog
            .clone()
            .unwrap_or_else(|| cwd.join(DEFAULT_CATALOG_FILE))
    }

    pub fn view_config(&self) -> ViewConfig {
        self.view.to_view_config()
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    catalog: Option<String>,
    #[serde(default)]
    view: Option<RawViewSection>,
}

#[derive(Debug, Default, Deserialize)]
struct RawViewSection {
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    statuses: Option<Vec<String>>,
    #[serde(default)]
    min_edge: Option<f64>,
    #[serde(default)]
    max_complexity: Option<f64>,
    #[serde(default)]
    sort: Option<String>,
}

impl RawViewSection {
    fn into_overrides(self) -> Result<ViewOverrides, ConfigError> {
        let category = self
            .category
            .as_deref()
            .map(parse_category_filter)
            .transpose()?;
        let statuses = match self.statuses {
            Some(raw) => Some(parse_statuses(&raw)?),
            None => None,
        };
        let sort = self.sort.as_deref().map(parse_sort_key).transpose()?;
        Ok(ViewOverrides {
            category,
            statuses,
            min_edge: self.min_edge,
            max_complexity: self.max_complexity,
            sort,
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    MissingFile(PathBuf),
    InvalidValue { field: &'static str, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Yaml(err) => write!(f, "{err}"),
            Self::MissingFile(path) => write!(f, "config file `{}` not found", path.display()),
            Self::InvalidValue { field, value } => write!(f, "unknown {field} `{value}`"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Yaml(value)
    }
}

#[derive(Debug)]
struct ConfigLayer {
    catalog: Option<PathBuf>,
    view: ViewOverrides,
}

/// Merges, lowest precedence first: the user config, the nearest
/// `.edgemap.yml` above `cwd`, then an explicitly named config file.
pub fn load_effective_config(
    cwd: &Path,
    explicit_config: Option<&Path>,
    user_config: Option<&Path>,
    home: Option<&Path>,
) -> Result<EffectiveConfig, ConfigError> {
    let mut merged = EffectiveConfig::default();

    if let Some(path) = user_config.filter(|path| path.exists()) {
        let cfg = load_config_layer(path, home)?;
        merge_layer(&mut merged, cfg);
    }

    if let Some(path) = find_nearest_project_config(cwd) {
        let cfg = load_config_layer(&path, home)?;
        merge_layer(&mut merged, cfg);
    }

    if let Some(path) = explicit_config {
        if !path.is_file() {
            return Err(ConfigError::MissingFile(path.to_path_buf()));
        }
        let cfg = load_config_layer(path, home)?;
        merge_layer(&mut merged, cfg);
    }

    Ok(merged)
}

pub fn find_nearest_project_config(start: &Path) -> Option<PathBuf> {
    for dir in start.ancestors() {
        let candidate = dir.join(PROJECT_CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

fn merge_layer(merged: &mut EffectiveConfig, layer: ConfigLayer) {
    if layer.catalog.is_some() {
        merged.catalog = layer.catalog;
    }
    merged.view.merge(layer.view);
}

fn load_config_layer(path: &Path, home: Option<&Path>) -> Result<ConfigLayer, ConfigError> {
    let content = fs::read_to_string(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    parse_config_layer(&content, base_dir, home)
}

fn parse_config_layer(
    content: &str,
    base_dir: &Path,
    home: Option<&Path>,
) -> Result<ConfigLayer, ConfigError> {
    if content.trim().is_empty() {
        return Ok(ConfigLayer {
            catalog: None,
            view: ViewOverrides::default(),
        });
    }
    let raw: RawConfig = serde_yaml::from_str(content)?;
    let catalog = raw
        .catalog
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| resolve_catalog_path(value, base_dir, home));
    let view = raw.view.unwrap_or_default().into_overrides()?;
    Ok(ConfigLayer { catalog, view })
}

pub fn load_config_file(path: &Path, home: Option<&Path>) -> Result<EffectiveConfig, ConfigError> {
    let layer = load_config_layer(path, home)?;
    Ok(EffectiveConfig {
        catalog: layer.catalog,
        view: layer.view,
    })
}

/// Relative catalog paths are taken relative to the config file that names them.
pub fn resolve_catalog_path(raw: &str, base_dir: &Path, home: Option<&Path>) -> PathBuf {
    let expanded = match home {
        Some(home) => expand_tilde(raw, home),
        None => PathBuf::from(raw),
    };
    if expanded.is_absolute() {
        expanded
    } else {
        base_dir.join(expanded)
    }
}

pub fn expand_tilde(path: &str, home: &Path) -> PathBuf {
    if path == "~" {
        return home.to_path_buf();
    }
    if let Some(rest) = path.strip_prefix("~/") {
        return home.join(rest);
    }
    PathBuf::from(path)
}

pub fn parse_category_filter(raw: &str) -> Result<CategoryFilter, ConfigError> {
    CategoryFilter::parse(raw).ok_or_else(|| ConfigError::InvalidValue {
        field: "category",
        value: raw.to_string(),
    })
}

/// Known statuses match case-insensitively. Any other non-blank text selects
/// the catalog status spelled exactly that way.
pub fn parse_status(raw: &str) -> Result<Status, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "status",
            value: raw.to_string(),
        });
    }
    Ok(Status::parse_known(&trimmed.to_ascii_lowercase())
        .unwrap_or_else(|| Status::Other(trimmed.to_string())))
}

pub fn parse_statuses(raw: &[String]) -> Result<Vec<Status>, ConfigError> {
    raw.iter().map(|value| parse_status(value)).collect()
}

pub fn parse_sort_key(raw: &str) -> Result<SortKey, ConfigError> {
    SortKey::parse(raw).ok_or_else(|| ConfigError::InvalidValue {
        field: "sort key",
        value: raw.to_string(),
    })
}
