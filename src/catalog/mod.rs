//! Project catalog: the read-only list of project records a session views.
//!
//! Records come from a YAML document that is either a bare sequence of
//! project mappings or a mapping with a `projects` key. Optional fields are
//! defaulted here; nothing downstream ever sees a missing value.

pub mod cache;
pub mod deps;

use std::collections::HashSet;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use tracing::debug;

pub use cache::{CatalogCache, content_digest};
pub use deps::{DependencyEntry, DependencyRef, TitleIndex, UNRESOLVED_TITLE, dependency_map};

pub type ProjectId = i64;

/// Path value that selects standard input as the catalog source.
pub const STDIN_SOURCE: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    BestPractice,
    Radical,
    Other(String),
}

impl Category {
    /// Exact match on catalog text; any other spelling stays `Other`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "best-practice" => Self::BestPractice,
            "radical" => Self::Radical,
            _ => Self::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::BestPractice => "best-practice",
            Self::Radical => "radical",
            Self::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::BestPractice => "Best Practice",
            Self::Radical => "Radical",
            Self::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Status {
    Idea,
    #[default]
    Planned,
    InProgress,
    Testing,
    Complete,
    OnHold,
    Other(String),
}

impl Status {
    pub const KNOWN: [Status; 6] = [
        Status::Idea,
        Status::Planned,
        Status::InProgress,
        Status::Testing,
        Status::Complete,
        Status::OnHold,
    ];

    /// Parse used for catalog data. Text must match a known status exactly;
    /// anything else, including other casings, is kept as `Other`.
    pub fn parse(raw: &str) -> Self {
        Self::parse_known(raw).unwrap_or_else(|| Self::Other(raw.to_string()))
    }

    pub fn parse_known(raw: &str) -> Option<Self> {
        Self::KNOWN.into_iter().find(|status| status.as_str() == raw)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Idea => "idea",
            Self::Planned => "planned",
            Self::InProgress => "in-progress",
            Self::Testing => "testing",
            Self::Complete => "complete",
            Self::OnHold => "on-hold",
            Self::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Idea => "Idea",
            Self::Planned => "Planned",
            Self::InProgress => "In Progress",
            Self::Testing => "Testing",
            Self::Complete => "Complete",
            Self::OnHold => "On Hold",
            Self::Other(raw) => raw,
        }
    }

    /// Ordering used by the status sort: finished work first, parked work last.
    pub fn precedence(&self) -> u8 {
        match self {
            Self::Complete => 0,
            Self::Testing => 1,
            Self::InProgress => 2,
            Self::Planned => 3,
            Self::Idea => 4,
            Self::OnHold => 5,
            Self::Other(_) => 99,
        }
    }

    /// Statuses with work underway or done; drawn at full strength on the chart.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Complete | Self::Testing | Self::InProgress)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRecord {
    pub id: ProjectId,
    pub title: String,
    pub category: Category,
    pub edge: f64,
    pub complexity: f64,
    pub status: Status,
    pub description: String,
    pub tech: String,
    pub exp_features: String,
    pub insight: String,
    pub notes: String,
    pub phase: String,
    pub last_updated: String,
    pub depends_on: Vec<ProjectId>,
}

impl ProjectRecord {
    /// Record with the required fields set and every optional field defaulted.
    pub fn new(
        id: ProjectId,
        title: impl Into<String>,
        category: Category,
        edge: f64,
        complexity: f64,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            category,
            edge,
            complexity,
            status: Status::default(),
            description: String::new(),
            tech: String::new(),
            exp_features: String::new(),
            insight: String::new(),
            notes: String::new(),
            phase: String::new(),
            last_updated: String::new(),
            depends_on: Vec::new(),
        }
    }

    pub fn ratio(&self) -> f64 {
        crate::view::ratio(self.edge, self.complexity)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    projects: Vec<ProjectRecord>,
    digest: Option<String>,
}

impl Catalog {
    /// Builds a catalog from already-shaped records, enforcing positive,
    /// unique ids and non-empty titles.
    pub fn from_records(projects: Vec<ProjectRecord>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(projects.len());
        for (index, project) in projects.iter().enumerate() {
            if project.id <= 0 {
                return Err(CatalogError::InvalidRecord {
                    index,
                    reason: format!("id must be a positive integer, got {}", project.id),
                });
            }
            if project.title.trim().is_empty() {
                return Err(CatalogError::InvalidRecord {
                    index,
                    reason: format!("project #{} has an empty title", project.id),
                });
            }
            if !seen.insert(project.id) {
                return Err(CatalogError::DuplicateId(project.id));
            }
        }
        Ok(Self {
            projects,
            digest: None,
        })
    }

    pub fn projects(&self) -> &[ProjectRecord] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn get(&self, id: ProjectId) -> Option<&ProjectRecord> {
        self.projects.iter().find(|project| project.id == id)
    }

    /// SHA-256 of the source text, when the catalog was parsed from one.
    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    pub fn title_index(&self) -> TitleIndex<'_> {
        TitleIndex::new(self)
    }
}

#[derive(Debug)]
pub enum CatalogError {
    Io(io::Error),
    Yaml(serde_yaml::Error),
    NotASequence,
    InvalidRecord { index: usize, reason: String },
    DuplicateId(ProjectId),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Yaml(err) => write!(f, "{err}"),
            Self::NotASequence => write!(
                f,
                "expected a sequence of project entries or a `projects` key"
            ),
            Self::InvalidRecord { index, reason } => {
                write!(f, "invalid project entry at position {index}: {reason}")
            }
            Self::DuplicateId(id) => write!(f, "duplicate project id {id}"),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<io::Error> for CatalogError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_yaml::Error> for CatalogError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Yaml(value)
    }
}

#[derive(Debug, Deserialize)]
struct RawProject {
    id: ProjectId,
    #[serde(deserialize_with = "text")]
    title: String,
    #[serde(deserialize_with = "text")]
    category: String,
    edge: f64,
    complexity: f64,
    #[serde(default, deserialize_with = "optional_text")]
    status: Option<String>,
    #[serde(default, deserialize_with = "text")]
    description: String,
    #[serde(default, deserialize_with = "text")]
    tech: String,
    #[serde(default, deserialize_with = "text")]
    exp_features: String,
    #[serde(default, deserialize_with = "text")]
    insight: String,
    #[serde(default, deserialize_with = "text")]
    notes: String,
    #[serde(default, deserialize_with = "text")]
    phase: String,
    #[serde(default, deserialize_with = "text")]
    last_updated: String,
    #[serde(default)]
    depends_on: Option<Vec<ProjectId>>,
}

impl RawProject {
    fn into_record(self) -> ProjectRecord {
        let status = match self.status {
            Some(raw) if !raw.trim().is_empty() => Status::parse(&raw),
            _ => Status::default(),
        };

        let mut depends_on = Vec::new();
        for id in self.depends_on.unwrap_or_default() {
            if !depends_on.contains(&id) {
                depends_on.push(id);
            }
        }

        ProjectRecord {
            id: self.id,
            title: self.title,
            category: Category::parse(&self.category),
            edge: self.edge,
            complexity: self.complexity,
            status,
            description: self.description,
            tech: self.tech,
            exp_features: self.exp_features,
            insight: self.insight,
            notes: self.notes,
            phase: self.phase,
            last_updated: self.last_updated,
            depends_on,
        }
    }
}

fn scalar_text<E: serde::de::Error>(value: Value) -> Result<Option<String>, E> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text)),
        Value::Bool(flag) => Ok(Some(flag.to_string())),
        Value::Number(number) => Ok(Some(number.to_string())),
        Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => {
            Err(E::custom("expected a text value"))
        }
    }
}

fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text::<D::Error>(value)?.unwrap_or_default())
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_text::<D::Error>(value)
}

/// Reads catalog text from a file, or from stdin when `path` is `-`.
pub fn read_source(path: &Path) -> Result<String, CatalogError> {
    if path.as_os_str() == STDIN_SOURCE {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    Ok(fs::read_to_string(path)?)
}

pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let content = read_source(path)?;
    let catalog = parse_catalog(&content)?;
    debug!(path = %path.display(), projects = catalog.len(), "catalog loaded");
    Ok(catalog)
}

pub fn parse_catalog(content: &str) -> Result<Catalog, CatalogError> {
    parse_catalog_with_digest(content, content_digest(content))
}

pub(crate) fn parse_catalog_with_digest(
    content: &str,
    digest: String,
) -> Result<Catalog, CatalogError> {
    let document: Value = serde_yaml::from_str(content)?;
    let entries = match document {
        Value::Sequence(entries) => entries,
        Value::Mapping(mut mapping) => match mapping.remove("projects") {
            Some(Value::Sequence(entries)) => entries,
            _ => return Err(CatalogError::NotASequence),
        },
        _ => return Err(CatalogError::NotASequence),
    };

    let mut projects = Vec::with_capacity(entries.len());
    for entry in entries {
        let raw: RawProject = serde_yaml::from_value(entry)?;
        projects.push(raw.into_record());
    }

    let mut catalog = Catalog::from_records(projects)?;
    catalog.digest = Some(digest);
    Ok(catalog)
}
