//! View pipeline: filter the catalog, order what is left, and attach the
//! derived values a renderer needs.
//!
//! `build_view` is a pure function of `(catalog, config)`. Every call
//! produces a complete view; nothing is carried over from earlier calls.

pub mod aggregate;
pub mod order;
pub mod session;

use std::collections::BTreeSet;

use crate::catalog::{Catalog, Category, DependencyRef, ProjectId, ProjectRecord, Status};

pub use aggregate::Aggregates;
pub use order::sort_projects;
pub use session::Session;

/// Lower bound applied to complexity before dividing.
pub const RATIO_FLOOR: f64 = 0.1;

pub const EDGE_MIN: f64 = 0.0;
pub const EDGE_MAX: f64 = 10.0;
pub const COMPLEXITY_MIN: f64 = 1.0;
pub const COMPLEXITY_MAX: f64 = 10.0;

pub const MIN_EDGE_DEFAULT: f64 = EDGE_MIN;
pub const MAX_COMPLEXITY_DEFAULT: f64 = COMPLEXITY_MAX;

pub fn ratio(edge: f64, complexity: f64) -> f64 {
    edge / complexity.max(RATIO_FLOOR)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    BestPractice,
    Radical,
}

impl CategoryFilter {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "best-practice" => Some(Self::BestPractice),
            "radical" => Some(Self::Radical),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::BestPractice => "best-practice",
            Self::Radical => "radical",
        }
    }

    pub fn matches(self, category: &Category) -> bool {
        match self {
            Self::All => true,
            Self::BestPractice => *category == Category::BestPractice,
            Self::Radical => *category == Category::Radical,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusFilter {
    /// Every status, including ones the catalog spells in unrecognized ways.
    #[default]
    All,
    Only(BTreeSet<Status>),
}

impl StatusFilter {
    pub fn only(statuses: impl IntoIterator<Item = Status>) -> Self {
        Self::Only(statuses.into_iter().collect())
    }

    pub fn matches(&self, status: &Status) -> bool {
        match self {
            Self::All => true,
            Self::Only(allowed) => allowed.contains(status),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Ratio,
    Edge,
    Complexity,
    Status,
}

impl SortKey {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ratio" => Some(Self::Ratio),
            "edge" => Some(Self::Edge),
            "complexity" => Some(Self::Complexity),
            "status" => Some(Self::Status),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ratio => "ratio",
            Self::Edge => "edge",
            Self::Complexity => "complexity",
            Self::Status => "status",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    pub category_filter: CategoryFilter,
    pub status_filter: StatusFilter,
    pub min_edge: f64,
    pub max_complexity: f64,
    pub sort_key: SortKey,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            category_filter: CategoryFilter::All,
            status_filter: StatusFilter::All,
            min_edge: MIN_EDGE_DEFAULT,
            max_complexity: MAX_COMPLEXITY_DEFAULT,
            sort_key: SortKey::Ratio,
        }
    }
}

impl ViewConfig {
    /// Rejects thresholds outside the score domains. Out-of-range values are
    /// never clamped.
    pub fn validate(&self) -> Result<(), InvalidConfigError> {
        if !self.min_edge.is_finite() || !(EDGE_MIN..=EDGE_MAX).contains(&self.min_edge) {
            return Err(InvalidConfigError::MinEdge(self.min_edge));
        }
        if !self.max_complexity.is_finite()
            || !(COMPLEXITY_MIN..=COMPLEXITY_MAX).contains(&self.max_complexity)
        {
            return Err(InvalidConfigError::MaxComplexity(self.max_complexity));
        }
        Ok(())
    }

    pub fn matches_category(&self, project: &ProjectRecord) -> bool {
        self.category_filter.matches(&project.category)
    }

    pub fn matches_status(&self, project: &ProjectRecord) -> bool {
        self.status_filter.matches(&project.status)
    }

    pub fn within_thresholds(&self, project: &ProjectRecord) -> bool {
        project.edge >= self.min_edge && project.complexity <= self.max_complexity
    }

    pub fn retains(&self, project: &ProjectRecord) -> bool {
        self.matches_category(project)
            && self.matches_status(project)
            && self.within_thresholds(project)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InvalidConfigError {
    MinEdge(f64),
    MaxComplexity(f64),
}

impl std::fmt::Display for InvalidConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MinEdge(value) => write!(
                f,
                "min_edge {value} is outside [{EDGE_MIN}, {EDGE_MAX}]"
            ),
            Self::MaxComplexity(value) => write!(
                f,
                "max_complexity {value} is outside [{COMPLEXITY_MIN}, {COMPLEXITY_MAX}]"
            ),
        }
    }
}

impl std::error::Error for InvalidConfigError {}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewEntry<'a> {
    /// 1-based position in the ordered view.
    pub rank: usize,
    pub project: &'a ProjectRecord,
    pub ratio: f64,
    pub dependencies: Vec<DependencyRef<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct View<'a> {
    pub entries: Vec<ViewEntry<'a>>,
    /// Counts over the whole catalog, not just the visible entries.
    pub aggregates: Aggregates,
    pub sort_key: SortKey,
}

impl<'a> View<'a> {
    pub fn shown(&self) -> usize {
        self.entries.len()
    }

    pub fn ids(&self) -> Vec<ProjectId> {
        self.entries.iter().map(|entry| entry.project.id).collect()
    }

    pub fn projects(&self) -> impl Iterator<Item = &'a ProjectRecord> + '_ {
        self.entries.iter().map(|entry| entry.project)
    }
}

pub fn build_view<'a>(
    catalog: &'a Catalog,
    config: &ViewConfig,
) -> Result<View<'a>, InvalidConfigError> {
    config.validate()?;
    Ok(assemble_view(catalog, config))
}

/// Filter, sort, and annotate. Callers must have validated `config`.
pub(crate) fn assemble_view<'a>(catalog: &'a Catalog, config: &ViewConfig) -> View<'a> {
    let mut kept = catalog
        .projects()
        .iter()
        .filter(|project| config.retains(project))
        .collect::<Vec<_>>();
    sort_projects(&mut kept, config.sort_key);

    let titles = catalog.title_index();
    let entries = kept
        .into_iter()
        .enumerate()
        .map(|(idx, project)| ViewEntry {
            rank: idx + 1,
            project,
            ratio: project.ratio(),
            dependencies: titles.resolve(&project.depends_on),
        })
        .collect();

    View {
        entries,
        aggregates: Aggregates::from_catalog(catalog),
        sort_key: config.sort_key,
    }
}
