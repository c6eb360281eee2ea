use std::collections::HashMap;

use tracing::debug;

use super::{Catalog, ProjectId, ProjectRecord};

/// Title shown for a dependency id that no project in the catalog carries.
pub const UNRESOLVED_TITLE: &str = "?";

/// `id -> title` lookup over the full catalog.
#[derive(Debug, Clone)]
pub struct TitleIndex<'a> {
    titles: HashMap<ProjectId, &'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyRef<'a> {
    pub id: ProjectId,
    pub title: Option<&'a str>,
}

impl<'a> DependencyRef<'a> {
    pub fn is_resolved(&self) -> bool {
        self.title.is_some()
    }

    pub fn display_title(&self) -> &'a str {
        self.title.unwrap_or(UNRESOLVED_TITLE)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DependencyEntry<'a> {
    pub project: &'a ProjectRecord,
    pub dependencies: Vec<DependencyRef<'a>>,
}

impl<'a> TitleIndex<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        let titles = catalog
            .projects()
            .iter()
            .map(|project| (project.id, project.title.as_str()))
            .collect();
        Self { titles }
    }

    pub fn title(&self, id: ProjectId) -> Option<&'a str> {
        self.titles.get(&id).copied()
    }

    pub fn resolve(&self, ids: &[ProjectId]) -> Vec<DependencyRef<'a>> {
        ids.iter()
            .map(|&id| {
                let title = self.title(id);
                if title.is_none() {
                    debug!(dependency = id, "dangling dependency id");
                }
                DependencyRef { id, title }
            })
            .collect()
    }
}

/// Direct dependency edges for every project that declares any, in catalog order.
pub fn dependency_map(catalog: &Catalog) -> Vec<DependencyEntry<'_>> {
    let titles = catalog.title_index();
    catalog
        .projects()
        .iter()
        .filter(|project| !project.depends_on.is_empty())
        .map(|project| DependencyEntry {
            project,
            dependencies: titles.resolve(&project.depends_on),
        })
        .collect()
}
