use std::collections::BTreeMap;

use crate::catalog::{Catalog, Status};

/// Status counts over the full catalog. `residual` covers every project that
/// is not complete, testing, or in progress, so the four buckets always sum
/// to `total`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregates {
    pub total: usize,
    pub complete: usize,
    pub testing: usize,
    pub in_progress: usize,
    pub residual: usize,
    /// Count per status as written in the catalog, keyed by status text.
    pub by_status: BTreeMap<String, usize>,
}

impl Aggregates {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut out = Self {
            total: catalog.len(),
            ..Self::default()
        };
        for project in catalog.projects() {
            match project.status {
                Status::Complete => out.complete += 1,
                Status::Testing => out.testing += 1,
                Status::InProgress => out.in_progress += 1,
                _ => {}
            }
            *out
                .by_status
                .entry(project.status.as_str().to_string())
                .or_insert(0) += 1;
        }
        out.residual = out.total - out.complete - out.testing - out.in_progress;
        out
    }

    /// Distinct statuses present in the catalog, alphabetically.
    pub fn statuses(&self) -> Vec<&str> {
        self.by_status.keys().map(String::as_str).collect()
    }
}
