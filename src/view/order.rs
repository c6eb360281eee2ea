use std::cmp::Ordering;

use crate::catalog::ProjectRecord;

use super::SortKey;

/// Orders projects in place. Ties on the sort key fall back to ascending id,
/// so the result does not depend on input order.
pub fn sort_projects(projects: &mut [&ProjectRecord], key: SortKey) {
    projects.sort_by(|a, b| compare(a, b, key));
}

pub fn compare(a: &ProjectRecord, b: &ProjectRecord, key: SortKey) -> Ordering {
    let primary = match key {
        SortKey::Ratio => b.ratio().total_cmp(&a.ratio()),
        SortKey::Edge => b.edge.total_cmp(&a.edge),
        SortKey::Complexity => a.complexity.total_cmp(&b.complexity),
        SortKey::Status => a.status.precedence().cmp(&b.status.precedence()),
    };
    primary.then_with(|| a.id.cmp(&b.id))
}
