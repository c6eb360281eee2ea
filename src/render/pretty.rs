use std::fmt::Write as _;

use crate::catalog::{Category, DependencyEntry, DependencyRef};
use crate::view::{Aggregates, View, ViewEntry};

use super::ratio_display;
use super::tier::{complexity_tier, edge_tier, ratio_tier};

pub fn summary_line(aggregates: &Aggregates) -> String {
    format!(
        "{} projects · {} complete · {} testing · {} in progress · {} planned/idea",
        aggregates.total,
        aggregates.complete,
        aggregates.testing,
        aggregates.in_progress,
        aggregates.residual
    )
}

fn dependency_names(dependencies: &[DependencyRef<'_>]) -> String {
    dependencies
        .iter()
        .map(|dependency| format!("#{} {}", dependency.id, dependency.display_title()))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn dependency_line(entry: &DependencyEntry<'_>) -> String {
    format!(
        "#{} {} ← depends on {}",
        entry.project.id,
        entry.project.title,
        dependency_names(&entry.dependencies)
    )
}

fn push_field(out: &mut String, label: &str, value: &str) {
    if !value.is_empty() {
        let _ = writeln!(out, "   {label}: {value}");
    }
}

fn render_card(out: &mut String, entry: &ViewEntry<'_>) {
    let project = entry.project;
    let _ = writeln!(
        out,
        "{}. #{} {}  {} [{}]",
        entry.rank,
        project.id,
        project.title,
        ratio_display(entry.ratio),
        project.status.label()
    );
    let _ = writeln!(
        out,
        "   edge={} ({}) complexity={} ({}) ratio={} ({})",
        project.edge,
        edge_tier(project.edge).as_str(),
        project.complexity,
        complexity_tier(project.complexity).as_str(),
        ratio_display(entry.ratio),
        ratio_tier(entry.ratio).as_str()
    );
    if project.category != Category::BestPractice {
        let _ = writeln!(out, "   category: {}", project.category.as_str());
    }
    push_field(out, "phase", &project.phase);
    push_field(out, "description", &project.description);
    push_field(out, "tech", &project.tech);
    push_field(out, "expedition features", &project.exp_features);
    if !entry.dependencies.is_empty() {
        let _ = writeln!(out, "   depends on: {}", dependency_names(&entry.dependencies));
    }
    push_field(out, "insight", &project.insight);
    push_field(out, "notes", &project.notes);
    push_field(out, "last updated", &project.last_updated);
}

pub fn render_view(view: &View<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", summary_line(&view.aggregates));
    let _ = writeln!(
        out,
        "projects: {} shown (sort={})",
        view.shown(),
        view.sort_key.as_str()
    );
    for entry in &view.entries {
        render_card(&mut out, entry);
    }
    out
}

pub fn render_stats(aggregates: &Aggregates) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", summary_line(aggregates));
    for (status, count) in &aggregates.by_status {
        let _ = writeln!(out, "- {status}: {count}");
    }
    out
}

pub fn render_dependency_map(entries: &[DependencyEntry<'_>]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "dependencies: {}", entries.len());
    for entry in entries {
        let _ = writeln!(out, "- {}", dependency_line(entry));
    }
    out
}
