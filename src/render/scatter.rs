//! Edge-versus-complexity scatter data: x is complexity, y is edge, marker
//! size scales with ratio, one series per known category.

use crate::catalog::{Category, ProjectId};
use crate::view::View;

pub const MARKER_SCALE: f64 = 12.0;
pub const REFERENCE_RATIOS: [f64; 3] = [1.0, 1.5, 2.0];
pub const SWEET_SPOT_MAX_COMPLEXITY: f64 = 5.5;
pub const SWEET_SPOT_MIN_EDGE: f64 = 7.5;

const PLOTTED_CATEGORIES: [Category; 2] = [Category::BestPractice, Category::Radical];

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub id: ProjectId,
    pub label: String,
    pub title: String,
    pub x: f64,
    pub y: f64,
    pub ratio: f64,
    pub marker_size: f64,
    pub emphasized: bool,
    pub in_sweet_spot: bool,
    pub status_label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub category: Category,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPlot {
    pub series: Vec<ScatterSeries>,
}

pub fn in_sweet_spot(edge: f64, complexity: f64) -> bool {
    complexity <= SWEET_SPOT_MAX_COMPLEXITY && edge >= SWEET_SPOT_MIN_EDGE
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Builds one series per plotted category, keeping view order inside each
/// series. Empty series are left out, and projects whose category is not
/// recognized are not plotted.
pub fn scatter_plot(view: &View<'_>) -> ScatterPlot {
    let mut series = Vec::new();
    for category in PLOTTED_CATEGORIES {
        let points = view
            .entries
            .iter()
            .filter(|entry| entry.project.category == category)
            .map(|entry| {
                let project = entry.project;
                ScatterPoint {
                    id: project.id,
                    label: format!("#{}", project.id),
                    title: project.title.clone(),
                    x: project.complexity,
                    y: project.edge,
                    ratio: round2(entry.ratio),
                    marker_size: entry.ratio * MARKER_SCALE,
                    emphasized: project.status.is_active(),
                    in_sweet_spot: in_sweet_spot(project.edge, project.complexity),
                    status_label: project.status.label().to_string(),
                }
            })
            .collect::<Vec<_>>();
        if !points.is_empty() {
            series.push(ScatterSeries { category, points });
        }
    }
    ScatterPlot { series }
}
