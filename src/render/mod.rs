//! Presentation payloads handed to whatever draws the chart and cards.
//!
//! JSON is the default output; `pretty` holds the plain-text report.

pub mod pretty;
pub mod scatter;
pub mod tier;

use serde_json::{Value, json};

use crate::catalog::{Category, DependencyEntry, DependencyRef};
use crate::view::{Aggregates, StatusFilter, View, ViewConfig, ViewEntry};

use scatter::{REFERENCE_RATIOS, SWEET_SPOT_MAX_COMPLEXITY, SWEET_SPOT_MIN_EDGE, ScatterPlot};
use tier::{complexity_tier, edge_tier, ratio_tier};

pub fn ratio_display(ratio: f64) -> String {
    format!("{ratio:.1}×")
}

pub fn query_to_json(config: &ViewConfig) -> Value {
    let statuses = match &config.status_filter {
        StatusFilter::All => Value::Null,
        StatusFilter::Only(allowed) => json!(
            allowed
                .iter()
                .map(|status| status.as_str().to_string())
                .collect::<Vec<_>>()
        ),
    };
    json!({
        "category": config.category_filter.as_str(),
        "statuses": statuses,
        "min_edge": config.min_edge,
        "max_complexity": config.max_complexity,
        "sort": config.sort_key.as_str(),
    })
}

pub fn aggregates_to_json(aggregates: &Aggregates) -> Value {
    json!({
        "total": aggregates.total,
        "complete": aggregates.complete,
        "testing": aggregates.testing,
        "in_progress": aggregates.in_progress,
        "residual": aggregates.residual,
        "by_status": aggregates.by_status,
        "statuses": aggregates.statuses(),
        "line": pretty::summary_line(aggregates),
    })
}

fn dependency_to_json(dependency: &DependencyRef<'_>) -> Value {
    json!({
        "id": dependency.id,
        "title": dependency.display_title(),
        "resolved": dependency.is_resolved(),
    })
}

pub fn card_to_json(entry: &ViewEntry<'_>) -> Value {
    let project = entry.project;
    json!({
        "rank": entry.rank,
        "id": project.id,
        "title": project.title,
        "category": project.category.as_str(),
        "category_label": project.category.label(),
        "radical": project.category == Category::Radical,
        "status": project.status.as_str(),
        "status_label": project.status.label(),
        "active": project.status.is_active(),
        "edge": project.edge,
        "complexity": project.complexity,
        "ratio": entry.ratio,
        "ratio_display": ratio_display(entry.ratio),
        "tiers": {
            "ratio": ratio_tier(entry.ratio).as_str(),
            "edge": edge_tier(project.edge).as_str(),
            "complexity": complexity_tier(project.complexity).as_str(),
        },
        "in_sweet_spot": scatter::in_sweet_spot(project.edge, project.complexity),
        "phase": project.phase,
        "description": project.description,
        "tech": project.tech,
        "exp_features": project.exp_features,
        "insight": project.insight,
        "notes": project.notes,
        "last_updated": project.last_updated,
        "depends_on": entry.dependencies.iter().map(dependency_to_json).collect::<Vec<_>>(),
    })
}

pub fn scatter_to_json(plot: &ScatterPlot) -> Value {
    let series = plot
        .series
        .iter()
        .map(|series| {
            let points = series
                .points
                .iter()
                .map(|point| {
                    json!({
                        "id": point.id,
                        "label": point.label,
                        "title": point.title,
                        "x": point.x,
                        "y": point.y,
                        "ratio": point.ratio,
                        "marker_size": point.marker_size,
                        "emphasized": point.emphasized,
                        "in_sweet_spot": point.in_sweet_spot,
                        "status_label": point.status_label,
                    })
                })
                .collect::<Vec<_>>();
            json!({
                "category": series.category.as_str(),
                "name": series.category.label(),
                "points": points,
            })
        })
        .collect::<Vec<_>>();

    json!({
        "x_axis": "complexity",
        "y_axis": "edge",
        "series": series,
        "reference_ratios": REFERENCE_RATIOS,
        "sweet_spot": {
            "max_complexity": SWEET_SPOT_MAX_COMPLEXITY,
            "min_edge": SWEET_SPOT_MIN_EDGE,
        },
    })
}

pub fn view_to_json(view: &View<'_>, config: &ViewConfig) -> Value {
    json!({
        "query": query_to_json(config),
        "summary": aggregates_to_json(&view.aggregates),
        "shown": view.shown(),
        "projects": view.entries.iter().map(card_to_json).collect::<Vec<_>>(),
        "scatter": scatter_to_json(&scatter::scatter_plot(view)),
    })
}

pub fn dependency_map_to_json(entries: &[DependencyEntry<'_>]) -> Value {
    let rows = entries
        .iter()
        .map(|entry| {
            json!({
                "id": entry.project.id,
                "title": entry.project.title,
                "depends_on": entry.dependencies.iter().map(dependency_to_json).collect::<Vec<_>>(),
                "line": pretty::dependency_line(entry),
            })
        })
        .collect::<Vec<_>>();
    json!({ "dependencies": rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Status, dependency_map, parse_catalog};
    use crate::view::build_view;

    const CATALOG: &str = r#"- id: 1
  title: Weather Model Scoring Engine
  category: best-practice
  edge: 9.5
  complexity: 5
  status: testing
  phase: Phase 1
  tech: Rust, GRIB2
- id: 2
  title: Live GRIB Nudging
  category: radical
  edge: 9.0
  complexity: 6
  depends_on: [1, 40]
"#;

    #[test]
    fn card_carries_display_fields_and_dependencies() {
        let catalog = parse_catalog(CATALOG).expect("catalog");
        let view = build_view(&catalog, &ViewConfig::default()).expect("view");
        let card = card_to_json(&view.entries[1]);

        assert_eq!(card["rank"], 2);
        assert_eq!(card["id"], 2);
        assert_eq!(card["radical"], true);
        assert_eq!(card["status"], "planned");
        assert_eq!(card["status_label"], "Planned");
        assert_eq!(card["ratio_display"], "1.5×");
        assert_eq!(card["tiers"]["ratio"], "strong");
        assert_eq!(card["tiers"]["edge"], "exceptional");
        assert_eq!(card["tiers"]["complexity"], "substantial");
        assert_eq!(card["depends_on"][0]["title"], "Weather Model Scoring Engine");
        assert_eq!(card["depends_on"][1]["title"], "?");
        assert_eq!(card["depends_on"][1]["resolved"], false);
    }

    #[test]
    fn view_payload_reports_query_summary_and_scatter() {
        let catalog = parse_catalog(CATALOG).expect("catalog");
        let config = ViewConfig {
            status_filter: StatusFilter::only([Status::Testing]),
            ..ViewConfig::default()
        };
        let view = build_view(&catalog, &config).expect("view");
        let payload = view_to_json(&view, &config);

        assert_eq!(payload["query"]["statuses"], json!(["testing"]));
        assert_eq!(payload["query"]["sort"], "ratio");
        assert_eq!(payload["shown"], 1);
        assert_eq!(payload["summary"]["total"], 2);
        assert_eq!(payload["summary"]["testing"], 1);
        assert_eq!(payload["summary"]["residual"], 1);
        assert_eq!(payload["scatter"]["series"].as_array().map(Vec::len), Some(1));
        assert_eq!(payload["scatter"]["series"][0]["name"], "Best Practice");
    }

    #[test]
    fn dependency_map_payload_includes_text_line() {
        let catalog = parse_catalog(CATALOG).expect("catalog");
        let payload = dependency_map_to_json(&dependency_map(&catalog));
        let rows = payload["dependencies"].as_array().expect("rows");
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0]["line"],
            "#2 Live GRIB Nudging ← depends on #1 Weather Model Scoring Engine, #40 ?"
        );
    }
}
