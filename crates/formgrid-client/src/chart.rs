#![forbid(unsafe_code)]

//! Chart data contracts and response aggregation.
//!
//! Chart rendering itself is an external collaborator behind the
//! [`ChartRenderer`] seam; formgrid only decides *what* to plot. The closed
//! [`ChartKind`] set replaces stringly-typed chart selection, and
//! [`tally_field`] reshapes flat key/value survey responses into the
//! per-category counts every kind consumes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::api::ResponseRecord;

/// Longest category label emitted before ellipsis truncation.
const MAX_CATEGORY_CHARS: usize = 24;

// ---------------------------------------------------------------------------
// Chart kinds
// ---------------------------------------------------------------------------

/// The closed set of supported chart kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    /// Vertical bars per category.
    Bar,
    /// Donut/pie of category shares.
    Donut,
    /// Treemap of category shares.
    Tree,
    /// Radar across categories.
    Radar,
    /// XY scatter.
    XyScatter,
    /// XY line.
    XyLine,
    /// XY bars.
    XyBar,
}

impl ChartKind {
    /// All kinds in declaration order.
    pub const ALL: [ChartKind; 7] = [
        ChartKind::Bar,
        ChartKind::Donut,
        ChartKind::Tree,
        ChartKind::Radar,
        ChartKind::XyScatter,
        ChartKind::XyLine,
        ChartKind::XyBar,
    ];

    /// Wire/display label for this kind.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Donut => "donut",
            ChartKind::Tree => "tree",
            ChartKind::Radar => "radar",
            ChartKind::XyScatter => "xy-scatter",
            ChartKind::XyLine => "xy-line",
            ChartKind::XyBar => "xy-bar",
        }
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Data contract
// ---------------------------------------------------------------------------

/// One plotted category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartDatum {
    /// Display label, possibly ellipsis-truncated.
    pub category: String,
    /// Occurrence count.
    pub value: u64,
    /// Share of all answers, preformatted (e.g. `"37.5"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_percent: Option<String>,
}

/// The chart renderer collaborator.
///
/// `container_id` names the surface the chart lives in; a renderer must
/// tolerate `dispose` for a container it never drew to.
pub trait ChartRenderer {
    /// Draw (or redraw) a chart into a container.
    fn render(&mut self, kind: ChartKind, data: &[ChartDatum], field_name: &str, container_id: &str);

    /// Tear down whatever was drawn into a container.
    fn dispose(&mut self, container_id: &str);
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Count answers for one field across response records.
///
/// Multi-select answers contribute one count per chosen value. Output is
/// ordered by descending count, then category, so repeated tallies of the
/// same records plot identically. Labels longer than the display budget are
/// truncated with an ellipsis; truncated labels still tally separately when
/// their full values differ.
#[must_use]
pub fn tally_field(field_key: &str, records: &[ResponseRecord]) -> Vec<ChartDatum> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for record in records {
        if let Some(answer) = record.responses.get(field_key) {
            for value in answer.values() {
                *counts.entry(value).or_insert(0) += 1;
            }
        }
    }

    let total: u64 = counts.values().sum();
    let mut data: Vec<ChartDatum> = counts
        .into_iter()
        .map(|(value, count)| ChartDatum {
            category: truncate_label(value),
            value: count,
            real_percent: (total > 0)
                .then(|| format!("{:.1}", count as f64 * 100.0 / total as f64)),
        })
        .collect();
    data.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.category.cmp(&b.category)));
    data
}

fn truncate_label(value: &str) -> String {
    let mut chars = value.chars();
    let prefix: String = chars.by_ref().take(MAX_CATEGORY_CHARS).collect();
    if chars.next().is_some() {
        format!("{prefix}…")
    } else {
        prefix
    }
}
