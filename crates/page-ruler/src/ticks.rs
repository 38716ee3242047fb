//! Tick marks.

use serde::Serialize;

/// Visual weight of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TickKind {
    /// Whole inch.
    Major,
    /// Half inch.
    Half,
    /// Quarter inch.
    Quarter,
    /// Eighth inch.
    Minor,
}

/// One tick on a ruler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tick {
    /// Position along the ruler, relative to its leading edge.
    pub position: f64,
    /// Visual weight.
    pub kind: TickKind,
    /// Inch number drawn next to the tick.
    pub label: Option<i32>,
}

/// One labelled mark per inch, `0..=count-1`, starting at `origin`.
pub fn inch_marks(origin: f64, count: usize, dpi: f64) -> Vec<Tick> {
    (0..count)
        .map(|inch| Tick {
            position: origin + inch as f64 * dpi,
            kind: TickKind::Major,
            label: Some(inch as i32),
        })
        .collect()
}

/// Eighth-inch ticks whose zero sits at `zero`.
///
/// Generates `count` ticks starting `lead` eighths before zero and keeps those inside
/// `[0, extent]`. Only positive whole inches are labelled.
pub fn eighth_inch_ticks(zero: f64, lead: i32, count: usize, extent: f64, dpi: f64) -> Vec<Tick> {
    let step = dpi / 8.0;
    (0..count as i32)
        .map(|index| index - lead)
        .filter_map(|i| {
            let position = zero + f64::from(i) * step;
            if position < 0.0 || position > extent {
                return None;
            }

            let kind = if i % 8 == 0 {
                TickKind::Major
            } else if i % 4 == 0 {
                TickKind::Half
            } else if i % 2 == 0 {
                TickKind::Quarter
            } else {
                TickKind::Minor
            };
            let label = (kind == TickKind::Major && i > 0).then_some(i / 8);

            Some(Tick {
                position,
                kind,
                label,
            })
        })
        .collect()
}
