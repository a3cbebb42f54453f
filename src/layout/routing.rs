use crate::config::LayoutConfig;
use crate::model::Descriptor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

use super::resolve::resolve_address;
use super::types::{ArrowLayout, PanelLayout};

/// Strategy for spreading arrows that converge on the same target slot.
///
/// The offset is cosmetic; routing only requires that multiple arrows into
/// one slot do not collapse onto a single point. The default is seeded
/// jitter, so a fixed seed reproduces a figure exactly.
pub trait SlotSpread {
    /// Sub-row offset added to an arrow's target y anchor.
    fn offset(&mut self) -> f32;
}

pub struct JitterSpread {
    rng: StdRng,
    min: f32,
    max: f32,
}

impl JitterSpread {
    pub fn new(range: (f32, f32), seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng,
            min: range.0,
            max: range.1,
        }
    }

    pub fn from_config(config: &LayoutConfig, seed: Option<u64>) -> Self {
        Self::new((config.jitter_min, config.jitter_max), seed)
    }
}

impl SlotSpread for JitterSpread {
    fn offset(&mut self) -> f32 {
        self.rng.random_range(self.min..self.max)
    }
}

/// Constant offset; useful for golden-file tests.
pub struct FixedSpread(pub f32);

impl SlotSpread for FixedSpread {
    fn offset(&mut self) -> f32 {
        self.0
    }
}

/// Routes one arrow per descriptor whose address resolves to a panel.
///
/// Anchor rules:
/// - source y is the descriptor's row plus half a row, so arrows leave
///   mid-row; target y is the address plus the spread offset.
/// - intra-panel references loop along the outer edge that keeps the arc off
///   the panel's content: left with a convex arc when `address < reference`,
///   right with a concave arc otherwise.
/// - cross-panel references run from the source panel's inner-facing edge to
///   the target panel's facing edge, straight, with left/right chosen from
///   the panels' horizontal centers on the figure.
pub fn route_arrows(
    groups: &BTreeMap<String, Vec<Descriptor>>,
    panels: &[PanelLayout],
    config: &LayoutConfig,
    spread: &mut dyn SlotSpread,
) -> Vec<ArrowLayout> {
    let by_name: BTreeMap<&str, &PanelLayout> = panels
        .iter()
        .map(|panel| (panel.type_name.as_str(), panel))
        .collect();
    let (x_min, x_max) = config.x_extent();
    let mut arrows = Vec::new();

    for (type_name, members) in groups {
        let Some(&source_panel) = by_name.get(type_name.as_str()) else {
            continue;
        };
        for descriptor in members {
            let Some(reference) = descriptor.reference else {
                continue;
            };
            let Some(address) = descriptor.address_value else {
                continue;
            };
            let Some(target_panel) = resolve_address(address, panels) else {
                continue;
            };

            let source_y = reference as f32 + 0.5;
            let target_y = address as f32 + spread.offset();

            let (source_x, target_x, rad) = if target_panel.type_name == *type_name {
                if address < reference {
                    (x_min - 1.0, x_min - 1.0, config.loop_rad)
                } else {
                    (x_max + 1.0, x_max + 1.0, -config.loop_rad)
                }
            } else if source_panel.space.frame.center_x() < target_panel.space.frame.center_x() {
                (x_max, x_min, 0.0)
            } else {
                (x_min, x_max, 0.0)
            };

            arrows.push(ArrowLayout {
                from_type: type_name.clone(),
                to_type: target_panel.type_name.clone(),
                source_reference: reference,
                address,
                source: source_panel.space.to_figure((source_x, source_y)),
                target: target_panel.space.to_figure((target_x, target_y)),
                rad,
            });
        }
    }

    arrows
}
