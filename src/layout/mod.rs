pub mod geometry;
mod grouping;
mod range;
mod resolve;
mod routing;
mod slots;
pub(crate) mod types;

pub use routing::{FixedSpread, JitterSpread, SlotSpread};
pub use types::*;

use crate::config::LayoutConfig;
use crate::model::Descriptor;
use geometry::{PanelSpace, cell_frame};
use grouping::group_by_type;
use range::{grid_shape, panel_height, reference_range};
use routing::route_arrows;
use slots::empty_slots;
use std::collections::BTreeSet;

/// Runs the full pipeline: group, size, place, fill, route.
///
/// Panels come out in lexicographic type order, assigned to grid cells
/// row-major. The same input with the same spread produces an identical
/// layout; only an unseeded jitter spread varies between runs.
pub fn compute_layout(
    descriptors: &[Descriptor],
    config: &LayoutConfig,
    spread: &mut dyn SlotSpread,
) -> Layout {
    let groups = group_by_type(descriptors);
    if groups.is_empty() {
        return Layout {
            grid: GridShape { rows: 0, cols: 0 },
            panels: Vec::new(),
            arrows: Vec::new(),
            width: config.panel_width,
            height: config.base_height,
        };
    }

    let grid = grid_shape(groups.len());
    let x_extent = config.x_extent();
    let mut max_height = 0.0f32;
    let mut panels = Vec::with_capacity(groups.len());

    for (index, (type_name, members)) in groups.iter().enumerate() {
        let (min_ref, max_ref) = reference_range(members);
        let height = panel_height(min_ref, max_ref, members.len(), config);
        max_height = max_height.max(height);

        let cell = (index / grid.cols, index % grid.cols);
        let space = PanelSpace {
            frame: cell_frame(cell, grid, &config.margins),
            x_extent,
            // One extra unit above max_ref so the top row's boxes stay inside
            // the panel.
            y_extent: (min_ref as f32, max_ref as f32 + 1.0),
        };

        let mut rows = Vec::new();
        let mut occupied = BTreeSet::new();
        for member in members {
            let Some(reference) = member.reference else {
                continue;
            };
            rows.push(build_row(member, reference, config));
            occupied.insert(reference);
        }

        panels.push(PanelLayout {
            type_name: type_name.clone(),
            cell,
            space,
            min_ref,
            max_ref,
            height,
            rows,
            empty_slots: empty_slots(min_ref, max_ref, &occupied),
        });
    }

    let arrows = route_arrows(&groups, &panels, config, spread);

    Layout {
        grid,
        panels,
        arrows,
        width: config.panel_width * grid.cols as f32,
        height: max_height * grid.rows as f32,
    }
}

fn build_row(descriptor: &Descriptor, reference: i64, config: &LayoutConfig) -> RowLayout {
    let mut fields = Vec::with_capacity(config.field_widths.len());
    let mut start = -1.0f32;
    for (index, (label, &width)) in descriptor
        .field_labels()
        .iter()
        .zip(config.field_widths.iter())
        .enumerate()
    {
        fields.push(FieldBox {
            x: start,
            width,
            label: label.to_string(),
            color_index: index,
        });
        start += width;
    }
    RowLayout {
        reference,
        y: reference as f32,
        fields,
        address_label: descriptor.address.clone(),
        ref_label: format!("Ref: {reference}"),
    }
}
