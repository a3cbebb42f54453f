use crate::config::LayoutConfig;
use crate::model::Descriptor;

use super::types::GridShape;

/// `(min, max)` over the members' references. A group with no referenced
/// members still needs a drawable span, so it defaults to `(0, 1)`.
pub fn reference_range(members: &[Descriptor]) -> (i64, i64) {
    let mut range: Option<(i64, i64)> = None;
    for reference in members.iter().filter_map(|d| d.reference) {
        range = Some(match range {
            Some((min, max)) => (min.min(reference), max.max(reference)),
            None => (reference, reference),
        });
    }
    range.unwrap_or((0, 1))
}

/// Panel height in reference units: whichever of the base height, the scaled
/// reference range, or the scaled member count is largest, then capped.
pub fn panel_height(min_ref: i64, max_ref: i64, count: usize, config: &LayoutConfig) -> f32 {
    let range_based = (max_ref - min_ref) as f32 * config.range_factor;
    let count_based = count as f32 * config.per_member_height;
    let height = config.base_height.max(range_based).max(count_based);
    match config.height_cap {
        Some(cap) => height.min(cap),
        None => height,
    }
}

/// Grid shape for `n` distinct types. A fixed lookup, not a packing
/// algorithm; existing diagrams depend on these exact shapes.
pub fn grid_shape(n: usize) -> GridShape {
    let (rows, cols) = match n {
        1 => (1, 1),
        2 => (1, 2),
        3 => (1, 3),
        4 => (2, 2),
        5 | 6 => (2, 3),
        _ => (1, n),
    };
    GridShape { rows, cols }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn member(reference: Option<i64>) -> Descriptor {
        let mut record = json!({"Type": "A"});
        if let Some(r) = reference {
            record["Reference"] = json!(r);
        }
        Descriptor::from_record(serde_json::from_value(record).unwrap())
    }

    #[test]
    fn range_spans_member_references() {
        let members = vec![member(Some(4)), member(Some(-2)), member(Some(9))];
        assert_eq!(reference_range(&members), (-2, 9));
    }

    #[test]
    fn empty_or_referenceless_group_defaults_to_zero_one() {
        assert_eq!(reference_range(&[]), (0, 1));
        assert_eq!(reference_range(&[member(None), member(None)]), (0, 1));
    }

    #[test]
    fn height_never_drops_below_base() {
        let config = LayoutConfig::default();
        assert_eq!(panel_height(0, 1, 1, &config), config.base_height);
    }

    #[test]
    fn height_is_monotonic_in_range_and_count() {
        let config = LayoutConfig {
            height_cap: None,
            ..LayoutConfig::default()
        };
        let narrow = panel_height(0, 4, 3, &config);
        let wide = panel_height(0, 6, 3, &config);
        assert!(wide >= narrow);
        let few = panel_height(0, 1, 10, &config);
        let many = panel_height(0, 1, 20, &config);
        assert!(many >= few);
        // Range of 6 at factor 1.5 beats the base height of 6.
        assert_eq!(wide, 9.0);
        assert_eq!(many, 12.0);
    }

    #[test]
    fn cap_bounds_outlier_panels() {
        let capped = LayoutConfig::default();
        assert_eq!(panel_height(0, 100, 1, &capped), 10.0);
        let uncapped = LayoutConfig {
            height_cap: None,
            ..LayoutConfig::default()
        };
        assert_eq!(panel_height(0, 100, 1, &uncapped), 150.0);
    }

    #[test]
    fn grid_shape_lookup_matches_table() {
        assert_eq!(grid_shape(1), GridShape { rows: 1, cols: 1 });
        assert_eq!(grid_shape(2), GridShape { rows: 1, cols: 2 });
        assert_eq!(grid_shape(3), GridShape { rows: 1, cols: 3 });
        assert_eq!(grid_shape(4), GridShape { rows: 2, cols: 2 });
        assert_eq!(grid_shape(5), GridShape { rows: 2, cols: 3 });
        assert_eq!(grid_shape(6), GridShape { rows: 2, cols: 3 });
        assert_eq!(grid_shape(7), GridShape { rows: 1, cols: 7 });
        assert_eq!(grid_shape(12), GridShape { rows: 1, cols: 12 });
    }
}
