use crate::config::FigureMargins;
use serde::Serialize;

use super::types::GridShape;

/// An axis-aligned rectangle in normalized figure coordinates (y grows
/// upward; the renderer flips to screen space).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }
}

/// A panel's independent coordinate space: its frame on the figure plus the
/// local data extents mapped onto that frame.
///
/// The mapping is a plain affine placement and deliberately does not clamp:
/// loop-arrow anchors sit one unit outside the panel's x extent and must
/// extrapolate past the frame edge.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelSpace {
    pub frame: Rect,
    pub x_extent: (f32, f32),
    pub y_extent: (f32, f32),
}

impl PanelSpace {
    /// Maps a point in panel-local data coordinates into shared figure
    /// coordinates.
    pub fn to_figure(&self, point: (f32, f32)) -> (f32, f32) {
        let (x0, x1) = self.x_extent;
        let (y0, y1) = self.y_extent;
        let tx = (point.0 - x0) / (x1 - x0);
        let ty = (point.1 - y0) / (y1 - y0);
        (
            self.frame.x + tx * self.frame.width,
            self.frame.y + ty * self.frame.height,
        )
    }
}

/// Figure frame for one grid cell. Row 0 is the top row; figure coordinates
/// grow upward, so the first row gets the highest band.
pub fn cell_frame(cell: (usize, usize), grid: GridShape, margins: &FigureMargins) -> Rect {
    let (row, col) = cell;
    let cols = grid.cols.max(1) as f32;
    let rows = grid.rows.max(1) as f32;
    let cell_width = (1.0 - margins.left - margins.right - (cols - 1.0) * margins.wspace) / cols;
    let cell_height = (1.0 - margins.top - margins.bottom - (rows - 1.0) * margins.hspace) / rows;
    let x = margins.left + col as f32 * (cell_width + margins.wspace);
    let rows_below = (grid.rows.max(1) - 1).saturating_sub(row);
    let y = margins.bottom + rows_below as f32 * (cell_height + margins.hspace);
    Rect {
        x,
        y,
        width: cell_width,
        height: cell_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space() -> PanelSpace {
        PanelSpace {
            frame: Rect {
                x: 0.1,
                y: 0.2,
                width: 0.4,
                height: 0.6,
            },
            x_extent: (-1.0, 65.0),
            y_extent: (0.0, 10.0),
        }
    }

    #[test]
    fn maps_extent_corners_to_frame_corners() {
        let space = space();
        assert_eq!(space.to_figure((-1.0, 0.0)), (0.1, 0.2));
        let (fx, fy) = space.to_figure((65.0, 10.0));
        assert!((fx - 0.5).abs() < 1e-6);
        assert!((fy - 0.8).abs() < 1e-6);
    }

    #[test]
    fn mapping_is_linear_in_between() {
        let space = space();
        let (fx, fy) = space.to_figure((32.0, 5.0));
        assert!((fx - (0.1 + 0.5 * 0.4)).abs() < 1e-6);
        assert!((fy - (0.2 + 0.5 * 0.6)).abs() < 1e-6);
    }

    #[test]
    fn extrapolates_outside_the_extent() {
        // Loop anchors at x = -2 / 66 land outside the frame, not on its edge.
        let space = space();
        let (left, _) = space.to_figure((-2.0, 0.0));
        assert!(left < space.frame.x);
        let (right, _) = space.to_figure((66.0, 0.0));
        assert!(right > space.frame.x + space.frame.width);
    }

    #[test]
    fn grid_cells_tile_without_overlap() {
        let margins = FigureMargins::default();
        let grid = GridShape { rows: 2, cols: 2 };
        let top_left = cell_frame((0, 0), grid, &margins);
        let top_right = cell_frame((0, 1), grid, &margins);
        let bottom_left = cell_frame((1, 0), grid, &margins);
        // Same band, disjoint columns.
        assert_eq!(top_left.y, top_right.y);
        assert!(top_right.x >= top_left.x + top_left.width);
        // Row 0 sits above row 1 in figure coordinates.
        assert!(top_left.y > bottom_left.y);
        assert_eq!(top_left.x, bottom_left.x);
    }

    #[test]
    fn single_cell_fills_the_margin_box() {
        let margins = FigureMargins::default();
        let frame = cell_frame((0, 0), GridShape { rows: 1, cols: 1 }, &margins);
        assert!((frame.x - margins.left).abs() < 1e-6);
        assert!((frame.y - margins.bottom).abs() < 1e-6);
        assert!((frame.top() - (1.0 - margins.top)).abs() < 1e-6);
    }
}
