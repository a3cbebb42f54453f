use super::geometry::PanelSpace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    pub rows: usize,
    pub cols: usize,
}

/// One colored field box within a descriptor row, in panel-local units.
#[derive(Debug, Clone)]
pub struct FieldBox {
    pub x: f32,
    pub width: f32,
    pub label: String,
    pub color_index: usize,
}

/// One drawn descriptor row. `y` is the reference value; rows of a panel may
/// collide when two descriptors share a reference (last drawn wins).
#[derive(Debug, Clone)]
pub struct RowLayout {
    pub reference: i64,
    pub y: f32,
    pub fields: Vec<FieldBox>,
    pub address_label: String,
    pub ref_label: String,
}

/// A type's panel: grid cell, figure frame, reference span, and row content.
#[derive(Debug, Clone)]
pub struct PanelLayout {
    pub type_name: String,
    pub cell: (usize, usize),
    pub space: PanelSpace,
    pub min_ref: i64,
    pub max_ref: i64,
    /// Panel height in reference units, after the optional cap.
    pub height: f32,
    pub rows: Vec<RowLayout>,
    /// Unoccupied integer addresses in `[min_ref, max_ref]`, ascending.
    pub empty_slots: Vec<i64>,
}

impl PanelLayout {
    pub fn contains_address(&self, address: i64) -> bool {
        self.min_ref <= address && address <= self.max_ref
    }
}

/// A routed cross-reference arrow. Endpoints are in shared figure
/// coordinates; `rad` is the arc curvature (0 for straight connectors,
/// positive convex, negative concave).
#[derive(Debug, Clone)]
pub struct ArrowLayout {
    pub from_type: String,
    pub to_type: String,
    pub source_reference: i64,
    pub address: i64,
    pub source: (f32, f32),
    pub target: (f32, f32),
    pub rad: f32,
}

/// The computed figure: panels in lexicographic type order plus the overlay
/// arrows. `width`/`height` are in figure units; the renderer applies the
/// pixel scale.
#[derive(Debug, Clone)]
pub struct Layout {
    pub grid: GridShape,
    pub panels: Vec<PanelLayout>,
    pub arrows: Vec<ArrowLayout>,
    pub width: f32,
    pub height: f32,
}

impl Layout {
    pub fn panel(&self, type_name: &str) -> Option<&PanelLayout> {
        self.panels
            .iter()
            .find(|panel| panel.type_name == type_name)
    }
}
