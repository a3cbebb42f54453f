use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub title_font_size: f32,
    pub background: String,
    pub text_color: String,
    /// Fill colors for the descriptor field boxes, cycled in drawing order.
    pub field_palette: Vec<String>,
    pub field_border: String,
    pub address_fill: String,
    pub empty_slot_fill: String,
    pub empty_slot_border: String,
    pub ref_label_color: String,
    pub arrow_color: String,
}

impl Theme {
    /// The palette of the original capability dumps: tab20 field colors,
    /// lightgrey address bands, rosybrown empty slots.
    pub fn classic() -> Self {
        Self {
            font_family: "DejaVu Sans, Verdana, Arial, sans-serif".to_string(),
            font_size: 10.0,
            title_font_size: 14.0,
            background: "#FFFFFF".to_string(),
            text_color: "#000000".to_string(),
            field_palette: TAB20_COLORS.iter().map(|c| c.to_string()).collect(),
            field_border: "#000000".to_string(),
            address_fill: "#D3D3D3".to_string(),
            empty_slot_fill: "#BC8F8F".to_string(),
            empty_slot_border: "#000000".to_string(),
            ref_label_color: "#000000".to_string(),
            arrow_color: "#000000".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 10.0,
            title_font_size: 13.0,
            background: "#FFFFFF".to_string(),
            text_color: "#1C2430".to_string(),
            field_palette: TAB20_COLORS.iter().map(|c| c.to_string()).collect(),
            field_border: "#7A8AA6".to_string(),
            address_fill: "#EEF2F8".to_string(),
            empty_slot_fill: "#D9B8B4".to_string(),
            empty_slot_border: "#7A8AA6".to_string(),
            ref_label_color: "#1C2430".to_string(),
            arrow_color: "#333333".to_string(),
        }
    }

    pub fn field_color(&self, index: usize) -> &str {
        &self.field_palette[index % self.field_palette.len()]
    }
}

const TAB20_COLORS: [&str; 20] = [
    "#1F77B4", "#AEC7E8", "#FF7F0E", "#FFBB78", "#2CA02C", "#98DF8A", "#D62728", "#FF9896",
    "#9467BD", "#C5B0D5", "#8C564B", "#C49C94", "#E377C2", "#F7B6D2", "#7F7F7F", "#C7C7C7",
    "#BCBD22", "#DBDB8D", "#17BECF", "#9EDAE5",
];
