use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Minimum panel height in reference units.
    pub base_height: f32,
    /// Height contributed per unit of reference range.
    pub range_factor: f32,
    /// Height contributed per group member.
    pub per_member_height: f32,
    /// Upper bound on a single panel's height, so one outlier group cannot
    /// dominate the whole figure. `None` disables the cap.
    pub height_cap: Option<f32>,
    /// Widths of the six colored field boxes, in panel-local units. The first
    /// box starts at x = -1; the address band spans from 0 to the template
    /// total minus 1.
    pub field_widths: Vec<f32>,
    /// Width of one panel in figure units.
    pub panel_width: f32,
    pub row_band_height: f32,
    pub row_field_lift: f32,
    pub empty_slot_height: f32,
    /// Arc curvature magnitude for intra-panel loop arrows.
    pub loop_rad: f32,
    pub jitter_min: f32,
    pub jitter_max: f32,
    pub margins: FigureMargins,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            base_height: 6.0,
            range_factor: 1.5,
            per_member_height: 0.6,
            height_cap: Some(10.0),
            field_widths: vec![1.0, 16.0, 1.0, 1.0, 15.0, 31.0],
            panel_width: 7.0,
            row_band_height: 0.4,
            row_field_lift: 0.44,
            empty_slot_height: 0.8,
            loop_rad: 0.3,
            jitter_min: 0.1,
            jitter_max: 0.6,
            margins: FigureMargins::default(),
        }
    }
}

impl LayoutConfig {
    /// Panel-local x extent: one unit of gutter left of the first field box,
    /// one unit right of the `Ref:` column.
    pub fn x_extent(&self) -> (f32, f32) {
        let total: f32 = self.field_widths.iter().sum();
        (-1.0, total)
    }

    /// Width of the address band, from x = 0 to the right edge of the last
    /// field box.
    pub fn band_width(&self) -> f32 {
        self.field_widths.iter().sum::<f32>() - 1.0
    }
}

/// Outer margins and inter-panel gaps, as fractions of the figure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FigureMargins {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub wspace: f32,
    pub hspace: f32,
}

impl Default for FigureMargins {
    fn default() -> Self {
        Self {
            left: 0.05,
            right: 0.02,
            top: 0.06,
            bottom: 0.03,
            wspace: 0.04,
            hspace: 0.06,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Pixels per figure unit; one panel is `panel_width` units wide.
    pub scale: f32,
    pub arrow_line_width: f32,
    pub arrow_head_size: f32,
    pub box_line_width: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scale: 100.0,
            arrow_line_width: 3.0,
            arrow_head_size: 12.0,
            box_line_width: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::classic(),
            layout: LayoutConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutFile>,
    render: Option<RenderFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    title_font_size: Option<f32>,
    background: Option<String>,
    text_color: Option<String>,
    field_palette: Option<Vec<String>>,
    address_fill: Option<String>,
    empty_slot_fill: Option<String>,
    arrow_color: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutFile {
    base_height: Option<f32>,
    range_factor: Option<f32>,
    per_member_height: Option<f32>,
    /// `null` removes the cap; omission keeps the default.
    #[serde(default, with = "double_option")]
    height_cap: Option<Option<f32>>,
    field_widths: Option<Vec<f32>>,
    panel_width: Option<f32>,
    loop_rad: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderFile {
    scale: Option<f32>,
    arrow_line_width: Option<f32>,
    box_line_width: Option<f32>,
}

mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Option<f32>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<f32>::deserialize(deserializer).map(Some)
    }
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = match serde_json::from_str(&contents) {
        Ok(parsed) => parsed,
        Err(json_err) => json5::from_str(&contents)
            .map_err(|_| anyhow::anyhow!("invalid config file: {json_err}"))?,
    };

    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "modern" {
            config.theme = Theme::modern();
        } else if theme_name == "classic" || theme_name == "default" {
            config.theme = Theme::classic();
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.title_font_size {
            config.theme.title_font_size = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.field_palette {
            if !v.is_empty() {
                config.theme.field_palette = v;
            }
        }
        if let Some(v) = vars.address_fill {
            config.theme.address_fill = v;
        }
        if let Some(v) = vars.empty_slot_fill {
            config.theme.empty_slot_fill = v;
        }
        if let Some(v) = vars.arrow_color {
            config.theme.arrow_color = v;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.base_height {
            config.layout.base_height = v;
        }
        if let Some(v) = layout.range_factor {
            config.layout.range_factor = v;
        }
        if let Some(v) = layout.per_member_height {
            config.layout.per_member_height = v;
        }
        if let Some(v) = layout.height_cap {
            config.layout.height_cap = v;
        }
        if let Some(v) = layout.field_widths {
            if !v.is_empty() {
                config.layout.field_widths = v;
            }
        }
        if let Some(v) = layout.panel_width {
            config.layout.panel_width = v;
        }
        if let Some(v) = layout.loop_rad {
            config.layout.loop_rad = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.scale {
            config.render.scale = v;
        }
        if let Some(v) = render.arrow_line_width {
            config.render.arrow_line_width = v;
        }
        if let Some(v) = render.box_line_width {
            config.render.box_line_width = v;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_x_extent_matches_field_template() {
        let layout = LayoutConfig::default();
        // Widths sum to 65: boxes run from -1 to 64, extent ends one past.
        assert_eq!(layout.x_extent(), (-1.0, 65.0));
        assert_eq!(layout.band_width(), 64.0);
    }

    #[test]
    fn config_overrides_apply() {
        let parsed: ConfigFile = serde_json::from_str(
            r#"{
                "theme": "modern",
                "themeVariables": {"fontSize": 12.0},
                "layout": {"baseHeight": 4.0, "heightCap": null}
            }"#,
        )
        .unwrap();
        assert_eq!(parsed.theme.as_deref(), Some("modern"));
        let vars = parsed.theme_variables.unwrap();
        assert_eq!(vars.font_size, Some(12.0));
        let layout = parsed.layout.unwrap();
        assert_eq!(layout.base_height, Some(4.0));
        // Explicit null disables the cap.
        assert_eq!(layout.height_cap, Some(None));
    }
}
