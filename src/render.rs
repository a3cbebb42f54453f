use crate::config::{Config, RenderConfig};
use crate::layout::{ArrowLayout, Layout, PanelLayout};
use crate::text_metrics::fit_text_size;
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

/// Converts figure coordinates (normalized, y-up) to SVG pixels (y-down).
struct Screen {
    width: f32,
    height: f32,
}

impl Screen {
    fn new(layout: &Layout, render: &RenderConfig) -> Self {
        Self {
            width: (layout.width * render.scale).max(200.0),
            height: (layout.height * render.scale).max(200.0),
        }
    }

    fn point(&self, figure: (f32, f32)) -> (f32, f32) {
        (figure.0 * self.width, (1.0 - figure.1) * self.height)
    }
}

pub fn render_svg(layout: &Layout, config: &Config) -> String {
    let theme = &config.theme;
    let screen = Screen::new(layout, &config.render);
    let mut svg = String::new();

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{:.0}\" height=\"{:.0}\" viewBox=\"0 0 {:.0} {:.0}\">",
        screen.width, screen.height, screen.width, screen.height
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    svg.push_str("<defs>");
    svg.push_str(&format!(
        "<marker id=\"arrow\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"{:.0}\" markerHeight=\"{:.0}\" orient=\"auto-start-reverse\" markerUnits=\"userSpaceOnUse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{}\"/></marker>",
        config.render.arrow_head_size, config.render.arrow_head_size, theme.arrow_color
    ));
    svg.push_str("</defs>");

    for panel in &layout.panels {
        render_panel(&mut svg, panel, &screen, config);
    }

    // Overlay layer: arrows are drawn last, in shared figure coordinates,
    // so they cross panel boundaries freely.
    svg.push_str("<g class=\"arrows\">");
    for arrow in &layout.arrows {
        svg.push_str(&arrow_path(arrow, &screen, config));
    }
    svg.push_str("</g>");

    svg.push_str("</svg>");
    svg
}

fn render_panel(svg: &mut String, panel: &PanelLayout, screen: &Screen, config: &Config) {
    let theme = &config.theme;
    let layout_cfg = &config.layout;
    let band_width = layout_cfg.band_width();

    // Title above the frame.
    let (title_x, title_y) = screen.point((panel.space.frame.center_x(), panel.space.frame.top()));
    svg.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{:.1}\" font-weight=\"bold\" fill=\"{}\">{} Capabilities</text>",
        title_x,
        title_y - 6.0,
        theme.font_family,
        theme.title_font_size * font_scale(&config.render),
        theme.text_color,
        escape_xml(&panel.type_name)
    ));

    // Empty memory blocks first, so colliding rows draw over them.
    for &address in &panel.empty_slots {
        let rect = local_rect(
            panel,
            screen,
            (0.0, address as f32),
            (band_width, layout_cfg.empty_slot_height),
        );
        svg.push_str(&rect_svg(
            rect,
            &theme.empty_slot_fill,
            &theme.empty_slot_border,
            config.render.box_line_width,
        ));
    }

    for row in &panel.rows {
        render_row(svg, panel, row, screen, config);
    }
}

fn render_row(
    svg: &mut String,
    panel: &PanelLayout,
    row: &crate::layout::RowLayout,
    screen: &Screen,
    config: &Config,
) {
    let theme = &config.theme;
    let layout_cfg = &config.layout;
    let font_px = theme.font_size * font_scale(&config.render);

    // Address band under the field boxes.
    let band = local_rect(
        panel,
        screen,
        (0.0, row.y),
        (layout_cfg.band_width(), layout_cfg.row_band_height),
    );
    svg.push_str(&rect_svg(
        band,
        &theme.address_fill,
        &theme.field_border,
        config.render.box_line_width,
    ));
    if !row.address_label.is_empty() {
        let center = panel
            .space
            .to_figure((layout_cfg.band_width() / 2.0, row.y + 0.2));
        svg.push_str(&centered_text(
            screen.point(center),
            &row.address_label,
            band.2 - 4.0,
            font_px,
            theme,
        ));
    }

    for field in &row.fields {
        let rect = local_rect(
            panel,
            screen,
            (field.x, row.y + layout_cfg.row_field_lift),
            (field.width, layout_cfg.row_band_height),
        );
        svg.push_str(&rect_svg(
            rect,
            theme.field_color(field.color_index),
            &theme.field_border,
            config.render.box_line_width,
        ));
        if !field.label.is_empty() {
            let center = panel
                .space
                .to_figure((field.x + field.width / 2.0, row.y + 0.6));
            svg.push_str(&centered_text(
                screen.point(center),
                &field.label,
                rect.2 - 4.0,
                font_px,
                theme,
            ));
        }
    }

    // Bold reference annotation right of the row.
    let anchor = panel
        .space
        .to_figure((layout_cfg.band_width() + 1.0, row.y + 0.05));
    let (x, y) = screen.point(anchor);
    svg.push_str(&format!(
        "<text x=\"{x:.2}\" y=\"{y:.2}\" font-family=\"{}\" font-size=\"{:.1}\" font-weight=\"bold\" fill=\"{}\">{}</text>",
        theme.font_family,
        font_px,
        theme.ref_label_color,
        escape_xml(&row.ref_label)
    ));
}

/// Maps a panel-local rectangle (origin at its lower-left corner) to screen
/// pixels, returning `(x, y, width, height)` with y at the top edge.
fn local_rect(
    panel: &PanelLayout,
    screen: &Screen,
    origin: (f32, f32),
    size: (f32, f32),
) -> (f32, f32, f32, f32) {
    let (x0, y0) = screen.point(panel.space.to_figure(origin));
    let (x1, y1) = screen
        .point(panel.space.to_figure((origin.0 + size.0, origin.1 + size.1)));
    (x0, y1, x1 - x0, y0 - y1)
}

fn rect_svg(rect: (f32, f32, f32, f32), fill: &str, stroke: &str, stroke_width: f32) -> String {
    format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{:.1}\"/>",
        rect.0, rect.1, rect.2, rect.3, fill, stroke, stroke_width
    )
}

fn centered_text(
    point: (f32, f32),
    text: &str,
    max_width: f32,
    base_font_px: f32,
    theme: &Theme,
) -> String {
    let size = fit_text_size(text, max_width.max(4.0), base_font_px, &theme.font_family);
    format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"middle\" font-family=\"{}\" font-size=\"{:.1}\" fill=\"{}\">{}</text>",
        point.0,
        point.1,
        theme.font_family,
        size,
        theme.text_color,
        escape_xml(text)
    )
}

/// One connector as a quadratic Bezier. The control point sits at the
/// midpoint displaced perpendicular to the chord by `rad`, which reproduces
/// an `arc3`-style arc; `rad` of zero degenerates to a straight segment.
fn arrow_path(arrow: &ArrowLayout, screen: &Screen, config: &Config) -> String {
    let control = (
        (arrow.source.0 + arrow.target.0) / 2.0 + arrow.rad * (arrow.target.1 - arrow.source.1),
        (arrow.source.1 + arrow.target.1) / 2.0 - arrow.rad * (arrow.target.0 - arrow.source.0),
    );
    let (sx, sy) = screen.point(arrow.source);
    let (cx, cy) = screen.point(control);
    let (tx, ty) = screen.point(arrow.target);
    format!(
        "<path d=\"M {sx:.2} {sy:.2} Q {cx:.2} {cy:.2} {tx:.2} {ty:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{:.1}\" marker-end=\"url(#arrow)\"/>",
        config.theme.arrow_color, config.render.arrow_line_width
    )
}

fn font_scale(render: &RenderConfig) -> f32 {
    render.scale / 100.0 * 1.4
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{svg}");
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path) -> Result<()> {
    let opt = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("failed to allocate pixmap"))?;
    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
