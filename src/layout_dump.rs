use crate::layout::{Layout, geometry::Rect};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub rows: usize,
    pub cols: usize,
    pub width: f32,
    pub height: f32,
    pub panels: Vec<PanelDump>,
    pub arrows: Vec<ArrowDump>,
}

#[derive(Debug, Serialize)]
pub struct PanelDump {
    pub type_name: String,
    pub cell: [usize; 2],
    pub frame: Rect,
    pub min_ref: i64,
    pub max_ref: i64,
    pub height: f32,
    pub occupied: Vec<i64>,
    pub empty_slots: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct ArrowDump {
    pub from: String,
    pub to: String,
    pub reference: i64,
    pub address: i64,
    pub source: [f32; 2],
    pub target: [f32; 2],
    pub rad: f32,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let panels = layout
            .panels
            .iter()
            .map(|panel| PanelDump {
                type_name: panel.type_name.clone(),
                cell: [panel.cell.0, panel.cell.1],
                frame: panel.space.frame,
                min_ref: panel.min_ref,
                max_ref: panel.max_ref,
                height: panel.height,
                occupied: panel.rows.iter().map(|row| row.reference).collect(),
                empty_slots: panel.empty_slots.clone(),
            })
            .collect();

        let arrows = layout
            .arrows
            .iter()
            .map(|arrow| ArrowDump {
                from: arrow.from_type.clone(),
                to: arrow.to_type.clone(),
                reference: arrow.source_reference,
                address: arrow.address,
                source: [arrow.source.0, arrow.source.1],
                target: [arrow.target.0, arrow.target.1],
                rad: arrow.rad,
            })
            .collect();

        LayoutDump {
            rows: layout.grid.rows,
            cols: layout.grid.cols,
            width: layout.width,
            height: layout.height,
            panels,
            arrows,
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &LayoutDump::from_layout(layout))?;
    Ok(())
}

/// One diagnostic line per drawn arrow with its global endpoints. Stable
/// formatting on purpose; golden-file tests compare this text.
pub fn arrow_report(layout: &Layout) -> String {
    let mut report = String::new();
    for arrow in &layout.arrows {
        report.push_str(&format!(
            "Arrow from ({:.2}, {:.2}) to ({:.2}, {:.2})\n",
            arrow.source.0, arrow.source.1, arrow.target.0, arrow.target.1
        ));
    }
    report
}
