use super::types::PanelLayout;

/// Finds the panel whose reference range contains `address`.
///
/// Panels are scanned in their stored (lexicographic) order with first-match
/// semantics: when two ranges overlap, the lexicographically earlier type
/// wins. That tie-break is deliberate and relied on by downstream diagrams.
/// `None` means the owning descriptor gets no arrow; it is not an error.
pub fn resolve_address<'a>(address: i64, panels: &'a [PanelLayout]) -> Option<&'a PanelLayout> {
    panels.iter().find(|panel| panel.contains_address(address))
}
