//! XML helpers shared by the side-table parsers (quick-xml) and the body
//! tokenizer (roxmltree).

use quick_xml::events::BytesStart;

/// WordprocessingML main namespace
pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Office document relationships namespace (`r:id`, `r:embed`)
pub const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// DrawingML main namespace (`a:blip`)
pub const A_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";

/// Word drawing namespace (`wp:extent`, `wp:docPr`)
pub const WP_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";

/// Markup compatibility namespace (`mc:AlternateContent`)
pub const MC_NS: &str = "http://schemas.openxmlformats.org/markup-compatibility/2006";

// ========================================================================
// quick-xml attribute helpers
// ========================================================================

/// Extract an attribute value by local name (prefix ignored)
#[inline]
pub fn get_attr(e: &BytesStart<'_>, local: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == local)
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

/// Extract an attribute value by local name and parse it as i32
#[inline]
pub fn get_attr_i32(e: &BytesStart<'_>, local: &[u8]) -> Option<i32> {
    get_attr(e, local).and_then(|s| s.trim().parse().ok())
}

/// OOXML toggle property: present without `w:val`, or with a truthy value
#[inline]
pub fn toggle_on(e: &BytesStart<'_>) -> bool {
    get_attr(e, b"val").map_or(true, |v| is_truthy(&v))
}

// ========================================================================
// roxmltree helpers (WordprocessingML namespace)
// ========================================================================

/// Whether `node` is the WordprocessingML element `local`
#[inline]
pub fn is_w(node: roxmltree::Node<'_, '_>, local: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == local
        && node.tag_name().namespace() == Some(W_NS)
}

/// First WordprocessingML child element named `local`
#[inline]
pub fn w_child<'a, 'input>(
    node: roxmltree::Node<'a, 'input>,
    local: &str,
) -> Option<roxmltree::Node<'a, 'input>> {
    node.children().find(|c| is_w(*c, local))
}

/// `w:val` of the WordprocessingML child element named `local`
#[inline]
pub fn w_child_val<'a>(node: roxmltree::Node<'a, '_>, local: &str) -> Option<&'a str> {
    w_child(node, local).and_then(|c| c.attribute((W_NS, "val")))
}

/// Toggle property on a roxmltree element (`<w:b/>`, `<w:b w:val="0"/>`)
#[inline]
pub fn w_toggle(node: roxmltree::Node<'_, '_>) -> bool {
    node.attribute((W_NS, "val")).map_or(true, is_truthy)
}

/// OOXML boolean attribute value
#[inline]
pub fn is_truthy(value: &str) -> bool {
    !matches!(value, "0" | "false" | "off" | "none")
}

/// Convert a half-point size (`w:sz`) into a point string (`"24"` → `"12"`)
#[inline]
pub fn half_points_to_pt(value: &str) -> Option<String> {
    let half_points: u32 = value.trim().parse().ok()?;
    if half_points % 2 == 0 {
        Some((half_points / 2).to_string())
    } else {
        Some(format!("{}.5", half_points / 2))
    }
}

/// Nearest proper ancestor that is the WordprocessingML element `local`
#[inline]
pub fn nearest_w_ancestor<'a, 'input>(
    node: roxmltree::Node<'a, 'input>,
    local: &str,
) -> Option<roxmltree::Node<'a, 'input>> {
    node.ancestors().skip(1).find(|a| is_w(*a, local))
}

// ========================================================================
// Markup compatibility
// ========================================================================

fn is_mc(node: roxmltree::Node<'_, '_>, local: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == local
        && node.tag_name().namespace() == Some(MC_NS)
}

/// Whether `node` is an `mc:AlternateContent` element
#[inline]
pub fn is_alternate_content(node: roxmltree::Node<'_, '_>) -> bool {
    is_mc(node, "AlternateContent")
}

/// The branch of an `mc:AlternateContent` that is read: the first
/// `mc:Choice`, or `mc:Fallback` when there is no choice
pub fn selected_branch<'a, 'input>(
    alternate: roxmltree::Node<'a, 'input>,
) -> Option<roxmltree::Node<'a, 'input>> {
    alternate
        .children()
        .find(|c| is_mc(*c, "Choice"))
        .or_else(|| alternate.children().find(|c| is_mc(*c, "Fallback")))
}

/// Whether `node` lies in an `mc:Choice`/`mc:Fallback` branch that is not read
pub fn in_unselected_branch(node: roxmltree::Node<'_, '_>) -> bool {
    node.ancestors()
        .filter(|a| is_mc(*a, "Choice") || is_mc(*a, "Fallback"))
        .any(|branch| branch.parent().and_then(selected_branch) != Some(branch))
}
