//! Page capture data model: nodes, attributes, geometry, viewport.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Index of a node inside a [`Page`](super::Page) arena.
///
/// Ids are dense array indices, valid only for the capture that issued them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Arena index for this id.
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Viewport information for coordinate calculations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Viewport width in pixels.
    pub width: u32,
    /// Viewport height in pixels.
    pub height: u32,
    /// Device pixel ratio.
    #[serde(default = "default_dpr")]
    pub device_pixel_ratio: f64,
    /// Scroll X offset.
    #[serde(default)]
    pub scroll_x: f64,
    /// Scroll Y offset.
    #[serde(default)]
    pub scroll_y: f64,
}

fn default_dpr() -> f64 {
    1.0
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            device_pixel_ratio: 1.0,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }
}

impl Viewport {
    /// Viewport area in square pixels. Zero while the page is still sizing.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Bounding box for an element, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check if a point is inside this bounding box.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    /// Get the center point of this bounding box.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Box area. Zero-size boxes are common for collapsed wrappers.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Check if this box intersects with another.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    /// Check if this box intersects the viewport rectangle.
    pub fn in_viewport(&self, viewport: &Viewport) -> bool {
        let vp_box = BoundingBox {
            x: 0.0,
            y: 0.0,
            width: viewport.width as f64,
            height: viewport.height as f64,
        };
        self.intersects(&vp_box)
    }
}

/// Node attributes lifted out of the capture.
///
/// Frequently consulted attributes get typed fields; everything else lands
/// in `extra` under its original attribute name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeAttributes {
    /// Element ID attribute.
    pub id: Option<String>,
    /// Element class names, space separated.
    pub class: Option<String>,
    /// Href for links.
    pub href: Option<String>,
    /// Src for images/iframes.
    pub src: Option<String>,
    /// Alt text.
    pub alt: Option<String>,
    /// Title attribute.
    pub title: Option<String>,
    /// Placeholder text.
    pub placeholder: Option<String>,
    /// Value for inputs.
    pub value: Option<String>,
    /// Type attribute.
    pub r#type: Option<String>,
    /// Name attribute.
    pub name: Option<String>,
    /// For attribute on labels.
    pub r#for: Option<String>,
    /// Role attribute (ARIA).
    pub role: Option<String>,
    /// Aria-label.
    pub aria_label: Option<String>,
    /// Aria-labelledby, space separated id references.
    pub aria_labelledby: Option<String>,
    /// Aria-hidden.
    pub aria_hidden: Option<String>,
    /// Aria-expanded.
    pub aria_expanded: Option<String>,
    /// Aria-selected.
    pub aria_selected: Option<String>,
    /// Aria-checked.
    pub aria_checked: Option<String>,
    /// Disabled state.
    #[serde(default)]
    pub disabled: bool,
    /// Required state.
    #[serde(default)]
    pub required: bool,
    /// Readonly state.
    #[serde(default)]
    pub readonly: bool,
    /// Checked state.
    #[serde(default)]
    pub checked: bool,
    /// Hidden attribute.
    #[serde(default)]
    pub hidden: bool,
    /// Tabindex, when present.
    pub tabindex: Option<i32>,
    /// Attributes without a dedicated field.
    #[serde(default)]
    pub extra: HashMap<String, String>,
}

impl NodeAttributes {
    /// Class name tokens.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.class.as_deref().unwrap_or("").split_whitespace()
    }

    /// Look up an attribute by its document name, typed fields first.
    pub fn get(&self, name: &str) -> Option<&str> {
        match name {
            "id" => self.id.as_deref(),
            "class" => self.class.as_deref(),
            "href" => self.href.as_deref(),
            "src" => self.src.as_deref(),
            "alt" => self.alt.as_deref(),
            "title" => self.title.as_deref(),
            "placeholder" => self.placeholder.as_deref(),
            "value" => self.value.as_deref(),
            "type" => self.r#type.as_deref(),
            "name" => self.name.as_deref(),
            "for" => self.r#for.as_deref(),
            "role" => self.role.as_deref(),
            "aria-label" => self.aria_label.as_deref(),
            "aria-labelledby" => self.aria_labelledby.as_deref(),
            "aria-hidden" => self.aria_hidden.as_deref(),
            "aria-expanded" => self.aria_expanded.as_deref(),
            "aria-selected" => self.aria_selected.as_deref(),
            "aria-checked" => self.aria_checked.as_deref(),
            _ => self.extra.get(name).map(String::as_str),
        }
    }

    /// Set an attribute by its document name, routing to typed fields.
    ///
    /// Boolean attributes follow the document convention: presence means
    /// true regardless of the value string.
    pub fn set(&mut self, name: &str, value: &str) {
        match name {
            "id" => self.id = Some(value.to_string()),
            "class" => self.class = Some(value.to_string()),
            "href" => self.href = Some(value.to_string()),
            "src" => self.src = Some(value.to_string()),
            "alt" => self.alt = Some(value.to_string()),
            "title" => self.title = Some(value.to_string()),
            "placeholder" => self.placeholder = Some(value.to_string()),
            "value" => self.value = Some(value.to_string()),
            "type" => self.r#type = Some(value.to_string()),
            "name" => self.name = Some(value.to_string()),
            "for" => self.r#for = Some(value.to_string()),
            "role" => self.role = Some(value.to_string()),
            "aria-label" => self.aria_label = Some(value.to_string()),
            "aria-labelledby" => self.aria_labelledby = Some(value.to_string()),
            "aria-hidden" => self.aria_hidden = Some(value.to_string()),
            "aria-expanded" => self.aria_expanded = Some(value.to_string()),
            "aria-selected" => self.aria_selected = Some(value.to_string()),
            "aria-checked" => self.aria_checked = Some(value.to_string()),
            "disabled" => self.disabled = true,
            "required" => self.required = true,
            "readonly" => self.readonly = true,
            "checked" => self.checked = true,
            "hidden" => self.hidden = true,
            "tabindex" => self.tabindex = value.trim().parse().ok(),
            _ => {
                self.extra.insert(name.to_string(), value.to_string());
            }
        }
    }
}

/// Computed style facts the host resolved for a node.
///
/// All fields are optional; captures taken before stylesheets load simply
/// leave them empty and no styling means no hiding.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComputedStyle {
    /// CSS display value.
    pub display: Option<String>,
    /// CSS visibility value.
    pub visibility: Option<String>,
    /// CSS opacity value, as the host reported it.
    pub opacity: Option<String>,
    /// CSS cursor value.
    pub cursor: Option<String>,
}

impl ComputedStyle {
    /// True when this style alone hides the element.
    ///
    /// Zero-size boxes do not count as hidden; overflowing content inside a
    /// collapsed wrapper can still paint.
    pub fn hides(&self) -> bool {
        if self.display.as_deref() == Some("none") {
            return true;
        }
        if matches!(self.visibility.as_deref(), Some("hidden") | Some("collapse")) {
            return true;
        }
        if let Some(opacity) = self.opacity.as_deref() {
            if let Ok(value) = opacity.trim().parse::<f64>() {
                if value <= 0.01 {
                    return true;
                }
            }
        }
        false
    }
}

/// Document ready state at capture time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReadyState {
    /// Document still parsing.
    Loading,
    /// Parsed but subresources still loading.
    Interactive,
    /// Fully loaded.
    #[default]
    Complete,
}

impl ReadyState {
    /// Lowercase token as it appears in snapshot summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Interactive => "interactive",
            Self::Complete => "complete",
        }
    }
}

/// Page-level facts captured alongside the tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageInfo {
    /// Page URL at capture time.
    #[serde(default)]
    pub url: String,
    /// Document title.
    #[serde(default)]
    pub title: String,
    /// Document ready state.
    #[serde(default)]
    pub ready_state: ReadyState,
    /// Viewport at capture time.
    #[serde(default)]
    pub viewport: Viewport,
}

/// One node of a page capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageNode {
    /// Tag name (lowercase).
    pub tag: String,
    /// Node attributes.
    #[serde(default)]
    pub attributes: NodeAttributes,
    /// Direct text content, not including children.
    pub text: Option<String>,
    /// Bounding box in viewport coordinates. `None` when the host supplied
    /// no geometry for this node.
    pub bounds: Option<BoundingBox>,
    /// Computed style facts.
    #[serde(default)]
    pub style: ComputedStyle,
    /// Whether the node is still connected to the document.
    #[serde(default = "default_true")]
    pub connected: bool,
    /// Child node ids, in document order.
    #[serde(default)]
    pub children: Vec<NodeId>,
    /// Parent node id, `None` for the root.
    pub parent: Option<NodeId>,
}

fn default_true() -> bool {
    true
}

impl PageNode {
    /// Fresh node with the given tag and nothing else set.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: NodeAttributes::default(),
            text: None,
            bounds: None,
            style: ComputedStyle::default(),
            connected: true,
            children: Vec::new(),
            parent: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_queries() {
        let bbox = BoundingBox::new(10.0, 20.0, 100.0, 50.0);
        assert!(bbox.contains(10.0, 20.0));
        assert!(bbox.contains(110.0, 70.0));
        assert!(!bbox.contains(111.0, 70.0));
        assert_eq!(bbox.center(), (60.0, 45.0));
        assert_eq!(bbox.area(), 5000.0);

        let viewport = Viewport::default();
        assert!(bbox.in_viewport(&viewport));
        let offscreen = BoundingBox::new(2000.0, 0.0, 10.0, 10.0);
        assert!(!offscreen.in_viewport(&viewport));
    }

    #[test]
    fn test_attribute_routing() {
        let mut attrs = NodeAttributes::default();
        attrs.set("id", "login");
        attrs.set("aria-label", "Log in");
        attrs.set("disabled", "");
        attrs.set("tabindex", "-1");
        attrs.set("data-test", "submit");

        assert_eq!(attrs.get("id"), Some("login"));
        assert_eq!(attrs.get("aria-label"), Some("Log in"));
        assert!(attrs.disabled);
        assert_eq!(attrs.tabindex, Some(-1));
        assert_eq!(attrs.get("data-test"), Some("submit"));
        assert_eq!(attrs.get("href"), None);
    }

    #[test]
    fn test_style_hiding() {
        let mut style = ComputedStyle::default();
        assert!(!style.hides());

        style.display = Some("none".into());
        assert!(style.hides());

        style.display = Some("block".into());
        style.visibility = Some("hidden".into());
        assert!(style.hides());

        style.visibility = Some("visible".into());
        style.opacity = Some("0".into());
        assert!(style.hides());

        style.opacity = Some("0.5".into());
        assert!(!style.hides());
    }

    #[test]
    fn test_viewport_serde_fills_missing_fields() {
        let viewport: Viewport = serde_json::from_str(r#"{"width":800,"height":600}"#)
            .expect("viewport should parse");
        assert_eq!(viewport.device_pixel_ratio, 1.0);
        assert_eq!(viewport.scroll_x, 0.0);
        assert_eq!(viewport.area(), 480_000);
    }
}
