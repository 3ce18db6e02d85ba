//! Node inspection: role classification, visibility, naming, interaction.
//!
//! Everything here is a pure function over captured node data. The
//! classification feeds every renderer, so the rules live in one place:
//! explicit ARIA roles win over tag-derived ones, visibility composes
//! style facts with `aria-hidden`, and accessible names follow a fixed
//! priority chain from `aria-label` down to the `value` attribute.

use super::node::{NodeAttributes, NodeId, PageNode};
use super::page::Page;
use super::text::{collapse_whitespace, truncate_chars};

// ===== Role classification =====

/// Semantic classification of a node.
///
/// A closed set: renderers match on it exhaustively, and `Heading` carries
/// its level instead of encoding it in a string. `Generic` only appears for
/// an explicit `role` attribute this table does not know; tags without
/// semantics map to no role at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    // Widgets
    Button,
    Link,
    Textbox,
    Searchbox,
    Checkbox,
    Radio,
    Combobox,
    Listbox,
    OptionItem,
    Slider,
    SpinButton,
    Switch,
    Tab,
    MenuItem,
    ProgressBar,
    // Document structure
    Heading { level: u8 },
    Article,
    List,
    ListItem,
    Table,
    Row,
    Cell,
    Img,
    Figure,
    Code,
    Separator,
    // Landmarks
    Main,
    Navigation,
    Banner,
    ContentInfo,
    Complementary,
    Region,
    Search,
    Form,
    Dialog,
    // Explicit role attribute with no mapping here
    Generic,
}

impl Role {
    /// Lowercase role token as it appears in rendered lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Link => "link",
            Self::Textbox => "textbox",
            Self::Searchbox => "searchbox",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Combobox => "combobox",
            Self::Listbox => "listbox",
            Self::OptionItem => "option",
            Self::Slider => "slider",
            Self::SpinButton => "spinbutton",
            Self::Switch => "switch",
            Self::Tab => "tab",
            Self::MenuItem => "menuitem",
            Self::ProgressBar => "progressbar",
            Self::Heading { .. } => "heading",
            Self::Article => "article",
            Self::List => "list",
            Self::ListItem => "listitem",
            Self::Table => "table",
            Self::Row => "row",
            Self::Cell => "cell",
            Self::Img => "img",
            Self::Figure => "figure",
            Self::Code => "code",
            Self::Separator => "separator",
            Self::Main => "main",
            Self::Navigation => "navigation",
            Self::Banner => "banner",
            Self::ContentInfo => "contentinfo",
            Self::Complementary => "complementary",
            Self::Region => "region",
            Self::Search => "search",
            Self::Form => "form",
            Self::Dialog => "dialog",
            Self::Generic => "generic",
        }
    }

    /// Heading level, for `Heading` only.
    pub fn heading_level(&self) -> Option<u8> {
        match self {
            Self::Heading { level } => Some(*level),
            _ => None,
        }
    }

    /// True for page-region landmarks, including forms and dialogs.
    pub fn is_landmark(&self) -> bool {
        matches!(
            self,
            Self::Main
                | Self::Navigation
                | Self::Banner
                | Self::ContentInfo
                | Self::Complementary
                | Self::Region
                | Self::Search
                | Self::Form
                | Self::Dialog
        )
    }

    /// True for roles an agent can act on directly.
    pub fn is_widget(&self) -> bool {
        matches!(
            self,
            Self::Button
                | Self::Link
                | Self::Textbox
                | Self::Searchbox
                | Self::Checkbox
                | Self::Radio
                | Self::Combobox
                | Self::Listbox
                | Self::OptionItem
                | Self::Slider
                | Self::SpinButton
                | Self::Switch
                | Self::Tab
                | Self::MenuItem
        )
    }

    /// True for form-field widgets, as opposed to buttons and links.
    pub fn is_input(&self) -> bool {
        matches!(
            self,
            Self::Textbox
                | Self::Searchbox
                | Self::Checkbox
                | Self::Radio
                | Self::Combobox
                | Self::Listbox
                | Self::Slider
                | Self::SpinButton
                | Self::Switch
        )
    }

    /// True for categories that stay addressable in outline mode.
    pub fn is_container(&self) -> bool {
        self.is_landmark() || matches!(self, Self::Article)
    }
}

/// Classify a node.
///
/// An explicit `role` attribute wins over the tag mapping;
/// `role="presentation"` and `role="none"` strip semantics entirely.
pub fn role(node: &PageNode) -> Option<Role> {
    if let Some(value) = node.attributes.role.as_deref() {
        let value = value.trim();
        if !value.is_empty() {
            return role_from_attr(value, &node.attributes);
        }
    }
    implicit_role(node)
}

fn role_from_attr(value: &str, attrs: &NodeAttributes) -> Option<Role> {
    let value = value.to_ascii_lowercase();
    Some(match value.as_str() {
        "presentation" | "none" => return None,
        "button" => Role::Button,
        "link" => Role::Link,
        "textbox" => Role::Textbox,
        "searchbox" => Role::Searchbox,
        "checkbox" => Role::Checkbox,
        "radio" => Role::Radio,
        "combobox" => Role::Combobox,
        "listbox" => Role::Listbox,
        "option" => Role::OptionItem,
        "slider" => Role::Slider,
        "spinbutton" => Role::SpinButton,
        "switch" => Role::Switch,
        "tab" => Role::Tab,
        "menuitem" | "menuitemcheckbox" | "menuitemradio" => Role::MenuItem,
        "progressbar" => Role::ProgressBar,
        "heading" => Role::Heading {
            level: aria_level(attrs),
        },
        "article" => Role::Article,
        "list" => Role::List,
        "listitem" => Role::ListItem,
        "table" | "grid" => Role::Table,
        "row" => Role::Row,
        "cell" | "gridcell" => Role::Cell,
        "img" | "image" => Role::Img,
        "figure" => Role::Figure,
        "code" => Role::Code,
        "separator" => Role::Separator,
        "main" => Role::Main,
        "navigation" => Role::Navigation,
        "banner" => Role::Banner,
        "contentinfo" => Role::ContentInfo,
        "complementary" => Role::Complementary,
        "region" => Role::Region,
        "search" => Role::Search,
        "form" => Role::Form,
        "dialog" | "alertdialog" => Role::Dialog,
        _ => Role::Generic,
    })
}

fn implicit_role(node: &PageNode) -> Option<Role> {
    let attrs = &node.attributes;
    Some(match node.tag.as_str() {
        "button" => Role::Button,
        // An anchor without href is not a link.
        "a" => {
            if attrs.href.is_some() {
                Role::Link
            } else {
                return None;
            }
        }
        "input" => return input_role(attrs),
        "textarea" => Role::Textbox,
        "select" => {
            if attrs.extra.contains_key("multiple") {
                Role::Listbox
            } else {
                Role::Combobox
            }
        }
        "option" => Role::OptionItem,
        "h1" => Role::Heading { level: 1 },
        "h2" => Role::Heading { level: 2 },
        "h3" => Role::Heading { level: 3 },
        "h4" => Role::Heading { level: 4 },
        "h5" => Role::Heading { level: 5 },
        "h6" => Role::Heading { level: 6 },
        "main" => Role::Main,
        "nav" => Role::Navigation,
        "header" => Role::Banner,
        "footer" => Role::ContentInfo,
        "aside" => Role::Complementary,
        // A section only becomes a landmark once it has a name.
        "section" => {
            if has_explicit_name(attrs) {
                Role::Region
            } else {
                return None;
            }
        }
        "form" => Role::Form,
        "dialog" => Role::Dialog,
        "article" => Role::Article,
        "ul" | "ol" | "menu" => Role::List,
        "li" => Role::ListItem,
        "table" => Role::Table,
        "tr" => Role::Row,
        "td" | "th" => Role::Cell,
        "img" => Role::Img,
        "figure" => Role::Figure,
        "pre" | "code" => Role::Code,
        "progress" => Role::ProgressBar,
        "hr" => Role::Separator,
        "summary" => Role::Button,
        _ => return None,
    })
}

fn input_role(attrs: &NodeAttributes) -> Option<Role> {
    let ty = attrs
        .r#type
        .as_deref()
        .unwrap_or("text")
        .to_ascii_lowercase();
    Some(match ty.as_str() {
        "hidden" => return None,
        "checkbox" => Role::Checkbox,
        "radio" => Role::Radio,
        "search" => Role::Searchbox,
        "range" => Role::Slider,
        "number" => Role::SpinButton,
        "button" | "submit" | "reset" | "image" | "file" => Role::Button,
        _ => Role::Textbox,
    })
}

fn aria_level(attrs: &NodeAttributes) -> u8 {
    attrs
        .extra
        .get("aria-level")
        .and_then(|v| v.trim().parse::<u8>().ok())
        .filter(|l| (1..=6).contains(l))
        .unwrap_or(2)
}

fn has_explicit_name(attrs: &NodeAttributes) -> bool {
    attrs
        .aria_label
        .as_deref()
        .is_some_and(|l| !l.trim().is_empty())
        || attrs
            .aria_labelledby
            .as_deref()
            .is_some_and(|l| !l.trim().is_empty())
        || attrs.title.as_deref().is_some_and(|t| !t.trim().is_empty())
}

// ===== Interactivity =====

/// True when an agent can act on this node.
///
/// Native interactive tags, widget roles and a non-negative tabindex all
/// qualify. Disabled controls still count; they render with a `disabled`
/// state so the agent knows not to bother.
pub fn is_interactive(node: &PageNode) -> bool {
    let attrs = &node.attributes;
    let native = match node.tag.as_str() {
        "button" | "select" | "textarea" | "option" | "label" | "summary" => true,
        "a" => attrs.href.is_some(),
        "input" => !attrs
            .r#type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case("hidden")),
        _ => false,
    };
    if native {
        return true;
    }
    if role(node).is_some_and(|r| r.is_widget()) {
        return true;
    }
    attrs.tabindex.is_some_and(|t| t >= 0)
}

/// Interaction confidence in `0.0..=1.0`, from layered signals.
///
/// Unlike [`is_interactive`] this grades how strongly the capture suggests
/// the element reacts to input, which is useful for ranking candidates when
/// several overlap.
pub fn interaction_score(node: &PageNode) -> f64 {
    let mut score: f64 = 0.0;
    let attrs = &node.attributes;

    // Native interactive tags
    let interactive_tags = [
        "a", "button", "input", "select", "textarea", "option", "label", "summary",
    ];
    if interactive_tags.contains(&node.tag.as_str()) {
        score += 0.3;
    }

    // Input type hints
    if let Some(input_type) = attrs.r#type.as_deref() {
        let clickable_types = [
            "button", "submit", "reset", "checkbox", "radio", "file", "image",
        ];
        if clickable_types.contains(&input_type) {
            score += 0.15;
        }
    }

    // Widget roles
    if role(node).is_some_and(|r| r.is_widget()) {
        score += 0.2;
    }

    // Cursor pointer style
    if node.style.cursor.as_deref() == Some("pointer") {
        score += 0.15;
    }

    // Href attribute (links)
    if attrs.href.is_some() {
        score += 0.2;
    }

    // Tabindex
    if attrs.tabindex.is_some_and(|t| t >= 0) {
        score += 0.1;
    }

    score.min(1.0)
}

// ===== Visibility =====

/// Style or markup facts on the node itself that hide it.
pub(crate) fn node_hidden(node: &PageNode) -> bool {
    node.style.hides()
        || node.attributes.hidden
        || node.attributes.aria_hidden.as_deref() == Some("true")
}

/// Whether a node is visible.
///
/// With `check_ancestors` the whole parent chain is consulted, since a
/// hidden ancestor hides everything below it. Traversals that prune hidden
/// subtrees already guarantee the chain and pass `false`.
pub fn is_visible(page: &Page, id: NodeId, check_ancestors: bool) -> bool {
    let Some(node) = page.get(id) else {
        return false;
    };
    if node_hidden(node) {
        return false;
    }
    if check_ancestors {
        let mut current = node.parent;
        let mut hops = 0usize;
        while let Some(parent_id) = current {
            hops += 1;
            if hops > super::MAX_ANCESTOR_HOPS {
                return false;
            }
            let Some(parent) = page.get(parent_id) else {
                return false;
            };
            if node_hidden(parent) {
                return false;
            }
            current = parent.parent;
        }
    }
    true
}

// ===== Accessible names =====

/// Compute a node's accessible name.
///
/// Priority chain: `aria-label`, then `aria-labelledby` references, then an
/// associated `<label for>`, then visible subtree text, then `placeholder`,
/// `title`, `alt` and finally `value`. Whitespace-only candidates never
/// contribute; the first non-empty wins. Returns an empty string when the
/// whole chain comes up empty.
pub fn accessible_name(page: &Page, id: NodeId) -> String {
    let Some(node) = page.get(id) else {
        return String::new();
    };
    let attrs = &node.attributes;

    if let Some(label) = attrs.aria_label.as_deref() {
        let label = collapse_whitespace(label);
        if !label.is_empty() {
            return label;
        }
    }

    if let Some(refs) = attrs.aria_labelledby.as_deref() {
        let mut parts = Vec::new();
        for reference in refs.split_whitespace() {
            if let Some(target) = page.find_by_attr_id(reference) {
                let text = page.text_content(target);
                if !text.is_empty() {
                    parts.push(text);
                }
            }
        }
        if !parts.is_empty() {
            return parts.join(" ");
        }
    }

    if is_form_control(&node.tag) {
        if let Some(own_id) = attrs.id.as_deref() {
            if let Some(label) = page.find_label_for(own_id) {
                let text = page.text_content(label);
                if !text.is_empty() {
                    return text;
                }
            }
        }
    }

    let own_text = page.text_content(id);
    if !own_text.is_empty() {
        return own_text;
    }

    for candidate in [
        attrs.placeholder.as_deref(),
        attrs.title.as_deref(),
        attrs.alt.as_deref(),
        attrs.value.as_deref(),
    ]
    .into_iter()
    .flatten()
    {
        let candidate = collapse_whitespace(candidate);
        if !candidate.is_empty() {
            return candidate;
        }
    }

    String::new()
}

// ===== Form control details =====

pub(crate) fn is_form_control(tag: &str) -> bool {
    matches!(tag, "input" | "textarea" | "select")
}

/// Bracketed input detail fragment, e.g. `[type=text required]`.
///
/// Empty for nodes that are not form controls or have nothing to report.
/// Values and placeholders are truncated so a pre-filled form does not
/// flood the line.
pub fn input_attributes(node: &PageNode) -> String {
    if !is_form_control(&node.tag) {
        return String::new();
    }
    let attrs = &node.attributes;
    let mut parts: Vec<String> = Vec::new();

    if let Some(ty) = attrs.r#type.as_deref() {
        parts.push(format!("type={ty}"));
    } else if node.tag == "input" {
        parts.push("type=text".to_string());
    }
    if attrs.required {
        parts.push("required".to_string());
    }
    if attrs.readonly {
        parts.push("readonly".to_string());
    }
    if let Some(value) = attrs.value.as_deref() {
        let value = collapse_whitespace(value);
        if !value.is_empty() {
            parts.push(format!("value=\"{}\"", truncate_chars(&value, 20)));
        }
    }
    if let Some(placeholder) = attrs.placeholder.as_deref() {
        let placeholder = collapse_whitespace(placeholder);
        if !placeholder.is_empty() {
            parts.push(format!("placeholder=\"{}\"", truncate_chars(&placeholder, 20)));
        }
    }

    if parts.is_empty() {
        String::new()
    } else {
        format!("[{}]", parts.join(" "))
    }
}

/// Dynamic state tokens for a node, e.g. `disabled` or `expanded`.
pub fn states(node: &PageNode) -> Vec<&'static str> {
    let attrs = &node.attributes;
    let mut out = Vec::new();
    if attrs.disabled {
        out.push("disabled");
    }
    if attrs.checked || attrs.aria_checked.as_deref() == Some("true") {
        out.push("checked");
    }
    match attrs.aria_expanded.as_deref() {
        Some("true") => out.push("expanded"),
        Some("false") => out.push("collapsed"),
        _ => {}
    }
    if attrs.aria_selected.as_deref() == Some("true") {
        out.push("selected");
    }
    out
}
