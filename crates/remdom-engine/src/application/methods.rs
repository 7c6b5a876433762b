//! The invoke-method capability table.
//!
//! The host environment has no open-ended reflection, so "look up the named
//! method on the node" is a fixed, documented dispatch table instead.  A name
//! resolves only when the node's tag actually supports the capability;
//! everything else is "method not found".
//!
//! Supported methods:
//!
//! | name             | tags                                   | result          |
//! |------------------|----------------------------------------|-----------------|
//! | `focus`          | interactive only                       | none            |
//! | `blur`           | interactive only                       | none            |
//! | `select`         | interactive only                       | none            |
//! | `click`          | any                                    | none (synthesizes a pointer event) |
//! | `getAttribute`   | any                                    | value or null   |
//! | `hasAttribute`   | any                                    | boolean         |
//! | `scrollIntoView` | any                                    | none            |
//!
//! Interactive tags: `a`, `button`, `input`, `select`, `textarea`.

/// A capability resolved from a method name, ready to invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Focus,
    Blur,
    Select,
    Click,
    GetAttribute,
    HasAttribute,
    ScrollIntoView,
}

/// Tags whose nodes accept keyboard focus and selection.
const INTERACTIVE_TAGS: &[&str] = &["a", "button", "input", "select", "textarea"];

/// Whether a tag supports the focus/blur/select capability group.
pub fn is_interactive(tag: &str) -> bool {
    let tag = tag.to_ascii_lowercase();
    INTERACTIVE_TAGS.contains(&tag.as_str())
}

/// Looks up `name` as a capability of a node with the given tag.
///
/// Returns `None` both for names outside the table and for capabilities the
/// tag does not carry; the caller reports either as "method not found".
pub fn resolve(tag: &str, name: &str) -> Option<Method> {
    let method = match name {
        "focus" => Method::Focus,
        "blur" => Method::Blur,
        "select" => Method::Select,
        "click" => Method::Click,
        "getAttribute" => Method::GetAttribute,
        "hasAttribute" => Method::HasAttribute,
        "scrollIntoView" => Method::ScrollIntoView,
        _ => return None,
    };
    match method {
        Method::Focus | Method::Blur | Method::Select if !is_interactive(tag) => None,
        _ => Some(method),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
