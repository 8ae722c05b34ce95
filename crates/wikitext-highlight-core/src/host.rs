//! Editable host state.
//!
//! The decisions the host element makes (which `contentEditable` mode, whether
//! input listeners are installed, what an attribute change does) live here so
//! the custom-element adapter and the injected-element adapter agree on them.

/// Attributes the host reacts to. Changes to any other attribute are ignored.
pub const OBSERVED_ATTRIBUTES: [&str; 2] = ["value", "editable"];

/// Whether the host is part of a document and allowed to run passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Detached,
    Attached,
}

impl Lifecycle {
    pub fn is_attached(self) -> bool {
        matches!(self, Self::Attached)
    }
}

/// Editing mode, derived from presence of the `editable` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditableState {
    /// Accepts plain-text input; input, keydown and paste are handled.
    Editable,
    /// No input accepted, no listeners installed.
    ReadOnly,
}

impl EditableState {
    pub fn from_attribute(present: bool) -> Self {
        if present {
            Self::Editable
        } else {
            Self::ReadOnly
        }
    }

    /// Value for the element's `contentEditable` property.
    pub fn content_editable(self) -> &'static str {
        match self {
            Self::Editable => "plaintext-only",
            Self::ReadOnly => "false",
        }
    }

    pub fn wants_listeners(self) -> bool {
        matches!(self, Self::Editable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservedAttribute {
    Value,
    Editable,
}

impl ObservedAttribute {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "value" => Some(Self::Value),
            "editable" => Some(Self::Editable),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::Editable => "editable",
        }
    }
}

/// What the host does in response to an attribute change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeEffect {
    /// Replace the text content and run a highlight pass.
    ReplaceText(String),
    /// Re-evaluate editable state and listener installation. No pass.
    RefreshEditable,
    Ignore,
}

/// Decide the effect of `name` changing from `old` to `new`.
///
/// Unchanged values are ignored. A removed `value` attribute clears the text.
pub fn attribute_effect(name: &str, old: Option<&str>, new: Option<&str>) -> AttributeEffect {
    if old == new {
        return AttributeEffect::Ignore;
    }
    match ObservedAttribute::parse(name) {
        Some(ObservedAttribute::Value) => {
            AttributeEffect::ReplaceText(new.unwrap_or_default().to_owned())
        }
        Some(ObservedAttribute::Editable) => AttributeEffect::RefreshEditable,
        None => AttributeEffect::Ignore,
    }
}
