//! Declarative constraint sets.
//!
//! Each entity has exactly one [`EntitySchema`]. The validator walks it to check
//! request bodies, and the storage layer derives its table definition (column
//! list and CHECK constraints) from the same rules.

/// The three independently persisted record kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Product,
    Faq,
    Contact,
}

impl EntityKind {
    /// Storage collection (table) name.
    pub fn collection(self) -> &'static str {
        match self {
            EntityKind::Product => "products",
            EntityKind::Faq => "faqs",
            EntityKind::Contact => "contacts",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Product => "product",
            EntityKind::Faq => "faq",
            EntityKind::Contact => "contact",
        }
    }
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Syntactic format a text field must satisfy beyond its length bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Plain,
    Email,
    Uri,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Trimmed string with inclusive character-count bounds.
    Text {
        min: usize,
        max: usize,
        format: TextFormat,
    },
    /// Number strictly greater than zero.
    PositiveNumber,
    /// Sequence of trimmed strings.
    TextList { max_items: usize, max_item_len: usize },
    /// One of a fixed set of values. Never accepted from input.
    Choice { options: &'static [&'static str] },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Value applied when the field is absent (input) or omitted (storage).
    pub default: Option<&'static str>,
    /// Whether callers may supply the field in a create request.
    pub accepts_input: bool,
}

impl FieldRule {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            default: None,
            accepts_input: true,
        }
    }

    pub const fn with_default(name: &'static str, kind: FieldKind, default: &'static str) -> Self {
        Self {
            name,
            kind,
            required: false,
            default: Some(default),
            accepts_input: true,
        }
    }

    pub const fn stored_only(name: &'static str, kind: FieldKind, default: &'static str) -> Self {
        Self {
            name,
            kind,
            required: false,
            default: Some(default),
            accepts_input: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntitySchema {
    pub kind: EntityKind,
    pub fields: &'static [FieldRule],
}

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields a create request may carry, in declaration order.
    pub fn input_fields(&self) -> impl Iterator<Item = &FieldRule> {
        self.fields.iter().filter(|f| f.accepts_input)
    }
}

pub(crate) const fn text(min: usize, max: usize) -> FieldKind {
    FieldKind::Text {
        min,
        max,
        format: TextFormat::Plain,
    }
}

pub(crate) const fn formatted(min: usize, max: usize, format: TextFormat) -> FieldKind {
    FieldKind::Text { min, max, format }
}
