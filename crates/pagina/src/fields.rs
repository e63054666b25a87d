//! Field declarations and the per-type field registry.
//!
//! A container type is described once by a [`SectionDef`]: a name, an
//! optional default locator, the recursion-cap flag, and a registry mapping
//! field names to [`FieldDef`] descriptors. Definitions are built through
//! [`SectionBuilder`], which performs all declaration-time validation:
//!
//! - every field ends up with exactly one effective [`Locator`] — the
//!   declaration's own argument if given, else the field type's default —
//!   or building fails with [`PageError::InvalidLocator`];
//! - the cache names `handle` (single-handle fields) and `handles`
//!   (multi-handle fields) are reserved within their own resolver kind and
//!   rejected with [`PageError::AttributeNotPermitted`]; the two
//!   reservations are independent;
//! - each field's scope policy is fixed here, once, instead of being
//!   re-discovered reflectively at access time.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::locator::Locator;
use crate::result::{PageError, PageResult};

/// Cache name reserved by single-handle fields
pub const RESERVED_SINGLE: &str = "handle";

/// Cache name reserved by multi-handle fields
pub const RESERVED_MULTI: &str = "handles";

/// How a field selects its lookup scope.
///
/// `Inherit` means "resolve against the owner's handle when one exists"; at
/// the top level that falls back to the session. `ForceSession` escapes to
/// the session scope regardless of nesting depth, for that field's own
/// lookup only — its descendants scope normally against its handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScopePolicy {
    /// Use the nearest owner handle, or the session at the top level
    #[default]
    Inherit,
    /// Always use the session scope (`search_with_driver` in page documents)
    ForceSession,
}

/// The scalar leaves shipped with the crate.
///
/// A leaf reads and writes a single value and never recurses; the recursion
/// cap does not apply to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafKind {
    /// Text input: written with clear + send keys, read back from the
    /// `value` attribute
    Input,
    /// Boolean control: read from the selected state, written by clicking
    /// when the current state differs
    Checkbox,
    /// Read-only text content; writes are ignored
    Text,
}

impl LeafKind {
    /// Document name of the leaf kind
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Checkbox => "checkbox",
            Self::Text => "text",
        }
    }

    /// Parse a document name back into a leaf kind
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "input" => Some(Self::Input),
            "checkbox" => Some(Self::Checkbox),
            "text" => Some(Self::Text),
            _ => None,
        }
    }
}

/// What a declared field resolves into.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Scalar single-handle field
    Leaf(LeafKind),
    /// Container single-handle field with its own registry
    Section(Arc<SectionDef>),
    /// Multi-handle field. The nested definition exists so that attempts to
    /// resolve *through* the collection can name its fields — and be
    /// rejected with a warning, since a collection has no singular handle.
    Collection(Arc<SectionDef>),
}

impl FieldKind {
    /// Whether this field caches a single handle
    #[must_use]
    pub const fn is_single(&self) -> bool {
        matches!(self, Self::Leaf(_) | Self::Section(_))
    }

    /// The cache name this resolver kind reserves
    #[must_use]
    pub const fn reserved_name(&self) -> &'static str {
        if self.is_single() {
            RESERVED_SINGLE
        } else {
            RESERVED_MULTI
        }
    }

    /// Short kind label for error messages
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Leaf(_) => "leaf",
            Self::Section(_) => "section",
            Self::Collection(_) => "collection",
        }
    }
}

/// A field descriptor: the fully validated form of a declaration.
///
/// Both the locator and the scope policy are *effective* values — fallbacks
/// to the field type's defaults have already been applied.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Effective locator
    pub locator: Locator,
    /// Effective scope policy
    pub scope: ScopePolicy,
    /// Resolver kind
    pub kind: FieldKind,
}

/// A container type: name, defaults, and the field registry.
///
/// Built once per type via [`SectionDef::builder`] and shared behind an
/// `Arc`; bound fields are produced from it on every access.
#[derive(Debug)]
pub struct SectionDef {
    name: String,
    default_locator: Option<Locator>,
    stop_propagation: bool,
    scope: ScopePolicy,
    fields: BTreeMap<String, FieldDef>,
}

impl SectionDef {
    /// Start building a section type with the given name
    #[must_use]
    pub fn builder(name: impl Into<String>) -> SectionBuilder {
        SectionBuilder {
            name: name.into(),
            default_locator: None,
            stop_propagation: false,
            scope: ScopePolicy::Inherit,
            decls: Vec::new(),
        }
    }

    /// The declaring type's name, used in warnings and errors
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The type-level default locator, if any
    #[must_use]
    pub fn default_locator(&self) -> Option<&Locator> {
        self.default_locator.as_ref()
    }

    /// Whether recursive read/write stops at sub-containers
    #[must_use]
    pub const fn stop_propagation(&self) -> bool {
        self.stop_propagation
    }

    /// The type-level default scope policy
    #[must_use]
    pub const fn scope(&self) -> ScopePolicy {
        self.scope
    }

    /// Look up a field descriptor by name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    /// Iterate over all declared fields, in name order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldDef)> {
        self.fields.iter().map(|(name, def)| (name.as_str(), def))
    }
}

/// A single field declaration, before validation.
#[derive(Debug, Clone)]
pub struct FieldDecl {
    locator: Option<Locator>,
    scope: Option<ScopePolicy>,
    kind: FieldKind,
}

impl FieldDecl {
    /// Declare a leaf of the given kind, locator still to be supplied
    #[must_use]
    pub const fn leaf(kind: LeafKind) -> Self {
        Self {
            locator: None,
            scope: None,
            kind: FieldKind::Leaf(kind),
        }
    }

    /// Declare a text input with its locator
    #[must_use]
    pub fn input(locator: Locator) -> Self {
        Self::leaf(LeafKind::Input).with_locator(locator)
    }

    /// Declare a checkbox with its locator
    #[must_use]
    pub fn checkbox(locator: Locator) -> Self {
        Self::leaf(LeafKind::Checkbox).with_locator(locator)
    }

    /// Declare a read-only text leaf with its locator
    #[must_use]
    pub fn text(locator: Locator) -> Self {
        Self::leaf(LeafKind::Text).with_locator(locator)
    }

    /// Declare a nested section field of the given type
    #[must_use]
    pub fn section(def: &Arc<SectionDef>) -> Self {
        Self {
            locator: None,
            scope: None,
            kind: FieldKind::Section(Arc::clone(def)),
        }
    }

    /// Declare a multi-handle collection field of the given type
    #[must_use]
    pub fn collection(def: &Arc<SectionDef>) -> Self {
        Self {
            locator: None,
            scope: None,
            kind: FieldKind::Collection(Arc::clone(def)),
        }
    }

    /// Supply the declaration's own locator, overriding any type default
    #[must_use]
    pub fn with_locator(mut self, locator: Locator) -> Self {
        self.locator = Some(locator);
        self
    }

    /// Override the scope policy for this field only
    #[must_use]
    pub const fn search_with_driver(mut self, yes: bool) -> Self {
        self.scope = Some(if yes {
            ScopePolicy::ForceSession
        } else {
            ScopePolicy::Inherit
        });
        self
    }

    /// The type-level defaults this declaration falls back to
    fn type_defaults(&self) -> (Option<&Locator>, Option<ScopePolicy>) {
        match &self.kind {
            FieldKind::Leaf(_) => (None, None),
            FieldKind::Section(def) | FieldKind::Collection(def) => {
                (def.default_locator(), Some(def.scope()))
            }
        }
    }

    /// Validate into a descriptor. `name` is only used for error reporting.
    fn into_def(self, name: &str) -> PageResult<FieldDef> {
        if name == self.kind.reserved_name() {
            return Err(PageError::AttributeNotPermitted {
                name: name.to_string(),
                kind: self.kind.label().to_string(),
            });
        }
        let (default_locator, default_scope) = {
            let (locator, scope) = self.type_defaults();
            (locator.cloned(), scope)
        };
        let locator = self
            .locator
            .or(default_locator)
            .ok_or_else(|| PageError::InvalidLocator {
                got: "NoneType".to_string(),
            })?;
        let scope = self
            .scope
            .or(default_scope)
            .unwrap_or(ScopePolicy::Inherit);
        Ok(FieldDef {
            locator,
            scope,
            kind: self.kind,
        })
    }
}

/// Builder for [`SectionDef`]. Declarations are collected unchecked and
/// validated together by [`SectionBuilder::build`], the registration point.
#[derive(Debug)]
pub struct SectionBuilder {
    name: String,
    default_locator: Option<Locator>,
    stop_propagation: bool,
    scope: ScopePolicy,
    decls: Vec<(String, FieldDecl)>,
}

impl SectionBuilder {
    /// Set the type-level default locator (the class-level `locator`)
    #[must_use]
    pub fn locator(mut self, locator: Locator) -> Self {
        self.default_locator = Some(locator);
        self
    }

    /// Cap recursive read/write at this section's sub-containers
    #[must_use]
    pub const fn stop_propagation(mut self, yes: bool) -> Self {
        self.stop_propagation = yes;
        self
    }

    /// Set the type-level default scope policy
    #[must_use]
    pub const fn search_with_driver(mut self, yes: bool) -> Self {
        self.scope = if yes {
            ScopePolicy::ForceSession
        } else {
            ScopePolicy::Inherit
        };
        self
    }

    /// Declare a named field
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, decl: FieldDecl) -> Self {
        self.decls.push((name.into(), decl));
        self
    }

    /// Validate every declaration and produce the shared definition.
    ///
    /// # Errors
    ///
    /// [`PageError::AttributeNotPermitted`] for a reserved cache name inside
    /// its own resolver kind; [`PageError::InvalidLocator`] when a field has
    /// no effective locator.
    pub fn build(self) -> PageResult<Arc<SectionDef>> {
        let mut fields = BTreeMap::new();
        for (name, decl) in self.decls {
            let def = decl.into_def(&name)?;
            fields.insert(name, def);
        }
        Ok(Arc::new(SectionDef {
            name: self.name,
            default_locator: self.default_locator,
            stop_propagation: self.stop_propagation,
            scope: self.scope,
            fields,
        }))
    }
}
