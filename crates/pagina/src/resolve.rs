//! The field resolution engine.
//!
//! A [`Resolver`] wraps a borrowed [`Session`] and hands out *bound fields*:
//! per-access objects carrying the effective locator's lookup result. A
//! bound field is constructed fresh on every access of a declaration,
//! resolved immediately, and discarded when dropped — nothing persists
//! between accesses except the definitions themselves.
//!
//! Scope selection runs per field, independent of ancestors:
//!
//! 1. a field with [`ScopePolicy::ForceSession`] always looks up through
//!    the session, however deep it is nested;
//! 2. a field accessed on a root page object (which has no handle of its
//!    own by design) also uses the session;
//! 3. everything else looks up beneath the owner's cached single handle.
//!
//! When rule 3 applies but the owner has no usable single handle — it was
//! invalidated, its own resolution was degraded, or it is a multi-handle
//! collection — the engine emits one recoverable [`ResolutionWarning`] and
//! returns the field unresolved instead of raising. The warning is the only
//! signal; later operations on the unresolved field perform no native
//! action.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::driver::{Handle, Session};
use crate::fields::{FieldDef, FieldKind, LeafKind, ScopePolicy, SectionDef};
use crate::result::{PageError, PageResult, ResolutionWarning};

/// Resolution context: the session plus the recoverable warning channel.
///
/// An explicit value rather than process-wide state, so independent sessions
/// can be driven side by side.
#[derive(Debug)]
pub struct Resolver<'s> {
    session: &'s dyn Session,
    warnings: Vec<ResolutionWarning>,
}

impl<'s> Resolver<'s> {
    /// Create a resolver over a live session
    #[must_use]
    pub fn new(session: &'s dyn Session) -> Self {
        Self {
            session,
            warnings: Vec::new(),
        }
    }

    /// Bind a definition as a top-level page object.
    ///
    /// The page itself is never looked up; its fields resolve against the
    /// session scope.
    #[must_use]
    pub fn page(&self, def: &Arc<SectionDef>) -> BoundSection {
        BoundSection {
            def: Arc::clone(def),
            handle: HandleState::Root,
        }
    }

    /// Warnings accumulated so far, oldest first
    #[must_use]
    pub fn warnings(&self) -> &[ResolutionWarning] {
        &self.warnings
    }

    /// Drain the warning channel
    pub fn take_warnings(&mut self) -> Vec<ResolutionWarning> {
        std::mem::take(&mut self.warnings)
    }

    fn warn_unusable_scope(&mut self, section: &str) {
        let warning = ResolutionWarning::new(section);
        warn!(section = section, "{}", warning);
        self.warnings.push(warning);
    }

    fn resolve(&mut self, scope: &Lookup<'_>, def: &FieldDef) -> PageResult<BoundField> {
        debug!(locator = %def.locator, kind = def.kind.label(), "resolving field");
        match &def.kind {
            FieldKind::Leaf(kind) => {
                let handle = scope.find_single(self.session, def)?;
                Ok(BoundField::Leaf(BoundLeaf {
                    kind: *kind,
                    handle: Some(handle),
                }))
            }
            FieldKind::Section(inner) => {
                let handle = scope.find_single(self.session, def)?;
                Ok(BoundField::Section(BoundSection {
                    def: Arc::clone(inner),
                    handle: HandleState::Resolved(handle),
                }))
            }
            FieldKind::Collection(inner) => {
                let handles = scope.find_many(self.session, def)?;
                Ok(BoundField::Collection(BoundCollection {
                    def: Arc::clone(inner),
                    handles: Some(handles),
                }))
            }
        }
    }
}

/// The scope a single lookup runs against.
enum Lookup<'a> {
    Session,
    Scoped(&'a Handle),
}

impl Lookup<'_> {
    fn find_single(&self, session: &dyn Session, def: &FieldDef) -> PageResult<Handle> {
        let handle = match self {
            Self::Session => session.find_single(&def.locator)?,
            Self::Scoped(scope) => scope.find_single(&def.locator)?,
        };
        Ok(handle)
    }

    fn find_many(&self, session: &dyn Session, def: &FieldDef) -> PageResult<Vec<Handle>> {
        let handles = match self {
            Self::Session => session.find_many(&def.locator)?,
            Self::Scoped(scope) => scope.find_many(&def.locator)?,
        };
        Ok(handles)
    }
}

/// Cache state of a bound section's handle.
#[derive(Debug, Clone)]
enum HandleState {
    /// A top-level page object: no handle by design, children use the session
    Root,
    /// Resolution succeeded; children scope beneath this handle
    Resolved(Handle),
    /// Degraded or invalidated; resolving children warns instead
    Unresolved,
}

/// A bound container field (or a root page object).
#[derive(Debug, Clone)]
pub struct BoundSection {
    def: Arc<SectionDef>,
    handle: HandleState,
}

impl BoundSection {
    /// The definition this bound field was produced from
    #[must_use]
    pub fn def(&self) -> &Arc<SectionDef> {
        &self.def
    }

    /// The cached handle, when resolution succeeded
    #[must_use]
    pub fn handle(&self) -> Option<&Handle> {
        match &self.handle {
            HandleState::Resolved(handle) => Some(handle),
            HandleState::Root | HandleState::Unresolved => None,
        }
    }

    /// Drop the cached handle, simulating staleness.
    ///
    /// Children resolved through this bound field afterwards are degraded
    /// (warning + unresolved). A fresh access of the original declaration
    /// re-resolves from scratch and is unaffected.
    pub fn invalidate(&mut self) {
        self.handle = HandleState::Unresolved;
    }

    /// Freshly resolve a declared field.
    ///
    /// # Errors
    ///
    /// [`PageError::UnknownField`] when `name` was never declared;
    /// [`PageError::Driver`] when the native lookup fails. A degraded scope
    /// is *not* an error: it produces a warning and an unresolved field.
    pub fn field(&self, resolver: &mut Resolver<'_>, name: &str) -> PageResult<BoundField> {
        let def = self.def.field(name).ok_or_else(|| PageError::UnknownField {
            name: name.to_string(),
            section: self.def.name().to_string(),
        })?;
        let scope = match (def.scope, &self.handle) {
            (ScopePolicy::ForceSession, _) | (ScopePolicy::Inherit, HandleState::Root) => {
                Lookup::Session
            }
            (ScopePolicy::Inherit, HandleState::Resolved(handle)) => Lookup::Scoped(handle),
            (ScopePolicy::Inherit, HandleState::Unresolved) => {
                resolver.warn_unusable_scope(self.def.name());
                return Ok(BoundField::unresolved(def));
            }
        };
        resolver.resolve(&scope, def)
    }
}

/// A bound multi-handle field.
#[derive(Debug, Clone)]
pub struct BoundCollection {
    def: Arc<SectionDef>,
    handles: Option<Vec<Handle>>,
}

impl BoundCollection {
    /// The definition of the element type this collection holds
    #[must_use]
    pub fn def(&self) -> &Arc<SectionDef> {
        &self.def
    }

    /// The cached handle sequence, in lookup order; `None` when unresolved
    #[must_use]
    pub fn handles(&self) -> Option<&[Handle]> {
        self.handles.as_deref()
    }

    /// Attempt to resolve a declared field beneath this collection.
    ///
    /// A collection has no singular handle to scope with, so any field that
    /// would inherit its scope is degraded: one warning, unresolved result.
    /// A field that forces the session scope escapes before scope
    /// validation and resolves normally.
    pub fn field(&self, resolver: &mut Resolver<'_>, name: &str) -> PageResult<BoundField> {
        let def = self.def.field(name).ok_or_else(|| PageError::UnknownField {
            name: name.to_string(),
            section: self.def.name().to_string(),
        })?;
        if def.scope == ScopePolicy::ForceSession {
            return resolver.resolve(&Lookup::Session, def);
        }
        resolver.warn_unusable_scope(self.def.name());
        Ok(BoundField::unresolved(def))
    }
}

/// A bound scalar leaf field.
#[derive(Debug, Clone)]
pub struct BoundLeaf {
    kind: LeafKind,
    handle: Option<Handle>,
}

impl BoundLeaf {
    /// Which leaf this is
    #[must_use]
    pub const fn kind(&self) -> LeafKind {
        self.kind
    }

    /// The cached handle, when resolution succeeded
    #[must_use]
    pub fn handle(&self) -> Option<&Handle> {
        self.handle.as_ref()
    }
}

/// What accessing a declared field yields.
#[derive(Debug, Clone)]
pub enum BoundField {
    /// Scalar leaf
    Leaf(BoundLeaf),
    /// Nested container
    Section(BoundSection),
    /// Multi-handle collection
    Collection(BoundCollection),
}

impl BoundField {
    fn unresolved(def: &FieldDef) -> Self {
        match &def.kind {
            FieldKind::Leaf(kind) => Self::Leaf(BoundLeaf {
                kind: *kind,
                handle: None,
            }),
            FieldKind::Section(inner) => Self::Section(BoundSection {
                def: Arc::clone(inner),
                handle: HandleState::Unresolved,
            }),
            FieldKind::Collection(inner) => Self::Collection(BoundCollection {
                def: Arc::clone(inner),
                handles: None,
            }),
        }
    }

    /// The cached single handle, for leaf and section fields
    #[must_use]
    pub fn handle(&self) -> Option<&Handle> {
        match self {
            Self::Leaf(leaf) => leaf.handle(),
            Self::Section(section) => section.handle(),
            Self::Collection(_) => None,
        }
    }

    /// Whether resolution produced a cached result
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        match self {
            Self::Leaf(leaf) => leaf.handle.is_some(),
            Self::Section(section) => section.handle().is_some(),
            Self::Collection(collection) => collection.handles.is_some(),
        }
    }

    /// Borrow as a section, if that is what this is
    #[must_use]
    pub fn as_section(&self) -> Option<&BoundSection> {
        match self {
            Self::Section(section) => Some(section),
            _ => None,
        }
    }

    /// Convert into a section, if that is what this is
    #[must_use]
    pub fn into_section(self) -> Option<BoundSection> {
        match self {
            Self::Section(section) => Some(section),
            _ => None,
        }
    }

    /// Convert into a leaf, if that is what this is
    #[must_use]
    pub fn into_leaf(self) -> Option<BoundLeaf> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    /// Convert into a collection, if that is what this is
    #[must_use]
    pub fn into_collection(self) -> Option<BoundCollection> {
        match self {
            Self::Collection(collection) => Some(collection),
            _ => None,
        }
    }
}
