//! Recursive state serialization: structured read ([`BoundSection::get_state`])
//! and write ([`BoundSection::fill`]) of a bound field tree.
//!
//! State is a JSON mapping from child field name to that child's state:
//! scalar values for leaves, nested mappings for sections. The two
//! operations round-trip: a mapping produced by `get_state` is accepted
//! unchanged by `fill`, and re-reading reproduces it.
//!
//! A section with `stop_propagation` caps recursion at its sub-containers.
//! The cap is a polymorphic split, not a flag threaded through one shared
//! method: capped container children yield an absent result (reads) or are
//! skipped outright, never resolved (writes), while leaves ignore the cap
//! entirely because they never recurse. Multi-handle collections do not
//! participate in the protocol in either direction.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::trace;

use crate::fields::{FieldKind, LeafKind};
use crate::resolve::{BoundField, BoundLeaf, BoundSection, Resolver};
use crate::result::{PageError, PageResult};
use crate::schema::value_type_name;

impl BoundSection {
    /// Read the structured state of this section.
    ///
    /// Every single-handle child is freshly resolved and read; keys whose
    /// read yields an absent result (capped containers, collections) are
    /// omitted from the mapping entirely.
    pub fn get_state(&self, resolver: &mut Resolver<'_>) -> PageResult<Map<String, Value>> {
        let def = Arc::clone(self.def());
        let mut state = Map::new();
        for (name, field) in def.fields() {
            if !field.kind.is_single() {
                continue;
            }
            let child = self.field(resolver, name)?;
            let value = if def.stop_propagation() {
                child.read_capped(resolver)?
            } else {
                child.read(resolver)?
            };
            if let Some(value) = value {
                state.insert(name.to_string(), value);
            }
        }
        trace!(section = def.name(), fields = state.len(), "read state");
        Ok(state)
    }

    /// Recursively apply a state mapping to this section.
    ///
    /// Entries whose key is not a declared single-handle field, or whose
    /// value is `null`, are ignored. Under `stop_propagation` a
    /// container-valued child is skipped before resolution — it is never
    /// looked up and never queried.
    ///
    /// # Errors
    ///
    /// [`PageError::NotAnObject`] when `data` is not a mapping; resolution
    /// and driver errors propagate.
    pub fn fill(&self, resolver: &mut Resolver<'_>, data: &Value) -> PageResult<()> {
        let entries = data.as_object().ok_or_else(|| PageError::NotAnObject {
            got: value_type_name(data).to_string(),
        })?;
        let def = Arc::clone(self.def());
        for (key, value) in entries {
            if value.is_null() {
                continue;
            }
            let Some(field) = def.field(key) else {
                continue;
            };
            if !field.kind.is_single() {
                continue;
            }
            if def.stop_propagation() && matches!(field.kind, FieldKind::Section(_)) {
                trace!(section = def.name(), field = key.as_str(), "skipped by recursion cap");
                continue;
            }
            match self.field(resolver, key)? {
                BoundField::Leaf(leaf) => leaf.write(value)?,
                BoundField::Section(section) => section.fill(resolver, value)?,
                BoundField::Collection(_) => {}
            }
        }
        Ok(())
    }
}

impl BoundField {
    /// Uncapped read: leaves yield their scalar, sections recurse.
    pub(crate) fn read(&self, resolver: &mut Resolver<'_>) -> PageResult<Option<Value>> {
        match self {
            Self::Leaf(leaf) => Ok(Some(leaf.read()?)),
            Self::Section(section) => Ok(Some(Value::Object(section.get_state(resolver)?))),
            Self::Collection(_) => Ok(None),
        }
    }

    /// Capped read: containers yield absent without any discovery; leaves
    /// ignore the cap.
    pub(crate) fn read_capped(&self, _resolver: &mut Resolver<'_>) -> PageResult<Option<Value>> {
        match self {
            Self::Leaf(leaf) => Ok(Some(leaf.read()?)),
            Self::Section(_) | Self::Collection(_) => Ok(None),
        }
    }
}

impl BoundLeaf {
    /// Read this leaf's scalar value.
    ///
    /// An unresolved leaf reads as `null`; no native action occurs.
    pub fn read(&self) -> PageResult<Value> {
        let Some(handle) = self.handle() else {
            return Ok(Value::Null);
        };
        let value = match self.kind() {
            LeafKind::Input => Value::String(handle.attribute("value")?.unwrap_or_default()),
            LeafKind::Checkbox => Value::Bool(handle.is_selected()?),
            LeafKind::Text => Value::String(handle.text()?),
        };
        Ok(value)
    }

    /// Write a scalar value to this leaf.
    ///
    /// Inputs are cleared and retyped; checkboxes are clicked only when the
    /// current state differs; text leaves are read-only and ignore writes.
    /// Writing to an unresolved leaf performs no native action.
    pub fn write(&self, value: &Value) -> PageResult<()> {
        let Some(handle) = self.handle() else {
            return Ok(());
        };
        match self.kind() {
            LeafKind::Input => {
                let text = match value {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                handle.clear()?;
                handle.send_keys(&text)?;
            }
            LeafKind::Checkbox => {
                let target = value.as_bool().unwrap_or(false);
                if handle.is_selected()? != target {
                    handle.click()?;
                }
            }
            LeafKind::Text => {}
        }
        Ok(())
    }
}
