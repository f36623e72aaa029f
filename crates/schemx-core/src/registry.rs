//! Identity registry
//!
//! Tracks every live entity id of a circuit graph together with its kind,
//! and one name index per naming scope. The registry never owns entities; the
//! graph keeps it in step with its collections.

use std::collections::HashMap;
use std::fmt;

use schemx_core_types::EntityId;
use serde::{Deserialize, Serialize};

use crate::errors::{ValidationError, ValidationResult};
use crate::model::EntityKind;

/// Namespace in which entity names must be unique
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NameScope {
    LibraryComponents,
    NetClasses,
    NetSignals,
    ComponentInstances,
    Schematics,
}

impl fmt::Display for NameScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NameScope::LibraryComponents => "library component",
            NameScope::NetClasses => "net class",
            NameScope::NetSignals => "net signal",
            NameScope::ComponentInstances => "component instance",
            NameScope::Schematics => "schematic",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityRegistry {
    ids: HashMap<EntityId, EntityKind>,
    names: HashMap<NameScope, HashMap<String, EntityId>>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with `DuplicateId` if `id` is already in use
    pub fn check_id_free(&self, id: EntityId, kind: EntityKind) -> ValidationResult<()> {
        if self.ids.contains_key(&id) {
            return Err(ValidationError::DuplicateId { kind, id });
        }
        Ok(())
    }

    /// Register `id` as a live entity of `kind`
    ///
    /// # Errors
    ///
    /// Returns `DuplicateId` if the id is already registered.
    pub fn register(&mut self, id: EntityId, kind: EntityKind) -> ValidationResult<()> {
        self.check_id_free(id, kind)?;
        self.ids.insert(id, kind);
        Ok(())
    }

    pub fn unregister_id(&mut self, id: EntityId) -> Option<EntityKind> {
        self.ids.remove(&id)
    }

    pub fn is_registered(&self, id: EntityId) -> bool {
        self.ids.contains_key(&id)
    }

    pub fn kind_of(&self, id: EntityId) -> Option<EntityKind> {
        self.ids.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Check that `name` may be given to a new entity in `scope`
    ///
    /// Names are compared case-sensitively.
    ///
    /// # Errors
    ///
    /// Returns `EmptyName` for an empty or whitespace-only name and
    /// `DuplicateName` if the name is taken.
    pub fn check_name_unique(&self, scope: NameScope, name: &str) -> ValidationResult<()> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName { scope });
        }
        if self.lookup_name(scope, name).is_some() {
            return Err(ValidationError::DuplicateName {
                scope,
                name: name.to_string(),
            });
        }
        Ok(())
    }

    pub fn bind_name(&mut self, scope: NameScope, name: &str, id: EntityId) {
        self.names
            .entry(scope)
            .or_default()
            .insert(name.to_string(), id);
    }

    pub fn unbind_name(&mut self, scope: NameScope, name: &str) -> Option<EntityId> {
        let index = self.names.get_mut(&scope)?;
        let id = index.remove(name);
        if index.is_empty() {
            self.names.remove(&scope);
        }
        id
    }

    pub fn lookup_name(&self, scope: NameScope, name: &str) -> Option<EntityId> {
        self.names.get(&scope)?.get(name).copied()
    }

    /// Validate and register an id with an optional scoped name in one step
    ///
    /// Nothing is recorded unless both checks pass.
    pub(crate) fn claim(
        &mut self,
        id: EntityId,
        kind: EntityKind,
        name: Option<(NameScope, &str)>,
    ) -> ValidationResult<()> {
        self.check_id_free(id, kind)?;
        if let Some((scope, name)) = name {
            self.check_name_unique(scope, name)?;
            self.bind_name(scope, name, id);
        }
        self.ids.insert(id, kind);
        Ok(())
    }

    pub(crate) fn release(&mut self, id: EntityId, name: Option<(NameScope, &str)>) {
        if let Some((scope, name)) = name {
            self.unbind_name(scope, name);
        }
        self.unregister_id(id);
    }

    /// Move `id` from `old` to `new` within `scope`
    ///
    /// Renaming to the current name succeeds without changes.
    pub(crate) fn rename(
        &mut self,
        scope: NameScope,
        id: EntityId,
        old: &str,
        new: &str,
    ) -> ValidationResult<()> {
        if old == new {
            return Ok(());
        }
        self.check_name_unique(scope, new)?;
        self.unbind_name(scope, old);
        self.bind_name(scope, new, id);
        Ok(())
    }
}
