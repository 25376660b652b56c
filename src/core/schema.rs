//! MW-008: Schema server, the shared registry of every installed type.
//!
//! Objects and interfaces are registered exactly once: a second registration
//! under the same name is refused whichever module attempts it. Enums and
//! scalars are idempotent so a module may re-publish a value set its
//! dependency already owns.

use super::error::ModError;
use super::types::*;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Kind of an installed schema type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstalledKind {
    Object,
    Interface,
    Enum,
    Scalar,
}

impl InstalledKind {
    /// Enums and scalars may be re-published under an existing name.
    pub fn is_idempotent(self) -> bool {
        matches!(self, Self::Enum | Self::Scalar)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::Scalar => "scalar",
        }
    }
}

/// A type as published by its owning module.
#[derive(Debug, Clone, Serialize)]
pub struct InstalledType {
    pub kind: InstalledKind,
    pub module: String,
    pub def: Arc<TypeDef>,
}

#[derive(Debug, Clone)]
pub struct SchemaServer {
    types: IndexMap<String, InstalledType, FxBuildHasher>,
}

impl Default for SchemaServer {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaServer {
    pub fn new() -> Self {
        Self {
            types: IndexMap::with_hasher(FxBuildHasher),
        }
    }

    pub fn install_object(&mut self, module: &str, def: &ObjectTypeDef) -> Result<(), ModError> {
        self.insert_unique(
            InstalledKind::Object,
            module,
            &def.name,
            TypeDef::object(def.clone()),
        )
    }

    pub fn install_interface(
        &mut self,
        module: &str,
        def: &InterfaceTypeDef,
    ) -> Result<(), ModError> {
        self.insert_unique(
            InstalledKind::Interface,
            module,
            &def.name,
            TypeDef::interface(def.clone()),
        )
    }

    /// Register an enum. Returns `Ok(false)` when an enum of that name is
    /// already present; the existing entry is kept.
    pub fn install_enum(&mut self, module: &str, def: &EnumTypeDef) -> Result<bool, ModError> {
        self.insert_idempotent(
            InstalledKind::Enum,
            module,
            &def.name,
            TypeDef::enumeration(def.clone()),
        )
    }

    pub fn install_scalar(&mut self, module: &str, def: &ScalarTypeDef) -> Result<bool, ModError> {
        self.insert_idempotent(
            InstalledKind::Scalar,
            module,
            &def.name,
            TypeDef::scalar(def.clone()),
        )
    }

    /// Check that `module` may register `name` as `kind`, without registering it.
    pub fn check_available(
        &self,
        kind: InstalledKind,
        module: &str,
        name: &str,
    ) -> Result<(), ModError> {
        match self.types.get(name) {
            Some(existing) if existing.kind == kind && kind.is_idempotent() => Ok(()),
            Some(existing) => Err(ModError::DuplicateType {
                kind: kind.label(),
                type_name: name.to_string(),
                existing: existing.module.clone(),
                module: module.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn insert_unique(
        &mut self,
        kind: InstalledKind,
        module: &str,
        name: &str,
        def: TypeDef,
    ) -> Result<(), ModError> {
        if let Some(existing) = self.types.get(name) {
            return Err(ModError::DuplicateType {
                kind: kind.label(),
                type_name: name.to_string(),
                existing: existing.module.clone(),
                module: module.to_string(),
            });
        }
        debug!(module, kind = kind.label(), name, "registered type");
        self.types.insert(
            name.to_string(),
            InstalledType {
                kind,
                module: module.to_string(),
                def: Arc::new(def),
            },
        );
        Ok(())
    }

    fn insert_idempotent(
        &mut self,
        kind: InstalledKind,
        module: &str,
        name: &str,
        def: TypeDef,
    ) -> Result<bool, ModError> {
        self.check_available(kind, module, name)?;
        if self.types.contains_key(name) {
            return Ok(false);
        }
        self.insert_unique(kind, module, name, def)?;
        Ok(true)
    }

    pub fn get(&self, name: &str) -> Option<&InstalledType> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Installed copy of `name`, only if `module` owns it.
    pub fn owned_by(&self, module: &str, name: &str) -> Option<&InstalledType> {
        self.types.get(name).filter(|t| t.module == module)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Installed types in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &InstalledType)> {
        self.types.iter().map(|(name, t)| (name.as_str(), t))
    }

    pub fn types_of(&self, module: &str) -> Vec<&InstalledType> {
        self.types.values().filter(|t| t.module == module).collect()
    }
}
