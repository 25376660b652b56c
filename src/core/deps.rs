//! MW-006: Dependency sets, the modules a module declared it depends on.

use super::error::ModError;
use super::handle::Mod;
use super::modtype::ModType;
use super::schema::SchemaServer;
use super::types::TypeDef;

/// Ordered, read-only collection of finalized dependency modules.
///
/// Lookups ask each dependency for its *own* definitions (never its
/// transitive dependencies) and return the first hit in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModDeps {
    mods: Vec<Mod>,
}

impl ModDeps {
    pub fn new(mods: Vec<Mod>) -> Self {
        Self { mods }
    }

    /// Copy with `module` appended.
    pub fn append(&self, module: Mod) -> Self {
        let mut mods = self.mods.clone();
        mods.push(module);
        Self { mods }
    }

    pub fn mods(&self) -> &[Mod] {
        &self.mods
    }

    pub fn len(&self) -> usize {
        self.mods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mods.is_empty()
    }

    pub fn lookup(&self, name: &str) -> Option<&Mod> {
        self.mods.iter().find(|m| m.name() == name)
    }

    /// Resolve `def` against the dependencies' own schemas.
    pub fn mod_type_for(&self, def: &TypeDef) -> Result<Option<ModType>, ModError> {
        for module in &self.mods {
            if let Some(found) = module.mod_type_for(def, false)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    /// Every type definition exposed by the dependencies, in order.
    pub fn type_defs(&self, server: &SchemaServer) -> Result<Vec<TypeDef>, ModError> {
        let mut defs = Vec::new();
        for module in &self.mods {
            defs.extend(module.type_defs(server)?);
        }
        Ok(defs)
    }
}
