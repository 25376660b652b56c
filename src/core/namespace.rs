//! MW-014: Namespacing of module-local type definitions.
//!
//! Every object, interface, and enum not provided by a dependency is renamed
//! with `namespace_object` so it cannot collide with another module's type
//! of the same name. Dependency-owned references keep their names; a
//! dependency-owned enum also takes the dependency's value list.

use super::deps::ModDeps;
use super::error::ModError;
use super::modtype::ModType;
use super::naming::namespace_object;
use super::source::{join_subpath, ModuleSource};
use super::types::*;

pub struct Namespacer<'a> {
    module_name: &'a str,
    module_original_name: &'a str,
    source: &'a ModuleSource,
    deps: Option<&'a ModDeps>,
}

impl<'a> Namespacer<'a> {
    pub fn new(
        module_name: &'a str,
        module_original_name: &'a str,
        source: &'a ModuleSource,
        deps: Option<&'a ModDeps>,
    ) -> Self {
        Self {
            module_name,
            module_original_name,
            source,
            deps,
        }
    }

    fn lookup(&self, def: &TypeDef) -> Result<Option<ModType>, ModError> {
        match self.deps {
            Some(deps) => deps.mod_type_for(def),
            None => Ok(None),
        }
    }

    fn rename(&self, original_name: &str) -> String {
        namespace_object(original_name, self.module_name, self.module_original_name)
    }

    /// Rewrite a source map to be relative to the module's context directory.
    /// Remote sources have no meaningful local path, so their maps are dropped.
    fn source_map(&self, map: Option<SourceMap>) -> Option<SourceMap> {
        let mut map = map?;
        if !self.source.is_local() {
            return None;
        }
        map.module = Some(self.module_name.to_string());
        map.filename = join_subpath(self.source.subpath(), &map.filename);
        Some(map)
    }

    pub fn namespace(&self, def: &mut TypeDef) -> Result<(), ModError> {
        let upstream = match &def.kind {
            TypeDefKind::Object(_) | TypeDefKind::Interface(_) | TypeDefKind::Enum(_) => {
                self.lookup(def)?
            }
            _ => None,
        };
        let local = upstream.is_none();

        match &mut def.kind {
            TypeDefKind::List(list) => self.namespace(&mut list.element)?,

            // Member source maps follow their owner. A definition owned by a
            // dependency keeps the maps that dependency gave it.
            TypeDefKind::Object(obj) => {
                if local {
                    obj.name = self.rename(&obj.original_name);
                    obj.source_map = self.source_map(obj.source_map.take());
                }
                for field in &mut obj.fields {
                    self.namespace(&mut field.type_def)?;
                    if local {
                        field.source_map = self.source_map(field.source_map.take());
                    }
                }
                for func in &mut obj.functions {
                    self.namespace_function(func, local)?;
                }
                if let Some(ctor) = &mut obj.constructor {
                    self.namespace_function(ctor, local)?;
                }
            }

            TypeDefKind::Interface(iface) => {
                if local {
                    iface.name = self.rename(&iface.original_name);
                    iface.source_map = self.source_map(iface.source_map.take());
                }
                for func in &mut iface.functions {
                    self.namespace_function(func, local)?;
                }
            }

            TypeDefKind::Enum(enum_def) => match upstream {
                Some(found) => {
                    if let Some(canonical) = found.type_def().as_enum() {
                        enum_def.values = canonical.values.clone();
                    }
                }
                None => {
                    enum_def.name = self.rename(&enum_def.original_name);
                    enum_def.source_map = self.source_map(enum_def.source_map.take());
                    for value in &mut enum_def.values {
                        value.source_map = self.source_map(value.source_map.take());
                    }
                }
            },

            _ => {}
        }
        Ok(())
    }

    fn namespace_function(&self, func: &mut Function, local: bool) -> Result<(), ModError> {
        self.namespace(&mut func.return_type)?;
        if local {
            func.source_map = self.source_map(func.source_map.take());
        }
        for arg in &mut func.args {
            self.namespace(&mut arg.type_def)?;
            if local {
                arg.source_map = self.source_map(arg.source_map.take());
            }
        }
        Ok(())
    }
}
