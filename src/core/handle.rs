//! MW-005: Module handles, the capability surface every module exposes to
//! the engine, over the closed set of module kinds (built-in core, user).

use super::builtin::{CoreModule, CORE_MODULE_NAME};
use super::deps::ModDeps;
use super::error::ModError;
use super::modtype::{self, ModType};
use super::module::Module;
use super::schema::SchemaServer;
use super::source::ModuleSource;
use super::types::TypeDef;
use std::fmt;
use std::sync::Arc;

/// A shared, read-only reference to a finalized module.
#[derive(Clone)]
pub enum Mod {
    Core(Arc<CoreModule>),
    User(Arc<Module>),
}

impl Mod {
    pub fn name(&self) -> &str {
        match self {
            Self::Core(_) => CORE_MODULE_NAME,
            Self::User(m) => &m.name,
        }
    }

    pub fn is_core(&self) -> bool {
        matches!(self, Self::Core(_))
    }

    /// Name of the module's projection of its schema. No module kind
    /// currently defines one.
    pub fn view(&self) -> Option<&str> {
        None
    }

    pub fn source(&self) -> Option<&ModuleSource> {
        match self {
            Self::Core(_) => None,
            Self::User(m) => Some(&m.source),
        }
    }

    pub fn direct_deps(&self) -> Option<&ModDeps> {
        match self {
            Self::Core(_) => None,
            Self::User(m) => m.deps.as_ref(),
        }
    }

    /// Resolve a type definition against this module's schema.
    ///
    /// `Ok(None)` means "no such type here" and is not an error.
    pub fn mod_type_for(
        &self,
        def: &TypeDef,
        check_direct_deps: bool,
    ) -> Result<Option<ModType>, ModError> {
        modtype::resolve(self, self.direct_deps(), def, check_direct_deps)
    }

    /// Look up `def` among this module's own definitions only.
    pub(crate) fn local_mod_type(&self, def: &TypeDef) -> Option<ModType> {
        match self {
            Self::Core(core) => core.local_mod_type(self, def),
            Self::User(module) => module.local_mod_type(self, def),
        }
    }

    pub fn install(&self, server: &mut SchemaServer) -> Result<(), ModError> {
        match self {
            Self::Core(core) => core.install(server),
            Self::User(module) => module.install(server),
        }
    }

    pub fn type_defs(&self, server: &SchemaServer) -> Result<Vec<TypeDef>, ModError> {
        match self {
            Self::Core(core) => Ok(core.type_defs()),
            Self::User(module) => module.type_defs(server),
        }
    }
}

impl fmt::Debug for Mod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Core(_) => write!(f, "Mod::Core"),
            Self::User(m) => write!(f, "Mod::User({})", m.name),
        }
    }
}

impl PartialEq for Mod {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Core(a), Self::Core(b)) => Arc::ptr_eq(a, b),
            (Self::User(a), Self::User(b)) => Arc::ptr_eq(a, b) || a.name == b.name,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::source::ModuleSource;

    #[test]
    fn test_mw005_core_identity() {
        let core = Mod::Core(Arc::new(CoreModule::builtin()));
        assert_eq!(core.name(), "core");
        assert!(core.is_core());
        assert!(core.source().is_none());
        assert!(core.view().is_none());
    }

    #[test]
    fn test_mw005_user_identity() {
        let module = Module::new(ModuleSource::local("/work", "greet")).with_name("greet");
        let handle = Mod::User(Arc::new(module));
        assert_eq!(handle.name(), "greet");
        assert!(!handle.is_core());
        assert!(handle.source().is_some());
        assert!(handle.direct_deps().is_none());
        assert_eq!(format!("{:?}", handle), "Mod::User(greet)");
    }

    #[test]
    fn test_mw005_user_equality_by_name() {
        let a = Mod::User(Arc::new(Module::new(ModuleSource::local("/w", "a")).with_name("a")));
        let a2 = Mod::User(Arc::new(Module::new(ModuleSource::local("/w", "a")).with_name("a")));
        let b = Mod::User(Arc::new(Module::new(ModuleSource::local("/w", "b")).with_name("b")));
        assert_eq!(a, a2);
        assert_ne!(a, b);
        assert_ne!(a, Mod::Core(Arc::new(CoreModule::builtin())));
    }
}
