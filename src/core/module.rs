//! MW-003: User modules with copy-on-write construction, resolution, install.
//!
//! A module is grown through `with_*` builders, each returning a new module
//! and leaving the receiver untouched. Definitions added while the module has
//! a dependency set are validated; definitions added once it has a name are
//! namespaced. `finalize` re-adds every raw definition after setting both, so
//! the final module sees its definitions exactly as its dependents will.

use super::deps::ModDeps;
use super::digest::BuildDefinition;
use super::error::ModError;
use super::handle::Mod;
use super::modtype::ModType;
use super::namespace::Namespacer;
use super::schema::{InstalledKind, SchemaServer};
use super::sdk::{GeneratedCode, Runtime, Sdk, SdkConfig};
use super::source::ModuleSource;
use super::types::*;
use super::validator::Validator;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Module {
    /// Final name; empty until the module is finalized
    pub name: String,
    /// Name the module was authored under
    pub original_name: String,
    pub description: String,
    pub source: ModuleSource,
    pub sdk: Option<SdkConfig>,
    pub deps: Option<ModDeps>,
    pub runtime: Option<Runtime>,
    pub object_defs: Vec<TypeDef>,
    pub interface_defs: Vec<TypeDef>,
    pub enum_defs: Vec<TypeDef>,
}

impl Module {
    pub fn new(source: ModuleSource) -> Self {
        Self {
            name: String::new(),
            original_name: String::new(),
            description: String::new(),
            source,
            sdk: None,
            deps: None,
            runtime: None,
            object_defs: Vec::new(),
            interface_defs: Vec::new(),
            enum_defs: Vec::new(),
        }
    }

    pub fn is_finalized(&self) -> bool {
        !self.name.is_empty()
    }

    // ========================================================================
    // Builders
    // ========================================================================

    pub fn with_name(&self, name: &str) -> Self {
        let mut m = self.clone();
        m.name = name.to_string();
        m
    }

    pub fn with_original_name(&self, original_name: &str) -> Self {
        let mut m = self.clone();
        m.original_name = original_name.to_string();
        m
    }

    pub fn with_description(&self, description: &str) -> Self {
        let mut m = self.clone();
        m.description = description.trim().to_string();
        m
    }

    pub fn with_source(&self, source: ModuleSource) -> Self {
        let mut m = self.clone();
        m.source = source;
        m
    }

    pub fn with_sdk(&self, sdk: SdkConfig) -> Self {
        let mut m = self.clone();
        m.sdk = Some(sdk);
        m
    }

    pub fn with_deps(&self, deps: ModDeps) -> Self {
        let mut m = self.clone();
        m.deps = Some(deps);
        m
    }

    pub fn with_runtime(&self, runtime: Runtime) -> Self {
        let mut m = self.clone();
        m.runtime = Some(runtime);
        m
    }

    /// Copy of the module with every type definition removed.
    pub fn clone_without_defs(&self) -> Self {
        let mut m = self.clone();
        m.object_defs.clear();
        m.interface_defs.clear();
        m.enum_defs.clear();
        m
    }

    pub fn with_object(&self, def: TypeDef) -> Result<Self, ModError> {
        expect_kind(&def, "object", def.as_object().is_some())?;
        let mut m = self.clone();
        let def = m.prepare(def)?;
        m.object_defs.push(def);
        Ok(m)
    }

    pub fn with_interface(&self, def: TypeDef) -> Result<Self, ModError> {
        expect_kind(&def, "interface", def.as_interface().is_some())?;
        let mut m = self.clone();
        let def = m.prepare(def)?;
        m.interface_defs.push(def);
        Ok(m)
    }

    pub fn with_enum(&self, def: TypeDef) -> Result<Self, ModError> {
        expect_kind(&def, "enum", def.as_enum().is_some())?;
        let mut m = self.clone();
        let def = m.prepare(def)?;
        m.enum_defs.push(def);
        Ok(m)
    }

    /// Validate against the dependency set, then namespace. Modules still
    /// being assembled by an SDK have neither and take `def` as-is.
    fn prepare(&self, mut def: TypeDef) -> Result<TypeDef, ModError> {
        let type_name = def.name().unwrap_or_default().to_string();

        if let Some(deps) = &self.deps {
            Validator::new(&self.name, deps)
                .validate(&def)
                .map_err(|e| ModError::validation(&self.name, &type_name, e))?;
        }

        if self.is_finalized() {
            Namespacer::new(
                &self.name,
                &self.original_name,
                &self.source,
                self.deps.as_ref(),
            )
            .namespace(&mut def)
            .map_err(|e| ModError::namespace(&self.name, &type_name, e))?;
        }
        Ok(def)
    }

    /// Name the module, attach its dependencies and runtime, and re-add every
    /// raw definition so it is validated and namespaced against `deps`.
    pub fn finalize(
        &self,
        name: &str,
        original_name: &str,
        deps: ModDeps,
        sdk: &dyn Sdk,
    ) -> Result<Self, ModError> {
        if name.is_empty() {
            return Err(ModError::Unfinalized("finalize"));
        }
        let runtime = sdk.runtime(&deps, &self.source)?;

        let mut m = self
            .clone_without_defs()
            .with_name(name)
            .with_original_name(original_name)
            .with_deps(deps)
            .with_runtime(runtime);
        if m.sdk.is_none() {
            m = m.with_sdk(SdkConfig::new(sdk.name()));
        }

        for def in &self.object_defs {
            m = m.with_object(def.clone())?;
        }
        for def in &self.interface_defs {
            m = m.with_interface(def.clone())?;
        }
        for def in &self.enum_defs {
            m = m.with_enum(def.clone())?;
        }
        debug!(
            name,
            objects = m.object_defs.len(),
            interfaces = m.interface_defs.len(),
            enums = m.enum_defs.len(),
            "finalized module"
        );
        Ok(m)
    }

    /// Generate bindings for this module through `sdk`.
    pub fn codegen(&self, sdk: &dyn Sdk) -> Result<GeneratedCode, ModError> {
        let empty = ModDeps::default();
        sdk.codegen(self.deps.as_ref().unwrap_or(&empty), &self.source)
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Resolve `def` against this module's schema.
    pub fn mod_type_for(
        self: &Arc<Self>,
        def: &TypeDef,
        check_direct_deps: bool,
    ) -> Result<Option<ModType>, ModError> {
        Mod::User(Arc::clone(self)).mod_type_for(def, check_direct_deps)
    }

    /// Own-definition lookup by name. User modules declare no scalars.
    pub(crate) fn local_mod_type(&self, handle: &Mod, def: &TypeDef) -> Option<ModType> {
        let module = handle.clone();
        match &def.kind {
            TypeDefKind::Object(o) => self
                .object_defs
                .iter()
                .filter_map(TypeDef::as_object)
                .find(|x| x.name == o.name)
                .map(|x| ModType::Object {
                    module,
                    def: x.clone(),
                }),
            TypeDefKind::Interface(i) => self
                .interface_defs
                .iter()
                .filter_map(TypeDef::as_interface)
                .find(|x| x.name == i.name)
                .map(|x| ModType::Interface {
                    module,
                    def: x.clone(),
                }),
            TypeDefKind::Enum(e) => self
                .enum_defs
                .iter()
                .filter_map(TypeDef::as_enum)
                .find(|x| x.name == e.name)
                .map(|x| ModType::Enum {
                    module,
                    def: x.clone(),
                }),
            _ => None,
        }
    }

    // ========================================================================
    // Install
    // ========================================================================

    /// Publish objects, then interfaces, then enums into `server`.
    ///
    /// Nothing is published if any object or interface is already provided
    /// by a dependency, or if any name would clash in `server`.
    pub fn install(&self, server: &mut SchemaServer) -> Result<(), ModError> {
        if !self.is_finalized() {
            return Err(ModError::Unfinalized("install"));
        }
        debug!(name = %self.name, "installing module");
        let start = Instant::now();

        if let Some(deps) = &self.deps {
            for def in self.object_defs.iter().chain(&self.interface_defs) {
                if let Some(found) = deps.mod_type_for(def)? {
                    return Err(ModError::Conflict {
                        type_name: def.name().unwrap_or_default().to_string(),
                        module: found
                            .source_mod()
                            .map(|m| m.name().to_string())
                            .unwrap_or_default(),
                    });
                }
            }
        }

        self.check_installable(server)?;

        for obj in self.object_defs.iter().filter_map(TypeDef::as_object) {
            debug!(name = %self.name, object = %obj.name, "installing object");
            server.install_object(&self.name, obj)?;
        }
        for iface in self.interface_defs.iter().filter_map(TypeDef::as_interface) {
            debug!(name = %self.name, interface = %iface.name, "installing interface");
            server.install_interface(&self.name, iface)?;
        }
        for enum_def in self.enum_defs.iter().filter_map(TypeDef::as_enum) {
            debug!(
                name = %self.name,
                enum_name = %enum_def.name,
                values = enum_def.values.len(),
                "installing enum"
            );
            server.install_enum(&self.name, enum_def)?;
        }

        debug!(name = %self.name, took = ?start.elapsed(), "done installing module");
        Ok(())
    }

    /// Every name this module publishes, checked against `server` and
    /// against the module's own other definitions.
    fn check_installable(&self, server: &SchemaServer) -> Result<(), ModError> {
        let staged = self
            .object_defs
            .iter()
            .filter_map(TypeDef::as_object)
            .map(|o| (InstalledKind::Object, o.name.as_str()))
            .chain(
                self.interface_defs
                    .iter()
                    .filter_map(TypeDef::as_interface)
                    .map(|i| (InstalledKind::Interface, i.name.as_str())),
            )
            .chain(
                self.enum_defs
                    .iter()
                    .filter_map(TypeDef::as_enum)
                    .map(|e| (InstalledKind::Enum, e.name.as_str())),
            );

        let mut claimed: HashMap<&str, InstalledKind> = HashMap::new();
        for (kind, type_name) in staged {
            server.check_available(kind, &self.name, type_name)?;
            match claimed.insert(type_name, kind) {
                Some(prev) if !(prev == kind && kind.is_idempotent()) => {
                    return Err(ModError::DuplicateType {
                        kind: kind.label(),
                        type_name: type_name.to_string(),
                        existing: self.name.clone(),
                        module: self.name.clone(),
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// This module's own definitions tagged with their source module.
    ///
    /// Where the server holds an installed copy owned by this module, that
    /// copy is returned in place of the local one.
    pub fn type_defs(&self, server: &SchemaServer) -> Result<Vec<TypeDef>, ModError> {
        let all = self
            .object_defs
            .iter()
            .chain(&self.interface_defs)
            .chain(&self.enum_defs);

        let mut defs = Vec::with_capacity(
            self.object_defs.len() + self.interface_defs.len() + self.enum_defs.len(),
        );
        for def in all {
            let installed = def
                .name()
                .and_then(|name| server.owned_by(&self.name, name));
            let mut def = match installed {
                Some(t) => (*t.def).clone(),
                None => def.clone(),
            };
            def.set_source_module_name(&self.name);
            defs.push(def);
        }
        Ok(defs)
    }

    /// Content-addressed build steps: the source's, then the runtime's.
    pub fn build_definitions(&self) -> Vec<BuildDefinition> {
        let mut defs = self.source.build_definitions();
        if let Some(runtime) = &self.runtime {
            defs.extend(runtime.build_definitions());
        }
        defs
    }
}

fn expect_kind(def: &TypeDef, expected: &'static str, ok: bool) -> Result<(), ModError> {
    if ok {
        return Ok(());
    }
    Err(ModError::KindMismatch {
        expected,
        actual: def.kind.label(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builtin::CoreModule;
    use crate::core::sdk::ManifestSdk;

    fn core() -> Mod {
        Mod::Core(Arc::new(CoreModule::builtin()))
    }

    fn src(subpath: &str) -> ModuleSource {
        ModuleSource::local("/work", subpath)
    }

    fn sdk() -> ManifestSdk {
        ManifestSdk::new("go", None, &[])
    }

    fn greeter() -> TypeDef {
        TypeDef::object(
            ObjectTypeDef::new("Greeter").with_function(
                Function::new("hello", TypeDef::string())
                    .with_arg(FunctionArg::new("name", TypeDef::string())),
            ),
        )
    }

    fn greet_module() -> Arc<Module> {
        let raw = Module::new(src("greet")).with_object(greeter()).unwrap();
        Arc::new(
            raw.finalize("greet", "greet", ModDeps::new(vec![core()]), &sdk())
                .unwrap(),
        )
    }

    #[test]
    fn test_mw003_builders_are_copy_on_write() {
        let base = Module::new(src("m")).with_name("m");
        let grown = base
            .with_object(TypeDef::object(ObjectTypeDef::new("Thing")))
            .unwrap();
        assert!(base.object_defs.is_empty());
        assert_eq!(grown.object_defs.len(), 1);

        let described = grown.with_description("  a module \n");
        assert_eq!(described.description, "a module");
        assert_eq!(grown.description, "");
    }

    #[test]
    fn test_mw003_clone_independence() {
        let original = Module::new(src("m"))
            .with_object(TypeDef::object(ObjectTypeDef::new("One")))
            .unwrap();
        let copy = original.clone();
        let copy = copy
            .with_object(TypeDef::object(ObjectTypeDef::new("Two")))
            .unwrap();
        assert_eq!(original.object_defs.len(), 1);
        assert_eq!(copy.object_defs.len(), 2);
        assert!(original.clone_without_defs().object_defs.is_empty());
    }

    #[test]
    fn test_mw003_kind_mismatch() {
        let m = Module::new(src("m"));
        let err = m.with_object(TypeDef::enum_ref("Color")).unwrap_err();
        assert_eq!(
            err,
            ModError::KindMismatch {
                expected: "object",
                actual: "enum"
            }
        );
        assert!(m.with_enum(TypeDef::object_ref("X")).is_err());
        assert!(m.with_interface(TypeDef::string()).is_err());
    }

    #[test]
    fn test_mw003_raw_module_skips_validation_and_namespacing() {
        let raw = Module::new(src("m"))
            .with_object(TypeDef::object(
                ObjectTypeDef::new("Thing").with_field(FieldTypeDef::new("id", TypeDef::string())),
            ))
            .unwrap();
        assert_eq!(raw.object_defs[0].name(), Some("Thing"));
    }

    #[test]
    fn test_mw003_reserved_names_rejected_on_finalized_module() {
        let m = Module::new(src("m"))
            .with_name("m")
            .with_deps(ModDeps::new(vec![core()]));
        for name in ["id", "ID", "Id"] {
            let field = TypeDef::object(
                ObjectTypeDef::new("Thing").with_field(FieldTypeDef::new(name, TypeDef::string())),
            );
            let err = m.with_object(field).unwrap_err();
            assert!(matches!(err.root_cause(), ModError::ReservedName { member_kind: "field", .. }));
            assert!(err.to_string().contains("\"Thing\""));

            let func = TypeDef::object(
                ObjectTypeDef::new("Thing").with_function(Function::new(name, TypeDef::string())),
            );
            let err = m.with_object(func).unwrap_err();
            assert!(matches!(
                err.root_cause(),
                ModError::ReservedName { member_kind: "function", .. }
            ));

            let iface = TypeDef::interface(
                InterfaceTypeDef::new("Api").with_function(Function::new(name, TypeDef::string())),
            );
            let err = m.with_interface(iface).unwrap_err();
            assert!(matches!(
                err.root_cause(),
                ModError::ReservedName { owner_kind: "interface", .. }
            ));
        }
    }

    #[test]
    fn test_mw003_end_to_end_greet() {
        let greet = greet_module();
        assert_eq!(greet.object_defs[0].name(), Some("Greeter"));

        let mut server = SchemaServer::new();
        CoreModule::builtin().install(&mut server).unwrap();
        greet.install(&mut server).unwrap();
        assert_eq!(server.get("Greeter").unwrap().module, "greet");

        let app = Module::new(src("app"))
            .finalize(
                "app",
                "app",
                ModDeps::new(vec![core(), Mod::User(greet.clone())]),
                &sdk(),
            )
            .unwrap();
        let app = Arc::new(app);
        let t = app
            .mod_type_for(&TypeDef::object_ref("Greeter"), true)
            .unwrap()
            .unwrap();
        assert_eq!(t.kind_label(), "object");
        assert_eq!(t.source_mod().unwrap().name(), "greet");

        // Without consulting deps the app module has no Greeter of its own.
        assert!(app
            .mod_type_for(&TypeDef::object_ref("Greeter"), false)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_mw003_cross_module_leak_rejected() {
        let a = Module::new(src("a"))
            .with_object(TypeDef::object(ObjectTypeDef::new("Foo")))
            .unwrap()
            .finalize("a", "a", ModDeps::new(vec![core()]), &sdk())
            .unwrap();
        let a = Arc::new(a);
        assert_eq!(a.object_defs[0].name(), Some("AFoo"));

        let b = Module::new(src("b"))
            .with_object(TypeDef::object(
                ObjectTypeDef::new("Bar")
                    .with_field(FieldTypeDef::new("foo", TypeDef::object_ref("AFoo"))),
            ))
            .unwrap();
        let err = b
            .finalize("b", "b", ModDeps::new(vec![core(), Mod::User(a)]), &sdk())
            .unwrap_err();
        match err.root_cause() {
            ModError::ExternalTypeLeak {
                type_name, module, ..
            } => {
                assert_eq!(type_name, "AFoo");
                assert_eq!(module, "a");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_mw003_install_conflict_is_atomic() {
        let greet = greet_module();
        // A module that re-declares greet's object after the fact.
        let dup = Module::new(src("dup"))
            .with_name("dup")
            .with_object(TypeDef::object(ObjectTypeDef::new("Local")))
            .unwrap()
            .with_deps(ModDeps::new(vec![core(), Mod::User(greet.clone())]));
        let mut dup = dup;
        dup.object_defs.push(greeter());

        let mut server = SchemaServer::new();
        let err = dup.install(&mut server).unwrap_err();
        assert_eq!(
            err,
            ModError::Conflict {
                type_name: "Greeter".to_string(),
                module: "greet".to_string(),
            }
        );
        // Pre-check runs before anything is published.
        assert!(server.is_empty());
    }

    #[test]
    fn test_mw003_install_requires_name() {
        let mut server = SchemaServer::new();
        let err = Module::new(src("m")).install(&mut server).unwrap_err();
        assert_eq!(err, ModError::Unfinalized("install"));
    }

    #[test]
    fn test_mw003_dual_ownership_enum() {
        let lib = Arc::new(
            Module::new(src("lib"))
                .with_enum(TypeDef::enumeration(
                    EnumTypeDef::new("Mode")
                        .with_value(EnumValueTypeDef::new("FAST"))
                        .with_value(EnumValueTypeDef::new("SAFE")),
                ))
                .unwrap()
                .finalize("lib", "lib", ModDeps::new(vec![core()]), &sdk())
                .unwrap(),
        );

        // app also carries LibMode, with a stale value list.
        let app = Module::new(src("app"))
            .with_enum(TypeDef::enumeration(
                EnumTypeDef::new("LibMode").with_value(EnumValueTypeDef::new("SLOW")),
            ))
            .unwrap()
            .finalize(
                "app",
                "app",
                ModDeps::new(vec![core(), Mod::User(lib.clone())]),
                &sdk(),
            )
            .unwrap();
        let app_enum = app.enum_defs[0].as_enum().unwrap();
        assert_eq!(app_enum.name, "LibMode");
        assert_eq!(app_enum.value_names(), vec!["FAST", "SAFE"]);

        let mut server = SchemaServer::new();
        lib.install(&mut server).unwrap();
        app.install(&mut server).unwrap();
        assert_eq!(server.get("LibMode").unwrap().module, "lib");
    }

    #[test]
    fn test_mw003_type_defs_prefer_installed_copy() {
        let greet = greet_module();
        let before = greet.type_defs(&SchemaServer::new()).unwrap();
        assert_eq!(
            before[0].as_object().unwrap().source_module_name.as_deref(),
            Some("greet")
        );

        let mut server = SchemaServer::new();
        greet.install(&mut server).unwrap();
        let after = greet.type_defs(&server).unwrap();
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].name(), Some("Greeter"));
        assert_eq!(
            after[0].as_object().unwrap().source_module_name.as_deref(),
            Some("greet")
        );
    }

    #[test]
    fn test_mw003_build_definitions_source_then_runtime() {
        let greet = greet_module();
        let defs = greet.build_definitions();
        let ops: Vec<&str> = defs.iter().map(|d| d.op.as_str()).collect();
        assert_eq!(ops, vec!["local", "runtime"]);

        let raw = Module::new(src("greet"));
        assert_eq!(raw.build_definitions().len(), 1);
    }

    #[test]
    fn test_mw003_finalize_namespaces_and_maps() {
        let raw = Module::new(src("mods/app"))
            .with_object(TypeDef::object(
                ObjectTypeDef::new("Config").with_source_map(SourceMap::new("main.go", 10, 1)),
            ))
            .unwrap();
        let m = raw
            .finalize("app", "app", ModDeps::new(vec![core()]), &sdk())
            .unwrap();
        let obj = m.object_defs[0].as_object().unwrap();
        assert_eq!(obj.name, "AppConfig");
        assert_eq!(obj.source_map.as_ref().unwrap().filename, "mods/app/main.go");
        assert_eq!(m.sdk.as_ref().unwrap().source, "go");
        assert!(m.runtime.is_some());
        // raw definitions are left as they were
        assert_eq!(raw.object_defs[0].name(), Some("Config"));
    }

    #[test]
    fn test_mw003_installed_module_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Module>();
        assert_send_sync::<Mod>();
    }

    fn finalized(name: &str, raw: Module) -> Module {
        raw.finalize(name, name, ModDeps::new(vec![core()]), &sdk())
            .unwrap()
    }

    #[test]
    fn test_mw003_namespace_collision_publishes_nothing() {
        // "a" + "BFoo" and "a-b" + "Foo" both namespace to ABFoo.
        let a = finalized(
            "a",
            Module::new(src("a"))
                .with_object(TypeDef::object(ObjectTypeDef::new("BFoo")))
                .unwrap(),
        );
        let ab = finalized(
            "a-b",
            Module::new(src("a-b"))
                .with_object(TypeDef::object(ObjectTypeDef::new("Bar")))
                .unwrap()
                .with_object(TypeDef::object(ObjectTypeDef::new("Foo")))
                .unwrap(),
        );
        assert_eq!(ab.object_defs[1].name(), Some("ABFoo"));

        let mut server = SchemaServer::new();
        a.install(&mut server).unwrap();
        let err = ab.install(&mut server).unwrap_err();
        assert!(matches!(
            err,
            ModError::DuplicateType { ref type_name, ref existing, ref module, .. }
                if type_name == "ABFoo" && existing == "a" && module == "a-b"
        ));
        assert_eq!(server.len(), 1);
        assert!(!server.contains("ABBar"));
    }

    #[test]
    fn test_mw003_object_and_enum_sharing_a_name_publish_nothing() {
        let m = finalized(
            "m",
            Module::new(src("m"))
                .with_object(TypeDef::object(ObjectTypeDef::new("Thing")))
                .unwrap()
                .with_object(TypeDef::object(ObjectTypeDef::new("Other")))
                .unwrap()
                .with_enum(TypeDef::enumeration(
                    EnumTypeDef::new("Thing").with_value(EnumValueTypeDef::new("ON")),
                ))
                .unwrap(),
        );
        let mut server = SchemaServer::new();
        let err = m.install(&mut server).unwrap_err();
        assert!(matches!(
            err,
            ModError::DuplicateType { kind: "enum", ref type_name, .. } if type_name == "MThing"
        ));
        assert!(server.is_empty());
    }

    #[test]
    fn test_mw003_install_order_objects_interfaces_enums() {
        let m = finalized(
            "m",
            Module::new(src("m"))
                .with_enum(TypeDef::enumeration(
                    EnumTypeDef::new("Level").with_value(EnumValueTypeDef::new("ON")),
                ))
                .unwrap()
                .with_interface(TypeDef::interface(InterfaceTypeDef::new("Api")))
                .unwrap()
                .with_object(TypeDef::object(ObjectTypeDef::new("Thing")))
                .unwrap(),
        );
        let mut server = SchemaServer::new();
        m.install(&mut server).unwrap();
        let installed: Vec<(&str, &str)> = server
            .iter()
            .map(|(name, t)| (name, t.kind.label()))
            .collect();
        assert_eq!(
            installed,
            vec![
                ("MThing", "object"),
                ("MApi", "interface"),
                ("MLevel", "enum"),
            ]
        );
    }

    #[test]
    fn test_mw003_scalars_resolve_only_through_deps() {
        let greet = greet_module();
        let platform = TypeDef::scalar_ref("Platform");
        assert!(greet.mod_type_for(&platform, false).unwrap().is_none());

        let found = greet.mod_type_for(&platform, true).unwrap().unwrap();
        assert_eq!(found.kind_label(), "scalar");
        assert!(found.source_mod().unwrap().is_core());
    }
}
