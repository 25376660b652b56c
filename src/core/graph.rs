//! MW-018: Module graph, a manifest loaded into finalized modules.
//!
//! Modules are finalized in install order, so each one is validated and
//! namespaced against dependencies that are already complete. The core
//! module heads every dependency set.

use super::builtin::{CoreModule, CORE_MODULE_NAME};
use super::deps::ModDeps;
use super::error::ModError;
use super::handle::Mod;
use super::manifest::Manifest;
use super::modtype::ModType;
use super::module::Module;
use super::naming::to_camel;
use super::parser::{module_defs, parse_manifest_file, parse_type_ref, validate_manifest, NamedKind};
use super::resolver::install_order;
use super::schema::SchemaServer;
use super::sdk::{GeneratedCode, ManifestSdk, SdkConfig};
use super::source::ModuleSource;
use super::types::TypeDef;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[derive(Debug)]
pub struct ModuleGraph {
    core: Arc<CoreModule>,
    /// Finalized modules in install order
    modules: IndexMap<String, Arc<Module>>,
    sdks: HashMap<String, ManifestSdk>,
}

impl ModuleGraph {
    /// Load a manifest file; local sources resolve against its directory.
    pub fn load_file(path: &Path) -> Result<Self, ModError> {
        let manifest = parse_manifest_file(path)?;
        let context_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        Self::load(&manifest, context_dir)
    }

    pub fn load(manifest: &Manifest, context_dir: &Path) -> Result<Self, ModError> {
        let errors = validate_manifest(manifest);
        if !errors.is_empty() {
            let messages: Vec<String> = errors.iter().map(|e| e.message.clone()).collect();
            return Err(ModError::Manifest(messages.join("; ")));
        }
        let order = install_order(manifest)?;

        let core = Arc::new(CoreModule::builtin());
        let mut modules: IndexMap<String, Arc<Module>> = IndexMap::new();
        let mut sdks = HashMap::new();

        for name in &order {
            let spec = manifest
                .modules
                .get(name)
                .ok_or_else(|| ModError::Manifest(format!("unknown module '{}'", name)))?;

            let source = ModuleSource::parse(&spec.source, spec.pin.as_deref(), context_dir);
            let mut module = Module::new(source).with_sdk(SdkConfig::new(&spec.sdk));
            if let Some(description) = &spec.description {
                module = module.with_description(description);
            }
            let raw = module_defs(manifest, name, &core)?;
            for def in raw.objects {
                module = module.with_object(def)?;
            }
            for def in raw.interfaces {
                module = module.with_interface(def)?;
            }
            for def in raw.enums {
                module = module.with_enum(def)?;
            }

            let mut deps = ModDeps::new(vec![Mod::Core(Arc::clone(&core))]);
            for dep in &spec.dependencies {
                let loaded = modules.get(dep).ok_or_else(|| ModError::UnknownDependency {
                    module: name.clone(),
                    dependency: dep.clone(),
                })?;
                deps = deps.append(Mod::User(Arc::clone(loaded)));
            }

            let sdk = match &spec.runtime {
                Some(rt) => ManifestSdk::new(&spec.sdk, Some(rt.image.as_str()), &rt.entrypoint),
                None => ManifestSdk::new(&spec.sdk, None, &[]),
            };
            let module = module.finalize(name, spec.original_name(name), deps, &sdk)?;
            info!(
                module = %name,
                source = module.source.kind_label(),
                sdk = %spec.sdk,
                dependencies = spec.dependencies.len(),
                "loaded module"
            );
            modules.insert(name.clone(), Arc::new(module));
            sdks.insert(name.clone(), sdk);
        }

        info!(workspace = %manifest.name, modules = modules.len(), "module graph loaded");
        Ok(Self {
            core,
            modules,
            sdks,
        })
    }

    pub fn core(&self) -> &Arc<CoreModule> {
        &self.core
    }

    /// Module names in install order.
    pub fn order(&self) -> Vec<&str> {
        self.modules.keys().map(String::as_str).collect()
    }

    pub fn modules(&self) -> impl Iterator<Item = &Arc<Module>> {
        self.modules.values()
    }

    pub fn module(&self, name: &str) -> Result<&Arc<Module>, ModError> {
        self.modules
            .get(name)
            .ok_or_else(|| ModError::Manifest(format!("unknown module '{}'", name)))
    }

    /// Handle for `name`; `core` names the built-in module.
    pub fn get(&self, name: &str) -> Option<Mod> {
        if name == CORE_MODULE_NAME {
            return Some(Mod::Core(Arc::clone(&self.core)));
        }
        self.modules.get(name).map(|m| Mod::User(Arc::clone(m)))
    }

    /// Install core, then every module in order, into a fresh schema server.
    pub fn install(&self) -> Result<SchemaServer, ModError> {
        let mut server = SchemaServer::new();
        self.core.install(&mut server)?;
        for module in self.modules.values() {
            module.install(&mut server)?;
        }
        info!(types = server.len(), modules = self.modules.len() + 1, "installed schema");
        Ok(server)
    }

    /// Resolve a compact type reference as seen from `module`, dependencies
    /// first. An unknown type name is a miss, not an error.
    pub fn resolve_ref(&self, module: &str, text: &str) -> Result<Option<ModType>, ModError> {
        let handle = self
            .get(module)
            .ok_or_else(|| ModError::Manifest(format!("unknown module '{}'", module)))?;

        // A reference names at most one type, so it is resolved up front and
        // any lookup error surfaces here instead of reading as a miss.
        let leaf =
            text.trim_matches(|c: char| c == '[' || c == ']' || c == '?' || c.is_whitespace());
        let resolved = match find_named(&handle, leaf)? {
            Some(hit) => Some(hit),
            None => find_named(&handle, &to_camel(leaf))?,
        };
        let lookup = |name: &str| {
            resolved
                .clone()
                .filter(|_| name == leaf)
                .or_else(|| Some((name.to_string(), NamedKind::Object)))
        };
        let def: TypeDef = parse_type_ref(text, &lookup).map_err(ModError::Manifest)?;
        handle.mod_type_for(&def, true)
    }

    /// Bindings for `module` from the SDK it declares.
    pub fn codegen(&self, module: &str) -> Result<GeneratedCode, ModError> {
        let m = self.module(module)?;
        let sdk = self
            .sdks
            .get(module)
            .ok_or_else(|| ModError::Manifest(format!("no sdk for module '{}'", module)))?;
        m.codegen(sdk)
    }
}

/// Canonical spelling and kind of `name` as seen from `handle`.
fn find_named(handle: &Mod, name: &str) -> Result<Option<(String, NamedKind)>, ModError> {
    if name.is_empty() {
        return Ok(None);
    }
    for kind in NamedKind::ALL {
        if let Some(found) = handle.mod_type_for(&kind.reference(name), true)? {
            if let Some(canonical) = found.type_def().name() {
                return Ok(Some((canonical.to_string(), kind)));
            }
        }
    }
    Ok(None)
}
