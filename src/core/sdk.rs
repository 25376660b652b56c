//! MW-012: SDK contract and the built-in manifest SDK.
//!
//! An SDK turns a module source plus its dependency view into generated
//! bindings and a runtime. Both are requested while finalizing a module,
//! before any of its type definitions are validated or namespaced.

use super::deps::ModDeps;
use super::digest::{composite_hash, BuildDefinition};
use super::error::ModError;
use super::schema::SchemaServer;
use super::source::{join_subpath, ModuleSource};
use serde::{Deserialize, Serialize};

/// Which SDK a module was authored with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkConfig {
    pub source: String,
}

impl SdkConfig {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
        }
    }
}

/// The container a module's code executes in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Runtime {
    pub image: String,
    pub entrypoint: Vec<String>,
    /// Content address of everything the runtime was derived from
    pub digest: String,
}

impl Runtime {
    pub fn build_definitions(&self) -> Vec<BuildDefinition> {
        vec![BuildDefinition {
            op: "runtime".to_string(),
            digest: self.digest.clone(),
        }]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFile {
    pub path: String,
    pub contents: String,
}

/// Output of an SDK's code generation step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeneratedCode {
    pub files: Vec<GeneratedFile>,
    /// Paths to mark as generated in version control
    pub vcs_generated_paths: Vec<String>,
    /// Paths version control should ignore
    pub vcs_ignored_paths: Vec<String>,
}

pub trait Sdk {
    fn name(&self) -> &str;

    /// Generate bindings for `source` against its dependencies.
    fn codegen(&self, deps: &ModDeps, source: &ModuleSource) -> Result<GeneratedCode, ModError>;

    /// The runtime that will execute `source`.
    fn runtime(&self, deps: &ModDeps, source: &ModuleSource) -> Result<Runtime, ModError>;
}

// ============================================================================
// ManifestSdk
// ============================================================================

const DEFAULT_IMAGES: &[(&str, &str)] = &[
    ("go", "golang:1.23-alpine"),
    ("python", "python:3.12-slim"),
    ("typescript", "node:22-alpine"),
];

const DEFAULT_ENTRYPOINT: &str = "/runtime";

pub const BINDINGS_FILE: &str = "modweave.gen.yaml";

/// The built-in SDK: runtime comes from the manifest, codegen lists the
/// dependency types a module can call.
#[derive(Debug, Clone)]
pub struct ManifestSdk {
    name: String,
    image: Option<String>,
    entrypoint: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Bindings<'a> {
    source: &'a str,
    dependencies: Vec<DependencyBindings>,
}

#[derive(Debug, Serialize)]
struct DependencyBindings {
    module: String,
    types: Vec<String>,
}

impl ManifestSdk {
    pub fn new(name: &str, image: Option<&str>, entrypoint: &[String]) -> Self {
        Self {
            name: name.to_string(),
            image: image.map(str::to_string),
            entrypoint: entrypoint.to_vec(),
        }
    }

    /// Default runtime image for a well-known SDK name.
    pub fn default_image(name: &str) -> Option<&'static str> {
        DEFAULT_IMAGES
            .iter()
            .find(|(sdk, _)| *sdk == name)
            .map(|(_, image)| *image)
    }

    fn image(&self, source: &ModuleSource) -> Result<String, ModError> {
        if let Some(image) = &self.image {
            return Ok(image.clone());
        }
        Self::default_image(&self.name)
            .map(str::to_string)
            .ok_or_else(|| ModError::Sdk {
                sdk: self.name.clone(),
                module: source.reference().reference,
                message: "unknown sdk and no runtime image declared".to_string(),
            })
    }
}

impl Sdk for ManifestSdk {
    fn name(&self) -> &str {
        &self.name
    }

    fn codegen(&self, deps: &ModDeps, source: &ModuleSource) -> Result<GeneratedCode, ModError> {
        let reference = source.reference().reference;
        let empty = SchemaServer::new();
        let mut dependencies = Vec::with_capacity(deps.len());
        for module in deps.mods() {
            let types = module
                .type_defs(&empty)?
                .iter()
                .filter_map(|def| def.name().map(|n| format!("{} {}", def.kind.label(), n)))
                .collect();
            dependencies.push(DependencyBindings {
                module: module.name().to_string(),
                types,
            });
        }

        let bindings = Bindings {
            source: &reference,
            dependencies,
        };
        let body = serde_yaml_ng::to_string(&bindings).map_err(|e| ModError::Sdk {
            sdk: self.name.clone(),
            module: reference.clone(),
            message: format!("cannot render bindings: {}", e),
        })?;

        let path = join_subpath(source.subpath(), BINDINGS_FILE);
        Ok(GeneratedCode {
            files: vec![GeneratedFile {
                path: path.clone(),
                contents: format!("# generated by modweave; do not edit\n{}", body),
            }],
            vcs_generated_paths: vec![path],
            vcs_ignored_paths: Vec::new(),
        })
    }

    fn runtime(&self, deps: &ModDeps, source: &ModuleSource) -> Result<Runtime, ModError> {
        let image = self.image(source)?;
        let entrypoint = if self.entrypoint.is_empty() {
            vec![DEFAULT_ENTRYPOINT.to_string()]
        } else {
            self.entrypoint.clone()
        };

        let reference = source.reference();
        let joined = entrypoint.join(" ");
        let mut components = vec![
            self.name.as_str(),
            image.as_str(),
            joined.as_str(),
            reference.reference.as_str(),
            reference.pin.as_str(),
        ];
        components.extend(deps.mods().iter().map(|m| m.name()));

        Ok(Runtime {
            digest: composite_hash(&components),
            image,
            entrypoint,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builtin::CoreModule;
    use crate::core::handle::Mod;
    use std::sync::Arc;

    fn core_deps() -> ModDeps {
        ModDeps::new(vec![Mod::Core(Arc::new(CoreModule::builtin()))])
    }

    #[test]
    fn test_mw012_default_runtime_image() {
        let sdk = ManifestSdk::new("python", None, &[]);
        let rt = sdk
            .runtime(&core_deps(), &ModuleSource::local("/w", "m"))
            .unwrap();
        assert_eq!(rt.image, "python:3.12-slim");
        assert_eq!(rt.entrypoint, vec!["/runtime"]);
        assert!(rt.digest.starts_with("blake3:"));
    }

    #[test]
    fn test_mw012_unknown_sdk_needs_image() {
        let sdk = ManifestSdk::new("cobol", None, &[]);
        let err = sdk
            .runtime(&core_deps(), &ModuleSource::local("/w", "m"))
            .unwrap_err();
        assert!(matches!(err, ModError::Sdk { ref sdk, .. } if sdk == "cobol"));

        let sdk = ManifestSdk::new("cobol", Some("cobol:latest"), &["run".to_string()]);
        let rt = sdk
            .runtime(&core_deps(), &ModuleSource::local("/w", "m"))
            .unwrap();
        assert_eq!(rt.image, "cobol:latest");
        assert_eq!(rt.entrypoint, vec!["run"]);
    }

    #[test]
    fn test_mw012_runtime_digest_tracks_deps() {
        let sdk = ManifestSdk::new("go", None, &[]);
        let src = ModuleSource::local("/w", "m");
        let a = sdk.runtime(&ModDeps::default(), &src).unwrap();
        let b = sdk.runtime(&core_deps(), &src).unwrap();
        assert_ne!(a.digest, b.digest);
        assert_eq!(a, sdk.runtime(&ModDeps::default(), &src).unwrap());
    }

    #[test]
    fn test_mw012_codegen_lists_dependency_types() {
        let sdk = ManifestSdk::new("go", None, &[]);
        let code = sdk
            .codegen(&core_deps(), &ModuleSource::local("/w", "greet"))
            .unwrap();
        assert_eq!(code.files.len(), 1);
        let file = &code.files[0];
        assert_eq!(file.path, "greet/modweave.gen.yaml");
        assert!(file.contents.contains("module: core"));
        assert!(file.contents.contains("object Container"));
        assert!(file.contents.contains("scalar Platform"));
        assert_eq!(code.vcs_generated_paths, vec![file.path.clone()]);
    }
}
