//! MW-009: The built-in core module.
//!
//! Engine-provided types every user module may reference freely. Core is
//! always the first dependency the graph loader hands a user module.

use super::error::ModError;
use super::handle::Mod;
use super::modtype::ModType;
use super::schema::SchemaServer;
use super::types::*;
use tracing::debug;

pub const CORE_MODULE_NAME: &str = "core";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoreModule {
    pub objects: Vec<ObjectTypeDef>,
    pub interfaces: Vec<InterfaceTypeDef>,
    pub enums: Vec<EnumTypeDef>,
    pub scalars: Vec<ScalarTypeDef>,
}

impl CoreModule {
    /// The engine's standard core surface.
    pub fn builtin() -> Self {
        let container = ObjectTypeDef::new("Container")
            .with_description("An OCI-compatible container.")
            .with_function(
                Function::new("withExec", TypeDef::object_ref("Container"))
                    .with_arg(FunctionArg::new("args", TypeDef::list(TypeDef::string()))),
            )
            .with_function(
                Function::new("directory", TypeDef::object_ref("Directory"))
                    .with_arg(FunctionArg::new("path", TypeDef::string())),
            )
            .with_function(
                Function::new("file", TypeDef::object_ref("File"))
                    .with_arg(FunctionArg::new("path", TypeDef::string())),
            )
            .with_function(Function::new("stdout", TypeDef::string()))
            .with_function(Function::new("platform", TypeDef::scalar_ref("Platform")));

        let directory = ObjectTypeDef::new("Directory")
            .with_description("A directory.")
            .with_function(Function::new("entries", TypeDef::list(TypeDef::string())))
            .with_function(
                Function::new("file", TypeDef::object_ref("File"))
                    .with_arg(FunctionArg::new("path", TypeDef::string())),
            );

        let file = ObjectTypeDef::new("File")
            .with_description("A file.")
            .with_function(Function::new("contents", TypeDef::string()))
            .with_function(Function::new("size", TypeDef::integer()));

        let protocol = EnumTypeDef::new("NetworkProtocol")
            .with_value(EnumValueTypeDef::new("TCP"))
            .with_value(EnumValueTypeDef::new("UDP"));

        let media_types = EnumTypeDef::new("ImageMediaTypes")
            .with_value(EnumValueTypeDef::new("OCIMediaTypes"))
            .with_value(EnumValueTypeDef::new("DockerMediaTypes"));

        Self::default()
            .with_object(container)
            .with_object(directory)
            .with_object(file)
            .with_enum(protocol)
            .with_enum(media_types)
            .with_scalar(ScalarTypeDef::new("Platform"))
            .with_scalar(ScalarTypeDef {
                name: "JSON".to_string(),
                original_name: "JSON".to_string(),
                description: "An arbitrary JSON-encoded value.".to_string(),
                source_module_name: None,
            })
    }

    pub fn with_object(mut self, def: ObjectTypeDef) -> Self {
        self.objects.push(def);
        self
    }

    pub fn with_interface(mut self, def: InterfaceTypeDef) -> Self {
        self.interfaces.push(def);
        self
    }

    pub fn with_enum(mut self, def: EnumTypeDef) -> Self {
        self.enums.push(def);
        self
    }

    pub fn with_scalar(mut self, def: ScalarTypeDef) -> Self {
        self.scalars.push(def);
        self
    }

    /// Core resolves every named kind locally, scalars included.
    pub(crate) fn local_mod_type(&self, handle: &Mod, def: &TypeDef) -> Option<ModType> {
        let module = handle.clone();
        match &def.kind {
            TypeDefKind::Object(o) => self
                .objects
                .iter()
                .find(|x| x.name == o.name)
                .map(|x| ModType::Object {
                    module,
                    def: x.clone(),
                }),
            TypeDefKind::Interface(i) => self
                .interfaces
                .iter()
                .find(|x| x.name == i.name)
                .map(|x| ModType::Interface {
                    module,
                    def: x.clone(),
                }),
            TypeDefKind::Enum(e) => self
                .enums
                .iter()
                .find(|x| x.name == e.name)
                .map(|x| ModType::Enum {
                    module,
                    def: x.clone(),
                }),
            TypeDefKind::Scalar(s) => self
                .scalars
                .iter()
                .find(|x| x.name == s.name)
                .map(|x| ModType::Scalar {
                    module,
                    def: x.clone(),
                }),
            _ => None,
        }
    }

    pub fn install(&self, server: &mut SchemaServer) -> Result<(), ModError> {
        debug!(name = CORE_MODULE_NAME, "installing module");
        for def in &self.scalars {
            server.install_scalar(CORE_MODULE_NAME, def)?;
        }
        for def in &self.objects {
            server.install_object(CORE_MODULE_NAME, def)?;
        }
        for def in &self.interfaces {
            server.install_interface(CORE_MODULE_NAME, def)?;
        }
        for def in &self.enums {
            server.install_enum(CORE_MODULE_NAME, def)?;
        }
        Ok(())
    }

    pub fn type_defs(&self) -> Vec<TypeDef> {
        let defs = self
            .objects
            .iter()
            .map(|d| TypeDef::object(d.clone()))
            .chain(self.interfaces.iter().map(|d| TypeDef::interface(d.clone())))
            .chain(self.enums.iter().map(|d| TypeDef::enumeration(d.clone())))
            .chain(self.scalars.iter().map(|d| TypeDef::scalar(d.clone())));
        defs.map(|mut d| {
            d.set_source_module_name(CORE_MODULE_NAME);
            d
        })
        .collect()
    }
}
