//! MW-015: Manifest types for `modweave.yaml`.
//!
//! The manifest declares a set of modules, their sources and SDKs, their
//! dependencies within the manifest, and their type definitions in a compact
//! form. Type references are strings: `String`, `Int`, `Float`, `Boolean`,
//! `Void`, `[T]` for lists, a trailing `?` for optional, or a type name.

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Root manifest.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Schema version (must be "1.0")
    pub version: String,

    /// Workspace name
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Modules keyed by name; keys are also their final names
    #[serde(default)]
    pub modules: IndexMap<String, ModuleSpec>,
}

/// One module.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ModuleSpec {
    /// Local path, git reference (`github.com/org/repo/sub@v1`), or content digest
    pub source: String,

    /// Commit a git source is pinned to
    #[serde(default)]
    pub pin: Option<String>,

    /// SDK the module is written with (`go`, `python`, `typescript`, ...)
    pub sdk: String,

    /// Name the module was authored under, when installed under an alias
    #[serde(default)]
    pub original_name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub runtime: Option<RuntimeSpec>,

    /// Names of other modules in this manifest
    #[serde(default)]
    pub dependencies: Vec<String>,

    #[serde(default)]
    pub objects: IndexMap<String, ObjectSpec>,

    #[serde(default)]
    pub interfaces: IndexMap<String, InterfaceSpec>,

    #[serde(default)]
    pub enums: IndexMap<String, EnumSpec>,
}

impl ModuleSpec {
    pub fn original_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.original_name.as_deref().unwrap_or(name)
    }
}

/// Container image and entrypoint overriding the SDK default.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RuntimeSpec {
    pub image: String,
    #[serde(default)]
    pub entrypoint: Vec<String>,
}

/// Position of a declaration in the module's sources.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SourceLocation {
    pub file: String,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub column: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ObjectSpec {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: IndexMap<String, MemberSpec>,
    #[serde(default)]
    pub functions: IndexMap<String, FunctionSpec>,
    #[serde(default)]
    pub constructor: Option<ConstructorSpec>,
    #[serde(default)]
    pub at: Option<SourceLocation>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct InterfaceSpec {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub functions: IndexMap<String, FunctionSpec>,
    #[serde(default)]
    pub at: Option<SourceLocation>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct EnumSpec {
    #[serde(default)]
    pub description: Option<String>,
    pub values: Vec<String>,
    #[serde(default)]
    pub at: Option<SourceLocation>,
}

fn void() -> String {
    "Void".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FunctionSpec {
    /// Return type reference
    #[serde(default = "void")]
    pub returns: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub args: IndexMap<String, MemberSpec>,
    #[serde(default)]
    pub at: Option<SourceLocation>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ConstructorSpec {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub args: IndexMap<String, MemberSpec>,
}

/// A field or argument: either a bare type reference or a full entry.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum MemberSpec {
    Type(String),
    Full {
        #[serde(rename = "type")]
        type_ref: String,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        default: Option<serde_json::Value>,
        #[serde(default)]
        at: Option<SourceLocation>,
    },
}

impl MemberSpec {
    pub fn type_ref(&self) -> &str {
        match self {
            Self::Type(t) => t,
            Self::Full { type_ref, .. } => type_ref,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Type(_) => None,
            Self::Full { description, .. } => description.as_deref(),
        }
    }

    pub fn default_value(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Type(_) => None,
            Self::Full { default, .. } => default.as_ref(),
        }
    }

    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Self::Type(_) => None,
            Self::Full { at, .. } => at.as_ref(),
        }
    }
}

/// JSON Schema for the manifest format.
pub fn manifest_json_schema() -> Result<String, String> {
    let schema = schemars::schema_for!(Manifest);
    serde_json::to_string_pretty(&schema).map_err(|e| format!("JSON serialize error: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mw015_deserialize_compact_members() {
        let yaml = r#"
version: "1.0"
name: demo
modules:
  greet:
    source: ./greet
    sdk: go
    objects:
      Greeter:
        fields:
          greeting: String
          extra:
            type: "[Int]?"
            description: optional numbers
        functions:
          hello:
            returns: String
            args:
              name: String
              shout:
                type: Boolean
                default: false
"#;
        let m: Manifest = serde_yaml_ng::from_str(yaml).unwrap();
        let greet = &m.modules["greet"];
        assert_eq!(greet.original_name("greet"), "greet");
        let obj = &greet.objects["Greeter"];
        assert_eq!(obj.fields["greeting"].type_ref(), "String");
        assert_eq!(obj.fields["extra"].type_ref(), "[Int]?");
        assert_eq!(obj.fields["extra"].description(), Some("optional numbers"));
        let hello = &obj.functions["hello"];
        assert_eq!(hello.returns, "String");
        assert_eq!(
            hello.args["shout"].default_value(),
            Some(&serde_json::Value::Bool(false))
        );
    }

    #[test]
    fn test_mw015_function_defaults_to_void() {
        let yaml = r#"
version: "1.0"
name: demo
modules:
  m:
    source: .
    sdk: go
    interfaces:
      Runner:
        functions:
          run: {}
"#;
        let m: Manifest = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(m.modules["m"].interfaces["Runner"].functions["run"].returns, "Void");
    }

    #[test]
    fn test_mw015_unknown_field_rejected() {
        let yaml = r#"
version: "1.0"
name: demo
modules:
  m:
    source: .
    sdk: go
    bogus: true
"#;
        assert!(serde_yaml_ng::from_str::<Manifest>(yaml).is_err());
    }

    #[test]
    fn test_mw015_json_schema_export() {
        let schema = manifest_json_schema().unwrap();
        assert!(schema.contains("\"Manifest\""));
        assert!(schema.contains("ModuleSpec"));
        assert!(schema.contains("dependencies"));
    }
}
