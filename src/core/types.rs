//! MW-001: Type definition graph, the structural description of every type a
//! module can declare or reference.
//!
//! A `TypeDef` is a tree: references to other named types are shallow
//! (`kind: object, name: Foo` with no members), so walks never revisit a node.
//! All types derive Serialize/Deserialize for JSON introspection output.

use super::naming::{field_name, to_camel};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// TypeDef
// ============================================================================

/// A type definition with its optionality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDef {
    #[serde(flatten)]
    pub kind: TypeDefKind,

    /// Whether the value may be null
    #[serde(default)]
    pub optional: bool,
}

/// The kind-specific payload of a type definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeDefKind {
    String,
    Integer,
    Float,
    Boolean,
    Void,
    List(ListTypeDef),
    Object(ObjectTypeDef),
    Interface(InterfaceTypeDef),
    Input(InputTypeDef),
    Enum(EnumTypeDef),
    Scalar(ScalarTypeDef),
}

impl TypeDefKind {
    /// Stable lowercase label used in messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Void => "void",
            Self::List(_) => "list",
            Self::Object(_) => "object",
            Self::Interface(_) => "interface",
            Self::Input(_) => "input",
            Self::Enum(_) => "enum",
            Self::Scalar(_) => "scalar",
        }
    }
}

impl fmt::Display for TypeDefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl TypeDef {
    fn of(kind: TypeDefKind) -> Self {
        Self {
            kind,
            optional: false,
        }
    }

    pub fn string() -> Self {
        Self::of(TypeDefKind::String)
    }

    pub fn integer() -> Self {
        Self::of(TypeDefKind::Integer)
    }

    pub fn float() -> Self {
        Self::of(TypeDefKind::Float)
    }

    pub fn boolean() -> Self {
        Self::of(TypeDefKind::Boolean)
    }

    pub fn void() -> Self {
        Self::of(TypeDefKind::Void)
    }

    pub fn list(element: TypeDef) -> Self {
        Self::of(TypeDefKind::List(ListTypeDef {
            element: Box::new(element),
        }))
    }

    pub fn object(def: ObjectTypeDef) -> Self {
        Self::of(TypeDefKind::Object(def))
    }

    pub fn interface(def: InterfaceTypeDef) -> Self {
        Self::of(TypeDefKind::Interface(def))
    }

    pub fn input(def: InputTypeDef) -> Self {
        Self::of(TypeDefKind::Input(def))
    }

    pub fn enumeration(def: EnumTypeDef) -> Self {
        Self::of(TypeDefKind::Enum(def))
    }

    pub fn scalar(def: ScalarTypeDef) -> Self {
        Self::of(TypeDefKind::Scalar(def))
    }

    /// Shallow reference to a named object.
    pub fn object_ref(name: &str) -> Self {
        Self::object(ObjectTypeDef::new(name))
    }

    /// Shallow reference to a named interface.
    pub fn interface_ref(name: &str) -> Self {
        Self::interface(InterfaceTypeDef::new(name))
    }

    /// Shallow reference to a named enum.
    pub fn enum_ref(name: &str) -> Self {
        Self::enumeration(EnumTypeDef::new(name))
    }

    /// Shallow reference to a named scalar.
    pub fn scalar_ref(name: &str) -> Self {
        Self::scalar(ScalarTypeDef::new(name))
    }

    /// Copy with the optional flag set to `optional`.
    pub fn with_optional(&self, optional: bool) -> Self {
        let mut def = self.clone();
        def.optional = optional;
        def
    }

    pub fn is_primitive(&self) -> bool {
        matches!(
            self.kind,
            TypeDefKind::String
                | TypeDefKind::Integer
                | TypeDefKind::Float
                | TypeDefKind::Boolean
                | TypeDefKind::Void
        )
    }

    /// Name of the referenced named type, if any.
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            TypeDefKind::Object(o) => Some(&o.name),
            TypeDefKind::Interface(i) => Some(&i.name),
            TypeDefKind::Input(i) => Some(&i.name),
            TypeDefKind::Enum(e) => Some(&e.name),
            TypeDefKind::Scalar(s) => Some(&s.name),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectTypeDef> {
        match &self.kind {
            TypeDefKind::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_interface(&self) -> Option<&InterfaceTypeDef> {
        match &self.kind {
            TypeDefKind::Interface(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumTypeDef> {
        match &self.kind {
            TypeDefKind::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Record the module a named type is exported from.
    pub fn set_source_module_name(&mut self, module: &str) {
        let slot = match &mut self.kind {
            TypeDefKind::Object(o) => &mut o.source_module_name,
            TypeDefKind::Interface(i) => &mut i.source_module_name,
            TypeDefKind::Enum(e) => &mut e.source_module_name,
            TypeDefKind::Scalar(s) => &mut s.source_module_name,
            _ => return,
        };
        *slot = Some(module.to_string());
    }
}

impl fmt::Display for TypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeDefKind::String => write!(f, "String")?,
            TypeDefKind::Integer => write!(f, "Int")?,
            TypeDefKind::Float => write!(f, "Float")?,
            TypeDefKind::Boolean => write!(f, "Boolean")?,
            TypeDefKind::Void => write!(f, "Void")?,
            TypeDefKind::List(l) => write!(f, "[{}]", l.element)?,
            TypeDefKind::Object(o) => write!(f, "{}", o.name)?,
            TypeDefKind::Interface(i) => write!(f, "{}", i.name)?,
            TypeDefKind::Input(i) => write!(f, "{}", i.name)?,
            TypeDefKind::Enum(e) => write!(f, "{}", e.name)?,
            TypeDefKind::Scalar(s) => write!(f, "{}", s.name)?,
        }
        if !self.optional {
            write!(f, "!")?;
        }
        Ok(())
    }
}

// ============================================================================
// Composite payloads
// ============================================================================

/// List element type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListTypeDef {
    pub element: Box<TypeDef>,
}

/// Origin of a declaration in module source code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMap {
    /// Owning module, set once namespaced
    #[serde(default)]
    pub module: Option<String>,

    /// File path, relative to the module's context directory once namespaced
    pub filename: String,

    #[serde(default)]
    pub line: u32,

    #[serde(default)]
    pub column: u32,
}

impl SourceMap {
    pub fn new(filename: &str, line: u32, column: u32) -> Self {
        Self {
            module: None,
            filename: filename.to_string(),
            line,
            column,
        }
    }
}

/// An object type: fields, functions, and an optional constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectTypeDef {
    pub name: String,
    pub original_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fields: Vec<FieldTypeDef>,
    #[serde(default)]
    pub functions: Vec<Function>,
    #[serde(default)]
    pub constructor: Option<Box<Function>>,
    #[serde(default)]
    pub source_module_name: Option<String>,
    #[serde(default)]
    pub source_map: Option<SourceMap>,
}

impl ObjectTypeDef {
    pub fn new(name: &str) -> Self {
        Self {
            name: to_camel(name),
            original_name: name.to_string(),
            description: String::new(),
            fields: Vec::new(),
            functions: Vec::new(),
            constructor: None,
            source_module_name: None,
            source_map: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.trim().to_string();
        self
    }

    pub fn with_field(mut self, field: FieldTypeDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_function(mut self, function: Function) -> Self {
        self.functions.push(function);
        self
    }

    pub fn with_constructor(mut self, constructor: Function) -> Self {
        self.constructor = Some(Box::new(constructor));
        self
    }

    pub fn with_source_map(mut self, source_map: SourceMap) -> Self {
        self.source_map = Some(source_map);
        self
    }
}

/// An interface type: a set of functions other objects may implement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceTypeDef {
    pub name: String,
    pub original_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub functions: Vec<Function>,
    #[serde(default)]
    pub source_module_name: Option<String>,
    #[serde(default)]
    pub source_map: Option<SourceMap>,
}

impl InterfaceTypeDef {
    pub fn new(name: &str) -> Self {
        Self {
            name: to_camel(name),
            original_name: name.to_string(),
            description: String::new(),
            functions: Vec::new(),
            source_module_name: None,
            source_map: None,
        }
    }

    pub fn with_function(mut self, function: Function) -> Self {
        self.functions.push(function);
        self
    }

    pub fn with_source_map(mut self, source_map: SourceMap) -> Self {
        self.source_map = Some(source_map);
        self
    }
}

/// An input object. Modules cannot declare these; they only arrive from core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputTypeDef {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldTypeDef>,
}

/// An enum type with ordered values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumTypeDef {
    pub name: String,
    pub original_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub values: Vec<EnumValueTypeDef>,
    #[serde(default)]
    pub source_module_name: Option<String>,
    #[serde(default)]
    pub source_map: Option<SourceMap>,
}

impl EnumTypeDef {
    pub fn new(name: &str) -> Self {
        Self {
            name: to_camel(name),
            original_name: name.to_string(),
            description: String::new(),
            values: Vec::new(),
            source_module_name: None,
            source_map: None,
        }
    }

    pub fn with_value(mut self, value: EnumValueTypeDef) -> Self {
        self.values.push(value);
        self
    }

    pub fn with_source_map(mut self, source_map: SourceMap) -> Self {
        self.source_map = Some(source_map);
        self
    }

    pub fn value_names(&self) -> Vec<&str> {
        self.values.iter().map(|v| v.name.as_str()).collect()
    }
}

/// A single enum member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumValueTypeDef {
    pub name: String,
    pub original_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub source_map: Option<SourceMap>,
}

impl EnumValueTypeDef {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            original_name: name.to_string(),
            description: String::new(),
            source_map: None,
        }
    }

    pub fn with_source_map(mut self, source_map: SourceMap) -> Self {
        self.source_map = Some(source_map);
        self
    }
}

/// A custom scalar. Only the core module defines these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarTypeDef {
    pub name: String,
    pub original_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub source_module_name: Option<String>,
}

impl ScalarTypeDef {
    pub fn new(name: &str) -> Self {
        Self {
            name: to_camel(name),
            original_name: name.to_string(),
            description: String::new(),
            source_module_name: None,
        }
    }
}

// ============================================================================
// Members
// ============================================================================

/// An object field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldTypeDef {
    pub name: String,
    pub original_name: String,
    #[serde(default)]
    pub description: String,
    pub type_def: TypeDef,
    #[serde(default)]
    pub source_map: Option<SourceMap>,
}

impl FieldTypeDef {
    pub fn new(name: &str, type_def: TypeDef) -> Self {
        Self {
            name: field_name(name),
            original_name: name.to_string(),
            description: String::new(),
            type_def,
            source_map: None,
        }
    }

    pub fn with_source_map(mut self, source_map: SourceMap) -> Self {
        self.source_map = Some(source_map);
        self
    }
}

/// A function on an object or interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub original_name: String,
    #[serde(default)]
    pub description: String,
    pub return_type: TypeDef,
    #[serde(default)]
    pub args: Vec<FunctionArg>,
    #[serde(default)]
    pub source_map: Option<SourceMap>,
}

impl Function {
    pub fn new(name: &str, return_type: TypeDef) -> Self {
        Self {
            name: field_name(name),
            original_name: name.to_string(),
            description: String::new(),
            return_type,
            args: Vec::new(),
            source_map: None,
        }
    }

    pub fn with_arg(mut self, arg: FunctionArg) -> Self {
        self.args.push(arg);
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.trim().to_string();
        self
    }

    pub fn with_source_map(mut self, source_map: SourceMap) -> Self {
        self.source_map = Some(source_map);
        self
    }
}

/// A function argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionArg {
    pub name: String,
    pub original_name: String,
    #[serde(default)]
    pub description: String,
    pub type_def: TypeDef,
    #[serde(default)]
    pub default_value: Option<serde_json::Value>,
    #[serde(default)]
    pub source_map: Option<SourceMap>,
}

impl FunctionArg {
    pub fn new(name: &str, type_def: TypeDef) -> Self {
        Self {
            name: field_name(name),
            original_name: name.to_string(),
            description: String::new(),
            type_def,
            default_value: None,
            source_map: None,
        }
    }

    pub fn with_default(mut self, value: serde_json::Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn with_source_map(mut self, source_map: SourceMap) -> Self {
        self.source_map = Some(source_map);
        self
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mw001_constructors_normalize_names() {
        let obj = ObjectTypeDef::new("my_thing");
        assert_eq!(obj.name, "MyThing");
        assert_eq!(obj.original_name, "my_thing");

        let func = Function::new("WithName", TypeDef::string());
        assert_eq!(func.name, "withName");
        assert_eq!(func.original_name, "WithName");
    }

    #[test]
    fn test_mw001_with_optional_copies() {
        let def = TypeDef::integer();
        let opt = def.with_optional(true);
        assert!(opt.optional);
        assert!(!def.optional);
    }

    #[test]
    fn test_mw001_display() {
        let def = TypeDef::list(TypeDef::integer().with_optional(true)).with_optional(true);
        assert_eq!(def.to_string(), "[Int]");
        assert_eq!(TypeDef::object_ref("Greeter").to_string(), "Greeter!");
        assert_eq!(TypeDef::list(TypeDef::string()).to_string(), "[String!]!");
    }

    #[test]
    fn test_mw001_kind_label() {
        assert_eq!(TypeDef::string().kind.to_string(), "string");
        assert_eq!(TypeDef::object_ref("A").kind.to_string(), "object");
        assert_eq!(TypeDef::enum_ref("E").kind.label(), "enum");
    }

    #[test]
    fn test_mw001_name() {
        assert_eq!(TypeDef::object_ref("Foo").name(), Some("Foo"));
        assert_eq!(TypeDef::scalar_ref("Platform").name(), Some("Platform"));
        assert_eq!(TypeDef::list(TypeDef::object_ref("Foo")).name(), None);
        assert_eq!(TypeDef::string().name(), None);
    }

    #[test]
    fn test_mw001_set_source_module_name() {
        let mut def = TypeDef::object_ref("Foo");
        def.set_source_module_name("a");
        assert_eq!(def.as_object().unwrap().source_module_name.as_deref(), Some("a"));

        let mut prim = TypeDef::string();
        prim.set_source_module_name("a");
        assert_eq!(prim, TypeDef::string());
    }

    #[test]
    fn test_mw001_json_roundtrip_tagged() {
        let def = TypeDef::object(
            ObjectTypeDef::new("Greeter").with_function(
                Function::new("hello", TypeDef::string())
                    .with_arg(FunctionArg::new("name", TypeDef::string())),
            ),
        );
        let json = serde_json::to_string(&def).unwrap();
        assert!(json.contains("\"kind\":\"object\""));
        let back: TypeDef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, def);
    }

    #[test]
    fn test_mw001_enum_value_names() {
        let e = EnumTypeDef::new("Color")
            .with_value(EnumValueTypeDef::new("RED"))
            .with_value(EnumValueTypeDef::new("GREEN"));
        assert_eq!(e.value_names(), vec!["RED", "GREEN"]);
    }
}
