//! MW-016: Manifest parsing, validation, and lowering to type definitions.
//!
//! Parses modweave.yaml and validates structural constraints:
//! - Version must be "1.0"
//! - Module, type, member, and enum value names must be identifiers
//! - No module may take the built-in module's name
//! - Dependencies must name other modules in the manifest
//! - Every type reference must resolve to a primitive, a core type, a type
//!   declared by the module itself, or a type exported by a dependency

use super::builtin::{CoreModule, CORE_MODULE_NAME};
use super::error::ModError;
use super::manifest::*;
use super::naming::{namespace_object, to_camel};
use super::sdk::ManifestSdk;
use super::types::*;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;

static MODULE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z][a-z0-9]*([_-][a-z0-9]+)*$").expect("module name pattern compiles")
});

static TYPE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("type name pattern compiles")
});

static MEMBER_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("member name pattern compiles")
});

/// Validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Parse a modweave.yaml file from disk.
pub fn parse_manifest_file(path: &Path) -> Result<Manifest, ModError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ModError::Io(format!("failed to read {}: {}", path.display(), e)))?;
    parse_manifest(&content)
}

/// Parse a modweave.yaml from a string.
pub fn parse_manifest(yaml: &str) -> Result<Manifest, ModError> {
    serde_yaml_ng::from_str(yaml).map_err(|e| ModError::Manifest(format!("YAML parse error: {}", e)))
}

// ============================================================================
// Type references
// ============================================================================

/// Kind of a named type a reference can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedKind {
    Object,
    Interface,
    Enum,
    Scalar,
}

impl NamedKind {
    pub const ALL: [NamedKind; 4] = [Self::Object, Self::Interface, Self::Enum, Self::Scalar];

    /// Shallow reference carrying `name` exactly as the schema spells it.
    pub fn reference(self, name: &str) -> TypeDef {
        let mut def = match self {
            Self::Object => TypeDef::object_ref(name),
            Self::Interface => TypeDef::interface_ref(name),
            Self::Enum => TypeDef::enum_ref(name),
            Self::Scalar => TypeDef::scalar_ref(name),
        };
        match &mut def.kind {
            TypeDefKind::Object(o) => o.name = name.to_string(),
            TypeDefKind::Interface(i) => i.name = name.to_string(),
            TypeDefKind::Enum(e) => e.name = name.to_string(),
            TypeDefKind::Scalar(s) => s.name = name.to_string(),
            _ => {}
        }
        def
    }
}

/// Parse a compact type reference. `lookup` maps a type name to its
/// canonical spelling and kind.
pub fn parse_type_ref(
    text: &str,
    lookup: &dyn Fn(&str) -> Option<(String, NamedKind)>,
) -> Result<TypeDef, String> {
    let text = text.trim();
    let (body, optional) = match text.strip_suffix('?') {
        Some(body) => (body.trim_end(), true),
        None => (text, false),
    };
    if body.is_empty() {
        return Err(format!("empty type reference {:?}", text));
    }

    let def = if let Some(inner) = body.strip_prefix('[') {
        let inner = inner
            .strip_suffix(']')
            .ok_or_else(|| format!("unbalanced brackets in type reference {:?}", text))?;
        TypeDef::list(parse_type_ref(inner, lookup)?)
    } else {
        match body {
            "String" => TypeDef::string(),
            "Int" | "Integer" => TypeDef::integer(),
            "Float" => TypeDef::float(),
            "Boolean" | "Bool" => TypeDef::boolean(),
            "Void" => TypeDef::void(),
            name => {
                if !TYPE_NAME.is_match(name) {
                    return Err(format!("invalid type reference {:?}", text));
                }
                let (canonical, kind) =
                    lookup(name).ok_or_else(|| format!("unknown type {:?}", name))?;
                kind.reference(&canonical)
            }
        }
    };
    Ok(def.with_optional(optional))
}

/// Names visible to `module`: core, its dependencies' exports, its own types.
pub fn type_scope(
    manifest: &Manifest,
    module: &str,
    core: &CoreModule,
) -> HashMap<String, NamedKind> {
    let mut scope = HashMap::new();
    for o in &core.objects {
        scope.insert(o.name.clone(), NamedKind::Object);
    }
    for i in &core.interfaces {
        scope.insert(i.name.clone(), NamedKind::Interface);
    }
    for e in &core.enums {
        scope.insert(e.name.clone(), NamedKind::Enum);
    }
    for s in &core.scalars {
        scope.insert(s.name.clone(), NamedKind::Scalar);
    }

    let Some(spec) = manifest.modules.get(module) else {
        return scope;
    };
    for dep_name in &spec.dependencies {
        let Some(dep) = manifest.modules.get(dep_name) else {
            continue;
        };
        let original = dep.original_name(dep_name);
        let exported = dep
            .objects
            .keys()
            .map(|k| (k, NamedKind::Object))
            .chain(dep.interfaces.keys().map(|k| (k, NamedKind::Interface)))
            .chain(dep.enums.keys().map(|k| (k, NamedKind::Enum)));
        for (key, kind) in exported {
            scope.insert(namespace_object(key, dep_name, original), kind);
        }
    }

    for key in spec.objects.keys() {
        scope.insert(to_camel(key), NamedKind::Object);
    }
    for key in spec.interfaces.keys() {
        scope.insert(to_camel(key), NamedKind::Interface);
    }
    for key in spec.enums.keys() {
        scope.insert(to_camel(key), NamedKind::Enum);
    }
    scope
}

/// Lookup over a scope: exact spelling first, then CamelCase.
pub fn scope_lookup(scope: &HashMap<String, NamedKind>, name: &str) -> Option<(String, NamedKind)> {
    if let Some(kind) = scope.get(name) {
        return Some((name.to_string(), *kind));
    }
    let camel = to_camel(name);
    scope.get(&camel).map(|kind| (camel, *kind))
}

// ============================================================================
// Validation
// ============================================================================

/// Validate a parsed manifest. Returns a list of errors (empty = valid).
pub fn validate_manifest(manifest: &Manifest) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut push = |message: String| errors.push(ValidationError { message });

    if manifest.version != "1.0" {
        push(format!("version must be \"1.0\", got \"{}\"", manifest.version));
    }
    if manifest.name.is_empty() {
        push("name must not be empty".to_string());
    }

    let core = CoreModule::builtin();
    for (id, module) in &manifest.modules {
        if !MODULE_NAME.is_match(id) {
            push(format!("module '{}' has an invalid name", id));
        } else if id == CORE_MODULE_NAME {
            push(format!("module name '{}' is reserved", id));
        }
        if let Some(original) = &module.original_name {
            if !MODULE_NAME.is_match(original) {
                push(format!("module '{}' has an invalid original_name '{}'", id, original));
            }
        }
        if module.source.trim().is_empty() {
            push(format!("module '{}' has no source", id));
        }
        if module.sdk.trim().is_empty() {
            push(format!("module '{}' has no sdk", id));
        } else if module.runtime.is_none() && ManifestSdk::default_image(&module.sdk).is_none() {
            push(format!(
                "module '{}' uses sdk '{}' which has no default runtime; declare runtime.image",
                id, module.sdk
            ));
        }

        let mut seen_deps = HashSet::new();
        for dep in &module.dependencies {
            if dep == id {
                push(format!("module '{}' depends on itself", id));
            } else if !manifest.modules.contains_key(dep) {
                push(format!("module '{}' depends on unknown module '{}'", id, dep));
            }
            if !seen_deps.insert(dep) {
                push(format!("module '{}' lists dependency '{}' twice", id, dep));
            }
        }

        validate_module_types(manifest, id, module, &core, &mut push);
    }

    errors
}

fn validate_module_types(
    manifest: &Manifest,
    id: &str,
    module: &ModuleSpec,
    core: &CoreModule,
    push: &mut dyn FnMut(String),
) {
    let scope = type_scope(manifest, id, core);
    let lookup = |name: &str| scope_lookup(&scope, name);
    let check_ref = |push: &mut dyn FnMut(String), owner: &str, text: &str| {
        check_type_ref(push, id, &lookup, owner, text)
    };
    let check_member =
        |push: &mut dyn FnMut(String), owner: &str, name: &str| check_member_name(push, id, owner, name);

    let mut declared: HashMap<String, &str> = HashMap::new();
    let keys = module
        .objects
        .keys()
        .map(|k| (k, "object"))
        .chain(module.interfaces.keys().map(|k| (k, "interface")))
        .chain(module.enums.keys().map(|k| (k, "enum")));
    for (key, kind) in keys {
        if !TYPE_NAME.is_match(key) {
            push(format!("module '{}' {} '{}' has an invalid name", id, kind, key));
        }
        if let Some(prev) = declared.insert(to_camel(key), kind) {
            push(format!(
                "module '{}' declares '{}' as both {} and {}",
                id, key, prev, kind
            ));
        }
    }

    for (key, obj) in &module.objects {
        let owner = format!("object '{}'", key);
        for (name, field) in &obj.fields {
            check_member(push, &owner, name);
            check_ref(push, &format!("{} field '{}'", owner, name), field.type_ref());
        }
        for (name, func) in &obj.functions {
            check_member(push, &owner, name);
            let fn_owner = format!("{} function '{}'", owner, name);
            check_ref(push, &fn_owner, &func.returns);
            for (arg, spec) in &func.args {
                check_member(push, &fn_owner, arg);
                check_ref(push, &format!("{} arg '{}'", fn_owner, arg), spec.type_ref());
            }
        }
        if let Some(ctor) = &obj.constructor {
            let ctor_owner = format!("{} constructor", owner);
            for (arg, spec) in &ctor.args {
                check_member(push, &ctor_owner, arg);
                check_ref(push, &format!("{} arg '{}'", ctor_owner, arg), spec.type_ref());
            }
        }
    }

    for (key, iface) in &module.interfaces {
        let owner = format!("interface '{}'", key);
        for (name, func) in &iface.functions {
            check_member(push, &owner, name);
            let fn_owner = format!("{} function '{}'", owner, name);
            check_ref(push, &fn_owner, &func.returns);
            for (arg, spec) in &func.args {
                check_member(push, &fn_owner, arg);
                check_ref(push, &format!("{} arg '{}'", fn_owner, arg), spec.type_ref());
            }
        }
    }

    for (key, e) in &module.enums {
        if e.values.is_empty() {
            push(format!("module '{}' enum '{}' has no values", id, key));
        }
        let owner = format!("enum '{}'", key);
        let mut seen = HashSet::new();
        for value in &e.values {
            check_member(push, &owner, value);
            if !seen.insert(value) {
                push(format!("module '{}' {} repeats value '{}'", id, owner, value));
            }
        }
    }
}

fn check_type_ref(
    push: &mut dyn FnMut(String),
    id: &str,
    lookup: &dyn Fn(&str) -> Option<(String, NamedKind)>,
    owner: &str,
    text: &str,
) {
    if let Err(e) = parse_type_ref(text, lookup) {
        push(format!("module '{}' {}: {}", id, owner, e));
    }
}

fn check_member_name(push: &mut dyn FnMut(String), id: &str, owner: &str, name: &str) {
    if !MEMBER_NAME.is_match(name) {
        push(format!("module '{}' {} has an invalid member name '{}'", id, owner, name));
    }
}

// ============================================================================
// Lowering
// ============================================================================

/// Raw (un-namespaced) type definitions declared by one manifest module.
#[derive(Debug, Clone, Default)]
pub struct ModuleDefs {
    pub objects: Vec<TypeDef>,
    pub interfaces: Vec<TypeDef>,
    pub enums: Vec<TypeDef>,
}

fn source_map(at: Option<&SourceLocation>) -> Option<SourceMap> {
    at.map(|l| SourceMap::new(&l.file, l.line, l.column))
}

/// Lower a manifest module's declarations into type definitions.
pub fn module_defs(
    manifest: &Manifest,
    module: &str,
    core: &CoreModule,
) -> Result<ModuleDefs, ModError> {
    let spec = manifest
        .modules
        .get(module)
        .ok_or_else(|| ModError::Manifest(format!("unknown module '{}'", module)))?;
    let scope = type_scope(manifest, module, core);
    let lookup = |name: &str| scope_lookup(&scope, name);
    let parse = |owner: &str, text: &str| {
        parse_type_ref(text, &lookup)
            .map_err(|e| ModError::Manifest(format!("module '{}' {}: {}", module, owner, e)))
    };

    let lower_function = |owner: &str, name: &str, func: &FunctionSpec| -> Result<Function, ModError> {
        let owner = format!("{} function '{}'", owner, name);
        let mut f = Function::new(name, parse(&owner, &func.returns)?)
            .with_description(func.description.as_deref().unwrap_or_default());
        f.source_map = source_map(func.at.as_ref());
        for (arg, arg_spec) in &func.args {
            f = f.with_arg(lower_arg(&parse, &owner, arg, arg_spec)?);
        }
        Ok(f)
    };

    let mut defs = ModuleDefs::default();

    for (key, obj) in &spec.objects {
        let owner = format!("object '{}'", key);
        let mut o = ObjectTypeDef::new(key)
            .with_description(obj.description.as_deref().unwrap_or_default());
        o.source_map = source_map(obj.at.as_ref());
        for (name, field) in &obj.fields {
            let mut f = FieldTypeDef::new(
                name,
                parse(&format!("{} field '{}'", owner, name), field.type_ref())?,
            );
            f.description = field.description().unwrap_or_default().trim().to_string();
            f.source_map = source_map(field.location());
            o = o.with_field(f);
        }
        for (name, func) in &obj.functions {
            o = o.with_function(lower_function(&owner, name, func)?);
        }
        if let Some(ctor) = &obj.constructor {
            let ctor_owner = format!("{} constructor", owner);
            let mut f = Function::new("", NamedKind::Object.reference(&o.name))
                .with_description(ctor.description.as_deref().unwrap_or_default());
            for (arg, arg_spec) in &ctor.args {
                f = f.with_arg(lower_arg(&parse, &ctor_owner, arg, arg_spec)?);
            }
            o = o.with_constructor(f);
        }
        defs.objects.push(TypeDef::object(o));
    }

    for (key, iface) in &spec.interfaces {
        let owner = format!("interface '{}'", key);
        let mut i = InterfaceTypeDef::new(key);
        i.description = iface.description.as_deref().unwrap_or_default().trim().to_string();
        i.source_map = source_map(iface.at.as_ref());
        for (name, func) in &iface.functions {
            i = i.with_function(lower_function(&owner, name, func)?);
        }
        defs.interfaces.push(TypeDef::interface(i));
    }

    for (key, e) in &spec.enums {
        let mut def = EnumTypeDef::new(key);
        def.description = e.description.as_deref().unwrap_or_default().trim().to_string();
        def.source_map = source_map(e.at.as_ref());
        for value in &e.values {
            def = def.with_value(EnumValueTypeDef::new(value));
        }
        defs.enums.push(TypeDef::enumeration(def));
    }

    Ok(defs)
}

fn lower_arg(
    parse: &dyn Fn(&str, &str) -> Result<TypeDef, ModError>,
    owner: &str,
    name: &str,
    spec: &MemberSpec,
) -> Result<FunctionArg, ModError> {
    let type_def = parse(&format!("{} arg '{}'", owner, name), spec.type_ref())?;
    let mut arg = FunctionArg::new(name, type_def);
    arg.description = spec.description().unwrap_or_default().trim().to_string();
    arg.default_value = spec.default_value().cloned();
    arg.source_map = source_map(spec.location());
    Ok(arg)
}
