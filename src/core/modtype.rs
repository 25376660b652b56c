//! MW-004: Resolved module types and the shared `mod_type_for` dispatch.
//!
//! A `ModType` is what a `TypeDef` resolves to once we know which module
//! owns it. Primitives have no owner; lists and nullable wrappers report the
//! owner of whatever they wrap.

use super::deps::ModDeps;
use super::error::ModError;
use super::handle::Mod;
use super::types::*;
use tracing::debug;

#[derive(Debug, Clone)]
pub enum ModType {
    Primitive(TypeDef),
    List {
        elem: TypeDef,
        underlying: Box<ModType>,
    },
    Object {
        module: Mod,
        def: ObjectTypeDef,
    },
    Interface {
        module: Mod,
        def: InterfaceTypeDef,
    },
    Enum {
        module: Mod,
        def: EnumTypeDef,
    },
    Scalar {
        module: Mod,
        def: ScalarTypeDef,
    },
    Nullable {
        inner_def: TypeDef,
        inner: Box<ModType>,
    },
}

impl ModType {
    /// The module that owns this type, if any.
    pub fn source_mod(&self) -> Option<&Mod> {
        match self {
            Self::Primitive(_) => None,
            Self::List { underlying, .. } => underlying.source_mod(),
            Self::Nullable { inner, .. } => inner.source_mod(),
            Self::Object { module, .. }
            | Self::Interface { module, .. }
            | Self::Enum { module, .. }
            | Self::Scalar { module, .. } => Some(module),
        }
    }

    /// The canonical type definition this resolved type stands for.
    pub fn type_def(&self) -> TypeDef {
        match self {
            Self::Primitive(def) => def.clone(),
            Self::List { elem, .. } => TypeDef::list(elem.clone()),
            Self::Object { def, .. } => TypeDef::object(def.clone()),
            Self::Interface { def, .. } => TypeDef::interface(def.clone()),
            Self::Enum { def, .. } => TypeDef::enumeration(def.clone()),
            Self::Scalar { def, .. } => TypeDef::scalar(def.clone()),
            Self::Nullable { inner_def, .. } => inner_def.with_optional(true),
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::Primitive(_) => "primitive",
            Self::List { .. } => "list",
            Self::Object { .. } => "object",
            Self::Interface { .. } => "interface",
            Self::Enum { .. } => "enum",
            Self::Scalar { .. } => "scalar",
            Self::Nullable { .. } => "nullable",
        }
    }
}

/// Resolve `def` on behalf of `owner`.
///
/// Named kinds consult `deps` first when `check_direct_deps` is set, so a
/// dependency's definition always wins over a same-named local one. A hit
/// from a dependency is returned as-is: the dependency already applied the
/// optional wrapper.
pub(crate) fn resolve(
    owner: &Mod,
    deps: Option<&ModDeps>,
    def: &TypeDef,
    check_direct_deps: bool,
) -> Result<Option<ModType>, ModError> {
    let resolved = match &def.kind {
        TypeDefKind::String
        | TypeDefKind::Integer
        | TypeDefKind::Float
        | TypeDefKind::Boolean
        | TypeDefKind::Void => Some(ModType::Primitive(def.with_optional(false))),

        TypeDefKind::List(list) => {
            match resolve(owner, deps, &list.element, check_direct_deps)? {
                Some(underlying) => Some(ModType::List {
                    elem: (*list.element).clone(),
                    underlying: Box::new(underlying),
                }),
                None => None,
            }
        }

        TypeDefKind::Object(_)
        | TypeDefKind::Interface(_)
        | TypeDefKind::Enum(_)
        | TypeDefKind::Scalar(_) => {
            if check_direct_deps {
                if let Some(deps) = deps {
                    let from_dep =
                        deps.mod_type_for(def).map_err(|e| ModError::Resolve {
                            kind: def.kind.label(),
                            type_name: def.name().unwrap_or_default().to_string(),
                            module: owner.name().to_string(),
                            source: Box::new(e),
                        })?;
                    if from_dep.is_some() {
                        return Ok(from_dep);
                    }
                }
            }
            let local = owner.local_mod_type(def);
            if local.is_none() {
                debug!(
                    module = owner.name(),
                    kind = def.kind.label(),
                    name = def.name().unwrap_or_default(),
                    "module did not find type"
                );
            }
            local
        }

        TypeDefKind::Input(_) => return Err(ModError::UnexpectedKind(def.kind.label())),
    };

    let Some(resolved) = resolved else {
        return Ok(None);
    };

    if def.optional {
        return Ok(Some(ModType::Nullable {
            inner_def: def.with_optional(false),
            inner: Box::new(resolved),
        }));
    }
    Ok(Some(resolved))
}
