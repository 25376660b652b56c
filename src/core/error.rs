//! MW-007: Error taxonomy for module construction, resolution, and install.

use std::fmt;

/// Where a type reference appears on a definition's public surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Field(String),
    Return(String),
    Arg { function: String, arg: String },
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => write!(f, "field {:?} cannot reference", name),
            Self::Return(name) => write!(f, "function {:?} cannot return", name),
            Self::Arg { function, arg } => {
                write!(f, "function {:?} arg {:?} cannot reference", function, arg)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModError {
    /// A field or function normalizes to a reserved identifier.
    #[error("cannot define {member_kind} with reserved name {member:?} on {owner_kind} {owner:?}")]
    ReservedName {
        owner_kind: &'static str,
        owner: String,
        member_kind: &'static str,
        member: String,
    },

    /// A public member exposes a type owned by another user module.
    #[error("{owner_kind} {owner:?} {member} external type {type_name:?} from dependency module {module:?}")]
    ExternalTypeLeak {
        owner_kind: &'static str,
        owner: String,
        member: Member,
        type_name: String,
        module: String,
    },

    /// A definition being installed is already provided by a dependency.
    #[error("type {type_name:?} is already defined by module {module:?}")]
    Conflict { type_name: String, module: String },

    /// The schema server already holds a type with this name.
    #[error("schema already has {kind} {type_name:?} installed by module {existing:?} (while installing module {module:?})")]
    DuplicateType {
        kind: &'static str,
        type_name: String,
        existing: String,
        module: String,
    },

    #[error("expected {expected} type def, got {actual}")]
    KindMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// Invariant violation: the resolver met a kind it has no rule for.
    #[error("unexpected type def kind {0}")]
    UnexpectedKind(&'static str),

    #[error("failed to validate type def {type_name:?} in module {module:?}: {source}")]
    Validation {
        module: String,
        type_name: String,
        #[source]
        source: Box<ModError>,
    },

    #[error("failed to namespace type def {type_name:?} in module {module:?}: {source}")]
    Namespace {
        module: String,
        type_name: String,
        #[source]
        source: Box<ModError>,
    },

    #[error("failed to resolve {kind} {type_name:?} in module {module:?}: {source}")]
    Resolve {
        kind: &'static str,
        type_name: String,
        module: String,
        #[source]
        source: Box<ModError>,
    },

    #[error("module dependency cycle detected involving: {}", .0.join(", "))]
    DependencyCycle(Vec<String>),

    #[error("module {module:?} depends on unknown module {dependency:?}")]
    UnknownDependency { module: String, dependency: String },

    #[error("module must be named before {0}")]
    Unfinalized(&'static str),

    #[error("sdk {sdk:?} failed for module {module:?}: {message}")]
    Sdk {
        sdk: String,
        module: String,
        message: String,
    },

    #[error("manifest error: {0}")]
    Manifest(String),

    #[error("io error: {0}")]
    Io(String),
}

impl ModError {
    pub(crate) fn validation(module: &str, type_name: &str, source: ModError) -> Self {
        Self::Validation {
            module: module.to_string(),
            type_name: type_name.to_string(),
            source: Box::new(source),
        }
    }

    pub(crate) fn namespace(module: &str, type_name: &str, source: ModError) -> Self {
        Self::Namespace {
            module: module.to_string(),
            type_name: type_name.to_string(),
            source: Box::new(source),
        }
    }

    /// The innermost error, with builder/resolver context stripped.
    pub fn root_cause(&self) -> &ModError {
        match self {
            Self::Validation { source, .. }
            | Self::Namespace { source, .. }
            | Self::Resolve { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
