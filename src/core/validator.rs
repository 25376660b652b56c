//! MW-013: Structural validation of type definitions added to a module.
//!
//! Two rules, applied alike to objects and interfaces:
//! - no field or function may be named `id` once normalized
//! - no public member may expose a type owned by another user module
//!   (core types are always allowed)

use super::deps::ModDeps;
use super::error::{Member, ModError};
use super::naming::field_name;
use super::types::*;

const RESERVED_NAME: &str = "id";

pub struct Validator<'a> {
    module_name: &'a str,
    deps: &'a ModDeps,
}

impl<'a> Validator<'a> {
    pub fn new(module_name: &'a str, deps: &'a ModDeps) -> Self {
        Self { module_name, deps }
    }

    pub fn validate(&self, def: &TypeDef) -> Result<(), ModError> {
        match &def.kind {
            TypeDefKind::List(list) => self.validate(&list.element),
            TypeDefKind::Object(obj) => self.validate_object(def, obj),
            TypeDefKind::Interface(iface) => self.validate_interface(def, iface),
            _ => Ok(()),
        }
    }

    /// True when `def` already belongs to a dependency, which validated it.
    fn defined_upstream(&self, def: &TypeDef) -> Result<bool, ModError> {
        let found = self.deps.mod_type_for(def)?;
        Ok(found
            .as_ref()
            .and_then(|t| t.source_mod())
            .is_some_and(|m| m.name() != self.module_name))
    }

    fn validate_object(&self, def: &TypeDef, obj: &ObjectTypeDef) -> Result<(), ModError> {
        if self.defined_upstream(def)? {
            return Ok(());
        }
        let owner = ("object", obj.original_name.as_str());

        for field in &obj.fields {
            check_reserved(owner, "field", &field.name, &field.original_name)?;
            self.check_leak(
                owner,
                &field.type_def,
                Member::Field(field.original_name.clone()),
            )?;
            self.validate(&field.type_def)?;
        }

        for func in &obj.functions {
            check_reserved(owner, "function", &func.name, &func.original_name)?;
            self.validate_function(owner, func)?;
        }

        if let Some(ctor) = &obj.constructor {
            self.validate_args(owner, ctor)?;
        }
        Ok(())
    }

    fn validate_interface(
        &self,
        def: &TypeDef,
        iface: &InterfaceTypeDef,
    ) -> Result<(), ModError> {
        if self.defined_upstream(def)? {
            return Ok(());
        }
        let owner = ("interface", iface.original_name.as_str());

        for func in &iface.functions {
            check_reserved(owner, "function", &func.name, &func.original_name)?;
            self.validate_function(owner, func)?;
        }
        Ok(())
    }

    fn validate_function(&self, owner: (&'static str, &str), func: &Function) -> Result<(), ModError> {
        self.check_leak(
            owner,
            &func.return_type,
            Member::Return(func.original_name.clone()),
        )?;
        self.validate(&func.return_type)?;
        self.validate_args(owner, func)
    }

    fn validate_args(&self, owner: (&'static str, &str), func: &Function) -> Result<(), ModError> {
        for arg in &func.args {
            self.check_leak(
                owner,
                &arg.type_def,
                Member::Arg {
                    function: func.original_name.clone(),
                    arg: arg.original_name.clone(),
                },
            )?;
            self.validate(&arg.type_def)?;
        }
        Ok(())
    }

    /// Reject `def` if a dependency other than core owns it.
    fn check_leak(
        &self,
        (owner_kind, owner): (&'static str, &str),
        def: &TypeDef,
        member: Member,
    ) -> Result<(), ModError> {
        let Some(found) = self.deps.mod_type_for(def)? else {
            return Ok(());
        };
        let Some(source) = found.source_mod() else {
            return Ok(());
        };
        if source.is_core() || source.name() == self.module_name {
            return Ok(());
        }
        Err(ModError::ExternalTypeLeak {
            owner_kind,
            owner: owner.to_string(),
            member,
            type_name: named_leaf(def).unwrap_or_default().to_string(),
            module: source.name().to_string(),
        })
    }
}

fn check_reserved(
    (owner_kind, owner): (&'static str, &str),
    member_kind: &'static str,
    name: &str,
    original_name: &str,
) -> Result<(), ModError> {
    if field_name(name) == RESERVED_NAME {
        return Err(ModError::ReservedName {
            owner_kind,
            owner: owner.to_string(),
            member_kind,
            member: original_name.to_string(),
        });
    }
    Ok(())
}

/// Name of the innermost named type, looking through lists.
fn named_leaf(def: &TypeDef) -> Option<&str> {
    match &def.kind {
        TypeDefKind::List(list) => named_leaf(&list.element),
        _ => def.name(),
    }
}
