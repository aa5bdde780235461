#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

use std::fmt;

use arcstr::ArcStr;
use itertools::Itertools as _;

#[macro_use]
mod macros;
mod ast;
mod schema;
mod types;
mod value;

#[cfg(test)]
mod tests;

pub use crate::{
    ast::{InputValue, Type},
    schema::{
        builder::{
            ArgumentBuilder, EnumTypeBuilder, FieldBuilder, InputObjectTypeBuilder,
            InterfaceTypeBuilder, ObjectTypeBuilder, Registry, ScalarTypeBuilder, SchemaBuilder,
            TypeRef, UnionTypeBuilder,
        },
        meta,
        model::{Schema, SchemaType, TypeType},
    },
    types::{
        base::TypeKind,
        name::{Name, NameParseError},
        utilities::{DefaultValueError, PathSegment, ValuePath, validate_default_value},
    },
    value::ScalarValue,
};

/// The taxonomy of schema configuration and validation failures.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ViolationKind {
    /// A type reference never resolves: it names an undefined type, has no
    /// query root to anchor to, or its producer chain cycles.
    UnresolvableType,
    /// Two types registered under the same name.
    DuplicateTypeName,
    /// A type name does not match the name grammar.
    InvalidTypeName,
    /// A field or argument has neither an explicit type nor a type-defining
    /// block.
    MissingTypeDeterminant,
    /// A `null` default in a non-null position.
    NullDisallowed,
    /// A default value's shape does not fit its declared type.
    TypeMismatch,
    /// A default value names an input field its type does not declare.
    UnknownField,
    /// An output type used where only input types are legal, or vice versa.
    InvalidTypePosition,
}

/// A single failure found while finalizing a schema.
///
/// Default-value violations carry the full context needed to pinpoint the
/// failure: the owning type, field and argument, the offending value, the
/// path inside it, and the expected type at the failure point.
#[derive(Clone, Debug, PartialEq)]
pub enum SchemaViolation {
    /// A stored default value failed validation against its declared type.
    InvalidDefaultValue {
        /// Which rule rejected the value.
        kind: ViolationKind,
        /// The owning type's name.
        owner: ArcStr,
        /// The owning field, absent for input object field defaults.
        field: Option<ArcStr>,
        /// The argument (or input field) carrying the default.
        argument: ArcStr,
        /// The offending value, verbatim.
        value: InputValue,
        /// Where inside the value the check failed; empty at the root.
        path: ValuePath,
        /// Display of the expected type at the failure point.
        expected_type: String,
    },
    /// A field or argument has neither an explicit type nor a type-defining
    /// block.
    MissingTypeDeterminant {
        /// The owning type's name, when known.
        owner: Option<ArcStr>,
        /// The owning field, when known.
        field: Option<ArcStr>,
        /// The argument, when the failure is on one.
        argument: Option<ArcStr>,
    },
    /// Two types registered under the same name.
    DuplicateTypeName {
        /// The contested name.
        name: ArcStr,
    },
    /// A type name does not match `/^[_a-zA-Z][_a-zA-Z0-9]*$/`.
    InvalidTypeName {
        /// The rejected name.
        name: ArcStr,
    },
    /// A type reference never resolves.
    UnresolvableType {
        /// The owning type's name, when known.
        owner: Option<ArcStr>,
        /// The owning field, when known.
        field: Option<ArcStr>,
        /// The argument, when the failure is on one.
        argument: Option<ArcStr>,
        /// The undefined name; `None` when a producer chain cycled instead.
        type_name: Option<ArcStr>,
    },
    /// A type used in a position its kind does not allow.
    InvalidTypePosition {
        /// The owning type's name.
        owner: ArcStr,
        /// The owning field, when the failure is on one.
        field: Option<ArcStr>,
        /// The argument, when the failure is on one.
        argument: Option<ArcStr>,
        /// The offending type's name.
        type_name: ArcStr,
    },
}

impl SchemaViolation {
    /// Which kind of failure this is.
    pub fn kind(&self) -> ViolationKind {
        match self {
            Self::InvalidDefaultValue { kind, .. } => *kind,
            Self::MissingTypeDeterminant { .. } => ViolationKind::MissingTypeDeterminant,
            Self::DuplicateTypeName { .. } => ViolationKind::DuplicateTypeName,
            Self::InvalidTypeName { .. } => ViolationKind::InvalidTypeName,
            Self::UnresolvableType { .. } => ViolationKind::UnresolvableType,
            Self::InvalidTypePosition { .. } => ViolationKind::InvalidTypePosition,
        }
    }

    /// Fills the argument slot, unless the violation already knows its owner
    /// or argument.
    pub(crate) fn in_argument(self, name: &ArcStr) -> Self {
        match self {
            Self::MissingTypeDeterminant {
                owner: None,
                field,
                argument: None,
            } => Self::MissingTypeDeterminant {
                owner: None,
                field,
                argument: Some(name.clone()),
            },
            Self::UnresolvableType {
                owner: None,
                field,
                argument: None,
                type_name,
            } => Self::UnresolvableType {
                owner: None,
                field,
                argument: Some(name.clone()),
                type_name,
            },
            other => other,
        }
    }

    /// Fills the field slot, unless the violation already knows its owner or
    /// field.
    pub(crate) fn in_field(self, name: &ArcStr) -> Self {
        match self {
            Self::MissingTypeDeterminant {
                owner: None,
                field: None,
                argument,
            } => Self::MissingTypeDeterminant {
                owner: None,
                field: Some(name.clone()),
                argument,
            },
            Self::UnresolvableType {
                owner: None,
                field: None,
                argument,
                type_name,
            } => Self::UnresolvableType {
                owner: None,
                field: Some(name.clone()),
                argument,
                type_name,
            },
            other => other,
        }
    }

    /// Fills the owner slot, unless the violation already knows its owner.
    pub(crate) fn in_type(self, name: &ArcStr) -> Self {
        match self {
            Self::MissingTypeDeterminant {
                owner: None,
                field,
                argument,
            } => Self::MissingTypeDeterminant {
                owner: Some(name.clone()),
                field,
                argument,
            },
            Self::UnresolvableType {
                owner: None,
                field,
                argument,
                type_name,
            } => Self::UnresolvableType {
                owner: Some(name.clone()),
                field,
                argument,
                type_name,
            },
            other => other,
        }
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDefaultValue {
                owner,
                field,
                argument,
                value,
                path,
                expected_type,
                ..
            } => {
                write!(f, "{owner} is invalid: ")?;
                if let Some(field) = field {
                    write!(f, "field \"{field}\" ")?;
                }
                write!(
                    f,
                    "argument \"{argument}\" default value {value} is not valid for type {expected_type}",
                )?;
                if !path.is_empty() {
                    write!(f, " (at {path})")?;
                }
                Ok(())
            }
            Self::MissingTypeDeterminant {
                owner,
                field,
                argument,
            } => {
                if let Some(owner) = owner {
                    write!(f, "{owner} is invalid: ")?;
                }
                if let Some(field) = field {
                    write!(f, "field \"{field}\" ")?;
                }
                if let Some(argument) = argument {
                    write!(f, "argument \"{argument}\" ")?;
                }
                write!(f, "must specify a type or provide a type definition block")
            }
            Self::DuplicateTypeName { name } => {
                write!(f, "Duplicate type definition for \"{name}\"")
            }
            Self::InvalidTypeName { name } => {
                write!(
                    f,
                    "Names must match /^[_a-zA-Z][_a-zA-Z0-9]*$/ but \"{name}\" does not",
                )
            }
            Self::UnresolvableType {
                owner,
                field,
                argument,
                type_name,
            } => {
                if owner.is_none() && field.is_none() && argument.is_none() {
                    return match type_name {
                        Some(name) => write!(f, "Root type \"{name}\" is not defined"),
                        None => write!(f, "Schema has no query root type"),
                    };
                }
                if let Some(owner) = owner {
                    write!(f, "{owner} is invalid: ")?;
                }
                if let Some(field) = field {
                    write!(f, "field \"{field}\" ")?;
                }
                if let Some(argument) = argument {
                    write!(f, "argument \"{argument}\" ")?;
                }
                match type_name {
                    Some(name) => write!(f, "references undefined type \"{name}\""),
                    None => write!(
                        f,
                        "has a cyclic type reference that never resolves to a named type",
                    ),
                }
            }
            Self::InvalidTypePosition {
                owner,
                field,
                argument,
                type_name,
            } => {
                write!(f, "{owner} is invalid: ")?;
                if let Some(field) = field {
                    write!(f, "field \"{field}\" ")?;
                }
                if let Some(argument) = argument {
                    write!(
                        f,
                        "argument \"{argument}\" type {type_name} is not a valid input type",
                    )
                } else if field.is_some() {
                    write!(f, "type {type_name} is not a valid return type")
                } else {
                    write!(f, "type {type_name} is not valid in this position")
                }
            }
        }
    }
}

impl std::error::Error for SchemaViolation {}

/// An error that prevented a schema from finalizing.
///
/// Finalization accumulates failures across the whole schema rather than
/// stopping at the first one, so this carries every violation found. The
/// schema that produced it is permanently unusable; re-reading its type map
/// re-raises a clone of this error.
#[derive(Clone, Debug, PartialEq)]
pub struct InvalidSchemaError {
    violations: Vec<SchemaViolation>,
}

impl InvalidSchemaError {
    pub(crate) fn new(violations: Vec<SchemaViolation>) -> Self {
        Self { violations }
    }

    /// Every violation found, in deterministic schema walk order.
    pub fn violations(&self) -> &[SchemaViolation] {
        &self.violations
    }
}

impl fmt::Display for InvalidSchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.violations.iter().join("\n"))
    }
}

impl std::error::Error for InvalidSchemaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.violations
            .first()
            .map(|v| v as &(dyn std::error::Error + 'static))
    }
}
