//! Types used to describe a finalized schema.

use std::fmt;

use arcstr::ArcStr;

use crate::{
    ast::{InputValue, Type},
    types::base::TypeKind,
};

/// Whether an item is deprecated, with context.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum DeprecationStatus {
    /// The field/variant is not deprecated.
    Current,
    /// The field/variant is deprecated, with an optional reason.
    Deprecated(Option<ArcStr>),
}

impl DeprecationStatus {
    /// If this deprecation status indicates the item is deprecated.
    pub fn is_deprecated(&self) -> bool {
        match self {
            DeprecationStatus::Current => false,
            DeprecationStatus::Deprecated(_) => true,
        }
    }

    /// An optional reason for the deprecation, or none if `Current`.
    pub fn reason(&self) -> Option<&str> {
        match self {
            DeprecationStatus::Current => None,
            DeprecationStatus::Deprecated(rsn) => rsn.as_deref(),
        }
    }
}

/// Shortcut for a literal coercion predicate.
///
/// A predicate takes a candidate [`InputValue`] and decides whether its shape
/// can be coerced into the scalar's native representation. `null` never
/// reaches a predicate; nullability is handled by the validator.
pub type InputValueParseFn = fn(&InputValue) -> bool;

/// Scalar type metadata
pub struct ScalarMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    pub(crate) try_parse_fn: InputValueParseFn,
}

/// Object type metadata
#[derive(Debug)]
pub struct ObjectMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub fields: Vec<Field>,
    #[doc(hidden)]
    pub interface_names: Vec<ArcStr>,
}

/// Enum type metadata
#[derive(Debug)]
pub struct EnumMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub values: Vec<EnumValue>,
}

/// Interface type metadata
#[derive(Debug)]
pub struct InterfaceMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub fields: Vec<Field>,
}

/// Union type metadata
#[derive(Debug)]
pub struct UnionMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub of_type_names: Vec<ArcStr>,
}

/// Input object metadata
#[derive(Debug)]
pub struct InputObjectMeta {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub input_fields: Vec<Argument>,
}

/// Generic type metadata
///
/// Every named type a schema contains is one of these. List and non-null
/// wrappers are not arena entries; they live in [`Type`] literals and in the
/// resolved [`TypeType`](crate::schema::model::TypeType) view.
#[derive(Debug)]
pub enum MetaType {
    #[doc(hidden)]
    Scalar(ScalarMeta),
    #[doc(hidden)]
    Object(ObjectMeta),
    #[doc(hidden)]
    Enum(EnumMeta),
    #[doc(hidden)]
    Interface(InterfaceMeta),
    #[doc(hidden)]
    Union(UnionMeta),
    #[doc(hidden)]
    InputObject(InputObjectMeta),
}

/// Metadata for a field
#[derive(Debug, Clone)]
pub struct Field {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub arguments: Vec<Argument>,
    #[doc(hidden)]
    pub field_type: Type,
    #[doc(hidden)]
    pub deprecation_status: DeprecationStatus,
}

/// Metadata for an argument to a field, or for an input object's field.
#[derive(Debug, Clone)]
pub struct Argument {
    #[doc(hidden)]
    pub name: ArcStr,
    #[doc(hidden)]
    pub description: Option<ArcStr>,
    #[doc(hidden)]
    pub arg_type: Type,
    #[doc(hidden)]
    pub default_value: Option<InputValue>,
}

/// Metadata for a single value in an enum
#[derive(Debug, Clone)]
pub struct EnumValue {
    /// The name of the enum value.
    ///
    /// This is the string literal representation of the enum in responses.
    pub name: ArcStr,
    /// The optional description of the enum value.
    ///
    /// Note: this is not the description of the enum itself; it's the
    /// description of this enum _value_.
    pub description: Option<ArcStr>,
    /// Whether the value is deprecated or not, with an optional reason.
    pub deprecation_status: DeprecationStatus,
}

impl MetaType {
    /// Accesses the name of the type.
    pub fn name(&self) -> &ArcStr {
        match self {
            MetaType::Scalar(ScalarMeta { name, .. })
            | MetaType::Object(ObjectMeta { name, .. })
            | MetaType::Enum(EnumMeta { name, .. })
            | MetaType::Interface(InterfaceMeta { name, .. })
            | MetaType::Union(UnionMeta { name, .. })
            | MetaType::InputObject(InputObjectMeta { name, .. }) => name,
        }
    }

    /// Accesses the description of the type, if set.
    pub fn description(&self) -> Option<&ArcStr> {
        match self {
            MetaType::Scalar(ScalarMeta { description, .. })
            | MetaType::Object(ObjectMeta { description, .. })
            | MetaType::Enum(EnumMeta { description, .. })
            | MetaType::Interface(InterfaceMeta { description, .. })
            | MetaType::Union(UnionMeta { description, .. })
            | MetaType::InputObject(InputObjectMeta { description, .. }) => description.as_ref(),
        }
    }

    /// Constructs a [`TypeKind`] for this type.
    pub fn type_kind(&self) -> TypeKind {
        match self {
            MetaType::Scalar(_) => TypeKind::Scalar,
            MetaType::Object(_) => TypeKind::Object,
            MetaType::Enum(_) => TypeKind::Enum,
            MetaType::Interface(_) => TypeKind::Interface,
            MetaType::Union(_) => TypeKind::Union,
            MetaType::InputObject(_) => TypeKind::InputObject,
        }
    }

    /// Accesses a field's meta data given its name.
    ///
    /// Only objects and interfaces have fields. This method always returns
    /// `None` for other types.
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        match self {
            MetaType::Object(ObjectMeta { fields, .. })
            | MetaType::Interface(InterfaceMeta { fields, .. }) => {
                fields.iter().find(|f| f.name == name)
            }
            _ => None,
        }
    }

    /// Accesses an input field's meta data given its name.
    ///
    /// Only input objects have input fields. This method always returns
    /// `None` for other types.
    pub fn input_field_by_name(&self, name: &str) -> Option<&Argument> {
        match self {
            MetaType::InputObject(InputObjectMeta { input_fields, .. }) => {
                input_fields.iter().find(|f| f.name == name)
            }
            _ => None,
        }
    }

    /// Constructs a [`Type`] literal instance based on the metadata.
    ///
    /// Types are nullable by default; wrap the result to make it non-null.
    pub fn as_type(&self) -> Type {
        Type::Named(self.name().clone())
    }

    /// Accesses the literal coercion predicate, if applicable.
    ///
    /// Only scalars carry predicates; enums and input objects are validated
    /// structurally.
    pub fn input_value_parse_fn(&self) -> Option<InputValueParseFn> {
        match self {
            MetaType::Scalar(ScalarMeta { try_parse_fn, .. }) => Some(*try_parse_fn),
            _ => None,
        }
    }

    /// Returns true if the type is a composite type.
    ///
    /// Objects, interfaces, and unions are composite.
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            MetaType::Object(_) | MetaType::Interface(_) | MetaType::Union(_)
        )
    }

    /// Returns true if the type can occur in leaf positions.
    ///
    /// Only enums and scalars are leaf types.
    pub fn is_leaf(&self) -> bool {
        matches!(self, MetaType::Enum(_) | MetaType::Scalar(_))
    }

    /// Returns true if the type can be used in input positions, e.g.
    /// arguments, input fields or their defaults.
    ///
    /// Only scalars, enums, and input objects are input types.
    pub fn is_input(&self) -> bool {
        matches!(
            self,
            MetaType::Scalar(_) | MetaType::Enum(_) | MetaType::InputObject(_)
        )
    }

    /// Returns true if the type is one of the built-in scalars.
    pub fn is_builtin(&self) -> bool {
        crate::types::scalars::BUILTIN_SCALAR_NAMES.contains(&self.name().as_str())
    }
}

impl ScalarMeta {
    /// Builds a new [`ScalarMeta`] type with the specified `name` and
    /// literal coercion predicate.
    pub fn new(name: impl Into<ArcStr>, try_parse_fn: InputValueParseFn) -> Self {
        Self {
            name: name.into(),
            description: None,
            try_parse_fn,
        }
    }

    /// Sets the `description` of this [`ScalarMeta`] type.
    ///
    /// Overwrites any previously set description.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Wraps this [`ScalarMeta`] type into a generic [`MetaType`].
    pub fn into_meta(self) -> MetaType {
        MetaType::Scalar(self)
    }
}

impl ObjectMeta {
    /// Builds a new [`ObjectMeta`] type with the specified `name` and `fields`.
    pub fn new(name: impl Into<ArcStr>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields,
            interface_names: vec![],
        }
    }

    /// Sets the `description` of this [`ObjectMeta`] type.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the interfaces this [`ObjectMeta`] type implements.
    ///
    /// Overwrites any previously set list of interfaces.
    #[must_use]
    pub fn interfaces(mut self, interfaces: Vec<ArcStr>) -> Self {
        self.interface_names = interfaces;
        self
    }

    /// Wraps this [`ObjectMeta`] type into a generic [`MetaType`].
    pub fn into_meta(self) -> MetaType {
        MetaType::Object(self)
    }
}

impl EnumMeta {
    /// Builds a new [`EnumMeta`] type with the specified `name` and possible
    /// `values`.
    pub fn new(name: impl Into<ArcStr>, values: Vec<EnumValue>) -> Self {
        Self {
            name: name.into(),
            description: None,
            values,
        }
    }

    /// Sets the `description` of this [`EnumMeta`] type.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Wraps this [`EnumMeta`] type into a generic [`MetaType`].
    pub fn into_meta(self) -> MetaType {
        MetaType::Enum(self)
    }
}

impl InterfaceMeta {
    /// Builds a new [`InterfaceMeta`] type with the specified `name` and
    /// `fields`.
    pub fn new(name: impl Into<ArcStr>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields,
        }
    }

    /// Sets the `description` of this [`InterfaceMeta`] type.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Wraps this [`InterfaceMeta`] type into a generic [`MetaType`].
    pub fn into_meta(self) -> MetaType {
        MetaType::Interface(self)
    }
}

impl UnionMeta {
    /// Builds a new [`UnionMeta`] type with the specified `name` and member
    /// type names.
    pub fn new(name: impl Into<ArcStr>, of_type_names: Vec<ArcStr>) -> Self {
        Self {
            name: name.into(),
            description: None,
            of_type_names,
        }
    }

    /// Sets the `description` of this [`UnionMeta`] type.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Wraps this [`UnionMeta`] type into a generic [`MetaType`].
    pub fn into_meta(self) -> MetaType {
        MetaType::Union(self)
    }
}

impl InputObjectMeta {
    /// Builds a new [`InputObjectMeta`] type with the specified `name` and
    /// `input_fields`.
    pub fn new(name: impl Into<ArcStr>, input_fields: Vec<Argument>) -> Self {
        Self {
            name: name.into(),
            description: None,
            input_fields,
        }
    }

    /// Sets the `description` of this [`InputObjectMeta`] type.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Wraps this [`InputObjectMeta`] type into a generic [`MetaType`].
    pub fn into_meta(self) -> MetaType {
        MetaType::InputObject(self)
    }
}

impl Field {
    /// Builds a new [`Field`] of the given result [`Type`] with the given
    /// `name`.
    pub fn new(name: impl Into<ArcStr>, field_type: Type) -> Self {
        Self {
            name: name.into(),
            description: None,
            arguments: vec![],
            field_type,
            deprecation_status: DeprecationStatus::Current,
        }
    }

    /// Sets the `description` of this [`Field`].
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds an `argument` to this [`Field`].
    ///
    /// Arguments are ordered and can't contain duplicates by name.
    #[must_use]
    pub fn argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Accesses an argument's meta data given its name.
    pub fn argument_by_name(&self, name: &str) -> Option<&Argument> {
        self.arguments.iter().find(|a| a.name == name)
    }

    /// Sets this [`Field`] as deprecated with an optional `reason`.
    ///
    /// Overwrites any previously set deprecation reason.
    #[must_use]
    pub fn deprecated(mut self, reason: Option<ArcStr>) -> Self {
        self.deprecation_status = DeprecationStatus::Deprecated(reason);
        self
    }
}

impl Argument {
    /// Builds a new [`Argument`] of the given [`Type`] with the given `name`.
    pub fn new(name: impl Into<ArcStr>, arg_type: Type) -> Self {
        Self {
            name: name.into(),
            description: None,
            arg_type,
            default_value: None,
        }
    }

    /// Sets the `description` of this [`Argument`].
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the default value of this [`Argument`].
    ///
    /// Overwrites any previously set default value. An explicit `null`
    /// default is distinct from no default at all; see [`Argument::has_default`].
    #[must_use]
    pub fn default_value(mut self, val: InputValue) -> Self {
        self.default_value = Some(val);
        self
    }

    /// Whether a default value was supplied for this argument.
    ///
    /// Returns `true` for an explicit `null` default as well; an argument
    /// without any default returns `false`.
    pub fn has_default(&self) -> bool {
        self.default_value.is_some()
    }
}

impl EnumValue {
    /// Constructs a new [`EnumValue`] with the provided `name`.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            description: None,
            deprecation_status: DeprecationStatus::Current,
        }
    }

    /// Sets the `description` of this [`EnumValue`].
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets this [`EnumValue`] as deprecated with an optional `reason`.
    #[must_use]
    pub fn deprecated(mut self, reason: Option<ArcStr>) -> Self {
        self.deprecation_status = DeprecationStatus::Deprecated(reason);
        self
    }
}

impl From<&str> for EnumValue {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Debug for ScalarMeta {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("ScalarMeta")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{InputValue, Type};

    use super::{Argument, DeprecationStatus, Field, ObjectMeta, ScalarMeta};

    #[test]
    fn argument_default_value_presence() {
        let arg = Argument::new("favoriteFood", Type::Named(arcstr::literal!("String")));
        assert!(!arg.has_default());
        assert_eq!(arg.default_value, None);

        let arg = arg.default_value(graphql_input_value!("Default"));
        assert!(arg.has_default());
        assert_eq!(
            arg.default_value.as_ref().and_then(InputValue::as_string_value),
            Some("Default"),
        );

        let arg = Argument::new("favoriteFood", Type::Named(arcstr::literal!("String")))
            .default_value(graphql_input_value!(null));
        assert!(arg.has_default());
        assert_eq!(arg.default_value, Some(InputValue::Null));
    }

    #[test]
    fn field_argument_order_and_lookup() {
        let field = Field::new("testField", Type::Named(arcstr::literal!("Boolean")))
            .argument(Argument::new("a", Type::Named(arcstr::literal!("String"))))
            .argument(Argument::new("b", Type::Named(arcstr::literal!("Int"))));

        let names: Vec<_> = field.arguments.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert!(field.argument_by_name("b").is_some());
        assert!(field.argument_by_name("c").is_none());
    }

    #[test]
    fn deprecation() {
        let field = Field::new("old", Type::Named(arcstr::literal!("String")))
            .deprecated(Some(arcstr::literal!("use `new` instead")));
        assert!(field.deprecation_status.is_deprecated());
        assert_eq!(field.deprecation_status.reason(), Some("use `new` instead"));
        assert_eq!(DeprecationStatus::Current.reason(), None);
    }

    #[test]
    fn meta_type_accessors() {
        let obj = ObjectMeta::new(
            "Query",
            vec![Field::new("x", Type::Named(arcstr::literal!("Int")))],
        )
        .into_meta();
        assert_eq!(obj.name().as_str(), "Query");
        assert!(obj.field_by_name("x").is_some());
        assert!(obj.is_composite());
        assert!(!obj.is_input());
        assert_eq!(obj.as_type(), Type::Named(arcstr::literal!("Query")));

        let scalar = ScalarMeta::new("Float", crate::types::scalars::float_literal).into_meta();
        assert!(scalar.is_input());
        assert!(scalar.is_leaf());
        assert!(scalar.is_builtin());
        assert!(scalar.input_value_parse_fn().is_some());
    }
}
