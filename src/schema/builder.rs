//! Schema construction: lazy type references, per-kind definition builders,
//! the build-time type registry and the finalization pass.

use std::{cell::RefCell, fmt, mem, rc::Rc};

use arcstr::ArcStr;
use fnv::FnvHashMap;
use indexmap::IndexMap;
use itertools::Itertools as _;

use crate::{
    SchemaViolation,
    ast::{InputValue, Type},
    schema::{
        meta::{
            Argument, DeprecationStatus, EnumMeta, EnumValue, Field, InputObjectMeta,
            InputValueParseFn, InterfaceMeta, MetaType, ObjectMeta, ScalarMeta, UnionMeta,
        },
        model::SchemaType,
    },
    types::{name::Name, scalars, utilities::validate_default_value},
};

/// A type registry used to build schemas.
///
/// The registry is the arena owning every named type's metadata, keyed by
/// validated name. Forward references are legal while building: a [`Type`]
/// literal may name a type that has not registered yet, and the schema
/// finalizer checks that every referenced name eventually does.
#[derive(Debug, Default)]
pub struct Registry {
    /// Currently registered types.
    pub types: FnvHashMap<Name, MetaType>,
}

impl Registry {
    /// Constructs an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a registry with the built-in scalars (`Int`, `Float`,
    /// `String`, `Boolean`, `ID`) registered.
    pub fn with_builtin_scalars() -> Self {
        let mut registry = Self::new();
        for (name, parse_fn) in [
            ("Int", scalars::int_literal as InputValueParseFn),
            ("Float", scalars::float_literal),
            ("String", scalars::string_literal),
            ("Boolean", scalars::boolean_literal),
            ("ID", scalars::id_literal),
        ] {
            // Built-in names always parse, so registration can't fail here.
            let _ = registry.register(ScalarMeta::new(name, parse_fn).into_meta());
        }
        registry
    }

    /// Registers a named type, validating its name and rejecting collisions.
    ///
    /// On success, returns the [`Type`] literal referring to the new type.
    pub fn register(&mut self, meta: MetaType) -> Result<Type, SchemaViolation> {
        let name = Name::try_from(meta.name().clone()).map_err(|_| {
            SchemaViolation::InvalidTypeName {
                name: meta.name().clone(),
            }
        })?;
        if self.types.contains_key(name.as_str()) {
            return Err(SchemaViolation::DuplicateTypeName {
                name: meta.name().clone(),
            });
        }
        let ty = meta.as_type();
        self.types.insert(name, meta);
        Ok(ty)
    }

    /// Looks up a registered type by name.
    pub fn concrete_type_by_name(&self, name: &str) -> Option<&MetaType> {
        self.types.get(name)
    }

    /// Whether a type with the given name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }
}

/// A lazily-resolved reference to a schema type.
///
/// A reference owns either a resolved [`Type`] literal or a way of producing
/// one: a plain name (looked up when the schema is finalized, so forward
/// references work), a list or non-null wrapper over an inner reference, a
/// deferred producer, or an inline anonymous type definition.
///
/// Cloning is cheap and clones share resolution state: whichever clone
/// resolves first memoizes the outcome for all of them. A deferred producer
/// runs at most once — a failure is cached too, and later resolutions
/// re-raise it deterministically instead of re-running the producer.
#[derive(Clone)]
pub struct TypeRef {
    state: Rc<RefCell<TypeRefState>>,
}

enum TypeRefState {
    Named(ArcStr),
    List(TypeRef),
    NonNull(TypeRef),
    Deferred(Box<dyn FnOnce() -> TypeRef>),
    InlineInput(Box<InputObjectTypeBuilder>, ArcStr),
    InlineObject(Box<ObjectTypeBuilder>, ArcStr),
    /// Marker while a resolution is in flight. Observing it means the
    /// producer chain cycled back into itself.
    Resolving,
    Resolved(Type),
    Failed(Vec<SchemaViolation>),
}

impl TypeRef {
    fn with_state(state: TypeRefState) -> Self {
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// References the type with the given name.
    pub fn named(name: impl Into<ArcStr>) -> Self {
        Self::with_state(TypeRefState::Named(name.into()))
    }

    /// The built-in `Int` scalar.
    pub fn int() -> Self {
        Self::named(arcstr::literal!("Int"))
    }

    /// The built-in `Float` scalar.
    pub fn float() -> Self {
        Self::named(arcstr::literal!("Float"))
    }

    /// The built-in `String` scalar.
    pub fn string() -> Self {
        Self::named(arcstr::literal!("String"))
    }

    /// The built-in `Boolean` scalar.
    pub fn boolean() -> Self {
        Self::named(arcstr::literal!("Boolean"))
    }

    /// The built-in `ID` scalar.
    pub fn id() -> Self {
        Self::named(arcstr::literal!("ID"))
    }

    /// Wraps `inner` in a list type.
    pub fn list(inner: TypeRef) -> Self {
        Self::with_state(TypeRefState::List(inner))
    }

    /// Wraps `inner` in a non-null type.
    ///
    /// Wrapping an already non-null reference is a no-op.
    pub fn non_null(inner: TypeRef) -> Self {
        Self::with_state(TypeRefState::NonNull(inner))
    }

    /// Defers to `producer`, which is invoked at most once, on first
    /// resolution.
    pub fn deferred<F>(producer: F) -> Self
    where
        F: FnOnce() -> TypeRef + 'static,
    {
        Self::with_state(TypeRefState::Deferred(Box::new(producer)))
    }

    pub(crate) fn inline_input(builder: InputObjectTypeBuilder, auto_name: ArcStr) -> Self {
        Self::with_state(TypeRefState::InlineInput(Box::new(builder), auto_name))
    }

    pub(crate) fn inline_object(builder: ObjectTypeBuilder, auto_name: ArcStr) -> Self {
        Self::with_state(TypeRefState::InlineObject(Box::new(builder), auto_name))
    }

    /// Resolves this reference to a [`Type`] literal.
    ///
    /// Resolution is idempotent: the first call computes and memoizes the
    /// outcome (success or failure), and every later call returns the cached
    /// result. Resolving an inline anonymous definition builds and registers
    /// it under its own name, or under the owner-derived name fixed at
    /// declaration if the definition did not set one; the name is assigned
    /// exactly once, here.
    pub fn resolve(&self, registry: &mut Registry) -> Result<Type, Vec<SchemaViolation>> {
        let state = mem::replace(&mut *self.state.borrow_mut(), TypeRefState::Resolving);
        let outcome = match state {
            TypeRefState::Resolved(ty) => Ok(ty),
            TypeRefState::Failed(violations) => Err(violations),
            TypeRefState::Resolving => Err(vec![SchemaViolation::UnresolvableType {
                owner: None,
                field: None,
                argument: None,
                type_name: None,
            }]),
            TypeRefState::Named(name) => Ok(Type::Named(name)),
            TypeRefState::List(inner) => inner
                .resolve(registry)
                .map(|ty| Type::List(Box::new(ty))),
            TypeRefState::NonNull(inner) => inner.resolve(registry).map(|ty| match ty {
                Type::Named(name) => Type::NonNullNamed(name),
                Type::List(inner) => Type::NonNullList(inner),
                non_null => non_null,
            }),
            TypeRefState::Deferred(producer) => producer().resolve(registry),
            TypeRefState::InlineInput(builder, auto_name) => {
                let (meta, violations) = builder.named_or(auto_name).build(registry);
                Self::register_inline(registry, meta.into_meta(), violations)
            }
            TypeRefState::InlineObject(builder, auto_name) => {
                let (meta, violations) = builder.named_or(auto_name).build(registry);
                Self::register_inline(registry, meta.into_meta(), violations)
            }
        };
        *self.state.borrow_mut() = match &outcome {
            Ok(ty) => TypeRefState::Resolved(ty.clone()),
            Err(violations) => TypeRefState::Failed(violations.clone()),
        };
        outcome
    }

    fn register_inline(
        registry: &mut Registry,
        meta: MetaType,
        mut violations: Vec<SchemaViolation>,
    ) -> Result<Type, Vec<SchemaViolation>> {
        match registry.register(meta) {
            Ok(ty) if violations.is_empty() => Ok(ty),
            Ok(_) => Err(violations),
            Err(violation) => {
                violations.push(violation);
                Err(violations)
            }
        }
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        Self::named(ArcStr::from(name))
    }
}

impl From<ArcStr> for TypeRef {
    fn from(name: ArcStr) -> Self {
        Self::named(name)
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state.try_borrow() {
            Ok(state) => match &*state {
                TypeRefState::Named(n) => format!("Named({n})"),
                TypeRefState::List(_) => "List(..)".into(),
                TypeRefState::NonNull(_) => "NonNull(..)".into(),
                TypeRefState::Deferred(_) => "Deferred(..)".into(),
                TypeRefState::InlineInput(_, auto) => format!("InlineInput(.., {auto})"),
                TypeRefState::InlineObject(_, auto) => format!("InlineObject(.., {auto})"),
                TypeRefState::Resolving => "Resolving".into(),
                TypeRefState::Resolved(ty) => format!("Resolved({ty})"),
                TypeRefState::Failed(_) => "Failed(..)".into(),
            },
            Err(_) => "<resolving>".into(),
        };
        write!(f, "TypeRef({state})")
    }
}

/// Builder for an argument to a field, or for an input object's field.
pub struct ArgumentBuilder {
    name: ArcStr,
    description: Option<ArcStr>,
    arg_type: Option<TypeRef>,
    default_value: Option<InputValue>,
}

impl ArgumentBuilder {
    /// Starts an argument definition with the given `name`.
    ///
    /// The argument has no type yet; set one with
    /// [`of_type`](ArgumentBuilder::of_type) or
    /// [`input_object`](ArgumentBuilder::input_object), or folding it reports
    /// a configuration error.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            description: None,
            arg_type: None,
            default_value: None,
        }
    }

    /// Sets the argument's type.
    ///
    /// Overwrites any previously set type, including an inline definition —
    /// an explicit type always wins.
    #[must_use]
    pub fn of_type(mut self, ty: impl Into<TypeRef>) -> Self {
        self.arg_type = Some(ty.into());
        self
    }

    /// Defines the argument's type inline as an anonymous input object type.
    ///
    /// The type is named `<argumentName>Input` at first resolution unless the
    /// definition sets its own name. Ignored when an explicit type is already
    /// set.
    #[must_use]
    pub fn input_object(mut self, builder: InputObjectTypeBuilder) -> Self {
        if self.arg_type.is_none() {
            let auto_name = arcstr::format!("{}Input", self.name);
            self.arg_type = Some(TypeRef::inline_input(builder, auto_name));
        }
        self
    }

    /// Sets the `description` of this argument.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the argument's default value, stored verbatim.
    ///
    /// The value is validated against the argument's type when the owning
    /// schema finalizes, not here — the type may still be unresolved. An
    /// explicit `null` default is distinct from no default at all.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<InputValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Folds this builder into argument metadata, resolving its type
    /// reference against `registry`.
    pub fn build(self, registry: &mut Registry) -> (Option<Argument>, Vec<SchemaViolation>) {
        let mut violations = Vec::new();
        let arg_type = match self.arg_type {
            Some(ty) => match ty.resolve(registry) {
                Ok(ty) => Some(ty),
                Err(vs) => {
                    violations.extend(vs);
                    None
                }
            },
            None => {
                violations.push(SchemaViolation::MissingTypeDeterminant {
                    owner: None,
                    field: None,
                    argument: None,
                });
                None
            }
        };
        let argument = arg_type.map(|arg_type| Argument {
            name: self.name.clone(),
            description: self.description,
            arg_type,
            default_value: self.default_value,
        });
        let violations = violations
            .into_iter()
            .map(|v| v.in_argument(&self.name))
            .collect();
        (argument, violations)
    }
}

/// Builder for a field on an object or interface type.
pub struct FieldBuilder {
    name: ArcStr,
    description: Option<ArcStr>,
    field_type: Option<TypeRef>,
    arguments: IndexMap<ArcStr, ArgumentBuilder>,
    deprecation_status: DeprecationStatus,
}

impl FieldBuilder {
    /// Starts a field definition with the given `name`.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            description: None,
            field_type: None,
            arguments: IndexMap::new(),
            deprecation_status: DeprecationStatus::Current,
        }
    }

    /// Sets the field's result type.
    ///
    /// Overwrites any previously set type, including an inline definition.
    #[must_use]
    pub fn of_type(mut self, ty: impl Into<TypeRef>) -> Self {
        self.field_type = Some(ty.into());
        self
    }

    /// Defines the field's result type inline as an anonymous object type.
    ///
    /// The type is named `<fieldName>Result` at first resolution unless the
    /// definition sets its own name. Ignored when an explicit type is already
    /// set.
    #[must_use]
    pub fn result_object(mut self, builder: ObjectTypeBuilder) -> Self {
        if self.field_type.is_none() {
            let auto_name = arcstr::format!("{}Result", self.name);
            self.field_type = Some(TypeRef::inline_object(builder, auto_name));
        }
        self
    }

    /// Adds an argument; a later argument with the same name replaces it.
    #[must_use]
    pub fn argument(mut self, argument: ArgumentBuilder) -> Self {
        self.arguments.insert(argument.name.clone(), argument);
        self
    }

    /// Sets the `description` of this field.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks this field as deprecated with an optional `reason`.
    #[must_use]
    pub fn deprecated(mut self, reason: Option<ArcStr>) -> Self {
        self.deprecation_status = DeprecationStatus::Deprecated(reason);
        self
    }

    /// Folds this builder into field metadata, resolving every type
    /// reference against `registry`.
    ///
    /// Configuration errors are accumulated rather than failing fast; an
    /// argument that fails to fold is omitted from the result.
    pub fn build(self, registry: &mut Registry) -> (Option<Field>, Vec<SchemaViolation>) {
        let mut violations = Vec::new();
        let field_type = match self.field_type {
            Some(ty) => match ty.resolve(registry) {
                Ok(ty) => Some(ty),
                Err(vs) => {
                    violations.extend(vs);
                    None
                }
            },
            None => {
                violations.push(SchemaViolation::MissingTypeDeterminant {
                    owner: None,
                    field: None,
                    argument: None,
                });
                None
            }
        };
        let mut arguments = Vec::new();
        for (_, argument) in self.arguments {
            let (built, vs) = argument.build(registry);
            violations.extend(vs);
            if let Some(argument) = built {
                arguments.push(argument);
            }
        }
        let field = field_type.map(|field_type| Field {
            name: self.name.clone(),
            description: self.description,
            arguments,
            field_type,
            deprecation_status: self.deprecation_status,
        });
        let violations = violations
            .into_iter()
            .map(|v| v.in_field(&self.name))
            .collect();
        (field, violations)
    }
}

/// Builder for an object type.
pub struct ObjectTypeBuilder {
    name: Option<ArcStr>,
    description: Option<ArcStr>,
    fields: IndexMap<ArcStr, FieldBuilder>,
    interface_names: Vec<ArcStr>,
}

impl ObjectTypeBuilder {
    /// Starts an object type definition with the given `name`.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::anonymous()
        }
    }

    /// Starts an anonymous object type definition.
    ///
    /// Used inline (see [`FieldBuilder::result_object`]) the type is named
    /// from its owner; [`name`](ObjectTypeBuilder::name) overrides that.
    pub fn anonymous() -> Self {
        Self {
            name: None,
            description: None,
            fields: IndexMap::new(),
            interface_names: vec![],
        }
    }

    /// Sets the type's name, overriding an owner-derived one.
    #[must_use]
    pub fn name(mut self, name: impl Into<ArcStr>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the `description` of this type.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a field; a later field with the same name replaces it.
    #[must_use]
    pub fn field(mut self, field: FieldBuilder) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    /// Declares that this object implements the named interface.
    #[must_use]
    pub fn implements(mut self, interface: impl Into<ArcStr>) -> Self {
        self.interface_names.push(interface.into());
        self
    }

    fn named_or(mut self, auto_name: ArcStr) -> Self {
        if self.name.is_none() {
            self.name = Some(auto_name);
        }
        self
    }

    /// Folds this builder into object metadata, resolving every type
    /// reference against `registry`.
    pub fn build(self, registry: &mut Registry) -> (ObjectMeta, Vec<SchemaViolation>) {
        let name = self.name.unwrap_or_default();
        let mut violations = Vec::new();
        let mut fields = Vec::new();
        for (_, field) in self.fields {
            let (built, vs) = field.build(registry);
            violations.extend(vs);
            if let Some(field) = built {
                fields.push(field);
            }
        }
        let mut meta = ObjectMeta::new(name.clone(), fields);
        meta.description = self.description;
        meta.interface_names = self.interface_names;
        if !name.is_empty() {
            violations = violations.into_iter().map(|v| v.in_type(&name)).collect();
        }
        (meta, violations)
    }
}

/// Builder for an input object type.
pub struct InputObjectTypeBuilder {
    name: Option<ArcStr>,
    description: Option<ArcStr>,
    arguments: IndexMap<ArcStr, ArgumentBuilder>,
}

impl InputObjectTypeBuilder {
    /// Starts an input object type definition with the given `name`.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::anonymous()
        }
    }

    /// Starts an anonymous input object type definition.
    ///
    /// Used inline (see [`ArgumentBuilder::input_object`]) the type is named
    /// from its owner; [`name`](InputObjectTypeBuilder::name) overrides that.
    pub fn anonymous() -> Self {
        Self {
            name: None,
            description: None,
            arguments: IndexMap::new(),
        }
    }

    /// Sets the type's name, overriding an owner-derived one.
    #[must_use]
    pub fn name(mut self, name: impl Into<ArcStr>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the `description` of this type.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds an input field; a later one with the same name replaces it.
    ///
    /// Input fields reuse the argument shape: a type plus an optional
    /// default.
    #[must_use]
    pub fn argument(mut self, argument: ArgumentBuilder) -> Self {
        self.arguments.insert(argument.name.clone(), argument);
        self
    }

    fn named_or(mut self, auto_name: ArcStr) -> Self {
        if self.name.is_none() {
            self.name = Some(auto_name);
        }
        self
    }

    /// Folds this builder into input object metadata, resolving every type
    /// reference against `registry`.
    pub fn build(self, registry: &mut Registry) -> (InputObjectMeta, Vec<SchemaViolation>) {
        let name = self.name.unwrap_or_default();
        let mut violations = Vec::new();
        let mut input_fields = Vec::new();
        for (_, argument) in self.arguments {
            let (built, vs) = argument.build(registry);
            violations.extend(vs);
            if let Some(argument) = built {
                input_fields.push(argument);
            }
        }
        let mut meta = InputObjectMeta::new(name.clone(), input_fields);
        meta.description = self.description;
        if !name.is_empty() {
            violations = violations.into_iter().map(|v| v.in_type(&name)).collect();
        }
        (meta, violations)
    }
}

/// Builder for an interface type.
pub struct InterfaceTypeBuilder {
    name: ArcStr,
    description: Option<ArcStr>,
    fields: IndexMap<ArcStr, FieldBuilder>,
}

impl InterfaceTypeBuilder {
    /// Starts an interface type definition with the given `name`.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: IndexMap::new(),
        }
    }

    /// Sets the `description` of this type.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a field; a later field with the same name replaces it.
    #[must_use]
    pub fn field(mut self, field: FieldBuilder) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    /// Folds this builder into interface metadata.
    pub fn build(self, registry: &mut Registry) -> (InterfaceMeta, Vec<SchemaViolation>) {
        let mut violations = Vec::new();
        let mut fields = Vec::new();
        for (_, field) in self.fields {
            let (built, vs) = field.build(registry);
            violations.extend(vs);
            if let Some(field) = built {
                fields.push(field);
            }
        }
        let mut meta = InterfaceMeta::new(self.name.clone(), fields);
        meta.description = self.description;
        let violations = violations
            .into_iter()
            .map(|v| v.in_type(&self.name))
            .collect();
        (meta, violations)
    }
}

/// Builder for a union type.
pub struct UnionTypeBuilder {
    name: ArcStr,
    description: Option<ArcStr>,
    of_type_names: Vec<ArcStr>,
}

impl UnionTypeBuilder {
    /// Starts a union type definition with the given `name`.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            description: None,
            of_type_names: vec![],
        }
    }

    /// Sets the `description` of this type.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a member type by name. Members must be object types.
    #[must_use]
    pub fn member(mut self, name: impl Into<ArcStr>) -> Self {
        self.of_type_names.push(name.into());
        self
    }

    /// Folds this builder into union metadata.
    pub fn build(self) -> UnionMeta {
        let mut meta = UnionMeta::new(self.name, self.of_type_names);
        meta.description = self.description;
        meta
    }
}

/// Builder for an enum type.
pub struct EnumTypeBuilder {
    name: ArcStr,
    description: Option<ArcStr>,
    values: Vec<EnumValue>,
}

impl EnumTypeBuilder {
    /// Starts an enum type definition with the given `name`.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            description: None,
            values: vec![],
        }
    }

    /// Sets the `description` of this type.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a possible value.
    #[must_use]
    pub fn value(mut self, value: impl Into<EnumValue>) -> Self {
        self.values.push(value.into());
        self
    }

    /// Folds this builder into enum metadata.
    pub fn build(self) -> EnumMeta {
        let mut meta = EnumMeta::new(self.name, self.values);
        meta.description = self.description;
        meta
    }
}

/// Builder for a custom scalar type.
pub struct ScalarTypeBuilder {
    name: ArcStr,
    description: Option<ArcStr>,
    try_parse_fn: InputValueParseFn,
}

impl ScalarTypeBuilder {
    /// Starts a scalar type definition with the given `name`.
    ///
    /// The default coercion predicate accepts any scalar literal; narrow it
    /// with [`parse_with`](ScalarTypeBuilder::parse_with).
    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self {
            name: name.into(),
            description: None,
            try_parse_fn: scalars::any_scalar_literal,
        }
    }

    /// Sets the `description` of this type.
    #[must_use]
    pub fn description(mut self, description: impl Into<ArcStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the literal coercion predicate.
    #[must_use]
    pub fn parse_with(mut self, try_parse_fn: InputValueParseFn) -> Self {
        self.try_parse_fn = try_parse_fn;
        self
    }

    /// Folds this builder into scalar metadata.
    pub fn build(self) -> ScalarMeta {
        let mut meta = ScalarMeta::new(self.name, self.try_parse_fn);
        meta.description = self.description;
        meta
    }
}

enum StagedType {
    Object(ObjectTypeBuilder),
    InputObject(InputObjectTypeBuilder),
    Interface(InterfaceTypeBuilder),
    Union(UnionTypeBuilder),
    Enum(EnumTypeBuilder),
    Scalar(ScalarTypeBuilder),
}

/// Assembles a schema from type definitions.
///
/// Building is infallible and performs no validation; type references may
/// still be unresolved when a definition is staged. Every configuration
/// error is reported in one batch when the schema finalizes, on first access
/// to [`Schema::types`](crate::schema::model::Schema::types).
pub struct SchemaBuilder {
    registry: Registry,
    staged: Vec<StagedType>,
    query_type_name: Option<ArcStr>,
    mutation_type_name: Option<ArcStr>,
}

impl SchemaBuilder {
    /// Starts a schema with the built-in scalars registered.
    pub fn new() -> Self {
        Self {
            registry: Registry::with_builtin_scalars(),
            staged: vec![],
            query_type_name: None,
            mutation_type_name: None,
        }
    }

    /// Sets the schema's query root type.
    #[must_use]
    pub fn query(mut self, object: ObjectTypeBuilder) -> Self {
        self.query_type_name = Some(object.name.clone().unwrap_or_default());
        self.staged.push(StagedType::Object(object));
        self
    }

    /// Sets the schema's mutation root type.
    #[must_use]
    pub fn mutation(mut self, object: ObjectTypeBuilder) -> Self {
        self.mutation_type_name = Some(object.name.clone().unwrap_or_default());
        self.staged.push(StagedType::Object(object));
        self
    }

    /// Registers an additional object type.
    #[must_use]
    pub fn object(mut self, object: ObjectTypeBuilder) -> Self {
        self.staged.push(StagedType::Object(object));
        self
    }

    /// Registers an input object type.
    #[must_use]
    pub fn input_object(mut self, input_object: InputObjectTypeBuilder) -> Self {
        self.staged.push(StagedType::InputObject(input_object));
        self
    }

    /// Registers an interface type.
    #[must_use]
    pub fn interface(mut self, interface: InterfaceTypeBuilder) -> Self {
        self.staged.push(StagedType::Interface(interface));
        self
    }

    /// Registers a union type.
    #[must_use]
    pub fn union(mut self, union: UnionTypeBuilder) -> Self {
        self.staged.push(StagedType::Union(union));
        self
    }

    /// Registers an enum type.
    #[must_use]
    pub fn enum_type(mut self, enum_type: EnumTypeBuilder) -> Self {
        self.staged.push(StagedType::Enum(enum_type));
        self
    }

    /// Registers a custom scalar type.
    #[must_use]
    pub fn scalar(mut self, scalar: ScalarTypeBuilder) -> Self {
        self.staged.push(StagedType::Scalar(scalar));
        self
    }

    /// Finishes building and hands the definitions to a lazily-finalized
    /// [`Schema`](crate::schema::model::Schema).
    pub fn into_schema(self) -> crate::schema::model::Schema {
        crate::schema::model::Schema::new(self)
    }

    /// Runs the one-time finalization pass: folds every staged definition,
    /// forces every type reference, checks the reference closure and type
    /// positions, then validates every default value.
    ///
    /// Failures are accumulated across the whole schema; default values are
    /// only validated once the graph itself is structurally sound.
    pub(crate) fn finalize(self) -> Result<SchemaType, crate::InvalidSchemaError> {
        let Self {
            mut registry,
            staged,
            query_type_name,
            mutation_type_name,
        } = self;
        let mut violations = Vec::new();

        for staged_type in staged {
            let (meta, vs) = match staged_type {
                StagedType::Object(b) => {
                    let (meta, vs) = b.build(&mut registry);
                    (meta.into_meta(), vs)
                }
                StagedType::InputObject(b) => {
                    let (meta, vs) = b.build(&mut registry);
                    (meta.into_meta(), vs)
                }
                StagedType::Interface(b) => {
                    let (meta, vs) = b.build(&mut registry);
                    (meta.into_meta(), vs)
                }
                StagedType::Union(b) => (b.build().into_meta(), vec![]),
                StagedType::Enum(b) => (b.build().into_meta(), vec![]),
                StagedType::Scalar(b) => (b.build().into_meta(), vec![]),
            };
            violations.extend(vs);
            if let Err(violation) = registry.register(meta) {
                violations.push(violation);
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(types = registry.types.len(), "schema types folded");

        check_reference_closure(&registry, &mut violations);
        check_roots(
            &registry,
            query_type_name.as_ref(),
            mutation_type_name.as_ref(),
            &mut violations,
        );

        if violations.is_empty() {
            // Defaults are only checked against a structurally sound graph.
            let schema = SchemaType::new(
                registry.types,
                query_type_name.unwrap_or_default(),
                mutation_type_name,
            );
            validate_schema_defaults(&schema, &mut violations);
            if violations.is_empty() {
                return Ok(schema);
            }
        }

        #[cfg(feature = "tracing")]
        tracing::warn!(
            violations = violations.len(),
            "schema finalization failed"
        );
        Err(crate::InvalidSchemaError::new(violations))
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks that every type reference in the registry resolves to a registered
/// type and respects input/output positions.
fn check_reference_closure(registry: &Registry, violations: &mut Vec<SchemaViolation>) {
    let names = registry
        .types
        .keys()
        .map(|n| ArcStr::from(n.as_str()))
        .sorted()
        .collect::<Vec<_>>();
    for name in &names {
        let Some(meta) = registry.concrete_type_by_name(name) else {
            continue;
        };
        match meta {
            MetaType::Object(o) => {
                for field in &o.fields {
                    check_field(registry, name, field, violations);
                }
                for interface in &o.interface_names {
                    match registry.concrete_type_by_name(interface) {
                        None => violations.push(SchemaViolation::UnresolvableType {
                            owner: Some(name.clone()),
                            field: None,
                            argument: None,
                            type_name: Some(interface.clone()),
                        }),
                        Some(MetaType::Interface(_)) => {}
                        Some(_) => violations.push(SchemaViolation::InvalidTypePosition {
                            owner: name.clone(),
                            field: None,
                            argument: None,
                            type_name: interface.clone(),
                        }),
                    }
                }
            }
            MetaType::Interface(i) => {
                for field in &i.fields {
                    check_field(registry, name, field, violations);
                }
            }
            MetaType::Union(u) => {
                for member in &u.of_type_names {
                    match registry.concrete_type_by_name(member) {
                        None => violations.push(SchemaViolation::UnresolvableType {
                            owner: Some(name.clone()),
                            field: None,
                            argument: None,
                            type_name: Some(member.clone()),
                        }),
                        Some(MetaType::Object(_)) => {}
                        Some(_) => violations.push(SchemaViolation::InvalidTypePosition {
                            owner: name.clone(),
                            field: None,
                            argument: None,
                            type_name: member.clone(),
                        }),
                    }
                }
            }
            MetaType::InputObject(io) => {
                for input_field in &io.input_fields {
                    check_argument(registry, name, None, input_field, violations);
                }
            }
            MetaType::Scalar(_) | MetaType::Enum(_) => {}
        }
    }
}

fn check_field(
    registry: &Registry,
    owner: &ArcStr,
    field: &Field,
    violations: &mut Vec<SchemaViolation>,
) {
    let inner = field.field_type.innermost_name();
    match registry.concrete_type_by_name(inner) {
        None => violations.push(SchemaViolation::UnresolvableType {
            owner: Some(owner.clone()),
            field: Some(field.name.clone()),
            argument: None,
            type_name: Some(ArcStr::from(inner)),
        }),
        // Input objects are value types; they can't be returned from fields.
        Some(MetaType::InputObject(_)) => violations.push(SchemaViolation::InvalidTypePosition {
            owner: owner.clone(),
            field: Some(field.name.clone()),
            argument: None,
            type_name: ArcStr::from(inner),
        }),
        Some(_) => {}
    }
    for argument in &field.arguments {
        check_argument(registry, owner, Some(&field.name), argument, violations);
    }
}

fn check_argument(
    registry: &Registry,
    owner: &ArcStr,
    field: Option<&ArcStr>,
    argument: &Argument,
    violations: &mut Vec<SchemaViolation>,
) {
    let inner = argument.arg_type.innermost_name();
    match registry.concrete_type_by_name(inner) {
        None => violations.push(SchemaViolation::UnresolvableType {
            owner: Some(owner.clone()),
            field: field.cloned(),
            argument: Some(argument.name.clone()),
            type_name: Some(ArcStr::from(inner)),
        }),
        Some(meta) if !meta.is_input() => {
            violations.push(SchemaViolation::InvalidTypePosition {
                owner: owner.clone(),
                field: field.cloned(),
                argument: Some(argument.name.clone()),
                type_name: ArcStr::from(inner),
            });
        }
        Some(_) => {}
    }
}

fn check_roots(
    registry: &Registry,
    query_type_name: Option<&ArcStr>,
    mutation_type_name: Option<&ArcStr>,
    violations: &mut Vec<SchemaViolation>,
) {
    match query_type_name {
        None => violations.push(SchemaViolation::UnresolvableType {
            owner: None,
            field: None,
            argument: None,
            type_name: None,
        }),
        Some(name) => check_root(registry, name, violations),
    }
    if let Some(name) = mutation_type_name {
        check_root(registry, name, violations);
    }
}

fn check_root(registry: &Registry, name: &ArcStr, violations: &mut Vec<SchemaViolation>) {
    match registry.concrete_type_by_name(name) {
        None => violations.push(SchemaViolation::UnresolvableType {
            owner: None,
            field: None,
            argument: None,
            type_name: Some(name.clone()),
        }),
        Some(MetaType::Object(_)) => {}
        Some(_) => violations.push(SchemaViolation::InvalidTypePosition {
            owner: name.clone(),
            field: None,
            argument: None,
            type_name: name.clone(),
        }),
    }
}

/// Validates every stored default value in the schema, accumulating all
/// failures.
fn validate_schema_defaults(schema: &SchemaType, violations: &mut Vec<SchemaViolation>) {
    let metas = schema
        .concrete_type_list()
        .into_iter()
        .sorted_by_key(|m| m.name().clone())
        .collect::<Vec<_>>();
    for meta in metas {
        match meta {
            MetaType::Object(o) => {
                for field in &o.fields {
                    for argument in &field.arguments {
                        validate_default(schema, o.name.clone(), Some(&field.name), argument, violations);
                    }
                }
            }
            MetaType::Interface(i) => {
                for field in &i.fields {
                    for argument in &field.arguments {
                        validate_default(schema, i.name.clone(), Some(&field.name), argument, violations);
                    }
                }
            }
            MetaType::InputObject(io) => {
                for input_field in &io.input_fields {
                    validate_default(schema, io.name.clone(), None, input_field, violations);
                }
            }
            _ => {}
        }
    }
}

fn validate_default(
    schema: &SchemaType,
    owner: ArcStr,
    field: Option<&ArcStr>,
    argument: &Argument,
    violations: &mut Vec<SchemaViolation>,
) {
    let Some(value) = &argument.default_value else {
        return;
    };
    let arg_type = schema.make_type(&argument.arg_type);
    if let Some(err) = validate_default_value(schema, &arg_type, value) {
        violations.push(SchemaViolation::InvalidDefaultValue {
            kind: err.kind,
            owner,
            field: field.cloned(),
            argument: argument.name.clone(),
            value: value.clone(),
            path: err.path,
            expected_type: err.expected_type,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use crate::{
        ViolationKind,
        ast::Type,
        schema::meta::MetaType,
    };

    use super::{
        ArgumentBuilder, FieldBuilder, InputObjectTypeBuilder, Registry, SchemaViolation, TypeRef,
    };

    #[test]
    fn named_ref_resolves_without_lookup() {
        let mut registry = Registry::new();
        let ty = TypeRef::named("NotRegisteredYet").resolve(&mut registry).unwrap();
        assert_eq!(ty, Type::Named(arcstr::literal!("NotRegisteredYet")));
    }

    #[test]
    fn wrappers_compose() {
        let mut registry = Registry::new();

        let ty = TypeRef::list(TypeRef::non_null(TypeRef::float()))
            .resolve(&mut registry)
            .unwrap();
        assert_eq!(ty.to_string(), "[Float!]");

        let ty = TypeRef::non_null(TypeRef::list(TypeRef::float()))
            .resolve(&mut registry)
            .unwrap();
        assert_eq!(ty.to_string(), "[Float]!");

        let ty = TypeRef::non_null(TypeRef::non_null(TypeRef::float()))
            .resolve(&mut registry)
            .unwrap();
        assert_eq!(ty.to_string(), "Float!");
    }

    #[test]
    fn deferred_producer_runs_exactly_once() {
        let mut registry = Registry::with_builtin_scalars();
        let runs = Rc::new(Cell::new(0));
        let counter = Rc::clone(&runs);
        let type_ref = TypeRef::deferred(move || {
            counter.set(counter.get() + 1);
            TypeRef::string()
        });

        let first = type_ref.resolve(&mut registry).unwrap();
        let second = type_ref.clone().resolve(&mut registry).unwrap();
        assert_eq!(first, Type::Named(arcstr::literal!("String")));
        assert_eq!(first, second);
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn cyclic_producer_fails_and_failure_is_cached() {
        let mut registry = Registry::new();
        let slot: Rc<std::cell::RefCell<Option<TypeRef>>> = Rc::default();
        let inner = Rc::clone(&slot);
        let type_ref = TypeRef::deferred(move || inner.borrow().clone().unwrap());
        *slot.borrow_mut() = Some(type_ref.clone());

        let err = type_ref.resolve(&mut registry).unwrap_err();
        assert_eq!(err[0].kind(), ViolationKind::UnresolvableType);

        // Cached: the second attempt re-raises without re-running anything.
        let again = type_ref.resolve(&mut registry).unwrap_err();
        assert_eq!(err, again);
    }

    #[test]
    fn inline_input_type_is_auto_named_and_registered() {
        let mut registry = Registry::with_builtin_scalars();
        let (field, violations) = FieldBuilder::new("testField")
            .of_type(TypeRef::boolean())
            .argument(ArgumentBuilder::new("something").input_object(
                InputObjectTypeBuilder::anonymous()
                    .argument(ArgumentBuilder::new("a").of_type(TypeRef::string()))
                    .argument(ArgumentBuilder::new("b").of_type(TypeRef::int())),
            ))
            .build(&mut registry);

        assert!(violations.is_empty());
        let field = field.unwrap();
        let argument = field.argument_by_name("something").unwrap();
        assert_eq!(argument.arg_type, Type::Named(arcstr::literal!("somethingInput")));

        let meta = registry.concrete_type_by_name("somethingInput").unwrap();
        let MetaType::InputObject(meta) = meta else {
            panic!("expected an input object, got {meta:?}");
        };
        let names: Vec<_> = meta.input_fields.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn inline_type_keeps_its_own_name() {
        let mut registry = Registry::with_builtin_scalars();
        let (argument, violations) = ArgumentBuilder::new("stuff")
            .input_object(
                InputObjectTypeBuilder::anonymous().name("SomethingType").argument(
                    ArgumentBuilder::new("x").input_object(
                        InputObjectTypeBuilder::anonymous()
                            .name("SomethingElseType")
                            .argument(ArgumentBuilder::new("y").of_type(TypeRef::boolean())),
                    ),
                ),
            )
            .build(&mut registry);

        assert!(violations.is_empty());
        let argument = argument.unwrap();
        assert_eq!(argument.arg_type, Type::Named(arcstr::literal!("SomethingType")));

        let outer = registry.concrete_type_by_name("SomethingType").unwrap();
        let x = outer.input_field_by_name("x").unwrap();
        assert_eq!(x.arg_type, Type::Named(arcstr::literal!("SomethingElseType")));
        let inner = registry.concrete_type_by_name("SomethingElseType").unwrap();
        let y = inner.input_field_by_name("y").unwrap();
        assert_eq!(y.arg_type, Type::Named(arcstr::literal!("Boolean")));
    }

    #[test]
    fn argument_without_type_is_a_configuration_error() {
        let mut registry = Registry::new();
        let (argument, violations) = ArgumentBuilder::new("orphan").build(&mut registry);
        assert!(argument.is_none());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind(), ViolationKind::MissingTypeDeterminant);
        assert_eq!(
            violations[0].to_string(),
            "argument \"orphan\" must specify a type or provide a type definition block",
        );
    }

    #[test]
    fn explicit_type_wins_over_inline_block() {
        let mut registry = Registry::with_builtin_scalars();
        let (argument, violations) = ArgumentBuilder::new("pick")
            .of_type(TypeRef::string())
            .input_object(InputObjectTypeBuilder::anonymous())
            .build(&mut registry);
        assert!(violations.is_empty());
        assert_eq!(
            argument.unwrap().arg_type,
            Type::Named(arcstr::literal!("String")),
        );
        assert!(!registry.contains("pickInput"));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = Registry::with_builtin_scalars();
        let err = registry
            .register(crate::meta::ScalarMeta::new("String", crate::types::scalars::string_literal).into_meta())
            .unwrap_err();
        assert_eq!(err.kind(), ViolationKind::DuplicateTypeName);
        assert_eq!(err.to_string(), "Duplicate type definition for \"String\"");
    }

    #[test]
    fn invalid_type_name_is_rejected() {
        let mut registry = Registry::new();
        let err = registry
            .register(crate::meta::ScalarMeta::new("Not-A-Name", crate::types::scalars::any_scalar_literal).into_meta())
            .unwrap_err();
        assert_eq!(err.kind(), ViolationKind::InvalidTypeName);
    }

    #[test]
    fn duplicate_auto_names_collide() {
        let mut registry = Registry::with_builtin_scalars();
        let inline = || {
            ArgumentBuilder::new("something").input_object(
                InputObjectTypeBuilder::anonymous()
                    .argument(ArgumentBuilder::new("a").of_type(TypeRef::string())),
            )
        };
        let (_, violations) = inline().build(&mut registry);
        assert!(violations.is_empty());
        let (argument, violations) = inline().build(&mut registry);
        assert!(argument.is_none());
        assert!(
            violations
                .iter()
                .any(|v| matches!(v, SchemaViolation::DuplicateTypeName { name } if name.as_str() == "somethingInput")),
        );
    }
}
