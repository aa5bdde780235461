use std::{
    cell::{OnceCell, RefCell},
    fmt,
};

use arcstr::ArcStr;
use fnv::FnvHashMap;

use crate::{
    InvalidSchemaError,
    ast::Type,
    schema::{builder::SchemaBuilder, meta::MetaType},
    types::{base::TypeKind, name::Name},
};

/// Metadata for a finalized schema: the arena of every named type, plus the
/// root type names.
///
/// A `SchemaType` only ever exists for a schema that passed finalization, so
/// its type graph is closed (every referenced name is registered) and every
/// default value has been validated. It is plain immutable data and can be
/// shared by reference across threads.
pub struct SchemaType {
    types: FnvHashMap<Name, MetaType>,
    query_type_name: ArcStr,
    mutation_type_name: Option<ArcStr>,
}

/// A resolved view of a [`Type`] literal against a schema.
///
/// Wraps references to concrete type metadata in the list/non-null structure
/// the literal describes.
#[derive(Clone)]
pub enum TypeType<'a> {
    /// A named type's metadata.
    Concrete(&'a MetaType),
    /// A non-null wrapper around an inner type.
    NonNull(Box<TypeType<'a>>),
    /// A list of an inner type.
    List(Box<TypeType<'a>>),
}

impl SchemaType {
    pub(crate) fn new(
        types: FnvHashMap<Name, MetaType>,
        query_type_name: ArcStr,
        mutation_type_name: Option<ArcStr>,
    ) -> Self {
        Self {
            types,
            query_type_name,
            mutation_type_name,
        }
    }

    /// Looks up a type by name, wrapped in the resolved view.
    pub fn type_by_name(&self, name: &str) -> Option<TypeType> {
        self.types.get(name).map(TypeType::Concrete)
    }

    /// Looks up a type's metadata by name.
    pub fn concrete_type_by_name(&self, name: &str) -> Option<&MetaType> {
        self.types.get(name)
    }

    /// The schema's query root type.
    pub fn query_type(&self) -> TypeType {
        TypeType::Concrete(self.concrete_query_type())
    }

    /// The schema's query root type metadata.
    pub fn concrete_query_type(&self) -> &MetaType {
        self.types
            .get(self.query_type_name.as_str())
            .expect("query root type exists in a finalized schema")
    }

    /// The schema's mutation root type, if one was defined.
    pub fn mutation_type(&self) -> Option<TypeType> {
        self.concrete_mutation_type().map(TypeType::Concrete)
    }

    /// The schema's mutation root type metadata, if one was defined.
    pub fn concrete_mutation_type(&self) -> Option<&MetaType> {
        self.mutation_type_name.as_ref().map(|name| {
            self.types
                .get(name.as_str())
                .expect("mutation root type exists in a finalized schema")
        })
    }

    /// All types in the schema, in the resolved view.
    pub fn type_list(&self) -> Vec<TypeType> {
        self.types.values().map(TypeType::Concrete).collect()
    }

    /// All types' metadata in the schema.
    pub fn concrete_type_list(&self) -> Vec<&MetaType> {
        self.types.values().collect()
    }

    /// Resolves a [`Type`] literal into a [`TypeType`] view.
    ///
    /// Finalization guarantees the reference closure, so every name a stored
    /// literal mentions is present.
    pub fn make_type(&self, t: &Type) -> TypeType {
        match t {
            Type::NonNullNamed(n) => TypeType::NonNull(Box::new(
                self.type_by_name(n).expect("type exists in a finalized schema"),
            )),
            Type::NonNullList(inner) => {
                TypeType::NonNull(Box::new(TypeType::List(Box::new(self.make_type(inner)))))
            }
            Type::Named(n) => self
                .type_by_name(n)
                .expect("type exists in a finalized schema"),
            Type::List(inner) => TypeType::List(Box::new(self.make_type(inner))),
        }
    }
}

impl<'a> TypeType<'a> {
    /// The concrete metadata, if this view is not wrapped.
    #[inline]
    pub fn to_concrete(&self) -> Option<&'a MetaType> {
        match self {
            TypeType::Concrete(t) => Some(t),
            _ => None,
        }
    }

    /// Unwraps all list/non-null wrappers down to the concrete metadata.
    #[inline]
    pub fn innermost_concrete(&self) -> &'a MetaType {
        match self {
            TypeType::Concrete(t) => t,
            TypeType::NonNull(n) | TypeType::List(n) => n.innermost_concrete(),
        }
    }

    /// The element type, if this view is a list (possibly non-null).
    #[inline]
    pub fn list_contents(&self) -> Option<&TypeType<'a>> {
        match self {
            TypeType::List(n) => Some(n),
            TypeType::NonNull(n) => n.list_contents(),
            _ => None,
        }
    }

    /// Whether this view's outermost wrapper forbids `null`.
    #[inline]
    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeType::NonNull(_))
    }

    /// The kind of the outermost layer of this view.
    pub fn type_kind(&self) -> TypeKind {
        match self {
            TypeType::Concrete(t) => t.type_kind(),
            TypeType::NonNull(_) => TypeKind::NonNull,
            TypeType::List(_) => TypeKind::List,
        }
    }
}

impl fmt::Display for TypeType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeType::Concrete(t) => f.write_str(t.name().as_str()),
            TypeType::List(i) => write!(f, "[{i}]"),
            TypeType::NonNull(i) => write!(f, "{i}!"),
        }
    }
}

impl fmt::Debug for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaType")
            .field("query_type_name", &self.query_type_name)
            .field("mutation_type_name", &self.mutation_type_name)
            .field("types", &self.types.len())
            .finish()
    }
}

/// A schema root, finalized lazily.
///
/// A schema moves through `Building → Finalizing → Ready | Invalid`:
///
/// - **Building**: definitions are staged on a [`SchemaBuilder`]; nothing is
///   validated and type references may be unresolved.
/// - **Finalizing**: entered exactly once, on the first [`Schema::types`]
///   call. Every staged definition folds into the registry, every lazy type
///   reference is forced, and every stored default value is validated.
/// - **Ready**: the resolved type map is cached; later calls return it
///   without re-running anything.
/// - **Invalid**: finalization failed; the error (listing every violation) is
///   cached and re-raised on every later access. There is no partial
///   recovery.
///
/// Building and finalizing are single-threaded; once `Ready`, the returned
/// [`SchemaType`] is immutable and freely shareable.
pub struct Schema {
    staged: RefCell<Option<SchemaBuilder>>,
    finalized: OnceCell<Result<SchemaType, InvalidSchemaError>>,
}

impl Schema {
    pub(crate) fn new(builder: SchemaBuilder) -> Self {
        Self {
            staged: RefCell::new(Some(builder)),
            finalized: OnceCell::new(),
        }
    }

    /// Accesses the schema's resolved type map, finalizing on first call.
    ///
    /// Identical re-finalization attempts are no-ops returning the cached
    /// outcome: a `Ready` schema hands back the same [`SchemaType`], and an
    /// `Invalid` schema re-raises a clone of the same error without
    /// re-running any type producer.
    pub fn types(&self) -> Result<&SchemaType, InvalidSchemaError> {
        self.finalized
            .get_or_init(|| {
                let builder = self
                    .staged
                    .borrow_mut()
                    .take()
                    .expect("staged definitions are present until first finalization");
                builder.finalize()
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Whether finalization has run and succeeded.
    pub fn is_ready(&self) -> bool {
        matches!(self.finalized.get(), Some(Ok(_)))
    }

    /// Whether finalization has run and failed.
    pub fn is_invalid(&self) -> bool {
        matches!(self.finalized.get(), Some(Err(_)))
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.finalized.get() {
            None => "Building",
            Some(Ok(_)) => "Ready",
            Some(Err(_)) => "Invalid",
        };
        f.debug_struct("Schema").field("state", &state).finish()
    }
}
