use derive_more::Display;

/// The kinds of types a schema can contain.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum TypeKind {
    /// ## Scalar types
    ///
    /// Scalar types appear as the leaf nodes of a schema. Strings, numbers,
    /// and booleans are the built in types, and coercion predicates let
    /// callers define their own.
    #[display("SCALAR")]
    Scalar,

    /// ## Object types
    ///
    /// The most common type to be defined by users. Objects have fields and
    /// can implement interfaces.
    #[display("OBJECT")]
    Object,

    /// ## Interface types
    ///
    /// Interface types are used to represent overlapping fields between
    /// multiple types.
    #[display("INTERFACE")]
    Interface,

    /// ## Union types
    ///
    /// Unions are similar to interfaces but can not contain any fields on
    /// their own.
    #[display("UNION")]
    Union,

    /// ## Enum types
    ///
    /// Like scalars, enum types appear as the leaf nodes of a schema.
    #[display("ENUM")]
    Enum,

    /// ## Input objects
    ///
    /// Represents complex values provided _into_ the system, e.g. as
    /// arguments or their defaults.
    #[display("INPUT_OBJECT")]
    InputObject,

    /// ## List types
    ///
    /// Represent lists of other types.
    #[display("LIST")]
    List,

    /// ## Non-null types
    ///
    /// In this schema model, nullable types are the default. A non-null
    /// wrapper marks a position where `null` is forbidden.
    #[display("NON_NULL")]
    NonNull,
}
