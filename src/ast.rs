use std::fmt;

use arcstr::ArcStr;
use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer};

use crate::value::ScalarValue;

/// A type literal referring to a schema type by name.
///
/// This enum carries no semantic information and might refer to types that do
/// not exist; every reference is checked when the owning schema is finalized.
/// Because composite types refer to each other through these name indices
/// rather than by ownership, cyclic and mutually recursive type graphs are
/// representable without ownership cycles.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Type {
    /// A nullable named type, e.g. `String`.
    Named(ArcStr),
    /// A nullable list type, e.g. `[String]`.
    ///
    /// The list itself is what's nullable, the contained type might be non-null.
    List(Box<Type>),
    /// A non-null named type, e.g. `String!`.
    NonNullNamed(ArcStr),
    /// A non-null list type, e.g. `[String]!`.
    ///
    /// The list itself is what's non-null, the contained type might be null.
    NonNullList(Box<Type>),
}

impl Type {
    /// Gets the name of a named type.
    ///
    /// Only applies to named types; lists will return `None`.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(n) | Self::NonNullNamed(n) => Some(n),
            _ => None,
        }
    }

    /// Gets the innermost name by unpacking lists.
    ///
    /// All type literals contain exactly one named type.
    pub fn innermost_name(&self) -> &str {
        match self {
            Self::Named(n) | Self::NonNullNamed(n) => n,
            Self::List(l) | Self::NonNullList(l) => l.innermost_name(),
        }
    }

    /// Determines if this type can only represent non-null values.
    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNullNamed(_) | Self::NonNullList(_))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(n) => write!(f, "{n}"),
            Self::NonNullNamed(n) => write!(f, "{n}!"),
            Self::List(t) => write!(f, "[{t}]"),
            Self::NonNullList(t) => write!(f, "[{t}]!"),
        }
    }
}

/// A JSON-like value usable as an argument or input field default.
///
/// Defaults are stored verbatim at definition time and validated against
/// their declared type during schema finalization, so a value may be
/// structurally arbitrary here. Lists and objects preserve the order in
/// which their entries were written.
#[derive(Clone, Debug, PartialEq)]
pub enum InputValue {
    /// An explicit `null` literal.
    Null,
    /// A scalar literal (int, float, string or boolean).
    Scalar(ScalarValue),
    /// An enum literal, e.g. `NORTH`.
    Enum(String),
    /// An ordered list of values.
    List(Vec<InputValue>),
    /// An ordered mapping of field names to values.
    Object(Vec<(String, InputValue)>),
}

impl InputValue {
    /// Constructs a `null` value.
    pub fn null() -> Self {
        Self::Null
    }

    /// Constructs a scalar value.
    pub fn scalar<T: Into<ScalarValue>>(v: T) -> Self {
        Self::Scalar(v.into())
    }

    /// Constructs an enum value.
    pub fn enum_value<T: AsRef<str>>(s: T) -> Self {
        Self::Enum(s.as_ref().into())
    }

    /// Constructs a list from the given values.
    pub fn list(l: Vec<Self>) -> Self {
        Self::List(l)
    }

    /// Constructs an object, preserving the iteration order of the given map.
    pub fn object<K>(o: IndexMap<K, Self>) -> Self
    where
        K: AsRef<str>,
    {
        Self::Object(o.into_iter().map(|(k, v)| (k.as_ref().into(), v)).collect())
    }

    /// Does the value represent a `null`?
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Views the underlying enum value, if present.
    pub fn as_enum_value(&self) -> Option<&str> {
        match self {
            Self::Enum(e) => Some(e.as_str()),
            _ => None,
        }
    }

    /// Views the underlying int value, if present.
    pub fn as_int_value(&self) -> Option<i32> {
        self.as_scalar().and_then(ScalarValue::as_int)
    }

    /// Views the underlying float value, if present.
    pub fn as_float_value(&self) -> Option<f64> {
        self.as_scalar().and_then(ScalarValue::as_float)
    }

    /// Views the underlying string value, if present.
    pub fn as_string_value(&self) -> Option<&str> {
        self.as_scalar().and_then(ScalarValue::as_str)
    }

    /// Views the underlying scalar value, if present.
    pub fn as_scalar(&self) -> Option<&ScalarValue> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Converts this [`InputValue`] to a map of object entries.
    ///
    /// This constructs a new [`IndexMap`] containing references to the keys
    /// and values of `self`. On duplicate keys, the last entry wins.
    pub fn to_object_value(&self) -> Option<IndexMap<&str, &Self>> {
        match self {
            Self::Object(o) => Some(o.iter().map(|(k, v)| (k.as_str(), v)).collect()),
            _ => None,
        }
    }

    /// Converts this [`InputValue`] to a list of references to its elements.
    pub fn to_list_value(&self) -> Option<Vec<&Self>> {
        match self {
            Self::List(l) => Some(l.iter().collect()),
            _ => None,
        }
    }
}

impl fmt::Display for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Scalar(s) => {
                if let Some(s) = s.as_str() {
                    write!(f, "\"{s}\"")
                } else {
                    write!(f, "{s}")
                }
            }
            Self::Enum(v) => write!(f, "{v}"),
            Self::List(v) => {
                write!(f, "[")?;
                for (i, item) in v.iter().enumerate() {
                    item.fmt(f)?;
                    if i < v.len() - 1 {
                        write!(f, ", ")?;
                    }
                }
                write!(f, "]")
            }
            Self::Object(o) => {
                write!(f, "{{")?;
                for (i, (k, v)) in o.iter().enumerate() {
                    write!(f, "{k}: ")?;
                    v.fmt(f)?;
                    if i < o.len() - 1 {
                        write!(f, ", ")?;
                    }
                }
                write!(f, "}}")
            }
        }
    }
}

impl<T> From<Option<T>> for InputValue
where
    Self: From<T>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

impl From<&str> for InputValue {
    fn from(s: &str) -> Self {
        Self::scalar(s.to_owned())
    }
}

impl From<String> for InputValue {
    fn from(s: String) -> Self {
        Self::scalar(s)
    }
}

impl From<i32> for InputValue {
    fn from(i: i32) -> Self {
        Self::scalar(i)
    }
}

impl From<f64> for InputValue {
    fn from(f: f64) -> Self {
        Self::scalar(f)
    }
}

impl From<bool> for InputValue {
    fn from(b: bool) -> Self {
        Self::scalar(b)
    }
}

impl<'de> Deserialize<'de> for InputValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct InputValueVisitor;

        impl<'de> de::Visitor<'de> for InputValueVisitor {
            type Value = InputValue;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a valid input value")
            }

            fn visit_bool<E>(self, b: bool) -> Result<Self::Value, E> {
                Ok(InputValue::scalar(b))
            }

            fn visit_i64<E>(self, n: i64) -> Result<Self::Value, E> {
                if let Ok(n) = i32::try_from(n) {
                    Ok(InputValue::scalar(n))
                } else {
                    Ok(InputValue::scalar(n as f64))
                }
            }

            fn visit_u64<E>(self, n: u64) -> Result<Self::Value, E> {
                if let Ok(n) = i32::try_from(n) {
                    Ok(InputValue::scalar(n))
                } else {
                    Ok(InputValue::scalar(n as f64))
                }
            }

            fn visit_f64<E>(self, n: f64) -> Result<Self::Value, E> {
                Ok(InputValue::scalar(n))
            }

            fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                self.visit_string(s.into())
            }

            fn visit_string<E>(self, s: String) -> Result<Self::Value, E> {
                Ok(InputValue::scalar(s))
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(InputValue::Null)
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(InputValue::Null)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut items = Vec::new();
                while let Some(item) = seq.next_element()? {
                    items.push(item);
                }
                Ok(InputValue::List(items))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut entries = Vec::new();
                while let Some((key, value)) = map.next_entry::<String, InputValue>()? {
                    entries.push((key, value));
                }
                Ok(InputValue::Object(entries))
            }
        }

        deserializer.deserialize_any(InputValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::{InputValue, Type};

    #[test]
    fn type_fmt() {
        let ty = Type::Named(arcstr::literal!("Float"));
        assert_eq!(ty.to_string(), "Float");

        let ty = Type::NonNullNamed(arcstr::literal!("Float"));
        assert_eq!(ty.to_string(), "Float!");

        let ty = Type::List(Box::new(Type::Named(arcstr::literal!("Float"))));
        assert_eq!(ty.to_string(), "[Float]");
        assert_eq!(ty.innermost_name(), "Float");

        let ty = Type::NonNullList(Box::new(Type::NonNullNamed(arcstr::literal!("Float"))));
        assert_eq!(ty.to_string(), "[Float!]!");
        assert!(ty.is_non_null());
    }

    #[test]
    fn input_value_fmt() {
        let value: InputValue = graphql_input_value!(null);
        assert_eq!(value.to_string(), "null");

        let value: InputValue = graphql_input_value!(123);
        assert_eq!(value.to_string(), "123");

        let value: InputValue = graphql_input_value!(12.3);
        assert_eq!(value.to_string(), "12.3");

        let value: InputValue = graphql_input_value!("FOO");
        assert_eq!(value.to_string(), "\"FOO\"");

        let value: InputValue = graphql_input_value!(true);
        assert_eq!(value.to_string(), "true");

        let value: InputValue = graphql_input_value!(BAR);
        assert_eq!(value.to_string(), "BAR");

        let value: InputValue = graphql_input_value!(["123"]);
        assert_eq!(value.to_string(), "[\"123\"]");

        let value: InputValue = graphql_input_value!([1, 2]);
        assert_eq!(value.to_string(), "[1, 2]");

        let value: InputValue = graphql_input_value!({"x": {"y": false}});
        assert_eq!(value.to_string(), "{x: {y: false}}");
    }

    #[test]
    fn input_value_from_json() {
        let value: InputValue = serde_json::from_str(r#"{"x": {"y": false}, "n": null}"#).unwrap();
        assert_eq!(value, graphql_input_value!({"x": {"y": false}, "n": null}));

        let value: InputValue = serde_json::from_str("[1, 2.5, \"three\"]").unwrap();
        assert_eq!(value, graphql_input_value!([1, 2.5, "three"]));
    }
}
