use std::fmt::{self, Display};

use serde::{
    Serialize,
    de::{self, Deserialize, Deserializer},
};

/// The native representation of a scalar literal.
///
/// Custom scalar coercion predicates and the built-in scalar types are all
/// expressed against this representation.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScalarValue {
    /// A signed 32-bit integer.
    Int(i32),
    /// A 64-bit floating point number.
    Float(f64),
    /// A UTF-8 string.
    String(String),
    /// A boolean.
    Boolean(bool),
}

impl ScalarValue {
    /// Views this value as an int, if it is one.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Views this value as a float.
    ///
    /// Ints widen losslessly, so they convert here as well.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(f64::from(*i)),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Views this value as a string slice, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Views this value as a boolean, if it is one.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl From<i32> for ScalarValue {
    fn from(i: i32) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for ScalarValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<String> for ScalarValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for ScalarValue {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<bool> for ScalarValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl<'de> Deserialize<'de> for ScalarValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ScalarValueVisitor;

        impl de::Visitor<'_> for ScalarValueVisitor {
            type Value = ScalarValue;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a valid scalar value")
            }

            fn visit_bool<E>(self, b: bool) -> Result<ScalarValue, E> {
                Ok(ScalarValue::Boolean(b))
            }

            fn visit_i64<E>(self, n: i64) -> Result<ScalarValue, E>
            where
                E: de::Error,
            {
                if let Ok(n) = i32::try_from(n) {
                    Ok(ScalarValue::Int(n))
                } else {
                    // Serializers commonly emit whole floats without a decimal
                    // point, so large integers must fall back to `Float` rather
                    // than erroring.
                    Ok(ScalarValue::Float(n as f64))
                }
            }

            fn visit_u64<E>(self, n: u64) -> Result<ScalarValue, E>
            where
                E: de::Error,
            {
                if let Ok(n) = i32::try_from(n) {
                    Ok(ScalarValue::Int(n))
                } else {
                    Ok(ScalarValue::Float(n as f64))
                }
            }

            fn visit_f64<E>(self, n: f64) -> Result<ScalarValue, E> {
                Ok(ScalarValue::Float(n))
            }

            fn visit_str<E>(self, s: &str) -> Result<ScalarValue, E>
            where
                E: de::Error,
            {
                self.visit_string(s.into())
            }

            fn visit_string<E>(self, s: String) -> Result<ScalarValue, E> {
                Ok(ScalarValue::String(s))
            }
        }

        deserializer.deserialize_any(ScalarValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::ScalarValue;

    #[test]
    fn scalar_value_views() {
        assert_eq!(ScalarValue::Int(42).as_int(), Some(42));
        assert_eq!(ScalarValue::Int(42).as_float(), Some(42.0));
        assert_eq!(ScalarValue::Float(1.5).as_float(), Some(1.5));
        assert_eq!(ScalarValue::Float(1.5).as_int(), None);
        assert_eq!(ScalarValue::from("foo").as_str(), Some("foo"));
        assert_eq!(ScalarValue::Boolean(true).as_boolean(), Some(true));
    }

    #[test]
    fn scalar_value_from_json() {
        let v: ScalarValue = serde_json::from_str("42").unwrap();
        assert_eq!(v, ScalarValue::Int(42));

        let v: ScalarValue = serde_json::from_str("4200000000").unwrap();
        assert_eq!(v, ScalarValue::Float(4_200_000_000.0));

        let v: ScalarValue = serde_json::from_str("\"foo\"").unwrap();
        assert_eq!(v, ScalarValue::String("foo".into()));
    }
}
