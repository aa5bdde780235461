use std::{borrow::Borrow, str::FromStr};

use arcstr::ArcStr;
use derive_more::{Display, Error};

/// A validated type name.
///
/// Names must match `/^[_a-zA-Z][_a-zA-Z0-9]*$/`; the registry only accepts
/// types whose names parse.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Name(ArcStr);

impl Name {
    /// Checks if the given string is a valid type, field or argument name.
    pub fn is_valid(input: &str) -> bool {
        let mut chars = input.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        if !first.is_ascii_alphabetic() && first != '_' {
            return false;
        }
        chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }

    /// Views this name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Error of a [`Name`] not matching the name grammar.
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
#[display("Names must match /^[_a-zA-Z][_a-zA-Z0-9]*$/ but \"{name}\" does not")]
pub struct NameParseError {
    /// The rejected input.
    pub name: String,
}

impl FromStr for Name {
    type Err = NameParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if Name::is_valid(s) {
            Ok(Name(s.into()))
        } else {
            Err(NameParseError { name: s.into() })
        }
    }
}

impl TryFrom<ArcStr> for Name {
    type Error = NameParseError;

    fn try_from(s: ArcStr) -> Result<Self, Self::Error> {
        if Name::is_valid(&s) {
            Ok(Name(s))
        } else {
            Err(NameParseError {
                name: s.as_str().into(),
            })
        }
    }
}

impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        &self.0
    }
}
