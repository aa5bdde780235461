//! Declarative macros for constructing input values.

#[macro_use]
mod graphql_input_value;
