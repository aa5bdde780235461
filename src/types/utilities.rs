//! Structural validation of default values against their declared types.

use std::fmt;

use crate::{
    ViolationKind,
    ast::InputValue,
    schema::{
        meta::{EnumMeta, InputObjectMeta, MetaType, ScalarMeta},
        model::{SchemaType, TypeType},
    },
};

/// One step of descent into a validated value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PathSegment {
    /// Descent into an input object field.
    Field(String),
    /// Descent into a list element.
    Index(usize),
}

/// The location of a failure inside a validated value.
///
/// Renders the owner chain joined by `.` for field descent and `[i]` for list
/// descent, e.g. `x[0].y`. Empty when the failure is at the value's root.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ValuePath(Vec<PathSegment>);

impl ValuePath {
    /// Whether the failure is at the value's root.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The individual descent steps.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    fn pop(&mut self) {
        self.0.pop();
    }
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if i == 0 => write!(f, "{name}")?,
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// A failure produced by default value validation, pinpointing where in the
/// value the check failed.
#[derive(Clone, Debug, PartialEq)]
pub struct DefaultValueError {
    /// Which rule rejected the value.
    pub kind: ViolationKind,
    /// Where inside the value the check failed.
    pub path: ValuePath,
    /// Display of the expected type at the failure point.
    pub expected_type: String,
}

/// Checks that `value` is a valid literal for `arg_type`.
///
/// The check is structural and recursive, costing one pass over the value.
/// `null` is valid for any nullable position regardless of the inner shape;
/// only non-null wrappers forbid it. Within a single value the first failure
/// wins — callers validating many values accumulate across values instead.
pub fn validate_default_value(
    schema: &SchemaType,
    arg_type: &TypeType<'_>,
    value: &InputValue,
) -> Option<DefaultValueError> {
    let mut path = ValuePath::default();
    validate_value(schema, arg_type, value, &mut path)
}

fn fail(
    kind: ViolationKind,
    path: &ValuePath,
    arg_type: &TypeType<'_>,
) -> Option<DefaultValueError> {
    Some(DefaultValueError {
        kind,
        path: path.clone(),
        expected_type: arg_type.to_string(),
    })
}

fn validate_value(
    schema: &SchemaType,
    arg_type: &TypeType<'_>,
    value: &InputValue,
    path: &mut ValuePath,
) -> Option<DefaultValueError> {
    match arg_type {
        TypeType::NonNull(inner) => {
            if value.is_null() {
                fail(ViolationKind::NullDisallowed, path, arg_type)
            } else {
                validate_value(schema, inner, value, path)
            }
        }
        TypeType::List(inner) => match value {
            InputValue::Null => None,
            InputValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    path.push(PathSegment::Index(i));
                    let err = validate_value(schema, inner, item, path);
                    path.pop();
                    if err.is_some() {
                        return err;
                    }
                }
                None
            }
            _ => fail(ViolationKind::TypeMismatch, path, arg_type),
        },
        TypeType::Concrete(t) => {
            if value.is_null() {
                return None;
            }
            match t {
                MetaType::Scalar(ScalarMeta { try_parse_fn, .. }) => {
                    if try_parse_fn(value) {
                        None
                    } else {
                        fail(ViolationKind::TypeMismatch, path, arg_type)
                    }
                }
                MetaType::Enum(EnumMeta { values, .. }) => {
                    // String literals are not enum literals, so only an
                    // `Enum` value naming a declared member passes.
                    match value {
                        InputValue::Enum(name)
                            if values.iter().any(|v| v.name == name.as_str()) =>
                        {
                            None
                        }
                        _ => fail(ViolationKind::TypeMismatch, path, arg_type),
                    }
                }
                MetaType::InputObject(InputObjectMeta { input_fields, .. }) => {
                    let InputValue::Object(entries) = value else {
                        return fail(ViolationKind::TypeMismatch, path, arg_type);
                    };
                    // Unknown keys are rejected before any nested descent.
                    for (key, _) in entries {
                        if !input_fields.iter().any(|f| f.name == key.as_str()) {
                            path.push(PathSegment::Field(key.clone()));
                            let err = fail(ViolationKind::UnknownField, path, arg_type);
                            path.pop();
                            return err;
                        }
                    }
                    // Declared fields absent from the value are legal:
                    // omission is representable and defaults fill in.
                    for (key, entry_value) in entries {
                        let Some(input_field) =
                            input_fields.iter().find(|f| f.name == key.as_str())
                        else {
                            continue;
                        };
                        let field_type = schema.make_type(&input_field.arg_type);
                        path.push(PathSegment::Field(key.clone()));
                        let err = validate_value(schema, &field_type, entry_value, path);
                        path.pop();
                        if err.is_some() {
                            return err;
                        }
                    }
                    None
                }
                MetaType::Object(_) | MetaType::Interface(_) | MetaType::Union(_) => {
                    fail(ViolationKind::InvalidTypePosition, path, arg_type)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use arcstr::ArcStr;
    use fnv::FnvHashMap;

    use crate::{
        ViolationKind,
        ast::Type,
        schema::{
            meta::{Argument, EnumMeta, EnumValue, Field, InputObjectMeta, MetaType, ObjectMeta, ScalarMeta},
            model::SchemaType,
        },
        types::{name::Name, scalars},
    };

    use super::{PathSegment, validate_default_value};

    fn named(name: &str) -> Type {
        Type::Named(ArcStr::from(name))
    }

    fn test_schema() -> SchemaType {
        let mut types = FnvHashMap::default();
        let mut insert = |meta: MetaType| {
            let name: Name = meta.name().as_str().parse().unwrap();
            types.insert(name, meta);
        };
        insert(ScalarMeta::new("Float", scalars::float_literal).into_meta());
        insert(ScalarMeta::new("String", scalars::string_literal).into_meta());
        insert(ScalarMeta::new("Boolean", scalars::boolean_literal).into_meta());
        insert(
            EnumMeta::new("Direction", vec![EnumValue::new("NORTH"), EnumValue::new("SOUTH")])
                .into_meta(),
        );
        insert(
            InputObjectMeta::new(
                "PointInput",
                vec![
                    Argument::new("x", named("Float")),
                    Argument::new("y", Type::NonNullNamed(arcstr::literal!("Float"))),
                    Argument::new("label", named("String")),
                ],
            )
            .into_meta(),
        );
        insert(
            InputObjectMeta::new(
                "SegmentInput",
                vec![
                    Argument::new("from", named("PointInput")),
                    Argument::new("to", named("PointInput")),
                ],
            )
            .into_meta(),
        );
        insert(ObjectMeta::new("Query", vec![Field::new("ok", named("Boolean"))]).into_meta());
        SchemaType::new(types, arcstr::literal!("Query"), None)
    }

    #[test]
    fn null_is_valid_for_any_nullable_position() {
        let schema = test_schema();
        for name in ["Float", "String", "Direction", "PointInput"] {
            let ty = schema.make_type(&named(name));
            assert_eq!(
                validate_default_value(&schema, &ty, &graphql_input_value!(null)),
                None,
                "null should be valid for nullable {name}",
            );
        }
    }

    #[test]
    fn non_null_rejects_null() {
        let schema = test_schema();
        let ty = schema.make_type(&Type::NonNullNamed(arcstr::literal!("Float")));
        let err = validate_default_value(&schema, &ty, &graphql_input_value!(null)).unwrap();
        assert_eq!(err.kind, ViolationKind::NullDisallowed);
        assert_eq!(err.expected_type, "Float!");
        assert!(err.path.is_empty());
    }

    #[test]
    fn scalar_accepts_coercible_shapes_only() {
        let schema = test_schema();
        let float = schema.make_type(&named("Float"));

        assert_eq!(validate_default_value(&schema, &float, &graphql_input_value!(1.5)), None);
        assert_eq!(validate_default_value(&schema, &float, &graphql_input_value!(3)), None);

        let err = validate_default_value(&schema, &float, &graphql_input_value!(["123"])).unwrap();
        assert_eq!(err.kind, ViolationKind::TypeMismatch);
        assert_eq!(err.expected_type, "Float");
    }

    #[test]
    fn list_descent_records_the_failing_index() {
        let schema = test_schema();
        let floats = schema.make_type(&Type::List(Box::new(named("Float"))));

        assert_eq!(
            validate_default_value(&schema, &floats, &graphql_input_value!([1, 2.5])),
            None,
        );
        // A nullable element may be null.
        assert_eq!(
            validate_default_value(&schema, &floats, &graphql_input_value!([1, null])),
            None,
        );

        let err =
            validate_default_value(&schema, &floats, &graphql_input_value!([1, "two"])).unwrap();
        assert_eq!(err.kind, ViolationKind::TypeMismatch);
        assert_eq!(err.path.to_string(), "[1]");
        assert_eq!(err.expected_type, "Float");

        let err = validate_default_value(&schema, &floats, &graphql_input_value!(1)).unwrap();
        assert_eq!(err.kind, ViolationKind::TypeMismatch);
        assert_eq!(err.expected_type, "[Float]");
    }

    #[test]
    fn enum_accepts_declared_literals_only() {
        let schema = test_schema();
        let direction = schema.make_type(&named("Direction"));

        assert_eq!(
            validate_default_value(&schema, &direction, &graphql_input_value!(NORTH)),
            None,
        );
        let err =
            validate_default_value(&schema, &direction, &graphql_input_value!(WEST)).unwrap();
        assert_eq!(err.kind, ViolationKind::TypeMismatch);

        // A string literal is not an enum literal.
        let err =
            validate_default_value(&schema, &direction, &graphql_input_value!("NORTH")).unwrap();
        assert_eq!(err.kind, ViolationKind::TypeMismatch);
    }

    #[test]
    fn unknown_fields_are_rejected_before_nested_descent() {
        let schema = test_schema();
        let point = schema.make_type(&named("PointInput"));

        // `oops` is unknown and `y` is null for a non-null field; the
        // unknown key wins because it is checked first.
        let err = validate_default_value(
            &schema,
            &point,
            &graphql_input_value!({"y": null, "oops": 1}),
        )
        .unwrap();
        assert_eq!(err.kind, ViolationKind::UnknownField);
        assert_eq!(err.path.to_string(), "oops");
        assert_eq!(err.path.segments(), &[PathSegment::Field("oops".into())][..]);
    }

    #[test]
    fn input_object_field_omission_is_legal() {
        let schema = test_schema();
        let point = schema.make_type(&named("PointInput"));
        assert_eq!(
            validate_default_value(&schema, &point, &graphql_input_value!({"x": 1.0})),
            None,
        );
    }

    #[test]
    fn nested_failures_carry_dotted_paths() {
        let schema = test_schema();
        let segment = schema.make_type(&named("SegmentInput"));

        assert_eq!(
            validate_default_value(
                &schema,
                &segment,
                &graphql_input_value!({"from": {"x": 1.0, "y": 2.0}, "to": {"y": 0.5}}),
            ),
            None,
        );

        let err = validate_default_value(
            &schema,
            &segment,
            &graphql_input_value!({"from": {"y": "nope"}}),
        )
        .unwrap();
        assert_eq!(err.kind, ViolationKind::TypeMismatch);
        assert_eq!(err.path.to_string(), "from.y");
        assert_eq!(err.expected_type, "Float!");

        let err = validate_default_value(
            &schema,
            &segment,
            &graphql_input_value!({"from": {"y": null}}),
        )
        .unwrap();
        assert_eq!(err.kind, ViolationKind::NullDisallowed);
        assert_eq!(err.path.to_string(), "from.y");
    }

    #[test]
    fn composite_output_types_are_invalid_value_positions() {
        let schema = test_schema();
        let query = schema.make_type(&named("Query"));
        let err = validate_default_value(&schema, &query, &graphql_input_value!({})).unwrap();
        assert_eq!(err.kind, ViolationKind::InvalidTypePosition);
    }

    #[test]
    fn non_mapping_value_for_input_object_is_a_mismatch() {
        let schema = test_schema();
        let point = schema.make_type(&named("PointInput"));
        let err = validate_default_value(&schema, &point, &graphql_input_value!([1])).unwrap();
        assert_eq!(err.kind, ViolationKind::TypeMismatch);
        assert_eq!(err.expected_type, "PointInput");
    }
}
