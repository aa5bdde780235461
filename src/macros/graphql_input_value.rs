//! [`graphql_input_value!`] macro implementation.
//!
//! [`graphql_input_value!`]: graphql_input_value

/// Constructs [`InputValue`]s via JSON-like syntax.
///
/// - [`InputValue::Enum`] is constructed with `ident`, so to capture an outer
///   variable as an [`InputValue::Scalar`] surround it with parens: `(var)`.
///
/// ```rust
/// # use graphql_schema::{graphql_input_value, InputValue};
/// #
/// const OUTER_VAR: i32 = 42;
/// assert_eq!(graphql_input_value!(OUTER_VAR), InputValue::enum_value("OUTER_VAR"));
/// assert_eq!(graphql_input_value!((OUTER_VAR)), InputValue::scalar(42));
/// ```
///
/// - [`InputValue::Object`] keys should implement [`Into`]`<`[`String`]`>`.
///
/// # Example
///
/// ```rust
/// # use graphql_schema::{graphql_input_value, InputValue};
/// #
/// # type V = InputValue;
/// #
/// # let _: V =
/// graphql_input_value!(null);
/// # let _: V =
/// graphql_input_value!(1234);
/// # let _: V =
/// graphql_input_value!("test");
/// # let _: V =
/// graphql_input_value!([1234, "test", true]);
/// # let _: V =
/// graphql_input_value!({"key": "value", "foo": 1234});
/// # let _: V =
/// graphql_input_value!({"key": ENUM});
/// let captured_var = 42;
/// # let _: V =
/// graphql_input_value!({"key": (captured_var)});
/// ```
///
/// [`InputValue`]: crate::InputValue
/// [`InputValue::Enum`]: crate::InputValue::Enum
/// [`InputValue::Object`]: crate::InputValue::Object
/// [`InputValue::Scalar`]: crate::InputValue::Scalar
#[macro_export]
macro_rules! graphql_input_value {
    ///////////
    // Array //
    ///////////

    // Done with trailing comma.
    (@@array [$($elems:expr,)*]) => {
        $crate::InputValue::list(vec![
            $( $elems, )*
        ])
    };

    // Done without trailing comma.
    (@@array [$($elems:expr),*]) => {
        $crate::InputValue::list(vec![
            $( $elems, )*
        ])
    };

    // Next element is `null`.
    (@@array [$($elems:expr,)*] null $($rest:tt)*) => {
        $crate::graphql_input_value!(
            @@array [$($elems,)* $crate::graphql_input_value!(null)] $($rest)*
        )
    };

    // Next element is `None`.
    (@@array [$($elems:expr,)*] None $($rest:tt)*) => {
        $crate::graphql_input_value!(
            @@array [$($elems,)* $crate::graphql_input_value!(None)] $($rest)*
        )
    };

    // Next element is an array.
    (@@array [$($elems:expr,)*] [$($array:tt)*] $($rest:tt)*) => {
        $crate::graphql_input_value!(
            @@array [$($elems,)* $crate::graphql_input_value!([$($array)*])] $($rest)*
        )
    };

    // Next element is a map.
    (@@array [$($elems:expr,)*] {$($map:tt)*} $($rest:tt)*) => {
        $crate::graphql_input_value!(
            @@array [$($elems,)* $crate::graphql_input_value!({$($map)*})] $($rest)*
        )
    };

    // Next element is `true`, `false` or enum ident followed by comma.
    (@@array [$($elems:expr,)*] $ident:ident, $($rest:tt)*) => {
        $crate::graphql_input_value!(
            @@array [$($elems,)* $crate::graphql_input_value!($ident),] $($rest)*
        )
    };

    // Next element is `true`, `false` or enum ident without trailing comma.
    (@@array [$($elems:expr,)*] $last:ident ) => {
        $crate::graphql_input_value!(
            @@array [$($elems,)* $crate::graphql_input_value!($last)]
        )
    };

    // Next element is an expression followed by comma.
    (@@array [$($elems:expr,)*] $next:expr, $($rest:tt)*) => {
        $crate::graphql_input_value!(
            @@array [$($elems,)* $crate::graphql_input_value!($next),] $($rest)*
        )
    };

    // Last element is an expression with no trailing comma.
    (@@array [$($elems:expr,)*] $last:expr) => {
        $crate::graphql_input_value!(
            @@array [$($elems,)* $crate::graphql_input_value!($last)]
        )
    };

    // Comma after the most recent element.
    (@@array [$($elems:expr),*] , $($rest:tt)*) => {
        $crate::graphql_input_value!(@@array [$($elems,)*] $($rest)*)
    };

    // Unexpected token after most recent element.
    (@@array [$($elems:expr),*] $unexpected:tt $($rest:tt)*) => {
        $crate::graphql_input_value!(@unexpected $unexpected)
    };

    ////////////
    // Object //
    ////////////

    // Done.
    (@@object $object:ident () () ()) => {};

    // Insert the current entry followed by trailing comma.
    (@@object $object:ident [$($key:tt)+] ($value:expr) , $($rest:tt)*) => {
        $object.push((($($key)+).into(), $value));
        $crate::graphql_input_value!(@@object $object () ($($rest)*) ($($rest)*));
    };

    // Current entry followed by unexpected token.
    (@@object $object:ident [$($key:tt)+] ($value:expr) $unexpected:tt $($rest:tt)*) => {
        $crate::graphql_input_value!(@unexpected $unexpected);
    };

    // Insert the last entry without trailing comma.
    (@@object $object:ident [$($key:tt)+] ($value:expr)) => {
        $object.push((($($key)+).into(), $value));
    };

    // Next value is `null`.
    (@@object $object:ident ($($key:tt)+) (: null $($rest:tt)*) $copy:tt) => {
        $crate::graphql_input_value!(
            @@object $object
            [$($key)+]
            ($crate::graphql_input_value!(null)) $($rest)*
        );
    };

    // Next value is `None`.
    (@@object $object:ident ($($key:tt)+) (: None $($rest:tt)*) $copy:tt) => {
        $crate::graphql_input_value!(
            @@object $object
            [$($key)+]
            ($crate::graphql_input_value!(None)) $($rest)*
        );
    };

    // Next value is an array.
    (@@object $object:ident ($($key:tt)+) (: [$($array:tt)*] $($rest:tt)*) $copy:tt) => {
        $crate::graphql_input_value!(
            @@object $object
            [$($key)+]
            ($crate::graphql_input_value!([$($array)*])) $($rest)*
        );
    };

    // Next value is a map.
    (@@object $object:ident ($($key:tt)+) (: {$($map:tt)*} $($rest:tt)*) $copy:tt) => {
        $crate::graphql_input_value!(
            @@object $object
            [$($key)+]
            ($crate::graphql_input_value!({$($map)*})) $($rest)*
        );
    };

    // Next value is `true`, `false` or enum ident followed by comma.
    (@@object $object:ident ($($key:tt)+) (: $ident:ident , $($rest:tt)*) $copy:tt) => {
        $crate::graphql_input_value!(
            @@object $object
            [$($key)+]
            ($crate::graphql_input_value!($ident)) , $($rest)*
        );
    };

    // Next value is `true`, `false` or enum ident without trailing comma.
    (@@object $object:ident ($($key:tt)+) (: $last:ident ) $copy:tt) => {
        $crate::graphql_input_value!(
            @@object $object
            [$($key)+]
            ($crate::graphql_input_value!($last))
        );
    };

    // Next value is an expression followed by comma.
    (@@object $object:ident ($($key:tt)+) (: $value:expr , $($rest:tt)*) $copy:tt) => {
        $crate::graphql_input_value!(
            @@object $object
            [$($key)+]
            ($crate::graphql_input_value!($value)) , $($rest)*
        );
    };

    // Last value is an expression with no trailing comma.
    (@@object $object:ident ($($key:tt)+) (: $value:expr) $copy:tt) => {
        $crate::graphql_input_value!(
            @@object $object
            [$($key)+]
            ($crate::graphql_input_value!($value))
        );
    };

    // Missing value for last entry. Trigger a reasonable error message.
    (@@object $object:ident ($($key:tt)+) (:) $copy:tt) => {
        // "unexpected end of macro invocation"
        $crate::graphql_input_value!();
    };

    // Missing colon and value for last entry. Trigger a reasonable error
    // message.
    (@@object $object:ident ($($key:tt)+) () $copy:tt) => {
        // "unexpected end of macro invocation"
        $crate::graphql_input_value!();
    };

    // Misplaced colon. Trigger a reasonable error message.
    (@@object $object:ident () (: $($rest:tt)*) ($colon:tt $($copy:tt)*)) => {
        // Takes no arguments so "no rules expected the token `:`".
        $crate::graphql_input_value!(@unexpected $colon);
    };

    // Found a comma inside a key. Trigger a reasonable error message.
    (@@object $object:ident ($($key:tt)*) (, $($rest:tt)*) ($comma:tt $($copy:tt)*)) => {
        // Takes no arguments so "no rules expected the token `,`".
        $crate::graphql_input_value!(@unexpected $comma);
    };

    // Key is fully parenthesized. This avoids `clippy::double_parens` false
    // positives because the parenthesization may be necessary here.
    (@@object $object:ident () (($key:expr) : $($rest:tt)*) $copy:tt) => {
        $crate::graphql_input_value!(
            @@object $object
            ($key)
            (: $($rest)*) (: $($rest)*)
        );
    };

    // Refuse to absorb colon token into key expression.
    (@@object $object:ident ($($key:tt)*) (: $($unexpected:tt)+) $copy:tt) => {
        $crate::graphql_input_value!(@@unexpected $($unexpected)+);
    };

    // Munch a token into the current key.
    (@@object $object:ident ($($key:tt)*) ($tt:tt $($rest:tt)*) $copy:tt) => {
        $crate::graphql_input_value!(
            @@object $object
            ($($key)* $tt)
            ($($rest)*) ($($rest)*)
        );
    };

    ////////////
    // Errors //
    ////////////

    (@@unexpected) => {};

    //////////////
    // Defaults //
    //////////////

    ([ $($arr:tt)* ]$(,)?) => {
        $crate::graphql_input_value!(@@array [] $($arr)*)
    };

    ({}$(,)?) => {
        $crate::InputValue::Object(vec![])
    };

    ({ $($map:tt)+ }$(,)?) => {
        $crate::InputValue::Object({
            let mut object = vec![];
            $crate::graphql_input_value!(@@object object () ($($map)*) ($($map)*));
            object
        })
    };

    (null$(,)?) => ($crate::InputValue::null());

    (None$(,)?) => ($crate::InputValue::null());

    (true$(,)?) => ($crate::InputValue::from(true));

    (false$(,)?) => ($crate::InputValue::from(false));

    ($enum:ident$(,)?) => ($crate::InputValue::enum_value(stringify!($enum)));

    (($e:expr)$(,)?) => ($crate::InputValue::from($e));

    ($e:expr$(,)?) => ($crate::InputValue::from($e));
}

#[cfg(test)]
mod tests {
    use indexmap::{IndexMap, indexmap};

    type V = crate::InputValue;

    #[test]
    fn null() {
        assert_eq!(graphql_input_value!(null), V::Null);
        assert_eq!(graphql_input_value!(None), V::Null);
    }

    #[test]
    fn scalar() {
        let val = 42;
        assert_eq!(graphql_input_value!(1), V::scalar(1));
        assert_eq!(graphql_input_value!("val"), V::scalar("val"));
        assert_eq!(graphql_input_value!(1.34), V::scalar(1.34));
        assert_eq!(graphql_input_value!(false), V::scalar(false));
        assert_eq!(graphql_input_value!(1 + 2), V::scalar(3));
        assert_eq!(graphql_input_value!((val)), V::scalar(42));
    }

    #[test]
    fn r#enum() {
        assert_eq!(graphql_input_value!(ENUM), V::enum_value("ENUM"));
        assert_eq!(graphql_input_value!(lowercase), V::enum_value("lowercase"));
    }

    #[test]
    fn list() {
        let val = 42;

        assert_eq!(graphql_input_value!([]), V::list(vec![]));

        assert_eq!(graphql_input_value!([null]), V::list(vec![V::Null]));

        assert_eq!(graphql_input_value!([1]), V::list(vec![V::scalar(1)]));
        assert_eq!(graphql_input_value!([1 + 2]), V::list(vec![V::scalar(3)]));
        assert_eq!(graphql_input_value!([(val)]), V::list(vec![V::scalar(42)]));

        assert_eq!(
            graphql_input_value!([ENUM]),
            V::list(vec![V::enum_value("ENUM")]),
        );

        assert_eq!(
            graphql_input_value!([1, [2], 3]),
            V::list(vec![
                V::scalar(1),
                V::list(vec![V::scalar(2)]),
                V::scalar(3),
            ]),
        );
        assert_eq!(
            graphql_input_value!([1, [ENUM], (val)]),
            V::list(vec![
                V::scalar(1),
                V::list(vec![V::enum_value("ENUM")]),
                V::scalar(42),
            ]),
        );
    }

    #[test]
    fn object() {
        let val = 42;
        assert_eq!(
            graphql_input_value!({}),
            V::object(IndexMap::<String, _>::new()),
        );

        assert_eq!(
            graphql_input_value!({ "key": null }),
            V::object(indexmap! {"key" => V::Null}),
        );

        assert_eq!(
            graphql_input_value!({"key": 123}),
            V::object(indexmap! {"key" => V::scalar(123)}),
        );
        assert_eq!(
            graphql_input_value!({"key": 1 + 2}),
            V::object(indexmap! {"key" => V::scalar(3)}),
        );
        assert_eq!(
            graphql_input_value!({ "key": (val) }),
            V::object(indexmap! {"key" => V::scalar(42)}),
        );

        assert_eq!(
            graphql_input_value!({ "key": [1, [2 + 3], ENUM] }),
            V::object(indexmap! {
                "key" => V::list(vec![
                    V::scalar(1),
                    V::list(vec![V::scalar(5)]),
                    V::enum_value("ENUM"),
                ]),
            }),
        );

        assert_eq!(
            graphql_input_value!({
                "inner": {
                    "key1": (val),
                    "key2": "val",
                },
                "more": true,
            }),
            V::object(indexmap! {
                "inner" => V::object(indexmap! {
                    "key1" => V::scalar(42),
                    "key2" => V::scalar("val"),
                }),
                "more" => V::scalar(true),
            }),
        );
    }

    #[test]
    fn option() {
        let val = Some(42);

        assert_eq!(graphql_input_value!(None), V::Null);
        assert_eq!(graphql_input_value!(Some(42)), V::scalar(42));
        assert_eq!(graphql_input_value!((val)), V::scalar(42));
    }
}
