// The muncher structure follows `serde_json`'s json! macro.

/// Construct a [`Value`][crate::Value] from a JSON literal.
///
/// ```
/// # use dynjson::json;
/// #
/// let value = json!({
///     "code": 200,
///     "success": true,
///     "payload": {
///         "features": [
///             "serde",
///             "json"
///         ],
///         "homepage": null
///     }
/// });
/// ```
///
/// Variables or expressions can be interpolated into the JSON literal. Any
/// type interpolated into an array element or object value must implement
/// serde's `Serialize` trait, while any type interpolated into an object key
/// must implement `AsRef<str>`. If the `Serialize` implementation of the
/// interpolated type decides to fail, or if the interpolated type contains a
/// map with non-string keys or a non-finite float, the `json!` macro panics.
///
/// ```
/// # use dynjson::json;
/// #
/// let code = 200;
/// let features = vec!["dynjson", "json"];
///
/// let value = json!({
///     "code": code,
///     "success": code == 200,
///     "payload": {
///         "features": features,
///         features[0]: features[1]
///     }
/// });
/// assert_eq!(value["code"], 200);
/// assert_eq!(value["payload"]["features"][0], "dynjson");
/// ```
///
/// Trailing commas are allowed inside both arrays and objects.
///
/// ```
/// # use dynjson::json;
/// #
/// let value = json!(["notice", "the", "trailing", "comma -->",]);
/// ```
#[macro_export(local_inner_macros)]
macro_rules! json {
    (true) => {
        $crate::Value::new_bool(true)
    };

    (false) => {
        $crate::Value::new_bool(false)
    };

    (null) => {
        $crate::Value::new_null()
    };

    ([]) => {
        $crate::Array::new().into_value()
    };

    // `{}` is the empty-object sentinel: no allocation.
    ({}) => {
        $crate::Value::new()
    };

    // Hide distracting implementation details from the generated rustdoc.
    ($($json:tt)+) => {
        json_internal!($($json)+)
    };
}

/// Construct an [`Array`][crate::Array] from a JSON array literal.
///
/// ```
/// use dynjson::{array, json};
/// use dynjson::JsonValueTrait; // trait for `is_null()`
///
/// let local = "foo";
/// let array = array![null, local, true, 123, array![1, 2, 3], {"key": "value"}];
/// assert!(array[0].is_null());
/// assert_eq!(array[1].as_str(), Some("foo"));
/// assert_eq!(array[array.len() - 1], json!({"key": "value"}));
/// ```
#[macro_export(local_inner_macros)]
macro_rules! array {
    () => {
        $crate::Array::new()
    };

    ($($tt:tt)+) => {
        json_internal!([$($tt)+])
            .into_array()
            .expect("the literal is not a json array")
    };
}

/// Construct an [`Object`][crate::Object] from a JSON object literal.
///
/// ```
/// # use dynjson::object;
/// #
/// let code = 200;
///
/// let object = object! {
///     "code": code,
///     "success": code == 200,
/// };
/// assert_eq!(object["code"], 200);
/// assert_eq!(object["success"], true);
/// ```
#[macro_export(local_inner_macros)]
macro_rules! object {
    () => {
        $crate::Object::new()
    };

    ($($tt:tt)+) => {
        json_internal!({$($tt)+})
            .into_object()
            .expect("the literal is not a json object")
    };
}

#[macro_export(local_inner_macros)]
#[doc(hidden)]
macro_rules! json_internal {
    //////////////////////////////////////////////////////////////////////////
    // TT muncher for parsing the inside of an array [...]. Produces the
    // pushed elements.
    //
    // Must be invoked as: json_internal!(@array [] $($tt)*)
    //////////////////////////////////////////////////////////////////////////

    // Done with trailing comma.
    (@array [$($elems:expr,)*]) => {
        json_internal_array![$($elems)*]
    };

    // Done without trailing comma.
    (@array [$($elems:expr),*]) => {
        json_internal_array![$($elems)*]
    };

    // Next element is `null`.
    (@array [$($elems:expr,)*] null $($rest:tt)*) => {
        json_internal!(@array [$($elems,)* json_internal!(null)] $($rest)*)
    };

    // Next element is `true`.
    (@array [$($elems:expr,)*] true $($rest:tt)*) => {
        json_internal!(@array [$($elems,)* json_internal!(true)] $($rest)*)
    };

    // Next element is `false`.
    (@array [$($elems:expr,)*] false $($rest:tt)*) => {
        json_internal!(@array [$($elems,)* json_internal!(false)] $($rest)*)
    };

    // Next element is an array.
    (@array [$($elems:expr,)*] [$($array:tt)*] $($rest:tt)*) => {
        json_internal!(@array [$($elems,)* json_internal!([$($array)*])] $($rest)*)
    };

    // Next element is a map.
    (@array [$($elems:expr,)*] {$($map:tt)*} $($rest:tt)*) => {
        json_internal!(@array [$($elems,)* json_internal!({$($map)*})] $($rest)*)
    };

    // Next element is an expression followed by comma.
    (@array [$($elems:expr,)*] $next:expr, $($rest:tt)*) => {
        json_internal!(@array [$($elems,)* json_internal!($next),] $($rest)*)
    };

    // Last element is an expression with no trailing comma.
    (@array [$($elems:expr,)*] $last:expr) => {
        json_internal!(@array [$($elems,)* json_internal!($last)])
    };

    // Comma after the most recent element.
    (@array [$($elems:expr),*] , $($rest:tt)*) => {
        json_internal!(@array [$($elems,)*] $($rest)*)
    };

    // Unexpected token after most recent element.
    (@array [$($elems:expr),*] $unexpected:tt $($rest:tt)*) => {
        json_unexpected!($unexpected)
    };

    //////////////////////////////////////////////////////////////////////////
    // TT muncher for parsing the inside of an object {...}. Each entry is
    // inserted into the given object variable.
    //
    // Must be invoked as: json_internal!(@object $object () ($($tt)*) ($($tt)*))
    //
    // We require two copies of the input tokens so that we can match on one
    // copy and trigger errors on the other copy.
    //////////////////////////////////////////////////////////////////////////

    // Done.
    (@object $object:ident () () ()) => {};

    // Insert the current entry followed by trailing comma.
    (@object $object:ident [$($key:tt)+] ($value:expr) , $($rest:tt)*) => {
        let key: &str = ($($key)+).as_ref();
        let _ = $object.insert(key, $value);
        json_internal!(@object $object () ($($rest)*) ($($rest)*));
    };

    // Current entry followed by unexpected token.
    (@object $object:ident [$($key:tt)+] ($value:expr) $unexpected:tt $($rest:tt)*) => {
        json_unexpected!($unexpected);
    };

    // Insert the last entry without trailing comma.
    (@object $object:ident [$($key:tt)+] ($value:expr)) => {
        let key: &str = ($($key)+).as_ref();
        let _ = $object.insert(key, $value);
    };

    // Next value is `null`.
    (@object $object:ident ($($key:tt)+) (: null $($rest:tt)*) $copy:tt) => {
        json_internal!(@object $object [$($key)+] (json_internal!(null)) $($rest)*);
    };

    // Next value is `true`.
    (@object $object:ident ($($key:tt)+) (: true $($rest:tt)*) $copy:tt) => {
        json_internal!(@object $object [$($key)+] (json_internal!(true)) $($rest)*);
    };

    // Next value is `false`.
    (@object $object:ident ($($key:tt)+) (: false $($rest:tt)*) $copy:tt) => {
        json_internal!(@object $object [$($key)+] (json_internal!(false)) $($rest)*);
    };

    // Next value is an array.
    (@object $object:ident ($($key:tt)+) (: [$($array:tt)*] $($rest:tt)*) $copy:tt) => {
        json_internal!(@object $object [$($key)+] (json_internal!([$($array)*])) $($rest)*);
    };

    // Next value is a map.
    (@object $object:ident ($($key:tt)+) (: {$($map:tt)*} $($rest:tt)*) $copy:tt) => {
        json_internal!(@object $object [$($key)+] (json_internal!({$($map)*})) $($rest)*);
    };

    // Next value is an expression followed by comma.
    (@object $object:ident ($($key:tt)+) (: $value:expr , $($rest:tt)*) $copy:tt) => {
        json_internal!(@object $object [$($key)+] (json_internal!($value)) , $($rest)*);
    };

    // Last value is an expression with no trailing comma.
    (@object $object:ident ($($key:tt)+) (: $value:expr) $copy:tt) => {
        json_internal!(@object $object [$($key)+] (json_internal!($value)));
    };

    // Missing value for last entry. Trigger a reasonable error message.
    (@object $object:ident ($($key:tt)+) (:) $copy:tt) => {
        // "unexpected end of macro invocation"
        json_internal!();
    };

    // Missing colon and value for last entry. Trigger a reasonable error
    // message.
    (@object $object:ident ($($key:tt)+) () $copy:tt) => {
        // "unexpected end of macro invocation"
        json_internal!();
    };

    // Misplaced colon. Trigger a reasonable error message.
    (@object $object:ident () (: $($rest:tt)*) ($colon:tt $($copy:tt)*)) => {
        // Takes no arguments so "no rules expected the token `:`".
        json_unexpected!($colon);
    };

    // Found a comma inside a key. Trigger a reasonable error message.
    (@object $object:ident ($($key:tt)*) (, $($rest:tt)*) ($comma:tt $($copy:tt)*)) => {
        // Takes no arguments so "no rules expected the token `,`".
        json_unexpected!($comma);
    };

    // Key is fully parenthesized. This avoids clippy double_parens false
    // positives because the parenthesization may be necessary here.
    (@object $object:ident () (($key:expr) : $($rest:tt)*) $copy:tt) => {
        json_internal!(@object $object ($key) (: $($rest)*) (: $($rest)*));
    };

    // Refuse to absorb colon token into key expression.
    (@object $object:ident ($($key:tt)*) (: $($unexpected:tt)+) $copy:tt) => {
        json_expect_expr_comma!($($unexpected)+);
    };

    // Munch a token into the current key.
    (@object $object:ident ($($key:tt)*) ($tt:tt $($rest:tt)*) $copy:tt) => {
        json_internal!(@object $object ($($key)* $tt) ($($rest)*) ($($rest)*));
    };

    //////////////////////////////////////////////////////////////////////////
    // The main implementation.
    //
    // Must be invoked as: json_internal!($($json)+)
    //////////////////////////////////////////////////////////////////////////

    (true) => {
        $crate::Value::new_bool(true)
    };

    (false) => {
        $crate::Value::new_bool(false)
    };

    (null) => {
        $crate::Value::new_null()
    };

    ([]) => {
        $crate::Array::new().into_value()
    };

    ([ $($tt:tt)+ ]) => {
        json_internal!(@array [] $($tt)+)
    };

    ({}) => {
        $crate::Value::new()
    };

    ({ $($tt:tt)+ }) => {
        {
            let mut object = $crate::Object::new();
            json_internal!(@object object () ($($tt)+) ($($tt)+));
            object.into_value()
        }
    };

    // Any Serialize type: numbers, strings, struct literals, variables etc.
    // Must be below every other rule.
    ($other:expr) => {
        $crate::to_value(&$other).unwrap()
    };
}

// The json_internal macro above cannot invoke vec directly because it uses
// local_inner_macros; build the array by pushing instead.
#[macro_export(local_inner_macros)]
#[doc(hidden)]
macro_rules! json_internal_array {
    ($($content:tt)*) => {
        {
            let mut array = $crate::Array::new();
            $(
                array.push($content);
            )*
            array.into_value()
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! json_unexpected {
    () => {};
}

#[macro_export]
#[doc(hidden)]
macro_rules! json_expect_expr_comma {
    ($e:expr , $($tt:tt)*) => {};
}

#[cfg(test)]
mod test {
    use crate::{JsonValueTrait, Value};

    #[test]
    fn test_literals() {
        assert!(json!(null).is_null());
        assert_eq!(json!(true), true);
        assert_eq!(json!(1), 1);
        assert_eq!(json!(-1.5), -1.5);
        assert_eq!(json!("s"), "s");
        assert_eq!(json!([]).as_array().unwrap().len(), 0);
        // `{}` is the unallocated empty-object sentinel.
        let empty = json!({});
        assert!(empty.is_object());
        assert_eq!(empty.as_object().unwrap().capacity(), 0);
    }

    #[test]
    fn test_interpolation() {
        let name = "bob";
        let nums = vec![1, 2];
        let v = json!({
            "name": name,
            "ok": 1 == 1,
            name: nums,
            "nested": [null, {"deep": [true]}],
        });
        assert_eq!(v["name"], "bob");
        assert_eq!(v["ok"], true);
        assert_eq!(v["bob"][1], 2);
        assert_eq!(v["nested"][1]["deep"][0], true);
    }

    #[test]
    fn test_array_and_object_macros() {
        let arr = array![1, "two", [3], {"four": 4},];
        assert_eq!(arr.len(), 4);
        assert_eq!(arr[3]["four"], 4);

        let obj = object! {"a": 1, "b": array![2]};
        assert_eq!(obj["b"][0], 2);
        assert_eq!(crate::object! {}.len(), 0);
    }

    #[test]
    fn test_macro_value_kinds() {
        // The expression arm goes through serde, so arbitrary Serialize
        // types interpolate.
        #[derive(serde::Serialize)]
        struct P {
            x: i32,
        }
        let v = json!({"p": P { x: 3 }});
        assert_eq!(v["p"]["x"], 3);
        assert_eq!(json!(u64::MAX), u64::MAX);
        assert_eq!(json!(i64::MIN), i64::MIN);
    }

    #[test]
    fn test_macro_duplicate_keys_keep_last() {
        let v = json!({"k": 1, "k": 2});
        assert_eq!(v.as_object().unwrap().len(), 1);
        assert_eq!(v["k"], 2);
    }

    #[test]
    fn test_value_default_sentinel_macro_mix() {
        let mut v = Value::default();
        v["list"] = json!([1, 2]);
        assert_eq!(v, json!({"list": [1, 2]}));
    }
}
