/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// Object keys must be string literals. Anything that is not `null`, `true`,
/// `false`, an array or an object goes through [`to_value`](crate::to_value).
///
/// ```rust
/// use datatree_text::{tree, Value};
///
/// let value = tree!({ "name": "Alice", "ports": [80, 443], "manager": null });
/// assert_eq!(value.get_path(&"ports[0]".parse().unwrap()), Some(&Value::Int(80)));
/// ```
#[macro_export]
macro_rules! tree {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::List(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::List(vec![$($crate::tree!($elem)),*])
    };

    ({}) => {
        $crate::Value::Map($crate::TreeMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut map = $crate::TreeMap::new();
        $(
            map.insert($key.to_string(), $crate::tree!($value));
        )*
        $crate::Value::Map(map)
    }};

    ($s:expr) => {{
        $crate::to_value(&$s).unwrap_or($crate::Value::Null)
    }};
}

#[cfg(test)]
mod tests {
    use crate::{TreeMap, Value};

    #[test]
    fn test_tree_macro_primitives() {
        assert_eq!(tree!(null), Value::Null);
        assert_eq!(tree!(true), Value::Bool(true));
        assert_eq!(tree!(false), Value::Bool(false));
        assert_eq!(tree!(42), Value::Int(42));
        assert_eq!(tree!(3.5), Value::Float(3.5));
        assert_eq!(tree!("hello"), Value::String("hello".to_string()));
    }

    #[test]
    fn test_tree_macro_lists() {
        assert_eq!(tree!([]), Value::List(vec![]));
        assert_eq!(
            tree!([1, [2, null]]),
            Value::List(vec![
                Value::Int(1),
                Value::List(vec![Value::Int(2), Value::Null])
            ])
        );
    }

    #[test]
    fn test_tree_macro_maps() {
        assert_eq!(tree!({}), Value::Map(TreeMap::new()));

        let value = tree!({
            "@id": "7",
            "_text": "body",
        });
        let map = value.as_map().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("@id"), Some(&Value::from("7")));
        assert_eq!(map.get("_text"), Some(&Value::from("body")));
    }
}
