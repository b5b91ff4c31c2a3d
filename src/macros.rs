/// Builds an [`Rda`](crate::Rda) tree from a literal.
///
/// - `null` or `[]` is an empty node
/// - `[a, b, ...]` is a node whose children are built from each element
/// - `{ value => [a, b, ...] }` is a node with a scalar and children
/// - any other expression is a leaf holding its `to_string()`
///
/// Inside a list each element must be a single token tree. Wrap multi-token
/// expressions such as `-1`, `a.b` or `n * 2` in parentheses.
///
/// # Examples
///
/// ```rust
/// use rda::rda;
///
/// let person = rda!(["John", "Smith", ["1, 2, 3", 12345], null]);
/// assert_eq!(person[2][1].value().unwrap(), "12345");
/// assert!(person[3].is_empty());
///
/// let offset = 3;
/// let coords = rda!([(-1), (offset * 2)]);
/// assert_eq!(coords.child_values(), vec!["-1", "6"]);
///
/// let labelled = rda!({ "header" => ["a", "b"] });
/// assert_eq!(labelled.value().unwrap(), "header");
/// assert_eq!(labelled.len(), 2);
/// ```
#[macro_export]
macro_rules! rda {
    (null) => {
        $crate::Rda::new()
    };

    ([]) => {
        $crate::Rda::new()
    };

    ([ $($elem:tt),+ $(,)? ]) => {
        $crate::Rda::from(vec![$($crate::rda!($elem)),+])
    };

    ({ $value:expr => [ $($elem:tt),* $(,)? ] }) => {{
        let mut node = $crate::Rda::from(vec![$($crate::rda!($elem)),*]);
        node.set_value(::std::string::ToString::to_string(&$value));
        node
    }};

    ($value:expr) => {
        $crate::Rda::leaf(::std::string::ToString::to_string(&$value))
    };
}

#[cfg(test)]
mod tests {
    use crate::Rda;

    #[test]
    fn test_rda_macro_leaves() {
        assert_eq!(rda!(null), Rda::new());
        assert_eq!(rda!("x"), Rda::leaf("x"));
        assert_eq!(rda!(42), Rda::leaf("42"));
        assert_eq!(rda!(true), Rda::leaf("true"));
    }

    #[test]
    fn test_rda_macro_children() {
        assert_eq!(rda!([]), Rda::new());

        let rda = rda!(["a", null, ["b", "c"]]);
        assert_eq!(rda.len(), 3);
        assert_eq!(rda.value_at(0).unwrap(), "a");
        assert!(rda[1].is_empty());
        assert_eq!(rda[2].child_values(), vec!["b", "c"]);
    }

    #[test]
    fn test_rda_macro_value_and_children() {
        let rda = rda!({ "head" => ["a", { "inner" => [] }] });
        assert_eq!(rda.value().unwrap(), "head");
        assert_eq!(rda[1].value().unwrap(), "inner");
        assert!(rda[1].children().is_empty());
    }
}
