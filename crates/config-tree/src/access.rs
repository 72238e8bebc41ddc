//! Typed value accessors
//!
//! Reads never fail: a missing path or a value that does not convert yields
//! the caller's default. [`SectionRef::fetch`] additionally reports whether
//! the default was used.
//!
//! ```
//! use config_tree::{Node, SectionTree, Value};
//!
//! let tree = SectionTree::from_nodes([
//!     Node::new("a", Vec::new()),
//!     Node::new("a.b", Value::list(["5"])),
//! ]);
//! let root = tree.root();
//! assert_eq!(root.get_int("a.b"), 5);
//! assert_eq!(root.get_int_or("a.missing", 7), 7);
//! assert!(root.fetch("a.missing", 0_i32).is_defaulted());
//! assert!(root.is_configuration_section("a"));
//! ```

use std::str::FromStr;

use bigdecimal::BigDecimal;

use crate::node::Value;
use crate::section::SectionRef;

/// Conversion from a node's value list
pub trait FromValues: Sized {
    /// Convert, or `None` when the values do not represent `Self`.
    fn from_values(values: &[Value]) -> Option<Self>;
}

fn first(values: &[Value]) -> Option<&str> {
    values.first().map(Value::as_str)
}

macro_rules! from_first_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromValues for $ty {
                fn from_values(values: &[Value]) -> Option<Self> {
                    first(values)?.parse().ok()
                }
            }
        )*
    };
}

from_first_value!(i32, i16);

// Floating point text may carry surrounding whitespace.
impl FromValues for f64 {
    fn from_values(values: &[Value]) -> Option<Self> {
        first(values)?.trim().parse().ok()
    }
}

impl FromValues for f32 {
    fn from_values(values: &[Value]) -> Option<Self> {
        first(values)?.trim().parse().ok()
    }
}

/// `true` in any letter case; every other text reads as `false`.
impl FromValues for bool {
    fn from_values(values: &[Value]) -> Option<Self> {
        first(values).map(|text| text.eq_ignore_ascii_case("true"))
    }
}

impl FromValues for BigDecimal {
    fn from_values(values: &[Value]) -> Option<Self> {
        BigDecimal::from_str(first(values)?).ok()
    }
}

impl FromValues for String {
    fn from_values(values: &[Value]) -> Option<Self> {
        first(values).map(str::to_string)
    }
}

impl FromValues for Vec<String> {
    fn from_values(values: &[Value]) -> Option<Self> {
        Some(values.iter().map(|value| value.as_str().to_string()).collect())
    }
}

/// A value read from the tree, tagged with whether the default was used
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    value: T,
    defaulted: bool,
}

impl<T> Fetched<T> {
    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    /// True when the path was missing or its value did not convert.
    pub fn is_defaulted(&self) -> bool {
        self.defaulted
    }
}

impl SectionRef<'_> {
    /// Read `path` as `T`, falling back to `default`.
    pub fn fetch<T: FromValues>(&self, path: &str, default: T) -> Fetched<T> {
        match self.get_node(path).and_then(|node| T::from_values(node.values())) {
            Some(value) => Fetched {
                value,
                defaulted: false,
            },
            None => Fetched {
                value: default,
                defaulted: true,
            },
        }
    }

    pub fn get_int(&self, path: &str) -> i32 {
        self.get_int_or(path, 0)
    }

    pub fn get_int_or(&self, path: &str, default: i32) -> i32 {
        self.fetch(path, default).into_value()
    }

    pub fn get_short(&self, path: &str) -> i16 {
        self.get_short_or(path, 0)
    }

    pub fn get_short_or(&self, path: &str, default: i16) -> i16 {
        self.fetch(path, default).into_value()
    }

    pub fn get_bool(&self, path: &str) -> bool {
        self.get_bool_or(path, false)
    }

    pub fn get_bool_or(&self, path: &str, default: bool) -> bool {
        self.fetch(path, default).into_value()
    }

    pub fn get_double(&self, path: &str) -> f64 {
        self.get_double_or(path, 0.0)
    }

    pub fn get_double_or(&self, path: &str, default: f64) -> f64 {
        self.fetch(path, default).into_value()
    }

    pub fn get_float(&self, path: &str) -> f32 {
        self.get_float_or(path, 0.0)
    }

    pub fn get_float_or(&self, path: &str, default: f32) -> f32 {
        self.fetch(path, default).into_value()
    }

    pub fn get_decimal(&self, path: &str) -> BigDecimal {
        self.get_decimal_or(path, BigDecimal::from(0_i64))
    }

    pub fn get_decimal_or(&self, path: &str, default: BigDecimal) -> BigDecimal {
        self.fetch(path, default).into_value()
    }

    pub fn get_string(&self, path: &str) -> String {
        self.get_string_or(path, "")
    }

    pub fn get_string_or(&self, path: &str, default: &str) -> String {
        self.fetch(path, default.to_string()).into_value()
    }

    /// Every value of the node as text.
    pub fn get_string_list(&self, path: &str) -> Vec<String> {
        self.fetch(path, Vec::new()).into_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_reads_any_case() {
        assert_eq!(bool::from_values(&Value::list(["TRUE"])), Some(true));
        assert_eq!(bool::from_values(&Value::list(["yes"])), Some(false));
        assert_eq!(bool::from_values(&[]), None);
    }

    #[test]
    fn test_integers_reject_whitespace_and_overflow() {
        assert_eq!(i32::from_values(&Value::list([" 5"])), None);
        assert_eq!(i16::from_values(&Value::list(["40000"])), None);
        assert_eq!(i32::from_values(&Value::list(["-12"])), Some(-12));
    }

    #[test]
    fn test_floats_trim_whitespace() {
        assert_eq!(f64::from_values(&Value::list([" 2.5 "])), Some(2.5));
    }

    #[test]
    fn test_decimal_keeps_precision() {
        let value = BigDecimal::from_values(&Value::list(["12345678901234567890.123456789"]))
            .unwrap();
        assert_eq!(value.as_bigint_and_exponent().1, 9);
        assert!(value > BigDecimal::from(12345678901234567890_u64));
    }
}
