//! Value types a parameter can carry.
//!
//! Each Rust type maps to exactly one [`TypeTag`], fixed at compile time.
//! Configuration sources hand values over as [`RawValue`]s which are then
//! narrowed to the parameter's own type through [`ParamValue::from_raw`].

use std::fmt::{Debug, Display};
use std::str::FromStr;

/// Declared value type of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    String,
    StringList,
    Int,
    Long,
    Short,
    Float,
    Double,
    Bool,
    /// Enumeration with its canonical variant names
    Enum(&'static [&'static str]),
}

impl TypeTag {
    pub fn as_str(&self) -> &str {
        match self {
            TypeTag::String => "String",
            TypeTag::StringList => "String[]",
            TypeTag::Int => "Int",
            TypeTag::Long => "Long",
            TypeTag::Short => "Short",
            TypeTag::Float => "Float",
            TypeTag::Double => "Double",
            TypeTag::Bool => "Bool",
            TypeTag::Enum(_) => "Enum",
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, TypeTag::StringList)
    }
}

impl Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeTag::Enum(variants) => write!(f, "Enum[{}]", variants.join("|")),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// A value as read from a configuration source, before it is narrowed to
/// the parameter's own type
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    String(String),
    StringList(Vec<String>),
    Int(i32),
    Long(i64),
    Short(i16),
    Float(f32),
    Double(f64),
    Bool(bool),
    /// Canonical variant name
    Enum(String),
}

impl RawValue {
    /// Name of the carried type, for mismatch reports
    pub fn type_name(&self) -> &'static str {
        match self {
            RawValue::String(_) => "String",
            RawValue::StringList(_) => "String[]",
            RawValue::Int(_) => "Int",
            RawValue::Long(_) => "Long",
            RawValue::Short(_) => "Short",
            RawValue::Float(_) => "Float",
            RawValue::Double(_) => "Double",
            RawValue::Bool(_) => "Bool",
            RawValue::Enum(_) => "Enum",
        }
    }
}

/// A Rust type that can back a [`Parameter`](super::Parameter)
pub trait ParamValue: Clone + Debug + PartialEq + Send + Sync + 'static {
    fn type_tag() -> TypeTag;

    /// Narrow a raw value; `None` when the raw value has another type
    fn from_raw(raw: RawValue) -> Option<Self>;

    /// Human readable form; only list values use the delimiter
    fn render(&self, delimiter: &str) -> String;
}

macro_rules! scalar_value {
    ($ty:ty, $tag:ident) => {
        impl ParamValue for $ty {
            fn type_tag() -> TypeTag {
                TypeTag::$tag
            }

            fn from_raw(raw: RawValue) -> Option<Self> {
                match raw {
                    RawValue::$tag(value) => Some(value),
                    _ => None,
                }
            }

            fn render(&self, _delimiter: &str) -> String {
                self.to_string()
            }
        }
    };
}

scalar_value!(String, String);
scalar_value!(i32, Int);
scalar_value!(i64, Long);
scalar_value!(i16, Short);
scalar_value!(f32, Float);
scalar_value!(f64, Double);
scalar_value!(bool, Bool);

impl ParamValue for Vec<String> {
    fn type_tag() -> TypeTag {
        TypeTag::StringList
    }

    fn from_raw(raw: RawValue) -> Option<Self> {
        match raw {
            RawValue::StringList(values) => Some(values),
            _ => None,
        }
    }

    fn render(&self, delimiter: &str) -> String {
        self.join(delimiter)
    }
}

/// An enumeration usable as a parameter type.
///
/// `FromStr` must accept every name listed in `VARIANTS`. Register the type
/// with [`impl_enum_value!`](crate::impl_enum_value) to make it a
/// [`ParamValue`].
pub trait ToyEnum: Copy + Debug + Display + PartialEq + FromStr + Send + Sync + 'static {
    /// Canonical variant names, in declaration order
    const VARIANTS: &'static [&'static str];
}

/// Implement [`ParamValue`] for a [`ToyEnum`]
///
/// ```
/// use std::str::FromStr;
/// use toybox_domain::{impl_enum_value, ParamValue, ToyEnum, TypeTag};
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Mode { Fast, Slow }
///
/// impl FromStr for Mode {
///     type Err = ();
///     fn from_str(s: &str) -> Result<Self, ()> {
///         match s {
///             "FAST" => Ok(Mode::Fast),
///             "SLOW" => Ok(Mode::Slow),
///             _ => Err(()),
///         }
///     }
/// }
///
/// impl std::fmt::Display for Mode {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         f.write_str(match self { Mode::Fast => "FAST", Mode::Slow => "SLOW" })
///     }
/// }
///
/// impl ToyEnum for Mode {
///     const VARIANTS: &'static [&'static str] = &["FAST", "SLOW"];
/// }
///
/// impl_enum_value!(Mode);
///
/// assert_eq!(Mode::type_tag(), TypeTag::Enum(&["FAST", "SLOW"]));
/// ```
#[macro_export]
macro_rules! impl_enum_value {
    ($ty:ty) => {
        impl $crate::parameter::value::ParamValue for $ty {
            fn type_tag() -> $crate::parameter::value::TypeTag {
                $crate::parameter::value::TypeTag::Enum(
                    <$ty as $crate::parameter::value::ToyEnum>::VARIANTS,
                )
            }

            fn from_raw(raw: $crate::parameter::value::RawValue) -> Option<Self> {
                match raw {
                    $crate::parameter::value::RawValue::Enum(name) => {
                        <$ty as ::std::str::FromStr>::from_str(&name).ok()
                    }
                    _ => None,
                }
            }

            fn render(&self, _delimiter: &str) -> String {
                self.to_string()
            }
        }
    };
}
