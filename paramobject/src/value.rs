//! Runtime representation of parameter values.
//!
//! This module provides the `ParamValue` enum holding any parameter value,
//! the ordered `ParamMap` used for overrides, and the conversion traits
//! moving plain Rust values in and out.

use std::fmt;

use indexmap::IndexMap;
use strum::IntoStaticStr;

use crate::error::ParamError;
use crate::object::ParamObject;

/// Ordered mapping from parameter name to value.
///
/// Used for constructor arguments, `with_params` overrides and wither keywords.
/// Iteration follows insertion order.
pub type ParamMap = IndexMap<String, ParamValue>;

/// Runtime representation of any parameter value.
#[derive(Clone, Debug, PartialEq, IntoStaticStr)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),

    /// Homogeneity is not enforced
    List(Vec<ParamValue>),

    /// Nested parametrized object
    Object(ParamObject),
}

/// Macro to generate accessor methods for copyable variants.
macro_rules! impl_primitive_accessors {
    ($($method:ident -> $variant:ident : $ty:ty),* $(,)?) => {
        impl ParamValue {
            $(
                #[doc = concat!("Try to extract as ", stringify!($ty), ".")]
                pub fn $method(&self) -> Option<$ty> {
                    match self {
                        ParamValue::$variant(v) => Some(*v),
                        _ => None,
                    }
                }
            )*
        }
    };
}

impl_primitive_accessors! {
    as_bool -> Bool: bool,
    as_i64 -> Int: i64,
    as_f64 -> Float: f64,
}

impl ParamValue {
    /// Try to extract as a number, widening integers.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Int(v) => Some(*v as f64),
            ParamValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to extract as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Try to extract as a list reference.
    pub fn as_list(&self) -> Option<&[ParamValue]> {
        match self {
            ParamValue::List(v) => Some(v),
            _ => None,
        }
    }

    /// Try to extract as a nested object reference.
    pub fn as_object(&self) -> Option<&ParamObject> {
        match self {
            ParamValue::Object(v) => Some(v),
            _ => None,
        }
    }

    /// Check if this value is a nested parametrized object.
    pub fn is_object(&self) -> bool {
        matches!(self, ParamValue::Object(_))
    }

    /// Variant name, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        self.into()
    }

    /// Convert to `T`, reporting `name` on mismatch.
    pub fn cast<T: FromParam>(&self, name: &str) -> Result<T, ParamError> {
        T::from_param(self).ok_or_else(|| ParamError::type_mismatch::<T>(name))
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(v) => write!(f, "{}", v),
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Float(v) => write!(f, "{:?}", v),
            ParamValue::Str(v) => write!(f, "{:?}", v),
            ParamValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            ParamValue::Object(obj) => write!(f, "{}", obj),
        }
    }
}

/// Trait for types that can be converted to ParamValue.
pub trait IntoParam {
    fn into_param(self) -> ParamValue;
}

/// Trait for types that can be extracted from ParamValue.
pub trait FromParam: Sized {
    fn from_param(value: &ParamValue) -> Option<Self>;
}

/// Macro to implement IntoParam and FromParam for copyable types.
macro_rules! impl_param_conversions {
    ($($ty:ty => $variant:ident, $accessor:ident);* $(;)?) => {
        $(
            impl IntoParam for $ty {
                fn into_param(self) -> ParamValue {
                    ParamValue::$variant(self)
                }
            }

            impl FromParam for $ty {
                fn from_param(v: &ParamValue) -> Option<Self> {
                    v.$accessor()
                }
            }
        )*
    };
}

impl_param_conversions! {
    bool => Bool, as_bool;
    i64 => Int, as_i64;
    f64 => Float, as_number;
}

impl IntoParam for i32 {
    fn into_param(self) -> ParamValue {
        ParamValue::Int(i64::from(self))
    }
}

impl IntoParam for String {
    fn into_param(self) -> ParamValue {
        ParamValue::Str(self)
    }
}

impl IntoParam for &str {
    fn into_param(self) -> ParamValue {
        ParamValue::Str(self.to_string())
    }
}

impl FromParam for String {
    fn from_param(v: &ParamValue) -> Option<Self> {
        v.as_str().map(|s| s.to_string())
    }
}

impl IntoParam for ParamObject {
    fn into_param(self) -> ParamValue {
        ParamValue::Object(self)
    }
}

impl FromParam for ParamObject {
    fn from_param(v: &ParamValue) -> Option<Self> {
        v.as_object().cloned()
    }
}

impl IntoParam for ParamValue {
    fn into_param(self) -> ParamValue {
        self
    }
}

impl FromParam for ParamValue {
    fn from_param(v: &ParamValue) -> Option<Self> {
        Some(v.clone())
    }
}

impl<T: IntoParam> IntoParam for Vec<T> {
    fn into_param(self) -> ParamValue {
        ParamValue::List(self.into_iter().map(|v| v.into_param()).collect())
    }
}

impl<T: FromParam> FromParam for Vec<T> {
    fn from_param(v: &ParamValue) -> Option<Self> {
        v.as_list()?.iter().map(T::from_param).collect()
    }
}

/// Build a [`ParamMap`] from `name => value` pairs.
///
/// ```rust,ignore
/// let overrides = params! { "radius" => 3.0, "label" => "small" };
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::ParamMap::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::ParamMap::new();
        $(
            map.insert(
                ::std::string::String::from($name),
                $crate::IntoParam::into_param($value),
            );
        )+
        map
    }};
}
