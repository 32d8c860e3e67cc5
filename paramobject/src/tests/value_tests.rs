//! Tests for ParamValue and conversions.

use crate::value::{FromParam, IntoParam, ParamValue};
use crate::{ParamError, ParamObject, params};

use super::cylinder_class;

#[test]
fn test_accessors() {
    assert_eq!(ParamValue::Bool(true).as_bool(), Some(true));
    assert_eq!(ParamValue::Int(3).as_i64(), Some(3));
    assert_eq!(ParamValue::Float(1.5).as_f64(), Some(1.5));
    assert_eq!(ParamValue::Str("a".to_string()).as_str(), Some("a"));
    assert_eq!(ParamValue::Int(3).as_f64(), None);
    assert_eq!(ParamValue::Int(3).as_number(), Some(3.0));
    assert_eq!(ParamValue::Bool(true).as_number(), None);
    assert!(ParamValue::Float(1.0).as_object().is_none());
}

#[test]
fn test_conversions() {
    assert_eq!(2.5f64.into_param(), ParamValue::Float(2.5));
    assert_eq!(7i32.into_param(), ParamValue::Int(7));
    assert_eq!("x".into_param(), ParamValue::Str("x".to_string()));
    assert_eq!(
        vec![1i64, 2].into_param(),
        ParamValue::List(vec![ParamValue::Int(1), ParamValue::Int(2)])
    );

    assert_eq!(f64::from_param(&ParamValue::Int(4)), Some(4.0));
    assert_eq!(i64::from_param(&ParamValue::Float(4.0)), None);
    assert_eq!(
        Vec::<f64>::from_param(&ParamValue::List(vec![ParamValue::Float(1.0), ParamValue::Int(2)])),
        Some(vec![1.0, 2.0])
    );
    assert_eq!(
        Vec::<i64>::from_param(&ParamValue::List(vec![ParamValue::Int(1), ParamValue::Bool(true)])),
        None
    );
}

#[test]
fn test_cast_reports_name() {
    let err = ParamValue::Bool(false).cast::<f64>("radius").unwrap_err();
    assert_eq!(
        err,
        ParamError::TypeMismatch {
            name: "radius".to_string(),
            expected: "f64".to_string(),
        }
    );
}

#[test]
fn test_kind() {
    assert_eq!(ParamValue::Float(1.0).kind(), "Float");
    assert_eq!(ParamValue::List(Vec::new()).kind(), "List");
}

#[test]
fn test_display() {
    let list = ParamValue::List(vec![ParamValue::Int(1), ParamValue::Str("a".to_string())]);
    assert_eq!(list.to_string(), "[1, \"a\"]");
    assert_eq!(ParamValue::Float(2.0).to_string(), "2.0");

    let cyl = ParamObject::new(&cylinder_class(), params! { "radius" => 1.0 }).unwrap();
    assert_eq!(
        ParamValue::Object(cyl).to_string(),
        "Cylinder(radius=1.0, length=100.0)"
    );
}

#[test]
fn test_params_macro_keeps_order() {
    let map = params! { "b" => 1, "a" => true, "c" => "s" };
    assert_eq!(map.keys().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    assert_eq!(map["a"], ParamValue::Bool(true));
    assert!(params! {}.is_empty());
}
