//! Tests for wither dispatch.

use crate::schema::ParamClass;
use crate::{Builder, ParamError, ParamObject, ParamValue, WitherArgs, params};

use super::cylinder_class;

#[test]
fn test_default_wither() {
    let obj = ParamObject::with_defaults(&cylinder_class()).unwrap();

    let updated = obj.with_value("radius", 4.0).unwrap();
    assert_eq!(updated.value::<f64>("radius").unwrap(), 4.0);
    assert_eq!(updated.value::<f64>("diameter").unwrap(), 8.0);

    // Keyword form binds to the parameter name
    let by_keyword = obj
        .with("radius", &WitherArgs::new().kwarg("radius", 4.0))
        .unwrap();
    assert_eq!(by_keyword, updated);
}

#[test]
fn test_default_wither_matches_with_params() {
    let obj = ParamObject::with_defaults(&cylinder_class()).unwrap();
    assert_eq!(
        obj.with_value("radius", 2.5).unwrap(),
        obj.with_params(params! { "radius" => 2.5 }).unwrap()
    );
}

#[test]
fn test_default_wither_arity() {
    let obj = ParamObject::with_defaults(&cylinder_class()).unwrap();

    assert!(matches!(
        obj.with("radius", &WitherArgs::new()),
        Err(ParamError::WitherArguments { .. })
    ));
    assert!(matches!(
        obj.with("radius", &WitherArgs::new().arg(1.0).arg(2.0)),
        Err(ParamError::WitherArguments { .. })
    ));
    assert!(matches!(
        obj.with("radius", &WitherArgs::new().kwarg("size", 1.0)),
        Err(ParamError::WitherArguments { .. })
    ));
}

#[test]
fn test_default_wither_on_deduced_goes_through_caster() {
    let obj = ParamObject::with_defaults(&cylinder_class()).unwrap();
    let updated = obj.with_value("diameter", 100.0).unwrap();

    assert_eq!(updated.value::<f64>("radius").unwrap(), 50.0);
    assert_eq!(updated.value::<f64>("diameter").unwrap(), 100.0);
}

#[test]
fn test_unknown_wither() {
    let obj = ParamObject::with_defaults(&cylinder_class()).unwrap();
    assert!(matches!(
        obj.with_value("height", 1.0),
        Err(ParamError::UnknownParameter { .. })
    ));
}

#[test]
fn test_custom_wither_clamps() {
    let class = cylinder_class();
    let obj = ParamObject::new(&class, params! { "length" => 50.0 }).unwrap();

    let clamped = obj
        .with("length", &WitherArgs::new().kwarg("max_length", 20.0))
        .unwrap();
    assert_eq!(clamped.value::<f64>("length").unwrap(), 20.0);

    let within = obj
        .with("length", &WitherArgs::single(10.0).kwarg("max_length", 20.0))
        .unwrap();
    assert_eq!(within.value::<f64>("length").unwrap(), 10.0);

    assert_eq!(obj.value::<f64>("length").unwrap(), 50.0);
}

#[test]
fn test_custom_wither_without_arguments() {
    let class = cylinder_class();
    let obj = ParamObject::with_defaults(&class).unwrap();

    let same = obj.with("length", &WitherArgs::new()).unwrap();
    assert_eq!(
        same.value::<f64>("length").unwrap(),
        obj.value::<f64>("length").unwrap()
    );
    assert_eq!(same, obj);
}

#[test]
fn test_custom_wither_extra_arguments() {
    let class = ParamClass::builder("Tagged")
        .param_with_default("foo", 42)
        .param_with_default("bar", 77)
        .wither("bar", |obj, args| {
            let bar = args
                .lookup(0, "bar")
                .cloned()
                .ok_or_else(|| ParamError::WitherArguments {
                    name: "bar".to_string(),
                    reason: "missing value".to_string(),
                })?;
            let as_string = args.extract_keyword::<bool>("as_string")?.unwrap_or(false);

            let bar = if as_string {
                ParamValue::Str(bar.to_string())
            } else {
                bar
            };
            obj.with_params(params! { "bar" => bar })
        })
        .build()
        .unwrap();

    let obj = ParamObject::with_defaults(&class).unwrap();
    assert_eq!(obj.with_value("foo", 10).unwrap().value::<i64>("foo").unwrap(), 10);
    assert_eq!(obj.with_value("bar", 10).unwrap().value::<i64>("bar").unwrap(), 10);

    let text = obj
        .with("bar", &WitherArgs::single(10).kwarg("as_string", true))
        .unwrap();
    assert_eq!(text.value::<String>("bar").unwrap(), "10");

    assert!(matches!(
        obj.with("bar", &WitherArgs::new()),
        Err(ParamError::WitherArguments { .. })
    ));
}

#[test]
fn test_custom_wither_chaining_other_wither() {
    let class = ParamClass::builder("Box")
        .param_with_default("width", 1.0)
        .param_with_default("height", 1.0)
        .wither("width", |obj, args| {
            let width = args.extract::<f64>(0, "width")?.unwrap_or(1.0);
            // Keep the aspect ratio by delegating to the height wither
            let ratio = obj.value::<f64>("height")? / obj.value::<f64>("width")?;
            obj.with_value("height", width * ratio)?
                .with_params(params! { "width" => width })
        })
        .build()
        .unwrap();

    let obj = ParamObject::new(&class, params! { "height" => 2.0 }).unwrap();
    let wider = obj.with_value("width", 3.0).unwrap();
    assert_eq!(wider.value::<f64>("width").unwrap(), 3.0);
    assert_eq!(wider.value::<f64>("height").unwrap(), 6.0);
}

#[test]
fn test_wither_args_accessors() {
    let args = WitherArgs::single(1.0).arg("two").kwarg("three", 3);

    assert_eq!(args.len(), 3);
    assert!(!args.is_empty());
    assert_eq!(args.positional().len(), 2);
    assert_eq!(args.keyword("three"), Some(&ParamValue::Int(3)));
    assert_eq!(args.lookup(1, "two"), Some(&ParamValue::Str("two".to_string())));
    assert_eq!(args.lookup(5, "three"), Some(&ParamValue::Int(3)));
    assert_eq!(args.extract::<f64>(0, "one").unwrap(), Some(1.0));
    assert!(args.extract::<i64>(1, "two").is_err());
    assert_eq!(args.extract_keyword::<i64>("missing").unwrap(), None);
    assert!(WitherArgs::new().is_empty());
}

#[test]
fn test_default_wither_on_unconsumed_deduced_rejected() {
    let class = ParamClass::builder("Doubled")
        .param_with_default("x", 1.0)
        .deduced("twice", |r| Ok(ParamValue::Float(2.0 * r.value::<f64>("x")?)))
        .build()
        .unwrap();
    let obj = ParamObject::with_defaults(&class).unwrap();

    assert!(matches!(
        obj.with_value("twice", 50.0),
        Err(ParamError::WitherArguments { ref name, .. }) if name == "twice"
    ));
    assert_eq!(obj.value::<f64>("twice").unwrap(), 2.0);
}
