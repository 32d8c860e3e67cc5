//! Unit tests for parametrized objects.

mod value_tests;
mod wither_tests;

use std::sync::Arc;

use crate::{Builder, ParamClass, ParamObject, ParamValue, params};

/// Cylinder with a `diameter` alias for `radius` and a clamping `length` wither.
fn cylinder_class() -> Arc<ParamClass> {
    ParamClass::builder("Cylinder")
        .param_with_default("radius", 10.0)
        .param_with_default("length", 100.0)
        .deduced("diameter", |r| {
            Ok(ParamValue::Float(2.0 * r.value::<f64>("radius")?))
        })
        .caster("radius", &["diameter"], |current, overrides| {
            match overrides.get("diameter") {
                Some(d) => Ok(Some(ParamValue::Float(d.cast::<f64>("diameter")? / 2.0))),
                None => Ok(current.cloned()),
            }
        })
        .wither("length", |cyl, args| {
            let mut length = match args.extract::<f64>(0, "length")? {
                Some(length) => length,
                None => cyl.value::<f64>("length")?,
            };
            if let Some(max) = args.extract_keyword::<f64>("max_length")? {
                length = length.min(max);
            }
            cyl.with_params(params! { "length" => length })
        })
        .build()
        .unwrap()
}

fn hammer_class(cylinder: &Arc<ParamClass>) -> Arc<ParamClass> {
    let handle = ParamObject::new(cylinder, params! { "radius" => 1.5, "length" => 30.0 }).unwrap();
    let head = ParamObject::new(cylinder, params! { "radius" => 3.0, "length" => 10.0 }).unwrap();

    ParamClass::builder("Hammer")
        .param_with_default("handle", handle)
        .param_with_default("head", head)
        .deduced("total_length", |r| {
            let handle = r.value::<ParamObject>("handle")?;
            let head = r.value::<ParamObject>("head")?;
            Ok(ParamValue::Float(
                handle.value::<f64>("length")? + head.value::<f64>("diameter")?,
            ))
        })
        .build()
        .unwrap()
}

fn toolbox_class(hammer: &Arc<ParamClass>) -> Arc<ParamClass> {
    ParamClass::builder("Toolbox")
        .param_with_default("hammer", ParamObject::with_defaults(hammer).unwrap())
        .param_with_default("label", "workshop")
        .build()
        .unwrap()
}
