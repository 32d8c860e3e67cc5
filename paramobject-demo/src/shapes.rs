//! Shape classes used by the demo.

use std::sync::Arc;

use paramobject::{
    Builder, MissingPolicy, ParamClass, ParamError, ParamObject, ParamValue, Result, params,
};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Shape {
    Cylinder,
    Hammer,
}

impl Shape {
    /// Declare the class of this shape, and of the shapes it is made of.
    pub fn class(self, policy: MissingPolicy) -> Result<Arc<ParamClass>> {
        let cylinder = cylinder_class(policy)?;
        match self {
            Shape::Cylinder => Ok(cylinder),
            Shape::Hammer => hammer_class(&cylinder, policy),
        }
    }
}

fn cylinder_class(policy: MissingPolicy) -> Result<Arc<ParamClass>> {
    ParamClass::builder("Cylinder")
        .param_with_default("radius", 10.0)
        .param_with_default("length", 100.0)
        .deduced("diameter", |r| {
            Ok(ParamValue::Float(2.0 * r.value::<f64>("radius")?))
        })
        .deduced("volume", |r| {
            let radius = r.value::<f64>("radius")?;
            Ok(ParamValue::Float(
                std::f64::consts::PI * radius * radius * r.value::<f64>("length")?,
            ))
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
        .missing_policy(policy)
        .build()
}

fn hammer_class(cylinder: &Arc<ParamClass>, policy: MissingPolicy) -> Result<Arc<ParamClass>> {
    let handle = ParamObject::new(cylinder, params! { "radius" => 1.5, "length" => 30.0 })?;
    let head = ParamObject::new(cylinder, params! { "radius" => 3.0, "length" => 10.0 })?;

    ParamClass::builder("Hammer")
        .param_with_default("handle", handle)
        .param_with_default("head", head)
        .param("owner")
        .deduced("total_length", |r| {
            let handle = r.value::<ParamObject>("handle")?;
            let head = r.value::<ParamObject>("head")?;
            Ok(ParamValue::Float(
                handle.value::<f64>("length")? + head.value::<f64>("diameter")?,
            ))
        })
        .deduced("label", |r| match r.value::<String>("owner") {
            Ok(owner) => Ok(ParamValue::Str(format!("{owner}'s hammer"))),
            Err(ParamError::MissingParameter { .. }) => Ok(ParamValue::Str("hammer".to_string())),
            Err(e) => Err(e),
        })
        .missing_policy(policy)
        .build()
}
