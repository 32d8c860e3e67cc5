//! Immutable parametrized objects.
//!
//! A parametrized class is declared once as a table of named parameters:
//! stored parameters (with an optional default), deduced parameters computed
//! from the others, getters transforming stored values on read, casters
//! reconciling alias names into stored values, and custom withers. Instances
//! never change; every update returns a new one.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐
//! │ParamClassBuilder│────▶│   ParamClass    │  ordered, merged with parents
//! └─────────────────┘     └────────┬────────┘
//!                                  │ Arc
//!                                  ▼
//! ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐
//! │    Resolver     │◀────│   ParamObject   │────▶│   reconcile     │
//! │ (reads, cycles) │     │  (frozen slots) │     │ (with_params)   │
//! └────────┬────────┘     └─────────────────┘     └────────▲────────┘
//!          │ nested object                                 │
//!          ▼                                               │
//! ┌─────────────────┐   wither on child, then owner.with_params(field = child)
//! │  NestedBinding  │──────────────────────────────────────┘
//! └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use paramobject::{Builder, ParamClass, ParamObject, ParamValue, params};
//!
//! let cylinder = ParamClass::builder("Cylinder")
//!     .param_with_default("radius", 10.0)
//!     .param_with_default("length", 100.0)
//!     .deduced("diameter", |r| Ok(ParamValue::Float(2.0 * r.value::<f64>("radius")?)))
//!     .caster("radius", &["diameter"], |current, overrides| match overrides.get("diameter") {
//!         Some(d) => Ok(Some(ParamValue::Float(d.cast::<f64>("diameter")? / 2.0))),
//!         None => Ok(current.cloned()),
//!     })
//!     .build()?;
//!
//! let cyl = ParamObject::new(&cylinder, params! { "diameter" => 10.0 })?;
//! assert_eq!(cyl.value::<f64>("radius")?, 5.0);
//!
//! let longer = cyl.with_value("length", 250.0)?;
//! assert_eq!(longer.value::<f64>("length")?, 250.0);
//! assert_eq!(cyl.value::<f64>("length")?, 100.0);
//! ```

pub mod binding;
pub mod error;
pub mod object;
pub mod resolve;
pub mod schema;
mod update;
pub mod value;
pub mod wither;

#[cfg(test)]
mod tests;

// Re-export main types
pub use binding::{NestedBinding, Param};
pub use error::ParamError;
pub use object::{ParamObject, ParamObjectBuilder};
pub use resolve::Resolver;
pub use schema::{
    Caster, DeducedParam, MissingPolicy, ParamClass, ParamClassBuilder, ParamDecl, ParamKind,
    StoredParam,
};
pub use value::{FromParam, IntoParam, ParamMap, ParamValue};
pub use wither::WitherArgs;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, ParamError>;

/// Common interface of the class and object builders.
pub trait Builder {
    type Output;
    fn build(self) -> Result<Self::Output>;
}
