//! Wither arguments and dispatch.
//!
//! `object.with(name, args)` runs the custom wither declared for `name`, or
//! the default one, which takes exactly one value and forwards it to
//! `with_params`.

use crate::error::ParamError;
use crate::object::ParamObject;
use crate::params;
use crate::value::{FromParam, IntoParam, ParamMap, ParamValue};

/// Positional and keyword arguments of a wither call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WitherArgs {
    positional: Vec<ParamValue>,
    keywords: ParamMap,
}

impl WitherArgs {
    /// Empty argument list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Single positional argument.
    pub fn single(value: impl IntoParam) -> Self {
        Self::new().arg(value)
    }

    /// Append a positional argument.
    pub fn arg(mut self, value: impl IntoParam) -> Self {
        self.positional.push(value.into_param());
        self
    }

    /// Set a keyword argument.
    pub fn kwarg(mut self, name: &str, value: impl IntoParam) -> Self {
        self.keywords.insert(name.to_string(), value.into_param());
        self
    }

    pub fn positional(&self) -> &[ParamValue] {
        &self.positional
    }

    pub fn keywords(&self) -> &ParamMap {
        &self.keywords
    }

    pub fn keyword(&self, name: &str) -> Option<&ParamValue> {
        self.keywords.get(name)
    }

    /// Argument bound to positional slot `index` or keyword `name`.
    pub fn lookup(&self, index: usize, name: &str) -> Option<&ParamValue> {
        self.positional.get(index).or_else(|| self.keywords.get(name))
    }

    /// Like [`lookup`](Self::lookup), converted to `T`.
    pub fn extract<T: FromParam>(&self, index: usize, name: &str) -> Result<Option<T>, ParamError> {
        self.lookup(index, name).map(|v| v.cast(name)).transpose()
    }

    /// Keyword-only argument converted to `T`.
    pub fn extract_keyword<T: FromParam>(&self, name: &str) -> Result<Option<T>, ParamError> {
        self.keyword(name).map(|v| v.cast(name)).transpose()
    }

    pub fn len(&self) -> usize {
        self.positional.len() + self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub(crate) fn dispatch(
    object: &ParamObject,
    name: &str,
    args: &WitherArgs,
) -> Result<ParamObject, ParamError> {
    let decl = object
        .class()
        .param(name)
        .ok_or_else(|| ParamError::unknown(object.class().name(), name))?;

    match decl.wither() {
        Some(custom) => {
            tracing::trace!("Calling custom wither 'with_{}' of '{}'", name, object.class().name());
            custom(object, args)
        }
        None => default_wither(object, name, args),
    }
}

fn default_wither(
    object: &ParamObject,
    name: &str,
    args: &WitherArgs,
) -> Result<ParamObject, ParamError> {
    let value = match (args.positional(), args.keywords().len()) {
        ([value], 0) => value,
        ([], 1) => args.keyword(name).ok_or_else(|| ParamError::WitherArguments {
            name: name.to_string(),
            reason: format!(
                "unexpected keyword '{}'",
                args.keywords().keys().next().map(String::as_str).unwrap_or_default()
            ),
        })?,
        _ => {
            return Err(ParamError::WitherArguments {
                name: name.to_string(),
                reason: format!("expected exactly one value, got {}", args.len()),
            });
        }
    };

    // A deduced name can only be written through a caster that consumes it
    let class = object.class();
    if class.is_deduced(name) && !class.is_alias(name) {
        return Err(ParamError::WitherArguments {
            name: name.to_string(),
            reason: format!("deduced parameter of '{}' with no caster consuming it", class.name()),
        });
    }

    object.with_params(params! { name => value.clone() })
}
