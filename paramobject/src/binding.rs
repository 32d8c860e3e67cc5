//! Nested bindings.
//!
//! Reading a stored parameter whose value is itself a [`ParamObject`] yields a
//! [`NestedBinding`] instead of the bare object. The binding remembers every
//! owner between the root and the nested object, so a wither called on it
//! returns an updated copy of the root:
//!
//! ```text
//!   toolbox.get("hammer")  ──▶  binding [toolbox.hammer]
//!          .get("handle")  ──▶  binding [toolbox.hammer, hammer.handle]
//!     .with_value("length", 100.0)
//!
//!   handle'  = handle.with_params(length = 100.0)
//!   hammer'  = hammer.with_params(handle = handle')
//!   toolbox' = toolbox.with_params(hammer = hammer')   ◀── returned
//! ```

use std::ops::Deref;

use crate::error::ParamError;
use crate::object::ParamObject;
use crate::params;
use crate::value::{IntoParam, ParamMap, ParamValue};
use crate::wither::WitherArgs;

/// Result of reading a parameter.
#[derive(Clone, Debug, PartialEq)]
pub enum Param {
    /// Plain value
    Value(ParamValue),
    /// Stored nested object, bound to its owners
    Nested(NestedBinding),
}

impl Param {
    /// Raw value, unbinding nested objects.
    pub fn into_value(self) -> ParamValue {
        match self {
            Param::Value(v) => v,
            Param::Nested(binding) => ParamValue::Object(binding.unbind()),
        }
    }

    pub fn as_value(&self) -> Option<&ParamValue> {
        match self {
            Param::Value(v) => Some(v),
            Param::Nested(_) => None,
        }
    }

    pub fn as_nested(&self) -> Option<&NestedBinding> {
        match self {
            Param::Value(_) => None,
            Param::Nested(binding) => Some(binding),
        }
    }

    pub fn into_nested(self) -> Option<NestedBinding> {
        match self {
            Param::Value(_) => None,
            Param::Nested(binding) => Some(binding),
        }
    }

    pub fn is_nested(&self) -> bool {
        matches!(self, Param::Nested(_))
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Link {
    owner: ParamObject,
    field: String,
}

/// Transient proxy over a nested object.
///
/// Reads are forwarded to the wrapped object through `Deref`. Updates
/// (`with_params`, `with`, `with_value`) run against the wrapped object and
/// the replacement is folded into every owner, innermost first; the new root
/// is returned. Bindings are cheap to build and are never cached.
#[derive(Clone, Debug, PartialEq)]
pub struct NestedBinding {
    // Root first
    chain: Vec<Link>,
    target: ParamObject,
}

impl NestedBinding {
    pub(crate) fn new(owner: ParamObject, field: &str, target: ParamObject) -> Self {
        Self {
            chain: vec![Link {
                owner,
                field: field.to_string(),
            }],
            target,
        }
    }

    /// Resolve `name` on the wrapped object.
    ///
    /// A nested object found there is bound through this binding's whole chain.
    pub fn get(&self, name: &str) -> Result<Param, ParamError> {
        Ok(match self.target.get(name)? {
            Param::Nested(inner) => {
                let mut chain = self.chain.clone();
                chain.extend(inner.chain);
                Param::Nested(NestedBinding {
                    chain,
                    target: inner.target,
                })
            }
            value => value,
        })
    }

    /// Update the wrapped object and return the updated root.
    pub fn with_params(&self, overrides: ParamMap) -> Result<ParamObject, ParamError> {
        let replacement = self.target.with_params(overrides)?;
        self.bubble(replacement)
    }

    /// Call a wither on the wrapped object and return the updated root.
    pub fn with(&self, name: &str, args: &WitherArgs) -> Result<ParamObject, ParamError> {
        let replacement = self.target.with(name, args)?;
        self.bubble(replacement)
    }

    /// Call the wither of `name` with a single value and return the updated root.
    pub fn with_value(&self, name: &str, value: impl IntoParam) -> Result<ParamObject, ParamError> {
        self.with(name, &WitherArgs::single(value))
    }

    /// Plain wrapped object, detached from its owners.
    pub fn unbind(self) -> ParamObject {
        self.target
    }

    /// Wrapped object.
    pub fn object(&self) -> &ParamObject {
        &self.target
    }

    /// Object owning the wrapped one.
    pub fn owner(&self) -> &ParamObject {
        // Chain is never empty
        &self.chain[self.chain.len() - 1].owner
    }

    /// Outermost owner, the object an update returns a copy of.
    pub fn root(&self) -> &ParamObject {
        &self.chain[0].owner
    }

    /// Parameter of the owner holding the wrapped object.
    pub fn field(&self) -> &str {
        &self.chain[self.chain.len() - 1].field
    }

    /// Number of owners between the root and the wrapped object.
    pub fn depth(&self) -> usize {
        self.chain.len()
    }

    /// Dotted path from the root, e.g. `hammer.handle`.
    pub fn path(&self) -> String {
        self.chain
            .iter()
            .map(|link| link.field.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }

    fn bubble(&self, replacement: ParamObject) -> Result<ParamObject, ParamError> {
        self.chain.iter().rev().try_fold(replacement, |child, link| {
            tracing::trace!(
                "Folding new '{}' into '{}.{}'",
                child.class().name(),
                link.owner.class().name(),
                link.field
            );
            link.owner.with_params(params! { link.field.as_str() => child })
        })
    }
}

impl Deref for NestedBinding {
    type Target = ParamObject;

    fn deref(&self) -> &ParamObject {
        &self.target
    }
}
