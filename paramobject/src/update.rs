//! Reconciliation of overrides into a new set of stored values.
//!
//! Construction and every update funnel through [`reconcile`]. For each stored
//! parameter, in declaration order:
//!
//! 1. an explicit override of the canonical name wins;
//! 2. otherwise the caster, if any, gets the current (or default) value and
//!    the whole override map;
//! 3. otherwise the current value, or the default when constructing, is kept.
//!
//! Casters only ever see the previous state, never values produced earlier in
//! the same call. Unknown override names are rejected before anything runs.

use std::sync::Arc;

use crate::error::ParamError;
use crate::object::ParamObject;
use crate::schema::{MissingPolicy, ParamClass};
use crate::value::{ParamMap, ParamValue};

pub(crate) fn reconcile(
    class: &Arc<ParamClass>,
    previous: Option<&[Option<ParamValue>]>,
    overrides: &ParamMap,
) -> Result<ParamObject, ParamError> {
    if let Some(name) = overrides.keys().find(|name| !class.recognizes(name)) {
        return Err(ParamError::unknown(class.name(), name));
    }

    tracing::trace!(
        "Reconciling {} override(s) for '{}' ({})",
        overrides.len(),
        class.name(),
        if previous.is_some() { "update" } else { "construct" }
    );

    let mut slots = Vec::with_capacity(class.stored_count());
    for (idx, param) in class.stored_params().enumerate() {
        let current = previous
            .and_then(|prev| prev.get(idx))
            .and_then(Option::as_ref)
            .or(param.default.as_ref());

        let value = if let Some(explicit) = overrides.get(&param.name) {
            Some(explicit.clone())
        } else if let Some(caster) = &param.caster {
            caster.cast(current, overrides)?
        } else {
            current.cloned()
        };

        if value.is_none() && class.missing_policy() == MissingPolicy::Eager {
            return Err(ParamError::missing(class.name(), &param.name));
        }
        slots.push(value);
    }

    Ok(ParamObject::from_slots(Arc::clone(class), slots))
}
