//! Immutable parametrized objects.
//!
//! A [`ParamObject`] pairs a shared [`ParamClass`] with one frozen slot per
//! stored parameter. Nothing in it changes after construction: every update
//! returns a new object sharing the untouched values with the old one.

use std::fmt;
use std::sync::Arc;

use crate::Builder;
use crate::binding::Param;
use crate::error::ParamError;
use crate::resolve::Resolver;
use crate::schema::ParamClass;
use crate::update::reconcile;
use crate::value::{FromParam, IntoParam, ParamMap, ParamValue};
use crate::wither::{WitherArgs, dispatch};

/// An immutable instance of a parametrized class.
///
/// Cloning is cheap: the class and the slots are reference counted.
#[derive(Clone)]
pub struct ParamObject {
    class: Arc<ParamClass>,
    slots: Arc<[Option<ParamValue>]>,
}

impl ParamObject {
    /// Construct an object from constructor arguments.
    ///
    /// `params` may hold stored names, deduced names and caster aliases.
    /// Unspecified stored parameters take their default.
    pub fn new(class: &Arc<ParamClass>, params: ParamMap) -> Result<Self, ParamError> {
        reconcile(class, None, &params)
    }

    /// Construct an object of `class` from the stored values of `source`.
    ///
    /// `source` must be an instance of `class` or of one of its subclasses.
    /// Its stored values stand in for the defaults, `overrides` are then
    /// applied as in [`with_params`](Self::with_params). Parameters only the
    /// subclass declares are dropped.
    pub fn from_object(
        class: &Arc<ParamClass>,
        source: &ParamObject,
        overrides: ParamMap,
    ) -> Result<Self, ParamError> {
        if !source.is_instance_of(class.name()) {
            return Err(ParamError::custom(format!(
                "an instance of '{}' or of a subclass is expected, got '{}'",
                class.name(),
                source.class.name()
            )));
        }

        let seed: Vec<Option<ParamValue>> = class
            .stored_names()
            .map(|name| source.stored(name).cloned())
            .collect();
        reconcile(class, Some(seed.as_slice()), &overrides)
    }

    /// Construct an object using only defaults.
    pub fn with_defaults(class: &Arc<ParamClass>) -> Result<Self, ParamError> {
        Self::new(class, ParamMap::new())
    }

    /// Create an object builder for the given class.
    pub fn builder(class: &Arc<ParamClass>) -> ParamObjectBuilder {
        ParamObjectBuilder::new(class)
    }

    pub(crate) fn from_slots(class: Arc<ParamClass>, slots: Vec<Option<ParamValue>>) -> Self {
        Self {
            class,
            slots: slots.into(),
        }
    }

    /// Get the object class.
    pub fn class(&self) -> &ParamClass {
        &self.class
    }

    /// Get the class as an Arc (for sharing).
    pub fn class_arc(&self) -> Arc<ParamClass> {
        Arc::clone(&self.class)
    }

    /// Check if the object's class is `name` or inherits from it.
    pub fn is_instance_of(&self, name: &str) -> bool {
        self.class.is_subclass_of(name)
    }

    /// Resolve a stored, deduced or nested parameter.
    ///
    /// Nested objects come back as [`Param::Nested`] so that withers called on
    /// them return an updated copy of `self`.
    pub fn get(&self, name: &str) -> Result<Param, ParamError> {
        Resolver::new(self).get(name)
    }

    /// Resolve a parameter as a raw value.
    pub fn get_value(&self, name: &str) -> Result<ParamValue, ParamError> {
        Resolver::new(self).get_value(name)
    }

    /// Resolve a parameter and convert it to `T`.
    pub fn value<T: FromParam>(&self, name: &str) -> Result<T, ParamError> {
        Resolver::new(self).value(name)
    }

    /// Raw stored value of `name`, `None` if unset or not stored.
    pub fn stored(&self, name: &str) -> Option<&ParamValue> {
        let idx = self.class.stored_index(name)?;
        self.slots[idx].as_ref()
    }

    /// Check if the stored parameter `name` holds a value.
    pub fn is_set(&self, name: &str) -> bool {
        self.stored(name).is_some()
    }

    /// Every declared parameter with its resolved value, in declaration order.
    pub fn params(&self) -> impl Iterator<Item = (&str, Result<ParamValue, ParamError>)> {
        self.class
            .param_names()
            .map(move |name| (name, self.get_value(name)))
    }

    /// Stored parameters with their slots, in declaration order.
    pub fn stored_params(&self) -> impl Iterator<Item = (&str, Option<&ParamValue>)> {
        self.class
            .stored_names()
            .zip(self.slots.iter())
            .map(|(name, slot)| (name, slot.as_ref()))
    }

    /// Return a copy with the given parameters changed.
    pub fn with_params(&self, overrides: ParamMap) -> Result<ParamObject, ParamError> {
        reconcile(&self.class, Some(&self.slots[..]), &overrides)
    }

    /// Call the wither of `name`.
    pub fn with(&self, name: &str, args: &WitherArgs) -> Result<ParamObject, ParamError> {
        dispatch(self, name, args)
    }

    /// Call the wither of `name` with a single value.
    pub fn with_value(&self, name: &str, value: impl IntoParam) -> Result<ParamObject, ParamError> {
        self.with(name, &WitherArgs::single(value))
    }

    /// Parameters are read-only; this always fails.
    pub fn set(&self, name: &str, _value: impl IntoParam) -> Result<(), ParamError> {
        if self.class.param(name).is_some() {
            Err(ParamError::ImmutableAttribute {
                class: self.class.name().to_string(),
                name: name.to_string(),
            })
        } else {
            Err(ParamError::unknown(self.class.name(), name))
        }
    }
}

impl PartialEq for ParamObject {
    fn eq(&self, other: &Self) -> bool {
        // Objects are equal if they share their class and all slots are equal
        Arc::ptr_eq(&self.class, &other.class) && self.slots == other.slots
    }
}

impl fmt::Debug for ParamObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.class.name());
        for (name, slot) in self.stored_params() {
            s.field(name, &slot);
        }
        s.finish()
    }
}

impl fmt::Display for ParamObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.class.name())?;
        for (i, (name, slot)) in self.stored_params().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match slot {
                Some(value) => write!(f, "{}={}", name, value)?,
                None => write!(f, "{}=<unset>", name)?,
            }
        }
        write!(f, ")")
    }
}

/// Builder for creating a ParamObject from individual arguments.
pub struct ParamObjectBuilder {
    class: Arc<ParamClass>,
    params: ParamMap,
}

impl ParamObjectBuilder {
    /// Create a new builder for the given class.
    pub fn new(class: &Arc<ParamClass>) -> Self {
        Self {
            class: Arc::clone(class),
            params: ParamMap::new(),
        }
    }

    /// Set a constructor argument. Names are checked by `build`.
    pub fn set(mut self, name: &str, value: impl IntoParam) -> Self {
        self.params.insert(name.to_string(), value.into_param());
        self
    }
}

impl Builder for ParamObjectBuilder {
    type Output = ParamObject;

    fn build(self) -> Result<ParamObject, ParamError> {
        ParamObject::new(&self.class, self.params)
    }
}
