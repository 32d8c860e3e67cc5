//! Resolution of parameter values.
//!
//! Every read goes through a [`Resolver`]: stored names come from the
//! object's slots (through their getter, if any), deduced names are
//! recomputed, and nested objects come back wrapped in a [`NestedBinding`].
//! Deduced functions and getters receive the resolver of the read that
//! triggered them, so a cycle between them is detected on the first read
//! instead of recursing forever.

use std::cell::RefCell;

use crate::binding::{NestedBinding, Param};
use crate::error::ParamError;
use crate::object::ParamObject;
use crate::schema::{ParamClass, ParamDecl, StoredParam};
use crate::value::{FromParam, ParamValue};

/// Read context handed to deduced parameter functions.
pub struct Resolver<'a> {
    object: &'a ParamObject,
    // Names currently being computed, outermost first
    stack: RefCell<Vec<String>>,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(object: &'a ParamObject) -> Self {
        Self {
            object,
            stack: RefCell::new(Vec::new()),
        }
    }

    /// Class of the object being read.
    pub fn class(&self) -> &ParamClass {
        self.object.class()
    }

    /// Raw stored value, without defaults nor bindings.
    pub fn stored(&self, name: &str) -> Option<&'a ParamValue> {
        self.object.stored(name)
    }

    /// Resolve `name`, wrapping nested objects in a binding.
    pub fn get(&self, name: &str) -> Result<Param, ParamError> {
        match self.class().param(name) {
            None => Err(ParamError::unknown(self.class().name(), name)),
            Some(ParamDecl::Stored(decl)) => self.read_stored(decl),
            Some(ParamDecl::Deduced(decl)) => {
                self.guarded(name, || (decl.compute)(self)).map(Param::Value)
            }
        }
    }

    /// Resolve `name` as a raw value.
    pub fn get_value(&self, name: &str) -> Result<ParamValue, ParamError> {
        self.get(name).map(Param::into_value)
    }

    /// Resolve `name` and convert it to `T`.
    pub fn value<T: FromParam>(&self, name: &str) -> Result<T, ParamError> {
        self.get_value(name)?.cast(name)
    }

    fn read_stored(&self, decl: &StoredParam) -> Result<Param, ParamError> {
        let name = decl.name.as_str();
        let raw = self
            .object
            .stored(name)
            .ok_or_else(|| ParamError::missing(self.class().name(), name))?;

        let value = match &decl.getter {
            Some(getter) => self.guarded(name, || getter(self, raw))?,
            None => raw.clone(),
        };

        Ok(match value {
            ParamValue::Object(nested) => {
                Param::Nested(NestedBinding::new(self.object.clone(), name, nested))
            }
            other => Param::Value(other),
        })
    }

    /// Run `compute` for `name`, failing if `name` is already being computed.
    fn guarded<F>(&self, name: &str, compute: F) -> Result<ParamValue, ParamError>
    where
        F: FnOnce() -> Result<ParamValue, ParamError>,
    {
        {
            let mut stack = self.stack.borrow_mut();
            if stack.iter().any(|n| n == name) {
                let mut cycle = stack.join(" -> ");
                cycle.push_str(" -> ");
                cycle.push_str(name);
                return Err(ParamError::declaration(
                    self.class().name(),
                    format!("parameters form a cycle: {}", cycle),
                ));
            }
            stack.push(name.to_string());
        }

        let result = compute();
        self.stack.borrow_mut().pop();
        result
    }
}
