//! Parameter declarations and per-class registries.
//!
//! A [`ParamClass`] is the merged, ordered table of every parameter a
//! parametrized type declares, including the ones inherited from its parent.
//! Classes are declared once through [`ParamClassBuilder`] and shared as
//! `Arc<ParamClass>` by every instance.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use strum::{Display, EnumString, IntoStaticStr};

use crate::Builder;
use crate::error::ParamError;
use crate::object::ParamObject;
use crate::resolve::Resolver;
use crate::value::{IntoParam, ParamMap, ParamValue};
use crate::wither::WitherArgs;

/// Computes a deduced parameter from the other parameters of an object.
pub type ComputeFn = Arc<dyn Fn(&Resolver<'_>) -> Result<ParamValue, ParamError> + Send + Sync>;

/// Reconciles overrides into one stored value.
///
/// Receives the value the parameter currently holds (existing value when
/// updating, default when constructing, `None` if neither) and every override
/// of the call. Returning `Ok(None)` leaves the slot unset.
pub type CasterFn = Arc<
    dyn Fn(Option<&ParamValue>, &ParamMap) -> Result<Option<ParamValue>, ParamError> + Send + Sync,
>;

/// Transforms a stored value on every read. Receives the raw slot value.
pub type GetterFn =
    Arc<dyn Fn(&Resolver<'_>, &ParamValue) -> Result<ParamValue, ParamError> + Send + Sync>;

/// Custom update logic bound to one parameter. Must end in `with_params`.
pub type WitherFn =
    Arc<dyn Fn(&ParamObject, &WitherArgs) -> Result<ParamObject, ParamError> + Send + Sync>;

/// Kind of a declared parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ParamKind {
    /// Held in the object's slots
    Stored,
    /// Computed on every read
    Deduced,
}

/// When a stored parameter without any value is reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum MissingPolicy {
    /// Leave the slot unset and fail when it is read
    #[default]
    Lazy,
    /// Fail while constructing or updating the object
    Eager,
}

/// Caster attached to a stored parameter, with the alias names it recognizes.
#[derive(Clone)]
pub struct Caster {
    aliases: Vec<String>,
    func: CasterFn,
}

impl Caster {
    pub fn new<F>(aliases: &[&str], func: F) -> Self
    where
        F: Fn(Option<&ParamValue>, &ParamMap) -> Result<Option<ParamValue>, ParamError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            func: Arc::new(func),
        }
    }

    /// Extra override names this caster consumes.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn recognizes(&self, name: &str) -> bool {
        self.aliases.iter().any(|a| a == name)
    }

    pub(crate) fn cast(
        &self,
        current: Option<&ParamValue>,
        overrides: &ParamMap,
    ) -> Result<Option<ParamValue>, ParamError> {
        (self.func)(current, overrides)
    }
}

impl fmt::Debug for Caster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Caster")
            .field("aliases", &self.aliases)
            .finish_non_exhaustive()
    }
}

/// Declaration of a parameter held in the object.
#[derive(Clone)]
pub struct StoredParam {
    pub name: String,
    pub default: Option<ParamValue>,
    pub caster: Option<Caster>,
    pub getter: Option<GetterFn>,
    pub wither: Option<WitherFn>,
}

impl StoredParam {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            caster: None,
            getter: None,
            wither: None,
        }
    }

    pub fn with_default(mut self, value: ParamValue) -> Self {
        self.default = Some(value);
        self
    }
}

/// Declaration of a parameter computed from others.
#[derive(Clone)]
pub struct DeducedParam {
    pub name: String,
    pub compute: ComputeFn,
    pub wither: Option<WitherFn>,
}

/// One entry of a class registry.
#[derive(Clone)]
pub enum ParamDecl {
    Stored(StoredParam),
    Deduced(DeducedParam),
}

impl ParamDecl {
    pub fn name(&self) -> &str {
        match self {
            ParamDecl::Stored(p) => &p.name,
            ParamDecl::Deduced(p) => &p.name,
        }
    }

    pub fn kind(&self) -> ParamKind {
        match self {
            ParamDecl::Stored(_) => ParamKind::Stored,
            ParamDecl::Deduced(_) => ParamKind::Deduced,
        }
    }

    /// Custom wither, if one was declared.
    pub fn wither(&self) -> Option<&WitherFn> {
        match self {
            ParamDecl::Stored(p) => p.wither.as_ref(),
            ParamDecl::Deduced(p) => p.wither.as_ref(),
        }
    }

    fn set_wither(&mut self, wither: WitherFn) {
        match self {
            ParamDecl::Stored(p) => p.wither = Some(wither),
            ParamDecl::Deduced(p) => p.wither = Some(wither),
        }
    }
}

impl fmt::Debug for ParamDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamDecl::Stored(p) => f
                .debug_struct("Stored")
                .field("name", &p.name)
                .field("default", &p.default)
                .field("caster", &p.caster)
                .field("custom_getter", &p.getter.is_some())
                .field("custom_wither", &p.wither.is_some())
                .finish(),
            ParamDecl::Deduced(p) => f
                .debug_struct("Deduced")
                .field("name", &p.name)
                .field("custom_wither", &p.wither.is_some())
                .finish(),
        }
    }
}

/// Merged parameter registry of a parametrized type.
pub struct ParamClass {
    name: String,
    params: IndexMap<String, ParamDecl>,
    stored: Vec<String>,
    ancestors: Vec<String>,
    missing_policy: MissingPolicy,
}

impl ParamClass {
    /// Start declaring a new class.
    pub fn builder(name: &str) -> ParamClassBuilder {
        ParamClassBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declarations in stable declaration order, parents first.
    pub fn params(&self) -> impl Iterator<Item = &ParamDecl> {
        self.params.values()
    }

    /// Stored declarations in slot order.
    pub fn stored_params(&self) -> impl Iterator<Item = &StoredParam> {
        self.params.values().filter_map(|decl| match decl {
            ParamDecl::Stored(p) => Some(p),
            ParamDecl::Deduced(_) => None,
        })
    }

    /// Get declaration by name.
    pub fn param(&self, name: &str) -> Option<&ParamDecl> {
        self.params.get(name)
    }

    /// Slot index of a stored parameter.
    pub fn stored_index(&self, name: &str) -> Option<usize> {
        self.stored.iter().position(|s| s == name)
    }

    pub fn is_stored(&self, name: &str) -> bool {
        matches!(self.params.get(name), Some(ParamDecl::Stored(_)))
    }

    pub fn is_deduced(&self, name: &str) -> bool {
        matches!(self.params.get(name), Some(ParamDecl::Deduced(_)))
    }

    /// Check if `name` may appear in overrides: a declared name or a caster alias.
    pub fn recognizes(&self, name: &str) -> bool {
        self.params.contains_key(name) || self.is_alias(name)
    }

    /// Check if some caster lists `name` among its aliases.
    pub fn is_alias(&self, name: &str) -> bool {
        self.stored_params()
            .filter_map(|p| p.caster.as_ref())
            .any(|c| c.recognizes(name))
    }

    /// Iterate over all parameter names.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(|s| s.as_str())
    }

    /// Iterate over stored parameter names in slot order.
    pub fn stored_names(&self) -> impl Iterator<Item = &str> {
        self.stored.iter().map(|s| s.as_str())
    }

    /// Number of declared parameters.
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Number of stored slots per instance.
    pub fn stored_count(&self) -> usize {
        self.stored.len()
    }

    /// Names of the inherited classes, nearest parent first.
    pub fn ancestors(&self) -> &[String] {
        &self.ancestors
    }

    /// Check if this class is `name` or inherits from it.
    pub fn is_subclass_of(&self, name: &str) -> bool {
        self.name == name || self.ancestors.iter().any(|a| a == name)
    }

    pub fn missing_policy(&self) -> MissingPolicy {
        self.missing_policy
    }
}

impl fmt::Debug for ParamClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamClass")
            .field("name", &self.name)
            .field("params", &self.params.values().collect::<Vec<_>>())
            .field("ancestors", &self.ancestors)
            .field("missing_policy", &self.missing_policy)
            .finish()
    }
}

/// Builder for declaring classes programmatically.
pub struct ParamClassBuilder {
    name: String,
    parent: Option<Arc<ParamClass>>,
    own: Vec<ParamDecl>,
    casters: Vec<(String, Caster)>,
    getters: Vec<(String, GetterFn)>,
    withers: Vec<(String, WitherFn)>,
    missing_policy: Option<MissingPolicy>,
}

impl ParamClassBuilder {
    /// Create a new builder for the given class name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            own: Vec::new(),
            casters: Vec::new(),
            getters: Vec::new(),
            withers: Vec::new(),
            missing_policy: None,
        }
    }

    /// Inherit every declaration of `parent`.
    pub fn extends(mut self, parent: &Arc<ParamClass>) -> Self {
        self.parent = Some(Arc::clone(parent));
        self
    }

    /// Declare a stored parameter without default.
    pub fn param(mut self, name: &str) -> Self {
        self.own.push(ParamDecl::Stored(StoredParam::new(name)));
        self
    }

    /// Declare a stored parameter with a default value.
    pub fn param_with_default(mut self, name: &str, default: impl IntoParam) -> Self {
        self.own.push(ParamDecl::Stored(
            StoredParam::new(name).with_default(default.into_param()),
        ));
        self
    }

    /// Declare a deduced parameter.
    pub fn deduced<F>(mut self, name: &str, compute: F) -> Self
    where
        F: Fn(&Resolver<'_>) -> Result<ParamValue, ParamError> + Send + Sync + 'static,
    {
        self.own.push(ParamDecl::Deduced(DeducedParam {
            name: name.to_string(),
            compute: Arc::new(compute),
            wither: None,
        }));
        self
    }

    /// Attach a caster to the stored parameter `name`.
    ///
    /// `aliases` lists the extra override names the caster reconciles.
    pub fn caster<F>(mut self, name: &str, aliases: &[&str], func: F) -> Self
    where
        F: Fn(Option<&ParamValue>, &ParamMap) -> Result<Option<ParamValue>, ParamError>
            + Send
            + Sync
            + 'static,
    {
        self.casters
            .push((name.to_string(), Caster::new(aliases, func)));
        self
    }

    /// Attach a getter to the stored parameter `name`.
    ///
    /// Reads of `name` return the getter's result instead of the raw slot.
    /// The slot itself, and therefore equality and updates, keep the raw value.
    pub fn getter<F>(mut self, name: &str, func: F) -> Self
    where
        F: Fn(&Resolver<'_>, &ParamValue) -> Result<ParamValue, ParamError>
            + Send
            + Sync
            + 'static,
    {
        self.getters.push((name.to_string(), Arc::new(func)));
        self
    }

    /// Attach a custom wither to the parameter `name`.
    pub fn wither<F>(mut self, name: &str, func: F) -> Self
    where
        F: Fn(&ParamObject, &WitherArgs) -> Result<ParamObject, ParamError> + Send + Sync + 'static,
    {
        self.withers.push((name.to_string(), Arc::new(func)));
        self
    }

    /// Set how missing values are reported. Inherited from the parent if unset.
    pub fn missing_policy(mut self, policy: MissingPolicy) -> Self {
        self.missing_policy = Some(policy);
        self
    }
}

impl Builder for ParamClassBuilder {
    type Output = Arc<ParamClass>;

    fn build(self) -> Result<Arc<ParamClass>, ParamError> {
        let mut seen = HashSet::new();
        for decl in &self.own {
            if !seen.insert(decl.name()) {
                return Err(ParamError::declaration(
                    &self.name,
                    format!("parameter '{}' is declared twice", decl.name()),
                ));
            }
        }

        let (mut params, ancestors, inherited_policy) = match &self.parent {
            Some(parent) => {
                let mut ancestors = vec![parent.name.clone()];
                ancestors.extend(parent.ancestors.iter().cloned());
                (parent.params.clone(), ancestors, parent.missing_policy)
            }
            None => (IndexMap::new(), Vec::new(), MissingPolicy::default()),
        };

        // Overridden names keep the parent's position
        for decl in self.own {
            params.insert(decl.name().to_string(), decl);
        }

        // A child may replace an inherited caster, getter or wither, but not
        // attach two of the same kind to one name
        for (kind, names) in [
            ("caster", self.casters.iter().map(|(n, _)| n).collect::<Vec<_>>()),
            ("getter", self.getters.iter().map(|(n, _)| n).collect()),
            ("wither", self.withers.iter().map(|(n, _)| n).collect()),
        ] {
            let mut attached = HashSet::new();
            if let Some(name) = names.into_iter().find(|n| !attached.insert(*n)) {
                return Err(ParamError::declaration(
                    &self.name,
                    format!("{} attached twice to '{}'", kind, name),
                ));
            }
        }

        for (name, caster) in self.casters {
            stored_target(&mut params, &self.name, "caster", &name)?.caster = Some(caster);
        }

        for (name, getter) in self.getters {
            stored_target(&mut params, &self.name, "getter", &name)?.getter = Some(getter);
        }

        for (name, wither) in self.withers {
            params
                .get_mut(&name)
                .ok_or_else(|| {
                    ParamError::declaration(
                        &self.name,
                        format!("wither attached to unknown parameter '{}'", name),
                    )
                })?
                .set_wither(wither);
        }

        let stored: Vec<String> = params
            .values()
            .filter(|d| d.kind() == ParamKind::Stored)
            .map(|d| d.name().to_string())
            .collect();

        tracing::debug!(
            "Declared class '{}' with {} parameters ({} stored)",
            self.name,
            params.len(),
            stored.len()
        );

        Ok(Arc::new(ParamClass {
            name: self.name,
            params,
            stored,
            ancestors,
            missing_policy: self.missing_policy.unwrap_or(inherited_policy),
        }))
    }
}

fn stored_target<'a>(
    params: &'a mut IndexMap<String, ParamDecl>,
    class: &str,
    kind: &str,
    name: &str,
) -> Result<&'a mut StoredParam, ParamError> {
    match params.get_mut(name) {
        Some(ParamDecl::Stored(p)) => Ok(p),
        Some(ParamDecl::Deduced(_)) => Err(ParamError::declaration(
            class,
            format!("{} attached to deduced parameter '{}'", kind, name),
        )),
        None => Err(ParamError::declaration(
            class,
            format!("{} attached to unknown parameter '{}'", kind, name),
        )),
    }
}
