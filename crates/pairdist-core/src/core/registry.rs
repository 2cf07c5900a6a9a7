use super::attributes::Tunable;
use super::serialization::CodecError;
use std::any::Any;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Contract every member of a polymorphic strategy family must satisfy.
///
/// `F` is the family's own trait-object type; a family is declared as
/// `trait Baseline: Component<<BaselineFamily as Family>::Obj>` with
/// `BaselineFamily::Obj = dyn Baseline` (see [`Family`]), which makes
/// `dyn Baseline` satisfy the [`ComponentRegistry`] bound with no extra
/// glue. The registry
/// stores only `Box<F>` prototypes, so it has zero compile-time knowledge of
/// the concrete leaf types behind them.
///
/// - [`type_name`](Component::type_name) is the stable, unique tag a leaf is
///   registered and serialized under.
/// - [`create`](Component::create) builds a fresh *default* instance, never a
///   copy of the prototype's state.
/// - [`clone_boxed`](Component::clone_boxed) deep-copies a live, configured
///   instance.
/// - [`encode_state`](Component::encode_state) and
///   [`apply_state`](Component::apply_state) declare which fields participate
///   in binary snapshots (see [`serialization`](super::serialization)).
pub trait Component<F: ?Sized>: Tunable + Send + Sync {
    /// Stable, unique type tag of the concrete leaf.
    fn type_name(&self) -> &str;

    /// Constructs a fresh default instance of the concrete leaf.
    fn create(&self) -> Box<F>;

    /// Deep-copies this instance, preserving its configured state.
    fn clone_boxed(&self) -> Box<F>;

    /// Concrete-type identity, used to distinguish re-registration of the
    /// same leaf from a tag collision between two different leaves.
    fn as_any(&self) -> &dyn Any;

    /// Appends this instance's serializable field values to `out`.
    fn encode_state(&self, out: &mut Vec<u8>) -> Result<(), CodecError>;

    /// Replaces this instance's serializable fields with values decoded from
    /// `bytes`. Implementations must decode the complete payload before
    /// mutating `self`, so a corrupt payload leaves no partial state.
    fn apply_state(&mut self, bytes: &[u8]) -> Result<(), CodecError>;
}

/// Type-level name for a family's own trait-object type.
///
/// A family trait cannot write `trait Baseline: Component<dyn Baseline>`
/// directly: rustc rejects any mention of `dyn Baseline` in `Baseline`'s own
/// super predicates as a cycle (E0391). Routing the object type through this
/// projection — `trait Baseline: Component<<BaselineFamily as Family>::Obj>`
/// with `type Obj = dyn Baseline` — defers normalization past the cycle
/// check, and the bound then normalizes to exactly `Component<dyn Baseline>`.
pub trait Family {
    /// The family's trait-object type, e.g. `dyn Baseline`.
    type Obj: ?Sized;
}

/// Prototype registry of one polymorphic strategy family.
///
/// Maps type-name strings to owned prototype instances and supports aliasing,
/// construction-by-name, and deep cloning. Population is a startup-time
/// activity: register every leaf, add aliases, then [`seal`](Self::seal) the
/// registry. After sealing, every entry is immutable, which is what makes
/// lock-free concurrent lookups sound (see the global registries in
/// [`components`](super::components)).
pub struct ComponentRegistry<F: ?Sized + Component<F>> {
    family: &'static str,
    prototypes: HashMap<String, Box<F>>,
    aliases: HashMap<String, String>,
    sealed: bool,
}

impl<F: ?Sized + Component<F>> ComponentRegistry<F> {
    /// Creates an empty, unsealed registry. `family` is a human-readable
    /// family label used in diagnostics ("baseline", "envelope", ...).
    pub fn new(family: &'static str) -> Self {
        Self {
            family,
            prototypes: HashMap::new(),
            aliases: HashMap::new(),
            sealed: false,
        }
    }

    /// Registers `prototype` under the name it reports from `type_name()`.
    ///
    /// Re-registering the same concrete type under the same name is
    /// idempotent and succeeds. Registering a *different* concrete type under
    /// a name (or alias) that is already taken fails.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::Sealed`] after [`seal`](Self::seal) has been called.
    /// - [`RegistryError::DuplicateType`] on a tag collision.
    pub fn register(&mut self, prototype: Box<F>) -> Result<(), RegistryError> {
        self.check_unsealed()?;
        let name = prototype.type_name().to_string();
        if self.aliases.contains_key(&name) {
            return Err(RegistryError::DuplicateType { type_name: name });
        }
        if let Some(existing) = self.prototypes.get(&name) {
            if existing.as_any().type_id() == prototype.as_any().type_id() {
                return Ok(());
            }
            return Err(RegistryError::DuplicateType { type_name: name });
        }
        debug!(family = self.family, type_name = %name, "registered component prototype");
        self.prototypes.insert(name, prototype);
        Ok(())
    }

    /// Makes `alias` an additional lookup key for the entry registered under
    /// `canonical`. An alias never introduces a second prototype; it resolves
    /// to the canonical entry at lookup time. Aliasing an alias is allowed
    /// and resolves to the underlying canonical name.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::Sealed`] after [`seal`](Self::seal) has been called.
    /// - [`RegistryError::UnknownType`] if `canonical` is not registered.
    /// - [`RegistryError::DuplicateAlias`] if `alias` is already taken.
    pub fn alias(&mut self, alias: &str, canonical: &str) -> Result<(), RegistryError> {
        self.check_unsealed()?;
        let resolved = self.resolve(canonical)?.to_string();
        if self.prototypes.contains_key(alias) || self.aliases.contains_key(alias) {
            return Err(RegistryError::DuplicateAlias {
                alias: alias.to_string(),
            });
        }
        debug!(family = self.family, alias, canonical = %resolved, "registered component alias");
        self.aliases.insert(alias.to_string(), resolved);
        Ok(())
    }

    /// Constructs a fresh default instance of the type registered under
    /// `name` (a canonical name or an alias).
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownType`] if `name` is registered nowhere.
    pub fn create(&self, name: &str) -> Result<Box<F>, RegistryError> {
        let canonical = self.resolve(name)?;
        Ok(self.prototypes[canonical].create())
    }

    /// Deep-copies a live, already-configured instance. This goes through the
    /// object's own virtual clone, so the copy preserves configured state,
    /// unlike [`create`](Self::create) which always yields defaults.
    pub fn clone_instance(&self, obj: &F) -> Box<F> {
        obj.clone_boxed()
    }

    /// Returns `true` if `name` is a registered canonical name or alias.
    pub fn contains(&self, name: &str) -> bool {
        self.prototypes.contains_key(name) || self.aliases.contains_key(name)
    }

    /// Every canonical name and alias currently known, sorted for stable
    /// discovery output.
    pub fn registered_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .prototypes
            .keys()
            .chain(self.aliases.keys())
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Freezes the registry. Every later call to [`register`](Self::register)
    /// or [`alias`](Self::alias) fails with [`RegistryError::Sealed`].
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// The family label this registry was created with.
    pub fn family(&self) -> &'static str {
        self.family
    }

    fn resolve<'a>(&'a self, name: &'a str) -> Result<&'a str, RegistryError> {
        if self.prototypes.contains_key(name) {
            return Ok(name);
        }
        if let Some(canonical) = self.aliases.get(name) {
            return Ok(canonical);
        }
        Err(RegistryError::UnknownType {
            family: self.family,
            name: name.to_string(),
        })
    }

    fn check_unsealed(&self) -> Result<(), RegistryError> {
        if self.sealed {
            return Err(RegistryError::Sealed {
                family: self.family,
            });
        }
        Ok(())
    }
}

impl<F: ?Sized + Component<F>> std::fmt::Debug for ComponentRegistry<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("family", &self.family)
            .field("names", &self.registered_names())
            .field("sealed", &self.sealed)
            .finish()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Type '{type_name}' is already registered under a different prototype")]
    DuplicateType { type_name: String },

    #[error("Alias '{alias}' is already taken")]
    DuplicateAlias { alias: String },

    #[error("Unknown {family} type '{name}'")]
    UnknownType { family: &'static str, name: String },

    #[error("The {family} registry is sealed; registration must happen before first lookup")]
    Sealed { family: &'static str },
}
