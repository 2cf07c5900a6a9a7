use std::collections::HashMap;
use thiserror::Error;

/// A getter/setter pair over one named `f64` parameter of a component.
///
/// Accessors are plain function pointers; binding to a particular instance
/// happens at call time by passing the instance to [`AttributeStore::get`] or
/// [`AttributeStore::set`]. This keeps the store free of field offsets and
/// runtime type information beyond the string key.
pub struct NamedAttribute<C: ?Sized> {
    name: String,
    get: fn(&C) -> f64,
    set: fn(&mut C, f64),
}

impl<C: ?Sized> NamedAttribute<C> {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Named-parameter table of one component type.
///
/// Maps attribute names to accessor pairs so that generic drivers (parameter
/// fitting loops, optimizers) can read and write a component's tunable scalars
/// purely by name, with zero coupling to the component's concrete type.
/// Setters registered here are responsible for clicking the owning component's
/// [`ChangeTicker`](super::ticker::ChangeTicker) when the stored value actually
/// changes; the store itself performs no change detection.
pub struct AttributeStore<C: ?Sized> {
    entries: Vec<NamedAttribute<C>>,
    by_name: HashMap<String, usize>,
}

impl<C: ?Sized> Default for AttributeStore<C> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            by_name: HashMap::new(),
        }
    }
}

impl<C: ?Sized> AttributeStore<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to an accessor pair.
    ///
    /// # Errors
    ///
    /// Returns [`AttributeError::DuplicateAttribute`] if `name` is already
    /// bound in this store.
    pub fn register(
        &mut self,
        name: &str,
        get: fn(&C) -> f64,
        set: fn(&mut C, f64),
    ) -> Result<(), AttributeError> {
        if self.by_name.contains_key(name) {
            return Err(AttributeError::DuplicateAttribute {
                name: name.to_string(),
            });
        }
        self.by_name.insert(name.to_string(), self.entries.len());
        self.entries.push(NamedAttribute {
            name: name.to_string(),
            get,
            set,
        });
        Ok(())
    }

    /// Reads the current value of attribute `name` on `target`.
    ///
    /// # Errors
    ///
    /// Returns [`AttributeError::UnknownAttribute`] if `name` is not bound.
    pub fn get(&self, target: &C, name: &str) -> Result<f64, AttributeError> {
        let entry = self.lookup(name)?;
        Ok((entry.get)(target))
    }

    /// Writes `value` to attribute `name` on `target` through the bound setter.
    ///
    /// # Errors
    ///
    /// Returns [`AttributeError::UnknownAttribute`] if `name` is not bound.
    pub fn set(&self, target: &mut C, name: &str, value: f64) -> Result<(), AttributeError> {
        let entry = self.lookup(name)?;
        (entry.set)(target, value);
        Ok(())
    }

    /// Returns `true` if `name` is bound in this store.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Iterates over all bound names in registration order.
    ///
    /// The iterator is finite and restartable; calling `names()` again yields
    /// a fresh pass over the same sequence.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    fn lookup(&self, name: &str) -> Result<&NamedAttribute<C>, AttributeError> {
        self.by_name
            .get(name)
            .map(|&idx| &self.entries[idx])
            .ok_or_else(|| AttributeError::UnknownAttribute {
                name: name.to_string(),
            })
    }
}

/// Object-safe facade over a component's [`AttributeStore`].
///
/// Concrete components implement this by delegating to their canonical store,
/// which lets opaque callers hold `&mut dyn Tunable` (or any family trait
/// object with `Tunable` as a supertrait) and manipulate parameters by name.
pub trait Tunable {
    /// Reads the named attribute.
    fn get_attribute(&self, name: &str) -> Result<f64, AttributeError>;

    /// Writes the named attribute.
    fn set_attribute(&mut self, name: &str, value: f64) -> Result<(), AttributeError>;

    /// Lists all attribute names in registration order.
    fn attribute_names(&self) -> Vec<String>;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AttributeError {
    #[error("Attribute '{name}' is already registered in this store")]
    DuplicateAttribute { name: String },

    #[error("Unknown attribute '{name}'")]
    UnknownAttribute { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Knob {
        gain: f64,
        offset: f64,
    }

    fn store() -> AttributeStore<Knob> {
        let mut store = AttributeStore::new();
        store
            .register("gain", |k: &Knob| k.gain, |k, v| k.gain = v)
            .unwrap();
        store
            .register("offset", |k| k.offset, |k, v| k.offset = v)
            .unwrap();
        store
    }

    #[test]
    fn get_returns_current_field_value() {
        let knob = Knob {
            gain: 2.5,
            offset: -1.0,
        };
        let store = store();
        assert_eq!(store.get(&knob, "gain"), Ok(2.5));
        assert_eq!(store.get(&knob, "offset"), Ok(-1.0));
    }

    #[test]
    fn set_then_get_round_trips_exactly() {
        let mut knob = Knob {
            gain: 0.0,
            offset: 0.0,
        };
        let store = store();
        for value in [0.0, -0.0, 1.5, -3.75, f64::MIN_POSITIVE, f64::MAX, f64::MIN] {
            store.set(&mut knob, "gain", value).unwrap();
            assert_eq!(store.get(&knob, "gain").unwrap(), value);
        }
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut store = store();
        let result = store.register("gain", |k| k.gain, |k, v| k.gain = v);
        assert_eq!(
            result,
            Err(AttributeError::DuplicateAttribute {
                name: "gain".to_string()
            })
        );
    }

    #[test]
    fn unknown_name_fails_on_get_and_set() {
        let mut knob = Knob {
            gain: 0.0,
            offset: 0.0,
        };
        let store = store();
        assert!(matches!(
            store.get(&knob, "phase"),
            Err(AttributeError::UnknownAttribute { .. })
        ));
        assert!(matches!(
            store.set(&mut knob, "phase", 1.0),
            Err(AttributeError::UnknownAttribute { .. })
        ));
    }

    #[test]
    fn names_follow_registration_order_and_restart() {
        let store = store();
        let first: Vec<&str> = store.names().collect();
        let second: Vec<&str> = store.names().collect();
        assert_eq!(first, vec!["gain", "offset"]);
        assert_eq!(first, second);
    }

    #[test]
    fn contains_reflects_registration() {
        let store = store();
        assert!(store.contains("gain"));
        assert!(!store.contains("phase"));
    }
}
