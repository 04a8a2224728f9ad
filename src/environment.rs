use crate::error::ErrorKind;
use crate::value::Value;
use std::collections::HashMap;

use log::debug;

/// One entry of the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub value: Value,
    /// Set for names introduced by a `const` declaration.
    pub constant: bool,
}

/// The single, flat identifier table of a program run.
///
/// There is no enclosing chain: function bodies work on the same table and
/// the interpreter brackets every call with [`Environment::snapshot`] and
/// [`Environment::restore`].
#[derive(Debug, Clone, Default)]
pub struct Environment {
    values: HashMap<String, Binding>,
}

/// A saved copy of every binding, taken on call entry.
#[derive(Debug, Clone)]
pub struct Snapshot(HashMap<String, Binding>);

impl Environment {
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Result<Value, ErrorKind> {
        self.values
            .get(name)
            .map(|binding| binding.value.clone())
            .ok_or_else(|| ErrorKind::UnboundIdentifier(name.to_string()))
    }

    /// Insert or overwrite `name`, keeping any constant flag it carries.
    pub fn set(&mut self, name: &str, value: Value) {
        match self.values.get_mut(name) {
            Some(binding) => binding.value = value,
            None => {
                self.values.insert(
                    name.to_string(),
                    Binding {
                        value,
                        constant: false,
                    },
                );
            }
        }
    }

    /// Like [`Environment::set`] but refuses to overwrite a constant.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), ErrorKind> {
        if self.is_constant(name) {
            debug!("Rejected write to constant '{}'", name);
            return Err(ErrorKind::ConstantReassignment(name.to_string()));
        }

        self.set(name, value);
        Ok(())
    }

    pub fn define_constant(&mut self, name: &str, value: Value) {
        self.values.insert(
            name.to_string(),
            Binding {
                value,
                constant: true,
            },
        );
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn is_constant(&self, name: &str) -> bool {
        self.values.get(name).is_some_and(|binding| binding.constant)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.values.iter().map(|(name, binding)| (name.as_str(), binding))
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot(self.values.clone())
    }

    /// Throw away every change made since `snapshot` was taken.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.values = snapshot.0;
    }
}
