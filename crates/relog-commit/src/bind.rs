//! Positional capture-group bindings.
//!
//! The header, merge and revert patterns are configured together with an
//! ordered list of field names: the first name receives the first capture
//! group, and so on. A [`Binding`] turns that name list into setters once,
//! then assigns each match without looking names up again.

use tracing::debug;

/// Sets one field of a record from a captured value.
pub type Setter<T> = fn(&mut T, String);

/// Records that can receive captured values by field name.
pub trait Bindable {
    /// Returns the setter for a field name, if the record has that field.
    fn setter(name: &str) -> Option<Setter<Self>>;

    /// Stores a value for a name without a dedicated field.
    ///
    /// The default implementation drops the value.
    fn bind_custom(&mut self, name: &str, value: String) {
        debug!(field = name, %value, "dropping value for unknown field");
    }
}

enum Slot<T> {
    Field(Setter<T>),
    Custom(String),
}

/// An ordered capture-index to field binding.
pub struct Binding<T> {
    slots: Vec<Slot<T>>,
}

impl<T: Bindable> Binding<T> {
    /// Builds a binding from ordered field names.
    pub fn new<S: AsRef<str>>(names: &[S]) -> Self {
        let slots = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                T::setter(name).map_or_else(|| Slot::Custom(name.to_string()), Slot::Field)
            })
            .collect();
        Self { slots }
    }

    /// Assigns captured values to `target` in order.
    ///
    /// Values beyond the configured names are ignored, and so are names
    /// beyond the captured values.
    pub fn apply<'v, I>(&self, target: &mut T, values: I)
    where
        I: IntoIterator<Item = &'v str>,
    {
        for (slot, value) in self.slots.iter().zip(values) {
            match slot {
                Slot::Field(set) => set(target, value.to_string()),
                Slot::Custom(name) => target.bind_custom(name, value.to_string()),
            }
        }
    }
}

impl<T> std::fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self
            .slots
            .iter()
            .map(|slot| match slot {
                Slot::Field(_) => "<field>",
                Slot::Custom(name) => name.as_str(),
            })
            .collect();
        f.debug_struct("Binding").field("slots", &names).finish()
    }
}
