//! Single-resolution result slot.

/// Holds the first value it is resolved with; later resolutions are ignored.
#[derive(Clone, Debug, PartialEq)]
pub struct Settle<T> {
    value: Option<T>,
}

impl<T> Default for Settle<T> {
    fn default() -> Self {
        Self { value: None }
    }
}

impl<T> Settle<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true only for the call that actually settled the slot.
    pub fn resolve(&mut self, value: T) -> bool {
        if self.value.is_some() {
            return false;
        }
        self.value = Some(value);
        true
    }

    pub fn is_settled(&self) -> bool {
        self.value.is_some()
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }
}
