// ── Navigation fragment ──
//
// The deep-link address ("#tz1...") that identifies the selected validator
// in a shareable link. Injected so the engine never touches process state.

use std::sync::{PoisonError, RwLock};

pub trait Location: Send + Sync {
    /// Current fragment without the leading `#`, if any.
    fn fragment(&self) -> Option<String>;

    fn set_fragment(&self, value: &str);

    fn clear_fragment(&self);
}

#[derive(Debug, Default)]
pub struct MemoryLocation {
    fragment: RwLock<Option<String>>,
}

impl MemoryLocation {
    pub fn new(initial: Option<&str>) -> Self {
        let location = Self::default();
        if let Some(value) = initial {
            location.set_fragment(value);
        }
        location
    }
}

impl Location for MemoryLocation {
    fn fragment(&self) -> Option<String> {
        self.fragment
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_fragment(&self, value: &str) {
        let value = value.trim().trim_start_matches('#');
        *self.fragment.write().unwrap_or_else(PoisonError::into_inner) =
            (!value.is_empty()).then(|| value.to_owned());
    }

    fn clear_fragment(&self) {
        *self.fragment.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
