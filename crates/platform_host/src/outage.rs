//! Failure switch shared by the in-memory adapters.

use std::{cell::RefCell, rc::Rc};

/// Shared toggle that makes an in-memory adapter fail every call while set.
#[derive(Debug, Clone, Default)]
pub struct Outage(Rc<RefCell<Option<String>>>);

impl Outage {
    /// Sets (`Some`) or clears (`None`) the failure reason.
    pub fn set(&self, reason: Option<&str>) {
        *self.0.borrow_mut() = reason.map(str::to_string);
    }

    /// Returns `Err(reason)` while an outage is active.
    pub fn check(&self) -> Result<(), String> {
        match self.0.borrow().as_ref() {
            Some(reason) => Err(reason.clone()),
            None => Ok(()),
        }
    }
}
