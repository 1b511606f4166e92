//! Who may read and who may mutate an event.

use uuid::Uuid;

use crate::models::{Caller, Event};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied,
}

/// Only the creator may update or delete, whatever the scope.
pub fn authorize(event: &Event, caller_id: Uuid) -> Access {
    if event.is_creator(caller_id) {
        Access::Allowed
    } else {
        Access::Denied
    }
}

/// Creators and participants may read.
pub fn can_view(event: &Event, caller: &Caller) -> bool {
    event.is_creator(caller.id) || event.has_participant(&caller.email)
}
