//! Who may change what.
//!
//! Updates are reserved to the author; deletes are open to the author and to
//! admins.

use crate::{
    auth::Actor,
    errors::{HubError, HubResult},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Update,
    Delete,
}

impl Action {
    fn verb(self) -> &'static str {
        match self {
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

/// Fails with `Forbidden` unless `actor` may perform `action` on a document
/// owned by `owner_id`. `noun` names the document in the message.
pub fn authorize(actor: &Actor, owner_id: &str, action: Action, noun: &str) -> HubResult<()> {
    let allowed = match action {
        Action::Update => actor.id == owner_id,
        Action::Delete => actor.id == owner_id || actor.is_admin(),
    };
    if allowed {
        Ok(())
    } else {
        Err(HubError::forbidden(format!(
            "Not authorized to {} this {noun}",
            action.verb()
        )))
    }
}
