//! Resolves referenced users and equipment for response views.
//!
//! A reference whose target no longer exists resolves to `None` and is
//! rendered as `null`.

use std::collections::HashMap;

use crate::{
    errors::HubResult,
    models::{Equipment, EquipmentSummary, User, UserSummary},
    store::Store,
};

/// Per-request lookup cache so a listing loads each author once.
pub(crate) struct Populator<'a> {
    store: &'a Store,
    users: HashMap<String, Option<UserSummary>>,
    equipment: HashMap<String, Option<Equipment>>,
}

impl<'a> Populator<'a> {
    pub(crate) fn new(store: &'a Store) -> Self {
        Self {
            store,
            users: HashMap::new(),
            equipment: HashMap::new(),
        }
    }

    pub(crate) async fn user(&mut self, id: &str) -> HubResult<Option<UserSummary>> {
        if let Some(cached) = self.users.get(id) {
            return Ok(cached.clone());
        }
        let summary = self.store.get::<User>(id).await?.map(|user| user.summary());
        self.users.insert(id.to_string(), summary.clone());
        Ok(summary)
    }

    pub(crate) async fn equipment(&mut self, id: Option<&str>, with_price: bool) -> HubResult<Option<EquipmentSummary>> {
        let Some(id) = id else {
            return Ok(None);
        };
        if !self.equipment.contains_key(id) {
            let loaded = self.store.get::<Equipment>(id).await?;
            self.equipment.insert(id.to_string(), loaded);
        }
        Ok(self
            .equipment
            .get(id)
            .and_then(Option::as_ref)
            .map(|item| item.summary(with_price)))
    }
}
