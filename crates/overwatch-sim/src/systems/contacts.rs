//! Contact fusion: the player's common operating picture.
//!
//! One contact per detected enemy entity, shared by the whole friendly
//! force. A contact goes stale when no sensor sees its entity, expires
//! after `CONTACT_PERSISTENCE_SECS` of staleness, and is removed at once
//! when its entity is destroyed.

use std::collections::{BTreeMap, HashMap};

use hecs::World;

use overwatch_core::constants::{CONTACT_PERSISTENCE_SECS, PLAYER_FACTION};
use overwatch_core::events::SimEvent;
use overwatch_core::state::Contact;
use overwatch_core::types::{ContactId, EntityId};

use crate::index::EntityIndex;
use crate::unit::read_all;

#[derive(Debug, Default)]
pub struct ContactPicture {
    contacts: BTreeMap<ContactId, Contact>,
    by_entity: HashMap<EntityId, ContactId>,
    last_id: u32,
}

impl ContactPicture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ContactId) -> Option<&Contact> {
        self.contacts.get(&id)
    }

    pub fn for_entity(&self, entity: &EntityId) -> Option<&Contact> {
        self.by_entity.get(entity).and_then(|id| self.contacts.get(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.values()
    }

    pub fn live(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.values().filter(|c| c.is_live)
    }

    pub fn live_count(&self) -> usize {
        self.live().count()
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    fn remove(&mut self, id: ContactId) -> Option<Contact> {
        let contact = self.contacts.remove(&id)?;
        self.by_entity.remove(&contact.entity_id);
        Some(contact)
    }

    pub(crate) fn insert(&mut self, contact: Contact) {
        self.by_entity.insert(contact.entity_id.clone(), contact.id);
        self.contacts.insert(contact.id, contact);
    }

    fn next_id(&mut self) -> ContactId {
        self.last_id += 1;
        ContactId(self.last_id)
    }
}

pub fn run(
    world: &World,
    index: &EntityIndex,
    picture: &mut ContactPicture,
    now: f64,
    events: &mut Vec<SimEvent>,
) {
    let enemy = PLAYER_FACTION.opponent();

    for unit in read_all(world, index).iter().filter(|u| u.faction == enemy) {
        let existing = picture.by_entity.get(&unit.id).copied();

        if !unit.is_alive() {
            if let Some(id) = existing {
                picture.remove(id);
                events.push(SimEvent::ContactLost {
                    contact_id: id,
                    entity_id: unit.id.clone(),
                });
            }
            continue;
        }

        match existing {
            Some(id) if unit.is_detected => {
                if let Some(c) = picture.contacts.get_mut(&id) {
                    c.position = unit.position;
                    c.last_seen = now;
                    c.is_live = true;
                }
            }
            Some(id) => {
                if let Some(c) = picture.contacts.get_mut(&id) {
                    c.is_live = false;
                }
            }
            None if unit.is_detected => {
                let id = picture.next_id();
                picture.insert(Contact {
                    id,
                    entity_id: unit.id.clone(),
                    position: unit.position,
                    platform_id: unit.platform_id.clone(),
                    faction: unit.faction,
                    is_live: true,
                    first_detected: now,
                    last_seen: now,
                });
                log::debug!("{id} opened on {} ({})", unit.id, unit.platform_id);
                events.push(SimEvent::ContactDetected {
                    contact_id: id,
                    entity_id: unit.id.clone(),
                });
            }
            None => {}
        }
    }

    let expired: Vec<ContactId> = picture
        .contacts
        .values()
        .filter(|c| !c.is_live && now - c.last_seen > CONTACT_PERSISTENCE_SECS)
        .map(|c| c.id)
        .collect();
    for id in expired {
        if let Some(contact) = picture.remove(id) {
            events.push(SimEvent::ContactLost {
                contact_id: id,
                entity_id: contact.entity_id,
            });
        }
    }
}
