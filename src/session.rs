use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::geo::Coordinate;

/// Sessions live for one calculation flow; anything older than this is
/// dropped the next time a session is created, so the map cannot grow
/// for the life of the process.
const SESSION_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressField {
    Start,
    End,
}

/// Per-client calculation state: the coordinates pinned to each
/// address field, the discount flag and the language preference.
/// Replaces what used to be ambient globals; every mutation goes
/// through the store below.
#[derive(Clone, Debug)]
pub struct CalcSession {
    pub discount_enabled: bool,
    pub language: String,
    pinned: HashMap<AddressField, Coordinate>,
    generations: HashMap<AddressField, u64>,
    created_at: Instant,
}

impl CalcSession {
    fn new(language: String) -> Self {
        Self {
            discount_enabled: false,
            language,
            pinned: HashMap::new(),
            generations: HashMap::new(),
            created_at: Instant::now(),
        }
    }
}

#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, CalcSession>>>,
}

impl SessionStore {
    pub fn create(&self, language: String) -> Uuid {
        self.evict_expired(SESSION_TTL);

        let id = Uuid::new_v4();
        self.write().insert(id, CalcSession::new(language));
        id
    }

    /// Drop every session older than `ttl`
    pub fn evict_expired(&self, ttl: Duration) {
        let now = Instant::now();
        self.write()
            .retain(|_, session| now.duration_since(session.created_at) < ttl);
    }

    /// Pin a coordinate to an address field. `None` if the session is
    /// unknown.
    pub fn pin_coordinate(
        &self,
        id: Uuid,
        field: AddressField,
        coordinate: Coordinate,
    ) -> Option<()> {
        let mut sessions = self.write();
        let session = sessions.get_mut(&id)?;
        session.pinned.insert(field, coordinate);
        Some(())
    }

    pub fn pinned(&self, id: Uuid, field: AddressField) -> Option<Option<Coordinate>> {
        let sessions = self.read();
        let session = sessions.get(&id)?;
        Some(session.pinned.get(&field).copied())
    }

    /// Editing a field invalidates whatever coordinate was pinned to it
    pub fn clear_pin(&self, id: Uuid, field: AddressField) -> Option<()> {
        let mut sessions = self.write();
        let session = sessions.get_mut(&id)?;
        session.pinned.remove(&field);
        Some(())
    }

    pub fn set_discount(&self, id: Uuid, enabled: bool) -> Option<()> {
        let mut sessions = self.write();
        let session = sessions.get_mut(&id)?;
        session.discount_enabled = enabled;
        Some(())
    }

    pub fn discount_enabled(&self, id: Uuid) -> Option<bool> {
        self.read().get(&id).map(|s| s.discount_enabled)
    }

    pub fn set_language(&self, id: Uuid, language: &str) -> Option<()> {
        let mut sessions = self.write();
        let session = sessions.get_mut(&id)?;
        session.language = language.to_string();
        Some(())
    }

    /// Take the next suggestion generation for a field. Each lookup
    /// request claims a generation before calling out; a response is
    /// only applied if its generation is still the latest, so a slow
    /// stale response can never overwrite newer suggestions.
    pub fn begin_suggestion(&self, id: Uuid, field: AddressField) -> Option<u64> {
        let mut sessions = self.write();
        let session = sessions.get_mut(&id)?;
        let generation = session.generations.entry(field).or_insert(0);
        *generation += 1;
        Some(*generation)
    }

    pub fn is_current(&self, id: Uuid, field: AddressField, generation: u64) -> bool {
        self.read()
            .get(&id)
            .and_then(|s| s.generations.get(&field).copied())
            .is_some_and(|latest| latest == generation)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<Uuid, CalcSession>> {
        self.inner.read().expect("session store lock poisoned")
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<Uuid, CalcSession>> {
        self.inner.write().expect("session store lock poisoned")
    }
}
