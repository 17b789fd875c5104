//! In-memory store for tests and examples.
//!
//! A unit holds the store lock from `begin` until it is committed or dropped,
//! so units are fully serialized. Do not call the read methods while holding
//! a unit on the same task.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::address_book::domain::{AddressEntry, AddressPatch, NewAddressEntry};
use crate::address_book::errors::AddressBookError;
use crate::address_book::repository::{AddressBookRepository, AddressBookUnit};

#[derive(Default, Clone)]
pub struct MemoryAddressBookRepository {
    rows: Arc<Mutex<Vec<AddressEntry>>>,
    fail_inserts: Arc<AtomicBool>,
}

impl MemoryAddressBookRepository {
    pub fn new() -> Self { Self::default() }

    /// Make every subsequent `insert` fail with a repository error.
    pub fn fail_inserts(&self, on: bool) {
        self.fail_inserts.store(on, Ordering::SeqCst);
    }

    /// Snapshot of all rows in insertion order.
    pub async fn all(&self) -> Vec<AddressEntry> {
        self.rows.lock().await.clone()
    }
}

/// Newest first, mirroring the SQL store's `created_at DESC` ordering.
fn newest_first(mut rows: Vec<AddressEntry>) -> Vec<AddressEntry> {
    rows.reverse();
    rows
}

#[async_trait]
impl AddressBookRepository for MemoryAddressBookRepository {
    async fn list_by_user_and_city(&self, user_id: Uuid, city: &str) -> Result<Vec<AddressEntry>, AddressBookError> {
        let rows = self.rows.lock().await;
        let matched = rows.iter().filter(|e| e.user_id == user_id && e.city == city).cloned().collect();
        Ok(newest_first(matched))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AddressEntry>, AddressBookError> {
        let rows = self.rows.lock().await;
        Ok(rows.iter().find(|e| e.id == id).cloned())
    }

    async fn find_default(&self, user_id: Uuid) -> Result<Option<AddressEntry>, AddressBookError> {
        let rows = self.rows.lock().await;
        Ok(rows.iter().find(|e| e.user_id == user_id && e.is_default).cloned())
    }

    async fn page_by_user(&self, user_id: Uuid, page_idx: u64, per_page: u64) -> Result<(Vec<AddressEntry>, u64), AddressBookError> {
        let rows = self.rows.lock().await;
        let owned = newest_first(rows.iter().filter(|e| e.user_id == user_id).cloned().collect());
        let total = owned.len() as u64;
        let skip = usize::try_from(page_idx.saturating_mul(per_page)).unwrap_or(usize::MAX);
        let take = usize::try_from(per_page).unwrap_or(usize::MAX);
        Ok((owned.into_iter().skip(skip).take(take).collect(), total))
    }

    async fn begin(&self) -> Result<Box<dyn AddressBookUnit>, AddressBookError> {
        let guard = Arc::clone(&self.rows).lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryAddressBookUnit {
            guard,
            staged,
            fail_inserts: self.fail_inserts.load(Ordering::SeqCst),
        }))
    }
}

pub struct MemoryAddressBookUnit {
    guard: OwnedMutexGuard<Vec<AddressEntry>>,
    staged: Vec<AddressEntry>,
    fail_inserts: bool,
}

#[async_trait]
impl AddressBookUnit for MemoryAddressBookUnit {
    async fn clear_default(&mut self, user_id: Uuid) -> Result<u64, AddressBookError> {
        let now = Utc::now();
        let mut changed = 0;
        for e in self.staged.iter_mut().filter(|e| e.user_id == user_id && e.is_default) {
            e.is_default = false;
            e.updated_at = now;
            changed += 1;
        }
        Ok(changed)
    }

    async fn insert(&mut self, entry: NewAddressEntry) -> Result<AddressEntry, AddressBookError> {
        if self.fail_inserts {
            return Err(AddressBookError::Repository("insert rejected by test store".into()));
        }
        if entry.is_default && self.staged.iter().any(|e| e.user_id == entry.user_id && e.is_default) {
            return Err(AddressBookError::Repository("duplicate default address".into()));
        }
        let now = Utc::now();
        let created = AddressEntry {
            id: Uuid::new_v4(),
            user_id: entry.user_id,
            name: entry.name,
            phone: entry.phone,
            province: entry.province,
            city: entry.city,
            county: entry.county,
            address: entry.address,
            tag: entry.tag,
            lon: entry.lon,
            lat: entry.lat,
            is_default: entry.is_default,
            created_at: now,
            updated_at: now,
        };
        self.staged.push(created.clone());
        Ok(created)
    }

    async fn update_by_id(&mut self, id: Uuid, patch: AddressPatch) -> Result<Option<AddressEntry>, AddressBookError> {
        let Some(pos) = self.staged.iter().position(|e| e.id == id) else {
            return Ok(None);
        };
        let owner = self.staged[pos].user_id;
        if patch.is_default == Some(true)
            && self.staged.iter().any(|e| e.user_id == owner && e.is_default && e.id != id)
        {
            return Err(AddressBookError::Repository("duplicate default address".into()));
        }
        let entry = &mut self.staged[pos];
        patch.apply_to(entry);
        entry.updated_at = Utc::now();
        Ok(Some(entry.clone()))
    }

    async fn commit(self: Box<Self>) -> Result<(), AddressBookError> {
        let MemoryAddressBookUnit { mut guard, staged, .. } = *self;
        *guard = staged;
        Ok(())
    }
}
