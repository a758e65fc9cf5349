//! In-memory registry shared by the services
//!
//! Stand-in for the persistence collaborator: registry records, pickups
//! and sales live in maps behind one `RwLock`. The write lock is the
//! transactional boundary of the platform: a stock check-then-update and
//! the sale it belongs to commit under a single guard, so concurrent sale
//! recordings against the same pickup item are serialized.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use shared::models::{Company, Destination, Pickup, Sale, Site, Truck};
use uuid::Uuid;

#[derive(Debug, Default)]
pub(crate) struct RegistryInner {
    pub(crate) companies: HashMap<Uuid, Company>,
    pub(crate) sites: HashMap<Uuid, Site>,
    pub(crate) trucks: HashMap<Uuid, Truck>,
    pub(crate) destinations: HashMap<Uuid, Destination>,
    pub(crate) pickups: HashMap<Uuid, Pickup>,
    pub(crate) sales: HashMap<Uuid, Sale>,
}

/// Shared in-memory state of the platform
#[derive(Debug, Default)]
pub struct Registry {
    inner: RwLock<RegistryInner>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, RegistryInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, RegistryInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed a company record from the external registry collaborator
    pub fn register_company(&self, company: Company) {
        self.write().companies.insert(company.id, company);
    }

    /// Seed a collection-site record
    pub fn register_site(&self, site: Site) {
        self.write().sites.insert(site.id, site);
    }

    /// Seed a truck record
    pub fn register_truck(&self, truck: Truck) {
        self.write().trucks.insert(truck.id, truck);
    }

    /// Seed a destination-facility record
    pub fn register_destination(&self, destination: Destination) {
        self.write().destinations.insert(destination.id, destination);
    }
}
