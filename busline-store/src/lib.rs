pub mod app_config;
pub mod memory;
pub mod local_storage;
pub mod events;

use std::sync::Arc;

use busline_core::repository::{BookingRepository, SessionStore, UserRepository};

pub use app_config::Config;
pub use events::EventBus;
pub use local_storage::LocalStorage;
pub use memory::MemoryStore;

/// Repository handles for one storage backend
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub sessions: Arc<dyn SessionStore>,
}

impl Stores {
    pub fn from_config(config: &app_config::StorageConfig) -> Self {
        match config.backend {
            app_config::StorageBackend::Memory => Self::shared(Arc::new(MemoryStore::new())),
            app_config::StorageBackend::File => Self::shared(Arc::new(LocalStorage::new(&config.path))),
        }
    }

    fn shared<S>(store: Arc<S>) -> Self
    where
        S: UserRepository + BookingRepository + SessionStore + 'static,
    {
        Self {
            users: store.clone(),
            bookings: store.clone(),
            sessions: store,
        }
    }
}
