use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use busline_catalog::BusCatalog;
use busline_core::AuthService;
use busline_order::{Checkout, SimulatedPaymentGateway, TicketService};
use busline_seating::SeatEligibilityEngine;
use busline_store::{Config, EventBus, Stores};
use tracing::info;

/// Everything a command needs, wired from configuration
pub struct AppState {
    pub config: Config,
    pub catalog: BusCatalog,
    pub stores: Stores,
    pub events: Arc<EventBus>,
    pub engine: SeatEligibilityEngine,
}

impl AppState {
    pub fn load(config_dir: &Path) -> anyhow::Result<Self> {
        let config = Config::load_from(config_dir)
            .with_context(|| format!("Failed to load config from {}", config_dir.display()))?;
        let catalog = BusCatalog::load(&config.catalog.data_path)?;
        let stores = Stores::from_config(&config.storage);
        let engine = SeatEligibilityEngine::new(config.seating.adjacency);

        info!(
            "Loaded {} buses, storage {:?}, adjacency {:?}",
            catalog.len(),
            config.storage.backend,
            engine.rule()
        );

        Ok(Self {
            config,
            catalog,
            stores,
            events: Arc::new(EventBus::default()),
            engine,
        })
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(
            self.stores.users.clone(),
            self.stores.sessions.clone(),
            self.events.clone(),
        )
        .with_min_password_length(self.config.auth.min_password_length)
    }

    pub fn checkout(&self) -> Checkout {
        let payment = &self.config.payment;
        Checkout::new(
            Arc::new(SimulatedPaymentGateway::from_millis(payment.processing_delay_ms)),
            self.stores.bookings.clone(),
            self.events.clone(),
        )
        .with_currency(payment.currency.clone())
        .with_merchant_upi_id(payment.merchant_upi_id.clone())
    }

    pub fn tickets(&self) -> TicketService {
        TicketService::new(self.stores.bookings.clone())
    }
}
