//! Composition root.
//!
//! [`App`] owns one of everything: gateway, session store, router, overlay
//! stack, signal bus, image memo. The shell (CLI, GUI, tests) drives it by
//! calling transitions and pumping signals between events; nothing in here
//! spins its own event loop.

use thiserror::Error;

use mercado_barrio_client::{ApiGateway, GatewayInitError};

use crate::config::AppConfig;
use crate::images::ImageCache;
use crate::modal::ModalController;
use crate::router::{Location, Page, Router};
use crate::session::SessionStore;
use crate::signals::{SignalBus, SignalReceiver};
use crate::storage::{FileStore, KeyValueStore, StorageError};

/// Errors while assembling the application.
#[derive(Debug, Error)]
pub enum AppInitError {
    #[error(transparent)]
    Gateway(#[from] GatewayInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// The assembled client application.
pub struct App {
    config: AppConfig,
    gateway: ApiGateway,
    sessions: SessionStore,
    router: Router,
    modals: ModalController,
    bus: SignalBus,
    signals: SignalReceiver,
    images: ImageCache,
}

impl App {
    /// Assemble the application with the file-backed session store.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the store
    /// file cannot be read.
    pub fn new(config: AppConfig) -> Result<Self, AppInitError> {
        let store = FileStore::open(config.session_file())?;
        Self::with_store(config, Box::new(store), Location::new())
    }

    /// Assemble the application at an arbitrary initial location - the deep
    /// link case.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the store
    /// file cannot be read.
    pub fn at_location(config: AppConfig, location: Location) -> Result<Self, AppInitError> {
        let store = FileStore::open(config.session_file())?;
        Self::with_store(config, Box::new(store), location)
    }

    /// Assemble the application over any storage backend (tests use the
    /// in-memory store).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_store(
        config: AppConfig,
        store: Box<dyn KeyValueStore>,
        location: Location,
    ) -> Result<Self, AppInitError> {
        let gateway = ApiGateway::new(&config.api)?;
        let images = ImageCache::new(Some(config.api.base_url.clone()), config.scheme);
        let bus = SignalBus::new();
        // The router's receiver lives as long as the app: registered here,
        // deregistered on drop.
        let signals = bus.subscribe();

        Ok(Self {
            config,
            gateway,
            sessions: SessionStore::new(store),
            router: Router::with_location(location),
            modals: ModalController::new(),
            bus,
            signals,
            images,
        })
    }

    /// Startup navigation: restore the session, honor the redirect marker
    /// or a deep link.
    pub fn bootstrap(&mut self) {
        self.router.bootstrap(&mut self.sessions);
    }

    /// Apply every signal published since the last pump to the router.
    ///
    /// Call between events; signals go through the exact transitions the
    /// direct calls use.
    pub fn pump_signals(&mut self) {
        while let Some(signal) = self.signals.try_next() {
            self.router.apply_signal(signal);
        }
    }

    /// The view to render right now, guards applied.
    #[must_use]
    pub fn current_view(&self) -> Page {
        self.router.resolve_view(self.sessions.current())
    }

    /// Log out and return to Home.
    pub fn logout(&mut self) {
        self.router.logout(&mut self.sessions);
    }

    // Accessors: the shell composes flows out of these.

    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub const fn gateway(&self) -> &ApiGateway {
        &self.gateway
    }

    #[must_use]
    pub const fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub const fn sessions_mut(&mut self) -> &mut SessionStore {
        &mut self.sessions
    }

    #[must_use]
    pub const fn router(&self) -> &Router {
        &self.router
    }

    pub const fn router_mut(&mut self) -> &mut Router {
        &mut self.router
    }

    #[must_use]
    pub const fn modals(&self) -> &ModalController {
        &self.modals
    }

    pub const fn modals_mut(&mut self) -> &mut ModalController {
        &mut self.modals
    }

    #[must_use]
    pub const fn bus(&self) -> &SignalBus {
        &self.bus
    }

    #[must_use]
    pub const fn images(&self) -> &ImageCache {
        &self.images
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::modal::Overlay;
    use crate::storage::MemoryStore;
    use mercado_barrio_client::ApiConfig;
    use mercado_barrio_core::BusinessId;
    use mercado_barrio_core::image::UrlScheme;
    use std::path::PathBuf;

    fn test_config() -> AppConfig {
        AppConfig {
            api: ApiConfig::with_base("http://localhost:5000").unwrap(),
            data_dir: PathBuf::from("/tmp/mb-app-test"),
            scheme: UrlScheme::Http,
        }
    }

    fn test_app() -> App {
        App::with_store(
            test_config(),
            Box::new(MemoryStore::new()),
            Location::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_fresh_app_renders_home() {
        let mut app = test_app();
        app.bootstrap();
        assert_eq!(app.current_view(), Page::Home);
    }

    #[test]
    fn test_modal_actions_reach_router_via_pump() {
        let mut app = test_app();
        app.bootstrap();

        app.modals_mut().open(Overlay::BusinessDetail(BusinessId::new(9)));
        let bus = app.bus().clone();
        app.modals_mut().open_full_profile(&bus, BusinessId::new(9));

        // The overlay closed without touching the page tag...
        assert!(!app.modals().is_open());
        assert_eq!(app.current_view(), Page::Home);

        // ...and the next pump performs the navigation.
        app.pump_signals();
        assert_eq!(app.current_view(), Page::BusinessProfile);
        assert_eq!(app.router().selected_business(), Some(BusinessId::new(9)));
        assert_eq!(app.router().location().path(), "/negocios/9");
    }

    #[test]
    fn test_logout_from_anywhere_lands_home() {
        let mut app = test_app();
        app.router_mut().set_page(Page::Search);
        app.logout();
        assert_eq!(app.current_view(), Page::Home);
        assert!(app.sessions().current().is_none());
    }
}
