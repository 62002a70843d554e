//! Mercado Barrio application engine.
//!
//! Everything a shell needs apart from painting pixels: a finite-state page
//! router driven by an in-memory page tag, a persisted session store, an
//! overlay controller for transient detail views, a broadcast signal bus so
//! nested components can reach the router without prop threading, image
//! candidate memoization, and per-page view models that talk to the API
//! through the gateway client.
//!
//! # Modules
//!
//! - [`app`] - Composition root wiring the pieces together
//! - [`config`] - Environment configuration
//! - [`router`] - Page tags, guarded transitions, deep-link bootstrap
//! - [`session`] - Current identity, persisted across restarts
//! - [`storage`] - Key/value persistence (the localStorage analog)
//! - [`signals`] - Cross-component broadcast events
//! - [`modal`] - Overlay stack layered above the router
//! - [`images`] - Memoized image candidate lists
//! - [`views`] - Per-page load/submit flows
//! - [`whatsapp`] - Order hand-off links

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod config;
pub mod images;
pub mod modal;
pub mod router;
pub mod session;
pub mod signals;
pub mod storage;
pub mod views;
pub mod whatsapp;

pub use app::{App, AppInitError};
pub use config::{AppConfig, AppConfigError};
pub use modal::{ModalController, Overlay};
pub use router::{Location, Page, Router};
pub use session::{Session, SessionStore};
pub use signals::{Signal, SignalBus, SignalReceiver};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
