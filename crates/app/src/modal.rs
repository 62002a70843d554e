//! Overlay controller.
//!
//! Transient detail views (business detail, order form) layer above the
//! current page without touching the router's page tag: closing an overlay
//! always returns to exactly the view underneath. Escape closes the top
//! overlay; actions that need the router go through the signal bus instead
//! of holding a router reference.

use mercado_barrio_core::BusinessId;

use crate::signals::{Signal, SignalBus};

/// A view layered above the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    /// Business detail card with its top products.
    BusinessDetail(BusinessId),
    /// Quick order form, optionally tied to a business.
    OrderForm { business: Option<BusinessId> },
}

/// Stack of open overlays; the last one has focus.
#[derive(Debug, Default)]
pub struct ModalController {
    stack: Vec<Overlay>,
}

impl ModalController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer a new overlay on top.
    pub fn open(&mut self, overlay: Overlay) {
        self.stack.push(overlay);
    }

    /// Close the top overlay, returning it. Closing with nothing open is a
    /// no-op.
    pub fn close_top(&mut self) -> Option<Overlay> {
        self.stack.pop()
    }

    /// Escape key: close the top overlay. Returns whether anything closed.
    pub fn handle_escape(&mut self) -> bool {
        self.close_top().is_some()
    }

    /// The overlay currently holding focus.
    #[must_use]
    pub fn top(&self) -> Option<&Overlay> {
        self.stack.last()
    }

    /// Whether any overlay is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.stack.is_empty()
    }

    /// "Ver más" from a business detail overlay: ask the router for the
    /// full profile page and close the overlay.
    pub fn open_full_profile(&mut self, bus: &SignalBus, id: BusinessId) {
        bus.publish(Signal::OpenBusinessProfile { id });
        self.close_top();
    }

    /// "Hacer pedido" from a business detail overlay: ask the router for
    /// the order form and close the overlay.
    pub fn request_order(&mut self, bus: &SignalBus, id: Option<BusinessId>) {
        bus.publish(Signal::OpenOrderRequest { id });
        self.close_top();
    }
}
