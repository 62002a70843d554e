//! Cross-component signals.
//!
//! Deeply nested components (the detail overlay, a card grid) need to
//! request navigation without threading callbacks through every layer. The
//! side channel is an explicit broadcast bus with two messages -
//! `open-business-profile` and `open-pedido` - each carrying an `{ id }`
//! payload. Receivers deregister by dropping; a lagging receiver skips
//! missed signals rather than blocking a publisher.

use tokio::sync::broadcast;
use tracing::debug;

use mercado_barrio_core::BusinessId;

/// Buffered signals per receiver before lagging drops the oldest.
const BUS_CAPACITY: usize = 16;

/// A navigation request published from outside the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Open a business profile page (`open-business-profile`).
    OpenBusinessProfile { id: BusinessId },
    /// Open the order form, optionally preselecting a business
    /// (`open-pedido`).
    OpenOrderRequest { id: Option<BusinessId> },
}

/// The process-wide signal channel.
#[derive(Debug, Clone)]
pub struct SignalBus {
    tx: broadcast::Sender<Signal>,
}

impl Default for SignalBus {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalBus {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BUS_CAPACITY);
        Self { tx }
    }

    /// Publish a signal to every live receiver.
    ///
    /// Publishing with no receivers is not an error; the signal is simply
    /// dropped, like an event nobody listened for.
    pub fn publish(&self, signal: Signal) {
        if self.tx.send(signal).is_err() {
            debug!(?signal, "signal published with no receivers");
        }
    }

    /// Register a new receiver; drop it to deregister.
    #[must_use]
    pub fn subscribe(&self) -> SignalReceiver {
        SignalReceiver {
            rx: self.tx.subscribe(),
        }
    }
}

/// A registered signal listener.
pub struct SignalReceiver {
    rx: broadcast::Receiver<Signal>,
}

impl SignalReceiver {
    /// Next pending signal, if any, without waiting.
    ///
    /// Lag (more than [`BUS_CAPACITY`] unread signals) skips forward to the
    /// oldest retained signal.
    pub fn try_next(&mut self) -> Option<Signal> {
        loop {
            match self.rx.try_recv() {
                Ok(signal) => return Some(signal),
                Err(broadcast::error::TryRecvError::Lagged(missed)) => {
                    debug!(missed, "signal receiver lagged");
                }
                Err(_) => return None,
            }
        }
    }

    /// Wait for the next signal; `None` once every bus handle is gone.
    pub async fn next(&mut self) -> Option<Signal> {
        loop {
            match self.rx.recv().await {
                Ok(signal) => return Some(signal),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    debug!(missed, "signal receiver lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_reaches_subscriber() {
        let bus = SignalBus::new();
        let mut rx = bus.subscribe();
        bus.publish(Signal::OpenBusinessProfile {
            id: BusinessId::new(7),
        });
        assert_eq!(
            rx.try_next(),
            Some(Signal::OpenBusinessProfile {
                id: BusinessId::new(7)
            })
        );
        assert_eq!(rx.try_next(), None);
    }

    #[test]
    fn test_publish_without_receivers_is_silent() {
        let bus = SignalBus::new();
        bus.publish(Signal::OpenOrderRequest { id: None });
    }

    #[test]
    fn test_dropped_receiver_is_deregistered() {
        let bus = SignalBus::new();
        let rx = bus.subscribe();
        drop(rx);
        // No receiver left; publish must not panic or block.
        bus.publish(Signal::OpenOrderRequest {
            id: Some(BusinessId::new(1)),
        });
    }

    #[test]
    fn test_signals_are_delivered_in_order() {
        let bus = SignalBus::new();
        let mut rx = bus.subscribe();
        bus.publish(Signal::OpenBusinessProfile {
            id: BusinessId::new(1),
        });
        bus.publish(Signal::OpenOrderRequest {
            id: Some(BusinessId::new(1)),
        });
        assert!(matches!(
            rx.try_next(),
            Some(Signal::OpenBusinessProfile { .. })
        ));
        assert!(matches!(
            rx.try_next(),
            Some(Signal::OpenOrderRequest { .. })
        ));
    }
}
