//! WhatsApp hand-off links.
//!
//! Fulfillment happens in a WhatsApp conversation with the business; this
//! module builds the `wa.me` deep links and the message bodies businesses
//! already parse by eye (order number header, field lines, `---`
//! separators).

use mercado_barrio_core::phone::wa_digits;
use mercado_barrio_core::{OrderId, ProductId};

/// Build a `https://wa.me/{phone}?text={message}` link.
///
/// The phone is reduced to digits and `+`; the message is percent-encoded.
#[must_use]
pub fn wa_link(phone: &str, text: &str) -> String {
    format!(
        "https://wa.me/{}?text={}",
        wa_digits(phone),
        urlencoding::encode(text)
    )
}

/// The structured order message sent after a pedido is created.
#[derive(Debug, Clone)]
pub struct OrderMessage<'a> {
    pub pedido_id: OrderId,
    pub cliente_nombre: &'a str,
    pub cliente_telefono: Option<&'a str>,
    pub negocio_nombre: &'a str,
    pub producto: Option<(&'a str, ProductId)>,
    pub cantidad: u32,
    pub detalle: &'a str,
}

impl std::fmt::Display for OrderMessage<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "*PEDIDO NUEVO #*{}", self.pedido_id)?;
        match self.cliente_telefono.map(str::trim).filter(|t| !t.is_empty()) {
            Some(telefono) => {
                writeln!(f, "Cliente: {} ({telefono})", self.cliente_nombre)?;
            }
            None => writeln!(f, "Cliente: {}", self.cliente_nombre)?,
        }
        let negocio = if self.negocio_nombre.trim().is_empty() {
            "Desconocido"
        } else {
            self.negocio_nombre
        };
        writeln!(f, "Negocio: {negocio}")?;
        writeln!(f, "---")?;
        match self.producto {
            Some((nombre, id)) => writeln!(f, "Artículo: {nombre} (ID: {id})")?,
            None => writeln!(f, "Artículo: Pedido General")?,
        }
        writeln!(f, "*Cantidad:* {}", self.cantidad)?;
        let detalle = if self.detalle.trim().is_empty() {
            "Sin mensaje adicional."
        } else {
            self.detalle.trim()
        };
        writeln!(f, "Detalle: {detalle}")?;
        write!(f, "---")
    }
}

/// Short greeting used when ordering a single product straight from the
/// business detail overlay.
#[must_use]
pub fn product_greeting(negocio: &str, producto: &str) -> String {
    format!("Hola {negocio}, quisiera pedir 1 unidad de: {producto}")
}

/// Greeting for a free-form order started from the overlay's WhatsApp
/// button.
#[must_use]
pub fn order_greeting(negocio: &str) -> String {
    format!("Hola {negocio}, quiero hacer un pedido:")
}
