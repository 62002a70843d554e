//! The order form: draft validation, submission, WhatsApp hand-off.

use thiserror::Error;

use mercado_barrio_client::{ApiGateway, Negocio, NuevoPedido, Producto};
use mercado_barrio_core::{BusinessId, OrderId, Phone, ProductId};

use crate::session::Session;
use crate::whatsapp::{OrderMessage, wa_link};

/// What the user filled in before submitting.
#[derive(Debug, Clone, Default)]
pub struct OrderDraft {
    pub negocio_id: Option<BusinessId>,
    pub producto_id: Option<ProductId>,
    pub nombre_cliente: String,
    /// Contact phone; required only for anonymous orders, since the
    /// business has no other way to reach the customer.
    pub telefono_contacto: Option<String>,
    pub mensaje: String,
    pub cantidad: u32,
}

impl OrderDraft {
    /// A draft with the logged-in name preloaded and quantity 1.
    #[must_use]
    pub fn prefill(session: Option<&Session>) -> Self {
        Self {
            nombre_cliente: session.map(|s| s.nombre.clone()).unwrap_or_default(),
            cantidad: 1,
            ..Self::default()
        }
    }
}

/// Validation and submission failures, with the exact inline messages the
/// form shows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error("Por favor, selecciona un negocio.")]
    MissingBusiness,
    #[error("Por favor, ingresa tu nombre.")]
    MissingName,
    #[error("Por favor, especifica el producto o deja un mensaje detallado.")]
    MissingDetail,
    #[error("La cantidad debe ser mayor a cero.")]
    InvalidQuantity,
    #[error("Se requiere el número de teléfono/WhatsApp para pedidos no registrados.")]
    MissingContactPhone,
    /// API-reported or communication failure, surfaced verbatim.
    #[error("{0}")]
    Api(String),
}

/// A successfully placed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderOutcome {
    pub pedido_id: OrderId,
    /// Deep link that opens the WhatsApp conversation with the business.
    pub wa_url: String,
}

/// Check a draft without submitting it.
///
/// # Errors
///
/// Returns the first failed validation, in the order the form checks them.
pub fn validate(draft: &OrderDraft, session: Option<&Session>) -> Result<(), OrderError> {
    if draft.negocio_id.is_none() {
        return Err(OrderError::MissingBusiness);
    }
    if draft.nombre_cliente.trim().is_empty() {
        return Err(OrderError::MissingName);
    }
    if draft.mensaje.trim().is_empty() && draft.producto_id.is_none() {
        return Err(OrderError::MissingDetail);
    }
    if draft.cantidad == 0 {
        return Err(OrderError::InvalidQuantity);
    }
    if session.is_none() {
        let usable = draft
            .telefono_contacto
            .as_deref()
            .is_some_and(|t| Phone::parse(t).is_ok());
        if !usable {
            return Err(OrderError::MissingContactPhone);
        }
    }
    Ok(())
}

/// Submit a validated draft and build the WhatsApp hand-off.
///
/// `negocio` is the business the draft targets (already loaded by the
/// form); `producto` is the selected product row, when one was chosen.
///
/// # Errors
///
/// Returns a validation error, or [`OrderError::Api`] with the
/// API-reported message when the creation call fails.
pub async fn submit(
    gateway: &ApiGateway,
    session: Option<&Session>,
    negocio: &Negocio,
    producto: Option<&Producto>,
    draft: &OrderDraft,
) -> Result<OrderOutcome, OrderError> {
    validate(draft, session)?;

    let Some(negocio_id) = draft.negocio_id else {
        return Err(OrderError::MissingBusiness);
    };

    // Logged-in identity wins over whatever is typed in the form.
    let (cliente_id, cliente_nombre, cliente_telefono) = match session {
        Some(s) => (
            Some(s.id),
            if s.nombre.trim().is_empty() {
                draft.nombre_cliente.clone()
            } else {
                s.nombre.clone()
            },
            s.telefono.clone().unwrap_or_default(),
        ),
        None => (
            None,
            draft.nombre_cliente.clone(),
            draft
                .telefono_contacto
                .clone()
                .unwrap_or_default()
                .trim()
                .to_owned(),
        ),
    };

    let pedido = NuevoPedido {
        negocio_id,
        producto_id: draft.producto_id,
        cliente_id,
        cliente_nombre: cliente_nombre.clone(),
        cliente_telefono: cliente_telefono.clone(),
        mensaje: draft.mensaje.clone(),
        cantidad: draft.cantidad,
    };

    let res = gateway.create_pedido(&pedido).await;
    let pedido_id = res.item::<i32>("pedido_id").map(OrderId::new);
    let Some(pedido_id) = pedido_id.filter(|_| res.api_ok()) else {
        return Err(OrderError::Api(
            res.msg()
                .filter(|m| !m.is_empty())
                .unwrap_or("Error al procesar el pedido. Inténtalo más tarde.")
                .to_owned(),
        ));
    };

    let message = OrderMessage {
        pedido_id,
        cliente_nombre: &cliente_nombre,
        cliente_telefono: Some(cliente_telefono.as_str()).filter(|t| !t.is_empty()),
        negocio_nombre: negocio.business_name(),
        producto: producto.and_then(|p| p.id.map(|id| (p.display_name(), id))),
        cantidad: draft.cantidad,
        detalle: &draft.mensaje,
    };
    let wa_url = wa_link(negocio.phone(), &message.to_string());

    Ok(OrderOutcome { pedido_id, wa_url })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session() -> Session {
        serde_json::from_value(json!({
            "id": 3,
            "nombre": "Ana",
            "tipo": "cliente",
            "telefono": "+573001112233",
        }))
        .unwrap()
    }

    fn valid_draft() -> OrderDraft {
        OrderDraft {
            negocio_id: Some(BusinessId::new(1)),
            producto_id: None,
            nombre_cliente: "Ana".to_owned(),
            telefono_contacto: None,
            mensaje: "Dos panes, por favor".to_owned(),
            cantidad: 1,
        }
    }

    #[test]
    fn test_validation_order() {
        let s = session();

        let draft = OrderDraft::default();
        assert_eq!(validate(&draft, Some(&s)), Err(OrderError::MissingBusiness));

        let draft = OrderDraft {
            negocio_id: Some(BusinessId::new(1)),
            ..OrderDraft::default()
        };
        assert_eq!(validate(&draft, Some(&s)), Err(OrderError::MissingName));

        let draft = OrderDraft {
            negocio_id: Some(BusinessId::new(1)),
            nombre_cliente: "Ana".to_owned(),
            ..OrderDraft::default()
        };
        assert_eq!(validate(&draft, Some(&s)), Err(OrderError::MissingDetail));

        let draft = OrderDraft {
            cantidad: 0,
            ..valid_draft()
        };
        assert_eq!(validate(&draft, Some(&s)), Err(OrderError::InvalidQuantity));

        assert_eq!(validate(&valid_draft(), Some(&s)), Ok(()));
    }

    #[test]
    fn test_product_selection_stands_in_for_message() {
        let draft = OrderDraft {
            mensaje: String::new(),
            producto_id: Some(ProductId::new(2)),
            ..valid_draft()
        };
        assert_eq!(validate(&draft, Some(&session())), Ok(()));
    }

    #[test]
    fn test_anonymous_order_requires_contact_phone() {
        let draft = valid_draft();
        assert_eq!(validate(&draft, None), Err(OrderError::MissingContactPhone));

        let with_phone = OrderDraft {
            telefono_contacto: Some("+573009998877".to_owned()),
            ..valid_draft()
        };
        assert_eq!(validate(&with_phone, None), Ok(()));

        // A phone with no digits is as useless as no phone.
        let unusable = OrderDraft {
            telefono_contacto: Some("pendiente".to_owned()),
            ..valid_draft()
        };
        assert_eq!(validate(&unusable, None), Err(OrderError::MissingContactPhone));
    }

    #[test]
    fn test_prefill_takes_session_name() {
        let draft = OrderDraft::prefill(Some(&session()));
        assert_eq!(draft.nombre_cliente, "Ana");
        assert_eq!(draft.cantidad, 1);

        let anonymous = OrderDraft::prefill(None);
        assert!(anonymous.nombre_cliente.is_empty());
    }
}
