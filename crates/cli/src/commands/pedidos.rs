//! Order commands.

use mercado_barrio_app::App;
use mercado_barrio_app::views::{business, dashboard, order};
use mercado_barrio_core::{BusinessId, ProductId};

/// Errors from order commands.
#[derive(Debug, thiserror::Error)]
pub enum PedidoError {
    /// Validation or API failure; the message is user-facing.
    #[error("{0}")]
    Api(String),
    /// The session role has no order list (e.g. a business account without
    /// an attached negocio).
    #[error("No hay pedidos para esta sesión")]
    NoOrderList,
}

/// Arguments for `pedido create`.
pub struct CreateArgs {
    pub negocio: i32,
    pub producto: Option<i32>,
    pub cantidad: u32,
    pub mensaje: String,
    pub nombre: Option<String>,
    pub telefono: Option<String>,
}

/// Place an order and print the WhatsApp hand-off link.
#[allow(clippy::print_stdout)]
pub async fn create(app: &mut App, args: CreateArgs) -> Result<(), PedidoError> {
    let negocio_id = BusinessId::new(args.negocio);

    // Load the business the way the form does: its name and phone feed the
    // WhatsApp message.
    let detail = business::load(app.gateway(), negocio_id).await;
    if let Some(error) = detail.error {
        return Err(PedidoError::Api(error));
    }
    let Some(negocio) = detail.negocio else {
        return Err(PedidoError::Api("No se pudo cargar el negocio".to_owned()));
    };
    let producto = args.producto.map(ProductId::new).and_then(|wanted| {
        detail
            .productos
            .iter()
            .find(|p| p.id == Some(wanted))
            .cloned()
    });

    let session = app.sessions().current().cloned();
    let mut draft = order::OrderDraft::prefill(session.as_ref());
    draft.negocio_id = Some(negocio_id);
    draft.producto_id = producto.as_ref().and_then(|p| p.id);
    draft.cantidad = args.cantidad;
    draft.mensaje = args.mensaje;
    if let Some(nombre) = args.nombre {
        draft.nombre_cliente = nombre;
    }
    draft.telefono_contacto = args.telefono;

    let outcome = order::submit(
        app.gateway(),
        session.as_ref(),
        &negocio,
        producto.as_ref(),
        &draft,
    )
    .await
    .map_err(|err| PedidoError::Api(err.to_string()))?;

    // Land on the confirmation view.
    app.router_mut().open_order_confirm(Some(outcome.pedido_id));

    println!("Pedido #{} creado.", outcome.pedido_id);
    println!("Continúa la conversación en WhatsApp:");
    println!("{}", outcome.wa_url);
    Ok(())
}

/// List the session's orders: history for customers, incoming orders for
/// businesses.
#[allow(clippy::print_stdout)]
pub async fn list(app: &App) -> Result<(), PedidoError> {
    let Some(session) = app.sessions().current() else {
        return Err(PedidoError::Api("Inicia sesión primero".to_owned()));
    };

    if session.tipo.is_business() {
        let Some(negocio_id) = session.negocio_id else {
            return Err(PedidoError::NoOrderList);
        };
        let view = dashboard::load_business(app.gateway(), negocio_id).await;
        if let Some(error) = view.error {
            return Err(PedidoError::Api(error));
        }
        for pedido in &view.pedidos {
            let id = pedido.id.map_or_else(|| "?".to_owned(), |id| id.to_string());
            println!(
                "[{id}] {} · x{} · {} · {}",
                pedido.cliente_nombre.as_deref().unwrap_or("Anónimo"),
                pedido.cantidad(),
                pedido.estado,
                pedido.mensaje.as_deref().unwrap_or(""),
            );
        }
    } else {
        let view = dashboard::load_customer(app.gateway(), session.id).await;
        if let Some(error) = view.error {
            return Err(PedidoError::Api(error));
        }
        for pedido in &view.pedidos {
            let id = pedido.id.map_or_else(|| "?".to_owned(), |id| id.to_string());
            println!(
                "[{id}] {} · x{} · {}",
                pedido.negocio_nombre.as_deref().unwrap_or(""),
                pedido.cantidad(),
                pedido.estado,
            );
        }
    }
    Ok(())
}
