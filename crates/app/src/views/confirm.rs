//! Order confirmation page.

use mercado_barrio_client::{ApiGateway, Pedido};
use mercado_barrio_core::OrderId;

/// The loaded confirmation page.
#[derive(Debug, Default)]
pub struct ConfirmView {
    pub pedido: Option<Pedido>,
    pub error: Option<String>,
}

/// Load the order just placed; without an id there is nothing to show.
pub async fn load(gateway: &ApiGateway, pedido_id: Option<OrderId>) -> ConfirmView {
    let Some(id) = pedido_id else {
        return ConfirmView::default();
    };

    let res = gateway.get_pedido(id).await;
    if !res.api_ok() {
        return ConfirmView {
            pedido: None,
            error: Some(res.error_text()),
        };
    }

    ConfirmView {
        pedido: res.item::<Pedido>("pedido").or_else(|| {
            // Some deployments return the row at the top level.
            serde_json::from_value(res.data.clone()).ok()
        }),
        error: None,
    }
}
