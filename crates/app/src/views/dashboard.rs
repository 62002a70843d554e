//! Dashboards: the customer's order history and the business back office.

use mercado_barrio_client::{
    ApiGateway, EditarPedido, EstadoPedido, Pedido, Producto, ProductoInput,
};
use mercado_barrio_core::{BusinessId, OrderId, OrderStatus, ProductId, UserId};

/// The customer dashboard: order history, newest first as the API returns
/// it.
#[derive(Debug, Default)]
pub struct CustomerDashboard {
    pub pedidos: Vec<Pedido>,
    pub error: Option<String>,
}

/// Load a customer's orders.
pub async fn load_customer(gateway: &ApiGateway, cliente: UserId) -> CustomerDashboard {
    let res = gateway.pedidos_de_cliente(cliente).await;
    if !res.api_ok() {
        return CustomerDashboard {
            error: Some(res.error_text()),
            ..CustomerDashboard::default()
        };
    }
    CustomerDashboard {
        pedidos: res.list::<Pedido>("pedidos"),
        error: None,
    }
}

/// The business dashboard: incoming orders plus the product catalog.
#[derive(Debug, Default)]
pub struct BusinessDashboard {
    pub pedidos: Vec<Pedido>,
    pub productos: Vec<Producto>,
    pub error: Option<String>,
}

/// Load a business's orders and products.
///
/// Either list failing surfaces as the dashboard error, but the other list
/// still renders.
pub async fn load_business(gateway: &ApiGateway, negocio: BusinessId) -> BusinessDashboard {
    let pedidos_res = gateway.pedidos_de_negocio(negocio).await;
    let productos_res = gateway.list_productos(negocio).await;

    let error = if pedidos_res.api_ok() && productos_res.api_ok() {
        None
    } else if pedidos_res.api_ok() {
        Some(productos_res.error_text())
    } else {
        Some(pedidos_res.error_text())
    };

    BusinessDashboard {
        pedidos: if pedidos_res.api_ok() {
            pedidos_res.list::<Pedido>("pedidos")
        } else {
            Vec::new()
        },
        productos: if productos_res.api_ok() {
            productos_res.list::<Producto>("productos")
        } else {
            Vec::new()
        },
        error,
    }
}

// =============================================================================
// Customer order actions
// =============================================================================

/// Edit a pending order's message or quantity.
///
/// # Errors
///
/// Returns the inline error string: pending-only rule violations are caught
/// client-side before any call, API failures are surfaced verbatim.
pub async fn edit_order(
    gateway: &ApiGateway,
    pedido: &Pedido,
    cambios: EditarPedido,
) -> Result<(), String> {
    if !pedido.estado.is_editable() {
        return Err("Solo pedidos pendientes se pueden editar".to_owned());
    }
    let Some(id) = pedido.id else {
        return Err("Pedido no encontrado".to_owned());
    };
    let res = gateway.update_pedido(id, &cambios).await;
    if res.api_ok() { Ok(()) } else { Err(res.error_text()) }
}

/// Withdraw a pending order.
///
/// # Errors
///
/// Returns the inline error string on rule violation or API failure.
pub async fn withdraw_order(gateway: &ApiGateway, pedido: &Pedido) -> Result<(), String> {
    if !pedido.estado.is_editable() {
        return Err("Cliente solo puede eliminar pedidos pendientes".to_owned());
    }
    let Some(id) = pedido.id else {
        return Err("Pedido no encontrado".to_owned());
    };
    let res = gateway.delete_pedido(id).await;
    if res.api_ok() { Ok(()) } else { Err(res.error_text()) }
}

// =============================================================================
// Business order & product actions
// =============================================================================

/// Confirm or cancel an incoming order, optionally with a response note.
///
/// # Errors
///
/// Returns the API-reported message on failure.
pub async fn respond_order(
    gateway: &ApiGateway,
    pedido: OrderId,
    estado: OrderStatus,
    respuesta: Option<String>,
) -> Result<(), String> {
    let res = gateway
        .update_pedido_estado(pedido, &EstadoPedido { estado, respuesta })
        .await;
    if res.api_ok() { Ok(()) } else { Err(res.error_text()) }
}

/// Create or update a product.
///
/// # Errors
///
/// Returns the inline error string on validation or API failure.
pub async fn save_product(
    gateway: &ApiGateway,
    negocio: BusinessId,
    existing: Option<ProductId>,
    input: &ProductoInput,
) -> Result<(), String> {
    if input.nombre.trim().is_empty() {
        return Err("Nombre requerido".to_owned());
    }
    let res = match existing {
        Some(id) => gateway.update_producto(id, input).await,
        None => gateway.create_producto(negocio, input).await,
    };
    if res.api_ok() { Ok(()) } else { Err(res.error_text()) }
}

/// Delete a product from the catalog.
///
/// # Errors
///
/// Returns the API-reported message on failure.
pub async fn remove_product(gateway: &ApiGateway, producto: ProductId) -> Result<(), String> {
    let res = gateway.delete_producto(producto).await;
    if res.api_ok() { Ok(()) } else { Err(res.error_text()) }
}
