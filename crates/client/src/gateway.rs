//! The API gateway.
//!
//! One [`reqwest::Client`] built at startup carries the session cookie and
//! the request timeout for the whole process. Verb helpers fold every
//! outcome - HTTP failure, timeout, refused connection, unparseable body -
//! into the [`ApiResponse`] envelope, so callers never `match` on transport
//! errors. A single attempt per call; retrying is the caller's decision.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument, warn};

use mercado_barrio_core::{BusinessId, OrderId, ProductId, UserId};

use crate::config::ApiConfig;
use crate::response::ApiResponse;
use crate::types::{
    EditarPedido, EstadoPedido, LoginRequest, NuevoPedido, ProductoInput, RegisterRequest,
};

/// Error building the underlying HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum GatewayInitError {
    #[error("failed to build http client: {0}")]
    Http(#[from] reqwest::Error),
}

// =============================================================================
// ApiGateway
// =============================================================================

/// Client for the marketplace REST API.
///
/// Cheaply cloneable; all clones share one connection pool and cookie jar.
#[derive(Clone)]
pub struct ApiGateway {
    inner: Arc<ApiGatewayInner>,
}

struct ApiGatewayInner {
    client: reqwest::Client,
    base_url: String,
}

impl ApiGateway {
    /// Create a new gateway for `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS/connection backend fails to initialize.
    pub fn new(config: &ApiConfig) -> Result<Self, GatewayInitError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiGatewayInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// The configured API origin, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Absolute URL for an API path, normalizing the leading slash.
    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.inner.base_url)
        } else {
            format!("{}/{path}", self.inner.base_url)
        }
    }

    /// `GET` a path.
    #[instrument(skip(self))]
    pub async fn get(&self, path: &str) -> ApiResponse {
        self.execute(self.inner.client.get(self.url(path))).await
    }

    /// `POST` a JSON body to a path.
    #[instrument(skip(self, body))]
    pub async fn post(&self, path: &str, body: &Value) -> ApiResponse {
        self.execute(self.inner.client.post(self.url(path)).json(body))
            .await
    }

    /// `PUT` a JSON body to a path.
    #[instrument(skip(self, body))]
    pub async fn put(&self, path: &str, body: &Value) -> ApiResponse {
        self.execute(self.inner.client.put(self.url(path)).json(body))
            .await
    }

    /// `DELETE` a path.
    #[instrument(skip(self))]
    pub async fn delete(&self, path: &str) -> ApiResponse {
        self.execute(self.inner.client.delete(self.url(path))).await
    }

    /// `POST` a multipart form to a path.
    #[instrument(skip(self, form))]
    pub async fn post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> ApiResponse {
        self.execute(self.inner.client.post(self.url(path)).multipart(form))
            .await
    }

    /// Send a prepared request and fold the outcome into the envelope.
    async fn execute(&self, request: reqwest::RequestBuilder) -> ApiResponse {
        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                let msg = if err.is_timeout() {
                    "timeout".to_owned()
                } else {
                    err.to_string()
                };
                warn!(error = %msg, "request never completed");
                return ApiResponse::transport_error(msg);
            }
        };

        let status = response.status();

        // Body as text first: a non-JSON error page must not turn an HTTP
        // failure into a second kind of failure.
        let data = match response.text().await {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|_| {
                if !text.is_empty() {
                    debug!(
                        body = %text.chars().take(200).collect::<String>(),
                        "response body was not JSON"
                    );
                }
                Value::Object(serde_json::Map::new())
            }),
            Err(err) => {
                warn!(error = %err, "failed to read response body");
                return ApiResponse::transport_error(err.to_string());
            }
        };

        ApiResponse::completed(status.is_success(), status.as_u16(), data)
    }

    // =========================================================================
    // Negocios
    // =========================================================================

    /// `GET /api/negocios` - the public business directory.
    pub async fn list_negocios(&self) -> ApiResponse {
        self.get("/api/negocios").await
    }

    /// `GET /api/negocios/{id}` - one business, under the `negocio` key.
    pub async fn get_negocio(&self, id: BusinessId) -> ApiResponse {
        self.get(&format!("/api/negocios/{id}")).await
    }

    /// `GET /api/negocios/{id}/productos` - a business's product list.
    pub async fn list_productos(&self, negocio: BusinessId) -> ApiResponse {
        self.get(&format!("/api/negocios/{negocio}/productos")).await
    }

    // =========================================================================
    // Productos
    // =========================================================================

    /// `POST /api/negocios/{id}/productos` - create a product.
    pub async fn create_producto(
        &self,
        negocio: BusinessId,
        input: &ProductoInput,
    ) -> ApiResponse {
        let body = serde_json::to_value(input).unwrap_or_default();
        self.post(&format!("/api/negocios/{negocio}/productos"), &body)
            .await
    }

    /// `PUT /api/productos/{id}` - update a product.
    pub async fn update_producto(&self, id: ProductId, input: &ProductoInput) -> ApiResponse {
        let body = serde_json::to_value(input).unwrap_or_default();
        self.put(&format!("/api/productos/{id}"), &body).await
    }

    /// `DELETE /api/productos/{id}` - remove a product.
    pub async fn delete_producto(&self, id: ProductId) -> ApiResponse {
        self.delete(&format!("/api/productos/{id}")).await
    }

    // =========================================================================
    // Pedidos
    // =========================================================================

    /// `POST /api/pedidos` - place an order; success carries `pedido_id`.
    pub async fn create_pedido(&self, pedido: &NuevoPedido) -> ApiResponse {
        let body = serde_json::to_value(pedido).unwrap_or_default();
        self.post("/api/pedidos", &body).await
    }

    /// `GET /api/pedidos/{id}` - one order.
    pub async fn get_pedido(&self, id: OrderId) -> ApiResponse {
        self.get(&format!("/api/pedidos/{id}")).await
    }

    /// `GET /api/pedidos/cliente/{id}` - a customer's order history.
    pub async fn pedidos_de_cliente(&self, cliente: UserId) -> ApiResponse {
        self.get(&format!("/api/pedidos/cliente/{cliente}")).await
    }

    /// `GET /api/pedidos/negocio/{id}` - orders received by a business.
    pub async fn pedidos_de_negocio(&self, negocio: BusinessId) -> ApiResponse {
        self.get(&format!("/api/pedidos/negocio/{negocio}")).await
    }

    /// `PUT /api/pedidos/{id}` - customer edit of a pending order.
    pub async fn update_pedido(&self, id: OrderId, cambios: &EditarPedido) -> ApiResponse {
        let body = serde_json::to_value(cambios).unwrap_or_default();
        self.put(&format!("/api/pedidos/{id}"), &body).await
    }

    /// `PUT /api/pedidos/negocio/{id}` - business status/response update.
    pub async fn update_pedido_estado(&self, id: OrderId, cambio: &EstadoPedido) -> ApiResponse {
        let body = serde_json::to_value(cambio).unwrap_or_default();
        self.put(&format!("/api/pedidos/negocio/{id}"), &body).await
    }

    /// `DELETE /api/pedidos/{id}` - withdraw or discard an order.
    pub async fn delete_pedido(&self, id: OrderId) -> ApiResponse {
        self.delete(&format!("/api/pedidos/{id}")).await
    }

    // =========================================================================
    // Auth & Usuarios
    // =========================================================================

    /// `POST /api/auth/login` - success carries the session `user` record.
    pub async fn login(&self, credentials: &LoginRequest) -> ApiResponse {
        self.post("/api/auth/login", &credentials.to_body()).await
    }

    /// `POST /api/auth/register` - success carries `user_id`.
    pub async fn register(&self, registration: &RegisterRequest) -> ApiResponse {
        self.post("/api/auth/register", &registration.to_body()).await
    }

    /// `POST /api/auth/logout` - drop the server-side session.
    pub async fn logout(&self) -> ApiResponse {
        self.post("/api/auth/logout", &Value::Object(serde_json::Map::new()))
            .await
    }

    /// `PUT /api/usuarios/{id}` - profile save; the caller re-persists the
    /// merged session record on success.
    pub async fn update_usuario(&self, id: UserId, cambios: &Value) -> ApiResponse {
        self.put(&format!("/api/usuarios/{id}"), cambios).await
    }

    /// `POST /api/usuarios/{id}/upload_imagen` - profile image upload.
    pub async fn upload_imagen_usuario(
        &self,
        id: UserId,
        filename: String,
        bytes: Vec<u8>,
        mime: &str,
    ) -> ApiResponse {
        let part = match reqwest::multipart::Part::bytes(bytes)
            .file_name(filename)
            .mime_str(mime)
        {
            Ok(part) => part,
            Err(err) => return ApiResponse::transport_error(err.to_string()),
        };
        let form = reqwest::multipart::Form::new().part("imagen", part);
        self.post_multipart(&format!("/api/usuarios/{id}/upload_imagen"), form)
            .await
    }

    // =========================================================================
    // Categorías
    // =========================================================================

    /// `GET /api/categorias` - the category catalog.
    pub async fn list_categorias(&self) -> ApiResponse {
        self.get("/api/categorias").await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn gateway() -> ApiGateway {
        let config = ApiConfig {
            base_url: "http://localhost:5000".to_owned(),
            timeout: Duration::from_secs(20),
        };
        ApiGateway::new(&config).unwrap()
    }

    #[test]
    fn test_url_normalizes_leading_slash() {
        let gw = gateway();
        assert_eq!(gw.url("/api/negocios"), "http://localhost:5000/api/negocios");
        assert_eq!(gw.url("api/negocios"), "http://localhost:5000/api/negocios");
    }

    #[tokio::test]
    async fn test_unreachable_host_resolves_to_status_zero() {
        // Nothing listens on tcpmux; the connection is refused immediately.
        let config = ApiConfig {
            base_url: "http://127.0.0.1:1".to_owned(),
            timeout: Duration::from_secs(2),
        };
        let gw = ApiGateway::new(&config).unwrap();
        let res = gw.list_negocios().await;
        assert!(!res.ok);
        assert_eq!(res.status, 0);
        assert!(res.msg().is_some());
    }
}
