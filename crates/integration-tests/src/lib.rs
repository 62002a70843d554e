//! Test harness: an in-process fake of the marketplace API.
//!
//! The fake speaks the same envelopes as the real backend (`{ok, msg?,
//! ...payload}`, Spanish resource names, HTTP statuses per operation) so
//! the gateway and the app flows can be exercised end to end without a
//! network.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::time::Duration;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A running fake API; shuts down when dropped.
pub struct FakeApi {
    /// Base URL to point the gateway at.
    pub base_url: String,
    handle: JoinHandle<()>,
}

impl Drop for FakeApi {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Bind the fake API on an ephemeral port.
///
/// # Panics
///
/// Panics if the listener cannot be bound; tests cannot proceed without it.
pub async fn spawn_fake_api() -> FakeApi {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake api listener");
    let addr = listener.local_addr().expect("fake api local addr");

    let app = Router::new()
        .route("/api/negocios", get(list_negocios))
        .route("/api/negocios/{id}", get(get_negocio))
        .route("/api/negocios/{id}/productos", get(list_productos))
        .route("/api/categorias", get(list_categorias))
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/logout", post(logout))
        .route("/api/pedidos", post(create_pedido))
        .route("/api/pedidos/{id}", get(get_pedido).put(update_pedido).delete(delete_pedido))
        .route("/api/pedidos/cliente/{id}", get(pedidos_cliente))
        .route("/api/pedidos/negocio/{id}", get(pedidos_negocio).put(update_pedido_estado))
        .route("/api/usuarios/{id}", put(update_usuario))
        .route("/api/usuarios/{id}/upload_imagen", post(upload_imagen))
        .route("/html", get(html_page))
        .route("/slow", get(slow));

    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    FakeApi {
        base_url: format!("http://{addr}"),
        handle,
    }
}

async fn list_negocios() -> Json<Value> {
    Json(json!({
        "ok": true,
        "negocios": [
            {
                "id": 7,
                "nombre_negocio": "Panadería Don Manolo",
                "categoria": "Panaderías",
                "telefono_negocio": "+57 (300) 111-2233",
                "ciudad": "Cali",
                "barrio": "San Antonio",
                "imagen_url": "manolo.jpg",
                "es_destacado": true,
            },
            {
                "id": 8,
                "nombre": "Verduras La Huerta",
                "categoria": "Mercados",
                "telefono": "+573001113344",
                "imagen": "/static/uploads/huerta.jpg",
            },
        ],
    }))
}

async fn get_negocio(Path(id): Path<i32>) -> impl IntoResponse {
    if id == 7 {
        (
            StatusCode::OK,
            Json(json!({
                "ok": true,
                "negocio": {
                    "id": 7,
                    "nombre_negocio": "Panadería Don Manolo",
                    "telefono_negocio": "+57 (300) 111-2233",
                    "descripcion": "Pan fresco todos los días",
                    "imagen_url": "manolo.jpg",
                },
            })),
        )
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "ok": false, "msg": "No encontrado" })),
        )
    }
}

async fn list_productos(Path(id): Path<i32>) -> Json<Value> {
    if id == 7 {
        Json(json!({
            "ok": true,
            "productos": [
                { "id": 41, "nombre": "Pan integral", "precio": 3500 },
                { "id": 42, "nombre": "Croissant", "precio": "2500" },
            ],
        }))
    } else {
        Json(json!({ "ok": true, "productos": [] }))
    }
}

async fn list_categorias() -> Json<Value> {
    Json(json!({
        "ok": true,
        "categorias": [
            { "id": 1, "nombre": "Restaurantes" },
            { "id": 2, "nombre": "Tiendas de Ropa" },
            { "id": 3, "nombre": "Panaderías" },
        ],
    }))
}

async fn login(Json(body): Json<Value>) -> impl IntoResponse {
    let tipo = body["tipo"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    if password != "secret" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "ok": false, "msg": "Credenciales incorrectas" })),
        );
    }

    let user = if tipo == "negocio" {
        json!({ "id": 9, "nombre": "Doña Marta", "tipo": "negocio", "negocio_id": 7 })
    } else {
        json!({ "id": 3, "nombre": "Ana", "tipo": "cliente", "telefono": "+573001112233" })
    };

    (
        StatusCode::OK,
        Json(json!({ "ok": true, "msg": "Login ok", "user": user })),
    )
}

async fn register(Json(body): Json<Value>) -> impl IntoResponse {
    if body["telefono"].as_str() == Some("+57300REPEAT") {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "ok": false, "msg": "Teléfono ya registrado" })),
        );
    }
    (
        StatusCode::CREATED,
        Json(json!({ "ok": true, "msg": "Registrado", "user_id": 21 })),
    )
}

async fn logout() -> Json<Value> {
    Json(json!({ "ok": true, "msg": "Logout" }))
}

async fn create_pedido(Json(body): Json<Value>) -> impl IntoResponse {
    if body["negocio_id"].as_i64().is_none() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "ok": false, "msg": "negocio_id inválido" })),
        );
    }
    if body["mensaje"].as_str().unwrap_or_default().trim().is_empty()
        && body["producto_id"].is_null()
    {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "ok": false, "msg": "mensaje requerido" })),
        );
    }
    (
        StatusCode::CREATED,
        Json(json!({ "ok": true, "pedido_id": 55 })),
    )
}

async fn get_pedido(Path(id): Path<i32>) -> Json<Value> {
    Json(json!({
        "ok": true,
        "pedido": {
            "id": id,
            "negocio_id": 7,
            "mensaje": "Dos panes integrales",
            "cantidad": 2,
            "estado": "pendiente",
            "fecha": "Tue, 05 Aug 2025 14:30:00 GMT",
            "negocio_nombre": "Panadería Don Manolo",
        },
    }))
}

async fn pedidos_cliente(Path(id): Path<i32>) -> Json<Value> {
    Json(json!({
        "ok": true,
        "pedidos": [
            {
                "id": 55,
                "cliente_id": id,
                "negocio_id": 7,
                "mensaje": "Dos panes integrales",
                "cantidad": 2,
                "estado": "pendiente",
                "negocio_nombre": "Panadería Don Manolo",
            },
        ],
    }))
}

async fn pedidos_negocio(Path(id): Path<i32>) -> Json<Value> {
    Json(json!({
        "ok": true,
        "pedidos": [
            {
                "id": 55,
                "negocio_id": id,
                "mensaje": "Dos panes integrales",
                "cantidad": 2,
                "estado": "pendiente",
                "cliente_nombre": "Ana",
                "cliente_telefono": "+573001112233",
            },
        ],
    }))
}

async fn update_pedido(Path(_id): Path<i32>, Json(body): Json<Value>) -> impl IntoResponse {
    if body.get("mensaje").is_none() && body.get("cantidad").is_none() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "ok": false, "msg": "Nada que actualizar" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({ "ok": true, "msg": "Pedido actualizado" })),
    )
}

async fn update_pedido_estado(Path(_id): Path<i32>, Json(body): Json<Value>) -> impl IntoResponse {
    let estado = body["estado"].as_str().unwrap_or_default();
    if !matches!(estado, "pendiente" | "confirmado" | "cancelado") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "ok": false, "msg": "estado inválido" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({ "ok": true, "msg": "Pedido actualizado" })),
    )
}

async fn delete_pedido(Path(_id): Path<i32>) -> Json<Value> {
    Json(json!({ "ok": true, "msg": "Pedido eliminado" }))
}

async fn update_usuario(Path(_id): Path<i32>, Json(_body): Json<Value>) -> Json<Value> {
    // Like the real backend, the updated record is not echoed back; the
    // client merges locally.
    Json(json!({ "ok": true, "msg": "Actualizado" }))
}

async fn upload_imagen(Path(id): Path<i32>) -> Json<Value> {
    Json(json!({ "ok": true, "imagen_url": format!("/static/uploads/usuario_{id}.png") }))
}

/// A non-JSON body behind a 200: the envelope must degrade to `{}`.
async fn html_page() -> Html<&'static str> {
    Html("<html><body>mantenimiento</body></html>")
}

/// Stalls longer than any test timeout.
async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(30)).await;
    Json(json!({ "ok": true }))
}
