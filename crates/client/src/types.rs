//! Wire DTOs for the marketplace API.
//!
//! The API grew field-by-field and the same concept travels under several
//! names depending on the endpoint (`nombre` vs `nombre_negocio`,
//! `imagen_url` vs `imagen`, `telefono` vs `telefono_negocio`). The structs
//! here keep every variant as its own optional field and expose coalescing
//! accessors, so normalization lives in one place instead of at every call
//! site.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use mercado_barrio_core::{BusinessId, CategoryId, OrderId, OrderStatus, ProductId, Role, UserId};

// =============================================================================
// Negocio
// =============================================================================

/// A business as returned by `/api/negocios` and `/api/negocios/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Negocio {
    pub id: Option<BusinessId>,
    pub nombre: Option<String>,
    pub nombre_negocio: Option<String>,
    pub propietario: Option<String>,
    pub categoria: Option<String>,
    pub descripcion: Option<String>,
    pub telefono: Option<String>,
    pub telefono_negocio: Option<String>,
    pub ciudad: Option<String>,
    pub barrio: Option<String>,
    pub direccion_exacta: Option<String>,
    pub horario: Option<String>,
    pub codigo_postal: Option<String>,
    pub imagen_url: Option<String>,
    pub imagen: Option<String>,
    pub es_destacado: bool,
    pub es_patrocinador: bool,
}

impl Negocio {
    /// Best available display name: `nombre`, then `nombre_negocio`, then
    /// the owner's name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        first_nonblank(&[&self.nombre, &self.nombre_negocio, &self.propietario])
    }

    /// The business-facing name, preferring `nombre_negocio`.
    #[must_use]
    pub fn business_name(&self) -> &str {
        first_nonblank(&[&self.nombre_negocio, &self.nombre])
    }

    /// Contact phone in whichever field the endpoint used.
    #[must_use]
    pub fn phone(&self) -> &str {
        first_nonblank(&[&self.telefono, &self.telefono_negocio])
    }

    /// Raw image reference for the image resolver, if any.
    #[must_use]
    pub fn image_ref(&self) -> Option<&str> {
        let r = first_nonblank(&[&self.imagen_url, &self.imagen]);
        if r.is_empty() { None } else { Some(r) }
    }
}

// =============================================================================
// Producto
// =============================================================================

/// A product row under a business.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Producto {
    pub id: Option<ProductId>,
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    #[serde(deserialize_with = "de_precio")]
    pub precio: Option<Decimal>,
    pub imagen_url: Option<String>,
    pub imagen: Option<String>,
}

impl Producto {
    /// Display name, empty when the row is incomplete.
    #[must_use]
    pub fn display_name(&self) -> &str {
        first_nonblank(&[&self.nombre])
    }

    /// Raw image reference for the image resolver, if any.
    #[must_use]
    pub fn image_ref(&self) -> Option<&str> {
        let r = first_nonblank(&[&self.imagen_url, &self.imagen]);
        if r.is_empty() { None } else { Some(r) }
    }

    /// Price formatted for display (`$12.500`-style, no decimals), or `-`
    /// when the price is missing.
    #[must_use]
    pub fn display_price(&self) -> String {
        self.precio.map_or_else(
            || "-".to_owned(),
            |p| format!("${}", thousands(p.round())),
        )
    }
}

/// Group an integral decimal's digits with `.` separators (es-CO style).
fn thousands(n: Decimal) -> String {
    let raw = n.abs().to_string();
    let digits: Vec<char> = raw.chars().filter(char::is_ascii_digit).collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        let remaining = digits.len() - i;
        if i > 0 && remaining % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*c);
    }
    if n.is_sign_negative() {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Accept a price as a JSON number, numeric string, or null.
///
/// Unparseable values become `None`; a missing price renders as `-`, it is
/// not an error.
fn de_precio<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(serde_json::Number),
        Str(String),
        Other(Value),
    }

    let raw = Option::<Raw>::deserialize(deserializer)?;
    Ok(raw.and_then(|r| match r {
        Raw::Num(n) => n.to_string().parse().ok(),
        Raw::Str(s) => s.trim().parse().ok(),
        Raw::Other(_) => None,
    }))
}

// =============================================================================
// Pedido
// =============================================================================

/// An order row, including the display names joined in by the list
/// endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Pedido {
    pub id: Option<OrderId>,
    pub cliente_id: Option<UserId>,
    pub negocio_id: Option<BusinessId>,
    pub producto_id: Option<ProductId>,
    pub mensaje: Option<String>,
    pub cantidad: Option<u32>,
    pub estado: OrderStatus,
    #[serde(deserialize_with = "de_fecha")]
    pub fecha: Option<DateTime<Utc>>,
    pub respuesta: Option<String>,
    pub producto_nombre: Option<String>,
    pub negocio_nombre: Option<String>,
    pub cliente_nombre: Option<String>,
    pub cliente_telefono: Option<String>,
}

impl Pedido {
    /// Quantity, defaulting to 1 as the API does.
    #[must_use]
    pub fn cantidad(&self) -> u32 {
        self.cantidad.unwrap_or(1).max(1)
    }
}

/// Accept a timestamp as RFC 3339 or the RFC 2822 form Flask's jsonify
/// emits for datetimes; anything else becomes `None`.
fn de_fecha<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .or_else(|_| DateTime::parse_from_rfc2822(&s))
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    }))
}

// =============================================================================
// Categoria
// =============================================================================

/// A business category.
#[derive(Debug, Clone, Deserialize)]
pub struct Categoria {
    pub id: CategoryId,
    pub nombre: String,
}

// =============================================================================
// Request payloads
// =============================================================================

/// Credentials for `POST /api/auth/login`.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub tipo: Role,
    pub telefono: String,
    pub password: SecretString,
}

impl LoginRequest {
    /// Build the JSON body, exposing the password only here.
    #[must_use]
    pub fn to_body(&self) -> Value {
        serde_json::json!({
            "tipo": self.tipo,
            "telefono": self.telefono,
            "password": self.password.expose_secret(),
        })
    }
}

/// Payload for `POST /api/auth/register`.
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub tipo: Role,
    pub nombre: String,
    pub telefono: String,
    pub password: SecretString,
}

impl RegisterRequest {
    /// Build the JSON body, exposing the password only here.
    #[must_use]
    pub fn to_body(&self) -> Value {
        serde_json::json!({
            "tipo": self.tipo,
            "nombre": self.nombre,
            "telefono": self.telefono,
            "password": self.password.expose_secret(),
        })
    }
}

/// Payload for `POST /api/pedidos`.
#[derive(Debug, Clone, Serialize)]
pub struct NuevoPedido {
    pub negocio_id: BusinessId,
    pub producto_id: Option<ProductId>,
    pub cliente_id: Option<UserId>,
    pub cliente_nombre: String,
    pub cliente_telefono: String,
    pub mensaje: String,
    pub cantidad: u32,
}

/// Customer-side edit of a pending order (`PUT /api/pedidos/{id}`).
#[derive(Debug, Clone, Default, Serialize)]
pub struct EditarPedido {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cantidad: Option<u32>,
}

/// Business-side status update (`PUT /api/pedidos/negocio/{id}`).
#[derive(Debug, Clone, Serialize)]
pub struct EstadoPedido {
    pub estado: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub respuesta: Option<String>,
}

/// Product create/update payload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductoInput {
    pub nombre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precio: Option<Decimal>,
}

// =============================================================================
// Helpers
// =============================================================================

/// First non-blank value among `fields`, or `""`.
fn first_nonblank<'a>(fields: &[&'a Option<String>]) -> &'a str {
    fields
        .iter()
        .filter_map(|f| f.as_deref())
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or("")
}
