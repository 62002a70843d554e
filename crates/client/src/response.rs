//! The uniform response envelope.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Message shown when the API gave no usable error text.
pub const GENERIC_COMM_ERROR: &str = "Error de comunicación con el servidor";

/// Result of a gateway call.
///
/// Every call resolves to this envelope - transport failures, timeouts and
/// unparseable bodies included:
///
/// - `ok` mirrors the HTTP success range; transport failures are `false`.
/// - `status` is the HTTP status code, or `0` when the request never
///   completed (timeout, refused connection, DNS failure).
/// - `data` is the parsed JSON body, or `{}` when the body was empty or not
///   valid JSON. Transport failures carry `{ "msg": <error text> }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub ok: bool,
    pub status: u16,
    pub data: Value,
}

impl ApiResponse {
    /// Envelope for a request that never reached the server.
    #[must_use]
    pub fn transport_error(msg: impl Into<String>) -> Self {
        Self {
            ok: false,
            status: 0,
            data: serde_json::json!({ "msg": msg.into() }),
        }
    }

    /// Envelope for a completed HTTP exchange.
    #[must_use]
    pub const fn completed(ok: bool, status: u16, data: Value) -> Self {
        Self { ok, status, data }
    }

    /// Whether both the HTTP layer and the API envelope reported success.
    ///
    /// The API sets `data.ok` on every body; a `2xx` with `data.ok == false`
    /// still counts as a business failure.
    #[must_use]
    pub fn api_ok(&self) -> bool {
        self.ok && self.data.get("ok").and_then(Value::as_bool) != Some(false)
    }

    /// The API-reported message, if any.
    #[must_use]
    pub fn msg(&self) -> Option<&str> {
        self.data.get("msg").and_then(Value::as_str)
    }

    /// User-facing error text: the API message verbatim, or the generic
    /// communication error when there is none.
    #[must_use]
    pub fn error_text(&self) -> String {
        self.msg()
            .filter(|m| !m.is_empty())
            .unwrap_or(GENERIC_COMM_ERROR)
            .to_owned()
    }

    /// Decode `data[key]` as `T`, ignoring mismatches.
    #[must_use]
    pub fn item<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.data
            .get(key)
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
    }

    /// Decode a list the API may deliver in several shapes: `data[key]` as
    /// an array, the body itself as an array, or `data.items`.
    ///
    /// Elements that fail to decode are skipped rather than failing the
    /// whole list.
    #[must_use]
    pub fn list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let array = [self.data.get(key), Some(&self.data), self.data.get("items")]
            .into_iter()
            .flatten()
            .find_map(Value::as_array);

        array
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| serde_json::from_value(v.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transport_error_shape() {
        let res = ApiResponse::transport_error("timeout");
        assert!(!res.ok);
        assert_eq!(res.status, 0);
        assert_eq!(res.msg(), Some("timeout"));
    }

    #[test]
    fn test_api_ok_requires_body_agreement() {
        let good = ApiResponse::completed(true, 200, json!({ "ok": true }));
        assert!(good.api_ok());

        let body_says_no = ApiResponse::completed(true, 200, json!({ "ok": false }));
        assert!(!body_says_no.api_ok());

        // A body without an ok flag defers to the HTTP layer.
        let bare = ApiResponse::completed(true, 200, json!({}));
        assert!(bare.api_ok());
    }

    #[test]
    fn test_error_text_falls_back_to_generic() {
        let res = ApiResponse::completed(false, 500, json!({}));
        assert_eq!(res.error_text(), GENERIC_COMM_ERROR);

        let verbatim = ApiResponse::completed(false, 409, json!({ "msg": "Teléfono ya registrado" }));
        assert_eq!(verbatim.error_text(), "Teléfono ya registrado");
    }

    #[test]
    fn test_list_accepts_keyed_bare_and_items_shapes() {
        let keyed = ApiResponse::completed(true, 200, json!({ "negocios": [{ "id": 1 }] }));
        let bare = ApiResponse::completed(true, 200, json!([{ "id": 2 }]));
        let items = ApiResponse::completed(true, 200, json!({ "items": [{ "id": 3 }] }));

        #[derive(serde::Deserialize)]
        struct Row {
            id: i32,
        }

        assert_eq!(keyed.list::<Row>("negocios").len(), 1);
        assert_eq!(bare.list::<Row>("negocios").first().map(|r| r.id), Some(2));
        assert_eq!(items.list::<Row>("negocios").first().map(|r| r.id), Some(3));
        assert!(keyed.list::<Row>("productos").is_empty());
    }

    #[test]
    fn test_item_ignores_mismatches() {
        let res = ApiResponse::completed(true, 200, json!({ "pedido_id": 12 }));
        assert_eq!(res.item::<i32>("pedido_id"), Some(12));
        assert_eq!(res.item::<String>("pedido_id"), None);
        assert_eq!(res.item::<i32>("missing"), None);
    }
}
