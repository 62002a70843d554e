//! Status enums for orders.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// Wire values match the API (`pendiente`, `confirmado`, `cancelado`).
/// Orders are created `pendiente`; only the business moves them to
/// `confirmado` or `cancelado`, and customers may edit or delete an order
/// only while it is still `pendiente`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pendiente,
    Confirmado,
    Cancelado,
}

impl OrderStatus {
    /// Whether the order can still be edited or withdrawn by the customer.
    #[must_use]
    pub const fn is_editable(self) -> bool {
        matches!(self, Self::Pendiente)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pendiente => write!(f, "pendiente"),
            Self::Confirmado => write!(f, "confirmado"),
            Self::Cancelado => write!(f, "cancelado"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendiente" => Ok(Self::Pendiente),
            "confirmado" => Ok(Self::Confirmado),
            "cancelado" => Ok(Self::Cancelado),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_values() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Pendiente).unwrap(),
            "\"pendiente\""
        );
        let status: OrderStatus = serde_json::from_str("\"confirmado\"").unwrap();
        assert_eq!(status, OrderStatus::Confirmado);
    }

    #[test]
    fn test_editability() {
        assert!(OrderStatus::Pendiente.is_editable());
        assert!(!OrderStatus::Confirmado.is_editable());
        assert!(!OrderStatus::Cancelado.is_editable());
    }

    #[test]
    fn test_from_str_rejects_garbage() {
        assert!("enviado".parse::<OrderStatus>().is_err());
    }
}
