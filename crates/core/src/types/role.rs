//! Account role tags.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The role attached to an authenticated account.
///
/// The API uses Spanish wire tags (`cliente`, `negocio`). Any other tag
/// deserializes as [`Role::Unknown`] rather than being rejected, so a
/// session record with an unexpected role still loads and is simply denied
/// the role-gated views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    /// A buyer account.
    Customer,
    /// A merchant account with an attached business.
    Business,
    /// Any unrecognized role tag.
    #[default]
    Unknown,
}

impl Role {
    /// Whether this role grants the customer dashboard.
    #[must_use]
    pub const fn is_customer(self) -> bool {
        matches!(self, Self::Customer)
    }

    /// Whether this role grants the business dashboard.
    #[must_use]
    pub const fn is_business(self) -> bool {
        matches!(self, Self::Business)
    }

    /// The wire tag for this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "cliente",
            Self::Business => "negocio",
            Self::Unknown => "desconocido",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "cliente" => Self::Customer,
            "negocio" => Self::Business,
            _ => Self::Unknown,
        })
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(tag.parse().unwrap_or(Self::Unknown))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_tags() {
        let customer: Role = serde_json::from_str("\"cliente\"").unwrap();
        assert_eq!(customer, Role::Customer);
        let business: Role = serde_json::from_str("\"negocio\"").unwrap();
        assert_eq!(business, Role::Business);
        assert_eq!(serde_json::to_string(&Role::Customer).unwrap(), "\"cliente\"");
    }

    #[test]
    fn test_unrecognized_tag_is_unknown() {
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Unknown);
        assert!(!role.is_customer());
        assert!(!role.is_business());
    }

    #[test]
    fn test_from_str_never_fails() {
        assert_eq!("cliente".parse::<Role>().unwrap(), Role::Customer);
        assert_eq!("whatever".parse::<Role>().unwrap(), Role::Unknown);
    }

    #[test]
    fn test_unknown_serializes_to_its_own_tag() {
        assert_eq!(
            serde_json::to_string(&Role::Unknown).unwrap(),
            "\"desconocido\""
        );
    }
}
