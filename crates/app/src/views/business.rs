//! Business detail: shared by the profile page and the detail overlay.

use mercado_barrio_client::{ApiGateway, Negocio, Producto};
use mercado_barrio_core::BusinessId;

/// A loaded business with its products.
#[derive(Debug, Default)]
pub struct BusinessDetail {
    pub negocio: Option<Negocio>,
    pub productos: Vec<Producto>,
    /// Inline error when the business itself could not be loaded.
    pub error: Option<String>,
}

impl BusinessDetail {
    /// Products shown in the compact overlay (the full list lives on the
    /// profile page).
    #[must_use]
    pub fn top_products(&self) -> &[Producto] {
        let n = self.productos.len().min(3);
        self.productos.get(..n).unwrap_or_default()
    }
}

/// Load a business and its product list.
///
/// A failed business load is the view's error; a failed product load just
/// leaves the list empty - a profile with no products is still worth
/// showing.
pub async fn load(gateway: &ApiGateway, id: BusinessId) -> BusinessDetail {
    let res = gateway.get_negocio(id).await;
    if !res.api_ok() {
        return BusinessDetail {
            error: Some(
                res.msg()
                    .filter(|m| !m.is_empty())
                    .unwrap_or("No se pudo cargar el negocio")
                    .to_owned(),
            ),
            ..BusinessDetail::default()
        };
    }
    let negocio = res.item::<Negocio>("negocio");

    let res = gateway.list_productos(id).await;
    let productos = if res.api_ok() {
        res.list::<Producto>("productos")
    } else {
        Vec::new()
    };

    BusinessDetail {
        negocio,
        productos,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_products_caps_at_three() {
        let detail = BusinessDetail {
            negocio: None,
            productos: (0..5)
                .map(|i| Producto {
                    nombre: Some(format!("p{i}")),
                    ..Producto::default()
                })
                .collect(),
            error: None,
        };
        assert_eq!(detail.top_products().len(), 3);

        let short = BusinessDetail::default();
        assert!(short.top_products().is_empty());
    }
}
