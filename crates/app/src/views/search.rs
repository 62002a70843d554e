//! Search page: client-side filtering over the business directory.

use mercado_barrio_client::{ApiGateway, Negocio};

/// The loaded search page.
#[derive(Debug, Default)]
pub struct SearchView {
    pub resultados: Vec<Negocio>,
    pub error: Option<String>,
}

/// Load the directory and keep the businesses matching `query`.
///
/// Matching is case-insensitive over name, category, city and neighborhood;
/// a blank query returns everything.
pub async fn search(gateway: &ApiGateway, query: &str) -> SearchView {
    let res = gateway.list_negocios().await;
    if !res.api_ok() {
        return SearchView {
            error: Some("No se pudieron cargar los negocios.".to_owned()),
            ..SearchView::default()
        };
    }

    let needle = query.trim().to_lowercase();
    let resultados = res
        .list::<Negocio>("negocios")
        .into_iter()
        .filter(|n| needle.is_empty() || matches(n, &needle))
        .collect();

    SearchView {
        resultados,
        error: None,
    }
}

fn matches(negocio: &Negocio, needle: &str) -> bool {
    [
        Some(negocio.display_name()),
        Some(negocio.business_name()),
        negocio.categoria.as_deref(),
        negocio.ciudad.as_deref(),
        negocio.barrio.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(needle))
}
