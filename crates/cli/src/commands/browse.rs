//! Directory browsing commands.

use mercado_barrio_app::views::{business, home, search};
use mercado_barrio_app::{App, whatsapp};
use mercado_barrio_client::Categoria;
use mercado_barrio_core::BusinessId;

/// Errors from browsing commands.
#[derive(Debug, thiserror::Error)]
pub enum BrowseError {
    /// The API reported or implied a failure; the message is user-facing.
    #[error("{0}")]
    Api(String),
}

/// List the business directory, featured businesses first; `buscar`
/// narrows it down.
#[allow(clippy::print_stdout)]
pub async fn list_negocios(app: &App, buscar: Option<&str>) -> Result<(), BrowseError> {
    let negocios = match buscar {
        Some(query) => {
            let view = search::search(app.gateway(), query).await;
            if let Some(error) = view.error {
                return Err(BrowseError::Api(error));
            }
            view.resultados
        }
        None => {
            let view = home::load(app.gateway()).await;
            if let Some(error) = view.error {
                return Err(BrowseError::Api(error));
            }
            let mut negocios = view.destacados;
            negocios.extend(view.regulares);
            negocios
        }
    };

    for negocio in &negocios {
        let id = negocio.id.map_or_else(|| "?".to_owned(), |id| id.to_string());
        let star = if negocio.es_destacado { "*" } else { " " };
        println!(
            "{star} [{id}] {} · {} · {}",
            negocio.display_name(),
            negocio.categoria.as_deref().unwrap_or(""),
            negocio.phone(),
        );
    }
    Ok(())
}

/// Show one business profile with its products.
#[allow(clippy::print_stdout)]
pub async fn show_negocio(app: &App, id: i32) -> Result<(), BrowseError> {
    let detail = business::load(app.gateway(), BusinessId::new(id)).await;
    if let Some(error) = detail.error {
        return Err(BrowseError::Api(error));
    }
    let Some(negocio) = detail.negocio else {
        return Err(BrowseError::Api("No se pudo cargar el negocio".to_owned()));
    };

    println!("{}", negocio.business_name());
    println!(
        "{} · {} {}",
        negocio.categoria.as_deref().unwrap_or("Sin categoría"),
        negocio.ciudad.as_deref().unwrap_or(""),
        negocio.barrio.as_deref().unwrap_or(""),
    );
    if let Some(descripcion) = &negocio.descripcion {
        println!("{descripcion}");
    }
    println!("Tel: {}", negocio.phone());
    if let Some(horario) = &negocio.horario {
        println!("Horario: {horario}");
    }
    // The resolved image URL the shell would try first.
    let candidates = app.images().candidates(negocio.image_ref());
    if let Some(first) = candidates.get(0) {
        println!("Imagen: {first}");
    }
    if !negocio.phone().is_empty() {
        println!(
            "Pedir por WhatsApp: {}",
            whatsapp::wa_link(
                negocio.phone(),
                &whatsapp::order_greeting(negocio.business_name())
            )
        );
    }

    if detail.productos.is_empty() {
        println!("\nNo hay productos publicados aún.");
    } else {
        println!("\nProductos:");
        for producto in &detail.productos {
            let id = producto.id.map_or_else(|| "?".to_owned(), |id| id.to_string());
            println!(
                "  [{id}] {} {}",
                producto.display_name(),
                producto.display_price(),
            );
        }
    }
    Ok(())
}

/// List the category catalog.
#[allow(clippy::print_stdout)]
pub async fn list_categorias(app: &App) -> Result<(), BrowseError> {
    let res = app.gateway().list_categorias().await;
    if !res.api_ok() {
        return Err(BrowseError::Api(res.error_text()));
    }
    for categoria in res.list::<Categoria>("categorias") {
        println!("[{}] {}", categoria.id, categoria.nombre);
    }
    Ok(())
}
