//! CLI command implementations.

pub mod auth;
pub mod browse;
pub mod pedidos;

use mercado_barrio_app::{App, AppConfig};

/// Assemble and bootstrap the engine the way a graphical shell would.
pub fn build_app(api_url: Option<&str>) -> Result<App, Box<dyn std::error::Error>> {
    let config = AppConfig::resolve(api_url)?;
    let mut app = App::new(config)?;
    app.bootstrap();
    Ok(app)
}
