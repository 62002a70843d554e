//! Account commands.

use secrecy::SecretString;

use mercado_barrio_app::App;
use mercado_barrio_app::views::auth;
use mercado_barrio_core::Role;

/// Errors from account commands.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The API rejected the operation; the message is user-facing.
    #[error("{0}")]
    Api(String),
}

/// Log in, persist the session, and land on the role dashboard.
#[allow(clippy::print_stdout)]
pub async fn login(
    app: &mut App,
    tipo: &str,
    telefono: String,
    password: String,
) -> Result<(), AuthError> {
    let role: Role = tipo.parse().unwrap_or_default();
    let gateway = app.gateway().clone();
    let session = auth::login(
        &gateway,
        app.sessions_mut(),
        role,
        telefono,
        SecretString::from(password),
    )
    .await
    .map_err(AuthError::Api)?;

    // Same post-login navigation the shells perform.
    app.router_mut().go_to_dashboard(Some(&session));

    println!("Sesión iniciada como {} ({})", session.nombre, session.tipo);
    println!("Vista actual: {}", app.current_view());
    Ok(())
}

/// Clear the persisted session, dropping the server-side one too.
#[allow(clippy::print_stdout)]
pub async fn logout(app: &mut App) {
    // Best effort: the local session clears even if the server is away.
    let res = app.gateway().logout().await;
    if !res.api_ok() {
        tracing::debug!(status = res.status, "server-side logout not confirmed");
    }
    app.logout();
    println!("Sesión cerrada.");
}

/// Register a new account.
#[allow(clippy::print_stdout)]
pub async fn register(
    app: &App,
    tipo: &str,
    nombre: String,
    telefono: String,
    password: String,
) -> Result<(), AuthError> {
    let role: Role = tipo.parse().unwrap_or_default();
    let user_id = auth::register(
        app.gateway(),
        role,
        nombre,
        telefono,
        SecretString::from(password),
    )
    .await
    .map_err(AuthError::Api)?;

    println!("Registrado (usuario {user_id}). Ahora puedes iniciar sesión.");
    Ok(())
}
