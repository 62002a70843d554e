//! Login, registration and profile editing.

use secrecy::SecretString;
use serde_json::Value;
use tracing::warn;

use mercado_barrio_client::{ApiGateway, LoginRequest, RegisterRequest};
use mercado_barrio_core::{Role, UserId};

use crate::router::Page;
use crate::session::{Session, SessionStore};

/// Log in and persist the returned session.
///
/// On success the session record is stored and a one-shot redirect marker
/// points the next startup at the role's dashboard, so a restart right
/// after login lands where the user expects.
///
/// # Errors
///
/// Returns the inline error string: the API message verbatim, or the
/// generic login failure when there is none.
pub async fn login(
    gateway: &ApiGateway,
    sessions: &mut SessionStore,
    tipo: Role,
    telefono: String,
    password: SecretString,
) -> Result<Session, String> {
    let res = gateway
        .login(&LoginRequest {
            tipo,
            telefono,
            password,
        })
        .await;

    if !res.api_ok() {
        return Err(res
            .msg()
            .filter(|m| !m.is_empty())
            .unwrap_or("Error al iniciar sesión")
            .to_owned());
    }

    let Some(session) = res.item::<Session>("user").filter(Session::is_valid) else {
        return Err("Error al iniciar sesión".to_owned());
    };

    sessions
        .set(session.clone())
        .map_err(|err| format!("No se pudo guardar la sesión: {err}"))?;

    let dashboard = if session.tipo.is_business() {
        Page::BusinessDashboard
    } else {
        Page::CustomerDashboard
    };
    if let Err(err) = sessions.set_redirect(dashboard.tag()) {
        // The login itself succeeded; the next startup just lands on the
        // role dashboard via the normal path.
        warn!(error = %err, "failed to store redirect marker");
    }

    Ok(session)
}

/// Register a new account.
///
/// # Errors
///
/// Returns the inline error string on failure (e.g. the phone is already
/// registered).
pub async fn register(
    gateway: &ApiGateway,
    tipo: Role,
    nombre: String,
    telefono: String,
    password: SecretString,
) -> Result<UserId, String> {
    let res = gateway
        .register(&RegisterRequest {
            tipo,
            nombre,
            telefono,
            password,
        })
        .await;

    if !res.api_ok() {
        return Err(res
            .msg()
            .filter(|m| !m.is_empty())
            .unwrap_or("Error al registrarse")
            .to_owned());
    }

    res.item::<i32>("user_id")
        .map(UserId::new)
        .ok_or_else(|| "Error al registrarse".to_owned())
}

/// Save profile changes and re-persist the merged session record.
///
/// The in-memory and persisted copies stay consistent: the merge happens on
/// a copy, and only a successful persist swaps it in.
///
/// # Errors
///
/// Returns the inline error string on API or persistence failure.
pub async fn save_profile(
    gateway: &ApiGateway,
    sessions: &mut SessionStore,
    cambios: &Value,
) -> Result<Session, String> {
    let Some(current) = sessions.current().cloned() else {
        return Err("No autenticado".to_owned());
    };

    let res = gateway.update_usuario(current.id, cambios).await;
    if !res.api_ok() {
        return Err(res.error_text());
    }

    // Prefer the record the API echoes back; otherwise merge the submitted
    // fields onto the current session.
    let updated = res
        .item::<Session>("user")
        .or_else(|| res.item::<Session>("usuario"))
        .filter(Session::is_valid)
        .unwrap_or_else(|| merge_session(current, cambios));

    sessions
        .set(updated.clone())
        .map_err(|err| format!("No se pudo guardar la sesión: {err}"))?;

    Ok(updated)
}

/// Upload a profile image and record the served URL on the session.
///
/// # Errors
///
/// Returns the inline error string on API or persistence failure.
pub async fn upload_profile_image(
    gateway: &ApiGateway,
    sessions: &mut SessionStore,
    filename: String,
    bytes: Vec<u8>,
    mime: &str,
) -> Result<String, String> {
    let Some(current) = sessions.current().cloned() else {
        return Err("No autenticado".to_owned());
    };

    let res = gateway
        .upload_imagen_usuario(current.id, filename, bytes, mime)
        .await;
    if !res.api_ok() {
        return Err(res.error_text());
    }
    let Some(imagen_url) = res.item::<String>("imagen_url") else {
        return Err("Error al subir la imagen".to_owned());
    };

    let mut updated = current;
    updated
        .extra
        .insert("imagen_url".to_owned(), Value::String(imagen_url.clone()));
    sessions
        .set(updated)
        .map_err(|err| format!("No se pudo guardar la sesión: {err}"))?;

    Ok(imagen_url)
}

/// Apply submitted profile fields onto a session record.
fn merge_session(current: Session, cambios: &Value) -> Session {
    let mut merged = current;
    let Some(fields) = cambios.as_object() else {
        return merged;
    };
    for (key, value) in fields {
        match key.as_str() {
            "nombre" => {
                if let Some(nombre) = value.as_str() {
                    merged.nombre = nombre.to_owned();
                }
            }
            "telefono" => merged.telefono = value.as_str().map(str::to_owned),
            // Identity and role never change through a profile save.
            "id" | "tipo" => {}
            _ => {
                merged.extra.insert(key.clone(), value.clone());
            }
        }
    }
    merged
}
