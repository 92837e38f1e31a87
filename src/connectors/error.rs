//! Errores de comunicación con los controladores.

use reqwest::StatusCode;
use thiserror::Error;


/// Errores que pueden ocurrir al hablar con Catalyst Center o Meraki.
#[derive(Error, Debug)]
pub enum ConnectorError {
    /// No se pudo crear el cliente HTTP (TLS, proxy...).
    #[error("no se pudo inicializar el cliente: {0}")]
    Init(String),

    #[error("petición HTTP fallida: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON inválido: {0}")]
    Json(#[from] serde_json::Error),

    #[error("autenticación fallida: {0}")]
    AuthFailed(String),

    #[error("recurso no encontrado: {0}")]
    NotFound(String),

    #[error("límite de peticiones alcanzado, reintentar en {retry_after_secs} segundos")]
    RateLimited { retry_after_secs: u64 },

    /// El controlador rechazó la petición (4xx). Catalyst responde así a cambios
    /// de estado redundantes.
    #[error("petición rechazada ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("error del controlador ({status}) en {entity}")]
    Server { status: u16, entity: String },
}


/// Traduce una respuesta no exitosa al error correspondiente.
pub async fn error_for_response(response: reqwest::Response, entity: &str) -> ConnectorError {
    let status = response.status();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ConnectorError::AuthFailed(format!("{} ({})", entity, status))
        }
        StatusCode::NOT_FOUND => ConnectorError::NotFound(entity.to_string()),
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(1);
            ConnectorError::RateLimited { retry_after_secs }
        }
        s if s.is_client_error() => {
            let message = response.text().await.unwrap_or_default();
            ConnectorError::Rejected { status: s.as_u16(), message }
        }
        s => ConnectorError::Server { status: s.as_u16(), entity: entity.to_string() },
    }
}
