//! Cliente REST de Catalyst Center.
//!
//! Obtiene la topología física, el detalle PoE por switch y cambia el estado
//! administrativo de interfaces. El token de sesión se cachea y se renueva una
//! vez cuando el controlador responde 401.


use std::time::Duration;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info};
use super::error::{error_for_response, ConnectorError};
use super::read_json;
use crate::config::catalyst::{AUTH_PATH, INTERFACE_PATH, NETWORK_DEVICE_PATH, SWITCH_FAMILY, TOPOLOGY_PATH};
use crate::config::http::USER_AGENT;
use crate::control::domain::{AdminState, ControlOutcome, PortAdmin, PortTarget};
use crate::dataset::domain::CatalystSource;
use crate::poe::domain::PoeTable;
use crate::system::domain::CatalystSettings;
use crate::topology::domain::PhysicalTopology;

const TOKEN_HEADER: &str = "X-Auth-Token";


/// Envoltorio `{ "response": ... }` de la API intent.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    response: T,
}


#[derive(Debug, Deserialize)]
struct AuthToken {
    #[serde(rename = "Token")]
    token: String,
}


/// Dispositivo de red para el reporte de inventario.
#[derive(Default, Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDevice {
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub platform_id: Option<String>,
    #[serde(default)]
    pub management_ip_address: Option<String>,
    #[serde(default)]
    pub software_version: Option<String>,
}


pub struct CatalystClient {
    base_url: String,
    username: String,
    password: String,
    client: Client,
    token: Mutex<Option<String>>,
}


impl CatalystClient {
    /// Crea el cliente sin autenticar; el token se pide en la primera llamada.
    ///
    /// # Errors
    ///
    /// Devuelve error si no se puede construir el cliente HTTP.
    pub fn new(settings: &CatalystSettings, timeout: Duration) -> Result<Self, ConnectorError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .danger_accept_invalid_certs(!settings.verify_tls)
            .build()
            .map_err(|e| ConnectorError::Init(format!("Catalyst Center: {}", e)))?;

        Ok(Self {
            base_url: base_url(&settings.host),
            username: settings.username.clone(),
            password: settings.password.clone(),
            client,
            token: Mutex::new(None),
        })
    }

    async fn authenticate(&self) -> Result<String, ConnectorError> {
        let url = format!("{}{}", self.base_url, AUTH_PATH);
        let response = self.client
            .post(&url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(match error_for_response(response, "auth/token").await {
                ConnectorError::Rejected { message, .. } => ConnectorError::AuthFailed(message),
                other => other,
            });
        }

        let auth: AuthToken = read_json(response).await?;
        info!("Info: sesión de Catalyst Center iniciada");
        Ok(auth.token)
    }

    async fn token(&self) -> Result<String, ConnectorError> {
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref() {
            return Ok(token.clone());
        }
        let token = self.authenticate().await?;
        *guard = Some(token.clone());
        Ok(token)
    }

    /// Envía la petición con el token actual; ante un 401 renueva el token y reintenta una vez.
    async fn send<F>(&self, entity: &str, build: F) -> Result<Response, ConnectorError>
    where
        F: Fn(&str) -> RequestBuilder,
    {
        let token = self.token().await?;
        let mut response = build(&token).send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            debug!("Debug: token de Catalyst Center expirado, renovando");
            *self.token.lock().await = None;
            let token = self.token().await?;
            response = build(&token).send().await?;
        }

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(error_for_response(response, entity).await)
        }
    }

    async fn get<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, ConnectorError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .send(path, |token| self.client.get(&url).query(query).header(TOKEN_HEADER, token))
            .await?;
        let envelope: Envelope<T> = read_json(response).await?;
        Ok(envelope.response)
    }

    /// Topología física completa (nodos y enlaces).
    pub async fn physical_topology(&self) -> Result<PhysicalTopology, ConnectorError> {
        self.get(TOPOLOGY_PATH, &[]).await
    }

    /// Detalle PoE de todas las interfaces de un switch.
    pub async fn poe_interface_details(&self, device_id: &str) -> Result<PoeTable, ConnectorError> {
        let path = format!("{}/{}/interface/poe-detail", NETWORK_DEVICE_PATH, device_id);
        self.get(&path, &[]).await
    }

    /// Switches gestionados, para el reporte de inventario.
    pub async fn switches(&self) -> Result<Vec<NetworkDevice>, ConnectorError> {
        self.get(NETWORK_DEVICE_PATH, &[("family", SWITCH_FAMILY)]).await
    }

    /// Cambia el estado administrativo y la descripción de una interfaz.
    ///
    /// El controlador rechaza (4xx) los cambios a un estado en el que la interfaz ya está.
    pub async fn update_interface_admin_status(&self,
                                               interface_id: &str,
                                               state: AdminState) -> Result<(), ConnectorError> {
        let url = format!("{}{}/{}", self.base_url, INTERFACE_PATH, interface_id);
        let payload = json!({
            "description": format!("Interface status configured to 'Admin {} through API'", state.as_str()),
            "adminStatus": state.as_str(),
        });

        self.send(interface_id, |token| {
            self.client
                .put(&url)
                .query(&[("deploymentMode", "Deploy")])
                .header(TOKEN_HEADER, token)
                .json(&payload)
        })
        .await?;
        Ok(())
    }
}


fn base_url(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}


impl CatalystSource for CatalystClient {
    async fn physical_topology(&self) -> Result<PhysicalTopology, ConnectorError> {
        CatalystClient::physical_topology(self).await
    }

    async fn poe_table(&self, switch_id: &str) -> Result<PoeTable, ConnectorError> {
        self.poe_interface_details(switch_id).await
    }
}


impl PortAdmin for CatalystClient {
    async fn set_admin_state(&self, target: &PortTarget, state: AdminState) -> Result<ControlOutcome, ConnectorError> {
        match self.update_interface_admin_status(&target.port_id, state).await {
            Ok(()) => Ok(ControlOutcome::Changed),
            Err(ConnectorError::Rejected { status, message }) => {
                debug!("Debug: Catalyst rechazó el cambio ({}): {}", status, message);
                Ok(ControlOutcome::AlreadyInState)
            }
            Err(e) => Err(e),
        }
    }
}
