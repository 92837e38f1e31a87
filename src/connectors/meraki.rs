//! Cliente REST del Dashboard de Meraki (API v1).


use std::time::Duration;
use reqwest::header::{HeaderMap, LINK};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use super::error::{error_for_response, ConnectorError};
use super::read_json;
use crate::access::domain::{AccessDevice, SwitchPortStatus};
use crate::config::http::USER_AGENT;
use crate::config::meraki::{DEVICES_PER_PAGE, NETWORKS_PER_PAGE, PORT_STATUS_TIMESPAN_SECS};
use crate::control::domain::{AdminState, ControlOutcome, PortAdmin, PortTarget};
use crate::dataset::domain::MerakiSource;
use crate::system::domain::MerakiSettings;


#[derive(Debug, Clone, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
}


#[derive(Debug, Clone, Deserialize)]
pub struct Network {
    pub id: String,
    pub name: String,
}


/// Configuración de un puerto de switch (`enabled` es el estado administrativo).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SwitchPortConfig {
    pub port_id: String,
    #[serde(default)]
    pub enabled: bool,
}


pub struct MerakiClient {
    base_url: String,
    api_key: String,
    client: Client,
}


impl MerakiClient {
    /// # Errors
    ///
    /// Devuelve error si no se puede construir el cliente HTTP.
    pub fn new(settings: &MerakiSettings, timeout: Duration) -> Result<Self, ConnectorError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ConnectorError::Init(format!("Meraki: {}", e)))?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            client,
        })
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.bearer_auth(&self.api_key)
    }

    async fn get<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ConnectorError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self.request(self.client.get(&url).query(query)).send().await?;
        if !response.status().is_success() {
            return Err(error_for_response(response, path).await);
        }
        read_json(response).await
    }

    /// Recorre todas las páginas siguiendo el encabezado `Link: <...>; rel=next`.
    async fn get_all<T>(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<T>, ConnectorError>
    where
        T: DeserializeOwned,
    {
        let mut url = format!("{}{}", self.base_url, path);
        let mut query = query.to_vec();
        let mut items = Vec::new();

        loop {
            let response = self.request(self.client.get(&url).query(&query)).send().await?;
            if !response.status().is_success() {
                return Err(error_for_response(response, path).await);
            }
            let next = next_page(response.headers());
            let mut page: Vec<T> = read_json(response).await?;
            items.append(&mut page);

            match next {
                Some(next) => {
                    debug!("Debug: siguiente página de {}", path);
                    url = next;
                    query.clear();
                }
                None => return Ok(items),
            }
        }
    }

    pub async fn organizations(&self) -> Result<Vec<Organization>, ConnectorError> {
        self.get("/organizations", &[]).await
    }

    pub async fn organization_networks(&self, organization_id: &str) -> Result<Vec<Network>, ConnectorError> {
        let path = format!("/organizations/{}/networks", organization_id);
        self.get_all(&path, &[("perPage", NETWORKS_PER_PAGE.to_string())]).await
    }

    /// Todos los dispositivos de la organización, para el reporte de inventario.
    pub async fn organization_devices(&self, organization_id: &str) -> Result<Vec<AccessDevice>, ConnectorError> {
        let path = format!("/organizations/{}/devices", organization_id);
        self.get_all(&path, &[("perPage", DEVICES_PER_PAGE.to_string())]).await
    }

    pub async fn devices(&self, network_id: &str) -> Result<Vec<AccessDevice>, ConnectorError> {
        let path = format!("/networks/{}/devices", network_id);
        self.get(&path, &[]).await
    }

    pub async fn switch_port_statuses(&self, serial: &str) -> Result<Vec<SwitchPortStatus>, ConnectorError> {
        let path = format!("/devices/{}/switch/ports/statuses", serial);
        self.get(&path, &[("timespan", PORT_STATUS_TIMESPAN_SECS.to_string())]).await
    }

    pub async fn switch_port(&self, serial: &str, port_id: &str) -> Result<SwitchPortConfig, ConnectorError> {
        let path = format!("/devices/{}/switch/ports/{}", serial, port_id);
        self.get(&path, &[]).await
    }

    pub async fn update_switch_port(&self,
                                    serial: &str,
                                    port_id: &str,
                                    enabled: bool) -> Result<SwitchPortConfig, ConnectorError> {
        let path = format!("/devices/{}/switch/ports/{}", serial, port_id);
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .request(self.client.put(&url).json(&json!({ "enabled": enabled })))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_for_response(response, &path).await);
        }
        read_json(response).await
    }
}


/// URL de la página siguiente, si el encabezado `Link` la anuncia.
fn next_page(headers: &HeaderMap) -> Option<String> {
    let link = headers.get(LINK)?.to_str().ok()?;
    link.split(',').find_map(|part| {
        let mut pieces = part.split(';');
        let target = pieces.next()?.trim();
        if !pieces.any(|p| matches!(p.trim(), "rel=next" | "rel=\"next\"")) {
            return None;
        }
        target.strip_prefix('<')?.strip_suffix('>').map(str::to_string)
    })
}


/// Selecciona los ids de red cuyo nombre está permitido. Lista vacía = todas.
pub fn select_networks(networks: &[Network], names: &[String]) -> Vec<String> {
    networks
        .iter()
        .filter(|network| names.is_empty() || names.iter().any(|name| *name == network.name))
        .map(|network| network.id.clone())
        .collect()
}


impl MerakiSource for MerakiClient {
    async fn organization_id(&self, name: &str) -> Result<String, ConnectorError> {
        self.organizations()
            .await?
            .into_iter()
            .find(|org| org.name == name)
            .map(|org| org.id)
            .ok_or_else(|| ConnectorError::NotFound(format!("organización {}", name)))
    }

    async fn network_ids(&self, organization_id: &str, names: &[String]) -> Result<Vec<String>, ConnectorError> {
        let networks = self.organization_networks(organization_id).await?;
        Ok(select_networks(&networks, names))
    }

    async fn network_devices(&self, network_id: &str) -> Result<Vec<AccessDevice>, ConnectorError> {
        self.devices(network_id).await
    }

    async fn port_statuses(&self, serial: &str) -> Result<Vec<SwitchPortStatus>, ConnectorError> {
        self.switch_port_statuses(serial).await
    }
}


impl PortAdmin for MerakiClient {
    /// Lee el estado actual antes de escribir: si ya coincide no se envía el cambio.
    async fn set_admin_state(&self, target: &PortTarget, state: AdminState) -> Result<ControlOutcome, ConnectorError> {
        let current = self.switch_port(&target.switch_id, &target.port_id).await?;
        if current.enabled == state.enabled() {
            debug!("Debug: puerto {} de {} ya está {}", target.port_id, target.switch_id, state.as_str());
            return Ok(ControlOutcome::AlreadyInState);
        }
        self.update_switch_port(&target.switch_id, &target.port_id, state.enabled()).await?;
        Ok(ControlOutcome::Changed)
    }
}


#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use crate::dataset::domain::Platform;
    use super::*;

    fn client_for(server: &MockServer) -> MerakiClient {
        let settings = MerakiSettings {
            api_key: "key".to_string(),
            base_url: server.uri(),
            organization: "Lab".to_string(),
            networks: vec![],
        };
        MerakiClient::new(&settings, Duration::from_secs(5)).unwrap()
    }

    fn target(port: &str) -> PortTarget {
        PortTarget {
            platform: Platform::Meraki,
            switch_id: "Q2SW-1".to_string(),
            port_id: port.to_string(),
            port_name: port.to_string(),
        }
    }

    #[tokio::test]
    async fn test_port_already_in_state_is_not_written() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/devices/Q2SW-1/switch/ports/5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"portId": "5", "enabled": false})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let outcome = client_for(&server).set_admin_state(&target("5"), AdminState::Down).await.unwrap();

        assert_eq!(outcome, ControlOutcome::AlreadyInState);
    }

    #[tokio::test]
    async fn test_port_in_other_state_is_written() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/devices/Q2SW-1/switch/ports/6"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"portId": "6", "enabled": true})))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/devices/Q2SW-1/switch/ports/6"))
            .and(body_json(json!({"enabled": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"portId": "6", "enabled": false})))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = client_for(&server).set_admin_state(&target("6"), AdminState::Down).await.unwrap();

        assert_eq!(outcome, ControlOutcome::Changed);
    }

    #[tokio::test]
    async fn test_organization_devices_follows_pages() {
        let server = MockServer::start().await;
        let next = format!("{}/organizations/O1/devices?startingAfter=Q2-B", server.uri());

        Mock::given(method("GET"))
            .and(path("/organizations/O1/devices"))
            .and(query_param("startingAfter", "Q2-B"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"serial": "Q2-C", "model": "MS120-8LP", "firmware": "switch-15-21", "productType": "switch"}
            ])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/organizations/O1/devices"))
            .and(query_param("perPage", "1000"))
            .respond_with(ResponseTemplate::new(200)
                .insert_header("Link", format!("<{}>; rel=next", next).as_str())
                .set_body_json(json!([
                    {"serial": "Q2-A", "model": "MS120-8LP", "firmware": "switch-15-21", "productType": "switch"},
                    {"serial": "Q2-B", "model": "MR36", "firmware": "wireless-29-5", "productType": "wireless"}
                ])))
            .expect(1)
            .mount(&server)
            .await;

        let devices = client_for(&server).organization_devices("O1").await.unwrap();

        let serials: Vec<&str> = devices.iter().map(|d| d.serial.as_str()).collect();
        assert_eq!(serials, vec!["Q2-A", "Q2-B", "Q2-C"]);
    }

    #[tokio::test]
    async fn test_malformed_body_is_json_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/networks/N_1/devices"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let result = client_for(&server).devices("N_1").await;

        assert!(matches!(result, Err(ConnectorError::Json(_))));
    }

    #[test]
    fn test_next_page_from_link_header() {
        let mut headers = HeaderMap::new();
        headers.insert(LINK, HeaderValue::from_static(
            "<https://api.meraki.com/api/v1/o/devices?startingAfter=a>; rel=first, \
             <https://api.meraki.com/api/v1/o/devices?startingAfter=x>; rel=\"next\""));
        assert_eq!(next_page(&headers).as_deref(), Some("https://api.meraki.com/api/v1/o/devices?startingAfter=x"));

        headers.insert(LINK, HeaderValue::from_static("<https://api.meraki.com/api/v1/o/devices>; rel=first"));
        assert_eq!(next_page(&headers), None);
        assert_eq!(next_page(&HeaderMap::new()), None);
    }

    fn network(id: &str, name: &str) -> Network {
        Network { id: id.to_string(), name: name.to_string() }
    }

    #[test]
    fn test_select_networks_by_name() {
        let networks = vec![network("N_1", "Energy Demo"), network("N_2", "Office"), network("N_3", "Lab")];

        assert_eq!(select_networks(&networks, &["Energy Demo".to_string(), "Lab".to_string()]), vec!["N_1", "N_3"]);
        assert_eq!(select_networks(&networks, &[]).len(), 3);
        assert!(select_networks(&networks, &["energy demo".to_string()]).is_empty());
    }

    #[test]
    fn test_client_trims_base_url() {
        let settings = MerakiSettings {
            api_key: "key".to_string(),
            base_url: "https://api.meraki.com/api/v1/".to_string(),
            organization: "Lab".to_string(),
            networks: vec![],
        };
        let client = MerakiClient::new(&settings, Duration::from_secs(5)).expect("should create client");
        assert_eq!(client.base_url, "https://api.meraki.com/api/v1");
    }

    #[test]
    fn test_port_payloads() {
        let statuses: Vec<SwitchPortStatus> = serde_json::from_value(json!([
            {"portId": "1", "enabled": true, "status": "Connected", "isUplink": false,
             "powerUsageInWh": 55.9, "speed": "1 Gbps", "duplex": "full"}
        ])).unwrap();
        assert_eq!(statuses[0].power_usage_in_wh, Some(55.9));

        let port: SwitchPortConfig = serde_json::from_value(json!({
            "portId": "5", "name": "AP port", "enabled": false, "poeEnabled": true
        })).unwrap();
        assert!(!port.enabled);
    }
}
