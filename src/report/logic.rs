//! Reporte de inventario de switches de ambas plataformas.


use comfy_table::Table;
use crate::access::domain::AccessDevice;
use crate::connectors::catalyst::{CatalystClient, NetworkDevice};
use crate::connectors::error::ConnectorError;
use crate::connectors::meraki::MerakiClient;
use crate::dataset::domain::MerakiSource;


/// Fila del reporte: nombre, plataforma, IP de gestión y versión de software.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryRow {
    pub hostname: String,
    pub platform: String,
    pub mgmt_ip: String,
    pub version: String,
}


impl From<NetworkDevice> for InventoryRow {
    fn from(device: NetworkDevice) -> Self {
        Self {
            hostname: device.hostname.unwrap_or_default(),
            platform: device.platform_id.unwrap_or_default(),
            mgmt_ip: device.management_ip_address.unwrap_or_default(),
            version: device.software_version.unwrap_or_default(),
        }
    }
}


impl From<AccessDevice> for InventoryRow {
    fn from(device: AccessDevice) -> Self {
        Self {
            hostname: device.display_name().to_string(),
            platform: device.model,
            mgmt_ip: device.lan_ip.unwrap_or_default(),
            version: device.firmware,
        }
    }
}


pub async fn catalyst_inventory(client: &CatalystClient) -> Result<Vec<InventoryRow>, ConnectorError> {
    Ok(client.switches().await?.into_iter().map(InventoryRow::from).collect())
}


pub async fn meraki_inventory(client: &MerakiClient, organization: &str) -> Result<Vec<InventoryRow>, ConnectorError> {
    let organization_id = client.organization_id(organization).await?;
    let devices = client.organization_devices(&organization_id).await?;
    Ok(switch_rows(devices))
}


/// Sólo los dispositivos cuyo `productType` es `switch`.
fn switch_rows(devices: Vec<AccessDevice>) -> Vec<InventoryRow> {
    devices
        .into_iter()
        .filter(|device| device.product_type.as_deref() == Some("switch"))
        .map(InventoryRow::from)
        .collect()
}


pub fn render_report(title: &str, rows: &[InventoryRow]) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Name", "Platform", "Management IP", "SW/FW version"]);
    for row in rows {
        table.add_row(vec![&row.hostname, &row.platform, &row.mgmt_ip, &row.version]);
    }
    format!("\n*** MY REPORT: {} ***\n\n{}", title, table)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switch_rows_filters_product_type() {
        let devices: Vec<AccessDevice> = serde_json::from_value(serde_json::json!([
            {"serial": "Q2SW-1", "name": "core", "model": "MS120-8LP", "firmware": "switch-15-21",
             "lanIp": "10.0.0.2", "productType": "switch"},
            {"serial": "Q2AP-1", "model": "MR36", "firmware": "wireless-29-5", "productType": "wireless"}
        ])).unwrap();

        let rows = switch_rows(devices);

        assert_eq!(rows, vec![InventoryRow {
            hostname: "core".to_string(),
            platform: "MS120-8LP".to_string(),
            mgmt_ip: "10.0.0.2".to_string(),
            version: "switch-15-21".to_string(),
        }]);
    }

    #[test]
    fn test_render_report() {
        let rows = vec![InventoryRow::from(NetworkDevice {
            hostname: Some("sw-a".to_string()),
            platform_id: Some("C9300-48P".to_string()),
            management_ip_address: Some("10.10.20.81".to_string()),
            software_version: Some("17.9.4".to_string()),
        })];

        let output = render_report("Catalyst Center managed switches", &rows);

        assert!(output.contains("*** MY REPORT: Catalyst Center managed switches ***"));
        assert!(output.contains("Management IP"));
        assert!(output.contains("C9300-48P"));
        assert!(output.contains("10.10.20.81"));
    }
}
