//! Registros planos que se persisten en los archivos CSV y las fuentes de datos
//! de cada plataforma.
//!
//! Las fuentes (`CatalystSource`, `MerakiSource`) abstraen a los clientes HTTP:
//! la lógica de construcción del dataset sólo recibe datos ya obtenidos.


use std::future::Future;
use serde::{Deserialize, Serialize};
use crate::access::domain::{AccessDevice, SwitchPortStatus};
use crate::connectors::error::ConnectorError;
use crate::poe::domain::PoeTable;
use crate::topology::domain::PhysicalTopology;


/// Plataforma de origen de un registro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Catalyst,
    Meraki,
}


impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Catalyst => "catalyst",
            Platform::Meraki => "meraki",
        }
    }

    /// Interpreta la etiqueta guardada en un snapshot. Acepta también las
    /// etiquetas antiguas (`cc`, `catalyst center`).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "catalyst" | "cc" | "catalyst center" => Some(Platform::Catalyst),
            "meraki" => Some(Platform::Meraki),
            _ => None,
        }
    }
}


/// Lectura de consumo de un puerto en un tick. Se persiste como `PoeLogRow`;
/// `port_name` sólo llega al snapshot de puertos.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PowerRecord {
    pub platform: Platform,
    pub timestamp: String,
    pub switch_name: String,
    pub switch_id: String,
    pub port_id: String,
    pub port_name: String,
    /// Vacío en el CSV si no hubo lectura.
    pub watts: Option<f64>,
    pub ap_name: String,
    pub ap_id: String,
}


/// Fila tal como se escribe en el log de consumo. El orden de los campos fija
/// las columnas del CSV: `platform,timestamp,switch_name,switch_id,watts,port_id,ap_name,ap_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PoeLogRow {
    pub platform: Platform,
    pub timestamp: String,
    pub switch_name: String,
    pub switch_id: String,
    pub watts: Option<f64>,
    pub port_id: String,
    pub ap_name: String,
    pub ap_id: String,
}


impl From<&PowerRecord> for PoeLogRow {
    fn from(record: &PowerRecord) -> Self {
        Self {
            platform: record.platform,
            timestamp: record.timestamp.clone(),
            switch_name: record.switch_name.clone(),
            switch_id: record.switch_id.clone(),
            watts: record.watts,
            port_id: record.port_id.clone(),
            ap_name: record.ap_name.clone(),
            ap_id: record.ap_id.clone(),
        }
    }
}


/// Fila del snapshot de puertos. Sin telemetría ni marca de tiempo.
///
/// `platform` se guarda como texto para tolerar snapshots con etiquetas desconocidas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PortRecord {
    pub platform: String,
    pub switch_name: String,
    pub switch_id: String,
    pub port_id: String,
    pub port_name: String,
    pub ap_name: String,
    pub ap_id: String,
}


impl From<&PowerRecord> for PortRecord {
    fn from(record: &PowerRecord) -> Self {
        Self {
            platform: record.platform.as_str().to_string(),
            switch_name: record.switch_name.clone(),
            switch_id: record.switch_id.clone(),
            port_id: record.port_id.clone(),
            port_name: record.port_name.clone(),
            ap_name: record.ap_name.clone(),
            ap_id: record.ap_id.clone(),
        }
    }
}


/// Fuente de topología y telemetría PoE de Catalyst Center.
pub trait CatalystSource {
    fn physical_topology(&self) -> impl Future<Output = Result<PhysicalTopology, ConnectorError>> + Send;

    /// Tabla PoE completa de un switch.
    fn poe_table(&self, switch_id: &str) -> impl Future<Output = Result<PoeTable, ConnectorError>> + Send;
}


/// Fuente de inventario y estado de puertos del Dashboard de Meraki.
pub trait MerakiSource {
    fn organization_id(&self, name: &str) -> impl Future<Output = Result<String, ConnectorError>> + Send;

    /// Ids de las redes de la organización cuyo nombre está en `names`.
    /// Si `names` está vacío se devuelven todas.
    fn network_ids(&self, organization_id: &str, names: &[String])
        -> impl Future<Output = Result<Vec<String>, ConnectorError>> + Send;

    fn network_devices(&self, network_id: &str) -> impl Future<Output = Result<Vec<AccessDevice>, ConnectorError>> + Send;

    fn port_statuses(&self, serial: &str) -> impl Future<Output = Result<Vec<SwitchPortStatus>, ConnectorError>> + Send;
}
