//! Dominio de dispositivos de acceso de Meraki (switches y APs).
//!
//! A diferencia de Catalyst Center, Meraki reporta el estado de los puertos
//! directamente, por lo que la asociación es de un solo salto. Los dispositivos
//! se agrupan por rol explícitamente y las ambigüedades (ningún AP o varios)
//! se exponen como `RoleError` en lugar de sobrescribirse en silencio.


use serde::{Deserialize, Serialize};
use thiserror::Error;


/// Dispositivo devuelto por `GET /networks/{id}/devices`.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccessDevice {
    pub serial: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub firmware: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub lan_ip: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceRole {
    Switch,
    AccessPoint,
    Other,
}


impl AccessDevice {
    /// El rol se deduce del firmware (`switch-...`, `wireless-...`).
    pub fn role(&self) -> DeviceRole {
        if self.firmware.contains("switch") {
            DeviceRole::Switch
        } else if self.firmware.contains("wireless") {
            DeviceRole::AccessPoint
        } else {
            DeviceRole::Other
        }
    }

    /// Nombre para mostrar: el nombre configurado o, si falta, el modelo.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.model,
        }
    }
}


/// Dispositivos de una o varias redes agrupados por rol.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct RoleGroups {
    pub switches: Vec<AccessDevice>,
    pub access_points: Vec<AccessDevice>,
    pub other: Vec<AccessDevice>,
}


#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoleError {
    #[error("no se encontró ningún dispositivo con rol {0:?}")]
    Missing(DeviceRole),

    #[error("se encontraron {count} dispositivos con rol {role:?}, se esperaba uno")]
    Ambiguous { role: DeviceRole, count: usize },
}


impl RoleGroups {
    /// Devuelve el único AP del grupo.
    ///
    /// # Errores
    /// * `RoleError::Missing` si no hay APs.
    /// * `RoleError::Ambiguous` si hay más de uno.
    pub fn sole_access_point(&self) -> Result<&AccessDevice, RoleError> {
        match self.access_points.as_slice() {
            [ap] => Ok(ap),
            [] => Err(RoleError::Missing(DeviceRole::AccessPoint)),
            many => Err(RoleError::Ambiguous { role: DeviceRole::AccessPoint, count: many.len() }),
        }
    }

    /// Switches del grupo; varios son válidos, ninguno es `RoleError::Missing`.
    pub fn switches(&self) -> Result<&[AccessDevice], RoleError> {
        if self.switches.is_empty() {
            Err(RoleError::Missing(DeviceRole::Switch))
        } else {
            Ok(&self.switches)
        }
    }
}


/// Estado de un puerto de switch (`GET /devices/{serial}/switch/ports/statuses`).
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SwitchPortStatus {
    pub port_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub is_uplink: bool,
    #[serde(default)]
    pub power_usage_in_wh: Option<f64>,
}


/// Asociación switch -> puerto -> AP de un solo salto en Meraki.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct MerakiPortMapping {
    pub switch_name: String,
    pub switch_serial: String,
    pub port_id: String,
    pub watts: Option<f64>,
    pub ap_name: String,
    pub ap_serial: String,
}
