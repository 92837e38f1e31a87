use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use crate::topology::domain::AccessPointMapping;


/// Lectura de consumo PoE de una interfaz de switch.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PoeReading {
    #[serde(rename = "interfaceName")]
    pub interface_name: String,
    #[serde(rename = "portPowerDrawn", default, deserialize_with = "lenient_watts")]
    pub watts_drawn: Option<f64>,
}


/// Tabla completa de consumo por interfaz de un switch.
pub type PoeTable = Vec<PoeReading>;


/// Asociación enriquecida con el consumo actual. `None` si no hubo lectura.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedMapping {
    pub mapping: AccessPointMapping,
    pub watts: Option<f64>,
}


/// La API devuelve `portPowerDrawn` como número o como cadena numérica.
fn lenient_watts<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}
