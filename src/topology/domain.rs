//! Modelos de la topología física reportada por Catalyst Center.
//!
//! Los nodos y enlaces llegan tal cual desde la API de topología y no se
//! modifican durante una pasada de correlación. La salida del mapeo es
//! `AccessPointMapping`, una entrada por cada par (AP, puerto de switch).


use serde::{Deserialize, Serialize};


/// Nodo de la topología (switch, AP, router, nube...).
///
/// Los nodos de tipo nube o desconocidos omiten `family` y `platformId`,
/// por eso se deserializan con valor por defecto.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TopologyNode {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub family: String,
    #[serde(default)]
    pub platform_id: String,
}


/// Enlace entre dos nodos.
///
/// Los identificadores de puerto se guardan por extremo (`start*` corresponde a
/// `source`, `end*` a `target`) y no por rol del dispositivo.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopologyLink {
    pub source: String,
    pub target: String,
    #[serde(default, rename = "startPortID", alias = "startPortId")]
    pub start_port_id: Option<String>,
    #[serde(default, rename = "startPortName")]
    pub start_port_name: Option<String>,
    #[serde(default, rename = "endPortID", alias = "endPortId")]
    pub end_port_id: Option<String>,
    #[serde(default, rename = "endPortName")]
    pub end_port_name: Option<String>,
}


/// Cuerpo `response` de `GET /topology/physical-topology`.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct PhysicalTopology {
    #[serde(default)]
    pub nodes: Vec<TopologyNode>,
    #[serde(default)]
    pub links: Vec<TopologyLink>,
}


/// Asociación AP -> puerto de switch derivada de un enlace.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct AccessPointMapping {
    pub ap_id: String,
    pub ap_label: String,
    pub ap_platform_id: String,
    pub switch_id: String,
    pub switch_label: String,
    pub interface_id: Option<String>,
    pub interface_name: Option<String>,
}


/// Alcance de una pasada de correlación.
///
/// Reemplaza la configuración global por un valor explícito: qué familia
/// identifica a un AP y qué etiquetas de AP se conservan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingScope {
    /// Etiqueta de familia de los APs. Comparación sensible a mayúsculas.
    pub ap_family: String,
    pub label_filter: LabelAllowList,
}


impl Default for MappingScope {
    fn default() -> Self {
        Self {
            ap_family: crate::config::topology::AP_FAMILY.to_string(),
            label_filter: LabelAllowList::default(),
        }
    }
}


/// Lista de subcadenas permitidas en `ap_label`. Vacía = se permite todo.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct LabelAllowList {
    patterns: Vec<String>,
}


impl LabelAllowList {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns = patterns
            .into_iter()
            .map(Into::into)
            .filter(|p: &String| !p.is_empty())
            .collect();
        Self { patterns }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn allows(&self, label: &str) -> bool {
        self.is_empty() || self.patterns.iter().any(|p| label.contains(p.as_str()))
    }
}
