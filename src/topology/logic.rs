//! Correlación de la topología física en asociaciones AP -> puerto de switch.
//!
//! # Algoritmo
//! 1. Se filtran los nodos cuya `family` contiene la etiqueta de AP.
//! 2. Por cada AP se recorren todos los enlaces donde aparece como `source` o `target`.
//! 3. Se resuelve la orientación: si el AP es `source`, el switch es `target` y los
//!    campos de puerto son los `end*`; si el AP es `target`, se usan los `start*`.
//! 4. El switch se resuelve por id en el conjunto de nodos. Las referencias colgantes
//!    se descartan sin error.
//! 5. Se aplica el predicado de alcance sobre cada asociación resultante.


use std::collections::HashMap;
use tracing::debug;
use super::domain::{AccessPointMapping, MappingScope, PhysicalTopology, TopologyLink, TopologyNode};


/// Extremo del enlace opuesto al AP, con los campos de puerto ya orientados.
struct SwitchSide<'a> {
    switch_id: &'a str,
    interface_id: Option<&'a String>,
    interface_name: Option<&'a String>,
}


fn switch_side<'a>(link: &'a TopologyLink, ap_id: &str) -> Option<SwitchSide<'a>> {
    if link.source == ap_id {
        Some(SwitchSide {
            switch_id: &link.target,
            interface_id: link.end_port_id.as_ref(),
            interface_name: link.end_port_name.as_ref(),
        })
    } else if link.target == ap_id {
        Some(SwitchSide {
            switch_id: &link.source,
            interface_id: link.start_port_id.as_ref(),
            interface_name: link.start_port_name.as_ref(),
        })
    } else {
        None
    }
}


/// Deriva todas las asociaciones AP -> puerto que cumplen `keep`.
///
/// El orden de salida sigue el orden de los nodos y luego el de los enlaces,
/// por lo que dos pasadas sobre los mismos datos producen la misma secuencia.
///
/// # Argumentos
/// * `ap_family`: etiqueta de familia que identifica a un AP (sensible a mayúsculas).
/// * `keep`: predicado enchufable aplicado a cada asociación (p. ej. lista de etiquetas).
pub fn derive_mappings<F>(nodes: &[TopologyNode],
                          links: &[TopologyLink],
                          ap_family: &str,
                          keep: F) -> Vec<AccessPointMapping>
where
    F: Fn(&AccessPointMapping) -> bool,
{
    let by_id: HashMap<&str, &TopologyNode> = nodes
        .iter()
        .map(|node| (node.id.as_str(), node))
        .collect();

    let mut mappings = Vec::new();

    for ap in nodes.iter().filter(|node| node.family.contains(ap_family)) {
        for link in links {
            let Some(side) = switch_side(link, &ap.id) else {
                continue;
            };

            let Some(switch) = by_id.get(side.switch_id) else {
                debug!("Debug: enlace de {} hacia nodo inexistente {}, descartado", ap.label, side.switch_id);
                continue;
            };

            let mapping = AccessPointMapping {
                ap_id: ap.id.clone(),
                ap_label: ap.label.clone(),
                ap_platform_id: ap.platform_id.clone(),
                switch_id: switch.id.clone(),
                switch_label: switch.label.clone(),
                interface_id: side.interface_id.cloned(),
                interface_name: side.interface_name.cloned(),
            };

            if keep(&mapping) {
                mappings.push(mapping);
            }
        }
    }

    mappings
}


/// Variante de `derive_mappings` que aplica un `MappingScope` de configuración.
pub fn map_topology(topology: &PhysicalTopology, scope: &MappingScope) -> Vec<AccessPointMapping> {
    derive_mappings(&topology.nodes,
                    &topology.links,
                    &scope.ap_family,
                    |mapping| scope.label_filter.allows(&mapping.ap_label))
}


#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use super::*;
    use crate::topology::domain::LabelAllowList;

    fn node(id: &str, family: &str, label: &str, platform_id: &str) -> TopologyNode {
        TopologyNode {
            id: id.to_string(),
            label: label.to_string(),
            family: family.to_string(),
            platform_id: platform_id.to_string(),
        }
    }

    fn link(source: &str, target: &str, start: (&str, &str), end: (&str, &str)) -> TopologyLink {
        TopologyLink {
            source: source.to_string(),
            target: target.to_string(),
            start_port_id: Some(start.0.to_string()),
            start_port_name: Some(start.1.to_string()),
            end_port_id: Some(end.0.to_string()),
            end_port_name: Some(end.1.to_string()),
        }
    }

    fn all(_: &AccessPointMapping) -> bool {
        true
    }

    #[test]
    fn test_end_to_end_example() {
        let nodes = vec![
            node("ap1", "Unified AP", "Skog-AP1", "C9120"),
            node("sw1", "Switches", "SW-A", ""),
        ];
        let links = vec![TopologyLink {
            source: "ap1".to_string(),
            target: "sw1".to_string(),
            end_port_id: Some("p1".to_string()),
            end_port_name: Some("Gi1/0/1".to_string()),
            ..Default::default()
        }];

        let mappings = derive_mappings(&nodes, &links, "Unified AP", all);

        assert_eq!(mappings, vec![AccessPointMapping {
            ap_id: "ap1".to_string(),
            ap_label: "Skog-AP1".to_string(),
            ap_platform_id: "C9120".to_string(),
            switch_id: "sw1".to_string(),
            switch_label: "SW-A".to_string(),
            interface_id: Some("p1".to_string()),
            interface_name: Some("Gi1/0/1".to_string()),
        }]);
    }

    #[test]
    fn test_ap_as_source_uses_end_fields() {
        let nodes = vec![node("ap1", "Unified AP", "AP", ""), node("sw1", "Switches", "SW", "")];
        let links = vec![link("ap1", "sw1", ("ap-port", "Gi0"), ("X", "Gi1/0/7"))];

        let mappings = derive_mappings(&nodes, &links, "Unified AP", all);

        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].interface_id.as_deref(), Some("X"));
        assert_eq!(mappings[0].interface_name.as_deref(), Some("Gi1/0/7"));
    }

    #[test]
    fn test_ap_as_target_uses_start_fields() {
        let nodes = vec![node("ap1", "Unified AP", "AP", ""), node("sw1", "Switches", "SW", "")];
        let links = vec![link("sw1", "ap1", ("Y", "Gi1/0/9"), ("ap-port", "Gi0"))];

        let mappings = derive_mappings(&nodes, &links, "Unified AP", all);

        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].switch_id, "sw1");
        assert_eq!(mappings[0].interface_id.as_deref(), Some("Y"));
        assert_eq!(mappings[0].interface_name.as_deref(), Some("Gi1/0/9"));
    }

    #[test]
    fn test_ap_without_links_yields_nothing() {
        let nodes = vec![node("ap1", "Unified AP", "AP", ""), node("sw1", "Switches", "SW", "")];
        let links = vec![link("sw1", "router", ("a", "a"), ("b", "b"))];

        assert!(derive_mappings(&nodes, &links, "Unified AP", all).is_empty());
    }

    #[test]
    fn test_dangling_switch_is_dropped() {
        let nodes = vec![node("ap1", "Unified AP", "AP", ""), node("sw1", "Switches", "SW", "")];
        let links = vec![
            link("ap1", "ghost", ("a", "a"), ("b", "b")),
            link("ap1", "sw1", ("a", "a"), ("p2", "Gi1/0/2")),
        ];
        let node_ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();

        let mappings = derive_mappings(&nodes, &links, "Unified AP", all);

        assert_eq!(mappings.len(), 1);
        assert!(mappings.iter().all(|m| node_ids.contains(m.switch_id.as_str())));
    }

    #[test]
    fn test_redundant_cabling_yields_one_mapping_per_link() {
        let nodes = vec![node("ap1", "Unified AP", "AP", ""), node("sw1", "Switches", "SW", "")];
        let links = vec![
            link("ap1", "sw1", ("a", "a"), ("p1", "Gi1/0/1")),
            link("sw1", "ap1", ("p2", "Gi1/0/2"), ("b", "b")),
        ];

        let mappings = derive_mappings(&nodes, &links, "Unified AP", all);

        let ports: Vec<_> = mappings.iter().filter_map(|m| m.interface_id.as_deref()).collect();
        assert_eq!(ports, vec!["p1", "p2"]);
    }

    #[test]
    fn test_switch_fan_out() {
        let nodes = vec![
            node("ap1", "Unified AP", "AP-1", ""),
            node("ap2", "Unified AP", "AP-2", ""),
            node("sw1", "Switches", "SW", ""),
        ];
        let links = vec![
            link("ap1", "sw1", ("a", "a"), ("p1", "Gi1/0/1")),
            link("ap2", "sw1", ("a", "a"), ("p2", "Gi1/0/2")),
        ];

        let mappings = derive_mappings(&nodes, &links, "Unified AP", all);

        assert_eq!(mappings.len(), 2);
        assert!(mappings.iter().all(|m| m.switch_id == "sw1"));
        assert_ne!(mappings[0].ap_id, mappings[1].ap_id);
    }

    #[test]
    fn test_mapping_is_idempotent() {
        let nodes = vec![
            node("ap1", "Unified AP", "AP-1", ""),
            node("ap2", "Unified AP", "AP-2", ""),
            node("sw1", "Switches", "SW", ""),
        ];
        let links = vec![
            link("sw1", "ap2", ("p2", "Gi1/0/2"), ("b", "b")),
            link("ap1", "sw1", ("a", "a"), ("p1", "Gi1/0/1")),
        ];

        let first: HashSet<_> = derive_mappings(&nodes, &links, "Unified AP", all).into_iter().collect();
        let second: HashSet<_> = derive_mappings(&nodes, &links, "Unified AP", all).into_iter().collect();

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_family_match_is_case_sensitive() {
        let nodes = vec![node("ap1", "unified ap", "AP", ""), node("sw1", "Switches", "SW", "")];
        let links = vec![link("ap1", "sw1", ("a", "a"), ("p1", "Gi1/0/1"))];

        assert!(derive_mappings(&nodes, &links, "Unified AP", all).is_empty());
    }

    #[test]
    fn test_scope_label_filter() {
        let topology = PhysicalTopology {
            nodes: vec![
                node("ap1", "Unified AP", "Skog-AP1", ""),
                node("ap2", "Unified AP", "Lobby-AP", ""),
                node("sw1", "Switches", "SW", ""),
            ],
            links: vec![
                link("ap1", "sw1", ("a", "a"), ("p1", "Gi1/0/1")),
                link("ap2", "sw1", ("a", "a"), ("p2", "Gi1/0/2")),
            ],
        };
        let scope = MappingScope {
            label_filter: LabelAllowList::new(["Skog"]),
            ..Default::default()
        };

        let mappings = map_topology(&topology, &scope);

        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].ap_label, "Skog-AP1");
        assert_eq!(map_topology(&topology, &MappingScope::default()).len(), 2);
    }

    #[test]
    fn test_topology_payload_deserialization() {
        let payload = serde_json::json!({
            "nodes": [
                {"id": "ap1", "label": "Skog-AP1", "family": "Unified AP", "platformId": "C9120AXI-E"},
                {"id": "sw1", "label": "SW-A", "family": "Switches and Hubs", "platformId": "C9300-48P"},
                {"id": "cloud", "label": "cloud node"}
            ],
            "links": [
                {"source": "sw1", "target": "ap1", "startPortID": "p9",
                 "startPortName": "GigabitEthernet1/0/9", "endPortName": "GigabitEthernet0"}
            ]
        });

        let topology: PhysicalTopology = serde_json::from_value(payload).unwrap();
        let mappings = map_topology(&topology, &MappingScope::default());

        assert_eq!(topology.nodes[2].family, "");
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].interface_id.as_deref(), Some("p9"));
        assert_eq!(mappings[0].interface_name.as_deref(), Some("GigabitEthernet1/0/9"));
        assert_eq!(mappings[0].ap_platform_id, "C9120AXI-E");
    }
}
