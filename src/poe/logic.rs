//! Enriquecimiento de asociaciones AP -> puerto con el consumo PoE.
//!
//! La telemetría se consulta una vez por switch (tabla completa de interfaces) y
//! luego se cruza localmente con cada asociación por nombre de interfaz.


use std::collections::{BTreeSet, HashMap};
use super::domain::{EnrichedMapping, PoeTable};
use crate::topology::domain::AccessPointMapping;


/// Ids de switch distintos referenciados por las asociaciones, en orden estable.
pub fn distinct_switch_ids(mappings: &[AccessPointMapping]) -> Vec<String> {
    mappings
        .iter()
        .map(|m| m.switch_id.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}


/// Busca en `table` la interfaz de la asociación y devuelve su consumo.
///
/// Una tabla vacía, una interfaz sin nombre o sin coincidencia producen `None`.
pub fn enrich(mapping: AccessPointMapping, table: &PoeTable) -> EnrichedMapping {
    let watts = mapping
        .interface_name
        .as_deref()
        .and_then(|name| table.iter().find(|reading| reading.interface_name == name))
        .and_then(|reading| reading.watts_drawn);

    EnrichedMapping { mapping, watts }
}


/// Enriquece cada asociación con la tabla de su propio switch.
///
/// Los switches ausentes de `tables` (fallo al consultar) dejan `watts` en `None`.
pub fn enrich_all(mappings: Vec<AccessPointMapping>,
                  tables: &HashMap<String, PoeTable>) -> Vec<EnrichedMapping> {
    let empty = PoeTable::new();
    mappings
        .into_iter()
        .map(|mapping| {
            let table = tables.get(&mapping.switch_id).unwrap_or(&empty);
            enrich(mapping, table)
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::poe::domain::PoeReading;

    fn mapping(ap: &str, switch: &str, interface: &str) -> AccessPointMapping {
        AccessPointMapping {
            ap_id: ap.to_string(),
            ap_label: format!("{ap}-label"),
            switch_id: switch.to_string(),
            switch_label: format!("{switch}-label"),
            interface_id: Some(format!("{interface}-id")),
            interface_name: Some(interface.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_enrich_example() {
        let table: PoeTable = serde_json::from_value(serde_json::json!([
            {"interfaceName": "Gi1/0/1", "portPowerDrawn": 7.4}
        ])).unwrap();

        let enriched = enrich(mapping("ap1", "sw1", "Gi1/0/1"), &table);

        assert_eq!(enriched.watts, Some(7.4));
        assert_eq!(enriched.mapping.switch_id, "sw1");
    }

    #[test]
    fn test_enrich_empty_table_is_none() {
        let enriched = enrich(mapping("ap1", "sw1", "Gi1/0/1"), &PoeTable::new());
        assert_eq!(enriched.watts, None);
    }

    #[test]
    fn test_enrich_without_match_is_none() {
        let table = vec![PoeReading { interface_name: "Gi1/0/2".to_string(), watts_drawn: Some(3.0) }];
        assert_eq!(enrich(mapping("ap1", "sw1", "Gi1/0/1"), &table).watts, None);
    }

    #[test]
    fn test_watts_as_string_and_garbage() {
        let table: PoeTable = serde_json::from_value(serde_json::json!([
            {"interfaceName": "Gi1/0/1", "portPowerDrawn": "15.3"},
            {"interfaceName": "Gi1/0/2", "portPowerDrawn": "n/a"},
            {"interfaceName": "Gi1/0/3"}
        ])).unwrap();

        assert_eq!(table[0].watts_drawn, Some(15.3));
        assert_eq!(table[1].watts_drawn, None);
        assert_eq!(table[2].watts_drawn, None);
    }

    #[test]
    fn test_distinct_switch_ids() {
        let mappings = vec![
            mapping("ap1", "sw2", "Gi1/0/1"),
            mapping("ap2", "sw1", "Gi1/0/2"),
            mapping("ap3", "sw2", "Gi1/0/3"),
        ];
        assert_eq!(distinct_switch_ids(&mappings), vec!["sw1", "sw2"]);
    }

    #[test]
    fn test_enrich_all_uses_each_mappings_own_switch() {
        let mappings = vec![mapping("ap1", "sw1", "Gi1/0/1"), mapping("ap2", "sw2", "Gi1/0/1")];
        let mut tables = HashMap::new();
        tables.insert("sw1".to_string(), vec![PoeReading {
            interface_name: "Gi1/0/1".to_string(),
            watts_drawn: Some(4.2),
        }]);
        tables.insert("sw2".to_string(), vec![PoeReading {
            interface_name: "Gi1/0/1".to_string(),
            watts_drawn: Some(11.0),
        }]);

        let watts: Vec<_> = enrich_all(mappings, &tables).into_iter().map(|e| e.watts).collect();
        assert_eq!(watts, vec![Some(4.2), Some(11.0)]);
    }

    #[test]
    fn test_enrich_all_missing_switch_table() {
        let mappings = vec![mapping("ap1", "sw9", "Gi1/0/1")];
        let enriched = enrich_all(mappings, &HashMap::new());
        assert_eq!(enriched.len(), 1);
        assert_eq!(enriched[0].watts, None);
    }
}
