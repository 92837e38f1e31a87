//! Construcción del dataset de cada tick.
//!
//! Une la salida del mapeo de topología y del enriquecimiento PoE (Catalyst) con
//! las asociaciones de un solo salto (Meraki) en filas planas con una marca de
//! tiempo común. Ningún error cruza este módulo hacia el bucle de recolección:
//! una plataforma que falla o excede su plazo simplemente no aporta filas.


use std::collections::HashMap;
use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use tokio::time::timeout;
use tracing::{error, info, instrument, warn};
use super::domain::{CatalystSource, MerakiSource, Platform, PortRecord, PowerRecord};
use crate::access::logic::{build_port_mappings, group_by_role};
use crate::access::domain::MerakiPortMapping;
use crate::connectors::error::ConnectorError;
use crate::context::domain::AppContext;
use crate::poe::domain::{EnrichedMapping, PoeTable};
use crate::poe::logic::{distinct_switch_ids, enrich_all};
use crate::system::domain::MerakiSettings;
use crate::topology::domain::MappingScope;
use crate::topology::logic::map_topology;


/// Marca de tiempo RFC 3339 en la zona configurada.
pub fn format_timestamp(now: DateTime<Utc>, timezone: Tz) -> String {
    now.with_timezone(&timezone).to_rfc3339_opts(SecondsFormat::Secs, true)
}


/// Correlaciona la topología y enriquece cada asociación con su consumo.
///
/// Un fallo al obtener la topología se propaga; un fallo al obtener la tabla PoE
/// de un switch sólo deja sin lectura las asociaciones de ese switch.
pub async fn collect_catalyst<S>(source: &S, scope: &MappingScope) -> Result<Vec<EnrichedMapping>, ConnectorError>
where
    S: CatalystSource,
{
    let topology = source.physical_topology().await?;
    let mappings = map_topology(&topology, scope);

    let mut tables: HashMap<String, PoeTable> = HashMap::new();
    for switch_id in distinct_switch_ids(&mappings) {
        match source.poe_table(&switch_id).await {
            Ok(table) => {
                tables.insert(switch_id, table);
            }
            Err(e) => error!("Error: no se pudo obtener el detalle PoE del switch {}: {}", switch_id, e),
        }
    }

    Ok(enrich_all(mappings, &tables))
}


/// Recorre las redes permitidas y arma las asociaciones de puertos con consumo.
///
/// La atribución de AP se hace por red: si una red no tiene exactamente un AP,
/// sus filas quedan sin AP y se registra una advertencia.
pub async fn collect_meraki<S>(source: &S, settings: &MerakiSettings) -> Result<Vec<MerakiPortMapping>, ConnectorError>
where
    S: MerakiSource,
{
    let organization_id = source.organization_id(&settings.organization).await?;
    let network_ids = source.network_ids(&organization_id, &settings.networks).await?;

    if network_ids.is_empty() {
        warn!("Warning: ninguna red de {} coincide con {:?}", settings.organization, settings.networks);
    }

    let mut mappings = Vec::new();
    for network_id in network_ids {
        let devices = match source.network_devices(&network_id).await {
            Ok(devices) => devices,
            Err(e) => {
                error!("Error: no se pudieron obtener los dispositivos de la red {}: {}", network_id, e);
                continue;
            }
        };

        let groups = group_by_role(devices);
        let switches = match groups.switches() {
            Ok(switches) => switches,
            Err(e) => {
                warn!("Warning: red {} sin filas: {}", network_id, e);
                continue;
            }
        };
        for switch in switches {
            match source.port_statuses(&switch.serial).await {
                Ok(ports) => mappings.extend(build_port_mappings(switch, &ports, groups.sole_access_point())),
                Err(e) => error!("Error: no se pudo obtener el estado de puertos de {}: {}", switch.serial, e),
            }
        }
    }

    Ok(mappings)
}


pub fn catalyst_records(enriched: Vec<EnrichedMapping>, timestamp: &str) -> Vec<PowerRecord> {
    enriched
        .into_iter()
        .map(|EnrichedMapping { mapping, watts }| PowerRecord {
            platform: Platform::Catalyst,
            timestamp: timestamp.to_string(),
            switch_name: mapping.switch_label,
            switch_id: mapping.switch_id,
            port_id: mapping.interface_id.unwrap_or_default(),
            port_name: mapping.interface_name.unwrap_or_default(),
            watts,
            ap_name: mapping.ap_label,
            ap_id: mapping.ap_id,
        })
        .collect()
}


pub fn meraki_records(mappings: Vec<MerakiPortMapping>, timestamp: &str) -> Vec<PowerRecord> {
    mappings
        .into_iter()
        .map(|m| PowerRecord {
            platform: Platform::Meraki,
            timestamp: timestamp.to_string(),
            switch_name: m.switch_name,
            switch_id: m.switch_serial,
            port_name: m.port_id.clone(),
            port_id: m.port_id,
            watts: m.watts,
            ap_name: m.ap_name,
            ap_id: m.ap_serial,
        })
        .collect()
}


/// Ejecuta la recolección completa de un tick sobre las plataformas habilitadas.
///
/// Cada plataforma tiene su propio plazo (`tick_deadline`), de modo que un
/// controlador lento no impide recolectar el otro.
#[instrument(name = "collect_tick", skip(app_context))]
pub async fn collect_tick(app_context: &AppContext) -> Vec<PowerRecord> {
    let system = &app_context.system;
    let timestamp = format_timestamp(Utc::now(), system.timezone);
    info!("Info: recolección iniciada, timestamp {}", timestamp);

    let mut records = Vec::new();

    if let Some(catalyst) = app_context.catalyst.as_deref() {
        match timeout(system.tick_deadline, collect_catalyst(catalyst, &system.scope)).await {
            Ok(Ok(enriched)) => records.extend(catalyst_records(enriched, &timestamp)),
            Ok(Err(e)) => error!("Error: recolección de Catalyst Center fallida: {}", e),
            Err(_) => warn!("Warning: Catalyst Center excedió el plazo de {:?}", system.tick_deadline),
        }
    }

    if let (Some(meraki), Some(settings)) = (app_context.meraki.as_deref(), system.meraki.as_ref()) {
        match timeout(system.tick_deadline, collect_meraki(meraki, settings)).await {
            Ok(Ok(mappings)) => records.extend(meraki_records(mappings, &timestamp)),
            Ok(Err(e)) => error!("Error: recolección de Meraki fallida: {}", e),
            Err(_) => warn!("Warning: Meraki excedió el plazo de {:?}", system.tick_deadline),
        }
    }

    records
}


/// Filas del snapshot de puertos: el mismo dataset sin telemetría.
pub fn port_records(records: &[PowerRecord]) -> Vec<PortRecord> {
    records.iter().map(PortRecord::from).collect()
}
