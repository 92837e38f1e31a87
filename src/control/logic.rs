//! Aplicación del estado administrativo a los puertos guardados en el snapshot.
//!
//! Cada fila se despacha a su plataforma por la etiqueta guardada. Ninguna fila
//! interrumpe a las demás: los fallos y los puertos ya en el estado pedido se
//! reportan por fila.


use std::collections::HashSet;
use tracing::{info, warn};
use super::domain::{AdminState, ControlOutcome, PortAdmin, PortTarget, RowOutcome};
use crate::dataset::domain::{Platform, PortRecord};


/// Convierte las filas del snapshot en destinos únicos.
///
/// El snapshot es de sólo anexado, por lo que un mismo puerto puede aparecer en
/// varias capturas. Las filas con plataforma desconocida se devuelven aparte.
pub fn unique_targets(rows: &[PortRecord]) -> (Vec<PortTarget>, Vec<PortRecord>) {
    let mut seen = HashSet::new();
    let mut targets = Vec::new();
    let mut unknown = Vec::new();

    for row in rows {
        let Some(platform) = Platform::from_tag(&row.platform) else {
            unknown.push(row.clone());
            continue;
        };
        let target = PortTarget {
            platform,
            switch_id: row.switch_id.clone(),
            port_id: row.port_id.clone(),
            port_name: row.port_name.clone(),
        };
        if seen.insert((platform, target.switch_id.clone(), target.port_id.clone())) {
            targets.push(target);
        }
    }

    (targets, unknown)
}


async fn apply_one<A: PortAdmin>(admin: Option<&A>, target: &PortTarget, state: AdminState) -> RowOutcome {
    let Some(admin) = admin else {
        return RowOutcome::Skipped(format!("{} no está configurado", target.platform.as_str()));
    };
    match admin.set_admin_state(target, state).await {
        Ok(outcome) => {
            match outcome {
                ControlOutcome::Changed => info!("Info: puerto {} ({}) cambiado a {}", target.port_name, target.port_id, state.as_str()),
                ControlOutcome::AlreadyInState => info!("Info: puerto {} ({}) ya está {}", target.port_name, target.port_id, state.as_str()),
            }
            RowOutcome::Applied(outcome)
        }
        Err(e) => {
            warn!("Warning: no se pudo cambiar el puerto {} ({}): {}", target.port_name, target.port_id, e);
            RowOutcome::Failed(e.to_string())
        }
    }
}


/// Aplica `state` a cada puerto único del snapshot, en orden.
///
/// # Argumentos
/// * `catalyst` / `meraki`: clientes de cada plataforma; `None` si está deshabilitada.
pub async fn apply_admin_state<C, M>(rows: &[PortRecord],
                                     state: AdminState,
                                     catalyst: Option<&C>,
                                     meraki: Option<&M>) -> Vec<(PortTarget, RowOutcome)>
where
    C: PortAdmin,
    M: PortAdmin,
{
    let (targets, unknown) = unique_targets(rows);
    for row in &unknown {
        warn!("Warning: fila con plataforma desconocida '{}' (puerto {}), omitida", row.platform, row.port_id);
    }

    let mut results = Vec::with_capacity(targets.len());
    for target in targets {
        let outcome = match target.platform {
            Platform::Catalyst => apply_one(catalyst, &target, state).await,
            Platform::Meraki => apply_one(meraki, &target, state).await,
        };
        results.push((target, outcome));
    }
    results
}
