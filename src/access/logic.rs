use tracing::warn;
use super::domain::{AccessDevice, DeviceRole, MerakiPortMapping, RoleError, RoleGroups, SwitchPortStatus};
use crate::config::meraki::CONNECTED_STATUS;


/// Agrupa los dispositivos por rol conservando todos los de cada grupo.
pub fn group_by_role<I>(devices: I) -> RoleGroups
where
    I: IntoIterator<Item = AccessDevice>,
{
    let mut groups = RoleGroups::default();
    for device in devices {
        match device.role() {
            DeviceRole::Switch => groups.switches.push(device),
            DeviceRole::AccessPoint => groups.access_points.push(device),
            DeviceRole::Other => groups.other.push(device),
        }
    }
    groups
}


/// Un puerto es candidato si está conectado, no es uplink y entrega potencia.
pub fn is_powered_access_port(port: &SwitchPortStatus) -> bool {
    port.status == CONNECTED_STATUS
        && !port.is_uplink
        && port.power_usage_in_wh.is_some_and(|wh| wh != 0.0)
}


/// Construye una asociación por cada puerto candidato del switch.
///
/// # Argumentos
/// * `switch`: switch al que pertenecen los estados de puerto.
/// * `ports`: estados reportados por el controlador.
/// * `ap`: resultado de la atribución de AP. Si es un `RoleError` los campos del AP
///   quedan vacíos y se registra una advertencia.
pub fn build_port_mappings(switch: &AccessDevice,
                           ports: &[SwitchPortStatus],
                           ap: Result<&AccessDevice, RoleError>) -> Vec<MerakiPortMapping> {

    let (ap_name, ap_serial) = match ap {
        Ok(device) => (device.display_name().to_string(), device.serial.clone()),
        Err(e) => {
            warn!("Warning: switch {} sin AP atribuible: {}", switch.serial, e);
            (String::new(), String::new())
        }
    };

    ports
        .iter()
        .filter(|port| is_powered_access_port(port))
        .map(|port| MerakiPortMapping {
            switch_name: switch.display_name().to_string(),
            switch_serial: switch.serial.clone(),
            port_id: port.port_id.clone(),
            watts: port.power_usage_in_wh,
            ap_name: ap_name.clone(),
            ap_serial: ap_serial.clone(),
        })
        .collect()
}
