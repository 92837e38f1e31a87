//! Dominio del control de estado administrativo de puertos.


use std::future::Future;
use clap::ValueEnum;
use crate::connectors::error::ConnectorError;
use crate::dataset::domain::Platform;


/// Estado administrativo deseado para un puerto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AdminState {
    Up,
    Down,
}


impl AdminState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminState::Up => "UP",
            AdminState::Down => "DOWN",
        }
    }

    pub fn enabled(&self) -> bool {
        matches!(self, AdminState::Up)
    }
}


/// Puerto a modificar, tal como quedó guardado en el snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PortTarget {
    pub platform: Platform,
    /// Uuid del switch en Catalyst, serial en Meraki.
    pub switch_id: String,
    /// Uuid de interfaz en Catalyst, número de puerto en Meraki.
    pub port_id: String,
    pub port_name: String,
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlOutcome {
    Changed,
    /// El puerto ya estaba en el estado pedido. Informativo, no es un fallo.
    AlreadyInState,
}


/// Resultado de una fila del snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Applied(ControlOutcome),
    Skipped(String),
    Failed(String),
}


/// Cliente capaz de fijar el estado administrativo de un puerto.
pub trait PortAdmin {
    fn set_admin_state(&self, target: &PortTarget, state: AdminState)
        -> impl Future<Output = Result<ControlOutcome, ConnectorError>> + Send;
}
