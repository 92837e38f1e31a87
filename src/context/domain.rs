//! Contexto de Aplicación (estado compartido).
//!
//! Agrupa la configuración y los clientes de los controladores habilitados para
//! que las tareas los reciban explícitamente en lugar de usar estado global.


use std::sync::Arc;
use crate::connectors::catalyst::CatalystClient;
use crate::connectors::error::ConnectorError;
use crate::connectors::meraki::MerakiClient;
use crate::system::domain::System;


#[derive(Clone)]
pub struct AppContext {
    pub system: Arc<System>,
    pub catalyst: Option<Arc<CatalystClient>>,
    pub meraki: Option<Arc<MerakiClient>>,
}


impl AppContext {
    /// Crea los clientes de las plataformas configuradas.
    pub fn new(system: Arc<System>) -> Result<Self, ConnectorError> {
        let catalyst = match &system.catalyst {
            Some(settings) => Some(Arc::new(CatalystClient::new(settings, system.request_timeout)?)),
            None => None,
        };
        let meraki = match &system.meraki {
            Some(settings) => Some(Arc::new(MerakiClient::new(settings, system.request_timeout)?)),
            None => None,
        };
        Ok(Self { system, catalyst, meraki })
    }
}
