//! Módulo de configuración central y gestión del entorno de ejecución.
//!
//! Este módulo actúa como la fuente única de verdad para la configuración de la aplicación.
//! Se encarga de leer las variables de entorno, establecer valores por defecto
//! y proveer las estructuras necesarias para iniciar los subsistemas (controladores, logging).
//!
//! # Funcionalidades Principales
//! * **Carga de Configuración:** Lee de `.env` en desarrollo y variables de sistema en producción.
//! * **Observabilidad:** Configura `tracing_subscriber` para logs estructurados o legibles.
//! * **Plataformas opcionales:** Un controlador sin credenciales queda deshabilitado.
//!


use std::env;
use std::time::Duration;
use chrono_tz::Tz;
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use crate::config::meraki::BASE_URL as MERAKI_BASE_URL;
use crate::config::topology::AP_FAMILY;
use crate::topology::domain::{LabelAllowList, MappingScope};


/// Errores de configuración detectados al arrancar.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SystemError {
    #[error("{name} debe ser un número (valor: {value})")]
    NotANumber { name: &'static str, value: String },

    #[error("{name} debe ser mayor que cero")]
    Zero { name: &'static str },

    #[error("zona horaria desconocida: {0}")]
    Timezone(String),
}


/// Credenciales y opciones del controlador Catalyst Center.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalystSettings {
    /// Host del controlador, sin esquema (ej. `sandboxdnac.cisco.com`).
    pub host: String,
    pub username: String,
    pub password: String,
    /// Validar el certificado TLS. Por defecto: `false` (certificados autofirmados).
    pub verify_tls: bool,
}


/// Credenciales y alcance del Dashboard de Meraki.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerakiSettings {
    pub api_key: String,
    pub base_url: String,
    /// Nombre de la organización a consultar.
    pub organization: String,
    /// Nombres de red permitidos dentro de la organización.
    pub networks: Vec<String>,
}


/// Representa la configuración global del sistema y el estado del entorno.
#[derive(Debug, Clone)]
pub struct System {
    /// `None` si faltan `CC_HOST`, `CC_USERNAME` o `CC_PASSWORD`.
    pub catalyst: Option<CatalystSettings>,

    /// `None` si falta `MERAKI_DASHBOARD_API_KEY` o `MERAKI_ORG`.
    pub meraki: Option<MerakiSettings>,

    /// Familia de AP y lista de etiquetas permitidas para la correlación.
    pub scope: MappingScope,

    /// Intervalo entre ticks de recolección.
    /// Por defecto: `60` segundos.
    pub poll_interval: Duration,

    /// Timeout de cada petición HTTP.
    /// Por defecto: `30` segundos.
    pub request_timeout: Duration,

    /// Plazo máximo por plataforma dentro de un tick.
    /// Por defecto: `45` segundos.
    pub tick_deadline: Duration,

    /// Zona horaria de las marcas de tiempo persistidas.
    pub timezone: Tz,

    /// Entorno de ejecución actual (`development`, `staging`, `production`).
    /// Afecta el formato de logs y la carga de archivos `.env`.
    pub environment: String,

    /// Nivel de detalle de los logs (ej. `info`, `debug`, `warn`).
    /// Se autoconfigura según el `environment` si no se especifica.
    pub rust_log: String,
}


impl System {

    /// Carga la configuración desde las variables de entorno.
    ///
    /// # Comportamiento
    /// * Si `ENVIRONMENT` es "development", intenta cargar un archivo `.env`.
    /// * Establece valores por defecto para variables opcionales.
    ///
    /// # Errores
    /// * Si las variables numéricas no son números válidos o son cero.
    /// * Si `TIMEZONE` no es una zona IANA conocida.
    pub fn new() -> Result<Self, SystemError> {

        let environment = env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "development".into());

        if environment == "development" {
            dotenv::dotenv().ok();
        }

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Construye la configuración a partir de una función de búsqueda de variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SystemError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let environment = var("ENVIRONMENT").unwrap_or_else(|| "development".into());

        let catalyst = match (var("CC_HOST"), var("CC_USERNAME"), var("CC_PASSWORD")) {
            (Some(host), Some(username), Some(password)) => Some(CatalystSettings {
                host,
                username,
                password,
                verify_tls: var("CC_VERIFY_TLS")
                    .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                    .unwrap_or(false),
            }),
            _ => None,
        };

        let meraki = match (var("MERAKI_DASHBOARD_API_KEY"), var("MERAKI_ORG")) {
            (Some(api_key), Some(organization)) => Some(MerakiSettings {
                api_key,
                base_url: var("MERAKI_BASE_URL").unwrap_or_else(|| MERAKI_BASE_URL.to_string()),
                organization,
                networks: split_list(var("MERAKI_NETWORKS").as_deref()),
            }),
            _ => None,
        };

        let scope = MappingScope {
            ap_family: var("AP_FAMILY").unwrap_or_else(|| AP_FAMILY.to_string()),
            label_filter: LabelAllowList::new(split_list(var("AP_LABEL_FILTER").as_deref())),
        };

        let timezone_name = var("TIMEZONE").unwrap_or_else(|| "UTC".to_string());
        let timezone: Tz = timezone_name
            .parse()
            .map_err(|_| SystemError::Timezone(timezone_name.clone()))?;

        Ok(System {
            catalyst,
            meraki,
            scope,
            poll_interval: secs("POLL_INTERVAL_SECS", var("POLL_INTERVAL_SECS"), 60)?,
            request_timeout: secs("REQUEST_TIMEOUT_SECS", var("REQUEST_TIMEOUT_SECS"), 30)?,
            tick_deadline: secs("TICK_DEADLINE_SECS", var("TICK_DEADLINE_SECS"), 45)?,
            timezone,
            rust_log: var("RUST_LOG")
                .unwrap_or_else(|| {
                    match environment.as_str() {
                        "development" => "debug".to_string(),
                        "staging" => "info".to_string(),
                        _ => "warn".to_string(),
                    }
                }),
            environment,
        })
    }

    /// Registra qué plataformas quedaron habilitadas.
    pub fn log_platforms(&self) {
        match &self.catalyst {
            Some(cc) => info!("Info: Catalyst Center habilitado en {}", cc.host),
            None => warn!("Warning: Catalyst Center deshabilitado (faltan CC_HOST/CC_USERNAME/CC_PASSWORD)"),
        }
        match &self.meraki {
            Some(m) => info!("Info: Meraki habilitado para la organización {}", m.organization),
            None => warn!("Warning: Meraki deshabilitado (faltan MERAKI_DASHBOARD_API_KEY/MERAKI_ORG)"),
        }
    }
}


fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}


fn secs(name: &'static str, raw: Option<String>, default: u64) -> Result<Duration, SystemError> {
    let value = match raw {
        Some(v) => v
            .trim()
            .parse::<u64>()
            .map_err(|_| SystemError::NotANumber { name, value: v.clone() })?,
        None => default,
    };
    if value == 0 {
        return Err(SystemError::Zero { name });
    }
    Ok(Duration::from_secs(value))
}


/// Inicializa el sistema de trazabilidad y logs (Tracing).
///
/// Configura el formato de salida basándose en el entorno:
/// * **Production**: Salida JSON (para logs estructurados en la nube).
/// * **Development/Otros**: Salida "Pretty" (colores y formato legible).
pub fn init_tracing(system: &System) {

    let filter = EnvFilter::try_new(&system.rust_log)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = fmt().with_env_filter(filter).with_target(false);

    if system.environment == "production" {
        builder.json().init();
    } else {
        builder.pretty().init();
    }
}
