use std::path::PathBuf;
use clap::{Parser, Subcommand};
use crate::config::storage::{POE_LOG_FILE, PORT_SNAPSHOT_FILE};
use crate::control::domain::AdminState;


/// Recolecta el consumo PoE de los APs en Catalyst Center y Meraki, y apaga o
/// enciende sus puertos para ahorrar energía.
#[derive(Debug, Parser)]
#[command(name = "poe_saver", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}


#[derive(Debug, Subcommand)]
pub enum Command {
    /// Recolecta el consumo periódicamente y lo anexa al log CSV.
    Collect {
        #[arg(long, default_value = POE_LOG_FILE)]
        output: PathBuf,
        /// Ejecuta un único tick y termina.
        #[arg(long)]
        once: bool,
    },
    /// Anexa al snapshot los puertos que alimentan APs.
    Snapshot {
        #[arg(long, default_value = PORT_SNAPSHOT_FILE)]
        output: PathBuf,
    },
    /// Cambia el estado administrativo de los puertos del snapshot.
    /// Sin estado, pregunta de forma interactiva.
    Port {
        #[arg(value_enum)]
        state: Option<AdminState>,
        #[arg(long, default_value = PORT_SNAPSHOT_FILE)]
        snapshot: PathBuf,
        /// No pide confirmación antes de apagar los puertos.
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Imprime el inventario de switches de cada plataforma.
    Report,
}
