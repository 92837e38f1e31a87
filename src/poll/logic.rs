//! Bucle de recolección periódica.
//!
//! Funciona en coordinación con la tarea de temporización:
//! 1. Esta tarea solicita un temporizador (`Event::InitTimer`).
//! 2. El temporizador responde con `Event::Tick` a intervalo fijo.
//! 3. Por cada tick se construye el dataset y se envía el lote a la tarea de
//!    almacenamiento. Los ticks se atienden estrictamente de a uno.


use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};
use crate::context::domain::AppContext;
use crate::dataset::domain::PowerRecord;
use crate::dataset::logic::collect_tick;
use crate::scheduler::domain::Event;


/// Ejecuta el bucle principal de recolección.
///
/// # Argumentos
/// * `tx_event`: Canal para enviar comandos al temporizador.
/// * `tx_records`: Canal hacia la tarea de almacenamiento.
/// * `rx_from_timer`: Canal para recibir los ticks.
/// * `app_context`: Configuración y clientes de los controladores.
#[instrument(
    name = "run_poll_task",
    skip(tx_event, tx_records, rx_from_timer, app_context)
)]
pub async fn run_poll(tx_event: mpsc::Sender<Event>,
                      tx_records: mpsc::Sender<Vec<PowerRecord>>,
                      mut rx_from_timer: mpsc::Receiver<Event>,
                      app_context: AppContext) {

    info!("Info: tarea de recolección creada");

    if tx_event.send(Event::InitTimer(app_context.system.poll_interval)).await.is_err() {
        error!("Error: no se pudo iniciar el temporizador");
        return;
    }

    while let Some(event) = rx_from_timer.recv().await {
        debug!("Debug: evento entrante del temporizador");
        if let Event::Tick = event {
            let records = collect_tick(&app_context).await;
            if tx_records.send(records).await.is_err() {
                error!("Error: no se pudo enviar el lote a la tarea de almacenamiento");
            }
        }
    }
    info!("Info: tarea de recolección finalizada");
}


/// Inicializa y ejecuta la tarea de recolección en segundo plano.
pub fn start_poll(to_timer: mpsc::Sender<Event>,
                  to_store: mpsc::Sender<Vec<PowerRecord>>,
                  from_timer: mpsc::Receiver<Event>,
                  ctx: AppContext) -> JoinHandle<()> {

    info!("Info: iniciando tarea de recolección");
    tokio::spawn(async move {
        run_poll(
            to_timer,
            to_store,
            from_timer,
            ctx,
        ).await;
    })
}
