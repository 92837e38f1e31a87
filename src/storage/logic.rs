use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use super::domain::CsvLog;
use crate::dataset::domain::{PoeLogRow, PowerRecord};


/// Único escritor del log de consumo: anexa cada lote recibido del bucle de recolección.
pub async fn store_task(mut rx: mpsc::Receiver<Vec<PowerRecord>>,
                        log: CsvLog) {

    while let Some(batch) = rx.recv().await {
        persist_batch(&log, &batch);
    }
    info!("Info: tarea de almacenamiento finalizada");
}


/// Anexa un lote al log. Un lote vacío o un error de escritura sólo se registran.
pub fn persist_batch(log: &CsvLog, batch: &[PowerRecord]) {
    if batch.is_empty() {
        warn!("Warning: no hay datos para actualizar");
        return;
    }
    let rows: Vec<PoeLogRow> = batch.iter().map(PoeLogRow::from).collect();
    match log.append(&rows) {
        Ok(count) => info!("Info: {} filas anexadas a {}", count, log.path().display()),
        Err(e) => error!("Error: no se pudo anexar el lote. {e}"),
    }
}


pub fn start_store(rx_from_poll: mpsc::Receiver<Vec<PowerRecord>>,
                   log: CsvLog) -> JoinHandle<()> {

    tokio::spawn(async move {
        store_task(rx_from_poll,
                   log
        ).await;
    })
}


/// Detiene al productor y espera a que la tarea de almacenamiento escriba los
/// lotes que quedaron en el canal.
///
/// Cancelar `producer` libera su emisor; la tarea de almacenamiento termina
/// cuando el canal queda vacío y sin emisores.
pub async fn drain_store(producer: JoinHandle<()>, store: JoinHandle<()>) {
    producer.abort();
    let _ = producer.await;

    if let Err(e) = store.await {
        error!("Error: la tarea de almacenamiento terminó de forma anormal. {e}");
    }
}
