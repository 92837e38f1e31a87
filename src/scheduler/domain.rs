//! Temporizador de ticks de recolección.
//!
//! Emite `Event::Tick` a intervalo fijo. Si el bucle de recolección tarda más que
//! el intervalo, los ticks esperan en el canal y se procesan en serie.


use tokio::sync::mpsc;
use tokio::time::{interval, Duration};


pub enum Event {
    /// Toca recolectar.
    Tick,
    /// Comando interno para iniciar el temporizador con el período dado.
    InitTimer(Duration),
}


pub async fn tick_timer(tx_to_poll: mpsc::Sender<Event>,
                        mut cmd_rx: mpsc::Receiver<Event>) {

    let period = loop {
        match cmd_rx.recv().await {
            Some(Event::InitTimer(d)) => break d,
            None => return, // Canal cerrado, terminar tarea
            _ => continue,
        }
    };

    // El primer tick de `interval` se completa de inmediato
    let mut ticker = interval(period);
    loop {
        ticker.tick().await;
        if tx_to_poll.send(Event::Tick).await.is_err() {
            break;
        }
    }
}


pub fn start_timer(tx_to_poll: mpsc::Sender<Event>,
                   rx_from_poll: mpsc::Receiver<Event>) {

    tokio::spawn(async move {
        tick_timer(
            tx_to_poll,
            rx_from_poll
        ).await;
    });
}
