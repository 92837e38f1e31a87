use tokio::sync::mpsc;
use crate::config::channels::{RECORDS_CAPACITY, TIMER_CAPACITY};
use crate::dataset::domain::PowerRecord;
use crate::scheduler::domain::Event;


pub struct Channels {
    pub poll_to_timer: mpsc::Sender<Event>,
    pub timer_from_poll: mpsc::Receiver<Event>,

    pub timer_to_poll: mpsc::Sender<Event>,
    pub poll_from_timer: mpsc::Receiver<Event>,

    pub poll_to_store: mpsc::Sender<Vec<PowerRecord>>,
    pub store_from_poll: mpsc::Receiver<Vec<PowerRecord>>,
}


impl Channels {
    pub fn new() -> Channels {
        let (p_to_t, t_from_p) = mpsc::channel::<Event>(TIMER_CAPACITY);
        let (t_to_p, p_from_t) = mpsc::channel::<Event>(TIMER_CAPACITY);
        let (p_to_s, s_from_p) = mpsc::channel::<Vec<PowerRecord>>(RECORDS_CAPACITY);

        Self {
            poll_to_timer: p_to_t,
            timer_from_poll: t_from_p,
            timer_to_poll: t_to_p,
            poll_from_timer: p_from_t,
            poll_to_store: p_to_s,
            store_from_poll: s_from_p,
        }
    }
}
