//! Some code around handling events and the threads that produce them.
//!
//! The worker threads never touch shared state; they ship events to the main
//! loop over a channel and stop when the termination flag flips. Cancellation
//! is "stop rescheduling": a tick already in flight completes, the next one
//! never fires.

use std::{
    sync::{
        mpsc::Sender,
        Arc, Condvar, Mutex,
    },
    thread,
    time::Duration,
};

use log::warn;

use crate::collection::{Data, DataCollector};

/// Events sent to the main thread.
#[derive(Debug)]
pub enum BatwatchEvent {
    /// A fresh battery snapshot.
    Update(Box<Data>),
    /// Feed the live charge session, if any.
    SessionTick,
    /// Append a current sample to the sample log.
    HistoryTick,
}

/// Creates the thread that polls the battery and ships snapshots to the main
/// loop at the configured rate.
pub fn create_collection_thread(
    sender: Sender<BatwatchEvent>, termination_ctrl_lock: Arc<Mutex<bool>>,
    termination_ctrl_cvar: Arc<Condvar>, update_rate_in_milliseconds: u64,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut data_state = DataCollector::new();

        if !data_state.has_battery() {
            warn!("no battery supply found; readings will be empty");
        }

        loop {
            // Check once at the very top, without blocking.
            if let Ok(is_terminated) = termination_ctrl_lock.try_lock() {
                if *is_terminated {
                    drop(is_terminated);
                    break;
                }
            }

            data_state.update_data();

            let event = BatwatchEvent::Update(Box::from(std::mem::take(&mut data_state.data)));
            if sender.send(event).is_err() {
                break;
            }

            if let Ok((is_terminated, _wait_timeout_result)) = termination_ctrl_cvar.wait_timeout(
                termination_ctrl_lock.lock().unwrap(),
                Duration::from_millis(update_rate_in_milliseconds),
            ) {
                if *is_terminated {
                    drop(is_terminated);
                    break;
                }
            }
        }
    })
}

/// Creates a repeating-timer thread that sends `make_event()` to the main loop
/// every `interval_in_milliseconds`, until terminated.
pub fn create_tick_thread<F>(
    sender: Sender<BatwatchEvent>, termination_ctrl_lock: Arc<Mutex<bool>>,
    termination_ctrl_cvar: Arc<Condvar>, interval_in_milliseconds: u64, make_event: F,
) -> thread::JoinHandle<()>
where
    F: Fn() -> BatwatchEvent + Send + 'static,
{
    thread::spawn(move || {
        loop {
            let result = termination_ctrl_cvar.wait_timeout(
                termination_ctrl_lock.lock().unwrap(),
                Duration::from_millis(interval_in_milliseconds),
            );
            if let Ok(result) = result {
                if *(result.0) {
                    break;
                }
            }

            if sender.send(make_event()).is_err() {
                break;
            }
        }
    })
}
