#![warn(rust_2018_idioms)]

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc, Arc, Condvar, Mutex,
    },
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;

use batwatch::{
    app::App,
    collection::battery::BatterySource,
    constants::{SESSION_SAMPLE_RATE_IN_MILLISECONDS, TICK_RATE_IN_MILLISECONDS},
    event::{create_collection_thread, create_tick_thread, BatwatchEvent},
    history::{ChargeHistory, SampleLog},
    options::{args::BatwatchArgs, create_or_get_config, get_history_paths, init_app_config, read_config},
    utils::logging,
};

fn main() -> Result<()> {
    let args = BatwatchArgs::parse();

    let min_level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    logging::init_logger(min_level).context("Unable to initialize the logger.")?;

    let config_path = read_config(args.general_args.config_location.as_deref())
        .context("Unable to access the given config file location.")?;
    let config = create_or_get_config(&config_path)
        .context("Unable to properly parse or create the config file.")?;

    let settings = init_app_config(&args, &config)?;
    let (charge_history_path, sample_log_path) = get_history_paths(&args, &config)?;

    let mut app = App::new(
        settings.clone(),
        ChargeHistory::new(charge_history_path),
        SampleLog::new(sample_log_path, settings.sample_retention),
        BatterySource::detect(),
    );

    // Create termination mutex and cvar
    #[allow(clippy::mutex_atomic)]
    let thread_termination_lock = Arc::new(Mutex::new(false));
    let thread_termination_cvar = Arc::new(Condvar::new());

    let (sender, receiver) = mpsc::channel();

    let _collection_thread = create_collection_thread(
        sender.clone(),
        thread_termination_lock.clone(),
        thread_termination_cvar.clone(),
        settings.update_rate_in_milliseconds,
    );

    // Feeds the live charge session once a second while plugged in.
    let _session_thread = create_tick_thread(
        sender.clone(),
        thread_termination_lock.clone(),
        thread_termination_cvar.clone(),
        SESSION_SAMPLE_RATE_IN_MILLISECONDS,
        || BatwatchEvent::SessionTick,
    );

    let _history_thread = settings.history_enabled.then(|| {
        create_tick_thread(
            sender,
            thread_termination_lock.clone(),
            thread_termination_cvar.clone(),
            settings.sample_interval_in_milliseconds,
            || BatwatchEvent::HistoryTick,
        )
    });

    // Set termination hook
    let is_terminated = Arc::new(AtomicBool::new(false));
    let ist_clone = is_terminated.clone();
    ctrlc::set_handler(move || {
        ist_clone.store(true, Ordering::SeqCst);
    })?;

    while !is_terminated.load(Ordering::SeqCst) {
        if let Ok(recv) = receiver.recv_timeout(Duration::from_millis(TICK_RATE_IN_MILLISECONDS)) {
            match recv {
                BatwatchEvent::Update(data) => app.on_update(data),
                BatwatchEvent::SessionTick => app.on_session_tick(),
                BatwatchEvent::HistoryTick => app.on_history_tick(),
            }
        }
    }

    // I think doing it in this order is safe...
    *thread_termination_lock.lock().unwrap() = true;
    thread_termination_cvar.notify_all();

    Ok(())
}
