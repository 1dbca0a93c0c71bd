// File: src/tui/mod.rs
pub mod action;
pub mod handlers;
pub mod state;
pub mod view;

use crate::config::Config;
use crate::logging;
use crate::model::{DoseSchedule, Medicine};
use crate::paths::AppPaths;
use crate::storage::{JsonScheduleStore, LocalStorage, ScheduleStore};
use crate::ticker::Ticker;

use action::{Action, AppEvent};
use handlers::{handle_app_event, handle_key_event};
use state::{AppState, DetailState};
use view::draw;

use anyhow::Result;
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{env, io, time::Duration};
use tokio::sync::mpsc::{self, Sender};

fn print_help() {
    println!("MedX - Medicine tracker");
    println!("----------------------------------------");
    println!("Usage: medx [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -h, --help       Print this help");
    println!("  -V, --version    Print version");
    println!();
    match Config::get_path_string() {
        Ok(path) => println!("Configuration File: {}", path),
        Err(_) => println!("Configuration Path: ~/.config/medx/config.toml (Standard XDG)"),
    }
    println!();
    println!("Config Options:");
    println!("  log_level = \"info\"");
    println!("  tick_millis = 1000");
    println!("  roll_forward_on_open = false");
}

/// Execute a side effect requested by key handling.
/// Returns `false` once the app should exit.
pub fn apply_action(
    state: &mut AppState,
    action: Action,
    schedules: &mut dyn ScheduleStore,
    config: &Config,
    event_tx: &Sender<AppEvent>,
) -> bool {
    match action {
        Action::Quit => return false,
        Action::SaveMedicines => save_medicines(state),
        Action::MedicineRemoved(medicine) => {
            save_medicines(state);
            if let Err(e) = schedules.remove(&medicine.id) {
                log::warn!("Failed to drop schedule for {}: {:#}", medicine.id, e);
            }
        }
        Action::OpenDetail(medicine) => open_detail(state, medicine, schedules, config, event_tx),
        Action::SaveSchedule(id, schedule) => save_schedule(state, schedules, &id, &schedule),
    }
    true
}

fn save_schedule(
    state: &mut AppState,
    schedules: &mut dyn ScheduleStore,
    id: &str,
    schedule: &DoseSchedule,
) {
    match schedules.put(id, schedule) {
        Ok(()) => state.message = "Saved.".to_string(),
        Err(e) => {
            log::error!("Failed to save schedule for {}: {:#}", id, e);
            state.message = format!("Error: could not save schedule ({})", e);
        }
    }
}

/// Persist a form that is still open, as if it had been closed.
pub fn save_open_detail(state: &mut AppState, schedules: &mut dyn ScheduleStore) {
    if let Some((id, schedule)) = state.close_detail() {
        save_schedule(state, schedules, &id, &schedule);
    }
}

fn save_medicines(state: &mut AppState) {
    if let Err(e) = LocalStorage::save_medicines(state.medicines.as_slice()) {
        log::error!("Failed to save medicine list: {:#}", e);
        state.message = format!("Error: could not save list ({})", e);
    }
}

fn open_detail(
    state: &mut AppState,
    medicine: Medicine,
    schedules: &dyn ScheduleStore,
    config: &Config,
    event_tx: &Sender<AppEvent>,
) {
    let now = Local::now();
    let mut schedule = schedules.load_or_default(&medicine.id, now);
    if config.roll_forward_on_open {
        schedule.roll_forward(now);
    }
    log::debug!("Opening {} ({})", medicine.name, medicine.id);

    let mut detail = DetailState::new(medicine, schedule, now);
    detail.ticker = Some(Ticker::spawn(
        config.tick_interval(),
        event_tx.clone(),
        AppEvent::Tick,
    ));
    state.message.clear();
    state.open_detail(detail);
}

pub async fn run() -> Result<()> {
    // --- 1. PREAMBLE & CONFIG ---
    let args: Vec<String> = env::args().collect();
    if args.len() > 1 {
        match args[1].as_str() {
            "-h" | "--help" => {
                print_help();
                return Ok(());
            }
            "-V" | "--version" => {
                println!("medx {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            other => {
                eprintln!("Unknown option: {}", other);
                eprintln!("Run 'medx --help' for usage.");
                return Ok(());
            }
        }
    }

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        log::error!("PANIC: {}", info);
        default_hook(info);
    }));

    let (config, config_error) = match Config::load() {
        Ok(cfg) => (cfg, None),
        Err(e) => (Config::default(), Some(e)),
    };
    if let Err(e) = logging::init(&config.log_level) {
        eprintln!("Warning: logging disabled: {:#}", e);
    }
    if config_error.is_none()
        && let Ok(path) = AppPaths::get_config_file_path()
        && !path.exists()
    {
        match config.save() {
            Ok(()) => log::info!("Wrote default config to {:?}", path),
            Err(e) => log::warn!("Could not write default config: {:#}", e),
        }
    }

    // --- 2. STATE INIT ---
    let mut app_state = match LocalStorage::load_medicines() {
        Ok(meds) => AppState::with_medicines(meds),
        Err(e) => {
            log::error!("Failed to load medicine list: {:#}", e);
            let mut s = AppState::new();
            s.message = format!("Error: could not load list ({})", e);
            s
        }
    };
    if let Some(e) = config_error {
        log::warn!("Using default config: {:#}", e);
        app_state.message = format!("Config ignored: {}", e);
    }
    let mut schedules = JsonScheduleStore::open_default()?;
    log::info!(
        "Loaded {} medicines, schedules at {:?}",
        app_state.medicines.len(),
        schedules.path()
    );

    let (event_tx, mut event_rx) = mpsc::channel(16);

    // --- 3. TERMINAL SETUP ---
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // --- 4. MAIN LOOP ---
    loop {
        terminal.draw(|f| draw(f, &mut app_state))?;

        // A. Timer Events
        while let Ok(event) = event_rx.try_recv() {
            handle_app_event(&mut app_state, event);
        }

        // B. User Input
        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && let Some(action) = handle_key_event(key, &mut app_state)
            && !apply_action(&mut app_state, action, &mut schedules, &config, &event_tx)
        {
            break;
        }
    }

    save_open_detail(&mut app_state, &mut schedules);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    log::info!("Bye");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryScheduleStore;
    use crate::tui::handlers::handle_key_event;
    use chrono::Duration as ChronoDuration;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tokio::time;

    /// Store whose writes always fail.
    struct ReadOnlyStore;

    impl ScheduleStore for ReadOnlyStore {
        fn get(&self, _medicine_id: &str) -> Result<Option<DoseSchedule>> {
            Ok(None)
        }

        fn put(&mut self, _medicine_id: &str, _schedule: &DoseSchedule) -> Result<()> {
            Err(anyhow::anyhow!("disk full"))
        }

        fn remove(&mut self, _medicine_id: &str) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_closing_detail_stops_ticks() {
        let mut state = AppState::new();
        let med = state.medicines.add("Aspirin").unwrap();
        state.list_state.select(Some(0));
        let mut store = MemoryScheduleStore::new();
        let config = Config::default();
        let (tx, mut rx) = mpsc::channel(4);

        apply_action(&mut state, Action::OpenDetail(med.clone()), &mut store, &config, &tx);
        assert!(matches!(rx.recv().await, Some(AppEvent::Tick(_))));

        let action = handle_key_event(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE), &mut state)
            .expect("closing saves");
        assert!(apply_action(&mut state, action, &mut store, &config, &tx));
        assert!(state.detail.is_none());
        assert!(store.get(&med.id).unwrap().is_some());

        // Only the test still holds a sender; the ticker's went with the view.
        drop(tx);
        let drained = time::timeout(std::time::Duration::from_secs(10), async {
            while rx.recv().await.is_some() {}
        })
        .await;
        assert!(drained.is_ok(), "ticks kept arriving after the view closed");
    }

    #[test]
    fn test_save_open_detail_reports_failure() {
        let mut state = AppState::new();
        let med = state.medicines.add("Aspirin").unwrap();
        let now = Local::now();
        state.open_detail(DetailState::new(med, DoseSchedule::defaults(now), now));

        save_open_detail(&mut state, &mut ReadOnlyStore);
        assert!(state.detail.is_none());
        assert!(state.message.starts_with("Error: could not save schedule"));
        assert!(state.message.contains("disk full"));
    }

    #[test]
    fn test_save_open_detail_persists_form() {
        let mut state = AppState::new();
        let med = state.medicines.add("Aspirin").unwrap();
        let now = Local::now();
        let mut detail = DetailState::new(med.clone(), DoseSchedule::defaults(now), now);
        detail.dosage.enter_char('5');
        state.open_detail(detail);
        let mut store = MemoryScheduleStore::new();

        save_open_detail(&mut state, &mut store);
        assert_eq!(store.get(&med.id).unwrap().map(|s| s.dosage), Some("5".to_string()));

        // Nothing open: nothing to do
        save_open_detail(&mut state, &mut ReadOnlyStore);
        assert_eq!(state.message, "Saved.");
    }

    #[tokio::test]
    async fn test_open_detail_loads_defaults_and_starts_ticker() {
        let mut state = AppState::new();
        let med = state.medicines.add("Aspirin").unwrap();
        let mut store = MemoryScheduleStore::new();
        let (tx, mut rx) = mpsc::channel(4);

        let keep_going = apply_action(
            &mut state,
            Action::OpenDetail(med.clone()),
            &mut store,
            &Config::default(),
            &tx,
        );
        assert!(keep_going);

        let detail = state.detail.as_ref().expect("detail open");
        assert_eq!(detail.schedule.dosage, "");
        assert_eq!(detail.schedule.pill_count, 0);
        assert!(detail.ticker.is_some());

        // The ticker fires immediately
        assert!(matches!(rx.recv().await, Some(AppEvent::Tick(_))));
    }

    #[tokio::test]
    async fn test_save_then_reopen_restores_schedule() {
        let mut state = AppState::new();
        let med = state.medicines.add("Aspirin").unwrap();
        let mut store = MemoryScheduleStore::new();
        let (tx, _rx) = mpsc::channel(4);
        let config = Config::default();

        let target = Local::now() + ChronoDuration::hours(2);
        let saved = DoseSchedule {
            dosage: "5mg".to_string(),
            pill_count: 2,
            target,
        };
        apply_action(
            &mut state,
            Action::SaveSchedule(med.id.clone(), saved.clone()),
            &mut store,
            &config,
            &tx,
        );
        assert_eq!(state.message, "Saved.");

        apply_action(&mut state, Action::OpenDetail(med), &mut store, &config, &tx);
        let detail = state.detail.as_ref().expect("detail open");
        assert_eq!(detail.current_schedule(), saved);
    }

    #[tokio::test]
    async fn test_roll_forward_on_open() {
        let mut state = AppState::new();
        let med = state.medicines.add("Aspirin").unwrap();
        let mut store = MemoryScheduleStore::new();
        let (tx, _rx) = mpsc::channel(4);
        let config = Config {
            roll_forward_on_open: true,
            ..Config::default()
        };

        let stale = DoseSchedule::defaults(Local::now() - ChronoDuration::days(3));
        store.put(&med.id, &stale).unwrap();

        apply_action(&mut state, Action::OpenDetail(med), &mut store, &config, &tx);
        let detail = state.detail.as_ref().expect("detail open");
        assert!(detail.schedule.target >= detail.now);
    }

    #[tokio::test]
    async fn test_quit_stops_loop() {
        let mut state = AppState::new();
        let mut store = MemoryScheduleStore::new();
        let (tx, _rx) = mpsc::channel(4);
        assert!(!apply_action(
            &mut state,
            Action::Quit,
            &mut store,
            &Config::default(),
            &tx
        ));
    }
}
