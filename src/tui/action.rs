// File: src/tui/action.rs
use crate::model::{DoseSchedule, Medicine};
use chrono::{DateTime, Local};

/// Side effects requested by key handling, executed by the run loop.
#[derive(Debug)]
pub enum Action {
    /// Persist the whole medicine list.
    SaveMedicines,
    /// The last medicine was removed; drop its list entry and schedule.
    MedicineRemoved(Medicine),
    OpenDetail(Medicine),
    /// Detail view closed; persist what was edited.
    SaveSchedule(String, DoseSchedule),
    Quit,
}

#[derive(Debug)]
pub enum AppEvent {
    Tick(DateTime<Local>),
}
