// File: src/tui/state.rs
use crate::countdown::{self, CountdownPhase};
use crate::model::{DoseSchedule, Medicine};
use crate::store::MedicineList;
use crate::ticker::Ticker;
use chrono::{DateTime, Local};
use ratatui::widgets::ListState;

#[derive(PartialEq, Clone, Copy, Debug)]
pub enum InputMode {
    Normal,
    Adding,
}

#[derive(PartialEq, Clone, Copy, Debug)]
pub enum DetailField {
    Dosage,
    Pills,
    Time,
}

impl DetailField {
    pub fn next(self) -> Self {
        match self {
            DetailField::Dosage => DetailField::Pills,
            DetailField::Pills => DetailField::Time,
            DetailField::Time => DetailField::Dosage,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            DetailField::Dosage => DetailField::Time,
            DetailField::Pills => DetailField::Dosage,
            DetailField::Time => DetailField::Pills,
        }
    }
}

/// Single-line text buffer with a char-based cursor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextInput {
    pub buffer: String,
    pub cursor_position: usize,
}

impl TextInput {
    pub fn with_value(value: &str) -> Self {
        Self {
            buffer: value.to_string(),
            cursor_position: value.chars().count(),
        }
    }

    pub fn value(&self) -> &str {
        &self.buffer
    }

    fn byte_index(&self) -> usize {
        self.buffer
            .char_indices()
            .map(|(i, _)| i)
            .nth(self.cursor_position)
            .unwrap_or(self.buffer.len())
    }

    pub fn move_cursor_left(&mut self) {
        let cursor_moved_left = self.cursor_position.saturating_sub(1);
        self.cursor_position = self.clamp_cursor(cursor_moved_left);
    }
    pub fn move_cursor_right(&mut self) {
        let cursor_moved_right = self.cursor_position.saturating_add(1);
        self.cursor_position = self.clamp_cursor(cursor_moved_right);
    }
    pub fn enter_char(&mut self, new_char: char) {
        let idx = self.byte_index();
        self.buffer.insert(idx, new_char);
        self.move_cursor_right();
    }
    pub fn delete_char(&mut self) {
        if self.cursor_position != 0 {
            let current_index = self.cursor_position;
            let before = self.buffer.chars().take(current_index - 1);
            let after = self.buffer.chars().skip(current_index);
            self.buffer = before.chain(after).collect();
            self.move_cursor_left();
        }
    }
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.cursor_position = 0;
    }
    fn clamp_cursor(&self, new_cursor_pos: usize) -> usize {
        new_cursor_pos.clamp(0, self.buffer.chars().count())
    }
}

/// Everything the detail form edits while it is open.
#[derive(Debug)]
pub struct DetailState {
    pub medicine: Medicine,
    pub schedule: DoseSchedule,
    pub dosage: TextInput,
    pub field: DetailField,
    pub now: DateTime<Local>,
    /// Countdown refresh; aborted when the detail view is dropped.
    pub ticker: Option<Ticker>,
}

impl DetailState {
    pub fn new(medicine: Medicine, schedule: DoseSchedule, now: DateTime<Local>) -> Self {
        let dosage = TextInput::with_value(&schedule.dosage);
        Self {
            medicine,
            schedule,
            dosage,
            field: DetailField::Dosage,
            now,
            ticker: None,
        }
    }

    pub fn phase(&self) -> CountdownPhase {
        countdown::phase(&self.now, &self.schedule.target)
    }

    pub fn countdown_text(&self) -> String {
        countdown::time_until(&self.now, &self.schedule.target)
    }

    /// Schedule as it should be persisted.
    pub fn current_schedule(&self) -> DoseSchedule {
        let mut schedule = self.schedule.clone();
        schedule.dosage = self.dosage.value().to_string();
        schedule
    }
}

pub struct AppState {
    // Data
    pub medicines: MedicineList,

    // UI State
    pub list_state: ListState,
    pub mode: InputMode,
    pub message: String,
    pub detail: Option<DetailState>,

    // Input Buffers
    pub input: TextInput,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            medicines: MedicineList::new(),
            list_state: ListState::default(),
            mode: InputMode::Normal,
            message: String::new(),
            detail: None,
            input: TextInput::default(),
        }
    }

    pub fn with_medicines(medicines: Vec<Medicine>) -> Self {
        let mut state = Self::new();
        state.medicines = MedicineList::from_vec(medicines);
        state.clamp_selection();
        state
    }

    fn clamp_selection(&mut self) {
        let len = self.medicines.len();
        if len == 0 {
            self.list_state.select(None);
        } else {
            let current = self.list_state.selected().unwrap_or(0);
            self.list_state.select(Some(current.min(len - 1)));
        }
    }

    /// Add the medicine typed in the input buffer. Blank input is ignored.
    pub fn submit_new_medicine(&mut self) -> Option<Medicine> {
        let added = self.medicines.add(self.input.value())?;
        self.input.reset();
        self.mode = InputMode::Normal;
        self.list_state.select(Some(self.medicines.len() - 1));
        self.message = format!("Added {}.", added.name);
        Some(added)
    }

    pub fn remove_last_medicine(&mut self) -> Option<Medicine> {
        let removed = self.medicines.remove_last()?;
        self.clamp_selection();
        self.message = format!("Removed {}.", removed.name);
        Some(removed)
    }

    pub fn get_selected_medicine(&self) -> Option<&Medicine> {
        self.list_state
            .selected()
            .and_then(|idx| self.medicines.get(idx))
    }

    pub fn open_detail(&mut self, detail: DetailState) {
        self.detail = Some(detail);
    }

    /// Close the detail view, stopping its ticker. Returns what to persist.
    pub fn close_detail(&mut self) -> Option<(String, DoseSchedule)> {
        let detail = self.detail.take()?;
        Some((detail.medicine.id.clone(), detail.current_schedule()))
    }

    pub fn on_tick(&mut self, now: DateTime<Local>) {
        if let Some(detail) = self.detail.as_mut() {
            detail.now = now;
        }
    }

    // --- NAVIGATION ---
    pub fn next(&mut self) {
        if self.medicines.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i >= self.medicines.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }
    pub fn previous(&mut self) {
        if self.medicines.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.medicines.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }
}
