// File: src/tui/handlers.rs
use crate::tui::action::{Action, AppEvent};
use crate::tui::state::{AppState, DetailField, InputMode};
use crossterm::event::{KeyCode, KeyEvent};

pub fn handle_app_event(state: &mut AppState, event: AppEvent) {
    match event {
        AppEvent::Tick(now) => state.on_tick(now),
    }
}

pub fn handle_key_event(key: KeyEvent, state: &mut AppState) -> Option<Action> {
    if state.detail.is_some() {
        return handle_detail_key(key, state);
    }

    match state.mode {
        InputMode::Adding => match key.code {
            KeyCode::Enter if !state.input.value().trim().is_empty() => {
                if state.submit_new_medicine().is_some() {
                    return Some(Action::SaveMedicines);
                }
            }
            KeyCode::Esc => {
                state.mode = InputMode::Normal;
                state.input.reset();
                state.message.clear();
            }
            KeyCode::Char(c) => state.input.enter_char(c),
            KeyCode::Backspace => state.input.delete_char(),
            KeyCode::Left => state.input.move_cursor_left(),
            KeyCode::Right => state.input.move_cursor_right(),
            _ => {}
        },
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => return Some(Action::Quit),
            KeyCode::Char('a') => {
                state.mode = InputMode::Adding;
                state.input.reset();
                state.message = "Enter medicine name...".to_string();
            }
            KeyCode::Char('d') => {
                if let Some(removed) = state.remove_last_medicine() {
                    return Some(Action::MedicineRemoved(removed));
                }
            }
            KeyCode::Down | KeyCode::Char('j') => state.next(),
            KeyCode::Up | KeyCode::Char('k') => state.previous(),
            KeyCode::Enter => {
                if let Some(medicine) = state.get_selected_medicine().cloned() {
                    return Some(Action::OpenDetail(medicine));
                }
            }
            _ => {}
        },
    }
    None
}

fn handle_detail_key(key: KeyEvent, state: &mut AppState) -> Option<Action> {
    if key.code == KeyCode::Esc {
        return state
            .close_detail()
            .map(|(id, schedule)| Action::SaveSchedule(id, schedule));
    }

    let detail = state.detail.as_mut()?;
    match key.code {
        KeyCode::Tab => detail.field = detail.field.next(),
        KeyCode::BackTab => detail.field = detail.field.previous(),
        _ => match detail.field {
            DetailField::Dosage => match key.code {
                KeyCode::Char(c) => detail.dosage.enter_char(c),
                KeyCode::Backspace => detail.dosage.delete_char(),
                KeyCode::Left => detail.dosage.move_cursor_left(),
                KeyCode::Right => detail.dosage.move_cursor_right(),
                KeyCode::Down | KeyCode::Enter => detail.field = DetailField::Pills,
                _ => {}
            },
            DetailField::Pills => match key.code {
                KeyCode::Char('+') | KeyCode::Right | KeyCode::Up => detail.schedule.step_pills(1),
                KeyCode::Char('-') | KeyCode::Left | KeyCode::Down => {
                    detail.schedule.step_pills(-1)
                }
                KeyCode::Enter => detail.field = DetailField::Time,
                _ => {}
            },
            DetailField::Time => match key.code {
                KeyCode::Up | KeyCode::Char('+') => detail.schedule.shift_time_of_day(1),
                KeyCode::Down | KeyCode::Char('-') => detail.schedule.shift_time_of_day(-1),
                KeyCode::PageUp => detail.schedule.shift_time_of_day(60),
                KeyCode::PageDown => detail.schedule.shift_time_of_day(-60),
                KeyCode::Char('n') => detail.schedule.target = detail.now,
                KeyCode::Enter => detail.field = DetailField::Dosage,
                _ => {}
            },
        },
    }
    None
}
