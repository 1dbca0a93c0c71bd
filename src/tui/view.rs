// File: src/tui/view.rs
use crate::countdown::CountdownPhase;
use crate::model::MAX_PILL_COUNT;
use crate::tui::state::{AppState, DetailField, DetailState, InputMode};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

pub fn draw(f: &mut Frame, state: &mut AppState) {
    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());

    if let Some(detail) = state.detail.as_ref() {
        draw_detail(f, detail, v_chunks[0]);
    } else {
        draw_list(f, state, v_chunks[0]);
    }

    draw_footer(f, state, v_chunks[1]);
}

fn draw_list(f: &mut Frame, state: &mut AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    // --- Input ---
    let input_style = if state.mode == InputMode::Adding {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let input = Paragraph::new(state.input.value()).style(input_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Enter medicine name "),
    );
    f.render_widget(input, chunks[0]);

    if state.mode == InputMode::Adding {
        f.set_cursor_position((
            cursor_x(chunks[0], state.input.cursor_position),
            chunks[0].y.saturating_add(1),
        ));
    }

    // --- Medicine List ---
    let items: Vec<ListItem> = state
        .medicines
        .iter()
        .map(|m| ListItem::new(Line::from(format!("💊 {}", m.name))))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Medicine List ({}) ", state.medicines.len())),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::Blue),
        );
    f.render_stateful_widget(list, chunks[1], &mut state.list_state);
}

/// Column of a text cursor inside a bordered box, pinned to the last inner cell.
fn cursor_x(area: Rect, pos: usize) -> u16 {
    let last_inner = area.width.saturating_sub(3);
    let offset = u16::try_from(pos).unwrap_or(u16::MAX).min(last_inner);
    area.x.saturating_add(1).saturating_add(offset)
}

fn field_style(detail: &DetailState, field: DetailField) -> Style {
    if detail.field == field {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

fn draw_detail(f: &mut Frame, detail: &DetailState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(4),
        ])
        .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        detail.medicine.name.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title(" Medicine Info "));
    f.render_widget(title, chunks[0]);

    let dosage = Paragraph::new(detail.dosage.value()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Dosage + units ")
            .border_style(field_style(detail, DetailField::Dosage)),
    );
    f.render_widget(dosage, chunks[1]);
    if detail.field == DetailField::Dosage {
        f.set_cursor_position((
            cursor_x(chunks[1], detail.dosage.cursor_position),
            chunks[1].y.saturating_add(1),
        ));
    }

    let pills = Paragraph::new(format!(
        "Number of pills: {}  [-/+] (0-{})",
        detail.schedule.pill_count, MAX_PILL_COUNT
    ))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(field_style(detail, DetailField::Pills)),
    );
    f.render_widget(pills, chunks[2]);

    let time = Paragraph::new(format!("Dose Time: {}", detail.schedule.target_label())).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(field_style(detail, DetailField::Time)),
    );
    f.render_widget(time, chunks[3]);

    let countdown_style = match detail.phase() {
        CountdownPhase::ZeroHold => Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD),
        _ => Style::default().add_modifier(Modifier::BOLD),
    };
    let countdown = Paragraph::new(vec![
        Line::from("Time until next dose:"),
        Line::from(Span::styled(detail.countdown_text(), countdown_style)),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(countdown, chunks[4]);
}

fn draw_footer(f: &mut Frame, state: &AppState, area: Rect) {
    let help = if state.detail.is_some() {
        "Tab:Field | +/-:Pills | Up/Down:Minute | PgUp/PgDn:Hour | n:Now | Esc:Save & Back"
    } else {
        match state.mode {
            InputMode::Adding => "Enter:Add | Esc:Cancel",
            InputMode::Normal => "a:Add | d:Remove Last | Enter:Open | j/k:Move | q:Quit",
        }
    };

    let text = if state.message.is_empty() {
        help.to_string()
    } else {
        format!("{} | {}", state.message, help)
    };

    let footer = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}
