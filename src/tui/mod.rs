//! Ratatui-based terminal UI.
//!
//! A form panel on the left (one row per field plus a Predict row), the current
//! field's options and the last estimate on the right. Nothing is predicted
//! until the user submits.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use tracing::error;

use crate::app::context::AppContext;
use crate::app::pipeline::{Submission, submit};
use crate::error::AppError;
use crate::form::{Form, FormField};

/// Index of the Predict row, after the form fields.
const PREDICT_ROW: usize = FormField::ALL.len();
/// Page keys move numeric fields by this many steps.
const PAGE_STEPS: i32 = 10;

/// Start the TUI.
pub fn run(ctx: &AppContext) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(ctx);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App<'a> {
    ctx: &'a AppContext,
    form: Form<'a>,
    selected: usize,
    /// Text typed into a numeric field, while editing.
    editing: Option<String>,
    status: String,
    outcome: Option<Submission>,
}

impl<'a> App<'a> {
    fn new(ctx: &'a AppContext) -> Self {
        Self {
            ctx,
            form: Form::new(ctx.catalog(), ctx.taxonomy()),
            selected: 0,
            editing: None,
            status: "Fill in the form, then choose Predict.".to_string(),
            outcome: None,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn selected_field(&self) -> Option<FormField> {
        FormField::ALL.get(self.selected).copied()
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing.is_some() {
            self.handle_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => self.selected = (self.selected + 1).min(PREDICT_ROW),
            KeyCode::Left => self.adjust(-1),
            KeyCode::Right => self.adjust(1),
            KeyCode::PageDown => self.adjust(-PAGE_STEPS),
            KeyCode::PageUp => self.adjust(PAGE_STEPS),
            KeyCode::Char('p') => self.predict(),
            KeyCode::Enter => match self.selected_field() {
                None => self.predict(),
                Some(field) if field.is_numeric() => {
                    self.editing = Some(String::new());
                    self.status = format!(
                        "Editing {}. Enter to apply, Esc to cancel.",
                        field.label().to_lowercase()
                    );
                }
                Some(_) => self.adjust(1),
            },
            _ => {}
        }
        false
    }

    fn handle_edit(&mut self, code: KeyCode) {
        let Some(buffer) = self.editing.as_mut() else {
            return;
        };
        match code {
            KeyCode::Esc => {
                self.editing = None;
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => buffer.push(c),
            KeyCode::Enter => {
                let text = buffer.clone();
                self.editing = None;
                let Some(field) = self.selected_field() else {
                    return;
                };
                match self.form.select(field, &text) {
                    Ok(()) => {
                        self.outcome = None;
                        self.status = format!("{}: {text}", field.label());
                    }
                    Err(err) => self.status = err.to_string(),
                }
            }
            _ => {}
        }
    }

    fn adjust(&mut self, delta: i32) {
        let Some(field) = self.selected_field() else {
            return;
        };
        let before = self.form.value(field);
        self.form.step(field, delta);
        let after = self.form.value(field);
        if before != after {
            // A shown estimate no longer matches the form.
            self.outcome = None;
        }
        self.status = format!("{}: {}", field.label(), after.as_deref().unwrap_or("-"));
    }

    fn predict(&mut self) {
        let request = match self.form.request() {
            Ok(request) => request,
            Err(err) => {
                self.status = err.to_string();
                return;
            }
        };
        match submit(self.ctx, &request) {
            Ok(outcome) => {
                self.status = match &outcome {
                    Submission::Priced(_) => "Estimate ready.".to_string(),
                    Submission::Rejected(_) => "Submission rejected.".to_string(),
                };
                self.outcome = Some(outcome);
            }
            Err(err) => {
                error!(error = %err, "prediction failed");
                self.outcome = None;
                self.status = format!("Prediction failed: {err}");
            }
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let catalog = self.ctx.catalog();
        let lines = vec![
            Line::from(vec![
                Span::styled("carprice", Style::default().fg(Color::Cyan)),
                Span::raw(" - used-car price estimate"),
            ]),
            Line::from(Span::styled(
                format!(
                    "brands: {} | models: {} | transmissions: {}",
                    catalog.brands().len(),
                    catalog.all_models().len(),
                    self.ctx.taxonomy().labels().count(),
                ),
                Style::default().fg(Color::Gray),
            )),
        ];
        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);
        self.draw_form(frame, columns[0]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(5)])
            .split(columns[1]);
        self.draw_options(frame, right[0]);
        self.draw_result(frame, right[1]);
    }

    fn draw_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut items: Vec<ListItem> = FormField::ALL
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                let value = match &self.editing {
                    Some(buffer) if idx == self.selected => format!("{buffer}_"),
                    _ => self.form.value(*field).unwrap_or_else(|| "(none available)".to_string()),
                };
                ListItem::new(format!("{:<20} {value}", field.label()))
            })
            .collect();
        items.push(ListItem::new(Span::styled(
            "[ Predict ]",
            Style::default().add_modifier(Modifier::BOLD),
        )));

        let list = List::new(items)
            .block(Block::default().title("Car").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_options(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(field) = self.selected_field() else {
            let p = Paragraph::new("Press Enter or p to estimate the price.")
                .wrap(Wrap { trim: true })
                .block(Block::default().title("Submit").borders(Borders::ALL));
            frame.render_widget(p, area);
            return;
        };

        let block = Block::default().title(field.label()).borders(Borders::ALL);
        if field.is_numeric() {
            let hint = match field {
                FormField::ModelYear => format!(
                    "{}-{}, ←/→ by 1, PgUp/PgDn by {PAGE_STEPS}, Enter to type",
                    crate::domain::MODEL_YEAR_MIN,
                    crate::domain::MODEL_YEAR_MAX
                ),
                _ => format!(
                    "km, ←/→ by {}, PgUp/PgDn by {}, Enter to type",
                    crate::domain::MILEAGE_STEP_KM,
                    crate::domain::MILEAGE_STEP_KM * f64::from(PAGE_STEPS)
                ),
            };
            let p = Paragraph::new(hint).wrap(Wrap { trim: true }).block(block);
            frame.render_widget(p, area);
            return;
        }

        let options = self.form.options(field);
        if options.is_empty() {
            let p = Paragraph::new("No options for the current selection.")
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(p, area);
            return;
        }

        let current = self.form.value(field);
        let position = current
            .as_deref()
            .and_then(|c| options.iter().position(|o| o == c));
        let list = List::new(options.into_iter().map(ListItem::new).collect::<Vec<_>>())
            .block(block)
            .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .highlight_symbol("* ");
        let mut state = ListState::default();
        state.select(position);
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_result(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Estimate").borders(Borders::ALL);
        let p = match &self.outcome {
            None => Paragraph::new("-").style(Style::default().fg(Color::Gray)),
            Some(outcome @ Submission::Priced(_)) => Paragraph::new(outcome.message())
                .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Some(outcome @ Submission::Rejected(_)) => {
                Paragraph::new(outcome.message()).style(Style::default().fg(Color::Red))
            }
        };
        frame.render_widget(p.wrap(Wrap { trim: true }).block(block), area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ field  ←/→ change  Enter edit  p predict  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}
