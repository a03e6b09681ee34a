use crate::application::{App, AppMode, BoardLayout, FormField, TextInput};
use crate::domain::{Stage, StepDirection};
use crate::infrastructure::{ExportError, SnapshotExporter};
use crate::presentation::layout::screen_geometry;
use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, key, modifiers),
            AppMode::Form => Self::handle_form_mode(app, key),
            AppMode::Help => Self::handle_help_mode(app, key),
            AppMode::ConfirmDelete => Self::handle_confirm_delete_mode(app, key),
            AppMode::Export => Self::handle_export_mode(app, key),
        }
    }

    fn handle_normal_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('e') = key {
                app.cancel_drag();
                app.start_export();
            }
            return;
        }

        // Keep the drag prompt on screen until the card is dropped
        if app.dragging.is_none() {
            app.status_message = None;
        }

        match key {
            KeyCode::Left | KeyCode::Char('h') => app.move_stage_cursor(false),
            KeyCode::Right | KeyCode::Char('l') => app.move_stage_cursor(true),
            KeyCode::Up | KeyCode::Char('k') => app.move_card_cursor(false),
            KeyCode::Down | KeyCode::Char('j') => app.move_card_cursor(true),
            KeyCode::Char(' ') => {
                if app.dragging.is_some() {
                    app.drop_on(app.selected_stage());
                } else {
                    app.pick_up_selected();
                }
            }
            KeyCode::Enter => {
                if app.dragging.is_some() {
                    app.drop_on(app.selected_stage());
                } else {
                    app.open_edit_form();
                }
            }
            KeyCode::Esc => app.cancel_drag(),
            _ if app.dragging.is_some() => {}
            KeyCode::Char('a') => app.open_add_form(),
            KeyCode::Char('e') => app.open_edit_form(),
            KeyCode::Char('d') | KeyCode::Delete => app.request_delete(),
            KeyCode::Char('[') | KeyCode::Char('<') => {
                app.step_selected(StepDirection::Back);
            }
            KeyCode::Char(']') | KeyCode::Char('>') => {
                app.step_selected(StepDirection::Forward);
            }
            KeyCode::Char(c @ '1'..='9') => {
                let ordinal = c as usize - '1' as usize;
                if let Some(stage) = Stage::from_ordinal(ordinal) {
                    app.place_selected(stage);
                }
            }
            KeyCode::F(1) | KeyCode::Char('?') => app.show_help(),
            _ => {}
        }
    }

    fn handle_form_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => {
                app.submit_form();
                return;
            }
            KeyCode::Esc => {
                app.cancel_form();
                return;
            }
            _ => {}
        }

        let Some(form) = app.form.as_mut() else {
            app.cancel_form();
            return;
        };

        match key {
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_previous(),
            KeyCode::Left if form.focus == FormField::Stage => form.cycle_stage(false),
            KeyCode::Right if form.focus == FormField::Stage => form.cycle_stage(true),
            KeyCode::Char(' ') if form.focus == FormField::Stage => form.cycle_stage(true),
            _ => {
                if let Some(input) = form.focused_input_mut() {
                    Self::edit_text(input, key);
                }
            }
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.close_help();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if app.help_scroll > 0 {
                    app.help_scroll -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }

    fn handle_confirm_delete_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_delete(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
            _ => {}
        }
    }

    fn handle_export_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => {
                let filename = app.export_filename();
                match SnapshotExporter::export(&app.store.list(), &filename, app.overwrite_pending) {
                    Err(ExportError::AlreadyExists(_)) => app.request_overwrite(),
                    result => {
                        let result = result.map_err(|err| err.to_string());
                        if let Err(err) = &result {
                            tracing::warn!(%filename, error = %err, "export failed");
                        }
                        app.set_export_result(result);
                    }
                }
            }
            KeyCode::Esc => app.cancel_export(),
            _ => {
                app.overwrite_pending = false;
                Self::edit_text(&mut app.filename_input, key);
            }
        }
    }

    fn edit_text(input: &mut TextInput, key: KeyCode) {
        match key {
            KeyCode::Backspace => input.backspace(),
            KeyCode::Delete => input.delete(),
            KeyCode::Left => input.move_left(),
            KeyCode::Right => input.move_right(),
            KeyCode::Home => input.move_home(),
            KeyCode::End => input.move_end(),
            KeyCode::Char(c) => input.insert(c),
            _ => {}
        }
    }

    /// Mouse drag-and-drop: press on a card to pick it up, drag across
    /// columns, release over a column to drop it there. In the compact
    /// layout a press on the stepper line moves the selected card instead.
    pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
        if app.mode != AppMode::Normal {
            return;
        }
        let area = Rect::new(0, 0, app.viewport_width, app.viewport_height);
        let geometry = screen_geometry(app, area);
        let column = geometry.column_at(mouse.column, mouse.row).map(|column| {
            (
                column.stage,
                column.card_at(mouse.column, mouse.row),
                column.step_at(mouse.column, mouse.row),
            )
        });

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some((stage, slot, step)) = column else {
                    return;
                };
                app.status_message = None;
                app.select_stage(stage.ordinal());
                if let Some(direction) = step {
                    app.step_selected(direction);
                    return;
                }
                let Some(index) = slot else {
                    return;
                };
                if let Some(application) = app.applications_in(stage).get(index) {
                    app.selected_card = index;
                    app.start_drag(application.id);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let (Some(_), Some((stage, _, _))) = (app.dragging, column) else {
                    return;
                };
                let mut target = stage.ordinal();
                // Hovering an edge column scrolls the board one stage that way
                if app.layout() == BoardLayout::Wide && geometry.columns.len() > 1 {
                    let first = app.scroll_stage;
                    let last = app.scroll_stage + geometry.columns.len() - 1;
                    if target == last {
                        target = (target + 1).min(Stage::last().ordinal());
                    } else if target == first {
                        target = target.saturating_sub(1);
                    }
                }
                if target != app.selected_stage {
                    app.select_stage(target);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if app.dragging.is_none() {
                    return;
                }
                match column {
                    Some((stage, _, _)) => {
                        app.select_stage(stage.ordinal());
                        app.drop_on(stage);
                    }
                    None => app.cancel_drag(),
                }
            }
            MouseEventKind::ScrollDown => app.move_card_cursor(true),
            MouseEventKind::ScrollUp => app.move_card_cursor(false),
            _ => {}
        }
    }
}
