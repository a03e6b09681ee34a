use crate::application::{App, AppMode, ApplicationForm, BoardLayout, FormField, TextInput};
use crate::domain::{JobApplication, Stage, StepDirection, group_by_stage, step_target};
use crate::presentation::layout::{ColumnGeometry, ScreenGeometry, screen_geometry};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn render_ui(f: &mut Frame, app: &App) {
    let geometry = screen_geometry(app, f.area());
    let snapshot = app.store.list();

    render_header(f, app, geometry.header);
    if let Some(sidebar) = geometry.sidebar {
        render_sidebar(f, app, &snapshot, sidebar);
    }
    if snapshot.is_empty() {
        render_empty_state(f, geometry.board);
    } else {
        render_board(f, app, &snapshot, &geometry);
    }
    render_status_bar(f, app, geometry.status);

    match app.mode {
        AppMode::Help => render_help_popup(f, app.help_scroll),
        AppMode::Form => {
            if let Some(form) = &app.form {
                render_form_popup(f, form);
            }
        }
        _ => {}
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let mut text = "JobB - Job Application Board | Track your applications by stage".to_string();
    if app.layout() == BoardLayout::Compact {
        text = format!("JobB | {} ({}/{})", app.selected_stage(), app.selected_stage + 1, Stage::ALL.len());
    }
    let header = Paragraph::new(text).style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_sidebar(f: &mut Frame, app: &App, snapshot: &[JobApplication], area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled("[a] Add Application", Style::default().fg(Color::Green))),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} applications", snapshot.len()),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
    ];

    for group in group_by_stage(snapshot) {
        let style = if group.stage.ordinal() == app.selected_stage {
            Style::default().fg(Color::Black).bg(Color::LightBlue)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!("{} {:<17.17} {:>2}", group.stage.ordinal() + 1, group.stage.label(), group.len()),
            style,
        )));
    }

    let sidebar = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("JobB")
            .style(Style::default().fg(Color::White)),
    );
    f.render_widget(sidebar, area);
}

fn render_empty_state(f: &mut Frame, area: Rect) {
    let top_padding = area.height.saturating_sub(9) / 2;
    let mut lines = vec![Line::from(""); top_padding as usize];
    lines.extend([
        Line::from(Span::styled(
            "No applications yet",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Start tracking your job search by adding your first"),
        Line::from("application with the \"Add Application\" key: press a."),
        Line::from(""),
        Line::from(Span::styled(
            "Use stages to track your progress",
            Style::default().fg(Color::Green),
        )),
    ]);

    let empty = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Board"));
    f.render_widget(empty, area);
}

fn render_board(f: &mut Frame, app: &App, snapshot: &[JobApplication], geometry: &ScreenGeometry) {
    let groups = group_by_stage(snapshot);
    for column in &geometry.columns {
        let applications = &groups[column.stage.ordinal()].applications;
        render_column(f, app, column, applications);
    }
}

fn render_column(f: &mut Frame, app: &App, column: &ColumnGeometry, applications: &[&JobApplication]) {
    let is_selected = column.stage.ordinal() == app.selected_stage;
    let border_style = match (is_selected, app.dragging.is_some()) {
        (true, true) => Style::default().fg(Color::Yellow),
        (true, false) => Style::default().fg(Color::Cyan),
        _ => Style::default().fg(Color::DarkGray),
    };
    let title = format!(" {} {} ", column.stage.ordinal() + 1, column.stage.label());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border_style);
    f.render_widget(block, column.area);

    let summary = Paragraph::new(format!("{} applications", applications.len()))
        .style(Style::default().fg(Color::Gray));
    f.render_widget(summary, column.summary);

    if applications.is_empty() {
        let hint = Paragraph::new("Drop application here")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(hint, Rect { height: column.cards.height.min(1), ..column.cards });
    }

    for (index, application) in applications.iter().enumerate() {
        if let Some(area) = column.card_rect(index) {
            let highlighted = is_selected && index == app.selected_card;
            render_card(f, app, application, highlighted, area);
        }
    }

    if let Some(controls) = column.stepper_controls() {
        let current = if is_selected { applications.get(app.selected_card).copied() } else { None };
        render_stepper(f, current, controls);
    }
}

fn render_card(f: &mut Frame, app: &App, application: &JobApplication, highlighted: bool, area: Rect) {
    let base = if app.dragging == Some(application.id) {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC)
    } else if highlighted {
        Style::default().bg(Color::Blue).fg(Color::White)
    } else {
        Style::default()
    };

    let date = format!("Applied: {}", application.display_date());
    let mut footer = vec![Span::styled(date.clone(), base.fg(Color::Gray))];
    if application.has_notes() {
        let used = date.chars().count() + " Notes ".len();
        let padding = (area.width as usize).saturating_sub(used);
        footer.push(Span::styled(" ".repeat(padding), base));
        footer.push(Span::styled(" Notes ", Style::default().fg(Color::Blue).bg(Color::LightCyan)));
    }

    let lines = vec![
        Line::from(Span::styled(application.company.clone(), base.add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(application.position.clone(), base)),
        Line::from(footer),
    ];
    f.render_widget(Paragraph::new(lines).style(base), area);
}

/// Draws the back control into the left half and forward into the right;
/// the mouse handler hit-tests the same halves.
fn render_stepper(f: &mut Frame, current: Option<&JobApplication>, (back_area, forward_area): (Rect, Rect)) {
    let enabled = Style::default().fg(Color::Green);
    let disabled = Style::default().fg(Color::DarkGray);

    let control = |direction: StepDirection| -> Span<'static> {
        let target = current.and_then(|app| step_target(app.stage, direction));
        match (direction, target) {
            (StepDirection::Back, Some(stage)) => Span::styled(format!("[ < {stage}"), enabled),
            (StepDirection::Back, None) => Span::styled("[ < back", disabled),
            (StepDirection::Forward, Some(stage)) => Span::styled(format!("{stage} > ]"), enabled),
            (StepDirection::Forward, None) => Span::styled("forward > ]", disabled),
        }
    };

    f.render_widget(Paragraph::new(Line::from(control(StepDirection::Back))), back_area);
    f.render_widget(
        Paragraph::new(Line::from(control(StepDirection::Forward))).alignment(Alignment::Right),
        forward_area,
    );
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let input_text = match app.mode {
        AppMode::Normal => {
            if let Some(ref status) = app.status_message {
                status.clone()
            } else if app.dragging.is_some() {
                "←→: choose column | Space/Enter: drop | Esc: cancel".to_string()
            } else if app.layout() == BoardLayout::Compact {
                "←→: stage | ↑↓: card | [ ]: move back/forward | a: add | e: edit | d: delete | ?: help | q: quit".to_string()
            } else {
                "a: add | Space: pick up/drop | 1-9: move to stage | e: edit | d: delete | Ctrl+E: export | ?: help | q: quit".to_string()
            }
        }
        AppMode::Form => "Tab/↑↓: next field | ←→: change stage | Enter: save | Esc: cancel".to_string(),
        AppMode::Help => "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string(),
        AppMode::ConfirmDelete => {
            let company = app
                .selected_application()
                .map(|a| a.company)
                .unwrap_or_default();
            format!("Delete application for {company}? (y to delete, n/Esc to keep)")
        }
        AppMode::Export if app.overwrite_pending => format!(
            "{} already exists. Enter to overwrite, Esc to cancel",
            app.export_filename()
        ),
        AppMode::Export => format!(
            "Export as: {} (Enter to export, Esc to cancel)",
            app.filename_input.value()
        ),
    };

    let input = Paragraph::new(input_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.mode {
            AppMode::Normal if app.dragging.is_some() => Style::default().fg(Color::Yellow),
            AppMode::Normal => Style::default(),
            AppMode::Form => Style::default().fg(Color::Green),
            AppMode::Help => Style::default().fg(Color::Cyan),
            AppMode::ConfirmDelete => Style::default().fg(Color::Red),
            AppMode::Export => Style::default().fg(Color::Magenta),
        });
    f.render_widget(input, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_form_popup(f: &mut Frame, form: &ApplicationForm) {
    let popup_area = centered_rect(64, 13, f.area());
    f.render_widget(Clear, popup_area);

    let label_width: u16 = 14;
    let value_width = popup_area.width.saturating_sub(2 + label_width) as usize;
    let mut cursor_offset = 0;
    let mut lines = vec![
        Line::from(Span::styled(
            "Track your job application details and progress",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
    ];

    for field in FormField::ALL {
        let focused = form.focus == field;
        let label_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let label = Span::styled(
            format!("{:>width$}: ", field.label(), width = label_width as usize - 2),
            label_style,
        );

        let value = match form.input(field) {
            Some(input) if input.value().is_empty() => {
                Span::styled(field.placeholder(), Style::default().fg(Color::DarkGray))
            }
            Some(input) if focused => {
                let (visible, offset) = visible_input(input, value_width);
                cursor_offset = offset;
                Span::raw(visible)
            }
            Some(input) => Span::raw(input.value().to_string()),
            None => Span::styled(
                format!("< {} >", form.stage),
                if focused { Style::default().fg(Color::Yellow) } else { Style::default() },
            ),
        };
        lines.push(Line::from(vec![label, value]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[ Save Application: Enter ]",
        Style::default().fg(Color::Black).bg(Color::Green),
    )));

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(form.title())
            .style(Style::default().fg(Color::White)),
    );
    f.render_widget(widget, popup_area);

    let focused_row = FormField::ALL.iter().position(|field| *field == form.focus).unwrap_or(0) as u16;
    if form.input(form.focus).is_some() {
        let x = popup_area.x + 1 + label_width + cursor_offset;
        let y = popup_area.y + 1 + 2 + focused_row;
        if x < popup_area.right().saturating_sub(1) && y < popup_area.bottom().saturating_sub(1) {
            f.set_cursor_position((x, y));
        }
    }
}

/// Tail of a single-line input that keeps the cursor within `width`
/// columns, and the cursor's column inside it.
fn visible_input(input: &TextInput, width: usize) -> (String, u16) {
    let chars: Vec<char> = input.value().chars().collect();
    let cursor = input.cursor().min(chars.len());
    let mut start = 0;
    let mut offset = Span::raw(chars[..cursor].iter().collect::<String>()).width();
    while offset >= width && start < cursor {
        offset -= Span::raw(chars[start].to_string()).width();
        start += 1;
    }
    (chars[start..].iter().collect(), offset as u16)
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_text = get_help_text();
    let help_lines: Vec<&str> = help_text.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!("JobB Help (Line {}/{})", start_line + 1, help_lines.len()))
            .style(Style::default().fg(Color::Cyan)))
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

fn get_help_text() -> &'static str {
    r#"JOBB - JOB APPLICATION BOARD

=== STAGES ===
1 Applied               6 Final Interview
2 Resume Screened       7 Offer
3 Phone Interview       8 Accepted
4 Technical Assessment  9 Rejected
5 Interview

Every application sits in exactly one stage column.

=== NAVIGATION ===
←→ or h/l       Move between stage columns
↑↓ or j/k       Move between cards in a column

=== MOVING CARDS ===
Space           Pick up the selected card, then Space again to drop it
                into the column under the cursor
Enter           Drop the card being moved
Esc             Cancel the move
1-9             Move the selected card straight to that stage
[ or <          Move the selected card one stage back
] or >          Move the selected card one stage forward
Mouse           Press on a card, drag it over a column and release
                Dragging over the outer columns scrolls the board
                On narrow screens click the < back / forward > buttons

Cards cannot step back from Applied or forward from Rejected.

=== APPLICATIONS ===
a               Add an application
e               Edit the selected application
d or Delete     Delete the selected application (asks first)

=== ADD / EDIT FORM ===
Tab or ↓        Next field
Shift+Tab or ↑  Previous field
←→              Change the stage (on the Stage field)
Enter           Save application
Esc             Discard and close

New applications start in Applied, dated today.

=== EXPORT ===
Ctrl+E          Export the board as CSV, or as JSON when the file
                name ends in .json
                An existing file is only replaced after a second Enter

The board lives in memory only: applications are gone when you quit.

=== HELP NAVIGATION ===
↑↓ or j/k       Scroll help text up/down one line
Page Up/Down    Scroll help text up/down 5 lines
Home            Jump to top of help text
Esc/F1/?/q      Close this help window
q               Quit (from the board)"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{Settings, StoreScope};
    use crate::domain::NewJobApplication;
    use ratatui::{backend::TestBackend, layout::Position, Terminal};

    fn render(app: &mut App, width: u16, height: u16) -> String {
        app.update_viewport_size(width, height);
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| render_ui(f, app)).unwrap();

        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn add(app: &App, company: &str, stage: Stage, notes: &str) {
        app.store.add(NewJobApplication {
            company: company.to_string(),
            position: "Backend Engineer".to_string(),
            stage,
            date_applied: "2024-01-10".to_string(),
            notes: notes.to_string(),
        });
    }

    #[test]
    fn test_empty_state() {
        let scope = StoreScope::new();
        let mut app = App::new(scope.handle(), Settings::default());
        let screen = render(&mut app, 140, 30);
        assert!(screen.contains("No applications yet"));
        assert!(screen.contains("[a] Add Application"));
        assert!(!screen.contains("Drop application here"));
    }

    #[test]
    fn test_board_shows_cards_in_columns() {
        let scope = StoreScope::new();
        let mut app = App::new(scope.handle(), Settings::default());
        add(&app, "Acme", Stage::Applied, "");
        add(&app, "Globex", Stage::ResumeScreened, "Referral");

        let screen = render(&mut app, 160, 30);
        assert!(screen.contains("1 Applied"));
        assert!(screen.contains("2 Resume Screened"));
        assert!(screen.contains("Acme"));
        assert!(screen.contains("Globex"));
        assert!(screen.contains("Applied: Jan 10, 2024"));
        assert!(screen.contains("Notes"));
        assert!(screen.contains("Drop application here"));
        assert!(screen.contains("1 applications"));
    }

    #[test]
    fn test_notes_badge_only_with_notes() {
        let scope = StoreScope::new();
        let mut app = App::new(scope.handle(), Settings::default());
        add(&app, "Acme", Stage::Applied, "");
        let screen = render(&mut app, 160, 30);
        assert!(!screen.contains(" Notes "));
    }

    #[test]
    fn test_compact_layout_shows_stepper() {
        let scope = StoreScope::new();
        let mut app = App::new(scope.handle(), Settings::default());
        add(&app, "Hooli", Stage::Applied, "");

        let screen = render(&mut app, 80, 24);
        assert!(screen.contains("Hooli"));
        assert!(screen.contains("[ < back"));
        assert!(screen.contains("Resume Screened > ]"));
        assert!(!screen.contains("[a] Add Application"));
    }

    #[test]
    fn test_form_popup() {
        let scope = StoreScope::new();
        let mut app = App::new(scope.handle(), Settings::default());
        app.open_add_form();
        let screen = render(&mut app, 120, 30);
        assert!(screen.contains("Add Job Application"));
        assert!(screen.contains("Company name"));
        assert!(screen.contains("< Applied >"));
        assert!(screen.contains("Save Application"));
    }

    #[test]
    fn test_form_scrolls_long_input_to_cursor() {
        let scope = StoreScope::new();
        let mut app = App::new(scope.handle(), Settings::default());
        app.open_add_form();
        let form = app.form.as_mut().unwrap();
        form.focus = FormField::Notes;
        let notes = format!("{}{}", "x".repeat(50), "follow up");
        for c in notes.chars() {
            form.focused_input_mut().unwrap().insert(c);
        }

        app.update_viewport_size(120, 30);
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| render_ui(f, &app)).unwrap();

        // Popup is 64x13 at (28, 8); Notes is the fifth field row
        let row: String = (0..120)
            .map(|x| terminal.backend().buffer()[(x, 15)].symbol().to_string())
            .collect();
        assert!(row.contains("Notes: xxx"));
        assert!(row.contains("follow up"));
        assert_eq!(terminal.get_cursor_position().unwrap(), Position::new(90, 15));
    }

    #[test]
    fn test_visible_input_measures_display_width() {
        let short = TextInput::new("Acme");
        assert_eq!(visible_input(&short, 48), ("Acme".to_string(), 4));

        let wide = TextInput::new("日本語の会社");
        let (visible, offset) = visible_input(&wide, 8);
        assert_eq!(visible, "の会社");
        assert_eq!(offset, 6);
    }

    #[test]
    fn test_help_popup() {
        let scope = StoreScope::new();
        let mut app = App::new(scope.handle(), Settings::default());
        app.show_help();
        let screen = render(&mut app, 120, 40);
        assert!(screen.contains("JobB Help"));
        assert!(screen.contains("MOVING CARDS"));
    }
}
