pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::{resolve_theme, Theme, ThemeColors};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};

use app::COARSE_STEP;

pub async fn run_tui(mut app: App) -> anyhow::Result<()> {
    // Buffer log output while TUI is active to prevent it corrupting the display
    crate::stderr_buffer::activate();

    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();

    let mut events = EventHandler::new(250);

    let result = loop {
        if let Err(e) = terminal.draw(|frame| ui::draw(frame, &mut app)) {
            break Err(e.into());
        }

        match events.next().await {
            Event::Key(key) => handle_key_event(&mut app, key),
            Event::Tick => app.update_flash(),
        }

        if app.should_quit {
            break Ok(());
        }
    };

    ratatui::restore();

    // Flush buffered log lines now that the terminal is restored
    for line in crate::stderr_buffer::drain() {
        eprintln!("{}", line);
    }

    result
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.input_mode {
        app::InputMode::Normal => {
            let coarse = key.modifiers.contains(KeyModifiers::SHIFT);
            match key.code {
                // Quit
                KeyCode::Char('q') => app.should_quit = true,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    app.should_quit = true
                }

                // Slider focus
                KeyCode::Up | KeyCode::BackTab => app.focus_previous_slider(),
                KeyCode::Down | KeyCode::Tab => app.focus_next_slider(),

                // Slider movement
                KeyCode::Left => {
                    let step = if coarse { COARSE_STEP } else { app.slider_step };
                    app.nudge_focused(-step);
                }
                KeyCode::Right => {
                    let step = if coarse { COARSE_STEP } else { app.slider_step };
                    app.nudge_focused(step);
                }
                KeyCode::Char('[') => app.nudge_focused(-COARSE_STEP),
                KeyCode::Char(']') => app.nudge_focused(COARSE_STEP),

                KeyCode::Char('r') => app.reset_weights(),

                // Subset toggles
                KeyCode::Char(c @ '1'..='9') => {
                    if let Some(n) = c.to_digit(10) {
                        app.toggle_subset_at(n as usize);
                    }
                }

                // Table navigation
                KeyCode::Char('j') => app.next_row(),
                KeyCode::Char('k') => app.previous_row(),

                // Column sorting
                KeyCode::Char('<') | KeyCode::Char(',') => app.header_cursor_left(),
                KeyCode::Char('>') | KeyCode::Char('.') => app.header_cursor_right(),
                KeyCode::Char('s') | KeyCode::Enter => app.click_header(),

                KeyCode::Char('b') => app.show_score_breakdown(),
                KeyCode::Char('o') => app.open_reference(),
                KeyCode::Char('?') => app.show_help(),

                _ => {}
            }
        }
        app::InputMode::ScoreBreakdown => match key.code {
            KeyCode::Esc | KeyCode::Char('b') => app.dismiss_score_breakdown(),
            KeyCode::Char('j') | KeyCode::Down => app.next_row(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_row(),
            _ => {}
        },
        app::InputMode::Help => {
            // Any key exits help
            app.dismiss_help();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::SortColumn;
    use app::tests::test_app;

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_quit_keys() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);

        let mut app = test_app();
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }

    #[test]
    fn test_arrows_move_focused_slider() {
        let mut app = test_app();
        press(&mut app, KeyCode::Down);
        assert_eq!(app.focused_slider, 1);

        press(&mut app, KeyCode::Right);
        assert!((app.view_model.weights().get(1) - 35.0).abs() < 1e-9);

        handle_key_event(&mut app, KeyEvent::new(KeyCode::Left, KeyModifiers::SHIFT));
        assert!((app.view_model.weights().get(1) - 25.0).abs() < 1e-9);
        assert!((app.view_model.weights().sum() - 100.0).abs() < 1e-6);
        assert_eq!(app.view_model.revision(), 2);
    }

    #[test]
    fn test_bracket_keys_coarse_step() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char(']'));
        assert!((app.view_model.weights().get(0) - 40.0).abs() < 1e-9);
        press(&mut app, KeyCode::Char('['));
        assert!((app.view_model.weights().get(0) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_digit_toggles_subset() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.rows().len(), 1);
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.rows().len(), 2);
    }

    #[test]
    fn test_header_keys_sort() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('>'));
        assert_eq!(app.header_cursor_column(), SortColumn::InstituteId);
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.view_model.sort().unwrap().column, SortColumn::InstituteId);
    }

    #[test]
    fn test_help_dismissed_by_any_key() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.input_mode, app::InputMode::Help);
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.input_mode, app::InputMode::Normal);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_breakdown_mode_navigates_rows() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('b'));
        assert_eq!(app.input_mode, app::InputMode::ScoreBreakdown);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.table_state.selected(), Some(1));
        // Slider focus untouched while the popup is open
        assert_eq!(app.focused_slider, 0);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input_mode, app::InputMode::Normal);
    }
}
