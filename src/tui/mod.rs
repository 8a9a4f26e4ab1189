pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::{resolve_theme, Theme, ThemeColors};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};

pub async fn run_tui(mut app: App) -> anyhow::Result<()> {
    // Buffer stderr while TUI is active to prevent output corrupting the display
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

    // Flush buffered stderr messages now that the terminal is restored
    for msg in crate::stderr_buffer::drain() {
        eprintln!("{}", msg);
    }

    result
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.input_mode {
        app::InputMode::Normal => match key.code {
            // Quit
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.should_quit = true
            }

            // Subject navigation
            KeyCode::Char('j') | KeyCode::Down => app.next_row(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_row(),

            // Field navigation
            KeyCode::Tab | KeyCode::Char('l') | KeyCode::Right => app.next_field(),
            KeyCode::BackTab | KeyCode::Char('h') | KeyCode::Left => app.previous_field(),

            // Count editing
            KeyCode::Char(c) if c.is_ascii_digit() => app.type_digit(c),
            KeyCode::Backspace | KeyCode::Delete => app.delete_digit(),

            // Computation
            KeyCode::Enter | KeyCode::Char('c') => app.compute_selected(),
            KeyCode::Char('a') => app.compute_all(),
            KeyCode::Char('x') => app.reset(),

            KeyCode::Char('p') => app.start_prior_input(),
            KeyCode::Char('b') => app.show_rank_breakdown(),
            KeyCode::Char('?') => app.show_help(),

            _ => {}
        },
        app::InputMode::PriorInput => match key.code {
            KeyCode::Enter => app.confirm_prior_input(),
            KeyCode::Esc => app.cancel_prior_input(),
            KeyCode::Backspace => {
                app.prior_input.pop();
            }
            KeyCode::Char(c) => app.push_prior_char(c),
            // Ignore all other keys (don't propagate to Normal mode)
            _ => {}
        },
        app::InputMode::RankBreakdown => match key.code {
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Char('q') => app.dismiss_popup(),
            _ => {}
        },
        app::InputMode::Help => {
            // Any key exits help
            app.dismiss_popup();
        }
    }
}
