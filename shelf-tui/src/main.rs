mod app;
mod config;
mod keys;
mod log_buffer;
mod ui;

use std::time::{Duration, Instant};

use app::{App, FocusedPanel};
use config::Config;
use keys::Action;
use log_buffer::{LogBuffer, LogBufferLayer};
use shelf_core::{
    Command, Controller, Loader, ThemeManager,
    shelf_state::DatasetKind,
    theme::{EnvColorScheme, TomlPreferenceStore},
    tokio_thread::TokioThread,
};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, MouseButton, MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::layout::Rect;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

fn main() -> anyhow::Result<()> {
    let config = Config::load(Config::FILENAME)?;

    // Log to an in-app buffer instead of stdout, and to a file.
    let log_buffer = LogBuffer::with_capacity(config.general.log_capacity);
    let log_file = std::fs::File::create(&config.general.log_file)?;
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(LogBufferLayer::new(log_buffer.clone()))
        .with(file_layer)
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("shelf=info")),
        )
        .init();

    let mut theme = ThemeManager::new(
        Box::new(TomlPreferenceStore::new(&config.general.state_file)),
        Box::new(EnvColorScheme::from_env()),
    );
    theme.init_theme();

    let loader = Loader::new(
        config.sources.source(DatasetKind::Collection),
        config.sources.source(DatasetKind::Wantlist),
    );
    tracing::info!("loading from {}", config.sources.base_url);

    let (load_tx, load_rx) = std::sync::mpsc::channel();
    let tokio_thread = TokioThread::new()?;
    tokio_thread.spawn(async move {
        let result = loader.load_data().await;
        if load_tx.send(result).is_err() {
            tracing::debug!("UI closed before the load finished");
        }
    });

    let mut app = App::new(config, Controller::new(theme), load_rx, log_buffer);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick_rate = Duration::from_millis(app.config.general.tick_rate_ms);
    let result = run_app(&mut terminal, &mut app, tick_rate);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    tick_rate: Duration,
) -> anyhow::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        if app.needs_redraw {
            terminal.draw(|frame| ui::draw(frame, app))?;
            app.needs_redraw = false;
        }
        let term_size = terminal.size()?;
        let size = Rect::new(0, 0, term_size.width, term_size.height);

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            let mut scroll_delta: isize = 0;

            // Process the first event, then drain all remaining queued events.
            let mut process_event = |evt: Event, app: &mut App| match evt {
                Event::Key(key) if key.kind == event::KeyEventKind::Press => {
                    handle_key_event(app, &key);
                    app.needs_redraw = true;
                }
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp => scroll_delta -= 1,
                    MouseEventKind::ScrollDown => scroll_delta += 1,
                    _ => {
                        handle_mouse_event(app, &mouse, size);
                        app.needs_redraw = true;
                    }
                },
                Event::Resize(_, _) => {
                    app.needs_redraw = true;
                }
                _ => {}
            };

            process_event(event::read()?, app);
            while event::poll(Duration::ZERO)? {
                process_event(event::read()?, app);
            }

            // Apply coalesced scroll as a single operation.
            if scroll_delta != 0 {
                apply_scroll(app, scroll_delta);
                app.needs_redraw = true;
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key_event(app: &mut App, key: &event::KeyEvent) {
    match app.focused_panel {
        FocusedPanel::Table => {
            if let Some(action) = keys::table_action(key) {
                run_action(app, action);
            }
        }
        FocusedPanel::Search => {
            if let Some(action) = keys::search_action(key)
                && let Some(sa) = ui::search::handle_key(action)
            {
                match sa {
                    ui::search::SearchAction::Close => app.toggle_search(),
                    ui::search::SearchAction::Command(command) => app.dispatch(command),
                    ui::search::SearchAction::Table(action) => run_action(app, action),
                }
            }
        }
        FocusedPanel::Logs => {
            if let Some(action) = keys::logs_action(key)
                && let Some(la) = ui::logs::handle_key(&mut app.logs, action)
            {
                match la {
                    ui::logs::LogsAction::ToggleLogs => app.toggle_logs(),
                }
            }
        }
    }
}

/// Runs an action from a key in the table, a toolbar click or a help bar click.
fn run_action(app: &mut App, action: Action) {
    match action {
        Action::Quit => app.should_quit = true,
        Action::Search => app.toggle_search(),
        Action::Logs => app.toggle_logs(),
        Action::Back => app.focused_panel = FocusedPanel::Table,
        Action::CycleView => app.dispatch(Command::CycleView),
        Action::ShowView(kind) => app.dispatch(Command::SwitchView(kind)),
        Action::ToggleTheme => app.dispatch(Command::ToggleTheme),
        Action::SortBy(key) => app.dispatch(Command::SortBy(key)),
        Action::ClearLine => app.dispatch(Command::SearchClear),
        Action::MoveUp
        | Action::MoveDown
        | Action::PageUp
        | Action::PageDown
        | Action::GotoTop
        | Action::GotoBottom => {
            let row_count = app.controller.table().row_count();
            ui::table::handle_key(&mut app.table, row_count, action);
        }
        Action::Char(_) | Action::DeleteChar => {}
    }
}

fn handle_mouse_event(app: &mut App, mouse: &MouseEvent, size: Rect) {
    let main = ui::layout::split_main(size);
    let x = mouse.column;
    let y = mouse.row;

    let MouseEventKind::Down(MouseButton::Left) = mouse.kind else {
        return;
    };

    if ui::layout::contains(main.toolbar, x, y) {
        if let Some(action) = find_item(&app.toolbar_items, x) {
            run_action(app, action);
        }
        return;
    }

    if ui::layout::contains(main.search, x, y) {
        if app.focused_panel != FocusedPanel::Search {
            app.toggle_search();
        }
        return;
    }

    if ui::layout::contains(main.content, x, y) && app.focused_panel != FocusedPanel::Logs {
        if let Some(key) = ui::table::header_hit(main.content, x, y) {
            run_action(app, Action::SortBy(key));
        } else if let Some(index) = ui::table::row_hit(&app.table, main.content, x, y)
            && index < app.controller.table().row_count()
        {
            app.table.selected = index;
        }
        return;
    }

    if ui::layout::contains(main.help_bar, x, y)
        && let Some(action) = find_item(&app.help_bar_items, x)
    {
        run_action(app, action);
    }
}

fn find_item(items: &[(u16, u16, Action)], x: u16) -> Option<Action> {
    items
        .iter()
        .find(|(x_start, x_end, _)| x >= *x_start && x < *x_end)
        .map(|&(_, _, action)| action)
}

/// Applies a coalesced scroll delta to the currently focused panel.
fn apply_scroll(app: &mut App, scroll_delta: isize) {
    let steps = scroll_delta * ui::layout::SCROLL_WHEEL_STEPS as isize;

    match app.focused_panel {
        FocusedPanel::Table | FocusedPanel::Search => {
            let row_count = app.controller.table().row_count();
            app.table.move_by(steps, row_count);
        }
        FocusedPanel::Logs => app.logs.scroll_by(steps),
    }
}
