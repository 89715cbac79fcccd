use std::sync::mpsc::Receiver;

use shelf_core::{Command, Controller, LoadError, shelf_state::Library};

use crate::{
    config::Config,
    keys::Action,
    log_buffer::LogBuffer,
    ui::{logs::LogsState, table::TableState},
};

/// Which panel/mode the UI is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPanel {
    Table,
    Search,
    Logs,
}

pub struct App {
    pub config: Config,
    pub controller: Controller,
    pub load_rx: Receiver<Result<Library, LoadError>>,

    pub focused_panel: FocusedPanel,
    pub should_quit: bool,
    pub needs_redraw: bool,
    /// Clickable spans from the last draw, as `(x_start, x_end, action)`.
    pub toolbar_items: Vec<(u16, u16, Action)>,
    pub help_bar_items: Vec<(u16, u16, Action)>,

    pub table: TableState,
    pub logs: LogsState,
}

impl App {
    pub fn new(
        config: Config,
        controller: Controller,
        load_rx: Receiver<Result<Library, LoadError>>,
        log_buffer: LogBuffer,
    ) -> Self {
        Self {
            config,
            controller,
            load_rx,

            focused_panel: FocusedPanel::Table,
            should_quit: false,
            needs_redraw: true,
            toolbar_items: vec![],
            help_bar_items: vec![],

            table: TableState::default(),
            logs: LogsState::new(log_buffer),
        }
    }

    pub fn tick(&mut self) {
        while let Ok(result) = self.load_rx.try_recv() {
            self.dispatch(Command::Loaded(result));
        }
        // The log panel follows new entries.
        if self.focused_panel == FocusedPanel::Logs {
            self.needs_redraw = true;
        }
    }

    /// Passes a command to the controller. Anything that rebuilds the rows starts the
    /// selection over from the top.
    pub fn dispatch(&mut self, command: Command) {
        let resets_selection = !matches!(command, Command::ToggleTheme);
        self.controller.dispatch(command);
        if resets_selection {
            self.table.reset();
        }
        self.needs_redraw = true;
    }

    pub fn toggle_search(&mut self) {
        if self.focused_panel == FocusedPanel::Search {
            self.focused_panel = FocusedPanel::Table;
        } else {
            self.focused_panel = FocusedPanel::Search;
        }
    }

    pub fn toggle_logs(&mut self) {
        if self.focused_panel == FocusedPanel::Logs {
            self.focused_panel = FocusedPanel::Table;
        } else {
            self.focused_panel = FocusedPanel::Logs;
            self.logs.scroll_to_end();
        }
    }
}
