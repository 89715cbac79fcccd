//! The single owner of application state. Every user action and the load result arrive
//! as a [`Command`], and every command ends with the table rebuilt from scratch.

use shelf_state::{DatasetKind, Library};

use crate::{
    engine::apply_search_and_sort,
    error::LoadError,
    meta::LastUpdated,
    render::{TableView, render_table},
    theme::ThemeManager,
    view::{SortKey, ViewState},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Loading,
    Ready,
    Failed,
}

#[derive(Debug)]
pub enum Command {
    SwitchView(DatasetKind),
    CycleView,
    /// Replaces the whole search query.
    SearchInput(String),
    SearchPush(char),
    SearchPop,
    SearchClear,
    SortBy(SortKey),
    ToggleTheme,
    Loaded(Result<Library, LoadError>),
}

pub struct Controller {
    view: ViewState,
    library: Option<Library>,
    phase: LoadPhase,
    theme: ThemeManager,
    last_updated: LastUpdated,
    table: TableView,
}

impl Controller {
    pub fn new(theme: ThemeManager) -> Self {
        Self {
            view: ViewState::default(),
            library: None,
            phase: LoadPhase::Loading,
            theme,
            last_updated: LastUpdated::default(),
            table: TableView::loading(),
        }
    }

    pub fn dispatch(&mut self, command: Command) {
        match command {
            Command::SwitchView(kind) => self.switch_view(kind),
            Command::CycleView => self.switch_view(self.view.active_view.other()),
            Command::SearchInput(query) => self.edit_search(|q| *q = query),
            Command::SearchPush(c) => self.edit_search(|q| q.push(c)),
            Command::SearchPop => self.edit_search(|q| {
                q.pop();
            }),
            Command::SearchClear => self.edit_search(String::clear),
            Command::SortBy(key) => {
                // Sorting only becomes available once the data is in.
                if self.phase != LoadPhase::Ready {
                    tracing::debug!("ignoring sort by {key} before load");
                    return;
                }
                self.view.sort_by(key);
                self.refresh();
            }
            Command::ToggleTheme => self.theme.toggle_theme(),
            Command::Loaded(Ok(library)) => {
                self.library = Some(library);
                self.phase = LoadPhase::Ready;
                self.update_last_updated();
                self.refresh();
            }
            Command::Loaded(Err(e)) => {
                tracing::error!("failed to load data: {e}");
                self.phase = LoadPhase::Failed;
                self.table = TableView::failed();
            }
        }
    }

    fn switch_view(&mut self, kind: DatasetKind) {
        self.view.switch_view(kind);
        self.update_last_updated();
        self.refresh();
    }

    /// The query always tracks the input, but only filters once the data is in.
    fn edit_search(&mut self, edit: impl FnOnce(&mut String)) {
        edit(&mut self.view.search_query);
        if self.phase == LoadPhase::Ready {
            self.refresh();
        }
    }

    fn update_last_updated(&mut self) {
        let meta = self
            .library
            .as_ref()
            .and_then(|library| library.get(self.view.active_view).meta.as_ref());
        self.last_updated.update(meta);
    }

    fn refresh(&mut self) {
        let rows = apply_search_and_sort(self.library.as_ref(), &self.view);
        self.table = render_table(&rows, self.view.active_view);
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn table(&self) -> &TableView {
        &self.table
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn theme(&self) -> &ThemeManager {
        &self.theme
    }

    pub fn last_updated(&self) -> Option<&str> {
        self.last_updated.text()
    }
}
