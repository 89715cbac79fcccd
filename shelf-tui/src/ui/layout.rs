use ratatui::layout::{Constraint, Direction, Layout, Rect};

// ── Main vertical layout ────────────────────────────────────────────────────

pub const TOOLBAR_HEIGHT: u16 = 1;
pub const SEARCH_HEIGHT: u16 = 1;
pub const CONTENT_MIN_HEIGHT: u16 = 3;
pub const STATUS_BAR_HEIGHT: u16 = 1;
pub const HELP_BAR_HEIGHT: u16 = 1;

pub struct MainLayout {
    pub toolbar: Rect,
    pub search: Rect,
    pub content: Rect,
    pub status_bar: Rect,
    pub help_bar: Rect,
}

pub fn split_main(area: Rect) -> MainLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(TOOLBAR_HEIGHT),
            Constraint::Length(SEARCH_HEIGHT),
            Constraint::Min(CONTENT_MIN_HEIGHT),
            Constraint::Length(STATUS_BAR_HEIGHT),
            Constraint::Length(HELP_BAR_HEIGHT),
        ])
        .split(area);
    MainLayout {
        toolbar: chunks[0],
        search: chunks[1],
        content: chunks[2],
        status_bar: chunks[3],
        help_bar: chunks[4],
    }
}

// ── Table columns ───────────────────────────────────────────────────────────

/// Relative widths of artist, album and genre. Year gets a fixed minimum.
pub const TEXT_COLUMN_WEIGHTS: [u16; 3] = [4, 4, 3];
pub const COLUMN_SPACING: u16 = 1;
pub const YEAR_MIN_WIDTH: u16 = 6;

/// Horizontal extent of each column within `area`. Shared by drawing and hit-testing.
pub fn column_areas(area: Rect) -> Vec<Rect> {
    let [artist, album, genre] = TEXT_COLUMN_WEIGHTS;
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(artist),
            Constraint::Fill(album),
            Constraint::Fill(genre),
            Constraint::Min(YEAR_MIN_WIDTH),
        ])
        .spacing(COLUMN_SPACING)
        .split(area)
        .to_vec()
}

/// Splits the table area into the header line and the body.
pub fn split_table(area: Rect) -> (Rect, Rect) {
    let header = Rect::new(area.x, area.y, area.width, area.height.min(1));
    let body = Rect::new(
        area.x,
        area.y + header.height,
        area.width,
        area.height.saturating_sub(header.height),
    );
    (header, body)
}

pub fn contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
}

// ── Interaction constants ───────────────────────────────────────────────────

pub const PAGE_SCROLL_SIZE: usize = 20;
pub const SCROLL_WHEEL_STEPS: usize = 3;

// ── Log view ────────────────────────────────────────────────────────────────

pub const LOG_TARGET_WIDTH: usize = 24;
pub const LOG_TARGET_SUFFIX_LEN: usize = 21;
