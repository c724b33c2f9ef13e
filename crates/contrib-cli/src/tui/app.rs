use contrib_core::{Day, Viewport, WidgetSettings, YearSetting, DAYS_PER_WEEK};
use contrib_layout::{GridView, Tooltip};
use contrib_sync::{Signal, ViewFrame, ViewState};
use crossterm::event::{KeyCode, KeyEvent};

/// Pixel size assumed for one terminal cell when reporting a viewport.
pub const CELL_PX: (f64, f64) = (8.0, 16.0);

pub fn viewport_for(cols: u16, rows: u16) -> Viewport {
    Viewport::new(f64::from(cols) * CELL_PX.0, f64::from(rows) * CELL_PX.1)
}

/// Application state for the TUI.
pub struct App {
    pub should_quit: bool,
    /// Refreshes suspended by the user.
    pub paused: bool,
    /// Latest frame published by the controller.
    pub frame: ViewFrame,
    /// Local copy used to build replacement snapshots.
    pub settings: WidgetSettings,
    /// Selected cell as (week column, weekday row).
    pub selected: (usize, usize),
}

impl App {
    pub fn new(settings: WidgetSettings) -> Self {
        Self {
            should_quit: false,
            paused: false,
            frame: ViewFrame {
                settings: settings.clone(),
                ..ViewFrame::default()
            },
            settings,
            selected: (0, 0),
        }
    }

    /// Take a new frame and keep the selection inside the grid.
    pub fn update(&mut self, frame: ViewFrame) {
        self.frame = frame;
        if let Some(grid) = self.frame.grid.as_deref() {
            let last_week = grid.weeks.len().saturating_sub(1);
            self.selected.0 = self.selected.0.min(last_week);
        }
    }

    pub fn grid(&self) -> Option<&GridView> {
        self.frame.grid.as_deref()
    }

    /// Year on screen, if any data has loaded.
    pub fn shown_year(&self) -> Option<i32> {
        match &self.frame.state {
            ViewState::Ready { year, .. } => Some(*year),
            _ => None,
        }
    }

    pub fn selected_day(&self) -> Option<&Day> {
        let (w, d) = self.selected;
        self.grid()?.weeks.get(w)?.days.get(d)
    }

    /// Hover text for the selected cell, positioned as if the pointer sat on
    /// the cell's top-left corner.
    pub fn tooltip(&self) -> Option<Tooltip> {
        let grid = self.grid()?;
        let day = self.selected_day()?;
        let m = &grid.metrics;
        let (w, d) = self.selected;
        let x = m.padding
            + f64::from(m.day_label_gutter_width)
            + w as f64 * f64::from(m.cell_width + m.cell_gap);
        let y = m.padding
            + m.header_height
            + f64::from(m.month_row_height)
            + d as f64 * f64::from(m.cell_height + m.cell_gap);
        Some(Tooltip::at(day, x, y))
    }

    /// Handle a key press. Returns the signal to forward, if any.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Signal> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                Some(Signal::Shutdown)
            }
            KeyCode::Char('r') => Some(Signal::Retry),
            KeyCode::Char('f') => Some(Signal::RefreshTick),
            KeyCode::Char(' ') => {
                self.paused = !self.paused;
                Some(Signal::Visibility { hidden: self.paused })
            }
            KeyCode::Char('m') => self.reconfigure(|s| s.display_mode = s.display_mode.toggled()),
            KeyCode::Char('l') => self.reconfigure(|s| s.show_labels = !s.show_labels),
            KeyCode::Char('d') => self.reconfigure(|s| s.show_day_labels = !s.show_day_labels),
            KeyCode::Char('s') => self.reconfigure(|s| s.show_stats = !s.show_stats),
            KeyCode::Char('[') => self.step_year(-1),
            KeyCode::Char(']') => self.step_year(1),
            KeyCode::Char('c') => self.reconfigure(|s| s.year = YearSetting::Current),
            KeyCode::Left => self.move_selection(-1, 0),
            KeyCode::Right => self.move_selection(1, 0),
            KeyCode::Up => self.move_selection(0, -1),
            KeyCode::Down => self.move_selection(0, 1),
            _ => None,
        }
    }

    fn reconfigure(&mut self, change: impl FnOnce(&mut WidgetSettings)) -> Option<Signal> {
        change(&mut self.settings);
        Some(Signal::Reconfigure(Box::new(self.settings.clone())))
    }

    fn step_year(&mut self, delta: i32) -> Option<Signal> {
        let base = match self.settings.year {
            YearSetting::Fixed(y) => y,
            YearSetting::Current => self.shown_year()?,
        };
        self.reconfigure(|s| s.year = YearSetting::Fixed(base + delta))
    }

    fn move_selection(&mut self, dw: isize, dd: isize) -> Option<Signal> {
        let weeks = self.grid().map_or(0, |g| g.weeks.len());
        if weeks == 0 {
            return None;
        }
        let (w, d) = self.selected;
        self.selected = (
            w.saturating_add_signed(dw).min(weeks - 1),
            d.saturating_add_signed(dd).min(DAYS_PER_WEEK - 1),
        );
        None
    }
}
