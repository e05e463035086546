use std::time::Instant;

use crate::dashboard::{Gesture, ViewModel};
use crate::scoring::{RankedRow, SortColumn, CRITERIA_COUNT};
use crate::tui::theme::ThemeColors;

/// Slider move for the coarse keys (Shift+arrows, `[` and `]`).
pub const COARSE_STEP: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    Help,
    ScoreBreakdown,
}

pub struct App {
    pub view_model: ViewModel,
    pub table_state: ratatui::widgets::TableState,
    pub focused_slider: usize,
    /// Index into `SortColumn::all()` of the header the cursor is on
    pub header_cursor: usize,
    pub input_mode: InputMode,
    pub flash_message: Option<(String, Instant)>,
    pub should_quit: bool,
    pub slider_step: f64,
    pub reference_url: String,
    pub colors: ThemeColors,
}

impl App {
    pub fn new(
        view_model: ViewModel,
        slider_step: f64,
        reference_url: String,
        colors: ThemeColors,
    ) -> Self {
        let mut table_state = ratatui::widgets::TableState::default();
        if !view_model.rows().is_empty() {
            table_state.select(Some(0));
        }

        Self {
            view_model,
            table_state,
            focused_slider: 0,
            header_cursor: 0,
            input_mode: InputMode::Normal,
            flash_message: None,
            should_quit: false,
            slider_step,
            reference_url,
            colors,
        }
    }

    pub fn rows(&self) -> &[RankedRow] {
        self.view_model.rows()
    }

    pub fn next_row(&mut self) {
        let len = self.rows().len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        let len = self.rows().len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    pub fn selected_row(&self) -> Option<&RankedRow> {
        self.table_state.selected().and_then(|i| self.rows().get(i))
    }

    pub fn focus_next_slider(&mut self) {
        self.focused_slider = (self.focused_slider + 1) % CRITERIA_COUNT;
    }

    pub fn focus_previous_slider(&mut self) {
        self.focused_slider = (self.focused_slider + CRITERIA_COUNT - 1) % CRITERIA_COUNT;
    }

    /// Move the focused slider by `delta` as if the user dragged it.
    pub fn nudge_focused(&mut self, delta: f64) {
        if let Err(e) = self.view_model.nudge_slider(self.focused_slider, delta) {
            self.show_flash(format!("Error: {}", e));
        }
        self.clamp_selection();
    }

    pub fn reset_weights(&mut self) {
        match self.view_model.handle(Gesture::Reset) {
            Ok(_) => self.show_flash("Weights reset to defaults".to_string()),
            Err(e) => self.show_flash(format!("Error: {}", e)),
        }
        self.clamp_selection();
    }

    /// Toggle the subset at 1-based position `n` in the config.
    pub fn toggle_subset_at(&mut self, n: usize) {
        let name = match n
            .checked_sub(1)
            .and_then(|i| self.view_model.subsets().iter().nth(i))
        {
            Some(subset) => subset.name.clone(),
            None => return,
        };

        match self.view_model.handle(Gesture::ToggleSubset(name.clone())) {
            Ok(_) => {
                let shown = self
                    .view_model
                    .subsets()
                    .get(&name)
                    .map(|s| s.included)
                    .unwrap_or(true);
                let verb = if shown { "Showing" } else { "Hiding" };
                self.show_flash(format!("{} {}", verb, name));
            }
            Err(e) => self.show_flash(format!("Error: {}", e)),
        }
        self.clamp_selection();
    }

    pub fn header_cursor_column(&self) -> SortColumn {
        let columns = SortColumn::all();
        columns[self.header_cursor.min(columns.len() - 1)]
    }

    pub fn header_cursor_right(&mut self) {
        self.header_cursor = (self.header_cursor + 1) % SortColumn::all().len();
    }

    pub fn header_cursor_left(&mut self) {
        let len = SortColumn::all().len();
        self.header_cursor = (self.header_cursor + len - 1) % len;
    }

    /// Click the header under the cursor: ascending, descending, then back
    /// to score order.
    pub fn click_header(&mut self) {
        let column = self.header_cursor_column();
        match self.view_model.handle(Gesture::HeaderClick(column)) {
            Ok(_) => {
                let title = column.title(self.view_model.criteria());
                match self.view_model.sort() {
                    Some(spec) => self.show_flash(format!("Sorted by {} ({})", title, spec.direction)),
                    None => self.show_flash("Sorted by score".to_string()),
                }
            }
            Err(e) => self.show_flash(format!("Error: {}", e)),
        }
        if !self.rows().is_empty() {
            self.table_state.select(Some(0));
        }
    }

    /// Open the methodology document in the browser
    pub fn open_reference(&mut self) {
        match crate::browser::open_url(&self.reference_url) {
            Ok(()) => self.show_flash("Opened methodology document".to_string()),
            Err(e) => self.show_flash(format!("Failed to open browser: {}", e)),
        }
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= 3 {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn show_score_breakdown(&mut self) {
        if self.selected_row().is_some() {
            self.input_mode = InputMode::ScoreBreakdown;
        }
    }

    pub fn dismiss_score_breakdown(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Keep the selection inside the (possibly shorter) row list.
    fn clamp_selection(&mut self) {
        let len = self.rows().len();
        if len == 0 {
            self.table_state.select(None);
        } else {
            match self.table_state.selected() {
                Some(i) if i >= len => self.table_state.select(Some(len - 1)),
                None => self.table_state.select(Some(0)),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::SubsetConfig;
    use crate::data::Institution;
    use crate::scoring::{BalancePolicy, CriteriaSet, SortDirection, WeightVector};
    use crate::subsets::SubsetState;

    pub(crate) fn test_app() -> App {
        let institutions = vec![
            Institution {
                id: "IR-1".to_string(),
                name: "Indian Institute of Technology Alpha".to_string(),
                subscores: [95.0, 40.0, 50.0, 50.0, 50.0],
            },
            Institution {
                id: "IR-2".to_string(),
                name: "Gamma University".to_string(),
                subscores: [40.0, 90.0, 50.0, 50.0, 50.0],
            },
        ];
        let subsets = SubsetState::from_config(&[SubsetConfig {
            name: "IITs".to_string(),
            patterns: vec!["Indian Institute of Technology*".to_string()],
            ids: vec![],
            included: true,
        }])
        .unwrap();
        let vm = ViewModel::new(
            CriteriaSet::default(),
            BalancePolicy::SumPreserving,
            WeightVector::default(),
            institutions,
            subsets,
        );
        App::new(vm, 5.0, "https://example.org".to_string(), ThemeColors::dark())
    }

    #[test]
    fn test_new_selects_first_row() {
        let app = test_app();
        assert_eq!(app.table_state.selected(), Some(0));
        assert_eq!(app.selected_row().unwrap().institution.id, "IR-1");
    }

    #[test]
    fn test_row_navigation_wraps() {
        let mut app = test_app();
        app.previous_row();
        assert_eq!(app.table_state.selected(), Some(1));
        app.next_row();
        assert_eq!(app.table_state.selected(), Some(0));
    }

    #[test]
    fn test_slider_focus_wraps() {
        let mut app = test_app();
        app.focus_previous_slider();
        assert_eq!(app.focused_slider, 4);
        app.focus_next_slider();
        assert_eq!(app.focused_slider, 0);
    }

    #[test]
    fn test_nudge_focused_rebalances() {
        let mut app = test_app();
        app.nudge_focused(10.0);
        let weights = app.view_model.weights();
        assert!((weights.get(0) - 40.0).abs() < 1e-9);
        assert!((weights.sum() - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_toggle_subset_hides_rows_and_clamps_selection() {
        let mut app = test_app();
        app.table_state.select(Some(1));
        app.toggle_subset_at(1);
        assert_eq!(app.rows().len(), 1);
        assert_eq!(app.table_state.selected(), Some(0));
        assert_eq!(app.flash_message.as_ref().unwrap().0, "Hiding IITs");

        // Out-of-range positions do nothing
        app.toggle_subset_at(9);
        app.toggle_subset_at(0);
        assert_eq!(app.rows().len(), 1);
    }

    #[test]
    fn test_click_header_cycles() {
        let mut app = test_app();
        // Rank, Institute Id, Name
        app.header_cursor_right();
        app.header_cursor_right();
        assert_eq!(app.header_cursor_column(), SortColumn::Name);

        app.click_header();
        assert_eq!(app.view_model.sort().unwrap().direction, SortDirection::Ascending);
        assert_eq!(app.rows()[0].institution.id, "IR-2");
        app.click_header();
        assert_eq!(app.view_model.sort().unwrap().direction, SortDirection::Descending);
        app.click_header();
        assert!(app.view_model.sort().is_none());
        assert_eq!(app.flash_message.as_ref().unwrap().0, "Sorted by score");
    }

    #[test]
    fn test_header_cursor_wraps_left() {
        let mut app = test_app();
        app.header_cursor_left();
        assert_eq!(app.header_cursor_column(), SortColumn::Score);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut app = test_app();
        app.nudge_focused(25.0);
        app.reset_weights();
        assert_eq!(app.view_model.weights(), &WeightVector::default());
    }
}
