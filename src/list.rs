use crate::countries;
use ratatui::widgets::ListState;

/// List view state: a live search term plus a cursor over the filtered rows.
/// Filtering only affects which rows render; it never touches the selection.
pub struct ListView {
    search: String,
    state: ListState,
}

impl ListView {
    pub fn new() -> Self {
        let mut state = ListState::default();
        state.select(Some(0));
        Self { search: String::new(), state }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Rows matching the search term: a literal case-insensitive substring
    /// test, no diacritic normalization. An empty term matches everything.
    pub fn filtered(&self) -> Vec<&'static str> {
        let term = self.search.to_lowercase();
        countries::ALL
            .iter()
            .filter(|name| name.to_lowercase().contains(&term))
            .copied()
            .collect()
    }

    pub fn push_char(&mut self, c: char) {
        self.search.push(c);
        self.clamp_cursor();
    }

    pub fn backspace(&mut self) {
        self.search.pop();
        self.clamp_cursor();
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
        self.clamp_cursor();
    }

    pub fn move_up(&mut self) {
        let cur = self.state.selected().unwrap_or(0);
        self.state.select(Some(cur.saturating_sub(1)));
    }

    pub fn move_down(&mut self) {
        let len = self.filtered().len();
        if len == 0 {
            return;
        }
        let cur = self.state.selected().unwrap_or(0);
        self.state.select(Some((cur + 1).min(len - 1)));
    }

    /// Move the cursor to a visible row (mouse click), returning its name.
    pub fn select_row(&mut self, index: usize) -> Option<&'static str> {
        let rows = self.filtered();
        let name = rows.get(index).copied()?;
        self.state.select(Some(index));
        Some(name)
    }

    /// Name under the cursor, if the filtered view is non-empty.
    pub fn cursor_name(&self) -> Option<&'static str> {
        let rows = self.filtered();
        rows.get(self.state.selected()?).copied()
    }

    /// Scroll offset of the rendered list (for mapping mouse rows).
    pub fn offset(&self) -> usize {
        self.state.offset()
    }

    pub fn state_mut(&mut self) -> &mut ListState {
        &mut self.state
    }

    fn clamp_cursor(&mut self) {
        let len = self.filtered().len();
        let cur = self.state.selected().unwrap_or(0);
        if len == 0 {
            self.state.select(Some(0));
            *self.state.offset_mut() = 0;
        } else if cur >= len {
            self.state.select(Some(len - 1));
        }
    }
}

impl Default for ListView {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_term_matches_all_in_order() {
        let view = ListView::new();
        let rows = view.filtered();
        assert_eq!(rows.len(), countries::ALL.len());
        assert_eq!(rows.as_slice(), &countries::ALL);
    }

    #[test]
    fn test_case_insensitive_substring() {
        let mut view = ListView::new();
        for c in "fRaN".chars() {
            view.push_char(c);
        }
        assert_eq!(view.filtered(), ["France"]);
    }

    #[test]
    fn test_substring_matches_interior() {
        let mut view = ListView::new();
        for c in "stan".chars() {
            view.push_char(c);
        }
        let rows = view.filtered();
        assert!(rows.contains(&"Afghanistan"));
        assert!(rows.contains(&"Kazakhstan"));
        assert!(!rows.contains(&"France"));
    }

    #[test]
    fn test_no_match_yields_empty() {
        let mut view = ListView::new();
        for c in "zzzz".chars() {
            view.push_char(c);
        }
        assert!(view.filtered().is_empty());
        assert!(view.cursor_name().is_none());
    }

    #[test]
    fn test_backspace_restores_matches() {
        let mut view = ListView::new();
        view.push_char('q');
        view.push_char('q');
        assert!(view.filtered().is_empty());
        view.backspace();
        view.backspace();
        assert_eq!(view.filtered().len(), countries::ALL.len());
    }

    #[test]
    fn test_cursor_clamped_to_filtered_rows() {
        let mut view = ListView::new();
        for _ in 0..50 {
            view.move_down();
        }
        for c in "fra".chars() {
            view.push_char(c);
        }
        // The cursor cannot point past the (much shorter) filtered view
        assert!(view.cursor_name().is_some());
    }
}
