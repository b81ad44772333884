use crate::model::{Analysis, Correction, Review};

/// Which rendering of the review is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Rewritten text with inline correction markers
    Highlighted,
    /// Original and corrected text side by side
    Diff,
}

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// Details of the selected correction
    Detail,
    Help,
}

/// Focus area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Document,
    Sidebar,
}

/// Platform-agnostic viewer state
pub struct App {
    pub review: Option<Review>,
    pub analysis: Option<Analysis>,
    pub view: View,
    pub mode: Mode,
    pub focus: Focus,
    pub running: bool,

    /// Vertical scroll of the document pane, in lines
    pub scroll: u16,

    // Sidebar state, an index into the review's correction list
    pub sidebar_selected: usize,

    // Status message
    pub status_message: Option<String>,
}

impl App {
    pub fn new() -> Self {
        Self {
            review: None,
            analysis: None,
            view: View::Highlighted,
            mode: Mode::Normal,
            focus: Focus::Document,
            running: true,

            scroll: 0,
            sidebar_selected: 0,

            status_message: None,
        }
    }

    pub fn load_review(&mut self, review: Review) {
        self.analysis = Some(review.analyze());
        self.review = Some(review);
        self.sidebar_selected = 0;
        self.scroll = 0;
        self.mode = Mode::Normal;
    }

    pub fn corrections(&self) -> &[Correction] {
        self.review
            .as_ref()
            .map(|r| r.corrections())
            .unwrap_or_default()
    }

    /// Currently selected correction with its index
    pub fn selected_correction(&self) -> Option<(usize, &Correction)> {
        self.corrections()
            .get(self.sidebar_selected)
            .map(|c| (self.sidebar_selected, c))
    }

    /// Whether the correction at `index` was placed in the highlighted text
    pub fn is_placed(&self, index: usize) -> bool {
        self.analysis
            .as_ref()
            .is_some_and(|analysis| analysis.is_placed(index))
    }

    /// Navigate to next correction
    pub fn next_correction(&mut self) {
        let count = self.corrections().len();
        if count > 0 {
            self.sidebar_selected = (self.sidebar_selected + 1) % count;
        }
    }

    /// Navigate to previous correction
    pub fn prev_correction(&mut self) {
        let count = self.corrections().len();
        if count > 0 {
            self.sidebar_selected = if self.sidebar_selected == 0 {
                count - 1
            } else {
                self.sidebar_selected - 1
            };
        }
    }

    /// Show details of the selected correction
    pub fn open_detail(&mut self) {
        if self.selected_correction().is_some() {
            self.mode = Mode::Detail;
        } else {
            self.set_status("No corrections");
        }
    }

    pub fn close_popup(&mut self) {
        self.mode = Mode::Normal;
    }

    pub fn toggle_view(&mut self) {
        self.view = match self.view {
            View::Highlighted => View::Diff,
            View::Diff => View::Highlighted,
        };
        self.scroll = 0;
    }

    /// Toggle focus between document and sidebar
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Document => Focus::Sidebar,
            Focus::Sidebar => Focus::Document,
        };
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    /// Down/up keys move within whichever pane has focus
    pub fn move_down(&mut self) {
        match self.focus {
            Focus::Document => self.scroll_down(),
            Focus::Sidebar => self.next_correction(),
        }
    }

    pub fn move_up(&mut self) {
        match self.focus {
            Focus::Document => self.scroll_up(),
            Focus::Sidebar => self.prev_correction(),
        }
    }

    /// Set status message
    pub fn set_status(&mut self, msg: &str) {
        self.status_message = Some(msg.to_string());
    }

    /// Clear status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Model feedback with its report heading, when there is any to show
    pub fn feedback(&self) -> Option<(&'static str, &str)> {
        let review = self.review.as_ref()?;
        let feedback = review.response.feedback.trim();
        (!feedback.is_empty()).then(|| (review.dialect.report_title(), feedback))
    }

    /// Get title for display
    pub fn title(&self) -> String {
        match &self.review {
            Some(review) => format!("{} / {}", review.tone.short(), review.dialect.as_str()),
            None => "No review".to_string(),
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Dialect, GrammarResponse, Tone};

    fn sample_app() -> App {
        let response = GrammarResponse {
            rewritten_text: "There are too many cats.".to_string(),
            feedback: " Mind the homophones. ".to_string(),
            corrections: vec![
                Correction::new("Their", "There", Category::Grammar, ""),
                Correction::new("to", "too", Category::Grammar, ""),
                Correction::new("x", "", Category::Spelling, ""),
            ],
        };
        let mut app = App::new();
        app.load_review(Review::new(
            "Their are to many cats.".to_string(),
            Tone::Chat,
            Dialect::American,
            response,
        ));
        app
    }

    #[test]
    fn test_correction_navigation_wraps() {
        let mut app = sample_app();
        assert_eq!(app.selected_correction().map(|(i, _)| i), Some(0));

        app.prev_correction();
        assert_eq!(app.sidebar_selected, 2);

        app.next_correction();
        app.next_correction();
        assert_eq!(app.sidebar_selected, 1);
    }

    #[test]
    fn test_placement_is_reported_per_index() {
        let app = sample_app();
        assert!(app.is_placed(0));
        assert!(app.is_placed(1));
        assert!(!app.is_placed(2));
    }

    #[test]
    fn test_focus_routes_movement() {
        let mut app = sample_app();
        app.move_down();
        assert_eq!(app.scroll, 1);
        assert_eq!(app.sidebar_selected, 0);

        app.toggle_focus();
        app.move_down();
        assert_eq!(app.scroll, 1);
        assert_eq!(app.sidebar_selected, 1);
    }

    #[test]
    fn test_toggle_view_resets_scroll() {
        let mut app = sample_app();
        app.scroll_down();
        app.toggle_view();
        assert_eq!(app.view, View::Diff);
        assert_eq!(app.scroll, 0);
    }

    #[test]
    fn test_detail_requires_a_correction() {
        let mut app = App::new();
        app.open_detail();
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.status_message.as_deref(), Some("No corrections"));

        let mut app = sample_app();
        app.open_detail();
        assert_eq!(app.mode, Mode::Detail);
        assert_eq!(app.title(), "chat / American");
    }

    #[test]
    fn test_feedback_uses_dialect_heading() {
        let app = sample_app();
        assert_eq!(app.feedback(), Some(("Sheriff's Report", "Mind the homophones.")));

        let mut app = App::new();
        assert_eq!(app.feedback(), None);

        let response = GrammarResponse {
            rewritten_text: "Fine.".to_string(),
            feedback: "   ".to_string(),
            corrections: vec![],
        };
        app.load_review(Review::new("Fine.".to_string(), Tone::Original, Dialect::British, response));
        assert_eq!(app.feedback(), None);
    }
}
