//! Question composer
//!
//! Holds the draft question and mediates between user input and the
//! analyze handler owned by the host. The loading flag is never stored
//! here: every guarded operation receives it from the caller.

/// Preset questions offered below the text field, in display order
pub const EXAMPLE_PROMPTS: &[&str] = &[
    "Son 6 ayda en çok gelir getiren kategori hangisi?",
    "En pahalı 5 ürün nedir?",
    "Aylık satış trendini göster",
    "En çok sipariş veren 10 müşteri kim?",
    "Bölgelere göre toplam satış tutarı nedir?",
];

/// Label shown on the submit control when idle
pub const SUBMIT_LABEL: &str = "Analyze";

/// Label shown on the submit control while an analysis is in flight
pub const SUBMIT_LABEL_LOADING: &str = "Analyzing...";

/// Receives a submitted question. The composer ignores whatever the
/// handler does with it.
pub trait AnalyzeHandler {
    fn analyze(&mut self, question: &str);
}

impl<F> AnalyzeHandler for F
where
    F: FnMut(&str),
{
    fn analyze(&mut self, question: &str) {
        self(question)
    }
}

/// What the composer's controls must look like for a given draft and loading flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposerView {
    pub field_disabled: bool,
    pub submit_disabled: bool,
    pub submit_label: &'static str,
    pub in_progress: bool,
    pub presets_disabled: bool,
    pub presets: &'static [&'static str],
}

#[derive(Debug, Clone, Default)]
pub struct QuestionComposer {
    draft: String,
    highlighted: usize,  // Preset under the keyboard cursor
}

impl QuestionComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Replace the draft with the field's full text
    pub fn edit_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Whether the trimmed draft has anything to send
    pub fn has_question(&self) -> bool {
        !self.draft.trim().is_empty()
    }

    /// Hand the draft to `handler` if it is non-blank and nothing is loading.
    /// Returns whether the handler was invoked. The draft is kept as-is.
    pub fn submit<H: AnalyzeHandler + ?Sized>(&self, loading: bool, handler: &mut H) -> bool {
        if loading || !self.has_question() {
            tracing::debug!(loading, "Submit suppressed");
            return false;
        }

        handler.analyze(&self.draft);
        true
    }

    /// Overwrite the draft with preset `index`. Does nothing while loading
    /// or for an index outside [`EXAMPLE_PROMPTS`].
    pub fn select_preset(&mut self, index: usize, loading: bool) -> bool {
        if loading {
            return false;
        }

        match EXAMPLE_PROMPTS.get(index) {
            Some(preset) => {
                self.edit_draft(*preset);
                self.highlighted = index;
                true
            }
            None => false,
        }
    }

    pub fn view(&self, loading: bool) -> ComposerView {
        ComposerView {
            field_disabled: loading,
            submit_disabled: loading || !self.has_question(),
            submit_label: if loading { SUBMIT_LABEL_LOADING } else { SUBMIT_LABEL },
            in_progress: loading,
            presets_disabled: loading,
            presets: EXAMPLE_PROMPTS,
        }
    }

    // Keystroke helpers: each builds the field's next full text and routes it through edit_draft

    pub fn insert_char(&mut self, c: char) {
        let mut text = self.draft.clone();
        text.push(c);
        self.edit_draft(text);
    }

    pub fn backspace(&mut self) {
        let mut text = self.draft.clone();
        text.pop();
        self.edit_draft(text);
    }

    pub fn clear(&mut self) {
        self.edit_draft(String::new());
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn highlight_next(&mut self) {
        self.highlighted = (self.highlighted + 1) % EXAMPLE_PROMPTS.len();
    }

    pub fn highlight_prev(&mut self) {
        self.highlighted = self
            .highlighted
            .checked_sub(1)
            .unwrap_or(EXAMPLE_PROMPTS.len() - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every question it receives
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl AnalyzeHandler for Recorder {
        fn analyze(&mut self, question: &str) {
            self.calls.push(question.to_string());
        }
    }

    #[test]
    fn test_new_composer_starts_empty() {
        let composer = QuestionComposer::new();
        assert_eq!(composer.draft(), "");
        assert!(!composer.has_question());
    }

    #[test]
    fn test_submit_passes_untrimmed_draft_once() {
        let mut composer = QuestionComposer::new();
        let mut recorder = Recorder::default();

        for text in ["a", "  padded question  ", "\tçok satan\n", "x y z"] {
            recorder.calls.clear();
            composer.edit_draft(text);
            assert!(composer.submit(false, &mut recorder));
            assert_eq!(recorder.calls, vec![text.to_string()]);
        }
    }

    #[test]
    fn test_submit_ignores_blank_drafts() {
        let mut composer = QuestionComposer::new();
        let mut recorder = Recorder::default();

        for text in ["", " ", "   \t\n  "] {
            composer.edit_draft(text);
            assert!(!composer.submit(false, &mut recorder));
            assert!(!composer.submit(true, &mut recorder));
        }
        assert!(recorder.calls.is_empty());
    }

    #[test]
    fn test_submit_ignored_while_loading() {
        let mut composer = QuestionComposer::new();
        let mut recorder = Recorder::default();

        composer.edit_draft("En pahalı 5 ürün nedir?");
        assert!(!composer.submit(true, &mut recorder));
        assert!(recorder.calls.is_empty());
        assert_eq!(composer.draft(), "En pahalı 5 ürün nedir?");
    }

    #[test]
    fn test_submit_keeps_draft() {
        let mut composer = QuestionComposer::new();
        let question = "Son 6 ayda en çok gelir getiren kategori hangisi?";
        let mut calls = 0;

        composer.edit_draft(question);
        assert!(composer.submit(false, &mut |q: &str| {
            assert_eq!(q, question);
            calls += 1;
        }));
        assert_eq!(calls, 1);
        assert_eq!(composer.draft(), question);
    }

    #[test]
    fn test_edit_draft_replaces_rather_than_appends() {
        let mut composer = QuestionComposer::new();
        composer.edit_draft("hello");
        composer.edit_draft("hello");
        assert_eq!(composer.draft(), "hello");
    }

    #[test]
    fn test_select_preset_overwrites_draft() {
        let mut composer = QuestionComposer::new();
        composer.edit_draft("something typed earlier");

        assert!(composer.select_preset(1, false));
        assert_eq!(composer.draft(), "En pahalı 5 ürün nedir?");
        assert_eq!(composer.highlighted(), 1);

        let mut recorder = Recorder::default();
        assert!(composer.submit(false, &mut recorder));
        assert_eq!(recorder.calls, vec!["En pahalı 5 ürün nedir?".to_string()]);
    }

    #[test]
    fn test_select_preset_does_not_submit() {
        let mut composer = QuestionComposer::new();
        let mut recorder = Recorder::default();

        composer.select_preset(0, false);
        assert!(recorder.calls.is_empty());
    }

    #[test]
    fn test_select_preset_ignored_while_loading() {
        let mut composer = QuestionComposer::new();
        composer.edit_draft("draft");

        for index in 0..EXAMPLE_PROMPTS.len() {
            assert!(!composer.select_preset(index, true));
            assert_eq!(composer.draft(), "draft");
        }
    }

    #[test]
    fn test_select_preset_out_of_range() {
        let mut composer = QuestionComposer::new();
        composer.edit_draft("draft");
        assert!(!composer.select_preset(EXAMPLE_PROMPTS.len(), false));
        assert_eq!(composer.draft(), "draft");
    }

    #[test]
    fn test_view_empty_draft() {
        let composer = QuestionComposer::new();
        let view = composer.view(false);

        assert!(!view.field_disabled);
        assert!(view.submit_disabled);
        assert!(!view.presets_disabled);
        assert_eq!(view.submit_label, SUBMIT_LABEL);
    }

    #[test]
    fn test_view_while_loading() {
        let mut composer = QuestionComposer::new();
        composer.edit_draft("Aylık satış trendini göster");
        let view = composer.view(true);

        assert!(view.field_disabled);
        assert!(view.submit_disabled);
        assert!(view.presets_disabled);
        assert_eq!(view.submit_label, SUBMIT_LABEL_LOADING);
        assert!(view.in_progress);
    }

    #[test]
    fn test_view_ready_to_submit() {
        let mut composer = QuestionComposer::new();
        composer.edit_draft("  soru  ");
        let view = composer.view(false);

        assert!(!view.submit_disabled);
        assert_eq!(view.presets, EXAMPLE_PROMPTS);
    }

    #[test]
    fn test_keystroke_helpers() {
        let mut composer = QuestionComposer::new();
        for c in "ürün".chars() {
            composer.insert_char(c);
        }
        assert_eq!(composer.draft(), "ürün");

        composer.backspace();
        assert_eq!(composer.draft(), "ürü");

        composer.clear();
        assert_eq!(composer.draft(), "");

        // Backspace on empty stays empty
        composer.backspace();
        assert_eq!(composer.draft(), "");
    }

    #[test]
    fn test_highlight_wraps() {
        let mut composer = QuestionComposer::new();
        composer.highlight_prev();
        assert_eq!(composer.highlighted(), EXAMPLE_PROMPTS.len() - 1);
        composer.highlight_next();
        assert_eq!(composer.highlighted(), 0);
    }
}
