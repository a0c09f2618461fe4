//! Conversation history kept per session.

use crate::outcome::GuardrailMode;
use serde::{Deserialize, Serialize};

/// Number of characters of a question shown in a history heading.
pub const PREVIEW_CHARS: usize = 80;

/// One answered question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub question: String,
    pub answer: String,
    pub mode: GuardrailMode,
}

/// An exchange as displayed: numbered from the oldest, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub number: usize,
    pub heading: String,
    pub question: String,
    pub answer: String,
    pub mode: GuardrailMode,
    /// Only the newest entry starts expanded.
    pub expanded: bool,
}

/// Ordered list of answered questions, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationHistory {
    exchanges: Vec<Exchange>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answered question.
    pub fn push(
        &mut self,
        question: impl Into<String>,
        answer: impl Into<String>,
        mode: GuardrailMode,
    ) {
        self.exchanges.push(Exchange {
            question: question.into(),
            answer: answer.into(),
            mode,
        });
    }

    pub fn clear(&mut self) {
        self.exchanges.clear();
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    pub fn exchanges(&self) -> &[Exchange] {
        &self.exchanges
    }

    /// Entries for display, newest first.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        let newest = self.exchanges.len();
        self.exchanges
            .iter()
            .enumerate()
            .rev()
            .map(|(i, exchange)| {
                let number = i + 1;
                HistoryEntry {
                    number,
                    heading: format!("Q{}: {}", number, preview(&exchange.question)),
                    question: exchange.question.clone(),
                    answer: exchange.answer.clone(),
                    mode: exchange.mode,
                    expanded: number == newest,
                }
            })
            .collect()
    }
}

/// First [`PREVIEW_CHARS`] characters of a question followed by `...`.
///
/// The ellipsis is always appended, short questions included.
pub fn preview(question: &str) -> String {
    let head: String = question.chars().take(PREVIEW_CHARS).collect();
    format!("{}...", head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_newest_first() {
        let mut history = ConversationHistory::new();
        history.push("first", "a1", GuardrailMode::Disabled);
        history.push("second", "a2", GuardrailMode::Enabled);
        history.push("third", "a3", GuardrailMode::Disabled);

        let entries = history.entries();
        let headings: Vec<&str> = entries.iter().map(|e| e.heading.as_str()).collect();
        assert_eq!(headings, vec!["Q3: third...", "Q2: second...", "Q1: first..."]);
        assert!(entries[0].expanded);
        assert!(!entries[1].expanded);
        assert!(!entries[2].expanded);
        assert_eq!(entries[1].mode, GuardrailMode::Enabled);
    }

    #[test]
    fn test_preview_truncates_long_questions() {
        let exact = "x".repeat(PREVIEW_CHARS);
        assert_eq!(preview(&exact), format!("{}...", exact));

        let long = "y".repeat(PREVIEW_CHARS + 1);
        let shown = preview(&long);
        assert!(shown.ends_with("..."));
        assert_eq!(shown.chars().count(), PREVIEW_CHARS + 3);
    }

    #[test]
    fn test_preview_marks_short_questions() {
        assert_eq!(preview("what is apm"), "what is apm...");
        assert_eq!(preview(""), "...");
    }

    #[test]
    fn test_preview_counts_characters() {
        let long = "é".repeat(PREVIEW_CHARS + 5);
        assert_eq!(preview(&long).chars().count(), PREVIEW_CHARS + 3);
    }

    #[test]
    fn test_clear() {
        let mut history = ConversationHistory::new();
        history.push("q", "a", GuardrailMode::Disabled);
        assert_eq!(history.len(), 1);
        history.clear();
        assert!(history.is_empty());
        assert!(history.entries().is_empty());
    }
}
