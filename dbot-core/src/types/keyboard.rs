use serde::{Deserialize, Serialize};

/// One inline button: caption and callback data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineButton {
    pub text: String,
    pub data: String,
}

impl InlineButton {
    pub fn new(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            data: data.into(),
        }
    }
}

/// Transport-neutral inline keyboard, row by row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row; empty rows are skipped.
    pub fn row(mut self, row: Vec<InlineButton>) -> Self {
        if !row.is_empty() {
            self.rows.push(row);
        }
        self
    }

    /// Appends a single-button row.
    pub fn button(self, text: impl Into<String>, data: impl Into<String>) -> Self {
        self.row(vec![InlineButton::new(text, data)])
    }

    /// All buttons in reading order.
    pub fn buttons(&self) -> impl Iterator<Item = &InlineButton> {
        self.rows.iter().flatten()
    }

    /// Finds a button by callback data.
    pub fn find(&self, data: &str) -> Option<&InlineButton> {
        self.buttons().find(|b| b.data == data)
    }
}
