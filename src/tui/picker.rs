#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Chosen(usize),
    Cancelled,
}

/// State of the single-choice list shown when picking a table.
pub struct Picker {
    pub message: String,
    pub options: Vec<String>,
    pub selected: usize,
    pub outcome: Option<Outcome>,
}

impl Picker {
    pub fn new(message: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            message: message.into(),
            options,
            selected: 0,
            outcome: None,
        }
    }

    pub fn move_up(&mut self) {
        if self.options.is_empty() {
            return;
        }
        self.selected = match self.selected {
            0 => self.options.len() - 1,
            i => i - 1,
        };
    }

    pub fn move_down(&mut self) {
        if self.options.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.options.len();
    }

    pub fn move_first(&mut self) {
        self.selected = 0;
    }

    pub fn move_last(&mut self) {
        self.selected = self.options.len().saturating_sub(1);
    }

    pub fn confirm(&mut self) {
        if self.selected < self.options.len() {
            self.outcome = Some(Outcome::Chosen(self.selected));
        }
    }

    pub fn cancel(&mut self) {
        self.outcome = Some(Outcome::Cancelled);
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn chosen(&self) -> Option<usize> {
        match self.outcome {
            Some(Outcome::Chosen(i)) => Some(i),
            _ => None,
        }
    }
}
