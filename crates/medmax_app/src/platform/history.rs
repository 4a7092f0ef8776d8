/// Browser-style location history for the headless host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct History {
    entries: Vec<String>,
}

impl History {
    pub fn new(start: impl Into<String>) -> Self {
        Self {
            entries: vec![start.into()],
        }
    }

    pub fn push(&mut self, url: impl Into<String>) {
        let url = url.into();
        if self.current() != Some(url.as_str()) {
            self.entries.push(url);
        }
    }

    /// Pops the current entry and returns the one before it. The first entry stays.
    pub fn back(&mut self) -> Option<&str> {
        if self.entries.len() < 2 {
            return None;
        }
        self.entries.pop();
        self.current()
    }

    pub fn current(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }
}
