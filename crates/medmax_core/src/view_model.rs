use crate::session::SessionState;

/// What a page wants on screen. Rendering is up to the host.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageView {
    pub title: String,
    pub lines: Vec<String>,
    pub notice: Option<String>,
    pub error: Option<String>,
}

impl PageView {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    pub fn lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
        self
    }

    pub fn notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }

    pub fn error(mut self, error: Option<String>) -> Self {
        self.error = error;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub url: String,
    pub session: SessionState,
    pub user_label: Option<String>,
    pub nav: Vec<NavLink>,
    pub page: PageView,
    pub dirty: bool,
}
