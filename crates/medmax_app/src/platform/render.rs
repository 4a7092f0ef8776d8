use std::fmt::Write;

use medmax_core::{AppViewModel, SessionState};

/// Plain-text rendering of the view model, one screen per call.
pub(crate) fn render(view: &AppViewModel) -> String {
    let mut out = String::new();
    let who = match (&view.session, &view.user_label) {
        (SessionState::Unknown, _) => "checking session".to_string(),
        (SessionState::NoSession, _) => "signed out".to_string(),
        (SessionState::Verified(_), Some(label)) => format!("signed in as {label}"),
        (SessionState::Verified(_), None) => "signed in".to_string(),
    };
    let _ = writeln!(out, "== {} [{}] ({who})", view.page.title, view.url);

    let nav: Vec<String> = view
        .nav
        .iter()
        .map(|link| format!("{} <{}>", link.label, link.href))
        .collect();
    if !nav.is_empty() {
        let _ = writeln!(out, "   {}", nav.join(" | "));
    }

    for line in &view.page.lines {
        let _ = writeln!(out, "  {line}");
    }
    if let Some(notice) = &view.page.notice {
        let _ = writeln!(out, "  * {notice}");
    }
    if let Some(error) = &view.page.error {
        let _ = writeln!(out, "  ! {error}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use medmax_core::{NavLink, PageView};
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_header_nav_and_messages() {
        let view = AppViewModel {
            url: "/contacts".into(),
            session: SessionState::Verified("s1".into()),
            user_label: Some("Pat Lee".into()),
            nav: vec![NavLink {
                label: "Dashboard",
                href: "/dashboard",
            }],
            page: PageView::new("Contacts")
                .line("Ann Smith")
                .notice("Saved")
                .error(Some("Could not load".into())),
            dirty: true,
        };
        assert_eq!(
            render(&view),
            concat!(
                "== Contacts [/contacts] (signed in as Pat Lee)\n",
                "   Dashboard </dashboard>\n",
                "  Ann Smith\n",
                "  * Saved\n",
                "  ! Could not load\n",
            )
        );
    }

    #[test]
    fn signed_out_screen_without_nav() {
        let view = AppViewModel {
            url: "/login".into(),
            session: SessionState::NoSession,
            page: PageView::new("Log in"),
            ..AppViewModel::default()
        };
        assert_eq!(render(&view), "== Log in [/login] (signed out)\n");
    }
}
