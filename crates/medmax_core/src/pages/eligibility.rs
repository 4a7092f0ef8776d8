use crate::api::TrackingEvent;
use crate::route::{PublicRoute, Route};
use crate::view_model::PageView;

use super::{Command, Page, PageContext};

pub const QUESTIONS: [&str; 4] = [
    "Are you currently hospitalized or in a nursing facility?",
    "Have you been diagnosed with cancer in the last two years?",
    "Are you on dialysis or awaiting an organ transplant?",
    "Do you use oxygen equipment?",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    Answer { index: usize, yes: bool },
    Submit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityPage {
    quote_id: Option<String>,
    tracking_id: Option<String>,
    answers: Vec<Option<bool>>,
    error: Option<String>,
}

impl EligibilityPage {
    /// Opening the page is tracked without waiting for the backend.
    pub fn init(quote_id: Option<String>, tracking_id: Option<String>) -> (Self, Vec<Command>) {
        let commands = tracking_id
            .iter()
            .map(|tid| Command::Track(TrackingEvent::new(tid.clone(), "eligibility_opened")))
            .collect();
        (
            Self {
                quote_id,
                tracking_id,
                answers: vec![None; QUESTIONS.len()],
                error: None,
            },
            commands,
        )
    }
}

impl Page for EligibilityPage {
    type Msg = Msg;

    fn update(mut self, msg: Msg, _ctx: &PageContext<'_>) -> (Self, Vec<Command>) {
        match msg {
            Msg::Answer { index, yes } => {
                if let Some(slot) = self.answers.get_mut(index) {
                    *slot = Some(yes);
                    self.error = None;
                }
                (self, Vec::new())
            }
            Msg::Submit => {
                if self.answers.iter().any(Option::is_none) {
                    self.error = Some("Please answer every question".into());
                    return (self, Vec::new());
                }
                let status = if self.answers.iter().any(|a| *a == Some(true)) {
                    "decline"
                } else {
                    "accept"
                };
                let mut commands = Vec::new();
                if let Some(tid) = &self.tracking_id {
                    commands.push(Command::Track(
                        TrackingEvent::new(tid.clone(), "eligibility_answered")
                            .with_metadata("status", status),
                    ));
                }
                let next = Route::Public(PublicRoute::Schedule {
                    quote_id: self.quote_id.clone(),
                    status: Some(status.to_string()),
                    tracking_id: self.tracking_id.clone(),
                });
                commands.push(Command::Navigate(next.to_url()));
                (self, commands)
            }
        }
    }

    fn view(&self) -> PageView {
        let lines = QUESTIONS.iter().zip(&self.answers).map(|(q, a)| {
            let answer = match a {
                Some(true) => "yes",
                Some(false) => "no",
                None => "unanswered",
            };
            format!("{q} [{answer}]")
        });
        PageView::new("Underwriting questions")
            .lines(lines)
            .error(self.error.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::PricingConfig;

    #[test]
    fn any_yes_declines_and_navigates_to_schedule() {
        let pricing = PricingConfig::default();
        let ctx = PageContext {
            user: None,
            pricing: &pricing,
        };
        let (mut page, cmds) = EligibilityPage::init(Some("q1".into()), Some("t1".into()));
        assert_eq!(cmds.len(), 1);
        for index in 0..QUESTIONS.len() {
            page = page
                .update(Msg::Answer { index, yes: index == 2 }, &ctx)
                .0;
        }
        let (_, cmds) = page.update(Msg::Submit, &ctx);
        assert_eq!(
            cmds.last(),
            Some(&Command::Navigate(
                "/schedule?id=q1&status=decline&tid=t1".into()
            ))
        );
    }

    #[test]
    fn unanswered_questions_block_submit() {
        let pricing = PricingConfig::default();
        let ctx = PageContext {
            user: None,
            pricing: &pricing,
        };
        let (page, cmds) = EligibilityPage::init(None, None);
        assert!(cmds.is_empty());
        let (page, cmds) = page.update(Msg::Submit, &ctx);
        assert!(cmds.is_empty());
        assert!(page.view().error.is_some());
    }
}
