use crate::api::{ApiRequest, ApiResponse, ApiResult, Contact, RequestError};
use crate::view_model::PageView;

use super::contact_form::{apply_lookup, ContactForm, FormMsg};
use super::{describe_error, Command, Page, PageContext};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    Back,
    Edit,
    Form(FormMsg),
    Save,
    CancelEdit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Loading,
    Loaded(Box<Contact>),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactPage {
    id: String,
    state: State,
    editing: Option<ContactForm>,
    saving: bool,
    form_error: Option<String>,
    notice: Option<String>,
}

impl ContactPage {
    pub fn init(id: String) -> (Self, Vec<Command>) {
        let fetch = Command::Fetch(ApiRequest::FetchContact { id: id.clone() });
        (
            Self {
                id,
                state: State::Loading,
                editing: None,
                saving: false,
                form_error: None,
                notice: None,
            },
            vec![fetch],
        )
    }

    pub fn contact(&self) -> Option<&Contact> {
        match &self.state {
            State::Loaded(contact) => Some(contact),
            _ => None,
        }
    }

    pub fn form(&self) -> Option<&ContactForm> {
        self.editing.as_ref()
    }

    pub fn form_error(&self) -> Option<&str> {
        self.form_error.as_deref()
    }
}

impl Page for ContactPage {
    type Msg = Msg;

    fn update(mut self, msg: Msg, _ctx: &PageContext<'_>) -> (Self, Vec<Command>) {
        match msg {
            Msg::Back => return (self, vec![Command::Navigate("/contacts".into())]),
            Msg::Edit => {
                if let (true, State::Loaded(contact)) = (self.editing.is_none(), &self.state) {
                    self.editing = Some(ContactForm::from_contact(contact));
                    self.form_error = None;
                    self.notice = None;
                }
            }
            Msg::CancelEdit => {
                if !self.saving {
                    self.editing = None;
                    self.form_error = None;
                }
            }
            Msg::Form(msg) => {
                let lookup = match self.editing.as_mut() {
                    Some(form) if !self.saving => form.update(msg),
                    _ => None,
                };
                return (self, lookup.map(Command::Fetch).into_iter().collect());
            }
            Msg::Save => {
                let Some(form) = self.editing.as_ref().filter(|_| !self.saving) else {
                    return (self, Vec::new());
                };
                match form.validate() {
                    Ok(contact) => {
                        self.saving = true;
                        self.form_error = None;
                        let id = self.id.clone();
                        let save = ApiRequest::UpdateContact { id, contact };
                        return (self, vec![Command::Fetch(save)]);
                    }
                    Err(message) => self.form_error = Some(message),
                }
            }
        }
        (self, Vec::new())
    }

    fn completed(
        mut self,
        request: ApiRequest,
        result: ApiResult,
        _ctx: &PageContext<'_>,
    ) -> (Self, Vec<Command>) {
        match request {
            ApiRequest::FetchContact { .. } => {
                self.state = match result {
                    Ok(ApiResponse::Contact(contact)) => State::Loaded(Box::new(contact)),
                    Ok(other) => State::Failed(format!("Unexpected response: {other:?}")),
                    Err(RequestError::HttpStatus(404)) => State::Failed("Contact not found".into()),
                    Err(err) => State::Failed(describe_error("Loading the contact", &err)),
                };
            }
            ApiRequest::LookupZip { zip } => {
                if let Some(form) = self.editing.as_mut() {
                    if let Some(message) = apply_lookup(form, &zip, result) {
                        self.form_error = Some(message);
                    }
                }
            }
            ApiRequest::UpdateContact { .. } => {
                self.saving = false;
                match result {
                    Ok(ApiResponse::Contact(contact)) => {
                        self.state = State::Loaded(Box::new(contact));
                        self.editing = None;
                        self.notice = Some("Contact saved".into());
                    }
                    Ok(other) => self.form_error = Some(format!("Unexpected response: {other:?}")),
                    Err(RequestError::HttpStatus(404)) => {
                        self.form_error = Some("This contact no longer exists".into());
                    }
                    Err(err) => self.form_error = Some(describe_error("Saving the contact", &err)),
                }
            }
            _ => {}
        }
        (self, Vec::new())
    }

    fn view(&self) -> PageView {
        let mut view = PageView::new(format!("Contact #{}", self.id));
        if let Some(notice) = &self.notice {
            view = view.notice(notice.clone());
        }
        if let Some(form) = &self.editing {
            let heading = if self.saving { "Editing (saving...)" } else { "Editing" };
            return view
                .line(heading)
                .lines(form.summary())
                .error(self.form_error.clone());
        }
        match &self.state {
            State::Loading => view.line("Loading..."),
            State::Loaded(c) => view.lines([
                format!("{} {} <{}>", c.first_name, c.last_name, c.email),
                format!("Born {} ({}), {} {}", c.birth_date, c.gender, c.state, c.zip_code),
                format!(
                    "{} {} effective {}",
                    c.current_carrier, c.plan_type, c.effective_date
                ),
                format!("Tobacco user: {}", if c.tobacco_user { "yes" } else { "no" }),
                format!(
                    "Last emailed: {}",
                    c.last_emailed.as_deref().unwrap_or("never")
                ),
            ]),
            State::Failed(message) => view.error(Some(message.clone())),
        }
    }
}
