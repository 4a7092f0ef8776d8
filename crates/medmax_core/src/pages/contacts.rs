use crate::api::{ApiRequest, ApiResponse, ApiResult, Contact};
use crate::route::{PathParam, ProtectedRoute, Route};
use crate::view_model::PageView;

use super::contact_form::{apply_lookup, ContactForm, FormMsg};
use super::{describe_error, Command, Page, PageContext};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    Refresh,
    Open(String),
    StartAdd,
    Form(FormMsg),
    SaveNew,
    CancelAdd,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactsState {
    Loading,
    Loaded(Vec<Contact>),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactsPage {
    state: ContactsState,
    adding: Option<ContactForm>,
    saving: bool,
    form_error: Option<String>,
    notice: Option<String>,
}

impl ContactsPage {
    pub fn init() -> (Self, Vec<Command>) {
        (
            Self {
                state: ContactsState::Loading,
                adding: None,
                saving: false,
                form_error: None,
                notice: None,
            },
            vec![Command::Fetch(ApiRequest::FetchContacts)],
        )
    }

    pub fn state(&self) -> &ContactsState {
        &self.state
    }

    pub fn form(&self) -> Option<&ContactForm> {
        self.adding.as_ref()
    }

    pub fn form_error(&self) -> Option<&str> {
        self.form_error.as_deref()
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }
}

impl Page for ContactsPage {
    type Msg = Msg;

    fn update(mut self, msg: Msg, _ctx: &PageContext<'_>) -> (Self, Vec<Command>) {
        match msg {
            Msg::Refresh => {
                self.state = ContactsState::Loading;
                (self, vec![Command::Fetch(ApiRequest::FetchContacts)])
            }
            Msg::Open(id) => match PathParam::new(id) {
                Some(id) => {
                    let url = Route::Protected(ProtectedRoute::Contact { id }).to_url();
                    (self, vec![Command::Navigate(url)])
                }
                None => (self, Vec::new()),
            },
            Msg::StartAdd => {
                if self.adding.is_none() {
                    self.adding = Some(ContactForm::default());
                    self.form_error = None;
                    self.notice = None;
                }
                (self, Vec::new())
            }
            Msg::CancelAdd => {
                if !self.saving {
                    self.adding = None;
                    self.form_error = None;
                }
                (self, Vec::new())
            }
            Msg::Form(msg) => {
                let lookup = match self.adding.as_mut() {
                    Some(form) if !self.saving => form.update(msg),
                    _ => None,
                };
                (self, lookup.map(Command::Fetch).into_iter().collect())
            }
            Msg::SaveNew => {
                let Some(form) = self.adding.as_ref().filter(|_| !self.saving) else {
                    return (self, Vec::new());
                };
                match form.validate() {
                    Ok(draft) => {
                        self.saving = true;
                        self.form_error = None;
                        (self, vec![Command::Fetch(ApiRequest::CreateContact(draft))])
                    }
                    Err(message) => {
                        self.form_error = Some(message);
                        (self, Vec::new())
                    }
                }
            }
        }
    }

    fn completed(
        mut self,
        request: ApiRequest,
        result: ApiResult,
        _ctx: &PageContext<'_>,
    ) -> (Self, Vec<Command>) {
        match (request, result) {
            (ApiRequest::FetchContacts, result) => {
                self.state = match result {
                    Ok(ApiResponse::Contacts(contacts)) => ContactsState::Loaded(contacts),
                    Ok(other) => ContactsState::Failed(format!("Unexpected response: {other:?}")),
                    Err(err) => ContactsState::Failed(describe_error("Loading contacts", &err)),
                };
            }
            (ApiRequest::LookupZip { zip }, result) => {
                if let Some(form) = self.adding.as_mut() {
                    if let Some(message) = apply_lookup(form, &zip, result) {
                        self.form_error = Some(message);
                    }
                }
            }
            (ApiRequest::CreateContact(_), Ok(ApiResponse::Contact(contact))) => {
                self.saving = false;
                self.adding = None;
                self.notice = Some(format!("Added {} {}", contact.first_name, contact.last_name));
                self.state = ContactsState::Loading;
                return (self, vec![Command::Fetch(ApiRequest::FetchContacts)]);
            }
            (ApiRequest::CreateContact(_), Ok(other)) => {
                self.saving = false;
                self.form_error = Some(format!("Unexpected response: {other:?}"));
            }
            (ApiRequest::CreateContact(_), Err(err)) => {
                self.saving = false;
                self.form_error = Some(describe_error("Saving the contact", &err));
            }
            _ => {}
        }
        (self, Vec::new())
    }

    fn view(&self) -> PageView {
        let mut view = PageView::new("Contacts");
        if let Some(notice) = &self.notice {
            view = view.notice(notice.clone());
        }
        if let Some(form) = &self.adding {
            let heading = if self.saving { "New contact (saving...)" } else { "New contact" };
            return view
                .line(heading)
                .lines(form.summary())
                .error(self.form_error.clone());
        }
        match &self.state {
            ContactsState::Loading => view.line("Loading contacts..."),
            ContactsState::Loaded(contacts) if contacts.is_empty() => {
                view.line("No contacts yet. Upload a spreadsheet to get started.")
            }
            ContactsState::Loaded(contacts) => view.lines(contacts.iter().map(|c| {
                format!(
                    "#{} {} {} <{}> {} {}{}",
                    c.id,
                    c.first_name,
                    c.last_name,
                    c.email,
                    c.current_carrier,
                    c.plan_type,
                    if c.tobacco_user { " (tobacco)" } else { "" }
                )
            })),
            ContactsState::Failed(message) => view.error(Some(message.clone())),
        }
    }
}
