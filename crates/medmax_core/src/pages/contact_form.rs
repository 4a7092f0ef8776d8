//! Add/edit form shared by the contacts list and the contact detail page.

use crate::api::{
    ApiRequest, ApiResponse, ApiResult, Contact, ContactDraft, RequestError, ZipInfo,
};

use super::{describe_error, looks_like_email, required};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    FirstName,
    LastName,
    Email,
    CurrentCarrier,
    PlanType,
    EffectiveDate,
    BirthDate,
    Gender,
    State,
    ZipCode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMsg {
    Changed(ContactField, String),
    TobaccoToggled(bool),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactForm {
    draft: ContactDraft,
    /// ZIP whose lookup is in flight or last applied.
    looked_up: Option<String>,
    counties: Vec<String>,
}

impl ContactForm {
    pub fn from_contact(contact: &Contact) -> Self {
        Self {
            draft: ContactDraft::from(contact),
            looked_up: None,
            counties: Vec::new(),
        }
    }

    pub fn draft(&self) -> &ContactDraft {
        &self.draft
    }

    pub fn counties(&self) -> &[String] {
        &self.counties
    }

    /// Applies an edit. A complete five digit ZIP that was not looked up yet
    /// yields the lookup request.
    pub fn update(&mut self, msg: FormMsg) -> Option<ApiRequest> {
        let (field, value) = match msg {
            FormMsg::TobaccoToggled(on) => {
                self.draft.tobacco_user = on;
                return None;
            }
            FormMsg::Changed(field, value) => (field, value),
        };
        let d = &mut self.draft;
        match field {
            ContactField::FirstName => d.first_name = value,
            ContactField::LastName => d.last_name = value,
            ContactField::Email => d.email = value,
            ContactField::CurrentCarrier => d.current_carrier = value,
            ContactField::PlanType => d.plan_type = value,
            ContactField::EffectiveDate => d.effective_date = value,
            ContactField::BirthDate => d.birth_date = value,
            ContactField::Gender => d.gender = value.trim().to_ascii_uppercase(),
            ContactField::State => d.state = value.trim().to_ascii_uppercase(),
            ContactField::ZipCode => {
                d.zip_code = value.trim().to_string();
                if !is_zip(&d.zip_code) {
                    self.looked_up = None;
                    self.counties.clear();
                    return None;
                }
                if self.looked_up.as_deref() == Some(d.zip_code.as_str()) {
                    return None;
                }
                self.looked_up = Some(d.zip_code.clone());
                return Some(ApiRequest::LookupZip {
                    zip: d.zip_code.clone(),
                });
            }
        }
        None
    }

    /// Fills in the state for `zip` unless the user has moved on to another ZIP.
    pub fn apply_zip(&mut self, zip: &str, info: ZipInfo) -> bool {
        if self.draft.zip_code != zip {
            return false;
        }
        if !info.state.is_empty() {
            self.draft.state = info.state;
        }
        self.counties = info.counties;
        true
    }

    pub fn validate(&self) -> Result<ContactDraft, String> {
        let d = &self.draft;
        let first_name = required(&d.first_name).ok_or("First name is required")?;
        let last_name = required(&d.last_name).ok_or("Last name is required")?;
        if !looks_like_email(&d.email) {
            return Err("Enter a valid email address".into());
        }
        let birth_date = date(&d.birth_date).ok_or("Birth date must be YYYY-MM-DD")?;
        let effective_date = date(&d.effective_date).ok_or("Effective date must be YYYY-MM-DD")?;
        if d.gender != "M" && d.gender != "F" {
            return Err("Gender must be M or F".into());
        }
        if !is_zip(&d.zip_code) {
            return Err("ZIP code must be 5 digits".into());
        }
        if d.state.len() != 2 {
            return Err("State is required".into());
        }
        Ok(ContactDraft {
            first_name,
            last_name,
            email: d.email.trim().to_string(),
            current_carrier: d.current_carrier.trim().to_string(),
            plan_type: d.plan_type.trim().to_string(),
            effective_date,
            birth_date,
            tobacco_user: d.tobacco_user,
            gender: d.gender.clone(),
            state: d.state.clone(),
            zip_code: d.zip_code.clone(),
            agent_id: d.agent_id.clone(),
        })
    }

    pub fn summary(&self) -> Vec<String> {
        let d = &self.draft;
        let mut lines = vec![
            format!("Name: {} {}", d.first_name, d.last_name),
            format!("Email: {}", d.email),
            format!("Born: {}  Gender: {}", d.birth_date, d.gender),
            format!("ZIP: {}  State: {}", d.zip_code, d.state),
            format!(
                "Plan: {} {} effective {}",
                d.current_carrier, d.plan_type, d.effective_date
            ),
            format!("Tobacco user: {}", if d.tobacco_user { "yes" } else { "no" }),
        ];
        if !self.counties.is_empty() {
            lines.push(format!("Counties: {}", self.counties.join(", ")));
        }
        lines
    }
}

/// Folds a ZIP lookup result into `form`, returning an inline error if any.
pub(super) fn apply_lookup(form: &mut ContactForm, zip: &str, result: ApiResult) -> Option<String> {
    match result {
        Ok(ApiResponse::Zip(info)) => {
            form.apply_zip(zip, info);
            None
        }
        Ok(other) => Some(format!("Unexpected response: {other:?}")),
        Err(RequestError::HttpStatus(404)) => {
            Some(format!("ZIP code {zip} was not found")).filter(|_| form.draft().zip_code == zip)
        }
        Err(err) => Some(describe_error("Looking up the ZIP code", &err)),
    }
}

fn is_zip(value: &str) -> bool {
    value.len() == 5 && value.bytes().all(|b| b.is_ascii_digit())
}

fn date(value: &str) -> Option<String> {
    let value = value.trim();
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    Some(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ContactForm {
        let mut form = ContactForm::default();
        for (field, value) in [
            (ContactField::FirstName, " Ann "),
            (ContactField::LastName, "Ray"),
            (ContactField::Email, "ann@ray.test"),
            (ContactField::BirthDate, "1955-02-01"),
            (ContactField::EffectiveDate, "2024-01-01"),
            (ContactField::Gender, "f"),
            (ContactField::State, "tx"),
            (ContactField::ZipCode, "75001"),
        ] {
            form.update(FormMsg::Changed(field, value.into()));
        }
        form
    }

    #[test]
    fn complete_zip_triggers_one_lookup() {
        let mut form = ContactForm::default();
        let zip = |v: &str| FormMsg::Changed(ContactField::ZipCode, v.into());
        assert_eq!(form.update(zip("1234")), None);
        assert_eq!(
            form.update(zip("12345")),
            Some(ApiRequest::LookupZip { zip: "12345".into() })
        );
        assert_eq!(form.update(zip("12345")), None);
        assert_eq!(form.update(zip("1234x")), None);
    }

    #[test]
    fn zip_result_fills_state_only_for_the_current_zip() {
        let mut form = filled();
        let info = ZipInfo {
            state: "NY".into(),
            counties: vec!["Kings".into()],
            cities: Vec::new(),
        };
        assert!(!form.apply_zip("10001", info.clone()));
        assert_eq!(form.draft().state, "TX");
        assert!(form.apply_zip("75001", info));
        assert_eq!(form.draft().state, "NY");
        assert_eq!(form.counties(), ["Kings".to_string()]);
    }

    #[test]
    fn validation_trims_and_normalizes() {
        let draft = filled().validate().unwrap();
        assert_eq!(draft.first_name, "Ann");
        assert_eq!(draft.gender, "F");
        assert_eq!(draft.state, "TX");
    }

    #[test]
    fn validation_reports_the_first_problem() {
        let mut form = filled();
        form.update(FormMsg::Changed(ContactField::BirthDate, "02/01/1955".into()));
        assert_eq!(form.validate().unwrap_err(), "Birth date must be YYYY-MM-DD");

        let mut form = filled();
        form.update(FormMsg::Changed(ContactField::Gender, "x".into()));
        assert_eq!(form.validate().unwrap_err(), "Gender must be M or F");
    }
}
