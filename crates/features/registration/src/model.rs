use crate::export::Document;
use serde::Serialize;
use serde_json::Value;
use strum_macros::{AsRefStr, Display, EnumString};
use surrealdb::types::SurrealValue;

/// Every stored key, in the order documents and CSV columns use.
pub const FIELDS: [&str; 11] = [
    "name",
    "roll_number",
    "gender",
    "email",
    "about",
    "github_link",
    "linkedin_link",
    "instagram_link",
    "team_name",
    "referrer_name",
    "referrer_email",
];

/// Fields that together identify a registration.
pub const NATURAL_KEY_FIELDS: [&str; 2] = ["roll_number", "email"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, AsRefStr, Display, EnumString)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub enum Gender {
    M,
    F,
}

/// A validated registration form submission.
///
/// Built through [`Registration::parse`], so every instance satisfies the field rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct Registration {
    pub name: String,
    pub roll_number: i64,
    pub gender: Gender,
    pub email: String,
    pub about: String,
    pub github_link: Option<String>,
    pub linkedin_link: Option<String>,
    pub instagram_link: Option<String>,
    pub team_name: Option<String>,
    pub referrer_name: Option<String>,
    pub referrer_email: Option<String>,
}

/// The (`roll_number`, `email`) pair that must be unique across registrations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NaturalKey {
    pub roll_number: i64,
    pub email: String,
}

impl Registration {
    #[must_use]
    pub fn natural_key(&self) -> NaturalKey {
        NaturalKey { roll_number: self.roll_number, email: self.email.clone() }
    }

    /// The stored shape: all [`FIELDS`] in order, absent optionals as `null`.
    #[must_use]
    pub fn to_document(&self) -> Document {
        RegistrationRecord::from(self).into_document()
    }
}

/// Storage row. Gender is kept as its `M`/`F` text.
#[derive(Debug, Clone, SurrealValue)]
pub(crate) struct RegistrationRecord {
    name: String,
    roll_number: i64,
    gender: String,
    email: String,
    about: String,
    github_link: Option<String>,
    linkedin_link: Option<String>,
    instagram_link: Option<String>,
    team_name: Option<String>,
    referrer_name: Option<String>,
    referrer_email: Option<String>,
}

impl From<&Registration> for RegistrationRecord {
    fn from(r: &Registration) -> Self {
        Self {
            name: r.name.clone(),
            roll_number: r.roll_number,
            gender: r.gender.to_string(),
            email: r.email.clone(),
            about: r.about.clone(),
            github_link: r.github_link.clone(),
            linkedin_link: r.linkedin_link.clone(),
            instagram_link: r.instagram_link.clone(),
            team_name: r.team_name.clone(),
            referrer_name: r.referrer_name.clone(),
            referrer_email: r.referrer_email.clone(),
        }
    }
}

impl RegistrationRecord {
    pub(crate) fn into_document(self) -> Document {
        let text = |v: Option<String>| v.map_or(Value::Null, Value::String);
        let values = [
            Value::String(self.name),
            Value::from(self.roll_number),
            Value::String(self.gender),
            Value::String(self.email),
            Value::String(self.about),
            text(self.github_link),
            text(self.linkedin_link),
            text(self.instagram_link),
            text(self.team_name),
            text(self.referrer_name),
            text(self.referrer_email),
        ];

        FIELDS.iter().map(|k| (*k).to_owned()).zip(values).collect()
    }
}
