use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{Field, Form, FormId};

/// Posted body of the contact form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

/// Posted body of the newsletter form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsletterSubmission {
    #[serde(default)]
    pub email: String,
}

/// Page state returned after the redirect
#[derive(Debug, Serialize, Deserialize)]
pub struct FormsPage {
    /// Form the previous request submitted, or 255
    pub action: FormId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub forms: BTreeMap<FormId, Form<Field>>,
}
