use serde::{Deserialize, Serialize};

/// Identifier of a form within a page (also used as the form's action)
pub type FormId = u8;

/// Matched-action value reported when no stored submission applies
pub const NO_ACTION: FormId = FormId::MAX;

/// A form submission result: the action it was posted to plus its field state.
///
/// Field descriptors are opaque to the session cache; it only stores,
/// returns and counts them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form<F> {
    pub action: FormId,
    pub fields: Vec<F>,
}

impl<F> Form<F> {
    #[must_use]
    pub fn new(action: FormId, fields: Vec<F>) -> Self {
        Self { action, fields }
    }

    /// A submission that passed validation and has nothing to redisplay
    #[must_use]
    pub fn accepted(action: FormId) -> Self {
        Self {
            action,
            fields: Vec::new(),
        }
    }
}

/// Field descriptor used by the bundled contact form handlers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Field {
    #[must_use]
    pub fn new(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            value: String::new(),
            error: None,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: &str) -> Self {
        self.error = Some(error.to_string());
        self
    }
}
