//! Merging a consumed submission with freshly provided forms

use std::collections::HashMap;

use crate::models::{Form, FormId, NO_ACTION};

/// Supplies default field definitions for a form
pub trait FieldProvider<F> {
    fn fields(&self, form_id: FormId) -> Vec<F>;
}

impl<F, T> FieldProvider<F> for T
where
    T: Fn(FormId) -> Vec<F>,
{
    fn fields(&self, form_id: FormId) -> Vec<F> {
        self(form_id)
    }
}

/// Forms to render after a redirect, keyed by form id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<F> {
    pub forms: HashMap<FormId, Form<F>>,
    /// Action of the consumed submission, or [`NO_ACTION`]
    pub action: FormId,
}

impl<F> Resolved<F> {
    /// Whether one of the requested forms was the one submitted
    #[must_use]
    pub const fn has_action(&self) -> bool {
        self.action != NO_ACTION
    }
}

/// Resolve every requested form against at most one stored submission.
///
/// A requested id equal to the submission's action takes the stored fields
/// unless they are empty (the submission passed validation), in which case
/// the provider's defaults are used. All other ids get provider defaults.
pub fn resolve_forms<F, P>(
    stored: Option<Form<F>>,
    requested: &[FormId],
    provider: &P,
) -> Resolved<F>
where
    P: FieldProvider<F> + ?Sized,
{
    let mut stored = stored;
    let mut action = NO_ACTION;
    let mut forms = HashMap::with_capacity(requested.len());

    for &id in requested {
        if forms.contains_key(&id) {
            continue;
        }

        let matched = stored.as_ref().is_some_and(|form| form.action == id);
        if matched {
            action = id;
            if let Some(form) = stored.take().filter(|form| !form.fields.is_empty()) {
                forms.insert(id, form);
                continue;
            }
        }

        forms.insert(id, Form::new(id, provider.fields(id)));
    }

    Resolved { forms, action }
}
