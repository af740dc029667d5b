// Contact and newsletter forms using the post/redirect/get pattern
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse, Result};
use log::{debug, info};

use super::types::{ContactSubmission, FormsPage, NewsletterSubmission};
use super::{CONTACT_FORM, NEWSLETTER_FORM, PAGE_FORMS};
use crate::models::{Field, Form, FormId};
use crate::session::SessionManager;

const FORMS_PATH: &str = "/contact";

/// Blank field definitions for each demo form
#[must_use]
pub fn default_fields(form_id: FormId) -> Vec<Field> {
    match form_id {
        CONTACT_FORM => vec![
            Field::new("name", "Name"),
            Field::new("email", "Email"),
            Field::new("message", "Message"),
        ],
        NEWSLETTER_FORM => vec![Field::new("email", "Email")],
        _ => Vec::new(),
    }
}

fn looks_like_email(email: &str) -> bool {
    email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'))
}

fn required(field: Field, value: &str) -> Field {
    let field = field.with_value(value);
    if value.trim().is_empty() {
        let message = format!("{} is required", field.label);
        field.with_error(&message)
    } else {
        field
    }
}

fn email(field: Field, value: &str) -> Field {
    let field = required(field, value);
    if field.error.is_none() && !looks_like_email(value.trim()) {
        field.with_error("Enter a valid email address")
    } else {
        field
    }
}

/// Validate a contact submission.
///
/// A valid submission is stored without fields so the next page shows a
/// blank form.
#[must_use]
pub fn validate_contact(submission: &ContactSubmission) -> Form<Field> {
    let fields = vec![
        required(Field::new("name", "Name"), &submission.name),
        email(Field::new("email", "Email"), &submission.email),
        required(Field::new("message", "Message"), &submission.message),
    ];
    into_result(CONTACT_FORM, fields)
}

#[must_use]
pub fn validate_newsletter(submission: &NewsletterSubmission) -> Form<Field> {
    into_result(
        NEWSLETTER_FORM,
        vec![email(Field::new("email", "Email"), &submission.email)],
    )
}

fn into_result(action: FormId, fields: Vec<Field>) -> Form<Field> {
    if fields.iter().any(|field| field.error.is_some()) {
        debug!("Form {action} failed validation");
        Form::new(action, fields)
    } else {
        info!("Form {action} accepted");
        Form::accepted(action)
    }
}

fn redirect_with_session(sessions: &SessionManager<Field>, result: Form<Field>) -> HttpResponse {
    let cookie = sessions.stash(result);
    HttpResponse::SeeOther()
        .cookie(cookie)
        .insert_header((header::LOCATION, FORMS_PATH))
        .finish()
}

/// Handle a contact form post and redirect back to the page
pub async fn submit_contact(
    submission: web::Form<ContactSubmission>,
    sessions: web::Data<SessionManager<Field>>,
) -> Result<HttpResponse> {
    Ok(redirect_with_session(&sessions, validate_contact(&submission)))
}

/// Handle a newsletter form post and redirect back to the page
pub async fn submit_newsletter(
    submission: web::Form<NewsletterSubmission>,
    sessions: web::Data<SessionManager<Field>>,
) -> Result<HttpResponse> {
    Ok(redirect_with_session(&sessions, validate_newsletter(&submission)))
}

/// Render the page forms, consuming any pending submission result
pub async fn show_forms(
    req: HttpRequest,
    sessions: web::Data<SessionManager<Field>>,
) -> Result<HttpResponse> {
    let restored = sessions.restore(&req, PAGE_FORMS, &default_fields);
    let resolved = restored.resolved;

    let notice = resolved
        .forms
        .get(&resolved.action)
        .filter(|form| form.fields.iter().all(|field| field.error.is_none()))
        .map(|_| match resolved.action {
            NEWSLETTER_FORM => "Thanks for subscribing".to_string(),
            _ => "Thanks, your message was sent".to_string(),
        });

    let page = FormsPage {
        action: resolved.action,
        notice,
        forms: resolved.forms.into_iter().collect(),
    };

    Ok(HttpResponse::Ok()
        .cookie(restored.clear_cookie)
        .json(page))
}
