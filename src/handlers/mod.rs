// HTTP handlers for the post/redirect/get demo forms
pub mod contact;
pub mod health;
pub mod types;

pub use contact::{default_fields, show_forms, submit_contact, submit_newsletter};
pub use health::health;
pub use types::{ContactSubmission, FormsPage, NewsletterSubmission};

use actix_web::web;

/// Form id of the contact form
pub const CONTACT_FORM: u8 = 1;

/// Form id of the newsletter sign-up form
pub const NEWSLETTER_FORM: u8 = 2;

/// Forms rendered on the demo page
pub const PAGE_FORMS: &[u8] = &[CONTACT_FORM, NEWSLETTER_FORM];

pub fn configure_services(cfg: &mut web::ServiceConfig) {
    cfg.route("/contact", web::get().to(show_forms))
        .route("/contact", web::post().to(submit_contact))
        .route("/newsletter", web::post().to(submit_newsletter))
        .route("/ping", web::get().to(health));
}
