#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use flashform::{
    handlers::configure_services, models::Field, session::SessionManager,
    settings::FlashSettings,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load configuration from Settings.toml and environment variables
    // This also initializes the logger
    let settings = FlashSettings::load()
        .map_err(|e| std::io::Error::other(format!("Failed to load settings: {e}")))?;

    start_server(settings)
        .await
        .map_err(|e| std::io::Error::other(format!("{e:#}")))
}

/// Start the demo server with a swept form session cache
///
/// # Errors
///
/// Returns an error if:
/// - The session cache cannot be created
/// - Server binding fails
/// - Server fails to start
async fn start_server(settings: FlashSettings) -> anyhow::Result<()> {
    let bind_address = settings.get_bind_address();
    print_startup_info(&bind_address, &settings);

    let sessions: SessionManager<Field> =
        SessionManager::from_settings(&settings).context("Failed to create session cache")?;
    let sessions = web::Data::new(sessions);

    HttpServer::new(move || {
        App::new()
            .app_data(sessions.clone())
            .wrap(Logger::default())
            .configure(configure_services)
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {bind_address}"))?
    .run()
    .await
    .context("Server error")
}

fn print_startup_info(bind_address: &str, settings: &FlashSettings) {
    println!(
        "Starting flashform {} on http://{bind_address}",
        flashform::VERSION
    );
    println!(
        "Form sessions: ttl {}s, swept every {}s, cookie '{}'",
        settings.session.ttl_seconds,
        settings.session.sweep_interval_seconds,
        settings.session.cookie_name
    );
    println!();
    println!("Endpoints:");
    println!("  GET  /contact    - Page forms with the previous submission's result");
    println!("  POST /contact    - Submit the contact form");
    println!("  POST /newsletter - Submit the newsletter form");
    println!("  GET  /ping       - Health check");
}
