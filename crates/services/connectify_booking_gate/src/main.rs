// File: services/connectify_booking_gate/src/main.rs
//! Headless booking page.
//!
//! Loads the page for the URL given as first argument (or `PAGE_URL`), then
//! feeds every stdin line, parsed as JSON, to the page message bus as if the
//! scheduling widget had posted it. At end of input pending completion
//! reports are awaited and the final page state is printed.
use connectify_booking::{
    BookingSession, ChannelWidgetHost, HeadlessPage, HttpTokenService, MessageBus, PageOutcome,
};
use connectify_common::{
    config_error, init_with_level, log_error, log_result, parse_level, ConnectifyError, Context,
};
use connectify_config::load_config;
use serde_json::Value;
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::{info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, ConnectifyError> {
    let config = load_config().map_err(config_error)?;
    init_with_level(parse_level(&config.logging.level));

    let page_url = env::args()
        .nth(1)
        .or_else(|| env::var("PAGE_URL").ok())
        .ok_or_else(|| config_error("Usage: connectify-booking-gate <page-url> (or set PAGE_URL)"))?;

    let service = log_result(
        HttpTokenService::from_config(&config.service),
        "Token service client ready",
        "Failed to set up token service client",
    )?;

    let bus = MessageBus::default();
    let page = Arc::new(HeadlessPage::new());
    let host = Arc::new(ChannelWidgetHost::new(
        config.widget.scheduling_url.clone(),
        bus.clone(),
    ));
    let session = BookingSession::new(Arc::new(service), page.clone(), host.clone(), &config);
    let reporter = session.reporter();
    info!("Booking page session {}", session.id());

    let outcome = session.load(&page_url).await;
    let state = outcome.ui_state();

    let code = match outcome {
        PageOutcome::Ready { listener, .. } => {
            for options in host.initializations() {
                println!("{}", options.url);
            }
            forward_stdin(&bus).await?;
            // Closing the bus lets the listener drain what was posted and stop.
            drop(host);
            drop(bus);
            if let Err(e) = listener.await {
                warn!("Widget event listener ended abnormally: {}", e);
            }
            reporter.flush().await;
            ExitCode::SUCCESS
        }
        PageOutcome::Rejected(reason) => {
            info!("Booking page rejected: {}", reason);
            ExitCode::from(2)
        }
        PageOutcome::WidgetUnavailable(reason) => {
            log_error(reason, "Booking page without widget");
            ExitCode::from(3)
        }
    };

    println!("{}", state);
    if let Some(welcome) = page.welcome_message() {
        println!("{}", welcome);
    }
    Ok(code)
}

/// Posts each stdin line to the bus until end of input.
async fn forward_stdin(bus: &MessageBus) -> Result<(), ConnectifyError> {
    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read page messages from stdin")?
    {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(&line) {
            Ok(message) => {
                bus.post(message);
            }
            Err(e) => warn!("Ignoring non-JSON message: {}", e),
        }
    }
    Ok(())
}
