// --- File: crates/connectify_booking/src/widget.rs ---
//! Scheduling widget coordination.
//!
//! The widget is a third-party component. The booking gate only needs three
//! things from it: to know whether its library has loaded, to initialize it
//! inline, and to hear the messages it posts to the page.

use connectify_common::TokenService;
use connectify_config::WidgetConfig;
use serde::Deserialize;
use serde_json::Value;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info, Instrument};

use crate::completion::CompletionReporter;
use crate::credential::Credential;
use crate::error::{BookingError, TokenServiceError};
use crate::models::{InlineWidgetOptions, PersonalizationData};

/// Name prefix of every message the widget posts.
pub const EVENT_PREFIX: &str = "calendly";

// --- Widget Events ---

/// Details of a completed booking, as far as the widget reports them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScheduledEvent {
    pub event_uri: Option<String>,
    pub invitee_uri: Option<String>,
}

#[derive(Deserialize)]
struct ResourceRef {
    uri: String,
}

#[derive(Deserialize, Default)]
struct ScheduledPayload {
    event: Option<ResourceRef>,
    invitee: Option<ResourceRef>,
}

/// A message posted by the scheduling widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    ProfilePageViewed,
    EventTypeViewed,
    DateAndTimeSelected,
    EventScheduled(ScheduledEvent),
    PageHeight,
    /// A widget event this page does not know about
    Other(String),
}

impl WidgetEvent {
    /// Decodes a posted message.
    ///
    /// Returns `None` for messages that do not come from the widget, i.e. whose
    /// `event` field is missing, not a string, or lacks the `calendly` prefix.
    pub fn decode(message: &Value) -> Option<Self> {
        let name = message.get("event")?.as_str()?;
        if !name.starts_with(EVENT_PREFIX) {
            return None;
        }

        let event = match name {
            "calendly.profile_page_viewed" => WidgetEvent::ProfilePageViewed,
            "calendly.event_type_viewed" => WidgetEvent::EventTypeViewed,
            "calendly.date_and_time_selected" => WidgetEvent::DateAndTimeSelected,
            "calendly.event_scheduled" => {
                let payload = message
                    .get("payload")
                    .cloned()
                    .and_then(|p| serde_json::from_value::<ScheduledPayload>(p).ok())
                    .unwrap_or_default();
                WidgetEvent::EventScheduled(ScheduledEvent {
                    event_uri: payload.event.map(|r| r.uri),
                    invitee_uri: payload.invitee.map(|r| r.uri),
                })
            }
            "calendly.page_height" => WidgetEvent::PageHeight,
            other => WidgetEvent::Other(other.to_string()),
        };
        Some(event)
    }
}

// --- Message Bus ---

/// Page-wide message stream, the equivalent of `window` message events.
///
/// Every subscriber gets its own unbounded queue, so a slow listener never
/// loses a message. The stream ends for subscribers once every clone of the
/// bus is dropped.
#[derive(Debug, Clone, Default)]
pub struct MessageBus {
    subscribers: Arc<Mutex<Vec<UnboundedSender<Value>>>>,
}

impl MessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers a message to every current subscriber; returns how many there were.
    pub fn post(&self, message: Value) -> usize {
        let mut subscribers = self.subscribers.lock().unwrap_or_else(|e| e.into_inner());
        subscribers.retain(|subscriber| subscriber.send(message.clone()).is_ok());
        subscribers.len()
    }

    /// Receives messages posted from now on.
    pub fn subscribe(&self) -> UnboundedReceiver<Value> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(sender);
        receiver
    }
}

// --- Widget Host ---

/// The embedding environment of the scheduling widget.
pub trait WidgetHost: Send + Sync {
    /// Whether the widget library has loaded.
    fn is_library_loaded(&self) -> bool;

    /// Base scheduling URL, the data URL attribute of the mount element.
    fn base_url(&self) -> String;

    /// Removes whatever is mounted at the widget mount point.
    fn clear_mount(&self);

    /// Initializes the widget inline at the mount point.
    fn init_inline_widget(&self, options: InlineWidgetOptions);

    /// Subscribes to the page message stream.
    fn messages(&self) -> UnboundedReceiver<Value>;
}

/// Widget host backed by a `MessageBus`.
///
/// The library can be made to load only after a number of failed readiness
/// checks, like a script tag that is still downloading.
pub struct ChannelWidgetHost {
    base_url: String,
    bus: MessageBus,
    load_after_checks: AtomicU32,
    readiness_checks: AtomicU32,
    clears: AtomicUsize,
    mounted: Mutex<Vec<InlineWidgetOptions>>,
}

impl ChannelWidgetHost {
    /// A host whose library is already loaded.
    pub fn new(base_url: impl Into<String>, bus: MessageBus) -> Self {
        Self {
            base_url: base_url.into(),
            bus,
            load_after_checks: AtomicU32::new(0),
            readiness_checks: AtomicU32::new(0),
            clears: AtomicUsize::new(0),
            mounted: Mutex::new(Vec::new()),
        }
    }

    /// The library loads once `checks` readiness checks have failed.
    pub fn library_loaded_after(self, checks: u32) -> Self {
        self.load_after_checks.store(checks, Ordering::SeqCst);
        self
    }

    /// The library never loads.
    pub fn without_library(self) -> Self {
        self.library_loaded_after(u32::MAX)
    }

    pub fn bus(&self) -> &MessageBus {
        &self.bus
    }

    pub fn readiness_checks(&self) -> u32 {
        self.readiness_checks.load(Ordering::SeqCst)
    }

    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }

    /// Every initialization so far, oldest first.
    pub fn initializations(&self) -> Vec<InlineWidgetOptions> {
        self.mounted.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl WidgetHost for ChannelWidgetHost {
    fn is_library_loaded(&self) -> bool {
        let failed_so_far = self.readiness_checks.fetch_add(1, Ordering::SeqCst);
        failed_so_far >= self.load_after_checks.load(Ordering::SeqCst)
    }

    fn base_url(&self) -> String {
        self.base_url.clone()
    }

    fn clear_mount(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
    }

    fn init_inline_widget(&self, options: InlineWidgetOptions) {
        info!("Scheduling widget initialized at {}", options.url);
        self.mounted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(options);
    }

    fn messages(&self) -> UnboundedReceiver<Value> {
        self.bus.subscribe()
    }
}

// --- Coordinator ---

/// Readiness polling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetSettings {
    pub poll_interval: Duration,
    /// Maximum number of waits before giving up; `None` waits forever.
    pub max_poll_attempts: Option<u32>,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self::from(&WidgetConfig::default())
    }
}

impl From<&WidgetConfig> for WidgetSettings {
    fn from(config: &WidgetConfig) -> Self {
        Self {
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            max_poll_attempts: (config.max_poll_attempts > 0).then_some(config.max_poll_attempts),
        }
    }
}

/// Appends the prefill parameters to the scheduling URL.
///
/// The base URL is returned unchanged when there is nothing to prefill.
pub fn widget_url(base_url: &str, data: &PersonalizationData) -> String {
    match data.prefill_query() {
        Some(query) => {
            let separator = if base_url.contains('?') { '&' } else { '?' };
            format!("{}{}{}", base_url, separator, query)
        }
        None => base_url.to_string(),
    }
}

/// Brings the scheduling widget up and wires its completion event to the reporter.
pub struct WidgetCoordinator {
    host: Arc<dyn WidgetHost>,
    settings: WidgetSettings,
}

impl WidgetCoordinator {
    pub fn new(host: Arc<dyn WidgetHost>, settings: WidgetSettings) -> Self {
        Self { host, settings }
    }

    /// Polls until the widget library is loaded.
    ///
    /// Returns the number of polls that had to wait.
    pub async fn await_library(&self) -> Result<u32, BookingError> {
        let mut waited = 0;
        loop {
            if self.host.is_library_loaded() {
                if waited > 0 {
                    debug!("Widget library loaded after {} polls", waited);
                }
                return Ok(waited);
            }
            if self.settings.max_poll_attempts == Some(waited) {
                return Err(BookingError::WidgetUnavailable { attempts: waited });
            }
            tokio::time::sleep(self.settings.poll_interval).await;
            waited += 1;
        }
    }

    /// Clears the mount point and initializes the widget with the prefilled URL.
    pub fn mount(&self, data: &PersonalizationData) -> InlineWidgetOptions {
        let options = InlineWidgetOptions {
            url: widget_url(&self.host.base_url(), data),
            prefill: data.prefill(),
        };
        self.host.clear_mount();
        self.host.init_inline_widget(options.clone());
        options
    }

    /// Waits for the library, mounts the widget and starts listening for its events.
    ///
    /// The returned task reports the token as used on every
    /// `calendly.event_scheduled` message and lives as long as the page.
    pub async fn initialize<S>(
        &self,
        data: PersonalizationData,
        credential: Credential,
        reporter: CompletionReporter<S>,
    ) -> Result<JoinHandle<()>, BookingError>
    where
        S: TokenService<Error = TokenServiceError> + 'static,
    {
        self.await_library().await?;

        let messages = self.host.messages();
        self.mount(&data);

        Ok(tokio::spawn(
            listen(messages, credential, reporter).in_current_span(),
        ))
    }
}

async fn listen<S>(
    mut messages: UnboundedReceiver<Value>,
    credential: Credential,
    reporter: CompletionReporter<S>,
) where
    S: TokenService<Error = TokenServiceError> + 'static,
{
    while let Some(message) = messages.recv().await {
        match WidgetEvent::decode(&message) {
            Some(WidgetEvent::EventScheduled(details)) => {
                info!(
                    "Booking scheduled (event: {:?}, invitee: {:?})",
                    details.event_uri, details.invitee_uri
                );
                reporter.report(&credential);
            }
            Some(event) => debug!("Widget event: {:?}", event),
            None => {}
        }
    }
    debug!("Page message stream closed");
}
