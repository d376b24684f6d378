// --- File: crates/connectify_booking/src/session.rs ---
use connectify_common::TokenService;
use connectify_config::AppConfig;
use std::sync::Arc;
use uuid::Uuid;

use crate::completion::CompletionReporter;
use crate::error::TokenServiceError;
use crate::models::PersonalizationData;
use crate::page::{PageView, UiStateController};
use crate::validation::ValidationClient;
use crate::widget::{WidgetCoordinator, WidgetHost, WidgetSettings};

/// Everything one page load works with.
///
/// A session is built per page load and consumed by
/// [`BookingSession::load`](crate::orchestrator), so the pipeline runs at most once.
pub struct BookingSession<S> {
    pub(crate) id: Uuid,
    pub(crate) welcome_template: String,
    pub(crate) ui: UiStateController,
    pub(crate) validation: ValidationClient<S>,
    pub(crate) reporter: CompletionReporter<S>,
    pub(crate) widget: WidgetCoordinator,
}

impl<S> BookingSession<S>
where
    S: TokenService<Error = TokenServiceError> + 'static,
{
    pub fn new(
        service: Arc<S>,
        page: Arc<dyn PageView>,
        widget_host: Arc<dyn WidgetHost>,
        config: &AppConfig,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            welcome_template: config.page.welcome_template.clone(),
            ui: UiStateController::new(page),
            validation: ValidationClient::new(service.clone()),
            reporter: CompletionReporter::new(service),
            widget: WidgetCoordinator::new(widget_host, WidgetSettings::from(&config.widget)),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn ui(&self) -> &UiStateController {
        &self.ui
    }

    /// A handle on the completion reporter, usable after the session is consumed.
    pub fn reporter(&self) -> CompletionReporter<S> {
        self.reporter.clone()
    }

    /// Welcome text for the validated identity; `None` without a name.
    pub fn welcome_message(&self, identity: &PersonalizationData) -> Option<String> {
        identity
            .first_name()
            .map(|first_name| self.welcome_template.replace("{first_name}", first_name))
    }
}
