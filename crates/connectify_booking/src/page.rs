// --- File: crates/connectify_booking/src/page.rs ---
//! The page the booking gate renders into.
//!
//! `PageView` is the DOM contract: three mutually exclusive state containers
//! and a welcome text element. `UiStateController` is the only writer.

use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use crate::models::UiState;

/// The page elements the booking gate writes to.
pub trait PageView: Send + Sync {
    /// Adds or removes the `active` marker of a state container.
    fn set_container_active(&self, state: UiState, active: bool);

    /// Replaces the text of the welcome element.
    fn set_welcome_message(&self, message: &str);
}

#[derive(Debug)]
struct PageDom {
    active: Vec<UiState>,
    welcome: Option<String>,
}

/// In-memory page used by the headless runner and the tests.
///
/// Starts the way the page markup does: only the loading container is active.
#[derive(Debug)]
pub struct HeadlessPage {
    dom: Mutex<PageDom>,
}

impl Default for HeadlessPage {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessPage {
    pub fn new() -> Self {
        Self {
            dom: Mutex::new(PageDom {
                active: vec![UiState::Loading],
                welcome: None,
            }),
        }
    }

    /// States whose container is currently marked active.
    pub fn active_states(&self) -> Vec<UiState> {
        let dom = self.dom.lock().unwrap_or_else(|e| e.into_inner());
        UiState::ALL
            .into_iter()
            .filter(|state| dom.active.contains(state))
            .collect()
    }

    pub fn welcome_message(&self) -> Option<String> {
        self.dom
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .welcome
            .clone()
    }
}

impl PageView for HeadlessPage {
    fn set_container_active(&self, state: UiState, active: bool) {
        let mut dom = self.dom.lock().unwrap_or_else(|e| e.into_inner());
        dom.active.retain(|s| *s != state);
        if active {
            dom.active.push(state);
        }
    }

    fn set_welcome_message(&self, message: &str) {
        info!("Welcome message: {}", message);
        self.dom.lock().unwrap_or_else(|e| e.into_inner()).welcome = Some(message.to_string());
    }
}

/// Shows exactly one of the three page states.
pub struct UiStateController {
    view: Arc<dyn PageView>,
    current: Mutex<UiState>,
}

impl UiStateController {
    /// The page markup starts in the loading state.
    pub fn new(view: Arc<dyn PageView>) -> Self {
        Self {
            view,
            current: Mutex::new(UiState::Loading),
        }
    }

    /// Activates `state` and deactivates the other two, whatever the current state.
    pub fn show_state(&self, state: UiState) {
        for other in UiState::ALL {
            self.view.set_container_active(other, false);
        }
        self.view.set_container_active(state, true);

        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        if *current != state {
            debug!("UI state {} -> {}", *current, state);
        }
        *current = state;
    }

    pub fn current(&self) -> UiState {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_welcome_message(&self, message: &str) {
        self.view.set_welcome_message(message);
    }
}
