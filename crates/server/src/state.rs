use std::sync::Arc;

use models::{Department, Entity, Service, User};
use service::consumers::Editor;
use service::storage::SlotStore;
use service::suggestions::SuggestionProvider;
use tracing::info;

/// Shared handler state: one long-lived editor per collection, the raw slot
/// area for public viewers, and the suggestion collaborator.
#[derive(Clone)]
pub struct AppState {
    pub slots: Arc<dyn SlotStore>,
    pub departments: Arc<Editor<Department>>,
    pub services: Arc<Editor<Service>>,
    pub users: Arc<Editor<User>>,
    pub suggestions: Arc<dyn SuggestionProvider>,
}

impl AppState {
    pub fn new(slots: Arc<dyn SlotStore>, suggestions: Arc<dyn SuggestionProvider>) -> Self {
        Self {
            departments: Arc::new(Editor::new(Arc::clone(&slots))),
            services: Arc::new(Editor::new(Arc::clone(&slots))),
            users: Arc::new(Editor::new(Arc::clone(&slots))),
            slots,
            suggestions,
        }
    }

    /// Open every editor's store. Each one seeds or recovers on its own.
    pub async fn mount(&self) {
        let departments = self.departments.mount().await;
        let services = self.services.mount().await;
        let users = self.users.mount().await;
        info!(event = "stores_mounted", ?departments, ?services, ?users, "admin editors ready");
    }
}

/// Record kinds exposed under `/admin/{kind}`.
pub trait AdminResource: Entity {
    fn editor(state: &AppState) -> &Editor<Self>;
}

impl AdminResource for Department {
    fn editor(state: &AppState) -> &Editor<Self> { &state.departments }
}

impl AdminResource for Service {
    fn editor(state: &AppState) -> &Editor<Self> { &state.services }
}

impl AdminResource for User {
    fn editor(state: &AppState) -> &Editor<Self> { &state.users }
}
