//! # View Loader
//!
//! Resolves a route to the backend data its view renders. Starting a new
//! load cancels the one still in flight, so a view that has been navigated
//! away from never receives a late response.

use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

use crate::client::{cancellable, ClientResult, SkillsApi};
use crate::models::{SkillDetail, SkillSummary};
use crate::routing::{Location, Route};

/// Data backing one rendered view
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Listing {
        query: Option<String>,
        skills: Vec<SkillSummary>,
    },
    Detail(SkillDetail),
}

impl View {
    pub fn route(&self) -> Route {
        match self {
            View::Listing { .. } => Route::Home,
            View::Detail(detail) => Route::skill(detail.name()),
        }
    }
}

pub struct ViewLoader<A: SkillsApi> {
    api: Arc<A>,
    root: CancellationToken,
    in_flight: Mutex<Option<CancellationToken>>,
}

impl<A: SkillsApi> ViewLoader<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            root: CancellationToken::new(),
            in_flight: Mutex::new(None),
        }
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    /// Load the data for a route; `search` filters the listing
    pub async fn load(&self, route: &Route, search: Option<&str>) -> ClientResult<View> {
        let token = self.begin();
        let result = cancellable(&token, self.fetch(route, search)).await;

        if let Err(e) = &result {
            if e.is_cancelled() {
                tracing::debug!(route = %route, "View load superseded");
            } else {
                tracing::warn!(route = %route, error = %e, "View load failed");
            }
        }
        result
    }

    /// Load a history entry; the listing search comes from its `q` parameter
    pub async fn load_location(&self, location: &Location) -> ClientResult<View> {
        let search = location.query("q");
        self.load(&location.route, search.as_deref()).await
    }

    /// Cancel the load in flight, if any
    pub fn abandon(&self) {
        if let Some(token) = self.lock_in_flight().take() {
            token.cancel();
        }
    }

    /// Cancel the load in flight and every future load (view torn down)
    pub fn shutdown(&self) {
        self.root.cancel();
    }

    fn begin(&self) -> CancellationToken {
        let token = self.root.child_token();
        if let Some(previous) = self.lock_in_flight().replace(token.clone()) {
            previous.cancel();
        }
        token
    }

    fn lock_in_flight(&self) -> std::sync::MutexGuard<'_, Option<CancellationToken>> {
        // A poisoned guard still holds a valid token slot
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn fetch(&self, route: &Route, search: Option<&str>) -> ClientResult<View> {
        match route {
            Route::Home => {
                let skills = self.api.list_skills(search).await?;
                Ok(View::Listing {
                    query: search.map(str::to_string),
                    skills,
                })
            }
            Route::SkillDetail { name } => {
                let detail = self.api.get_skill_detail(name).await?;
                Ok(View::Detail(detail))
            }
        }
    }
}
