//! Session context and page navigation.
//!
//! Navigation is a flat set of pages with no transition rules: with a
//! session, any page is reachable from any other. Without one, only the
//! login page is.

use crate::{
    cache::CustomerCache,
    error::{DashError, DashResult},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Page {
    #[default]
    Login,
    Dashboard,
    Customers,
    CustomerDetail,
    Analytics,
}

impl Page {
    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Login          => "login",
            Page::Dashboard      => "dashboard",
            Page::Customers      => "customers",
            Page::CustomerDetail => "customerDetail",
            Page::Analytics      => "analytics",
        }
    }

    pub fn requires_session(&self) -> bool {
        !matches!(self, Page::Login)
    }
}

impl FromStr for Page {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "login"                                => Ok(Page::Login),
            "dashboard"                            => Ok(Page::Dashboard),
            "customers"                            => Ok(Page::Customers),
            "customerDetail" | "customer_detail"   => Ok(Page::CustomerDetail),
            "analytics"                            => Ok(Page::Analytics),
            other => Err(DashError::UnknownPage { name: other.to_string() }),
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The signed-in user. Passed explicitly to whatever needs it; the
/// aggregation core never reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_name:  String,
    pub user_email: String,
    /// Opaque bearer token. Never inspected here.
    pub token:      String,
}

#[derive(Debug, Clone, Default)]
pub struct Navigator {
    session: Option<Session>,
    current: Page,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Page {
        self.current
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Start a session and land on the dashboard. The customer cache is
    /// invalidated so nothing from a previous session survives.
    pub fn login(&mut self, session: Session, cache: &mut CustomerCache) -> Page {
        log::info!("session: {} signed in", session.user_email);
        cache.invalidate();
        self.session = Some(session);
        self.current = Page::Dashboard;
        self.current
    }

    pub fn logout(&mut self, cache: &mut CustomerCache) {
        if let Some(s) = self.session.take() {
            log::info!("session: {} signed out", s.user_email);
        }
        cache.invalidate();
        self.current = Page::Login;
    }

    pub fn navigate(&mut self, page: Page) -> DashResult<Page> {
        if page.requires_session() && self.session.is_none() {
            return Err(DashError::SessionRequired { page: page.to_string() });
        }
        log::debug!("session: {} -> {}", self.current, page);
        self.current = page;
        Ok(page)
    }
}
