//! The page router.
//!
//! One mutable page tag plus auxiliary selection state, owned by a single
//! controller and mutated only through named transitions. Tags keep the web
//! shell's wire spellings (`dashboard-cliente`, `pedido`, ...) because the
//! redirect marker persists them and deep links embed them.
//!
//! Role guards are applied at *render* time by [`Router::resolve_view`]:
//! a business session asking for the customer dashboard keeps the requested
//! tag but renders Home, silently.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use mercado_barrio_core::{BusinessId, OrderId};

use crate::session::{Session, SessionStore};
use crate::signals::Signal;

/// Deep-link pattern for business profiles.
static DEEP_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/negocios/(\d+)").expect("deep-link pattern is valid"));

/// The fixed set of renderable pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Page {
    #[default]
    #[serde(rename = "home")]
    Home,
    #[serde(rename = "login")]
    Login,
    #[serde(rename = "register")]
    Register,
    #[serde(rename = "search")]
    Search,
    #[serde(rename = "dashboard-cliente")]
    CustomerDashboard,
    #[serde(rename = "dashboard-negocio")]
    BusinessDashboard,
    #[serde(rename = "editar-perfil")]
    EditProfile,
    #[serde(rename = "business-profile")]
    BusinessProfile,
    #[serde(rename = "pedido")]
    OrderForm,
    #[serde(rename = "pedido-confirm")]
    OrderConfirm,
}

impl Page {
    /// The persisted tag for this page.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Login => "login",
            Self::Register => "register",
            Self::Search => "search",
            Self::CustomerDashboard => "dashboard-cliente",
            Self::BusinessDashboard => "dashboard-negocio",
            Self::EditProfile => "editar-perfil",
            Self::BusinessProfile => "business-profile",
            Self::OrderForm => "pedido",
            Self::OrderConfirm => "pedido-confirm",
        }
    }

    /// Parse a persisted tag; unknown tags are `None`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "home" => Some(Self::Home),
            "login" => Some(Self::Login),
            "register" => Some(Self::Register),
            "search" => Some(Self::Search),
            "dashboard-cliente" => Some(Self::CustomerDashboard),
            "dashboard-negocio" => Some(Self::BusinessDashboard),
            "editar-perfil" => Some(Self::EditProfile),
            "business-profile" => Some(Self::BusinessProfile),
            "pedido" => Some(Self::OrderForm),
            "pedido-confirm" => Some(Self::OrderConfirm),
            _ => None,
        }
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

// =============================================================================
// Location
// =============================================================================

/// The visible location bar and its history.
///
/// `push` is the `history.pushState` analog: the path changes, an entry is
/// recorded, nothing reloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    path: String,
    history: Vec<String>,
}

impl Default for Location {
    fn default() -> Self {
        Self::new()
    }
}

impl Location {
    /// Start at the root path.
    #[must_use]
    pub fn new() -> Self {
        Self::from_path("/")
    }

    /// Start at an arbitrary path (e.g. a shared deep link).
    #[must_use]
    pub fn from_path(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            history: vec![path.clone()],
            path,
        }
    }

    /// The current visible path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Change the visible path, recording a history entry.
    pub fn push(&mut self, path: impl Into<String>) {
        self.path = path.into();
        self.history.push(self.path.clone());
    }

    /// Every path visited, oldest first.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

// =============================================================================
// Router
// =============================================================================

/// The finite-state view selector.
#[derive(Debug)]
pub struct Router {
    page: Page,
    selected_business: Option<BusinessId>,
    selected_order: Option<OrderId>,
    location: Location,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Start at Home with a root location.
    #[must_use]
    pub fn new() -> Self {
        Self::with_location(Location::new())
    }

    /// Start at Home at an arbitrary initial location.
    #[must_use]
    pub const fn with_location(location: Location) -> Self {
        Self {
            page: Page::Home,
            selected_business: None,
            selected_order: None,
            location,
        }
    }

    /// The requested page tag (before guards).
    #[must_use]
    pub const fn page(&self) -> Page {
        self.page
    }

    /// The business selected for profile/order views.
    #[must_use]
    pub const fn selected_business(&self) -> Option<BusinessId> {
        self.selected_business
    }

    /// The order selected for the confirmation view.
    #[must_use]
    pub const fn selected_order(&self) -> Option<OrderId> {
        self.selected_order
    }

    /// The visible location.
    #[must_use]
    pub const fn location(&self) -> &Location {
        &self.location
    }

    /// Unconditional tag change; always succeeds.
    pub fn set_page(&mut self, page: Page) {
        self.page = page;
    }

    /// Go to the dashboard matching the session role; no-op without a
    /// session. Non-business roles land on the customer dashboard tag and
    /// let the render guard sort out the rest.
    pub fn go_to_dashboard(&mut self, session: Option<&Session>) {
        let Some(session) = session else { return };
        self.page = if session.tipo.is_business() {
            Page::BusinessDashboard
        } else {
            Page::CustomerDashboard
        };
    }

    /// Open a business profile: selection, page tag, and the visible
    /// location all move together so the view is deep-linkable.
    pub fn open_business_profile(&mut self, id: BusinessId) {
        self.selected_business = Some(id);
        self.page = Page::BusinessProfile;
        self.location.push(format!("/negocios/{id}"));
    }

    /// Open the order form, optionally preselecting a business.
    pub fn open_order_form(&mut self, negocio: Option<BusinessId>) {
        if negocio.is_some() {
            self.selected_business = negocio;
        }
        self.page = Page::OrderForm;
    }

    /// Land on the order confirmation page for a placed order.
    pub fn open_order_confirm(&mut self, pedido: Option<OrderId>) {
        self.selected_order = pedido;
        self.page = Page::OrderConfirm;
    }

    /// Clear the session and return to Home.
    pub fn logout(&mut self, sessions: &mut SessionStore) {
        if let Err(err) = sessions.clear() {
            warn!(error = %err, "failed to clear persisted session on logout");
        }
        self.page = Page::Home;
    }

    /// Apply a bus signal; same transitions as the direct calls.
    pub fn apply_signal(&mut self, signal: Signal) {
        match signal {
            Signal::OpenBusinessProfile { id } => self.open_business_profile(id),
            Signal::OpenOrderRequest { id } => self.open_order_form(id),
        }
    }

    /// The view to render for the current tag, with role guards applied.
    ///
    /// Guard failures fall back to Home silently; the requested tag stays
    /// put so a later login renders it without re-navigation.
    #[must_use]
    pub fn resolve_view(&self, session: Option<&Session>) -> Page {
        match self.page {
            Page::CustomerDashboard if !session.is_some_and(|s| s.tipo.is_customer()) => Page::Home,
            Page::BusinessDashboard if !session.is_some_and(|s| s.tipo.is_business()) => Page::Home,
            Page::EditProfile if session.is_none() => Page::Home,
            page => page,
        }
    }

    /// Startup navigation.
    ///
    /// With a restorable session: consume the pending redirect marker if one
    /// was stored (unknown tags render Home), else land on the role's
    /// dashboard. Without one: honor a `/negocios/{id}` deep link in the
    /// initial location.
    pub fn bootstrap(&mut self, sessions: &mut SessionStore) {
        let restored = sessions.restore().cloned();
        if let Some(session) = restored {
            if let Some(tag) = sessions.take_redirect() {
                self.page = Page::from_tag(&tag).unwrap_or(Page::Home);
                return;
            }
            self.go_to_dashboard(Some(&session));
        } else if let Some(id) = deep_link_business(self.location.path()) {
            // The path is already visible; only state moves.
            self.selected_business = Some(id);
            self.page = Page::BusinessProfile;
        }
    }
}

/// Extract the business id from a `/negocios/{id}` path, if present.
#[must_use]
pub fn deep_link_business(path: &str) -> Option<BusinessId> {
    DEEP_LINK
        .captures(path)?
        .get(1)?
        .as_str()
        .parse::<i32>()
        .ok()
        .map(BusinessId::new)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::session::keys;
    use crate::storage::{KeyValueStore, MemoryStore};
    use mercado_barrio_core::Role;
    use serde_json::json;

    fn sessions_with(entries: &[(&str, serde_json::Value)]) -> SessionStore {
        let mut backing = MemoryStore::new();
        for (key, value) in entries {
            backing.set(key, value.clone()).unwrap();
        }
        SessionStore::new(Box::new(backing))
    }

    fn session(role: Role) -> Session {
        serde_json::from_value(json!({ "id": 1, "nombre": "Ana", "tipo": role.as_str() }))
            .unwrap()
    }

    #[test]
    fn test_set_page_is_unconditional() {
        let mut router = Router::new();
        router.set_page(Page::Login);
        assert_eq!(router.page(), Page::Login);
        router.set_page(Page::Search);
        assert_eq!(router.page(), Page::Search);
    }

    #[test]
    fn test_go_to_dashboard_resolves_role() {
        let mut router = Router::new();
        router.go_to_dashboard(Some(&session(Role::Business)));
        assert_eq!(router.page(), Page::BusinessDashboard);

        router.go_to_dashboard(Some(&session(Role::Customer)));
        assert_eq!(router.page(), Page::CustomerDashboard);
    }

    #[test]
    fn test_go_to_dashboard_without_session_is_noop() {
        let mut router = Router::new();
        router.set_page(Page::Search);
        router.go_to_dashboard(None);
        assert_eq!(router.page(), Page::Search);
    }

    #[test]
    fn test_open_business_profile_updates_selection_and_location() {
        let mut router = Router::new();
        router.open_business_profile(BusinessId::new(42));
        assert_eq!(router.page(), Page::BusinessProfile);
        assert_eq!(router.selected_business(), Some(BusinessId::new(42)));
        assert_eq!(router.location().path(), "/negocios/42");
        // pushState, not a reload: the previous entry is still in history.
        assert_eq!(router.location().history(), ["/", "/negocios/42"]);
    }

    #[test]
    fn test_open_order_form_keeps_selection_when_none_given() {
        let mut router = Router::new();
        router.open_business_profile(BusinessId::new(3));
        router.open_order_form(None);
        assert_eq!(router.page(), Page::OrderForm);
        assert_eq!(router.selected_business(), Some(BusinessId::new(3)));
    }

    #[test]
    fn test_guard_customer_dashboard_against_business_session() {
        let mut router = Router::new();
        router.set_page(Page::CustomerDashboard);
        let s = session(Role::Business);
        assert_eq!(router.resolve_view(Some(&s)), Page::Home);
        // The requested tag is untouched.
        assert_eq!(router.page(), Page::CustomerDashboard);
    }

    #[test]
    fn test_guard_business_dashboard_against_customer_session() {
        let mut router = Router::new();
        router.set_page(Page::BusinessDashboard);
        let s = session(Role::Customer);
        assert_eq!(router.resolve_view(Some(&s)), Page::Home);
    }

    #[test]
    fn test_guards_pass_matching_roles() {
        let mut router = Router::new();
        router.set_page(Page::BusinessDashboard);
        let s = session(Role::Business);
        assert_eq!(router.resolve_view(Some(&s)), Page::BusinessDashboard);
    }

    #[test]
    fn test_guards_against_missing_session() {
        let mut router = Router::new();
        router.set_page(Page::CustomerDashboard);
        assert_eq!(router.resolve_view(None), Page::Home);
        router.set_page(Page::EditProfile);
        assert_eq!(router.resolve_view(None), Page::Home);
    }

    #[test]
    fn test_unknown_role_is_denied_both_dashboards() {
        let mut router = Router::new();
        let s = session(Role::Unknown);
        router.set_page(Page::CustomerDashboard);
        assert_eq!(router.resolve_view(Some(&s)), Page::Home);
        router.set_page(Page::BusinessDashboard);
        assert_eq!(router.resolve_view(Some(&s)), Page::Home);
    }

    #[test]
    fn test_logout_clears_session_and_goes_home() {
        let mut sessions =
            sessions_with(&[(keys::USER, json!({ "id": 2, "tipo": "cliente" }))]);
        sessions.restore();

        let mut router = Router::new();
        router.set_page(Page::CustomerDashboard);
        router.logout(&mut sessions);

        assert_eq!(router.page(), Page::Home);
        assert!(sessions.current().is_none());
    }

    #[test]
    fn test_signals_mirror_direct_calls() {
        let mut router = Router::new();
        router.apply_signal(Signal::OpenBusinessProfile {
            id: BusinessId::new(8),
        });
        assert_eq!(router.page(), Page::BusinessProfile);
        assert_eq!(router.location().path(), "/negocios/8");

        router.apply_signal(Signal::OpenOrderRequest {
            id: Some(BusinessId::new(8)),
        });
        assert_eq!(router.page(), Page::OrderForm);
        assert_eq!(router.selected_business(), Some(BusinessId::new(8)));
    }

    #[test]
    fn test_bootstrap_prefers_redirect_marker() {
        let mut sessions = sessions_with(&[
            (keys::USER, json!({ "id": 9, "tipo": "negocio" })),
            (keys::REDIRECT, json!("dashboard-negocio")),
        ]);
        let mut router = Router::new();
        router.bootstrap(&mut sessions);
        assert_eq!(router.page(), Page::BusinessDashboard);
        // Consumed: a second bootstrap falls back to the role dashboard.
        let mut router = Router::new();
        router.bootstrap(&mut sessions);
        assert_eq!(router.page(), Page::BusinessDashboard);
    }

    #[test]
    fn test_bootstrap_unknown_redirect_tag_renders_home() {
        let mut sessions = sessions_with(&[
            (keys::USER, json!({ "id": 9, "tipo": "cliente" })),
            (keys::REDIRECT, json!("panel-secreto")),
        ]);
        let mut router = Router::new();
        router.bootstrap(&mut sessions);
        assert_eq!(router.page(), Page::Home);
    }

    #[test]
    fn test_bootstrap_role_dashboard_without_redirect() {
        let mut sessions =
            sessions_with(&[(keys::USER, json!({ "id": 9, "tipo": "negocio" }))]);
        let mut router = Router::new();
        router.bootstrap(&mut sessions);
        assert_eq!(router.page(), Page::BusinessDashboard);
    }

    #[test]
    fn test_bootstrap_deep_link_without_session() {
        let mut sessions = sessions_with(&[]);
        let mut router = Router::with_location(Location::from_path("/negocios/7"));
        router.bootstrap(&mut sessions);
        assert_eq!(router.page(), Page::BusinessProfile);
        assert_eq!(router.selected_business(), Some(BusinessId::new(7)));
    }

    #[test]
    fn test_bootstrap_malformed_session_acts_logged_out() {
        let mut sessions =
            sessions_with(&[(keys::USER, json!({ "nombre": "sin id" }))]);
        let mut router = Router::with_location(Location::from_path("/negocios/7"));
        router.bootstrap(&mut sessions);
        // Malformed record discarded; the deep link still wins.
        assert_eq!(router.page(), Page::BusinessProfile);
        assert!(sessions.current().is_none());
    }

    #[test]
    fn test_deep_link_parsing() {
        assert_eq!(deep_link_business("/negocios/7"), Some(BusinessId::new(7)));
        assert_eq!(
            deep_link_business("/negocios/123/whatever"),
            Some(BusinessId::new(123))
        );
        assert_eq!(deep_link_business("/"), None);
        assert_eq!(deep_link_business("/negocios/abc"), None);
        assert_eq!(deep_link_business("/otros/7"), None);
    }

    #[test]
    fn test_page_tags_roundtrip() {
        for page in [
            Page::Home,
            Page::Login,
            Page::Register,
            Page::Search,
            Page::CustomerDashboard,
            Page::BusinessDashboard,
            Page::EditProfile,
            Page::BusinessProfile,
            Page::OrderForm,
            Page::OrderConfirm,
        ] {
            assert_eq!(Page::from_tag(page.tag()), Some(page));
        }
        assert_eq!(Page::from_tag("no-such-page"), None);
    }
}
