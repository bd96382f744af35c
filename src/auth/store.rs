//! Client-side auth state.
//!
//! The one piece of persistent cross-component state: the signed-in user,
//! their roles, and the API token. Held in Tauri managed state and passed
//! explicitly; there is no module-level singleton. Created at login, persisted as a
//! snapshot file under the app data directory, hydrated at startup, cleared
//! at logout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::user::{AuthUser, Role};

/// Serialized form of the store (the snapshot under the fixed storage key).
#[derive(Debug, Serialize, Deserialize)]
struct AuthSnapshot {
    token: String,
    user: AuthUser,
    login_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct AuthStore {
    token: Option<String>,
    user: Option<AuthUser>,
    login_at: Option<DateTime<Utc>>,
}

impl AuthStore {
    /// Load the store from the snapshot file. A missing or unreadable
    /// snapshot yields an empty (signed-out) store.
    pub fn hydrate(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };

        match serde_json::from_str::<AuthSnapshot>(&content) {
            Ok(snapshot) => Self {
                token: Some(snapshot.token),
                user: Some(snapshot.user),
                login_at: Some(snapshot.login_at),
            },
            Err(_) => Self::default(),
        }
    }

    /// Write the current session to the snapshot file.
    pub fn persist(&self, path: &Path) -> Result<(), String> {
        let (Some(token), Some(user), Some(login_at)) =
            (self.token.as_ref(), self.user.as_ref(), self.login_at)
        else {
            return Err("No session to persist".into());
        };

        let snapshot = AuthSnapshot {
            token: token.clone(),
            user: user.clone(),
            login_at,
        };

        let json = serde_json::to_string(&snapshot)
            .map_err(|e| format!("Failed to serialize auth snapshot: {}", e))?;
        std::fs::write(path, json).map_err(|e| format!("Failed to write auth snapshot: {}", e))
    }

    /// Install a fresh session after login.
    pub fn set_session(&mut self, token: String, user: AuthUser) {
        self.token = Some(token);
        self.user = Some(user);
        self.login_at = Some(Utc::now());
    }

    /// Clear in-memory state and remove the snapshot file (logout).
    pub fn clear(&mut self, path: &Path) {
        self.token = None;
        self.user = None;
        self.login_at = None;
        let _ = std::fs::remove_file(path);
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.user
            .as_ref()
            .map(|u| u.roles.contains(&role))
            .unwrap_or(false)
    }

    /// Role-derived landing route.
    pub fn default_route(&self) -> &'static str {
        if self.has_role(Role::Admin) {
            "/dashboard"
        } else if self.has_role(Role::Cashier) {
            "/sales-outlet"
        } else if self.has_role(Role::Technician) {
            "/service-center"
        } else {
            "/unauthorized"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(roles: Vec<Role>) -> AuthUser {
        AuthUser {
            id: 1,
            name: "Jane Perera".into(),
            email: "jane@myapplecare.lk".into(),
            roles,
        }
    }

    #[test]
    fn persist_and_hydrate_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth.json");

        let mut store = AuthStore::default();
        store.set_session("tok-123".into(), user(vec![Role::Admin, Role::Cashier]));
        store.persist(&path).unwrap();

        let hydrated = AuthStore::hydrate(&path);
        assert!(hydrated.is_authenticated());
        assert_eq!(hydrated.token(), Some("tok-123"));
        assert!(hydrated.has_role(Role::Admin));
        assert!(!hydrated.has_role(Role::Technician));
    }

    #[test]
    fn missing_or_corrupt_snapshot_yields_signed_out_store() {
        let dir = tempfile::tempdir().unwrap();
        let missing = AuthStore::hydrate(&dir.path().join("nope.json"));
        assert!(!missing.is_authenticated());

        let path = dir.path().join("auth.json");
        std::fs::write(&path, "{not json").unwrap();
        let corrupt = AuthStore::hydrate(&path);
        assert!(!corrupt.is_authenticated());
    }

    #[test]
    fn clear_removes_snapshot_and_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("auth.json");

        let mut store = AuthStore::default();
        store.set_session("tok".into(), user(vec![Role::Cashier]));
        store.persist(&path).unwrap();
        assert!(path.exists());

        store.clear(&path);
        assert!(!store.is_authenticated());
        assert!(!path.exists());
    }

    #[test]
    fn default_route_follows_role_precedence() {
        let mut store = AuthStore::default();
        assert_eq!(store.default_route(), "/unauthorized");

        store.set_session("t".into(), user(vec![Role::Technician]));
        assert_eq!(store.default_route(), "/service-center");

        store.set_session("t".into(), user(vec![Role::Cashier, Role::Technician]));
        assert_eq!(store.default_route(), "/sales-outlet");

        store.set_session("t".into(), user(vec![Role::Admin, Role::Cashier]));
        assert_eq!(store.default_route(), "/dashboard");
    }

    #[test]
    fn persist_without_session_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = AuthStore::default();
        assert!(store.persist(&dir.path().join("auth.json")).is_err());
    }
}
