//! Login service implementation

use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::future::BridgeFuture;
use crate::service::LoginService;

/// A session issued for an accepted login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_name: String,
    pub issued_at: DateTime<Utc>,
}

/// Checks credentials off the calling thread and records accepted sessions.
pub struct Authenticator {
    sessions: Mutex<Vec<Session>>,
}

impl Authenticator {
    pub fn new() -> Self {
        Authenticator {
            sessions: Mutex::new(Vec::new()),
        }
    }

    /// Sessions issued so far
    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    fn accept(&self, user_name: &str) {
        self.sessions.lock().unwrap().push(Session {
            user_name: user_name.to_string(),
            issued_at: Utc::now(),
        });
    }

    fn check(user_name: &str, password: &str) -> i32 {
        if user_name.is_empty() || password.is_empty() {
            401
        } else {
            200
        }
    }
}

impl Default for Authenticator {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginService for Authenticator {
    fn login(&self, user_name: &str, password: &str) -> BridgeFuture<i32> {
        let status = Self::check(user_name, password);
        if status == 200 {
            self.accept(user_name);
        } else {
            log::debug!("rejected login for {user_name:?}");
        }

        let user_name = user_name.to_string();
        BridgeFuture::spawn(async move {
            // Stand-in for the real credential backend round-trip.
            tokio::time::sleep(Duration::from_millis(10)).await;
            log::debug!("login for {user_name:?} resolved with status {status}");
            Ok(status)
        })
    }
}
