//! Admin sign-in against the configured credential pair

use crate::config::AdminCredentials;
use crate::core::error::{AuthError, StorefrontResult};
use crate::entities::catalog::Session;
use crate::storage::Repository;
use chrono::Utc;
use std::sync::Arc;

#[derive(Clone)]
pub struct AdminService {
    session: Repository<Option<Session>>,
    credentials: Arc<AdminCredentials>,
}

impl AdminService {
    pub fn new(session: Repository<Option<Session>>, credentials: Arc<AdminCredentials>) -> Self {
        Self {
            session,
            credentials,
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> StorefrontResult<Session> {
        let username = username.trim();
        if username != self.credentials.username || password != self.credentials.password {
            tracing::warn!(username, "Rejected admin login");
            return Err(AuthError::InvalidCredentials.into());
        }

        let session = Session {
            username: username.to_string(),
            is_admin: true,
            signed_in_at: Utc::now(),
        };
        self.session.write(&Some(session.clone())).await?;
        tracing::info!(username, "Admin signed in");
        Ok(session)
    }

    pub async fn logout(&self) -> StorefrontResult<()> {
        self.session.clear().await
    }

    pub async fn current_session(&self) -> Option<Session> {
        self.session.read().await
    }

    pub async fn is_admin(&self) -> bool {
        self.current_session().await.is_some_and(|s| s.is_admin)
    }
}
