//! Single-use upload target issuance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::config::UploadConfig;

/// Destination handed to the transfer layer for exactly one binary deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadTarget {
    pub upload_url: String,
    pub token: Uuid,
    pub issued_at: DateTime<Utc>,
    /// Advisory only; the transfer layer decides whether to honour it.
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct UploadTargetIssuer {
    base_url: String,
    ttl: chrono::Duration,
}

impl UploadTargetIssuer {
    pub fn new(base_url: impl Into<String>, ttl: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);

        Self { base_url, ttl }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(config.base_url.clone(), config.target_ttl())
    }

    /// Issues a fresh target. Touches no store and needs no identity.
    pub fn issue(&self) -> UploadTarget {
        let token = Uuid::new_v4();
        let issued_at = Utc::now();
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        UploadTarget {
            upload_url: format!("{}/{}", self.base_url, token),
            token,
            issued_at,
            expires_at,
        }
    }
}

impl Default for UploadTargetIssuer {
    fn default() -> Self {
        Self::from_config(&UploadConfig::default())
    }
}
