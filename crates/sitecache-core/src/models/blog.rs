//! Blog model - one locally cached replica of a remote site

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::{AccountId, RemoteId};
use crate::util::{canonical_endpoint, normalize_text_option};

/// A unique identifier for a cached blog, using UUID v7 (time-sortable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlogId(Uuid);

impl BlogId {
    /// Create a new unique blog ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for BlogId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BlogId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Identity shared by every cached copy of the same remote site.
///
/// Two blogs of one account with equal keys are duplicates. Self-hosted
/// sites have no remote id and are identified by their endpoint alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EquivalenceKey {
    pub remote_id: Option<RemoteId>,
    pub endpoint: Option<String>,
}

impl EquivalenceKey {
    /// False when there is nothing to match other blogs against
    pub const fn is_identifiable(&self) -> bool {
        self.remote_id.is_some() || self.endpoint.is_some()
    }
}

/// A locally cached copy of a remote site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blog {
    /// Local identifier
    pub id: BlogId,
    /// Owning account
    pub account_id: AccountId,
    /// Site id assigned by the remote service, if hosted there
    pub remote_id: Option<RemoteId>,
    /// XML-RPC endpoint URL
    pub xmlrpc: Option<String>,
    /// Public site URL
    pub url: Option<String>,
    /// Site title
    pub name: Option<String>,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
}

impl Blog {
    /// Create a new blog cached for the given account
    #[must_use]
    pub fn new(account_id: AccountId) -> Self {
        Self {
            id: BlogId::new(),
            account_id,
            remote_id: None,
            xmlrpc: None,
            url: None,
            name: None,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    #[must_use]
    pub const fn with_remote_id(mut self, remote_id: RemoteId) -> Self {
        self.remote_id = Some(remote_id);
        self
    }

    #[must_use]
    pub fn with_xmlrpc(mut self, xmlrpc: impl Into<String>) -> Self {
        self.xmlrpc = normalize_text_option(Some(xmlrpc.into()));
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = normalize_text_option(Some(url.into()));
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = normalize_text_option(Some(name.into()));
        self
    }

    /// Key used to detect duplicate copies of the same remote site
    #[must_use]
    pub fn equivalence_key(&self) -> EquivalenceKey {
        EquivalenceKey {
            remote_id: self.remote_id,
            endpoint: self.xmlrpc.as_deref().and_then(canonical_endpoint),
        }
    }

    /// Short label for logs and CLI output
    #[must_use]
    pub fn label(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.url.clone())
            .or_else(|| self.xmlrpc.clone())
            .unwrap_or_else(|| self.id.as_str())
    }
}
