//! Wire types exchanged with the token backend.
//!
//! Listing responses deserialize into [`TokenSummary`], which has no secret
//! field: a `token` key sent alongside a listed item is dropped on the floor.
//! The plaintext value only ever arrives inside an [`IssuedToken`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

// ── Secret ──────────────────────────────────────────────────────────────────

/// Plaintext token value returned once at creation time.
///
/// Redacted in `Debug`, wiped from memory on drop, and deliberately not
/// `Serialize` so it cannot end up in a config file or a log record.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);

impl TokenSecret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw value, for display in the reveal dialog and for the clipboard.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenSecret([REDACTED])")
    }
}

impl Drop for TokenSecret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

// ── Users ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub name: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserSummary {
    /// `"{first} {last}"`, falling back to the login name when both are blank.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.name.clone()
        } else {
            full.to_string()
        }
    }

    /// Up to two uppercase initials for the avatar badge.
    pub fn initials(&self) -> String {
        let from_parts: String = [&self.first_name, &self.last_name]
            .iter()
            .filter_map(|part| part.trim().chars().next())
            .flat_map(char::to_uppercase)
            .collect();
        if !from_parts.is_empty() {
            return from_parts;
        }
        self.name
            .trim()
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_else(|| "?".to_string())
    }
}

// ── Tokens ──────────────────────────────────────────────────────────────────

/// Non-secret metadata describing an issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSummary {
    pub uid: String,
    pub name: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub last_used_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expired_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_expired: bool,
    #[serde(default)]
    pub user: Option<UserSummary>,
}

impl TokenSummary {
    pub fn scopes_label(&self) -> String {
        self.scopes.join(", ")
    }
}

/// Creation response: the summary plus the one-time secret.
#[derive(Debug, Clone, Deserialize)]
pub struct IssuedToken {
    #[serde(flatten)]
    pub summary: TokenSummary,
    pub token: TokenSecret,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateTokenRequest {
    pub name: String,
    pub description: String,
    pub scopes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired_at: Option<DateTime<Utc>>,
}

impl CreateTokenRequest {
    pub fn new(name: impl Into<String>, scopes: Vec<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            scopes,
            expired_at: None,
        }
    }
}

// ── Pagination ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    pub start: u32,
    pub count: u32,
}

impl PageQuery {
    /// Query for a 1-based page number. Page 0 is treated as page 1.
    pub fn for_page(page: u32, page_size: u32) -> Self {
        Self {
            start: page.max(1).saturating_sub(1).saturating_mul(page_size),
            count: page_size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPage {
    #[serde(default)]
    pub items: Vec<TokenSummary>,
    #[serde(default)]
    pub start: u32,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub total: u32,
}

impl TokenPage {
    /// Footer text such as `"21-40 of 57"`; `"0 of 0"` when empty.
    pub fn range_label(&self) -> String {
        if self.items.is_empty() {
            return format!("0 of {}", self.total);
        }
        let first = u64::from(self.start) + 1;
        let last = self.end();
        format!("{first}-{last} of {}", self.total)
    }

    pub fn has_next(&self) -> bool {
        self.end() < u64::from(self.total)
    }

    /// One past the last item's offset. Widened since `start` comes off the wire.
    fn end(&self) -> u64 {
        u64::from(self.start) + self.items.len() as u64
    }

    pub fn has_prev(&self) -> bool {
        self.start > 0
    }
}
