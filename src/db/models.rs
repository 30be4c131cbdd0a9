use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub created: String,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
}

impl Post {
    /// Display form of the SQLite timestamp; falls back to the raw value
    /// if a row holds something unexpected.
    pub fn created_display(&self) -> String {
        NaiveDateTime::parse_from_str(&self.created, "%Y-%m-%d %H:%M:%S")
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|_| self.created.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
}
