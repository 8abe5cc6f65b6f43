//! Blog post records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::ValidationError;

/// Longest accepted title, counted in characters after trimming
pub const TITLE_MAX_LEN: usize = 100;

/// A stored blog post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Title and content that passed validation, ready for a store write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostInput {
    title: String,
    content: String,
}

impl PostInput {
    /// Validate raw title and content
    ///
    /// The title is trimmed and must be non-empty and at most
    /// [`TITLE_MAX_LEN`] characters. Content must contain something other
    /// than whitespace but is stored as given.
    pub fn new(title: &str, content: &str) -> Result<Self, ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::new("title", "Title is required"));
        }
        if title.chars().count() > TITLE_MAX_LEN {
            return Err(ValidationError::new(
                "title",
                format!("Title cannot be more than {} characters", TITLE_MAX_LEN),
            ));
        }
        if content.trim().is_empty() {
            return Err(ValidationError::new("content", "Content is required"));
        }
        Ok(Self {
            title: title.to_string(),
            content: content.to_string(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Build a fresh post with a new id and both timestamps set to `now`
    pub fn into_post(self, now: DateTime<Utc>) -> Post {
        Post {
            id: Uuid::new_v4(),
            title: self.title,
            content: self.content,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_trimmed() {
        let input = PostInput::new("  Hi  ", "World").unwrap();
        assert_eq!(input.title(), "Hi");
        assert_eq!(input.content(), "World");
    }

    #[test]
    fn test_missing_fields() {
        assert_eq!(PostInput::new("", "World").unwrap_err().field(), "title");
        assert_eq!(PostInput::new("Hi", "  \n").unwrap_err().field(), "content");
    }

    #[test]
    fn test_title_limit_counts_characters() {
        let title = "é".repeat(TITLE_MAX_LEN);
        assert!(PostInput::new(&title, "body").is_ok());
        let title = "é".repeat(TITLE_MAX_LEN + 1);
        assert!(PostInput::new(&title, "body").is_err());
    }

    #[test]
    fn test_into_post_sets_timestamps() {
        let now = Utc::now();
        let post = PostInput::new("Hi", "World").unwrap().into_post(now);
        assert_eq!(post.created_at, now);
        assert_eq!(post.updated_at, now);
        assert_eq!(post.title, "Hi");
    }
}
