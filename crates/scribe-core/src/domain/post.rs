use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Tag;

/// Publication state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            other => Err(format!(
                "Select a valid choice. {} is not one of the available choices.",
                other
            )),
        }
    }
}

/// Post entity - a blog article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub status: PostStatus,
    pub publish: DateTime<Utc>,
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post published (or scheduled) as of now.
    pub fn new(
        author_id: Uuid,
        title: String,
        slug: String,
        body: String,
        status: PostStatus,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            slug,
            body,
            status,
            publish: now,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether readers may see this post at `now`.
    pub fn is_published_at(&self, now: DateTime<Utc>) -> bool {
        self.status == PostStatus::Published && self.publish <= now
    }

    pub fn publish_date(&self) -> PublishDate {
        PublishDate(self.publish.date_naive())
    }

    /// Canonical path of the detail page, e.g. `/2026/3/14/hello/`.
    pub fn absolute_url(&self) -> String {
        format!("{}{}/", self.publish_date().path_prefix(), self.slug)
    }

    /// Path of the edit page for this post.
    pub fn edit_url(&self) -> String {
        format!("/edit{}", self.absolute_url())
    }
}

/// Calendar day (UTC) a post was published on - half of its public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishDate(pub NaiveDate);

impl PublishDate {
    /// Build from URL components; `None` when the date does not exist.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Half-open `[start, end)` UTC range covering the day.
    pub fn bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = self.0.and_time(NaiveTime::MIN).and_utc();
        (start, start + TimeDelta::days(1))
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant.date_naive() == self.0
    }

    fn path_prefix(&self) -> String {
        format!("/{}/{}/{}/", self.0.year(), self.0.month(), self.0.day())
    }
}
