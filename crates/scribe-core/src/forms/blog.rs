//! Blog forms: posts, comments, sharing and search.

use serde::{Deserialize, Serialize};

use super::{FieldErrors, REQUIRED, email, max_length, required};
use crate::domain::{Post, PostStatus};
use crate::text::{is_valid_slug, slugify};

const TITLE_MAX: usize = 250;
const SLUG_MAX: usize = 250;
const COMMENT_NAME_MAX: usize = 80;
const SHARE_NAME_MAX: usize = 25;

/// Create/edit submission for a post. `tags` is a comma-separated list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostForm {
    pub title: String,
    pub slug: String,
    pub body: String,
    pub status: String,
    pub tags: String,
}

/// A validated post submission.
#[derive(Debug, Clone, PartialEq)]
pub struct PostDraft {
    pub title: String,
    pub slug: String,
    pub body: String,
    pub status: PostStatus,
    pub tags: Vec<String>,
}

impl PostForm {
    /// Form prefilled from an existing post.
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            slug: post.slug.clone(),
            body: post.body.clone(),
            status: post.status.to_string(),
            tags: post
                .tags
                .iter()
                .map(|t| t.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    pub fn validate(&self) -> Result<PostDraft, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = required(&mut errors, "title", &self.title);
        max_length(&mut errors, "title", &title, TITLE_MAX);

        let slug = required(&mut errors, "slug", &self.slug);
        if !slug.is_empty() {
            max_length(&mut errors, "slug", &slug, SLUG_MAX);
            if !is_valid_slug(&slug) {
                errors.add(
                    "slug",
                    "Enter a valid \u{201c}slug\u{201d} consisting of letters, numbers, underscores or hyphens.",
                );
            }
        }

        let body = required(&mut errors, "body", &self.body);

        let status = required(&mut errors, "status", &self.status);
        let status = if status.is_empty() {
            PostStatus::Draft
        } else {
            status.parse().unwrap_or_else(|message: String| {
                errors.add("status", message);
                PostStatus::Draft
            })
        };

        let tags = parse_tags(&self.tags);
        if tags.iter().any(|t| slugify(t).is_empty()) {
            errors.add("tags", "Tags must contain at least one letter or digit.");
        }

        errors.into_result(PostDraft {
            title,
            slug,
            body,
            status,
            tags,
        })
    }
}

/// Split a tag list on commas, or on whitespace when it has no comma.
/// Labels are trimmed and sorted by slug; labels sharing a slug name the
/// same tag, so only the first of them is kept.
pub fn parse_tags(input: &str) -> Vec<String> {
    let labels: Vec<&str> = if input.contains(',') {
        input.split(',').collect()
    } else {
        input.split_whitespace().collect()
    };

    let mut tags: Vec<String> = labels
        .into_iter()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    tags.sort_by_cached_key(|t| (slugify(t), t.clone()));
    tags.dedup_by_key(|t| slugify(t));
    tags
}

/// Comment submission from the post detail page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentForm {
    pub name: String,
    pub email: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub name: String,
    pub email: String,
    pub body: String,
}

impl CommentForm {
    pub fn validate(&self) -> Result<NewComment, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = required(&mut errors, "name", &self.name);
        max_length(&mut errors, "name", &name, COMMENT_NAME_MAX);
        let email_address = required(&mut errors, "email", &self.email);
        email(&mut errors, "email", &email_address);
        let body = required(&mut errors, "body", &self.body);

        errors.into_result(NewComment {
            name,
            email: email_address,
            body,
        })
    }
}

/// "Recommend this post" submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareForm {
    pub name: String,
    pub to: String,
    pub comments: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShareRequest {
    pub name: String,
    pub to: String,
    pub comments: String,
}

impl ShareForm {
    pub fn validate(&self) -> Result<ShareRequest, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = required(&mut errors, "name", &self.name);
        max_length(&mut errors, "name", &name, SHARE_NAME_MAX);
        let to = required(&mut errors, "to", &self.to);
        email(&mut errors, "to", &to);

        errors.into_result(ShareRequest {
            name,
            to,
            comments: self.comments.trim().to_string(),
        })
    }
}

impl ShareRequest {
    pub fn subject(&self, post: &Post) -> String {
        format!("{} recommends you read {}", self.name, post.title)
    }

    pub fn body(&self, post: &Post, post_url: &str) -> String {
        format!(
            "Read {} at {}\n\n{}'s comments: {}",
            post.title, post_url, self.name, self.comments
        )
    }
}

/// Search query string. `query` is `None` when the parameter is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchForm {
    pub query: Option<String>,
}

impl SearchForm {
    /// `Ok(None)` when no search was submitted, `Ok(Some(q))` for a usable
    /// query, and an error on `query` when it was submitted blank.
    pub fn validate(&self) -> Result<Option<String>, FieldErrors> {
        match self.query.as_deref().map(str::trim) {
            None => Ok(None),
            Some("") => Err(FieldErrors::single("query", REQUIRED)),
            Some(query) => Ok(Some(query.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn post_form() -> PostForm {
        PostForm {
            title: "Hello".to_string(),
            slug: "hello".to_string(),
            body: "World".to_string(),
            status: "published".to_string(),
            tags: String::new(),
        }
    }

    #[test]
    fn test_valid_post_form() {
        let draft = post_form().validate().unwrap();
        assert_eq!(draft.status, PostStatus::Published);
        assert!(draft.tags.is_empty());
    }

    #[test]
    fn test_missing_title_is_reported() {
        let mut form = post_form();
        form.title = String::new();

        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("title"), [REQUIRED]);
        assert!(!errors.contains("slug"));
    }

    #[test]
    fn test_bad_slug_and_status() {
        let mut form = post_form();
        form.slug = "hello world".to_string();
        form.status = "archived".to_string();

        let errors = form.validate().unwrap_err();
        assert!(errors.contains("slug"));
        assert!(errors.contains("status"));
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags("rust, web ,rust"), vec!["rust", "web"]);
        assert_eq!(parse_tags("rust web"), vec!["rust", "web"]);
        assert_eq!(parse_tags("async rust, web"), vec!["async rust", "web"]);
        assert!(parse_tags("  ").is_empty());
    }

    #[test]
    fn test_parse_tags_merges_labels_with_one_slug() {
        assert_eq!(parse_tags("rust, Web, Rust"), vec!["Rust", "Web"]);
        assert_eq!(parse_tags("Async Rust, async-rust"), vec!["Async Rust"]);
    }

    #[test]
    fn test_tags_without_slug_are_rejected() {
        let mut form = post_form();
        form.tags = "rust, ???".to_string();
        assert!(form.validate().unwrap_err().contains("tags"));
    }

    #[test]
    fn test_form_from_post_round_trips_fields() {
        let mut post = Post::new(
            Uuid::new_v4(),
            "Title".to_string(),
            "title".to_string(),
            "Body".to_string(),
            PostStatus::Draft,
        );
        post.tags = vec![crate::domain::Tag::new("rust"), crate::domain::Tag::new("web")];

        let form = PostForm::from_post(&post);
        assert_eq!(form.status, "draft");
        assert_eq!(form.tags, "rust, web");
    }

    #[test]
    fn test_comment_form() {
        let errors = CommentForm {
            name: "Bob".to_string(),
            email: "bob".to_string(),
            body: String::new(),
        }
        .validate()
        .unwrap_err();

        assert!(errors.contains("email"));
        assert!(errors.contains("body"));
        assert!(!errors.contains("name"));
    }

    #[test]
    fn test_share_message_composition() {
        let post = Post::new(
            Uuid::new_v4(),
            "Ownership".to_string(),
            "ownership".to_string(),
            "...".to_string(),
            PostStatus::Published,
        );
        let request = ShareForm {
            name: "Ann".to_string(),
            to: "friend@example.com".to_string(),
            comments: "Worth it".to_string(),
        }
        .validate()
        .unwrap();

        assert_eq!(request.subject(&post), "Ann recommends you read Ownership");
        assert_eq!(
            request.body(&post, "http://localhost/x/"),
            "Read Ownership at http://localhost/x/\n\nAnn's comments: Worth it"
        );
    }

    #[test]
    fn test_share_requires_recipient() {
        let errors = ShareForm {
            name: "Ann".to_string(),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.get("to"), [REQUIRED]);
    }

    #[test]
    fn test_search_form() {
        assert_eq!(SearchForm::default().validate(), Ok(None));
        assert!(
            SearchForm {
                query: Some("  ".to_string())
            }
            .validate()
            .is_err()
        );
        assert_eq!(
            SearchForm {
                query: Some(" rust ".to_string())
            }
            .validate(),
            Ok(Some("rust".to_string()))
        );
    }
}
