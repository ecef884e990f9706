//! View contexts - one struct per rendered page.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use scribe_core::domain::{Comment, Post, PostStatus, Tag, User};
use scribe_core::forms::{
    CommentForm, FieldErrors, PostForm, ProfileEditForm, RegistrationForm, SearchForm, ShareForm,
    UserEditForm,
};
use scribe_core::pagination::Page;

/// A post as shown in listings and on its detail page.
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub author_id: Uuid,
    pub body: String,
    pub status: PostStatus,
    pub publish: DateTime<Utc>,
    pub tags: Vec<Tag>,
    pub url: String,
}

impl From<Post> for PostView {
    fn from(post: Post) -> Self {
        let url = post.absolute_url();
        Self {
            id: post.id,
            title: post.title,
            slug: post.slug,
            author_id: post.author_id,
            body: post.body,
            status: post.status,
            publish: post.publish,
            tags: post.tags,
            url,
        }
    }
}

/// Public view of a user.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
        }
    }
}

/// `blog/post/list`
#[derive(Debug, Serialize)]
pub struct PostListView {
    pub posts: Page<PostView>,
    /// The raw `page` parameter as received.
    pub page: Option<String>,
    pub tag: Option<Tag>,
}

/// `blog/post/detail`
#[derive(Debug, Serialize)]
pub struct PostDetailView {
    pub post: PostView,
    pub comments: Vec<Comment>,
    pub new_comment: Option<Comment>,
    pub comment_form: CommentForm,
    pub errors: FieldErrors,
}

/// `blog/post/share`
#[derive(Debug, Serialize)]
pub struct PostShareView {
    pub post: PostView,
    pub form: ShareForm,
    pub sent: bool,
    pub errors: FieldErrors,
}

#[derive(Debug, Serialize)]
pub struct SearchResult {
    pub post: PostView,
    pub similarity: f32,
}

/// `blog/post/search`
#[derive(Debug, Serialize)]
pub struct PostSearchView {
    pub form: SearchForm,
    pub query: Option<String>,
    pub results: Vec<SearchResult>,
    pub errors: FieldErrors,
}

/// `blog/post/add_post`
#[derive(Debug, Serialize)]
pub struct AddPostView {
    pub post_form: PostForm,
    pub new: bool,
    pub errors: FieldErrors,
}

/// `blog/post/post_edit`
#[derive(Debug, Serialize)]
pub struct PostEditView {
    pub post_form: PostForm,
    pub permission: bool,
    pub new_post: bool,
    pub errors: FieldErrors,
}

/// `account/dashboard`
#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub section: &'static str,
    pub posts: Page<PostView>,
    pub page: Option<String>,
    pub total: u64,
}

/// `account/register`
#[derive(Debug, Serialize)]
pub struct RegisterView {
    pub user_form: RegistrationForm,
    pub errors: FieldErrors,
}

/// `account/register_done`
#[derive(Debug, Serialize)]
pub struct RegisterDoneView {
    pub new_user: UserView,
}

/// `account/edit`
#[derive(Debug, Serialize)]
pub struct AccountEditView {
    pub user_form: UserEditForm,
    pub profile_form: ProfileEditForm,
    pub user_errors: FieldErrors,
    pub profile_errors: FieldErrors,
}

/// Response to a successful sign-in.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}
