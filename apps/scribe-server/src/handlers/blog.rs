//! Blog pages: listing, detail with comments, sharing, search and
//! author-only post editing.

use actix_web::{HttpRequest, HttpResponse, http::StatusCode, web};
use chrono::Utc;
use uuid::Uuid;

use scribe_core::DomainError;
use scribe_core::domain::{Comment, Post, Tag};
use scribe_core::forms::{CommentForm, FieldErrors, PostDraft, PostForm, SearchForm, ShareForm};
use scribe_core::ports::{EmailMessage, PostScope};
use scribe_shared::views::{
    AddPostView, PostDetailView, PostEditView, PostListView, PostSearchView, PostShareView,
    SearchResult,
};

use super::{PageQuery, PostPath, paginate, published_post};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Minimum title similarity for a search hit.
pub const SEARCH_THRESHOLD: f32 = 0.1;

const SLUG_NOT_UNIQUE: &str = "Slug must be unique for Publish date.";

/// GET /
pub async fn post_list(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    render_post_list(&state, None, query.into_inner().page).await
}

/// GET /tag.{tag_slug}/
pub async fn post_list_by_tag(
    state: web::Data<AppState>,
    tag_slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let tag = state
        .tags
        .find_by_slug(&tag_slug)
        .await?
        .ok_or_else(|| DomainError::not_found("Tag", tag_slug.as_str()))?;

    render_post_list(&state, Some(tag), query.into_inner().page).await
}

async fn render_post_list(
    state: &AppState,
    tag: Option<Tag>,
    page: Option<String>,
) -> AppResult<HttpResponse> {
    let scope = PostScope::Published {
        tag_id: tag.as_ref().map(|t| t.id),
    };
    let posts = paginate(state, scope, page.as_deref()).await?;

    Ok(HttpResponse::Ok().json(PostListView { posts, page, tag }))
}

/// GET /{year}/{month}/{day}/{slug}/
pub async fn post_detail(
    state: web::Data<AppState>,
    path: web::Path<PostPath>,
) -> AppResult<HttpResponse> {
    let post = published_post(&state, &path).await?;
    let comments = state.comments.find_active_by_post(post.id).await?;

    Ok(HttpResponse::Ok().json(PostDetailView {
        post: post.into(),
        comments,
        new_comment: None,
        comment_form: CommentForm::default(),
        errors: FieldErrors::new(),
    }))
}

/// POST /{year}/{month}/{day}/{slug}/
pub async fn post_comment(
    state: web::Data<AppState>,
    path: web::Path<PostPath>,
    form: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    let post = published_post(&state, &path).await?;
    let form = form.into_inner();

    let (new_comment, comment_form, errors) = match form.validate() {
        Ok(input) => {
            let comment = Comment::new(post.id, input.name, input.email, input.body);
            let saved = state.comments.save(comment).await?;
            tracing::info!(post_id = %post.id, comment_id = %saved.id, "Comment added");
            (Some(saved), CommentForm::default(), FieldErrors::new())
        }
        Err(errors) => (None, form, errors),
    };

    let status = if new_comment.is_some() {
        StatusCode::CREATED
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    let comments = state.comments.find_active_by_post(post.id).await?;

    Ok(HttpResponse::build(status).json(PostDetailView {
        post: post.into(),
        comments,
        new_comment,
        comment_form,
        errors,
    }))
}

/// GET /{id}/share/
pub async fn post_share_form(
    state: web::Data<AppState>,
    post_id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = shared_post(&state, *post_id).await?;

    Ok(HttpResponse::Ok().json(PostShareView {
        post: post.into(),
        form: ShareForm::default(),
        sent: false,
        errors: FieldErrors::new(),
    }))
}

/// POST /{id}/share/
pub async fn post_share(
    req: HttpRequest,
    state: web::Data<AppState>,
    post_id: web::Path<Uuid>,
    form: web::Form<ShareForm>,
) -> AppResult<HttpResponse> {
    let post = shared_post(&state, *post_id).await?;
    let form = form.into_inner();

    let share = match form.validate() {
        Ok(share) => share,
        Err(errors) => {
            return Ok(HttpResponse::UnprocessableEntity().json(PostShareView {
                post: post.into(),
                form,
                sent: false,
                errors,
            }));
        }
    };

    let post_url = {
        let conn = req.connection_info();
        format!("{}://{}{}", conn.scheme(), conn.host(), post.absolute_url())
    };

    state
        .mailer
        .send(EmailMessage {
            subject: share.subject(&post),
            body: share.body(&post, &post_url),
            from: state.blog.mail_from.clone(),
            to: vec![share.to],
        })
        .await?;
    tracing::info!(post_id = %post.id, "Post recommendation sent");

    Ok(HttpResponse::Ok().json(PostShareView {
        post: post.into(),
        form,
        sent: true,
        errors: FieldErrors::new(),
    }))
}

async fn shared_post(state: &AppState, post_id: Uuid) -> AppResult<Post> {
    let post = state
        .posts
        .find_published(post_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Post", post_id))?;
    Ok(post)
}

/// GET /search/?query=
pub async fn post_search(
    state: web::Data<AppState>,
    form: web::Query<SearchForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();

    let (query, results, errors) = match form.validate() {
        Ok(Some(query)) => {
            let hits = state
                .posts
                .search_published(&query, SEARCH_THRESHOLD)
                .await?;
            tracing::debug!(query = %query, hits = hits.len(), "Post search");

            let results = hits
                .into_iter()
                .map(|hit| SearchResult {
                    post: hit.post.into(),
                    similarity: hit.similarity,
                })
                .collect();
            (Some(query), results, FieldErrors::new())
        }
        Ok(None) => (None, Vec::new(), FieldErrors::new()),
        Err(errors) => (None, Vec::new(), errors),
    };

    Ok(HttpResponse::Ok().json(PostSearchView {
        form,
        query,
        results,
        errors,
    }))
}

/// GET /add_post/
pub async fn add_post_form(_identity: Identity) -> HttpResponse {
    HttpResponse::Ok().json(AddPostView {
        post_form: PostForm::default(),
        new: false,
        errors: FieldErrors::new(),
    })
}

/// POST /add_post/
pub async fn add_post(
    identity: Identity,
    state: web::Data<AppState>,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let invalid = |post_form: PostForm, errors: FieldErrors| {
        HttpResponse::UnprocessableEntity().json(AddPostView {
            post_form,
            new: false,
            errors,
        })
    };

    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(errors) => return Ok(invalid(form, errors)),
    };

    let mut post = Post::new(
        identity.user_id,
        draft.title,
        draft.slug,
        draft.body,
        draft.status,
    );
    if state
        .posts
        .slug_taken(post.publish_date(), &post.slug, None)
        .await?
    {
        return Ok(invalid(form, FieldErrors::single("slug", SLUG_NOT_UNIQUE)));
    }

    post.tags = resolve_tags(&state, &draft.tags).await?;
    let post = state.posts.save(post).await?;
    tracing::info!(post_id = %post.id, author = %identity.username, "Post created");

    Ok(HttpResponse::Created().json(AddPostView {
        post_form: PostForm::from_post(&post),
        new: true,
        errors: FieldErrors::new(),
    }))
}

/// GET /edit/{year}/{month}/{day}/{slug}/
pub async fn post_edit_form(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<PostPath>,
) -> AppResult<HttpResponse> {
    let post = published_post(&state, &path).await?;

    Ok(HttpResponse::Ok().json(PostEditView {
        post_form: PostForm::from_post(&post),
        permission: post.author_id == identity.user_id,
        new_post: false,
        errors: FieldErrors::new(),
    }))
}

/// POST /edit/{year}/{month}/{day}/{slug}/
///
/// Only the author may save; anyone else gets 403 and the post is untouched.
pub async fn post_edit(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<PostPath>,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let mut post = published_post(&state, &path).await?;
    if post.author_id != identity.user_id {
        tracing::warn!(
            post_id = %post.id,
            user = %identity.username,
            "Edit refused for non-author"
        );
        return Err(DomainError::Forbidden("post").into());
    }

    let form = form.into_inner();
    let invalid = |post_form: PostForm, errors: FieldErrors| {
        HttpResponse::UnprocessableEntity().json(PostEditView {
            post_form,
            permission: true,
            new_post: false,
            errors,
        })
    };

    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(errors) => return Ok(invalid(form, errors)),
    };

    if draft.slug != post.slug
        && state
            .posts
            .slug_taken(post.publish_date(), &draft.slug, Some(post.id))
            .await?
    {
        return Ok(invalid(form, FieldErrors::single("slug", SLUG_NOT_UNIQUE)));
    }

    let tags = resolve_tags(&state, &draft.tags).await?;
    apply_draft(&mut post, draft, tags);
    let post = state.posts.save(post).await?;
    tracing::info!(post_id = %post.id, "Post updated");

    Ok(HttpResponse::Ok().json(PostEditView {
        post_form: PostForm::from_post(&post),
        permission: true,
        new_post: true,
        errors: FieldErrors::new(),
    }))
}

fn apply_draft(post: &mut Post, draft: PostDraft, tags: Vec<Tag>) {
    post.title = draft.title;
    post.slug = draft.slug;
    post.body = draft.body;
    post.status = draft.status;
    post.tags = tags;
    post.updated_at = Utc::now();
}

/// Look up each label, creating the tags that do not exist yet. Labels that
/// resolve to the same tag are attached once.
async fn resolve_tags(state: &AppState, labels: &[String]) -> AppResult<Vec<Tag>> {
    let mut tags: Vec<Tag> = Vec::with_capacity(labels.len());
    for label in labels {
        let tag = state.tags.get_or_create(label).await?;
        if !tags.iter().any(|t| t.id == tag.id) {
            tags.push(tag);
        }
    }
    Ok(tags)
}

