//! Read-only JSON resource over published posts.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use scribe_core::DomainError;
use scribe_core::ports::PostScope;
use scribe_shared::ApiResponse;
use scribe_shared::views::PostView;

use super::{PageQuery, paginate};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts/?page=
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = paginate(
        &state,
        PostScope::Published { tag_id: None },
        query.page.as_deref(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(page)))
}

/// GET /api/posts/{id}/
pub async fn get_post(
    state: web::Data<AppState>,
    post_id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .find_published(*post_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Post", *post_id))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostView::from(post))))
}
