//! HTTP handlers and route configuration.

mod account;
mod api;
mod blog;
mod health;

use actix_web::web;
use serde::Deserialize;

use scribe_core::DomainError;
use scribe_core::domain::{Post, PublishDate};
use scribe_core::pagination::{Page, Paginator};
use scribe_core::ports::PostScope;
use scribe_shared::views::PostView;

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health/", web::get().to(health::health_check))
        .service(
            web::scope("/account")
                .route("/", web::get().to(account::dashboard))
                .service(
                    web::resource("/register/")
                        .route(web::get().to(account::register_form))
                        .route(web::post().to(account::register)),
                )
                .route("/login/", web::post().to(account::login))
                .service(
                    web::resource("/edit/")
                        .route(web::get().to(account::edit_form))
                        .route(web::post().to(account::edit)),
                ),
        )
        .service(
            web::scope("/api")
                .route("/posts/", web::get().to(api::list_posts))
                .route("/posts/{id}/", web::get().to(api::get_post)),
        )
        .route("/", web::get().to(blog::post_list))
        .route("/tag.{tag_slug}/", web::get().to(blog::post_list_by_tag))
        .route("/search/", web::get().to(blog::post_search))
        .service(
            web::resource("/add_post/")
                .route(web::get().to(blog::add_post_form))
                .route(web::post().to(blog::add_post)),
        )
        .service(
            web::resource(r"/edit/{year:\d+}/{month:\d+}/{day:\d+}/{slug}/")
                .route(web::get().to(blog::post_edit_form))
                .route(web::post().to(blog::post_edit)),
        )
        .service(
            web::resource(r"/{year:\d+}/{month:\d+}/{day:\d+}/{slug}/")
                .route(web::get().to(blog::post_detail))
                .route(web::post().to(blog::post_comment)),
        )
        .service(
            web::resource("/{id}/share/")
                .route(web::get().to(blog::post_share_form))
                .route(web::post().to(blog::post_share)),
        );
}

/// `?page=` as received; resolved by [`Paginator::resolve`].
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// Count, slice and wrap the posts in `scope`.
async fn paginate(
    state: &AppState,
    scope: PostScope,
    raw: Option<&str>,
) -> AppResult<Page<PostView>> {
    let total = state.posts.count(scope).await?;
    let paginator = Paginator::new(state.blog.posts_per_page, total);
    let window = paginator.window(paginator.resolve(raw));

    let posts = state.posts.list(scope, window).await?;
    Ok(paginator.page(window, posts).map(PostView::from))
}

/// Date-and-slug path of a post page.
#[derive(Debug, Deserialize)]
pub struct PostPath {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub slug: String,
}

/// The published post addressed by `path`.
async fn published_post(state: &AppState, path: &PostPath) -> AppResult<Post> {
    let not_found = || DomainError::not_found("Post", &path.slug);

    let date = PublishDate::from_ymd(path.year, path.month, path.day).ok_or_else(not_found)?;
    let post = state
        .posts
        .find_published_by_date(date, &path.slug)
        .await?
        .ok_or_else(not_found)?;

    Ok(post)
}
