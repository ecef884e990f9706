#[macro_use]
mod common;

use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::test;
use serde_json::Value;

use scribe_core::domain::PostStatus;
use scribe_core::pagination::PageWindow;
use scribe_core::ports::PostScope;

use common::{
    FailingMailer, bearer, context, create_post, create_scheduled_post, create_tagged_post,
    create_user,
};

#[actix_web::test]
async fn test_post_list_page_fallbacks() {
    let ctx = context();
    let author = create_user(&ctx.state, "alice").await;
    for n in 1..=4 {
        let title = format!("Post {}", n);
        create_post(
            &ctx.state,
            &author,
            &title,
            &format!("post-{}", n),
            PostStatus::Published,
        )
        .await;
    }
    let app = test_app!(ctx.state.clone());

    for uri in ["/", "/?page=abc", "/?page="] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["posts"]["number"], 1, "{}", uri);
        assert_eq!(body["posts"]["items"].as_array().unwrap().len(), 3);
        assert_eq!(body["posts"]["num_pages"], 2);
    }

    for uri in [
        "/?page=99",
        "/?page=0",
        "/?page=-3",
        "/?page=99999999999999999999",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["posts"]["number"], 2, "{}", uri);
        assert_eq!(body["posts"]["items"].as_array().unwrap().len(), 1);
        assert_eq!(body["posts"]["has_next"], false);
        assert_eq!(body["posts"]["has_previous"], true);
    }

    let req = test::TestRequest::get().uri("/?page=abc").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["page"], "abc");
}

#[actix_web::test]
async fn test_empty_listing_has_one_page() {
    let ctx = context();
    let app = test_app!(ctx.state.clone());

    let req = test::TestRequest::get().uri("/?page=5").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["posts"]["number"], 1);
    assert_eq!(body["posts"]["num_pages"], 1);
    assert_eq!(body["posts"]["total"], 0);
}

#[actix_web::test]
async fn test_unpublished_posts_stay_hidden() {
    let ctx = context();
    let author = create_user(&ctx.state, "alice").await;
    create_post(&ctx.state, &author, "Visible", "visible", PostStatus::Published).await;
    let draft = create_post(
        &ctx.state,
        &author,
        "Hidden draft",
        "hidden-draft",
        PostStatus::Draft,
    )
    .await;
    let scheduled = create_scheduled_post(&ctx.state, &author, "Hidden scheduled").await;
    let app = test_app!(ctx.state.clone());

    let req = test::TestRequest::get().uri("/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["posts"]["total"], 1);
    assert_eq!(body["posts"]["items"][0]["title"], "Visible");

    let req = test::TestRequest::get().uri(&draft.absolute_url()).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get().uri(&scheduled.absolute_url()).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get().uri("/search/?query=hidden").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["results"].as_array().unwrap().is_empty());

    let req = test::TestRequest::get()
        .uri(&format!("/{}/share/", draft.id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_post_list_by_tag() {
    let ctx = context();
    let author = create_user(&ctx.state, "alice").await;
    create_tagged_post(&ctx.state, &author, "Ownership explained", "Rust").await;
    create_tagged_post(&ctx.state, &author, "Sourdough basics", "Baking").await;
    let app = test_app!(ctx.state.clone());

    let req = test::TestRequest::get().uri("/tag.rust/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["tag"]["slug"], "rust");
    assert_eq!(body["posts"]["total"], 1);
    assert_eq!(body["posts"]["items"][0]["title"], "Ownership explained");

    let req = test::TestRequest::get().uri("/tag.unknown/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 404);
}

#[actix_web::test]
async fn test_post_detail_lookup() {
    let ctx = context();
    let author = create_user(&ctx.state, "alice").await;
    let post = create_post(&ctx.state, &author, "Hello", "hello", PostStatus::Published).await;
    let app = test_app!(ctx.state.clone());

    let req = test::TestRequest::get().uri(&post.absolute_url()).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["post"]["title"], "Hello");
    assert!(body["comments"].as_array().unwrap().is_empty());
    assert!(body["new_comment"].is_null());

    for uri in ["/2026/2/30/hello/", "/1999/1/1/hello/", "/2026/13/1/hello/"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
    }

    let wrong_slug = post.absolute_url().replace("hello", "goodbye");
    let req = test::TestRequest::get().uri(&wrong_slug).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_comment_submission() {
    let ctx = context();
    let author = create_user(&ctx.state, "alice").await;
    let post = create_post(&ctx.state, &author, "Hello", "hello", PostStatus::Published).await;
    let app = test_app!(ctx.state.clone());

    let req = test::TestRequest::post()
        .uri(&post.absolute_url())
        .set_form([("name", "Bob"), ("email", "bob@example.com"), ("body", "Nice post")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["new_comment"]["name"], "Bob");
    assert_eq!(body["new_comment"]["active"], true);
    assert_eq!(body["comments"].as_array().unwrap().len(), 1);

    let req = test::TestRequest::post()
        .uri(&post.absolute_url())
        .set_form([("name", "Eve"), ("email", "not-an-email"), ("body", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["new_comment"].is_null());
    assert!(body["errors"]["email"].is_array());
    assert!(body["errors"]["body"].is_array());
    assert_eq!(body["comment_form"]["name"], "Eve");

    let stored = ctx.state.comments.find_active_by_post(post.id).await.unwrap();
    assert_eq!(stored.len(), 1);
}

#[actix_web::test]
async fn test_search_without_query_is_empty() {
    let ctx = context();
    let author = create_user(&ctx.state, "alice").await;
    create_post(&ctx.state, &author, "Rust", "rust", PostStatus::Published).await;
    let app = test_app!(ctx.state.clone());

    let req = test::TestRequest::get().uri("/search/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["query"].is_null());
    assert!(body["results"].as_array().unwrap().is_empty());
    assert_eq!(body["errors"], serde_json::json!({}));

    let req = test::TestRequest::get().uri("/search/?query=%20%20").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["results"].as_array().unwrap().is_empty());
    assert_eq!(body["errors"]["query"][0], "This field is required.");
}

#[actix_web::test]
async fn test_search_ranks_by_title_similarity() {
    let ctx = context();
    let author = create_user(&ctx.state, "alice").await;
    create_post(
        &ctx.state,
        &author,
        "Rust programming tips",
        "rust-tips",
        PostStatus::Published,
    )
    .await;
    create_post(
        &ctx.state,
        &author,
        "Rust programming",
        "rust-programming",
        PostStatus::Published,
    )
    .await;
    create_post(&ctx.state, &author, "Cooking pasta", "cooking-pasta", PostStatus::Published).await;
    let app = test_app!(ctx.state.clone());

    let req = test::TestRequest::get()
        .uri("/search/?query=rust+programming")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["query"], "rust programming");
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["post"]["title"], "Rust programming");
    assert_eq!(results[1]["post"]["title"], "Rust programming tips");

    let scores: Vec<f64> = results
        .iter()
        .map(|r| r["similarity"].as_f64().unwrap())
        .collect();
    assert!(scores[0] > scores[1]);
    assert!(scores.iter().all(|s| *s > 0.1));
}

#[actix_web::test]
async fn test_share_sends_one_message() {
    let ctx = context();
    let author = create_user(&ctx.state, "alice").await;
    let post = create_post(&ctx.state, &author, "Hello", "hello", PostStatus::Published).await;
    let app = test_app!(ctx.state.clone());

    let uri = format!("/{}/share/", post.id);
    let req = test::TestRequest::get().uri(&uri).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["sent"], false);

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header((header::HOST, "blog.example.com"))
        .set_form([("name", "Alice"), ("to", "bob@example.com"), ("comments", "Worth it")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["sent"], true);

    let messages = ctx.mailer.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].subject, "Alice recommends you read Hello");
    assert_eq!(
        messages[0].body,
        format!(
            "Read Hello at http://blog.example.com{}\n\nAlice's comments: Worth it",
            post.absolute_url()
        )
    );
    assert_eq!(messages[0].to, vec!["bob@example.com".to_string()]);
    assert_eq!(messages[0].from, "noreply@localhost");
}

#[actix_web::test]
async fn test_share_with_invalid_recipient_sends_nothing() {
    let ctx = context();
    let author = create_user(&ctx.state, "alice").await;
    let post = create_post(&ctx.state, &author, "Hello", "hello", PostStatus::Published).await;
    let app = test_app!(ctx.state.clone());

    let req = test::TestRequest::post()
        .uri(&format!("/{}/share/", post.id))
        .set_form([("name", "Alice"), ("to", "nobody"), ("comments", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["sent"], false);
    assert!(body["errors"]["to"].is_array());
    assert!(ctx.mailer.messages().is_empty());
}

#[actix_web::test]
async fn test_share_transport_failure_is_server_error() {
    let ctx = context();
    let author = create_user(&ctx.state, "alice").await;
    let post = create_post(&ctx.state, &author, "Hello", "hello", PostStatus::Published).await;
    let app = test_app!(ctx.state.clone().with_mailer(Arc::new(FailingMailer)));

    let req = test::TestRequest::post()
        .uri(&format!("/{}/share/", post.id))
        .set_form([("name", "Alice"), ("to", "bob@example.com"), ("comments", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn test_guarded_pages_require_login() {
    let ctx = context();
    let app = test_app!(ctx.state.clone());

    let req = test::TestRequest::get().uri("/add_post/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/account/login/?next=%2Fadd_post%2F"
    );

    let req = test::TestRequest::post()
        .uri("/add_post/")
        .insert_header((header::AUTHORIZATION, "Bearer not-a-token"))
        .set_form([("title", "Hello")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_add_post_then_read_it() {
    let ctx = context();
    let author = create_user(&ctx.state, "alice").await;
    let app = test_app!(ctx.state.clone());

    let req = test::TestRequest::get()
        .uri("/add_post/")
        .insert_header(bearer(&ctx.state, &author))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["new"], false);

    let req = test::TestRequest::post()
        .uri("/add_post/")
        .insert_header(bearer(&ctx.state, &author))
        .set_form([
            ("title", "Hello"),
            ("slug", "hello"),
            ("body", "World"),
            ("status", "published"),
            ("tags", ""),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["new"], true);

    let posts = ctx
        .state
        .posts
        .list(
            PostScope::AuthoredBy(author.id),
            PageWindow { number: 1, offset: 0, limit: 10 },
        )
        .await
        .unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].author_id, author.id);

    let req = test::TestRequest::get().uri(&posts[0].absolute_url()).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["post"]["title"], "Hello");
    assert_eq!(body["post"]["body"], "World");
    assert!(body["comments"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_add_post_without_title_saves_nothing() {
    let ctx = context();
    let author = create_user(&ctx.state, "alice").await;
    let app = test_app!(ctx.state.clone());

    let req = test::TestRequest::post()
        .uri("/add_post/")
        .insert_header(bearer(&ctx.state, &author))
        .set_form([
            ("title", ""),
            ("slug", "hello"),
            ("body", "World"),
            ("status", "published"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["new"], false);
    assert_eq!(body["errors"]["title"][0], "This field is required.");
    assert_eq!(body["post_form"]["slug"], "hello");

    let count = ctx
        .state
        .posts
        .count(PostScope::AuthoredBy(author.id))
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[actix_web::test]
async fn test_add_post_creates_tags_and_rejects_same_day_slug() {
    let ctx = context();
    let author = create_user(&ctx.state, "alice").await;
    let app = test_app!(ctx.state.clone());

    let form = [
        ("title", "Tagged"),
        ("slug", "tagged"),
        ("body", "Body"),
        ("status", "published"),
        ("tags", "Rust, web"),
    ];

    let req = test::TestRequest::post()
        .uri("/add_post/")
        .insert_header(bearer(&ctx.state, &author))
        .set_form(form)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::get().uri("/tag.web/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["posts"]["total"], 1);
    assert_eq!(body["posts"]["items"][0]["tags"].as_array().unwrap().len(), 2);

    let req = test::TestRequest::post()
        .uri("/add_post/")
        .insert_header(bearer(&ctx.state, &author))
        .set_form(form)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["errors"]["slug"].is_array());
}

#[actix_web::test]
async fn test_add_post_attaches_each_tag_once() {
    let ctx = context();
    let author = create_user(&ctx.state, "alice").await;
    let app = test_app!(ctx.state.clone());

    let req = test::TestRequest::post()
        .uri("/add_post/")
        .insert_header(bearer(&ctx.state, &author))
        .set_form([
            ("title", "Case"),
            ("slug", "case"),
            ("body", "Body"),
            ("status", "published"),
            ("tags", "Rust, rust, RUST"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["post_form"]["tags"], "RUST");

    let posts = ctx
        .state
        .posts
        .list(
            PostScope::AuthoredBy(author.id),
            PageWindow {
                number: 1,
                offset: 0,
                limit: 10,
            },
        )
        .await
        .unwrap();
    assert_eq!(posts[0].tags.len(), 1);
    assert_eq!(posts[0].tags[0].slug, "rust");
}

#[actix_web::test]
async fn test_only_the_author_may_edit() {
    let ctx = context();
    let author = create_user(&ctx.state, "alice").await;
    let other = create_user(&ctx.state, "mallory").await;
    let post = create_post(&ctx.state, &author, "Hello", "hello", PostStatus::Published).await;
    let app = test_app!(ctx.state.clone());

    let req = test::TestRequest::get()
        .uri(&post.edit_url())
        .insert_header(bearer(&ctx.state, &other))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["permission"], false);
    assert_eq!(body["post_form"]["title"], "Hello");

    let edit = [
        ("title", "Defaced"),
        ("slug", "hello"),
        ("body", "Gotcha"),
        ("status", "published"),
    ];

    let req = test::TestRequest::post()
        .uri(&post.edit_url())
        .insert_header(bearer(&ctx.state, &other))
        .set_form(edit)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let stored = ctx.state.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Hello");
    assert_eq!(stored.body, "Body of Hello");

    let req = test::TestRequest::get()
        .uri(&post.edit_url())
        .insert_header(bearer(&ctx.state, &author))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["permission"], true);

    let req = test::TestRequest::post()
        .uri(&post.edit_url())
        .insert_header(bearer(&ctx.state, &author))
        .set_form([
            ("title", "Hello again"),
            ("slug", "hello"),
            ("body", "Revised"),
            ("status", "published"),
            ("tags", "news"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["new_post"], true);
    assert_eq!(body["post_form"]["title"], "Hello again");

    let stored = ctx.state.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Hello again");
    assert_eq!(stored.body, "Revised");
    assert_eq!(stored.tags.len(), 1);
    assert_eq!(stored.tags[0].slug, "news");
}

#[actix_web::test]
async fn test_edit_unknown_post_is_not_found() {
    let ctx = context();
    let author = create_user(&ctx.state, "alice").await;
    let app = test_app!(ctx.state.clone());

    let req = test::TestRequest::get()
        .uri("/edit/2026/1/1/missing/")
        .insert_header(bearer(&ctx.state, &author))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}
