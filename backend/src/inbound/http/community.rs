//! Community feed handlers.
//!
//! ```text
//! GET /api/community/posts
//! POST /api/community/posts {"civicId":"...","content":"..."}
//! POST /api/community/posts/{id}/like {"civicId":"..."}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{CommunityPost, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_civic_id};

const CIVIC_ID_FIELD: FieldName = FieldName::new("civicId");

/// Post creation body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostBody {
    pub civic_id: String,
    pub content: String,
}

/// Like toggle body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToggleLikeBody {
    pub civic_id: String,
}

/// List recent community posts, newest first.
#[utoipa::path(
    get,
    path = "/api/community/posts",
    responses(
        (status = 200, description = "Posts", body = [CommunityPost]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["community"],
    operation_id = "listCommunityPosts"
)]
#[get("/community/posts")]
pub async fn list_posts(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<CommunityPost>>> {
    let posts = state.community.list_posts().await?;
    Ok(web::Json(posts))
}

/// Publish a community post.
#[utoipa::path(
    post,
    path = "/api/community/posts",
    request_body = CreatePostBody,
    responses(
        (status = 201, description = "Post published", body = CommunityPost),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["community"],
    operation_id = "createCommunityPost"
)]
#[post("/community/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    payload: web::Json<CreatePostBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let civic_id = parse_civic_id(&body.civic_id, CIVIC_ID_FIELD)?;
    let post = state.community.create_post(&civic_id, body.content).await?;
    Ok(HttpResponse::Created().json(post))
}

/// Toggle the caller's like on a post.
#[utoipa::path(
    post,
    path = "/api/community/posts/{id}/like",
    params(("id" = Uuid, Path, description = "Post identifier")),
    request_body = ToggleLikeBody,
    responses(
        (status = 200, description = "Post with updated like count", body = CommunityPost),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown user or post", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["community"],
    operation_id = "toggleCommunityPostLike"
)]
#[post("/community/posts/{id}/like")]
pub async fn toggle_like(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    payload: web::Json<ToggleLikeBody>,
) -> ApiResult<web::Json<CommunityPost>> {
    let post_id = path.into_inner();
    let civic_id = parse_civic_id(&payload.into_inner().civic_id, CIVIC_ID_FIELD)?;
    let post = state.community.toggle_like(post_id, &civic_id).await?;
    Ok(web::Json(post))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use crate::inbound::http::test_utils::{fixture_state, seed_user, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use serde_json::{Value, json};

    #[actix_web::test]
    async fn create_then_list_round_trips() {
        let (state, backend) = fixture_state();
        seed_user(&backend, "civic-1", &[UserRole::Founder]);
        let app = actix_test::init_service(test_app(state)).await;

        let create = actix_test::TestRequest::post()
            .uri("/api/community/posts")
            .set_json(json!({ "civicId": "civic-1", "content": "Shipped our MVP today." }))
            .to_request();
        let response = actix_test::call_service(&app, create).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let list = actix_test::TestRequest::get()
            .uri("/api/community/posts")
            .to_request();
        let response = actix_test::call_service(&app, list).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        let posts = body.as_array().expect("post array");
        assert_eq!(posts.len(), 1);
        assert_eq!(
            posts[0].get("likeCount").and_then(Value::as_u64),
            Some(0)
        );
    }

    #[actix_web::test]
    async fn toggling_twice_returns_to_the_original_count() {
        let (state, backend) = fixture_state();
        seed_user(&backend, "civic-1", &[UserRole::Founder]);
        seed_user(&backend, "civic-2", &[UserRole::Investor]);
        let app = actix_test::init_service(test_app(state)).await;

        let create = actix_test::TestRequest::post()
            .uri("/api/community/posts")
            .set_json(json!({ "civicId": "civic-1", "content": "Shipped our MVP today." }))
            .to_request();
        let response = actix_test::call_service(&app, create).await;
        let post: Value = actix_test::read_body_json(response).await;
        let post_id = post.get("id").and_then(Value::as_str).expect("post id");

        let like = |id: &str| {
            actix_test::TestRequest::post()
                .uri(&format!("/api/community/posts/{id}/like"))
                .set_json(json!({ "civicId": "civic-2" }))
                .to_request()
        };

        let response = actix_test::call_service(&app, like(post_id)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let liked: Value = actix_test::read_body_json(response).await;
        assert_eq!(liked.get("likeCount").and_then(Value::as_u64), Some(1));

        let response = actix_test::call_service(&app, like(post_id)).await;
        let unliked: Value = actix_test::read_body_json(response).await;
        assert_eq!(unliked.get("likeCount").and_then(Value::as_u64), Some(0));
    }

    #[actix_web::test]
    async fn liking_a_missing_post_is_not_found() {
        let (state, backend) = fixture_state();
        seed_user(&backend, "civic-1", &[UserRole::Founder]);
        let app = actix_test::init_service(test_app(state)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!(
                    "/api/community/posts/{}/like",
                    uuid::Uuid::new_v4()
                ))
                .set_json(json!({ "civicId": "civic-1" }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
