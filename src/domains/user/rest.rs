use axum::{
  extract::{
    rejection::{JsonRejection, QueryRejection},
    Json, Path, Query, State,
  },
  http::StatusCode,
  response::Json as JsonResponse,
  routing::get,
  Router,
};
use validator::Validate;

use super::model::{ListOptions, User, UserList, UserRequest};
use crate::{state::SharedAppState, AppError};

pub fn user_routes() -> Router<SharedAppState> {
  Router::new()
    .route("/v1/users", get(list_users_handler).post(create_user_handler))
    .route(
      "/v1/users/{id}",
      get(get_user_handler).put(update_user_handler).delete(delete_user_handler),
    )
}

fn validated(payload: Result<Json<UserRequest>, JsonRejection>) -> Result<UserRequest, AppError> {
  let Json(payload) = payload?;
  payload
    .validate()
    .map_err(|e| AppError::bad_request("validation_failed", format!("Validation failed: {}", e)))?;
  Ok(payload)
}

pub async fn list_users_handler(
  State(state): State<SharedAppState>,
  query: Result<Query<ListOptions>, QueryRejection>,
) -> Result<JsonResponse<UserList>, AppError> {
  let Query(mut opts) = query?;
  opts.apply_cursor()?;

  let mut list = state.user_service.list(&opts).await?;
  list.attach_cursors(&opts);

  Ok(JsonResponse(list))
}

pub async fn create_user_handler(
  State(state): State<SharedAppState>,
  payload: Result<Json<UserRequest>, JsonRejection>,
) -> Result<(StatusCode, JsonResponse<User>), AppError> {
  let payload = validated(payload)?;
  let user = state.user_service.save(payload.into()).await?;

  Ok((StatusCode::CREATED, JsonResponse(user)))
}

pub async fn get_user_handler(
  State(state): State<SharedAppState>,
  Path(id): Path<String>,
) -> Result<JsonResponse<User>, AppError> {
  state.user_service.get(&id).await.map(JsonResponse).map_err(Into::into)
}

pub async fn update_user_handler(
  State(state): State<SharedAppState>,
  Path(id): Path<String>,
  payload: Result<Json<UserRequest>, JsonRejection>,
) -> Result<JsonResponse<User>, AppError> {
  let payload = validated(payload)?;

  state
    .user_service
    .update(&id, payload.into())
    .await
    .map(JsonResponse)
    .map_err(Into::into)
}

pub async fn delete_user_handler(
  State(state): State<SharedAppState>,
  Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
  state.user_service.delete(&id).await?;
  Ok(StatusCode::OK)
}
