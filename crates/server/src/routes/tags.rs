use actix_web::{HttpResponse, web};
use gamecatalog_core::models::{NewTag, TagType};
use serde::Deserialize;

use crate::{ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct TagListQuery {
    #[serde(rename = "type")]
    tag_type: Option<TagType>,
}

pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<TagListQuery>,
) -> ApiResult<HttpResponse> {
    let tags = state.tags.clone();
    let tag_type = query.into_inner().tag_type;

    let found = web::block(move || match tag_type {
        Some(tag_type) => tags.get_by_type(tag_type),
        None => tags.get_all(),
    })
    .await??;

    Ok(HttpResponse::Ok().json(found))
}

pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<NewTag>,
) -> ApiResult<HttpResponse> {
    let tags = state.tags.clone();
    let tag = web::block(move || tags.create(body.into_inner())).await??;
    Ok(HttpResponse::Created().json(tag))
}

pub async fn delete(state: web::Data<AppState>, path: web::Path<String>) -> ApiResult<HttpResponse> {
    let tags = state.tags.clone();
    let tag = web::block(move || tags.delete(&path)).await??;
    Ok(HttpResponse::Ok().json(tag))
}

pub async fn games(state: web::Data<AppState>, path: web::Path<String>) -> ApiResult<HttpResponse> {
    let tags = state.tags.clone();
    let ids = web::block(move || tags.get_games(&path)).await??;
    Ok(HttpResponse::Ok().json(ids))
}
