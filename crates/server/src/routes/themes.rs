use actix_web::{HttpResponse, web};
use gamecatalog_core::models::NewTheme;

use crate::{ApiResult, AppState};

pub async fn list(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let themes = state.themes.clone();
    let all = web::block(move || themes.get_all()).await??;
    Ok(HttpResponse::Ok().json(all))
}

pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<NewTheme>,
) -> ApiResult<HttpResponse> {
    let themes = state.themes.clone();
    let theme = web::block(move || themes.create(body.into_inner())).await??;
    Ok(HttpResponse::Created().json(theme))
}

pub async fn delete(state: web::Data<AppState>, path: web::Path<String>) -> ApiResult<HttpResponse> {
    let themes = state.themes.clone();
    let theme = web::block(move || themes.delete(&path)).await??;
    Ok(HttpResponse::Ok().json(theme))
}

/// Ids of the games filed under the theme
pub async fn games(state: web::Data<AppState>, path: web::Path<String>) -> ApiResult<HttpResponse> {
    let themes = state.themes.clone();
    let ids = web::block(move || themes.get_games(&path)).await??;
    Ok(HttpResponse::Ok().json(ids))
}
