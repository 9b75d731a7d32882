use actix_web::{HttpResponse, web};
use gamecatalog_core::models::{GameDetails, GameUpdate, NewGame};
use gamecatalog_core::selection::GameQuery;
use serde::Serialize;

use crate::{ApiResult, AppState};

/// One catalog page as returned to clients
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GamePage {
    games: Vec<GameDetails>,
    count: usize,
    num_pages: usize,
}

pub async fn list(
    state: web::Data<AppState>,
    params: web::Query<Vec<(String, String)>>,
) -> ApiResult<HttpResponse> {
    let query = GameQuery::from_pairs(params.into_inner())?;
    let games = state.games.clone();

    let page = web::block(move || -> gamecatalog_core::Result<GamePage> {
        let selection = games.get_selected_games(&query)?;
        let num_pages = selection.num_pages();
        Ok(GamePage {
            count: selection.count,
            num_pages,
            games: games.populate(selection.games)?,
        })
    })
    .await??;

    Ok(HttpResponse::Ok().json(page))
}

pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<NewGame>,
) -> ApiResult<HttpResponse> {
    let games = state.games.clone();
    let game = web::block(move || games.create(body.into_inner())).await??;
    Ok(HttpResponse::Created().json(game))
}

pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> ApiResult<HttpResponse> {
    let games = state.games.clone();
    let game = web::block(move || games.get_by_id(&path)).await??;
    Ok(HttpResponse::Ok().json(game))
}

pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<GameUpdate>,
) -> ApiResult<HttpResponse> {
    let games = state.games.clone();
    let game = web::block(move || games.edit(&path, body.into_inner())).await??;
    Ok(HttpResponse::Ok().json(game))
}

pub async fn delete(state: web::Data<AppState>, path: web::Path<String>) -> ApiResult<HttpResponse> {
    let games = state.games.clone();
    let game = web::block(move || games.delete(&path)).await??;
    Ok(HttpResponse::Ok().json(game))
}

/// Drops the WebGL build flag; the uploaded bundle is handled elsewhere.
pub async fn remove_webgl_build(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let games = state.games.clone();
    let game = web::block(move || games.remove_webgl_build(&path)).await??;
    Ok(HttpResponse::Ok().json(game))
}
