pub mod games;
pub mod tags;
pub mod themes;

use actix_web::{HttpResponse, web};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health)).service(
        web::scope("/api")
            .service(
                web::resource("/games")
                    .route(web::get().to(games::list))
                    .route(web::post().to(games::create)),
            )
            .service(
                web::resource("/games/{id}")
                    .route(web::get().to(games::get))
                    .route(web::put().to(games::update))
                    .route(web::delete().to(games::delete)),
            )
            .service(
                web::resource("/games/{id}/builds")
                    .route(web::delete().to(games::remove_webgl_build)),
            )
            .service(
                web::resource("/themes")
                    .route(web::get().to(themes::list))
                    .route(web::post().to(themes::create)),
            )
            .service(web::resource("/themes/{id}").route(web::delete().to(themes::delete)))
            .service(web::resource("/themes/{id}/games").route(web::get().to(themes::games)))
            .service(
                web::resource("/tags")
                    .route(web::get().to(tags::list))
                    .route(web::post().to(tags::create)),
            )
            .service(web::resource("/tags/{id}").route(web::delete().to(tags::delete)))
            .service(web::resource("/tags/{id}/games").route(web::get().to(tags::games))),
    );
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().body("OK")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use gamecatalog_core::db::Database;
    use serde_json::{Value, json};

    use super::*;
    use crate::AppState;

    fn state() -> web::Data<AppState> {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        web::Data::new(AppState::new(Arc::new(db)))
    }

    #[actix_web::test]
    async fn test_health() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_create_and_select_games() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/themes")
            .set_json(json!({ "name": "Space" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/api/tags")
            .set_json(json!({ "name": "Captions", "type": "accessibility" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/api/games")
            .set_json(json!({
                "name": "Orbit Math",
                "themes": ["Space"],
                "tags": ["Captions"],
                "webGLBuild": true,
                "builds": [{ "type": "mac", "link": "https://example.org/mac.dmg" }]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/api/games")
            .set_json(json!({ "name": "Plain Words" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::get()
            .uri("/api/games?accessibility=Captions&gameBuilds=linux,webgl&page=1")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["numPages"], 1);
        assert_eq!(body["games"][0]["name"], "Orbit Math");
        assert_eq!(body["games"][0]["themes"][0]["name"], "Space");
        assert_eq!(body["games"][0]["accessibility"][0]["name"], "Captions");
        assert_eq!(body["games"][0]["builds"][0]["type"], "mac");

        let req = test::TestRequest::get().uri("/api/games?page=2").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("not found"));

        // An accessibility tag does not resolve in the custom bucket
        let req = test::TestRequest::get()
            .uri("/api/games?tags=Captions")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_invalid_input_is_bad_request() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/games")
            .set_json(json!({ "name": "ab" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        for uri in [
            "/api/games?page=zero",
            "/api/games?gameBuilds=ps5",
            "/api/games?sort=random",
            "/api/games?theme=Space&theme=Ocean",
        ] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
        }

        let req = test::TestRequest::get().uri("/api/games/missing").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_theme_delete_removes_it_from_games() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/themes")
            .set_json(json!({ "name": "Ocean" }))
            .to_request();
        let theme: Value = test::call_and_read_body_json(&app, req).await;
        let theme_id = theme["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri("/api/games")
            .set_json(json!({ "name": "Tide Tables", "themes": [theme_id] }))
            .to_request();
        let game: Value = test::call_and_read_body_json(&app, req).await;
        let game_id = game["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri(&format!("/api/themes/{}/games", theme_id))
            .to_request();
        let ids: Vec<String> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(ids, vec![game_id.clone()]);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/themes/{}", theme_id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri(&format!("/api/games/{}", game_id))
            .to_request();
        let details: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(details["themes"], json!([]));

        let req = test::TestRequest::delete()
            .uri(&format!("/api/themes/{}", theme_id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_tags_listed_by_type_and_webgl_removal() {
        let app = test::init_service(App::new().app_data(state()).configure(configure)).await;

        for (name, tag_type) in [("Captions", "accessibility"), ("Math", "custom")] {
            let req = test::TestRequest::post()
                .uri("/api/tags")
                .set_json(json!({ "name": name, "type": tag_type }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        let req = test::TestRequest::get()
            .uri("/api/tags?type=custom")
            .to_request();
        let tags: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(tags.as_array().unwrap().len(), 1);
        assert_eq!(tags[0]["name"], "Math");

        let req = test::TestRequest::get().uri("/api/tags").to_request();
        let tags: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(tags.as_array().unwrap().len(), 2);

        let req = test::TestRequest::post()
            .uri("/api/games")
            .set_json(json!({ "name": "Browser Blocks", "webGLBuild": true }))
            .to_request();
        let game: Value = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::delete()
            .uri(&format!("/api/games/{}/builds", game["id"].as_str().unwrap()))
            .to_request();
        let game: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(game["webGLBuild"], false);
    }
}
