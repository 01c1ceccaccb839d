use axum::{
    body::Body,
    http::{
        header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
        Request, Response, StatusCode,
    },
    Router,
};
use sea_orm::{ColumnTrait, DbConn, EntityTrait, PaginatorTrait, QueryFilter};
use sea_orm_migration::MigratorTrait;
use tower::ServiceExt;

use base::setting::PoolSettings;

use fyyur::routes::{router, AppState};

const TOKEN: &str = "0123456789abcdefghijklmnopqrstuv";

/// Helper to build the application over a seeded in-memory database
async fn setup(csrf: bool) -> (Router, DbConn) {
    let db = base::database::connect("sqlite::memory:", &PoolSettings::default())
        .await
        .unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    fyyur::seed::seed(&db).await.unwrap();
    let state = AppState {
        db: db.clone(),
        csrf,
        recent_limit: 5,
    };
    (router(state, "static"), db)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn text(response: Response<axum::body::BoxBody>) -> String {
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn set_cookies(response: &Response<axum::body::BoxBody>) -> Vec<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

fn flash(response: &Response<axum::body::BoxBody>) -> Option<String> {
    set_cookies(response).into_iter().find_map(|c| {
        let value = c.strip_prefix("flash=")?.split(';').next()?.to_string();
        Some(urlencoding::decode(&value).unwrap().into_owned())
    })
}

const VENUE: &str = "name=The+Blue+Note&city=New+York&state=NY&address=131+W+3rd+St\
    &phone=212-475-8592&genres=Jazz&genres=Blues\
    &facebook_link=https%3A%2F%2Fwww.facebook.com%2Fbluenote&seeking_talent=y";

#[tokio::test]
async fn index_lists_recent_records() {
    let (app, _db) = setup(false).await;
    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = text(response).await;
    assert!(body.contains("The Musical Hop"));
    assert!(body.contains("The Wild Sax Band"));
    assert!(body.find("The Dueling Pianos Bar").unwrap() < body.find("The Musical Hop").unwrap());
}

#[tokio::test]
async fn venues_are_grouped_by_area() {
    let (app, _db) = setup(false).await;
    let response = app.oneshot(get("/venues")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = text(response).await;
    let san_francisco = body.find("San Francisco, CA").unwrap();
    let new_york = body.find("New York, NY").unwrap();
    assert!(san_francisco < new_york);
    assert_eq!(body.matches("San Francisco, CA").count(), 1);
    assert!(body.contains("3 upcoming shows"));
    assert!(body.find("Park Square Live Music").unwrap() < new_york);
}

#[tokio::test]
async fn venue_search_ignores_case() {
    let (app, _db) = setup(false).await;
    let response = app
        .clone()
        .oneshot(post("/venues/search", "search_term=hop"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = text(response).await;
    assert!(body.contains("The Musical Hop"));
    assert!(body.contains("\"hop\": 1"));

    let body = text(
        app.oneshot(post("/venues/search", "search_term=Music"))
            .await
            .unwrap(),
    )
    .await;
    assert!(body.contains("\"Music\": 2"));
}

#[tokio::test]
async fn artist_search_matches_substrings() {
    let (app, _db) = setup(false).await;
    let body = text(
        app.clone()
            .oneshot(post("/artists/search", "search_term=A"))
            .await
            .unwrap(),
    )
    .await;
    assert!(body.contains("\"A\": 3"));
    assert!(body.contains("Guns N Petals"));
    assert!(body.contains("Matt Quevedo"));

    let body = text(
        app.oneshot(post("/artists/search", "search_term=band"))
            .await
            .unwrap(),
    )
    .await;
    assert!(body.contains("\"band\": 1"));
    assert!(body.contains("The Wild Sax Band"));
}

#[tokio::test]
async fn venue_page_splits_shows() {
    let (app, db) = setup(false).await;
    let venue = entity::VenueEntity::find()
        .filter(entity::VenueColumn::Name.eq("Park Square Live Music & Coffee"))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    let response = app
        .oneshot(get(&format!("/venues/{}", venue.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = text(response).await;
    assert!(body.contains("3 Upcoming Shows"));
    assert!(body.contains("1 Past Show"));
    assert!(body.contains("Matt Quevedo"));
}

#[tokio::test]
async fn artist_page_splits_shows() {
    let (app, db) = setup(false).await;
    let artist = entity::ArtistEntity::find()
        .filter(entity::ArtistColumn::Name.eq("Guns N Petals"))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    let body = text(
        app.oneshot(get(&format!("/artists/{}", artist.id)))
            .await
            .unwrap(),
    )
    .await;
    assert!(body.contains("0 Upcoming Shows"));
    assert!(body.contains("1 Past Show"));
    assert!(body.contains("The Musical Hop"));
}

#[tokio::test]
async fn unknown_pages_are_not_found() {
    let (app, _db) = setup(false).await;
    for uri in ["/venues/999", "/artists/999", "/venues/abc", "/nowhere", "/venues/999/edit"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
        assert!(text(response).await.contains("404"));
    }
}

#[tokio::test]
async fn shows_page_lists_every_show() {
    let (app, _db) = setup(false).await;
    let body = text(app.oneshot(get("/shows")).await.unwrap()).await;
    assert_eq!(body.matches("playing at").count(), 5);
}

#[tokio::test]
async fn create_venue() {
    let (app, db) = setup(false).await;
    let response = app.oneshot(post("/venues/create", VENUE)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/");
    assert_eq!(
        flash(&response).as_deref(),
        Some("Venue \"The Blue Note\" was successfully listed!")
    );
    let venue = entity::VenueEntity::find()
        .filter(entity::VenueColumn::Name.eq("The Blue Note"))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(venue.genres.0, vec!["Jazz".to_string(), "Blues".to_string()]);
    assert!(venue.seeking_talent);
    assert_eq!(venue.website, None);
}

#[tokio::test]
async fn invalid_venue_is_not_stored() {
    let (app, db) = setup(false).await;
    let response = app
        .oneshot(post("/venues/create", "city=Boston&state=MA&address=1+Main+St"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = text(response).await;
    assert!(body.contains(r#"<div class="alert" role="alert">An error occurred.</div>"#));
    assert!(!body.contains("could not be listed."));
    assert!(body.contains("This field is required."));
    assert!(body.contains("value=\"Boston\""));
    assert_eq!(entity::VenueEntity::find().count(&db).await.unwrap(), 3);
}

#[tokio::test]
async fn unnamed_artist_gets_the_plain_error() {
    let (app, db) = setup(false).await;
    let response = app
        .oneshot(post("/artists/create", "name=+&city=Austin&state=TX&genres=Funk"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = text(response).await;
    assert!(body.contains(r#"<div class="alert" role="alert">An error occurred.</div>"#));
    assert!(!body.contains("Artist  could not be listed."));
    assert_eq!(entity::ArtistEntity::find().count(&db).await.unwrap(), 3);
}

#[tokio::test]
async fn search_matches_non_ascii_names() {
    let (app, _db) = setup(false).await;
    let response = app
        .clone()
        .oneshot(post(
            "/venues/create",
            "name=%C3%96lbar+Live&city=Berlin&state=NY&address=Oranienstra%C3%9Fe+1&genres=Folk",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    for (term, shown) in [
        ("%C3%96lbar", "\"Ölbar\": 1"),
        ("%C3%96LBAR+LIVE", "\"ÖLBAR LIVE\": 1"),
        ("%C3%96lbar+live", "\"Ölbar live\": 1"),
    ] {
        let body = text(
            app.clone()
                .oneshot(post("/venues/search", &format!("search_term={}", term)))
                .await
                .unwrap(),
        )
        .await;
        assert!(body.contains(shown), "{}", term);
        assert!(body.contains("Ölbar Live"), "{}", term);
    }
}

#[tokio::test]
async fn form_posts_need_a_form_content_type() {
    let (app, db) = setup(false).await;
    let request = Request::builder()
        .method("POST")
        .uri("/venues/create")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name":"The Blue Note"}"#))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(text(response).await.contains("415"));

    let request = Request::builder()
        .method("POST")
        .uri("/venues/search")
        .body(Body::from("search_term=hop"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(entity::VenueEntity::find().count(&db).await.unwrap(), 3);
}

#[tokio::test]
async fn create_artist_rejects_bad_links() {
    let (app, db) = setup(false).await;
    let response = app
        .clone()
        .oneshot(post(
            "/artists/create",
            "name=Nova&city=Austin&state=TX&genres=Funk&website=not-a-link",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text(response).await.contains("An error occurred. Artist Nova could not be listed."));
    assert_eq!(entity::ArtistEntity::find().count(&db).await.unwrap(), 3);

    let response = app
        .oneshot(post(
            "/artists/create",
            "name=Nova&city=Austin&state=TX&genres=Funk&website=https%3A%2F%2Fnova.example.com",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        flash(&response).as_deref(),
        Some("Artist Nova was successfully listed!")
    );
    assert_eq!(entity::ArtistEntity::find().count(&db).await.unwrap(), 4);
}

#[tokio::test]
async fn edit_venue() {
    let (app, db) = setup(false).await;
    let response = app.clone().oneshot(get("/venues/1/edit")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text(response).await.contains("value=\"The Musical Hop\""));

    let response = app.oneshot(post("/venues/1/edit", VENUE)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/venues/1");
    let venue = entity::VenueEntity::find_by_id(1).one(&db).await.unwrap().unwrap();
    assert_eq!(venue.name, "The Blue Note");
    assert_eq!(entity::VenueEntity::find().count(&db).await.unwrap(), 3);
}

#[tokio::test]
async fn edit_artist_keeps_record_on_error() {
    let (app, db) = setup(false).await;
    let response = app
        .clone()
        .oneshot(post("/artists/2/edit", "name=&city=New+York&state=NY"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text(response).await.contains("An error occurred."));
    let artist = entity::ArtistEntity::find_by_id(2).one(&db).await.unwrap().unwrap();
    assert_eq!(artist.name, "Matt Quevedo");

    let response = app
        .oneshot(post("/artists/999/edit", "name=Ghost&city=New+York&state=NY"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_venue_removes_its_shows() {
    let (app, db) = setup(false).await;
    let response = app.oneshot(delete("/venues/3")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(flash(&response).as_deref(), Some("Venue was deleted!"));
    assert_eq!(entity::VenueEntity::find().count(&db).await.unwrap(), 2);
    assert_eq!(entity::ShowEntity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn delete_missing_venue_flashes_an_error() {
    let (app, db) = setup(false).await;
    for uri in ["/venues/999", "/venues/abc"] {
        let response = app.clone().oneshot(delete(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(flash(&response).as_deref(), Some("An error occurred."));
    }
    assert_eq!(entity::VenueEntity::find().count(&db).await.unwrap(), 3);
}

#[tokio::test]
async fn create_show() {
    let (app, db) = setup(false).await;
    let response = app
        .clone()
        .oneshot(post(
            "/shows/create",
            "artist_id=1&venue_id=2&start_time=2036-01-01+20%3A00%3A00",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(flash(&response).as_deref(), Some("Show was successfully listed!"));
    assert_eq!(entity::ShowEntity::find().count(&db).await.unwrap(), 6);

    let response = app
        .oneshot(post(
            "/shows/create",
            "artist_id=999&venue_id=2&start_time=2036-01-01+20%3A00%3A00",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text(response).await.contains("An error occurred. Show could not be listed."));
    assert_eq!(entity::ShowEntity::find().count(&db).await.unwrap(), 6);
}

#[tokio::test]
async fn flash_is_shown_once() {
    let (app, _db) = setup(false).await;
    let request = Request::builder()
        .uri("/")
        .header(COOKIE, "flash=Venue%20was%20deleted%21")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert!(set_cookies(&response)
        .iter()
        .any(|c| c.starts_with("flash=;")));
    assert!(text(response).await.contains("Venue was deleted!"));
}

#[tokio::test]
async fn forms_require_a_csrf_token() {
    let (app, db) = setup(true).await;
    let response = app.clone().oneshot(get("/venues/create")).await.unwrap();
    assert!(set_cookies(&response)
        .iter()
        .any(|c| c.starts_with("csrf_token=")));

    let response = app
        .clone()
        .oneshot(post("/venues/create", VENUE))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(text(response).await.contains("CSRF"));

    let response = app.clone().oneshot(delete("/venues/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(entity::VenueEntity::find().count(&db).await.unwrap(), 3);

    let request = Request::builder()
        .method("POST")
        .uri("/venues/create")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(COOKIE, format!("csrf_token={}", TOKEN))
        .body(Body::from(format!("{}&csrf_token={}", VENUE, TOKEN)))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let request = Request::builder()
        .method("DELETE")
        .uri("/venues/1")
        .header(COOKIE, format!("csrf_token={}", TOKEN))
        .header("X-CSRFToken", TOKEN)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(flash(&response).as_deref(), Some("Venue was deleted!"));
    assert_eq!(entity::VenueEntity::find().count(&db).await.unwrap(), 3);
}
