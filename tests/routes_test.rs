use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{COOKIE, LOCATION, SET_COOKIE};
use reqwest::redirect::Policy;
use reqwest::StatusCode;

use safeko::admin::AdminGate;
use safeko::config::Config;
use safeko::db::blob_store::MemoryBlobStore;
use safeko::planner::{
    Activity, ItineraryDay, PlanRequest, PlanResponse, Planner, PlannerError, GENERATION_FAILED,
};
use safeko::routes;
use safeko::state::AppState;

/// Answers every destination except "Nowhere" with a one-day plan.
struct StubPlanner;

#[async_trait]
impl Planner for StubPlanner {
    async fn generate(&self, request: &PlanRequest) -> Result<PlanResponse, PlannerError> {
        if request.destination == "Nowhere" {
            return Err(PlannerError::EmptyResponse);
        }
        Ok(PlanResponse {
            summary: format!("Trip to {}", request.destination),
            estimated_cost: "$500".to_string(),
            itinerary: vec![ItineraryDay {
                day: 1,
                title: "Arrival".to_string(),
                activities: vec![Activity {
                    time: "09:00".to_string(),
                    activity: "Palace walk".to_string(),
                    description: "Gyeongbokgung at opening time".to_string(),
                }],
            }],
        })
    }
}

async fn spawn_app() -> String {
    spawn_app_with(Config::default()).await
}

async fn spawn_app_with(config: Config) -> String {
    let gate = AdminGate::with_cost("admin123", 4).unwrap();
    let state = AppState::new(
        config,
        Arc::new(MemoryBlobStore::default()),
        Arc::new(StubPlanner),
        gate,
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, routes::app(state)).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(Policy::none())
        .build()
        .unwrap()
}

/// `name=value` from the first Set-Cookie header.
fn cookie_pair(response: &reqwest::Response) -> String {
    let raw = response
        .headers()
        .get(SET_COOKIE)
        .expect("Set-Cookie header")
        .to_str()
        .unwrap();
    raw.split(';').next().unwrap().to_string()
}

async fn admin_login(client: &reqwest::Client, base: &str) -> String {
    let response = client
        .post(format!("{}/admin/login", base))
        .form(&[("password", "admin123")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/admin");
    cookie_pair(&response)
}

async fn post_as(
    client: &reqwest::Client,
    base: &str,
    cookie: &str,
    path: &str,
    form: &[(&str, &str)],
) -> reqwest::Response {
    client
        .post(format!("{}{}", base, path))
        .header(COOKIE, cookie)
        .form(form)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn home_page_shows_seeded_catalog() {
    let base = spawn_app().await;
    let response = client().get(&base).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.text().await.unwrap();
    assert!(body.contains("Nami Island"));
    assert!(body.contains("K-Beauty Facial"));
    assert!(body.contains("/category/dmz"));
}

#[tokio::test]
async fn category_page_filters_by_id() {
    let base = spawn_app().await;
    let client = client();

    let body = client
        .get(format!("{}/category/dmz", base))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("DMZ Tour"));
    assert!(!body.contains("Everland"));

    let body = client
        .get(format!("{}/category/unknown", base))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("Unknown"));
    assert!(body.contains("No tours found in this category yet."));
}

#[tokio::test]
async fn product_page_renders_document_and_unknown_ids_go_home() {
    let base = spawn_app().await;
    let client = client();

    let response = client.get(format!("{}/product/1", base)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("Tour Highlights"));
    assert!(body.contains("Check Availability"));

    let response = client
        .get(format!("{}/product/does-not-exist", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/");
}

#[tokio::test]
async fn admin_actions_without_a_session_go_to_login() {
    let base = spawn_app().await;
    let response = client()
        .post(format!("{}/admin/products/new", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/admin");
}

#[tokio::test]
async fn expired_admin_session_lands_on_login_form() {
    let mut config = Config::default();
    config.admin.session_minutes = 0;
    let base = spawn_app_with(config).await;
    let client = client();
    let cookie = admin_login(&client, &base).await;

    let response = post_as(&client, &base, &cookie, "/admin/editor/save", &[]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/admin");

    let response = client
        .get(format!("{}/admin", base))
        .header(COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("name=\"password\""));
}

#[tokio::test]
async fn wrong_admin_password_is_rejected() {
    let base = spawn_app().await;
    let response = client()
        .post(format!("{}/admin/login", base))
        .form(&[("password", "letmein")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(SET_COOKIE).is_none());
    assert!(response.text().await.unwrap().contains("Incorrect password"));
}

#[tokio::test]
async fn new_package_is_saved_and_listed() {
    let base = spawn_app().await;
    let client = client();
    let cookie = admin_login(&client, &base).await;

    let response = post_as(&client, &base, &cookie, "/admin/products/new", &[]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let body = client
        .get(format!("{}/admin", base))
        .header(COOKIE, &cookie)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("Create New Package"));

    let response = post_as(
        &client,
        &base,
        &cookie,
        "/admin/editor/basic",
        &[
            ("title", "Busan Night Market Walk"),
            ("location", "Busan"),
            ("price", "80"),
            ("rating", "4.5"),
            ("reviews", "12"),
            ("discount", ""),
            ("category", "nightlife"),
            ("description", "Street food after dark"),
            ("image_url", "https://picsum.photos/800/600"),
            ("tags", "Food, Night"),
            ("then", "save"),
        ],
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let body = client
        .get(format!("{}/category/nightlife", base))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("Busan Night Market Walk"));
}

#[tokio::test]
async fn non_numeric_price_is_a_validation_error() {
    let base = spawn_app().await;
    let client = client();
    let cookie = admin_login(&client, &base).await;
    post_as(&client, &base, &cookie, "/admin/products/new", &[]).await;

    let response = post_as(
        &client,
        &base,
        &cookie,
        "/admin/editor/basic",
        &[
            ("title", "Broken"),
            ("price", "cheap"),
            ("rating", "4"),
            ("reviews", "0"),
        ],
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.text().await.unwrap();
    assert!(body.contains("Price must be a number"));
    // The title typed in the same submit is still there
    assert!(body.contains("value=\"Broken\""));
}

#[tokio::test]
async fn preview_disables_booking() {
    let base = spawn_app().await;
    let client = client();
    let cookie = admin_login(&client, &base).await;

    post_as(&client, &base, &cookie, "/admin/products/1/edit", &[]).await;
    let response = post_as(&client, &base, &cookie, "/admin/editor/preview", &[]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let body = client
        .get(format!("{}/admin", base))
        .header(COOKIE, &cookie)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("Booking Disabled (Preview)"));
    assert!(body.contains("Tour Highlights"));
}

#[tokio::test]
async fn planner_renders_generated_itinerary() {
    let base = spawn_app().await;
    let response = client()
        .post(format!("{}/planner", base))
        .form(&[
            ("destination", "Jeju"),
            ("duration", "3 Days"),
            ("style", "Foodie"),
            ("budget", "Medium"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.text().await.unwrap();
    assert!(body.contains("Trip to Jeju"));
    assert!(body.contains("Palace walk"));
}

#[tokio::test]
async fn planner_failure_shows_generic_message() {
    let base = spawn_app().await;
    let response = client()
        .post(format!("{}/planner", base))
        .form(&[
            ("destination", "Nowhere"),
            ("duration", "1 Day"),
            ("style", "Relaxed"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(response.text().await.unwrap().contains(GENERATION_FAILED));
}
