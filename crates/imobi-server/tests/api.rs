//! End-to-end tests of the assembled application against an in-memory
//! database, an in-memory listing store and a canned listing API

use std::sync::Arc;

use actix_web::{App, http::StatusCode, test};
use async_trait::async_trait;
use config::Config;
use imobi_auth::service::{token, user};
use imobi_listing::{
    Listing, ListingSource, ListingStore, MemoryListingStore, Pesquisa, SearchPage,
};
use imobi_server::{
    middleware::{rate_limit::RateLimiterState, session::SessionAuth},
    model::{AppState, Configuration},
    startup::configure_app,
};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::{Map, Value, json};

const SECRET: &str = "dGVzdC1zZWNyZXQtdGVzdC1zZWNyZXQtdGVzdC1zZWNyZXQ=";

struct CannedSource {
    listings: Vec<Listing>,
}

#[async_trait]
impl ListingSource for CannedSource {
    async fn search(&self, _pesquisa: &Pesquisa) -> anyhow::Result<SearchPage> {
        Ok(SearchPage {
            listings: self.listings.clone(),
            total: self.listings.len() as u64,
            paginas: 1,
            pagina: 1,
            quantidade: self.listings.len() as u32,
        })
    }

    async fn detail(&self, code: &str) -> anyhow::Result<Option<Listing>> {
        Ok(self.listings.iter().find(|l| l.codigo == code).cloned())
    }

    async fn content(&self, _field: &str, _filter: Map<String, Value>) -> anyhow::Result<Vec<String>> {
        Ok(vec!["Apartamento".to_string(), "Casa".to_string()])
    }
}

fn listing(code: &str, venda: f64) -> Listing {
    Listing {
        codigo: code.to_string(),
        cidade: Some("Porto Alegre".to_string()),
        bairro: Some("Centro".to_string()),
        finalidade: Some("RESIDENCIAL".to_string()),
        categoria: Some("Apartamento".to_string()),
        status: Some("VENDA".to_string()),
        valor_venda: Some(venda),
        dormitorios: Some(2),
        ..Default::default()
    }
}

async fn memory_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await.unwrap();
    imobi_persistence::create_schema(&db).await.unwrap();
    db
}

fn configuration() -> Configuration {
    let config = Config::builder()
        .set_override("session.secret", SECRET)
        .unwrap()
        .set_override("site.base_url", "https://imobi.test")
        .unwrap()
        .set_override("cloudinary.api_secret", "abcd")
        .unwrap()
        .set_override("rate_limit.leads.max_requests", 2)
        .unwrap()
        .build()
        .unwrap();
    Configuration::from_config(config)
}

struct Fixture {
    state: AppState,
    store: Arc<MemoryListingStore>,
    limiter: Arc<RateLimiterState>,
}

async fn fixture(source_listings: Vec<Listing>) -> Fixture {
    let configuration = configuration();
    let limiter = Arc::new(RateLimiterState::new(configuration.rate_limit_config()));
    let store = Arc::new(MemoryListingStore::new());
    let state = AppState::new(
        configuration,
        memory_db().await,
        store.clone(),
        Arc::new(CannedSource {
            listings: source_listings,
        }),
    );

    Fixture {
        state,
        store,
        limiter,
    }
}

macro_rules! app {
    ($fixture: expr) => {{
        let state = $fixture.state.clone();
        let limiter = $fixture.limiter.clone();
        test::init_service(
            App::new()
                .wrap(SessionAuth)
                .configure(move |cfg| configure_app(cfg, state, limiter)),
        )
        .await
    }};
}

fn bearer() -> (&'static str, String) {
    let token = token::encode_session_token("admin", SECRET, 3600).unwrap();
    ("Authorization", format!("Bearer {}", token))
}

#[actix_web::test]
async fn test_health_probes() {
    let fixture = fixture(vec![]).await;
    let app = app!(fixture);

    let req = test::TestRequest::get().uri("/health/liveness").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "UP");

    let req = test::TestRequest::get().uri("/health/readiness").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["database"], "UP");
    assert_eq!(body["store"], "UP");
}

#[actix_web::test]
async fn test_listing_falls_back_to_source_and_is_stored() {
    let fixture = fixture(vec![listing("101", 300_000.0)]).await;
    let app = app!(fixture);
    assert!(fixture.store.is_empty());

    let req = test::TestRequest::get().uri("/api/vista/imoveis/101").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["Codigo"], "101");
    assert!(fixture.store.find_listing("101").await.unwrap().is_some());

    let req = test::TestRequest::get().uri("/api/vista/imoveis/999").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"], "listing 999 not found");
}

#[actix_web::test]
async fn test_similar_listings() {
    let fixture = fixture(vec![]).await;
    for l in [
        listing("1", 200_000.0),
        listing("2", 210_000.0),
        listing("3", 180_000.0),
        listing("4", 400_000.0),
    ] {
        fixture.store.upsert_listing(&l).await.unwrap();
    }
    let app = app!(fixture);

    let req = test::TestRequest::get()
        .uri("/api/vista/imoveis/1/semelhante")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let codes: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["Codigo"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["2", "3"]);

    let req = test::TestRequest::get()
        .uri("/api/vista/imoveis/1/semelhante?modalidade=permuta")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_sync_requires_admin() {
    let fixture = fixture(vec![listing("1", 100_000.0), listing("2", 150_000.0)]).await;
    let app = app!(fixture);

    let req = test::TestRequest::post().uri("/api/vista/imoveis").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/vista/imoveis")
        .insert_header(bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["listings"], 2);
    assert_eq!(body["data"]["upserted"], 2);
    assert_eq!(fixture.store.len(), 2);

    let req = test::TestRequest::post()
        .uri("/api/vista/categorias")
        .insert_header(bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["venda"], json!(["Apartamento", "Casa"]));

    let req = test::TestRequest::get().uri("/api/vista/categorias").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["aluguel"], json!(["Apartamento", "Casa"]));
}

#[actix_web::test]
async fn test_login_sets_session_cookie() {
    let fixture = fixture(vec![]).await;
    user::create(&fixture.state.database_connection, "admin", "s3cret-pass")
        .await
        .unwrap();
    let app = app!(fixture);

    let req = test::TestRequest::post()
        .uri("/admin/login")
        .set_json(json!({"username": "admin", "password": "wrong"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/admin/login")
        .set_json(json!({"username": "admin", "password": "s3cret-pass"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == "session")
        .unwrap()
        .into_owned();
    assert!(cookie.http_only().unwrap_or(false));

    let req = test::TestRequest::get()
        .uri("/admin/session")
        .cookie(cookie.clone())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"], "admin");

    let req = test::TestRequest::get()
        .uri("/admin/api/banners")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_lead_submission_is_rate_limited() {
    let fixture = fixture(vec![]).await;
    let app = app!(fixture);
    let lead = json!({
        "nome": "Maria",
        "email": "maria@example.com",
        "telefone": "(51) 99999-0000"
    });

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/formularios/whatsapp")
            .set_json(lead.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::post()
        .uri("/api/formularios/whatsapp")
        .set_json(lead)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(resp.headers().contains_key("retry-after"));
}

#[actix_web::test]
async fn test_html_lead_form_redirects_back() {
    let fixture = fixture(vec![]).await;
    let app = app!(fixture);

    let req = test::TestRequest::post()
        .uri("/api/formularios/contato")
        .set_form([
            ("nome", "João"),
            ("email", "joao@example.com"),
            ("telefone", "51999990000"),
            ("mensagem", "Gostaria de mais informações"),
            ("url", "/imovel/101"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get("location").unwrap(), "/imovel/101?enviado=1");
}

#[actix_web::test]
async fn test_cloudinary_signing_requires_admin() {
    let fixture = fixture(vec![]).await;
    let app = app!(fixture);
    let payload = json!({"paramsToSign": {"timestamp": 1315060510, "public_id": "sample"}});

    let req = test::TestRequest::post()
        .uri("/api/sign-cloudinary-params")
        .set_json(payload.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/sign-cloudinary-params")
        .insert_header(bearer())
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["signature"].as_str().unwrap().len(), 40);
}

#[actix_web::test]
async fn test_public_pages() {
    let fixture = fixture(vec![listing("101", 350_000.0)]).await;
    let app = app!(fixture);

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "text/html; charset=utf-8"
    );

    let req = test::TestRequest::get().uri("/busca?acao=comprar").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(html.contains("/imovel/101"));
    assert!(html.contains("R$ 350.000,00"));

    let req = test::TestRequest::get().uri("/imovel/101?enviado=1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    for uri in ["/imovel/999", "/pagina/nada", "/nao-existe"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
    }

    let req = test::TestRequest::get().uri("/api/nao-existe").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"], "route /api/nao-existe not found");
}
