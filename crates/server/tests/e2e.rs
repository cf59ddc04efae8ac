use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use service::recipe::repository::mock::InMemoryRecipeRepository;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes;
use server::state::ServerState;

fn cors() -> CorsLayer { CorsLayer::very_permissive() }

struct TestApp {
    base_url: String,
}

async fn spawn(app: Router) -> anyhow::Result<TestApp> {
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });
    Ok(TestApp { base_url })
}

async fn start_in_memory(media_root: &str) -> anyhow::Result<TestApp> {
    let state = ServerState::with_repository(Arc::new(InMemoryRecipeRepository::new()), &configs::CacheConfig::default());
    spawn(routes::build_router(state, cors(), media_root)).await
}

/// Server over PostgreSQL; `None` when the database is not available.
async fn start_with_db() -> Option<TestApp> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return None; }
    let mut cfg = configs::DatabaseConfig::default();
    cfg.normalize_from_env();
    cfg.connect_timeout_secs = 5;
    let db = match models::db::connect_with_config(&cfg).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("database unavailable; skip e2e db test: {}", e);
            return None;
        }
    };
    models::db::run_migrations(&db).await.ok()?;
    let state = ServerState::from_db(db, &configs::CacheConfig::default());
    let media = std::env::temp_dir().join("recipe-e2e-media");
    spawn(routes::build_router(state, cors(), &media.to_string_lossy())).await.ok()
}

#[tokio::test]
async fn e2e_health_and_crud_over_http() -> anyhow::Result<()> {
    let media = std::env::temp_dir().join(format!("recipe-e2e-{}", Uuid::new_v4()));
    let app = start_in_memory(&media.to_string_lossy()).await?;
    let c = reqwest::Client::new();

    let res = c.get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = c.post(format!("{}/recipes/", app.base_url))
        .json(&json!({"recipe_name": "Tomato Soup", "recipe_description": "A warm classic soup", "recipe_type": "VEG"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let body = res.json::<serde_json::Value>().await?;
    let id = body["data"]["recipe_id"].as_str().unwrap().to_string();

    let res = c.delete(format!("{}/recipes/{}/", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let res = c.get(format!("{}/recipes/{}/", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_media_files_are_served() -> anyhow::Result<()> {
    let media = std::env::temp_dir().join(format!("recipe-e2e-{}", Uuid::new_v4()));
    tokio::fs::create_dir_all(media.join("recipes")).await?;
    tokio::fs::write(media.join("recipes/soup.txt"), b"soup").await?;
    let app = start_in_memory(&media.to_string_lossy()).await?;

    let res = reqwest::get(format!("{}/media/recipes/soup.txt", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.text().await?, "soup");

    tokio::fs::remove_dir_all(&media).await?;
    Ok(())
}

#[tokio::test]
async fn e2e_postgres_slug_suffixing_and_soft_delete() -> anyhow::Result<()> {
    let Some(app) = start_with_db().await else { return Ok(()); };
    let c = reqwest::Client::new();

    let name = format!("E2E Stew {}", Uuid::new_v4().simple());
    let payload = json!({"recipe_name": name, "recipe_description": "Slow cooked and hearty", "recipe_type": "NON_VEG", "ingredients": ["beef", "carrot"]});

    let first = c.post(format!("{}/recipes/", app.base_url)).json(&payload).send().await?;
    assert_eq!(first.status(), HttpStatusCode::CREATED);
    let first = first.json::<serde_json::Value>().await?;
    let second = c.post(format!("{}/recipes/", app.base_url)).json(&payload).send().await?
        .json::<serde_json::Value>().await?;
    let base = first["data"]["recipe_slug"].as_str().unwrap().to_string();
    assert_eq!(second["data"]["recipe_slug"], format!("{base}-1"));
    assert_eq!(first["data"]["ingredients"].as_array().unwrap().len(), 2);

    let id = first["data"]["recipe_id"].as_str().unwrap();
    let res = c.delete(format!("{}/recipes/{}/", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let list = c.get(format!("{}/recipes/", app.base_url))
        .query(&[("search", name.as_str())])
        .send().await?
        .json::<serde_json::Value>().await?;
    assert_eq!(list["count"], 1);
    assert_eq!(list["data"][0]["recipe_id"], second["data"]["recipe_id"]);
    Ok(())
}
