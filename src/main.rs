use std::net::SocketAddr;
use tokio::net::TcpListener;

use studyhub::{build_app, cli, db};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:data/studyhub.db".to_string());

    let pool = db::init_pool(&database_url).await;

    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(String::as_str) == Some("create-user") {
        let Some(name) = args.get(2) else {
            eprintln!("usage: studyhub create-user <name> [--admin]");
            std::process::exit(1);
        };
        let admin = args.iter().any(|a| a == "--admin");
        if let Err(e) = cli::create_user(&pool, name, admin).await {
            eprintln!("Failed to create user: {e}");
            std::process::exit(1);
        }
        return;
    }

    let secure_cookies = std::env::var("SECURE_COOKIES")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let app = build_app(pool, secure_cookies).await;

    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    let listener = TcpListener::bind(addr).await.unwrap();

    tracing::info!("listening on {}", addr);
    axum::serve(listener, app).await.unwrap();
}
