//! Checks configuration and document-store connectivity before deploying.

use materiales_service::infra::config::{Settings, StoreBackend};
use materiales_service::infra::telemetry;
use materiales_service::routing::HOME_ROUTE;
use materiales_service::storage::document::open_store;
use materiales_service::{MaterialService, RouteTable};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--list]\n\
         \n\
         Reads configuration from the environment (or .env):\n\
           STORE_BACKEND=firestore|postgres|memory (default firestore)\n\
           API_KEY, PROJECT_ID (firestore; VITE_ prefix also accepted)\n\
           DATABASE_URL (postgres)\n\
           BASE_URL, LISTEN_ADDR, LOG_LEVEL, LOG_FORMAT\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let list = args.iter().any(|a| a == "--list");

    let settings = Settings::from_env()?;
    telemetry::init_tracing(&settings.log_level, settings.log_format)?;

    println!("> Preflight:");
    match &settings.store {
        StoreBackend::Firestore(cfg) => {
            println!("  STORE_BACKEND=firestore");
            println!("  PROJECT_ID={}", cfg.project_id);
            println!("  API_KEY={}", cfg.masked_api_key());
            println!("  FIRESTORE_ENDPOINT={}", cfg.endpoint);
        }
        other => println!("  STORE_BACKEND={}", other.kind()),
    }
    println!("  BASE_URL={}", settings.base_url);
    println!("  LISTEN_ADDR={}", settings.listen_addr);

    let routes = RouteTable::standard();
    routes.validate()?;
    println!("  route table: {} route(s), valid", routes.routes().len());
    println!("  home route: {}", routes.href_for(&settings.base_url, HOME_ROUTE)?);

    let store = open_store(&settings.store).await?;
    let materials = MaterialService::new(store);
    materials.ping().await?;
    println!("  Store reachable: collection `{}`", materials.collection());

    if list {
        let records = materials.list().await?;
        println!("  {} material(s):", records.len());
        for record in records {
            println!("    {}", record.to_json());
        }
    }

    println!("> Preflight OK.");
    Ok(())
}
