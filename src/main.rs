use std::sync::Mutex;

use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use config::Config;
use dotenvy::dotenv;

use pushkind_configurator::builder::BuildRepository;
use pushkind_configurator::db::{establish_connection_pool, run_migrations};
use pushkind_configurator::models::config::ServerConfig;
use pushkind_configurator::repository::{DieselRepository, StaticCatalog};
use pushkind_configurator::routes::configure;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let server_config = match Config::builder()
        .add_source(config::File::with_name("config/default").required(false))
        .add_source(config::Environment::with_prefix("APP").separator("__"))
        .build()
        .and_then(|settings| settings.try_deserialize::<ServerConfig>())
    {
        Ok(server_config) => server_config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_migrations(&pool) {
        log::error!("Failed to run database migrations: {e}");
        std::process::exit(1);
    }

    let catalog = match &server_config.catalog_path {
        Some(path) => StaticCatalog::from_path(path),
        None => StaticCatalog::bundled(),
    };
    let catalog = match catalog {
        Ok(catalog) => catalog,
        Err(e) => {
            log::error!("Failed to load product catalog: {e}");
            std::process::exit(1);
        }
    };
    log::info!("Loaded {} catalog products", catalog.products().len());

    let mut builds = BuildRepository::new(DieselRepository::new(pool));
    builds.initialize();

    let builds = web::Data::new(Mutex::new(builds));
    let catalog = web::Data::new(catalog);
    let bind_address = (server_config.address.clone(), server_config.port);

    log::info!(
        "Starting server on {}:{}",
        server_config.address,
        server_config.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(builds.clone())
            .app_data(catalog.clone())
            .configure(configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
