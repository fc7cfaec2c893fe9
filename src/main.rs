use std::sync::Arc;

use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;
use pushkind_common::db::establish_connection_pool;

use pushkind_bookings::config::ServerConfig;
use pushkind_bookings::jobs::{QueuedNotifier, spawn_completion_sweeper};
use pushkind_bookings::notifications::{LogMailer, Notifier};
use pushkind_bookings::repository::DieselRepository;
use pushkind_bookings::routes::{self, json_error_handler, query_error_handler};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let config = ServerConfig::from_env();

    let common_config = match config.common() {
        Some(common_config) => common_config,
        None => {
            log::error!("SECRET_KEY and AUTH_SERVICE_URL environment variables must be set");
            std::process::exit(1);
        }
    };

    let secret_key = match Key::try_from(common_config.secret.as_bytes()) {
        Ok(key) => key,
        Err(e) => {
            log::error!("SECRET_KEY is not a usable signing key: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);
    if let Err(e) = repo.enable_wal() {
        log::warn!("Failed to enable write-ahead logging: {e}");
    }

    let notifier: Arc<dyn Notifier> = Arc::new(QueuedNotifier::new(
        Arc::new(LogMailer),
        config.notification_retry.clone(),
    ));

    spawn_completion_sweeper(repo.clone(), notifier.clone(), config.completion_sweep);

    let domain = config.domain.clone();
    let notifier_data = web::Data::from(notifier);

    HttpServer::new(move || {
        App::new()
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{domain}")))
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::Data::new(repo.clone()))
            .app_data(notifier_data.clone())
            .app_data(web::Data::new(common_config.clone()))
            .configure(routes::configure)
    })
    .bind((config.address.clone(), config.port))?
    .run()
    .await
}
