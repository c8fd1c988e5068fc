mod cors;

use actix_web::{
    App, HttpServer,
    web::{self},
};
use api_onboarding::VerificationSessions;
use common::env_config::Config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // get env vars
    let config = Config::from_env();
    let config_data = config.clone();

    // get info
    let is_production = config.environment == "production";
    let origin = config.cors_allowed_origin.clone();

    // init logger
    if config.console_logging_enabled {
        logger::setup().expect("Failed to set up logger");
    }

    // init db connection
    let pool = db::setup(&config.database_url, is_production)
        .await
        .expect("Failed to set up database");

    // document storage must exist before the first upload lands
    std::fs::create_dir_all(&config.upload_dir).expect("Failed to create upload directory");

    // verification sessions are ephemeral and shared across workers
    let sessions = web::Data::new(VerificationSessions::new());

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config_data.clone()))
            .app_data(sessions.clone())
            .wrap(limiter::global_middleware(config_data.rate_limit_per_sec))
            .wrap(logger::middleware()) // 3rd
            .wrap(extractor::middleware()) // 2nd
            .wrap(cors::middleware(&origin)) // 1st
            .service(
                web::scope("/api")
                    .service(api_auth::mount_auth())
                    .service(api_payments::mount_webhook())
                    .service(
                        web::scope("")
                            .wrap(api_auth::auth_middleware())
                            .service(api_auth::mount_user())
                            .service(api_onboarding::mount_onboarding())
                            .service(api_payments::mount_pay()),
                    ),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .workers(config.num_workers)
    .run()
    .await
}
