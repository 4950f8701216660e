use actix_cors::Cors;
use actix_web::{middleware::{DefaultHeaders, Logger}, web, App, HttpServer};
use clap::Parser;
use kontrol_backend::{
    config::Config,
    helper::notification_helpers::{Notifier, SmtpMailer},
    models::db_operations::{config_db_operations, DataStore},
    routes,
    AppState,
};
use std::fs;
use std::path::PathBuf;
use tera::Tera;

#[derive(Parser, Debug)]
#[command(name = "kontrol_server", author, version, about = "Starts the QR checklist web server.")]
struct Cli {
    /// Path to a .env configuration file. Defaults to ./.env when present.
    #[arg(long, value_name = "FILE")]
    env_file: Option<PathBuf>,
}

fn build_cors(allowed_origins: &str) -> Cors {
    let origins: Vec<&str> = allowed_origins
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    let cors = if origins == ["*"] {
        Cors::default().allow_any_origin()
    } else {
        origins
            .into_iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };
    cors.allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![actix_web::http::header::ACCEPT, actix_web::http::header::CONTENT_TYPE])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env(cli.env_file.as_deref())
        .expect("FATAL: Failed to load or parse configuration.");

    env_logger::init_from_env(env_logger::Env::new().default_filter_or(&config.log_level));

    let tera = Tera::new(&config.templates_glob()).expect("Tera initialization failed");

    fs::create_dir_all(config.data_dir()).expect("Failed to create data directory");
    let store = web::Data::new(DataStore::new(config.data_dir()));

    // Refuse to start on a missing or broken config rather than failing every request.
    let kontrol_config = config_db_operations::read_config(&store).unwrap_or_else(|e| {
        panic!(
            "FATAL: {}. Run 'cargo run --bin setup_cli -- data init' to create a default config.",
            e
        )
    });
    log::info!(
        "Loaded config for '{}' with {} checklist types",
        kontrol_config.ayarlar.lokanta_adi,
        kontrol_config.kontroller.len()
    );
    if let Err(e) = config_db_operations::validate_config(&kontrol_config) {
        log::warn!("{}; its form will not be served until items are added.", e);
    }

    let notifier = match config.email.clone() {
        Some(email) => {
            log::info!("Email notifications enabled via {}:{}", email.smtp_host, email.smtp_port);
            Some(Notifier::start(SmtpMailer::new(email)))
        }
        None => {
            log::info!("EMAIL_USER/EMAIL_PASS not set; email notifications disabled.");
            None
        }
    };

    let app_state = web::Data::new(AppState {
        notifier,
        public_base_url: config.public_base_url.clone(),
    });

    let server_address = format!("{}:{}", config.web.host, config.web.port);
    log::info!("Server starting at http://{}", server_address);
    log::info!("QR codes: http://{}/qr-kodlar", server_address);

    HttpServer::new(move || {
        App::new()
            .wrap(build_cors(&config.allowed_origins))
            .wrap(Logger::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("X-Frame-Options", "DENY")),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(store.clone())
            .app_data(app_state.clone())
            .service(actix_files::Files::new("/public", &config.public_path))
            .configure(routes::config_app)
    })
    .bind(server_address)?
    .run()
    .await
}
