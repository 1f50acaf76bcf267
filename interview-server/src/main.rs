#![warn(clippy::dbg_macro)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::time::Duration;

use actix_web::{App, HttpServer, web};
use interview_server::error::{ApiError, IoErrorContext, Result};
use interview_server::store::Store;
use interview_server::{catalog, config, prometheus};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use url::Url;

async fn inner_main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = config::load()?;

    let store = Store::open(&settings.database_path)?;
    if let Some(catalog_file) = &settings.catalog_file {
        let questions = catalog::load(catalog_file)?;
        let seeded = store.seed_catalog(questions).await?;
        if seeded > 0 {
            info!("Seeded {seeded} questions from {}", catalog_file.display());
        }
    }

    let metrics = prometheus::initialize_metrics()?;

    let store_data = web::Data::new(store);
    let metrics_data = web::Data::new(metrics.clone());

    info!("listening on {}", settings.bind);
    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(prometheus::PrometheusMiddleware::new(metrics.clone()))
            .app_data(store_data.clone())
            .app_data(metrics_data.clone())
            .configure(interview_server::configure)
            .route("/metrics", web::get().to(prometheus::metrics_handler))
    })
    // default is 5 seconds, which is too small for slow clients on campus links
    .client_request_timeout(Duration::from_secs(30))
    .workers(settings.workers)
    .max_connection_rate(settings.max_connection_rate);

    let try_url = Url::parse(&settings.bind);
    let (bind, uds) = if let Ok(url) = try_url.as_ref() {
        if url.scheme() != "unix" {
            (settings.bind.as_str(), false)
        } else if url.host().is_none() {
            (url.path(), true)
        } else {
            return Err(ApiError::Startup {
                reason: "Can only bind to file URLs without host portion.".to_string(),
            });
        }
    } else {
        (settings.bind.as_str(), false)
    };

    if uds {
        if !cfg!(unix) {
            error!("Binding to Unix domain sockets is only supported on Unix.");
            std::process::exit(1);
        }
        let socket_path = Path::new(bind);
        server = server
            .bind_uds(socket_path)
            .io_context("Failed to bind to Unix domain socket")?;
        fs::set_permissions(socket_path, fs::Permissions::from_mode(0o777))
            .io_context("Failed to set socket permissions")?;
    } else {
        server = server
            .bind(settings.bind.clone())
            .io_context("Failed to bind server")?;
    }

    server.run().await.io_context("Failed to start server")
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    inner_main().await.map_err(std::io::Error::other)
}
