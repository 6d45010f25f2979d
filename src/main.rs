use dotenv::dotenv;
use movie_review_backend::configuration::get_configuration;
use movie_review_backend::startup;
use movie_review_backend::telemetry::{get_subscriber, init_subscriber};
use std::net::TcpListener;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    let configuration = get_configuration("configuration").map_err(|err| {
        std::io::Error::new(
            std::io::ErrorKind::Other,
            format!(
                "Failed to load configuration ({}). TMDB_API_KEY and OPENAI_API_KEY must be set.",
                err
            ),
        )
    })?;

    let subscriber = get_subscriber(
        "movie_review_backend",
        "info",
        std::io::stdout,
        configuration.application.json_logs,
    );
    init_subscriber(subscriber);

    let address = configuration.application.address();
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server running on {}", address);
    startup::run_server(listener, configuration)?.await
}
