use crate::configuration::Settings;
use crate::error::ApiError;
use crate::providers::{CompletionClient, MovieDbClient};
use crate::routes::hello_world::handler;
use crate::routes::movies::{get_movies_search, movie_source};

use actix_web::{
    dev::Server,
    web::{self, Data, PathConfig, QueryConfig},
    App, HttpServer,
};
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

use actix_cors::Cors;
use actix_web::http::header;

fn configure_cors(frontend_url: &str) -> Cors {
    let mut cors = Cors::default();
    cors = if frontend_url == "*" {
        cors.allow_any_origin()
    } else {
        cors.allowed_origin(frontend_url)
    };
    cors.allowed_methods(vec!["GET"])
        .allowed_headers(vec![header::ACCEPT])
        .allowed_header(header::CONTENT_TYPE)
        .max_age(3600)
}

// Malformed query strings and path segments get the same JSON error body as
// everything else.
fn query_config() -> QueryConfig {
    QueryConfig::default().error_handler(|err, _req| {
        tracing::error!("Invalid query parameters: {}", err);
        ApiError::BadRequest(err.to_string()).into()
    })
}

fn path_config() -> PathConfig {
    PathConfig::default().error_handler(|err, _req| {
        tracing::error!("Invalid path parameters: {}", err);
        ApiError::BadRequest(err.to_string()).into()
    })
}

fn client_error(err: reqwest::Error) -> std::io::Error {
    std::io::Error::new(
        std::io::ErrorKind::Other,
        format!("Failed to build HTTP client: {}", err),
    )
}

pub fn run_server(listener: TcpListener, settings: Settings) -> Result<Server, std::io::Error> {
    let movie_db = Data::new(MovieDbClient::new(&settings.movie_db).map_err(client_error)?);
    let completion = Data::new(CompletionClient::new(&settings.completion).map_err(client_error)?);
    let ai_summary = Data::new(settings.ai_summary.clone());
    let frontend_url = settings.application.frontend_url.clone();

    let server: Server = HttpServer::new(move || {
        let cors = configure_cors(frontend_url.as_str());
        App::new()
            .wrap(cors)
            .wrap(TracingLogger::default())
            .app_data(query_config())
            .app_data(path_config())
            .app_data(movie_db.clone())
            .app_data(completion.clone())
            .app_data(ai_summary.clone())
            .service(movie_source())
            .route("/search", web::get().to(get_movies_search))
            .route("/", web::get().to(handler))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
