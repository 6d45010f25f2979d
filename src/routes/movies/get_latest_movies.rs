use actix_web::{web::Data, HttpResponse};

use crate::error::ApiError;
use crate::providers::MovieDbClient;

pub async fn get_latest_movies(movie_db: Data<MovieDbClient>) -> Result<HttpResponse, ApiError> {
    tracing::info!("GETTING NOW PLAYING MOVIES");
    match movie_db.now_playing().await {
        Ok(results) => {
            tracing::info!("Got {} now playing movies", results.len());
            Ok(HttpResponse::Ok().json(results))
        }
        Err(err) => {
            tracing::error!("Error: getting now playing movies {}", err);
            Err(ApiError::Upstream("Failed to fetch latest movies"))
        }
    }
}
