use actix_web::{
    web::{Data, Path},
    HttpResponse,
};

use crate::error::ApiError;
use crate::providers::MovieDbClient;

pub async fn get_movie_info(
    path: Path<u64>,
    movie_db: Data<MovieDbClient>,
) -> Result<HttpResponse, ApiError> {
    let movie_id = path.into_inner();

    let movie = movie_db.movie(movie_id).await.map_err(|err| {
        tracing::error!("MOVIE DB request error for movie {}: {}", movie_id, err);
        ApiError::Upstream("Failed to fetch movie details")
    })?;
    tracing::info!("Got Movie db details for movie {}", movie_id);
    Ok(HttpResponse::Ok().json(movie))
}
