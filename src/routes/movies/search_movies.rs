use actix_web::{
    web::{Data, Query},
    HttpResponse,
};
use validator::Validate;

use super::{validation_failure, SearchParams};
use crate::error::ApiError;
use crate::providers::MovieDbClient;

pub async fn get_movies_search(
    movie_db: Data<MovieDbClient>,
    params: Query<SearchParams>,
) -> Result<HttpResponse, ApiError> {
    params.validate().map_err(validation_failure)?;
    let query = params.query.as_deref().unwrap_or_default();
    let page = params.page.unwrap_or(1);

    tracing::info!("Searching movie db for {:?}, page {}", query, page);
    match movie_db.search(query, page).await {
        Ok(response) => {
            tracing::info!("Got Movie db search response");
            Ok(HttpResponse::Ok().json(response))
        }
        Err(err) => {
            tracing::error!("MOVIE DB search error {}", err);
            Err(ApiError::Upstream("Failed to search movies"))
        }
    }
}
