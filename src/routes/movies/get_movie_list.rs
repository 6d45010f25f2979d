use actix_web::{
    web::{Data, Query},
    HttpResponse,
};
use chrono::Utc;
use validator::Validate;

use super::{validation_failure, ListType, MovieListParams};
use crate::error::ApiError;
use crate::providers::MovieDbClient;

pub async fn get_movie_list(
    movie_db: Data<MovieDbClient>,
    params: Query<MovieListParams>,
) -> Result<HttpResponse, ApiError> {
    params.validate().map_err(validation_failure)?;
    let page = params.page.unwrap_or(1);
    let today = Utc::now().date_naive();

    tracing::info!("GETTING {:?} MOVIES, PAGE {}", params.list_type, page);
    let result = match params.list_type {
        ListType::Popular => movie_db.popular(page).await,
        ListType::Upcoming => movie_db.upcoming(page, today).await,
        ListType::Latest => movie_db.latest(page, today).await,
    };

    match result {
        Ok(list) => Ok(HttpResponse::Ok().json(list)),
        Err(err) => {
            tracing::error!("Error: getting {:?} movie list {}", params.list_type, err);
            Err(ApiError::Upstream("Failed to fetch movies"))
        }
    }
}
