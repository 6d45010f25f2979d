use actix_web::{web, Scope};
use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use super::{get_ai_summary, get_latest_movies, get_movie_info, get_movie_list};
use crate::error::ApiError;

pub fn movie_source() -> Scope {
    web::scope("/movies")
        .route("", web::get().to(get_movie_list))
        .route("/latest", web::get().to(get_latest_movies))
        .route("/{id}", web::get().to(get_movie_info))
        .route("/{id}/ai-summary", web::get().to(get_ai_summary))
}

#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    Popular,
    Upcoming,
    #[default]
    #[serde(other)]
    Latest,
}

#[derive(Deserialize, Validate, Debug)]
pub struct MovieListParams {
    #[serde(rename = "type", default)]
    pub list_type: ListType,
    // The movie db refuses pages past 500.
    #[validate(range(min = 1, max = 500, message = "page must be between 1 and 500"))]
    pub page: Option<u32>,
}

#[derive(Deserialize, Validate, Debug)]
pub struct SearchParams {
    #[validate(
        required(message = "Search query is required"),
        length(min = 1, message = "Search query is required")
    )]
    pub query: Option<String>,
    #[validate(range(min = 1, max = 500, message = "page must be between 1 and 500"))]
    pub page: Option<u32>,
}

// Fields reported first when several fail at once; anything else after.
const FIELD_PRIORITY: [&str; 2] = ["query", "page"];

/// Turns the most important validation message into a 400.
pub fn validation_failure(errors: ValidationErrors) -> ApiError {
    let mut fields = errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| (field.to_string(), errors))
        .collect::<Vec<_>>();
    fields.sort_by_key(|(field, _)| {
        FIELD_PRIORITY
            .iter()
            .position(|name| *name == field.as_str())
            .unwrap_or(FIELD_PRIORITY.len())
    });
    let message = fields
        .iter()
        .flat_map(|(_, errors)| errors.iter())
        .find_map(|error| error.message.as_ref().map(|message| message.to_string()))
        .unwrap_or_else(|| "Invalid query parameters".to_string());
    tracing::error!("Error: {}", message);
    ApiError::BadRequest(message)
}
