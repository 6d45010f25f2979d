use chrono::{Days, Months, NaiveDate};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use super::{build_http_client, read_json, ProviderError, MOVIE_DB};
use crate::configuration::MovieDbSettings;

// https://developer.themoviedb.org/reference/discover-movie
const DATE_FORMAT: &str = "%Y-%m-%d";
// Limited theatrical, theatrical, digital.
const LATEST_RELEASE_TYPES: &str = "2|3|4";
// Documentary, TV movie.
const LATEST_EXCLUDED_GENRES: &str = "99,10770";

#[derive(Deserialize, Debug)]
pub struct Page<T> {
    pub results: Vec<T>,
}

#[derive(Deserialize, Debug)]
pub struct MovieDetails {
    pub title: String,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

#[derive(Deserialize, Debug)]
pub struct Genre {
    pub name: String,
}

#[derive(Deserialize, Debug)]
pub struct Credits {
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Deserialize, Debug)]
pub struct CrewMember {
    pub name: String,
    #[serde(default)]
    pub job: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Review {
    pub author: Option<String>,
    pub content: Option<String>,
    pub url: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct SimilarMovie {
    pub title: Option<String>,
}

/// Client for the movie metadata provider (TMDB v3 API).
pub struct MovieDbClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    language: String,
    region: String,
    excluded_keywords: Vec<u32>,
}

impl MovieDbClient {
    pub fn new(settings: &MovieDbSettings) -> Result<Self, reqwest::Error> {
        Ok(MovieDbClient {
            client: build_http_client(settings.timeout_seconds)?,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            language: settings.language.clone(),
            region: settings.region.clone(),
            excluded_keywords: settings.excluded_keywords.clone(),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        tracing::info!("Querying movie db {}", path);
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .query(params)
            .send()
            .await
            .map_err(|source| ProviderError::Request {
                provider: MOVIE_DB,
                source,
            })?;
        read_json(MOVIE_DB, response, |body| {
            body["status_message"].as_str().map(str::to_string)
        })
        .await
    }

    fn region(&self) -> (&'static str, String) {
        ("region", self.region.clone())
    }

    /// First page of what is currently in theatres, `results` only.
    pub async fn now_playing(&self) -> Result<Vec<Value>, ProviderError> {
        let page: Page<Value> = self
            .get(
                "/movie/now_playing",
                &[("page", "1".to_string()), self.region()],
            )
            .await?;
        Ok(page.results)
    }

    pub async fn popular(&self, page: u32) -> Result<Value, ProviderError> {
        self.get("/movie/popular", &[("page", page.to_string()), self.region()])
            .await
    }

    pub async fn upcoming(&self, page: u32, today: NaiveDate) -> Result<Value, ProviderError> {
        let mut params = upcoming_discover_params(today, page);
        params.push(self.region());
        self.get("/discover/movie", &params).await
    }

    pub async fn latest(&self, page: u32, today: NaiveDate) -> Result<Value, ProviderError> {
        let mut params = latest_discover_params(today, page, &self.excluded_keywords);
        params.push(self.region());
        self.get("/discover/movie", &params).await
    }

    pub async fn movie(&self, id: u64) -> Result<Value, ProviderError> {
        self.get(&format!("/movie/{}", id), &[]).await
    }

    pub async fn movie_details(&self, id: u64) -> Result<MovieDetails, ProviderError> {
        self.get(&format!("/movie/{}", id), &[]).await
    }

    pub async fn credits(&self, id: u64) -> Result<Credits, ProviderError> {
        self.get(&format!("/movie/{}/credits", id), &[]).await
    }

    pub async fn reviews(&self, id: u64) -> Result<Vec<Review>, ProviderError> {
        let page: Page<Review> = self.get(&format!("/movie/{}/reviews", id), &[]).await?;
        Ok(page.results)
    }

    pub async fn similar(&self, id: u64) -> Result<Vec<SimilarMovie>, ProviderError> {
        let page: Page<SimilarMovie> = self.get(&format!("/movie/{}/similar", id), &[]).await?;
        Ok(page.results)
    }

    pub async fn search(&self, query: &str, page: u32) -> Result<Value, ProviderError> {
        self.get(
            "/search/movie",
            &[
                ("query", query.to_string()),
                ("page", page.to_string()),
                self.region(),
            ],
        )
        .await
    }
}

/// Releases from tomorrow on; today's releases already count as "latest".
pub fn upcoming_discover_params(today: NaiveDate, page: u32) -> Vec<(&'static str, String)> {
    let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);
    vec![
        ("page", page.to_string()),
        ("sort_by", "primary_release_date.asc".to_string()),
        ("primary_release_date.gte", tomorrow.format(DATE_FORMAT).to_string()),
        ("with_release_type", "2|3".to_string()),
    ]
}

/// A rolling one month window ending today, without documentaries, TV
/// movies or blocked keywords.
pub fn latest_discover_params(
    today: NaiveDate,
    page: u32,
    excluded_keywords: &[u32],
) -> Vec<(&'static str, String)> {
    let month_ago = today.checked_sub_months(Months::new(1)).unwrap_or(today);
    let keywords = excluded_keywords
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let mut params = vec![
        ("page", page.to_string()),
        ("sort_by", "primary_release_date.desc".to_string()),
        ("primary_release_date.gte", month_ago.format(DATE_FORMAT).to_string()),
        ("primary_release_date.lte", today.format(DATE_FORMAT).to_string()),
        ("with_release_type", LATEST_RELEASE_TYPES.to_string()),
        ("without_genres", LATEST_EXCLUDED_GENRES.to_string()),
    ];
    if !keywords.is_empty() {
        params.push(("without_keywords", keywords));
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(params: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.as_str())
    }

    #[test]
    fn upcoming_lower_bound_is_tomorrow() {
        let today = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let params = upcoming_discover_params(today, 3);

        assert_eq!(param(&params, "primary_release_date.gte"), Some("2025-01-01"));
        assert_eq!(param(&params, "page"), Some("3"));
        assert!(param(&params, "primary_release_date.lte").is_none());
    }

    #[test]
    fn upcoming_lower_bound_is_never_today_or_earlier() {
        let mut day = NaiveDate::from_ymd_opt(2024, 2, 20).unwrap();
        for _ in 0..20 {
            let params = upcoming_discover_params(day, 1);
            let lower = NaiveDate::parse_from_str(
                param(&params, "primary_release_date.gte").unwrap(),
                DATE_FORMAT,
            )
            .unwrap();
            assert!(lower > day);
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn latest_covers_one_month_ending_today() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let params = latest_discover_params(today, 1, &[1, 2]);

        assert_eq!(param(&params, "primary_release_date.gte"), Some("2024-02-29"));
        assert_eq!(param(&params, "primary_release_date.lte"), Some("2024-03-31"));
        assert_eq!(param(&params, "with_release_type"), Some("2|3|4"));
        assert_eq!(param(&params, "without_genres"), Some("99,10770"));
        assert_eq!(param(&params, "without_keywords"), Some("1,2"));
    }

    #[test]
    fn latest_omits_empty_keyword_block_list() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let params = latest_discover_params(today, 2, &[]);

        assert!(param(&params, "without_keywords").is_none());
        assert_eq!(param(&params, "page"), Some("2"));
    }
}
