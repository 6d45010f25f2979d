use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub movie_db: MovieDbSettings,
    pub completion: CompletionSettings,
    pub ai_summary: AiSummarySettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub json_logs: bool,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct MovieDbSettings {
    pub api_key: String,
    pub base_url: String,
    pub language: String,
    pub region: String,
    pub excluded_keywords: Vec<u32>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct CompletionSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_seconds: Option<u64>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AiSummarySettings {
    pub missing_reviews: MissingReviewPolicy,
}

/// What the ai-summary route does when a movie has no reviews at all.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MissingReviewPolicy {
    /// Fill the review fields with sentinel text and keep going.
    #[default]
    Fallback,
    /// Answer 404 before the completion provider is called.
    NotFound,
}

// Keyword ids hidden from the "latest" listing.
const DEFAULT_EXCLUDED_KEYWORDS: [u32; 4] = [155477, 190370, 256466, 267122];

fn with_defaults(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
    builder
        .set_default("application.host", "0.0.0.0")?
        .set_default("application.port", 5000)?
        .set_default("application.frontend_url", "*")?
        .set_default("application.json_logs", false)?
        .set_default("movie_db.base_url", "https://api.themoviedb.org/3")?
        .set_default("movie_db.language", "en-US")?
        .set_default("movie_db.region", "US")?
        .set_default(
            "movie_db.excluded_keywords",
            DEFAULT_EXCLUDED_KEYWORDS
                .iter()
                .map(|id| i64::from(*id))
                .collect::<Vec<_>>(),
        )?
        .set_default("completion.base_url", "https://api.openai.com/v1")?
        .set_default("completion.model", "gpt-3.5-turbo")?
        .set_default("completion.max_tokens", 500)?
        .set_default("ai_summary.missing_reviews", "fallback")
}

/// Reads `<filename>.json` (optional), `APP_*` variables and the flat
/// `TMDB_API_KEY` / `OPENAI_API_KEY` / `PORT` variables, in that order of
/// increasing precedence.
pub fn get_configuration(filename: &str) -> Result<Settings, config::ConfigError> {
    let mut builder = with_defaults(Config::builder())?;
    builder = builder
        .add_source(File::new(filename, FileFormat::Json).required(false))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("movie_db.excluded_keywords"),
        )
        .set_override_option("movie_db.api_key", std::env::var("TMDB_API_KEY").ok())?
        .set_override_option("completion.api_key", std::env::var("OPENAI_API_KEY").ok())?
        .set_override_option("application.port", std::env::var("PORT").ok())?;
    let config = builder.build()?;
    config.try_deserialize()
}
