use std::sync::LazyLock;

use actix_web::{
    web::{Data, Path},
    HttpResponse,
};
use regex::Regex;
use serde::Serialize;

use crate::configuration::{AiSummarySettings, MissingReviewPolicy};
use crate::error::ApiError;
use crate::providers::{
    ChatMessage, CompletionClient, Credits, MovieDbClient, ProviderError, Review, SimilarMovie,
};

pub const AI_NAME: &str = "ReelBot";
const AI_SUMMARY_ERROR: &str = "Failed to generate AI summary";
const UNKNOWN: &str = "Unknown";
const NO_REVIEW: &str = "No review available.";
const MAX_MOOD_TAGS: usize = 3;
const MAX_RECOMMENDATIONS: usize = 3;

// A list item holding exactly one word, e.g. "- Tense" or "- Heart-warming,".
static MOOD_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*-[ \t]+([\p{L}\p{N}'_]+(?:-[\p{L}\p{N}'_]+)*)[ \t]*[.,!]?[ \t]*\r?$")
        .expect("mood tag pattern is valid")
});
// First line of the numbered recommendation list.
static FIRST_LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*1[.)][ \t]+").expect("list pattern is valid"));

#[derive(Serialize, Debug, PartialEq)]
pub struct AiSummaryResult {
    pub summary: String,
    pub ai_name: &'static str,
    pub genre: String,
    pub director: String,
    pub mood_tags: Vec<String>,
    pub top_review: String,
    pub top_review_author: String,
    pub top_review_url: Option<String>,
    pub bottom_review: String,
    pub bottom_review_author: String,
    pub bottom_review_url: Option<String>,
    pub recommendations: String,
}

struct ReviewFields {
    content: String,
    author: String,
    url: Option<String>,
}

impl From<Option<&Review>> for ReviewFields {
    fn from(review: Option<&Review>) -> Self {
        let review = review.cloned().unwrap_or_default();
        ReviewFields {
            content: review
                .content
                .filter(|content| !content.trim().is_empty())
                .unwrap_or_else(|| NO_REVIEW.to_string()),
            author: review
                .author
                .filter(|author| !author.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            url: review.url,
        }
    }
}

pub fn director_name(credits: &Credits) -> String {
    credits
        .crew
        .iter()
        .find(|member| member.job == "Director")
        .map(|member| member.name.clone())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// First and last review as the provider ordered them.
pub fn top_and_bottom(reviews: &[Review]) -> (Option<&Review>, Option<&Review>) {
    (reviews.first(), reviews.last())
}

pub fn similar_titles(similar: &[SimilarMovie]) -> Vec<String> {
    similar
        .iter()
        .filter_map(|movie| movie.title.clone())
        .take(MAX_RECOMMENDATIONS)
        .collect()
}

pub fn system_prompt() -> String {
    format!(
        "You are {}, a friendly movie expert. You write short, warm, spoiler-free \
         movie overviews and recommend similar films.",
        AI_NAME
    )
}

pub fn build_prompt(title: &str, genre: &str, director: &str, similar: &[String]) -> String {
    let recommendations = if similar.is_empty() {
        "Then recommend three similar movies of your choice as a numbered list, \
         one line per movie with a one-line description."
            .to_string()
    } else {
        format!(
            "Then recommend these similar movies as a numbered list, one line per movie \
             with a one-line description: {}.",
            similar.join(", ")
        )
    };
    format!(
        "Write about the movie \"{title}\" (genre: {genre}, directed by {director}).\n\n\
         First give a short, spoiler-free summary of the movie in two or three paragraphs. \
         Separate paragraphs with a blank line.\n\n\
         {recommendations}\n\n\
         Do not write headings such as \"Summary\" or \"Recommendations\". \
         Do not add introductions, closing remarks or any other filler."
    )
}

/// Up to three single-word list items found in the reply.
pub fn extract_mood_tags(reply: &str) -> Vec<String> {
    MOOD_TAG
        .captures_iter(reply)
        .filter_map(|captures| captures.get(1))
        .map(|tag| tag.as_str().to_string())
        .take(MAX_MOOD_TAGS)
        .collect()
}

/// Splits the reply into the prose summary and the numbered list that
/// follows it, if the model wrote one.
pub fn split_reply(reply: &str) -> (String, Option<String>) {
    match FIRST_LIST_ITEM.find(reply) {
        Some(list) if !reply[..list.start()].trim().is_empty() => (
            reply[..list.start()].trim().to_string(),
            Some(reply[list.start()..].trim().to_string()),
        ),
        Some(list) => (String::new(), Some(reply[list.start()..].trim().to_string())),
        None => (reply.trim().to_string(), None),
    }
}

pub fn assemble_result(
    reply: &str,
    genre: String,
    director: String,
    reviews: &[Review],
    similar: &[String],
) -> AiSummaryResult {
    let (top, bottom) = top_and_bottom(reviews);
    let top = ReviewFields::from(top);
    let bottom = ReviewFields::from(bottom);
    let (summary, recommendations) = split_reply(reply);

    AiSummaryResult {
        summary,
        ai_name: AI_NAME,
        genre,
        director,
        mood_tags: extract_mood_tags(reply),
        top_review: top.content,
        top_review_author: top.author,
        top_review_url: top.url,
        bottom_review: bottom.content,
        bottom_review_author: bottom.author,
        bottom_review_url: bottom.url,
        recommendations: recommendations.unwrap_or_else(|| similar.join(", ")),
    }
}

fn upstream_failure(err: ProviderError) -> ApiError {
    tracing::error!("AI summary upstream failure: {}", err);
    ApiError::Upstream(AI_SUMMARY_ERROR)
}

#[tracing::instrument(name = "AI summary", skip(movie_db, completion, settings))]
async fn generate_summary(
    movie_id: u64,
    movie_db: &MovieDbClient,
    completion: &CompletionClient,
    settings: &AiSummarySettings,
) -> Result<AiSummaryResult, ApiError> {
    let details = movie_db
        .movie_details(movie_id)
        .await
        .map_err(upstream_failure)?;
    let genre = if details.genres.is_empty() {
        UNKNOWN.to_string()
    } else {
        details
            .genres
            .iter()
            .map(|genre| genre.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let credits = movie_db.credits(movie_id).await.map_err(upstream_failure)?;
    let director = director_name(&credits);

    let reviews = movie_db.reviews(movie_id).await.map_err(upstream_failure)?;
    if reviews.is_empty() {
        tracing::info!("No reviews for movie {}", movie_id);
        if settings.missing_reviews == MissingReviewPolicy::NotFound {
            return Err(ApiError::NotFound("No reviews found".to_string()));
        }
    }

    let similar = movie_db.similar(movie_id).await.map_err(upstream_failure)?;
    let similar = similar_titles(&similar);

    let messages = [
        ChatMessage::system(system_prompt()),
        ChatMessage::user(build_prompt(&details.title, &genre, &director, &similar)),
    ];
    let reply = completion
        .complete(&messages)
        .await
        .map_err(upstream_failure)?;
    tracing::info!("Got completion for {:?}", details.title);

    Ok(assemble_result(&reply, genre, director, &reviews, &similar))
}

pub async fn get_ai_summary(
    path: Path<u64>,
    movie_db: Data<MovieDbClient>,
    completion: Data<CompletionClient>,
    settings: Data<AiSummarySettings>,
) -> Result<HttpResponse, ApiError> {
    let result = generate_summary(path.into_inner(), &movie_db, &completion, &settings).await?;
    Ok(HttpResponse::Ok().json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::CrewMember;

    fn review(author: &str, content: &str, url: &str) -> Review {
        Review {
            author: Some(author.to_string()),
            content: Some(content.to_string()),
            url: Some(url.to_string()),
        }
    }

    #[test]
    fn director_is_found_by_job() {
        let credits = Credits {
            crew: vec![
                CrewMember {
                    name: "Hans Zimmer".to_string(),
                    job: "Original Music Composer".to_string(),
                },
                CrewMember {
                    name: "Denis Villeneuve".to_string(),
                    job: "Director".to_string(),
                },
            ],
        };
        assert_eq!(director_name(&credits), "Denis Villeneuve");
        assert_eq!(director_name(&Credits { crew: vec![] }), "Unknown");
    }

    #[test]
    fn top_and_bottom_are_first_and_last() {
        let reviews = vec![
            review("a", "first", "https://a"),
            review("b", "middle", "https://b"),
            review("c", "last", "https://c"),
        ];
        let result = assemble_result("", "Drama".into(), "X".into(), &reviews, &[]);

        assert_eq!(result.top_review, "first");
        assert_eq!(result.top_review_author, "a");
        assert_eq!(result.top_review_url.as_deref(), Some("https://a"));
        assert_eq!(result.bottom_review, "last");
        assert_eq!(result.bottom_review_author, "c");
        assert_eq!(result.bottom_review_url.as_deref(), Some("https://c"));
    }

    #[test]
    fn single_review_is_both_top_and_bottom() {
        let reviews = vec![review("solo", "only one", "https://solo")];
        let result = assemble_result("", "Drama".into(), "X".into(), &reviews, &[]);

        assert_eq!(result.top_review, result.bottom_review);
        assert_eq!(result.top_review_author, "solo");
    }

    #[test]
    fn missing_reviews_fall_back_to_sentinels() {
        let result = assemble_result("", "Drama".into(), "X".into(), &[], &[]);

        assert_eq!(result.top_review, "No review available.");
        assert_eq!(result.top_review_author, "Unknown");
        assert_eq!(result.top_review_url, None);
        assert_eq!(result.bottom_review, "No review available.");
        assert_eq!(result.bottom_review_author, "Unknown");
        assert_eq!(result.bottom_review_url, None);
    }

    #[test]
    fn mood_tags_are_single_word_items_capped_at_three() {
        let reply = "A quiet film.\n\n- Tense\n- two words\n-Nospace\n  - Haunting\n- Bleak.\n- Warm\n";
        assert_eq!(extract_mood_tags(reply), vec!["Tense", "Haunting", "Bleak"]);
    }

    #[test]
    fn mood_tags_allow_hyphenated_words_and_trailing_punctuation() {
        let reply = "- Heart-warming\n- Tense,\n* Dark\n-  Eerie  \n- Bold!";
        assert_eq!(
            extract_mood_tags(reply),
            vec!["Heart-warming", "Tense", "Eerie"]
        );
    }

    #[test]
    fn mood_tags_may_be_empty() {
        assert!(extract_mood_tags("No list here.\n1. Alien - a classic").is_empty());
    }

    #[test]
    fn reply_is_split_at_the_numbered_list() {
        let reply = "Para one.\n\nPara two.\n\n1. Alien - space horror\n2. Aliens - sequel\n3. Prometheus - prequel\n";
        let (summary, recommendations) = split_reply(reply);

        assert_eq!(summary, "Para one.\n\nPara two.");
        assert_eq!(
            recommendations.as_deref(),
            Some("1. Alien - space horror\n2. Aliens - sequel\n3. Prometheus - prequel")
        );
    }

    #[test]
    fn reply_without_list_uses_similar_titles() {
        let similar = vec!["Alien".to_string(), "Aliens".to_string()];
        let result = assemble_result("Just prose.", "Horror".into(), "X".into(), &[], &similar);

        assert_eq!(result.summary, "Just prose.");
        assert_eq!(result.recommendations, "Alien, Aliens");
        assert_eq!(result.ai_name, "ReelBot");
    }

    #[test]
    fn only_three_similar_titles_are_kept() {
        let similar = ["A", "B", "C", "D"]
            .into_iter()
            .map(|title| SimilarMovie {
                title: Some(title.to_string()),
            })
            .collect::<Vec<_>>();
        assert_eq!(similar_titles(&similar), vec!["A", "B", "C"]);
    }

    #[test]
    fn prompt_names_the_movie_and_its_recommendations() {
        let prompt = build_prompt(
            "Dune",
            "Science Fiction",
            "Denis Villeneuve",
            &["Arrival".to_string(), "Blade Runner 2049".to_string()],
        );

        assert!(prompt.contains("\"Dune\""));
        assert!(prompt.contains("directed by Denis Villeneuve"));
        assert!(prompt.contains("Arrival, Blade Runner 2049"));
        assert!(prompt.contains("spoiler-free"));
        assert!(prompt.contains("blank line"));
        assert!(system_prompt().contains("ReelBot"));
    }
}
