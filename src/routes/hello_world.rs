use actix_web::HttpResponse;

pub const LIVENESS_MESSAGE: &str = "Movie Review Backend is Running!";

pub async fn handler() -> HttpResponse {
    tracing::info!("Liveness check");
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(LIVENESS_MESSAGE)
}
