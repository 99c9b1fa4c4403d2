use crate::{
    auth::AuthenticatedUserId,
    chat::{ChatMessage, OpenAiClient},
    error::AppError,
};
use actix_web::{post, web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Prior conversation turns, caller-supplied on every request.
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

/// Relays a conversation to the external chat provider.
///
/// ## Responses:
/// - `200 OK`: `{"response": "..."}`, the provider's reply verbatim.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `502 Bad Gateway`: If the provider returns an error.
/// - `504 Gateway Timeout`: If the provider does not answer within the
///   configured timeout.
#[post("/chat")]
pub async fn chat(
    client: web::Data<OpenAiClient>,
    _user: AuthenticatedUserId,
    chat_data: web::Json<ChatRequest>,
) -> Result<impl Responder, AppError> {
    let reply = client.chat(&chat_data.message, &chat_data.history).await?;
    Ok(HttpResponse::Ok().json(json!({ "response": reply })))
}
