//! GET / - The chat page.

use axum::response::Html;

const CHAT_PAGE: &str = include_str!("../../../templates/chat.html");

pub async fn index() -> Html<&'static str> {
    Html(CHAT_PAGE)
}
