//! Site page handlers

use askama::Template;
use axum::response::Html;

use crate::error::Result;

/// Top page template
#[derive(Template)]
#[template(path = "top.html")]
struct TopTemplate {}

/// Top page
pub async fn top() -> Result<Html<String>> {
    let template = TopTemplate {};
    Ok(Html(template.render()?))
}
