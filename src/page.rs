/// The single-page UI served at `/`. Returned verbatim, no templating.
pub const INDEX_HTML: &str = include_str!("../static/index.html");
