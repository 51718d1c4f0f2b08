use axum::response::Html;

const INDEX_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>auth</title>
</head>
<body>
    <h1>auth</h1>
    <p>Request a token with <code>POST /api/tokens</code>.</p>
</body>
</html>
"#;

pub async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}
