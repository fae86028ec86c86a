//! HTML rendering for the single-page UI.

use base64::{engine::general_purpose, Engine as _};
use classifier::{Classification, THRESHOLD};

/// File extensions offered by the upload form.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

const STYLE: &str = r#"
:root {
    --primary: #4A6FA5;
    --secondary: #166088;
    --accent: #4FC3F7;
    --background: #F8F9FA;
    --text: #333333;
}
body {
    background-color: var(--background);
    color: var(--text);
    font-family: "Source Sans Pro", -apple-system, "Segoe UI", Roboto, sans-serif;
    max-width: 730px;
    margin: 0 auto;
    padding: 2rem 1rem;
}
.title {
    text-align: center;
    margin-bottom: 1.5rem;
    color: var(--primary);
}
.uploader {
    border: 2px dashed var(--secondary);
    border-radius: 8px;
    background: rgba(74, 111, 165, 0.05);
    padding: 1rem;
}
.uploader small {
    display: block;
    color: var(--secondary);
    margin-top: 0.5rem;
}
.uploader button {
    background-color: var(--primary);
    color: white;
    border-radius: 8px;
    border: none;
    padding: 0.5rem 1rem;
    margin-top: 0.75rem;
    cursor: pointer;
}
.uploadedImage {
    border-radius: 12px;
    border: 2px solid var(--secondary);
    box-shadow: 0 4px 12px rgba(0,0,0,0.1);
    margin: 1.5rem auto 0;
    display: block;
    max-width: 100%;
}
.caption {
    text-align: center;
    color: var(--secondary);
    font-size: 0.9rem;
}
.result-card {
    padding: 1.5rem;
    border-radius: 12px;
    background: white;
    color: var(--text);
    text-align: center;
    margin: 1.5rem auto;
    border: 2px solid var(--accent);
    box-shadow: 0 4px 12px rgba(0,0,0,0.1);
    max-width: 400px;
}
.info, .error {
    border-radius: 8px;
    padding: 1rem;
    margin: 1.5rem 0;
}
.info {
    background: rgba(79, 195, 247, 0.15);
    color: var(--secondary);
}
.error {
    background: rgba(255, 43, 43, 0.09);
    color: #7D353B;
}
.footer {
    text-align: center;
    margin-top: 2rem;
    color: var(--secondary);
    font-size: 0.9rem;
}
"#;

/// What the page shows below the title.
#[derive(Debug)]
pub enum View<'a> {
    /// No upload yet.
    Prompt,
    Result(&'a Classification),
    /// A recoverable failure; the uploader stays available.
    Error(String),
    /// The model is unavailable and nothing more can be done.
    Fatal(String),
}

pub fn render(view: &View<'_>) -> String {
    let content = match view {
        View::Fatal(message) => {
            return document(&alert("error", &format!("Failed to load model: {message}")));
        }
        View::Prompt => alert("info", "Upload an image to classify"),
        View::Result(classification) => result(classification),
        View::Error(message) => alert("error", &format!("Error processing image: {message}")),
    };

    let mut body = String::from(r#"<h1 class="title">🐱 Cat vs Dog Classifier 🐶</h1>"#);
    body.push_str(&upload_form());
    body.push_str(&content);
    body.push_str(&format!(
        r#"<div class="footer">ResNet50 model | Threshold: {THRESHOLD}</div>"#
    ));
    document(&body)
}

fn document(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Cat &amp; Dog Classifier</title>
<style>{STYLE}</style>
</head>
<body>
{body}
</body>
</html>
"#
    )
}

fn upload_form() -> String {
    let accept = ACCEPTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(",");
    format!(
        r#"<form class="uploader" action="/classify" method="post" enctype="multipart/form-data">
<label for="file">Upload a cat or dog image</label><br>
<input type="file" id="file" name="file" accept="{accept}" required>
<small>Supports JPG, JPEG, PNG formats</small>
<button type="submit">Classify</button>
</form>"#
    )
}

fn result(classification: &Classification) -> String {
    let image = &classification.image;
    let prediction = &classification.prediction;
    let data = general_purpose::STANDARD.encode(&image.bytes);

    format!(
        r#"<img class="uploadedImage" src="data:{mime};base64,{data}" alt="Uploaded Image">
<p class="caption">Uploaded Image</p>
<div class="result-card">
<h3 style="color: var(--primary); margin-bottom: 0.5rem;">{label} {emoji}</h3>
<p style="color: var(--secondary); font-size: 1.1rem;">Confidence: <strong>{confidence}</strong></p>
</div>"#,
        mime = image.mime_type(),
        label = prediction.label,
        emoji = prediction.label.emoji(),
        confidence = prediction.confidence_display(),
    )
}

fn alert(class: &str, message: &str) -> String {
    format!(r#"<div class="{class}">{}</div>"#, escape_html(message))
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
