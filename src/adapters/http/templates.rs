//! Status page rendering (Tera, embedded template).

use crate::domain::DomainError;
use serde::Serialize;
use tera::{Context, Tera};

const INDEX_TEMPLATE_NAME: &str = "index.html";

const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Inbox Triage</title>
</head>
<body>
  <h1>Inbox Triage</h1>
  <p class="mode">{{ mode }}</p>
  <ul>
    <li>Extraction: {% if openai_configured %}OpenAI{% else %}mock{% endif %}</li>
    <li>Task sheet: {% if sheets_configured %}Google Sheets{% else %}mock{% endif %}</li>
  </ul>
  <form method="post" action="/process">
    <label for="email_content">Email</label>
    <textarea id="email_content" name="email_content" rows="12" cols="80"></textarea>
    <button type="submit">Process</button>
  </form>
</body>
</html>
"#;

/// Values shown on the status page.
#[derive(Debug, Clone, Serialize)]
pub struct StatusView {
    pub mode: String,
    pub openai_configured: bool,
    pub sheets_configured: bool,
}

/// Compiled status page.
pub struct StatusPage {
    tera: Tera,
}

impl std::fmt::Debug for StatusPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusPage").finish_non_exhaustive()
    }
}

impl StatusPage {
    pub fn new() -> Result<Self, DomainError> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![".html"]);
        tera.add_raw_template(INDEX_TEMPLATE_NAME, INDEX_TEMPLATE)
            .map_err(|e| DomainError::Config(format!("Template compilation failed: {}", e)))?;
        Ok(Self { tera })
    }

    pub fn render(&self, view: &StatusView) -> Result<String, DomainError> {
        let ctx = Context::from_serialize(view)
            .map_err(|e| DomainError::Config(format!("Invalid template context: {}", e)))?;
        self.tera
            .render(INDEX_TEMPLATE_NAME, &ctx)
            .map_err(|e| DomainError::Config(format!("Template rendering failed: {}", e)))
    }
}

/// Human-readable mode line.
pub fn mode_message(mock_mode: bool) -> &'static str {
    if mock_mode {
        "Running in MOCK MODE (no API calls)"
    } else {
        "Live mode with API integration"
    }
}
