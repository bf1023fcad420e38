use sitevoice_types::NewPage;

const DEFAULT_SLUG: &str = "new-page";
const DEFAULT_TITLE: &str = "New Page";
const DEFAULT_BODY: &str = "Details coming soon.";

/// Resolved parameters of an `add_page` action. Absent and empty values both
/// fall back to the defaults; the headline defaults to the title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSpec {
    pub slug: String,
    pub title: String,
    pub headline: String,
    pub body: String,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

impl PageSpec {
    pub fn resolve(
        slug: Option<&str>,
        title: Option<&str>,
        headline: Option<&str>,
        body: Option<&str>,
    ) -> Self {
        let title = non_empty(title).unwrap_or(DEFAULT_TITLE);
        Self {
            slug: non_empty(slug).unwrap_or(DEFAULT_SLUG).to_string(),
            title: title.to_string(),
            headline: non_empty(headline).unwrap_or(title).to_string(),
            body: non_empty(body).unwrap_or(DEFAULT_BODY).to_string(),
        }
    }

    pub fn path(&self) -> String {
        format!("{}.html", self.slug)
    }

    pub fn into_page(self) -> NewPage {
        let content = build_page_template(&self.title, &self.headline, &self.body);
        NewPage {
            path: self.path(),
            slug: self.slug,
            title: self.title,
            content,
        }
    }
}

/// A standalone page sharing the site's header, footer and stylesheet.
pub fn build_page_template(title: &str, headline: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>{title}</title>
  <meta name="description" content="{title}" />
  <link rel="stylesheet" href="styles.css" />
</head>
<body>
  <div class="bg-noise" aria-hidden="true"></div>
  <header class="site-header">
    <div class="brand">
      <span class="brand-mark">YT</span>
      <div class="brand-text">
        <strong>YoutuneAI</strong>
        <span>Revenue Engine</span>
      </div>
    </div>
    <nav class="nav">
      <a href="index.html">Home</a>
    </nav>
    <button class="ghost-button">Book a Demo</button>
  </header>
  <main class="page">
    <section class="section">
      <h1>{headline}</h1>
      <p>{body}</p>
    </section>
  </main>
  <footer class="footer">
    <div>
      <strong>YoutuneAI</strong>
      <p>Revenue systems that never sleep.</p>
    </div>
    <div class="footer-links">
      <a href="index.html">Home</a>
    </div>
  </footer>
</body>
</html>"#,
        title = title,
        headline = headline,
        body = body
    )
}
