use once_cell::sync::Lazy;
use regex::Regex;

use crate::text::{
    region_before, replace_first, replace_first_after, replace_first_match, replace_within_match,
};
use crate::{EditResult, SkipReason};

const MAIN_CLOSE: &str = "</main>";
const NAV_CLOSE: &str = "</nav>";
const FOOTER_CLOSE: &str = "</div>\n  </footer>";
const STORE_MARKER: &str = r#"id="store""#;
const STORE_GRID_MARKER: &str = r#"class="store-grid""#;
const STORE_GRID_CLOSE: &str = "</div>\n    </section>";
const MONETIZATION_MARKER: &str = r#"id="monetization""#;

static TITLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<title>.*</title>").expect("title regex"));
static DESCRIPTION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<meta name="description" content="[^"]*"\s*/>"#).expect("description regex")
});
static SRC_ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"src="[^"]*""#).expect("src regex"));
static VIDEO_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<video[^>]*src="[^"]*"[^>]*>"#).expect("video regex"));
static AVATAR_IMAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<div class="avatar"[^>]*>\s*<img[^>]*src="[^"]*""#).expect("avatar regex")
});

fn id_marker(id: &str) -> String {
    format!(r#"id="{}""#, id)
}

/// Insert `block` in front of the first `</main>`.
fn insert_before_main(content: &str, block: &str) -> EditResult {
    replace_first(content, MAIN_CLOSE, &format!("{}\n  {}", block, MAIN_CLOSE))
        .ok_or(SkipReason::PatternMissing(MAIN_CLOSE))
}

/// Insert `block` before `</main>` unless `marker` is already in the document.
fn insert_once(content: &str, marker: &str, block: &str) -> EditResult {
    if content.contains(marker) {
        return Err(SkipReason::AlreadyPresent(marker.to_string()));
    }
    insert_before_main(content, block)
}

/// `update_meta`: the `<title>` text and the description meta tag, each only
/// when supplied.
pub fn update_meta(content: &str, title: Option<&str>, description: Option<&str>) -> EditResult {
    let title = title.filter(|t| !t.is_empty());
    let description = description.filter(|d| !d.is_empty());
    if title.is_none() && description.is_none() {
        return Err(SkipReason::MissingParameter("title or description"));
    }

    let mut updated = content.to_string();
    let mut matched = false;
    if let Some(title) = title {
        let tag = format!("<title>{}</title>", title);
        if let Some(next) = replace_first_match(&updated, &TITLE_PATTERN, &tag) {
            updated = next;
            matched = true;
        }
    }
    if let Some(description) = description {
        let tag = format!(r#"<meta name="description" content="{}" />"#, description);
        if let Some(next) = replace_first_match(&updated, &DESCRIPTION_PATTERN, &tag) {
            updated = next;
            matched = true;
        }
    }

    if matched {
        Ok(updated)
    } else {
        Err(SkipReason::PatternMissing("<title> or description meta"))
    }
}

pub fn page_link(slug: &str, title: &str) -> String {
    format!(r#"<a href="{}.html">{}</a>"#, slug, title)
}

fn add_nav_link(content: &str, link: &str) -> EditResult {
    let close = content
        .find(NAV_CLOSE)
        .ok_or(SkipReason::PatternMissing(NAV_CLOSE))?;
    if region_before(content, "<nav", close).contains(link) {
        return Err(SkipReason::AlreadyPresent(link.to_string()));
    }
    replace_first(content, NAV_CLOSE, &format!("  {}\n    {}", link, NAV_CLOSE))
        .ok_or(SkipReason::PatternMissing(NAV_CLOSE))
}

fn add_footer_link(content: &str, link: &str) -> EditResult {
    let close = content
        .find(FOOTER_CLOSE)
        .ok_or(SkipReason::PatternMissing("footer links"))?;
    if region_before(content, "<div", close).contains(link) {
        return Err(SkipReason::AlreadyPresent(link.to_string()));
    }
    replace_first(
        content,
        FOOTER_CLOSE,
        &format!("  {}\n    {}", link, FOOTER_CLOSE),
    )
    .ok_or(SkipReason::PatternMissing("footer links"))
}

/// `add_page` on the shell: link the new page from the nav list and the
/// footer link list. Each list is checked on its own, so the link lands
/// exactly once in each.
pub fn add_page_links(content: &str, slug: &str, title: &str) -> EditResult {
    let link = page_link(slug, title);
    let nav = add_nav_link(content, &link);
    let current = nav.as_deref().unwrap_or(content);
    match add_footer_link(current, &link) {
        Ok(updated) => Ok(updated),
        Err(footer_skip) => nav.map_err(|_| footer_skip),
    }
}

pub fn insert_monetization(content: &str, headline: &str, description: &str, cta: &str) -> EditResult {
    let block = format!(
        "\n    <section class=\"section monetization\" id=\"monetization\">\n      <h2>{}</h2>\n      <p>{}</p>\n      <button class=\"primary\">{}</button>\n    </section>\n  ",
        headline, description, cta
    );
    insert_once(content, MONETIZATION_MARKER, &block)
}

pub fn insert_section(content: &str, id: &str, title: &str, body: &str) -> EditResult {
    let block = format!(
        "\n    <section class=\"section custom-block\" id=\"{}\">\n      <h2>{}</h2>\n      <p>{}</p>\n    </section>",
        id, title, body
    );
    insert_once(content, &id_marker(id), &block)
}

pub fn insert_video(content: &str, id: &str, title: &str, src: &str, poster: &str) -> EditResult {
    let poster_attr = if poster.is_empty() {
        String::new()
    } else {
        format!("poster=\"{}\"", poster)
    };
    let block = format!(
        "\n    <section class=\"section video-block\" id=\"{}\">\n      <h2>{}</h2>\n      <video controls playsinline {} style=\"width:100%;border-radius:16px;\">\n        <source src=\"{}\" type=\"video/mp4\" />\n        Your browser does not support the video tag.\n      </video>\n    </section>",
        id, title, poster_attr, src
    );
    insert_once(content, &id_marker(id), &block)
}

pub fn insert_stream(content: &str, id: &str, title: &str, url: &str) -> EditResult {
    let block = format!(
        "\n    <section class=\"section livestream\" id=\"{}\">\n      <h2>{}</h2>\n      <div class=\"embed\">\n        <iframe src=\"{}\" allow=\"autoplay; encrypted-media\" allowfullscreen style=\"width:100%;height:360px;border:0;border-radius:16px;\"></iframe>\n      </div>\n    </section>",
        id, title, url
    );
    insert_once(content, &id_marker(id), &block)
}

/// The store section with its empty grid, added once.
fn ensure_store_section(content: &str) -> EditResult {
    if content.contains(STORE_MARKER) {
        return Ok(content.to_string());
    }
    insert_before_main(
        content,
        "\n    <section class=\"section\" id=\"store\">\n      <h2>Store</h2>\n      <div class=\"store-grid\"></div>\n    </section>",
    )
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Product<'a> {
    pub name: &'a str,
    pub price: &'a str,
    pub description: &'a str,
    pub image: &'a str,
}

/// `add_product`: ensure the store exists, then append one card to the end of
/// its grid. Cards are not deduplicated.
pub fn add_product(content: &str, product: &Product<'_>) -> EditResult {
    let content = ensure_store_section(content)?;
    if !content.contains(STORE_GRID_MARKER) {
        return Err(SkipReason::PatternMissing("store grid"));
    }
    let card = format!(
        "\n        <div class=\"product-card\">\n          <div class=\"product-media\" style=\"background-image:url('{}')\"></div>\n          <h3>{}</h3>\n          <p>{}</p>\n          <strong>{}</strong>\n          <button class=\"primary\">Buy</button>\n        </div>",
        product.image, product.name, product.description, product.price
    );
    let store_at = content.find(STORE_MARKER).unwrap_or(0);
    replace_first_after(
        &content,
        store_at,
        STORE_GRID_CLOSE,
        &format!("{}\n      {}", card, STORE_GRID_CLOSE),
    )
    .ok_or(SkipReason::PatternMissing("store grid"))
}

/// `update_background_video`: the `src` of the first `<video>` tag carrying one.
pub fn update_background_video(content: &str, src: &str) -> EditResult {
    if src.is_empty() {
        return Err(SkipReason::MissingParameter("src"));
    }
    replace_within_match(content, &VIDEO_TAG, &SRC_ATTRIBUTE, &format!("src=\"{}\"", src))
        .ok_or(SkipReason::PatternMissing("<video> source"))
}

/// `update_avatar`: the `src` of the image inside `<div class="avatar">`.
pub fn update_avatar(content: &str, src: &str) -> EditResult {
    if src.is_empty() {
        return Err(SkipReason::MissingParameter("src"));
    }
    replace_within_match(content, &AVATAR_IMAGE, &SRC_ATTRIBUTE, &format!("src=\"{}\"", src))
        .ok_or(SkipReason::PatternMissing("avatar image"))
}
