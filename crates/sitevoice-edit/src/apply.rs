use sitevoice_types::{Action, NewPage, SiteFile};

use crate::markup::{self, Product};
use crate::page::PageSpec;
use crate::{copy, styles, EditResult, SkipReason, ALLOWED_FIELDS};

const MONETIZATION_HEADLINE: &str = "Monetize this page";
const MONETIZATION_DESCRIPTION: &str = "Add a revenue block to capture leads or offers.";
const MONETIZATION_CTA: &str = "Get the offer";

fn or_non_empty<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    value.as_deref().filter(|v| !v.is_empty()).unwrap_or(default)
}

fn or_absent<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    value.as_deref().unwrap_or(default)
}

/// Run `action` against the current text of `file`.
///
/// Callers pass only documents listed by [`Action::documents`]; any other
/// pairing is reported as unsupported.
pub fn apply(action: &Action, file: SiteFile, content: &str) -> EditResult {
    match (action, file) {
        (Action::UpdateCopy { field, value }, SiteFile::AppState) => {
            let field = field
                .as_deref()
                .ok_or(SkipReason::MissingParameter("field"))?;
            if !ALLOWED_FIELDS.contains(&field) {
                return Err(SkipReason::FieldNotEditable(field.to_string()));
            }
            let value = value
                .as_deref()
                .ok_or(SkipReason::MissingParameter("value"))?;
            copy::update_copy(content, field, value)
        }
        (Action::UpdateTheme { theme }, SiteFile::AppState) => {
            let theme = theme
                .as_deref()
                .ok_or(SkipReason::MissingParameter("theme"))?;
            copy::update_theme(content, theme)
        }
        (Action::UpdateMeta { title, description }, SiteFile::Index) => {
            markup::update_meta(content, title.as_deref(), description.as_deref())
        }
        (
            Action::AddPage {
                slug,
                title,
                headline,
                body,
            },
            SiteFile::Index,
        ) => {
            let spec = PageSpec::resolve(
                slug.as_deref(),
                title.as_deref(),
                headline.as_deref(),
                body.as_deref(),
            );
            markup::add_page_links(content, &spec.slug, &spec.title)
        }
        (
            Action::InsertMonetization {
                headline,
                description,
                cta,
            },
            SiteFile::Index,
        ) => markup::insert_monetization(
            content,
            or_non_empty(headline, MONETIZATION_HEADLINE),
            or_non_empty(description, MONETIZATION_DESCRIPTION),
            or_non_empty(cta, MONETIZATION_CTA),
        ),
        (Action::InsertMonetization { .. }, SiteFile::Styles) => {
            styles::ensure_monetization_styles(content)
        }
        (Action::UpdateBackgroundVideo { src }, SiteFile::Index) => {
            markup::update_background_video(content, or_absent(src, ""))
        }
        (Action::UpdateAvatar { src }, SiteFile::Index) => {
            markup::update_avatar(content, or_absent(src, ""))
        }
        (Action::UpdateWallpaper { src }, SiteFile::Styles) => {
            styles::update_wallpaper(content, or_absent(src, ""))
        }
        (Action::InsertSection { id, title, body }, SiteFile::Index) => markup::insert_section(
            content,
            or_absent(id, "custom-block"),
            or_absent(title, "New Section"),
            or_absent(body, "Details here."),
        ),
        (
            Action::AddProduct {
                name,
                price,
                description,
                image,
            },
            SiteFile::Index,
        ) => markup::add_product(
            content,
            &Product {
                name: or_absent(name, "New Product"),
                price: or_absent(price, ""),
                description: or_absent(description, ""),
                image: or_absent(image, ""),
            },
        ),
        (
            Action::InsertVideo {
                id,
                title,
                src,
                poster,
            },
            SiteFile::Index,
        ) => markup::insert_video(
            content,
            or_absent(id, "video-block"),
            or_absent(title, "Featured Video"),
            or_absent(src, ""),
            or_absent(poster, ""),
        ),
        (Action::InsertStream { id, title, url }, SiteFile::Index) => markup::insert_stream(
            content,
            or_absent(id, "livestream"),
            or_absent(title, "Live Stream"),
            or_absent(url, ""),
        ),
        (Action::InjectCss { css }, SiteFile::Styles) => {
            styles::inject_css(content, or_absent(css, ""))
        }
        _ => Err(SkipReason::Unsupported),
    }
}

/// The page document an `add_page` action creates.
pub fn synthesize_page(action: &Action) -> Option<NewPage> {
    match action {
        Action::AddPage {
            slug,
            title,
            headline,
            body,
        } => Some(
            PageSpec::resolve(
                slug.as_deref(),
                title.as_deref(),
                headline.as_deref(),
                body.as_deref(),
            )
            .into_page(),
        ),
        _ => None,
    }
}
