use regex::Regex;
use std::ops::Range;

fn splice(content: &str, range: Range<usize>, replacement: &str) -> String {
    let mut out = String::with_capacity(content.len() - range.len() + replacement.len());
    out.push_str(&content[..range.start]);
    out.push_str(replacement);
    out.push_str(&content[range.end..]);
    out
}

/// Replace the first occurrence of `needle`. `None` when it is absent.
pub fn replace_first(content: &str, needle: &str, replacement: &str) -> Option<String> {
    let start = content.find(needle)?;
    Some(splice(content, start..start + needle.len(), replacement))
}

/// Like [`replace_first`], searching only from byte offset `from`.
pub fn replace_first_after(
    content: &str,
    from: usize,
    needle: &str,
    replacement: &str,
) -> Option<String> {
    let start = from + content.get(from..)?.find(needle)?;
    Some(splice(content, start..start + needle.len(), replacement))
}

/// Replace the first match of `pattern` with `replacement` taken literally.
pub fn replace_first_match(content: &str, pattern: &Regex, replacement: &str) -> Option<String> {
    let found = pattern.find(content)?;
    Some(splice(content, found.range(), replacement))
}

/// Rewrite the first match of `outer` by replacing the first match of `inner`
/// inside it.
pub fn replace_within_match(
    content: &str,
    outer: &Regex,
    inner: &Regex,
    replacement: &str,
) -> Option<String> {
    let found = outer.find(content)?;
    let rewritten = replace_first_match(found.as_str(), inner, replacement)?;
    Some(splice(content, found.range(), &rewritten))
}

/// The text between the last `open` before `close_at` and `close_at`.
pub fn region_before<'a>(content: &'a str, open: &str, close_at: usize) -> &'a str {
    let head = &content[..close_at];
    let start = head.rfind(open).unwrap_or(0);
    &head[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_first_only_touches_first() {
        assert_eq!(
            replace_first("a</main>b</main>", "</main>", "X").as_deref(),
            Some("aXb</main>")
        );
        assert_eq!(replace_first("abc", "</main>", "X"), None);
    }

    #[test]
    fn test_replacement_is_literal() {
        let re = Regex::new("b+").unwrap();
        assert_eq!(
            replace_first_match("abbc", &re, "$0$1").as_deref(),
            Some("a$0$1c")
        );
    }

    #[test]
    fn test_replace_first_after() {
        assert_eq!(
            replace_first_after("x-y-z", 2, "-", "+").as_deref(),
            Some("x-y+z")
        );
        assert_eq!(replace_first_after("x-y", 2, "-", "+"), None);
        assert_eq!(replace_first_after("x", 9, "-", "+"), None);
    }

    #[test]
    fn test_region_before() {
        let content = "<nav>a</nav><footer>b</footer>";
        let close = content.find("</footer>").unwrap();
        assert_eq!(region_before(content, "<footer", close), "<footer>b");
    }
}
