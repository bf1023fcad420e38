pub mod timeout {
    use std::time::Duration;

    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// A zero duration means "use the default".
    pub fn or_default(duration: Duration) -> Duration {
        if duration.is_zero() {
            DEFAULT_REQUEST_TIMEOUT
        } else {
            duration
        }
    }
}

pub mod text {
    /// The first `max_chars` characters of `input`, cut on a char boundary.
    pub fn truncate_chars(input: &str, max_chars: usize) -> &str {
        match input.char_indices().nth(max_chars) {
            Some((idx, _)) => &input[..idx],
            None => input,
        }
    }

    /// Masks a secret for display, keeping only a short suffix.
    pub fn redact(secret: &str) -> String {
        let count = secret.chars().count();
        if count <= 8 {
            return "*".repeat(count);
        }
        let suffix: String = secret.chars().skip(count - 4).collect();
        format!("{}{}", "*".repeat(count - 4), suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_truncate_chars() {
        assert_eq!(text::truncate_chars("hello", 60), "hello");
        assert_eq!(text::truncate_chars("hello", 2), "he");
        assert_eq!(text::truncate_chars("héllo", 2), "hé");
        assert_eq!(text::truncate_chars("", 3), "");
    }

    #[test]
    fn test_redact() {
        assert_eq!(text::redact("abc"), "***");
        assert_eq!(text::redact("ghp_1234567890"), "**********7890");
    }

    #[test]
    fn test_zero_timeout_uses_default() {
        assert_eq!(
            timeout::or_default(Duration::ZERO),
            timeout::DEFAULT_REQUEST_TIMEOUT
        );
        assert_eq!(
            timeout::or_default(Duration::from_secs(5)),
            Duration::from_secs(5)
        );
    }
}
