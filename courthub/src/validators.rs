use email_address::EmailAddress;
use url::Url;

/// Returns `true` if the provided string is a syntactically valid email address.
pub fn is_valid_email(value: &str) -> bool {
    EmailAddress::is_valid(value)
}

/// Returns `true` for `redis://` and `rediss://` URLs.
pub fn is_redis_url(value: &str) -> bool {
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "redis" | "rediss"))
        .unwrap_or(false)
}
