//! `@username` extraction from free text.
//!
//! Descriptions, comments, commit and tag messages may reference users with
//! `@username`. Each referenced user gets a direct message independent of any
//! channel subscription, so the scan must be deterministic: usernames come back
//! in order of first appearance, without duplicates.

use std::collections::HashSet;

/// Returns the usernames referenced in `text`, in first-occurrence order.
///
/// # Token Rules
///
/// - A candidate is a maximal run of letters, digits, `-` and `@`
/// - It must start with `@` and be at least two characters long
/// - The character after the `@` must not be `-`
/// - It must not end with `-` or contain `--`
///
/// The username is the candidate without its leading `@`.
///
/// # Examples
///
/// ```
/// use gitlab_relay::mentions::extract_mentions;
///
/// assert_eq!(extract_mentions("@jwilander @jwilander2"), vec!["jwilander", "jwilander2"]);
/// assert_eq!(extract_mentions("cc @root, @root."), vec!["root"]);
/// assert!(extract_mentions("@jwilander-").is_empty());
/// assert!(extract_mentions("mail me at me@example.com").is_empty());
/// ```
pub fn extract_mentions(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut usernames = Vec::new();

    for token in text.split(|c: char| !is_token_char(c)) {
        if let Some(username) = mention_username(token)
            && seen.insert(username)
        {
            usernames.push(username.to_string());
        }
    }

    usernames
}

fn is_token_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '@'
}

/// Returns the username if `token` is a valid mention.
fn mention_username(token: &str) -> Option<&str> {
    let username = token.strip_prefix('@')?;
    if username.is_empty()
        || username.starts_with('-')
        || username.ends_with('-')
        || username.contains("--")
    {
        return None;
    }
    Some(username)
}
