//! YouTube search links for recommendations.

const YOUTUBE_SEARCH_URL: &str = "https://www.youtube.com/results?search_query=";

/// Builds the search link for "title artist".
pub fn youtube_search_link(title: &str, artist: &str) -> String {
    format!(
        "{YOUTUBE_SEARCH_URL}{}",
        quote(&format!("{title} {artist}"))
    )
}

/// Percent-encodes every byte except ASCII alphanumerics, `_.-~` and `/`.
/// Space becomes `%20`, not `+`.
fn quote(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'.' | b'-' | b'~' | b'/' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
