//! Clients for the two external collaborators: the Base44 source API and
//! the Supabase Postgres destination.

pub mod base44;
pub mod provider;
pub mod supabase;

pub use base44::Base44Client;
pub use provider::{DestinationStore, FetchResponse, SourceProvider};
pub use supabase::SupabaseClient;

const BODY_EXCERPT_LEN: usize = 300;

/// Trim an HTTP error body to something that fits in a log line
pub(crate) fn body_excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.len() <= BODY_EXCERPT_LEN {
        return trimmed.to_string();
    }
    let mut end = BODY_EXCERPT_LEN;
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &trimmed[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_excerpt_short_body() {
        assert_eq!(body_excerpt("  oops  "), "oops");
    }

    #[test]
    fn test_body_excerpt_truncates() {
        let long = "x".repeat(500);
        let excerpt = body_excerpt(&long);
        assert!(excerpt.ends_with('…'));
        assert!(excerpt.chars().count() <= BODY_EXCERPT_LEN + 1);
    }
}
