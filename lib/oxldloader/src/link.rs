use crate::loader::JSON_LD_MEDIA_TYPE;
use oxiri::Iri;
use std::collections::HashMap;

/// IRI of the [JSON-LD context link relation](https://www.w3.org/TR/json-ld11/#iana-considerations).
pub const JSON_LD_CONTEXT_REL: &str = "http://www.w3.org/ns/json-ld#context";

/// A single link parsed from an HTTP [`Link` header](https://httpwg.org/specs/rfc8288.html).
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct LinkRecord {
    uri: String,
    params: HashMap<String, String>,
}

impl LinkRecord {
    /// The link target, always an absolute IRI.
    ///
    /// Relative references are resolved against the URL of the response
    /// the header was read from.
    #[inline]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// A link parameter (`rel`, `type`...) as it appeared in the header,
    /// quote- and whitespace-trimmed but not case-normalized.
    #[inline]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// The whitespace-separated tokens of the `rel` parameter.
    pub fn rel_tokens(&self) -> impl Iterator<Item = &str> {
        self.param("rel").unwrap_or_default().split_whitespace()
    }
}

/// Parses a set of raw `Link` header values into [`LinkRecord`]s.
///
/// A single header value may carry multiple comma-separated links and
/// commas or semicolons inside double-quoted substrings are not
/// separators. Record order follows the order the links appeared in,
/// across all header values. Fragments without a resolvable `<>` target
/// are skipped, unbalanced quotes are tolerated.
///
/// ```
/// use oxiri::Iri;
/// use oxldloader::parse_link_headers;
///
/// let base = Iri::parse("http://example.org/doc".to_owned())?;
/// let links = parse_link_headers(
///     ["<ctx.json>; rel=\"http://www.w3.org/ns/json-ld#context\""],
///     &base,
/// );
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].uri(), "http://example.org/ctx.json");
/// # Result::<_, oxiri::IriParseError>::Ok(())
/// ```
pub fn parse_link_headers<'a>(
    values: impl IntoIterator<Item = &'a str>,
    base: &Iri<String>,
) -> Vec<LinkRecord> {
    let mut records = Vec::new();
    for value in values {
        for fragment in split_unquoted(value, ',') {
            if let Some(record) = parse_fragment(fragment, base) {
                records.push(record);
            }
        }
    }
    records
}

/// Links advertising an alternate `application/ld+json` representation
/// of the resource.
pub fn alternate_links(records: &[LinkRecord]) -> impl Iterator<Item = &LinkRecord> {
    records.iter().filter(|record| {
        record.param("rel") == Some("alternate")
            && record.param("type") == Some(JSON_LD_MEDIA_TYPE)
    })
}

/// Links associating an external JSON-LD context with the resource.
///
/// `rel` may carry multiple relations, the match is on its whitespace-split
/// tokens and is case-sensitive.
pub fn context_links(records: &[LinkRecord]) -> impl Iterator<Item = &LinkRecord> {
    records
        .iter()
        .filter(|record| record.rel_tokens().any(|token| token == JSON_LD_CONTEXT_REL))
}

/// Splits on `separator` occurrences that are outside of double-quoted
/// substrings.
///
/// Quotes only suppress splitting, they are not validated.
fn split_unquoted(value: &str, separator: char) -> impl Iterator<Item = &str> {
    let mut in_quotes = false;
    value.split(move |c: char| {
        if c == '"' {
            in_quotes = !in_quotes;
        }
        c == separator && !in_quotes
    })
}

fn parse_fragment(fragment: &str, base: &Iri<String>) -> Option<LinkRecord> {
    let mut uri = None;
    let mut params = HashMap::new();
    for part in split_unquoted(fragment, ';') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if let Some(reference) = bracketed_reference(part) {
            if uri.is_none() {
                uri = resolve_reference(reference, base);
            }
        } else if let Some((key, value)) = part.split_once('=') {
            // The value is kept whole even if it contains another '='
            let key = trim_token(key);
            if !key.is_empty() {
                params.insert(key.to_owned(), trim_token(value).to_owned());
            }
        } else if uri.is_none() {
            // A bare reference without enclosing brackets
            uri = resolve_reference(trim_token(part), base);
        }
    }
    Some(LinkRecord { uri: uri?, params })
}

/// Extracts the target of a `<...>` part.
///
/// The brackets protect any `=` inside the reference from being read as a
/// parameter separator.
fn bracketed_reference(part: &str) -> Option<&str> {
    let (reference, _) = part.strip_prefix('<')?.split_once('>')?;
    Some(reference.trim())
}

fn trim_token(token: &str) -> &str {
    token.trim_matches(|c| matches!(c, '"' | '\'' | ' ' | '\t' | '\n' | '\r'))
}

fn resolve_reference(reference: &str, base: &Iri<String>) -> Option<String> {
    if Iri::parse(reference).is_ok() {
        // Already absolute, passed through unchanged
        Some(reference.to_owned())
    } else {
        Some(base.resolve(reference).ok()?.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(value: &str) -> Iri<String> {
        Iri::parse(value.to_owned()).unwrap()
    }

    #[test]
    fn single_link_with_parameters() {
        let links = parse_link_headers(
            ["<http://a/b>; rel=\"alternate\"; type=\"application/ld+json\""],
            &base("http://a/"),
        );
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].uri(), "http://a/b");
        assert_eq!(links[0].param("rel"), Some("alternate"));
        assert_eq!(links[0].param("type"), Some("application/ld+json"));
    }

    #[test]
    fn relative_reference_is_resolved_against_base() {
        let links = parse_link_headers(
            ["<ctx.json>; rel=\"http://www.w3.org/ns/json-ld#context\""],
            &base("http://example.org/doc"),
        );
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].uri(), "http://example.org/ctx.json");
    }

    #[test]
    fn absolute_reference_passes_through() {
        let links = parse_link_headers(
            ["<https://other.example/ctx>; rel=\"alternate\""],
            &base("http://example.org/"),
        );
        assert_eq!(links[0].uri(), "https://other.example/ctx");
    }

    #[test]
    fn multiple_links_in_one_header_value() {
        let links = parse_link_headers(
            ["<http://a/1>; rel=\"first\", <http://a/2>; rel=\"second\""],
            &base("http://a/"),
        );
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].uri(), "http://a/1");
        assert_eq!(links[0].param("rel"), Some("first"));
        assert_eq!(links[1].uri(), "http://a/2");
        assert_eq!(links[1].param("rel"), Some("second"));
    }

    #[test]
    fn order_is_kept_across_header_values() {
        let links = parse_link_headers(
            ["<http://a/1>; rel=\"x\"", "<http://a/2>; rel=\"y\", <http://a/3>; rel=\"z\""],
            &base("http://a/"),
        );
        assert_eq!(
            links.iter().map(LinkRecord::uri).collect::<Vec<_>>(),
            ["http://a/1", "http://a/2", "http://a/3"]
        );
    }

    #[test]
    fn quoted_comma_is_not_a_separator() {
        let links = parse_link_headers(
            ["<http://a/1>; title=\"one, not two\", <http://a/2>; rel=\"next\""],
            &base("http://a/"),
        );
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].param("title"), Some("one, not two"));
        assert_eq!(links[1].param("rel"), Some("next"));
    }

    #[test]
    fn quoted_semicolon_is_not_a_separator() {
        let links = parse_link_headers(
            ["<http://a/1>; title=\"a;b\"; rel=\"next\""],
            &base("http://a/"),
        );
        assert_eq!(links[0].param("title"), Some("a;b"));
        assert_eq!(links[0].param("rel"), Some("next"));
    }

    #[test]
    fn parameter_value_keeps_embedded_equals() {
        let links = parse_link_headers(
            ["<http://a/1>; rel=\"describedby\"; anchor=\"#foo=bar\""],
            &base("http://a/"),
        );
        assert_eq!(links[0].param("anchor"), Some("#foo=bar"));
    }

    #[test]
    fn equals_inside_target_is_not_a_parameter_separator() {
        let links = parse_link_headers(["<http://a/b?x=1>; rel=\"next\""], &base("http://a/"));
        assert_eq!(links[0].uri(), "http://a/b?x=1");
        assert_eq!(links[0].param("rel"), Some("next"));
    }

    #[test]
    fn empty_and_malformed_fragments_are_skipped() {
        let links = parse_link_headers(
            ["", " , rel=\"nothing\", <http://a/ok>; rel=\"x\""],
            &base("http://a/"),
        );
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].uri(), "http://a/ok");
    }

    #[test]
    fn unbalanced_quotes_are_tolerated() {
        // The dangling quote swallows the comma, the first link is still built
        let links = parse_link_headers(
            ["<http://a/1>; title=\"oops, <http://a/2>; rel=\"next\""],
            &base("http://a/"),
        );
        assert_eq!(links[0].uri(), "http://a/1");
    }

    #[test]
    fn parsing_is_idempotent() {
        let headers = [
            "<http://a/1>; rel=\"alternate\"; type=\"application/ld+json\", <ctx>; rel=\"http://www.w3.org/ns/json-ld#context\"",
        ];
        let first = parse_link_headers(headers, &base("http://a/"));
        let second = parse_link_headers(headers, &base("http://a/"));
        assert_eq!(first, second);
    }

    #[test]
    fn alternate_filter_requires_rel_and_type() {
        let links = parse_link_headers(
            [
                "<http://a/1>; rel=\"alternate\"; type=\"text/html\"",
                "<http://a/2>; rel=\"alternate\"; type=\"application/ld+json\"",
                "<http://a/3>; type=\"application/ld+json\"",
            ],
            &base("http://a/"),
        );
        let alternates: Vec<_> = alternate_links(&links).collect();
        assert_eq!(alternates.len(), 1);
        assert_eq!(alternates[0].uri(), "http://a/2");
    }

    #[test]
    fn context_filter_matches_rel_tokens() {
        let links = parse_link_headers(
            [
                "<http://a/1>; rel=\"describedby http://www.w3.org/ns/json-ld#context\"",
                "<http://a/2>; rel=\"describedby\"",
                // Case-sensitive, this one does not match
                "<http://a/3>; rel=\"http://www.w3.org/ns/json-ld#Context\"",
            ],
            &base("http://a/"),
        );
        let contexts: Vec<_> = context_links(&links).collect();
        assert_eq!(contexts.len(), 1);
        assert_eq!(contexts[0].uri(), "http://a/1");
    }
}
