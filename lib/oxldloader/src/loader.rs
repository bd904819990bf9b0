use crate::MAX_ALTERNATE_HOPS;
use crate::error::JsonLdLoaderError;
use crate::link::{LinkRecord, alternate_links, context_links, parse_link_headers};
use oxiri::Iri;
use std::error::Error;

/// The canonical JSON-LD media type.
pub const JSON_LD_MEDIA_TYPE: &str = "application/ld+json";

/// Plain JSON, accepted as a compatible fallback for JSON-LD content.
pub const JSON_MEDIA_TYPE: &str = "application/json";

const ACCEPT: &str = "application/ld+json, application/json; q=0.9, */*; q=0.1";
const USER_AGENT: &str = concat!("oxldloader/", env!("CARGO_PKG_VERSION"));

/// The HTTP GET request a [`DocumentFetcher`] is asked to perform.
#[derive(Debug)]
pub struct DocumentRequest<'a> {
    /// Target URL of the request.
    pub url: &'a str,
    /// Value for the `Accept` header.
    pub accept: &'a str,
    /// Value for the `User-Agent` header.
    pub user_agent: &'a str,
}

/// The parts of an HTTP response the loader reads.
#[derive(Debug, Default)]
pub struct FetchedResponse {
    /// The combined `Content-Type` header line, empty if absent.
    pub content_type: String,
    /// All `Link` header values, in response order.
    pub link_headers: Vec<String>,
    /// The response body.
    pub body: Vec<u8>,
}

/// Minimal HTTP transport contract used by [`JsonLdDocumentLoader`].
///
/// Implementations are in charge of redirects, TLS, timeouts and retries.
/// An `Err` signals a transport-level failure, a response with a non-2xx
/// status is not one: the loader only branches on the content type and the
/// `Link` headers.
pub trait DocumentFetcher {
    fn fetch(
        &self,
        request: &DocumentRequest<'_>,
    ) -> Result<FetchedResponse, Box<dyn Error + Send + Sync>>;
}

/// Turns a fetched response body into the document value handed to the
/// caller.
pub trait DocumentParser {
    type Document;

    fn parse(&self, body: &[u8], url: &str) -> Result<Self::Document, Box<dyn Error + Send + Sync>>;
}

/// A remote document retrieved by [`JsonLdDocumentLoader::load_document`].
#[derive(Debug)]
pub struct JsonLdRemoteDocument<D> {
    /// The retrieved document.
    pub document: D,
    /// The URL the document was actually fetched from, after any
    /// alternate-link fallback.
    pub document_url: String,
    /// The response media type, with parameters such as `profile=` stripped.
    pub media_type: String,
    /// An external context associated with the document through an HTTP
    /// `Link` header.
    ///
    /// Never set for `application/ld+json` responses: a JSON-LD document
    /// carries its own context.
    pub context_url: Option<String>,
}

/// Loads remote JSON-LD documents over HTTP, handling content negotiation
/// and `Link` header metadata.
///
/// Holds only immutable references to its collaborators and is safe to
/// share across independent calls.
pub struct JsonLdDocumentLoader<F, P> {
    fetcher: F,
    parser: P,
    max_alternate_hops: usize,
}

impl<F: DocumentFetcher, P: DocumentParser> JsonLdDocumentLoader<F, P> {
    /// Builds a loader from explicit transport and parser collaborators.
    #[inline]
    pub fn new(fetcher: F, parser: P) -> Self {
        Self {
            fetcher,
            parser,
            max_alternate_hops: MAX_ALTERNATE_HOPS,
        }
    }

    /// Resolves `url` into a [`JsonLdRemoteDocument`].
    ///
    /// Performs one HTTP GET. If the response does not carry an acceptable
    /// media type but advertises an `application/ld+json` alternate link,
    /// the alternate URL is loaded instead. The number of alternate hops is
    /// bounded, guarding against alternate cycles.
    pub fn load_document(
        &self,
        url: &str,
    ) -> Result<JsonLdRemoteDocument<P::Document>, JsonLdLoaderError> {
        self.load_with_hop_budget(url, self.max_alternate_hops)
    }

    fn load_with_hop_budget(
        &self,
        url: &str,
        remaining_hops: usize,
    ) -> Result<JsonLdRemoteDocument<P::Document>, JsonLdLoaderError> {
        let base = Iri::parse(url.to_owned()).map_err(|e| {
            JsonLdLoaderError::LoadingDocumentFailed {
                url: url.to_owned(),
                message: e.to_string(),
            }
        })?;
        let response = self
            .fetcher
            .fetch(&DocumentRequest {
                url,
                accept: ACCEPT,
                user_agent: USER_AGENT,
            })
            .map_err(|e| JsonLdLoaderError::LoadingDocumentFailed {
                url: url.to_owned(),
                message: e.to_string(),
            })?;
        let links = parse_link_headers(response.link_headers.iter().map(String::as_str), &base);
        if !is_acceptable_media_type(&response.content_type) {
            // The expected type might still be offered through an alternate
            // link for content negotiation (this is what schema.org does)
            if let Some(alternate) = alternate_links(&links).next() {
                if remaining_hops == 0 {
                    let max_alternate_hops = self.max_alternate_hops;
                    return Err(JsonLdLoaderError::LoadingDocumentFailed {
                        url: url.to_owned(),
                        message: format!(
                            "More than {max_alternate_hops} alternate document links followed"
                        ),
                    });
                }
                return self.load_with_hop_budget(alternate.uri(), remaining_hops - 1);
            }
            return Err(JsonLdLoaderError::InvalidMediaType {
                media_type: normalize_media_type(&response.content_type).to_owned(),
            });
        }
        let context_link_records: Vec<LinkRecord> = context_links(&links).cloned().collect();
        if context_link_records.len() > 1 {
            return Err(JsonLdLoaderError::MultipleContextLinkHeaders {
                links: context_link_records,
            });
        }
        let media_type = normalize_media_type(&response.content_type).to_owned();
        let context_url = if media_type == JSON_LD_MEDIA_TYPE {
            // A JSON-LD document carries its own context, the link is ignored
            None
        } else {
            context_link_records
                .into_iter()
                .next()
                .map(|record| record.uri().to_owned())
        };
        let document = self
            .parser
            .parse(&response.body, url)
            .map_err(|error| JsonLdLoaderError::DocumentParsing {
                url: url.to_owned(),
                error,
            })?;
        Ok(JsonLdRemoteDocument {
            document,
            document_url: url.to_owned(),
            media_type,
            context_url,
        })
    }
}

#[cfg(feature = "http-client")]
impl JsonLdDocumentLoader<crate::client::Client, crate::json::JsonNodeParser> {
    /// Builds a loader backed by the built-in [oxhttp](https://crates.io/crates/oxhttp)
    /// client and the [`JsonNode`](crate::JsonNode) tree parser.
    pub fn from_http_defaults(
        timeout: Option<std::time::Duration>,
        redirection_limit: usize,
    ) -> Self {
        Self::new(
            crate::client::Client::new(timeout, redirection_limit),
            crate::json::JsonNodeParser,
        )
    }
}

/// Strips media type parameters such as `profile=` and surrounding
/// whitespace.
///
/// ```
/// use oxldloader::normalize_media_type;
///
/// assert_eq!(
///     normalize_media_type("application/ld+json; charset=utf-8"),
///     "application/ld+json"
/// )
/// ```
pub fn normalize_media_type(raw: &str) -> &str {
    raw.split_once(';').map_or(raw, |(media_type, _)| media_type).trim()
}

/// Checks that a `Content-Type` value is JSON-LD compatible
/// (`application/ld+json` or `application/json`), ignoring parameters.
pub fn is_acceptable_media_type(raw: &str) -> bool {
    matches!(
        normalize_media_type(raw),
        JSON_LD_MEDIA_TYPE | JSON_MEDIA_TYPE
    )
}
