use crate::link::LinkRecord;
use std::error::Error;

/// Error returned when loading a remote JSON-LD document fails.
#[derive(Debug, thiserror::Error)]
pub enum JsonLdLoaderError {
    /// The HTTP client failed at the transport level before a response
    /// could be read, or the requested URL is not a valid IRI.
    #[error("Unable to load the remote document '{url}': {message}")]
    LoadingDocumentFailed {
        /// The URL the request was addressed to.
        url: String,
        /// The message of the underlying transport error.
        message: String,
    },
    /// The response media type is not a JSON-LD compatible one and no
    /// usable alternate link is advertised.
    #[error("Invalid media type '{media_type}'")]
    InvalidMediaType {
        /// The response content type, with parameters stripped.
        media_type: String,
    },
    /// More than one `Link` header uses the JSON-LD context relation,
    /// making the external context ambiguous.
    #[error("Found multiple contexts in HTTP Link headers")]
    MultipleContextLinkHeaders {
        /// The conflicting link records.
        links: Vec<LinkRecord>,
    },
    /// The document parser rejected the response body.
    #[error("Failed to parse the remote document '{url}': {error}")]
    DocumentParsing {
        /// The URL the document was fetched from.
        url: String,
        #[source]
        error: Box<dyn Error + Send + Sync>,
    },
}

impl JsonLdLoaderError {
    /// The [JSON-LD API error code](https://www.w3.org/TR/json-ld11-api/#jsonlderrorcode)
    /// of this error.
    pub const fn code(&self) -> JsonLdLoaderErrorCode {
        match self {
            Self::LoadingDocumentFailed { .. }
            | Self::InvalidMediaType { .. }
            | Self::DocumentParsing { .. } => JsonLdLoaderErrorCode::LoadingDocumentFailed,
            Self::MultipleContextLinkHeaders { .. } => {
                JsonLdLoaderErrorCode::MultipleContextLinkHeaders
            }
        }
    }
}

/// [JSON-LD API error code](https://www.w3.org/TR/json-ld11-api/#jsonlderrorcode)
/// attached to a [`JsonLdLoaderError`].
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
#[non_exhaustive]
pub enum JsonLdLoaderErrorCode {
    /// The document could not be loaded or parsed as JSON.
    LoadingDocumentFailed,
    /// Multiple HTTP Link headers using the JSON-LD context relation.
    MultipleContextLinkHeaders,
}

impl JsonLdLoaderErrorCode {
    /// The canonical error code string.
    ///
    /// ```
    /// use oxldloader::JsonLdLoaderErrorCode;
    ///
    /// assert_eq!(
    ///     JsonLdLoaderErrorCode::LoadingDocumentFailed.as_str(),
    ///     "loading document failed"
    /// )
    /// ```
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LoadingDocumentFailed => "loading document failed",
            Self::MultipleContextLinkHeaders => "multiple context link headers",
        }
    }
}
