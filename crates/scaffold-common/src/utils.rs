//! Shared utility functions.

use crate::error::{Result, ScaffoldError};
use url::Url;

/// Extracts the file name a URL points at.
///
/// The name is the last path segment; the query string and fragment are
/// dropped. Fails when the URL does not parse or has no usable segment.
pub fn filename_from_url(raw: &str) -> Result<String> {
    let url = Url::parse(raw)?;
    let name = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();

    if name.is_empty() || name == "." || name == ".." {
        return Err(ScaffoldError::validation_field(
            format!("URL {raw} does not name a file"),
            "url",
        ));
    }

    Ok(name.to_string())
}
