//! Template reference parsing.
//!
//! A reference is 1–3 slash-separated segments. Segment roles are decided by
//! whether each segment is UUID-shaped; ambiguous references fail fast
//! instead of guessing.

use std::sync::LazyLock;

use regex::Regex;

use crate::{Error, Result};

/// Scheme prefixes the host tool registers for this loader.
pub const SCHEMES: &[&str] = &["lat", "lat-http"];

static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("valid uuid pattern")
});

/// Check whether a segment is UUID-shaped (8-4-4-4-12 hex, case-insensitive).
pub fn is_uuid_like(value: &str) -> bool {
    UUID_RE.is_match(value)
}

/// A parsed template reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateRef {
    /// A single document to fetch.
    Document {
        project: Option<String>,
        /// Version UUID; `None` targets the live version.
        version: Option<String>,
        path: String,
    },
    /// All documents in a version.
    Listing {
        project: Option<String>,
        version: String,
    },
}

impl TemplateRef {
    /// Parse a raw reference, stripping a known scheme prefix if present.
    ///
    /// - `project_id/version_uuid/document_path` — document lookup
    /// - `version_uuid/document_path` — document lookup, no project id
    /// - `project_id/version_uuid` — listing
    /// - `version_uuid` — listing, no project id
    /// - `document_path` — live-version document lookup, no project id
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = strip_scheme(raw);
        if raw.is_empty() {
            return Err(Error::Parse("empty template reference".into()));
        }

        let parts: Vec<&str> = raw.split('/').collect();
        if parts.iter().any(|part| part.is_empty()) {
            return Err(Error::Parse(format!(
                "'{raw}' contains an empty segment; \
                 use 'project_id/version_uuid/document_path'"
            )));
        }
        match parts.as_slice() {
            [single] => {
                if is_uuid_like(single) {
                    Ok(TemplateRef::Listing {
                        project: None,
                        version: (*single).to_string(),
                    })
                } else {
                    Ok(TemplateRef::Document {
                        project: None,
                        version: None,
                        path: (*single).to_string(),
                    })
                }
            }
            [first, second] => {
                if is_uuid_like(first) {
                    Ok(TemplateRef::Document {
                        project: None,
                        version: Some((*first).to_string()),
                        path: (*second).to_string(),
                    })
                } else if is_uuid_like(second) {
                    Ok(TemplateRef::Listing {
                        project: Some((*first).to_string()),
                        version: (*second).to_string(),
                    })
                } else {
                    Err(Error::Parse(format!(
                        "'{raw}' is ambiguous: expected a version UUID in \
                         'project_id/version_uuid' or 'version_uuid/document_path'"
                    )))
                }
            }
            [project, version, rest @ ..] => {
                if !is_uuid_like(version) {
                    return Err(Error::Parse(format!(
                        "'{version}' is not a version UUID; \
                         use 'project_id/version_uuid/document_path'"
                    )));
                }
                Ok(TemplateRef::Document {
                    project: Some((*project).to_string()),
                    version: Some((*version).to_string()),
                    path: rest.join("/"),
                })
            }
            [] => unreachable!("split always yields at least one part"),
        }
    }

    /// Project id, when the reference carries one.
    pub fn project(&self) -> Option<&str> {
        match self {
            TemplateRef::Document { project, .. } | TemplateRef::Listing { project, .. } => {
                project.as_deref()
            }
        }
    }

    /// Whether the project id is numeric. Latitude project ids are numbers;
    /// anything else got assigned the project role by position only and may
    /// actually belong to the document path.
    pub fn has_numeric_project(&self) -> bool {
        self.project()
            .is_some_and(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
    }
}

pub(crate) fn strip_scheme(raw: &str) -> &str {
    for scheme in SCHEMES {
        if let Some(rest) = raw.strip_prefix(scheme) {
            if let Some(rest) = rest.strip_prefix(':') {
                return rest;
            }
        }
    }
    raw
}
