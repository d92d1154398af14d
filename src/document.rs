//! Document metadata attached to annotations, and URL resolution against
//! the page location.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::annotation::Annotation;

pub type MetaGroup = BTreeMap<String, Vec<String>>;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

impl Link {
    pub fn href(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            ..Self::default()
        }
    }
}

/// Metadata describing the annotated document. Groups the page does not
/// provide are left out entirely rather than serialised empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: String,
    pub link: Vec<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highwire: Option<MetaGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dc: Option<MetaGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<MetaGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<MetaGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eprints: Option<MetaGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prism: Option<MetaGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
}

pub trait DocumentSource {
    fn document_metadata(&self) -> Metadata;

    fn absolute_url(&self, path: &str) -> String;
}

/// Records the document's metadata on an annotation about to be created.
pub fn attach_document(annotation: &mut Annotation, source: &impl DocumentSource) {
    match serde_json::to_value(source.document_metadata()) {
        Ok(document) => {
            annotation.fields.insert("document".to_string(), document);
        }
        Err(err) => tracing::warn!(%err, "document metadata not serialisable"),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageLocation {
    /// Scheme including the trailing colon, e.g. `https:`.
    pub protocol: String,
    pub host: String,
    pub pathname: String,
}

impl PageLocation {
    pub fn new(protocol: &str, host: &str, pathname: &str) -> Self {
        Self {
            protocol: protocol.to_string(),
            host: host.to_string(),
            pathname: pathname.to_string(),
        }
    }

    pub fn origin(&self) -> String {
        format!("{}//{}", self.protocol, self.host)
    }

    pub fn absolute_url(&self, path: &str) -> String {
        static RE_SCHEME: OnceLock<Regex> = OnceLock::new();
        static RE_AUTHORITY: OnceLock<Regex> = OnceLock::new();
        static RE_LAST_SEGMENT: OnceLock<Regex> = OnceLock::new();

        let re_scheme =
            RE_SCHEME.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").unwrap());
        let re_authority = RE_AUTHORITY.get_or_init(|| {
            Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]*:)//([^/?#]*)(.*)$").unwrap()
        });
        let re_last_segment = RE_LAST_SEGMENT.get_or_init(|| Regex::new(r"[^/]*$").unwrap());

        let path = path.trim();
        let absolute = if path.starts_with("//") {
            format!("{}{path}", self.protocol)
        } else if re_scheme.is_match(path) {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{path}", self.origin())
        } else {
            let directory = re_last_segment.replace(&self.pathname, "");
            format!("{}{directory}{path}", self.origin())
        };

        match re_authority.captures(&absolute) {
            Some(cap) if cap[3].is_empty() => format!("{}//{}/", &cap[1], &cap[2]),
            _ => absolute,
        }
    }
}
