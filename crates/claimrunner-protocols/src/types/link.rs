//! Link candidates and start-list entries.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::ClaimId;

/// A link scraped from the page with a best-effort item id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCandidate {
    pub href: String,
    pub id: Option<ClaimId>,
}

impl LinkCandidate {
    pub fn new(href: impl Into<String>, id: Option<ClaimId>) -> Self {
        Self {
            href: href.into(),
            id,
        }
    }

    /// Render the candidate as a start-list line (`href  #id=n`).
    pub fn to_line(&self) -> String {
        match self.id {
            Some(id) => format!("{}  #id={}", self.href, id),
            None => self.href.clone(),
        }
    }
}

/// Deduplicate candidates by `href`.
///
/// The first occurrence keeps its position; the last occurrence's id wins.
pub fn dedup_by_href(candidates: Vec<LinkCandidate>) -> Vec<LinkCandidate> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<LinkCandidate> = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        if candidate.href.is_empty() {
            continue;
        }
        match index.get(&candidate.href) {
            Some(&pos) => out[pos].id = candidate.id,
            None => {
                index.insert(candidate.href.clone(), out.len());
                out.push(candidate);
            }
        }
    }

    out
}

/// One entry of a run's URL list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetUrl {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ClaimId>,
}

impl TargetUrl {
    /// Parse one line of a start list.
    ///
    /// Accepts a bare URL or a URL followed by whitespace and `#id=<n>`.
    /// Returns `None` for blank lines.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        if let Some((head, tail)) = line.rsplit_once("#id=") {
            if head.ends_with(char::is_whitespace) {
                let id = tail.trim().parse::<u64>().ok().filter(|v| *v > 0);
                let url = head.trim();
                if !url.is_empty() {
                    return Some(Self {
                        url: url.to_string(),
                        id,
                    });
                }
            }
        }

        Some(Self {
            url: line.to_string(),
            id: None,
        })
    }

    /// Parse a whole list, dropping blank lines.
    pub fn parse_list<S: AsRef<str>>(lines: &[S]) -> Vec<Self> {
        lines
            .iter()
            .flat_map(|l| l.as_ref().lines().map(str::to_string).collect::<Vec<_>>())
            .filter_map(|l| Self::parse(&l))
            .collect()
    }
}
