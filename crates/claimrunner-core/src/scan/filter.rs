//! Candidate filtering against known claims.

use std::collections::BTreeSet;

use url::Url;

use claimrunner_protocols::{dedup_by_href, ClaimId, LinkCandidate};

/// Keep candidates without an id, and those whose id is claimed neither in
/// `persisted` nor on the page. Order is preserved after href dedup.
pub fn filter_unclaimed(
    candidates: Vec<LinkCandidate>,
    persisted: &BTreeSet<ClaimId>,
    page_claimed: &[ClaimId],
) -> Vec<LinkCandidate> {
    dedup_by_href(candidates)
        .into_iter()
        .filter(|c| match c.id {
            None => true,
            Some(id) => !persisted.contains(&id) && !page_claimed.contains(&id),
        })
        .collect()
}

/// Whether `url` is on `target_host` or one of its subdomains.
///
/// Returns `None` when the URL does not parse or has no host.
pub fn host_matches(url: &str, target_host: &str) -> Option<bool> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    let target = target_host.trim().trim_end_matches('.').to_ascii_lowercase();
    Some(host == target || host.ends_with(&format!(".{}", target)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(href: &str, id: Option<ClaimId>) -> LinkCandidate {
        LinkCandidate::new(href, id)
    }

    #[test]
    fn test_filter_rule_fixture() {
        let persisted: BTreeSet<ClaimId> = [10].into_iter().collect();
        let retained = filter_unclaimed(
            vec![c("a", Some(10)), c("b", Some(20)), c("c", Some(30)), c("d", None)],
            &persisted,
            &[20],
        );
        assert_eq!(retained, vec![c("c", Some(30)), c("d", None)]);
    }

    #[test]
    fn test_filter_dedups_by_href() {
        let retained = filter_unclaimed(
            vec![c("x", Some(1)), c("y", None), c("x", Some(2))],
            &BTreeSet::new(),
            &[1],
        );
        assert_eq!(retained, vec![c("x", Some(2)), c("y", None)]);
    }

    #[test]
    fn test_host_matches() {
        assert_eq!(host_matches("https://wplace.live/?lat=1", "wplace.live"), Some(true));
        assert_eq!(host_matches("https://backend.wplace.live/x", "wplace.live"), Some(true));
        assert_eq!(host_matches("https://WPLACE.live/", "wplace.live"), Some(true));
        assert_eq!(host_matches("https://notwplace.live/", "wplace.live"), Some(false));
        assert_eq!(host_matches("https://example.com/", "wplace.live"), Some(false));
        assert_eq!(host_matches("not a url", "wplace.live"), None);
        assert_eq!(host_matches("about:blank", "wplace.live"), None);
    }
}
