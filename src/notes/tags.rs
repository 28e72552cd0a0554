use std::cmp::Ordering;

/// A release tag placed on the version line
#[derive(Debug, Clone)]
pub struct TagVersion {
    pub name: String,
    pub beta: bool,
    base: Vec<u64>,
    beta_number: u64,
}

fn numbers(text: &str) -> Vec<u64> {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|part| !part.is_empty())
        .filter_map(|part| part.parse().ok())
        .collect()
}

fn trimmed(base: &[u64]) -> &[u64] {
    let end = base.iter().rposition(|n| *n != 0).map_or(0, |i| i + 1);
    &base[..end]
}

impl TagVersion {
    /// Classify a tag by prefix; tags outside both prefixes are not releases
    pub fn parse(tag: &str, prefix_beta: &str, prefix_release: &str) -> Option<Self> {
        if let Some(version) = tag.strip_prefix(prefix_beta) {
            // e.g. beta/1.2-Beta_3
            let lower = version.to_ascii_lowercase();
            let (base, beta_number) = match lower.find("beta") {
                Some(idx) => (
                    numbers(&version[..idx]),
                    numbers(&version[idx..]).first().copied().unwrap_or(0),
                ),
                None => (numbers(version), 0),
            };
            if base.is_empty() {
                return None;
            }
            return Some(Self {
                name: tag.to_string(),
                beta: true,
                base,
                beta_number,
            });
        }

        let version = tag.strip_prefix(prefix_release)?;
        let base = numbers(version);
        if base.is_empty() {
            return None;
        }
        Some(Self {
            name: tag.to_string(),
            beta: false,
            base,
            beta_number: 0,
        })
    }
}

impl Ord for TagVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        trimmed(&self.base)
            .cmp(trimmed(&other.base))
            // A production release ranks above its betas
            .then(self.beta.cmp(&other.beta).reverse())
            .then(self.beta_number.cmp(&other.beta_number))
    }
}

impl PartialEq for TagVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TagVersion {}

impl PartialOrd for TagVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The closest older tag on the same release line. Production tags follow
/// production tags; beta tags follow either.
pub fn previous_tag(
    current: &str,
    tags: &[String],
    prefix_beta: &str,
    prefix_release: &str,
) -> Option<String> {
    let current = TagVersion::parse(current, prefix_beta, prefix_release)?;

    tags.iter()
        .filter_map(|tag| TagVersion::parse(tag, prefix_beta, prefix_release))
        .filter(|tag| current.beta || !tag.beta)
        .filter(|tag| *tag < current)
        .max()
        .map(|tag| tag.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_version_ordering() {
        let v = |t: &str| TagVersion::parse(t, "beta/", "release/").unwrap();
        assert!(v("release/1.10") > v("release/1.9"));
        assert!(v("release/1.2") > v("beta/1.2-Beta_3"));
        assert!(v("beta/1.2-Beta_3") > v("beta/1.2-Beta_2"));
        assert!(v("beta/1.2-Beta_1") > v("release/1.1"));
        assert_eq!(v("release/1.2").cmp(&v("release/1.2.0")), Ordering::Equal);
        assert!(TagVersion::parse("v1.0", "beta/", "release/").is_none());
    }

    #[test]
    fn test_previous_production_tag_skips_betas() {
        let all = tags(&[
            "release/1.0",
            "beta/1.1-Beta_1",
            "release/1.1",
            "beta/1.2-Beta_1",
            "release/1.2",
            "unrelated",
        ]);
        assert_eq!(
            previous_tag("release/1.2", &all, "beta/", "release/").as_deref(),
            Some("release/1.1")
        );
    }

    #[test]
    fn test_previous_beta_tag() {
        let all = tags(&["release/1.1", "beta/1.2-Beta_1", "beta/1.2-Beta_2"]);
        assert_eq!(
            previous_tag("beta/1.2-Beta_2", &all, "beta/", "release/").as_deref(),
            Some("beta/1.2-Beta_1")
        );
        assert_eq!(
            previous_tag("beta/1.2-Beta_1", &all, "beta/", "release/").as_deref(),
            Some("release/1.1")
        );
    }

    #[test]
    fn test_first_release_has_no_previous() {
        let all = tags(&["release/1.0"]);
        assert_eq!(previous_tag("release/1.0", &all, "beta/", "release/"), None);
        assert_eq!(previous_tag("v2", &all, "beta/", "release/"), None);
    }
}
