//! Grouping of an account's blogs into equivalence classes

use std::collections::HashMap;

use crate::models::{Blog, EquivalenceKey};

/// Blogs sharing one equivalence key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquivalenceClass<'a> {
    pub key: EquivalenceKey,
    pub members: Vec<&'a Blog>,
}

impl EquivalenceClass<'_> {
    /// True when the class holds duplicates that need merging
    pub fn has_duplicates(&self) -> bool {
        self.members.len() > 1
    }
}

/// Partition blogs by equivalence key.
///
/// Classes come out in order of first appearance and members keep their
/// input order, so the result is deterministic for a given input. A blog with
/// neither a remote id nor an endpoint cannot be matched to anything and
/// always forms its own class.
pub fn classify(blogs: &[Blog]) -> Vec<EquivalenceClass<'_>> {
    let mut index: HashMap<EquivalenceKey, usize> = HashMap::new();
    let mut classes: Vec<EquivalenceClass<'_>> = Vec::new();

    for blog in blogs {
        let key = blog.equivalence_key();
        if !key.is_identifiable() {
            classes.push(EquivalenceClass {
                key,
                members: vec![blog],
            });
            continue;
        }

        if let Some(&slot) = index.get(&key) {
            classes[slot].members.push(blog);
        } else {
            index.insert(key.clone(), classes.len());
            classes.push(EquivalenceClass {
                key,
                members: vec![blog],
            });
        }
    }

    classes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountId, RemoteId};
    use pretty_assertions::assert_eq;

    fn sizes(classes: &[EquivalenceClass<'_>]) -> Vec<usize> {
        classes.iter().map(|class| class.members.len()).collect()
    }

    #[test]
    fn test_classify_empty() {
        assert!(classify(&[]).is_empty());
    }

    #[test]
    fn test_unique_blogs_form_singletons() {
        let account = AccountId::new();
        let blogs: Vec<Blog> = (1..=3)
            .map(|id| Blog::new(account).with_remote_id(RemoteId(id)))
            .collect();

        let classes = classify(&blogs);
        assert_eq!(sizes(&classes), vec![1, 1, 1]);
        assert!(classes.iter().all(|class| !class.has_duplicates()));
    }

    #[test]
    fn test_duplicates_grouped_in_first_seen_order() {
        let account = AccountId::new();
        let blogs = vec![
            Blog::new(account).with_remote_id(RemoteId(1)),
            Blog::new(account).with_remote_id(RemoteId(2)),
            Blog::new(account).with_remote_id(RemoteId(2)),
        ];

        let classes = classify(&blogs);
        assert_eq!(sizes(&classes), vec![1, 2]);
        assert_eq!(classes[1].key.remote_id, Some(RemoteId(2)));
        assert_eq!(classes[1].members[0].id, blogs[1].id);
        assert_eq!(classes[1].members[1].id, blogs[2].id);
    }

    #[test]
    fn test_self_hosted_grouped_by_canonical_endpoint() {
        let account = AccountId::new();
        let blogs = vec![
            Blog::new(account).with_xmlrpc("https://Example.com/xmlrpc.php"),
            Blog::new(account).with_xmlrpc("https://example.com/xmlrpc.php/"),
            Blog::new(account).with_xmlrpc("https://other.example/xmlrpc.php"),
        ];

        assert_eq!(sizes(&classify(&blogs)), vec![2, 1]);
    }

    #[test]
    fn test_endpoint_spellings_of_one_site_grouped() {
        let account = AccountId::new();
        let blogs = vec![
            Blog::new(account).with_xmlrpc("https://example.com:/xmlrpc.php"),
            Blog::new(account).with_xmlrpc("https://example.com/xmlrpc.php"),
            Blog::new(account).with_xmlrpc("http://[::1]:80/xmlrpc.php"),
            Blog::new(account).with_xmlrpc("http://[::1]/xmlrpc.php"),
            Blog::new(account).with_xmlrpc("https://user:pw@Example.com/xmlrpc.php"),
            Blog::new(account).with_xmlrpc("https://user:pw@example.com/xmlrpc.php"),
        ];

        assert_eq!(sizes(&classify(&blogs)), vec![2, 2, 2]);
    }

    #[test]
    fn test_unidentifiable_blogs_never_grouped() {
        let account = AccountId::new();
        let blogs = vec![Blog::new(account), Blog::new(account)];

        assert_eq!(sizes(&classify(&blogs)), vec![1, 1]);
    }

    #[test]
    fn test_same_remote_id_different_endpoint_not_grouped() {
        let account = AccountId::new();
        let blogs = vec![
            Blog::new(account)
                .with_remote_id(RemoteId(5))
                .with_xmlrpc("https://a.example/xmlrpc.php"),
            Blog::new(account)
                .with_remote_id(RemoteId(5))
                .with_xmlrpc("https://b.example/xmlrpc.php"),
        ];

        assert_eq!(sizes(&classify(&blogs)), vec![1, 1]);
    }
}
