//! Choice of the blog kept when a class is merged

use std::cmp::Reverse;

use crate::models::Blog;

use super::ReplicaSet;

/// The kept blog of a class and the ones to fold into it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<'a> {
    pub survivor: &'a Blog,
    pub losers: Vec<&'a Blog>,
}

/// Pick the survivor of a duplicate class.
///
/// The blog holding the most local-only posts wins, since those posts cannot
/// be fetched again. Ties go to the earliest created blog, then the lowest
/// id, which makes the choice independent of member order. Returns `None`
/// for classes with fewer than two members.
pub fn select_survivor<'a>(members: &[&'a Blog], set: &ReplicaSet) -> Option<Selection<'a>> {
    if members.len() < 2 {
        return None;
    }

    let survivor = members
        .iter()
        .copied()
        .max_by_key(|blog| {
            (
                set.local_only_count(&blog.id),
                Reverse(blog.created_at),
                Reverse(blog.id),
            )
        })?;

    let losers = members
        .iter()
        .copied()
        .filter(|blog| blog.id != survivor.id)
        .collect();

    Some(Selection { survivor, losers })
}
