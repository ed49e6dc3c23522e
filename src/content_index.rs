use std::collections::{HashMap, HashSet};
use std::io;
use std::io::ErrorKind;
use std::path::Path;

use spdlog::debug;

use crate::content::loader::{load_posts, LoadOptions};
use crate::content::{Post, Slug};

/// Number of posts shown under "Related posts".
pub const RELATED_LIMIT: usize = 3;

/// Immutable set of posts, newest first.
///
/// Built once per run and shared by reference; every query borrows from it.
#[derive(Debug, Clone, Default)]
pub struct ContentIndex {
    posts: Vec<Post>,
}

/// Narrowing applied by [`ContentIndex::list`], in field order:
/// tag, then text, then count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub tag: Option<String>,
    pub search: Option<String>,
    pub latest: Option<usize>,
}

impl ContentIndex {
    /// Fails with `InvalidData` when two posts share a slug.
    pub fn new(posts: Vec<Post>) -> io::Result<Self> {
        let mut seen: HashSet<&Slug> = HashSet::with_capacity(posts.len());
        for post in posts.iter() {
            if !seen.insert(&post.slug) {
                return Err(io::Error::new(ErrorKind::InvalidData,
                                          format!("Duplicate slug {} - file={}", post.slug, post.file_name.display())));
            }
        }

        let mut posts = posts;
        sort_by_date(&mut posts);
        Ok(ContentIndex { posts })
    }

    /// Loads every content file of `content_dir`. Invalid files follow
    /// `options.on_invalid`, a missing directory is always an error.
    pub fn load(content_dir: &Path, options: &LoadOptions) -> io::Result<Self> {
        let loaded = load_posts(content_dir, options)?;
        debug!("Loaded {} posts from {} ({} skipped)", loaded.items.len(), content_dir.display(), loaded.skipped.len());
        Self::new(loaded.items)
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// All posts, newest first.
    pub fn chronological(&self) -> &[Post] {
        &self.posts
    }

    /// The `count` newest posts, or all of them if there are fewer.
    pub fn latest(&self, count: usize) -> &[Post] {
        let end = count.min(self.posts.len());
        &self.posts[..end]
    }

    pub fn search(&self, query: &str) -> Vec<&Post> {
        filter_by_text(&self.posts, query)
    }

    pub fn related(&self, reference: &Post) -> Vec<&Post> {
        related(reference, &self.posts)
    }

    pub fn find(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|post| post.slug.as_str() == slug)
    }

    pub fn slugs(&self) -> Vec<&Slug> {
        self.posts.iter().map(|post| &post.slug).collect()
    }

    pub fn with_tag(&self, tag: &str) -> Vec<&Post> {
        self.posts.iter()
            .filter(|post| post.tags().iter().any(|t| t == tag))
            .collect()
    }

    /// Posts matching every set part of `query`, newest first.
    pub fn list(&self, query: &ListQuery) -> Vec<&Post> {
        let mut posts: Vec<&Post> = match query.tag {
            Some(ref tag) => self.with_tag(tag),
            None => self.posts.iter().collect(),
        };
        if let Some(ref text) = query.search {
            posts = filter_by_text(posts, text);
        }
        if let Some(latest) = query.latest {
            posts.truncate(latest);
        }
        posts
    }

    /// Tags with their number of posts, most used first.
    pub fn tags(&self) -> Vec<(String, usize)> {
        let mut tag_map: HashMap<&str, usize> = HashMap::new();
        for post in self.posts.iter() {
            for tag in post.tags() {
                *tag_map.entry(tag.as_str()).or_insert(0) += 1;
            }
        }

        let mut tag_list: Vec<(String, usize)> = tag_map.into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        tag_list.sort_by(|(ka, va), (kb, vb)| vb.cmp(va).then_with(|| ka.cmp(kb)));
        tag_list
    }
}

/// Newest first. The sort is stable, equal dates keep their input order.
pub fn sort_by_date(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.published_at().cmp(a.published_at()));
}

/// Case insensitive substring match over title, summary and tags.
/// An empty query keeps everything.
pub fn filter_by_text<'a, I>(posts: I, query: &str) -> Vec<&'a Post>
where
    I: IntoIterator<Item = &'a Post>,
{
    let query = query.to_lowercase();
    posts.into_iter()
        .filter(|post| search_text(post).contains(&query))
        .collect()
}

fn search_text(post: &Post) -> String {
    format!("{} {} {}", post.title(), post.summary(), post.tags().join(" ")).to_lowercase()
}

/// Up to [`RELATED_LIMIT`] posts sharing a tag with `reference`, in the
/// order they come in. The reference itself is matched by slug and left out.
pub fn related<'a, I>(reference: &Post, posts: I) -> Vec<&'a Post>
where
    I: IntoIterator<Item = &'a Post>,
{
    posts.into_iter()
        .filter(|post| post.slug != reference.slug)
        .filter(|post| post.shares_tag_with(reference))
        .take(RELATED_LIMIT)
        .collect()
}
