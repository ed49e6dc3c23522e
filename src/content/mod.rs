use std::fmt;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use chrono::NaiveDateTime;

use crate::text_utils::post_url;

pub mod content_file;
pub mod front_matter;
pub mod loader;

/// Identity of a post. Derived from the file name, used as URL segment.
#[derive(Debug, Clone, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub struct Slug(pub String);

impl Slug {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for Slug {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated front matter of a content file.
#[derive(Debug, Clone, PartialEq)]
pub struct PostHeader {
    pub title: String,
    pub summary: String,
    pub published_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
    pub tags: Vec<String>,
    pub image: Option<String>,
    pub og: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub file_name: PathBuf,
    pub slug: Slug,
    pub header: PostHeader,
    pub body: String,
}

impl Post {
    pub fn title(&self) -> &str {
        &self.header.title
    }

    pub fn summary(&self) -> &str {
        &self.header.summary
    }

    pub fn published_at(&self) -> &NaiveDateTime {
        &self.header.published_at
    }

    pub fn tags(&self) -> &[String] {
        &self.header.tags
    }

    pub fn was_updated(&self) -> bool {
        self.header.updated_at.is_some()
    }

    /// Image for social previews, `og` wins over `image`.
    pub fn social_image(&self) -> Option<&str> {
        self.header.og.as_deref().or(self.header.image.as_deref())
    }

    pub fn canonical_url(&self, site_url: &str) -> String {
        post_url(site_url, self.slug.as_str())
    }

    pub fn shares_tag_with(&self, other: &Post) -> bool {
        self.tags().iter().any(|tag| other.tags().contains(tag))
    }
}

impl Display for Post {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "slug={}, date={}, tags=[{}]\ntitle={}\nsummary={}",
               self.slug,
               self.header.published_at,
               self.header.tags.join(", "),
               self.header.title,
               self.header.summary,
        )
    }
}

/// Front matter of a project page.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectHeader {
    pub title: String,
    pub description: String,
    pub time: Option<String>,
}

/// Portfolio entry, shown on the home page. Keyed by slug like posts.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub file_name: PathBuf,
    pub slug: Slug,
    pub header: ProjectHeader,
    pub body: String,
}

impl Project {
    pub fn title(&self) -> &str {
        &self.header.title
    }

    pub fn description(&self) -> &str {
        &self.header.description
    }
}

/// One `<item>` of the syndication feed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub title: String,
    pub url: String,
    pub date: NaiveDateTime,
    pub description: String,
}

impl FeedItem {
    pub fn new(site_url: &str, slug: &Slug, header: PostHeader) -> FeedItem {
        FeedItem {
            url: post_url(site_url, slug.as_str()),
            title: header.title,
            date: header.published_at,
            description: header.summary,
        }
    }
}
