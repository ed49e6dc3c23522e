use std::path::PathBuf;

use chrono::NaiveDateTime;

use crate::content::{Post, PostHeader, Project, ProjectHeader, Slug};
use crate::text_utils::parse_date_time;

pub const HELLO_POST: &str = r#"---
title: "Hello"
publishedAt: "2024-01-01"
summary: "First post"
---

Welcome to the blog! I write about deep level technical stuff, mostly
in software engineering and applied AI.

<Image src="/static/images/hello/banner.png" alt="banner" />
"#;

pub fn date(buf: &str) -> NaiveDateTime {
    parse_date_time(buf).unwrap()
}

pub fn post_source(title: &str, published_at: &str, summary: &str, tags: &[&str]) -> String {
    let tags: Vec<String> = tags.iter().map(|t| format!("\"{}\"", t)).collect();
    format!("---\ntitle: \"{}\"\npublishedAt: \"{}\"\nsummary: \"{}\"\ntags: [{}]\n---\n\nBody of {}\n",
            title, published_at, summary, tags.join(", "), title)
}

pub fn post_with(slug: &str, title: &str, summary: &str, published_at: &str, tags: &[&str]) -> Post {
    Post {
        file_name: PathBuf::from(format!("data/blog/{}.mdx", slug)),
        slug: Slug(slug.to_string()),
        header: PostHeader {
            title: title.to_string(),
            summary: summary.to_string(),
            published_at: date(published_at),
            updated_at: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            image: None,
            og: None,
        },
        body: format!("Body of {}", slug),
    }
}

pub fn make_post(slug: &str, published_at: &str, tags: &[&str]) -> Post {
    post_with(slug, &format!("Post {}", slug), &format!("Summary of {}", slug), published_at, tags)
}

pub fn sample_posts() -> Vec<Post> {
    vec![
        post_with("hello", "Hello", "First post", "2024-01-01", &[]),
        post_with("tokenizer", "Building a tokenizer", "Notes on writing a BPE tokenizer in C++", "2024-02-01", &["ai", "cpp"]),
        post_with("rust-ffi", "Calling C++ from Rust", "Safe bindings with cxx", "2024-03-01", &["rust", "cpp"]),
        post_with("cuda", "Writing CUDA kernels", "A first look at GPU programming", "2024-04-01", &["cpp", "gpu"]),
        post_with("transformers", "Transformers from scratch", "Attention is all you need, explained", "2024-05-01", &["ai"]),
    ]
}

pub fn make_project(slug: &str, time: Option<&str>) -> Project {
    Project {
        file_name: PathBuf::from(format!("data/projects/{}.mdx", slug)),
        slug: Slug(slug.to_string()),
        header: ProjectHeader {
            title: format!("Project {}", slug),
            description: format!("Description of {}", slug),
            time: time.map(|t| t.to_string()),
        },
        body: String::new(),
    }
}
