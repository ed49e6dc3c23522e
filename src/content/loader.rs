use std::collections::HashSet;
use std::io;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Deserialize;
use spdlog::{debug, warn};

use crate::content::content_file::ContentFile;
use crate::content::front_matter::{parse_front_matter, parse_project_matter};
use crate::content::{Post, PostHeader, Project, Slug};
use crate::post_list::PostList;

/// What to do with a content file whose front matter can't be used.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvalidPolicy {
    /// Leave the file out and log a warning
    #[default]
    Skip,
    /// Abort the whole run with the first error, in path order
    Fail,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct LoadOptions {
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub on_invalid: InvalidPolicy,
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_string(), "mdx".to_string()]
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            extensions: default_extensions(),
            on_invalid: InvalidPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Skipped {
    pub file_name: PathBuf,
    pub reason: String,
}

pub struct Loaded<T> {
    pub items: Vec<T>,
    pub skipped: Vec<Skipped>,
}

/// Full posts, body included. Used by the content index.
pub fn load_posts(content_dir: &Path, options: &LoadOptions) -> io::Result<Loaded<Post>> {
    load_with(content_dir, options, |file| {
        let (header, body) = parse_front_matter(&file.file_path, &file.raw_content)?;
        Ok(Post {
            header,
            body: body.to_string(),
            slug: file.slug,
            file_name: file.file_path,
        })
    }, |post| &post.slug)
}

/// Headers only, the body is never copied out. Used by the feed.
pub fn load_headers(content_dir: &Path, options: &LoadOptions) -> io::Result<Loaded<(Slug, PostHeader)>> {
    load_with(content_dir, options, |file| {
        let (header, _body) = parse_front_matter(&file.file_path, &file.raw_content)?;
        Ok((file.slug, header))
    }, |(slug, _)| slug)
}

/// Project pages, in file name order.
pub fn load_projects(projects_dir: &Path, options: &LoadOptions) -> io::Result<Loaded<Project>> {
    load_with(projects_dir, options, |file| {
        let (header, body) = parse_project_matter(&file.file_path, &file.raw_content)?;
        Ok(Project {
            header,
            body: body.to_string(),
            slug: file.slug,
            file_name: file.file_path,
        })
    }, |project| &project.slug)
}

fn load_with<T, F, K>(content_dir: &Path, options: &LoadOptions, parse: F, slug_of: K) -> io::Result<Loaded<T>>
where
    T: Send,
    F: Fn(ContentFile) -> io::Result<T> + Sync,
    K: Fn(&T) -> &Slug,
{
    let post_list = PostList {
        root_dir: content_dir,
        extensions: &options.extensions,
    };
    let files = post_list.retrieve_files()?;
    debug!("Found {} content files in {}", files.len(), content_dir.display());

    // Reads run in parallel, collect keeps the path order
    let results: Vec<(PathBuf, io::Result<T>)> = files
        .into_par_iter()
        .map(|path| {
            let res = ContentFile::from_file(path.clone())
                .map_err(|e| io::Error::new(e.kind(), format!("{} - file={}", e, path.display())))
                .and_then(&parse);
            (path, res)
        })
        .collect();

    apply_policy(results, options.on_invalid, slug_of)
}

fn apply_policy<T, K>(results: Vec<(PathBuf, io::Result<T>)>, policy: InvalidPolicy, slug_of: K) -> io::Result<Loaded<T>>
where
    K: Fn(&T) -> &Slug,
{
    let mut seen: HashSet<Slug> = HashSet::new();
    let mut items = vec![];
    let mut skipped = vec![];

    for (path, res) in results {
        let res = res.and_then(|item| {
            let slug = slug_of(&item).clone();
            if seen.insert(slug.clone()) {
                Ok(item)
            } else {
                Err(io::Error::new(ErrorKind::InvalidData, format!("Duplicate slug {} - file={}", slug, path.display())))
            }
        });

        match res {
            Ok(item) => items.push(item),
            Err(e) => match policy {
                InvalidPolicy::Fail => return Err(e),
                InvalidPolicy::Skip => {
                    warn!("Skipping content file {}: {}", path.display(), e);
                    skipped.push(Skipped {
                        file_name: path,
                        reason: e.to_string(),
                    });
                }
            },
        }
    }

    Ok(Loaded { items, skipped })
}
