use std::io;
use std::io::ErrorKind;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_yaml::Value;

use crate::content::{PostHeader, ProjectHeader};
use crate::text_utils::parse_date_time;

/* Example
---
title: "Hello"
publishedAt: "2024-01-01"
summary: "First post"
tags: ["ai", "cpp"]
image: "/static/images/hello/banner.png"
---

Post body
*/

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFrontMatter {
    title: Option<String>,
    summary: Option<String>,
    published_at: Option<String>,
    updated_at: Option<String>,
    tags: Option<Value>,
    image: Option<String>,
    og: Option<String>,
}

/* Example
---
title: "ITSO"
description: "Trading and tooling society website"
time: "2022 - Present"
---
*/

#[derive(Debug, Default, Deserialize)]
struct RawProjectMatter {
    title: Option<String>,
    description: Option<String>,
    time: Option<Value>,
}

fn invalid_data(file_name: &Path, desc: impl std::fmt::Display) -> io::Error {
    io::Error::new(ErrorKind::InvalidData, format!("{} - file={}", desc, file_name.display()))
}

/// Splits a file into its `---` delimited header block and the body.
/// Returns `None` when the file does not start with a terminated block.
pub fn split_front_matter(raw: &str) -> Option<(&str, &str)> {
    let trimmed = raw.trim_start_matches('\u{feff}').trim_start();
    let rest = trimmed.strip_prefix("---")?;

    // Opening delimiter has to be alone in its line
    let rest = match rest.find('\n') {
        Some(idx) if rest[..idx].trim().is_empty() => &rest[idx + 1..],
        _ => return None,
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let block = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((block, body));
        }
        offset += line.len();
    }

    None
}

fn parse_block<'a, T>(file_name: &Path, raw: &'a str) -> io::Result<(T, &'a str)>
where
    T: DeserializeOwned + Default,
{
    let Some((block, body)) = split_front_matter(raw) else {
        return Err(invalid_data(file_name, "Front matter is missing or not terminated"));
    };

    let parsed = if block.trim().is_empty() {
        T::default()
    } else {
        serde_yaml::from_str(block)
            .map_err(|e| invalid_data(file_name, format!("Invalid front matter: {}", e)))?
    };
    Ok((parsed, body))
}

/// Extracts and validates the header of a content file.
///
/// `title`, `summary` and `publishedAt` are required. Any problem is
/// reported as `InvalidData`, no partially filled header is ever returned.
pub fn parse_front_matter<'a>(file_name: &Path, raw: &'a str) -> io::Result<(PostHeader, &'a str)> {
    let (raw_header, body): (RawFrontMatter, _) = parse_block(file_name, raw)?;

    let title = required(file_name, raw_header.title, "title")?;
    let summary = required(file_name, raw_header.summary, "summary")?;
    let published_at = required(file_name, raw_header.published_at, "publishedAt")?;
    let published_at = parse_date(file_name, &published_at)?;
    let updated_at = match non_empty(raw_header.updated_at) {
        Some(date) => Some(parse_date(file_name, &date)?),
        None => None,
    };

    let header = PostHeader {
        title,
        summary,
        published_at,
        updated_at,
        tags: extract_tags(file_name, raw_header.tags)?,
        image: non_empty(raw_header.image),
        og: non_empty(raw_header.og),
    };

    Ok((header, body))
}

/// Header of a project page. `title` and `description` are required,
/// `time` is free text such as `2022 - Present` and may be a bare year.
pub fn parse_project_matter<'a>(file_name: &Path, raw: &'a str) -> io::Result<(ProjectHeader, &'a str)> {
    let (raw_header, body): (RawProjectMatter, _) = parse_block(file_name, raw)?;

    let time = match raw_header.time {
        None => None,
        Some(value) => match scalar_to_string(value) {
            Some(time) => non_empty(Some(time)),
            None => return Err(invalid_data(file_name, "Field time must be text")),
        },
    };

    let header = ProjectHeader {
        title: required(file_name, raw_header.title, "title")?,
        description: required(file_name, raw_header.description, "description")?,
        time,
    };

    Ok((header, body))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(file_name: &Path, value: Option<String>, key: &str) -> io::Result<String> {
    non_empty(value).ok_or_else(|| invalid_data(file_name, format!("Missing required field {}", key)))
}

fn parse_date(file_name: &Path, value: &str) -> io::Result<NaiveDateTime> {
    parse_date_time(value).map_err(|e| invalid_data(file_name, e))
}

/// Strings, numbers and booleans as text. `None` for null and collections.
fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Tagged(tagged) => scalar_to_string((*tagged).value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// Accepts a YAML list or a comma separated string. Scalar entries are
/// kept as text (`2024` is the tag "2024"), nulls are dropped.
fn extract_tags(file_name: &Path, tags: Option<Value>) -> io::Result<Vec<String>> {
    let tags: Vec<String> = match tags {
        None | Some(Value::Null) => return Ok(vec![]),
        Some(Value::String(text)) => text.split(',').map(|s| s.to_string()).collect(),
        Some(Value::Sequence(list)) => {
            let mut tags = Vec::with_capacity(list.len());
            for entry in list {
                match entry {
                    Value::Null => continue,
                    Value::Sequence(_) | Value::Mapping(_) => {
                        return Err(invalid_data(file_name, "Tags must be a list of words"));
                    }
                    scalar => tags.extend(scalar_to_string(scalar)),
                }
            }
            tags
        }
        Some(Value::Mapping(_)) => return Err(invalid_data(file_name, "Tags must be a list of words")),
        Some(scalar) => scalar_to_string(scalar).into_iter().collect(),
    };

    Ok(tags.into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect())
}
