use std::{fs, io};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::content::Slug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContentFormat {
    Markdown,
    Mdx,
}

pub struct ContentFile {
    pub slug: Slug,
    pub file_path: PathBuf,
    pub format: ContentFormat,
    pub raw_content: String,
}

impl ContentFile {
    pub fn from_file(file_path: PathBuf) -> io::Result<ContentFile> {
        let format = match Self::guess_type(&file_path) {
            None => return Err(io::Error::new(ErrorKind::Unsupported, format!("Could not guess the type of the file {}", file_path.display()))),
            Some(format) => format,
        };
        let slug = slug_from_path(&file_path)?;
        let raw_content = fs::read_to_string(&file_path)?;

        Ok(ContentFile {
            slug,
            file_path,
            format,
            raw_content,
        })
    }

    fn guess_type(file_name: &Path) -> Option<ContentFormat> {
        match file_name.extension()?.to_str()? {
            "md" | "markdown" => Some(ContentFormat::Markdown),
            "mdx" => Some(ContentFormat::Mdx),
            _ => None,
        }
    }
}

/// `data/blog/hello.mdx` -> `hello`
pub fn slug_from_path(path: &Path) -> io::Result<Slug> {
    match path.file_stem().and_then(|stem| stem.to_str()) {
        Some(stem) if !stem.is_empty() => Ok(Slug(stem.to_string())),
        _ => Err(io::Error::new(ErrorKind::InvalidInput, format!("Invalid post file name - file={}", path.display()))),
    }
}
