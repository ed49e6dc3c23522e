use std::{fs, io};
use std::path::{Path, PathBuf};

pub struct PostList<'a> {
    pub root_dir: &'a Path,
    pub extensions: &'a [String],
}

impl<'a> PostList<'a> {
    /// Content files directly inside `root_dir`, sorted by path.
    ///
    /// Errors opening or walking the directory itself are returned as-is,
    /// sub-directories and other extensions are ignored.
    pub fn retrieve_files(&self) -> io::Result<Vec<PathBuf>> {
        let mut posts = vec![];
        let entries = fs::read_dir(self.root_dir)?;
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            if self.has_content_extension(&path) {
                posts.push(path);
            }
        }
        posts.sort();
        Ok(posts)
    }

    fn has_content_extension(&self, path: &Path) -> bool {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) => self.extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)),
            None => false,
        }
    }
}
