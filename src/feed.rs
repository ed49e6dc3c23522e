use std::io::Write;
use std::path::{Path, PathBuf};
use std::{fs, io};

use chrono::{DateTime, Utc};
use spdlog::info;
use tempfile::NamedTempFile;

use crate::content::loader::{load_headers, LoadOptions};
use crate::content::FeedItem;
use crate::view::rss_renderer::RssChannel;

/// Regenerates the RSS file from the content directory.
///
/// Every run rebuilds the whole document; the previous file is replaced
/// in one rename, readers never see a half written feed.
pub struct FeedGenerator<'a> {
    pub channel: RssChannel<'a>,
    pub content_dir: &'a Path,
    pub output: &'a Path,
    pub options: &'a LoadOptions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedReport {
    pub output: PathBuf,
    pub item_count: usize,
    pub skipped: Vec<PathBuf>,
}

impl<'a> FeedGenerator<'a> {
    pub fn collect_items(&self) -> io::Result<(Vec<FeedItem>, Vec<PathBuf>)> {
        let loaded = load_headers(self.content_dir, self.options)?;
        let mut items: Vec<FeedItem> = loaded.items
            .into_iter()
            .map(|(slug, header)| FeedItem::new(self.channel.ch_link, &slug, header))
            .collect();

        // Newest first, urls differ only by slug
        items.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.url.cmp(&b.url)));

        let skipped = loaded.skipped.into_iter().map(|s| s.file_name).collect();
        Ok((items, skipped))
    }

    pub fn generate(&self, build_date: DateTime<Utc>) -> io::Result<FeedReport> {
        let (items, skipped) = self.collect_items()?;
        let xml = self.channel.render(&items, build_date)
            .map_err(|e| io::Error::other(format!("Error rendering feed: {}", e)))?;
        write_atomically(self.output, &xml)?;

        info!("Wrote {} feed items to {}", items.len(), self.output.display());
        Ok(FeedReport {
            output: self.output.to_path_buf(),
            item_count: items.len(),
            skipped,
        })
    }
}

/// Writes `data` next to `path` and renames it into place.
pub fn write_atomically(path: &Path, data: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use crate::content::loader::InvalidPolicy;
    use crate::test_data::{post_source, HELLO_POST};

    use super::*;

    fn build_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn channel() -> RssChannel<'static> {
        RssChannel {
            ch_title: "Anurag Anand",
            ch_link: "https://anuraganand.vercel.app",
            ch_desc: "Anurag Anand",
            feed_url: "https://anuraganand.vercel.app/feed.xml",
        }
    }

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn test_generate_single_post() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        let content_dir = dir.path().join("data").join("blog");
        fs::create_dir_all(&content_dir)?;
        fs::write(content_dir.join("hello.mdx"), HELLO_POST)?;
        let output = dir.path().join("public").join("feed.xml");

        let options = LoadOptions::default();
        let generator = FeedGenerator { channel: channel(), content_dir: &content_dir, output: &output, options: &options };
        let report = generator.generate(build_date())?;
        assert_eq!(report.item_count, 1);
        assert!(report.skipped.is_empty());
        assert_eq!(report.output, output);

        let xml = fs::read_to_string(&output)?;
        assert_eq!(count(&xml, "<item>"), 1);
        assert!(xml.contains("<title>Hello</title>"));
        assert!(xml.contains("<link>https://anuraganand.vercel.app/blog/hello</link>"));
        assert!(xml.contains("<pubDate>Mon, 1 Jan 2024 00:00:00 +0000</pubDate>"));
        assert!(xml.contains("<![CDATA[First post]]>"));
        // The body never makes it into the feed
        assert!(!xml.contains("Welcome to the blog"));
        Ok(())
    }

    #[test]
    fn test_generate_empty_dir() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        let output = dir.path().join("feed.xml");

        let options = LoadOptions::default();
        let generator = FeedGenerator { channel: channel(), content_dir: dir.path(), output: &output, options: &options };
        let report = generator.generate(build_date())?;
        assert_eq!(report.item_count, 0);

        let xml = fs::read_to_string(&output)?;
        assert_eq!(count(&xml, "<item>"), 0);
        assert!(xml.contains("<title>Anurag Anand</title>"));
        assert!(xml.contains("<link>https://anuraganand.vercel.app</link>"));
        assert!(xml.contains("href=\"https://anuraganand.vercel.app/feed.xml\""));
        Ok(())
    }

    #[test]
    fn test_items_newest_first() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("a-old.mdx"), post_source("Old", "2023-01-01", "old", &[]))?;
        fs::write(dir.path().join("b-new.mdx"), post_source("New", "2024-01-01", "new", &[]))?;
        fs::write(dir.path().join("c-same.mdx"), post_source("Same", "2024-01-01", "same", &[]))?;

        let options = LoadOptions::default();
        let output = dir.path().join("out").join("feed.xml");
        let generator = FeedGenerator { channel: channel(), content_dir: dir.path(), output: &output, options: &options };
        let (items, _) = generator.collect_items()?;
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["New", "Same", "Old"]);
        Ok(())
    }

    #[test]
    fn test_invalid_file_policy() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("hello.mdx"), HELLO_POST)?;
        fs::write(dir.path().join("broken.mdx"), "---\ntitle: Missing the rest\n---\n")?;
        let output = dir.path().join("feed.xml");

        let options = LoadOptions::default();
        let generator = FeedGenerator { channel: channel(), content_dir: dir.path(), output: &output, options: &options };
        let report = generator.generate(build_date())?;
        assert_eq!(report.item_count, 1);
        assert_eq!(report.skipped, vec![dir.path().join("broken.mdx")]);
        let xml = fs::read_to_string(&output)?;
        assert!(!xml.contains("Missing the rest"));

        // A failing run leaves the previous feed untouched
        let options = LoadOptions { on_invalid: InvalidPolicy::Fail, ..LoadOptions::default() };
        let generator = FeedGenerator { channel: channel(), content_dir: dir.path(), output: &output, options: &options };
        assert!(generator.generate(build_date()).is_err());
        assert_eq!(fs::read_to_string(&output)?, xml);
        Ok(())
    }

    #[test]
    fn test_regenerate_overwrites() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        let content_dir = dir.path().join("blog");
        fs::create_dir(&content_dir)?;
        fs::write(content_dir.join("hello.mdx"), HELLO_POST)?;
        fs::write(content_dir.join("second.mdx"), post_source("Second", "2024-02-01", "two", &[]))?;
        let output = dir.path().join("feed.xml");
        fs::write(&output, "stale content that is much longer than nothing")?;

        let options = LoadOptions::default();
        let generator = FeedGenerator { channel: channel(), content_dir: &content_dir, output: &output, options: &options };
        generator.generate(build_date())?;
        assert_eq!(count(&fs::read_to_string(&output)?, "<item>"), 2);

        fs::remove_file(content_dir.join("second.mdx"))?;
        generator.generate(build_date())?;
        let xml = fs::read_to_string(&output)?;
        assert_eq!(count(&xml, "<item>"), 1);
        assert!(!xml.contains("stale"));

        // No temporary files left behind
        let leftovers: Vec<_> = fs::read_dir(dir.path())?
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "feed.xml" && e.file_name() != "blog")
            .collect();
        assert!(leftovers.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_content_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let output = dir.path().join("feed.xml");
        let options = LoadOptions::default();
        let generator = FeedGenerator { channel: channel(), content_dir: &missing, output: &output, options: &options };
        let err = generator.generate(build_date()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(!output.exists());
    }
}
