use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use spdlog::{debug, warn};

use folio::config::Config;
use folio::content::loader::load_projects;
use folio::content::Post;
use folio::content_index::{ContentIndex, ListQuery};
use folio::feed::FeedGenerator;
use folio::logger::configure_logger;
use folio::pick::{pick_all, Pick, LISTING_FIELDS, PROJECT_FIELDS};
use folio::view::rss_renderer::RssChannel;

use crate::config::open_config;

mod config;

const CFG_FILE_NAME: &str = "folio.toml";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config path. Defaults to folio.toml next to the binary, in the current dir or in the user config dir
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Regenerate the RSS feed
    Feed,
    /// Print posts as JSON, newest first
    List(ListArgs),
    /// Print up to 3 posts sharing a tag with the given post
    Related(RelatedArgs),
    /// Print tags with their number of posts
    Tags,
    /// Print projects as JSON, in file name order
    Projects(FieldArgs),
}

#[derive(clap::Args, Debug)]
struct ListArgs {
    /// Only the N most recent posts
    #[arg(short, long)]
    latest: Option<usize>,

    /// Case insensitive text to look for in title, summary and tags
    #[arg(short, long)]
    search: Option<String>,

    /// Only posts with this tag
    #[arg(short, long)]
    tag: Option<String>,

    /// Comma separated fields to print
    #[arg(short, long, value_delimiter = ',')]
    fields: Vec<String>,
}

#[derive(clap::Args, Debug)]
struct FieldArgs {
    /// Comma separated fields to print
    #[arg(short, long, value_delimiter = ',')]
    fields: Vec<String>,
}

#[derive(clap::Args, Debug)]
struct RelatedArgs {
    /// Slug of the reference post
    slug: String,

    /// Comma separated fields to print
    #[arg(short, long, value_delimiter = ',')]
    fields: Vec<String>,
}

fn load_index(config: &Config) -> Result<ContentIndex> {
    ContentIndex::load(&config.paths.content_dir, &config.content)
        .with_context(|| format!("Loading content from {}", config.paths.content_dir.display()))
}

fn print_records<T: Pick>(records: &[&T], fields: &[String], default_fields: &[&str]) -> Result<()> {
    let fields: Vec<&str> = if fields.is_empty() {
        default_fields.to_vec()
    } else {
        fields.iter().map(|f| f.as_str()).collect()
    };
    let projections = pick_all(records.iter().copied(), &fields);
    println!("{}", serde_json::to_string_pretty(&projections)?);
    Ok(())
}

fn feed_cmd(config: &Config) -> Result<()> {
    let feed_url = config.site.feed_url();
    let generator = FeedGenerator {
        channel: RssChannel {
            ch_title: &config.site.title,
            ch_link: &config.site.site_url,
            ch_desc: config.site.description(),
            feed_url: &feed_url,
        },
        content_dir: &config.paths.content_dir,
        output: &config.paths.feed_output,
        options: &config.content,
    };

    let report = generator.generate(Utc::now())
        .with_context(|| format!("Generating feed {}", config.paths.feed_output.display()))?;
    for skipped in report.skipped.iter() {
        warn!("Not in feed: {}", skipped.display());
    }
    println!("{} items written to {}", report.item_count, report.output.display());
    Ok(())
}

fn list_cmd(config: &Config, args: ListArgs) -> Result<()> {
    let index = load_index(config)?;

    let query = ListQuery {
        tag: args.tag,
        search: args.search,
        latest: args.latest,
    };
    let posts: Vec<&Post> = index.list(&query);
    print_records(&posts, &args.fields, LISTING_FIELDS)
}

fn related_cmd(config: &Config, args: RelatedArgs) -> Result<()> {
    let index = load_index(config)?;
    let post = index.find(&args.slug)
        .ok_or_else(|| anyhow!("No post with slug {}", args.slug))?;
    print_records(&index.related(post), &args.fields, LISTING_FIELDS)
}

fn tags_cmd(config: &Config) -> Result<()> {
    let index = load_index(config)?;
    for (tag, count) in index.tags() {
        println!("{} {}", tag, count);
    }
    Ok(())
}

fn projects_cmd(config: &Config, args: FieldArgs) -> Result<()> {
    let projects_dir = config.paths.projects_dir.as_ref()
        .ok_or_else(|| anyhow!("No projects_dir in [paths]"))?;
    let loaded = load_projects(projects_dir, &config.content)
        .with_context(|| format!("Loading projects from {}", projects_dir.display()))?;
    let projects: Vec<_> = loaded.items.iter().collect();
    print_records(&projects, &args.fields, PROJECT_FIELDS)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = open_config(args.config_path.map(PathBuf::from))?;

    if let Err(err) = configure_logger(&config) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }
    debug!("Content dir: {}", config.paths.content_dir.display());

    match args.command {
        Command::Feed => feed_cmd(&config),
        Command::List(list_args) => list_cmd(&config, list_args),
        Command::Related(related_args) => related_cmd(&config, related_args),
        Command::Tags => tags_cmd(&config),
        Command::Projects(field_args) => projects_cmd(&config, field_args),
    }
}
