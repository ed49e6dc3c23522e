use serde_json::{json, Map, Value};
use spdlog::debug;

use crate::content::{Post, Project};

/// Reduced copy of a record, keyed by front matter field names.
pub type Projection = Map<String, Value>;

/// Blog index and related posts.
pub const LISTING_FIELDS: &[&str] = &["slug", "title", "summary", "publishedAt", "image"];

/// Home page teaser.
pub const TEASER_FIELDS: &[&str] = &["slug", "title", "publishedAt", "image"];

/// Home page project list.
pub const PROJECT_FIELDS: &[&str] = &["slug", "title", "description", "time"];

/// Records whose fields can be projected by name.
pub trait Pick {
    /// `None` for unset optional fields and for names the record doesn't have.
    fn field_value(&self, field: &str) -> Option<Value>;
}

/// Copies only the requested fields of `record`.
///
/// Field names follow the front matter keys (`publishedAt`, `updatedAt`,
/// ...) plus `slug` and `body`. Optional fields that are not set and
/// unknown names are left out of the result instead of failing.
pub fn pick<T: Pick + ?Sized>(record: &T, fields: &[&str]) -> Projection {
    let mut projection = Projection::new();
    for &field in fields {
        if let Some(value) = record.field_value(field) {
            projection.insert(field.to_string(), value);
        }
    }
    projection
}

pub fn pick_all<'a, T, I>(records: I, fields: &[&str]) -> Vec<Projection>
where
    T: Pick + 'a,
    I: IntoIterator<Item = &'a T>,
{
    records.into_iter().map(|record| pick(record, fields)).collect()
}

impl Pick for Post {
    fn field_value(&self, field: &str) -> Option<Value> {
        let header = &self.header;
        let value = match field {
            "slug" => json!(self.slug.as_str()),
            "title" => json!(header.title),
            "summary" => json!(header.summary),
            "publishedAt" => json!(header.published_at),
            "updatedAt" => json!(header.updated_at?),
            "tags" if !header.tags.is_empty() => json!(header.tags),
            "tags" => return None,
            "image" => json!(header.image.as_ref()?),
            "og" => json!(header.og.as_ref()?),
            "body" => json!(self.body),
            _ => {
                debug!("Ignoring unknown field {} for post {}", field, self.slug);
                return None;
            }
        };
        Some(value)
    }
}

impl Pick for Project {
    fn field_value(&self, field: &str) -> Option<Value> {
        let value = match field {
            "slug" => json!(self.slug.as_str()),
            "title" => json!(self.header.title),
            "description" => json!(self.header.description),
            "time" => json!(self.header.time.as_ref()?),
            "body" => json!(self.body),
            _ => {
                debug!("Ignoring unknown field {} for project {}", field, self.slug);
                return None;
            }
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_data::{date, make_post, make_project};

    use super::*;

    fn keys(projection: &Projection) -> Vec<&str> {
        let mut keys: Vec<&str> = projection.keys().map(|k| k.as_str()).collect();
        keys.sort();
        keys
    }

    #[test]
    fn test_pick_exact_keys() {
        let mut post = make_post("hello", "2024-01-01", &["intro"]);
        post.header.image = Some("/img.png".to_string());
        post.header.og = Some("/og.png".to_string());
        post.header.updated_at = Some(date("2024-01-05"));

        let projection = pick(&post, &["slug", "title"]);
        assert_eq!(keys(&projection), ["slug", "title"]);
        assert_eq!(projection["slug"], "hello");
        assert_eq!(projection["title"], "Post hello");
    }

    #[test]
    fn test_pick_listing_fields() {
        let mut post = make_post("hello", "2024-01-01", &[]);
        post.header.image = Some("/img.png".to_string());

        let projection = pick(&post, LISTING_FIELDS);
        assert_eq!(keys(&projection), ["image", "publishedAt", "slug", "summary", "title"]);
        assert_eq!(projection["publishedAt"], "2024-01-01T00:00:00");
        assert_eq!(projection["image"], "/img.png");
        assert!(!projection.contains_key("body"));
    }

    #[test]
    fn test_pick_absent_fields_are_omitted() {
        let post = make_post("hello", "2024-01-01", &[]);
        let projection = pick(&post, &["slug", "image", "og", "updatedAt", "tags", "nonsense"]);
        assert_eq!(keys(&projection), ["slug"]);

        let projection = pick(&post, &[]);
        assert!(projection.is_empty());
    }

    #[test]
    fn test_pick_all_fields() {
        let mut post = make_post("hello", "2024-01-01", &["ai", "cpp"]);
        post.header.updated_at = Some(date("2024-01-05"));

        let projection = pick(&post, &["tags", "updatedAt", "body"]);
        assert_eq!(projection["tags"], json!(["ai", "cpp"]));
        assert_eq!(projection["updatedAt"], "2024-01-05T00:00:00");
        assert_eq!(projection["body"], "Body of hello");
    }

    #[test]
    fn test_pick_all() {
        let posts = vec![make_post("a", "2024-01-01", &[]), make_post("b", "2024-01-02", &[])];
        let projections = pick_all(&posts, TEASER_FIELDS);
        assert_eq!(projections.len(), 2);
        assert_eq!(projections[1]["slug"], "b");
        assert!(!projections[0].contains_key("summary"));
    }

    #[test]
    fn test_pick_project_fields() {
        let project = make_project("itso", Some("2022 - Present"));
        let projection = pick(&project, PROJECT_FIELDS);
        assert_eq!(keys(&projection), ["description", "slug", "time", "title"]);
        assert_eq!(projection["slug"], "itso");
        assert_eq!(projection["time"], "2022 - Present");
        assert_eq!(projection["description"], "Description of itso");

        // Post only fields don't exist on projects
        let untimed = make_project("synthax", None);
        let projection = pick(&untimed, &["slug", "time", "publishedAt", "summary"]);
        assert_eq!(keys(&projection), ["slug"]);
    }

    #[test]
    fn test_pick_all_projects() {
        let projects = vec![make_project("a", None), make_project("b", Some("2023"))];
        let projections = pick_all(&projects, PROJECT_FIELDS);
        assert_eq!(projections.len(), 2);
        assert!(!projections[0].contains_key("time"));
        assert_eq!(projections[1]["time"], "2023");
    }
}
