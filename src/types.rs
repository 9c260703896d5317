//! Shared content types.
//!
//! These types are serialized to JSON between the build-time generators and
//! the runtime retrieval services and must stay identical on both sides:
//! the generators write them into `content/index.json`,
//! `navigation-index.json` and `content-metadata.json`; the services read
//! the same shapes back (camelCase on the wire).
//!
//! Each content category has its own entity shape (a blog post is not a
//! project card), but all of them are projections of one
//! [`Document`](crate::parser::Document) — the [`ContentEntity`] trait is
//! the seam the generic retrieval service works through.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::components::EmbeddedComponent;
use crate::frontmatter::Frontmatter;
use crate::parser::Document;
use crate::toc::TocEntry;

// ============================================================================
// Categories and the content index
// ============================================================================

/// A content category: one of the five fixed folders, or a user-configured
/// dynamic section.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Blog,
    Projects,
    Articles,
    Docs,
    Features,
    Section(String),
}

impl Category {
    /// Directory names of the fixed categories, in index order.
    pub const FIXED_DIRS: [&'static str; 5] = ["blog", "projects", "articles", "docs", "features"];

    /// Folder name under the content root.
    pub fn dir(&self) -> &str {
        match self {
            Self::Blog => "blog",
            Self::Projects => "projects",
            Self::Articles => "articles",
            Self::Docs => "docs",
            Self::Features => "features",
            Self::Section(name) => name,
        }
    }

    /// Blog entries list newest-first by their date-prefixed filenames;
    /// everything else sorts ascending so numeric prefixes order naturally.
    pub fn descending_by_filename(&self) -> bool {
        matches!(self, Self::Blog)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir())
    }
}

/// Manifest of all content files grouped by category.
///
/// Paths are relative to the category directory (`"02-b.md"`,
/// `"01-a/index.md"`). Built once per generation run, immutable afterwards,
/// persisted as `content/index.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentIndex {
    pub blog: Vec<String>,
    pub projects: Vec<String>,
    pub articles: Vec<String>,
    pub docs: Vec<String>,
    pub features: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub sections: BTreeMap<String, Vec<String>>,
}

impl ContentIndex {
    /// Files listed for a category; empty for an unknown section.
    pub fn files(&self, category: &Category) -> &[String] {
        match category {
            Category::Blog => &self.blog,
            Category::Projects => &self.projects,
            Category::Articles => &self.articles,
            Category::Docs => &self.docs,
            Category::Features => &self.features,
            Category::Section(name) => self.sections.get(name).map_or(&[], Vec::as_slice),
        }
    }

    pub fn set_files(&mut self, category: &Category, files: Vec<String>) {
        match category {
            Category::Blog => self.blog = files,
            Category::Projects => self.projects = files,
            Category::Articles => self.articles = files,
            Category::Docs => self.docs = files,
            Category::Features => self.features = files,
            Category::Section(name) => {
                self.sections.insert(name.clone(), files);
            }
        }
    }

    /// Every category present in the index, fixed ones first.
    pub fn categories(&self) -> Vec<Category> {
        let mut cats = vec![
            Category::Blog,
            Category::Projects,
            Category::Articles,
            Category::Docs,
            Category::Features,
        ];
        cats.extend(self.sections.keys().map(|name| Category::Section(name.clone())));
        cats
    }

    pub fn is_empty(&self) -> bool {
        self.categories().iter().all(|c| self.files(c).is_empty())
    }
}

// ============================================================================
// Content entities
// ============================================================================

/// Seam between the generic retrieval service and category-specific shapes.
pub trait ContentEntity: Clone + Send + Sync + 'static {
    fn from_document(doc: Document) -> Self;

    fn slug(&self) -> &str;

    /// Collection ordering for the category (blog: newest first; others:
    /// ascending numeric order).
    fn sort(items: &mut [Self]);

    /// Enrichment that needs the whole ordered collection (doc pages link
    /// their neighbors here). No-op by default.
    fn link_neighbors(_items: &mut [Self]) {}
}

fn sort_by_order<E: ContentEntity>(items: &mut [E], order_of: impl Fn(&E) -> u32) {
    items.sort_by(|a, b| order_of(a).cmp(&order_of(b)).then_with(|| a.slug().cmp(b.slug())));
}

/// A dated blog post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub tags: Vec<String>,
    pub publish_date: Option<NaiveDate>,
    pub author: Option<String>,
    pub image: Option<String>,
    pub reading_time: u32,
    pub html: String,
    pub markdown: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub toc: Vec<TocEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<EmbeddedComponent>,
}

impl ContentEntity for BlogPost {
    fn from_document(doc: Document) -> Self {
        let title = doc.title();
        Self {
            slug: doc.slug,
            title,
            description: doc.front.description,
            summary: doc.front.summary,
            tags: doc.front.tags,
            publish_date: doc.front.publish_date,
            author: doc.front.author,
            image: doc.front.image,
            reading_time: doc.reading_time,
            html: doc.html,
            markdown: doc.body,
            toc: doc.toc,
            components: doc.components,
        }
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn sort(items: &mut [Self]) {
        // Descending by date; undated posts sink to the end.
        items.sort_by(|a, b| b.publish_date.cmp(&a.publish_date));
    }
}

/// A portfolio project card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCard {
    pub slug: String,
    pub order: u32,
    pub title: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub url: Option<String>,
    pub image: Option<String>,
    pub icon: Option<String>,
    pub icon_svg: Option<String>,
    pub is_first_project: bool,
    pub html: String,
    pub markdown: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<EmbeddedComponent>,
}

impl ContentEntity for ProjectCard {
    fn from_document(doc: Document) -> Self {
        let title = doc.title();
        Self {
            slug: doc.slug,
            order: doc.order,
            title,
            description: doc.front.description,
            tags: doc.front.tags,
            url: doc.front.url,
            image: doc.front.image,
            icon: doc.front.icon,
            icon_svg: doc.front.icon_svg,
            is_first_project: doc.front.is_first_project,
            html: doc.html,
            markdown: doc.body,
            components: doc.components,
        }
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn sort(items: &mut [Self]) {
        sort_by_order(items, |e| e.order);
    }
}

/// A long-form article card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleCard {
    pub slug: String,
    pub order: u32,
    pub title: String,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub tags: Vec<String>,
    pub url: Option<String>,
    pub reading_time: u32,
    pub html: String,
    pub markdown: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<EmbeddedComponent>,
}

impl ContentEntity for ArticleCard {
    fn from_document(doc: Document) -> Self {
        let title = doc.title();
        Self {
            slug: doc.slug,
            order: doc.order,
            title,
            description: doc.front.description,
            summary: doc.front.summary,
            tags: doc.front.tags,
            url: doc.front.url,
            reading_time: doc.reading_time,
            html: doc.html,
            markdown: doc.body,
            components: doc.components,
        }
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn sort(items: &mut [Self]) {
        sort_by_order(items, |e| e.order);
    }
}

/// Link to a neighboring doc page, present only on full-collection loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocLink {
    pub slug: String,
    pub title: String,
}

/// A documentation page. Dynamic sections reuse this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocPage {
    pub slug: String,
    pub order: u32,
    pub title: String,
    pub menu_title: Option<String>,
    pub description: Option<String>,
    /// Parent page slug for hierarchical docs.
    pub parent: Option<String>,
    pub html: String,
    pub markdown: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub toc: Vec<TocEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<EmbeddedComponent>,
    pub previous: Option<DocLink>,
    pub next: Option<DocLink>,
}

impl ContentEntity for DocPage {
    fn from_document(doc: Document) -> Self {
        let title = doc.title();
        Self {
            slug: doc.slug,
            order: doc.order,
            title,
            menu_title: doc.front.menu_title,
            description: doc.front.description,
            parent: doc.front.parent,
            html: doc.html,
            markdown: doc.body,
            toc: doc.toc,
            components: doc.components,
            previous: None,
            next: None,
        }
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn sort(items: &mut [Self]) {
        sort_by_order(items, |e| e.order);
    }

    fn link_neighbors(items: &mut [Self]) {
        let links: Vec<DocLink> = items
            .iter()
            .map(|p| DocLink {
                slug: p.slug.clone(),
                title: p.title.clone(),
            })
            .collect();
        for (i, page) in items.iter_mut().enumerate() {
            page.previous = (i > 0).then(|| links[i - 1].clone());
            page.next = (i + 1 < links.len()).then(|| links[i + 1].clone());
        }
    }
}

/// A landing-page feature card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureCard {
    pub slug: String,
    pub order: u32,
    pub title: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub icon_svg: Option<String>,
    pub html: String,
    pub markdown: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<EmbeddedComponent>,
}

impl ContentEntity for FeatureCard {
    fn from_document(doc: Document) -> Self {
        let title = doc.title();
        Self {
            slug: doc.slug,
            order: doc.order,
            title,
            description: doc.front.description,
            icon: doc.front.icon,
            icon_svg: doc.front.icon_svg,
            html: doc.html,
            markdown: doc.body,
            components: doc.components,
        }
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn sort(items: &mut [Self]) {
        sort_by_order(items, |e| e.order);
    }
}

// ============================================================================
// Derived index records
// ============================================================================

/// Navigation menu entry, derived 1:1 from an entity's frontmatter subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_title: Option<String>,
    pub order: u32,
    pub show_in_menu: bool,
    pub show_in_header: bool,
}

impl MenuItem {
    /// Build from frontmatter alone — the generators never render bodies.
    pub fn from_front(slug: &str, order: u32, front: &Frontmatter) -> Self {
        Self {
            slug: slug.to_string(),
            title: front.title.clone().unwrap_or_else(|| slug.replace('-', " ")),
            menu_title: front.menu_title.clone(),
            order,
            show_in_menu: front.show_in_menu,
            show_in_header: front.show_in_header,
        }
    }
}

/// Lightweight metadata record mirroring an entity without its content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSummary {
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub reading_time: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ContentSummary {
    pub fn from_front(slug: &str, order: u32, front: &Frontmatter, reading_time: u32) -> Self {
        Self {
            slug: slug.to_string(),
            title: front.title.clone().unwrap_or_else(|| slug.replace('-', " ")),
            description: front.description.clone(),
            summary: front.summary.clone(),
            order,
            publish_date: front.publish_date,
            tags: front.tags.clone(),
            reading_time,
            image: front.image.clone(),
        }
    }
}

/// Pre-built navigation snapshot (`navigation-index.json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigationIndex {
    pub projects: Vec<MenuItem>,
    pub articles: Vec<MenuItem>,
    pub docs: Vec<MenuItem>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub sections: BTreeMap<String, Vec<MenuItem>>,
}

impl NavigationIndex {
    /// Menu items for a category; blog and features carry no navigation.
    pub fn menu(&self, category: &Category) -> &[MenuItem] {
        match category {
            Category::Projects => &self.projects,
            Category::Articles => &self.articles,
            Category::Docs => &self.docs,
            Category::Section(name) => self.sections.get(name).map_or(&[], Vec::as_slice),
            Category::Blog | Category::Features => &[],
        }
    }

    pub fn set_menu(&mut self, category: &Category, items: Vec<MenuItem>) {
        match category {
            Category::Projects => self.projects = items,
            Category::Articles => self.articles = items,
            Category::Docs => self.docs = items,
            Category::Section(name) => {
                self.sections.insert(name.clone(), items);
            }
            Category::Blog | Category::Features => {}
        }
    }
}

/// Pre-built metadata snapshot (`content-metadata.json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetadataIndex {
    pub blog: Vec<ContentSummary>,
    pub projects: Vec<ContentSummary>,
    pub articles: Vec<ContentSummary>,
    pub docs: Vec<ContentSummary>,
    pub features: Vec<ContentSummary>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub sections: BTreeMap<String, Vec<ContentSummary>>,
}

impl MetadataIndex {
    pub fn records(&self, category: &Category) -> &[ContentSummary] {
        match category {
            Category::Blog => &self.blog,
            Category::Projects => &self.projects,
            Category::Articles => &self.articles,
            Category::Docs => &self.docs,
            Category::Features => &self.features,
            Category::Section(name) => self.sections.get(name).map_or(&[], Vec::as_slice),
        }
    }

    pub fn set_records(&mut self, category: &Category, records: Vec<ContentSummary>) {
        match category {
            Category::Blog => self.blog = records,
            Category::Projects => self.projects = records,
            Category::Articles => self.articles = records,
            Category::Docs => self.docs = records,
            Category::Features => self.features = records,
            Category::Section(name) => {
                self.sections.insert(name.clone(), records);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ParseOptions, parse_document};

    fn doc(path: &str, raw: &str) -> Document {
        parse_document(path, raw, &ParseOptions::default()).unwrap()
    }

    #[test]
    fn blog_sorts_descending_by_date_with_undated_last() {
        let mut posts = vec![
            BlogPost::from_document(doc("content/blog/a.md", "---\npublishDate: 2024-01-01\n---\nx")),
            BlogPost::from_document(doc("content/blog/b.md", "x")),
            BlogPost::from_document(doc("content/blog/c.md", "---\npublishDate: 2024-06-01\n---\nx")),
        ];
        BlogPost::sort(&mut posts);
        let slugs: Vec<&str> = posts.iter().map(|p| p.slug()).collect();
        assert_eq!(slugs, vec!["c", "a", "b"]);
    }

    #[test]
    fn ordered_categories_sort_ascending() {
        let mut pages = vec![
            DocPage::from_document(doc("content/docs/03-three.md", "x")),
            DocPage::from_document(doc("content/docs/01-one.md", "x")),
            DocPage::from_document(doc("content/docs/02-two.md", "x")),
        ];
        DocPage::sort(&mut pages);
        let orders: Vec<u32> = pages.iter().map(|p| p.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[test]
    fn doc_pages_link_neighbors_in_order() {
        let mut pages = vec![
            DocPage::from_document(doc("content/docs/01-one.md", "x")),
            DocPage::from_document(doc("content/docs/02-two.md", "x")),
            DocPage::from_document(doc("content/docs/03-three.md", "x")),
        ];
        DocPage::sort(&mut pages);
        DocPage::link_neighbors(&mut pages);

        assert!(pages[0].previous.is_none());
        assert_eq!(pages[0].next.as_ref().unwrap().slug, "two");
        assert_eq!(pages[1].previous.as_ref().unwrap().slug, "one");
        assert_eq!(pages[1].next.as_ref().unwrap().slug, "three");
        assert!(pages[2].next.is_none());
    }

    #[test]
    fn menu_item_from_frontmatter_defaults() {
        let front = Frontmatter::default();
        let item = MenuItem::from_front("getting-started", 2, &front);
        assert_eq!(item.title, "getting started");
        assert!(item.show_in_menu);
        assert!(!item.show_in_header);
        assert_eq!(item.order, 2);
    }

    #[test]
    fn summary_round_trips_frontmatter_fields() {
        let raw = "---\ntitle: Post\ntags: [a, b]\npublishDate: 2024-01-15\n---\nbody";
        let d = doc("content/blog/2024-01-15-post.md", raw);
        let rt = d.reading_time;
        let summary = ContentSummary::from_front(&d.slug, d.order, &d.front, rt);

        assert_eq!(summary.title, "Post");
        assert_eq!(summary.tags, vec!["a", "b"]);
        assert_eq!(summary.publish_date, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(summary.slug, "post");
    }

    #[test]
    fn content_index_json_shape_is_camel_case() {
        let mut index = ContentIndex::default();
        index.set_files(&Category::Blog, vec!["2024-01-01-a.md".into()]);
        index.set_files(&Category::Section("guides".into()), vec!["01-g.md".into()]);

        let json = serde_json::to_value(&index).unwrap();
        assert_eq!(json["blog"][0], "2024-01-01-a.md");
        assert_eq!(json["sections"]["guides"][0], "01-g.md");
    }

    #[test]
    fn section_category_round_trip() {
        let cat = Category::Section("guides".into());
        let mut index = ContentIndex::default();
        index.set_files(&cat, vec!["a.md".into()]);
        assert_eq!(index.files(&cat), ["a.md".to_string()]);
        assert!(index.categories().contains(&cat));
    }
}
