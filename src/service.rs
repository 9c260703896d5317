//! Tiered-cache retrieval services.
//!
//! The runtime side of the pipeline: slug-keyed access to content with
//! pre-built indices preferred over re-parsing source files. Each category
//! is served by its own [`ContentService`]; [`NavigationService`] and
//! [`MetadataService`] serve the derived snapshots.
//!
//! ## Tiers
//!
//! 1. **Pre-built JSON index** — `content/index.json` for file lists,
//!    `navigation-index.json` / `content-metadata.json` for derived data.
//!    A missing or malformed index is a normal fallback trigger, not an
//!    error: development-style runs without a generation step land here.
//! 2. **Direct single-file fetch** — `get_by_slug` before any full load
//!    resolves the filename from the cached content index and fetches
//!    exactly that file. This is the latency-critical path for detail
//!    views; it never forces a full-collection load.
//! 3. **Full-collection fetch** — every listed file fetched and parsed,
//!    deduplicated (first occurrence per slug wins), sorted per category.
//!
//! ## Caching contract
//!
//! Population is double-checked: a lock-free read of the published `Arc`
//! snapshot, then a per-service `tokio::sync::Mutex` gate, a re-check under
//! the gate, and a publish-by-swap of the fully built collection. Concurrent
//! first calls perform exactly one underlying load; different categories
//! never serialize against each other. Snapshots are immutable after
//! publication — invalidation swaps the slot back to `None` and does not
//! cancel in-flight loads (they publish when they finish).
//!
//! Per-file failures are logged and dropped; collection endpoints always
//! return a (possibly empty) list, never an error.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use tokio::sync::Mutex;

use crate::fetch::ContentFetcher;
use crate::generate::{CONTENT_INDEX_FILE, METADATA_INDEX_FILE, NAVIGATION_INDEX_FILE};
use crate::parser::{ParseOptions, parse_document};
use crate::slug;
use crate::types::{
    ArticleCard, BlogPost, Category, ContentEntity, ContentIndex, ContentSummary, DocPage,
    FeatureCard, MenuItem, MetadataIndex, NavigationIndex, ProjectCard,
};

// ============================================================================
// Shared cache plumbing
// ============================================================================

/// One fetch-attempt memo: `fetched` records that the attempt happened (so
/// a failing round-trip is not repeated every page view), `value` holds the
/// result when it succeeded.
struct Memo<T> {
    fetched: bool,
    value: Option<Arc<T>>,
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self {
            fetched: false,
            value: None,
        }
    }
}

/// Cached content-index fetch with the direct-listing fallback tier.
///
/// Each service caches the content index separately; the gate serializes
/// only this cache's population.
struct IndexCache {
    fetcher: Arc<dyn ContentFetcher>,
    state: RwLock<Memo<ContentIndex>>,
    gate: Mutex<()>,
}

impl IndexCache {
    fn new(fetcher: Arc<dyn ContentFetcher>) -> Self {
        Self {
            fetcher,
            state: RwLock::new(Memo::default()),
            gate: Mutex::new(()),
        }
    }

    async fn get(&self) -> Option<Arc<ContentIndex>> {
        {
            let state = self.state.read().expect("index lock");
            if state.fetched {
                return state.value.clone();
            }
        }
        let _gate = self.gate.lock().await;
        {
            let state = self.state.read().expect("index lock");
            if state.fetched {
                return state.value.clone();
            }
        }

        let value = match self.fetcher.fetch(CONTENT_INDEX_FILE).await {
            Ok(text) => match serde_json::from_str::<ContentIndex>(&text) {
                Ok(index) => Some(Arc::new(index)),
                Err(err) => {
                    log::warn!("content index unparseable, treating as unavailable: {err}");
                    None
                }
            },
            Err(err) => {
                log::debug!("content index unavailable: {err}");
                None
            }
        };

        let mut state = self.state.write().expect("index lock");
        state.fetched = true;
        state.value = value.clone();
        value
    }

    /// File list for one category: index first, direct listing second.
    async fn files(&self, category: &Category) -> Vec<String> {
        if let Some(index) = self.get().await {
            return index.files(category).to_vec();
        }
        match self.fetcher.list(&format!("content/{}", category.dir())).await {
            Ok(mut files) => {
                if category.descending_by_filename() {
                    files.reverse();
                }
                files
            }
            Err(err) => {
                log::warn!("{category}: no content index and listing failed: {err}");
                Vec::new()
            }
        }
    }

    fn invalidate(&self) {
        *self.state.write().expect("index lock") = Memo::default();
    }
}

// ============================================================================
// ContentService
// ============================================================================

/// Slug-keyed retrieval for one content category.
pub struct ContentService<E: ContentEntity> {
    fetcher: Arc<dyn ContentFetcher>,
    category: Category,
    options: ParseOptions,
    index: IndexCache,
    /// Published collection snapshot; swapped whole, never mutated in place.
    items: RwLock<Option<Arc<Vec<E>>>>,
    /// Serializes collection population for this category only.
    load_gate: Mutex<()>,
}

impl<E: ContentEntity> ContentService<E> {
    pub fn new(fetcher: Arc<dyn ContentFetcher>, category: Category) -> Self {
        Self::with_options(fetcher, category, ParseOptions::default())
    }

    pub fn with_options(
        fetcher: Arc<dyn ContentFetcher>,
        category: Category,
        options: ParseOptions,
    ) -> Self {
        Self {
            index: IndexCache::new(Arc::clone(&fetcher)),
            fetcher,
            category,
            options,
            items: RwLock::new(None),
            load_gate: Mutex::new(()),
        }
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    /// The full, ordered collection. First call populates the cache;
    /// subsequent calls return the snapshot without I/O.
    pub async fn get_all(&self) -> Arc<Vec<E>> {
        if let Some(items) = self.cached() {
            return items;
        }
        let _gate = self.load_gate.lock().await;
        if let Some(items) = self.cached() {
            return items;
        }

        let items = Arc::new(self.load_collection().await);
        *self.items.write().expect("items lock") = Some(Arc::clone(&items));
        items
    }

    /// Case-insensitive slug lookup.
    ///
    /// Served from the snapshot when one is published; otherwise takes the
    /// direct single-file path — only the matching file is fetched and
    /// parsed, and the full collection is left unloaded.
    pub async fn get_by_slug(&self, slug: &str) -> Option<E> {
        if let Some(items) = self.cached() {
            return items
                .iter()
                .find(|e| e.slug().eq_ignore_ascii_case(slug))
                .cloned();
        }

        let files = self.index.files(&self.category).await;
        let file = files
            .iter()
            .find(|f| slug::slug_from_filename(f).eq_ignore_ascii_case(slug))?;
        self.load_one(file).await
    }

    /// Whether the pre-built content index is served. Memoized after the
    /// first attempt, success or failure.
    pub async fn is_index_available(&self) -> bool {
        self.index.get().await.is_some()
    }

    /// Drop every cached field. In-flight loads are not cancelled; they
    /// publish their result when they complete.
    pub fn invalidate(&self) {
        *self.items.write().expect("items lock") = None;
        self.index.invalidate();
    }

    /// Fire-and-forget warm-up, so independent categories can be kicked
    /// off concurrently at startup.
    pub fn spawn_preload(self: &Arc<Self>) {
        let service = Arc::clone(self);
        tokio::spawn(async move {
            let _ = service.get_all().await;
        });
    }

    fn cached(&self) -> Option<Arc<Vec<E>>> {
        self.items.read().expect("items lock").clone()
    }

    async fn load_one(&self, file: &str) -> Option<E> {
        let path = format!("content/{}/{}", self.category.dir(), file);
        let raw = match self.fetcher.fetch(&path).await {
            Ok(raw) => raw,
            Err(err) => {
                log::warn!("{path}: fetch failed: {err}");
                return None;
            }
        };
        match parse_document(&path, &raw, &self.options) {
            Ok(doc) => Some(E::from_document(doc)),
            Err(err) => {
                log::warn!("{path}: {err}");
                None
            }
        }
    }

    async fn load_collection(&self) -> Vec<E> {
        let files = self.index.files(&self.category).await;
        let mut items = Vec::with_capacity(files.len());
        for file in &files {
            if let Some(entity) = self.load_one(file).await {
                items.push(entity);
            }
        }

        // First occurrence per slug wins, in index order, before sorting.
        let mut seen = HashSet::new();
        items.retain(|e| seen.insert(e.slug().to_lowercase()));

        E::sort(&mut items);
        E::link_neighbors(&mut items);
        items
    }
}

impl ContentService<BlogPost> {
    pub fn blog(fetcher: Arc<dyn ContentFetcher>) -> Self {
        Self::new(fetcher, Category::Blog)
    }
}

impl ContentService<ProjectCard> {
    pub fn projects(fetcher: Arc<dyn ContentFetcher>) -> Self {
        Self::new(fetcher, Category::Projects)
    }
}

impl ContentService<ArticleCard> {
    pub fn articles(fetcher: Arc<dyn ContentFetcher>) -> Self {
        Self::new(fetcher, Category::Articles)
    }
}

impl ContentService<DocPage> {
    pub fn docs(fetcher: Arc<dyn ContentFetcher>) -> Self {
        Self::new(fetcher, Category::Docs)
    }

    /// Dynamic sections are served as doc-page collections.
    pub fn section(fetcher: Arc<dyn ContentFetcher>, name: impl Into<String>) -> Self {
        Self::new(fetcher, Category::Section(name.into()))
    }
}

impl ContentService<FeatureCard> {
    pub fn features(fetcher: Arc<dyn ContentFetcher>) -> Self {
        Self::new(fetcher, Category::Features)
    }
}

// ============================================================================
// NavigationService
// ============================================================================

/// Serves the navigation snapshot, pre-built index first.
pub struct NavigationService {
    fetcher: Arc<dyn ContentFetcher>,
    index: IndexCache,
    prebuilt: RwLock<Memo<NavigationIndex>>,
    /// Separate from `gate`: `navigation()` calls `prebuilt()` while
    /// holding `gate`, and tokio mutexes are not re-entrant.
    prebuilt_gate: Mutex<()>,
    nav: RwLock<Option<Arc<NavigationIndex>>>,
    gate: Mutex<()>,
}

impl NavigationService {
    pub fn new(fetcher: Arc<dyn ContentFetcher>) -> Self {
        Self {
            index: IndexCache::new(Arc::clone(&fetcher)),
            fetcher,
            prebuilt: RwLock::new(Memo::default()),
            prebuilt_gate: Mutex::new(()),
            nav: RwLock::new(None),
            gate: Mutex::new(()),
        }
    }

    /// The navigation index, from `navigation-index.json` when present,
    /// otherwise rebuilt by parsing every listed file's frontmatter.
    pub async fn navigation(&self) -> Arc<NavigationIndex> {
        if let Some(nav) = self.nav.read().expect("nav lock").clone() {
            return nav;
        }
        let _gate = self.gate.lock().await;
        if let Some(nav) = self.nav.read().expect("nav lock").clone() {
            return nav;
        }

        let nav = match self.prebuilt().await {
            Some(nav) => nav,
            None => Arc::new(self.rebuild().await),
        };
        *self.nav.write().expect("nav lock") = Some(Arc::clone(&nav));
        nav
    }

    /// Menu items for one category, menu-hidden entries filtered out.
    pub async fn menu(&self, category: &Category) -> Vec<MenuItem> {
        self.navigation()
            .await
            .menu(category)
            .iter()
            .filter(|item| item.show_in_menu)
            .cloned()
            .collect()
    }

    /// Whether the pre-built navigation index is served. Memoized after
    /// the first attempt, success or failure.
    pub async fn is_index_available(&self) -> bool {
        self.prebuilt().await.is_some()
    }

    pub fn invalidate(&self) {
        *self.nav.write().expect("nav lock") = None;
        *self.prebuilt.write().expect("prebuilt lock") = Memo::default();
        self.index.invalidate();
    }

    async fn prebuilt(&self) -> Option<Arc<NavigationIndex>> {
        {
            let memo = self.prebuilt.read().expect("prebuilt lock");
            if memo.fetched {
                return memo.value.clone();
            }
        }
        let _gate = self.prebuilt_gate.lock().await;
        {
            let memo = self.prebuilt.read().expect("prebuilt lock");
            if memo.fetched {
                return memo.value.clone();
            }
        }

        let value = match self.fetcher.fetch(NAVIGATION_INDEX_FILE).await {
            Ok(text) => match serde_json::from_str::<NavigationIndex>(&text) {
                Ok(nav) => Some(Arc::new(nav)),
                Err(err) => {
                    log::warn!("navigation index unparseable, rebuilding: {err}");
                    None
                }
            },
            Err(err) => {
                log::debug!("navigation index unavailable: {err}");
                None
            }
        };

        let mut memo = self.prebuilt.write().expect("prebuilt lock");
        memo.fetched = true;
        memo.value = value.clone();
        value
    }

    async fn rebuild(&self) -> NavigationIndex {
        let mut nav = NavigationIndex::default();
        let categories = match self.index.get().await {
            Some(index) => index.categories(),
            None => vec![Category::Projects, Category::Articles, Category::Docs],
        };

        for category in categories {
            if matches!(category, Category::Blog | Category::Features) {
                continue;
            }
            let mut items = Vec::new();
            for file in self.index.files(&category).await {
                let path = format!("content/{}/{}", category.dir(), file);
                let raw = match self.fetcher.fetch(&path).await {
                    Ok(raw) => raw,
                    Err(err) => {
                        log::warn!("{path}: fetch failed: {err}");
                        continue;
                    }
                };
                let extracted = crate::frontmatter::extract(&raw);
                let Some(front) = extracted.meta else {
                    log::warn!("{path}: malformed frontmatter, dropped from navigation");
                    continue;
                };
                let (order, slug) = slug::order_and_slug_from_filename(&file);
                items.push(MenuItem::from_front(&slug, order, &front));
            }
            items.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.slug.cmp(&b.slug)));
            nav.set_menu(&category, items);
        }
        nav
    }
}

// ============================================================================
// MetadataService
// ============================================================================

/// Serves the lightweight metadata snapshot, pre-built index first.
pub struct MetadataService {
    fetcher: Arc<dyn ContentFetcher>,
    options: ParseOptions,
    index: IndexCache,
    prebuilt: RwLock<Memo<MetadataIndex>>,
    prebuilt_gate: Mutex<()>,
    metadata: RwLock<Option<Arc<MetadataIndex>>>,
    gate: Mutex<()>,
}

impl MetadataService {
    pub fn new(fetcher: Arc<dyn ContentFetcher>) -> Self {
        Self::with_options(fetcher, ParseOptions::default())
    }

    pub fn with_options(fetcher: Arc<dyn ContentFetcher>, options: ParseOptions) -> Self {
        Self {
            index: IndexCache::new(Arc::clone(&fetcher)),
            fetcher,
            options,
            prebuilt: RwLock::new(Memo::default()),
            prebuilt_gate: Mutex::new(()),
            metadata: RwLock::new(None),
            gate: Mutex::new(()),
        }
    }

    /// The metadata index, from `content-metadata.json` when present,
    /// otherwise rebuilt from frontmatter.
    pub async fn metadata(&self) -> Arc<MetadataIndex> {
        if let Some(meta) = self.metadata.read().expect("metadata lock").clone() {
            return meta;
        }
        let _gate = self.gate.lock().await;
        if let Some(meta) = self.metadata.read().expect("metadata lock").clone() {
            return meta;
        }

        let meta = match self.prebuilt().await {
            Some(meta) => meta,
            None => Arc::new(self.rebuild().await),
        };
        *self.metadata.write().expect("metadata lock") = Some(Arc::clone(&meta));
        meta
    }

    /// Records for one category.
    pub async fn records(&self, category: &Category) -> Vec<ContentSummary> {
        self.metadata().await.records(category).to_vec()
    }

    /// Whether the pre-built metadata index is served. Memoized after the
    /// first attempt, success or failure.
    pub async fn is_index_available(&self) -> bool {
        self.prebuilt().await.is_some()
    }

    pub fn invalidate(&self) {
        *self.metadata.write().expect("metadata lock") = None;
        *self.prebuilt.write().expect("prebuilt lock") = Memo::default();
        self.index.invalidate();
    }

    async fn prebuilt(&self) -> Option<Arc<MetadataIndex>> {
        {
            let memo = self.prebuilt.read().expect("prebuilt lock");
            if memo.fetched {
                return memo.value.clone();
            }
        }
        let _gate = self.prebuilt_gate.lock().await;
        {
            let memo = self.prebuilt.read().expect("prebuilt lock");
            if memo.fetched {
                return memo.value.clone();
            }
        }

        let value = match self.fetcher.fetch(METADATA_INDEX_FILE).await {
            Ok(text) => match serde_json::from_str::<MetadataIndex>(&text) {
                Ok(meta) => Some(Arc::new(meta)),
                Err(err) => {
                    log::warn!("metadata index unparseable, rebuilding: {err}");
                    None
                }
            },
            Err(err) => {
                log::debug!("metadata index unavailable: {err}");
                None
            }
        };

        let mut memo = self.prebuilt.write().expect("prebuilt lock");
        memo.fetched = true;
        memo.value = value.clone();
        value
    }

    async fn rebuild(&self) -> MetadataIndex {
        let mut metadata = MetadataIndex::default();
        let categories = match self.index.get().await {
            Some(index) => index.categories(),
            None => ContentIndex::default().categories(),
        };

        for category in categories {
            let mut records = Vec::new();
            for file in self.index.files(&category).await {
                let path = format!("content/{}/{}", category.dir(), file);
                let raw = match self.fetcher.fetch(&path).await {
                    Ok(raw) => raw,
                    Err(err) => {
                        log::warn!("{path}: fetch failed: {err}");
                        continue;
                    }
                };
                let extracted = crate::frontmatter::extract(&raw);
                let Some(front) = extracted.meta else {
                    log::warn!("{path}: malformed frontmatter, dropped from metadata");
                    continue;
                };
                let (order, slug) = slug::order_and_slug_from_filename(&file);
                let reading_time =
                    crate::markdown::reading_time(extracted.body, self.options.words_per_minute);
                records.push(ContentSummary::from_front(&slug, order, &front, reading_time));
            }

            let mut seen = HashSet::new();
            records.retain(|r| seen.insert(r.slug.to_lowercase()));
            if category.descending_by_filename() {
                records.sort_by(|a, b| b.publish_date.cmp(&a.publish_date));
            } else {
                records.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.slug.cmp(&b.slug)));
            }
            metadata.set_records(&category, records);
        }
        metadata
    }
}
