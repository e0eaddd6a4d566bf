//! Sheet-by-sheet upload of a catalog workbook
//!
//! Bindings are processed in [`EntityKind::ALL`] order. A missing or unreadable
//! sheet leaves its collection untouched, a bad row is dropped, and the first
//! failed commit ends the run with everything committed before it still applied.

use log::{debug, info, warn};
use serde_json::Map;

use super::batch::{BatchCommitter, CommitError};
use super::entities::{
    ContentItem, Entity, FeaturedList, Product, Segment, Topic, segment_list,
};
use super::order::reorder_products;
use super::schema::{EntityKind, SEGMENTS_COLLECTION, SEGMENTS_DOCUMENT, SEGMENTS_FIELD};
use crate::config::{Config, SheetConfig};
use crate::sheet::{Row, TabularSource};
use crate::store::{DocumentStore, Operation};

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("failed to encode {kind} document '{identity}'")]
    Encode {
        kind: EntityKind,
        identity: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("upload of {kind} stopped")]
    Commit {
        kind: EntityKind,
        /// Sheets fully committed before the failure
        completed: Vec<SheetSummary>,
        #[source]
        source: CommitError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetStatus {
    /// The sheet was found and its operations committed
    Written {
        records: usize,
        dropped: usize,
        operations: usize,
    },
    /// No sheet for this binding; the collection was not touched
    Missing,
    /// The sheet exists but could not be read; the collection was not touched
    Unreadable { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSummary {
    pub kind: EntityKind,
    /// Name of the sheet that was read
    pub sheet: Option<String>,
    pub status: SheetStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSummary {
    pub sheets: Vec<SheetSummary>,
    pub operations: usize,
    pub commits: usize,
}

/// Operations produced by one sheet
struct SheetPlan {
    records: usize,
    dropped: usize,
    operations: Vec<Operation>,
}

pub struct Uploader<'a> {
    store: &'a dyn DocumentStore,
    config: &'a Config,
}

impl<'a> Uploader<'a> {
    pub fn new(store: &'a dyn DocumentStore, config: &'a Config) -> Self {
        Self { store, config }
    }

    /// Upload every bound sheet found in `source`
    pub async fn run(&self, source: &mut dyn TabularSource) -> Result<UploadSummary, UploadError> {
        let committer = BatchCommitter::new(self.store, self.config.batch_size);
        let mut summary = UploadSummary::default();

        for kind in EntityKind::ALL {
            let sheet_config = self.config.sheet(kind);

            let candidates = sheet_candidates(kind, &sheet_config);
            let Some(sheet) = source.resolve_sheet(&candidates) else {
                warn!("No sheet for {} (tried {}), skipping", kind, candidates.join(", "));
                summary.sheets.push(SheetSummary {
                    kind,
                    sheet: None,
                    status: SheetStatus::Missing,
                });
                continue;
            };

            let mut rows = match source.read_sheet(&sheet) {
                Ok(rows) => rows,
                Err(e) => {
                    warn!("Could not read sheet '{}', skipping {}: {:#}", sheet, kind, e);
                    summary.sheets.push(SheetSummary {
                        kind,
                        sheet: Some(sheet),
                        status: SheetStatus::Unreadable {
                            error: format!("{:#}", e),
                        },
                    });
                    continue;
                }
            };

            if sheet_config.skip_description_row && !rows.is_empty() {
                let description = rows.remove(0);
                debug!("Skipping description row {} of '{}'", description.number(), sheet);
            }

            info!("Processing sheet '{}' ({} rows) into {}", sheet, rows.len(), kind.collection());

            let plan = self.plan(kind, &rows)?;

            let committed = match committer.commit_all(&plan.operations).await {
                Ok(committed) => committed,
                Err(source) => {
                    return Err(UploadError::Commit {
                        kind,
                        completed: summary.sheets,
                        source,
                    });
                }
            };

            info!(
                "Sheet '{}': {} record(s), {} dropped, {} write(s) in {} commit(s)",
                sheet, plan.records, plan.dropped, committed.operations, committed.commits
            );

            summary.operations += committed.operations;
            summary.commits += committed.commits;
            summary.sheets.push(SheetSummary {
                kind,
                sheet: Some(sheet),
                status: SheetStatus::Written {
                    records: plan.records,
                    dropped: plan.dropped,
                    operations: committed.operations,
                },
            });
        }

        Ok(summary)
    }

    fn plan(&self, kind: EntityKind, rows: &[Row]) -> Result<SheetPlan, UploadError> {
        if kind.is_aggregate() {
            return segment_plan(rows);
        }

        match kind {
            EntityKind::Topic => document_plan(build_entities::<Topic>(rows)),
            EntityKind::Product => {
                let mut built = build_entities::<Product>(rows);
                if self.config.recompute_product_order {
                    debug!("Recomputing product order for {} product(s)", built.0.len());
                    reorder_products(&mut built.0);
                }
                document_plan(built)
            }
            EntityKind::FeaturedList => document_plan(build_entities::<FeaturedList>(rows)),
            EntityKind::ContentItem => document_plan(build_entities::<ContentItem>(rows)),
            EntityKind::Segment => segment_plan(rows),
        }
    }
}

/// Sheet names to try for a binding: configured name, default, then aliases
pub fn sheet_candidates(kind: EntityKind, sheet_config: &SheetConfig) -> Vec<&str> {
    let mut candidates: Vec<&str> = Vec::new();
    if let Some(name) = sheet_config.name.as_deref() {
        candidates.push(name);
    }
    candidates.push(kind.sheet_name());
    candidates.extend(kind.sheet_aliases());
    candidates
}

/// Build entities from rows; returns the entities and the dropped-row count
fn build_entities<E: Entity>(rows: &[Row]) -> (Vec<E>, usize) {
    let mut entities = Vec::with_capacity(rows.len());
    let mut dropped = 0;

    for row in rows {
        match E::from_row(row) {
            Ok(entity) => entities.push(entity),
            Err(e) => {
                debug!("Dropping {} {}", E::KIND, e);
                dropped += 1;
            }
        }
    }

    if dropped > 0 {
        warn!("Dropped {} invalid {} row(s)", dropped, E::KIND);
    }

    (entities, dropped)
}

/// One upsert per entity, keyed by its identity
fn document_plan<E: Entity>((entities, dropped): (Vec<E>, usize)) -> Result<SheetPlan, UploadError> {
    let operations = entities
        .iter()
        .map(|entity| {
            let data = entity.to_document().map_err(|source| UploadError::Encode {
                kind: E::KIND,
                identity: entity.identity().to_string(),
                source,
            })?;
            Ok(Operation::upsert(E::KIND.collection(), entity.identity(), data))
        })
        .collect::<Result<Vec<_>, UploadError>>()?;

    Ok(SheetPlan {
        records: entities.len(),
        dropped,
        operations,
    })
}

/// The whole published segment list as one aggregate document
fn segment_plan(rows: &[Row]) -> Result<SheetPlan, UploadError> {
    let (segments, dropped) = build_entities::<Segment>(rows);
    let list = segment_list(segments);

    if list.is_empty() {
        info!("No published segments, leaving {}/{} unchanged", SEGMENTS_COLLECTION, SEGMENTS_DOCUMENT);
        return Ok(SheetPlan {
            records: 0,
            dropped,
            operations: Vec::new(),
        });
    }

    let encoded = serde_json::to_value(&list).map_err(|source| UploadError::Encode {
        kind: EntityKind::Segment,
        identity: SEGMENTS_DOCUMENT.to_string(),
        source,
    })?;

    let mut data = Map::new();
    data.insert(SEGMENTS_FIELD.to_string(), encoded);

    Ok(SheetPlan {
        records: list.len(),
        dropped,
        operations: vec![Operation::upsert(SEGMENTS_COLLECTION, SEGMENTS_DOCUMENT, data)],
    })
}

#[cfg(test)]
impl UploadSummary {
    /// Records written for one binding, if its sheet was uploaded
    pub fn records(&self, kind: EntityKind) -> Option<usize> {
        self.sheets.iter().find(|s| s.kind == kind).and_then(|s| match s.status {
            SheetStatus::Written { records, .. } => Some(records),
            SheetStatus::Missing | SheetStatus::Unreadable { .. } => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::MemorySource;
    use crate::store::MemoryStore;
    use crate::store::testing::FailingStore;
    use serde_json::json;

    fn topic_rows() -> Vec<Row> {
        vec![
            Row::new(2).with("topicId", "grammar").with("title", "Grammar").with("tags", "a;b"),
            Row::new(3).with("title", "No id"),
            Row::new(4).with("topicId", "idioms").with("title", "Idioms"),
        ]
    }

    #[tokio::test]
    async fn test_missing_sheets_are_skipped_and_not_read() {
        let store = MemoryStore::new();
        let config = Config::default();
        let mut source = MemorySource::new().with_sheet("Topics", topic_rows());

        let summary = Uploader::new(&store, &config).run(&mut source).await.unwrap();

        assert_eq!(source.reads, vec!["Topics".to_string()]);
        assert_eq!(summary.sheets.len(), 5);
        assert_eq!(summary.sheets[0].status, SheetStatus::Missing);
        assert_eq!(
            summary.sheets[1].status,
            SheetStatus::Written {
                records: 2,
                dropped: 1,
                operations: 2
            }
        );
        assert_eq!(summary.records(EntityKind::Product), None);
        assert_eq!(summary.commits, 1);
        assert_eq!(store.document_count(), 2);

        let grammar = store.get("topics", "grammar").unwrap();
        assert_eq!(grammar["tags"], json!(["a", "b"]));
        assert!(grammar.get("topicId").is_none());
    }

    /// Fails to read one named sheet, delegates everything else
    struct BrokenSheetSource {
        inner: MemorySource,
        broken: &'static str,
    }

    impl TabularSource for BrokenSheetSource {
        fn sheet_names(&self) -> Vec<String> {
            self.inner.sheet_names()
        }

        fn read_sheet(&mut self, name: &str) -> anyhow::Result<Vec<Row>> {
            if name == self.broken {
                anyhow::bail!("corrupt sheet xml");
            }
            self.inner.read_sheet(name)
        }
    }

    #[tokio::test]
    async fn test_unreadable_sheet_skipped_and_later_sheets_committed() {
        let store = MemoryStore::new();
        let config = Config::default();
        let mut source = BrokenSheetSource {
            inner: MemorySource::new().with_sheet("Topics", topic_rows()).with_sheet(
                "Products",
                vec![Row::new(2).with("productId", "P1").with("topicId", "grammar")],
            ),
            broken: "Topics",
        };

        let summary = Uploader::new(&store, &config).run(&mut source).await.unwrap();

        assert_eq!(summary.sheets[1].sheet.as_deref(), Some("Topics"));
        match &summary.sheets[1].status {
            SheetStatus::Unreadable { error } => assert!(error.contains("corrupt sheet xml")),
            other => panic!("unexpected status: {other:?}"),
        }
        assert_eq!(summary.records(EntityKind::Topic), None);
        assert_eq!(summary.records(EntityKind::Product), Some(1));
        assert!(store.get("topics", "grammar").is_none());
        assert!(store.get("products", "P1").is_some());
    }

    #[tokio::test]
    async fn test_row_with_nested_path_id_is_dropped() {
        let store = MemoryStore::new();
        let config = Config::default();
        let mut source = MemorySource::new().with_sheet(
            "ContentItems",
            vec![
                Row::new(2).with("itemId", "grammar/01").with("productId", "P1"),
                Row::new(3).with("itemId", "grammar-02").with("productId", "P1"),
            ],
        );

        let summary = Uploader::new(&store, &config).run(&mut source).await.unwrap();

        assert_eq!(
            summary.sheets[4].status,
            SheetStatus::Written {
                records: 1,
                dropped: 1,
                operations: 1
            }
        );
        assert_eq!(store.document_count(), 1);
        assert!(store.get("content_items", "grammar-02").is_some());
    }

    #[tokio::test]
    async fn test_segments_written_as_one_document() {
        let store = MemoryStore::new();
        let config = Config::default();
        let mut source = MemorySource::new().with_sheet(
            "UI_SEGMENTS",
            vec![
                Row::new(2).with("segmentId", "s2").with("title", "Two").with("order", 2i64),
                Row::new(3).with("segmentId", "s1").with("title", "One").with("order", 1i64),
                Row::new(4)
                    .with("segmentId", "hidden")
                    .with("title", "Hidden")
                    .with("published", false),
            ],
        );

        let summary = Uploader::new(&store, &config).run(&mut source).await.unwrap();

        assert_eq!(store.commit_sizes(), vec![1]);
        assert_eq!(summary.records(EntityKind::Segment), Some(2));

        let doc = store.get("ui", "segments_v1").unwrap();
        let ids: Vec<&str> = doc["segments"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["s1", "s2"]);
    }

    #[tokio::test]
    async fn test_unrecognized_published_token_keeps_segment() {
        let store = MemoryStore::new();
        let config = Config::default();
        let mut source = MemorySource::new().with_sheet(
            "Segments",
            vec![
                Row::new(2).with("segmentId", "a").with("title", "A").with("published", "no"),
                Row::new(3).with("segmentId", "b").with("title", "B").with("published", 0i64),
                Row::new(4).with("segmentId", "c").with("title", "C").with("published", false),
            ],
        );

        let summary = Uploader::new(&store, &config).run(&mut source).await.unwrap();

        // only a real boolean false unpublishes; other tokens fall back to the default
        assert_eq!(summary.records(EntityKind::Segment), Some(2));
        let doc = store.get("ui", "segments_v1").unwrap();
        let ids: Vec<&str> = doc["segments"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_no_published_segments_writes_nothing() {
        let store = MemoryStore::new();
        store.seed("ui", "segments_v1", json!({"segments": [{"id": "keep"}]}));
        let config = Config::default();
        let mut source = MemorySource::new().with_sheet(
            "Segments",
            vec![Row::new(2).with("segmentId", "s1").with("title", "One").with("published", false)],
        );

        Uploader::new(&store, &config).run(&mut source).await.unwrap();

        assert_eq!(store.commit_count(), 0);
        let doc = store.get("ui", "segments_v1").unwrap();
        assert_eq!(doc["segments"][0]["id"], json!("keep"));
    }

    #[tokio::test]
    async fn test_commit_failure_stops_later_sheets() {
        let store = FailingStore::failing_on(2);
        let config = Config::default();
        let mut source = MemorySource::new()
            .with_sheet("Topics", topic_rows())
            .with_sheet(
                "Products",
                vec![Row::new(2).with("productId", "P1").with("topicId", "grammar")],
            )
            .with_sheet(
                "ContentItems",
                vec![Row::new(2).with("itemId", "i1").with("productId", "P1")],
            );

        let err = Uploader::new(&store, &config).run(&mut source).await.unwrap_err();

        match err {
            UploadError::Commit {
                kind,
                completed,
                source,
            } => {
                assert_eq!(kind, EntityKind::Product);
                assert_eq!(source.chunk, 1);
                assert_eq!(source.committed_operations, 0);
                // Segments (missing) and Topics completed before the failure
                assert_eq!(completed.len(), 2);
            }
            other => panic!("unexpected error: {other}"),
        }

        assert_eq!(source.reads, vec!["Topics".to_string(), "Products".to_string()]);
        assert_eq!(store.attempts(), 2);
        assert!(store.inner.get("topics", "grammar").is_some());
        assert!(store.inner.get("products", "P1").is_none());
        assert!(store.inner.get("content_items", "i1").is_none());
    }

    #[tokio::test]
    async fn test_description_row_skipped_when_configured() {
        let store = MemoryStore::new();
        let config = Config::from_toml(
            "[sheets.topics]\nname = \"Topic list\"\nskip_description_row = true",
        )
        .unwrap();
        let mut rows = vec![
            Row::new(2)
                .with("topicId", "Topic identifier")
                .with("title", "Display title"),
        ];
        rows.extend(topic_rows());
        let mut source = MemorySource::new()
            .with_sheet("Topics", vec![])
            .with_sheet("Topic list", rows);

        let summary = Uploader::new(&store, &config).run(&mut source).await.unwrap();

        assert_eq!(summary.sheets[1].sheet.as_deref(), Some("Topic list"));
        assert_eq!(summary.records(EntityKind::Topic), Some(2));
        assert!(store.get("topics", "Topic identifier").is_none());
    }

    #[tokio::test]
    async fn test_product_order_recomputed_when_configured() {
        let store = MemoryStore::new();
        let config = Config::from_toml("recompute_product_order = true").unwrap();
        let mut source = MemorySource::new().with_sheet(
            "Products",
            vec![
                Row::new(2)
                    .with("productId", "P1")
                    .with("topicId", "T1")
                    .with("level", "L2")
                    .with("order", 7i64),
                Row::new(3).with("productId", "P2").with("topicId", "T1").with("level", "L1"),
            ],
        );

        Uploader::new(&store, &config).run(&mut source).await.unwrap();

        assert_eq!(store.get("products", "P1").unwrap()["order"], json!(2));
        assert_eq!(store.get("products", "P2").unwrap()["order"], json!(1));
    }

    #[tokio::test]
    async fn test_upload_merges_into_existing_documents() {
        let store = MemoryStore::new();
        store.seed("topics", "grammar", json!({"foo": 1, "title": "Old"}));
        let config = Config::default();
        let mut source = MemorySource::new().with_sheet("Topics", topic_rows());

        Uploader::new(&store, &config).run(&mut source).await.unwrap();

        let grammar = store.get("topics", "grammar").unwrap();
        assert_eq!(grammar["foo"], json!(1));
        assert_eq!(grammar["title"], json!("Grammar"));
    }
}
