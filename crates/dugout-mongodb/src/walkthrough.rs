//! The fixed CRUD walkthrough over the `player` collection
//!
//! Steps run strictly in order and every checked error ends the run. The two
//! single-document inserts at the start are the exception: their failures are
//! logged, printed as `<insert failed>` and recorded in
//! [`WalkthroughReport::tolerated_failures`], and the run continues.

use crate::query::{Filter, FindQuery, Update};
use crate::record::{Player, PlayerDocument};
use crate::store::RecordStore;
use bson::{doc, Bson, Document as BsonDocument};
use dugout_common::Result;
use serde::Serialize;
use std::io::Write;
use tracing::{info, warn};

/// How many `OF` players the multi-record lookup reads at most
pub const LIST_LIMIT: i64 = 2;

pub mod roster {
    //! Players used by the walkthrough

    use super::*;

    pub fn jackie_robinson() -> Player {
        Player::new("Jackie", "Robinson", "Right", "Right", "2B", 200, 5, 11)
    }

    /// Joe Carter, built as a free-form document rather than a struct
    pub fn joe_carter() -> BsonDocument {
        doc! {
            "firstname": "Joe",
            "lastname": "Carter",
            "bats": "Right",
            "throws": "Right",
            "position": "OF",
            "weight": 215,
            "heightfeet": 6,
            "heightinches": 3,
        }
    }

    pub fn albert_pujols() -> Player {
        Player::new("Albert", "Pujols", "Right", "Right", "1B", 235, 6, 3)
    }

    pub fn babe_ruth() -> Player {
        Player::new("Babe", "Ruth", "Left", "Left", "OF", 215, 6, 2)
    }
}

/// What the walkthrough did, step by step
#[derive(Debug, Clone, Default, Serialize)]
pub struct WalkthroughReport {
    pub struct_insert_id: Option<String>,
    pub document_insert_id: Option<String>,
    /// Single inserts that failed but did not stop the run
    pub tolerated_failures: Vec<String>,
    pub batch_insert_ids: Vec<String>,
    pub found: Option<Player>,
    pub listed: Vec<Player>,
    pub modified: u64,
    pub deleted_one: u64,
    pub deleted_many: u64,
}

/// Render an inserted id the way the driver's users expect to read it
pub fn display_id(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Runs the walkthrough against `store`, printing progress to `out`
pub struct Walkthrough<'a, W: Write> {
    store: &'a RecordStore<Player>,
    out: W,
    report: WalkthroughReport,
}

impl<'a, W: Write> Walkthrough<'a, W> {
    pub fn new(store: &'a RecordStore<Player>, out: W) -> Self {
        Self {
            store,
            out,
            report: WalkthroughReport::default(),
        }
    }

    /// Execute every step in order
    pub async fn run(mut self) -> Result<WalkthroughReport> {
        self.insert_documents().await?;
        self.find_one().await?;
        self.find_many().await?;
        self.update().await?;
        self.delete().await?;
        self.out.flush()?;
        Ok(self.report)
    }

    async fn insert_documents(&mut self) -> Result<()> {
        let id = self
            .tolerated_insert("struct", roster::jackie_robinson().into())
            .await;
        writeln!(
            self.out,
            "Inserted a single document from a struct: {}",
            id.as_deref().unwrap_or("<insert failed>")
        )?;
        self.report.struct_insert_id = id;

        let id = self
            .tolerated_insert("document", roster::joe_carter().into())
            .await;
        writeln!(
            self.out,
            "Inserted a single document by constructing BSON: {}",
            id.as_deref().unwrap_or("<insert failed>")
        )?;
        self.report.document_insert_id = id;

        let ids = self
            .store
            .insert_many(vec![roster::albert_pujols().into(), roster::babe_ruth().into()])
            .await?;
        let ids: Vec<String> = ids.iter().map(display_id).collect();
        writeln!(self.out, "Inserted multiple documents: [{}]", ids.join(", "))?;
        self.report.batch_insert_ids = ids;
        Ok(())
    }

    /// Insert whose error is logged and swallowed instead of ending the run
    async fn tolerated_insert(&mut self, label: &str, document: PlayerDocument) -> Option<String> {
        match self.store.insert_one(document).await {
            Ok(id) => Some(display_id(&id)),
            Err(e) => {
                warn!(insert = label, error = %e, "Insert failed; continuing without its id");
                self.report
                    .tolerated_failures
                    .push(format!("{} insert: {}", label, e));
                None
            }
        }
    }

    async fn find_one(&mut self) -> Result<()> {
        let player = self.store.get_one(Filter::eq("lastname", "Robinson")).await?;
        writeln!(self.out, "Found result.\n{}", player)?;
        self.report.found = Some(player);
        Ok(())
    }

    async fn find_many(&mut self) -> Result<()> {
        let query = FindQuery::new(Filter::eq("position", "OF")).limit(LIST_LIMIT);
        let mut cursor = self.store.find(query).await?;

        writeln!(self.out, "\nFound multiple results:")?;
        let out = &mut self.out;
        let listed = &mut self.report.listed;
        let visited = cursor
            .for_each(|n, player| {
                writeln!(out, "Result {}:\n{}", n, player)?;
                listed.push(player);
                Ok(())
            })
            .await?;

        info!(visited, "Cursor drained");
        Ok(())
    }

    async fn update(&mut self) -> Result<()> {
        let outcome = self
            .store
            .update_one(Filter::eq("position", "2B"), Update::set("position", "1B"))
            .await?;
        writeln!(self.out, "Updated {} players", outcome.modified)?;
        self.report.modified = outcome.modified;
        Ok(())
    }

    async fn delete(&mut self) -> Result<()> {
        self.report.deleted_one = self.store.delete_one(Filter::eq("lastname", "Pujols")).await?;
        writeln!(self.out, "Deleted a single document")?;

        let deleted = self.store.delete_many(Filter::eq("bats", "Right")).await?;
        writeln!(self.out, "Deleted {} documents using delete many", deleted)?;
        self.report.deleted_many = deleted;
        Ok(())
    }
}

impl WalkthroughReport {
    /// True when every step, including the tolerated inserts, succeeded
    pub fn is_clean(&self) -> bool {
        self.tolerated_failures.is_empty()
    }

    /// Ids of everything inserted, in insertion order
    pub fn inserted_ids(&self) -> Vec<&str> {
        self.struct_insert_id
            .iter()
            .chain(self.document_insert_id.iter())
            .chain(self.batch_insert_ids.iter())
            .map(String::as_str)
            .collect()
    }
}
