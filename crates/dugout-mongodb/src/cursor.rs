//! Forward-only record cursor

use crate::budget::Budget;
use crate::record::Record;
use bson::Document as BsonDocument;
use dugout_common::{DugoutError, Result};
use futures::TryStreamExt;
use mongodb::Cursor;
use std::marker::PhantomData;
use tracing::debug;

/// Single-pass cursor decoding each document into `T`.
///
/// The server-side cursor is released as soon as the scan is exhausted or any
/// iteration or decode error occurs; dropping the cursor early releases it too.
pub struct RecordCursor<T: Record> {
    inner: Option<Cursor<BsonDocument>>,
    budget: Budget,
    yielded: usize,
    _record: PhantomData<T>,
}

impl<T: Record> RecordCursor<T> {
    pub(crate) fn new(inner: Cursor<BsonDocument>, budget: Budget) -> Self {
        Self {
            inner: Some(inner),
            budget,
            yielded: 0,
            _record: PhantomData,
        }
    }

    /// Next record, or `None` once the cursor is exhausted
    pub async fn next(&mut self) -> Result<Option<T>> {
        let Some(cursor) = self.inner.as_mut() else {
            return Ok(None);
        };

        let fetched = self
            .budget
            .run("cursor next", async {
                cursor
                    .try_next()
                    .await
                    .map_err(|e| DugoutError::Cursor(e.to_string()))
            })
            .await;

        let decoded = match fetched {
            Ok(Some(doc)) => T::from_bson(doc).map(Some),
            Ok(None) => Ok(None),
            Err(e) => Err(e),
        };

        match decoded {
            Ok(Some(record)) => {
                self.yielded += 1;
                Ok(Some(record))
            }
            other => {
                self.release();
                other
            }
        }
    }

    /// Feed every remaining record to `f`, numbered from 1.
    ///
    /// Returns how many records were visited. The cursor is released on every
    /// path, including an error returned by `f`.
    pub async fn for_each<F>(&mut self, mut f: F) -> Result<usize>
    where
        F: FnMut(usize, T) -> Result<()>,
    {
        while let Some(record) = self.next().await? {
            if let Err(e) = f(self.yielded, record) {
                self.release();
                return Err(e);
            }
        }
        self.release();
        Ok(self.yielded)
    }

    /// Drain into a vector and close
    pub async fn collect(mut self) -> Result<Vec<T>> {
        let mut records = Vec::new();
        while let Some(record) = self.next().await? {
            records.push(record);
        }
        self.close();
        Ok(records)
    }

    /// Records yielded so far
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    pub fn is_open(&self) -> bool {
        self.inner.is_some()
    }

    /// Release the cursor explicitly, returning how many records it yielded
    pub fn close(mut self) -> usize {
        self.release();
        self.yielded
    }

    fn release(&mut self) {
        if self.inner.take().is_some() {
            debug!(yielded = self.yielded, "Cursor released");
        }
    }
}
