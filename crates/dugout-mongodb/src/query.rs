//! Filters, updates and the find query builder

use bson::{doc, Bson, Document as BsonDocument};
use mongodb::options::FindOptions;

/// Exact-match predicates over record fields
pub struct Filter;

impl Filter {
    /// `{ field: value }`
    pub fn eq(field: &str, value: impl Into<Bson>) -> BsonDocument {
        let mut filter = BsonDocument::new();
        filter.insert(field, value.into());
        filter
    }

    /// Conjunction of exact matches, `{ f1: v1, f2: v2, ... }`
    pub fn all<I, V>(pairs: I) -> BsonDocument
    where
        I: IntoIterator<Item = (&'static str, V)>,
        V: Into<Bson>,
    {
        pairs
            .into_iter()
            .map(|(field, value)| (field.to_string(), value.into()))
            .collect()
    }

    /// Matches every document
    pub fn any() -> BsonDocument {
        BsonDocument::new()
    }
}

/// Update documents
pub struct Update;

impl Update {
    /// `{ "$set": { field: value } }`
    pub fn set(field: &str, value: impl Into<Bson>) -> BsonDocument {
        doc! { "$set": Filter::eq(field, value) }
    }
}

/// Query builder for find operations
#[derive(Debug, Clone, Default)]
pub struct FindQuery {
    filter: BsonDocument,
    sort: Option<BsonDocument>,
    skip: Option<u64>,
    limit: Option<i64>,
}

impl FindQuery {
    /// Create a new query matching `filter`
    pub fn new(filter: BsonDocument) -> Self {
        Self {
            filter,
            ..Default::default()
        }
    }

    /// Set the sort order
    pub fn sort(mut self, sort: BsonDocument) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Set the number of documents to skip
    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Set the maximum number of documents to return
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn get_filter(&self) -> &BsonDocument {
        &self.filter
    }

    pub fn get_sort(&self) -> Option<&BsonDocument> {
        self.sort.as_ref()
    }

    pub fn get_skip(&self) -> Option<u64> {
        self.skip
    }

    pub fn get_limit(&self) -> Option<i64> {
        self.limit
    }

    /// Driver options for this query
    pub fn to_options(&self) -> FindOptions {
        let mut options = FindOptions::default();
        options.sort = self.sort.clone();
        options.skip = self.skip;
        options.limit = self.limit;
        options
    }

    /// Split into the filter and driver options
    pub fn into_parts(self) -> (BsonDocument, FindOptions) {
        let options = self.to_options();
        (self.filter, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_eq() {
        assert_eq!(Filter::eq("lastname", "Robinson"), doc! { "lastname": "Robinson" });
        assert_eq!(Filter::eq("weight", 215), doc! { "weight": 215 });
    }

    #[test]
    fn test_filter_all() {
        let filter = Filter::all([("bats", "Left"), ("throws", "Left")]);
        assert_eq!(filter, doc! { "bats": "Left", "throws": "Left" });
    }

    #[test]
    fn test_filter_any() {
        assert!(Filter::any().is_empty());
    }

    #[test]
    fn test_update_set() {
        assert_eq!(
            Update::set("position", "1B"),
            doc! { "$set": { "position": "1B" } }
        );
    }

    #[test]
    fn test_find_query_new() {
        let query = FindQuery::new(Filter::eq("position", "OF"));
        assert_eq!(query.get_filter(), &doc! { "position": "OF" });
        assert!(query.get_sort().is_none());
        assert!(query.get_skip().is_none());
        assert!(query.get_limit().is_none());
    }

    #[test]
    fn test_find_query_chaining() {
        let query = FindQuery::new(Filter::eq("position", "OF"))
            .sort(doc! { "lastname": 1 })
            .skip(1)
            .limit(2);

        assert_eq!(query.get_sort(), Some(&doc! { "lastname": 1 }));
        assert_eq!(query.get_skip(), Some(1));
        assert_eq!(query.get_limit(), Some(2));
    }

    #[test]
    fn test_to_options() {
        let options = FindQuery::new(Filter::any()).limit(2).to_options();
        assert_eq!(options.limit, Some(2));
        assert!(options.sort.is_none());
        assert!(options.skip.is_none());
    }

    #[test]
    fn test_into_parts() {
        let (filter, options) = FindQuery::new(Filter::eq("bats", "Right"))
            .sort(doc! { "weight": -1 })
            .into_parts();
        assert_eq!(filter, doc! { "bats": "Right" });
        assert_eq!(options.sort, Some(doc! { "weight": -1 }));
    }
}
