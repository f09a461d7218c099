//! Record trait and the player record
//!
//! `Record` is the capability a typed struct needs to live in a collection:
//! a collection name, an optional storage identifier and BSON conversion.
//! `RecordDocument` covers the two insertable shapes, a typed record or a
//! free-form BSON document.

use bson::{oid::ObjectId, Document as BsonDocument};
use dugout_common::{DugoutError, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;

/// Core trait for typed records
///
/// # Example
///
/// ```ignore
/// #[derive(Debug, Serialize, Deserialize)]
/// struct Umpire {
///     #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
///     id: Option<ObjectId>,
///     name: String,
/// }
///
/// impl Record for Umpire {
///     fn collection_name() -> &'static str {
///         "umpire"
///     }
/// }
/// ```
pub trait Record: Serialize + DeserializeOwned + Send + Sync + Sized {
    /// Default collection name for this record type
    fn collection_name() -> &'static str;

    /// Get the record's ObjectId (if it has one)
    fn get_id(&self) -> Option<ObjectId> {
        None
    }

    /// Set the record's ObjectId
    fn set_id(&mut self, _id: ObjectId) {}

    /// Convert record to BSON
    fn to_bson(&self) -> Result<BsonDocument> {
        bson::to_document(self).map_err(|e| DugoutError::Serialization(e.to_string()))
    }

    /// Create record from BSON
    fn from_bson(doc: BsonDocument) -> Result<Self> {
        bson::from_document(doc).map_err(|e| DugoutError::Deserialization(e.to_string()))
    }
}

/// A baseball player as stored in the `player` collection.
///
/// Field names on the wire are lowercase concatenations (`firstname`,
/// `heightfeet`, ...). No value is validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<ObjectId>,
    #[serde(rename = "firstname")]
    pub first_name: String,
    #[serde(rename = "lastname")]
    pub last_name: String,
    pub bats: String,
    pub throws: String,
    pub position: String,
    pub weight: i32,
    #[serde(rename = "heightfeet")]
    pub height_feet: i32,
    #[serde(rename = "heightinches")]
    pub height_inches: i32,
}

impl Player {
    /// Build a player without a storage identifier
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        first_name: &str,
        last_name: &str,
        bats: &str,
        throws: &str,
        position: &str,
        weight: i32,
        height_feet: i32,
        height_inches: i32,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            bats: bats.to_string(),
            throws: throws.to_string(),
            position: position.to_string(),
            weight,
            height_feet,
            height_inches,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Height as `6'3"`
    pub fn height(&self) -> String {
        format!("{}'{}\"", self.height_feet, self.height_inches)
    }

    /// Compare everything except the storage identifier
    pub fn same_fields(&self, other: &Player) -> bool {
        Player { id: None, ..self.clone() } == Player { id: None, ..other.clone() }
    }
}

impl Record for Player {
    fn collection_name() -> &'static str {
        "player"
    }

    fn get_id(&self) -> Option<ObjectId> {
        self.id
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Name: {}\nBats: {}\nThrows: {}",
            self.full_name(),
            self.bats,
            self.throws
        )
    }
}

/// One of the two shapes a record can be inserted as
#[derive(Debug, Clone, PartialEq)]
pub enum RecordDocument<T: Record> {
    /// A strongly-typed record
    Typed(T),
    /// A free-form key/value document, stored as given
    Generic(BsonDocument),
}

/// Insertable player: typed struct or free-form document
pub type PlayerDocument = RecordDocument<Player>;

impl<T: Record> RecordDocument<T> {
    /// BSON to submit for storage
    pub fn to_bson(&self) -> Result<BsonDocument> {
        match self {
            RecordDocument::Typed(record) => record.to_bson(),
            RecordDocument::Generic(doc) => Ok(doc.clone()),
        }
    }

    /// Decode into the typed record; generic documents must match its shape
    pub fn into_record(self) -> Result<T> {
        match self {
            RecordDocument::Typed(record) => Ok(record),
            RecordDocument::Generic(doc) => T::from_bson(doc),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RecordDocument::Typed(_) => "typed",
            RecordDocument::Generic(_) => "generic",
        }
    }
}

impl From<Player> for PlayerDocument {
    fn from(player: Player) -> Self {
        RecordDocument::Typed(player)
    }
}

impl<T: Record> From<BsonDocument> for RecordDocument<T> {
    fn from(doc: BsonDocument) -> Self {
        RecordDocument::Generic(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    fn robinson() -> Player {
        Player::new("Jackie", "Robinson", "Right", "Right", "2B", 200, 5, 11)
    }

    #[test]
    fn test_collection_name() {
        assert_eq!(Player::collection_name(), "player");
    }

    #[test]
    fn test_to_bson_uses_wire_names() {
        let bson = robinson().to_bson().unwrap();
        assert_eq!(bson.get_str("firstname").unwrap(), "Jackie");
        assert_eq!(bson.get_str("lastname").unwrap(), "Robinson");
        assert_eq!(bson.get_str("position").unwrap(), "2B");
        assert_eq!(bson.get_i32("weight").unwrap(), 200);
        assert_eq!(bson.get_i32("heightfeet").unwrap(), 5);
        assert_eq!(bson.get_i32("heightinches").unwrap(), 11);
    }

    #[test]
    fn test_to_bson_omits_missing_id() {
        let bson = robinson().to_bson().unwrap();
        assert!(!bson.contains_key("_id"));

        let mut player = robinson();
        let id = ObjectId::new();
        player.set_id(id);
        let bson = player.to_bson().unwrap();
        assert_eq!(bson.get_object_id("_id").unwrap(), id);
    }

    #[test]
    fn test_from_bson_with_id() {
        let id = ObjectId::new();
        let player = Player::from_bson(doc! {
            "_id": id,
            "firstname": "Babe",
            "lastname": "Ruth",
            "bats": "Left",
            "throws": "Left",
            "position": "OF",
            "weight": 215,
            "heightfeet": 6,
            "heightinches": 2,
        })
        .unwrap();
        assert_eq!(player.get_id(), Some(id));
        assert_eq!(player.full_name(), "Babe Ruth");
        assert_eq!(player.height(), "6'2\"");
    }

    #[test]
    fn test_from_bson_shape_mismatch() {
        let err = Player::from_bson(doc! { "firstname": "Babe", "weight": "heavy" }).unwrap_err();
        assert!(matches!(err, DugoutError::Deserialization(_)));
    }

    #[test]
    fn test_no_validation() {
        // Negative weight and an unknown position are stored as given.
        let player = Player::new("Eddie", "Gaedel", "Right", "Left", "PH", -1, 3, 7);
        let bson = player.to_bson().unwrap();
        assert_eq!(bson.get_i32("weight").unwrap(), -1);
        assert_eq!(Player::from_bson(bson).unwrap(), player);
    }

    #[test]
    fn test_same_fields_ignores_id() {
        let mut stored = robinson();
        stored.set_id(ObjectId::new());
        assert!(stored.same_fields(&robinson()));
        assert_ne!(stored, robinson());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            robinson().to_string(),
            "Name: Jackie Robinson\nBats: Right\nThrows: Right"
        );
    }

    #[test]
    fn test_player_document_variants() {
        let typed = PlayerDocument::from(robinson());
        assert_eq!(typed.kind(), "typed");
        assert_eq!(typed.to_bson().unwrap(), robinson().to_bson().unwrap());

        let generic = PlayerDocument::from(doc! {
            "firstname": "Joe",
            "lastname": "Carter",
            "bats": "Right",
            "throws": "Right",
            "position": "OF",
            "weight": 215,
            "heightfeet": 6,
            "heightinches": 3,
        });
        assert_eq!(generic.kind(), "generic");
        assert_eq!(generic.to_bson().unwrap().get_str("lastname").unwrap(), "Carter");
        assert_eq!(generic.into_record().unwrap().height(), "6'3\"");
    }

    #[test]
    fn test_generic_document_stored_as_given() {
        let raw = doc! { "nickname": "The Say Hey Kid", "number": 24 };
        let generic = PlayerDocument::Generic(raw.clone());
        assert_eq!(generic.to_bson().unwrap(), raw);
        assert!(generic.into_record().is_err());
    }
}
