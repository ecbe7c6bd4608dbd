use mongodb::bson::{Bson, Document};
use serde::Serialize;
use serde_json::{Map, Value};

/// An item as rendered to clients: the ObjectId as its 24-hex string under
/// `_id`, every other stored field flattened alongside it unchanged.
#[derive(Debug, Serialize)]
pub struct ItemResponse {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl From<Document> for ItemResponse {
    fn from(mut doc: Document) -> Self {
        let id = match doc.remove("_id") {
            Some(Bson::ObjectId(oid)) => oid.to_hex(),
            Some(Bson::String(s)) => s,
            Some(other) => other.to_string(),
            None => String::new(),
        };
        let fields = match Bson::Document(doc).into_relaxed_extjson() {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self { id, fields }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}
