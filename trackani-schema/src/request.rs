//! Inbound request bodies, exactly as the client sends them.
//!
//! Fields stay loosely typed here (`Option<String>` for enums, signed integers
//! for numbers) so the server can answer with a precise validation message
//! instead of a generic deserialization failure.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// `POST /favorites`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteRequest {
    #[serde(default, deserialize_with = "deserialize_id_lax")]
    pub item_id: Option<String>,
    #[serde(default)]
    pub item_type: Option<String>,
}

/// `POST /list`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddListEntryRequest {
    #[serde(default, deserialize_with = "deserialize_id_lax")]
    pub item_id: Option<String>,
    #[serde(default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub progress: Option<i64>,
    #[serde(default)]
    pub rating: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// `PATCH /list/{itemId}/{itemType}`
///
/// `rating` and `notes` distinguish an absent key (`None`, keep the stored
/// value) from an explicit `null` (`Some(None)`, clear it).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListEntryRequest {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub progress: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub rating: Option<Option<i64>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub notes: Option<Option<String>>,
}

/// `GET /list?itemType=&status=`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Catalog ids arrive as strings or bare numbers depending on the client.
fn deserialize_id_lax<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;

    match v {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(serde::de::Error::custom(
            "expected a string or a number for itemId",
        )),
    }
}

fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_item_id_is_stringified() {
        let req: AddFavoriteRequest =
            serde_json::from_value(json!({ "itemId": 42, "itemType": "anime" })).unwrap();
        assert_eq!(req.item_id.as_deref(), Some("42"));
        assert_eq!(req.item_type.as_deref(), Some("anime"));
    }

    #[test]
    fn object_item_id_is_rejected() {
        let res = serde_json::from_value::<AddFavoriteRequest>(json!({ "itemId": {} }));
        assert!(res.is_err());
    }

    #[test]
    fn update_distinguishes_null_from_absent() {
        let req: UpdateListEntryRequest =
            serde_json::from_value(json!({ "rating": null, "progress": 4 })).unwrap();
        assert_eq!(req.rating, Some(None));
        assert_eq!(req.notes, None);
        assert_eq!(req.progress, Some(4));
        assert_eq!(req.status, None);
    }
}
