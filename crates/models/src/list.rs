//! Cursor-paginated list wrapper shared by every list endpoint.

use serde::{Deserialize, Serialize};

/// One page of results plus the cursor for the next page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    /// Opaque continuation token; absent on the last page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

impl<T> Paginated<T> {
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tag;
    use serde_json::json;

    #[test]
    fn cursor_is_optional() {
        let last: Paginated<Tag> = serde_json::from_value(json!({ "data": [] })).unwrap();
        assert!(!last.has_more());

        let more: Paginated<Tag> = serde_json::from_value(json!({
            "data": [{ "id": "1", "name": "a" }],
            "nextCursor": "MTIzZTQ1NjctZTg5Yi0xMmQz"
        }))
        .unwrap();
        assert!(more.has_more());
        assert_eq!(more.data[0].name, "a");
    }

    #[test]
    fn null_cursor_means_last_page() {
        let page: Paginated<Tag> =
            serde_json::from_value(json!({ "data": [], "nextCursor": null })).unwrap();
        assert_eq!(page.next_cursor, None);
    }
}
