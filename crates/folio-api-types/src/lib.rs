//! Response shapes shared between the Folio server and its clients.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A single page of a filtered listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T> {
    pub current_page: u32,
    pub total_count: u64,
    pub total_page: u64,
    pub data: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogView {
    pub id: String,
    pub display: String,
    pub priority: i32,
}

/// Post as returned to clients.
///
/// In listings `content` holds the derived summary; single-post lookups
/// return the full content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: Uuid,
    pub url: String,
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub time: OffsetDateTime,
    pub catalog: CatalogView,
    pub tags: Vec<String>,
    pub content: String,
    pub is_page: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn paged_response_uses_camel_case_keys() {
        let page: PagedResponse<PostView> = PagedResponse {
            current_page: 2,
            total_count: 25,
            total_page: 3,
            data: Vec::new(),
        };

        let value = serde_json::to_value(&page).expect("serialize page");
        assert_eq!(value["currentPage"], 2);
        assert_eq!(value["totalCount"], 25);
        assert_eq!(value["totalPage"], 3);
        assert!(value["data"].as_array().expect("data array").is_empty());
    }

    #[test]
    fn post_view_serializes_time_as_rfc3339() {
        let view = PostView {
            id: Uuid::nil(),
            url: "hello".to_string(),
            title: "Hello".to_string(),
            time: datetime!(2024-03-01 12:00:00 UTC),
            catalog: CatalogView {
                id: "notes".to_string(),
                display: "Notes".to_string(),
                priority: 0,
            },
            tags: vec!["rust".to_string()],
            content: "body".to_string(),
            is_page: false,
        };

        let value = serde_json::to_value(&view).expect("serialize view");
        assert_eq!(value["time"], "2024-03-01T12:00:00Z");
        assert_eq!(value["isPage"], false);
        assert_eq!(value["catalog"]["id"], "notes");
    }
}
