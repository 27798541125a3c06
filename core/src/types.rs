//! Domain DTOs for the user collection.
//!
//! # Design
//! These types mirror the backend's HAL representation but are defined
//! independently of the mock-server crate; integration tests catch schema
//! drift. The backend serializes unset columns as `null`, so string fields
//! fall back to empty rather than failing the whole collection.

use serde::{Deserialize, Deserializer, Serialize};

/// A single HAL link object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Link {
    pub href: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub templated: bool,
}

/// The `_links` object of a resource. Only `self` is interpreted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Links {
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<Link>,
}

/// A user as returned by the collection endpoint.
///
/// In HAL form no `id` is transmitted; identity comes from
/// `_links.self.href`. Bare-array responses may carry a numeric `id` instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gender: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub status: Option<i32>,
    /// Maintained by the server on every insert and update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
    #[serde(rename = "_links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

impl User {
    /// The server-supplied link reference, if any.
    pub fn self_href(&self) -> Option<&str> {
        self.links
            .as_ref()
            .and_then(|l| l.self_link.as_ref())
            .map(|l| l.href.as_str())
    }

    /// One display row: `"<name>, <age>"`.
    pub fn display_row(&self) -> String {
        match self.age {
            Some(age) => format!("{}, {age}", self.name),
            None => self.name.clone(),
        }
    }
}

/// Request payload for creating a user. Unset fields keep the defaults the
/// backend requires (empty strings, zero age and status).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub gender: String,
    pub name: String,
    pub age: i32,
    pub status: i32,
}

/// Spring Data REST paging block carried next to `_embedded`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
    pub number: u64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_reads_hal_item() {
        let user: User = serde_json::from_str(
            r#"{"username":"a1","gender":"F","name":"A","age":20,"status":1,
                "updateTime":"2024-05-01T10:00:00",
                "_links":{"self":{"href":"http://h/be/users/1"},"user":{"href":"http://h/be/users/1"}}}"#,
        )
        .unwrap();
        assert_eq!(user.id, None);
        assert_eq!(user.self_href(), Some("http://h/be/users/1"));
        assert_eq!(user.update_time.as_deref(), Some("2024-05-01T10:00:00"));
        assert_eq!(user.display_row(), "A, 20");
    }

    #[test]
    fn null_columns_become_defaults() {
        let user: User =
            serde_json::from_str(r#"{"username":null,"gender":null,"name":"B","age":null}"#)
                .unwrap();
        assert_eq!(user.username, "");
        assert_eq!(user.gender, "");
        assert_eq!(user.age, None);
        assert_eq!(user.display_row(), "B");
    }

    #[test]
    fn bare_item_keeps_numeric_id() {
        let user: User = serde_json::from_str(r#"{"id":7,"name":"C","age":3}"#).unwrap();
        assert_eq!(user.id, Some(7));
        assert_eq!(user.self_href(), None);
    }

    #[test]
    fn new_user_serializes_every_field() {
        let draft = NewUser {
            name: "D".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"username":"","gender":"","name":"D","age":0,"status":0})
        );
    }

    #[test]
    fn page_metadata_uses_camel_case() {
        let page: PageMetadata = serde_json::from_str(
            r#"{"size":20,"totalElements":3,"totalPages":1,"number":0}"#,
        )
        .unwrap();
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.total_pages, 1);
    }
}
