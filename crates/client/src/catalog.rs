//! Source, collection, and server-shortcut listings.

use postea_core::Result;
use serde::{Deserialize, Serialize};

use crate::api::ApiClient;

/// One subscribed source/connector with its unread total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceItem {
    pub id: i64,
    pub site_name: String,
    #[serde(default)]
    pub favicon_url: Option<String>,
    #[serde(default)]
    pub total: i64,
}

/// One collection node; collections nest arbitrarily.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub children: Vec<Collection>,
}

/// A named group of top-level collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionGroup {
    pub name: String,
    #[serde(default)]
    pub collections: Vec<Collection>,
}

/// The full collection tree as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionTree {
    #[serde(default)]
    pub groups: Vec<CollectionGroup>,
}

/// A flattened row of the collection tree, for list-style rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionOption {
    /// `None` marks a group header row.
    pub id: Option<i64>,
    pub name: String,
    pub depth: usize,
}

impl CollectionTree {
    /// Flattens the tree into select options: group headers followed by
    /// their collections, depth-first.
    pub fn flatten(&self) -> Vec<CollectionOption> {
        fn walk(collections: &[Collection], depth: usize, out: &mut Vec<CollectionOption>) {
            for collection in collections {
                out.push(CollectionOption { id: Some(collection.id), name: collection.name.clone(), depth });
                walk(&collection.children, depth + 1, out);
            }
        }

        let mut options = Vec::new();
        for group in &self.groups {
            options.push(CollectionOption { id: None, name: group.name.clone(), depth: 0 });
            walk(&group.collections, 1, &mut options);
        }
        options
    }
}

/// A content shortcut defined on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerShortcut {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub content: String,
}

impl ApiClient {
    /// Lists all subscribed sources/connectors.
    pub async fn sources(&self) -> Result<Vec<SourceItem>> {
        self.get_json("api/source/all").await
    }

    /// Fetches the collection tree.
    pub async fn collection_tree(&self) -> Result<CollectionTree> {
        self.get_json("api/collection/tree").await
    }

    /// Lists the content shortcuts enabled on the server.
    pub async fn enabled_shortcuts(&self) -> Result<Vec<ServerShortcut>> {
        self.get_json("api/shortcut/enabled").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_tree() {
        let tree = CollectionTree {
            groups: vec![CollectionGroup {
                name: "Reading".to_string(),
                collections: vec![Collection {
                    id: 1,
                    name: "Tech".to_string(),
                    children: vec![Collection { id: 2, name: "Rust".to_string(), children: vec![] }],
                }],
            }],
        };

        let options = tree.flatten();
        assert_eq!(options.len(), 3);
        assert_eq!(options[0].id, None);
        assert_eq!(options[0].name, "Reading");
        assert_eq!(options[1].id, Some(1));
        assert_eq!(options[1].depth, 1);
        assert_eq!(options[2].id, Some(2));
        assert_eq!(options[2].depth, 2);
    }

    #[test]
    fn test_tree_wire_shape() {
        let json = r#"{"groups":[{"name":"G","collections":[{"id":9,"name":"C"}]}]}"#;
        let tree: CollectionTree = serde_json::from_str(json).unwrap();
        assert_eq!(tree.groups[0].collections[0].id, 9);
        assert!(tree.groups[0].collections[0].children.is_empty());
    }
}
