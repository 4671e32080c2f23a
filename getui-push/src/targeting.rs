//! Alias, tag, blacklist and device status operations.

use serde::Serialize;
use serde_json::json;

use crate::{
    GetuiClient, PushError, QueryAliasResult, QueryCidResult, Result, SimpleResult, TagsResult,
    UserStatusResult,
};

/// Most aliases `bind_alias` accepts per call.
pub const MAX_ALIAS_BINDINGS: usize = 1000;

/// A cid to alias binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasBinding {
    /// Client id.
    pub cid: String,
    /// Alias.
    pub alias: String,
}

impl AliasBinding {
    /// Create a binding.
    pub fn new(cid: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            cid: cid.into(),
            alias: alias.into(),
        }
    }
}

impl GetuiClient {
    /// Bind aliases to client ids.
    pub async fn bind_alias(&self, bindings: &[AliasBinding]) -> Result<SimpleResult> {
        if bindings.is_empty() || bindings.len() > MAX_ALIAS_BINDINGS {
            return Err(PushError::InvalidRequest(format!(
                "bind_alias takes 1 to {} bindings, got {}",
                MAX_ALIAS_BINDINGS,
                bindings.len()
            )));
        }
        self.post(&["bind_alias"], &json!({ "alias_list": bindings }))
            .await
    }

    /// Bind one alias to one client id.
    pub async fn bind_single_alias(&self, alias: &str, cid: &str) -> Result<SimpleResult> {
        self.bind_alias(&[AliasBinding::new(cid, alias)]).await
    }

    /// Remove the binding between a cid and an alias.
    pub async fn unbind_alias(&self, cid: &str, alias: &str) -> Result<SimpleResult> {
        self.post(&["unbind_alias"], &json!({ "cid": cid, "alias": alias }))
            .await
    }

    /// Remove every binding of an alias.
    pub async fn unbind_alias_all(&self, alias: &str) -> Result<SimpleResult> {
        self.post(&["unbind_alias_all"], &json!({ "alias": alias }))
            .await
    }

    /// Client ids bound to an alias.
    pub async fn query_cid(&self, alias: &str) -> Result<QueryCidResult> {
        self.get(&["query_cid", alias]).await
    }

    /// Alias bound to a client id.
    pub async fn query_alias(&self, cid: &str) -> Result<QueryAliasResult> {
        self.get(&["query_alias", cid]).await
    }

    /// Replace the tags of a client id.
    pub async fn set_tags<I, T>(&self, cid: &str, tags: I) -> Result<SimpleResult>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let tag_list: Vec<String> = tags.into_iter().map(Into::into).collect();
        self.post(&["set_tags"], &json!({ "cid": cid, "tag_list": tag_list }))
            .await
    }

    /// Tags of a client id.
    pub async fn get_tags(&self, cid: &str) -> Result<TagsResult> {
        self.get(&["get_tags", cid]).await
    }

    /// Add client ids to the blacklist.
    pub async fn add_blacklist(&self, cids: &[String]) -> Result<SimpleResult> {
        self.post(&["user_blk_list"], &json!({ "cid": cids })).await
    }

    /// Remove client ids from the blacklist.
    pub async fn remove_blacklist(&self, cids: &[String]) -> Result<SimpleResult> {
        self.delete(&["user_blk_list"], Some(&json!({ "cid": cids })))
            .await
    }

    /// Online status of a client id.
    pub async fn user_status(&self, cid: &str) -> Result<UserStatusResult> {
        self.get(&["user_status", cid]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_binding_serialization() {
        let value = serde_json::to_value(AliasBinding::new("c1", "lee")).unwrap();
        assert_eq!(value, json!({ "cid": "c1", "alias": "lee" }));
    }
}
