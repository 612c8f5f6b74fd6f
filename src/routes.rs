//! REST routes and a typed facade for the save editor backend
//!
//! The backend owns every domain entity (characters, inventory, quests,
//! gamedata); payloads stay opaque JSON on this side. The facade consumes the
//! client the way the editor's feature layers do: cached reads through `get`,
//! mutations through `post`/`delete` followed by a blanket cache clear, since
//! the client offers no scoped invalidation.

use serde_json::Value;

use crate::client::{ApiClient, ApiError, RequestOptions};

pub fn character_state(id: u32) -> String {
    format!("/characters/{id}/state")
}

pub fn character_inventory(id: u32) -> String {
    format!("/characters/{id}/inventory")
}

pub fn inventory_equip(id: u32) -> String {
    format!("/characters/{id}/inventory/equip")
}

pub fn inventory_unequip(id: u32) -> String {
    format!("/characters/{id}/inventory/unequip")
}

pub fn character_quests(id: u32) -> String {
    format!("/characters/{id}/quests")
}

pub fn character_quest(id: u32, quest_id: &str) -> String {
    format!("/characters/{id}/quests/{quest_id}")
}

pub fn character_companions(id: u32) -> String {
    format!("/characters/{id}/companions")
}

pub fn character_appearance(id: u32) -> String {
    format!("/characters/{id}/appearance")
}

pub fn character_classes(id: u32) -> String {
    format!("/characters/{id}/classes")
}

pub fn character_feats(id: u32) -> String {
    format!("/characters/{id}/feats")
}

pub fn character_portrait(id: u32) -> String {
    format!("/characters/{id}/portrait")
}

pub fn gamedata(resource: &str) -> String {
    format!("/gamedata/{resource}")
}

/// Facade over `ApiClient` mirroring the editor's feature surface
pub struct SaveEditorApi {
    client: ApiClient,
}

impl SaveEditorApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// The underlying client, for endpoints this facade does not cover
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Current character state (attributes, hit points, alignment)
    pub async fn character_state(&self, id: u32) -> Result<Value, ApiError> {
        self.client.get(&character_state(id), None).await
    }

    /// Full inventory listing for a character
    pub async fn inventory(&self, id: u32) -> Result<Value, ApiError> {
        self.client.get(&character_inventory(id), None).await
    }

    /// Equips an item and invalidates cached reads
    pub async fn equip_item(&self, id: u32, payload: &Value) -> Result<Value, ApiError> {
        let result = self
            .client
            .post(&inventory_equip(id), Some(payload))
            .await?;
        // Equipment changes what cached character reads would show
        self.client.clear_cache();
        Ok(result)
    }

    /// Unequips an item and invalidates cached reads
    pub async fn unequip_item(&self, id: u32, payload: &Value) -> Result<Value, ApiError> {
        let result = self
            .client
            .post(&inventory_unequip(id), Some(payload))
            .await?;
        self.client.clear_cache();
        Ok(result)
    }

    /// Quest journal for a character
    pub async fn quests(&self, id: u32) -> Result<Value, ApiError> {
        self.client.get(&character_quests(id), None).await
    }

    /// Updates a quest entry and invalidates cached reads
    pub async fn update_quest(
        &self,
        id: u32,
        quest_id: &str,
        payload: &Value,
    ) -> Result<Value, ApiError> {
        let result = self
            .client
            .post(&character_quest(id, quest_id), Some(payload))
            .await?;
        self.client.clear_cache();
        Ok(result)
    }

    /// Removes a quest entry and invalidates cached reads
    pub async fn delete_quest(&self, id: u32, quest_id: &str) -> Result<Value, ApiError> {
        let result = self
            .client
            .delete(&character_quest(id, quest_id), None)
            .await?;
        self.client.clear_cache();
        Ok(result)
    }

    /// Companion roster for a character
    pub async fn companions(&self, id: u32) -> Result<Value, ApiError> {
        self.client.get(&character_companions(id), None).await
    }

    /// Appearance settings for a character
    pub async fn appearance(&self, id: u32) -> Result<Value, ApiError> {
        self.client.get(&character_appearance(id), None).await
    }

    /// Class levels for a character
    pub async fn classes(&self, id: u32) -> Result<Value, ApiError> {
        self.client.get(&character_classes(id), None).await
    }

    /// Feat list for a character
    pub async fn feats(&self, id: u32) -> Result<Value, ApiError> {
        self.client.get(&character_feats(id), None).await
    }

    /// Gamedata lookup table (classes, feats, spells, items)
    pub async fn gamedata(&self, resource: &str) -> Result<Value, ApiError> {
        self.client.get(&gamedata(resource), None).await
    }

    /// Gamedata lookup with filter options, cached per option set
    pub async fn gamedata_filtered(
        &self,
        resource: &str,
        options: &RequestOptions,
    ) -> Result<Value, ApiError> {
        self.client.get(&gamedata(resource), Some(options)).await
    }

    /// Absolute portrait URL for use as an image source, no lookup performed
    pub fn portrait_url(&self, id: u32) -> Option<String> {
        self.client.resource_url(&character_portrait(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_routes() {
        assert_eq!(character_state(42), "/characters/42/state");
        assert_eq!(character_inventory(42), "/characters/42/inventory");
        assert_eq!(inventory_equip(42), "/characters/42/inventory/equip");
        assert_eq!(inventory_unequip(42), "/characters/42/inventory/unequip");
        assert_eq!(character_quests(42), "/characters/42/quests");
        assert_eq!(
            character_quest(42, "q_dragon"),
            "/characters/42/quests/q_dragon"
        );
        assert_eq!(character_companions(42), "/characters/42/companions");
        assert_eq!(character_appearance(42), "/characters/42/appearance");
        assert_eq!(character_classes(42), "/characters/42/classes");
        assert_eq!(character_feats(42), "/characters/42/feats");
        assert_eq!(character_portrait(42), "/characters/42/portrait");
    }

    #[test]
    fn test_gamedata_route() {
        assert_eq!(gamedata("feats"), "/gamedata/feats");
        assert_eq!(gamedata("spells"), "/gamedata/spells");
    }
}
