//! In-process store with the same semantics as the SQLite one

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{parse_player_id, validate_player, validate_team, PlayerStorage, Storage, TeamStorage};
use crate::error::StoreError;
use crate::models::*;

#[derive(Debug, Default)]
struct Tables {
    next_team_id: i64,
    teams: BTreeMap<i64, Team>,
    // insertion order, mirrors `ORDER BY rowid`
    players: Vec<Player>,
}

impl Tables {
    fn check_team(&self, team_id: i64) -> Result<(), StoreError> {
        if self.teams.contains_key(&team_id) {
            Ok(())
        } else {
            Err(StoreError::Storage(format!("team id's {} does not exist", team_id)))
        }
    }

    fn player_index(&self, id: Uuid) -> Result<usize, StoreError> {
        self.players
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(StoreError::player_not_found)
    }
}

/// Test double for [`Storage`]; enforces the team foreign key and cascades deletes.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TeamStorage for InMemoryStore {
    async fn create_team(&self, team: TeamPayload) -> Result<Team, StoreError> {
        validate_team(&team)?;

        let mut tables = self.tables.write().await;
        tables.next_team_id += 1;

        let team = Team {
            id: tables.next_team_id,
            team_name: team.team_name,
            gender: team.gender,
        };
        tables.teams.insert(team.id, team.clone());

        Ok(team)
    }

    async fn find_all_teams(&self) -> Result<Vec<Team>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.teams.values().cloned().collect())
    }

    async fn find_team_by_id(&self, id: i64) -> Result<Team, StoreError> {
        let tables = self.tables.read().await;
        tables
            .teams
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::team_not_found(id))
    }

    async fn delete_team(&self, id: i64) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;

        if tables.teams.remove(&id).is_none() {
            return Err(StoreError::team_not_found(id));
        }
        tables.players.retain(|p| p.team_id != id);

        Ok(())
    }

    async fn update_team(&self, team: TeamPayload, id: i64) -> Result<Team, StoreError> {
        validate_team(&team)?;

        let mut tables = self.tables.write().await;
        let stored = tables
            .teams
            .get_mut(&id)
            .ok_or_else(|| StoreError::team_not_found(id))?;

        stored.team_name = team.team_name;
        stored.gender = team.gender;

        Ok(stored.clone())
    }
}

#[async_trait]
impl PlayerStorage for InMemoryStore {
    async fn create_player(&self, player: PlayerPayload) -> Result<Player, StoreError> {
        validate_player(&player)?;

        let mut tables = self.tables.write().await;
        tables.check_team(player.team_id)?;

        let player = player.into_player(Uuid::new_v4());
        tables.players.push(player.clone());

        Ok(player)
    }

    async fn find_all_players(&self) -> Result<Vec<Player>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.players.clone())
    }

    async fn find_player_by_id(&self, id: &str) -> Result<Player, StoreError> {
        let player_id = parse_player_id(id)?;

        let tables = self.tables.read().await;
        let index = tables.player_index(player_id)?;

        Ok(tables.players[index].clone())
    }

    async fn delete_player(&self, id: &str) -> Result<(), StoreError> {
        let player_id = parse_player_id(id)?;

        let mut tables = self.tables.write().await;
        let index = tables.player_index(player_id)?;
        tables.players.remove(index);

        Ok(())
    }

    async fn update_player(&self, player: PlayerPayload, id: &str) -> Result<Player, StoreError> {
        let player_id = parse_player_id(id)?;
        validate_player(&player)?;

        let mut tables = self.tables.write().await;
        let index = tables.player_index(player_id)?;
        tables.check_team(player.team_id)?;

        let player = player.into_player(player_id);
        tables.players[index] = player.clone();

        Ok(player)
    }
}

#[async_trait]
impl Storage for InMemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(name: &str) -> TeamPayload {
        TeamPayload {
            team_name: name.into(),
            gender: "male".into(),
        }
    }

    fn player(team_id: i64, name: &str) -> PlayerPayload {
        PlayerPayload {
            team_id,
            name: name.into(),
            number: 24,
            height: 198,
            birthdate: None,
        }
    }

    #[tokio::test]
    async fn team_ids_start_at_one_and_are_not_reused() {
        let store = InMemoryStore::new();

        let first = store.create_team(team("Lakers")).await.unwrap();
        assert_eq!(first.id, 1);

        store.delete_team(first.id).await.unwrap();
        let second = store.create_team(team("Celtics")).await.unwrap();
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn invalid_team_is_not_stored() {
        let store = InMemoryStore::new();

        let err = store.create_team(team("")).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(store.find_all_teams().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_cascades_and_enforces_foreign_key() {
        let store = InMemoryStore::new();
        let lakers = store.create_team(team("Lakers")).await.unwrap();
        let celtics = store.create_team(team("Celtics")).await.unwrap();

        store.create_player(player(lakers.id, "Kobe")).await.unwrap();
        let bird = store.create_player(player(celtics.id, "Bird")).await.unwrap();

        store.delete_team(lakers.id).await.unwrap();
        assert_eq!(store.find_all_players().await.unwrap(), vec![bird]);

        let err = store.create_player(player(lakers.id, "Shaq")).await.unwrap_err();
        assert!(matches!(err, StoreError::Storage(_)));

        assert!(matches!(
            store.delete_team(lakers.id).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn player_lookup_by_string_id() {
        let store = InMemoryStore::new();
        let lakers = store.create_team(team("Lakers")).await.unwrap();
        let kobe = store.create_player(player(lakers.id, "Kobe")).await.unwrap();

        let found = store.find_player_by_id(&kobe.id.to_string()).await.unwrap();
        assert_eq!(found, kobe);

        assert!(matches!(
            store.find_player_by_id("24").await,
            Err(StoreError::NotFound(_))
        ));

        store.delete_player(&kobe.id.to_string()).await.unwrap();
        assert!(store.find_all_players().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_update_is_rejected() {
        let store = InMemoryStore::new();
        let lakers = store.create_team(team("Lakers")).await.unwrap();
        let kobe = store.create_player(player(lakers.id, "Kobe")).await.unwrap();

        let err = store.update_team(team(""), lakers.id).await.unwrap_err();
        assert_eq!(err.to_string(), "teamName is required");

        let genderless = TeamPayload {
            team_name: "Sparks".into(),
            gender: String::new(),
        };
        let err = store.update_team(genderless, lakers.id).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.find_team_by_id(lakers.id).await.unwrap(), lakers);

        let id = kobe.id.to_string();
        let err = store
            .update_player(PlayerPayload { height: 0, ..player(lakers.id, "Kobe") }, &id)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "height is required");
        assert_eq!(store.find_player_by_id(&id).await.unwrap(), kobe);
    }

    #[tokio::test]
    async fn update_team_and_player() {
        let store = InMemoryStore::new();
        let lakers = store.create_team(team("Lakers")).await.unwrap();
        let kobe = store.create_player(player(lakers.id, "Kobe")).await.unwrap();

        let renamed = store.update_team(team("LA Lakers"), lakers.id).await.unwrap();
        assert_eq!(renamed.team_name, "LA Lakers");
        assert!(matches!(
            store.update_team(team("Ghosts"), 99).await,
            Err(StoreError::NotFound(_))
        ));

        let id = kobe.id.to_string();
        let updated = store
            .update_player(PlayerPayload { number: 8, ..player(lakers.id, "Kobe") }, &id)
            .await
            .unwrap();
        assert_eq!(updated.id, kobe.id);
        assert_eq!(updated.number, 8);

        assert!(matches!(
            store.update_player(player(99, "Kobe"), &id).await,
            Err(StoreError::Storage(_))
        ));
    }
}
