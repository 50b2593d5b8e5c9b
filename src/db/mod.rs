use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::*;
use crate::validation::required;

pub mod memory;

pub use memory::InMemoryStore;

#[async_trait]
pub trait TeamStorage: Send + Sync {
    async fn create_team(&self, team: TeamPayload) -> Result<Team, StoreError>;
    async fn find_all_teams(&self) -> Result<Vec<Team>, StoreError>;
    async fn find_team_by_id(&self, id: i64) -> Result<Team, StoreError>;
    async fn delete_team(&self, id: i64) -> Result<(), StoreError>;
    async fn update_team(&self, team: TeamPayload, id: i64) -> Result<Team, StoreError>;
}

#[async_trait]
pub trait PlayerStorage: Send + Sync {
    async fn create_player(&self, player: PlayerPayload) -> Result<Player, StoreError>;
    async fn find_all_players(&self) -> Result<Vec<Player>, StoreError>;
    async fn find_player_by_id(&self, id: &str) -> Result<Player, StoreError>;
    async fn delete_player(&self, id: &str) -> Result<(), StoreError>;
    async fn update_player(&self, player: PlayerPayload, id: &str) -> Result<Player, StoreError>;
}

/// Everything the HTTP layer needs from a backing store.
#[async_trait]
pub trait Storage: TeamStorage + PlayerStorage {
    async fn ping(&self) -> Result<(), StoreError>;
}

pub fn validate_team(team: &TeamPayload) -> Result<(), StoreError> {
    required(&[("teamName", &team.team_name), ("gender", &team.gender)])
}

pub fn validate_player(player: &PlayerPayload) -> Result<(), StoreError> {
    required(&[
        ("teamID", &player.team_id),
        ("name", &player.name),
        ("number", &player.number),
        ("height", &player.height),
    ])
}

/// Player ids that are not UUIDs can never match a row.
pub fn parse_player_id(id: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(id).map_err(|_| StoreError::player_not_found())
}

/// SQLite-backed store sharing one connection pool across requests
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (creating if missing) the database at `url` with foreign keys enforced.
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn init(&self) -> Result<(), sqlx::Error> {
        self.create_table_teams().await?;
        self.create_table_players().await?;
        Ok(())
    }

    async fn create_table_teams(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS teams (
                   id INTEGER PRIMARY KEY AUTOINCREMENT,
                   team_name TEXT NOT NULL,
                   gender TEXT NOT NULL
               )"#
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn create_table_players(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS players (
                   id TEXT PRIMARY KEY,
                   team_id INTEGER NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
                   name TEXT NOT NULL,
                   number INTEGER NOT NULL,
                   height INTEGER NOT NULL,
                   birthdate TEXT
               )"#
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

// A missing team shows up as a foreign key violation on players.team_id
fn player_write_error(err: sqlx::Error, team_id: i64) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_foreign_key_violation() || db_err.message().contains("FOREIGN KEY") {
            return StoreError::Storage(format!("team id's {} does not exist", team_id));
        }
    }
    StoreError::from(err)
}

#[async_trait]
impl TeamStorage for SqliteStore {
    async fn create_team(&self, team: TeamPayload) -> Result<Team, StoreError> {
        validate_team(&team)?;

        let result = sqlx::query(r#"INSERT INTO teams (team_name, gender) VALUES (?, ?)"#)
            .bind(&team.team_name)
            .bind(&team.gender)
            .execute(&self.pool)
            .await?;

        let id = result.last_insert_rowid();
        tracing::info!(team_id = id, "team created");

        Ok(Team {
            id,
            team_name: team.team_name,
            gender: team.gender,
        })
    }

    async fn find_all_teams(&self) -> Result<Vec<Team>, StoreError> {
        let teams = sqlx::query_as::<_, Team>(
            r#"SELECT id, team_name, gender FROM teams ORDER BY id"#
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(teams)
    }

    async fn find_team_by_id(&self, id: i64) -> Result<Team, StoreError> {
        sqlx::query_as::<_, Team>(
            r#"SELECT id, team_name, gender FROM teams WHERE id = ?"#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::team_not_found(id))
    }

    async fn delete_team(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query(r#"DELETE FROM teams WHERE id = ?"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::team_not_found(id));
        }

        tracing::info!(team_id = id, "team deleted");
        Ok(())
    }

    async fn update_team(&self, team: TeamPayload, id: i64) -> Result<Team, StoreError> {
        validate_team(&team)?;

        let result = sqlx::query(r#"UPDATE teams SET team_name = ?, gender = ? WHERE id = ?"#)
            .bind(&team.team_name)
            .bind(&team.gender)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::team_not_found(id));
        }

        Ok(Team {
            id,
            team_name: team.team_name,
            gender: team.gender,
        })
    }
}

#[async_trait]
impl PlayerStorage for SqliteStore {
    async fn create_player(&self, player: PlayerPayload) -> Result<Player, StoreError> {
        validate_player(&player)?;

        let player = player.into_player(Uuid::new_v4());

        sqlx::query(
            r#"INSERT INTO players (id, team_id, name, number, height, birthdate)
               VALUES (?, ?, ?, ?, ?, ?)"#
        )
        .bind(player.id.to_string())
        .bind(player.team_id)
        .bind(&player.name)
        .bind(player.number)
        .bind(player.height)
        .bind(player.birthdate)
        .execute(&self.pool)
        .await
        .map_err(|e| player_write_error(e, player.team_id))?;

        tracing::info!(player_id = %player.id, team_id = player.team_id, "player created");
        Ok(player)
    }

    async fn find_all_players(&self) -> Result<Vec<Player>, StoreError> {
        let rows = sqlx::query_as::<_, PlayerRow>(
            r#"SELECT id, team_id, name, number, height, birthdate
               FROM players
               ORDER BY rowid"#
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(PlayerRow::to_player).collect()
    }

    async fn find_player_by_id(&self, id: &str) -> Result<Player, StoreError> {
        let player_id = parse_player_id(id)?;

        sqlx::query_as::<_, PlayerRow>(
            r#"SELECT id, team_id, name, number, height, birthdate
               FROM players
               WHERE id = ?"#
        )
        .bind(player_id.to_string())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(StoreError::player_not_found)?
        .to_player()
    }

    async fn delete_player(&self, id: &str) -> Result<(), StoreError> {
        let player_id = parse_player_id(id)?;

        let result = sqlx::query(r#"DELETE FROM players WHERE id = ?"#)
            .bind(player_id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::player_not_found());
        }

        tracing::info!(player_id = %player_id, "player deleted");
        Ok(())
    }

    async fn update_player(&self, player: PlayerPayload, id: &str) -> Result<Player, StoreError> {
        let player_id = parse_player_id(id)?;
        validate_player(&player)?;

        let player = player.into_player(player_id);

        let result = sqlx::query(
            r#"UPDATE players
               SET team_id = ?, name = ?, number = ?, height = ?, birthdate = ?
               WHERE id = ?"#
        )
        .bind(player.team_id)
        .bind(&player.name)
        .bind(player.number)
        .bind(player.height)
        .bind(player.birthdate)
        .bind(player_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| player_write_error(e, player.team_id))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::player_not_found());
        }

        Ok(player)
    }
}

#[async_trait]
impl Storage for SqliteStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Fresh in-memory database; one connection so every query sees the same data.
#[cfg(test)]
pub async fn memory_store() -> SqliteStore {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();

    let store = SqliteStore::new(pool);
    store.init().await.unwrap();
    store
}
