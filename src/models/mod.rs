use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::StoreError;

/// Team row from the `teams` table
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: i64,
    pub team_name: String,
    pub gender: String,
}

/// Body of `POST /teams` and `PUT /teams/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TeamPayload {
    #[serde(deserialize_with = "null_as_default")]
    pub team_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub gender: String,
}

// `null` reads like an absent field so validation can name it
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub id: Uuid,
    #[serde(rename = "teamID")]
    pub team_id: i64,
    pub name: String,
    pub number: i32,
    pub height: i32,
    pub birthdate: Option<NaiveDate>,
}

/// Body of `POST /players` and `PUT /players/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlayerPayload {
    #[serde(rename = "teamID", deserialize_with = "null_as_default")]
    pub team_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub number: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub height: i32,
    pub birthdate: Option<NaiveDate>,
}

impl PlayerPayload {
    pub fn into_player(self, id: Uuid) -> Player {
        Player {
            id,
            team_id: self.team_id,
            name: self.name,
            number: self.number,
            height: self.height,
            birthdate: self.birthdate,
        }
    }
}

/// Player row from SQLite, ids are stored as hyphenated text
#[derive(Debug, sqlx::FromRow)]
pub struct PlayerRow {
    pub id: String,
    pub team_id: i64,
    pub name: String,
    pub number: i32,
    pub height: i32,
    pub birthdate: Option<NaiveDate>,
}

impl PlayerRow {
    pub fn to_player(&self) -> Result<Player, StoreError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| StoreError::Storage(format!("corrupt player id {:?}: {}", self.id, e)))?;

        Ok(Player {
            id,
            team_id: self.team_id,
            name: self.name.clone(),
            number: self.number,
            height: self.height,
            birthdate: self.birthdate,
        })
    }
}

/// `{message, statusCode}` envelope for mutating requests
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message: String,
    pub status_code: u16,
}
