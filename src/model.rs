use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Stable identifier of a pool entry. The feed sends either numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct EntryId(pub String);

impl EntryId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: EntryId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(rename = "totalPoints", default, deserialize_with = "lenient_f64_or_zero")]
    pub total_points: f64,
    #[serde(rename = "playersRemaining", default, deserialize_with = "lenient_count")]
    pub players_remaining: u32,
    /// `None` when the feed sent no roster, `null`, or something that isn't a list.
    #[serde(default, deserialize_with = "lenient_roster")]
    pub roster: Option<Vec<Player>>,
}

impl Entry {
    pub fn roster(&self) -> &[Player] {
        self.roster.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Player {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub position: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub points: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub bonus_points: Option<f64>,
    #[serde(rename = "isActive", default, deserialize_with = "lenient_bool")]
    pub is_active: bool,

    // Offense.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub pass_td: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub pass_yds: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rush_td: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rush_yds: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rec_td: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rec_yds: Option<f64>,

    // Team defense.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub score_allowed_points: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub score_sack_points: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub score_interception_points: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub score_fumble_points: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub score_safety_points: Option<f64>,
}

impl Player {
    pub fn is_eliminated(&self) -> bool {
        !self.is_active
    }
}

fn lenient_id<'de, D>(deserializer: D) -> Result<EntryId, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let raw = match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };
    Ok(EntryId(raw))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite()))
}

fn lenient_f64_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_f64(deserializer)?.unwrap_or(0.0))
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = lenient_f64(deserializer)?.unwrap_or(0.0);
    Ok(value.max(0.0).min(u32::MAX as f64) as u32)
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_bool).unwrap_or(false))
}

fn lenient_roster<'de, D>(deserializer: D) -> Result<Option<Vec<Player>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(items)) = value else {
        return Ok(None);
    };
    let players = items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value::<Player>(item).ok())
        .collect();
    Ok(Some(players))
}
