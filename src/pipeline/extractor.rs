use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, warn};

use crate::cache::TtlCache;
use crate::error::AppError;
use crate::riot::{MatchDto, ParticipantRecord, Platform, RankedStanding, RiotClient};

/// `GOLD` -> `Gold`. Empty input stays empty.
pub fn title_case(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Position of `puuid` in the match metadata participant list.
/// Match payloads index participants positionally, so this is a scan.
pub fn locate_requester(detail: &MatchDto, match_id: &str, puuid: &str) -> Result<usize, AppError> {
    let participants = detail
        .metadata
        .as_ref()
        .ok_or_else(|| malformed(match_id, "metadata block is missing"))?
        .participants
        .as_ref()
        .ok_or_else(|| malformed(match_id, "metadata has no participants list"))?;

    participants
        .iter()
        .position(|p| p == puuid)
        .ok_or_else(|| AppError::RequesterNotFound {
            match_id: match_id.to_string(),
            puuid: puuid.to_string(),
        })
}

fn malformed(match_id: &str, reason: &str) -> AppError {
    AppError::MalformedMatchPayload {
        match_id: match_id.to_string(),
        reason: reason.to_string(),
    }
}

/// Standings resolved during one batch. Tasks asking for the same summoner share a
/// single lookup, failed or not.
#[derive(Debug, Default)]
pub struct StandingMemo {
    cells: Mutex<HashMap<String, Arc<OnceCell<Option<RankedStanding>>>>>,
}

impl StandingMemo {
    async fn cell(&self, summoner_id: &str) -> Arc<OnceCell<Option<RankedStanding>>> {
        self.cells
            .lock()
            .await
            .entry(summoner_id.to_string())
            .or_default()
            .clone()
    }
}

/// Turns a match payload into one record per participant and enriches the requester.
#[derive(Debug, Clone)]
pub struct ParticipantExtractor {
    client: RiotClient,
    standings: Arc<TtlCache<String, RankedStanding>>,
}

impl ParticipantExtractor {
    pub fn new(client: RiotClient, standings: Arc<TtlCache<String, RankedStanding>>) -> Self {
        Self { client, standings }
    }

    /// Records keep the payload's positional order. `requested_id` names the match
    /// in errors and stands in when the payload carries no match id.
    pub async fn extract(
        &self,
        detail: MatchDto,
        requested_id: &str,
        requester_position: usize,
        platform: Platform,
        memo: &StandingMemo,
    ) -> Result<Vec<ParticipantRecord>, AppError> {
        let metadata = detail
            .metadata
            .ok_or_else(|| malformed(requested_id, "metadata block is missing"))?;
        let mut participants = detail
            .info
            .ok_or_else(|| malformed(requested_id, "info block is missing"))?
            .participants
            .ok_or_else(|| malformed(requested_id, "info has no participants array"))?;

        if requester_position >= participants.len() {
            return Err(malformed(
                requested_id,
                &format!(
                    "requester position {} is outside of {} participants",
                    requester_position,
                    participants.len()
                ),
            ));
        }

        let match_id = if metadata.match_id.is_empty() {
            requested_id.to_string()
        } else {
            metadata.match_id
        };

        for (position, record) in participants.iter_mut().enumerate() {
            record.match_id = match_id.clone();
            record.is_requester = position == requester_position;
        }

        let summoner_id = participants[requester_position].summoner_id.clone();
        let cell = memo.cell(&summoner_id).await;
        let standing = cell
            .get_or_init(|| async {
                match self.standing_for(platform, &summoner_id).await {
                    Ok(standing) => Some(standing),
                    Err(e) => {
                        warn!(match_id = %match_id, error = %e, "🏆 ⚠️ Ranked standing unavailable");
                        None
                    }
                }
            })
            .await;

        if let Some(standing) = standing {
            participants[requester_position].apply_standing(standing.clone());
        }

        Ok(participants)
    }

    /// Solo/Duo standing for a summoner, served from cache when possible.
    pub async fn standing_for(
        &self,
        platform: Platform,
        summoner_id: &str,
    ) -> Result<RankedStanding, AppError> {
        let failed = |reason: String| AppError::StandingLookupFailed {
            summoner_id: summoner_id.to_string(),
            reason,
        };

        if summoner_id.is_empty() {
            return Err(failed("participant has no summoner id".into()));
        }

        if let Some(standing) = self.standings.get(summoner_id).await {
            debug!(summoner_id, "🏆 Standing cache hit");
            return Ok(standing);
        }

        let entries = self
            .client
            .get_league_entries_by_summoner(platform, summoner_id)
            .await
            .map_err(|e| failed(e.to_string()))?;

        let entry = entries
            .into_iter()
            .find(|entry| entry.is_solo_queue())
            .ok_or_else(|| failed("no RANKED_SOLO_5x5 entry".into()))?;

        let mut standing = RankedStanding::from(entry);
        standing.tier = title_case(&standing.tier);

        self.standings
            .insert(summoner_id.to_string(), standing.clone())
            .await;

        Ok(standing)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn detail(value: serde_json::Value) -> MatchDto {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn tier_is_title_cased() {
        assert_eq!(title_case("GOLD"), "Gold");
        assert_eq!(title_case("grandmaster"), "Grandmaster");
        assert_eq!(title_case("CHALLENGER"), "Challenger");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn requester_is_located_by_exact_puuid() {
        let detail = detail(json!({
            "metadata": { "matchId": "M1", "participants": ["a", "abc1234", "abc123"] }
        }));

        assert_eq!(locate_requester(&detail, "M1", "abc123").unwrap(), 2);
        assert!(matches!(
            locate_requester(&detail, "M1", "zzz"),
            Err(AppError::RequesterNotFound { .. })
        ));
    }

    #[test]
    fn missing_metadata_is_malformed() {
        for value in [json!({}), json!({ "metadata": { "matchId": "M1" } })] {
            assert!(matches!(
                locate_requester(&detail(value), "M1", "abc123"),
                Err(AppError::MalformedMatchPayload { .. })
            ));
        }
    }
}
