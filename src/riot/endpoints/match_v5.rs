use urlencoding::encode;

use crate::riot::client::RiotClient;
use crate::riot::region::Region;
use crate::riot::types::{MatchDto, RiotApiResponse};

impl RiotClient {
    /// Get list of match IDs by PUUID, most recent first
    /// Uses regional routing (americas, europe, asia, sea)
    pub async fn get_match_ids(
        &self,
        region: Region,
        puuid: &str,
        start: u32,
        count: u32,
    ) -> RiotApiResponse<Vec<String>> {
        let url = format!(
            "{}/lol/match/v5/matches/by-puuid/{}/ids?start={}&count={}",
            region.base_url(),
            encode(puuid),
            start,
            count
        );

        self.get(&url).await
    }

    /// Get match details by match ID
    /// Uses regional routing (americas, europe, asia, sea)
    pub async fn get_match(&self, region: Region, match_id: &str) -> RiotApiResponse<MatchDto> {
        let url = format!(
            "{}/lol/match/v5/matches/{}",
            region.base_url(),
            encode(match_id)
        );

        self.get(&url).await
    }
}
