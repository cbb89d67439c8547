use urlencoding::encode;

use crate::riot::client::RiotClient;
use crate::riot::region::Platform;
use crate::riot::types::{LeagueEntryDto, RiotApiResponse};

impl RiotClient {
    /// Get league entries (ranked info) for a player by summoner ID
    /// Uses platform routing (euw1, na1, kr, etc.)
    pub async fn get_league_entries_by_summoner(
        &self,
        platform: Platform,
        summoner_id: &str,
    ) -> RiotApiResponse<Vec<LeagueEntryDto>> {
        let url = format!(
            "{}/lol/league/v4/entries/by-summoner/{}",
            platform.base_url(),
            encode(summoner_id)
        );

        self.get(&url).await
    }
}
