//! Search pipeline: account resolution, match listing and the bounded match fan-out.

use std::{collections::HashMap, sync::Arc};

use tokio::{
    sync::Semaphore,
    task::{self, JoinSet},
};
use tracing::{debug, error, info, instrument, warn};

use crate::cache::TtlCache;
use crate::error::AppError;
use crate::riot::{
    AccountRef, ParticipantRecord, Platform, RankedStanding, Region, RiotApiError, RiotClient,
    account_url,
};

pub mod extractor;

pub use extractor::{ParticipantExtractor, StandingMemo, locate_requester, title_case};

pub const DEFAULT_MATCH_COUNT: u32 = 10;
/// Upper bound accepted by the match-ID listing endpoint.
pub const MAX_MATCH_COUNT: u32 = 100;
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub start: u32,
    pub count: u32,
}

impl Pagination {
    pub fn new(start: Option<u32>, count: Option<u32>) -> Self {
        Self {
            start: start.unwrap_or(0),
            count: count
                .unwrap_or(DEFAULT_MATCH_COUNT)
                .clamp(1, MAX_MATCH_COUNT),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// A match left out of a batch, with the reason it was dropped.
#[derive(Debug)]
pub struct MatchFailure {
    pub match_id: String,
    pub error: AppError,
}

/// Everything a fan-out produced. Matches keep the order of the listing.
#[derive(Debug, Default)]
pub struct MatchBatch {
    pub participants: Vec<ParticipantRecord>,
    pub failures: Vec<MatchFailure>,
}

impl MatchBatch {
    /// Records flagged as the requester, one per included match.
    pub fn requester_records(&self) -> impl Iterator<Item = &ParticipantRecord> {
        self.participants.iter().filter(|p| p.is_requester)
    }
}

#[derive(Debug)]
pub enum SearchOutcome {
    /// The account exists but has no match in the requested window.
    NoMatches(AccountRef),
    Matches(MatchBatch),
}

/// Shared by every request. The permit pool is global, so concurrent
/// searches compete for the same upstream slots.
#[derive(Debug, Clone)]
pub struct MatchPipeline {
    client: RiotClient,
    accounts: Arc<TtlCache<String, AccountRef>>,
    extractor: ParticipantExtractor,
    permits: Arc<Semaphore>,
}

impl MatchPipeline {
    pub fn new(
        client: RiotClient,
        accounts: Arc<TtlCache<String, AccountRef>>,
        standings: Arc<TtlCache<String, RankedStanding>>,
        permits: Arc<Semaphore>,
    ) -> Self {
        Self {
            extractor: ParticipantExtractor::new(client.clone(), standings),
            client,
            accounts,
            permits,
        }
    }

    /// Resolve, list and fan out. Only the steps before the fan-out can fail.
    #[instrument(skip(self, lookup))]
    pub async fn search(
        &self,
        lookup: &str,
        region_code: &str,
        pagination: Pagination,
    ) -> Result<SearchOutcome, AppError> {
        let platform: Platform = region_code.parse()?;

        let account = self.resolve_account(platform, lookup).await?;
        let match_ids = self
            .list_match_ids(platform.to_region(), &account.puuid, pagination)
            .await?;

        if match_ids.is_empty() {
            info!(puuid = %account.puuid, "🔎 No matches found");
            return Ok(SearchOutcome::NoMatches(account));
        }

        let batch = self.fetch_enriched_matches(&account, platform, match_ids).await;
        Ok(SearchOutcome::Matches(batch))
    }

    pub async fn resolve_account(
        &self,
        platform: Platform,
        lookup: &str,
    ) -> Result<AccountRef, AppError> {
        let url = account_url(platform, lookup)?;

        if let Some(account) = self.accounts.get(&url).await {
            debug!(puuid = %account.puuid, "👤 Account cache hit");
            return Ok(account);
        }

        let account = self
            .client
            .get_account(&url)
            .await
            .map_err(AppError::AccountResolutionFailed)?;

        self.accounts.insert(url, account.clone()).await;
        debug!(puuid = %account.puuid, "👤 Account resolved");

        Ok(account)
    }

    pub async fn list_match_ids(
        &self,
        region: Region,
        puuid: &str,
        pagination: Pagination,
    ) -> Result<Vec<String>, AppError> {
        self.client
            .get_match_ids(region, puuid, pagination.start, pagination.count)
            .await
            .map_err(AppError::MatchListFailed)
    }

    /// One task per match ID, each holding a permit for its upstream work.
    /// Never fails: task errors are logged and reported in [`MatchBatch::failures`].
    /// Dropping the returned future aborts the tasks and releases their permits.
    #[instrument(skip_all, fields(puuid = %account.puuid, matches = match_ids.len()))]
    pub async fn fetch_enriched_matches(
        &self,
        account: &AccountRef,
        platform: Platform,
        match_ids: Vec<String>,
    ) -> MatchBatch {
        let memo = Arc::new(StandingMemo::default());
        let mut tasks = JoinSet::new();
        let mut spawned: HashMap<task::Id, (usize, String)> = HashMap::new();

        for (index, match_id) in match_ids.into_iter().enumerate() {
            let pipeline = self.clone();
            let puuid = account.puuid.clone();
            let memo = memo.clone();
            let id = match_id.clone();

            let handle = tasks.spawn(async move {
                pipeline.fetch_match(platform, &id, &puuid, &memo).await
            });
            spawned.insert(handle.id(), (index, match_id));
        }

        let mut assembled = Vec::new();
        let mut failures = Vec::new();

        while let Some(joined) = tasks.join_next_with_id().await {
            let task_id = match &joined {
                Ok((task_id, _)) => *task_id,
                Err(e) => e.id(),
            };
            let Some((index, match_id)) = spawned.remove(&task_id) else {
                error!(task = %task_id, "🎮 ❌ Joined an unknown match task");
                continue;
            };

            let result = match joined {
                Ok((_, result)) => result,
                Err(e) => Err(AppError::MatchTaskFailed {
                    match_id: match_id.clone(),
                    reason: e.to_string(),
                }),
            };

            match result {
                Ok(records) => assembled.push((index, records)),
                Err(error) => {
                    warn!(
                        match_id = %match_id,
                        kind = error.kind(),
                        error = %error,
                        "🎮 ⚠️ Match excluded from results"
                    );
                    failures.push(MatchFailure { match_id, error });
                }
            }
        }

        assembled.sort_by_key(|(index, _)| *index);
        let participants: Vec<_> = assembled
            .into_iter()
            .flat_map(|(_, records)| records)
            .collect();

        info!(
            participants = participants.len(),
            failed = failures.len(),
            "🎮 ✅ Batch assembled"
        );

        MatchBatch {
            participants,
            failures,
        }
    }

    async fn fetch_match(
        &self,
        platform: Platform,
        match_id: &str,
        puuid: &str,
        memo: &StandingMemo,
    ) -> Result<Vec<ParticipantRecord>, AppError> {
        // The pool is never closed while the pipeline is alive.
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| AppError::MatchTaskFailed {
                match_id: match_id.to_string(),
                reason: e.to_string(),
            })?;

        let detail = self
            .client
            .get_match(platform.to_region(), match_id)
            .await
            .map_err(|source| match source {
                RiotApiError::Decode { source, .. } => AppError::MalformedMatchPayload {
                    match_id: match_id.to_string(),
                    reason: source.to_string(),
                },
                source => AppError::MatchFetchFailed {
                    match_id: match_id.to_string(),
                    source,
                },
            })?;

        let position = locate_requester(&detail, match_id, puuid)?;

        self.extractor
            .extract(detail, match_id, position, platform, memo)
            .await
    }
}
