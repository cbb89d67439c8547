#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use riftradar::config::Config;
use riftradar::pipeline::MatchPipeline;
use riftradar::riot::{ApiRequest, RiotApiError, RiotApiResponse};
use riftradar::server::{SharedCaches, build_pipeline};
use serde_json::{Value, json};

pub const LOOKUP: &str = "/riot/account/v1/accounts/by-riot-id/Faker/NA1";

#[derive(Debug, Clone)]
enum Route {
    Body(Bytes),
    Status(StatusCode),
    Panic,
}

/// In-memory Riot API keyed by request path (host excluded, query included).
#[derive(Debug, Default)]
pub struct FakeRiotApi {
    routes: Mutex<HashMap<String, Route>>,
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeRiotApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn json(&self, path: &str, body: Value) {
        let bytes = Bytes::from(serde_json::to_vec(&body).unwrap());
        self.routes
            .lock()
            .unwrap()
            .insert(path.to_string(), Route::Body(bytes));
    }

    pub fn raw(&self, path: &str, body: &'static str) {
        self.routes
            .lock()
            .unwrap()
            .insert(path.to_string(), Route::Body(Bytes::from_static(body.as_bytes())));
    }

    pub fn status(&self, path: &str, status: StatusCode) {
        self.routes
            .lock()
            .unwrap()
            .insert(path.to_string(), Route::Status(status));
    }

    /// The request task panics when it reaches `path`.
    pub fn panic_on(&self, path: &str) {
        self.routes
            .lock()
            .unwrap()
            .insert(path.to_string(), Route::Panic);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Calls whose path contains `fragment`.
    pub fn calls_to(&self, fragment: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|url| url.contains(fragment))
            .count()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

fn path_of(url: &str) -> &str {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    without_scheme
        .find('/')
        .map_or("/", |idx| &without_scheme[idx..])
}

#[async_trait]
impl ApiRequest for FakeRiotApi {
    async fn request(&self, url: String) -> RiotApiResponse<Bytes> {
        self.calls.lock().unwrap().push(url.clone());

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let path = path_of(&url).to_string();
        let route = self.routes.lock().unwrap().get(&path).cloned();

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match route {
            Some(Route::Body(bytes)) => Ok(bytes),
            Some(Route::Status(status)) => Err(RiotApiError::Status {
                resource: path,
                status,
            }),
            Some(Route::Panic) => panic!("upstream handler crashed on {path}"),
            None => Err(RiotApiError::Status {
                resource: path,
                status: StatusCode::NOT_FOUND,
            }),
        }
    }
}

pub fn test_config(permits: usize) -> Config {
    Config::from_vars(|name| match name {
        "RIOT_API_KEY" => Some("RGAPI-TEST".into()),
        "MAX_CONCURRENT_FETCHES" => Some(permits.to_string()),
        _ => None,
    })
    .unwrap()
}

pub fn pipeline(api: &Arc<FakeRiotApi>, permits: usize) -> MatchPipeline {
    let config = test_config(permits);
    let caches = SharedCaches::new(&config);
    build_pipeline(&config, api.clone(), &caches)
}

pub fn ids_path(puuid: &str, start: u32, count: u32) -> String {
    format!("/lol/match/v5/matches/by-puuid/{puuid}/ids?start={start}&count={count}")
}

pub fn match_path(match_id: &str) -> String {
    format!("/lol/match/v5/matches/{match_id}")
}

pub fn league_path(summoner_id: &str) -> String {
    format!("/lol/league/v4/entries/by-summoner/{summoner_id}")
}

pub fn summoner_of(puuid: &str) -> String {
    format!("sum-{puuid}")
}

pub fn account(puuid: &str) -> Value {
    json!({ "puuid": puuid, "gameName": "Faker", "tagLine": "NA1" })
}

/// Match payload with one participant per puuid, in order.
pub fn match_detail(match_id: &str, puuids: &[&str]) -> Value {
    let participants: Vec<Value> = puuids
        .iter()
        .enumerate()
        .map(|(idx, puuid)| {
            json!({
                "puuid": puuid,
                "summonerId": summoner_of(puuid),
                "participantId": idx + 1,
                "championName": "Ahri",
                "kills": idx,
                "teamId": if idx < 5 { 100 } else { 200 },
                "win": idx < 5,
            })
        })
        .collect();

    json!({
        "metadata": { "matchId": match_id, "participants": puuids },
        "info": { "gameMode": "CLASSIC", "participants": participants },
    })
}

/// Ten players with `requester` at `position`.
pub fn lobby(requester: &str, position: usize) -> Vec<String> {
    (0..10)
        .map(|idx| {
            if idx == position {
                requester.to_string()
            } else {
                format!("player-{idx}")
            }
        })
        .collect()
}

pub fn solo_queue(tier: &str, rank: &str, league_points: i32) -> Value {
    json!([
        { "queueType": "RANKED_FLEX_SR", "tier": "SILVER", "rank": "I", "leaguePoints": 12 },
        {
            "queueType": "RANKED_SOLO_5x5",
            "tier": tier,
            "rank": rank,
            "leaguePoints": league_points,
            "wins": 30,
            "losses": 25
        }
    ])
}
