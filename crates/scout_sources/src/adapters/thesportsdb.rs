//! TheSportsDB team lookup and latest results (sports, PRIMARY).

use crate::error::FetchResult;
use crate::http::HttpClient;
use crate::text::content_terms;
use scout_common::{Adapter, EvidenceResult, SourceKind};
use serde::Deserialize;

pub const NAME: &str = "thesportsdb";
/// Public test key of the free tier
const BASE_URL: &str = "https://www.thesportsdb.com/api/v1/json/3";

/// Query words that never name a team
const NON_TEAM_WORDS: &[&str] = &[
    "won", "win", "wins", "winner", "beat", "beats", "score", "scores", "final", "result",
    "results", "game", "games", "match", "team", "roster", "lineup", "squad", "standings", "play",
    "plays", "playing", "coach", "quarterback", "captain", "yesterday", "tonight", "vs", "versus",
];

const RESULT_WORDS: &[&str] = &[
    "won", "win", "wins", "winner", "beat", "beats", "score", "scores", "final", "result", "results",
];

#[derive(Debug, Deserialize)]
struct TeamsResponse {
    #[serde(default)]
    teams: Option<Vec<Team>>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Team {
    #[serde(rename = "idTeam")]
    pub id: String,
    #[serde(rename = "strTeam")]
    pub name: String,
    #[serde(rename = "strSport", default)]
    pub sport: Option<String>,
    #[serde(rename = "strLeague", default)]
    pub league: Option<String>,
    #[serde(rename = "strStadium", default)]
    pub stadium: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EventsResponse {
    #[serde(default)]
    results: Option<Vec<Event>>,
}

#[derive(Debug, Deserialize)]
struct Event {
    #[serde(rename = "strHomeTeam")]
    home: String,
    #[serde(rename = "strAwayTeam")]
    away: String,
    #[serde(rename = "intHomeScore", default)]
    home_score: Option<String>,
    #[serde(rename = "intAwayScore", default)]
    away_score: Option<String>,
    #[serde(rename = "dateEvent", default)]
    date: Option<String>,
    #[serde(rename = "strLeague", default)]
    league: Option<String>,
}

pub struct TheSportsDbAdapter {
    http: HttpClient,
}

impl TheSportsDbAdapter {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    fn lookup(&self, query: &str) -> FetchResult<EvidenceResult> {
        let Some(team_query) = team_candidate(query) else {
            return Ok(EvidenceResult::not_found(NAME));
        };
        let body: serde_json::Value = self
            .http
            .get_json(&format!("{}/searchteams.php", BASE_URL), &[("t", team_query.as_str())])?;
        let Some(team) = parse_teams(body)? else {
            return Ok(EvidenceResult::not_found(NAME));
        };

        if wants_result(query) {
            let body: serde_json::Value = self
                .http
                .get_json(&format!("{}/eventslast.php", BASE_URL), &[("id", team.id.as_str())])?;
            if let Some(ev) = parse_last_event(body)? {
                return Ok(ev);
            }
            return Ok(EvidenceResult::not_found(NAME));
        }
        Ok(team_evidence(&team))
    }
}

impl Adapter for TheSportsDbAdapter {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Sports
    }

    fn fetch(&self, query: &str) -> EvidenceResult {
        self.lookup(query).unwrap_or_else(|e| e.into_evidence(NAME))
    }
}

/// Remaining words once sports vocabulary is removed ("who won the giants game" -> "giants")
pub fn team_candidate(query: &str) -> Option<String> {
    let words: Vec<String> = content_terms(query)
        .into_iter()
        .filter(|w| !NON_TEAM_WORDS.contains(&w.as_str()))
        .collect();
    (!words.is_empty()).then(|| words.join(" "))
}

pub fn wants_result(query: &str) -> bool {
    content_terms(query)
        .iter()
        .any(|w| RESULT_WORDS.contains(&w.as_str()))
}

pub fn parse_teams(body: serde_json::Value) -> FetchResult<Option<Team>> {
    let response: TeamsResponse = serde_json::from_value(body)?;
    Ok(response.teams.and_then(|t| t.into_iter().next()))
}

pub fn team_evidence(team: &Team) -> EvidenceResult {
    let mut summary = team.name.clone();
    if let Some(sport) = team.sport.as_deref().filter(|s| !s.is_empty()) {
        summary.push_str(&format!(" ({})", sport));
    }
    if let Some(league) = team.league.as_deref().filter(|s| !s.is_empty()) {
        summary.push_str(&format!(": {}", league));
    }
    if let Some(stadium) = team.stadium.as_deref().filter(|s| !s.is_empty()) {
        summary.push_str(&format!(", plays at {}", stadium));
    }
    EvidenceResult::found(NAME, summary, 0.8)
        .with_url(format!("https://www.thesportsdb.com/team/{}", team.id))
        .with_meta("team_id", team.id.clone())
}

/// Most recent finished event with a score
pub fn parse_last_event(body: serde_json::Value) -> FetchResult<Option<EvidenceResult>> {
    let response: EventsResponse = serde_json::from_value(body)?;
    let Some(event) = response
        .results
        .unwrap_or_default()
        .into_iter()
        .find(|e| e.home_score.is_some() && e.away_score.is_some())
    else {
        return Ok(None);
    };
    let mut summary = format!(
        "{} {} - {} {}",
        event.home,
        event.home_score.unwrap_or_default(),
        event.away_score.unwrap_or_default(),
        event.away
    );
    match (event.league.as_deref(), event.date.as_deref()) {
        (Some(league), Some(date)) => summary.push_str(&format!(" ({}, {})", league, date)),
        (None, Some(date)) => summary.push_str(&format!(" ({})", date)),
        (Some(league), None) => summary.push_str(&format!(" ({})", league)),
        (None, None) => {}
    }
    Ok(Some(EvidenceResult::found(NAME, summary, 0.85)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_team_candidate() {
        assert_eq!(team_candidate("who won the giants game last night").as_deref(), Some("giants"));
        assert_eq!(team_candidate("Los Angeles Lakers roster").as_deref(), Some("los angeles lakers"));
        assert_eq!(team_candidate("who won the game"), None);
        assert!(wants_result("did the giants win"));
        assert!(!wants_result("giants stadium"));
    }

    #[test]
    fn test_parse_team() {
        let body = json!({"teams": [{
            "idTeam": "134148",
            "strTeam": "New York Giants",
            "strSport": "American Football",
            "strLeague": "NFL",
            "strStadium": "MetLife Stadium"
        }]});
        let team = parse_teams(body).unwrap().unwrap();
        let ev = team_evidence(&team);
        assert_eq!(ev.summary, "New York Giants (American Football): NFL, plays at MetLife Stadium");
        assert_eq!(ev.confidence, 0.8);
        assert_eq!(parse_teams(json!({"teams": null})).unwrap(), None);
    }

    #[test]
    fn test_parse_last_event() {
        let body = json!({"results": [
            {"strHomeTeam": "Eagles", "strAwayTeam": "Giants", "intHomeScore": null, "intAwayScore": null},
            {
                "strHomeTeam": "Giants",
                "strAwayTeam": "Cowboys",
                "intHomeScore": "24",
                "intAwayScore": "17",
                "dateEvent": "2024-11-28",
                "strLeague": "NFL"
            }
        ]});
        let ev = parse_last_event(body).unwrap().unwrap();
        assert_eq!(ev.summary, "Giants 24 - 17 Cowboys (NFL, 2024-11-28)");
        assert_eq!(ev.confidence, 0.85);
        assert!(parse_last_event(json!({"results": null})).unwrap().is_none());
    }
}
