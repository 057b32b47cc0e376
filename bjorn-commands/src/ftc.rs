//! Minimal FTCScout REST client used by the scouting commands.

use std::time::Duration;

use anyhow::Context as _;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

/// One team's qualification rank at an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamRank {
    pub rank: u32,
    pub team_number: u32,
}

/// One award a team received, as returned by `/teams/{n}/awards`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamAward {
    pub season: u32,
    pub event_code: String,
    pub team_number: u32,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub placement: u32,
    #[serde(default)]
    pub division_name: Option<String>,
    #[serde(default)]
    pub person_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventTeamEntry {
    team_number: Option<u32>,
    stats: Option<EventTeamStats>,
}

#[derive(Debug, Deserialize)]
struct EventTeamStats {
    rank: Option<u32>,
}

/// HTTP client for the FTCScout REST API.
#[derive(Debug, Clone)]
pub struct FtcClient {
    http: reqwest::Client,
    base_url: String,
}

impl FtcClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to create FTCScout HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ranked teams at an event, best rank first.
    pub async fn event_rankings(
        &self,
        year: &str,
        event_code: &str,
    ) -> anyhow::Result<Vec<TeamRank>> {
        let url = format!("{}/events/{year}/{event_code}/teams", self.base_url);
        let entries: Vec<EventTeamEntry> = self
            .get_json(&url)
            .await
            .with_context(|| format!("failed to fetch leaderboard for {year} {event_code}"))?;

        Ok(rankings_from_entries(entries))
    }

    /// Every award a team has received.
    pub async fn team_awards(&self, team_number: u32) -> anyhow::Result<Vec<TeamAward>> {
        let url = format!("{}/teams/{team_number}/awards", self.base_url);
        self.get_json(&url)
            .await
            .with_context(|| format!("failed to fetch awards for team {team_number}"))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> anyhow::Result<T> {
        debug!(url, "requesting FTCScout");

        let response = self.http.get(url).send().await?.error_for_status()?;
        let body = response.json::<T>().await?;

        Ok(body)
    }
}

/// Keep entries with both a team number and a rank, sorted by rank.
fn rankings_from_entries(entries: Vec<EventTeamEntry>) -> Vec<TeamRank> {
    let mut ranks: Vec<TeamRank> = entries
        .into_iter()
        .filter_map(|entry| {
            Some(TeamRank {
                team_number: entry.team_number?,
                rank: entry.stats?.rank?,
            })
        })
        .collect();

    ranks.sort_by_key(|team| team.rank);
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rankings_skip_incomplete_entries_and_sort() {
        let body = r#"[
            {"teamNumber": 16236, "stats": {"rank": 3, "opr": 120.5}},
            {"teamNumber": 22105, "stats": {"rank": 1}},
            {"teamNumber": 7350, "stats": null},
            {"stats": {"rank": 2}},
            {"teamNumber": 11212, "stats": {"rank": 2}}
        ]"#;
        let entries: Vec<EventTeamEntry> = serde_json::from_str(body).unwrap();

        let ranks = rankings_from_entries(entries);

        assert_eq!(
            ranks,
            vec![
                TeamRank { rank: 1, team_number: 22105 },
                TeamRank { rank: 2, team_number: 11212 },
                TeamRank { rank: 3, team_number: 16236 },
            ]
        );
    }

    #[test]
    fn parses_awards_payload() {
        let body = r#"[{
            "season": 2024,
            "eventCode": "USCASDQ1",
            "teamNumber": 22105,
            "type": "Inspire",
            "placement": 1,
            "divisionName": null,
            "personName": null,
            "createdAt": "2024-12-01T00:00:00Z",
            "updatedAt": "2024-12-01T00:00:00Z"
        }]"#;

        let awards: Vec<TeamAward> = serde_json::from_str(body).unwrap();

        assert_eq!(awards.len(), 1);
        assert_eq!(awards[0].kind, "Inspire");
        assert_eq!(awards[0].event_code, "USCASDQ1");
        assert_eq!(awards[0].placement, 1);
        assert_eq!(awards[0].division_name, None);
    }

    #[test]
    fn trims_trailing_slash_from_base_url() {
        let client = FtcClient::new("http://localhost:1234/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:1234");
    }
}
