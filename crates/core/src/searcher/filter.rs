//! Season/episode filtering for broad series queries.

use super::Candidate;

/// Canonical `S{SS}E{EE}` token, zero-padded to two digits. Episode
/// numbers past 99 keep their natural width, which means releases that
/// pad to three digits will not match; the common-case behavior is
/// intentionally preserved.
pub fn season_episode_token(season: u32, episode: u32) -> String {
    format!("S{:02}E{:02}", season, episode)
}

/// Keep only candidates whose normalized title (lowercased, spaces and
/// hyphens stripped) contains the season/episode token.
pub fn filter_by_season_episode(
    candidates: Vec<Candidate>,
    season: u32,
    episode: u32,
) -> Vec<Candidate> {
    let target = season_episode_token(season, episode).to_lowercase();

    candidates
        .into_iter()
        .filter(|candidate| {
            let normalized: String = candidate
                .title
                .to_lowercase()
                .chars()
                .filter(|c| !c.is_whitespace() && *c != '-')
                .collect();
            normalized.contains(&target)
        })
        .collect()
}
