//! Debate verdicts.
//!
//! How a debate picks a winner is a product decision, so it is pluggable via
//! [`ScoringStrategy`]. The default, [`Undecided`], only summarizes.
//!
//! | Strategy | Winner |
//! |----------|--------|
//! | [`Undecided`] | never |
//! | [`HighestMeanScore`] | participant with the strictly highest mean self-score |
//! | [`JudgeMention`] | the only participant the judge's summary names |

use super::entities::DebateSession;

/// Outcome of judging a debate.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub summary: String,
    pub winner: Option<String>,
}

/// Decides a debate's summary and winner.
pub trait ScoringStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// `judge_summary` is an optional free-text summary produced by a judge
    /// model; strategies may use it or ignore it.
    fn judge(&self, session: &DebateSession, judge_summary: Option<&str>) -> Verdict;
}

/// Fallback summary when no judge text is available.
pub fn default_summary(session: &DebateSession) -> String {
    let participants = session.participants();
    let rounds = session
        .rounds()
        .iter()
        .map(|r| r.round)
        .max()
        .unwrap_or(0);
    format!(
        "{} contribution(s) over {} round(s) between {} on: {}",
        session.rounds().len(),
        rounds,
        participants.join(", "),
        session.topic
    )
}

fn summary_or_default(session: &DebateSession, judge_summary: Option<&str>) -> String {
    match judge_summary {
        Some(text) if !text.trim().is_empty() => text.trim().to_string(),
        _ => default_summary(session),
    }
}

/// Summarize only; never declares a winner.
#[derive(Debug, Clone, Copy, Default)]
pub struct Undecided;

impl ScoringStrategy for Undecided {
    fn name(&self) -> &'static str {
        "undecided"
    }

    fn judge(&self, session: &DebateSession, judge_summary: Option<&str>) -> Verdict {
        Verdict {
            summary: summary_or_default(session, judge_summary),
            winner: None,
        }
    }
}

/// Winner is the participant with the highest mean round score.
///
/// Rounds without a parsed score are ignored; ties produce no winner.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighestMeanScore;

impl ScoringStrategy for HighestMeanScore {
    fn name(&self) -> &'static str {
        "highest_mean_score"
    }

    fn judge(&self, session: &DebateSession, judge_summary: Option<&str>) -> Verdict {
        let mut best: Option<(&str, f64)> = None;
        let mut tied = false;

        for participant in session.participants() {
            let scores: Vec<f64> = session
                .rounds()
                .iter()
                .filter(|r| r.agent == participant)
                .filter_map(|r| r.score)
                .collect();
            if scores.is_empty() {
                continue;
            }
            let mean = scores.iter().sum::<f64>() / scores.len() as f64;
            match best {
                Some((_, best_mean)) if (mean - best_mean).abs() < f64::EPSILON => tied = true,
                Some((_, best_mean)) if mean < best_mean => {}
                _ => {
                    best = Some((participant, mean));
                    tied = false;
                }
            }
        }

        Verdict {
            summary: summary_or_default(session, judge_summary),
            winner: if tied {
                None
            } else {
                best.map(|(name, _)| name.to_string())
            },
        }
    }
}

/// Winner is the single participant named in the judge's summary.
///
/// Matching is case-insensitive. If zero or several participants are
/// mentioned the debate stays undecided.
#[derive(Debug, Clone, Copy, Default)]
pub struct JudgeMention;

impl ScoringStrategy for JudgeMention {
    fn name(&self) -> &'static str {
        "judge_mention"
    }

    fn judge(&self, session: &DebateSession, judge_summary: Option<&str>) -> Verdict {
        let winner = judge_summary.and_then(|text| {
            let lower = text.to_lowercase();
            let mentioned: Vec<&str> = session
                .participants()
                .into_iter()
                .filter(|name| lower.contains(&name.to_lowercase()))
                .collect();
            match mentioned.as_slice() {
                [only] => Some(only.to_string()),
                _ => None,
            }
        });

        Verdict {
            summary: summary_or_default(session, judge_summary),
            winner,
        }
    }
}

/// Look up a strategy by its configured name.
pub fn strategy_by_name(name: &str) -> Option<Box<dyn ScoringStrategy>> {
    match name.to_lowercase().replace('-', "_").as_str() {
        "undecided" | "none" => Some(Box::new(Undecided)),
        "highest_mean_score" | "score" => Some(Box::new(HighestMeanScore)),
        "judge_mention" | "judge" => Some(Box::new(JudgeMention)),
        _ => None,
    }
}

/// Parse a self-assessed score (1-10) from an argument.
///
/// Recognizes, in order:
/// 1. a JSON object with a numeric `score` field
/// 2. an `N/10` fraction
/// 3. `score: N` / `Score N`
///
/// Values are clamped to 1-10. Returns `None` when no score is stated, so
/// plain numbers in the argument text are never mistaken for scores.
pub fn parse_score(text: &str) -> Option<f64> {
    if let Some(start) = text.find('{')
        && let Some(end) = text.rfind('}')
        && end > start
        && let Ok(value) = serde_json::from_str::<serde_json::Value>(&text[start..=end])
        && let Some(score) = value.get("score").and_then(|v| v.as_f64())
    {
        return Some(score.clamp(1.0, 10.0));
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    for word in &words {
        let word = word.trim_matches(|c: char| c.is_ascii_punctuation() && c != '/');
        if let Some(num) = word.strip_suffix("/10")
            && let Ok(score) = num.parse::<f64>()
        {
            return Some(score.clamp(1.0, 10.0));
        }
    }

    for pair in words.windows(2) {
        let label = pair[0].trim_end_matches(':').to_lowercase();
        if label == "score"
            && let Ok(score) = pair[1]
                .trim_matches(|c: char| !c.is_ascii_digit())
                .parse::<f64>()
        {
            return Some(score.clamp(1.0, 10.0));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debate::entities::DebateRound;

    // ==================== Helper ====================

    fn session_with_scores(scores: &[(&str, Option<f64>)]) -> DebateSession {
        let mut session = DebateSession::new("d1", "Is the plan robust?");
        for (i, (agent, score)) in scores.iter().enumerate() {
            session.push_round(
                DebateRound::new(*agent, "argument", (i / 2 + 1) as u32).with_score(*score),
            );
        }
        session
    }

    // ==================== parse_score ====================

    #[test]
    fn test_parse_score_json() {
        assert_eq!(parse_score(r#"My verdict: {"score": 8, "reason": "ok"}"#), Some(8.0));
        assert_eq!(parse_score(r#"{"score": 14}"#), Some(10.0));
    }

    #[test]
    fn test_parse_score_fraction() {
        assert_eq!(parse_score("Overall I'd give it 7/10."), Some(7.0));
    }

    #[test]
    fn test_parse_score_label() {
        assert_eq!(parse_score("Score: 6"), Some(6.0));
        assert_eq!(parse_score("final score 9."), Some(9.0));
    }

    #[test]
    fn test_parse_score_ignores_plain_numbers() {
        assert_eq!(parse_score("We need 3 more trucks and 2 depots."), None);
    }

    // ==================== Strategies ====================

    #[test]
    fn test_undecided_never_picks_winner() {
        let session = session_with_scores(&[("a", Some(9.0)), ("b", Some(2.0))]);
        let verdict = Undecided.judge(&session, None);
        assert_eq!(verdict.winner, None);
        assert!(verdict.summary.contains("a, b"));
    }

    #[test]
    fn test_highest_mean_score_picks_winner() {
        let session = session_with_scores(&[
            ("challenger", Some(6.0)),
            ("defender", Some(8.0)),
            ("challenger", Some(7.0)),
            ("defender", None),
        ]);
        let verdict = HighestMeanScore.judge(&session, Some("Judge says both made points."));
        assert_eq!(verdict.winner.as_deref(), Some("defender"));
        assert_eq!(verdict.summary, "Judge says both made points.");
    }

    #[test]
    fn test_highest_mean_score_tie_is_undecided() {
        let session = session_with_scores(&[("a", Some(7.0)), ("b", Some(7.0))]);
        assert_eq!(HighestMeanScore.judge(&session, None).winner, None);
    }

    #[test]
    fn test_judge_mention_single_name() {
        let session = session_with_scores(&[("Challenger", None), ("Defender", None)]);
        let verdict = JudgeMention.judge(&session, Some("The defender argued more convincingly."));
        assert_eq!(verdict.winner.as_deref(), Some("Defender"));
    }

    #[test]
    fn test_judge_mention_both_names_is_undecided() {
        let session = session_with_scores(&[("Challenger", None), ("Defender", None)]);
        let verdict = JudgeMention.judge(&session, Some("Challenger and Defender tied."));
        assert_eq!(verdict.winner, None);
    }

    #[test]
    fn test_strategy_by_name() {
        assert_eq!(strategy_by_name("undecided").unwrap().name(), "undecided");
        assert_eq!(
            strategy_by_name("highest-mean-score").unwrap().name(),
            "highest_mean_score"
        );
        assert_eq!(strategy_by_name("Judge").unwrap().name(), "judge_mention");
        assert!(strategy_by_name("coin_flip").is_none());
    }
}
