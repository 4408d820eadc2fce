//! Stem analysis: matching plus per-version scoring
//!
//! Scoring is a placeholder. [`RandomScorer`] waits a fixed delay and then
//! draws independent uniform scores in `[SCORE_MIN, SCORE_MAX]`.

use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use weaver_common::api::AnalysisResult;
use weaver_common::stems::{match_stems, StemScores};
use weaver_common::Result;

pub const SCORE_MIN: u32 = 80;
pub const SCORE_MAX: u32 = 100;

/// Produces quality scores for matched stems
#[async_trait]
pub trait StemScorer: Send + Sync {
    /// Name used in logs
    fn source_id(&self) -> &'static str;

    /// One score pair per name, in the same order
    async fn score(&self, names: &[String]) -> Result<Vec<StemScores>>;
}

/// Uniform random scores after an artificial delay
pub struct RandomScorer {
    delay: Duration,
}

impl RandomScorer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl StemScorer for RandomScorer {
    fn source_id(&self) -> &'static str {
        "random"
    }

    async fn score(&self, names: &[String]) -> Result<Vec<StemScores>> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let mut rng = rand::thread_rng();
        Ok(names
            .iter()
            .map(|_| {
                StemScores::new(
                    rng.gen_range(SCORE_MIN..=SCORE_MAX),
                    rng.gen_range(SCORE_MIN..=SCORE_MAX),
                )
            })
            .collect())
    }
}

/// Match the two stem lists and score every common stem
///
/// Disjoint lists yield an empty result; the scorer is still consulted so
/// the response time does not reveal the outcome.
pub async fn analyze_stems(
    scorer: &dyn StemScorer,
    stems_a: &[String],
    stems_b: &[String],
) -> Result<Vec<AnalysisResult>> {
    let names = match_stems(stems_a, stems_b);
    tracing::info!(
        stems_a = stems_a.len(),
        stems_b = stems_b.len(),
        common = names.len(),
        scorer = scorer.source_id(),
        "Analyzing stems"
    );

    let scores = scorer.score(&names).await?;
    if scores.len() != names.len() {
        return Err(weaver_common::Error::Internal(format!(
            "Scorer '{}' returned {} scores for {} stems",
            scorer.source_id(),
            scores.len(),
            names.len()
        )));
    }

    Ok(names
        .into_iter()
        .zip(scores)
        .map(|(name, scores)| AnalysisResult { name, scores })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedScorer(StemScores);

    #[async_trait]
    impl StemScorer for FixedScorer {
        fn source_id(&self) -> &'static str {
            "fixed"
        }

        async fn score(&self, names: &[String]) -> Result<Vec<StemScores>> {
            Ok(vec![self.0; names.len()])
        }
    }

    struct ShortScorer;

    #[async_trait]
    impl StemScorer for ShortScorer {
        fn source_id(&self) -> &'static str {
            "short"
        }

        async fn score(&self, _names: &[String]) -> Result<Vec<StemScores>> {
            Ok(Vec::new())
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_random_scores_in_range() {
        let scorer = RandomScorer::new(Duration::ZERO);
        let names = strings(&["a", "b", "c", "d", "e", "f", "g", "h"]);

        let scores = scorer.score(&names).await.unwrap();
        assert_eq!(scores.len(), names.len());
        for s in scores {
            assert!((SCORE_MIN..=SCORE_MAX).contains(&s.a));
            assert!((SCORE_MIN..=SCORE_MAX).contains(&s.b));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_random_scorer_waits_delay() {
        let scorer = RandomScorer::new(Duration::from_millis(2000));
        let started = tokio::time::Instant::now();

        scorer.score(&strings(&["kick"])).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(2000));
    }

    #[tokio::test]
    async fn test_analyze_pairs_names_with_scores() {
        let scorer = FixedScorer(StemScores::new(90, 85));
        let results = analyze_stems(
            &scorer,
            &strings(&["kick.wav", "snare.wav"]),
            &strings(&["kick.mp3", "hats.wav"]),
        )
        .await
        .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "kick");
        assert_eq!(results[0].scores, StemScores::new(90, 85));
    }

    #[tokio::test]
    async fn test_analyze_disjoint_is_empty() {
        let scorer = FixedScorer(StemScores::new(90, 85));
        let results = analyze_stems(&scorer, &strings(&["kick.wav"]), &strings(&["hats.wav"]))
            .await
            .unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_analyze_rejects_scorer_count_mismatch() {
        let result = analyze_stems(&ShortScorer, &strings(&["kick.wav"]), &strings(&["kick.wav"])).await;
        assert!(result.is_err());
    }
}
