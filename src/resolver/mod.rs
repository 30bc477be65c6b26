//! Classifier-backed pipeline stages.
//!
//! Both resolvers wrap an injected classifier and never return an error:
//! failures are logged and replaced by "no match" (emotion) or the default
//! label (zero-shot).

pub mod emotion;
pub mod zero_shot;

pub use emotion::EmotionResolver;
pub use zero_shot::ZeroShotResolver;

use std::future::Future;
use std::time::Duration;

use moodline_classify::ClassifyError;

/// Run a classifier call under a stage timeout, folding an elapsed timer into
/// [`ClassifyError::Timeout`].
pub(crate) async fn call_with_timeout<T, F>(timeout: Duration, call: F) -> Result<T, ClassifyError>
where
    F: Future<Output = Result<T, ClassifyError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(ClassifyError::Timeout(format!(
            "no answer within {}ms",
            timeout.as_millis()
        ))),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Deterministic classifier stand-ins shared by the unit tests.

    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use moodline_classify::{
        ClassifyError, EmotionClassifier, EmotionPrediction, ZeroShotClassifier, ZeroShotRanking,
    };

    type ErrorFactory = Box<dyn Fn() -> ClassifyError + Send + Sync>;

    /// Emotion classifier returning a fixed prediction or error.
    pub struct ScriptedEmotion {
        outcome: Result<EmotionPrediction, ErrorFactory>,
        calls: AtomicUsize,
    }

    impl ScriptedEmotion {
        pub fn ok(prediction: EmotionPrediction) -> Self {
            Self {
                outcome: Ok(prediction),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn err(make: impl Fn() -> ClassifyError + Send + Sync + 'static) -> Self {
            Self {
                outcome: Err(Box::new(make)),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EmotionClassifier for ScriptedEmotion {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn classify(&self, _text: &str) -> Result<EmotionPrediction, ClassifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.outcome {
                Ok(prediction) => Ok(prediction.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    /// Emotion classifier that sleeps before answering.
    pub struct SlowEmotion(pub Duration);

    #[async_trait]
    impl EmotionClassifier for SlowEmotion {
        fn name(&self) -> &str {
            "slow"
        }

        async fn classify(&self, _text: &str) -> Result<EmotionPrediction, ClassifyError> {
            tokio::time::sleep(self.0).await;
            Ok(EmotionPrediction::new("joy", 0.99))
        }
    }

    /// Emotion classifier that panics, for orchestrator boundary tests.
    pub struct PanickingEmotion;

    #[async_trait]
    impl EmotionClassifier for PanickingEmotion {
        fn name(&self) -> &str {
            "panicking"
        }

        async fn classify(&self, _text: &str) -> Result<EmotionPrediction, ClassifyError> {
            panic!("classifier bug");
        }
    }

    /// Zero-shot classifier returning a fixed ranking or error.
    pub struct ScriptedZeroShot {
        outcome: Result<ZeroShotRanking, ErrorFactory>,
        calls: AtomicUsize,
        last_candidates: Mutex<Vec<String>>,
    }

    impl ScriptedZeroShot {
        pub fn ok(ranking: ZeroShotRanking) -> Self {
            Self {
                outcome: Ok(ranking),
                calls: AtomicUsize::new(0),
                last_candidates: Mutex::new(Vec::new()),
            }
        }

        pub fn err(make: impl Fn() -> ClassifyError + Send + Sync + 'static) -> Self {
            Self {
                outcome: Err(Box::new(make)),
                calls: AtomicUsize::new(0),
                last_candidates: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn last_candidates(&self) -> Vec<String> {
            self.last_candidates.lock().map(|c| c.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl ZeroShotClassifier for ScriptedZeroShot {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn classify(
            &self,
            _text: &str,
            candidate_labels: &[String],
        ) -> Result<ZeroShotRanking, ClassifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut last) = self.last_candidates.lock() {
                *last = candidate_labels.to_vec();
            }
            match &self.outcome {
                Ok(ranking) => Ok(ranking.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    /// Zero-shot classifier that sleeps before answering.
    pub struct SlowZeroShot(pub Duration);

    #[async_trait]
    impl ZeroShotClassifier for SlowZeroShot {
        fn name(&self) -> &str {
            "slow"
        }

        async fn classify(
            &self,
            _text: &str,
            candidate_labels: &[String],
        ) -> Result<ZeroShotRanking, ClassifyError> {
            tokio::time::sleep(self.0).await;
            Ok(candidate_labels.iter().map(|l| (l.clone(), 0.5)).collect())
        }
    }
}
