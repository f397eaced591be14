// src/attempt.rs

//! Timed quiz attempts.
//!
//! An attempt moves `Loading -> InProgress -> Submitted`. While in progress a
//! background task ticks once per second; when the clock runs out the attempt
//! submits itself with whatever answers were recorded. Submitting by hand
//! stops the clock. An attempt is submitted at most once.

use std::{collections::HashMap, sync::Arc, time::Duration};

use serde::Serialize;
use tokio::{
    sync::{Mutex, watch},
    task::JoinHandle,
    time::{Instant, interval_at},
};

use crate::{
    error::AppError,
    models::{quiz::Quiz, quiz_result::NewResult},
    scoring::{self, Score},
    store::QuizStore,
};

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum AttemptState {
    Loading,
    InProgress,
    Submitted {
        #[serde(rename = "resultId")]
        result_id: String,
    },
}

/// Point-in-time view of an attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptStatus {
    pub id: String,
    pub quiz_id: String,
    pub user_id: String,
    #[serde(flatten)]
    pub state: AttemptState,
    pub remaining_seconds: u64,
    pub answers: HashMap<String, String>,
}

#[derive(Debug)]
struct Progress {
    state: AttemptState,
    remaining_seconds: u64,
    answers: HashMap<String, String>,
}

struct AttemptCore {
    id: String,
    quiz: Quiz,
    user_id: String,
    store: Arc<QuizStore>,
    progress: Mutex<Progress>,
    state_tx: watch::Sender<AttemptState>,
}

impl AttemptCore {
    /// One second elapsed. Returns whether the clock should keep running.
    async fn tick(&self) -> bool {
        let mut progress = self.progress.lock().await;
        if progress.state != AttemptState::InProgress {
            return false;
        }

        if progress.remaining_seconds > 1 {
            progress.remaining_seconds -= 1;
            return true;
        }

        progress.remaining_seconds = 0;
        tracing::info!("Attempt {} ran out of time, submitting", self.id);
        if let Err(e) = self.submit_locked(&mut progress).await {
            tracing::error!("Automatic submission of attempt {} failed: {}", self.id, e);
        }
        false
    }

    async fn submit_locked(&self, progress: &mut Progress) -> Result<(String, Score), AppError> {
        let score = scoring::score(&self.quiz, &progress.answers);
        let result_id = self
            .store
            .submit_result(NewResult {
                quiz_id: self.quiz.id.clone(),
                user_id: self.user_id.clone(),
                answers: progress.answers.clone(),
                score: score.achieved,
                total_possible: score.total_possible,
            })
            .await?;

        progress.state = AttemptState::Submitted {
            result_id: result_id.clone(),
        };
        self.state_tx.send_replace(progress.state.clone());

        Ok((result_id, score))
    }
}

/// Handle to a running attempt. Dropping it stops the countdown.
pub struct QuizAttempt {
    core: Arc<AttemptCore>,
    ticker: JoinHandle<()>,
}

impl QuizAttempt {
    /// Loads quiz `quiz_id` and starts the clock.
    /// Returns `None` when the quiz does not exist.
    pub async fn start(store: Arc<QuizStore>, quiz_id: &str, user_id: &str) -> Option<Self> {
        let (state_tx, _) = watch::channel(AttemptState::Loading);

        let quiz = store.get_quiz(quiz_id).await?;
        let remaining_seconds = quiz.time_limit_seconds();

        let core = Arc::new(AttemptCore {
            id: uuid::Uuid::new_v4().to_string(),
            quiz,
            user_id: user_id.to_string(),
            store,
            progress: Mutex::new(Progress {
                state: AttemptState::InProgress,
                remaining_seconds,
                answers: HashMap::new(),
            }),
            state_tx,
        });
        core.state_tx.send_replace(AttemptState::InProgress);

        let ticker = tokio::spawn(run_countdown(core.clone()));
        tracing::debug!(
            "Attempt {} started on quiz {} with {}s",
            core.id,
            core.quiz.id,
            remaining_seconds
        );

        Some(Self { core, ticker })
    }

    pub fn id(&self) -> &str {
        &self.core.id
    }

    pub fn quiz(&self) -> &Quiz {
        &self.core.quiz
    }

    /// Watches state changes, e.g. to learn about a timed-out submission.
    pub fn subscribe(&self) -> watch::Receiver<AttemptState> {
        self.core.state_tx.subscribe()
    }

    pub async fn status(&self) -> AttemptStatus {
        let progress = self.core.progress.lock().await;
        AttemptStatus {
            id: self.core.id.clone(),
            quiz_id: self.core.quiz.id.clone(),
            user_id: self.core.user_id.clone(),
            state: progress.state.clone(),
            remaining_seconds: progress.remaining_seconds,
            answers: progress.answers.clone(),
        }
    }

    /// Selects `option_id` for `question_id`, replacing any earlier choice.
    pub async fn record_answer(&self, question_id: &str, option_id: &str) -> Result<(), AppError> {
        let mut progress = self.core.progress.lock().await;
        if progress.state != AttemptState::InProgress {
            return Err(AppError::Conflict("Attempt is already submitted".to_string()));
        }
        if self.core.quiz.question(question_id).is_none() {
            return Err(AppError::ValidationError(format!(
                "Question '{}' is not part of this quiz",
                question_id
            )));
        }

        progress
            .answers
            .insert(question_id.to_string(), option_id.to_string());
        Ok(())
    }

    /// Scores and stores the attempt now. Returns the new result id and score.
    pub async fn submit(&self) -> Result<(String, Score), AppError> {
        let mut progress = self.core.progress.lock().await;
        if progress.state != AttemptState::InProgress {
            return Err(AppError::Conflict("Attempt is already submitted".to_string()));
        }

        let submitted = self.core.submit_locked(&mut progress).await?;
        self.ticker.abort();
        Ok(submitted)
    }
}

impl Drop for QuizAttempt {
    fn drop(&mut self) {
        self.ticker.abort();
    }
}

async fn run_countdown(core: Arc<AttemptCore>) {
    let mut interval = interval_at(Instant::now() + TICK, TICK);
    loop {
        interval.tick().await;
        if !core.tick().await {
            break;
        }
    }
}

/// Attempts reachable over HTTP, keyed by attempt id.
#[derive(Default)]
pub struct AttemptRegistry {
    attempts: Mutex<HashMap<String, Arc<QuizAttempt>>>,
}

impl AttemptRegistry {
    pub async fn insert(&self, attempt: QuizAttempt) -> Arc<QuizAttempt> {
        let attempt = Arc::new(attempt);
        let mut attempts = self.attempts.lock().await;
        attempts.insert(attempt.id().to_string(), attempt.clone());
        attempt
    }

    pub async fn get(&self, id: &str) -> Option<Arc<QuizAttempt>> {
        self.attempts.lock().await.get(id).cloned()
    }

    /// Forgets attempts that have been submitted. Their results stay in the store.
    pub async fn prune_submitted(&self) {
        let mut attempts = self.attempts.lock().await;
        let mut finished = Vec::new();
        for (id, attempt) in attempts.iter() {
            if matches!(*attempt.subscribe().borrow(), AttemptState::Submitted { .. }) {
                finished.push(id.clone());
            }
        }
        for id in finished {
            attempts.remove(&id);
        }
    }
}
