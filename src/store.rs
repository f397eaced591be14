// src/store.rs

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::Mutex;
use validator::Validate;

use crate::{
    error::AppError,
    leaderboard,
    models::{
        quiz::{CreateQuizRequest, Question, QuestionDraft, Quiz, UpdateQuizRequest},
        quiz_result::{LeaderboardEntry, NewResult, QuizResult},
    },
    seed::sample_quizzes,
    storage::{LocalStorage, QUIZZES_KEY, RESULTS_KEY},
};

#[derive(Debug, Default)]
struct StoreData {
    quizzes: Vec<Quiz>,
    results: Vec<QuizResult>,
}

/// Quizzes and results, mirrored to local storage.
///
/// Every mutation writes the complete updated collection before it returns.
/// The in-memory copy only changes once that write succeeded, so a failed
/// write leaves the store exactly as it was.
pub struct QuizStore {
    storage: Arc<dyn LocalStorage>,
    data: Mutex<StoreData>,
}

impl QuizStore {
    /// Loads both collections from `storage`.
    /// Seeds the sample quizzes when nothing has been stored yet.
    pub async fn load(storage: Arc<dyn LocalStorage>) -> Result<Self, AppError> {
        let quizzes = match read_json::<Vec<Quiz>>(storage.as_ref(), QUIZZES_KEY).await? {
            Some(quizzes) => quizzes,
            None => {
                let quizzes = sample_quizzes();
                tracing::info!("Seeding {} sample quizzes", quizzes.len());
                storage
                    .set_item(QUIZZES_KEY, &serde_json::to_string(&quizzes)?)
                    .await?;
                quizzes
            }
        };

        let results = read_json::<Vec<QuizResult>>(storage.as_ref(), RESULTS_KEY)
            .await?
            .unwrap_or_default();

        tracing::debug!(
            "Loaded {} quizzes and {} results",
            quizzes.len(),
            results.len()
        );

        Ok(Self {
            storage,
            data: Mutex::new(StoreData { quizzes, results }),
        })
    }

    /// Validates and stores a new quiz owned by `owner_id`. Returns its id.
    pub async fn create_quiz(
        &self,
        req: CreateQuizRequest,
        owner_id: &str,
    ) -> Result<String, AppError> {
        req.validate()?;

        let now = Utc::now();
        let quiz = Quiz {
            id: new_id(),
            title: req.title,
            description: req.description,
            time_limit: req.time_limit,
            questions: build_questions(req.questions),
            is_public: req.is_public,
            created_by: owner_id.to_string(),
            created_at: now,
            updated_at: now,
        };
        let id = quiz.id.clone();

        let mut data = self.data.lock().await;
        let mut quizzes = data.quizzes.clone();
        quizzes.push(quiz);
        self.write(QUIZZES_KEY, &quizzes).await?;
        data.quizzes = quizzes;

        tracing::info!("Quiz {} created by {}", id, owner_id);
        Ok(id)
    }

    /// Merges the present fields of `req` into quiz `id`.
    ///
    /// Returns the updated quiz, or `None` when no quiz has that id.
    /// The id and creation time never change; the update time always moves forward.
    pub async fn update_quiz(
        &self,
        id: &str,
        req: UpdateQuizRequest,
    ) -> Result<Option<Quiz>, AppError> {
        req.validate()?;

        let mut data = self.data.lock().await;
        let mut quizzes = data.quizzes.clone();
        let Some(quiz) = quizzes.iter_mut().find(|q| q.id == id) else {
            return Ok(None);
        };

        if let Some(title) = req.title {
            quiz.title = title;
        }
        if let Some(description) = req.description {
            quiz.description = description;
        }
        if let Some(time_limit) = req.time_limit {
            quiz.time_limit = time_limit;
        }
        if let Some(questions) = req.questions {
            quiz.questions = build_questions(questions);
        }
        if let Some(is_public) = req.is_public {
            quiz.is_public = is_public;
        }
        quiz.updated_at = advance(quiz.updated_at);
        let updated = quiz.clone();

        self.write(QUIZZES_KEY, &quizzes).await?;
        data.quizzes = quizzes;

        Ok(Some(updated))
    }

    /// Removes quiz `id` and every result recorded against it.
    /// Returns `false` when there was no such quiz.
    pub async fn delete_quiz(&self, id: &str) -> Result<bool, AppError> {
        let mut data = self.data.lock().await;
        if !data.quizzes.iter().any(|q| q.id == id) {
            return Ok(false);
        }

        let quizzes: Vec<Quiz> = data.quizzes.iter().filter(|q| q.id != id).cloned().collect();
        let results: Vec<QuizResult> = data
            .results
            .iter()
            .filter(|r| r.quiz_id != id)
            .cloned()
            .collect();

        self.storage
            .set_items(&[
                (QUIZZES_KEY, serde_json::to_string(&quizzes)?),
                (RESULTS_KEY, serde_json::to_string(&results)?),
            ])
            .await?;

        let removed_results = data.results.len() - results.len();
        data.quizzes = quizzes;
        data.results = results;

        tracing::info!("Quiz {} deleted along with {} results", id, removed_results);
        Ok(true)
    }

    pub async fn get_quiz(&self, id: &str) -> Option<Quiz> {
        let data = self.data.lock().await;
        data.quizzes.iter().find(|q| q.id == id).cloned()
    }

    pub async fn list_quizzes(&self) -> Vec<Quiz> {
        self.data.lock().await.quizzes.clone()
    }

    /// Quizzes flagged public, in creation order.
    pub async fn public_quizzes(&self) -> Vec<Quiz> {
        let data = self.data.lock().await;
        data.quizzes.iter().filter(|q| q.is_public).cloned().collect()
    }

    /// Quizzes created by `user_id`, in creation order.
    pub async fn get_user_quizzes(&self, user_id: &str) -> Vec<Quiz> {
        let data = self.data.lock().await;
        data.quizzes
            .iter()
            .filter(|q| q.created_by == user_id)
            .cloned()
            .collect()
    }

    /// Stores a scored attempt and returns the new result id.
    pub async fn submit_result(&self, new: NewResult) -> Result<String, AppError> {
        let result = QuizResult {
            id: new_id(),
            quiz_id: new.quiz_id,
            user_id: new.user_id,
            answers: new.answers,
            score: new.score,
            total_possible: new.total_possible,
            submitted_at: Utc::now(),
        };
        let id = result.id.clone();

        let mut data = self.data.lock().await;
        let mut results = data.results.clone();
        results.push(result);
        self.write(RESULTS_KEY, &results).await?;
        data.results = results;

        Ok(id)
    }

    pub async fn get_quiz_results(&self, quiz_id: &str) -> Vec<QuizResult> {
        let data = self.data.lock().await;
        data.results
            .iter()
            .filter(|r| r.quiz_id == quiz_id)
            .cloned()
            .collect()
    }

    pub async fn get_result(&self, id: &str) -> Option<QuizResult> {
        let data = self.data.lock().await;
        data.results.iter().find(|r| r.id == id).cloned()
    }

    pub async fn get_user_results(&self, user_id: &str) -> Vec<QuizResult> {
        let data = self.data.lock().await;
        data.results
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Top results across all quizzes, or for `quiz_id` only.
    pub async fn leaderboard(&self, quiz_id: Option<&str>) -> Vec<LeaderboardEntry> {
        let data = self.data.lock().await;
        let ranked = leaderboard::rank(&data.results, quiz_id);
        leaderboard::entries(ranked, &data.quizzes)
    }

    async fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), AppError> {
        let json = serde_json::to_string(value)?;
        self.storage.set_item(key, &json).await.inspect_err(|e| {
            tracing::error!("Failed to persist '{}': {}", key, e);
        })
    }
}

async fn read_json<T: DeserializeOwned>(
    storage: &dyn LocalStorage,
    key: &str,
) -> Result<Option<T>, AppError> {
    match storage.get_item(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// The current time, or just after `previous` if the clock has not moved past it.
fn advance(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::milliseconds(1)
    }
}

fn build_questions(drafts: Vec<QuestionDraft>) -> Vec<Question> {
    drafts
        .into_iter()
        .map(|draft| Question {
            id: draft.id.unwrap_or_else(new_id),
            text: draft.text,
            options: draft.options,
            correct_option: draft.correct_option,
            points: draft.points,
        })
        .collect()
}
