// src/models/quiz.rs

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::config::{
    DEFAULT_QUESTION_POINTS, DEFAULT_TIME_LIMIT_MINUTES, MAX_QUESTION_POINTS,
    MAX_TIME_LIMIT_MINUTES, MIN_TIME_LIMIT_MINUTES,
};

/// A named, timed collection of questions.
/// Stored as one element of the JSON array under the `quizzes` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub description: String,

    /// Time allowed for one attempt, in minutes.
    pub time_limit: u32,

    pub questions: Vec<Question>,

    /// Public quizzes are listed on the home page.
    pub is_public: bool,

    /// Id of the user that created the quiz (`system` for sample data).
    pub created_by: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Quiz {
    /// Countdown length for one attempt.
    pub fn time_limit_seconds(&self) -> u64 {
        u64::from(self.time_limit) * 60
    }

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    /// Sum of all question points, saturating at `u32::MAX`.
    pub fn total_points(&self) -> u32 {
        self.questions
            .iter()
            .fold(0u32, |total, q| total.saturating_add(q.points))
    }
}

/// A single multiple-choice prompt with exactly one correct option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub text: String,
    pub options: Vec<QuizOption>,

    /// Id of the correct entry in `options`.
    pub correct_option: String,

    pub points: u32,
}

impl Question {
    pub fn has_option(&self, option_id: &str) -> bool {
        self.options.iter().any(|o| o.id == option_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizOption {
    pub id: String,
    pub text: String,
}

/// DTO for sending a quiz to someone taking it (excludes correct options).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuiz {
    pub id: String,
    pub title: String,
    pub description: String,
    pub time_limit: u32,
    pub questions: Vec<PublicQuestion>,
    pub created_by: String,
}

#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: String,
    pub text: String,
    pub options: Vec<QuizOption>,
    pub points: u32,
}

impl From<&Quiz> for PublicQuiz {
    fn from(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id.clone(),
            title: quiz.title.clone(),
            description: quiz.description.clone(),
            time_limit: quiz.time_limit,
            questions: quiz
                .questions
                .iter()
                .map(|q| PublicQuestion {
                    id: q.id.clone(),
                    text: q.text.clone(),
                    options: q.options.clone(),
                    points: q.points,
                })
                .collect(),
            created_by: quiz.created_by.clone(),
        }
    }
}

/// DTO for creating a new quiz.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizRequest {
    #[validate(custom(function = not_blank, message = "Quiz title is required"))]
    pub title: String,
    #[validate(custom(function = not_blank, message = "Quiz description is required"))]
    pub description: String,
    #[serde(default = "default_time_limit")]
    #[validate(range(
        min = MIN_TIME_LIMIT_MINUTES,
        max = MAX_TIME_LIMIT_MINUTES,
        message = "Time limit must be between 1 and 120 minutes"
    ))]
    pub time_limit: u32,
    #[validate(custom(function = validate_questions))]
    pub questions: Vec<QuestionDraft>,
    #[serde(default = "default_is_public")]
    pub is_public: bool,
}

/// DTO for one question inside a create/update request.
/// A missing id is filled in when the quiz is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    #[serde(default)]
    pub id: Option<String>,
    pub text: String,
    pub options: Vec<QuizOption>,
    pub correct_option: String,
    #[serde(default = "default_points")]
    pub points: u32,
}

/// DTO for editing a quiz. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuizRequest {
    #[validate(custom(function = not_blank, message = "Quiz title is required"))]
    pub title: Option<String>,
    #[validate(custom(function = not_blank, message = "Quiz description is required"))]
    pub description: Option<String>,
    #[validate(range(
        min = MIN_TIME_LIMIT_MINUTES,
        max = MAX_TIME_LIMIT_MINUTES,
        message = "Time limit must be between 1 and 120 minutes"
    ))]
    pub time_limit: Option<u32>,
    #[validate(custom(function = validate_questions))]
    pub questions: Option<Vec<QuestionDraft>>,
    pub is_public: Option<bool>,
}

fn default_time_limit() -> u32 {
    DEFAULT_TIME_LIMIT_MINUTES
}

fn default_points() -> u32 {
    DEFAULT_QUESTION_POINTS
}

fn default_is_public() -> bool {
    true
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

/// Checks the quiz invariants on a list of question drafts:
/// at least one question, no blank text, unique ids, bounded points, and a
/// correct option that is one of the question's own options.
fn validate_questions(questions: &[QuestionDraft]) -> Result<(), ValidationError> {
    if questions.is_empty() {
        return Err(invalid("no_questions", "A quiz needs at least one question"));
    }

    let mut question_ids = HashSet::new();
    for question in questions {
        if let Some(id) = &question.id {
            if id.trim().is_empty() || !question_ids.insert(id.as_str()) {
                return Err(invalid("duplicate_question_id", "Question ids must be unique"));
            }
        }

        if question.text.trim().is_empty() || question.options.is_empty() {
            return Err(invalid(
                "incomplete_question",
                "All questions and options must be filled out",
            ));
        }

        if question.points > MAX_QUESTION_POINTS {
            return Err(invalid(
                "points_out_of_range",
                "Question points must be between 0 and 1000",
            ));
        }

        let mut option_ids = HashSet::new();
        for option in &question.options {
            if option.text.trim().is_empty() {
                return Err(invalid(
                    "incomplete_question",
                    "All questions and options must be filled out",
                ));
            }
            if option.id.trim().is_empty() || !option_ids.insert(option.id.as_str()) {
                return Err(invalid("duplicate_option_id", "Option ids must be unique"));
            }
        }

        if !option_ids.contains(question.correct_option.as_str()) {
            return Err(invalid(
                "unknown_correct_option",
                "The correct option must be one of the question's options",
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(id: &str, text: &str) -> QuizOption {
        QuizOption {
            id: id.to_string(),
            text: text.to_string(),
        }
    }

    fn draft_question() -> QuestionDraft {
        QuestionDraft {
            id: None,
            text: "Which keyword declares an immutable binding?".to_string(),
            options: vec![option("a", "let"), option("b", "var")],
            correct_option: "a".to_string(),
            points: 10,
        }
    }

    fn draft() -> CreateQuizRequest {
        CreateQuizRequest {
            title: "Rust".to_string(),
            description: "Bindings".to_string(),
            time_limit: 10,
            questions: vec![draft_question()],
            is_public: true,
        }
    }

    #[test]
    fn test_valid_draft_passes() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn test_blank_title_rejected() {
        let mut req = draft();
        req.title = "   ".to_string();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }

    #[test]
    fn test_empty_question_list_rejected() {
        let mut req = draft();
        req.questions.clear();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_correct_option_must_belong_to_question() {
        let mut req = draft();
        req.questions[0].correct_option = "z".to_string();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("questions"));
    }

    #[test]
    fn test_blank_option_text_rejected() {
        let mut req = draft();
        req.questions[0].options[1].text = String::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut req = draft();
        req.questions[0].options[1].id = "a".to_string();
        assert!(req.validate().is_err());

        let mut req = draft();
        let mut second = draft_question();
        req.questions[0].id = Some("q1".to_string());
        second.id = Some("q1".to_string());
        req.questions.push(second);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_question_points_bounded() {
        let mut req = draft();
        req.questions[0].points = MAX_QUESTION_POINTS;
        assert!(req.validate().is_ok());

        req.questions[0].points = u32::MAX;
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("questions"));

        let update = UpdateQuizRequest {
            questions: Some(req.questions),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_draft_serializes_camel_case() {
        let value = serde_json::to_value(draft_question()).unwrap();
        assert_eq!(value["correctOption"], "a");
        assert_eq!(value["points"], 10);

        let back: QuestionDraft = serde_json::from_value(value).unwrap();
        assert_eq!(back.options.len(), 2);
    }

    #[test]
    fn test_total_points_saturates() {
        let json = serde_json::json!({
            "id": "big",
            "title": "T",
            "description": "D",
            "timeLimit": 1,
            "isPublic": true,
            "createdBy": "system",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z",
            "questions": [
                {"id": "q1", "text": "Q", "options": [{"id": "a", "text": "A"}], "correctOption": "a", "points": u32::MAX},
                {"id": "q2", "text": "Q", "options": [{"id": "a", "text": "A"}], "correctOption": "a", "points": u32::MAX}
            ]
        });
        let quiz: Quiz = serde_json::from_value(json).unwrap();
        assert_eq!(quiz.total_points(), u32::MAX);
    }

    #[test]
    fn test_time_limit_bounds() {
        let mut req = draft();
        req.time_limit = 0;
        assert!(req.validate().is_err());
        req.time_limit = 121;
        assert!(req.validate().is_err());
        req.time_limit = 120;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_empty_update_is_valid() {
        assert!(UpdateQuizRequest::default().validate().is_ok());

        let update = UpdateQuizRequest {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_quiz_json_uses_camel_case() {
        let json = serde_json::json!({
            "id": "1",
            "title": "T",
            "description": "D",
            "timeLimit": 10,
            "isPublic": true,
            "createdBy": "system",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z",
            "questions": [{
                "id": "1-1",
                "text": "Q",
                "options": [{"id": "a", "text": "A"}],
                "correctOption": "a",
                "points": 10
            }]
        });
        let quiz: Quiz = serde_json::from_value(json).unwrap();
        assert_eq!(quiz.time_limit_seconds(), 600);
        assert_eq!(quiz.total_points(), 10);
        assert_eq!(quiz.question("1-1").map(|q| q.has_option("a")), Some(true));
    }
}
