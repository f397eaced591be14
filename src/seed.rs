// src/seed.rs

//! Built-in quizzes written to storage the first time the app starts.

use chrono::Utc;

use crate::{
    config::{DEFAULT_QUESTION_POINTS, SYSTEM_USER_ID},
    models::quiz::{Question, Quiz, QuizOption},
};

fn question(id: &str, text: &str, options: [&str; 4], correct_option: &str) -> Question {
    Question {
        id: id.to_string(),
        text: text.to_string(),
        options: ["a", "b", "c", "d"]
            .into_iter()
            .zip(options)
            .map(|(option_id, option_text)| QuizOption {
                id: option_id.to_string(),
                text: option_text.to_string(),
            })
            .collect(),
        correct_option: correct_option.to_string(),
        points: DEFAULT_QUESTION_POINTS,
    }
}

pub fn sample_quizzes() -> Vec<Quiz> {
    let now = Utc::now();

    vec![
        Quiz {
            id: "1".to_string(),
            title: "JavaScript Fundamentals".to_string(),
            description: "Test your knowledge of JavaScript basics".to_string(),
            time_limit: 10,
            questions: vec![
                question(
                    "1-1",
                    "Which of the following is NOT a JavaScript data type?",
                    ["String", "Boolean", "Float", "Object"],
                    "c",
                ),
                question(
                    "1-2",
                    "What will the following code return: console.log(typeof [])?",
                    ["array", "object", "undefined", "string"],
                    "b",
                ),
                question(
                    "1-3",
                    "Which method is used to add elements to the end of an array?",
                    ["push()", "pop()", "unshift()", "shift()"],
                    "a",
                ),
            ],
            is_public: true,
            created_by: SYSTEM_USER_ID.to_string(),
            created_at: now,
            updated_at: now,
        },
        Quiz {
            id: "2".to_string(),
            title: "React Basics".to_string(),
            description: "A quick quiz about React fundamentals".to_string(),
            time_limit: 15,
            questions: vec![
                question(
                    "2-1",
                    "What function is used to update state in functional components?",
                    ["this.setState()", "useState()", "setState()", "state.update()"],
                    "b",
                ),
                question(
                    "2-2",
                    "Which hook is used for side effects in React?",
                    ["useEffect()", "useSideEffect()", "useCase()", "useAction()"],
                    "a",
                ),
            ],
            is_public: true,
            created_by: SYSTEM_USER_ID.to_string(),
            created_at: now,
            updated_at: now,
        },
    ]
}
