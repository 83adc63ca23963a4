//! The question catalogue and its selection policy.

use std::collections::HashSet;

use crate::error::TrainerError;
use crate::model::{
    is_storable_id, Question, QuestionKind, Topic, MAX_DIFFICULTY, MIN_DIFFICULTY,
};

/// A validated, immutable set of questions.
///
/// Construction guarantees at least one question per topic and unique ids
/// the ledger can store, so selection never comes back empty-handed and
/// every answer can be recorded.
#[derive(Debug, Clone)]
pub struct Catalogue {
    questions: Vec<Question>,
}

impl Catalogue {
    /// Build a catalogue, keeping the given declaration order.
    pub fn new(questions: Vec<Question>) -> Result<Self, TrainerError> {
        let mut seen = HashSet::new();
        for q in &questions {
            if !is_storable_id(&q.id) {
                return Err(TrainerError::InvalidQuestionId(q.id.clone()));
            }
            if !seen.insert(q.id.as_str()) {
                return Err(TrainerError::DuplicateQuestion(q.id.clone()));
            }
        }
        if let Some(topic) = Topic::ALL
            .into_iter()
            .find(|t| !questions.iter().any(|q| q.topic == *t))
        {
            return Err(TrainerError::MissingTopic(topic));
        }
        Ok(Self { questions })
    }

    /// The built-in question bank.
    pub fn builtin() -> Self {
        Self {
            questions: builtin_questions(),
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Pick the question for a topic at a student's difficulty estimate.
    ///
    /// The estimate is rounded to the nearest tier and clamped to 1..=3. The
    /// first question in declaration order whose tier does not exceed it wins;
    /// if none qualifies, the first question of the topic is used instead.
    pub fn select(&self, topic: Topic, difficulty: f64) -> Result<&Question, TrainerError> {
        let level = difficulty_level(difficulty);

        if let Some(q) = self
            .questions
            .iter()
            .find(|q| q.topic == topic && q.difficulty <= level)
        {
            tracing::debug!(topic = %topic, level, question = %q.id, "selected question");
            return Ok(q);
        }

        let fallback = self
            .questions
            .iter()
            .find(|q| q.topic == topic)
            .ok_or(TrainerError::MissingTopic(topic))?;
        tracing::warn!(
            topic = %topic,
            level,
            question = %fallback.id,
            "no question at or below level, falling back to topic only"
        );
        Ok(fallback)
    }
}

/// Round a difficulty estimate to the nearest question tier.
pub fn difficulty_level(difficulty: f64) -> u8 {
    difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY).round() as u8
}

fn question(
    id: &str,
    topic: Topic,
    difficulty: u8,
    kind: QuestionKind,
    prompt: &str,
    answer: &str,
    explanation: &str,
) -> Question {
    Question {
        id: id.into(),
        topic,
        difficulty,
        kind,
        prompt: prompt.into(),
        expected_answer: answer.into(),
        explanation: explanation.into(),
    }
}

fn builtin_questions() -> Vec<Question> {
    use QuestionKind::*;
    use Topic::*;

    vec![
        question(
            "V1",
            Variables,
            1,
            Predict,
            "What will this print?\n\nx = 3\nprint(x)",
            "3",
            "print(x) prints the value of x.",
        ),
        question(
            "V2",
            Variables,
            2,
            Fill,
            "Fill the blank to assign 10 to variable a: a = __",
            "10",
            "Use a = 10 to store the number 10 in a.",
        ),
        question(
            "C1",
            Conditionals,
            1,
            Predict,
            "What will this print?\n\nif 5 > 2:\n    print(\"Yes\")\nelse:\n    print(\"No\")",
            "Yes",
            "5 is greater than 2, so the if branch runs.",
        ),
        question(
            "C2",
            Conditionals,
            2,
            Fix,
            "Fix the code to print \"Equal\" when x == y:\n\nx = 3\ny = 3\nif x = y:\nprint(\"Equal\")",
            "if x == y:\n    print(\"Equal\")",
            "Use == for comparison and indent the print.",
        ),
        question(
            "L1",
            Loops,
            1,
            Predict,
            "What will this print?\n\nfor i in range(3):\n    print(i)",
            "0\n1\n2",
            "range(3) yields 0,1,2 so each is printed on its own line.",
        ),
        question(
            "L2",
            Loops,
            2,
            Predict,
            "What will this print?\n\ncount = 0\nwhile count < 2:\n    print(\"Hi\")\n    count += 1",
            "Hi\nHi",
            "The while loop runs twice.",
        ),
        question(
            "F1",
            Functions,
            1,
            Predict,
            "What will this print?\n\ndef add(a, b):\n    return a + b\nprint(add(2,3))",
            "5",
            "add returns the sum 2 + 3.",
        ),
        question(
            "F2",
            Functions,
            2,
            Fill,
            "Fill the blank to define a function that returns 10:\ndef ten():\n    __",
            "return 10",
            "Functions use return to send back values.",
        ),
    ]
}
