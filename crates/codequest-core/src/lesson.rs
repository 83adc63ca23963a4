//! One-line lessons shown before each question.

use crate::model::Topic;

/// The short lesson for a topic.
pub fn lesson(topic: Topic) -> &'static str {
    match topic {
        Topic::Variables => "Variables store values. Example: x = 5 assigns 5 to x.",
        Topic::Conditionals => {
            "Conditionals let code make decisions. Example: if x > 0: print(\"pos\")"
        }
        Topic::Loops => "Loops repeat actions. Example: for i in range(3): print(i)",
        Topic::Functions => "Functions are reusable code blocks. Example: def f():\n    return 1",
    }
}
