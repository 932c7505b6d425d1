//! Trusted local view model and the normalizer that builds it from raw snapshots.
//!
//! [`normalize`] is the only place that reads fields off a remote payload. It never
//! fails: absent, wrong-typed, or out-of-range values collapse to their defaults.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Opaque identifier of a question, as handed out by the remote authority.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct QuestionId(Value);

impl QuestionId {
    /// Accept string and numeric identifiers; anything else is treated as absent.
    fn from_raw(value: &Value) -> Option<Self> {
        match value {
            Value::String(_) | Value::Number(_) => Some(Self(value.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(text) => f.write_str(text),
            other => write!(f, "{other}"),
        }
    }
}

/// Question currently on display.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    /// Identifier of the question, absent before the first question is loaded.
    pub id: Option<QuestionId>,
    /// Short heading.
    pub title: String,
    /// Full question text.
    pub body: String,
    /// Answer text; only shown once `answer_revealed` is set.
    pub answer: String,
    /// Whether the teacher revealed the answer.
    pub answer_revealed: bool,
}

impl QuestionView {
    /// The answer, gated on the reveal flag.
    pub fn visible_answer(&self) -> Option<&str> {
        self.answer_revealed.then_some(self.answer.as_str())
    }
}

/// Remaining time, in whole seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimersView {
    /// Seconds left for the current question.
    pub question_remaining: u64,
    /// Seconds left for the whole quiz.
    pub quiz_remaining: u64,
}

/// Team scores as reported by the remote authority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoresView {
    /// Score of team A.
    pub team_a: i64,
    /// Score of team B.
    pub team_b: i64,
}

/// Fully defaulted view of one snapshot. Serialises back to the wire shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionViewModel {
    /// Current question.
    pub question: QuestionView,
    /// Countdown timers.
    pub timers: TimersView,
    /// Team scores.
    pub scores: ScoresView,
}

/// Build a [`SessionViewModel`] from an arbitrary remote payload.
pub fn normalize(raw: &Value) -> SessionViewModel {
    let question = raw.get("question");
    let timers = raw.get("timers");
    let scores = raw.get("scores");

    SessionViewModel {
        question: QuestionView {
            id: field(question, "id").and_then(QuestionId::from_raw),
            title: text(field(question, "title")),
            body: text(field(question, "body")),
            answer: text(field(question, "answer")),
            answer_revealed: flag(field(question, "answerRevealed")),
        },
        timers: TimersView {
            question_remaining: seconds(field(timers, "questionRemaining")),
            quiz_remaining: seconds(field(timers, "quizRemaining")),
        },
        scores: ScoresView {
            team_a: score(field(scores, "teamA")),
            team_b: score(field(scores, "teamB")),
        },
    }
}

fn field<'a>(section: Option<&'a Value>, name: &str) -> Option<&'a Value> {
    section.and_then(|value| value.get(name))
}

fn text(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_default()
}

fn flag(value: Option<&Value>) -> bool {
    value.and_then(Value::as_bool).unwrap_or(false)
}

/// Non-negative whole seconds; fractions are truncated, negatives clamp to zero.
fn seconds(value: Option<&Value>) -> u64 {
    let Some(value) = value else {
        return 0;
    };
    if let Some(whole) = value.as_u64() {
        return whole;
    }
    match value.as_f64() {
        Some(number) if number.is_finite() && number > 0.0 => number.trunc() as u64,
        _ => 0,
    }
}

fn score(value: Option<&Value>) -> i64 {
    let Some(value) = value else {
        return 0;
    };
    if let Some(whole) = value.as_i64() {
        return whole;
    }
    match value.as_f64() {
        Some(number) if number.is_finite() => number.trunc() as i64,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "question": {
                "id": 1,
                "title": "Q1",
                "body": "What is 2+2?",
                "answer": "4",
                "answerRevealed": false
            },
            "timers": { "questionRemaining": 30, "quizRemaining": 600 },
            "scores": { "teamA": 2, "teamB": 1 }
        })
    }

    #[test]
    fn well_formed_snapshot_round_trips_unchanged() {
        let raw = sample();
        let view = normalize(&raw);
        assert_eq!(view.question.title, "Q1");
        assert_eq!(view.question.body, "What is 2+2?");
        assert_eq!(view.timers.quiz_remaining, 600);
        assert_eq!(view.scores, ScoresView { team_a: 2, team_b: 1 });
        assert_eq!(serde_json::to_value(&view).unwrap(), raw);
    }

    #[test]
    fn answer_is_visible_only_once_revealed() {
        let mut raw = sample();
        let hidden = normalize(&raw);
        assert_eq!(hidden.question.answer, "4");
        assert_eq!(hidden.question.visible_answer(), None);

        raw["question"]["answerRevealed"] = json!(true);
        let revealed = normalize(&raw);
        assert_eq!(revealed.question.visible_answer(), Some("4"));
    }

    #[test]
    fn empty_snapshot_yields_defaults() {
        let view = normalize(&json!({}));
        assert_eq!(view, SessionViewModel::default());
        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            json!({
                "question": { "id": null, "title": "", "body": "", "answer": "", "answerRevealed": false },
                "timers": { "questionRemaining": 0, "quizRemaining": 0 },
                "scores": { "teamA": 0, "teamB": 0 }
            })
        );
    }

    #[test]
    fn non_object_payloads_yield_defaults() {
        for raw in [
            Value::Null,
            json!("<html>maintenance</html>"),
            json!(42),
            json!([1, 2, 3]),
            json!({ "question": "oops", "timers": [], "scores": null }),
        ] {
            assert_eq!(normalize(&raw), SessionViewModel::default(), "{raw}");
        }
    }

    #[test]
    fn wrong_typed_fields_fall_back_individually() {
        let raw = json!({
            "question": {
                "id": { "nested": true },
                "title": 7,
                "body": "still here",
                "answer": null,
                "answerRevealed": "yes"
            },
            "timers": { "questionRemaining": "30", "quizRemaining": -12 },
            "scores": { "teamA": 3.9, "teamB": false }
        });
        let view = normalize(&raw);
        assert_eq!(view.question.id, None);
        assert_eq!(view.question.title, "");
        assert_eq!(view.question.body, "still here");
        assert_eq!(view.question.answer, "");
        assert!(!view.question.answer_revealed);
        assert_eq!(view.timers, TimersView::default());
        assert_eq!(view.scores, ScoresView { team_a: 3, team_b: 0 });
    }

    #[test]
    fn negative_scores_are_kept_and_fractional_timers_truncated() {
        let raw = json!({
            "timers": { "questionRemaining": 12.7, "quizRemaining": 1e300 },
            "scores": { "teamA": -2, "teamB": 1e300 }
        });
        let view = normalize(&raw);
        assert_eq!(view.timers.question_remaining, 12);
        assert_eq!(view.timers.quiz_remaining, u64::MAX);
        assert_eq!(view.scores.team_a, -2);
        assert_eq!(view.scores.team_b, i64::MAX);
    }

    #[test]
    fn string_ids_are_preserved() {
        let view = normalize(&json!({ "question": { "id": "q-17" } }));
        assert_eq!(view.question.id.as_ref().map(ToString::to_string).as_deref(), Some("q-17"));
    }

    #[test]
    fn normalizing_is_idempotent() {
        for raw in [
            sample(),
            json!({}),
            json!({ "question": { "id": "x", "answerRevealed": true }, "scores": { "teamA": -1 } }),
        ] {
            let once = normalize(&raw);
            let twice = normalize(&serde_json::to_value(&once).unwrap());
            assert_eq!(once, twice);
        }
    }
}
