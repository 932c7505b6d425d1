//! Stateless text rendering of a [`DisplayState`].

use std::fmt::Write;

use crate::state::DisplayState;

const RULE: &str = "----------------------------------------------------------------";

/// Format a second count as `MM:SS`; minutes keep growing past 99.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Live status line mirroring the loading and error flags.
pub fn status_line(state: &DisplayState) -> String {
    let mut line = String::from(if state.loading { "Loading" } else { "Loaded" });
    if let Some(error) = &state.error {
        let _ = write!(line, " | Error: {error}");
    }
    line
}

/// Legend of the teacher controls, greyed out while the first load is pending.
pub fn controls_line(state: &DisplayState) -> &'static str {
    if state.controls_enabled() {
        "[p] Previous  [n] Next  [r] Reveal  [a] Team A  [b] Team B  [u] Undo  [q] Quit"
    } else {
        "(controls disabled while loading)"
    }
}

/// Render one full frame.
pub fn render_frame(state: &DisplayState) -> String {
    let view = &state.view;
    let mut frame = String::new();

    let _ = writeln!(
        frame,
        "Question {}    Full Quiz {}",
        format_clock(view.timers.question_remaining),
        format_clock(view.timers.quiz_remaining)
    );
    let _ = writeln!(frame, "{RULE}");

    let title = if view.question.title.is_empty() {
        "Waiting for question..."
    } else {
        view.question.title.as_str()
    };
    let _ = writeln!(frame, "{title}");
    if !view.question.body.is_empty() {
        let _ = writeln!(frame, "{}", view.question.body);
    }
    if let Some(answer) = view.question.visible_answer().filter(|answer| !answer.is_empty()) {
        let _ = writeln!(frame, "Answer: {answer}");
    }

    let _ = writeln!(frame, "{RULE}");
    let _ = writeln!(
        frame,
        "Team A  {:>4}    |    Team B  {:>4}",
        view.scores.team_a, view.scores.team_b
    );
    let _ = writeln!(frame, "{}", controls_line(state));

    if state.celebrating {
        let _ = writeln!(frame, "*** \u{1F389} ***");
    }
    if let Some(error) = &state.error {
        let _ = writeln!(frame, "!! {error}");
    }
    let _ = writeln!(frame, "{}", status_line(state));
    frame
}
