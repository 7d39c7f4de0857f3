// src/interview/feedback.rs

use serde::{Deserialize, Serialize};

use crate::interview::client::RemoteScores;

// Comfortable speaking pace, in characters per minute.
const OPTIMAL_MIN: i32 = 251;
const OPTIMAL_MAX: i32 = 350;

/// Evaluated outcome of one mock-interview session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewFeedback {
    pub expression_score: i32,
    pub eyes_score: i32,
    pub posture_score: i32,
    pub speech_speed_score: i32,
    pub total_score: i32,
    pub comments: Vec<AxisComment>,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisComment {
    pub axis: String,
    pub comment: String,
}

/// Banded score for speaking pace: 100 inside the optimal window,
/// stepping down the further the pace drifts from it.
pub fn speech_speed_score(chars_per_minute: i32) -> i32 {
    let cpm = chars_per_minute;
    if (OPTIMAL_MIN..=OPTIMAL_MAX).contains(&cpm) {
        100
    } else if (OPTIMAL_MIN - 50..=OPTIMAL_MAX + 50).contains(&cpm) {
        80
    } else if (OPTIMAL_MIN - 75..=OPTIMAL_MAX + 75).contains(&cpm) {
        60
    } else if (OPTIMAL_MIN - 100..=OPTIMAL_MAX + 100).contains(&cpm) {
        40
    } else {
        20
    }
}

fn expression_comment(score: i32) -> &'static str {
    match score {
        90.. => "Your facial expression is excellent. Keep that natural look.",
        80.. => "Your expression is good. Try taking a breath before you start speaking.",
        70.. => "Your expression is average. It is fine to focus on delivering your content.",
        60.. => "Your expression stiffened at times. Slightly raising the corners of your mouth changes the impression.",
        _ => "Nervousness made your expression stiff at times.",
    }
}

fn eyes_comment(score: i32) -> &'static str {
    match score {
        90.. => "Your eye contact is excellent, switching naturally between listening and speaking.",
        80.. => "Your eye contact is good: steady without feeling intense.",
        70.. => "Your eye contact is average. When speaking, try looking near the camera instead of the screen.",
        60.. => "Your gaze was unsteady at times. Adjusting your distance and posture helps stabilize it.",
        _ => "Your gaze was unsteady at times.",
    }
}

fn posture_comment(score: i32) -> &'static str {
    match score {
        90.. => "Your posture is excellent: stable and composed.",
        80.. => "Your posture is good and holds up well over time.",
        70.. => "Your posture is average. Try straightening your back instead of leaning on the chair.",
        60.. => "Your posture collapsed at times. Raising the screen height helps you sit naturally.",
        _ => "Your posture collapsed at times.",
    }
}

fn speech_speed_comment(chars_per_minute: i32) -> &'static str {
    match chars_per_minute {
        251..=350 => "Your pacing is good and easy to follow.",
        351.. => "You speak a little fast. Breaking points into short segments steadies the pace.",
        201..=250 => "Your pace is fine, but shorter sentences would give it better rhythm.",
        _ => "You speak too slowly. Try picking up the tempo a little.",
    }
}

/// Builds the full feedback from the raw scores the analysis service
/// reported at session stop.
pub fn evaluate(scores: &RemoteScores) -> InterviewFeedback {
    let speed = speech_speed_score(scores.chars_per_minute);
    let axes = [
        ("expression", scores.expression_score),
        ("eyes", scores.eyes_score),
        ("posture", scores.posture_score),
        ("speech_speed", speed),
    ];

    let total_score = axes.iter().map(|(_, s)| s).sum::<i32>() / axes.len() as i32;

    let comments = vec![
        AxisComment {
            axis: "expression".to_string(),
            comment: expression_comment(scores.expression_score).to_string(),
        },
        AxisComment {
            axis: "eyes".to_string(),
            comment: eyes_comment(scores.eyes_score).to_string(),
        },
        AxisComment {
            axis: "posture".to_string(),
            comment: posture_comment(scores.posture_score).to_string(),
        },
        AxisComment {
            axis: "speech_speed".to_string(),
            comment: speech_speed_comment(scores.chars_per_minute).to_string(),
        },
    ];

    let strengths = axes
        .iter()
        .filter(|(_, s)| *s >= 80)
        .map(|(axis, _)| format!("Your {} is strong.", axis.replace('_', " ")))
        .collect();

    let improvements = axes
        .iter()
        .filter(|(_, s)| *s < 70)
        .map(|(axis, _)| format!("Your {} needs work.", axis.replace('_', " ")))
        .collect();

    InterviewFeedback {
        expression_score: scores.expression_score,
        eyes_score: scores.eyes_score,
        posture_score: scores.posture_score,
        speech_speed_score: speed,
        total_score,
        comments,
        strengths,
        improvements,
    }
}
