//! Expression cues the model can invoke and the emotions they stand for.
//!
//! The purpose text doubles as the tool description the model reads when
//! deciding which cue to call, so wording changes shift model behavior.

use mprovider::ToolDefinition;

use crate::emotion::{Emotion, EmotionResult};

/// Schema for cues that take no arguments.
const EMPTY_SCHEMA: &str = r#"{"type":"object","properties":{}}"#;

/// A facial cue the avatar can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expression {
    Smile,
    Laugh,
    Angry,
    Blink,
    Wow,
    Agree,
    Disagree,
    Yap,
    Shy,
    Sad,
    Love,
}

impl Expression {
    pub const ALL: [Expression; 11] = [
        Expression::Smile,
        Expression::Laugh,
        Expression::Angry,
        Expression::Blink,
        Expression::Wow,
        Expression::Agree,
        Expression::Disagree,
        Expression::Yap,
        Expression::Shy,
        Expression::Sad,
        Expression::Love,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Expression::Smile => "smile",
            Expression::Laugh => "laugh",
            Expression::Angry => "angry",
            Expression::Blink => "blink",
            Expression::Wow => "wow",
            Expression::Agree => "agree",
            Expression::Disagree => "disagree",
            Expression::Yap => "yap",
            Expression::Shy => "shy",
            Expression::Sad => "sad",
            Expression::Love => "love",
        }
    }

    /// Parses a cue name case-insensitively. Unknown names return `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|expression| expression.as_str().eq_ignore_ascii_case(name))
    }

    /// Guidance the model reads when choosing a cue.
    pub fn purpose(self) -> &'static str {
        match self {
            Expression::Smile => {
                "Display a gentle, warm smile. Use for happiness, contentment, \
                 friendliness, compliments, encouragement, or polite greetings. \
                 Do not use for intense laughter or overwhelming joy."
            }
            Expression::Laugh => {
                "Display intense joy or laughter. Use for hilarity, excitement, \
                 celebration, jokes, or overwhelming positive emotion. Do not use \
                 for gentle happiness or sarcasm."
            }
            Expression::Angry => {
                "Display anger, frustration, or irritation. Use for strong \
                 displeasure, indignation, or outrage. Do not use for mild \
                 disagreement or sadness."
            }
            Expression::Blink => {
                "Perform a simple blink for natural movement. Use during neutral \
                 conversation flow, pauses, or subtle acknowledgment. Do not use \
                 for strong emotions."
            }
            Expression::Wow => {
                "Display amazement or astonishment. Use for surprising or \
                 impressive news, discoveries, wonder, or admiration. Do not use \
                 for negative shocks."
            }
            Expression::Agree => {
                "Show agreement or approval. Use for confirmation, consent, \
                 saying yes, or supporting an idea. Do not use for uncertainty \
                 or disagreement."
            }
            Expression::Disagree => {
                "Show disagreement or disapproval. Use for rejection, saying no, \
                 or opposition to a statement or plan. Do not use for strong anger."
            }
            Expression::Yap => {
                "Show active, animated talking. Use for chatty, enthusiastic \
                 conversation, animated explanation, or storytelling. Do not use \
                 for brief answers."
            }
            Expression::Shy => {
                "Display shyness or bashfulness. Use for embarrassment, timidity, \
                 modesty, or humble admissions of uncertainty. Do not use for \
                 sadness."
            }
            Expression::Sad => {
                "Display sadness, melancholy, or disappointment. Use for sorrow, \
                 bad news, empathy, or sympathy for difficult circumstances. Do \
                 not use for anger."
            }
            Expression::Love => {
                "Display affection or deep positive emotion. Use for love, \
                 adoration, devotion, or heartfelt care. Do not use for simple \
                 happiness or plain friendship."
            }
        }
    }

    pub fn definition(self) -> ToolDefinition {
        ToolDefinition::new(self.as_str(), self.purpose(), EMPTY_SCHEMA)
    }

    /// The emotion reading a cue maps to on the rig.
    pub fn emotion(self) -> EmotionResult {
        match self {
            Expression::Smile => EmotionResult::new(Emotion::Happy, 0.6),
            Expression::Laugh => EmotionResult::new(Emotion::Happy, 1.0),
            Expression::Angry => EmotionResult::new(Emotion::Angry, 0.8),
            Expression::Blink => EmotionResult::new(Emotion::Neutral, 0.1),
            Expression::Wow => EmotionResult::new(Emotion::Surprised, 0.8),
            Expression::Agree => EmotionResult::new(Emotion::Neutral, 0.4),
            Expression::Disagree => EmotionResult::new(Emotion::Angry, 0.3),
            Expression::Yap => EmotionResult::new(Emotion::Neutral, 0.5),
            Expression::Shy => EmotionResult::new(Emotion::Neutral, 0.3),
            Expression::Sad => EmotionResult::new(Emotion::Sad, 0.7),
            Expression::Love => EmotionResult::new(Emotion::Happy, 0.9),
        }
    }
}

/// Tool definitions for every cue, in catalog order.
pub fn expression_catalog() -> Vec<ToolDefinition> {
    Expression::ALL
        .iter()
        .map(|expression| expression.definition())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{Expression, expression_catalog};

    #[test]
    fn catalog_lists_every_cue_once() {
        let catalog = expression_catalog();
        assert_eq!(catalog.len(), Expression::ALL.len());

        let names: HashSet<&str> = catalog.iter().map(|tool| tool.name.as_str()).collect();
        assert_eq!(names.len(), catalog.len());
    }

    #[test]
    fn definitions_carry_valid_json_schemas() {
        for tool in expression_catalog() {
            let schema: serde_json::Value = serde_json::from_str(&tool.input_schema)
                .unwrap_or_else(|err| panic!("schema for {} should parse: {err}", tool.name));
            assert_eq!(schema["type"], "object");
            assert!(!tool.description.is_empty());
        }
    }

    #[test]
    fn cue_names_round_trip_through_from_name() {
        for expression in Expression::ALL {
            assert_eq!(Expression::from_name(expression.as_str()), Some(expression));
        }
        assert_eq!(Expression::from_name("WOW"), Some(Expression::Wow));
        assert_eq!(Expression::from_name("frown"), None);
    }

    #[test]
    fn cue_emotions_stay_inside_the_unit_interval() {
        for expression in Expression::ALL {
            let reading = expression.emotion();
            assert!(
                (0.0..=1.0).contains(&reading.intensity),
                "{} maps to intensity {}",
                expression.as_str(),
                reading.intensity
            );
        }
    }
}
