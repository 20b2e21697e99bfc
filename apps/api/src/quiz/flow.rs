//! Question flow: state machine walking the question catalog and collecting answers.
//!
//! Single-select questions advance on selection. Multi-select questions toggle
//! options in a working selection (capped at `max_selections`) and advance
//! explicitly once at least one option is selected. Every toggle is written to the
//! answer set immediately, and re-entering a multi-select question in either
//! direction restores its recorded selection.

use serde::Serialize;
use thiserror::Error;

use crate::models::answers::{AnswerSet, AnswerValue};
use crate::quiz::questions::Question;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("the question catalog is empty")]
    EmptyCatalog,

    #[error("'{option}' is not an option for question '{question}'")]
    UnknownOption { question: String, option: String },

    #[error("question '{0}' advances on selection")]
    NotMultiSelect(String),

    #[error("select at least one option for '{0}' before continuing")]
    EmptySelection(String),

    #[error("the quiz is already complete")]
    AlreadyComplete,

    #[error("question '{question}' accepts at most {max} selections, got {got}")]
    TooManySelections {
        question: String,
        max: usize,
        got: usize,
    },

    #[error("question '{0}' takes a single answer")]
    ExpectedSingle(String),
}

/// Result of one flow operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FlowEvent {
    /// A multi-select option was toggled (or the cap made it a no-op).
    Selection { selected: Vec<String> },
    /// The current question changed.
    Moved { index: usize },
    /// The last question was answered.
    Completed { answers: AnswerSet },
}

/// Read model of the flow for the quiz UI.
#[derive(Debug, Clone, Serialize)]
pub struct FlowSnapshot {
    pub current_index: usize,
    pub total: usize,
    pub question: Question,
    pub selected: Vec<String>,
    pub can_advance: bool,
    pub answers: AnswerSet,
    pub completed: bool,
}

#[derive(Debug, Clone)]
pub struct QuizFlow {
    questions: &'static [Question],
    current_index: usize,
    answers: AnswerSet,
    pending: Vec<String>,
    completed: bool,
}

impl QuizFlow {
    pub fn new(questions: &'static [Question]) -> Result<Self, FlowError> {
        if questions.is_empty() {
            return Err(FlowError::EmptyCatalog);
        }
        Ok(Self {
            questions,
            current_index: 0,
            answers: AnswerSet::new(),
            pending: Vec::new(),
            completed: false,
        })
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current_index]
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn selected(&self) -> &[String] {
        &self.pending
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn snapshot(&self) -> FlowSnapshot {
        let question = self.current_question();
        FlowSnapshot {
            current_index: self.current_index,
            total: self.questions.len(),
            question: question.clone(),
            selected: self.pending.clone(),
            can_advance: question.multi_select && !self.pending.is_empty(),
            answers: self.answers.clone(),
            completed: self.completed,
        }
    }

    pub fn select_option(&mut self, option: &str) -> Result<FlowEvent, FlowError> {
        if self.completed {
            return Err(FlowError::AlreadyComplete);
        }
        let question = self.current_question();
        if !question.has_option(option) {
            return Err(FlowError::UnknownOption {
                question: question.id.to_string(),
                option: option.to_string(),
            });
        }
        let (id, multi_select, max_selections) =
            (question.id, question.multi_select, question.max_selections);

        if !multi_select {
            self.answers
                .insert(id.to_string(), AnswerValue::Single(option.to_string()));
            return Ok(self.forward());
        }

        if let Some(pos) = self.pending.iter().position(|selected| selected == option) {
            self.pending.remove(pos);
        } else if self.pending.len() < max_selections {
            self.pending.push(option.to_string());
        }
        self.answers
            .insert(id.to_string(), AnswerValue::Multi(self.pending.clone()));

        Ok(FlowEvent::Selection {
            selected: self.pending.clone(),
        })
    }

    /// Moves past a multi-select question once something is selected.
    pub fn advance(&mut self) -> Result<FlowEvent, FlowError> {
        if self.completed {
            return Err(FlowError::AlreadyComplete);
        }
        let question = self.current_question();
        if !question.multi_select {
            return Err(FlowError::NotMultiSelect(question.id.to_string()));
        }
        if self.pending.is_empty() {
            return Err(FlowError::EmptySelection(question.id.to_string()));
        }
        Ok(self.forward())
    }

    /// Steps back one question. A no-op on the first question. Recorded answers are kept.
    pub fn go_back(&mut self) -> Result<FlowEvent, FlowError> {
        if self.completed {
            return Err(FlowError::AlreadyComplete);
        }
        if self.current_index > 0 {
            self.enter(self.current_index - 1);
        }
        Ok(FlowEvent::Moved {
            index: self.current_index,
        })
    }

    fn forward(&mut self) -> FlowEvent {
        if self.current_index + 1 < self.questions.len() {
            self.enter(self.current_index + 1);
            FlowEvent::Moved {
                index: self.current_index,
            }
        } else {
            self.completed = true;
            self.pending.clear();
            FlowEvent::Completed {
                answers: self.answers.clone(),
            }
        }
    }

    fn enter(&mut self, index: usize) {
        self.current_index = index;
        let question = &self.questions[index];
        self.pending = match self.answers.get(question.id) {
            Some(AnswerValue::Multi(selected)) if question.multi_select => selected.clone(),
            _ => Vec::new(),
        };
    }
}

/// Checks an answer set produced outside the flow against the catalog's selection rules.
/// Answers for ids not in the catalog are passed through unchecked.
pub fn validate_answer_set(
    questions: &[Question],
    answers: &AnswerSet,
) -> Result<(), FlowError> {
    for (id, value) in answers {
        let Some(question) = questions.iter().find(|q| q.id == id) else {
            continue;
        };
        match value {
            AnswerValue::Multi(_) if !question.multi_select => {
                return Err(FlowError::ExpectedSingle(id.clone()));
            }
            AnswerValue::Multi(selected) if selected.len() > question.max_selections => {
                return Err(FlowError::TooManySelections {
                    question: id.clone(),
                    max: question.max_selections,
                    got: selected.len(),
                });
            }
            _ => {}
        }
    }
    Ok(())
}
