//! Session mutations applied at each sequence step
//!
//! A frame is a pure transform from one session value to the next; the store
//! swaps the result in wholesale.

use crate::scene::{revealed_connections, Scene};
use crate::session::{title_for_question, AnswerCore, ChatSession, SessionStatus};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Accept a question: clear the previous scene and enter loading
    Begin { question: String },
    /// Scene is ready: enter generating with the answer steps attached
    Install { scene: Arc<Scene> },
    /// Expose nodes `0..=index` and their outgoing connections
    Reveal { scene: Arc<Scene>, index: usize },
    /// Narrate the first `step` answer steps and activate their nodes
    Narrate { scene: Arc<Scene>, step: usize },
    /// Sequence finished
    Complete,
    /// Sequence ended in error; the revealed prefix is kept
    Fail { message: String },
}

impl Frame {
    pub fn apply(&self, session: &ChatSession) -> ChatSession {
        match self {
            Frame::Begin { question } => ChatSession {
                title: title_for_question(question),
                question: question.clone(),
                answer: AnswerCore::default(),
                nodes: Vec::new(),
                connections: Vec::new(),
                status: SessionStatus::Loading,
                error: None,
                ..session.clone()
            },

            Frame::Install { scene } => ChatSession {
                answer: AnswerCore {
                    text: String::new(),
                    is_generating: true,
                    current_step: 0,
                    total_steps: scene.node_count(),
                    steps: scene.steps.clone(),
                },
                status: SessionStatus::Generating,
                ..session.clone()
            },

            Frame::Reveal { scene, index } => {
                let end = (index + 1).min(scene.node_count());
                let nodes = scene.nodes[..end].to_vec();
                let connections = revealed_connections(&scene.connections, &nodes);
                ChatSession {
                    answer: AnswerCore {
                        current_step: end,
                        total_steps: scene.node_count(),
                        ..session.answer.clone()
                    },
                    nodes,
                    connections,
                    ..session.clone()
                }
            }

            Frame::Narrate { scene, step } => {
                let total = scene.step_count();
                let step = (*step).min(total);
                let text = narrated_text(scene, step);
                // Connections light up once more than half the steps are narrated
                let connections_active = step * 2 > total;

                ChatSession {
                    answer: AnswerCore {
                        text,
                        is_generating: step < total,
                        current_step: step,
                        ..session.answer.clone()
                    },
                    nodes: session
                        .nodes
                        .iter()
                        .enumerate()
                        .map(|(i, node)| {
                            let mut node = node.clone();
                            node.is_active = i < step * 2;
                            node
                        })
                        .collect(),
                    connections: session
                        .connections
                        .iter()
                        .map(|c| {
                            let mut c = c.clone();
                            c.is_active = connections_active;
                            c
                        })
                        .collect(),
                    ..session.clone()
                }
            }

            Frame::Complete => ChatSession {
                answer: AnswerCore {
                    is_generating: false,
                    ..session.answer.clone()
                },
                status: SessionStatus::Complete,
                ..session.clone()
            },

            Frame::Fail { message } => ChatSession {
                answer: AnswerCore {
                    is_generating: false,
                    ..session.answer.clone()
                },
                status: SessionStatus::Error,
                error: Some(message.clone()),
                ..session.clone()
            },
        }
    }
}

/// Text of the first `step` answer steps joined by single spaces
pub fn narrated_text(scene: &Scene, step: usize) -> String {
    scene
        .steps
        .iter()
        .take(step)
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
