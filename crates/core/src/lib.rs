#![forbid(unsafe_code)]

pub mod content;
pub mod model;

pub use model::{
    ActivityState, AppState, Message, MessageRole, ProgressAction, QuizQuestion, Region,
    RegionProgress, Transition,
};
