//! Rendering utilities for human-facing reports (Markdown).

#![forbid(unsafe_code)]

mod markdown;
mod model;

pub use markdown::{render_batch_markdown, render_proof_markdown};
pub use model::{
    RenderableBatch, RenderableCase, RenderableDecision, RenderableOutcome, RenderableProof,
    RenderableProofReport,
};
