//! Dispatch orchestrator for rate queries.
//!
//! This crate provides the [`Dispatcher`], which turns a free-text question
//! about exchange rates into exactly one tool call and a friendly answer.
//!
//! # Architecture
//!
//! ```text
//! query
//!   ↓
//! ┌──────────────────────────────────────────────────────────┐
//! │                      DISPATCHER                          │
//! │                                                          │
//! │  1. Discover tools (ToolTransport::list_tools)           │
//! │         ↓                                                │
//! │  2. Build selection prompt, ask the selector brain       │
//! │         ↓                                                │
//! │  3. Recover {"tool", "arguments"} from the reply         │
//! │         ↓                                                │
//! │  4. Check the tool exists, call it                       │
//! │         ↓                                                │
//! │  5. Ask the narrator brain to explain the output         │
//! │     (failure → "[<name> API Error] ..." inline)          │
//! │         ↓                                                │
//! │  6. Assemble DispatchResult                              │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use orchestrator::Dispatcher;
//!
//! let dispatcher = Dispatcher::new(transport, selector, narrator);
//! let result = dispatcher.dispatch("1 euro kaç dolar?").await?;
//! println!("{}", result.commentary);
//! ```

mod dispatcher;
mod error;
mod prompt;
mod recover;
mod types;

pub use dispatcher::Dispatcher;
pub use error::DispatchError;
pub use prompt::{
    narration_prompt, selection_prompt, NARRATION_INSTRUCTIONS, SELECTION_INSTRUCTIONS,
};
pub use recover::{parse_tool_call, strip_code_fence};
pub use types::{DispatchResponse, DispatchResult, ToolCall};
