//! # Bookvoice - Document-to-Audiobook TTS Service
//!
//! Converts extracted document text into spoken-audio WAV files through a
//! text-to-speech backend, exposing progress to clients over a streaming
//! channel.
//!
//! ## Features
//!
//! - **Multi-Backend Dispatch**: Unified API over generic TTS models,
//!   embedding-conditioned models (SpeechT5 family), and cloned-voice
//!   fine-tunes (XTTS family, behind the `xtts` feature)
//! - **Engine Lifecycle**: Lazy weight download from the model hub, bounded
//!   engine cache with single-flight loading and LRU eviction
//! - **Bounded-Memory Synthesis**: Fixed-size text chunking so arbitrarily
//!   long documents synthesize one bounded chunk at a time
//! - **Task Protocol**: Long-running generation jobs decoupled from the
//!   request cycle behind a task id, polled via server-sent events
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use bookvoice::engine::{EngineCache, SidecarLoader};
//! use bookvoice::pipeline::{GenerationConfig, GenerationPipeline};
//! use bookvoice::core::progress::ProgressReporter;
//!
//! let loader = SidecarLoader::new(Default::default());
//! let cache = Arc::new(EngineCache::new(Box::new(loader), 4));
//! let pipeline = GenerationPipeline::new(cache, GenerationConfig::default());
//!
//! let reporter = ProgressReporter::new(|label, pct| println!("{label} ({pct}%)"));
//! let artifact = pipeline.generate("Hello world.", "microsoft/speecht5_tts", None, &reporter)?;
//! println!("wrote {}", artifact.file_name);
//! ```
//!
//! ## Server
//!
//! ```rust,ignore
//! use bookvoice::server::{AppServer, ServerConfig};
//!
//! AppServer::new(ServerConfig::default()).run().await?;
//! ```

pub mod audio;
pub mod core;
pub mod engine;
pub mod hub;
pub mod pipeline;
pub mod server;
pub mod task;
pub mod text;

pub use crate::core::error::{Result, TtsError};
pub use crate::core::progress::ProgressReporter;
pub use crate::engine::{EngineCache, EngineHandle, EngineKind, ModelCatalog, SpeechEngine};
pub use crate::pipeline::{GenerationConfig, GenerationPipeline};
pub use crate::task::{TaskCoordinator, TaskId, TaskRecord, TaskStatus, TaskStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
