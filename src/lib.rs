//! # storefront-studio
//!
//! State and AI plumbing for an AI-assisted fashion storefront.
//!
//! ## Features
//!
//! - **Cinematic studio**: turns a product still into a short video by
//!   submitting a long-running Veo job, polling it at a fixed interval with
//!   cosmetic progress messages, and resolving the generated artifact
//! - **Session cancellation**: closing the studio or starting over cancels
//!   the in-flight loop via a `CancellationToken`, so a stale session can
//!   never overwrite the current one
//! - **Injected credentials**: API-key selection is a [`CredentialProvider`]
//!   capability, not global state
//! - **Styling assistant**: Gemini chat with fixed fallback replies
//! - **Cart and catalog**: line-merging cart with a quantity floor, and a
//!   category filter over the static catalog
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use storefront_studio::*;
//!
//! # async fn example() -> storefront_studio::Result<()> {
//! let config = StudioConfig::from_env();
//! let credentials = Arc::new(StaticCredential::new(config.api_key.clone()));
//! let provider = Arc::new(VeoClient::new(config.clone()));
//! let studio = StudioController::new(provider, credentials, &config);
//!
//! let image = SourceImage::from_path(std::path::Path::new("coat.png"))?;
//! let request = GenerationRequest::new(image).aspect_ratio(AspectRatio::Portrait);
//!
//! let state = studio.generate(request).await;
//! match state.phase {
//!     StudioPhase::Completed => println!("Video: {:?}", state.artifact),
//!     _ => eprintln!("{}", state.status_message),
//! }
//! # Ok(())
//! # }
//! ```

pub mod cart;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod poller;
pub mod provider;
pub mod resolver;
pub mod studio;
pub mod stylist;
pub mod submitter;
pub mod types;

pub use cart::{CartItem, CartStore};
pub use catalog::{Category, CategoryFilter, Product, PRODUCTS};
pub use client::VeoClient;
pub use config::{StudioConfig, StudioConfigBuilder};
pub use error::{Result, StudioError};
pub use poller::{progress_message, JobPoller, PROGRESS_PHRASES};
pub use provider::{CredentialProvider, GenerationProvider, StaticCredential};
pub use resolver::resolve;
pub use studio::{FailureKind, StudioController, StudioPhase, StudioSession, StudioState};
pub use stylist::{Role, StylingMessage, StylistClient, StylistSession};
pub use submitter::JobSubmitter;
pub use types::{
    ArtifactRef, AspectRatio, GeneratedArtifact, GenerationRequest, JobSnapshot, JobStatus,
    OutputConfig, SourceImage, DEFAULT_MOTION_PROMPT,
};
pub use tokio_util::sync::CancellationToken;
