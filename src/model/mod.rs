//! Values that flow through one publish request.
//!
//! A request enters as a [`GenerationRequest`], becomes a [`DraftPost`],
//! then a [`ValidatedPost`], and leaves as a [`PublishResult`]. None of these
//! are persisted or shared between requests.

mod post;
mod profile;
mod request;
mod result;

pub use post::{DraftPost, ValidatedPost};
pub use profile::Profile;
pub use request::{GenerationRequest, PostOptions};
pub use result::{FailureStage, PublishResult, PublishStatus};
