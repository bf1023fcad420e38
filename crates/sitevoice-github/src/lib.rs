pub mod client;
pub mod error;
pub mod host;
pub mod memory;

pub use client::{GitHubClient, GitHubConfig};
pub use error::HostError;
pub use host::{CommitInfo, NewPullRequest, SourceHost, TreeEntry};
pub use memory::{HostCall, HostOp, MemoryHost};
