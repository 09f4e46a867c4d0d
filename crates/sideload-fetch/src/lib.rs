//! Streaming HTTP transfer for the sideload pipeline.
//!
//! This crate implements [`sideload_core::ArchiveFetcherPort`] on top of
//! `reqwest`. Bodies are streamed chunk by chunk into the caller's sink,
//! and whole-archive downloads are staged in a temporary file so a failed
//! or cancelled transfer never leaves a partial archive behind.
//!
//! The HTTP client itself sits behind the [`HttpBackend`] trait, which
//! keeps the streaming and placement logic testable offline.

#![deny(unused_crate_dependencies)]

mod fetcher;
mod http;

pub use fetcher::HttpFetcher;
pub use http::{ByteChunkStream, HttpBackend, HttpDownload, ReqwestBackend};

// Silence unused dev-dependency warnings until we add mock-based tests
#[cfg(test)]
use mockall as _;
#[cfg(test)]
use tokio_test as _;
