//! # rpz-fetch
//!
//! Streaming downloader for remote domain-list sources.
//!
//! [`LineFetcher`] wraps a reqwest client and exposes one operation:
//! fetch a URL as a [`LineStream`] of newline-delimited text. The body is
//! never buffered whole; lines are decoded from the byte stream as the
//! consumer asks for them, so a slow consumer holds back the transfer.

mod client;

pub use client::{LineFetcher, LineFetcherBuilder, LineStream};
