//! # Scenelink Client
//! One peer in a collaborative scene-editing session. The client owns the
//! live parameter model, publishes local edits on a broadcast channel, and
//! applies peer edits on a synchronized, time-bucketed tick.

#![deny(trivial_numeric_casts, unused_import_braces)]

#[macro_use]
extern crate cfg_if;

mod bucket_buffer;
mod client;
mod clock;
mod config;
mod ledger;
mod peers;
mod receiver;
mod sender;

pub mod transport;

pub use bucket_buffer::{BucketBuffer, BufferedEvent};
pub use client::SceneClient;
pub use clock::SyncClock;
pub use config::ClientConfig;
pub use ledger::HistoryLedger;
pub use peers::PeerRegistry;
pub use receiver::ReceiverState;
