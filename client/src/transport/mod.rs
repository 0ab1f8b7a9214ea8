//! Transport implementations for a peer. The traits live in
//! `scenelink-shared`; hosts with an external broker bring their own
//! sockets, while the feature-gated channel hub covers tests and
//! single-process sessions.

cfg_if! {
    if #[cfg(feature = "transport_channel")] {
        pub mod channel;
    }
}

pub use scenelink_shared::{
    PublishSocket, RecvError, SendError, SubscribeSocket, TransportError,
};
