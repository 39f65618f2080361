//! HTTP surface: the streaming endpoint clients connect to.

mod stream;

pub(crate) use stream::{StreamContext, stream_events};
