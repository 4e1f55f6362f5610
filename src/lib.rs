//! Reading, editing and writing SubRip (`.srt`) subtitle tracks.

pub mod encoding;
pub mod error;
pub mod parser;
pub mod processor;
pub mod serialiser;
pub mod session;
pub mod srt;
pub mod timestamp;
pub mod track;

pub use crate::error::SrtError;
pub use crate::session::Session;
pub use crate::srt::Subtitle;
pub use crate::timestamp::Timestamp;
pub use crate::track::Track;
