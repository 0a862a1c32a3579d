mod document;
mod source;
mod track;

pub use document::{DocumentName, SearchFilter};
pub use source::AudioSource;
pub use track::{DownloadedTrack, Track};
