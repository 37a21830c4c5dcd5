//! Upload viewer: image selection, transcription request orchestration and
//! the word-by-word reveal of the returned text.

pub mod image;
pub mod state;
pub mod ui;

pub use image::SelectedImage;
pub use state::{UploadViewer, ViewState};
pub use ui::{ViewerCommand, ViewerTui};
