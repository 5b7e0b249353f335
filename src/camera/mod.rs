#[cfg(all(feature = "camera", target_os = "linux"))]
mod gst;
mod mock;
mod source;


#[cfg(all(feature = "camera", target_os = "linux"))]
pub use gst::GstImageSource;
pub use mock::MockImageSource;
pub use source::{ImageBytes, ImageSource};
