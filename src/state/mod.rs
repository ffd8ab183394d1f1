pub mod surface;
pub mod viewport;

pub use surface::SurfaceTransform;
pub use viewport::Zoom;
