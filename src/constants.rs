//! Shared constants for the generation pipeline.
//!

/// Street View Static API endpoint.
pub const STREET_VIEW_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/streetview";

/// Maps Static API endpoint.
pub const STATIC_MAP_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/staticmap";

/// Base endpoint for the Gemini model collection.
pub const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Image-capable Gemini model used for generation.
pub const GEMINI_MODEL: &str = "gemini-2.5-flash-image-preview";

/// Media type assumed when an inline response part does not declare one.
pub const DEFAULT_IMAGE_MIME: &str = "image/png";

/// Time period value that suppresses the era clause in prompts.
pub const PRESENT_DAY: &str = "Present Day";

/// Pixel size requested from both static-imagery services.
pub const REFERENCE_IMAGE_SIZE: &str = "640x400";

/// Zoom level for the roadmap fallback image.
pub const STATIC_MAP_ZOOM: &str = "18";

/// Field of view, in degrees, for street-level panoramas.
pub const STREET_VIEW_FOV: &str = "90";
