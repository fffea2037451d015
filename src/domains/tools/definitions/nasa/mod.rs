//! Tools backed by NASA's public APIs (api.nasa.gov and sibling services).

pub mod apod;
pub mod cmr;
pub mod donki;
pub mod eonet;
pub mod epic;
pub mod exoplanet;
pub mod firms;
pub mod gibs;
pub mod images;
pub mod mars_rover;
pub mod neo;
pub mod power;

pub use apod::ApodTool;
pub use cmr::CmrTool;
pub use donki::DonkiTool;
pub use eonet::EonetTool;
pub use epic::EpicTool;
pub use exoplanet::ExoplanetTool;
pub use firms::FirmsTool;
pub use gibs::GibsTool;
pub use images::ImagesTool;
pub use mars_rover::MarsRoverTool;
pub use neo::NeoTool;
pub use power::PowerTool;
