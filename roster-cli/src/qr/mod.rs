//! QR badge images
//!
//! Each [`BadgeVariant`] fixes its encoding parameters, its optional label
//! layout and its filename scheme. [`generate_badges`] renders a roster and
//! packages the output directory in serial order.

mod encode;
mod generate;
mod label;
mod variant;

pub use generate::generate_badges;
pub use label::LabelFonts;
pub use variant::BadgeVariant;
