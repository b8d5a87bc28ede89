pub mod display;
pub mod item;
pub mod owner;
pub mod similarity;

pub use display::{ImagePrecedence, ImageSource};
pub use item::{Item, ItemMeta};
pub use owner::{Location, Owner, PriceKind};
pub use similarity::VectorRejection;
