pub mod pointer;
pub mod reorder;
pub mod shuffle;
pub mod tokenize;
pub mod verify;

pub use pointer::{DragStyle, MoveRequest, Point, PointerTracker, Rect};
pub use tokenize::Granularity;
