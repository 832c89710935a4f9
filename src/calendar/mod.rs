//! Month grids, their arrangement on a page and the html and text output.

mod grid;
mod html;
mod layout;
mod names;
mod page;
mod text;
mod weekday;

pub use grid::*;
pub use html::*;
pub use layout::*;
pub use names::*;
pub use page::*;
pub use text::*;
pub use weekday::*;
