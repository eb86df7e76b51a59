pub mod console;
pub mod flux;
pub mod index;
pub mod pins;

pub use console::Console;
pub use flux::{FluxEngine, FluxMode, FLUX_BUF};
pub use pins::BoardPins;
