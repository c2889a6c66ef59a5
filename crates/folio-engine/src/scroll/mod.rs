pub mod reveal;
pub mod sync;
pub mod virtualizer;

pub use reveal::{RevealConfig, RevealTriggers};
pub use sync::{handle_anchor_click, AnchorOutcome, ScrollSync};
pub use virtualizer::{momentum_ease, MomentumScroll, ScrollRequest, ScrollVirtualizer};
