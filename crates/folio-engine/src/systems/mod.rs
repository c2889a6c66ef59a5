pub mod entrance;
pub mod instances;
pub mod marquee;

pub use entrance::{entrance_timeline, prime_entrance, ENTRANCE_COMPLETE_EVENT};
pub use instances::build_instance_buffer;
pub use marquee::start_marquee;
