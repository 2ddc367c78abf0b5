pub mod log_utils;
pub mod utils;

pub use log_utils::log_to_file;
pub use utils::measure_time;
