pub mod activity;
pub mod variables;

pub use activity::{Activity, SunTimes, TimeEvent, TimeUnit};
pub use variables::Variables;
