//! Gate: rate limiting for outbound calls, always behind the lifecycle checkpoint.

mod rate;
mod throttled;

pub use rate::RateGate;
pub use throttled::ThrottledFetch;
