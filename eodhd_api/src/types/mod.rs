mod numeric;
pub use self::numeric::{lenient_f64, lenient_i64};

mod quote;
pub use self::quote::RealTimeQuote;

mod eod;
pub use self::eod::EodBar;
