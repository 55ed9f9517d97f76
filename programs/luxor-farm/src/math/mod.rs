pub mod coins;
pub use coins::*;

uint::construct_uint! {
    /// 256-bit intermediate for ratio × amount products.
    pub struct U256(4);
}
