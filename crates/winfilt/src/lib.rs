#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use winfilt_array as array;

#[doc(inline)]
pub use winfilt_filter as filter;
