//! Property values and the ordered property map carried by components

mod value;


pub use value::*;
