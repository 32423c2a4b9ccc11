mod division;
mod word256;
mod word512;

pub use word256::Word256;
pub use word512::Word512;
