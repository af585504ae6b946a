pub mod address;
pub mod constants;
pub mod logger;
pub mod options;
#[cfg(test)]
pub(crate) mod test_util;

pub use self::address::Address;
pub use self::address::ObjectReference;
