//! Release index implementations

pub mod chrome_for_testing;
pub mod legacy;

pub use chrome_for_testing::ChromeForTestingIndex;
pub use legacy::LegacyDriverIndex;
