pub mod cycle;
pub mod decimal_ext;
pub mod number;

pub use decimal_ext::DecimalExt;
pub use number::format_volume;

/// Serializes tests that switch the global locale
#[cfg(test)]
pub static TEST_LOCALE_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
