// Gateway module for storage - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod file;
mod launch;
mod memory;
mod traits;

// Public re-exports - the ONLY way to access storage functionality
pub use file::FileStorage;
pub use launch::record_launch;
pub use memory::MemoryStorage;
pub use traits::Storage;

#[cfg(test)]
pub use traits::MockStorage;
