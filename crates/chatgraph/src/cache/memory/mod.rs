mod cache;

pub use cache::MemoryCache;
