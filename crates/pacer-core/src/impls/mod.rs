//! Impls - ports の実装（開発用・テスト用）
//!
//! # 含まれる実装
//! - **InMemoryStore**: KeyValueStore
//! - **JsonFileSettings** / **StaticSettings**: SettingsLoader

pub mod memory_store;
pub mod settings_file;

pub use self::memory_store::InMemoryStore;
pub use self::settings_file::{JsonFileSettings, StaticSettings};
