//! Ports - 抽象化レイヤー
//!
//! コアが外部の協調者（ネットワーク、ストア、設定、時計、ID 生成）に
//! 触れるときは必ずここの trait を通します。実装は `impls` か呼び出し側にあります。

pub mod clock;
pub mod fetch;
pub mod id_generator;
pub mod settings;
pub mod store;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::fetch::{Fetch, FetchError, FetchRequest, FetchResponse, RequestInit};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::settings::{Settings, SettingsError, SettingsLoader};
pub use self::store::{KeyValueStore, StoreError};
