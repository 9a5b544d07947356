//! App - アプリケーション層
//!
//! ports と engine 部品（queue / lifecycle / gate）を組み合わせて、
//! タスクを一つずつ実行するサービスを組み立てます。
//!
//! # 主要コンポーネント
//! - **ServiceBuilder**: Service の構築とワイヤリング
//! - **Service**: 制御面（start / stop / assign / status / ping）
//! - **WorkerLoop**: タスク実行ループ（dequeue→execute→idle）
//! - **WorkerHandle**: WorkerLoop の supervisor（失敗時の再起動）
//! - **PacerConfig / RestartPolicy**: 設定

pub mod builder;
pub mod config;
pub mod restart;
pub mod service;
pub mod supervisor;
pub mod worker_loop;

pub use self::builder::{BuildError, ServiceBuilder};
pub use self::config::PacerConfig;
pub use self::restart::RestartPolicy;
pub use self::service::{Pong, Service};
pub use self::supervisor::WorkerHandle;
pub use self::worker_loop::WorkerLoop;
