//! pacer-core
//!
//! Core building blocks for a paced, pausable task worker.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, state, events, task, errors）
//! - **ports**: 抽象化レイヤー（Fetch, KeyValueStore, SettingsLoader, Clock, IdGenerator）
//! - **queue**: HandoffQueue（producer と consumer の到着順に依らない FIFO）
//! - **lifecycle**: LifecycleMachine（4 状態 + continuation slot）
//! - **gate**: RateGate と ThrottledFetch（外向き呼び出しの間隔制御）
//! - **typed**: 型付き Task API（Task trait, NamedTask, TaskRegistry）
//! - **impls**: 実装（InMemoryStore, JsonFileSettings など開発用）
//! - **app**: アプリケーションロジック（builder, service, worker_loop, supervisor）
//! - **control**: JSON 制御コマンド（Command / Reply）

pub mod app;
pub mod control;
pub mod domain;
pub mod gate;
pub mod impls;
pub mod lifecycle;
pub mod ports;
pub mod queue;
pub mod typed;
