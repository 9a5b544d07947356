//! Control - 外部コントローラ向けの JSON コマンド
//!
//! トランスポート（RPC のフレーミングや相関 ID）はここでは扱わない。
//! 1 コマンド = 1 返信の純粋な対応だけを定義する。

pub mod handler;
pub mod protocol;

pub use self::protocol::{Command, Reply};
