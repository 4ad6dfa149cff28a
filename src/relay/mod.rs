//! リレー連携
//!
//! - client: CLIからリレーを呼び出す（APIキーを持たない）
//! - server: APIキーを保持し、上流プロバイダへ転送する
//! - gemini: 上流 generateContent のリクエスト/レスポンス型

mod client;
mod gemini;
mod server;

pub use client::RelayClient;
pub use gemini::generate_content;
pub use server::{router, serve, RelayState};
