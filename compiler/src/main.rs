//! 形態論辞書コンパイラのメインエントリーポイント
//!
//! コーパスからのスナップショット構築と、構築済みスナップショットの確認を
//! サブコマンドとして提供するCLIツールです。

mod build;
mod inspect;

use clap::Parser;
use thiserror::Error;

use crate::{build::BuildError, inspect::InspectError};

/// コマンドライン引数の構造体
#[derive(Parser, Debug)]
#[clap(name = "compile", version)]
struct Cli {
    /// 実行するサブコマンド
    #[clap(subcommand)]
    command: Command,
}

/// 利用可能なサブコマンド
#[derive(Parser, Debug)]
enum Command {
    /// コーパスから辞書スナップショットを構築します
    ///
    /// レコードの読み込み、エイリアス生成、多語表現の索引を順に実行します。
    Build(build::Args),

    /// 辞書スナップショットの統計を表示します
    Inspect(inspect::Args),
}

/// コンパイラの実行中に発生する可能性のあるエラー
#[derive(Debug, Error)]
pub enum CompileError {
    /// 辞書ビルド中のエラー
    #[error(transparent)]
    BuildError(#[from] BuildError),
    /// スナップショット確認中のエラー
    #[error(transparent)]
    InspectError(#[from] InspectError),
}

fn main() -> Result<(), CompileError> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Build(args) => Ok(build::run(args)?),
        Command::Inspect(args) => Ok(inspect::run(args)?),
    }
}
