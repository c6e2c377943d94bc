//! 辞書スナップショットのビルドモジュール
//!
//! JSON Lines形式のコーパスから辞書を構築し、rkyv形式のスナップショットとして書き出します。
//! アクセントのエイリアス生成には、言語コードのプリセット規則か、
//! CSVファイルの規則のどちらかを使用できます。

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use morphodict_rkyv::dictionary::DictionaryInner;
use morphodict_rkyv::errors::MorphoDictError;
use morphodict_rkyv::{AccentRules, DictionaryBuilder, RecordReader};

use clap::Parser;

/// ビルドコマンドの引数
#[derive(Parser, Debug)]
#[clap(
    name = "build",
    about = "A program to build a morphology dictionary snapshot."
)]
pub struct Args {
    /// Corpus of morphology records (JSON Lines).
    #[clap(short = 'i', long)]
    input: PathBuf,

    /// File to which the dictionary snapshot is output.
    #[clap(short = 'o', long)]
    output: PathBuf,

    /// Language code of the preset accent rules (e.g. "it").
    #[clap(short = 'l', long, conflicts_with = "rules")]
    language: Option<String>,

    /// CSV file of accent rules, one `pattern,replacement` pair per line.
    #[clap(short = 'r', long)]
    rules: Option<PathBuf>,
}

/// ビルド処理中に発生する可能性のあるエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// 入出力エラー
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// 辞書構築エラー
    #[error("Dictionary building failed: {0}")]
    MorphoDict(#[from] MorphoDictError),
}

/// エイリアス生成に使用する規則の出所
pub enum AliasSource {
    None,
    Language(String),
    RulesFile(PathBuf),
}

impl From<&Args> for AliasSource {
    fn from(args: &Args) -> Self {
        if let Some(rules) = &args.rules {
            Self::RulesFile(rules.clone())
        } else if let Some(language) = &args.language {
            Self::Language(language.clone())
        } else {
            Self::None
        }
    }
}

/// ビルドコマンドを実行する
///
/// # エラー
///
/// ファイルの読み書きや辞書構築に失敗した場合、`BuildError`を返します。
pub fn run(args: Args) -> Result<(), BuildError> {
    let source = AliasSource::from(&args);

    log::info!("Compiling the dictionary from {}...", args.input.display());
    let dict = build_dictionary(&args.input, &source)?;

    log::info!("Writing the dictionary...");
    let mut wtr = BufWriter::new(File::create(&args.output)?);
    dict.write(&mut wtr)?;
    wtr.flush()?;

    println!("keys:\t{}", dict.size());
    println!("aliases:\t{}", dict.alias_count());
    println!("multiwords:\t{}", dict.multiword_count());
    println!("lemmas:\t{}", dict.num_lemmas());
    println!("property_sets:\t{}", dict.num_property_sets());
    println!("Successfully built the dictionary to {}", args.output.display());
    Ok(())
}

/// コーパスから辞書を構築する
///
/// CLIに依存しないコアのビルドロジックです。
///
/// # エラー
///
/// ファイルの読み込みや辞書構築に失敗した場合、`BuildError`を返します。
pub fn build_dictionary(input: &Path, source: &AliasSource) -> Result<DictionaryInner, BuildError> {
    let rules = match source {
        AliasSource::None => None,
        AliasSource::Language(code) => Some(AccentRules::for_language(code)?),
        AliasSource::RulesFile(path) => Some(AccentRules::from_reader(File::open(path)?)?),
    };

    let mut builder = DictionaryBuilder::new()?;
    let rdr = BufReader::new(File::open(input)?);
    builder.add_records(RecordReader::new(rdr))?;
    if let Some(rules) = rules {
        builder.alias(&rules)?;
    }
    Ok(builder.build()?)
}
