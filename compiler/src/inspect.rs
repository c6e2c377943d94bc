//! 辞書スナップショットの統計を表示するモジュール

use std::path::PathBuf;

use morphodict_rkyv::errors::MorphoDictError;
use morphodict_rkyv::Dictionary;

use clap::Parser;

/// 統計表示コマンドの引数
#[derive(Parser, Debug)]
#[clap(name = "inspect", about = "Prints statistics of a dictionary snapshot.")]
pub struct Args {
    /// Dictionary snapshot.
    #[clap(short = 'i', long)]
    input: PathBuf,

    /// Also prints every key, marking aliases with `->`.
    #[clap(long)]
    keys: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    #[error("Failed to load the dictionary: {0}")]
    MorphoDict(#[from] MorphoDictError),
}

pub fn run(args: Args) -> Result<(), InspectError> {
    let dict = Dictionary::from_path(&args.input)?;
    let inner = dict.inner();

    println!("keys:\t{}", inner.size());
    println!("aliases:\t{}", inner.alias_count());
    println!("multiwords:\t{}", inner.multiword_count());
    println!("phrases:\t{}", inner.num_phrases());
    println!("lemmas:\t{}", inner.num_lemmas());

    if args.keys {
        for key in inner.keys() {
            if inner.is_alias(key) {
                println!("{key}\t->");
            } else {
                println!("{key}\t{}", inner.group_count(key)?.unwrap_or(0));
            }
        }
    }
    Ok(())
}
