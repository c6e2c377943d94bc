//! 語形を検索するユーティリティ
//!
//! このバイナリは、標準入力から1行に1つずつ読み込んだ語形を辞書で検索し、
//! 指定された出力形式（detail、json）で結果を出力します。

use std::error::Error;
use std::io::{BufRead, BufWriter, IsTerminal, Write};
use std::path::PathBuf;
use std::str::FromStr;

use morphodict_rkyv::{CompositeMorphology, Dictionary, Morphology};

use clap::Parser;

/// 出力モード
#[derive(Clone, Debug)]
enum OutputMode {
    Detail,
    Json,
}

impl FromStr for OutputMode {
    type Err = &'static str;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "detail" => Ok(Self::Detail),
            "json" => Ok(Self::Json),
            _ => Err("Could not parse a mode"),
        }
    }
}

/// コマンドライン引数
#[derive(Parser, Debug)]
#[clap(name = "lookup", about = "Looks up morphological analyses of word forms")]
struct Args {
    /// Dictionary snapshot.
    #[clap(short = 'i', long)]
    dict: PathBuf,

    /// Output mode. Choices are detail and json.
    #[clap(short = 'O', long, default_value = "detail")]
    output_mode: OutputMode,

    /// Also prints the multi-word phrases introduced by each input word.
    #[clap(short = 'm', long)]
    multiwords: bool,

    /// Excludes aliases from the listed multi-word phrases.
    #[clap(long)]
    no_aliases: bool,
}

fn write_morphology<W: Write>(out: &mut W, m: &Morphology) -> std::io::Result<()> {
    write!(out, "{}\t{}", m.lemma(), m.pos())?;
    let props = m
        .properties()
        .iter()
        .map(|p| format!("{}={}", p.name, p.value))
        .collect::<Vec<_>>();
    if !props.is_empty() {
        write!(out, "\t{}", props.join("|"))?;
    }
    Ok(())
}

/// 辞書をロードし、標準入力の語形を検索して結果を標準出力に出力します。
fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    eprintln!("Loading the dictionary...");
    let dict = Dictionary::from_path(args.dict)?;
    eprintln!("Ready to look up");

    let is_tty = std::io::stdout().is_terminal();
    let include_aliases = !args.no_aliases;

    let out = std::io::stdout();
    let mut out = BufWriter::new(out.lock());
    let lines = std::io::stdin().lock().lines();
    for line in lines {
        let line = line?;
        let form = line.trim();
        if form.is_empty() {
            continue;
        }
        let entry = dict.get(form)?;
        let phrases = if args.multiwords {
            dict.multi_words_introduced_by(form, include_aliases)?
        } else {
            vec![]
        };

        match args.output_mode {
            OutputMode::Detail => {
                match &entry {
                    Some(entry) => {
                        for composite in entry.morphologies() {
                            out.write_all(entry.form().as_bytes())?;
                            for (i, m) in composite.components().iter().enumerate() {
                                let sep: &[u8] = if i == 0 { b"\t" } else { b"\t+\t" };
                                out.write_all(sep)?;
                                write_morphology(&mut out, m)?;
                            }
                            if let CompositeMorphology::Multiple(ms) = composite {
                                write!(out, "\tfused={}", ms.len())?;
                            }
                            out.write_all(b"\n")?;
                        }
                    }
                    None => writeln!(out, "{form}\t*")?,
                }
                for phrase in &phrases {
                    writeln!(out, "{form}\tmultiword={phrase}")?;
                }
                out.write_all(b"EOS\n")?;
            }
            OutputMode::Json => {
                let mut value = serde_json::json!({
                    "form": form,
                    "entry": entry,
                });
                if args.multiwords {
                    value["multiwords"] = serde_json::json!(phrases);
                }
                serde_json::to_writer(&mut out, &value)?;
                out.write_all(b"\n")?;
            }
        }
        if is_tty {
            out.flush()?;
        }
    }
    out.flush()?;

    Ok(())
}
