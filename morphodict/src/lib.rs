//! # morphodict-rkyv
//!
//! 語形(単語と多語表現)から文法的な形態論情報の集合を引く、圧縮された辞書です。
//!
//! ## 概要
//!
//! 辞書はJSON Lines形式のコーパスから一度だけ構築され、その後は読み取り専用で使用されます。
//! 各形態論レコード `(見出し語, 品詞, 属性集合)` は1つの整数に符号化され、
//! 見出し語と属性集合は重複排除されたテーブルで共有されます。
//! rkyvシリアライゼーションフォーマットを使用することで、スナップショットの読み込みを
//! ゼロコピーで行えます。
//!
//! ## 主な機能
//!
//! - **整数符号化**: 混合基数による可逆な符号化と、容量超過の検出
//! - **複数値属性の展開**: `SING+PL` のような圧縮表記を検索時に直積へ展開
//! - **アクセントのエイリアス**: `caffè` と `caffe'` のような表記ゆれを1段の参照で共有
//! - **多語表現の索引**: 先頭の語・構成語から多語表現を検索
//!
//! ## 使用例
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use morphodict_rkyv::{Dictionary, DictionaryBuilder, PosTag, Property};
//!
//! let corpus = r#"{"form": "gatti", "morpho": [{"type": "NOUN", "lemma": "gatto", "properties": {"number": "PL", "gender": "M"}}]}
//! {"form": "caffè", "morpho": [{"type": "NOUN", "lemma": "caffè", "properties": {"number": "SING+PL"}}]}
//! {"form": ["a", "priori"], "morpho": [{"type": "ADV", "lemma": "a priori"}]}"#;
//!
//! let dict = DictionaryBuilder::from_reader(corpus.as_bytes(), Some("it"))?;
//! let dict = Dictionary::from_inner(dict);
//!
//! let entry = dict.get("Gatti")?.unwrap();
//! let m = &entry.morphologies()[0].components()[0];
//! assert_eq!(m.lemma(), "gatto");
//! assert_eq!(m.pos(), PosTag::Noun);
//! assert_eq!(m.property(Property::Number), Some("PL"));
//!
//! // The alias shares the data of the accented form.
//! let entry = dict.get("caffe'")?.unwrap();
//! assert_eq!(entry.morphologies().len(), 2);
//! assert_eq!(dict.alias_count(), 1);
//!
//! assert_eq!(dict.multi_words_introduced_by("a", true)?, vec!["a priori"]);
//! # Ok(())
//! # }
//! ```

#[cfg(not(any(target_pointer_width = "32", target_pointer_width = "64")))]
compile_error!("`target_pointer_width` must be 32 or 64");

/// 辞書データ構造とビルダー
pub mod dictionary;

/// 検索結果の型定義
pub mod entry;

/// エラー型の定義
pub mod errors;

/// 形態論情報の型定義
pub mod morphology;

/// 入力レコードの読み込み
pub mod record;

/// 内部ユーティリティ関数
pub mod utils;


// Re-exports
pub use dictionary::{AccentRules, Dictionary, DictionaryBuilder, PresetAccentRules};
pub use entry::Entry;
pub use morphology::{CompositeMorphology, Morphology, PosTag, Property, PropertySet};
pub use record::{RawRecord, RecordReader};

/// このライブラリのバージョン番号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
