//! 辞書構築のためのビルダー
//!
//! このモジュールは、入力レコードから [`DictionaryInner`] を構築するためのビルダーを提供します。
//! 構築は次の順序で進み、逆戻りはできません。
//!
//! 1. 読み込み: レコードを符号化してワードマップにグループを追記する
//! 2. エイリアス生成(任意): アクセント規則による別表記を参照として追加する
//! 3. 多語表現の索引: [`DictionaryBuilder::build`]で最終的なキー集合から索引を作る

use std::io::BufRead;

use crate::dictionary::alias::{self, AccentRules};
use crate::dictionary::codec::CodecBuilder;
use crate::dictionary::multiword::MultiWordTableBuilder;
use crate::dictionary::word_map::WordMapBuilder;
use crate::dictionary::DictionaryInner;
use crate::errors::{MorphoDictError, Result};
use crate::record::{RawRecord, RecordReader};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Loading,
    Aliased,
    /// 読み込みかエイリアス生成が失敗した後。以降の操作はすべて拒否されます。
    Failed,
}

/// 入力レコードから [`DictionaryInner`] を構築するビルダー
///
/// 構築中の状態は外部から検索できません。[`build`](Self::build)で消費されて
/// 読み取り専用の辞書になります。
pub struct DictionaryBuilder {
    codec: CodecBuilder,
    words: WordMapBuilder,
    phase: Phase,
    size: usize,
    alias_count: usize,
    num_records: usize,
}

impl DictionaryBuilder {
    /// 空のビルダーを作成します。
    pub fn new() -> Result<Self> {
        Ok(Self {
            codec: CodecBuilder::new()?,
            words: WordMapBuilder::new(),
            phase: Phase::Loading,
            size: 0,
            alias_count: 0,
            num_records: 0,
        })
    }

    /// レコードを1件読み込みます。
    ///
    /// 形態論オブジェクトごとに1つのグループがキーに追記されます。
    /// 同じキーのレコードが複数あってもグループは併合されません。
    /// すべてのグループの符号化に成功するまでワードマップは変更されません。
    ///
    /// # エラー
    ///
    /// 以下の場合にエラーを返します。
    /// - エイリアス生成の後、または以前の読み込みが失敗した後に呼び出された場合。
    /// - 品詞の注釈が未知の場合。
    /// - 符号表の容量を超えた場合。
    ///
    /// エラーの後、ビルダーは失敗状態になり[`build`](Self::build)できません。
    pub fn add_record(&mut self, record: &RawRecord) -> Result<()> {
        self.check_phase("cannot add a record")?;
        let result = self.load_record(record);
        if result.is_err() {
            self.phase = Phase::Failed;
        }
        result
    }

    fn load_record(&mut self, record: &RawRecord) -> Result<()> {
        record.validate()?;

        let key = record.form.key();
        if key.is_empty() {
            log::warn!("Skipping a record with an empty form: {:?}", record.form);
            return Ok(());
        }

        let mut groups = Vec::with_capacity(record.morpho.len());
        for morpho in &record.morpho {
            let group = morpho
                .components()
                .iter()
                .map(|c| {
                    self.codec
                        .encode_annotated(&c.lemma, &c.pos, &c.property_set())
                })
                .collect::<Result<Vec<_>>>()?;
            groups.push(group);
        }

        if self.words.insert_key(&key)? {
            self.size += 1;
        }
        for group in groups {
            self.words.push_group(&key, group)?;
        }
        self.num_records += 1;
        log::debug!("Loaded {key:?} ({} groups)", record.morpho.len());
        Ok(())
    }

    fn check_phase(&self, msg: &str) -> Result<()> {
        match self.phase {
            Phase::Loading => Ok(()),
            Phase::Aliased => Err(MorphoDictError::invalid_state(
                msg,
                "aliasing has already been run",
            )),
            Phase::Failed => Err(MorphoDictError::invalid_state(
                msg,
                "a previous load step failed",
            )),
        }
    }

    /// レコードのイテレータをすべて読み込み、読み込んだ件数を返します。
    ///
    /// # エラー
    ///
    /// 最初に失敗したレコードのエラーを返します。
    pub fn add_records<I>(&mut self, records: I) -> Result<usize>
    where
        I: IntoIterator<Item = Result<RawRecord>>,
    {
        let mut n = 0;
        for record in records {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    self.phase = Phase::Failed;
                    return Err(e);
                }
            };
            self.add_record(&record)?;
            n += 1;
        }
        log::info!(
            "Loaded {n} records: {} keys, {} lemmas",
            self.size,
            self.codec.num_lemmas(),
        );
        Ok(n)
    }

    /// アクセント規則による別表記を参照として追加し、追加した数を返します。
    ///
    /// # エラー
    ///
    /// 既にエイリアス生成を実行している場合や、以前の操作が失敗している場合に
    /// [`MorphoDictError::InvalidState`] を返します。
    pub fn alias(&mut self, rules: &AccentRules) -> Result<usize> {
        self.check_phase("cannot run aliasing")?;
        let added = match alias::alias(&mut self.words, rules) {
            Ok(added) => added,
            Err(e) => {
                self.phase = Phase::Failed;
                return Err(e);
            }
        };
        self.alias_count += added;
        self.phase = Phase::Aliased;
        log::info!("Added {added} accent aliases");
        Ok(added)
    }

    /// 言語コードのプリセット規則でエイリアス生成を実行します。
    ///
    /// # エラー
    ///
    /// 未知の言語コードの場合に [`MorphoDictError::InvalidArgument`] を返します。
    pub fn alias_language(&mut self, code: &str) -> Result<usize> {
        let rules = AccentRules::for_language(code)?;
        self.alias(&rules)
    }

    /// 多語表現を索引し、読み取り専用の辞書に凍結します。
    ///
    /// # エラー
    ///
    /// 以前の読み込みやエイリアス生成が失敗している場合に
    /// [`MorphoDictError::InvalidState`] を返します。
    pub fn build(self) -> Result<DictionaryInner> {
        if self.phase == Phase::Failed {
            return Err(MorphoDictError::invalid_state(
                "cannot build the dictionary",
                "a previous load step failed",
            ));
        }
        let mut multiwords = MultiWordTableBuilder::new();
        let mut multiword_count = 0;
        for key in self.words.sorted_keys() {
            if multiwords.add_key(key)? && !self.words.is_reference(key) {
                multiword_count += 1;
            }
        }
        let multiwords = multiwords.build()?;
        log::info!(
            "Indexed {} multi-word phrases ({multiword_count} without aliases)",
            multiwords.len(),
        );

        Ok(DictionaryInner {
            codec: self.codec.build(),
            words: self.words.build(),
            multiwords,
            size: u32::try_from(self.size)?,
            alias_count: u32::try_from(self.alias_count)?,
            multiword_count: u32::try_from(multiword_count)?,
        })
    }

    /// JSON Linesのレコードから辞書を構築します。
    ///
    /// `language`が与えられた場合は、そのプリセット規則でエイリアス生成を行います。
    ///
    /// # エラー
    ///
    /// 入力が不正な場合や未知の言語コードの場合にエラーを返します。
    pub fn from_reader<R>(rdr: R, language: Option<&str>) -> Result<DictionaryInner>
    where
        R: BufRead,
    {
        let mut builder = Self::new()?;
        builder.add_records(RecordReader::new(rdr))?;
        if let Some(language) = language {
            builder.alias_language(language)?;
        }
        builder.build()
    }

    /// 読み込んだレコードの数
    #[inline(always)]
    pub const fn num_records(&self) -> usize {
        self.num_records
    }

    /// 読み込み済みのキーの数(エイリアスを除く)
    #[inline(always)]
    pub const fn size(&self) -> usize {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(json: &str) -> RawRecord {
        RawRecord::from_json(json).unwrap()
    }

    #[test]
    fn test_size_counts_new_keys() {
        let mut builder = DictionaryBuilder::new().unwrap();
        let r = record(r#"{"form": "X", "morpho": [{"type": "NOUN", "lemma": "x"}]}"#);
        builder.add_record(&r).unwrap();
        builder.add_record(&r).unwrap();
        assert_eq!(builder.size(), 1);
        assert_eq!(builder.num_records(), 2);
    }

    #[test]
    fn test_empty_form_is_skipped() {
        let mut builder = DictionaryBuilder::new().unwrap();
        builder
            .add_record(&record(r#"{"form": "  ", "morpho": [{"type": "NOUN", "lemma": "x"}]}"#))
            .unwrap();
        assert_eq!(builder.size(), 0);
        assert_eq!(builder.num_records(), 0);
    }

    #[test]
    fn test_unknown_type_aborts_the_load() {
        let input = "{\"form\": \"a\", \"morpho\": [{\"type\": \"NOUN\", \"lemma\": \"a\"}]}\n\
                     {\"form\": \"b\", \"morpho\": [{\"type\": \"GERUND\", \"lemma\": \"b\"}]}\n";
        let result = DictionaryBuilder::from_reader(input.as_bytes(), None);
        assert!(matches!(
            result,
            Err(MorphoDictError::UnknownTypeAnnotation(tag)) if tag == "GERUND"
        ));
    }

    #[test]
    fn test_failed_record_leaves_no_trace() {
        let mut builder = DictionaryBuilder::new().unwrap();
        let r = record(
            r#"{"form": "x", "morpho": [{"type": "NOUN", "lemma": "x"}, {"type": "GERUND", "lemma": "x"}]}"#,
        );
        assert!(matches!(
            builder.add_record(&r),
            Err(MorphoDictError::UnknownTypeAnnotation(tag)) if tag == "GERUND"
        ));
        assert_eq!(builder.size(), 0);
        assert_eq!(builder.num_records(), 0);
        assert!(!builder.words.contains_key("x"));

        assert!(matches!(
            builder.add_record(&record(r#"{"form": "y", "morpho": [{"type": "NOUN", "lemma": "y"}]}"#)),
            Err(MorphoDictError::InvalidState(_))
        ));
        assert!(matches!(
            builder.alias_language("it"),
            Err(MorphoDictError::InvalidState(_))
        ));
        assert!(matches!(builder.build(), Err(MorphoDictError::InvalidState(_))));
    }

    #[test]
    fn test_unparsable_line_fails_the_builder() {
        let mut builder = DictionaryBuilder::new().unwrap();
        let input = "{\"form\": \"a\", \"morpho\": [{\"type\": \"NOUN\", \"lemma\": \"a\"}]}\n{\"form\": \n";
        assert!(matches!(
            builder.add_records(RecordReader::new(input.as_bytes())),
            Err(MorphoDictError::InvalidFormat(_))
        ));
        assert_eq!(builder.size(), 1);
        assert!(matches!(builder.build(), Err(MorphoDictError::InvalidState(_))));
    }

    #[test]
    fn test_phases_are_ordered() {
        let mut builder = DictionaryBuilder::new().unwrap();
        builder
            .add_record(&record(r#"{"form": "caffè", "morpho": [{"type": "NOUN", "lemma": "caffè"}]}"#))
            .unwrap();
        assert_eq!(builder.alias_language("it").unwrap(), 1);
        assert!(matches!(
            builder.alias_language("it"),
            Err(MorphoDictError::InvalidState(_))
        ));
        assert!(matches!(
            builder.add_record(&record(r#"{"form": "tè"}"#)),
            Err(MorphoDictError::InvalidState(_))
        ));
    }

    #[test]
    fn test_unknown_language() {
        let mut builder = DictionaryBuilder::new().unwrap();
        assert!(matches!(
            builder.alias_language("tlh"),
            Err(MorphoDictError::InvalidArgument(_))
        ));
    }
}
