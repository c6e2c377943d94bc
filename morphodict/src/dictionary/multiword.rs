//! 多語表現の索引
//!
//! 多語表現(例: `a posteriori`)を、先頭の語と構成するすべての語から引けるようにします。
//! 索引は読み込みとエイリアス生成がすべて終わった後に一度だけ構築されます。

pub mod posting;

use std::collections::BTreeMap;

use rkyv::rend::u32_le;
use rkyv::{Archive, Deserialize, Serialize};

use crate::dictionary::multiword::posting::{Postings, PostingsBuilder};
use crate::dictionary::word_map::WORD_SEPARATOR;
use crate::errors::{MorphoDictError, Result};
use crate::utils::FromU32;

/// 語から多語表現IDのリストへの索引
#[derive(Archive, Serialize, Deserialize)]
pub struct WordIndex {
    words: Vec<String>,
    offsets: Vec<u32>,
    postings: Postings,
}

impl WordIndex {
    /// 語に対応する多語表現IDを返します。
    pub fn phrase_ids(&self, word: &str) -> Result<&[u32]> {
        match self.words.binary_search_by(|w| w.as_str().cmp(word)) {
            Ok(i) => self.postings.phrase_ids(self.offsets[i]),
            Err(_) => Ok(&[]),
        }
    }

    #[inline(always)]
    pub fn num_words(&self) -> usize {
        self.words.len()
    }
}

impl ArchivedWordIndex {
    /// 語に対応する多語表現IDを返します（アーカイブ版）。
    pub fn phrase_ids(&self, word: &str) -> Result<&[u32_le]> {
        let Ok(i) = self.words.binary_search_by(|w| w.as_str().cmp(word)) else {
            return Ok(&[]);
        };
        let offset = self.offsets.get(i).ok_or_else(|| {
            MorphoDictError::invalid_state(
                "word index does not resolve",
                format!("{word:?} has no offset"),
            )
        })?;
        self.postings.phrase_ids(offset.to_native())
    }

    #[inline(always)]
    pub fn num_words(&self) -> usize {
        self.words.len()
    }
}

/// [`WordIndex`]を構築するビルダー
#[derive(Default)]
struct WordIndexBuilder {
    map: BTreeMap<String, Vec<u32>>,
}

impl WordIndexBuilder {
    #[inline(always)]
    fn add_record(&mut self, word: &str, phrase_id: u32) {
        self.map.entry(word.to_string()).or_default().push(phrase_id);
    }

    fn build(self) -> Result<WordIndex> {
        let mut words = Vec::with_capacity(self.map.len());
        let mut offsets = Vec::with_capacity(self.map.len());
        let mut builder = PostingsBuilder::new();
        for (word, ids) in self.map {
            offsets.push(builder.push(&ids)?);
            words.push(word);
        }
        Ok(WordIndex {
            words,
            offsets,
            postings: builder.build(),
        })
    }
}

/// 多語表現のテーブル
#[derive(Archive, Serialize, Deserialize)]
pub struct MultiWordTable {
    phrases: Vec<String>,
    by_start_word: WordIndex,
    by_any_word: WordIndex,
}

impl MultiWordTable {
    /// IDに対応する多語表現を返します。
    #[inline(always)]
    pub fn phrase(&self, id: u32) -> Option<&str> {
        self.phrases.get(usize::from_u32(id)).map(String::as_str)
    }

    /// 語を含む多語表現を返します。
    ///
    /// # エラー
    ///
    /// 索引が範囲外を指す場合に [`MorphoDictError::InvalidState`] を返します。
    pub fn containing(&self, word: &str) -> Result<Vec<&str>> {
        self.resolve(self.by_any_word.phrase_ids(word)?.iter().copied())
    }

    /// 語で始まる多語表現を返します。
    pub fn introduced_by(&self, word: &str) -> Result<Vec<&str>> {
        self.resolve(self.by_start_word.phrase_ids(word)?.iter().copied())
    }

    fn resolve(&self, ids: impl Iterator<Item = u32>) -> Result<Vec<&str>> {
        ids.map(|id| self.phrase(id).ok_or_else(|| dangling_phrase(id)))
            .collect()
    }

    /// 索引された多語表現の数(エイリアスを含む)
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

impl ArchivedMultiWordTable {
    #[inline(always)]
    pub fn phrase(&self, id: u32) -> Option<&str> {
        self.phrases.get(usize::from_u32(id)).map(|p| p.as_str())
    }

    pub fn containing(&self, word: &str) -> Result<Vec<&str>> {
        self.resolve(self.by_any_word.phrase_ids(word)?)
    }

    pub fn introduced_by(&self, word: &str) -> Result<Vec<&str>> {
        self.resolve(self.by_start_word.phrase_ids(word)?)
    }

    fn resolve(&self, ids: &[u32_le]) -> Result<Vec<&str>> {
        ids.iter()
            .map(|id| {
                let id = id.to_native();
                self.phrase(id).ok_or_else(|| dangling_phrase(id))
            })
            .collect()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.phrases.len()
    }
}

fn dangling_phrase(id: u32) -> MorphoDictError {
    MorphoDictError::invalid_state(
        "multi-word index does not resolve",
        format!("phrase id {id} is out of range"),
    )
}

/// [`MultiWordTable`]を構築するビルダー
#[derive(Default)]
pub struct MultiWordTableBuilder {
    phrases: Vec<String>,
    by_start_word: WordIndexBuilder,
    by_any_word: WordIndexBuilder,
}

impl MultiWordTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// キーが区切りを含む場合に多語表現として登録し、`true`を返します。
    ///
    /// 先頭の語の索引と、重複を除いた各構成語の索引の両方に登録されます。
    pub fn add_key(&mut self, key: &str) -> Result<bool> {
        if !key.contains(WORD_SEPARATOR) {
            return Ok(false);
        }
        let id = u32::try_from(self.phrases.len())?;
        let mut distinct: Vec<&str> = vec![];
        for word in key.split(WORD_SEPARATOR) {
            if !distinct.contains(&word) {
                distinct.push(word);
            }
        }
        if let Some(first) = distinct.first() {
            self.by_start_word.add_record(first, id);
        }
        for word in distinct {
            self.by_any_word.add_record(word, id);
        }
        self.phrases.push(key.to_string());
        Ok(true)
    }

    pub fn build(self) -> Result<MultiWordTable> {
        Ok(MultiWordTable {
            phrases: self.phrases,
            by_start_word: self.by_start_word.build()?,
            by_any_word: self.by_any_word.build()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(keys: &[&str]) -> MultiWordTable {
        let mut builder = MultiWordTableBuilder::new();
        for key in keys {
            builder.add_key(key).unwrap();
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_single_words_are_skipped() {
        let mut builder = MultiWordTableBuilder::new();
        assert!(!builder.add_key("gatto").unwrap());
        assert!(builder.add_key("a priori").unwrap());
        assert_eq!(builder.build().unwrap().len(), 1);
    }

    #[test]
    fn test_start_and_any_word() {
        let t = table(&["a posteriori", "a priori", "di nuovo", "in via di"]);
        assert_eq!(t.introduced_by("a").unwrap(), vec!["a posteriori", "a priori"]);
        assert_eq!(t.containing("di").unwrap(), vec!["di nuovo", "in via di"]);
        assert_eq!(t.introduced_by("di").unwrap(), vec!["di nuovo"]);
        assert!(t.introduced_by("via").unwrap().is_empty());
        assert!(t.containing("gatto").unwrap().is_empty());
    }

    #[test]
    fn test_repeated_word_is_indexed_once() {
        let t = table(&["a tu per tu"]);
        assert_eq!(t.containing("tu").unwrap(), vec!["a tu per tu"]);
        assert_eq!(t.by_any_word.num_words(), 3);
    }
}
