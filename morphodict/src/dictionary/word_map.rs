//! 語形キーから辞書エントリへのマップ
//!
//! 構築中はハッシュマップに追記し、凍結時にキーを整列した配列に変換します。
//! 検索は二分探索で行うため、アーカイブ上でもそのまま引けます。

use hashbrown::HashMap;
use rkyv::{Archive, Deserialize, Serialize};

use crate::dictionary::codec::{ArchivedEncodedMorphology, EncodedMorphology};
use crate::errors::{MorphoDictError, Result};

/// 多語表現を構成する語の区切り
pub const WORD_SEPARATOR: char = ' ';

/// 語形を辞書キーに正規化します。
///
/// 小文字化し、前後の空白を除き、語の間の空白の並びを1つの区切り文字にまとめます。
///
/// ```
/// # use morphodict_rkyv::dictionary::word_map::normalize_key;
/// assert_eq!(normalize_key("  Di   Più "), "di più");
/// assert_eq!(normalize_key(" \t"), "");
/// ```
pub fn normalize_key(form: &str) -> String {
    let mut key = String::with_capacity(form.len());
    for word in form.split_whitespace() {
        if !key.is_empty() {
            key.push(WORD_SEPARATOR);
        }
        key.push_str(&word.to_lowercase());
    }
    key
}

/// 辞書エントリの中身
///
/// グループは入力の形態論オブジェクトごとに追記され、併合されることはありません。
#[derive(Clone, Debug, PartialEq, Eq, Archive, Serialize, Deserialize)]
pub enum EntryData {
    /// 符号化された形態論レコードのグループのリスト
    Groups(Vec<Vec<EncodedMorphology>>),
    /// 別のエントリのキーへの参照
    Reference(String),
}

impl EntryData {
    #[inline(always)]
    pub const fn is_reference(&self) -> bool {
        matches!(self, EntryData::Reference(_))
    }
}

impl ArchivedEntryData {
    #[inline(always)]
    pub const fn is_reference(&self) -> bool {
        matches!(self, ArchivedEntryData::Reference(_))
    }
}

/// 凍結されたワードマップ
#[derive(Archive, Serialize, Deserialize)]
pub struct WordMap {
    keys: Vec<String>,
    entries: Vec<EntryData>,
}

impl WordMap {
    /// キーに対応するエントリを返します。参照は解決しません。
    pub fn get(&self, key: &str) -> Option<&EntryData> {
        self.keys
            .binary_search_by(|k| k.as_str().cmp(key))
            .ok()
            .and_then(|i| self.entries.get(i))
    }

    /// 参照を1段だけ解決したグループを返します。
    ///
    /// # エラー
    ///
    /// 参照先がさらに参照の場合に [`MorphoDictError::ChainedReference`] を返します。
    pub fn resolve(&self, key: &str) -> Result<Option<&[Vec<EncodedMorphology>]>> {
        match self.get(key) {
            None => Ok(None),
            Some(EntryData::Groups(groups)) => Ok(Some(groups)),
            Some(EntryData::Reference(target)) => match self.get(target) {
                Some(EntryData::Groups(groups)) => Ok(Some(groups)),
                Some(EntryData::Reference(_)) => {
                    Err(MorphoDictError::chained_reference(key, target.as_str()))
                }
                None => Err(MorphoDictError::invalid_state(
                    format!("reference {key:?} is dangling"),
                    format!("no entry for {target:?}"),
                )),
            },
        }
    }

    /// 整列済みのキーを返します。
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// 任意のエントリからマップを作ります。ビルダーが拒否する形も作れます。
    #[cfg(test)]
    pub(crate) fn from_entries(mut pairs: Vec<(String, EntryData)>) -> Self {
        pairs.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
        let (keys, entries) = pairs.into_iter().unzip();
        Self { keys, entries }
    }
}

impl ArchivedWordMap {
    /// キーに対応するエントリを返します（アーカイブ版）。
    pub fn get(&self, key: &str) -> Option<&ArchivedEntryData> {
        self.keys
            .binary_search_by(|k| k.as_str().cmp(key))
            .ok()
            .and_then(|i| self.entries.get(i))
    }

    /// 参照を1段だけ解決したグループを返します（アーカイブ版）。
    pub fn resolve(
        &self,
        key: &str,
    ) -> Result<Option<&[rkyv::vec::ArchivedVec<ArchivedEncodedMorphology>]>> {
        match self.get(key) {
            None => Ok(None),
            Some(ArchivedEntryData::Groups(groups)) => Ok(Some(groups.as_slice())),
            Some(ArchivedEntryData::Reference(target)) => match self.get(target.as_str()) {
                Some(ArchivedEntryData::Groups(groups)) => Ok(Some(groups.as_slice())),
                Some(ArchivedEntryData::Reference(_)) => {
                    Err(MorphoDictError::chained_reference(key, target.as_str()))
                }
                None => Err(MorphoDictError::invalid_state(
                    format!("reference {key:?} is dangling"),
                    format!("no entry for {:?}", target.as_str()),
                )),
            },
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|k| k.as_str())
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.keys.len()
    }
}

/// ワードマップを構築するビルダー
#[derive(Default)]
pub struct WordMapBuilder {
    map: HashMap<String, EntryData>,
}

impl WordMapBuilder {
    #[inline(always)]
    pub fn new() -> Self {
        Self::default()
    }

    /// グループを持たないキーを作成します。キーが新規作成された場合に`true`を返します。
    ///
    /// # エラー
    ///
    /// キーが既に参照として登録されている場合は [`MorphoDictError::InvalidState`] を返します。
    pub fn insert_key(&mut self, key: &str) -> Result<bool> {
        match self.map.get(key) {
            Some(EntryData::Groups(_)) => Ok(false),
            Some(EntryData::Reference(target)) => Err(MorphoDictError::invalid_state(
                format!("cannot store groups under {key:?}"),
                format!("the key is a reference to {target:?}"),
            )),
            None => {
                self.map
                    .insert(key.to_string(), EntryData::Groups(vec![]));
                Ok(true)
            }
        }
    }

    /// キーにグループを追記します。キーが新規作成された場合に`true`を返します。
    ///
    /// # エラー
    ///
    /// キーが既に参照として登録されている場合は [`MorphoDictError::InvalidState`] を返します。
    pub fn push_group(&mut self, key: &str, group: Vec<EncodedMorphology>) -> Result<bool> {
        let created = self.insert_key(key)?;
        if let Some(EntryData::Groups(groups)) = self.map.get_mut(key) {
            groups.push(group);
        }
        Ok(created)
    }

    /// 参照エントリを挿入します。
    ///
    /// キーが既に存在する場合は何もせず`false`を返します。
    ///
    /// # エラー
    ///
    /// 参照先が参照の場合は [`MorphoDictError::ChainedReference`] を、
    /// 参照先が存在しない場合は [`MorphoDictError::InvalidArgument`] を返します。
    pub fn insert_reference(&mut self, key: &str, target: &str) -> Result<bool> {
        match self.map.get(target) {
            Some(EntryData::Groups(_)) => (),
            Some(EntryData::Reference(_)) => {
                return Err(MorphoDictError::chained_reference(key, target));
            }
            None => {
                return Err(MorphoDictError::invalid_argument(
                    "target",
                    format!("no entry for {target:?}"),
                ));
            }
        }
        if self.map.contains_key(key) {
            return Ok(false);
        }
        self.map
            .insert(key.to_string(), EntryData::Reference(target.to_string()));
        Ok(true)
    }

    #[inline(always)]
    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// キーが参照として登録されているかどうか
    pub fn is_reference(&self, key: &str) -> bool {
        self.map.get(key).is_some_and(EntryData::is_reference)
    }

    /// 参照でないキーを整列して返します。
    pub fn canonical_keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self
            .map
            .iter()
            .filter(|(_, e)| !e.is_reference())
            .map(|(k, _)| k.clone())
            .collect();
        keys.sort_unstable();
        keys
    }

    /// すべてのキーを整列して返します。
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut keys: Vec<_> = self.map.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// キーを整列してワードマップを凍結します。
    pub fn build(self) -> WordMap {
        let mut pairs: Vec<_> = self.map.into_iter().collect();
        pairs.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
        let (keys, entries) = pairs.into_iter().unzip();
        WordMap { keys, entries }
    }
}
