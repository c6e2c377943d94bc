//! 重複排除インデックステーブル
//!
//! 構築中は値からインデックスへの逆引きを持つビルダーとして動作し、
//! 凍結後はインデックスから値を引く読み取り専用のベクターになります。

use std::borrow::Borrow;
use std::hash::Hash;

use hashbrown::HashMap;
use rkyv::{Archive, Deserialize, Serialize};

use crate::errors::{MorphoDictError, Result};
use crate::morphology::{ArchivedPropertySet, PropertySet, PropertyValue};

/// 追記専用・重複排除のインデックス割り当てテーブル（構築用）
pub struct IndexTableBuilder<T> {
    name: &'static str,
    capacity: u64,
    values: Vec<T>,
    index: HashMap<T, u64>,
}

impl<T> IndexTableBuilder<T>
where
    T: Hash + Eq + Clone,
{
    /// 新しいテーブルを作成します。
    ///
    /// # 引数
    ///
    /// * `name` - エラーメッセージに使用するテーブル名
    /// * `capacity` - 割り当て可能なインデックスの数
    pub fn new(name: &'static str, capacity: u64) -> Self {
        Self {
            name,
            capacity,
            values: vec![],
            index: HashMap::new(),
        }
    }

    /// 値を[`get_or_insert`](Self::get_or_insert)できるかどうかを、テーブルを変更せずに検査します。
    ///
    /// # エラー
    ///
    /// 未登録の値に割り当てるインデックスが容量に達する場合に
    /// [`MorphoDictError::CapacityOverflow`] を返します。
    pub fn check_capacity<Q>(&self, value: &Q) -> Result<()>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.index.contains_key(value) {
            return Ok(());
        }
        if u64::try_from(self.values.len())? >= self.capacity {
            return Err(MorphoDictError::CapacityOverflow {
                table: self.name,
                limit: self.capacity,
            });
        }
        Ok(())
    }

    /// 値のインデックスを返します。未登録の場合は末尾に追加します。
    ///
    /// # エラー
    ///
    /// 新しいインデックスが容量に達する場合に
    /// [`MorphoDictError::CapacityOverflow`] を返します。
    pub fn get_or_insert<Q>(&mut self, value: &Q) -> Result<u64>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = T> + ?Sized,
    {
        if let Some(&idx) = self.index.get(value) {
            return Ok(idx);
        }
        self.check_capacity(value)?;
        let idx = u64::try_from(self.values.len())?;
        let owned = value.to_owned();
        self.values.push(owned.clone());
        self.index.insert(owned, idx);
        Ok(idx)
    }

    /// インデックスから値を取得します。
    #[inline(always)]
    pub fn get(&self, idx: u64) -> Option<&T> {
        usize::try_from(idx).ok().and_then(|i| self.values.get(i))
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 逆引きを捨て、割り当て順の値のベクターに凍結します。
    pub fn freeze(self) -> Vec<T> {
        self.values
    }
}

/// 見出し語テーブル
#[derive(Archive, Serialize, Deserialize)]
pub struct LemmaTable {
    lemmas: Vec<String>,
}

impl LemmaTable {
    pub(crate) fn new(lemmas: Vec<String>) -> Self {
        Self { lemmas }
    }

    #[inline(always)]
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.lemmas.get(idx).map(String::as_str)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.lemmas.len()
    }
}

impl ArchivedLemmaTable {
    /// インデックスから見出し語を取得します（アーカイブ版）。
    #[inline(always)]
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.lemmas.get(idx).map(|lemma| lemma.as_str())
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.lemmas.len()
    }
}

/// 属性集合テーブル
#[derive(Archive, Serialize, Deserialize)]
pub struct PropertySetTable {
    sets: Vec<PropertySet>,
}

impl PropertySetTable {
    pub(crate) fn new(sets: Vec<PropertySet>) -> Self {
        Self { sets }
    }

    #[inline(always)]
    pub fn get(&self, idx: usize) -> Option<&[PropertyValue]> {
        self.sets.get(idx).map(PropertySet::values)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.sets.len()
    }
}

impl ArchivedPropertySetTable {
    /// インデックスから属性集合を取得します（アーカイブ版）。
    #[inline(always)]
    pub fn get(&self, idx: usize) -> Option<&ArchivedPropertySet> {
        self.sets.get(idx)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.sets.len()
    }
}
