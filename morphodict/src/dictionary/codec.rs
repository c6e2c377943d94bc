//! 形態論レコードの整数符号化
//!
//! `(見出し語, 品詞, 属性集合)` の三つ組を、混合基数
//!
//! ```text
//! code = lemma_index * LEMMA_RADIX + type_index * TYPE_RADIX + property_set_index
//! ```
//!
//! で1つの整数に詰め込みます。各インデックスは割り当て時に桁の範囲を検査され、
//! 隣の桁にあふれることはありません。

mod table;
mod type_table;

use rkyv::{Archive, Deserialize, Serialize};

use crate::errors::{MorphoDictError, Result};
use crate::morphology::{Morphology, PosTag, PropertySet};

pub use crate::dictionary::codec::table::{
    ArchivedLemmaTable, ArchivedPropertySetTable, IndexTableBuilder, LemmaTable,
    PropertySetTable,
};
pub use crate::dictionary::codec::type_table::{ArchivedTypeTable, TypeTable};

/// 見出し語インデックスの桁の重み
pub const LEMMA_RADIX: u64 = 1_000_000;

/// 品詞インデックスの桁の重み
pub const TYPE_RADIX: u64 = 1_000;

/// 属性集合の数の上限
pub const PROPERTY_SET_CAPACITY: u64 = TYPE_RADIX;

/// 見出し語の数の上限
pub const LEMMA_CAPACITY: u64 = u64::MAX / LEMMA_RADIX;

/// 符号化された形態論レコード
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash, Archive, Serialize, Deserialize)]
#[rkyv(derive(Debug, Clone, Copy))]
#[repr(transparent)]
pub struct EncodedMorphology(u64);

impl EncodedMorphology {
    /// 3つのインデックスから符号を作成します。
    ///
    /// # エラー
    ///
    /// いずれかのインデックスが桁の範囲を超える場合に
    /// [`MorphoDictError::CapacityOverflow`] を返します。
    pub fn new(lemma_idx: u64, type_idx: u64, property_set_idx: u64) -> Result<Self> {
        if lemma_idx >= LEMMA_CAPACITY {
            return Err(MorphoDictError::CapacityOverflow {
                table: "lemma",
                limit: LEMMA_CAPACITY,
            });
        }
        if type_idx >= TypeTable::CAPACITY {
            return Err(MorphoDictError::CapacityOverflow {
                table: "type",
                limit: TypeTable::CAPACITY,
            });
        }
        if property_set_idx >= PROPERTY_SET_CAPACITY {
            return Err(MorphoDictError::CapacityOverflow {
                table: "property set",
                limit: PROPERTY_SET_CAPACITY,
            });
        }
        Ok(Self(
            lemma_idx * LEMMA_RADIX + type_idx * TYPE_RADIX + property_set_idx,
        ))
    }

    /// 生の整数値を返します。
    #[inline(always)]
    pub const fn get(self) -> u64 {
        self.0
    }

    #[inline(always)]
    pub const fn lemma_index(self) -> u64 {
        self.0 / LEMMA_RADIX
    }

    #[inline(always)]
    pub const fn type_index(self) -> u64 {
        (self.0 % LEMMA_RADIX) / TYPE_RADIX
    }

    #[inline(always)]
    pub const fn property_set_index(self) -> u64 {
        self.0 % TYPE_RADIX
    }
}

impl ArchivedEncodedMorphology {
    /// ネイティブ形式に変換します。
    #[inline(always)]
    pub fn to_native(&self) -> EncodedMorphology {
        EncodedMorphology(self.0.to_native())
    }
}

/// 凍結された符号表
///
/// 復号は表を変更しません。
#[derive(Archive, Serialize, Deserialize)]
pub struct Codec {
    lemmas: LemmaTable,
    property_sets: PropertySetTable,
    types: TypeTable,
}

impl Codec {
    /// 符号を三つ組に復号します。
    ///
    /// # エラー
    ///
    /// 符号のいずれかの桁が表の範囲外を指す場合に
    /// [`MorphoDictError::InvalidState`] を返します。
    pub fn decode(&self, code: EncodedMorphology) -> Result<Morphology> {
        let lemma = index(code.lemma_index()).and_then(|i| self.lemmas.get(i));
        let pos = index(code.type_index()).and_then(|i| self.types.tag(i));
        let properties = index(code.property_set_index()).and_then(|i| self.property_sets.get(i));
        match (lemma, pos, properties) {
            (Some(lemma), Some(pos), Some(properties)) => Ok(Morphology {
                lemma: lemma.to_string(),
                pos,
                properties: properties.to_vec(),
            }),
            _ => Err(dangling_code(code)),
        }
    }

    /// 登録されている見出し語の数
    #[inline(always)]
    pub fn num_lemmas(&self) -> usize {
        self.lemmas.len()
    }

    /// 登録されている属性集合の数
    #[inline(always)]
    pub fn num_property_sets(&self) -> usize {
        self.property_sets.len()
    }
}

impl ArchivedCodec {
    /// 符号を三つ組に復号します（アーカイブ版）。
    ///
    /// スナップショットの検証は符号の値までは確認しないため、範囲外の桁は
    /// [`MorphoDictError::InvalidState`] として報告されます。
    pub fn decode(&self, code: EncodedMorphology) -> Result<Morphology> {
        let lemma = index(code.lemma_index()).and_then(|i| self.lemmas.get(i));
        let pos = index(code.type_index()).and_then(|i| self.types.tag(i));
        let properties = index(code.property_set_index()).and_then(|i| self.property_sets.get(i));
        match (lemma, pos, properties) {
            (Some(lemma), Some(pos), Some(properties)) => Ok(Morphology {
                lemma: lemma.to_string(),
                pos,
                properties: properties.to_values(),
            }),
            _ => Err(dangling_code(code)),
        }
    }

    #[inline(always)]
    pub fn num_lemmas(&self) -> usize {
        self.lemmas.len()
    }

    #[inline(always)]
    pub fn num_property_sets(&self) -> usize {
        self.property_sets.len()
    }
}

/// 符号表のビルダー
///
/// 符号化のたびに見出し語テーブルと属性集合テーブルへ追記します。
pub struct CodecBuilder {
    lemmas: IndexTableBuilder<String>,
    property_sets: IndexTableBuilder<PropertySet>,
    types: TypeTable,
}

impl CodecBuilder {
    /// 空のビルダーを作成します。
    pub fn new() -> Result<Self> {
        Ok(Self {
            lemmas: IndexTableBuilder::new("lemma", LEMMA_CAPACITY),
            property_sets: IndexTableBuilder::new("property set", PROPERTY_SET_CAPACITY),
            types: TypeTable::new()?,
        })
    }

    /// 三つ組を符号化します。
    ///
    /// # エラー
    ///
    /// テーブルの容量を超える場合に [`MorphoDictError::CapacityOverflow`] を返します。
    pub fn encode(
        &mut self,
        lemma: &str,
        pos: PosTag,
        properties: &PropertySet,
    ) -> Result<EncodedMorphology> {
        // Neither table is modified unless both have room.
        self.lemmas.check_capacity(lemma)?;
        self.property_sets.check_capacity(properties)?;
        let lemma_idx = self.lemmas.get_or_insert(lemma)?;
        let property_set_idx = self.property_sets.get_or_insert(properties)?;
        EncodedMorphology::new(lemma_idx, self.types.index(pos), property_set_idx)
    }

    /// 品詞を注釈文字列で与えて三つ組を符号化します。
    ///
    /// # エラー
    ///
    /// 注釈が未知の品詞の場合に [`MorphoDictError::UnknownTypeAnnotation`] を返します。
    pub fn encode_annotated(
        &mut self,
        lemma: &str,
        type_annotation: &str,
        properties: &PropertySet,
    ) -> Result<EncodedMorphology> {
        let pos = type_annotation.parse::<PosTag>()?;
        self.encode(lemma, pos, properties)
    }

    /// 構築中の表で符号を復号します。
    pub fn decode(&self, code: EncodedMorphology) -> Option<Morphology> {
        Some(Morphology {
            lemma: self.lemmas.get(code.lemma_index())?.clone(),
            pos: self.types.tag(index(code.type_index())?)?,
            properties: self
                .property_sets
                .get(code.property_set_index())?
                .values()
                .to_vec(),
        })
    }

    #[inline(always)]
    pub fn num_lemmas(&self) -> usize {
        self.lemmas.len()
    }

    #[inline(always)]
    pub fn num_property_sets(&self) -> usize {
        self.property_sets.len()
    }

    /// 逆引きを捨てて読み取り専用の [`Codec`] に凍結します。
    pub fn build(self) -> Codec {
        log::debug!(
            "Freezing codec: {} lemmas, {} property sets",
            self.lemmas.len(),
            self.property_sets.len(),
        );
        Codec {
            lemmas: LemmaTable::new(self.lemmas.freeze()),
            property_sets: PropertySetTable::new(self.property_sets.freeze()),
            types: self.types,
        }
    }
}

#[inline(always)]
fn index(idx: u64) -> Option<usize> {
    usize::try_from(idx).ok()
}

fn dangling_code(code: EncodedMorphology) -> MorphoDictError {
    MorphoDictError::invalid_state(
        format!("code {} does not resolve", code.get()),
        format!(
            "lemma {}, type {}, property set {} out of range",
            code.lemma_index(),
            code.type_index(),
            code.property_set_index(),
        ),
    )
}
