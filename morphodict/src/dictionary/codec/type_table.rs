//! 品詞タグとインデックスの固定対応表

use rkyv::{Archive, Deserialize, Serialize};

use crate::dictionary::codec::{LEMMA_RADIX, TYPE_RADIX};
use crate::errors::{MorphoDictError, Result};
use crate::morphology::PosTag;

/// 品詞タグと小さな整数の全単射
///
/// 既知のタグの閉じた集合から一度だけ構築され、読み込み順に依存しません。
#[derive(Archive, Serialize, Deserialize)]
pub struct TypeTable {
    tags: Vec<PosTag>,
}

impl TypeTable {
    /// 品詞タグの数の上限
    pub const CAPACITY: u64 = LEMMA_RADIX / TYPE_RADIX;

    /// [`PosTag::ALL`] から対応表を構築します。
    ///
    /// # エラー
    ///
    /// タグの数が基数の桁に収まらない場合に
    /// [`MorphoDictError::CapacityOverflow`] を返します。
    pub fn new() -> Result<Self> {
        if u64::try_from(PosTag::ALL.len())? > Self::CAPACITY {
            return Err(MorphoDictError::CapacityOverflow {
                table: "type",
                limit: Self::CAPACITY,
            });
        }
        Ok(Self {
            tags: PosTag::ALL.to_vec(),
        })
    }

    /// タグのインデックスを返します。
    #[inline(always)]
    pub fn index(&self, tag: PosTag) -> u64 {
        let idx = tag as u64;
        debug_assert_eq!(self.tags[idx as usize], tag);
        idx
    }

    /// インデックスからタグを取得します。
    #[inline(always)]
    pub fn tag(&self, idx: usize) -> Option<PosTag> {
        self.tags.get(idx).copied()
    }
}

impl ArchivedTypeTable {
    /// インデックスからタグを取得します（アーカイブ版）。
    #[inline(always)]
    pub fn tag(&self, idx: usize) -> Option<PosTag> {
        self.tags.get(idx).map(|tag| tag.to_native())
    }
}
