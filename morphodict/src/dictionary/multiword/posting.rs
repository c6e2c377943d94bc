//! 多語表現IDのポスティングリスト

use rkyv::rend::u32_le;
use rkyv::{Archive, Deserialize, Serialize};

use crate::errors::{MorphoDictError, Result};
use crate::utils::FromU32;

/// 語ごとの多語表現IDリストを1本の配列に連結したもの
#[derive(Archive, Serialize, Deserialize)]
pub struct Postings {
    // Each list is stored as its length followed by the phrase ids.
    data: Vec<u32>,
}

impl Postings {
    /// オフセット`offset`から始まるIDリストを返します。
    ///
    /// # エラー
    ///
    /// オフセットやリストの長さが配列の範囲外を指す場合に
    /// [`MorphoDictError::InvalidState`] を返します。
    pub fn phrase_ids(&self, offset: u32) -> Result<&[u32]> {
        let start = usize::from_u32(offset);
        let len = self.data.get(start).map(|&len| usize::from_u32(len));
        len.and_then(|len| self.data.get(start + 1..start + 1 + len))
            .ok_or_else(|| dangling_offset(offset))
    }

    #[inline(always)]
    pub fn num_slots(&self) -> usize {
        self.data.len()
    }
}

impl ArchivedPostings {
    /// オフセット`offset`から始まるIDリストを返します（アーカイブ版）。
    pub fn phrase_ids(&self, offset: u32) -> Result<&[u32_le]> {
        let start = usize::from_u32(offset);
        let len = self.data.get(start).map(|len| usize::from_u32(len.to_native()));
        len.and_then(|len| self.data.get(start + 1..start + 1 + len))
            .ok_or_else(|| dangling_offset(offset))
    }
}

fn dangling_offset(offset: u32) -> MorphoDictError {
    MorphoDictError::invalid_state(
        "posting list does not resolve",
        format!("offset {offset} is out of range"),
    )
}

/// [`Postings`]を構築するビルダー
#[derive(Default)]
pub struct PostingsBuilder {
    data: Vec<u32>,
}

impl PostingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// IDリストを追記し、そのオフセットを返します。
    pub fn push(&mut self, ids: &[u32]) -> Result<u32> {
        let offset = u32::try_from(self.data.len())?;
        self.data.push(u32::try_from(ids.len())?);
        self.data.extend_from_slice(ids);
        Ok(offset)
    }

    pub fn build(self) -> Postings {
        Postings { data: self.data }
    }
}
