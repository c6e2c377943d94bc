//! 形態論辞書モジュール。
//!
//! このモジュールは、辞書データの構築、永続化、検索を行います。
//! 主な機能として以下を提供します:
//!
//! - 形態論レコードの整数符号化と、見出し語・属性集合の重複排除
//! - アクセント表記ゆれのエイリアス
//! - 多語表現の索引
//! - ゼロコピーデシリアライゼーションによる高速な辞書アクセス
//!
//! # 辞書の読み込み方法
//!
//! - [`Dictionary::from_path`]: ファイルパスから辞書を読み込む(推奨)
//! - [`Dictionary::read`]: リーダーから辞書を読み込む
//!
//! # 辞書のビルド
//!
//! [`DictionaryBuilder`]を使用して、JSON Lines形式のレコードから辞書を構築できます。
pub mod alias;
pub mod builder;
pub mod codec;
pub(crate) mod config;
pub mod exploder;
pub mod multiword;
pub mod word_map;

use std::fs::File;
use std::io::{Read, Write};
use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;

use memmap2::Mmap;
use rkyv::rancor::Error;
use rkyv::util::AlignedVec;
use rkyv::{
    Archive, Deserialize, Serialize, access, api::serialize_using, ser::Serializer,
    ser::allocator::Arena, ser::sharing::Share, ser::writer::IoWriter, util::with_arena,
};

use crate::dictionary::codec::{ArchivedCodec, Codec};
use crate::dictionary::exploder::explode;
use crate::dictionary::multiword::{ArchivedMultiWordTable, MultiWordTable};
use crate::dictionary::word_map::{ArchivedWordMap, WordMap, normalize_key};
use crate::entry::Entry;
use crate::errors::{MorphoDictError, Result};
use crate::morphology::{CompositeMorphology, Morphology};

pub use crate::dictionary::alias::{AccentRule, AccentRules};
pub use crate::dictionary::builder::DictionaryBuilder;
pub use crate::dictionary::codec::{EncodedMorphology, TypeTable};
pub use crate::dictionary::config::PresetAccentRules;

/// スナップショットを識別するマジックバイト。
///
/// この定数のバージョンはスナップショット形式のバージョンであり、
/// クレートのセマンティックバージョンからは切り離されています。
pub const MODEL_MAGIC: &[u8] = b"MorphoDictRkyv 0.1\n";

const MODEL_MAGIC_LEN: usize = MODEL_MAGIC.len();
const RKYV_ALIGNMENT: usize = 16;
const PADDING_LEN: usize = (RKYV_ALIGNMENT - (MODEL_MAGIC_LEN % RKYV_ALIGNMENT)) % RKYV_ALIGNMENT;
const DATA_START: usize = MODEL_MAGIC_LEN + PADDING_LEN;

/// [`Dictionary`]の内部データ。
///
/// 符号表、ワードマップ、多語表現の索引と各種の件数を保持します。
/// 構築後は変更されません。
#[derive(Archive, Serialize, Deserialize)]
pub struct DictionaryInner {
    codec: Codec,
    words: WordMap,
    multiwords: MultiWordTable,
    size: u32,
    alias_count: u32,
    multiword_count: u32,
}

/// メモリバッファ(mmapまたはヒープ)を所有するラッパー。
enum DictBuffer {
    Mmap(Mmap),
    Aligned(AlignedVec<16>),
}

impl DictBuffer {
    /// マジックバイトとパディングを除いたアーカイブ本体
    fn data_bytes(&self) -> &[u8] {
        match self {
            DictBuffer::Mmap(mmap) => mmap.get(DATA_START..).unwrap_or_default(),
            DictBuffer::Aligned(bytes) => bytes.as_slice(),
        }
    }
}

/// 読み取り専用の形態論辞書。
///
/// 2つのバリアントがあります:
/// - `Archived`: メモリマップまたはアライメント済みバッファから直接アクセスされる辞書
/// - `Owned`: ヒープ上に所有される辞書データ(構築直後など)
///
/// どちらのバリアントも同じ検索操作を提供し、複数のスレッドから同時に検索できます。
pub enum Dictionary {
    Archived(ArchivedDictionary),
    Owned(Arc<DictionaryInner>),
}

/// アーカイブ形式の辞書。
///
/// メモリバッファとアーカイブされた辞書データへの参照を保持します。
pub struct ArchivedDictionary {
    buffer: DictBuffer,
    data: &'static ArchivedDictionaryInner,
}

impl ArchivedDictionary {
    /// バッファ内のアーカイブを検証し、バッファと一緒に保持します。
    fn new(buffer: DictBuffer) -> Result<Self> {
        let archived =
            access::<ArchivedDictionaryInner, Error>(buffer.data_bytes()).map_err(|e| {
                MorphoDictError::invalid_state(
                    "snapshot validation failed, the file may be corrupted or incompatible",
                    e.to_string(),
                )
            })?;
        // SAFETY: the bytes live in `buffer`, which is stored next to `data` and is
        // neither mutated nor dropped while `data` is reachable. Moving an `Mmap` or an
        // `AlignedVec` does not move the heap or mapped region it points to.
        let data: &'static ArchivedDictionaryInner = unsafe { &*(archived as *const _) };
        Ok(Self { buffer, data })
    }
}

/// マジックバイトとパディングを読み飛ばします。
fn check_header<R: Read>(rdr: &mut R, arg: &'static str) -> Result<()> {
    let mut header = [0; DATA_START];
    rdr.read_exact(&mut header)?;
    if !header.starts_with(MODEL_MAGIC) {
        return Err(MorphoDictError::invalid_argument(
            arg,
            "not a morphology dictionary snapshot (magic bytes mismatch)",
        ));
    }
    Ok(())
}

impl Deref for ArchivedDictionary {
    type Target = ArchivedDictionaryInner;
    fn deref(&self) -> &Self::Target {
        self.data
    }
}

/// 辞書内部データへの参照(アーカイブ版または所有版)。
///
/// アーカイブ版と所有版の両方に対して統一的な検索インターフェースを提供します。
#[derive(Clone, Copy)]
pub enum DictionaryInnerRef<'a> {
    Archived(&'a ArchivedDictionaryInner),
    Owned(&'a DictionaryInner),
}

fn to_key(form: &str) -> String {
    normalize_key(form)
}

fn expand_group(decoded: Vec<Morphology>, out: &mut Vec<CompositeMorphology>) -> Result<()> {
    if decoded.is_empty() {
        return Ok(());
    }
    for concrete in explode(decoded) {
        out.push(CompositeMorphology::try_from(concrete)?);
    }
    Ok(())
}

impl DictionaryInner {
    /// 語形を検索します。
    ///
    /// 語形は小文字化してから引かれ、参照は1段だけ解決されます。
    /// 各グループは復号の後に展開され、すべてのグループの結果が連結されます。
    /// 未知の語形の場合は`Ok(None)`を返します。
    ///
    /// # エラー
    ///
    /// 参照先がさらに参照になっている場合に [`MorphoDictError::ChainedReference`] を返します。
    pub fn get(&self, form: &str) -> Result<Option<Entry>> {
        let Some(groups) = self.words.resolve(&to_key(form))? else {
            return Ok(None);
        };
        let mut morphologies = vec![];
        for group in groups {
            let decoded = group
                .iter()
                .map(|&code| self.codec.decode(code))
                .collect::<Result<_>>()?;
            expand_group(decoded, &mut morphologies)?;
        }
        Ok(Some(Entry::new(form, morphologies)))
    }

    /// 語を含む多語表現を返します。
    ///
    /// `include_aliases`が`false`の場合、エイリアスである多語表現を除きます。
    pub fn multi_words(&self, word: &str, include_aliases: bool) -> Result<Vec<&str>> {
        let mut phrases = self.multiwords.containing(&to_key(word))?;
        if !include_aliases {
            phrases.retain(|phrase| !self.is_alias(phrase));
        }
        Ok(phrases)
    }

    /// 語で始まる多語表現を返します。
    ///
    /// `include_aliases`が`false`の場合、エイリアスである多語表現を除きます。
    pub fn multi_words_introduced_by(&self, word: &str, include_aliases: bool) -> Result<Vec<&str>> {
        let mut phrases = self.multiwords.introduced_by(&to_key(word))?;
        if !include_aliases {
            phrases.retain(|phrase| !self.is_alias(phrase));
        }
        Ok(phrases)
    }

    /// 語形のエントリが保持するグループの数。参照は1段だけ解決されます。
    pub fn group_count(&self, form: &str) -> Result<Option<usize>> {
        Ok(self.words.resolve(&to_key(form))?.map(|groups| groups.len()))
    }

    /// 語形のエントリが参照かどうか
    pub fn is_alias(&self, form: &str) -> bool {
        self.words
            .get(&to_key(form))
            .is_some_and(|e| e.is_reference())
    }

    /// 読み込み時に作成されたキーの数(エイリアスを除く)
    #[inline(always)]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// エイリアスの数
    #[inline(always)]
    pub const fn alias_count(&self) -> u32 {
        self.alias_count
    }

    /// エイリアスでない多語表現の数
    #[inline(always)]
    pub const fn multiword_count(&self) -> u32 {
        self.multiword_count
    }

    /// 整列済みのすべてのキー(エイリアスを含む)
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.words.keys()
    }

    /// 登録されている見出し語の数
    #[inline(always)]
    pub fn num_lemmas(&self) -> usize {
        self.codec.num_lemmas()
    }

    /// 登録されている属性集合の数
    #[inline(always)]
    pub fn num_property_sets(&self) -> usize {
        self.codec.num_property_sets()
    }

    #[cfg(test)]
    pub(crate) fn words_mut(&mut self) -> &mut WordMap {
        &mut self.words
    }

    /// 辞書データを`rkyv`フォーマットでライターにシリアライズします。
    ///
    /// # エラー
    ///
    /// この関数は以下の場合にエラーを返します:
    /// - 基礎となる`writer`への書き込みに失敗した場合(例: I/Oエラー)。
    /// - `rkyv`シリアライゼーションプロセスでエラーが発生した場合。
    pub fn write<W>(&self, mut wtr: W) -> Result<()>
    where
        W: Write,
    {
        wtr.write_all(MODEL_MAGIC)?;

        let padding_bytes = vec![0xFF; PADDING_LEN];
        wtr.write_all(&padding_bytes)?;

        with_arena(|arena: &mut Arena| {
            let writer = IoWriter::new(&mut wtr);
            let mut serializer = Serializer::new(writer, arena.acquire(), Share::new());
            serialize_using::<_, rkyv::rancor::Error>(self, &mut serializer)
        })
        .map_err(|e| {
            MorphoDictError::invalid_state("rkyv serialization failed".to_string(), e.to_string())
        })?;

        Ok(())
    }
}

impl ArchivedDictionaryInner {
    /// 語形を検索します（アーカイブ版）。
    pub fn get(&self, form: &str) -> Result<Option<Entry>> {
        let Some(groups) = self.words.resolve(&to_key(form))? else {
            return Ok(None);
        };
        let mut morphologies = vec![];
        for group in groups {
            let decoded = group
                .iter()
                .map(|code| self.codec.decode(code.to_native()))
                .collect::<Result<_>>()?;
            expand_group(decoded, &mut morphologies)?;
        }
        Ok(Some(Entry::new(form, morphologies)))
    }

    pub fn multi_words(&self, word: &str, include_aliases: bool) -> Result<Vec<&str>> {
        let mut phrases = self.multiwords.containing(&to_key(word))?;
        if !include_aliases {
            phrases.retain(|phrase| !self.is_alias(phrase));
        }
        Ok(phrases)
    }

    pub fn multi_words_introduced_by(&self, word: &str, include_aliases: bool) -> Result<Vec<&str>> {
        let mut phrases = self.multiwords.introduced_by(&to_key(word))?;
        if !include_aliases {
            phrases.retain(|phrase| !self.is_alias(phrase));
        }
        Ok(phrases)
    }

    pub fn group_count(&self, form: &str) -> Result<Option<usize>> {
        Ok(self.words.resolve(&to_key(form))?.map(|groups| groups.len()))
    }

    pub fn is_alias(&self, form: &str) -> bool {
        self.words
            .get(&to_key(form))
            .is_some_and(|e| e.is_reference())
    }

    #[inline(always)]
    pub fn size(&self) -> u32 {
        self.size.to_native()
    }

    #[inline(always)]
    pub fn alias_count(&self) -> u32 {
        self.alias_count.to_native()
    }

    #[inline(always)]
    pub fn multiword_count(&self) -> u32 {
        self.multiword_count.to_native()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.words.keys()
    }

    #[inline(always)]
    pub(crate) fn codec(&self) -> &ArchivedCodec {
        &self.codec
    }

    #[inline(always)]
    pub(crate) fn words(&self) -> &ArchivedWordMap {
        &self.words
    }

    #[inline(always)]
    pub(crate) fn multiwords(&self) -> &ArchivedMultiWordTable {
        &self.multiwords
    }
}

impl<'a> DictionaryInnerRef<'a> {
    /// 語形を検索します。
    #[inline(always)]
    pub fn get(&self, form: &str) -> Result<Option<Entry>> {
        match self {
            DictionaryInnerRef::Archived(dict) => dict.get(form),
            DictionaryInnerRef::Owned(dict) => dict.get(form),
        }
    }

    /// 語を含む多語表現を返します。
    #[inline(always)]
    pub fn multi_words(&self, word: &str, include_aliases: bool) -> Result<Vec<&'a str>> {
        match *self {
            DictionaryInnerRef::Archived(dict) => dict.multi_words(word, include_aliases),
            DictionaryInnerRef::Owned(dict) => dict.multi_words(word, include_aliases),
        }
    }

    /// 語で始まる多語表現を返します。
    #[inline(always)]
    pub fn multi_words_introduced_by(&self, word: &str, include_aliases: bool) -> Result<Vec<&'a str>> {
        match *self {
            DictionaryInnerRef::Archived(dict) => {
                dict.multi_words_introduced_by(word, include_aliases)
            }
            DictionaryInnerRef::Owned(dict) => dict.multi_words_introduced_by(word, include_aliases),
        }
    }

    #[inline(always)]
    pub fn group_count(&self, form: &str) -> Result<Option<usize>> {
        match self {
            DictionaryInnerRef::Archived(dict) => dict.group_count(form),
            DictionaryInnerRef::Owned(dict) => dict.group_count(form),
        }
    }

    #[inline(always)]
    pub fn is_alias(&self, form: &str) -> bool {
        match self {
            DictionaryInnerRef::Archived(dict) => dict.is_alias(form),
            DictionaryInnerRef::Owned(dict) => dict.is_alias(form),
        }
    }

    #[inline(always)]
    pub fn size(&self) -> u32 {
        match self {
            DictionaryInnerRef::Archived(dict) => dict.size(),
            DictionaryInnerRef::Owned(dict) => dict.size(),
        }
    }

    #[inline(always)]
    pub fn alias_count(&self) -> u32 {
        match self {
            DictionaryInnerRef::Archived(dict) => dict.alias_count(),
            DictionaryInnerRef::Owned(dict) => dict.alias_count(),
        }
    }

    #[inline(always)]
    pub fn multiword_count(&self) -> u32 {
        match self {
            DictionaryInnerRef::Archived(dict) => dict.multiword_count(),
            DictionaryInnerRef::Owned(dict) => dict.multiword_count(),
        }
    }

    /// 整列済みのすべてのキー(エイリアスを含む)
    pub fn keys(&self) -> Vec<&'a str> {
        match *self {
            DictionaryInnerRef::Archived(dict) => dict.keys().collect(),
            DictionaryInnerRef::Owned(dict) => dict.keys().collect(),
        }
    }

    /// 登録されているキーの数(エイリアスを含む)
    #[inline(always)]
    pub fn num_keys(&self) -> usize {
        match self {
            DictionaryInnerRef::Archived(dict) => dict.words().len(),
            DictionaryInnerRef::Owned(dict) => dict.words.len(),
        }
    }

    /// 索引された多語表現の数(エイリアスを含む)
    #[inline(always)]
    pub fn num_phrases(&self) -> usize {
        match self {
            DictionaryInnerRef::Archived(dict) => dict.multiwords().len(),
            DictionaryInnerRef::Owned(dict) => dict.multiwords.len(),
        }
    }

    #[inline(always)]
    pub fn num_lemmas(&self) -> usize {
        match self {
            DictionaryInnerRef::Archived(dict) => dict.codec().num_lemmas(),
            DictionaryInnerRef::Owned(dict) => dict.num_lemmas(),
        }
    }
}

impl Dictionary {
    /// `DictionaryInner`から辞書を作成します。
    pub fn from_inner(dict: DictionaryInner) -> Self {
        Self::Owned(Arc::new(dict))
    }

    /// 辞書内部データへの参照を取得します。
    #[inline(always)]
    pub fn inner(&self) -> DictionaryInnerRef<'_> {
        match self {
            Dictionary::Archived(archived) => DictionaryInnerRef::Archived(archived.data),
            Dictionary::Owned(dict) => DictionaryInnerRef::Owned(dict),
        }
    }

    /// 辞書データをスナップショットとしてライターに書き込みます。
    ///
    /// この関数の出力は [`Dictionary::read`] と [`Dictionary::from_path`] で読み込めます。
    /// アーカイブ版の辞書はバッファの内容をそのまま書き出します。
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use std::fs::File;
    /// use morphodict_rkyv::{Dictionary, DictionaryBuilder};
    ///
    /// let corpus = r#"{"form": "gatto", "morpho": [{"type": "NOUN", "lemma": "gatto"}]}"#;
    /// let dict = DictionaryBuilder::from_reader(corpus.as_bytes(), Some("it"))?;
    /// let dict = Dictionary::from_inner(dict);
    ///
    /// let mut file = File::create("morpho.dic")?;
    /// dict.write(&mut file)?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # エラー
    ///
    /// 書き込みまたはシリアライゼーションに失敗した場合にエラーを返します。
    pub fn write<W>(&self, mut wtr: W) -> Result<()>
    where
        W: Write,
    {
        match self {
            Dictionary::Owned(dict) => dict.write(wtr),
            Dictionary::Archived(archived) => {
                wtr.write_all(MODEL_MAGIC)?;
                wtr.write_all(&vec![0xFF; PADDING_LEN])?;
                wtr.write_all(archived.buffer.data_bytes())?;
                Ok(())
            }
        }
    }

    /// リーダーの内容をすべてアライメント済みのヒープバッファに読み込み、辞書を作成します。
    ///
    /// # エラー
    ///
    /// 読み込みに失敗した場合、マジックバイトが一致しない場合、
    /// アーカイブの検証に失敗した場合にエラーを返します。
    pub fn read<R: Read>(mut rdr: R) -> Result<Self> {
        check_header(&mut rdr, "rdr")?;

        let mut bytes = vec![];
        rdr.read_to_end(&mut bytes)?;
        let mut aligned = AlignedVec::with_capacity(bytes.len());
        aligned.extend_from_slice(&bytes);

        Ok(Self::Archived(ArchivedDictionary::new(DictBuffer::Aligned(aligned))?))
    }

    /// ファイルをメモリマップして辞書を作成します。
    ///
    /// マップされた領域でアーカイブの検証に失敗した場合は、アライメント済みの
    /// ヒープバッファにコピーしてもう一度だけ検証します。
    ///
    /// # エラー
    ///
    /// ファイルを開けない場合、マジックバイトが一致しない場合、
    /// アーカイブが壊れている場合にエラーを返します。
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| {
            MorphoDictError::invalid_argument(
                "path",
                format!("cannot open {}: {e}", path.display()),
            )
        })?;
        check_header(&mut file, "path")?;

        // SAFETY: the mapping is read-only and is owned by the returned dictionary.
        let mmap = unsafe { Mmap::map(&file)? };

        match ArchivedDictionary::new(DictBuffer::Mmap(mmap)) {
            Ok(archived) => Ok(Self::Archived(archived)),
            Err(_) => {
                // SAFETY: as above.
                let mmap = unsafe { Mmap::map(&file)? };
                let data_bytes = mmap.get(DATA_START..).unwrap_or_default();
                let mut aligned = AlignedVec::with_capacity(data_bytes.len());
                aligned.extend_from_slice(data_bytes);
                log::debug!("Validating {} from an aligned copy", path.display());
                Ok(Self::Archived(ArchivedDictionary::new(DictBuffer::Aligned(aligned))?))
            }
        }
    }

    /// 語形を検索します。
    ///
    /// 詳細は [`DictionaryInner::get`] を参照してください。
    #[inline(always)]
    pub fn get(&self, form: &str) -> Result<Option<Entry>> {
        self.inner().get(form)
    }

    /// 語を含む多語表現を返します。
    #[inline(always)]
    pub fn multi_words(&self, word: &str, include_aliases: bool) -> Result<Vec<&str>> {
        self.inner().multi_words(word, include_aliases)
    }

    /// 語で始まる多語表現を返します。
    #[inline(always)]
    pub fn multi_words_introduced_by(&self, word: &str, include_aliases: bool) -> Result<Vec<&str>> {
        self.inner().multi_words_introduced_by(word, include_aliases)
    }

    #[inline(always)]
    pub fn group_count(&self, form: &str) -> Result<Option<usize>> {
        self.inner().group_count(form)
    }

    #[inline(always)]
    pub fn is_alias(&self, form: &str) -> bool {
        self.inner().is_alias(form)
    }

    /// 読み込み時に作成されたキーの数(エイリアスを除く)
    #[inline(always)]
    pub fn size(&self) -> u32 {
        self.inner().size()
    }

    /// エイリアスの数
    #[inline(always)]
    pub fn alias_count(&self) -> u32 {
        self.inner().alias_count()
    }

    /// エイリアスでない多語表現の数
    #[inline(always)]
    pub fn multiword_count(&self) -> u32 {
        self.inner().multiword_count()
    }
}
