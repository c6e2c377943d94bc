//! 形態論情報の型定義
//!
//! 品詞タグと文法属性は閉じた集合であり、列挙型として表現します。
//! 属性値そのもの(`SING`, `PL`など)は自由な文字列のまま保持します。

use std::fmt;
use std::str::FromStr;

use rkyv::Archive;

use crate::errors::{MorphoDictError, Result};

/// 品詞タグ
///
/// 辞書が受け付けるタグの閉じた集合です。判別子の順序がそのまま
/// [`TypeTable`](crate::dictionary::TypeTable)のインデックスになります。
#[derive(
    Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug, Hash,
    Archive, rkyv::Serialize, rkyv::Deserialize,
)]
#[rkyv(derive(Debug, Eq, PartialEq, Clone, Copy))]
#[repr(u8)]
pub enum PosTag {
    /// 略語
    Abbreviation,
    /// 形容詞
    Adjective,
    /// 副詞
    Adverb,
    /// 冠詞
    Article,
    /// 助動詞
    Auxiliary,
    /// 接語
    Clitic,
    /// 接続詞
    Conjunction,
    /// 限定詞
    Determiner,
    /// 間投詞
    Interjection,
    /// 名詞
    Noun,
    /// 数詞
    Numeral,
    /// 不変化詞
    Particle,
    /// 前置詞
    Preposition,
    /// 代名詞
    Pronoun,
    /// 固有名詞
    ProperNoun,
    /// 句読点
    Punctuation,
    /// 記号
    Symbol,
    /// 動詞
    Verb,
}

impl PosTag {
    /// すべてのタグ(判別子順)
    pub const ALL: [PosTag; 18] = [
        PosTag::Abbreviation,
        PosTag::Adjective,
        PosTag::Adverb,
        PosTag::Article,
        PosTag::Auxiliary,
        PosTag::Clitic,
        PosTag::Conjunction,
        PosTag::Determiner,
        PosTag::Interjection,
        PosTag::Noun,
        PosTag::Numeral,
        PosTag::Particle,
        PosTag::Preposition,
        PosTag::Pronoun,
        PosTag::ProperNoun,
        PosTag::Punctuation,
        PosTag::Symbol,
        PosTag::Verb,
    ];

    /// 入力レコードで使用される注釈文字列を返します。
    pub const fn as_str(&self) -> &'static str {
        match self {
            PosTag::Abbreviation => "ABBR",
            PosTag::Adjective => "ADJ",
            PosTag::Adverb => "ADV",
            PosTag::Article => "ART",
            PosTag::Auxiliary => "AUX",
            PosTag::Clitic => "CLI",
            PosTag::Conjunction => "CONJ",
            PosTag::Determiner => "DET",
            PosTag::Interjection => "INTERJ",
            PosTag::Noun => "NOUN",
            PosTag::Numeral => "NUM",
            PosTag::Particle => "PART",
            PosTag::Preposition => "PREP",
            PosTag::Pronoun => "PRON",
            PosTag::ProperNoun => "PROPN",
            PosTag::Punctuation => "PUNCT",
            PosTag::Symbol => "SYM",
            PosTag::Verb => "VERB",
        }
    }
}

impl FromStr for PosTag {
    type Err = MorphoDictError;

    /// 注釈文字列からタグを得ます。大文字小文字は区別しません。
    ///
    /// # エラー
    ///
    /// 未知の注釈の場合に [`MorphoDictError::UnknownTypeAnnotation`] を返します。
    fn from_str(annotation: &str) -> Result<Self> {
        let annotation = annotation.trim();
        Self::ALL
            .iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(annotation))
            .copied()
            .ok_or_else(|| MorphoDictError::UnknownTypeAnnotation(annotation.to_string()))
    }
}

impl fmt::Display for PosTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for PosTag {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl ArchivedPosTag {
    /// この[`ArchivedPosTag`]を対応する[`PosTag`]に変換します。
    pub fn to_native(&self) -> PosTag {
        match self {
            ArchivedPosTag::Abbreviation => PosTag::Abbreviation,
            ArchivedPosTag::Adjective => PosTag::Adjective,
            ArchivedPosTag::Adverb => PosTag::Adverb,
            ArchivedPosTag::Article => PosTag::Article,
            ArchivedPosTag::Auxiliary => PosTag::Auxiliary,
            ArchivedPosTag::Clitic => PosTag::Clitic,
            ArchivedPosTag::Conjunction => PosTag::Conjunction,
            ArchivedPosTag::Determiner => PosTag::Determiner,
            ArchivedPosTag::Interjection => PosTag::Interjection,
            ArchivedPosTag::Noun => PosTag::Noun,
            ArchivedPosTag::Numeral => PosTag::Numeral,
            ArchivedPosTag::Particle => PosTag::Particle,
            ArchivedPosTag::Preposition => PosTag::Preposition,
            ArchivedPosTag::Pronoun => PosTag::Pronoun,
            ArchivedPosTag::ProperNoun => PosTag::ProperNoun,
            ArchivedPosTag::Punctuation => PosTag::Punctuation,
            ArchivedPosTag::Symbol => PosTag::Symbol,
            ArchivedPosTag::Verb => PosTag::Verb,
        }
    }
}

/// 文法属性の名前
///
/// 宣言順は名前のアルファベット順と一致させています。
/// 属性集合の正規形はこの順序で整列されます。
#[derive(
    Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug, Hash,
    Archive, rkyv::Serialize, rkyv::Deserialize,
)]
#[rkyv(derive(Debug, Eq, PartialEq, Clone, Copy))]
#[repr(u8)]
pub enum Property {
    Case,
    Degree,
    Gender,
    Mood,
    Number,
    Person,
    Tense,
}

impl Property {
    /// すべての属性名
    pub const ALL: [Property; 7] = [
        Property::Case,
        Property::Degree,
        Property::Gender,
        Property::Mood,
        Property::Number,
        Property::Person,
        Property::Tense,
    ];

    /// 入力レコードで使用される属性名を返します。
    pub const fn as_str(&self) -> &'static str {
        match self {
            Property::Case => "case",
            Property::Degree => "degree",
            Property::Gender => "gender",
            Property::Mood => "mood",
            Property::Number => "number",
            Property::Person => "person",
            Property::Tense => "tense",
        }
    }

    /// 属性名からの変換。未知の名前には`None`を返します。
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(name))
            .copied()
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for Property {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl ArchivedProperty {
    /// この[`ArchivedProperty`]を対応する[`Property`]に変換します。
    pub fn to_native(&self) -> Property {
        match self {
            ArchivedProperty::Case => Property::Case,
            ArchivedProperty::Degree => Property::Degree,
            ArchivedProperty::Gender => Property::Gender,
            ArchivedProperty::Mood => Property::Mood,
            ArchivedProperty::Number => Property::Number,
            ArchivedProperty::Person => Property::Person,
            ArchivedProperty::Tense => Property::Tense,
        }
    }
}

/// 属性名と値の組
///
/// 値は`+`で連結された複数の候補を含むことがあります。
#[derive(
    Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash,
    Archive, rkyv::Serialize, rkyv::Deserialize, serde::Serialize,
)]
pub struct PropertyValue {
    pub name: Property,
    pub value: String,
}

impl PropertyValue {
    /// 新しい組を作成します。
    pub fn new<S>(name: Property, value: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            name,
            value: value.into(),
        }
    }
}

impl ArchivedPropertyValue {
    /// ネイティブ形式に変換します。
    pub fn to_native(&self) -> PropertyValue {
        PropertyValue {
            name: self.name.to_native(),
            value: self.value.as_str().to_string(),
        }
    }
}

/// 正規化された属性集合
///
/// 属性名で整列された組のリストです。等価性は正規形に対する構造的な比較で、
/// 元の挿入順序には依存しません。
#[derive(Clone, Default, Eq, PartialEq, Debug, Hash, Archive, rkyv::Serialize, rkyv::Deserialize)]
pub struct PropertySet {
    values: Vec<PropertyValue>,
}

impl PropertySet {
    /// 組のイテレータから正規形の集合を作成します。
    ///
    /// 同じ属性名が複数回現れた場合は最後の値が残ります。
    pub fn new<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Property, S)>,
        S: Into<String>,
    {
        let mut values: Vec<PropertyValue> = vec![];
        for (name, value) in pairs {
            match values.iter_mut().find(|v| v.name == name) {
                Some(v) => v.value = value.into(),
                None => values.push(PropertyValue::new(name, value)),
            }
        }
        values.sort_by_key(|v| v.name);
        Self { values }
    }

    /// 正規順の組のスライスを返します。
    #[inline(always)]
    pub fn values(&self) -> &[PropertyValue] {
        &self.values
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ArchivedPropertySet {
    /// ネイティブ形式の組のリストに変換します（アーカイブ版）。
    pub fn to_values(&self) -> Vec<PropertyValue> {
        self.values.iter().map(|v| v.to_native()).collect()
    }
}

/// 復号された単一の形態論レコード
///
/// `(見出し語, 品詞, 属性集合)` の三つ組です。
#[derive(Clone, Eq, PartialEq, Debug, serde::Serialize)]
pub struct Morphology {
    pub(crate) lemma: String,
    pub(crate) pos: PosTag,
    pub(crate) properties: Vec<PropertyValue>,
}

impl Morphology {
    /// 新しいレコードを作成します。属性は正規順に整列されます。
    pub fn new<S>(lemma: S, pos: PosTag, properties: PropertySet) -> Self
    where
        S: Into<String>,
    {
        Self {
            lemma: lemma.into(),
            pos,
            properties: properties.values,
        }
    }

    #[inline(always)]
    pub fn lemma(&self) -> &str {
        &self.lemma
    }

    #[inline(always)]
    pub const fn pos(&self) -> PosTag {
        self.pos
    }

    /// 正規順の属性を返します。
    #[inline(always)]
    pub fn properties(&self) -> &[PropertyValue] {
        &self.properties
    }

    /// 指定された属性の値を返します。
    pub fn property(&self, name: Property) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }
}

/// 1つの語形を説明する、融合した1つ以上の形態論レコード
///
/// 長さ1なら`Single`、それ以上なら`Multiple`です（例: 前置詞+冠詞の縮約形）。
/// 種別は長さから導出され、空のシーケンスから構築することはできません。
#[derive(Clone, Eq, PartialEq, Debug, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositeMorphology {
    Single(Morphology),
    Multiple(Vec<Morphology>),
}

impl CompositeMorphology {
    /// 構成要素を順に返します。
    pub fn components(&self) -> &[Morphology] {
        match self {
            CompositeMorphology::Single(m) => std::slice::from_ref(m),
            CompositeMorphology::Multiple(ms) => ms,
        }
    }

    #[inline(always)]
    pub const fn is_multiple(&self) -> bool {
        matches!(self, CompositeMorphology::Multiple(_))
    }
}

impl TryFrom<Vec<Morphology>> for CompositeMorphology {
    type Error = MorphoDictError;

    fn try_from(mut components: Vec<Morphology>) -> Result<Self> {
        match components.len() {
            0 => Err(MorphoDictError::invalid_state(
                "cannot build a composite morphology",
                "the component sequence is empty",
            )),
            1 => Ok(CompositeMorphology::Single(components.remove(0))),
            _ => Ok(CompositeMorphology::Multiple(components)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pos_tag_from_str() {
        assert_eq!("NOUN".parse::<PosTag>().unwrap(), PosTag::Noun);
        assert_eq!("prep".parse::<PosTag>().unwrap(), PosTag::Preposition);
        assert!(matches!(
            "FOO".parse::<PosTag>(),
            Err(MorphoDictError::UnknownTypeAnnotation(s)) if s == "FOO"
        ));
    }

    #[test]
    fn test_pos_tag_all_in_discriminant_order() {
        for (i, tag) in PosTag::ALL.iter().enumerate() {
            assert_eq!(*tag as usize, i);
        }
    }

    #[test]
    fn test_property_order_is_name_order() {
        let mut names: Vec<_> = Property::ALL.iter().map(|p| p.as_str()).collect();
        let original = names.clone();
        names.sort_unstable();
        assert_eq!(names, original);
    }

    #[test]
    fn test_property_set_is_canonical() {
        let a = PropertySet::new([(Property::Number, "SING"), (Property::Gender, "M")]);
        let b = PropertySet::new([(Property::Gender, "M"), (Property::Number, "SING")]);
        assert_eq!(a, b);
        assert_eq!(a.values()[0].name, Property::Gender);
        assert_eq!(a.values()[1].name, Property::Number);
    }

    #[test]
    fn test_property_set_last_value_wins() {
        let set = PropertySet::new([(Property::Number, "SING"), (Property::Number, "PL")]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.values()[0].value, "PL");
    }

    #[test]
    fn test_composite_kind_is_derived() {
        let m = Morphology::new("di", PosTag::Preposition, PropertySet::default());
        let single = CompositeMorphology::try_from(vec![m.clone()]).unwrap();
        assert!(!single.is_multiple());
        assert_eq!(single.components().len(), 1);

        let art = Morphology::new(
            "il",
            PosTag::Article,
            PropertySet::new([(Property::Gender, "M")]),
        );
        let multiple = CompositeMorphology::try_from(vec![m, art]).unwrap();
        assert!(multiple.is_multiple());
        assert_eq!(multiple.components()[1].property(Property::Gender), Some("M"));

        assert!(CompositeMorphology::try_from(vec![]).is_err());
    }
}
