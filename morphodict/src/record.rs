//! 入力レコードの読み込み
//!
//! 辞書の元データは1行1レコードのJSON Linesです。
//!
//! ```text
//! {"form": "gatti", "morpho": [{"type": "NOUN", "lemma": "gatto", "properties": {"number": "PL", "gender": "M"}}]}
//! {"form": ["a", "priori"], "morpho": [{"type": "ADV", "lemma": "a priori"}]}
//! {"form": "del", "morpho": [[{"type": "PREP", "lemma": "di"}, {"type": "ART", "lemma": "il", "properties": {"gender": "M", "number": "SING"}}]]}
//! ```
//!
//! `morpho`の各要素は1つの形態論オブジェクト、または融合した複数のオブジェクトの配列です。

use std::collections::BTreeMap;
use std::io::BufRead;

use serde::Deserialize;

use crate::dictionary::word_map::{WORD_SEPARATOR, normalize_key};
use crate::errors::{MorphoDictError, Result};
use crate::morphology::{Property, PropertySet};

/// 語形。単語は文字列、多語表現は語のリストで与えます。
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Form {
    Single(String),
    Multi(Vec<String>),
}

impl Form {
    /// 正規化した辞書キーを返します。
    ///
    /// 多語表現の語は区切り文字で連結されます。どちらの形でも余分な空白は
    /// 取り除かれるため、空の語を含むキーは作られません。
    pub fn key(&self) -> String {
        match self {
            Form::Single(form) => normalize_key(form),
            Form::Multi(words) => normalize_key(&words.join(&WORD_SEPARATOR.to_string())),
        }
    }
}

/// 形態論オブジェクトの1つの構成要素
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RawComponent {
    /// 品詞の注釈文字列
    #[serde(rename = "type")]
    pub pos: String,
    pub lemma: String,
    /// 属性名から値への対応。`null`は属性なしとして扱います。
    #[serde(default)]
    pub properties: BTreeMap<String, Option<String>>,
}

impl RawComponent {
    /// 正規化された属性集合を返します。
    ///
    /// 値が`null`の属性は無視し、未知の属性名は警告を出して読み飛ばします。
    pub fn property_set(&self) -> PropertySet {
        PropertySet::new(self.properties.iter().filter_map(|(name, value)| {
            let value = value.as_deref()?;
            match Property::from_name(name) {
                Some(property) => Some((property, value)),
                None => {
                    log::warn!(
                        "Skipping unknown property {name:?} of lemma {:?}",
                        self.lemma
                    );
                    None
                }
            }
        }))
    }
}

/// 1つの形態論オブジェクト
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawMorphology {
    Single(RawComponent),
    Fused(Vec<RawComponent>),
}

impl RawMorphology {
    /// 構成要素を順に返します。
    pub fn components(&self) -> &[RawComponent] {
        match self {
            RawMorphology::Single(c) => std::slice::from_ref(c),
            RawMorphology::Fused(cs) => cs,
        }
    }
}

/// 1つの入力レコード
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RawRecord {
    pub form: Form,
    #[serde(default)]
    pub morpho: Vec<RawMorphology>,
}

impl RawRecord {
    /// 1行のJSONからレコードを解析します。
    ///
    /// # エラー
    ///
    /// JSONが不正な場合や、構成要素のない融合オブジェクトを含む場合にエラーを返します。
    pub fn from_json(line: &str) -> Result<Self> {
        let record: Self = serde_json::from_str(line)?;
        record.validate()?;
        Ok(record)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.morpho.iter().any(|m| m.components().is_empty()) {
            return Err(MorphoDictError::invalid_format(
                "record",
                format!("{:?} has a morphology object without components", self.form),
            ));
        }
        Ok(())
    }
}

/// JSON Linesのレコードを順に読み出すイテレータ
///
/// 空行は読み飛ばします。エラーには1始まりの行番号が付きます。
pub struct RecordReader<R> {
    rdr: R,
    line_no: usize,
    buf: String,
}

impl<R> RecordReader<R>
where
    R: BufRead,
{
    pub fn new(rdr: R) -> Self {
        Self {
            rdr,
            line_no: 0,
            buf: String::new(),
        }
    }

    /// 直前に読んだ行の番号
    #[inline(always)]
    pub const fn line_no(&self) -> usize {
        self.line_no
    }
}

impl<R> Iterator for RecordReader<R>
where
    R: BufRead,
{
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.rdr.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => self.line_no += 1,
                Err(e) => return Some(Err(e.into())),
            }
            let line = self.buf.trim();
            if line.is_empty() {
                continue;
            }
            return Some(RawRecord::from_json(line).map_err(|e| {
                MorphoDictError::invalid_format("record", format!("line {}: {e}", self.line_no))
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_and_multi_form() {
        let r = RawRecord::from_json(r#"{"form": "Gatto", "morpho": []}"#).unwrap();
        assert_eq!(r.form.key(), "gatto");
        let r = RawRecord::from_json(r#"{"form": ["A", "Priori"], "morpho": []}"#).unwrap();
        assert_eq!(r.form.key(), "a priori");
    }

    #[test]
    fn test_stray_spaces_do_not_make_empty_words() {
        let r = RawRecord::from_json(r#"{"form": " cat", "morpho": []}"#).unwrap();
        assert_eq!(r.form.key(), "cat");
        let r = RawRecord::from_json(r#"{"form": "per  se ", "morpho": []}"#).unwrap();
        assert_eq!(r.form.key(), "per se");
        let r = RawRecord::from_json(r#"{"form": ["a", "", " priori"], "morpho": []}"#).unwrap();
        assert_eq!(r.form.key(), "a priori");
    }

    #[test]
    fn test_fused_morphology() {
        let r = RawRecord::from_json(
            r#"{"form": "del", "morpho": [[{"type": "PREP", "lemma": "di"}, {"type": "ART", "lemma": "il"}]]}"#,
        )
        .unwrap();
        assert_eq!(r.morpho.len(), 1);
        let components = r.morpho[0].components();
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].pos, "PREP");
        assert_eq!(components[1].lemma, "il");
    }

    #[test]
    fn test_empty_fused_morphology_is_rejected() {
        let result = RawRecord::from_json(r#"{"form": "x", "morpho": [[]]}"#);
        assert!(matches!(result, Err(MorphoDictError::InvalidFormat(_))));
    }

    #[test]
    fn test_property_set_skips_null_and_unknown() {
        let r = RawRecord::from_json(
            r#"{"form": "x", "morpho": [{"type": "NOUN", "lemma": "x", "properties": {"number": "SING", "gender": null, "colour": "red"}}]}"#,
        )
        .unwrap();
        let set = r.morpho[0].components()[0].property_set();
        assert_eq!(set, PropertySet::new([(Property::Number, "SING")]));
    }

    #[test]
    fn test_reader_skips_blank_lines() {
        let input = "\n{\"form\": \"a\"}\n   \n{\"form\": \"b\"}\n";
        let forms: Vec<_> = RecordReader::new(input.as_bytes())
            .map(|r| r.unwrap().form.key())
            .collect();
        assert_eq!(forms, vec!["a", "b"]);
    }

    #[test]
    fn test_reader_reports_line_number() {
        let input = "{\"form\": \"a\"}\n\n{\"form\": \n";
        let mut reader = RecordReader::new(input.as_bytes());
        assert!(reader.next().unwrap().is_ok());
        match reader.next().unwrap() {
            Err(MorphoDictError::InvalidFormat(e)) => assert!(e.message().starts_with("line 3:")),
            _ => panic!("expected a format error"),
        }
        assert!(reader.next().is_none());
    }
}
