//! 検索結果のコンテナ

use crate::morphology::CompositeMorphology;

/// [`Dictionary::get`](crate::Dictionary::get)の結果
///
/// 要求された語形(小文字化前)と、展開済みの形態論情報を保持します。
/// 多語表現の場合は語のリストも保持します。
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Entry {
    form: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    words: Option<Vec<String>>,
    morphologies: Vec<CompositeMorphology>,
}

impl Entry {
    pub(crate) fn new(form: &str, morphologies: Vec<CompositeMorphology>) -> Self {
        let words: Vec<_> = form.split_whitespace().map(str::to_string).collect();
        let words = (words.len() > 1).then_some(words);
        Self {
            form: form.to_string(),
            words,
            morphologies,
        }
    }

    /// 要求された語形
    #[inline(always)]
    pub fn form(&self) -> &str {
        &self.form
    }

    /// 多語表現を構成する語。単語の場合は`None`です。
    #[inline(always)]
    pub fn words(&self) -> Option<&[String]> {
        self.words.as_deref()
    }

    #[inline(always)]
    pub fn morphologies(&self) -> &[CompositeMorphology] {
        &self.morphologies
    }

    #[inline(always)]
    pub fn into_morphologies(self) -> Vec<CompositeMorphology> {
        self.morphologies
    }

    #[inline(always)]
    pub fn is_multiword(&self) -> bool {
        self.words.is_some()
    }
}
