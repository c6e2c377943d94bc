//! プリセットのアクセント規則
//!
//! このモジュールは、手動設定なしで使用できる言語別のアクセント規則を定義します。

use std::fmt;
use std::str::FromStr;

use crate::errors::{MorphoDictError, Result};

/// 手動設定なしで使用できるアクセント規則の種類を表します。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetAccentRules {
    /// イタリア語: 語末のアクセント付き母音をアポストロフィ表記に置き換えます。
    Italian,
}

impl PresetAccentRules {
    /// すべてのプリセット
    pub const ALL: [PresetAccentRules; 1] = [PresetAccentRules::Italian];

    /// 言語コードからプリセットを得ます。
    ///
    /// # エラー
    ///
    /// 未知の言語コードの場合に [`MorphoDictError::InvalidArgument`] を返します。
    pub fn from_code(code: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .find(|p| p.code().eq_ignore_ascii_case(code.trim()))
            .copied()
            .ok_or_else(|| {
                MorphoDictError::invalid_argument(
                    "language",
                    format!("no accent rules are defined for {code:?}"),
                )
            })
    }

    /// 言語コード
    pub const fn code(&self) -> &'static str {
        match self {
            PresetAccentRules::Italian => "it",
        }
    }

    /// `(パターン, 置換文字列)` の順序付きリスト
    pub const fn rules(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            PresetAccentRules::Italian => ITALIAN,
        }
    }
}

impl FromStr for PresetAccentRules {
    type Err = MorphoDictError;

    fn from_str(code: &str) -> Result<Self> {
        Self::from_code(code)
    }
}

impl fmt::Display for PresetAccentRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

const ITALIAN: &[(&str, &str)] = &[
    ("à$", "a'"),
    ("è$", "e'"),
    ("é$", "e'"),
    ("ì$", "i'"),
    ("ò$", "o'"),
    ("ù$", "u'"),
];
