//! アクセント表記ゆれのエイリアス生成
//!
//! 正規キーの各語に置換規則を適用し、別表記のキーを正規キーへの参照として追加します。

use std::io::{BufRead, BufReader, Read};

use regex::Regex;

use crate::dictionary::config::PresetAccentRules;
use crate::dictionary::word_map::{WORD_SEPARATOR, WordMapBuilder};
use crate::errors::{MorphoDictError, Result};
use crate::utils;

/// 1つの置換規則
#[derive(Clone, Debug)]
pub struct AccentRule {
    pattern: Regex,
    replacement: String,
}

impl AccentRule {
    /// 新しい規則を作成します。
    ///
    /// # エラー
    ///
    /// パターンが正規表現として不正な場合にエラーを返します。
    pub fn new<S>(pattern: &str, replacement: S) -> Result<Self>
    where
        S: Into<String>,
    {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            replacement: replacement.into(),
        })
    }

    /// 語に規則を適用します。マッチしない場合は`None`を返します。
    pub fn apply(&self, word: &str) -> Option<String> {
        self.pattern
            .is_match(word)
            .then(|| self.pattern.replace_all(word, self.replacement.as_str()).into_owned())
    }

    #[inline(always)]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    #[inline(always)]
    pub fn replacement(&self) -> &str {
        &self.replacement
    }
}

/// 言語ごとの順序付き置換規則のリスト
#[derive(Clone, Debug, Default)]
pub struct AccentRules {
    rules: Vec<AccentRule>,
}

impl AccentRules {
    /// `(パターン, 置換文字列)` の組から規則リストを作成します。
    pub fn new<I, P, R>(rules: I) -> Result<Self>
    where
        I: IntoIterator<Item = (P, R)>,
        P: AsRef<str>,
        R: Into<String>,
    {
        let rules = rules
            .into_iter()
            .map(|(p, r)| AccentRule::new(p.as_ref(), r))
            .collect::<Result<_>>()?;
        Ok(Self { rules })
    }

    /// 言語コードに対応するプリセット規則を読み込みます。
    ///
    /// # エラー
    ///
    /// 未知の言語コードの場合に [`MorphoDictError::InvalidArgument`] を返します。
    pub fn for_language(code: &str) -> Result<Self> {
        Self::new(PresetAccentRules::from_code(code)?.rules().iter().copied())
    }

    /// `pattern,replacement` 形式のCSVから規則を読み込みます。
    ///
    /// 空行と`#`で始まる行は無視されます。
    ///
    /// # エラー
    ///
    /// 行のフィールド数が2でない場合や、パターンが不正な場合にエラーを返します。
    pub fn from_reader<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let reader = BufReader::new(rdr);
        let mut rules = vec![];
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields = utils::parse_csv_row(line)?;
            if let [pattern, replacement] = fields.as_slice() {
                rules.push(AccentRule::new(pattern, replacement.as_str())?);
            } else {
                let msg = format!(
                    "line {}: the format must be pattern,replacement, {line}",
                    i + 1
                );
                return Err(MorphoDictError::invalid_format("accent rules", msg));
            }
        }
        Ok(Self { rules })
    }

    #[inline(always)]
    pub fn rules(&self) -> &[AccentRule] {
        &self.rules
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// キーのすべての別表記を生成順に返します。元のキーは含みません。
    ///
    /// 語の位置ごとに、それまでに得られたすべての候補(元のキーを含む)を土台として、
    /// その位置の語にマッチする規則ごとに1つずつ候補を追加します。
    pub fn variants(&self, key: &str) -> Vec<String> {
        let words: Vec<&str> = key.split(WORD_SEPARATOR).collect();
        let mut candidates: Vec<Vec<String>> =
            vec![words.iter().map(|w| w.to_string()).collect()];
        for pos in 0..words.len() {
            let mut added = vec![];
            for candidate in &candidates {
                for rule in &self.rules {
                    if let Some(replaced) = rule.apply(&candidate[pos]) {
                        let mut variant = candidate.clone();
                        variant[pos] = replaced;
                        added.push(variant);
                    }
                }
            }
            candidates.extend(added);
        }
        let separator = WORD_SEPARATOR.to_string();
        candidates
            .into_iter()
            .skip(1)
            .map(|words| words.join(&separator))
            .collect()
    }
}

/// 正規キーの別表記を参照として追加し、追加した数を返します。
///
/// 対象は変更前に取得した参照でないキーです。既に存在するキーは上書きしません。
pub fn alias(words: &mut WordMapBuilder, rules: &AccentRules) -> Result<usize> {
    if rules.is_empty() {
        return Ok(0);
    }
    let mut added = 0;
    for key in words.canonical_keys() {
        for variant in rules.variants(&key) {
            if words.insert_reference(&variant, &key)? {
                log::debug!("Alias {variant:?} -> {key:?}");
                added += 1;
            }
        }
    }
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::codec::EncodedMorphology;

    fn italian() -> AccentRules {
        AccentRules::for_language("it").unwrap()
    }

    fn code() -> EncodedMorphology {
        EncodedMorphology::new(0, 0, 0).unwrap()
    }

    #[test]
    fn test_variants_single_word() {
        assert_eq!(italian().variants("caffè"), vec!["caffe'".to_string()]);
        assert!(italian().variants("gatto").is_empty());
    }

    #[test]
    fn test_variants_are_cumulative_across_positions() {
        let variants = italian().variants("perché più");
        assert_eq!(
            variants,
            vec![
                "perche' più".to_string(),
                "perché piu'".to_string(),
                "perche' piu'".to_string(),
            ]
        );
    }

    #[test]
    fn test_each_matching_rule_is_one_candidate() {
        let rules = AccentRules::new([("è$", "e'"), ("è", "e")]).unwrap();
        assert_eq!(
            rules.variants("tè"),
            vec!["te'".to_string(), "te".to_string()]
        );
    }

    #[test]
    fn test_alias_inserts_references() {
        let mut words = WordMapBuilder::new();
        words.push_group("caffè", vec![code()]).unwrap();
        words.push_group("città", vec![code()]).unwrap();
        words.push_group("citta'", vec![code()]).unwrap();

        let added = alias(&mut words, &italian()).unwrap();
        assert_eq!(added, 1);
        assert!(words.is_reference("caffe'"));
        assert!(!words.is_reference("citta'"));

        // Running again adds nothing: references are not aliased further.
        assert_eq!(alias(&mut words, &italian()).unwrap(), 0);
    }

    #[test]
    fn test_from_reader() {
        let csv = "# accents\nà$,a'\n\n\"(x|y)$\",z\n";
        let rules = AccentRules::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.rules()[1].pattern(), "(x|y)$");
        assert_eq!(rules.rules()[1].replacement(), "z");

        assert!(AccentRules::from_reader("à$\n".as_bytes()).is_err());
        assert!(AccentRules::from_reader("(,a\n".as_bytes()).is_err());
    }
}
