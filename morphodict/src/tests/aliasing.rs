use crate::dictionary::{AccentRules, Dictionary, DictionaryBuilder};
use crate::record::RecordReader;

use super::corpus::italian;

const CORPUS: &str = include_str!("./resources/corpus.jsonl");
const ACCENTS: &str = include_str!("./resources/accents.csv");

/// エイリアスは元の語形と要素ごとに等しい結果を返す
#[test]
fn test_alias_equivalence() {
    let dict = italian();
    let pairs = [
        ("caffe'", "caffè"),
        ("citta'", "città"),
        ("e'", "è"),
        ("perche' no", "perché no"),
        ("di piu'", "di più"),
        ("piu' o meno", "più o meno"),
    ];
    for (alias, canonical) in pairs {
        assert!(dict.is_alias(alias), "{alias}");
        assert!(!dict.is_alias(canonical), "{canonical}");
        let a = dict.get(alias).unwrap().unwrap();
        let c = dict.get(canonical).unwrap().unwrap();
        assert_eq!(a.morphologies(), c.morphologies(), "{alias}");
        assert_eq!(a.form(), alias);
        assert_eq!(
            dict.group_count(alias).unwrap(),
            dict.group_count(canonical).unwrap()
        );
    }
}

/// アクセントのない語形にはエイリアスが作られない
#[test]
fn test_unaccented_forms_have_no_alias() {
    let dict = italian();
    assert!(!dict.is_alias("gatto"));
    assert!(dict.get("gatto'").unwrap().is_none());
}

/// CSVファイルで与えた規則
#[test]
fn test_rules_from_csv() {
    let rules = AccentRules::from_reader(ACCENTS.as_bytes()).unwrap();
    assert_eq!(rules.len(), 2);

    let mut builder = DictionaryBuilder::new().unwrap();
    builder.add_records(RecordReader::new(CORPUS.as_bytes())).unwrap();
    assert_eq!(builder.alias(&rules).unwrap(), 3);
    let dict = Dictionary::from_inner(builder.build().unwrap());

    assert!(dict.is_alias("caffe'"));
    assert!(dict.is_alias("citt_"));
    assert!(dict.is_alias("e'"));
    assert!(dict.get("perche' no").unwrap().is_none());
    assert_eq!(dict.multiword_count(), 5);
}

/// エイリアス生成を行わない場合
#[test]
fn test_without_aliasing() {
    let dict = Dictionary::from_inner(
        DictionaryBuilder::from_reader(CORPUS.as_bytes(), None).unwrap(),
    );
    assert_eq!(dict.alias_count(), 0);
    assert!(dict.get("caffe'").unwrap().is_none());
    assert_eq!(dict.inner().num_phrases(), 5);
}
