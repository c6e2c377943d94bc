use crate::dictionary::{Dictionary, DictionaryBuilder};
use crate::morphology::{PosTag, Property};

const CORPUS: &str = include_str!("./resources/corpus.jsonl");

pub(super) fn italian() -> Dictionary {
    Dictionary::from_inner(DictionaryBuilder::from_reader(CORPUS.as_bytes(), Some("it")).unwrap())
}

/// コーパス全体の件数の検証
#[test]
fn test_counts() {
    let dict = italian();
    assert_eq!(dict.size(), 12);
    assert_eq!(dict.alias_count(), 6);
    assert_eq!(dict.multiword_count(), 5);
    assert_eq!(dict.inner().num_keys(), 18);
    assert_eq!(dict.inner().num_phrases(), 8);
}

/// 複数の形態論オブジェクトを持つレコード
#[test]
fn test_one_group_per_object() {
    let dict = italian();
    assert_eq!(dict.group_count("è").unwrap(), Some(2));
    let entry = dict.get("È").unwrap().unwrap();
    let tags: Vec<_> = entry
        .morphologies()
        .iter()
        .map(|c| c.components()[0].pos())
        .collect();
    assert_eq!(tags, vec![PosTag::Auxiliary, PosTag::Verb]);
}

/// 同じ語形の別レコードは別のグループになる
#[test]
fn test_records_sharing_a_form() {
    let dict = italian();
    assert_eq!(dict.group_count("la").unwrap(), Some(2));
    let entry = dict.get("la").unwrap().unwrap();
    let m = &entry.morphologies()[1].components()[0];
    assert_eq!(m.lemma(), "lo");
    assert_eq!(m.property(Property::Case), Some("ACC"));
    assert_eq!(m.property(Property::Person), Some("3"));
}

/// 見出し語は重複排除されても正しく復号される
#[test]
fn test_shared_lemma() {
    let dict = italian();
    let sing = dict.get("gatto").unwrap().unwrap();
    let plur = dict.get("gatti").unwrap().unwrap();
    assert_eq!(sing.morphologies()[0].components()[0].lemma(), "gatto");
    assert_eq!(plur.morphologies()[0].components()[0].lemma(), "gatto");
    assert_eq!(
        plur.morphologies()[0].components()[0].property(Property::Number),
        Some("PL")
    );
    assert_eq!(dict.inner().num_lemmas(), 12);
}

/// 展開後に複数値の表記が残らない
#[test]
fn test_no_alternatives_survive_lookup() {
    let dict = italian();
    for key in dict.inner().keys() {
        let entry = dict.get(key).unwrap().unwrap();
        for c in entry.morphologies() {
            for m in c.components() {
                assert!(m.properties().iter().all(|p| !p.value.contains('+')), "{key}");
            }
        }
    }
}
