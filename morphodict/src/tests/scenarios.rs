use crate::dictionary::{AccentRules, Dictionary, DictionaryBuilder};
use crate::errors::MorphoDictError;
use crate::morphology::{CompositeMorphology, PosTag, Property};

fn build(corpus: &str) -> Dictionary {
    Dictionary::from_inner(DictionaryBuilder::from_reader(corpus.as_bytes(), None).unwrap())
}

#[test]
fn test_single_noun() {
    let dict = build(
        r#"{"form": "cat", "morpho": [{"type": "NOUN", "lemma": "cat", "properties": {"number": "SING"}}]}"#,
    );
    let entry = dict.get("cat").unwrap().unwrap();
    assert_eq!(entry.form(), "cat");
    assert_eq!(entry.words(), None);

    let morphologies = entry.morphologies();
    assert_eq!(morphologies.len(), 1);
    let CompositeMorphology::Single(m) = &morphologies[0] else {
        panic!("expected a single morphology");
    };
    assert_eq!(m.lemma(), "cat");
    assert_eq!(m.pos(), PosTag::Noun);
    assert_eq!(m.properties().len(), 1);
    assert_eq!(m.property(Property::Number), Some("SING"));
}

#[test]
fn test_alternatives_expand_in_order() {
    let dict = build(
        r#"{"form": "cat", "morpho": [{"type": "NOUN", "lemma": "cat", "properties": {"number": "SING+PL"}}]}"#,
    );
    let entry = dict.get("cat").unwrap().unwrap();
    let numbers: Vec<_> = entry
        .morphologies()
        .iter()
        .map(|c| {
            assert!(!c.is_multiple());
            c.components()[0].property(Property::Number)
        })
        .collect();
    assert_eq!(numbers, vec![Some("SING"), Some("PL")]);
}

#[test]
fn test_same_key_groups_are_not_merged() {
    let dict = build(
        "{\"form\": \"x\", \"morpho\": [{\"type\": \"NOUN\", \"lemma\": \"x\"}]}\n\
         {\"form\": \"x\", \"morpho\": [{\"type\": \"NOUN\", \"lemma\": \"x\"}]}\n",
    );
    assert_eq!(dict.group_count("x").unwrap(), Some(2));
    assert_eq!(dict.size(), 1);
    // Identical groups are kept side by side.
    let entry = dict.get("x").unwrap().unwrap();
    assert_eq!(entry.morphologies()[0], entry.morphologies()[1]);
}

#[test]
fn test_accent_rule_creates_reference() {
    let mut builder = DictionaryBuilder::new().unwrap();
    builder
        .add_records(crate::record::RecordReader::new(
            r#"{"form": "caffè", "morpho": [{"type": "NOUN", "lemma": "caffè", "properties": {"number": "SING"}}]}"#
                .as_bytes(),
        ))
        .unwrap();
    let rules = AccentRules::new([("è", "e'")]).unwrap();
    assert_eq!(builder.alias(&rules).unwrap(), 1);
    let dict = Dictionary::from_inner(builder.build().unwrap());

    assert!(dict.is_alias("caffe'"));
    assert!(!dict.is_alias("caffè"));
    assert_eq!(dict.alias_count(), 1);
    assert_eq!(dict.size(), 1);
    assert_eq!(
        dict.get("caffe'").unwrap().unwrap().morphologies(),
        dict.get("caffè").unwrap().unwrap().morphologies()
    );
}

#[test]
fn test_lookup_is_case_insensitive() {
    let dict = build(
        r#"{"form": "Cat", "morpho": [{"type": "NOUN", "lemma": "cat", "properties": {"number": "SING"}}]}"#,
    );
    let lower = dict.get("cat").unwrap().unwrap();
    let title = dict.get("Cat").unwrap().unwrap();
    let upper = dict.get("CAT").unwrap().unwrap();
    assert_eq!(lower.morphologies(), title.morphologies());
    assert_eq!(lower.morphologies(), upper.morphologies());
    // The requested form is kept as given.
    assert_eq!(upper.form(), "CAT");
}

#[test]
fn test_unknown_form_is_none() {
    let dict = build(r#"{"form": "cat", "morpho": [{"type": "NOUN", "lemma": "cat"}]}"#);
    assert!(dict.get("dog").unwrap().is_none());
    assert_eq!(dict.group_count("dog").unwrap(), None);
    assert!(!dict.is_alias("dog"));
}

#[test]
fn test_fused_components_form_a_multiple() {
    let dict = build(
        r#"{"form": "del", "morpho": [[{"type": "PREP", "lemma": "di"}, {"type": "ART", "lemma": "il", "properties": {"gender": "M", "number": "SING+PL"}}]]}"#,
    );
    let entry = dict.get("del").unwrap().unwrap();
    assert_eq!(entry.morphologies().len(), 2);
    for (c, number) in entry.morphologies().iter().zip(["SING", "PL"]) {
        assert!(c.is_multiple());
        let components = c.components();
        assert_eq!(components[0].pos(), PosTag::Preposition);
        assert_eq!(components[0].lemma(), "di");
        assert_eq!(components[1].pos(), PosTag::Article);
        assert_eq!(components[1].property(Property::Number), Some(number));
    }
}

#[test]
fn test_multiword_entry_keeps_words() {
    let dict = build(r#"{"form": ["A", "Priori"], "morpho": [{"type": "ADV", "lemma": "a priori"}]}"#);
    let entry = dict.get("A priori").unwrap().unwrap();
    assert!(entry.is_multiword());
    assert_eq!(
        entry.words(),
        Some(&["A".to_string(), "priori".to_string()][..])
    );
    assert_eq!(entry.morphologies()[0].components()[0].lemma(), "a priori");
}

#[test]
fn test_record_without_morphology() {
    let dict = build(r#"{"form": "vuoto"}"#);
    assert_eq!(dict.size(), 1);
    let entry = dict.get("vuoto").unwrap().unwrap();
    assert!(entry.morphologies().is_empty());
}

#[test]
fn test_unknown_type_annotation() {
    let result = DictionaryBuilder::from_reader(
        r#"{"form": "x", "morpho": [{"type": "GERUNDIVE", "lemma": "x"}]}"#.as_bytes(),
        None,
    );
    assert!(matches!(result, Err(MorphoDictError::UnknownTypeAnnotation(_))));
}
