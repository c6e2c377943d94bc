//! 圧縮された複数値属性の展開
//!
//! 属性値は `SING+PL` のように複数の候補を1つの注釈にまとめていることがあります。
//! このモジュールは、そのようなグループを具体的なグループの直積に展開します。

use crate::morphology::Morphology;

/// 属性値の候補区切り
pub const ALTERNATIVE_SEPARATOR: char = '+';

/// グループを具体的なグループのリストに展開します。
///
/// 構成要素の順、次に各構成要素の属性の順に走査し、最初に見つかった
/// 複数候補の値について、候補ごとにその値だけを置き換えたコピーを作って再帰します。
/// 出力は深さ優先で (構成要素の位置, 属性の位置, 候補の順) に並びます。
///
/// 候補数 `n1..nk` の独立した複数値属性を持つグループは、
/// ちょうど `n1 * ... * nk` 個のグループに展開されます。
pub fn explode(group: Vec<Morphology>) -> Vec<Vec<Morphology>> {
    let mut out = vec![];
    explode_into(group, &mut out);
    out
}

fn explode_into(group: Vec<Morphology>, out: &mut Vec<Vec<Morphology>>) {
    let Some((c, p)) = first_alternative(&group) else {
        out.push(group);
        return;
    };
    let value = group[c].properties[p].value.clone();
    for alternative in value.split(ALTERNATIVE_SEPARATOR) {
        let mut concrete = group.clone();
        concrete[c].properties[p].value = alternative.to_string();
        explode_into(concrete, out);
    }
}

fn first_alternative(group: &[Morphology]) -> Option<(usize, usize)> {
    group.iter().enumerate().find_map(|(c, m)| {
        m.properties
            .iter()
            .position(|p| p.value.contains(ALTERNATIVE_SEPARATOR))
            .map(|p| (c, p))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morphology::{PosTag, Property, PropertySet};

    fn noun(number: &str, gender: &str) -> Morphology {
        Morphology::new(
            "x",
            PosTag::Noun,
            PropertySet::new([(Property::Number, number), (Property::Gender, gender)]),
        )
    }

    fn values(group: &[Morphology]) -> Vec<Vec<&str>> {
        group
            .iter()
            .map(|m| m.properties().iter().map(|p| p.value.as_str()).collect())
            .collect()
    }

    #[test]
    fn test_concrete_group_is_its_own_output() {
        let group = vec![noun("SING", "M")];
        assert_eq!(explode(group.clone()), vec![group]);
    }

    #[test]
    fn test_single_property_alternatives_in_order() {
        let out = explode(vec![noun("SING+PL", "M")]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0][0].property(Property::Number), Some("SING"));
        assert_eq!(out[1][0].property(Property::Number), Some("PL"));
    }

    #[test]
    fn test_depth_first_order() {
        // Properties are in canonical order: gender before number.
        let out = explode(vec![noun("SING+PL", "M+F")]);
        let got: Vec<_> = out.iter().map(|g| values(g)).collect();
        assert_eq!(
            got,
            vec![
                vec![vec!["M", "SING"]],
                vec![vec!["M", "PL"]],
                vec![vec!["F", "SING"]],
                vec![vec!["F", "PL"]],
            ]
        );
    }

    #[test]
    fn test_product_across_components() {
        let prep = Morphology::new("di", PosTag::Preposition, PropertySet::default());
        let art = Morphology::new(
            "il",
            PosTag::Article,
            PropertySet::new([
                (Property::Gender, "M+F"),
                (Property::Number, "SING+PL"),
                (Property::Case, "NOM+ACC+DAT"),
            ]),
        );
        let out = explode(vec![prep, art]);
        assert_eq!(out.len(), 2 * 2 * 3);
        for group in &out {
            assert_eq!(group.len(), 2);
            assert_eq!(group[0].lemma(), "di");
            for m in group {
                assert!(m.properties().iter().all(|p| !p.value.contains('+')));
            }
        }
        // First alternative of the first property (case) varies slowest.
        assert_eq!(out[0][1].property(Property::Case), Some("NOM"));
        assert_eq!(out[3][1].property(Property::Case), Some("NOM"));
        assert_eq!(out[4][1].property(Property::Case), Some("ACC"));
    }
}
