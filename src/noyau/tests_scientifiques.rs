//! Tests scientifiques (campagne) : invariants + propriétés + limites contrôlées.
//!
//! - propriétés (proptest) : commutativité des opérations du menu,
//!   équivalence des alias de saisie (×, ÷, ^)
//! - valeurs de référence : trig exacte, racines, géométrie
//! - stress borné : budget temps global, profondeur modérée

use std::time::{Duration, Instant};

use proptest::prelude::*;

use super::calcul::Calculatrice;
use super::erreur::CalcError;
use super::eval::{analyser, evaluer_expression};

fn exact(expr: &str) -> String {
    evaluer_expression(expr, &[], 30)
        .unwrap_or_else(|e| panic!("expr={expr:?} err={e}"))
        .expr
        .to_string()
}

/// Résultat ou message d'erreur : deux saisies équivalentes doivent donner la même chose.
fn issue(expr: &str) -> String {
    match evaluer_expression(expr, &[], 20) {
        Ok(ev) => ev.expr.to_string(),
        Err(e) => format!("erreur: {e}"),
    }
}

fn assert_indefini(expr: &str) {
    let e = evaluer_expression(expr, &[], 30).unwrap_err();
    assert!(
        matches!(e, CalcError::Indefini { .. }),
        "expr={expr:?} err={e}"
    );
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

fn fraction() -> impl Strategy<Value = String> {
    (-500_i64..500, 1_i64..60).prop_map(|(n, d)| format!("{n}/{d}"))
}

/* ------------------------ Propriétés ------------------------ */

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_addition_commutative(a in fraction(), b in fraction()) {
        let mut calc = Calculatrice::default();
        let ab = calc.ajouter(&a, &b).unwrap().to_string();
        let ba = calc.ajouter(&b, &a).unwrap().to_string();
        prop_assert_eq!(ab, ba);
        prop_assert_eq!(calc.operations(), 2);
    }

    #[test]
    fn prop_multiplication_commutative(a in fraction(), b in fraction()) {
        let mut calc = Calculatrice::default();
        let ab = calc.multiplier(&a, &b).unwrap().to_string();
        let ba = calc.multiplier(&b, &a).unwrap().to_string();
        prop_assert_eq!(ab, ba);
    }

    #[test]
    fn prop_soustraction_inverse_addition(a in fraction(), b in fraction()) {
        let mut calc = Calculatrice::default();
        let somme = calc.ajouter(&a, &b).unwrap().to_string();
        let retour = calc.soustraire(&somme, &b).unwrap().to_string();
        prop_assert_eq!(retour, exact(&a));
    }

    #[test]
    fn prop_alias_de_saisie(a in -40_i64..40, b in 1_i64..40, k in 0_u32..6) {
        prop_assert_eq!(issue(&format!("{a}×{b}")), issue(&format!("{a}*{b}")));
        prop_assert_eq!(issue(&format!("{a}÷{b}")), issue(&format!("{a}/{b}")));
        prop_assert_eq!(issue(&format!("({a})^{k}")), issue(&format!("({a})**{k}")));
    }
}

/* ------------------------ Opérations du menu ------------------------ */

#[test]
fn sci_division_par_zero() {
    let mut calc = Calculatrice::default();
    let e = calc.diviser("1", "0").unwrap_err();
    assert!(matches!(e, CalcError::DivisionParZero));
    assert_eq!(calc.operations(), 0);
}

#[test]
fn sci_zero_puissance_zero() {
    let mut calc = Calculatrice::default();
    let e = calc.puissance("0", "0").unwrap_err();
    assert!(e.to_string().contains("0^0"), "{e}");
}

#[test]
fn sci_puissances_de_deux() {
    let mut calc = Calculatrice::default();
    assert_eq!(calc.puissance("2", "10").unwrap().to_string(), "1024");
    assert_eq!(calc.puissance("2", "-2").unwrap().to_string(), "1/4");
    assert_eq!(calc.operations(), 2);
}

#[test]
fn sci_quadratique_racines_entieres() {
    let mut calc = Calculatrice::default();
    let (x1, x2) = calc.quadratique("1", "-3", "2").unwrap();
    let mut racines = vec![x1.to_string(), x2.to_string()];
    racines.sort();
    assert_eq!(racines, ["1", "2"]);
}

#[test]
fn sci_aire_du_cercle() {
    let mut calc = Calculatrice::default();
    let params = vec![("radius".to_string(), "2".to_string())];
    let r = calc.geometrie("circle_area", &params).unwrap();
    assert_eq!(r.valeur.to_string(), "4*pi");
}

#[test]
fn sci_liste_noire() {
    for saisie in ["__import__('os')", "eval(1)", "1; 2", "LAMBDA x: x"] {
        let e = analyser(saisie).unwrap_err();
        assert!(
            matches!(e, CalcError::MotifInterdit { .. }),
            "saisie={saisie:?} err={e}"
        );
    }
}

/* ------------------------ Invariants trig (angles spéciaux) ------------------------ */

#[test]
fn sci_indefinis_tan() {
    assert_indefini("tan(pi/2)");
    assert_indefini("tan(3*pi/2)");
    assert_indefini("tan(-pi/2)");
}

#[test]
fn sci_identites_symetrie() {
    // sin(-x) = -sin(x)
    assert_eq!(exact("sin(-pi/4)"), "-sqrt(2)/2");
    assert_eq!(exact("sin(pi/4)"), "sqrt(2)/2");

    // cos(-x) = cos(x)
    assert_eq!(exact("cos(-pi/3)"), "1/2");
    assert_eq!(exact("cos(pi/3)"), "1/2");

    // tan(-x) = -tan(x)
    assert_eq!(exact("tan(-pi/6)"), "-sqrt(3)/3");
    assert_eq!(exact("tan(pi/6)"), "sqrt(3)/3");
}

#[test]
fn sci_periodicite_angles() {
    assert_eq!(exact("sin(9*pi/4)"), "sqrt(2)/2");
    assert_eq!(exact("cos(7*pi/3)"), "1/2");
    assert_eq!(exact("tan(7*pi/6)"), "sqrt(3)/3");
}

#[test]
fn sci_propagation_indefini() {
    assert_indefini("1 + tan(pi/2)");
    assert_indefini("tan(pi/2) + 1");
    assert_indefini("2 * tan(pi/2)");
    assert_indefini("tan(pi/2) / 3");
}

/* ------------------------ Cohérence algébrique (zéro) ------------------------ */

#[test]
fn sci_zero_algebrique() {
    assert_eq!(exact("(1/2 + 1/3) - 5/6"), "0");
    assert_eq!(exact("(2/3 * 3/4) - 1/2"), "0");
    assert_eq!(exact("sqrt(2)*sqrt(2) - 2"), "0");
    assert_eq!(exact("x - x"), "0");
    assert_eq!(exact("1/sqrt(2)"), exact("sqrt(2)/2"));
}

/* ------------------------ Stress contrôlé ------------------------ */

#[test]
fn sci_stress_profondeur_sqrt() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    // alternance sqrt / carré : reste un carré parfait à chaque étape
    let mut expr = "4".to_string();
    for k in 0..40 {
        expr = if k % 2 == 0 {
            format!("sqrt({expr})")
        } else {
            format!("({expr})^2")
        };
        budget(t0, max);
    }

    assert_eq!(exact(&expr), "4");
    budget(t0, max);
}

#[test]
fn sci_stress_taille_somme() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    let expr = vec!["1/2"; 80].join(" + ");
    assert_eq!(exact(&expr), "40");
    budget(t0, max);
}

#[test]
fn sci_stress_bigint() {
    let big = "9".repeat(100);
    let attendu = format!("1{}/7", "0".repeat(100));
    assert_eq!(exact(&format!("{big}/7 + 1/7")), attendu);
}

/* ------------------------ Lecture décimale : cohérence minimale ------------------------ */

#[test]
fn sci_lecture_coherence() {
    let ev = evaluer_expression("sin(pi/4)", &[], 30).unwrap();
    assert!(ev.lecture.is_some());

    let ev = evaluer_expression("x + 1", &[], 30).unwrap();
    assert!(ev.lecture.is_none());
}
