//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! - RNG déterministe (seed fixe), profondeur bornée, budget temps global
//! - erreurs tolérées : liste blanche de variantes (indéfini, 1/0, trop grand)
//! - invariants : aucun résultat rendu n'est indéfini, une lecture décimale
//!   n'existe que pour une valeur sans variable, même entrée => même sortie

use std::time::{Duration, Instant};

use super::calcul::Calculatrice;
use super::erreur::CalcError;
use super::eval::{evaluer_expression, Evaluation};
use super::resoudre::resoudre;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}

impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u32(&mut self) -> u32 {
        // LCG (constantes de Knuth)
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.state >> 33) as u32
    }

    fn pick(&mut self, n: usize) -> usize {
        if n == 0 {
            0
        } else {
            self.next_u32() as usize % n
        }
    }

    fn parmi<'a>(&mut self, choix: &[&'a str]) -> &'a str {
        choix[self.pick(choix.len())]
    }

    fn entre(&mut self, bas: i64, haut: i64) -> i64 {
        bas + self.pick((haut - bas + 1) as usize) as i64
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Invariants ------------------------ */

fn erreur_toleree(e: &CalcError) -> bool {
    matches!(
        e,
        CalcError::Indefini { .. }
            | CalcError::Infini { .. }
            | CalcError::DivisionParZero
            | CalcError::TropGrand
    )
}

fn verifier(ev: &Evaluation) {
    assert!(
        !ev.expr.contient_indefini(),
        "résultat indéfini rendu: {}",
        ev.expr
    );
    if ev.lecture.is_some() {
        assert!(
            ev.expr.variables().is_empty(),
            "lecture d'un symbole: {}",
            ev.expr
        );
    }
}

/// Évalue ; rend true si succès. Panique sur une erreur hors liste blanche.
fn passer(expr: &str, liaisons: &[(String, String)], digits: usize) -> bool {
    match evaluer_expression(expr, liaisons, digits) {
        Ok(ev) => {
            verifier(&ev);
            true
        }
        Err(e) => {
            assert!(erreur_toleree(&e), "erreur non attendue: expr={expr:?} err={e}");
            false
        }
    }
}

/* ------------------------ Génération (bornée) ------------------------ */

fn gen_rat(rng: &mut Rng) -> String {
    // 0 inclus : les divisions par zéro doivent arriver par `/ expr`
    let n = rng.entre(0, 7);
    match rng.pick(3) {
        0 => format!("{n}/{}", rng.entre(1, 8)),
        1 => format!("{n}.{}", rng.entre(0, 9)),
        _ => n.to_string(),
    }
}

/// Angle k·π/d ; d = 12 sort de la table des valeurs exactes.
fn gen_angle(rng: &mut Rng) -> String {
    let k = rng.entre(-6, 7);
    match rng.parmi(&["1", "2", "3", "4", "6", "12"]) {
        "1" => format!("{k}*pi"),
        d => format!("{k}*pi/{d}"),
    }
}

fn gen_feuille(rng: &mut Rng, avec_variables: bool) -> String {
    match rng.pick(if avec_variables { 6 } else { 5 }) {
        0 | 1 => gen_rat(rng),
        2 => rng.parmi(&["pi", "E", "sqrt(2)", "sqrt(3)", "cbrt(2)"]).to_string(),
        3 => format!("({})", gen_angle(rng)),
        4 => format!("{}({})", rng.parmi(&["sin", "cos", "tan"]), gen_angle(rng)),
        _ => rng.parmi(&["x", "y"]).to_string(),
    }
}

fn gen_expr(rng: &mut Rng, profondeur: usize, avec_variables: bool) -> String {
    if profondeur == 0 || rng.pick(4) == 0 {
        return gen_feuille(rng, avec_variables);
    }
    let a = gen_expr(rng, profondeur - 1, avec_variables);
    match rng.pick(7) {
        0 => format!("({a}+{})", gen_expr(rng, profondeur - 1, avec_variables)),
        1 => format!("({a}-{})", gen_expr(rng, profondeur - 1, avec_variables)),
        2 => format!("({a}*{})", gen_expr(rng, profondeur - 1, avec_variables)),
        3 => format!("({a}/{})", gen_expr(rng, profondeur - 1, avec_variables)),
        4 => format!("({a})^{}", rng.entre(-2, 3)),
        5 => format!("abs({a})"),
        _ => format!("exp({a})"),
    }
}

/* ------------------------ Helper somme balancée anti pile ------------------------ */

fn somme_balancee(terme: &str, n: usize) -> String {
    let mut niveau: Vec<String> = vec![terme.to_string(); n];
    while niveau.len() > 1 {
        niveau = niveau
            .chunks(2)
            .map(|paire| match paire {
                [a, b] => format!("({a}+{b})"),
                [a] => a.clone(),
                _ => unreachable!(),
            })
            .collect();
    }
    niveau.pop().unwrap_or_else(|| "0".to_string())
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_determinisme_et_invariant_indefini() {
    let t0 = Instant::now();
    let max = Duration::from_secs(3);

    let mut rng = Rng::new(0xC0FFEE_u64);
    let mut jumeau = rng.clone();

    let mut ok = 0usize;
    let mut err = 0usize;

    for _ in 0..120 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 4, false);
        assert_eq!(expr, gen_expr(&mut jumeau, 4, false));

        if passer(&expr, &[], 30) {
            ok += 1;
        } else {
            err += 1;
        }
    }

    // un mélange des deux, sinon le fuzz ne balaye rien
    assert!(ok > 10, "trop peu de succès: {ok}");
    assert!(err > 0, "aucune erreur vue: fuzz trop sage");
}

#[test]
fn fuzz_safe_meme_entree_meme_sortie() {
    let mut rng = Rng::new(0x5EED_u64);
    for _ in 0..40 {
        let expr = gen_expr(&mut rng, 3, true);
        let a = evaluer_expression(&expr, &[], 20).map(|ev| ev.expr.to_string());
        let b = evaluer_expression(&expr, &[], 20).map(|ev| ev.expr.to_string());
        match (a, b) {
            (Ok(a), Ok(b)) => assert_eq!(a, b, "expr={expr:?}"),
            (Err(a), Err(b)) => assert_eq!(a.to_string(), b.to_string(), "expr={expr:?}"),
            _ => panic!("issue instable pour {expr:?}"),
        }
    }
}

#[test]
fn fuzz_safe_substitutions() {
    let t0 = Instant::now();
    let max = Duration::from_secs(3);

    let mut rng = Rng::new(0xBADC0DE_u64);

    for _ in 0..60 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 3, true);
        let liaisons = vec![
            ("x".to_string(), gen_rat(&mut rng)),
            ("y".to_string(), gen_feuille(&mut rng, false)),
        ];
        passer(&expr, &liaisons, 20);
    }
}

#[test]
fn fuzz_safe_angles_trig_dans_domaine() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    let mut rng = Rng::new(0xA11CE_u64);

    for _ in 0..80 {
        budget(t0, max);

        // hors table (π/12) : reste symbolique, sans erreur
        let f = rng.parmi(&["sin", "cos", "tan"]);
        let expr = format!("{f}({})", gen_angle(&mut rng));
        passer(&expr, &[], 25);
    }
}

#[test]
fn fuzz_safe_operations_du_menu() {
    let mut rng = Rng::new(0xFACADE_u64);
    let mut calc = Calculatrice::default();
    let mut reussies = 0u64;

    for _ in 0..100 {
        let a = gen_rat(&mut rng);
        let b = gen_rat(&mut rng);
        let issue = match rng.pick(5) {
            0 => calc.ajouter(&a, &b),
            1 => calc.soustraire(&a, &b),
            2 => calc.multiplier(&a, &b),
            3 => calc.diviser(&a, &b),
            _ => calc.puissance(&a, &b),
        };
        match issue {
            Ok(_) => reussies += 1,
            Err(e) => assert!(
                matches!(
                    e,
                    CalcError::DivisionParZero | CalcError::Domaine(_) | CalcError::TropGrand
                ),
                "a={a:?} b={b:?} err={e}"
            ),
        }
    }

    // le compteur ne voit que les succès
    assert_eq!(calc.operations(), reussies);
}

#[test]
fn fuzz_safe_equations_verifiees() {
    let mut rng = Rng::new(0x0DDBA11_u64);

    for _ in 0..30 {
        let r1 = rng.entre(-5, 5);
        let r2 = rng.entre(-5, 5);
        let equation = format!("(x - ({r1}))*(x - ({r2})) = 0");
        let solutions: Vec<String> = resoudre(&equation, "x")
            .unwrap_or_else(|e| panic!("{equation}: {e}"))
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mut attendu = vec![r1.min(r2).to_string(), r1.max(r2).to_string()];
        attendu.dedup();
        assert_eq!(solutions, attendu, "equation={equation:?}");
    }
}

#[test]
fn fuzz_safe_somme_balancee_anti_pile() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    let expr = somme_balancee("1/2", 800);
    budget(t0, max);

    let ev = evaluer_expression(&expr, &[], 10).unwrap_or_else(|e| panic!("err: {e}"));

    // 800*(1/2) = 400
    assert_eq!(ev.expr.to_string(), "400");
    assert!(ev.lecture.is_none());
}
