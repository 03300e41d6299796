//! Noyau — évaluation (pipeline réel)
//!
//! normalise -> tokenize -> RPN -> Expr -> canon (simplification exacte)
//!
//! `analyser` est la porte d'entrée unique de toute saisie utilisateur :
//! les autres modules (validation, limite, resoudre, ...) passent par elle.

use tracing::debug;

use super::erreur::{CalcError, CalcResult};
use super::expr::Expr;
use super::jetons::{format_tokens, tokenize};
use super::lecture::{lecture_decimale, lecture_utile};
use super::normalise::normaliser;
use super::rpn::{from_rpn, to_rpn};

/// Résultat du mode expression.
#[derive(Clone, Debug)]
pub struct Evaluation {
    pub expr: Expr,
    /// Lecture décimale approchée (None si symbolique ou entier).
    pub lecture: Option<String>,
}

/// Saisie -> Expr canonique. Toute erreur de grammaire devient `CalcError::Analyse`.
pub fn analyser(texte: &str) -> CalcResult<Expr> {
    let propre = normaliser(texte)?;
    let litteral = texte.trim();

    let erreur = |cause: String| CalcError::Analyse {
        litteral: litteral.to_string(),
        cause,
    };

    // 1) Jetons
    let jetons = tokenize(&propre).map_err(erreur)?;
    debug!(jetons = %format_tokens(&jetons), "jetons");

    // 2) RPN
    let rpn = to_rpn(&jetons).map_err(erreur)?;

    // 3) AST brut
    let brut = from_rpn(&rpn).map_err(erreur)?;

    // 4) Canon
    let e = brut.simplify();
    debug!(entree = litteral, resultat = %e, "analyse");
    Ok(e)
}

/// Mode expression : analyse, substitutions `nom=valeur` (simultanées), simplification.
pub fn evaluer_expression(
    texte: &str,
    substitutions: &[(String, String)],
    digits: usize,
) -> CalcResult<Evaluation> {
    let e = analyser(texte)?;

    let mut liaisons: Vec<(String, Expr)> = Vec::with_capacity(substitutions.len());
    for (nom, valeur) in substitutions {
        if !est_identifiant(nom) {
            return Err(CalcError::Parametre {
                quoi: "substitution",
                fragment: format!("{nom}={valeur}"),
            });
        }
        liaisons.push((nom.clone(), analyser(valeur)?));
    }

    let e = if liaisons.is_empty() {
        e
    } else {
        e.substituer_plusieurs(&liaisons).simplify()
    };

    if e.contient_indefini() {
        return Err(CalcError::Indefini {
            role: "Result".into(),
        });
    }
    e.verifier_taille()?;

    let lecture = if lecture_utile(&e) {
        lecture_decimale(&e, digits)
    } else {
        None
    };

    Ok(Evaluation { expr: e, lecture })
}

/// [a-zA-Z_][a-zA-Z0-9_]*
pub fn est_identifiant(s: &str) -> bool {
    let mut it = s.chars();
    match it.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            it.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_exact(s: &str, digits: usize) -> (String, Option<String>) {
        let ev = evaluer_expression(s, &[], digits)
            .unwrap_or_else(|e| panic!("evaluer_expression({s:?}) erreur: {e}"));
        (ev.expr.to_string(), ev.lecture)
    }

    fn ok_exact_only(s: &str) -> String {
        ok_exact(s, 50).0
    }

    fn ok_dec(s: &str, digits: usize) -> String {
        ok_exact(s, digits)
            .1
            .unwrap_or_else(|| panic!("lecture indisponible pour {s:?}"))
    }

    fn subs(v: &[(&str, &str)]) -> Vec<(String, String)> {
        v.iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect()
    }

    fn assert_contains(hay: &str, needle: &str) {
        if !hay.contains(needle) {
            panic!("attendu que {hay:?} contienne {needle:?}");
        }
    }

    // --- Variables ---

    #[test]
    fn var_parse_et_affiche() {
        let (exact, lecture_opt) = ok_exact("x + 1/2", 20);
        assert_eq!(exact, "1/2 + x");
        assert!(lecture_opt.is_none());
    }

    // --- Trig de base ---

    #[test]
    fn trig_sin_pi_4() {
        assert_eq!(ok_exact_only("sin(pi/4)"), "sqrt(2)/2");
        let dec = ok_dec("sin(pi/4)", 20);
        assert_contains(&dec, "0.707106781186547524");
    }

    #[test]
    fn trig_tan_pi_6() {
        assert_eq!(ok_exact_only("tan(pi/6)"), "sqrt(3)/3");
        let dec = ok_dec("tan(pi/6)", 20);
        assert_contains(&dec, "0.577350269189625764");
    }

    #[test]
    fn trig_tan_pi_2_indefini() {
        let e = evaluer_expression("tan(pi/2)", &[], 20).unwrap_err();
        assert_eq!(e.to_string(), "Result is undefined (NaN)");
    }

    #[test]
    fn trig_combos() {
        assert_eq!(ok_exact_only("1/2 + sin(pi/4)"), "1/2 + sqrt(2)/2");
        assert_eq!(ok_exact_only("2*sin(pi/4)"), "sqrt(2)");
        assert_eq!(ok_exact_only("sin(pi/4)*sqrt(2)"), "1");
        assert_eq!(ok_exact_only("sin(3*pi/2)"), "-1");
        assert_eq!(ok_exact_only("cos(pi)"), "-1");
    }

    #[test]
    fn espaces_et_majuscules() {
        assert_eq!(ok_exact_only("  SIN ( PI / 4 ) "), "sqrt(2)/2");
    }

    // --- Substitutions ---

    #[test]
    fn substitutions_simples() {
        let ev = evaluer_expression("x**2 + y", &subs(&[("x", "3"), ("y", "1/2")]), 15).unwrap();
        assert_eq!(ev.expr.to_string(), "19/2");
        assert_eq!(ev.lecture.as_deref(), Some("9.5"));
    }

    #[test]
    fn substitution_simultanee() {
        let ev = evaluer_expression("x - 2y", &subs(&[("x", "y"), ("y", "x")]), 15).unwrap();
        assert_eq!(ev.expr.to_string(), "-2*x + y");
    }

    #[test]
    fn substitution_partielle_reste_symbolique() {
        let ev = evaluer_expression("x*y", &subs(&[("x", "2")]), 15).unwrap();
        assert_eq!(ev.expr.to_string(), "2*y");
        assert!(ev.lecture.is_none());
    }

    #[test]
    fn substitution_vers_division_par_zero() {
        let e = evaluer_expression("1/x", &subs(&[("x", "0")]), 15).unwrap_err();
        assert!(matches!(e, CalcError::Indefini { .. }));
    }

    #[test]
    fn nom_de_substitution_invalide() {
        let e = evaluer_expression("x", &subs(&[("2x", "1")]), 15).unwrap_err();
        assert_eq!(e.to_string(), "Invalid substitution: 2x=1");
    }

    #[test]
    fn entier_sans_lecture() {
        let (exact, lecture) = ok_exact("2**10", 15);
        assert_eq!(exact, "1024");
        assert!(lecture.is_none());
    }

    // --- Erreurs d'analyse ---

    #[test]
    fn erreur_analyse_porte_le_litteral() {
        let e = analyser("2 +* 3").unwrap_err();
        assert!(
            e.to_string().starts_with("Could not parse '2 +* 3':"),
            "{e}"
        );
    }

    #[test]
    fn injection_refusee_avant_analyse() {
        let e = analyser("__import__('os').system('ls')").unwrap_err();
        assert!(matches!(e, CalcError::MotifInterdit { .. }));
    }
}
