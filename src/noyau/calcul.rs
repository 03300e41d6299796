// src/noyau/calcul.rs
//
// Calculatrice : une méthode par entrée du menu.
// Forme commune : valider les saisies -> calculer exactement -> contrôler la taille.
// Les cinq opérations arithmétiques incrémentent le compteur de la session.

use std::fmt;

use num_bigint::BigInt;
use num_traits::Zero;
use tracing::{debug, warn};

use super::approx::approx;
use super::canon::canon_expr;
use super::erreur::{CalcError, CalcResult};
use super::eval::{analyser, est_identifiant, evaluer_expression, Evaluation};
use super::expr::{Expr, Fonction};
use super::geometrie::{geometrie, ResultatGeometrie};
use super::limite::{limite, Direction};
use super::poly::{discriminant, racines_quadratiques};
use super::resoudre::resoudre;
use super::validation::{nombre, signe, Contraintes};

pub const SEUIL_QUASI_NUL: f64 = 1e-10;
pub const DECIMALES: usize = 15;

/// Message non bloquant, affiché après le résultat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Avis {
    Attention(String),
    Info(String),
}

impl fmt::Display for Avis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Avis::Attention(m) => write!(f, "Warning: {m}"),
            Avis::Info(m) => write!(f, "Note: {m}"),
        }
    }
}

#[derive(Debug)]
pub struct Calculatrice {
    operations: u64,
    avis: Vec<Avis>,
    seuil_quasi_nul: f64,
    decimales: usize,
}

impl Default for Calculatrice {
    fn default() -> Self {
        Self::new(SEUIL_QUASI_NUL, DECIMALES)
    }
}

impl Calculatrice {
    pub fn new(seuil_quasi_nul: f64, decimales: usize) -> Self {
        Self {
            operations: 0,
            avis: Vec::new(),
            seuil_quasi_nul,
            decimales,
        }
    }

    /// Nombre d'opérations arithmétiques réussies.
    pub fn operations(&self) -> u64 {
        self.operations
    }

    /// Vide et rend les avis accumulés depuis le dernier appel.
    pub fn prendre_avis(&mut self) -> Vec<Avis> {
        std::mem::take(&mut self.avis)
    }

    fn signaler(&mut self, avis: Avis) {
        warn!(%avis, "avis");
        self.avis.push(avis);
    }

    /* ------------------------ Arithmétique ------------------------ */

    pub fn ajouter(&mut self, a: &str, b: &str) -> CalcResult<Expr> {
        let x = nombre(a, "First addend", Contraintes::AUCUNE)?;
        let y = nombre(b, "Second addend", Contraintes::AUCUNE)?;
        self.compter("Addition", || Ok(canon_expr(Expr::add(x, y))))
    }

    pub fn soustraire(&mut self, a: &str, b: &str) -> CalcResult<Expr> {
        let x = nombre(a, "Minuend", Contraintes::AUCUNE)?;
        let y = nombre(b, "Subtrahend", Contraintes::AUCUNE)?;
        self.compter("Subtraction", || Ok(canon_expr(Expr::sub(x, y))))
    }

    pub fn multiplier(&mut self, a: &str, b: &str) -> CalcResult<Expr> {
        let x = nombre(a, "First factor", Contraintes::AUCUNE)?;
        let y = nombre(b, "Second factor", Contraintes::AUCUNE)?;
        self.compter("Multiplication", || Ok(canon_expr(Expr::mul(x, y))))
    }

    pub fn diviser(&mut self, a: &str, b: &str) -> CalcResult<Expr> {
        let x = nombre(a, "Dividend", Contraintes::AUCUNE)?;
        let y = nombre(b, "Divisor", Contraintes::AUCUNE)?;
        if y.est_zero() {
            return Err(CalcError::DivisionParZero);
        }
        if approx(&y).is_some_and(|v| v.abs() < self.seuil_quasi_nul) {
            self.signaler(Avis::Attention(format!(
                "Divisor {y} is very close to zero; the result may be unstable"
            )));
        }
        self.compter("Division", || Ok(canon_expr(Expr::div(x, y))))
    }

    pub fn puissance(&mut self, base: &str, exposant: &str) -> CalcResult<Expr> {
        let x = nombre(base, "Base", Contraintes::AUCUNE)?;
        let n = nombre(exposant, "Exponent", Contraintes::AUCUNE)?;

        if x.est_zero() {
            if n.est_zero() {
                return Err(CalcError::domaine("0^0 is undefined"));
            }
            if signe(&n) == Some(-1) {
                return Err(CalcError::DivisionParZero);
            }
        }
        if signe(&x) == Some(-1) && !n.est_entier() {
            return Err(CalcError::domaine(
                "A negative base with a non-integer exponent has no real value",
            ));
        }

        self.compter("Power", || {
            let r = canon_expr(Expr::pow(x, n));
            // rationnel ^ entier resté non évalué : dépassement de MAX_BITS
            if let Expr::Pow(b, e) = &r {
                if matches!(**b, Expr::Rat(_)) && e.est_entier() {
                    return Err(CalcError::TropGrand);
                }
            }
            Ok(r)
        })
    }

    /// Calcul commun aux cinq opérations comptées.
    fn compter(
        &mut self,
        operation: &'static str,
        calcul: impl FnOnce() -> CalcResult<Expr>,
    ) -> CalcResult<Expr> {
        let r = calcul()
            .and_then(|r| r.verifier_taille().map(|_| r))
            .map_err(|e| e.dans(operation))?;
        self.operations += 1;
        debug!(operation, resultat = %r, total = self.operations, "opération");
        Ok(r)
    }

    /* ------------------------ Fonctions ------------------------ */

    pub fn racine(&mut self, radicande: &str, degre: &str) -> CalcResult<Expr> {
        let x = nombre(radicande, "Radicand", Contraintes::AUCUNE)?;
        let n = nombre(degre, "Root degree", Contraintes::NON_NUL)?;
        let inverse = canon_expr(Expr::inv(n.clone()));

        let r = if signe(&x) == Some(-1) {
            let impair =
                matches!(&n, Expr::Rat(q) if q.is_integer() && !(q.numer() % BigInt::from(2)).is_zero());
            if !impair {
                return Err(CalcError::NonReel {
                    role: "Root".into(),
                    valeur: format!("({x})^(1/({n}))"),
                });
            }
            // racine réelle d'un négatif : −|x|^(1/n)
            canon_expr(Expr::neg(Expr::pow(Expr::neg(x), inverse)))
        } else {
            canon_expr(Expr::pow(x, inverse))
        };
        r.verifier_taille().map_err(|e| e.dans("Root"))?;
        Ok(r)
    }

    pub fn absolu(&mut self, valeur: &str) -> CalcResult<Expr> {
        let x = nombre(valeur, "Value", Contraintes::AUCUNE)?;
        Ok(canon_expr(Expr::fonc(Fonction::Abs, x)))
    }

    /// ln(x), ou ln(x)/ln(b) si une base est donnée.
    pub fn logarithme(&mut self, valeur: &str, base: Option<&str>) -> CalcResult<Expr> {
        let x = nombre(valeur, "Logarithm argument", Contraintes::POSITIF)?;
        let r = match base {
            None => canon_expr(Expr::ln(x)),
            Some(b) => {
                let b = nombre(b, "Logarithm base", Contraintes::POSITIF)?;
                if b.est_un() {
                    return Err(CalcError::domaine("Logarithm base cannot be 1"));
                }
                canon_expr(Expr::div(Expr::ln(x), Expr::ln(b)))
            }
        };
        Ok(r)
    }

    /// Racines de a·x² + b·x + c, la racine « + » d'abord.
    pub fn quadratique(&mut self, a: &str, b: &str, c: &str) -> CalcResult<(Expr, Expr)> {
        let a = nombre(a, "Coefficient a", Contraintes::NON_NUL)?;
        let b = nombre(b, "Coefficient b", Contraintes::AUCUNE)?;
        let c = nombre(c, "Coefficient c", Contraintes::AUCUNE)?;

        let delta = discriminant(&a, &b, &c);
        if signe(&delta) == Some(-1) {
            self.signaler(Avis::Info(format!(
                "Discriminant {delta} is negative; the roots are complex"
            )));
        }
        let (x1, x2) = racines_quadratiques(&a, &b, &c);
        x1.verifier_taille().map_err(|e| e.dans("Quadratic solver"))?;
        x2.verifier_taille().map_err(|e| e.dans("Quadratic solver"))?;
        Ok((x1, x2))
    }

    /* ------------------------ Modes ------------------------ */

    pub fn geometrie(
        &mut self,
        operation: &str,
        params: &[(String, String)],
    ) -> CalcResult<ResultatGeometrie> {
        geometrie(operation, params)
    }

    pub fn limite(
        &mut self,
        expression: &str,
        variable: &str,
        point: &str,
        direction: &str,
    ) -> CalcResult<Expr> {
        let variable = variable.trim();
        if !est_identifiant(variable) {
            return Err(CalcError::Parametre {
                quoi: "variable",
                fragment: variable.to_string(),
            });
        }
        let e = analyser(expression)?;
        let p = analyser(point)?;
        let dir: Direction = direction.parse()?;
        limite(&e, variable, &p, dir).map_err(|e| e.dans("Limit"))
    }

    pub fn evaluer(
        &mut self,
        expression: &str,
        substitutions: &[(String, String)],
    ) -> CalcResult<Evaluation> {
        evaluer_expression(expression, substitutions, self.decimales)
    }

    pub fn resoudre(&mut self, equation: &str, variable: &str) -> CalcResult<Vec<Expr>> {
        resoudre(equation, variable).map_err(|e| e.dans("Equation solving"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(r: CalcResult<Expr>) -> String {
        r.unwrap_or_else(|e| panic!("erreur inattendue: {e}")).to_string()
    }

    #[test]
    fn arithmetique_exacte() {
        let mut c = Calculatrice::default();
        assert_eq!(s(c.ajouter("1/2", "1/3")), "5/6");
        assert_eq!(s(c.soustraire("pi", "pi")), "0");
        assert_eq!(s(c.multiplier("sqrt(2)", "sqrt(8)")), "4");
        assert_eq!(s(c.diviser("1", "3")), "1/3");
        assert_eq!(s(c.puissance("2", "10")), "1024");
        assert_eq!(c.operations(), 5);
    }

    #[test]
    fn compteur_ignore_les_echecs() {
        let mut c = Calculatrice::default();
        assert!(c.ajouter("x", "1").is_err());
        assert!(c.diviser("1", "0").is_err());
        assert!(c.ajouter("1e", "1").is_err());
        assert!(c.racine("4", "2").is_ok());
        assert_eq!(c.operations(), 0);
    }

    #[test]
    fn division() {
        let mut c = Calculatrice::default();
        assert_eq!(c.diviser("5", "0").unwrap_err(), CalcError::DivisionParZero);
        assert_eq!(c.diviser("5", "1 - 1").unwrap_err(), CalcError::DivisionParZero);
        assert!(c.prendre_avis().is_empty());

        assert_eq!(s(c.diviser("1", "1e-12")), "1000000000000");
        let avis = c.prendre_avis();
        assert_eq!(avis.len(), 1);
        assert!(avis[0].to_string().starts_with("Warning: Divisor"));
        assert!(c.prendre_avis().is_empty());
    }

    #[test]
    fn puissances() {
        let mut c = Calculatrice::default();
        assert_eq!(c.puissance("0", "0").unwrap_err().to_string(), "0^0 is undefined");
        assert_eq!(c.puissance("0", "-1").unwrap_err(), CalcError::DivisionParZero);
        assert!(c.puissance("-8", "1/3").is_err());
        assert_eq!(s(c.puissance("-2", "3")), "-8");
        assert_eq!(s(c.puissance("4", "1/2")), "2");
        assert_eq!(s(c.puissance("2", "-2")), "1/4");
        let e = c.puissance("2", "1000000").unwrap_err();
        assert_eq!(
            e.to_string(),
            "Power failed: Result is too large to be represented exactly"
        );
    }

    #[test]
    fn racines() {
        let mut c = Calculatrice::default();
        assert_eq!(s(c.racine("16", "2")), "4");
        assert_eq!(s(c.racine("-8", "3")), "-2");
        assert_eq!(s(c.racine("8", "2")), "2*sqrt(2)");
        assert!(c.racine("-4", "2").is_err());
        assert_eq!(
            c.racine("4", "0").unwrap_err().to_string(),
            "Root degree cannot be zero"
        );
        let e = c.racine("-1", "1/3").unwrap_err().to_string();
        assert!(e.contains("(-1)^(1/(1/3))"), "{e}");
    }

    #[test]
    fn valeur_absolue() {
        let mut c = Calculatrice::default();
        assert_eq!(s(c.absolu("-3/4")), "3/4");
        assert_eq!(s(c.absolu("1 - sqrt(2)")), "-1 + sqrt(2)");
    }

    #[test]
    fn logarithmes_exacts() {
        let mut c = Calculatrice::default();
        assert_eq!(s(c.logarithme("8", Some("2"))), "3");
        assert_eq!(s(c.logarithme("1/9", Some("3"))), "-2");
        assert_eq!(s(c.logarithme("4", Some("8"))), "2/3");
        assert_eq!(s(c.logarithme("E**3", None)), "3");
        assert_eq!(s(c.logarithme("1", None)), "0");
    }

    #[test]
    fn logarithmes_refuses() {
        let mut c = Calculatrice::default();
        assert_eq!(
            c.logarithme("-1", None).unwrap_err().to_string(),
            "Logarithm argument must be positive"
        );
        assert_eq!(
            c.logarithme("2", Some("1")).unwrap_err().to_string(),
            "Logarithm base cannot be 1"
        );
        assert!(c.logarithme("2", Some("0")).is_err());
    }

    #[test]
    fn equation_du_second_degre() {
        let mut c = Calculatrice::default();
        let (x1, x2) = c.quadratique("1", "-3", "2").unwrap();
        assert_eq!((x1.to_string(), x2.to_string()), ("2".to_string(), "1".to_string()));
        assert!(c.prendre_avis().is_empty());

        let (x1, x2) = c.quadratique("1", "-2", "5").unwrap();
        assert_eq!(x1.to_string(), "1 + 2*I");
        assert_eq!(x2.to_string(), "1 - 2*I");
        let avis = c.prendre_avis();
        assert!(matches!(avis.as_slice(), [Avis::Info(_)]));

        let (x1, x2) = c.quadratique("1", "1", "sqrt(2)").unwrap();
        assert!(x1.contient_i() && x2.contient_i(), "{x1} ; {x2}");
        assert!(matches!(c.prendre_avis().as_slice(), [Avis::Info(_)]));

        assert_eq!(
            c.quadratique("0", "1", "1").unwrap_err().to_string(),
            "Coefficient a cannot be zero"
        );
    }

    #[test]
    fn modes_symboliques() {
        let mut c = Calculatrice::default();
        assert_eq!(s(c.limite("sin(x)/x", "x", "0", "both")), "1");
        assert!(c.limite("x", "2x", "0", "both").is_err());
        let sols = c.resoudre("x**2 = 4", "x").unwrap();
        assert_eq!(sols.len(), 2);
        let ev = c.evaluer("x + 1", &[("x".into(), "1/2".into())]).unwrap();
        assert_eq!(ev.expr.to_string(), "3/2");
        assert_eq!(ev.lecture.as_deref(), Some("1.5"));
        assert_eq!(c.operations(), 0);
    }
}
