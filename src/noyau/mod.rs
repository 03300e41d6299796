//! Noyau exact
//!
//! Organisation interne :
//! - erreur.rs     : CalcError (message lisible par variante)
//! - normalise.rs  : alias Unicode, `^` -> `**`, liste de motifs interdits
//! - jetons.rs     : tokenisation (grammaire restreinte)
//! - rpn.rs        : shunting-yard + construction Expr
//! - expr.rs       : AST exact (rationnels, π, e, I, ∞, indéfini)
//! - canon.rs      : simplification canonique
//! - trig.rs       : angles spéciaux k·π/n
//! - format.rs     : affichage exact ASCII (sqrt(2)/2, 4*pi, 1 + 2*I)
//! - approx.rs     : valeur f64 (signes, sondes)
//! - lecture.rs    : lecture décimale à précision choisie + caches π / e
//! - eval.rs       : pipeline complet + mode expression
//! - validation.rs : mode numérique strict (rôles nommés)
//! - derivee.rs    : dérivée symbolique
//! - poly.rs       : développement, coefficients, racines
//! - limite.rs     : limites (L'Hôpital, côtés, infini)
//! - resoudre.rs   : mode équation
//! - geometrie.rs  : aires et périmètres
//! - calcul.rs     : Calculatrice (opérations du menu + compteur)

pub mod approx;
pub mod calcul;
pub mod canon;
pub mod derivee;
pub mod erreur;
pub mod eval;
pub mod expr;
pub mod format;
pub mod geometrie;
pub mod jetons;
pub mod lecture;
pub mod limite;
pub mod normalise;
pub mod poly;
pub mod resoudre;
pub mod rpn;
pub mod trig;
pub mod validation;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;
