// src/app/actions.rs
//
// Menu fixe (13 entrées) et traitement de chaque entrée :
// invites -> appel Calculatrice -> affichage.

use std::io::{BufRead, Write};

use tracing::debug;

use crate::noyau::calcul::Calculatrice;

use super::saisie::{paires, Console, Echec};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Addition,
    Soustraction,
    Multiplication,
    Division,
    Puissance,
    Racine,
    Absolu,
    Logarithme,
    Quadratique,
    Geometrie,
    Limite,
    Expression,
    Equation,
}

pub const MENU: [(&str, &str, Action); 13] = [
    ("1", "Addition", Action::Addition),
    ("2", "Subtraction", Action::Soustraction),
    ("3", "Multiplication", Action::Multiplication),
    ("4", "Division", Action::Division),
    ("5", "Exponentiation", Action::Puissance),
    ("6", "Root", Action::Racine),
    ("7", "Absolute value", Action::Absolu),
    ("8", "Logarithm", Action::Logarithme),
    ("9", "Quadratic equation", Action::Quadratique),
    ("10", "Geometry helper", Action::Geometrie),
    ("11", "Limit", Action::Limite),
    ("12", "Expression mode", Action::Expression),
    ("13", "Equation mode", Action::Equation),
];

impl Action {
    pub fn depuis_choix(choix: &str) -> Option<Action> {
        MENU.iter()
            .find(|(cle, _, _)| *cle == choix.trim())
            .map(|(_, _, a)| *a)
    }
}

/// Exécute une entrée du menu. Les erreurs de calcul remontent à la boucle.
pub fn executer<R: BufRead, W: Write>(
    action: Action,
    calc: &mut Calculatrice,
    console: &mut Console<R, W>,
) -> Result<(), Echec> {
    debug!(?action, "action");

    match action {
        Action::Addition => {
            let a = console.lire_requis("First addend: ")?;
            let b = console.lire_requis("Second addend: ")?;
            let r = calc.ajouter(&a, &b)?;
            console.afficher_resultat(&r)?;
        }
        Action::Soustraction => {
            let a = console.lire_requis("Minuend: ")?;
            let b = console.lire_requis("Subtrahend: ")?;
            let r = calc.soustraire(&a, &b)?;
            console.afficher_resultat(&r)?;
        }
        Action::Multiplication => {
            let a = console.lire_requis("First factor: ")?;
            let b = console.lire_requis("Second factor: ")?;
            let r = calc.multiplier(&a, &b)?;
            console.afficher_resultat(&r)?;
        }
        Action::Division => {
            let a = console.lire_requis("Dividend: ")?;
            let b = console.lire_requis("Divisor: ")?;
            let r = calc.diviser(&a, &b)?;
            console.afficher_resultat(&r)?;
        }
        Action::Puissance => {
            let base = console.lire_requis("Base: ")?;
            let exposant = console.lire_requis("Exponent: ")?;
            let r = calc.puissance(&base, &exposant)?;
            console.afficher_resultat(&r)?;
        }
        Action::Racine => {
            let valeur = console.lire_requis("Radicand: ")?;
            let degre = console.lire("Root degree (default 2): ")?;
            let degre = if degre.is_empty() { "2" } else { degre.as_str() };
            let r = calc.racine(&valeur, degre)?;
            console.afficher_resultat(&r)?;
        }
        Action::Absolu => {
            let valeur = console.lire_requis("Argument for absolute value: ")?;
            let r = calc.absolu(&valeur)?;
            console.afficher_resultat(&r)?;
        }
        Action::Logarithme => {
            let valeur = console.lire_requis("Logarithm argument: ")?;
            let base = console.lire("Base (leave blank for natural logarithm): ")?;
            let base = (!base.is_empty()).then_some(base.as_str());
            let r = calc.logarithme(&valeur, base)?;
            console.afficher_resultat(&r)?;
        }
        Action::Quadratique => {
            let a = console.lire_requis("Coefficient a: ")?;
            let b = console.lire_requis("Coefficient b: ")?;
            let c = console.lire_requis("Coefficient c: ")?;
            let (x1, x2) = calc.quadratique(&a, &b, &c)?;
            console.afficher_racines(&x1, &x2)?;
        }
        Action::Geometrie => {
            console.afficher_operations_geometrie()?;
            let figure = console.lire_requis("Operation name: ")?;
            let brut = console.lire(
                "Parameters (comma separated, e.g. radius=3 or side_a=3,side_b=4,side_c=5): ",
            )?;
            let params = paires(&brut, "parameter")?;
            let r = calc.geometrie(&figure, &params)?;
            console.afficher_geometrie(&r)?;
        }
        Action::Limite => {
            let expression = console.lire_requis("Expression: ")?;
            let variable = console.lire_requis("Variable: ")?;
            let point = console.lire_requis("Approaches: ")?;
            let direction = console.lire("Direction [both/plus/minus] (default both): ")?;
            let r = calc.limite(&expression, &variable, &point, &direction)?;
            console.afficher_limite(&r)?;
        }
        Action::Expression => {
            let expression = console.lire_requis("Expression: ")?;
            let brut = console.lire("Substitutions (format x=1,y=2, optional): ")?;
            let substitutions = paires(&brut, "substitution")?;
            let ev = calc.evaluer(&expression, &substitutions)?;
            console.afficher_evaluation(&ev)?;
        }
        Action::Equation => {
            let equation = console.lire_requis("Equation (use '=' or imply =0): ")?;
            let variable = console.lire_requis("Solve for variable: ")?;
            let solutions = calc.resoudre(&equation, &variable)?;
            console.afficher_solutions(&solutions)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Exécute une action sur des réponses préparées ; rend (sortie, issue).
    fn lancer(action: Action, reponses: &str) -> (String, Result<(), String>) {
        let mut calc = Calculatrice::default();
        let mut console = Console::new(Cursor::new(reponses.as_bytes().to_vec()), Vec::new());
        let issue = executer(action, &mut calc, &mut console).map_err(|e| e.to_string());
        let sortie = String::from_utf8(console.into_sortie()).unwrap();
        (sortie, issue)
    }

    #[test]
    fn choix_du_menu() {
        assert_eq!(Action::depuis_choix("1"), Some(Action::Addition));
        assert_eq!(Action::depuis_choix(" 13 "), Some(Action::Equation));
        assert_eq!(Action::depuis_choix("14"), None);
        assert_eq!(Action::depuis_choix("add"), None);
    }

    #[test]
    fn addition_affiche_le_resultat() {
        let (s, issue) = lancer(Action::Addition, "1/2\n1/3\n");
        assert!(issue.is_ok());
        assert_eq!(s, "First addend: Second addend: Result: 5/6\n");
    }

    #[test]
    fn saisie_vide_refusee() {
        let (_, issue) = lancer(Action::Division, "1\n\n");
        assert_eq!(issue.unwrap_err(), "Value cannot be empty.");
    }

    #[test]
    fn racine_degre_par_defaut() {
        let (s, _) = lancer(Action::Racine, "9\n\n");
        assert_eq!(s, "Radicand: Root degree (default 2): Result: 3\n");
    }

    #[test]
    fn logarithme_base_optionnelle() {
        let (s, _) = lancer(Action::Logarithme, "8\n2\n");
        assert!(s.ends_with("Result: 3\n"));
        let (s, _) = lancer(Action::Logarithme, "E\n\n");
        assert!(s.ends_with("Result: 1\n"));
    }

    #[test]
    fn quadratique_deux_racines() {
        let (s, _) = lancer(Action::Quadratique, "1\n-3\n2\n");
        assert!(s.ends_with("Roots: 2, 1\n"));
    }

    #[test]
    fn geometrie_avec_parametres() {
        let (s, issue) = lancer(Action::Geometrie, "circle_area\nradius=2\n");
        assert!(issue.is_ok());
        assert!(s.starts_with("Available operations: circle_area, circle_circumference"));
        assert!(s.ends_with("Circle area: 4*pi\n"));

        let (_, issue) = lancer(Action::Geometrie, "circle_area\nradius\n");
        assert_eq!(issue.unwrap_err(), "Invalid parameter: radius");
    }

    #[test]
    fn limite_direction_par_defaut() {
        let (s, _) = lancer(Action::Limite, "sin(x)/x\nx\n0\n\n");
        assert!(s.ends_with("Limit: 1\n"));
    }

    #[test]
    fn expression_et_substitutions() {
        let (s, _) = lancer(Action::Expression, "x/3\nx=1\n");
        assert!(s.contains("Result: 1/3\n"));
        assert!(s.ends_with("Approximately: 0.333333333333333\n"));
    }

    #[test]
    fn equation_liste_de_solutions() {
        let (s, _) = lancer(Action::Equation, "x**2 - 3x + 2\nx\n");
        assert!(s.ends_with("Solutions: [1, 2]\n"));
    }
}
