// src/app.rs
//
// Boucle de présentation
// ----------------------
// Rôle:
// - Déclarer les sous-modules (etat, saisie, vue, actions)
// - Faire tourner le menu : choix -> action -> affichage -> recommencer
//
// Important:
// - Choix vide ou fin d'entrée (même au milieu d'une action) : on quitte (statut 0).
// - Une erreur de calcul s'affiche en une ligne, la boucle continue.
// - Une panique dans une action devient "Unexpected error: ...", la boucle continue.
// - Seule une erreur d'E/S sur la console interrompt la session.

pub mod actions;
pub mod etat;
pub mod saisie;
pub mod vue;

pub use etat::Session;
pub use saisie::Console;

use std::any::Any;
use std::io::{self, BufRead, Write};
use std::panic::{self, AssertUnwindSafe};

use tracing::{error, info};

use actions::Action;
use saisie::Echec;

pub fn executer<R: BufRead, W: Write>(
    session: &mut Session,
    console: &mut Console<R, W>,
) -> io::Result<()> {
    info!("session démarrée");
    console.afficher_banniere()?;

    loop {
        console.afficher_menu()?;
        let choix = console.lire("\nYour choice: ")?;
        if choix.is_empty() {
            break;
        }

        let Some(action) = Action::depuis_choix(&choix) else {
            console.ecrire_ligne("Unknown command. Try again.")?;
            continue;
        };

        let issue = panic::catch_unwind(AssertUnwindSafe(|| {
            actions::executer(action, &mut session.calc, console)
        }));

        let reussie = match issue {
            Ok(Ok(())) => true,
            Ok(Err(Echec::Calcul(e))) => {
                console.afficher_erreur(&e)?;
                false
            }
            Ok(Err(Echec::Io(e))) => return Err(e),
            Err(panique) => {
                let detail = message_panique(panique.as_ref());
                error!(?action, %detail, "panique dans une action");
                console.afficher_inattendu(&detail)?;
                false
            }
        };
        session.noter(reussie);

        let avis = session.calc.prendre_avis();
        console.afficher_avis(&avis)?;

        if console.fin() {
            break;
        }
    }

    console.afficher_bilan(session.calc.operations())?;
    info!(
        actions = session.actions,
        echecs = session.echecs,
        operations = session.calc.operations(),
        "session terminée"
    );
    Ok(())
}

fn message_panique(p: &(dyn Any + Send)) -> String {
    if let Some(s) = p.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = p.downcast_ref::<String>() {
        s.clone()
    } else {
        "internal failure".to_string()
    }
}
