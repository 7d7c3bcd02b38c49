//! Medieval name pools.

use crate::agent::Name;
use hamlet_core::Gender;
use rand::seq::SliceRandom;
use rand::Rng;

pub static FIRST_NAMES_MEN: &[&str] = &[
    "Arthur", "Baldric", "Cedric", "Edgar", "Gareth",
    "Harold", "Lancelot", "Percival", "Roland", "Theodore",
];

pub static FIRST_NAMES_WOMEN: &[&str] = &[
    "Adelaide", "Beatrice", "Cecily", "Eleanor", "Felicity",
    "Gwendolyn", "Isolde", "Margery", "Rosalind", "Winifred",
];

pub static LAST_NAMES: &[&str] = &[
    "Blackwood", "Dawnbreaker", "Evershade", "Hawthorne", "Ironwood",
    "Kingsley", "Lancaster", "Ravenwood", "Thornfield", "Winterbourne",
];

fn pick<R: Rng + ?Sized>(pool: &[&'static str], rng: &mut R) -> &'static str {
    // pools are non-empty statics
    pool.choose(rng).copied().unwrap_or_default()
}

/// First name from the gender's pool; last name fixed or drawn at random.
/// An empty `last_name` counts as absent.
pub fn generate_name<R: Rng + ?Sized>(gender: Gender, last_name: Option<&str>, rng: &mut R) -> Name {
    let first = match gender {
        Gender::Male => pick(FIRST_NAMES_MEN, rng),
        Gender::Female => pick(FIRST_NAMES_WOMEN, rng),
    };

    let last = match last_name {
        Some(last) if !last.is_empty() => last.to_string(),
        _ => pick(LAST_NAMES, rng).to_string(),
    };

    Name::new(first, last)
}
